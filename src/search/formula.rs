//! Filter formula synthesis from schema metadata.

use tracing::debug;

use crate::client::TableService;
use crate::error::Result;
use crate::model::FieldSchema;

/// Most fields ever referenced by one synthesized formula. Bounds expression
/// length and remote-side evaluation cost on wide tables.
pub const MAX_FORMULA_FIELDS: usize = 12;

/// Field types whose values are text-bearing and worth substring-matching.
const TEXT_FIELD_TYPES: [&str; 5] = [
    "singleLineText",
    "multilineText",
    "richText",
    "email",
    "url",
];

/// A filter expression plus the fields it was derived from. An empty
/// expression means "no filter": downstream must list unfiltered.
#[derive(Debug, Clone)]
pub struct SearchFormula {
    pub expression: String,
    pub fields: Vec<String>,
}

impl SearchFormula {
    pub fn is_empty(&self) -> bool {
        self.expression.is_empty()
    }
}

/// Escape a query for embedding in a double-quoted formula literal, so it can
/// never break out of the literal or inject clauses.
pub fn escape_query(query: &str) -> String {
    query.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Synthesize a substring-match formula over the given fields.
pub fn formula_for_fields(query: &str, fields: &[String]) -> SearchFormula {
    if fields.is_empty() {
        return SearchFormula {
            expression: String::new(),
            fields: Vec::new(),
        };
    }
    let escaped = escape_query(query);
    let predicates: Vec<String> = fields
        .iter()
        .map(|field| format!("SEARCH(\"{escaped}\", {{{field}}})"))
        .collect();
    let expression = if predicates.len() == 1 {
        predicates.into_iter().next().expect("one predicate")
    } else {
        format!("OR({})", predicates.join(", "))
    };
    SearchFormula {
        expression,
        fields: fields.to_vec(),
    }
}

fn is_text_field(field: &FieldSchema) -> bool {
    TEXT_FIELD_TYPES.contains(&field.field_type.as_str())
}

/// Build a formula for one table. Caller-supplied fields always win;
/// otherwise text-bearing fields are discovered from the current schema, in
/// schema order, capped at [`MAX_FORMULA_FIELDS`].
pub async fn build<S: TableService>(
    service: &S,
    table_id: &str,
    query: &str,
    explicit_fields: &[String],
) -> Result<SearchFormula> {
    if !explicit_fields.is_empty() {
        return Ok(formula_for_fields(query, explicit_fields));
    }

    let tables = service.list_tables().await?;
    let fields: Vec<String> = tables
        .into_iter()
        .find(|t| t.id == table_id)
        .map(|t| {
            t.fields
                .iter()
                .filter(|f| is_text_field(f))
                .take(MAX_FORMULA_FIELDS)
                .map(|f| f.name.clone())
                .collect()
        })
        .unwrap_or_default();
    debug!(
        table = table_id,
        fields = fields.len(),
        "discovered text fields for search"
    );
    Ok(formula_for_fields(query, &fields))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeBase, field, table};

    #[test]
    fn escapes_backslash_and_quote() {
        assert_eq!(escape_query(r#"say "hi""#), r#"say \"hi\""#);
        assert_eq!(escape_query(r"a\b"), r"a\\b");
        // Backslash first, so escapes are not double-escaped.
        assert_eq!(escape_query(r#"\""#), r#"\\\""#);
    }

    #[test]
    fn single_field_emits_bare_predicate() {
        let formula = formula_for_fields(r#"say "hi""#, &["Name".to_string()]);
        assert_eq!(formula.expression, r#"SEARCH("say \"hi\"", {Name})"#);
        assert_eq!(formula.fields, vec!["Name".to_string()]);
    }

    #[test]
    fn multiple_fields_are_ored() {
        let fields = vec!["Name".to_string(), "Notes".to_string()];
        let formula = formula_for_fields("alpha", &fields);
        assert_eq!(
            formula.expression,
            r#"OR(SEARCH("alpha", {Name}), SEARCH("alpha", {Notes}))"#
        );
    }

    #[test]
    fn no_fields_means_no_filter() {
        let formula = formula_for_fields("alpha", &[]);
        assert!(formula.is_empty());
        assert!(formula.fields.is_empty());
    }

    #[tokio::test]
    async fn explicit_fields_skip_schema_discovery() {
        let base = FakeBase::default();
        let formula = build(&base, "tblAAAAAAAAAA01", "alpha", &["Name".to_string()])
            .await
            .expect("builds");
        assert_eq!(formula.expression, r#"SEARCH("alpha", {Name})"#);
        assert_eq!(base.schema_calls(), 0);
    }

    #[tokio::test]
    async fn discovery_keeps_only_text_fields_in_schema_order() {
        let mut t = table("tblAAAAAAAAAA01", "Tasks");
        t.fields = vec![
            field("Name", "singleLineText"),
            field("Count", "number"),
            field("Notes", "multilineText"),
            field("Done", "checkbox"),
            field("Contact", "email"),
            field("Site", "url"),
            field("Body", "richText"),
        ];
        let base = FakeBase::with_tables(vec![t]);

        let formula = build(&base, "tblAAAAAAAAAA01", "alpha", &[])
            .await
            .expect("builds");
        assert_eq!(
            formula.fields,
            vec!["Name", "Notes", "Contact", "Site", "Body"]
        );
    }

    #[tokio::test]
    async fn discovery_caps_field_count() {
        let mut t = table("tblAAAAAAAAAA01", "Wide");
        t.fields = (0..20)
            .map(|i| field(&format!("Col{i}"), "singleLineText"))
            .collect();
        let base = FakeBase::with_tables(vec![t]);

        let formula = build(&base, "tblAAAAAAAAAA01", "alpha", &[])
            .await
            .expect("builds");
        assert_eq!(formula.fields.len(), MAX_FORMULA_FIELDS);
        assert_eq!(formula.fields[0], "Col0");
        assert_eq!(formula.fields[11], "Col11");
    }

    #[tokio::test]
    async fn unknown_table_yields_empty_formula() {
        let base = FakeBase::with_tables(vec![table("tblAAAAAAAAAA01", "Tasks")]);
        let formula = build(&base, "tblZZZZZZZZZZ99", "alpha", &[])
            .await
            .expect("builds");
        assert!(formula.is_empty());
    }
}

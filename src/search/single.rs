//! One bounded search against one table.

use tracing::warn;

use crate::client::{ListOptions, TableService};
use crate::directory::TableDirectory;
use crate::error::Result;
use crate::model::SearchHit;
use crate::search::formula;

pub const DEFAULT_MAX_RECORDS: u32 = 100;

#[derive(Debug, Clone)]
pub struct SearchParams {
    /// Table name or identifier, as the caller wrote it.
    pub table: String,
    pub query: String,
    pub max_records: u32,
    pub page_size: Option<u32>,
    /// Continuation token from a previous page.
    pub offset: Option<String>,
    /// Explicit fields to match; empty means auto-discover from schema.
    pub fields: Vec<String>,
}

impl SearchParams {
    pub fn new(table: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            query: query.into(),
            max_records: DEFAULT_MAX_RECORDS,
            page_size: None,
            offset: None,
            fields: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SearchPage {
    pub hits: Vec<SearchHit>,
    /// Verbatim continuation token; absent when the result set is exhausted.
    pub next_offset: Option<String>,
}

pub async fn search_table<S: TableService>(
    service: &S,
    directory: &TableDirectory,
    params: &SearchParams,
) -> Result<SearchPage> {
    let table_id = directory.resolve(service, &params.table).await?;

    // A failed formula build degrades to an unfiltered listing; a wide match
    // serves the caller better than aborting the search.
    let filter = match formula::build(service, &table_id, &params.query, &params.fields).await {
        Ok(f) if !f.is_empty() => Some(f.expression),
        Ok(_) => None,
        Err(err) => {
            warn!(table = %params.table, error = %err, "formula build failed, searching unfiltered");
            None
        }
    };

    let options = ListOptions {
        filter_by_formula: filter,
        max_records: Some(params.max_records),
        page_size: params.page_size,
        offset: params.offset.clone(),
    };
    let page = service.list_records(&table_id, &options).await?;

    let hits = page
        .records
        .into_iter()
        .map(|record| SearchHit {
            record_id: record.id,
            table: params.table.clone(),
            fields: record.fields,
            created_time: record.created_time,
        })
        .collect();
    Ok(SearchPage {
        hits,
        next_offset: page.offset,
    })
}

//! Forwarding shims for the schema metadata surface.

use reqwest::Method;
use serde_json::{Map, Value, json};

use crate::client::AirtableClient;
use crate::error::Result;
use crate::model::{BaseInfo, BaseList, BaseSchema, FieldSchema, TableSchema};

impl AirtableClient {
    /// Bases visible to the configured credential.
    pub async fn list_bases(&self) -> Result<Vec<BaseInfo>> {
        let list: BaseList = self.request(Method::GET, "/v0/meta/bases", None).await?;
        Ok(list.bases)
    }

    /// Schema metadata for every table in the base.
    pub async fn base_schema(&self) -> Result<BaseSchema> {
        self.request(Method::GET, &self.meta_tables_path(), None)
            .await
    }

    pub async fn create_table(
        &self,
        name: &str,
        description: Option<&str>,
        fields: &[Value],
    ) -> Result<TableSchema> {
        let mut body = json!({"name": name, "fields": fields});
        if let Some(description) = description {
            body["description"] = json!(description);
        }
        self.request(Method::POST, &self.meta_tables_path(), Some(&body))
            .await
    }

    pub async fn update_table(
        &self,
        table_id: &str,
        name: Option<&str>,
        description: Option<&str>,
    ) -> Result<TableSchema> {
        let path = format!("{}/{}", self.meta_tables_path(), table_id);
        let body = patch_body(name, description);
        self.request(Method::PATCH, &path, Some(&body)).await
    }

    /// Create a field from a raw field definition, forwarded as-is.
    pub async fn create_field(&self, table_id: &str, field: &Value) -> Result<FieldSchema> {
        let path = format!("{}/{}/fields", self.meta_tables_path(), table_id);
        self.request(Method::POST, &path, Some(field)).await
    }

    pub async fn update_field(
        &self,
        table_id: &str,
        field_id: &str,
        name: Option<&str>,
        description: Option<&str>,
    ) -> Result<FieldSchema> {
        let path = format!("{}/{}/fields/{}", self.meta_tables_path(), table_id, field_id);
        let body = patch_body(name, description);
        self.request(Method::PATCH, &path, Some(&body)).await
    }
}

fn patch_body(name: Option<&str>, description: Option<&str>) -> Value {
    let mut body = Map::new();
    if let Some(name) = name {
        body.insert("name".to_string(), json!(name));
    }
    if let Some(description) = description {
        body.insert("description".to_string(), json!(description));
    }
    Value::Object(body)
}

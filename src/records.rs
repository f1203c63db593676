//! Forwarding shims for the record surface. Each is a thin typed wrapper
//! over [`AirtableClient::call`]; the service's own validation and limits
//! apply unchanged.

use reqwest::Method;
use serde::Deserialize;
use serde_json::{Map, Value, json};

use crate::client::{AirtableClient, ListOptions};
use crate::error::Result;
use crate::model::{Record, RecordPage};

#[derive(Debug, Deserialize)]
struct DeletedRecords {
    records: Vec<DeletedRecord>,
}

#[derive(Debug, Deserialize)]
struct DeletedRecord {
    id: String,
}

impl AirtableClient {
    /// List records with optional filtering and pagination.
    pub async fn list_records(&self, table: &str, options: &ListOptions) -> Result<RecordPage> {
        let mut path = self.record_path(table);
        let query = options.query_string();
        if !query.is_empty() {
            path.push('?');
            path.push_str(&query);
        }
        self.request(Method::GET, &path, None).await
    }

    pub async fn get_record(&self, table: &str, record_id: &str) -> Result<Record> {
        let path = format!("{}/{}", self.record_path(table), record_id);
        self.request(Method::GET, &path, None).await
    }

    /// Create records in one call. The service enforces its own per-call cap
    /// (ten records); oversized batches come back as its error.
    pub async fn create_records(
        &self,
        table: &str,
        records: Vec<Map<String, Value>>,
    ) -> Result<Vec<Record>> {
        let body = json!({
            "records": records
                .into_iter()
                .map(|fields| json!({"fields": fields}))
                .collect::<Vec<_>>(),
        });
        let page: RecordPage = self
            .request(Method::POST, &self.record_path(table), Some(&body))
            .await?;
        Ok(page.records)
    }

    /// Partial update of existing records by id.
    pub async fn update_records(
        &self,
        table: &str,
        updates: Vec<(String, Map<String, Value>)>,
    ) -> Result<Vec<Record>> {
        let body = json!({
            "records": updates
                .into_iter()
                .map(|(id, fields)| json!({"id": id, "fields": fields}))
                .collect::<Vec<_>>(),
        });
        let page: RecordPage = self
            .request(Method::PATCH, &self.record_path(table), Some(&body))
            .await?;
        Ok(page.records)
    }

    /// Delete records by id, returning the ids the service confirmed.
    pub async fn delete_records(&self, table: &str, record_ids: &[String]) -> Result<Vec<String>> {
        let query: Vec<String> = record_ids
            .iter()
            .map(|id| format!("records[]={}", urlencoding::encode(id)))
            .collect();
        let path = format!("{}?{}", self.record_path(table), query.join("&"));
        let deleted: DeletedRecords = self.request(Method::DELETE, &path, None).await?;
        Ok(deleted.records.into_iter().map(|r| r.id).collect())
    }
}

//! Authenticated HTTP client for the remote service.
//!
//! `call` is the raw forwarding primitive: it fails only on transport
//! problems and hands back whatever status and JSON body the service
//! produced. The typed helpers and forwarding shims are built on it.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::{RecordPage, TableSchema};

const HTTP_TIMEOUT_SECS: u64 = 30;

/// Raw response from a forwarded call.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Value,
}

/// Knobs for a record listing call, mapped one-to-one onto query parameters.
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    pub filter_by_formula: Option<String>,
    pub max_records: Option<u32>,
    pub page_size: Option<u32>,
    pub offset: Option<String>,
}

impl ListOptions {
    pub(crate) fn query_string(&self) -> String {
        let mut pairs: Vec<String> = Vec::new();
        if let Some(formula) = &self.filter_by_formula {
            pairs.push(format!("filterByFormula={}", urlencoding::encode(formula)));
        }
        if let Some(n) = self.max_records {
            pairs.push(format!("maxRecords={n}"));
        }
        if let Some(n) = self.page_size {
            pairs.push(format!("pageSize={n}"));
        }
        if let Some(offset) = &self.offset {
            pairs.push(format!("offset={}", urlencoding::encode(offset)));
        }
        pairs.join("&")
    }
}

pub struct AirtableClient {
    http: Client,
    api_url: String,
    api_key: String,
    base_id: String,
}

impl AirtableClient {
    pub fn new(config: &Config) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            http,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            base_id: config.base_id.clone(),
        })
    }

    pub fn base_id(&self) -> &str {
        &self.base_id
    }

    /// Perform one authenticated call against the service.
    ///
    /// Transport failures error out; HTTP error statuses come back in the
    /// response for the caller to inspect.
    pub async fn call(&self, method: Method, path: &str, body: Option<&Value>) -> Result<ApiResponse> {
        let url = format!("{}{}", self.api_url, path);
        debug!(%method, path, "remote call");
        let mut request = self.http.request(method, &url).bearer_auth(&self.api_key);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;
        let status = response.status();
        let body = match response.json::<Value>().await {
            Ok(value) => value,
            Err(e) if e.is_decode() => {
                return Err(Error::Remote {
                    status: status.as_u16(),
                    body: Value::String(format!("malformed JSON response: {e}")),
                });
            }
            Err(e) => return Err(e.into()),
        };
        Ok(ApiResponse { status, body })
    }

    /// Typed call: non-2xx statuses become `Error::Remote` with the raw body.
    pub(crate) async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<T> {
        let ApiResponse { status, body } = self.call(method, path, body).await?;
        if !status.is_success() {
            return Err(Error::Remote {
                status: status.as_u16(),
                body,
            });
        }
        serde_json::from_value(body).map_err(|e| Error::Remote {
            status: status.as_u16(),
            body: Value::String(format!("unexpected response shape: {e}")),
        })
    }

    /// Path for record operations against a table, by name or id.
    pub(crate) fn record_path(&self, table: &str) -> String {
        format!("/v0/{}/{}", self.base_id, urlencoding::encode(table))
    }

    /// Path for the base's schema metadata listing.
    pub(crate) fn meta_tables_path(&self) -> String {
        format!("/v0/meta/bases/{}/tables", self.base_id)
    }
}

/// The slice of the remote surface the directory and search layers consume.
#[async_trait]
pub trait TableService: Send + Sync {
    /// Current schema metadata for every table in the base.
    async fn list_tables(&self) -> Result<Vec<TableSchema>>;

    /// One bounded listing call against a table.
    async fn list_records(&self, table_id: &str, options: &ListOptions) -> Result<RecordPage>;
}

#[async_trait]
impl TableService for AirtableClient {
    async fn list_tables(&self) -> Result<Vec<TableSchema>> {
        Ok(self.base_schema().await?.tables)
    }

    async fn list_records(&self, table_id: &str, options: &ListOptions) -> Result<RecordPage> {
        AirtableClient::list_records(self, table_id, options).await
    }
}

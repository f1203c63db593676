//! Environment-driven configuration.

use std::collections::HashMap;

use crate::error::{Error, Result};

pub const DEFAULT_API_URL: &str = "https://api.airtable.com";

#[derive(Debug, Clone)]
pub struct Config {
    /// Bearer credential sent with every request.
    pub api_key: String,
    /// Base to operate on.
    pub base_id: String,
    /// Service endpoint; overridable for proxies and tests.
    pub api_url: String,
    /// Fallback table when a command omits one.
    pub default_table: Option<String>,
    /// Static name -> table id seed for the directory.
    pub table_allowlist: HashMap<String, String>,
}

impl Config {
    /// Load config from environment variables.
    pub fn from_env() -> Result<Self> {
        let api_key = dotenvy::var("AIRTABLE_API_KEY")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or(Error::ConfigMissing("AIRTABLE_API_KEY"))?;
        let base_id = dotenvy::var("AIRTABLE_BASE_ID")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or(Error::ConfigMissing("AIRTABLE_BASE_ID"))?;

        let api_url =
            dotenvy::var("AIRTABLE_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let default_table = dotenvy::var("AIRTABLE_DEFAULT_TABLE").ok();

        let table_allowlist = match dotenvy::var("AIRTABLE_TABLE_MAP") {
            Ok(raw) => serde_json::from_str(&raw).map_err(|e| {
                Error::ConfigInvalid(format!(
                    "AIRTABLE_TABLE_MAP must be a JSON object of table name -> table id: {e}"
                ))
            })?,
            Err(_) => HashMap::new(),
        };

        Ok(Self {
            api_key,
            base_id,
            api_url,
            default_table,
            table_allowlist,
        })
    }
}

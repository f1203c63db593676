//! Federated search across every table in a base.
//!
//! Tables are visited in remote-reported order, three at a time. Batches run
//! strictly sequentially with a pause between them to stay under the service
//! rate limit; within a batch all searches run concurrently. A failing table
//! contributes no hits and never aborts the aggregate.

use std::time::Duration;

use futures::future;
use tracing::{info, warn};

use crate::client::TableService;
use crate::directory::TableDirectory;
use crate::error::Result;
use crate::model::SearchHit;
use crate::search::single::{SearchParams, search_table};

/// Tables searched concurrently per batch.
pub const SEARCH_BATCH_SIZE: usize = 3;

/// Pause after every batch except the last.
pub const BATCH_DELAY: Duration = Duration::from_millis(300);

#[derive(Debug, Clone)]
pub struct FederatedParams {
    pub query: String,
    pub max_records_per_table: u32,
    pub page_size: Option<u32>,
    /// Explicit fields to match; empty means per-table auto-discovery.
    pub fields: Vec<String>,
}

impl FederatedParams {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            max_records_per_table: crate::search::single::DEFAULT_MAX_RECORDS,
            page_size: None,
            fields: Vec::new(),
        }
    }
}

/// Search every table in the base, merging hits in table-visitation order.
/// No pagination: per-table caps already bound the union.
pub async fn search_all_tables<S: TableService>(
    service: &S,
    directory: &TableDirectory,
    params: &FederatedParams,
) -> Result<Vec<SearchHit>> {
    let tables = service.list_tables().await?;
    let references: Vec<String> = tables
        .into_iter()
        .map(|t| if t.name.is_empty() { t.id } else { t.name })
        .collect();
    info!(tables = references.len(), "federated search start");

    let mut hits = Vec::new();
    for (batch_no, batch) in references.chunks(SEARCH_BATCH_SIZE).enumerate() {
        if batch_no > 0 {
            tokio::time::sleep(BATCH_DELAY).await;
        }
        let searches = batch
            .iter()
            .map(|table| contained_search(service, directory, table, params));
        for batch_hits in future::join_all(searches).await {
            hits.extend(batch_hits);
        }
    }
    info!(hits = hits.len(), "federated search done");
    Ok(hits)
}

/// Error boundary for one table: any failure becomes an empty hit list so a
/// single misbehaving table cannot abort the whole search.
async fn contained_search<S: TableService>(
    service: &S,
    directory: &TableDirectory,
    table: &str,
    params: &FederatedParams,
) -> Vec<SearchHit> {
    let single = SearchParams {
        table: table.to_string(),
        query: params.query.clone(),
        max_records: params.max_records_per_table,
        page_size: params.page_size,
        offset: None,
        fields: params.fields.clone(),
    };
    match search_table(service, directory, &single).await {
        Ok(page) => page.hits,
        Err(err) => {
            warn!(table, error = %err, "table search failed, contributing no hits");
            Vec::new()
        }
    }
}

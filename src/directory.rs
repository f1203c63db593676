//! Cached resolution of table names to stable table identifiers.
//!
//! The directory holds a process-wide snapshot of the base's name -> id
//! mapping. Snapshots are replaced wholesale on refresh and never mutated
//! in place, so concurrent refreshes race benignly: the last full snapshot
//! written wins.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use regex::Regex;
use tokio::time::Instant;
use tracing::debug;

use crate::client::TableService;
use crate::error::{Error, Result};

/// How long a snapshot is trusted before a lookup forces a refresh.
pub const DIRECTORY_TTL: Duration = Duration::from_secs(5 * 60);

static TABLE_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^tbl[A-Za-z0-9]{10,}$").expect("table id pattern compiles"));

/// True for inputs already shaped like a service-assigned table identifier.
pub fn is_table_id(value: &str) -> bool {
    TABLE_ID_RE.is_match(value)
}

#[derive(Debug)]
struct Snapshot {
    captured_at: Instant,
    by_name: HashMap<String, String>,
}

impl Snapshot {
    fn is_stale(&self) -> bool {
        self.captured_at.elapsed() > DIRECTORY_TTL
    }
}

pub struct TableDirectory {
    /// Static name -> id seed; service-reported names override it on refresh.
    allowlist: HashMap<String, String>,
    snapshot: RwLock<Option<Arc<Snapshot>>>,
}

impl TableDirectory {
    pub fn new(allowlist: HashMap<String, String>) -> Self {
        Self {
            allowlist,
            snapshot: RwLock::new(None),
        }
    }

    /// Resolve a table reference to its stable identifier.
    ///
    /// Identifier-shaped inputs pass through untouched with no network or
    /// cache interaction. Named inputs are served from the snapshot, with a
    /// refresh first when the snapshot is missing or older than the TTL. A
    /// miss gets exactly one forced refresh (the table may have been created
    /// or renamed since the last snapshot) before the lookup is final.
    pub async fn resolve<S: TableService>(&self, service: &S, name_or_id: &str) -> Result<String> {
        if is_table_id(name_or_id) {
            return Ok(name_or_id.to_string());
        }

        if self.current().is_none_or(|s| s.is_stale()) {
            self.refresh(service).await?;
        }
        if let Some(id) = self.lookup(name_or_id) {
            return Ok(id);
        }

        debug!(table = name_or_id, "directory miss, forcing refresh");
        self.refresh(service).await?;
        self.lookup(name_or_id)
            .ok_or_else(|| Error::TableNotFound(name_or_id.to_string()))
    }

    fn current(&self) -> Option<Arc<Snapshot>> {
        self.snapshot.read().clone()
    }

    fn lookup(&self, name: &str) -> Option<String> {
        self.current().and_then(|s| s.by_name.get(name).cloned())
    }

    async fn refresh<S: TableService>(&self, service: &S) -> Result<()> {
        let mut by_name = self.allowlist.clone();
        for table in service.list_tables().await? {
            by_name.insert(table.name, table.id);
        }
        debug!(entries = by_name.len(), "directory refreshed");
        *self.snapshot.write() = Some(Arc::new(Snapshot {
            captured_at: Instant::now(),
            by_name,
        }));
        Ok(())
    }
}

//! In-memory stand-in for the remote table service, shared by unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::json;

use crate::client::{ListOptions, TableService};
use crate::error::{Error, Result};
use crate::model::{FieldSchema, Record, RecordPage, TableSchema};

pub(crate) fn table(id: &str, name: &str) -> TableSchema {
    TableSchema {
        id: id.into(),
        name: name.into(),
        description: None,
        primary_field_id: None,
        fields: Vec::new(),
    }
}

pub(crate) fn field(name: &str, field_type: &str) -> FieldSchema {
    FieldSchema {
        id: None,
        name: name.into(),
        field_type: field_type.into(),
        description: None,
    }
}

pub(crate) fn record(id: &str, key: &str, value: &str) -> Record {
    let mut fields = serde_json::Map::new();
    fields.insert(key.into(), json!(value));
    Record {
        id: id.into(),
        created_time: None,
        fields,
    }
}

#[derive(Default)]
pub(crate) struct FakeBase {
    /// Successive schema snapshots; the last one repeats once drained.
    schemas: Mutex<Vec<Vec<TableSchema>>>,
    schema_calls: AtomicUsize,
    schema_fails: Mutex<bool>,
    records: Mutex<HashMap<String, Vec<Record>>>,
    failing: Mutex<HashSet<String>>,
    next_offset: Mutex<Option<String>>,
    /// Every listing call, with the options it carried.
    pub(crate) listings: Mutex<Vec<(String, ListOptions)>>,
}

impl FakeBase {
    pub(crate) fn with_tables(tables: Vec<TableSchema>) -> Self {
        Self::with_schema_sequence(vec![tables])
    }

    pub(crate) fn with_schema_sequence(sets: Vec<Vec<TableSchema>>) -> Self {
        Self {
            schemas: Mutex::new(sets),
            ..Default::default()
        }
    }

    pub(crate) fn put_records(&self, table_id: &str, records: Vec<Record>) {
        self.records.lock().insert(table_id.to_string(), records);
    }

    pub(crate) fn fail_table(&self, table_id: &str) {
        self.failing.lock().insert(table_id.to_string());
    }

    pub(crate) fn fail_schema(&self) {
        *self.schema_fails.lock() = true;
    }

    pub(crate) fn set_next_offset(&self, offset: &str) {
        *self.next_offset.lock() = Some(offset.to_string());
    }

    pub(crate) fn schema_calls(&self) -> usize {
        self.schema_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TableService for FakeBase {
    async fn list_tables(&self) -> Result<Vec<TableSchema>> {
        self.schema_calls.fetch_add(1, Ordering::SeqCst);
        if *self.schema_fails.lock() {
            return Err(Error::Remote {
                status: 500,
                body: json!({"error": "schema unavailable"}),
            });
        }
        let mut sets = self.schemas.lock();
        match sets.len() {
            0 => Ok(Vec::new()),
            1 => Ok(sets[0].clone()),
            _ => Ok(sets.remove(0)),
        }
    }

    async fn list_records(&self, table_id: &str, options: &ListOptions) -> Result<RecordPage> {
        self.listings
            .lock()
            .push((table_id.to_string(), options.clone()));
        if self.failing.lock().contains(table_id) {
            return Err(Error::Remote {
                status: 500,
                body: json!({"error": "table unavailable"}),
            });
        }
        let records = self
            .records
            .lock()
            .get(table_id)
            .cloned()
            .unwrap_or_default();
        let max = options.max_records.unwrap_or(u32::MAX) as usize;
        Ok(RecordPage {
            records: records.into_iter().take(max).collect(),
            offset: self.next_offset.lock().clone(),
        })
    }
}

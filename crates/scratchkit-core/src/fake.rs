//! In-memory `OrgConnection` for unit tests.

use crate::connection::{MetadataItem, MetadataRecord, OrgConnection, QueryRecord};
use crate::error::{Result, ScratchError};
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Default)]
pub struct FakeOrg {
    queries: Vec<(String, Vec<QueryRecord>)>,
    listing: HashMap<String, Vec<MetadataItem>>,
    records: HashMap<(String, String), MetadataRecord>,
    failing_reads: HashSet<String>,
    reject_updates: Option<String>,
    pub reads: AtomicUsize,
    pub updates: Mutex<Vec<MetadataRecord>>,
}

fn object(value: Value) -> QueryRecord {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

impl FakeOrg {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_organization(self, name: &str, organization_type: &str) -> Self {
        self.with_query_records(
            "Organization",
            vec![json!({
                "attributes": {"type": "Organization"},
                "Id": "00D000000000001",
                "Name": name,
                "Country": "FR",
                "LanguageLocaleKey": "en_US",
                "OrganizationType": organization_type
            })],
        )
    }

    /// Answer any query selecting `from <sobject>` with `records`.
    pub fn with_query_records(mut self, sobject: &str, records: Vec<Value>) -> Self {
        self.queries
            .push((sobject.to_string(), records.into_iter().map(object).collect()));
        self
    }

    /// Register a settings component; it is listed and readable.
    pub fn with_setting(mut self, name: &str, fields: Value) -> Self {
        let type_name = format!("{name}Settings");
        self.listing
            .entry("Settings".to_string())
            .or_default()
            .push(MetadataItem::new(name, "Settings"));
        self.records.insert(
            (type_name.clone(), name.to_string()),
            MetadataRecord::new(type_name, object(fields)),
        );
        self
    }

    /// List a settings component without making it readable.
    pub fn with_listed_setting(mut self, name: &str) -> Self {
        self.listing
            .entry("Settings".to_string())
            .or_default()
            .push(MetadataItem::new(name, "Settings"));
        self
    }

    pub fn with_record(mut self, type_name: &str, full_name: &str, fields: Value) -> Self {
        self.records.insert(
            (type_name.to_string(), full_name.to_string()),
            MetadataRecord::new(type_name, object(fields)),
        );
        self
    }

    pub fn failing_read(mut self, type_name: &str) -> Self {
        self.failing_reads.insert(type_name.to_string());
        self
    }

    pub fn rejecting_updates(mut self, message: &str) -> Self {
        self.reject_updates = Some(message.to_string());
        self
    }

    pub fn updated(&self) -> Vec<MetadataRecord> {
        self.updates.lock().unwrap().clone()
    }
}

impl OrgConnection for FakeOrg {
    async fn query(&self, soql: &str) -> Result<Vec<QueryRecord>> {
        Ok(self
            .queries
            .iter()
            .find(|(sobject, _)| soql.contains(&format!("from {sobject}")))
            .map(|(_, records)| records.clone())
            .unwrap_or_default())
    }

    async fn list_metadata(&self, metadata_type: &str) -> Result<Vec<MetadataItem>> {
        Ok(self.listing.get(metadata_type).cloned().unwrap_or_default())
    }

    async fn read_metadata(
        &self,
        metadata_type: &str,
        full_name: &str,
    ) -> Result<Option<MetadataRecord>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.failing_reads.contains(metadata_type) {
            return Err(ScratchError::remote(
                "readMetadata",
                format!("INVALID_TYPE: {metadata_type}"),
            ));
        }
        Ok(self
            .records
            .get(&(metadata_type.to_string(), full_name.to_string()))
            .cloned())
    }

    async fn update_metadata(&self, record: &MetadataRecord) -> Result<()> {
        if let Some(message) = &self.reject_updates {
            return Err(ScratchError::remote("updateMetadata", message));
        }
        self.updates.lock().unwrap().push(record.clone());
        Ok(())
    }
}

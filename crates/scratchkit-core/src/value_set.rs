//! Read-modify-write of a standard picklist value set.

use crate::connection::{MetadataRecord, OrgConnection};
use crate::error::{Result, ScratchError};
use crate::types::StatusCategory;
use serde_json::{json, Value};
use tracing::info;

pub const STANDARD_VALUE_SET_TYPE: &str = "StandardValueSet";
pub const CONTRACT_STATUS: &str = "ContractStatus";

const VALUES_FIELD: &str = "standardValue";

/// A value to append to a standard value set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewValue {
    pub label: String,
    pub api_name: String,
    pub status_category: StatusCategory,
}

impl NewValue {
    pub fn new(
        label: impl Into<String>,
        api_name: impl Into<String>,
        status_category: StatusCategory,
    ) -> Self {
        Self {
            label: label.into(),
            api_name: api_name.into(),
            status_category,
        }
    }

    fn to_metadata(&self) -> Value {
        json!({
            "fullName": self.api_name,
            "default": "false",
            "label": self.label,
            "statusCategory": self.status_category.as_str(),
        })
    }
}

pub struct ValueSetAppender<'a, C> {
    conn: &'a C,
    value_set: String,
}

impl<'a, C: OrgConnection> ValueSetAppender<'a, C> {
    pub fn new(conn: &'a C, value_set: impl Into<String>) -> Self {
        Self {
            conn,
            value_set: value_set.into(),
        }
    }

    pub fn contract_status(conn: &'a C) -> Self {
        Self::new(conn, CONTRACT_STATUS)
    }

    pub fn value_set(&self) -> &str {
        &self.value_set
    }

    /// Append `value` and submit the whole set back.
    ///
    /// Existing values are sent back untouched. A duplicate API name is not
    /// checked here; the org rejects it on update. Returns the submitted set.
    pub async fn add_value(&self, value: &NewValue) -> Result<MetadataRecord> {
        let mut record = self
            .conn
            .read_metadata(STANDARD_VALUE_SET_TYPE, &self.value_set)
            .await?
            .filter(|r| !r.is_empty())
            .ok_or_else(|| ScratchError::ValueSetNotFound(self.value_set.clone()))?;

        let slot = record
            .fields
            .entry(VALUES_FIELD)
            .or_insert_with(|| Value::Array(Vec::new()));
        // A set holding a single value is not wrapped in a list.
        let mut values = match slot.take() {
            Value::Array(items) => items,
            single @ Value::Object(_) => vec![single],
            _ => Vec::new(),
        };
        let existing = values.len();
        values.push(value.to_metadata());
        *slot = Value::Array(values);

        info!(
            value_set = %self.value_set,
            api_name = %value.api_name,
            existing,
            "submitting value set update"
        );
        self.conn.update_metadata(&record).await?;
        Ok(record)
    }
}

//! The seam between the command logic and the remote org.
//!
//! `scratchkit-client` provides the HTTP implementation; tests use an
//! in-memory one.

use crate::error::Result;
use serde_json::{Map, Value};
use std::future::Future;

/// One row of a SOQL result, keyed by field API name.
pub type QueryRecord = Map<String, Value>;

/// A `(fullName, type)` pair returned by a metadata listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataItem {
    pub full_name: String,
    pub type_name: String,
}

impl MetadataItem {
    pub fn new(full_name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            type_name: type_name.into(),
        }
    }

    /// Settings are listed as (`Account`, `Settings`) but read back as the
    /// `AccountSettings` type.
    pub fn qualified_type(&self) -> String {
        format!("{}{}", self.full_name, self.type_name)
    }
}

/// A metadata component as a typed name plus its fields.
///
/// Leaf values come back from the metadata API as strings; repeated elements
/// become arrays and nested elements become objects.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MetadataRecord {
    pub type_name: String,
    pub fields: Map<String, Value>,
}

impl MetadataRecord {
    pub fn new(type_name: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            type_name: type_name.into(),
            fields,
        }
    }

    /// A record with no fields is what the API returns for a name that
    /// does not exist.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Authenticated access to one org.
///
/// Every call is a single request/response; retry and backoff are not this
/// layer's concern.
pub trait OrgConnection {
    /// Run a SOQL query and return every record, following pagination.
    fn query(&self, soql: &str) -> impl Future<Output = Result<Vec<QueryRecord>>> + Send;

    /// List the components of `metadata_type` (e.g. `Settings`).
    fn list_metadata(
        &self,
        metadata_type: &str,
    ) -> impl Future<Output = Result<Vec<MetadataItem>>> + Send;

    /// Read one component. `Ok(None)` when the org has no such component.
    fn read_metadata(
        &self,
        metadata_type: &str,
        full_name: &str,
    ) -> impl Future<Output = Result<Option<MetadataRecord>>> + Send;

    /// Replace an existing component with `record`.
    fn update_metadata(&self, record: &MetadataRecord) -> impl Future<Output = Result<()>> + Send;
}

use crate::connection::OrgConnection;
use crate::error::{Result, ScratchError};
use serde::Deserialize;
use serde_json::Value;

pub const ORGANIZATION_QUERY: &str =
    "Select Id, Name, Country, LanguageLocaleKey, OrganizationType from Organization";

/// Snapshot of the target org's `Organization` record.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OrganizationProfile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(rename = "LanguageLocaleKey")]
    pub locale: String,
    #[serde(rename = "OrganizationType")]
    pub edition_label: String,
}

impl OrganizationProfile {
    pub async fn fetch<C: OrgConnection>(conn: &C) -> Result<Self> {
        let record = conn
            .query(ORGANIZATION_QUERY)
            .await?
            .into_iter()
            .next()
            .ok_or(ScratchError::OrganizationNotFound)?;
        serde_json::from_value(Value::Object(record)).map_err(|e| ScratchError::MalformedRecord {
            type_name: "Organization".to_string(),
            reason: e.to_string(),
        })
    }
}

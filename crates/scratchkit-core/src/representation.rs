use crate::case::title_case;
use crate::connection::{OrgConnection, QueryRecord};
use crate::error::{Result, ScratchError};
use serde::Deserialize;
use serde_json::{Map, Value};

pub const ACTIVE_SHAPE_QUERY: &str =
    "Select Edition, Features, Settings from ShapeRepresentation where Status = 'Active'";

/// Settings namespace holding Dev Hub and org management internals, which a
/// scratch org cannot accept.
pub const DEV_HUB_SETTINGS: &str = "devHubSettings";

const FEATURE_DELIMITER: char = ';';

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawShape {
    #[serde(default)]
    edition: Option<String>,
    #[serde(default)]
    features: Option<String>,
    #[serde(default)]
    settings: Option<String>,
}

/// The org's pre-computed shape, reshaped for a scratch definition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapeRepresentation {
    pub edition: Option<String>,
    pub features: Vec<String>,
    pub settings: Option<Map<String, Value>>,
}

impl ShapeRepresentation {
    /// Query the org's active shape. Fails with guidance when no shape exists.
    pub async fn fetch_active<C: OrgConnection>(conn: &C) -> Result<Self> {
        let record = conn
            .query(ACTIVE_SHAPE_QUERY)
            .await?
            .into_iter()
            .next()
            .ok_or(ScratchError::NoActiveShape)?;
        Self::from_record(record)
    }

    pub fn from_record(record: QueryRecord) -> Result<Self> {
        let raw: RawShape =
            serde_json::from_value(Value::Object(record)).map_err(|e| malformed(e.to_string()))?;

        let edition = raw
            .edition
            .filter(|e| !e.is_empty())
            .map(|e| title_case(&e));

        let features = raw
            .features
            .as_deref()
            .unwrap_or("")
            .split(FEATURE_DELIMITER)
            .filter(|f| !f.is_empty())
            .map(str::to_string)
            .collect();

        let settings = match raw.settings.as_deref() {
            None | Some("") => None,
            Some(blob) => {
                let parsed: Value =
                    serde_json::from_str(blob).map_err(ScratchError::InvalidShapeSettings)?;
                let Value::Object(mut settings) = parsed else {
                    return Err(malformed("Settings is not a JSON object".to_string()));
                };
                settings.shift_remove(DEV_HUB_SETTINGS);
                Some(settings)
            }
        };

        Ok(Self {
            edition,
            features,
            settings,
        })
    }
}

fn malformed(reason: String) -> ScratchError {
    ScratchError::MalformedRecord {
        type_name: "ShapeRepresentation".to_string(),
        reason,
    }
}

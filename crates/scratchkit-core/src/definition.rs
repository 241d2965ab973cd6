//! The scratch org definition file and its rendering.

use crate::error::{Result, ScratchError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

/// Contents of `project-scratch-def.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScratchDefinition {
    pub org_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edition: Option<String>,
    pub language: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,
    #[serde(default)]
    pub settings: Map<String, Value>,
}

/// How string-encoded booleans from the metadata API become JSON booleans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BooleanFixup {
    /// Coerce settings values that are exactly `"true"` or `"false"`.
    /// Keys and the top-level org fields are left alone.
    #[default]
    Typed,
    /// Replace every quoted `"true"`/`"false"` in the rendered text,
    /// whatever it belongs to. Byte-compatible with older definition files.
    Legacy,
}

/// Turn `"true"`/`"false"` string values into booleans, at any depth.
pub fn coerce_booleans(value: &mut Value) {
    match value {
        Value::String(s) if s == "true" => *value = Value::Bool(true),
        Value::String(s) if s == "false" => *value = Value::Bool(false),
        Value::Object(map) => map.values_mut().for_each(coerce_booleans),
        Value::Array(items) => items.iter_mut().for_each(coerce_booleans),
        _ => {}
    }
}

/// Unquote every `"true"` and `"false"` in `json` text.
pub fn unquote_booleans(json: &str) -> String {
    json.replace("\"true\"", "true").replace("\"false\"", "false")
}

impl ScratchDefinition {
    /// Pretty-printed JSON with two-space indentation.
    pub fn render(&self, fixup: BooleanFixup) -> Result<String> {
        match fixup {
            BooleanFixup::Typed => {
                let mut coerced = self.clone();
                coerced.settings.values_mut().for_each(coerce_booleans);
                Ok(serde_json::to_string_pretty(&coerced)?)
            }
            BooleanFixup::Legacy => Ok(unquote_booleans(&serde_json::to_string_pretty(self)?)),
        }
    }

    /// Render and atomically write to `path`.
    pub fn write(&self, path: &Path, fixup: BooleanFixup) -> Result<()> {
        let rendered = self.render(fixup)?;
        crate::io::atomic_write(path, rendered.as_bytes()).map_err(|source| {
            ScratchError::WriteFailed {
                path: path.to_path_buf(),
                source,
            }
        })
    }
}

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScratchError {
    #[error("{operation} failed: {message}")]
    Remote { operation: String, message: String },

    #[error("no Organization record returned for the target org")]
    OrganizationNotFound,

    #[error(
        "unable to query ShapeRepresentation: make sure to target an org with Org Shape \
         enabled and a shape created"
    )]
    NoActiveShape,

    #[error("ShapeRepresentation settings are not valid JSON: {0}")]
    InvalidShapeSettings(#[source] serde_json::Error),

    #[error("standard value set not found: {0}")]
    ValueSetNotFound(String),

    #[error("malformed {type_name} record: {reason}")]
    MalformedRecord { type_name: String, reason: String },

    #[error("unable to write definition file at {}: {source}", path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "no org credentials: pass --instance-url and --access-token, \
         or add an org to {}", config_path.display()
    )]
    MissingCredentials { config_path: PathBuf },

    #[error("org alias not found in config: {0}")]
    UnknownOrg(String),

    #[error("invalid api version '{0}': expected something like 60.0")]
    InvalidApiVersion(String),

    #[error("invalid scope '{0}': expected basic, full or shaperepresentation")]
    InvalidScope(String),

    #[error("invalid status category '{0}': expected Draft, Activated or InApprovalProcess")]
    InvalidStatusCategory(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("home directory not found: set HOME environment variable")]
    HomeNotFound,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl ScratchError {
    /// Wrap a transport failure for `operation` (e.g. `readMetadata`).
    pub fn remote(operation: impl Into<String>, message: impl ToString) -> Self {
        Self::Remote {
            operation: operation.into(),
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScratchError>;

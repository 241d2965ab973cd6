use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("SOAP fault {code}: {message}")]
    Fault { code: String, message: String },

    #[error("{full_name} rejected: {message}")]
    Rejected { full_name: String, message: String },

    #[error("invalid XML response: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unexpected response: {0}")]
    Unexpected(String),

    #[error("org exposes no API versions")]
    NoApiVersion,
}

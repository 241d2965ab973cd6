//! `scratchkit-client`: HTTP transport for one org.
//!
//! Implements [`scratchkit_core::OrgConnection`] on top of two APIs:
//!
//! ```text
//! OrgClient
//!   ├── REST   GET  /services/data/             API version discovery
//!   │          GET  /services/data/vNN.N/query  SOQL, follows nextRecordsUrl
//!   └── SOAP   POST /services/Soap/m/NN.N       listMetadata / readMetadata /
//!                                               updateMetadata
//! ```
//!
//! Metadata XML is mapped to JSON objects by [`soap`]: nested elements become
//! objects, repeated elements become arrays, leaves stay strings.

pub mod client;
pub mod error;
pub mod soap;

pub use client::OrgClient;
pub use error::ClientError;

/// Convenience `Result` alias for this crate.
pub type Result<T> = std::result::Result<T, ClientError>;

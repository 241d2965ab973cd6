pub mod case;
pub mod config;
pub mod connection;
pub mod definition;
pub mod denylist;
pub mod edition;
pub mod error;
pub mod extract;
pub mod io;
pub mod normalize;
pub mod org;
pub mod paths;
pub mod representation;
pub mod types;
pub mod value_set;

#[cfg(test)]
pub(crate) mod fake;

pub use connection::{MetadataItem, MetadataRecord, OrgConnection};
pub use error::{Result, ScratchError};

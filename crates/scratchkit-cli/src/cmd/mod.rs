pub mod config;
pub mod contractstatus;
pub mod org;

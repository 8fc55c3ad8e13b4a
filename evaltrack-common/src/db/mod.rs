//! Database models and queries

pub mod candidates;
pub mod init;
pub mod models;
pub mod scores;

pub use init::*;
pub use models::*;

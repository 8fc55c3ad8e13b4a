//! # evaltrack common library
//!
//! Shared code for the evaluation tracking service:
//! - Error taxonomy
//! - Bootstrap configuration loading
//! - SQLite schema, models and queries
//! - Score aggregation (interview and final averages)

pub mod config;
pub mod db;
pub mod error;
pub mod scoring;

pub use error::{Error, Result};

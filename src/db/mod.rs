//! Database module for the SQLite-backed catalog.
//!
//! This module provides:
//! - Session bootstrap, pragmas and schema application
//! - `CatalogStore`, the typed access layer over the six catalog tables

pub mod migrations;
pub mod store;

pub use migrations::init_db;
pub use store::{CatalogStore, TableCounts};

// src/lib.rs

//! Orchestration core for the Vanguard security scanners.
//!
//! A [`SecurityScanner`] takes a target and a set of category toggles, dispatches each
//! requested scan to its category's probe through the remote scanning service, and
//! returns one [`FullScanReport`]. A failing probe is recorded as an error entry in the
//! report; it never aborts its siblings.

pub mod config;
pub mod core;
pub mod logging;

pub use crate::config::ScannerConfig;
pub use crate::core::context::ScanContext;
pub use crate::core::models::{
    Category, CategoryReport, FullScanReport, ScanId, ScanResult, ScanStatus, ScanSummary, ScanToggles,
};
pub use crate::core::orchestrator::SecurityScanner;
pub use crate::core::scanner::CategoryScanner;

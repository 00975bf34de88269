// src/core/mod.rs

/// Data structures shared by every layer: `ScanResult`, `CategoryReport`,
/// `FullScanReport` and the category toggles.
pub mod models;

/// Probe-level failure causes.
pub mod errors;

/// Cancellation and per-probe deadlines for one batch.
pub mod context;

/// The wire boundary to the remote scanning service and the shared
/// invoke-and-normalize helper every category uses.
pub mod probe_client;

/// Category catalogs and the scanner that runs a selection of them.
pub mod scanner;

/// Assembles per-scan outcomes into a category envelope.
pub mod report;

/// The full-scan entry point.
pub mod orchestrator;

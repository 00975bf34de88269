// src/core/orchestrator.rs

use color_eyre::eyre::{Result, WrapErr, eyre};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::{error, info};

use crate::config::ScannerConfig;
use crate::core::context::ScanContext;
use crate::core::models::{Category, FullScanReport, ScanToggles};
use crate::core::probe_client::{HttpTransport, Transport};
use crate::core::scanner::{self, CategoryScanner};

/// Top-level entry point: runs the enabled categories and merges their reports.
///
/// Individual probe failures are data inside the report. The only error this type
/// returns is a fault of the orchestration itself, and it keeps the underlying cause
/// in its chain.
#[derive(Debug, Clone)]
pub struct SecurityScanner {
    scanners: BTreeMap<Category, CategoryScanner>,
    default_scans: BTreeMap<Category, Vec<String>>,
    probe_timeout: Option<Duration>,
}

impl SecurityScanner {
    /// Builds scanners for every category over an HTTP transport to the service
    /// named in `config`. The config is validated first, so a base URL with a path
    /// prefix keeps it.
    pub fn new(config: &ScannerConfig) -> Result<Self> {
        let mut config = config.clone();
        config.validate().wrap_err("invalid scanner configuration")?;
        let transport = HttpTransport::new(config.base_url.clone(), &config.user_agent, config.connect_timeout())
            .wrap_err("failed to set up the scanning service client")?;
        info!(base_url = %transport.base_url(), "Scanning service client ready.");
        Ok(Self::with_transport(Arc::new(transport), &config))
    }

    pub fn with_transport(transport: Arc<dyn Transport>, config: &ScannerConfig) -> Self {
        Self::empty(config.probe_timeout())
            .with_scanner(CategoryScanner::network(transport.clone(), config))
            .with_scanner(CategoryScanner::vulnerability(transport.clone(), config))
            .with_scanner(CategoryScanner::recon(transport, config))
    }

    /// An orchestrator with no category scanners; add them with [`Self::with_scanner`].
    pub fn empty(probe_timeout: Option<Duration>) -> Self {
        let default_scans = [Category::Network, Category::Vulnerability, Category::Recon]
            .into_iter()
            .map(|c| (c, scanner::default_scans(c).iter().map(|id| id.to_string()).collect()))
            .collect();
        Self { scanners: BTreeMap::new(), default_scans, probe_timeout }
    }

    pub fn with_scanner(mut self, scanner: CategoryScanner) -> Self {
        self.scanners.insert(scanner.category(), scanner);
        self
    }

    /// Replaces the identifiers a full scan runs for `category`.
    pub fn with_default_scans<I, S>(mut self, category: Category, scan_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.default_scans.insert(category, scan_ids.into_iter().map(Into::into).collect());
        self
    }

    pub fn scanner(&self, category: Category) -> Option<&CategoryScanner> {
        self.scanners.get(&category)
    }

    pub fn default_scans(&self, category: Category) -> &[String] {
        self.default_scans.get(&category).map(Vec::as_slice).unwrap_or_default()
    }

    /// Runs the default scans of every enabled category against a target.
    ///
    /// Categories run concurrently under one fresh [`ScanContext`] carrying the
    /// configured probe timeout.
    ///
    /// # Arguments
    ///
    /// * `target` - The host, domain or URL handed to every category.
    /// * `toggles` - Which categories to run. Disabled categories are absent from the report.
    ///
    /// # Returns
    ///
    /// A `Result` with a `FullScanReport` keyed by category. Probe failures are recorded
    /// inside the report; an `Err` means the orchestration itself failed, with the cause
    /// chained under "security scan failed".
    pub async fn perform_full_scan(&self, target: &str, toggles: ScanToggles) -> Result<FullScanReport> {
        let ctx = ScanContext::new(self.probe_timeout);
        self.perform_full_scan_with(target, toggles, &ctx).await
    }

    /// Runs every enabled category concurrently under `ctx`.
    pub async fn perform_full_scan_with(
        &self,
        target: &str,
        toggles: ScanToggles,
        ctx: &ScanContext,
    ) -> Result<FullScanReport> {
        info!(target, categories = ?toggles.enabled(), "Starting full scan.");
        match self.assemble(target, toggles, ctx).await {
            Ok(report) => {
                let summary = report.summary();
                info!(
                    target,
                    succeeded = summary.succeeded,
                    failed = summary.failed,
                    warnings = summary.warnings,
                    "Full scan finished."
                );
                Ok(report)
            }
            Err(e) => {
                error!(target, error = ?e, "Full scan failed.");
                Err(e).wrap_err("security scan failed")
            }
        }
    }

    async fn assemble(&self, target: &str, toggles: ScanToggles, ctx: &ScanContext) -> Result<FullScanReport> {
        let mut tasks = JoinSet::new();
        for category in toggles.enabled() {
            let scanner = self
                .scanners
                .get(&category)
                .cloned()
                .ok_or_else(|| eyre!("no scanner registered for the {category} category"))?;
            let scan_ids = self.default_scans(category).to_vec();
            let target = target.to_string();
            let ctx = ctx.clone();
            tasks.spawn(async move {
                let report = scanner.run_selected_scans_with(&target, &scan_ids, &ctx).await;
                (category, report)
            });
        }

        let mut report = FullScanReport::default();
        while let Some(joined) = tasks.join_next().await {
            let (category, category_report) = joined.wrap_err("category scan task did not complete")?;
            report.categories.insert(category, category_report);
        }
        Ok(report)
    }
}

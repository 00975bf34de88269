// src/core/scanner/mod.rs

//! Category scanners.
//!
//! Each category owns a [`Catalog`]: a registry from scan identifier to a [`Probe`].
//! Dispatch only ever looks identifiers up in the catalog, so adding a scan means
//! adding one entry to the category's probe table (or registering a custom probe).
pub mod network_scanner;
pub mod recon_scanner;
pub mod vulnerability_scanner;

use futures::FutureExt;
use futures::future::BoxFuture;
use futures::stream::{self, StreamExt};
use std::any::Any;
use std::collections::{BTreeMap, HashSet};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::ScannerConfig;
use crate::core::context::ScanContext;
use crate::core::errors::ProbeError;
use crate::core::models::{Category, CategoryReport, ScanId, ScanResult};
use crate::core::probe_client::{self, ProbeClient, ProbeSpec, Transport};
use crate::core::report::CategoryReportBuilder;

use self::network_scanner::{DEFAULT_NETWORK_SCANS, NETWORK_PROBES};
use self::recon_scanner::{DEFAULT_RECON_SCANS, RECON_PROBES};
use self::vulnerability_scanner::{DEFAULT_VULNERABILITY_SCANS, VULNERABILITY_PROBES};

/// The built-in probe table of a category.
pub fn probe_table(category: Category) -> &'static [ProbeSpec] {
    match category {
        Category::Network => NETWORK_PROBES,
        Category::Vulnerability => VULNERABILITY_PROBES,
        Category::Recon => RECON_PROBES,
    }
}

/// The identifiers a full scan runs for a category.
pub fn default_scans(category: Category) -> &'static [&'static str] {
    match category {
        Category::Network => DEFAULT_NETWORK_SCANS,
        Category::Vulnerability => DEFAULT_VULNERABILITY_SCANS,
        Category::Recon => DEFAULT_RECON_SCANS,
    }
}

// --- Probes ---

/// A single named check that can be run against a target.
#[async_trait::async_trait]
pub trait Probe: Send + Sync {
    /// The catalog key.
    fn id(&self) -> &str;

    /// The name used in result messages.
    fn name(&self) -> &str;

    /// Runs the check. Implementations report failure through the returned result.
    async fn invoke(&self, target: &str, ctx: &ScanContext) -> ScanResult;
}

/// A probe executed by the remote scanning service.
#[derive(Debug, Clone)]
pub struct RemoteProbe {
    spec: ProbeSpec,
    client: ProbeClient,
}

impl RemoteProbe {
    pub fn new(spec: ProbeSpec, client: ProbeClient) -> Self {
        Self { spec, client }
    }
}

#[async_trait::async_trait]
impl Probe for RemoteProbe {
    fn id(&self) -> &str {
        self.spec.id
    }

    fn name(&self) -> &str {
        self.spec.name
    }

    async fn invoke(&self, target: &str, ctx: &ScanContext) -> ScanResult {
        self.client.invoke(&self.spec, target, ctx).await
    }
}

// --- Catalog ---

/// The identifier-to-probe registry of one category.
#[derive(Clone)]
pub struct Catalog {
    category: Category,
    probes: BTreeMap<String, Arc<dyn Probe>>,
}

impl std::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog")
            .field("category", &self.category)
            .field("probes", &self.probes.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Catalog {
    pub fn empty(category: Category) -> Self {
        Self { category, probes: BTreeMap::new() }
    }

    /// A catalog with one remote probe per entry of the category's probe table.
    pub fn remote(client: ProbeClient) -> Self {
        let category = client.category();
        let mut catalog = Self::empty(category);
        for spec in probe_table(category) {
            catalog.register(Arc::new(RemoteProbe::new(*spec, client.clone())));
        }
        catalog
    }

    /// Adds `probe` under its id, returning the probe it replaced, if any.
    pub fn register(&mut self, probe: Arc<dyn Probe>) -> Option<Arc<dyn Probe>> {
        self.probes.insert(probe.id().to_string(), probe)
    }

    pub fn get(&self, id: &str) -> Option<Arc<dyn Probe>> {
        self.probes.get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.probes.contains_key(id)
    }

    pub fn category(&self) -> Category {
        self.category
    }

    /// `(id, name)` pairs in identifier order.
    pub fn entries(&self) -> Vec<(&str, &str)> {
        self.probes.iter().map(|(id, probe)| (id.as_str(), probe.name())).collect()
    }
}

// --- Category Scanner ---

/// Runs requested scans of one category and assembles a [`CategoryReport`].
#[derive(Debug, Clone)]
pub struct CategoryScanner {
    catalog: Arc<Catalog>,
    max_concurrency: usize,
    probe_timeout: Option<Duration>,
}

impl CategoryScanner {
    pub fn new(catalog: Catalog, max_concurrency: usize, probe_timeout: Option<Duration>) -> Self {
        Self { catalog: Arc::new(catalog), max_concurrency: max_concurrency.max(1), probe_timeout }
    }

    /// A scanner for `category` whose probes go through `transport`.
    pub fn remote(category: Category, transport: Arc<dyn Transport>, config: &ScannerConfig) -> Self {
        let client = ProbeClient::new(category, transport).with_google_dorks(config.google_dorks.clone());
        Self::new(Catalog::remote(client), config.max_concurrency, config.probe_timeout())
    }

    pub fn network(transport: Arc<dyn Transport>, config: &ScannerConfig) -> Self {
        Self::remote(Category::Network, transport, config)
    }

    pub fn vulnerability(transport: Arc<dyn Transport>, config: &ScannerConfig) -> Self {
        Self::remote(Category::Vulnerability, transport, config)
    }

    pub fn recon(transport: Arc<dyn Transport>, config: &ScannerConfig) -> Self {
        Self::remote(Category::Recon, transport, config)
    }

    pub fn category(&self) -> Category {
        self.catalog.category()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Runs the requested scans of this category against a target.
    ///
    /// Each identifier found in the catalog is dispatched to its probe; identifiers the
    /// catalog does not know are answered locally with an "Unknown scan type" error.
    /// A fresh [`ScanContext`] carrying the scanner's probe timeout bounds every call.
    ///
    /// # Arguments
    ///
    /// * `target` - The host, domain or URL to scan, passed to the probes unvalidated.
    /// * `scan_ids` - The identifiers to run. Duplicates collapse into one entry.
    ///
    /// # Returns
    ///
    /// A `CategoryReport` whose outer status is always `success`, with one entry per
    /// unique requested identifier.
    pub async fn run_selected_scans<I, S>(&self, target: &str, scan_ids: I) -> CategoryReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let ctx = ScanContext::new(self.probe_timeout);
        self.run_selected_scans_with(target, scan_ids, &ctx).await
    }

    /// Runs `scan_ids` against `target` under the caller's context.
    ///
    /// Every requested identifier gets exactly one entry in the report. Unknown
    /// identifiers are answered locally; known ones run concurrently, at most
    /// `max_concurrency` at a time.
    pub async fn run_selected_scans_with<I, S>(
        &self,
        target: &str,
        scan_ids: I,
        ctx: &ScanContext,
    ) -> CategoryReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let category = self.category();
        let mut builder = CategoryReportBuilder::new(category);
        let mut seen = HashSet::new();
        let mut known = Vec::new();

        for id in scan_ids {
            let id = id.as_ref();
            if !seen.insert(id.to_string()) {
                debug!(%category, scan = id, "Skipping duplicate scan id.");
                continue;
            }
            match self.catalog.get(id) {
                Some(probe) => known.push(probe),
                None => {
                    warn!(%category, scan = id, "Unknown scan type requested.");
                    builder.insert(id, ScanResult::unknown_scan(id));
                }
            }
        }

        info!(%category, target, scans = known.len(), "Running category scans.");

        let runs: Vec<BoxFuture<'_, (ScanId, ScanResult)>> = known
            .into_iter()
            .map(|probe| {
                async move {
                    let result = match AssertUnwindSafe(probe.invoke(target, ctx)).catch_unwind().await {
                        Ok(result) => result,
                        Err(panic) => {
                            let cause = ProbeError::Task(panic_message(panic.as_ref()));
                            probe_client::failure(probe.name(), target, &cause)
                        }
                    };
                    (probe.id().to_string(), result)
                }
                .boxed()
            })
            .collect();

        let mut settled = stream::iter(runs).buffer_unordered(self.max_concurrency);
        while let Some((id, result)) = settled.next().await {
            builder.insert(id, result);
        }

        let report = builder.build();
        let summary = report.summary();
        info!(
            %category,
            target,
            succeeded = summary.succeeded,
            failed = summary.failed,
            warnings = summary.warnings,
            "Category scans finished."
        );
        report
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "panicked".to_string()
    }
}

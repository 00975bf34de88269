// src/core/models.rs

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use strum::{Display, EnumIter, EnumString};

/// The opaque name of one scan inside a category catalog (e.g. "whois", "nmap-scan").
pub type ScanId = String;

// --- Outcome Envelope ---

/// The flat three-way outcome of a probe or aggregation step.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ScanStatus {
    Success,
    Error,
    Warning,
}

/// The universal outcome envelope returned by every probe.
///
/// `details` is owned by the probe that produced it; the orchestration layers carry
/// it along without looking inside.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScanResult {
    pub status: ScanStatus,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ScanResult {
    pub fn success(message: impl Into<String>, details: Value) -> Self {
        Self { status: ScanStatus::Success, message: message.into(), details: Some(details) }
    }

    pub fn warning(message: impl Into<String>, details: Value) -> Self {
        Self { status: ScanStatus::Warning, message: message.into(), details: Some(details) }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { status: ScanStatus::Error, message: message.into(), details: None }
    }

    /// The result recorded for an identifier that has no entry in the catalog.
    pub fn unknown_scan(id: &str) -> Self {
        Self::error(format!("Unknown scan type: {id}"))
    }

    pub fn is_error(&self) -> bool {
        self.status == ScanStatus::Error
    }
}

// --- Categories ---

/// A group of probes sharing one catalog and one remote path prefix.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Category {
    Network,
    Vulnerability,
    Recon,
}

impl Category {
    /// The `Display` name with its first letter capitalized ("Recon" for `recon`),
    /// used in the category envelope message.
    pub fn title(&self) -> String {
        let name = self.to_string();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => name,
        }
    }
}

/// Which categories a full scan should run. Missing toggles count as disabled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanToggles {
    #[serde(default)]
    pub network: bool,
    #[serde(default)]
    pub vulnerability: bool,
    #[serde(default)]
    pub recon: bool,
}

impl ScanToggles {
    pub fn all() -> Self {
        Self { network: true, vulnerability: true, recon: true }
    }

    pub fn is_enabled(&self, category: Category) -> bool {
        match category {
            Category::Network => self.network,
            Category::Vulnerability => self.vulnerability,
            Category::Recon => self.recon,
        }
    }

    /// The enabled categories in a stable order.
    pub fn enabled(&self) -> Vec<Category> {
        [Category::Network, Category::Vulnerability, Category::Recon]
            .into_iter()
            .filter(|c| self.is_enabled(*c))
            .collect()
    }
}

// --- Reports ---

/// Counts of per-scan outcomes, for callers that want a quick overview.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    pub succeeded: usize,
    pub failed: usize,
    pub warnings: usize,
}

impl ScanSummary {
    fn record(&mut self, status: ScanStatus) {
        match status {
            ScanStatus::Success => self.succeeded += 1,
            ScanStatus::Error => self.failed += 1,
            ScanStatus::Warning => self.warnings += 1,
        }
    }
}

/// The category-level envelope.
///
/// Serializes with the same shape as [`ScanResult`]. The outer `status` is always
/// `success`: running the category is an orchestration act that cannot fail, the
/// outcome of each probe lives in `details`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryReport {
    pub status: ScanStatus,
    pub message: String,
    pub details: HashMap<ScanId, ScanResult>,
}

impl CategoryReport {
    pub fn get(&self, id: &str) -> Option<&ScanResult> {
        self.details.get(id)
    }

    pub fn len(&self) -> usize {
        self.details.len()
    }

    pub fn is_empty(&self) -> bool {
        self.details.is_empty()
    }

    pub fn summary(&self) -> ScanSummary {
        let mut summary = ScanSummary::default();
        for result in self.details.values() {
            summary.record(result.status);
        }
        summary
    }
}

impl From<CategoryReport> for ScanResult {
    fn from(report: CategoryReport) -> Self {
        let details = report
            .details
            .into_iter()
            .map(|(id, result)| {
                let value = serde_json::to_value(result).unwrap_or(Value::Null);
                (id, value)
            })
            .collect::<serde_json::Map<String, Value>>();
        ScanResult { status: report.status, message: report.message, details: Some(Value::Object(details)) }
    }
}

/// The orchestrator's top-level mapping from category to its report.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct FullScanReport {
    pub categories: BTreeMap<Category, CategoryReport>,
}

impl FullScanReport {
    pub fn get(&self, category: Category) -> Option<&CategoryReport> {
        self.categories.get(&category)
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn summary(&self) -> ScanSummary {
        let mut summary = ScanSummary::default();
        for report in self.categories.values() {
            let partial = report.summary();
            summary.succeeded += partial.succeeded;
            summary.failed += partial.failed;
            summary.warnings += partial.warnings;
        }
        summary
    }
}

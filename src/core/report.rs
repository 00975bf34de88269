// src/core/report.rs

use std::collections::HashMap;
use tracing::debug;

use crate::core::models::{Category, CategoryReport, ScanId, ScanResult, ScanStatus};

/// Collects the per-scan outcomes of one category run.
#[derive(Debug)]
pub struct CategoryReportBuilder {
    category: Category,
    details: HashMap<ScanId, ScanResult>,
}

impl CategoryReportBuilder {
    pub fn new(category: Category) -> Self {
        Self { category, details: HashMap::new() }
    }

    /// Records `result` under `id`. A later entry for the same id replaces the earlier one.
    pub fn insert(&mut self, id: impl Into<ScanId>, result: ScanResult) -> Option<ScanResult> {
        let id = id.into();
        let previous = self.details.insert(id.clone(), result);
        if previous.is_some() {
            debug!(category = %self.category, scan = %id, "Replacing earlier result for duplicate scan id.");
        }
        previous
    }

    pub fn build(self) -> CategoryReport {
        CategoryReport {
            status: ScanStatus::Success,
            message: format!("{} scans completed", self.category.title()),
            details: self.details,
        }
    }
}

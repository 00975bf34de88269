use serde_json::{Value, json};
use std::sync::Arc;

use vanguard_orchestrator::core::errors::ProbeError;
use vanguard_orchestrator::core::probe_client::Transport;
use vanguard_orchestrator::{
    Category, CategoryScanner, ScanContext, ScanResult, ScanStatus, ScanToggles, ScannerConfig, SecurityScanner,
};

/// Answers every probe deterministically; `whois` always fails remotely.
struct Deterministic;

#[async_trait::async_trait]
impl Transport for Deterministic {
    async fn post(&self, path: &str, body: &Value) -> Result<Value, ProbeError> {
        if path == "recon/whois" {
            return Ok(json!({"status": "error", "message": "registry unreachable"}));
        }
        Ok(json!({"path": path, "request": body}))
    }
}

fn orchestrator() -> SecurityScanner {
    SecurityScanner::with_transport(Arc::new(Deterministic), &ScannerConfig::default())
}

#[tokio::test]
async fn empty_toggles_give_an_empty_report() {
    let report = orchestrator().perform_full_scan("example.com", ScanToggles::default()).await.unwrap();

    assert!(report.is_empty());
    assert_eq!(serde_json::to_value(&report).unwrap(), json!({}));
}

#[tokio::test]
async fn network_only_matches_a_standalone_network_run() {
    let orchestrator = orchestrator();
    let toggles = ScanToggles { network: true, ..Default::default() };

    let full = orchestrator.perform_full_scan("example.com", toggles).await.unwrap();
    let standalone = CategoryScanner::network(Arc::new(Deterministic), &ScannerConfig::default())
        .run_selected_scans("example.com", orchestrator.default_scans(Category::Network))
        .await;

    let value = serde_json::to_value(&full).unwrap();
    assert_eq!(value.as_object().unwrap().keys().collect::<Vec<_>>(), vec!["network"]);
    assert_eq!(full.get(Category::Network), Some(&standalone));
    assert_eq!(standalone.len(), 6);
}

#[tokio::test]
async fn recon_failure_is_data_not_an_error() {
    let toggles = ScanToggles { recon: true, ..Default::default() };

    let report = orchestrator().perform_full_scan("example.com", toggles).await.unwrap();

    let recon = report.get(Category::Recon).unwrap();
    assert_eq!(recon.status, ScanStatus::Success);
    assert_eq!(recon.message, "Recon scans completed");
    assert_eq!(
        recon.get("whois").unwrap(),
        &ScanResult::error("Whois lookup for example.com failed: registry unreachable")
    );
    assert_eq!(recon.summary().succeeded, 4);
}

#[tokio::test]
async fn every_requested_id_gets_an_entry() {
    let scanner = CategoryScanner::recon(Arc::new(Deterministic), &ScannerConfig::default());
    let requested = ["whois", "??", "censys", "", "email-harvest", "xss"];

    let report = scanner.run_selected_scans("example.com", requested).await;

    assert_eq!(report.len(), requested.len());
    for id in requested {
        assert!(report.get(id).is_some(), "missing entry for {id:?}");
    }
    assert_eq!(report.get("").unwrap().message, "Unknown scan type: ");
}

#[tokio::test]
async fn repeated_unknown_id_collapses_to_one_entry() {
    let scanner = CategoryScanner::network(Arc::new(Deterministic), &ScannerConfig::default());

    let once = scanner.run_selected_scans("example.com", ["ghost"]).await;
    let twice = scanner.run_selected_scans("example.com", ["ghost", "ghost"]).await;

    assert_eq!(twice.len(), 1);
    assert_eq!(once, twice);
}

#[tokio::test]
async fn cancelled_full_scan_still_returns_a_complete_report() {
    let ctx = ScanContext::default();
    ctx.cancel();

    let report = orchestrator().perform_full_scan_with("example.com", ScanToggles::all(), &ctx).await.unwrap();

    assert_eq!(report.categories.len(), 3);
    let summary = report.summary();
    assert_eq!(summary.succeeded, 0);
    assert_eq!(summary.failed, 6 + 1 + 5);
    assert_eq!(
        report.get(Category::Vulnerability).unwrap().get("fully-vuln-scan").unwrap().message,
        "Comprehensive vulnerability scan for example.com failed: cancelled"
    );
}

#[tokio::test]
async fn category_report_serializes_like_a_scan_result() {
    let scanner = CategoryScanner::vulnerability(Arc::new(Deterministic), &ScannerConfig::default());

    let report = scanner.run_selected_scans("https://example.com", ["clickjacking"]).await;

    let as_value = serde_json::to_value(&report).unwrap();
    let as_result: ScanResult = serde_json::from_value(as_value.clone()).unwrap();
    assert_eq!(as_result.status, ScanStatus::Success);
    assert_eq!(
        as_value["details"]["clickjacking"]["details"]["request"],
        json!({"url": "https://example.com"})
    );
    assert_eq!(ScanResult::from(report), as_result);
}

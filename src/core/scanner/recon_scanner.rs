// src/core/scanner/recon_scanner.rs

//! Reconnaissance probes, served under `/recon/` by the scanning service.
//! Shodan and Censys take the target as a free-form search query.

use crate::core::probe_client::{Payload, ProbeSpec};

pub const RECON_PROBES: &[ProbeSpec] = &[
    ProbeSpec { id: "whois", name: "Whois lookup", payload: Payload::Domain },
    ProbeSpec { id: "shodan", name: "Shodan search", payload: Payload::Query },
    ProbeSpec { id: "censys", name: "Censys search", payload: Payload::Query },
    ProbeSpec { id: "google-dork", name: "Google Dork search", payload: Payload::DomainWithDorks },
    ProbeSpec { id: "technology-detection", name: "Technology detection", payload: Payload::Url },
    ProbeSpec { id: "email-harvest", name: "Email harvesting", payload: Payload::Domain },
    ProbeSpec { id: "domain-info", name: "Domain info", payload: Payload::Domain },
    ProbeSpec { id: "ssl-info", name: "SSL info", payload: Payload::Domain },
    ProbeSpec { id: "subdomain-enum", name: "Subdomain enumeration", payload: Payload::Domain },
];

pub const DEFAULT_RECON_SCANS: &[&str] =
    &["whois", "shodan", "domain-info", "email-harvest", "technology-detection"];

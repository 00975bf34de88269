// src/core/scanner/vulnerability_scanner.rs

//! Vulnerability probes, served under `/vulnerability/` by the scanning service.
//! Every endpoint takes the target as a URL.

use crate::core::probe_client::{Payload, ProbeSpec};

pub const VULNERABILITY_PROBES: &[ProbeSpec] = &[
    ProbeSpec { id: "xss", name: "XSS check", payload: Payload::Url },
    ProbeSpec { id: "csrf", name: "CSRF check", payload: Payload::Url },
    ProbeSpec { id: "clickjacking", name: "Clickjacking check", payload: Payload::Url },
    ProbeSpec { id: "sql-injection", name: "SQL injection check", payload: Payload::Url },
    ProbeSpec { id: "ssl-tls", name: "SSL/TLS check", payload: Payload::Url },
    ProbeSpec { id: "fully-vuln-scan", name: "Comprehensive vulnerability scan", payload: Payload::Url },
];

/// The composite endpoint already covers the individual checks.
pub const DEFAULT_VULNERABILITY_SCANS: &[&str] = &["fully-vuln-scan"];

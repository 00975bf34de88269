// src/core/scanner/network_scanner.rs

//! Network enumeration probes, served under `/network/` by the scanning service.

use crate::core::probe_client::{Payload, ProbeSpec};

pub const NETWORK_PROBES: &[ProbeSpec] = &[
    ProbeSpec { id: "http-enum", name: "HTTP Enumeration", payload: Payload::Target },
    ProbeSpec { id: "ssl-enum", name: "SSL Enumeration", payload: Payload::TargetWithPort(443) },
    ProbeSpec { id: "dns-brute", name: "DNS Brute Force", payload: Payload::Domain },
    ProbeSpec { id: "smb-enum", name: "SMB Enumeration", payload: Payload::Target },
    ProbeSpec { id: "mysql-enum", name: "MySQL Enumeration", payload: Payload::TargetWithPort(3306) },
    ProbeSpec { id: "nmap-scan", name: "NMAP Scan", payload: Payload::Target },
];

/// A full scan runs every network probe.
pub const DEFAULT_NETWORK_SCANS: &[&str] =
    &["http-enum", "ssl-enum", "dns-brute", "smb-enum", "mysql-enum", "nmap-scan"];

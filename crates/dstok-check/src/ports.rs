//! Documentation-server port checker.
//!
//! Each documentation tool's configuration file has one *required* port from
//! the platform target set. This checker parses the port each file actually
//! declares and flags mismatches, duplicate claims, and cross-reference URLs
//! pointing outside the allowed set.
//!
//! Entries are processed in lexicographic path order so reports are
//! reproducible: the first configuration to declare a port owns it, and every
//! later claimant is reported against that owner.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use dstok_types::{Category, CollisionFinding, Severity};
use regex::Regex;

/// One documentation-server configuration under check.
#[derive(Debug, Clone)]
pub struct PortEntry {
    /// File path, used for ordering and evidence.
    pub path: String,
    /// The port this configuration must declare.
    pub required_port: u16,
    /// Raw configuration text.
    pub text: String,
}

static PORT_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:^|[^A-Za-z])"?port"?\s*[:=]\s*"?(\d{2,5})"#).expect("valid regex literal")
});

static PORT_LONG_FLAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"--port[=\s]+(\d{2,5})").expect("valid regex literal"));

static PORT_SHORT_FLAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\s)-p\s+(\d{2,5})").expect("valid regex literal"));

static CROSS_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:localhost|127\.0\.0\.1):(\d{2,5})").expect("valid regex literal")
});

/// The port a configuration declares, if any. Key-style declarations
/// (`port: 6006`, `port = 6006`) win over CLI flags (`--port 6006`, `-p 6006`).
pub fn declared_port(text: &str) -> Option<u16> {
    for pattern in [&*PORT_KEY, &*PORT_LONG_FLAG, &*PORT_SHORT_FLAG] {
        if let Some(captures) = pattern.captures(text) {
            if let Ok(port) = captures[1].parse() {
                return Some(port);
            }
        }
    }
    None
}

/// All ports referenced by `localhost:`/`127.0.0.1:` URLs, deduplicated.
fn cross_reference_ports(text: &str) -> BTreeSet<u16> {
    CROSS_REF
        .captures_iter(text)
        .filter_map(|c| c[1].parse().ok())
        .collect()
}

/// Check a set of documentation-server configurations against their required
/// ports and the allowed port set.
pub fn check_ports(entries: &[PortEntry], allowed: &BTreeSet<u16>) -> Vec<CollisionFinding> {
    let mut sorted: Vec<&PortEntry> = entries.iter().collect();
    sorted.sort_by(|a, b| a.path.cmp(&b.path));

    let mut findings = Vec::new();
    let mut owners: BTreeMap<u16, &str> = BTreeMap::new();

    for entry in sorted {
        match declared_port(&entry.text) {
            None => {
                findings.push(
                    CollisionFinding::new(
                        Category::PortConflict,
                        Severity::Warning,
                        format!("`{}` declares no explicit port", entry.path),
                    )
                    .with_evidence(vec![format!(
                        "{}: required port {} not declared",
                        entry.path, entry.required_port
                    )])
                    .with_remediation(vec![format!(
                        "declare `port = {}` so the default cannot drift into a collision",
                        entry.required_port
                    )]),
                );
            }
            Some(port) => {
                if let Some(owner) = owners.get(&port) {
                    // The duplicate subsumes any mismatch for this entry: one
                    // finding per contested claim, naming both files.
                    findings.push(
                        CollisionFinding::new(
                            Category::PortConflict,
                            Severity::Error,
                            format!("port {port} is claimed by two documentation servers"),
                        )
                        .with_evidence(vec![
                            format!("{owner}: owns port {port} (first in path order)"),
                            format!("{}: also declares port {port}", entry.path),
                        ])
                        .with_remediation(vec![format!(
                            "move `{}` to its required port {}",
                            entry.path, entry.required_port
                        )]),
                    );
                } else {
                    owners.insert(port, &entry.path);
                    if port != entry.required_port {
                        findings.push(
                            CollisionFinding::new(
                                Category::PortConflict,
                                Severity::Error,
                                format!(
                                    "`{}` declares port {port} but is assigned {}",
                                    entry.path, entry.required_port
                                ),
                            )
                            .with_evidence(vec![
                                format!("{}: declared {port}", entry.path),
                                format!("{}: required {}", entry.path, entry.required_port),
                            ])
                            .with_remediation(vec![
                                "cross-reference links are generated against the required port"
                                    .to_string(),
                                format!("set the port to {}", entry.required_port),
                            ]),
                        );
                    }
                }
            }
        }

        for port in cross_reference_ports(&entry.text) {
            if !allowed.contains(&port) {
                findings.push(
                    CollisionFinding::new(
                        Category::PortConflict,
                        Severity::Warning,
                        format!(
                            "`{}` links to port {port}, which is outside the allowed set",
                            entry.path
                        ),
                    )
                    .with_evidence(vec![format!("{}: cross-reference to port {port}", entry.path)])
                    .with_remediation(vec![format!(
                        "allowed ports: {}",
                        allowed
                            .iter()
                            .map(u16::to_string)
                            .collect::<Vec<_>>()
                            .join(", ")
                    )]),
                );
            }
        }
    }

    findings
}

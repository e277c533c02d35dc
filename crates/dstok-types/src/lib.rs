//! # dstok-types
//!
//! **Tier 0 (Core Types)**
//!
//! This crate defines the core data structures shared by every stage of the
//! dstok pipeline: collision findings, reports, and platform targets.
//!
//! ## What belongs here
//! * Pure data structs (findings, reports, platform descriptors)
//! * Serialization/Deserialization logic
//! * Stability markers (SCHEMA_VERSION)
//!
//! ## What does NOT belong here
//! * File I/O
//! * Checker logic
//! * Regex/pattern state

use serde::{Deserialize, Serialize};

/// The current schema version for serialized reports.
pub const SCHEMA_VERSION: u32 = 1;

/// Severity of a collision finding.
///
/// Ordering is by escalation: `Info < Warning < Error`. Only `Error`
/// findings invalidate a report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational only; includes internal checker failures downgraded by
    /// the runtime guard.
    Info,
    /// Contract deviation that degrades defenses but does not break execution.
    #[default]
    Warning,
    /// Guarantees a runtime defect; fails the report.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// The class of cross-tool interference a finding describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    /// Two entities claim the same CSS identifier (custom property or class).
    NameClash,
    /// Two documentation servers claim the same port, or a port deviates from
    /// its required assignment.
    PortConflict,
    /// A native bundler could resolve two physical copies of one logical
    /// package.
    BundlerDuplication,
    /// An identifier squats on the reserved namespace (globals, package
    /// scope) without being part of it.
    NamespaceViolation,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::NameClash => write!(f, "name-clash"),
            Category::PortConflict => write!(f, "port-conflict"),
            Category::BundlerDuplication => write!(f, "bundler-duplication"),
            Category::NamespaceViolation => write!(f, "namespace-violation"),
        }
    }
}

/// One detected collision. Immutable value object: checkers create findings,
/// the aggregator concatenates them, nobody mutates them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollisionFinding {
    pub category: Category,
    pub severity: Severity,
    /// Human-readable one-line summary.
    pub message: String,
    /// Supporting facts, one per line (file:line references, offending names).
    #[serde(default)]
    pub evidence: Vec<String>,
    /// Suggested fixes, one per line.
    #[serde(default)]
    pub remediation: Vec<String>,
}

impl CollisionFinding {
    pub fn new(category: Category, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            category,
            severity,
            message: message.into(),
            evidence: Vec::new(),
            remediation: Vec::new(),
        }
    }

    pub fn with_evidence(mut self, evidence: Vec<String>) -> Self {
        self.evidence = evidence;
        self
    }

    pub fn with_remediation(mut self, remediation: Vec<String>) -> Self {
        self.remediation = remediation;
        self
    }
}

/// The merged outcome of one validation run. Created fresh per run; carries
/// no identity across runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollisionReport {
    pub schema_version: u32,
    pub findings: Vec<CollisionFinding>,
    /// True iff no `Error`-severity finding is present.
    pub is_valid: bool,
}

impl CollisionReport {
    /// Build a report from findings, deriving `is_valid`.
    pub fn from_findings(findings: Vec<CollisionFinding>) -> Self {
        let is_valid = !findings.iter().any(|f| f.severity == Severity::Error);
        Self {
            schema_version: SCHEMA_VERSION,
            findings,
            is_valid,
        }
    }

    pub fn errors(&self) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Error)
            .count()
    }

    pub fn warnings(&self) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Warning)
            .count()
    }
}

/// A front-end runtime that consumes generated artifacts.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum PlatformId {
    Web,
    Mobile,
    Desktop,
}

impl std::fmt::Display for PlatformId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlatformId::Web => write!(f, "web"),
            PlatformId::Mobile => write!(f, "mobile"),
            PlatformId::Desktop => write!(f, "desktop"),
        }
    }
}

/// Static description of one emission target. The set is finite and known at
/// build time, never derived at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformTarget {
    pub id: PlatformId,
    /// Port the platform's documentation server must bind, if it has one.
    pub required_dev_server_port: Option<u16>,
    /// Output filename pattern relative to the emission directory.
    pub output_path_pattern: String,
}

impl PlatformTarget {
    /// The built-in target set: web docs on 6006, mobile docs on 7007,
    /// desktop docs on 6008.
    pub fn builtin() -> Vec<PlatformTarget> {
        vec![
            PlatformTarget {
                id: PlatformId::Web,
                required_dev_server_port: Some(6006),
                output_path_pattern: "tokens.css".to_string(),
            },
            PlatformTarget {
                id: PlatformId::Mobile,
                required_dev_server_port: Some(7007),
                output_path_pattern: "DsTheme.kt".to_string(),
            },
            PlatformTarget {
                id: PlatformId::Desktop,
                required_dev_server_port: Some(6008),
                output_path_pattern: "tokens.ts".to_string(),
            },
        ]
    }
}

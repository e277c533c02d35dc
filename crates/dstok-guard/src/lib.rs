//! # dstok-guard
//!
//! **Runtime Guard**
//!
//! A process-embedded monitor that re-derives a subset of the collision
//! checks against a *live* application: rendered stylesheet rules, the global
//! namespace, and the loaded-module import graph. It reports through a sink
//! instead of failing, because a collision in production must degrade
//! gracefully rather than crash the host.
//!
//! The guard holds its own copy of the naming contract, shared with the
//! build-time checkers through `dstok-contract`, so the two can never
//! silently diverge.
//!
//! Host environments plug in through three capability traits
//! ([`StyleSource`], [`GlobalNamespaceSource`], [`ModuleGraphSource`]); the
//! detection logic is host-agnostic and unit-testable with fake sources.
//!
//! Failure isolation is the one hard rule here: a failing source becomes an
//! `Info` finding and never prevents the sibling checks from running.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, OnceLock};

use dstok_contract::{NamingContract, custom_property_declarations};
use dstok_types::{Category, CollisionFinding, Severity};
use thiserror::Error;

/// A host-environment introspection failure. Sources return this instead of
/// panicking; the guard downgrades it to an `Info` finding.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct SourceError(pub String);

/// Yields the text of currently rendered stylesheet rules.
pub trait StyleSource {
    fn rules(&self) -> Result<Vec<String>, SourceError>;
}

/// Yields identifier names visible in the host's global namespace.
pub trait GlobalNamespaceSource {
    fn identifiers(&self) -> Result<Vec<String>, SourceError>;
}

/// Yields import identifiers of currently loaded modules.
pub trait ModuleGraphSource {
    fn import_ids(&self) -> Result<Vec<String>, SourceError>;
}

/// Guard configuration, supplied once at construction.
#[derive(Debug, Clone)]
pub struct GuardConfig {
    /// Master switch. When false, scans return nothing and the sink is never
    /// called.
    pub enable_detection: bool,
    /// Findings below this severity are detected but not surfaced to the
    /// sink. Detection always runs; only reporting is filtered, so telemetry
    /// can raise the threshold without re-deploying detection logic.
    pub log_threshold: Severity,
    pub check_styles: bool,
    pub check_globals: bool,
    pub check_imports: bool,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            enable_detection: true,
            log_threshold: Severity::Warning,
            check_styles: true,
            check_globals: true,
            check_imports: true,
        }
    }
}

type Sink = Arc<dyn Fn(&CollisionFinding) + Send + Sync>;

/// The runtime guard. Constructed once by the application's bootstrap and
/// passed by reference to whatever needs it; [`RuntimeGuard::install`] covers
/// hosts that want a process-wide handle.
pub struct RuntimeGuard {
    config: GuardConfig,
    contract: NamingContract,
    styles: Box<dyn StyleSource + Send + Sync>,
    globals: Box<dyn GlobalNamespaceSource + Send + Sync>,
    modules: Box<dyn ModuleGraphSource + Send + Sync>,
    sink: Mutex<Option<Sink>>,
    findings: Mutex<Vec<CollisionFinding>>,
}

static INSTALLED: OnceLock<RuntimeGuard> = OnceLock::new();

impl RuntimeGuard {
    /// Construct an explicit guard owned by the caller.
    pub fn new(
        config: GuardConfig,
        contract: NamingContract,
        styles: Box<dyn StyleSource + Send + Sync>,
        globals: Box<dyn GlobalNamespaceSource + Send + Sync>,
        modules: Box<dyn ModuleGraphSource + Send + Sync>,
    ) -> Self {
        Self {
            config,
            contract,
            styles,
            globals,
            modules,
            sink: Mutex::new(None),
            findings: Mutex::new(Vec::new()),
        }
    }

    /// Install a process-wide guard and run the initial scan. Idempotent: a
    /// second call is a no-op returning the existing guard, ignoring the new
    /// configuration.
    pub fn install(
        config: GuardConfig,
        contract: NamingContract,
        styles: Box<dyn StyleSource + Send + Sync>,
        globals: Box<dyn GlobalNamespaceSource + Send + Sync>,
        modules: Box<dyn ModuleGraphSource + Send + Sync>,
    ) -> &'static RuntimeGuard {
        INSTALLED.get_or_init(|| {
            let guard = RuntimeGuard::new(config, contract, styles, globals, modules);
            guard.scan();
            guard
        })
    }

    /// Replace the reporting sink. Detection is unaffected.
    pub fn set_sink(&self, sink: impl Fn(&CollisionFinding) + Send + Sync + 'static) {
        *self.sink.lock().expect("sink lock poisoned") = Some(Arc::new(sink));
    }

    /// Run one pass over the live environment. Read-only, re-entrant, and
    /// bounded by the size of the introspected structures; findings are
    /// accumulated on the guard and delivered to the sink at or above the
    /// configured threshold.
    pub fn scan(&self) -> Vec<CollisionFinding> {
        if !self.config.enable_detection {
            return Vec::new();
        }

        let mut findings = Vec::new();
        if self.config.check_styles {
            self.scan_styles(&mut findings);
        }
        if self.config.check_globals {
            self.scan_globals(&mut findings);
        }
        if self.config.check_imports {
            self.scan_imports(&mut findings);
        }

        self.record(&findings);
        findings
    }

    /// Pure predicate for module-load time: is this import path collision
    /// safe? Rejects empty paths and anything routed through a deprecated
    /// build-output segment, without waiting for a full scan cycle.
    pub fn validate_token_import(&self, path: &str) -> bool {
        !path.is_empty() && !self.contract.is_deprecated_import(path)
    }

    /// All findings accumulated over this guard's lifetime.
    pub fn findings(&self) -> Vec<CollisionFinding> {
        self.findings.lock().expect("findings lock poisoned").clone()
    }

    fn scan_styles(&self, findings: &mut Vec<CollisionFinding>) {
        match self.styles.rules() {
            Ok(rules) => {
                let mut seen = BTreeSet::new();
                for rule in &rules {
                    for name in custom_property_declarations(rule) {
                        if !self.contract.matches_css_name(&name) && seen.insert(name.clone()) {
                            findings.push(
                                CollisionFinding::new(
                                    Category::NameClash,
                                    Severity::Warning,
                                    format!(
                                        "live stylesheet declares `{name}` outside the `--{}-` namespace",
                                        self.contract.required_prefix()
                                    ),
                                )
                                .with_evidence(vec![format!("rendered rule: {}", rule.trim())])
                                .with_remediation(vec![
                                    "a third-party stylesheet is squatting on the token namespace"
                                        .to_string(),
                                ]),
                            );
                        }
                    }
                }
            }
            Err(err) => findings.push(internal_failure("stylesheet scan", &err)),
        }
    }

    fn scan_globals(&self, findings: &mut Vec<CollisionFinding>) {
        match self.globals.identifiers() {
            Ok(ids) => {
                let mut seen = BTreeSet::new();
                for id in &ids {
                    if self.contract.is_reserved_global(id)
                        && !self.contract.is_allowed_global(id)
                        && seen.insert(id.clone())
                    {
                        findings.push(
                            CollisionFinding::new(
                                Category::NamespaceViolation,
                                Severity::Warning,
                                format!("global `{id}` squats on the reserved prefix"),
                            )
                            .with_evidence(vec![format!("global identifier: {id}")])
                            .with_remediation(vec![
                                "add it to the contract allow-list if it is ours".to_string(),
                            ]),
                        );
                    }
                }
            }
            Err(err) => findings.push(internal_failure("global namespace scan", &err)),
        }
    }

    fn scan_imports(&self, findings: &mut Vec<CollisionFinding>) {
        match self.modules.import_ids() {
            Ok(ids) => {
                let mut seen = BTreeSet::new();
                for id in &ids {
                    if self.contract.is_deprecated_import(id) && seen.insert(id.clone()) {
                        findings.push(
                            CollisionFinding::new(
                                Category::NameClash,
                                Severity::Warning,
                                format!("loaded module `{id}` uses a deprecated import path"),
                            )
                            .with_evidence(vec![format!("import id: {id}")])
                            .with_remediation(vec![
                                "import through the package entry point, not build output"
                                    .to_string(),
                            ]),
                        );
                    }
                }
            }
            Err(err) => findings.push(internal_failure("module graph scan", &err)),
        }
    }

    fn record(&self, findings: &[CollisionFinding]) {
        self.findings
            .lock()
            .expect("findings lock poisoned")
            .extend_from_slice(findings);

        // Clone the sink handle out of the lock before calling it, so a sink
        // that re-enters the guard (logging through scan state, for example)
        // cannot deadlock.
        let sink = self.sink.lock().expect("sink lock poisoned").clone();
        if let Some(sink) = sink {
            for finding in findings {
                if finding.severity >= self.config.log_threshold {
                    sink(finding);
                }
            }
        }
    }
}

fn internal_failure(what: &str, err: &SourceError) -> CollisionFinding {
    CollisionFinding::new(
        Category::NamespaceViolation,
        Severity::Info,
        format!("{what} failed internally; detection degraded"),
    )
    .with_evidence(vec![format!("source error: {err}")])
}

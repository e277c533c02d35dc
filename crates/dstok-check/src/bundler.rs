//! Native-bundler deduplication checker.
//!
//! Two physically distinct copies of one logical package bundled into a
//! native binary cause class-identity and singleton-state bugs. The bundler
//! configuration must therefore carry three defenses: a deduplication
//! directive, an alias/redirect directive, and a force-single-instance
//! directive. Workspace package manifests must also carry the required scope
//! so the dedupe directives can match them.

use std::sync::LazyLock;

use dstok_contract::NamingContract;
use dstok_types::{Category, CollisionFinding, Severity};
use regex::Regex;

/// One workspace package manifest (`package.json` shape) under check.
#[derive(Debug, Clone)]
pub struct ManifestFile {
    pub path: String,
    pub text: String,
}

static DEDUPE_DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bdedupe\b|disableHierarchicalLookup\s*[:=]\s*true").expect("valid regex literal")
});

static ALIAS_DIRECTIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\baliase?s?\b|extraNodeModules").expect("valid regex literal"));

static SINGLETON_DIRECTIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bsingletons?\b|resolveRequest").expect("valid regex literal"));

/// Check a bundler configuration and the workspace manifests it governs.
pub fn check_bundler(
    config_label: &str,
    config_text: &str,
    manifests: &[ManifestFile],
    contract: &NamingContract,
) -> Vec<CollisionFinding> {
    let mut findings = Vec::new();

    if !DEDUPE_DIRECTIVE.is_match(config_text) {
        findings.push(
            CollisionFinding::new(
                Category::BundlerDuplication,
                Severity::Error,
                format!("`{config_label}` has no deduplication directive"),
            )
            .with_evidence(vec![format!(
                "{config_label}: expected a `dedupe` list or `disableHierarchicalLookup: true`"
            )])
            .with_remediation(vec![
                "without dedupe, two copies of the token runtime can reach one binary".to_string(),
                format!("dedupe every `{}/ *` package", contract.package_scope()),
            ]),
        );
    }

    if !SINGLETON_DIRECTIVE.is_match(config_text) {
        findings.push(
            CollisionFinding::new(
                Category::BundlerDuplication,
                Severity::Error,
                format!("`{config_label}` has no force-single-instance directive"),
            )
            .with_evidence(vec![format!(
                "{config_label}: expected a `singletons` list or a custom `resolveRequest`"
            )])
            .with_remediation(vec![format!(
                "resolve `{}/tokens` to one physical copy across the workspace",
                contract.package_scope()
            )]),
        );
    }

    if !ALIAS_DIRECTIVE.is_match(config_text) {
        findings.push(
            CollisionFinding::new(
                Category::BundlerDuplication,
                Severity::Warning,
                format!("`{config_label}` has no alias/redirect directive"),
            )
            .with_evidence(vec![format!(
                "{config_label}: expected an `alias` map or `extraNodeModules`"
            )])
            .with_remediation(vec![
                "alias workspace packages to their source locations".to_string(),
            ]),
        );
    }

    let mut sorted: Vec<&ManifestFile> = manifests.iter().collect();
    sorted.sort_by(|a, b| a.path.cmp(&b.path));

    for manifest in sorted {
        match manifest_name(&manifest.text) {
            Some(name) if contract.has_package_scope(&name) => {}
            Some(name) => {
                findings.push(
                    CollisionFinding::new(
                        Category::NamespaceViolation,
                        Severity::Warning,
                        format!(
                            "package `{name}` is missing the `{}/` scope",
                            contract.package_scope()
                        ),
                    )
                    .with_evidence(vec![format!("{}: name = {name:?}", manifest.path)])
                    .with_remediation(vec![format!(
                        "rename to `{}/{name}` so dedupe directives can match it",
                        contract.package_scope()
                    )]),
                );
            }
            None => {
                findings.push(
                    CollisionFinding::new(
                        Category::NamespaceViolation,
                        Severity::Warning,
                        format!("`{}` has no readable package name", manifest.path),
                    )
                    .with_evidence(vec![format!(
                        "{}: expected a JSON object with a string `name`",
                        manifest.path
                    )])
                    .with_remediation(vec!["add a scoped `name` field".to_string()]),
                );
            }
        }
    }

    findings
}

fn manifest_name(text: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(text).ok()?;
    value.get("name")?.as_str().map(String::from)
}

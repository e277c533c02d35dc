//! # dstok-contract
//!
//! **Tier 0 (Naming Contract)**
//!
//! The process-wide naming contract: the required prefix, the patterns every
//! generated identifier must satisfy, and the predicates that decide what
//! counts as a violation.
//!
//! Build-time checkers (`dstok-check`) and the runtime guard (`dstok-guard`)
//! both consume this crate, so the definition of "violation" cannot drift
//! between the two.
//!
//! ## What belongs here
//! * `NamingContract` construction and TOML loading
//! * Naming predicates (CSS names, reserved globals, import paths, scopes)
//! * Shared extraction patterns for stylesheet text
//!
//! ## What does NOT belong here
//! * Finding construction
//! * File scanning loops

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use thiserror::Error;

/// Errors from contract construction or loading.
#[derive(Debug, Error)]
pub enum ContractError {
    #[error("failed to read contract file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse contract TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid prefix {0:?}: must be lowercase ascii, starting with a letter")]
    InvalidPrefix(String),
}

/// Matches one CSS custom-property declaration, e.g. `--ds-color-bg: #fff;`.
/// `var(--x)` usages do not match because they lack the trailing colon.
static CUSTOM_PROP_DECL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(--[A-Za-z_][A-Za-z0-9_-]*)\s*:").expect("valid regex literal")
});

/// Matches one class name inside selector text, e.g. `.ds-button`.
static CLASS_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.([A-Za-z_][A-Za-z0-9_-]*)").expect("valid regex literal"));

static VALID_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9]*$").expect("valid regex literal"));

/// Extract custom-property declaration names from a line of stylesheet text.
pub fn custom_property_declarations(line: &str) -> Vec<String> {
    CUSTOM_PROP_DECL
        .captures_iter(line)
        .map(|c| c[1].to_string())
        .collect()
}

/// Extract class names from selector text (the part of a rule before `{`).
pub fn class_names(selector_text: &str) -> Vec<String> {
    CLASS_NAME
        .captures_iter(selector_text)
        .map(|c| c[1].to_string())
        .collect()
}

/// On-disk contract configuration (`contract.toml`).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ContractFile {
    pub prefix: String,
    pub scope: Option<String>,
    pub allowed_globals: Vec<String>,
    pub deprecated_segments: Vec<String>,
}

impl Default for ContractFile {
    fn default() -> Self {
        Self {
            prefix: "ds".to_string(),
            scope: None,
            allowed_globals: Vec::new(),
            deprecated_segments: Vec::new(),
        }
    }
}

/// The immutable, process-wide naming contract.
///
/// Constructed once at bootstrap (build tool or application), cloned by
/// anything that needs an independent copy, never mutated mid-run.
#[derive(Debug, Clone)]
pub struct NamingContract {
    required_prefix: String,
    package_scope: String,
    css_prefix_pattern: Regex,
    js_global_pattern: Regex,
    allowed_globals: BTreeSet<String>,
    deprecated_import_segments: Vec<String>,
}

impl NamingContract {
    /// Build a contract for `prefix`, deriving the CSS and JS-global patterns
    /// and defaulting the package scope to `@{prefix}`.
    pub fn new(prefix: &str) -> Result<Self, ContractError> {
        if !VALID_PREFIX.is_match(prefix) {
            return Err(ContractError::InvalidPrefix(prefix.to_string()));
        }

        let escaped = regex::escape(prefix);
        let upper = regex::escape(&prefix.to_uppercase());

        // Canonical CSS form: `--{prefix}-{kebab-path}`; class form drops the
        // leading dashes.
        let css_prefix_pattern =
            Regex::new(&format!("^(?:--)?{escaped}-[a-z0-9]+(?:-[a-z0-9]+)*$"))
                .expect("valid derived pattern");

        // Reserved globals: `dsTheme`, `ds_tokens`, `DS_VERSION`, `__dsX`.
        let js_global_pattern = Regex::new(&format!(
            "^(?:__)?(?:{escaped}[A-Z_][A-Za-z0-9_]*|{upper}_[A-Za-z0-9_]*)$"
        ))
        .expect("valid derived pattern");

        Ok(Self {
            required_prefix: prefix.to_string(),
            package_scope: format!("@{prefix}"),
            css_prefix_pattern,
            js_global_pattern,
            allowed_globals: BTreeSet::new(),
            deprecated_import_segments: ["dist", "build", "cjs", "esm", "umd"]
                .into_iter()
                .map(String::from)
                .collect(),
        })
    }

    /// Parse a contract from TOML text.
    pub fn from_toml(s: &str) -> Result<Self, ContractError> {
        let file: ContractFile = toml::from_str(s)?;
        let mut contract = Self::new(&file.prefix)?;
        if let Some(scope) = file.scope {
            contract.package_scope = scope;
        }
        contract.allowed_globals.extend(file.allowed_globals);
        if !file.deprecated_segments.is_empty() {
            contract.deprecated_import_segments = file.deprecated_segments;
        }
        Ok(contract)
    }

    /// Load a contract from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ContractError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn required_prefix(&self) -> &str {
        &self.required_prefix
    }

    pub fn package_scope(&self) -> &str {
        &self.package_scope
    }

    pub fn allowed_globals(&self) -> &BTreeSet<String> {
        &self.allowed_globals
    }

    pub fn deprecated_import_segments(&self) -> &[String] {
        &self.deprecated_import_segments
    }

    /// Add an identifier to the global allow-list. Bootstrap-time only; the
    /// contract is read-only once handed to checkers.
    pub fn allow_global(&mut self, name: impl Into<String>) {
        self.allowed_globals.insert(name.into());
    }

    /// The canonical custom-property name for a token path:
    /// `--{prefix}-{path joined by "-"}`.
    pub fn css_custom_property(&self, path: &[String]) -> String {
        format!("--{}-{}", self.required_prefix, path.join("-"))
    }

    /// The canonical class name for a suffix: `{prefix}-{suffix}`.
    pub fn css_class(&self, suffix: &str) -> String {
        format!("{}-{}", self.required_prefix, suffix)
    }

    /// Whether a CSS identifier (custom property or bare class name)
    /// satisfies the contract.
    pub fn matches_css_name(&self, name: &str) -> bool {
        self.css_prefix_pattern.is_match(name)
    }

    /// Whether a global identifier sits inside the reserved namespace.
    pub fn is_reserved_global(&self, id: &str) -> bool {
        self.js_global_pattern.is_match(id)
    }

    /// Whether a reserved global identifier is explicitly allow-listed.
    pub fn is_allowed_global(&self, id: &str) -> bool {
        self.allowed_globals.contains(id)
    }

    /// Whether an import path contains a deprecated build-output segment
    /// (e.g. `dist/`), which bypasses the collision-safe entry points.
    pub fn is_deprecated_import(&self, path: &str) -> bool {
        path.split(['/', '\\'])
            .any(|seg| self.deprecated_import_segments.iter().any(|d| d == seg))
    }

    /// Whether a package manifest name carries the required scope
    /// (`@{prefix}/...`).
    pub fn has_package_scope(&self, package_name: &str) -> bool {
        package_name
            .strip_prefix(&self.package_scope)
            .is_some_and(|rest| rest.starts_with('/'))
    }
}

impl Default for NamingContract {
    fn default() -> Self {
        Self::new("ds").expect("default prefix is valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_prefix() {
        assert!(NamingContract::new("").is_err());
        assert!(NamingContract::new("9x").is_err());
        assert!(NamingContract::new("Ds").is_err());
    }

    #[test]
    fn canonical_custom_property_name() {
        let contract = NamingContract::default();
        let path: Vec<String> = ["color", "primary", "500"].map(String::from).into();
        assert_eq!(contract.css_custom_property(&path), "--ds-color-primary-500");
    }

    #[test]
    fn css_pattern_accepts_canonical_forms() {
        let contract = NamingContract::default();
        assert!(contract.matches_css_name("--ds-color-primary-500"));
        assert!(contract.matches_css_name("ds-button"));
        assert!(contract.matches_css_name("--ds-spacing-4"));
    }

    #[test]
    fn css_pattern_rejects_foreign_and_malformed_names() {
        let contract = NamingContract::default();
        assert!(!contract.matches_css_name("--brand-accent"));
        assert!(!contract.matches_css_name("--ds-Color-Primary"));
        assert!(!contract.matches_css_name("btn-primary"));
        assert!(!contract.matches_css_name("--dstheme"));
    }

    #[test]
    fn reserved_global_detection() {
        let contract = NamingContract::default();
        assert!(contract.is_reserved_global("dsTheme"));
        assert!(contract.is_reserved_global("ds_tokens"));
        assert!(contract.is_reserved_global("DS_VERSION"));
        assert!(contract.is_reserved_global("__dsGuard"));
        assert!(!contract.is_reserved_global("distance"));
        assert!(!contract.is_reserved_global("jQuery"));
    }

    #[test]
    fn deprecated_import_segments_match_whole_segments() {
        let contract = NamingContract::default();
        assert!(contract.is_deprecated_import("@ds/tokens/dist/theme"));
        assert!(contract.is_deprecated_import("packages/tokens/build/index"));
        assert!(!contract.is_deprecated_import("libs/tokens/theme"));
        assert!(!contract.is_deprecated_import("distribution/tokens"));
    }

    #[test]
    fn package_scope_check() {
        let contract = NamingContract::default();
        assert!(contract.has_package_scope("@ds/tokens"));
        assert!(!contract.has_package_scope("widgets"));
        assert!(!contract.has_package_scope("@dstokens"));
        assert!(!contract.has_package_scope("@other/tokens"));
    }

    #[test]
    fn custom_property_extraction_skips_usages() {
        let decls = custom_property_declarations(
            "  color: var(--ds-color-primary-500); --brand-accent: #f00;",
        );
        assert_eq!(decls, vec!["--brand-accent".to_string()]);
    }

    #[test]
    fn class_name_extraction() {
        let names = class_names(".ds-button, .btn-primary:hover");
        assert_eq!(names, vec!["ds-button".to_string(), "btn-primary".to_string()]);
    }

    #[test]
    fn from_toml_overrides_defaults() {
        let contract = NamingContract::from_toml(
            r#"
prefix = "ui"
scope = "@acme"
allowed_globals = ["uiRuntime"]
"#,
        )
        .unwrap();
        assert_eq!(contract.required_prefix(), "ui");
        assert_eq!(contract.package_scope(), "@acme");
        assert!(contract.is_allowed_global("uiRuntime"));
        assert!(contract.matches_css_name("--ui-color-bg"));
        assert!(!contract.matches_css_name("--ds-color-bg"));
    }

    #[test]
    fn from_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contract.toml");
        std::fs::write(&path, "prefix = \"ds\"\nallowed_globals = [\"dsTheme\"]\n").unwrap();

        let contract = NamingContract::from_file(&path).unwrap();
        assert!(contract.is_allowed_global("dsTheme"));
    }
}

//! # dstok-model
//!
//! **Tier 1 (Token Model)**
//!
//! In-memory representation of a parsed token tree plus alias resolution.
//!
//! The source format is the design-authoring contract: a tree-structured JSON
//! document where each leaf carries `$type` and `$value` (a literal or an
//! `{alias.path}` reference string) and optional `$description`; non-leaf
//! objects are namespace groups. Leaves may also carry `$platforms`, a map of
//! per-platform value overrides.
//!
//! ## What belongs here
//! * Token/TokenValue data types
//! * Source parsing with schema validation
//! * Alias resolution (see [`resolve`])
//!
//! ## What does NOT belong here
//! * Naming/prefix checks (dstok-validate)
//! * Artifact emission (dstok-emit)

mod resolve;

pub use resolve::{ResolveError, ResolvedToken, ResolvedTree, Resolver, resolve_all};

use std::collections::BTreeMap;
use std::path::Path;

use dstok_types::PlatformId;
use serde_json::Value;
use thiserror::Error;

/// A token's position in the tree, e.g. `["color", "primary", "500"]`.
/// Always non-empty; the path joined with `-` and prefixed forms the
/// canonical identifier used by every emitter.
pub type TokenPath = Vec<String>;

/// Errors raised while parsing a token source document. All of these are
/// fatal to the current run; nothing is emitted over a malformed source.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("schema error at `{path}`: {reason}")]
    Schema { path: String, reason: String },

    #[error("failed to parse token source JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read token source: {0}")]
    Io(#[from] std::io::Error),
}

impl ModelError {
    fn schema(path: &[String], reason: impl Into<String>) -> Self {
        ModelError::Schema {
            path: path.join("."),
            reason: reason.into(),
        }
    }
}

/// The declared type of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Color,
    Dimension,
    FontWeight,
    FontFamily,
    Shadow,
    /// Recognized but not specially modeled ($type `number`, `string`,
    /// `duration`, `cubicBezier`, `opacity`).
    Other,
}

impl TokenKind {
    fn from_source(s: &str) -> Option<TokenKind> {
        match s {
            "color" => Some(TokenKind::Color),
            "dimension" => Some(TokenKind::Dimension),
            "fontWeight" => Some(TokenKind::FontWeight),
            "fontFamily" => Some(TokenKind::FontFamily),
            "shadow" => Some(TokenKind::Shadow),
            "number" | "string" | "duration" | "cubicBezier" | "opacity" => Some(TokenKind::Other),
            _ => None,
        }
    }
}

/// A literal token value.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Str(String),
    Num(f64),
    /// Ordered list of strings (font stacks).
    List(Vec<String>),
}

impl std::fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LiteralValue::Str(s) => write!(f, "{s}"),
            LiteralValue::Num(n) => write!(f, "{n}"),
            LiteralValue::List(items) => write!(f, "{}", items.join(", ")),
        }
    }
}

/// A token value: a literal, or an alias to another token's path.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenValue {
    Literal(LiteralValue),
    Alias(TokenPath),
}

/// One design token.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub path: TokenPath,
    pub kind: TokenKind,
    pub value: TokenValue,
    pub description: Option<String>,
    pub platform_overrides: BTreeMap<PlatformId, TokenValue>,
}

impl Token {
    /// The canonical kebab identifier (path joined with `-`, unprefixed).
    pub fn kebab_name(&self) -> String {
        self.path.join("-")
    }
}

/// A parsed token tree, keyed by path. Iteration order is deterministic
/// (lexicographic by path) so downstream reports are reproducible.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenTree {
    tokens: BTreeMap<TokenPath, Token>,
}

impl TokenTree {
    /// Parse a token source document from JSON text.
    pub fn from_str(s: &str) -> Result<Self, ModelError> {
        let value: Value = serde_json::from_str(s)?;
        Self::from_json(&value)
    }

    /// Load a token source document from a file.
    pub fn from_file(path: &Path) -> Result<Self, ModelError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Build a tree from an already-parsed JSON document.
    pub fn from_json(root: &Value) -> Result<Self, ModelError> {
        let Value::Object(map) = root else {
            return Err(ModelError::schema(&[], "token source root must be an object"));
        };
        if map.contains_key("$value") {
            return Err(ModelError::schema(&[], "token source root cannot be a token"));
        }

        let mut tree = TokenTree::default();
        let mut path = Vec::new();
        walk_group(map, &mut path, &mut tree)?;
        Ok(tree)
    }

    pub fn get(&self, path: &[String]) -> Option<&Token> {
        self.tokens.get(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Token> {
        self.tokens.values()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Insert a token directly. Used by tests and programmatic builders; the
    /// parsing path is `from_json`.
    pub fn insert(&mut self, token: Token) {
        self.tokens.insert(token.path.clone(), token);
    }
}

fn walk_group(
    map: &serde_json::Map<String, Value>,
    path: &mut TokenPath,
    tree: &mut TokenTree,
) -> Result<(), ModelError> {
    for (key, node) in map {
        if key.starts_with('$') {
            // Group-level metadata ($description etc.) carries no tokens.
            continue;
        }
        if key.is_empty() {
            return Err(ModelError::schema(path, "empty group or token name"));
        }
        if key.contains('.') {
            return Err(ModelError::schema(
                path,
                format!("name {key:?} must not contain '.' (reserved for alias paths)"),
            ));
        }

        path.push(key.clone());
        match node {
            Value::Object(child) if child.contains_key("$value") => {
                let token = parse_token(child, path)?;
                tree.tokens.insert(token.path.clone(), token);
            }
            Value::Object(child) => walk_group(child, path, tree)?,
            _ => {
                return Err(ModelError::schema(
                    path,
                    "expected a group object or a token object with $value",
                ));
            }
        }
        path.pop();
    }
    Ok(())
}

fn parse_token(
    map: &serde_json::Map<String, Value>,
    path: &TokenPath,
) -> Result<Token, ModelError> {
    let kind = match map.get("$type") {
        Some(Value::String(s)) => TokenKind::from_source(s)
            .ok_or_else(|| ModelError::schema(path, format!("unknown $type {s:?}")))?,
        Some(_) => return Err(ModelError::schema(path, "$type must be a string")),
        None => return Err(ModelError::schema(path, "missing required $type")),
    };

    let value = parse_value(map.get("$value").expect("caller checked $value"), path)?;

    let description = match map.get("$description") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => return Err(ModelError::schema(path, "$description must be a string")),
        None => None,
    };

    let mut platform_overrides = BTreeMap::new();
    if let Some(platforms) = map.get("$platforms") {
        let Value::Object(entries) = platforms else {
            return Err(ModelError::schema(path, "$platforms must be an object"));
        };
        for (platform, raw) in entries {
            let id = match platform.as_str() {
                "web" => PlatformId::Web,
                "mobile" => PlatformId::Mobile,
                "desktop" => PlatformId::Desktop,
                other => {
                    return Err(ModelError::schema(
                        path,
                        format!("unknown platform {other:?} in $platforms"),
                    ));
                }
            };
            platform_overrides.insert(id, parse_value(raw, path)?);
        }
    }

    Ok(Token {
        path: path.clone(),
        kind,
        value,
        description,
        platform_overrides,
    })
}

fn parse_value(raw: &Value, path: &TokenPath) -> Result<TokenValue, ModelError> {
    match raw {
        Value::String(s) => {
            if let Some(inner) = s.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                if inner.is_empty() || inner.split('.').any(str::is_empty) {
                    return Err(ModelError::schema(path, format!("malformed alias {s:?}")));
                }
                Ok(TokenValue::Alias(
                    inner.split('.').map(String::from).collect(),
                ))
            } else {
                Ok(TokenValue::Literal(LiteralValue::Str(s.clone())))
            }
        }
        Value::Number(n) => {
            let num = n
                .as_f64()
                .ok_or_else(|| ModelError::schema(path, "numeric $value out of range"))?;
            Ok(TokenValue::Literal(LiteralValue::Num(num)))
        }
        Value::Array(items) => {
            let mut list = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::String(s) => list.push(s.clone()),
                    _ => {
                        return Err(ModelError::schema(
                            path,
                            "list $value entries must be strings",
                        ));
                    }
                }
            }
            Ok(TokenValue::Literal(LiteralValue::List(list)))
        }
        _ => Err(ModelError::schema(
            path,
            "$value must be a string, number, or list of strings",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(src: &str) -> TokenTree {
        TokenTree::from_str(src).unwrap()
    }

    #[test]
    fn parses_groups_and_leaves() {
        let tree = parse(
            r##"{
                "color": {
                    "primary": {
                        "500": { "$type": "color", "$value": "#3b82f6" }
                    }
                },
                "spacing": {
                    "4": { "$type": "dimension", "$value": "16px", "$description": "base unit" }
                }
            }"##,
        );

        assert_eq!(tree.len(), 2);
        let color = tree
            .get(&["color", "primary", "500"].map(String::from))
            .unwrap();
        assert_eq!(color.kind, TokenKind::Color);
        assert_eq!(color.kebab_name(), "color-primary-500");

        let spacing = tree.get(&["spacing", "4"].map(String::from)).unwrap();
        assert_eq!(spacing.description.as_deref(), Some("base unit"));
    }

    #[test]
    fn parses_alias_value() {
        let tree = parse(
            r##"{
                "color": { "accent": { "$type": "color", "$value": "{color.base}" },
                           "base": { "$type": "color", "$value": "#111" } }
            }"##,
        );
        let accent = tree.get(&["color", "accent"].map(String::from)).unwrap();
        assert_eq!(
            accent.value,
            TokenValue::Alias(vec!["color".into(), "base".into()])
        );
    }

    #[test]
    fn parses_platform_overrides() {
        let tree = parse(
            r##"{
                "radius": { "card": {
                    "$type": "dimension",
                    "$value": "8px",
                    "$platforms": { "mobile": "12px" }
                } }
            }"##,
        );
        let token = tree.get(&["radius", "card"].map(String::from)).unwrap();
        assert_eq!(
            token.platform_overrides.get(&PlatformId::Mobile),
            Some(&TokenValue::Literal(LiteralValue::Str("12px".into())))
        );
    }

    #[test]
    fn unknown_type_is_schema_error() {
        let err = TokenTree::from_str(
            r##"{ "x": { "$type": "gradient", "$value": "#000" } }"##,
        )
        .unwrap_err();
        assert!(matches!(err, ModelError::Schema { .. }), "{err}");
        assert!(err.to_string().contains("gradient"));
    }

    #[test]
    fn missing_type_is_schema_error() {
        let err = TokenTree::from_str(r##"{ "x": { "$value": "#000" } }"##).unwrap_err();
        assert!(err.to_string().contains("$type"));
    }

    #[test]
    fn non_object_leaf_is_schema_error() {
        let err = TokenTree::from_str(r##"{ "x": "#000" }"##).unwrap_err();
        assert!(matches!(err, ModelError::Schema { .. }));
    }

    #[test]
    fn dotted_name_is_schema_error() {
        let err =
            TokenTree::from_str(r##"{ "a.b": { "$type": "color", "$value": "#000" } }"##)
                .unwrap_err();
        assert!(err.to_string().contains("a.b"));
    }

    #[test]
    fn malformed_alias_is_schema_error() {
        let err = TokenTree::from_str(
            r##"{ "x": { "$type": "color", "$value": "{color..base}" } }"##,
        )
        .unwrap_err();
        assert!(err.to_string().contains("alias"));
    }

    #[test]
    fn unknown_platform_is_schema_error() {
        let err = TokenTree::from_str(
            r##"{ "x": { "$type": "color", "$value": "#000", "$platforms": { "watch": "#111" } } }"##,
        )
        .unwrap_err();
        assert!(err.to_string().contains("watch"));
    }

    #[test]
    fn group_metadata_is_skipped() {
        let tree = parse(
            r##"{ "color": { "$description": "brand palette",
                            "bg": { "$type": "color", "$value": "#fff" } } }"##,
        );
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn from_file_reads_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.json");
        std::fs::write(&path, r##"{ "x": { "$type": "color", "$value": "#000" } }"##).unwrap();
        let tree = TokenTree::from_file(&path).unwrap();
        assert_eq!(tree.len(), 1);
    }
}

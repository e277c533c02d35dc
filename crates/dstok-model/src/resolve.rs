//! Alias resolution.
//!
//! Resolution follows alias chains depth-first and is memoized per
//! [`Resolver`], so one run never re-walks a chain it has already settled.
//! The cache lives inside the resolver; concurrent runs each own their own
//! resolver and share nothing.

use std::collections::{BTreeMap, HashMap};

use dstok_types::PlatformId;

use crate::{LiteralValue, TokenKind, TokenPath, TokenTree, TokenValue};

/// Per-token resolution failures. The resolver collects all of these across
/// the tree before failing, so an author sees every problem in one pass.
// Display/Error are hand-written: thiserror's derive treats any field named
// `source` as the error source, and `String` is not an `Error`.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolveError {
    /// An alias chain revisited a path before terminating.
    Cycle { chain: Vec<String> },

    /// An alias points at a path with no token.
    UnknownReference { source: String, target: String },
}

impl std::fmt::Display for ResolveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cycle { chain } => write!(f, "alias cycle: {}", chain.join(" -> ")),
            Self::UnknownReference { source, target } => {
                write!(f, "unknown reference `{target}` (aliased from `{source}`)")
            }
        }
    }
}

impl std::error::Error for ResolveError {}

/// A token with every alias settled to a literal.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedToken {
    pub path: TokenPath,
    pub kind: TokenKind,
    pub value: LiteralValue,
    pub description: Option<String>,
    pub platform_overrides: BTreeMap<PlatformId, LiteralValue>,
}

impl ResolvedToken {
    /// The value for one platform: its override if present, else the base.
    pub fn value_for(&self, platform: PlatformId) -> &LiteralValue {
        self.platform_overrides.get(&platform).unwrap_or(&self.value)
    }
}

/// A fully resolved tree, in deterministic path order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedTree {
    values: BTreeMap<TokenPath, ResolvedToken>,
}

impl ResolvedTree {
    pub fn get(&self, path: &[String]) -> Option<&ResolvedToken> {
        self.values.get(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResolvedToken> {
        self.values.values()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Memoizing alias resolver over one tree.
pub struct Resolver<'a> {
    tree: &'a TokenTree,
    cache: HashMap<TokenPath, LiteralValue>,
}

impl<'a> Resolver<'a> {
    pub fn new(tree: &'a TokenTree) -> Self {
        Self {
            tree,
            cache: HashMap::new(),
        }
    }

    /// Resolve the token at `path` to a literal, following aliases
    /// depth-first. For a token with no alias this is the identity on its
    /// literal value.
    pub fn resolve(&mut self, path: &[String]) -> Result<LiteralValue, ResolveError> {
        let mut chain = Vec::new();
        self.resolve_path(path, &mut chain)
    }

    /// Resolve an arbitrary value in the context of `owner` (used for
    /// platform overrides, which may themselves alias). An override that
    /// aliases its own token resolves to the owner's base value; only base
    /// values can form cycles, so the walk starts fresh at the target.
    pub fn resolve_value(
        &mut self,
        owner: &[String],
        value: &TokenValue,
    ) -> Result<LiteralValue, ResolveError> {
        match value {
            TokenValue::Literal(lit) => Ok(lit.clone()),
            TokenValue::Alias(target) => {
                if self.tree.get(target).is_none() {
                    return Err(ResolveError::UnknownReference {
                        source: owner.join("."),
                        target: target.join("."),
                    });
                }
                let mut chain = Vec::new();
                self.resolve_path(target, &mut chain)
            }
        }
    }

    fn resolve_path(
        &mut self,
        path: &[String],
        chain: &mut Vec<String>,
    ) -> Result<LiteralValue, ResolveError> {
        if let Some(hit) = self.cache.get(path) {
            return Ok(hit.clone());
        }

        let dotted = path.join(".");
        if chain.contains(&dotted) {
            let mut cycle = chain.clone();
            cycle.push(dotted);
            return Err(ResolveError::Cycle { chain: cycle });
        }

        let Some(token) = self.tree.get(path) else {
            return Err(ResolveError::UnknownReference {
                source: chain.last().cloned().unwrap_or_else(|| dotted.clone()),
                target: dotted,
            });
        };

        chain.push(dotted);
        let resolved = match &token.value {
            TokenValue::Literal(lit) => lit.clone(),
            TokenValue::Alias(target) => self.resolve_path(target, chain)?,
        };
        chain.pop();

        self.cache.insert(path.to_vec(), resolved.clone());
        Ok(resolved)
    }
}

/// Resolve every token (base value and platform overrides) in the tree.
///
/// On failure returns *all* resolution errors found, not just the first.
pub fn resolve_all(tree: &TokenTree) -> Result<ResolvedTree, Vec<ResolveError>> {
    let mut resolver = Resolver::new(tree);
    let mut resolved = ResolvedTree::default();
    let mut errors = Vec::new();

    for token in tree.iter() {
        let value = match resolver.resolve(&token.path) {
            Ok(value) => value,
            Err(err) => {
                errors.push(err);
                continue;
            }
        };

        let mut platform_overrides = BTreeMap::new();
        let mut override_failed = false;
        for (platform, raw) in &token.platform_overrides {
            match resolver.resolve_value(&token.path, raw) {
                Ok(lit) => {
                    platform_overrides.insert(*platform, lit);
                }
                Err(err) => {
                    errors.push(err);
                    override_failed = true;
                }
            }
        }
        if override_failed {
            continue;
        }

        resolved.values.insert(
            token.path.clone(),
            ResolvedToken {
                path: token.path.clone(),
                kind: token.kind,
                value,
                description: token.description.clone(),
                platform_overrides,
            },
        );
    }

    if errors.is_empty() {
        Ok(resolved)
    } else {
        Err(errors)
    }
}

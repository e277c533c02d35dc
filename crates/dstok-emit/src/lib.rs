//! # dstok-emit
//!
//! **Tier 2 (Platform Emitters)**
//!
//! Reference emitters that turn a *validated, resolved* token tree into
//! per-platform artifacts. Each artifact exposes one entry per resolved
//! token under the contract's namespace:
//!
//! * CSS: one `--{prefix}-{kebab-path}` custom property inside `:root`
//! * TypeScript: one accessor per token under a namespaced `as const` export
//! * Kotlin: one `val` per token inside a single theme object
//!
//! Emitters receive an immutable view of the resolved tree and never run
//! over a tree that failed the namespace gate; the driver enforces that
//! policy.

use dstok_contract::NamingContract;
use dstok_model::{LiteralValue, ResolvedTree};
use dstok_types::PlatformId;

/// One platform's artifact generator.
pub trait Emitter {
    fn platform(&self) -> PlatformId;

    /// Render the artifact text. Rendering is pure and infallible; anything
    /// that could fail (parsing, resolution, validation) happened upstream.
    fn emit(&self, tree: &ResolvedTree, contract: &NamingContract) -> String;
}

/// The emitter for a platform target.
pub fn emitter_for(platform: PlatformId) -> Box<dyn Emitter> {
    match platform {
        PlatformId::Web => Box::new(CssEmitter),
        PlatformId::Desktop => Box::new(TsEmitter),
        PlatformId::Mobile => Box::new(KotlinEmitter),
    }
}

/// Stylesheet artifact: custom properties in `:root`.
pub struct CssEmitter;

impl Emitter for CssEmitter {
    fn platform(&self) -> PlatformId {
        PlatformId::Web
    }

    fn emit(&self, tree: &ResolvedTree, contract: &NamingContract) -> String {
        let mut out = String::from(":root {\n");
        for token in tree.iter() {
            let name = contract.css_custom_property(&token.path);
            let value = token.value_for(self.platform());
            out.push_str(&format!("  {name}: {value};\n"));
        }
        out.push_str("}\n");
        out
    }
}

/// Typed-constants artifact: a namespaced `as const` export.
pub struct TsEmitter;

impl Emitter for TsEmitter {
    fn platform(&self) -> PlatformId {
        PlatformId::Desktop
    }

    fn emit(&self, tree: &ResolvedTree, contract: &NamingContract) -> String {
        let export_name = format!("{}Tokens", contract.required_prefix());
        let mut out = format!("export const {export_name} = {{\n");
        for token in tree.iter() {
            let key = token.path.join("-");
            out.push_str(&format!(
                "  \"{key}\": {},\n",
                ts_value(token.value_for(self.platform()))
            ));
        }
        out.push_str("} as const;\n");
        out
    }
}

/// Native theme artifact: one object holding every token.
pub struct KotlinEmitter;

impl Emitter for KotlinEmitter {
    fn platform(&self) -> PlatformId {
        PlatformId::Mobile
    }

    fn emit(&self, tree: &ResolvedTree, contract: &NamingContract) -> String {
        let object_name = format!("{}Theme", capitalize(contract.required_prefix()));
        let mut out = format!("object {object_name} {{\n");
        for token in tree.iter() {
            let name = constant_name(&token.path);
            match token.value_for(self.platform()) {
                LiteralValue::Num(n) => {
                    out.push_str(&format!("    const val {name}: Double = {n:?}\n"));
                }
                other => {
                    out.push_str(&format!(
                        "    const val {name}: String = \"{}\"\n",
                        escape(&other.to_string())
                    ));
                }
            }
        }
        out.push_str("}\n");
        out
    }
}

fn ts_value(value: &LiteralValue) -> String {
    match value {
        LiteralValue::Num(n) => format!("{n}"),
        other => format!("\"{}\"", escape(&other.to_string())),
    }
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn constant_name(path: &[String]) -> String {
    let name = path
        .iter()
        .map(|seg| seg.replace('-', "_").to_uppercase())
        .collect::<Vec<_>>()
        .join("_");
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{name}")
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dstok_model::{TokenTree, resolve_all};

    fn resolved(src: &str) -> ResolvedTree {
        resolve_all(&TokenTree::from_str(src).unwrap()).unwrap()
    }

    fn contract() -> NamingContract {
        NamingContract::default()
    }

    const SOURCE: &str = r##"{
        "color": { "primary": { "500": { "$type": "color", "$value": "#3b82f6" } } },
        "font": { "stack": { "$type": "fontFamily", "$value": ["Inter", "sans-serif"] } },
        "weight": { "bold": { "$type": "fontWeight", "$value": 700 } },
        "radius": { "card": {
            "$type": "dimension",
            "$value": "8px",
            "$platforms": { "mobile": "12px" }
        } }
    }"##;

    #[test]
    fn css_artifact_has_one_property_per_token() {
        let css = CssEmitter.emit(&resolved(SOURCE), &contract());
        assert!(css.starts_with(":root {\n"));
        assert!(css.contains("  --ds-color-primary-500: #3b82f6;\n"));
        assert!(css.contains("  --ds-font-stack: Inter, sans-serif;\n"));
        assert!(css.contains("  --ds-weight-bold: 700;\n"));
        assert!(css.contains("  --ds-radius-card: 8px;\n"));
        assert_eq!(css.matches(": ").count(), 4);
    }

    #[test]
    fn ts_artifact_exports_namespaced_constants() {
        let ts = TsEmitter.emit(&resolved(SOURCE), &contract());
        assert!(ts.starts_with("export const dsTokens = {\n"));
        assert!(ts.contains("\"color-primary-500\": \"#3b82f6\","));
        assert!(ts.contains("\"weight-bold\": 700,"));
        assert!(ts.ends_with("} as const;\n"));
    }

    #[test]
    fn kotlin_artifact_is_one_theme_object() {
        let kt = KotlinEmitter.emit(&resolved(SOURCE), &contract());
        assert!(kt.starts_with("object DsTheme {\n"));
        assert!(kt.contains("const val COLOR_PRIMARY_500: String = \"#3b82f6\""));
        assert!(kt.contains("const val WEIGHT_BOLD: Double = 700.0"));
        assert!(kt.ends_with("}\n"));
    }

    #[test]
    fn platform_overrides_replace_base_values() {
        let tree = resolved(SOURCE);
        let kt = KotlinEmitter.emit(&tree, &contract());
        assert!(kt.contains("RADIUS_CARD: String = \"12px\""));

        let css = CssEmitter.emit(&tree, &contract());
        assert!(css.contains("--ds-radius-card: 8px;"));
    }

    #[test]
    fn emitter_for_matches_builtin_targets() {
        for target in dstok_types::PlatformTarget::builtin() {
            assert_eq!(emitter_for(target.id).platform(), target.id);
        }
    }

    #[test]
    fn emission_order_is_deterministic() {
        let tree = resolved(SOURCE);
        assert_eq!(
            CssEmitter.emit(&tree, &contract()),
            CssEmitter.emit(&tree, &contract())
        );
    }
}

//! # dstok-validate
//!
//! **Tier 2 (Namespace Gate)**
//!
//! Checks every token in a parsed tree against the naming contract before
//! any emitter is allowed to run over it. The gate policy itself (refusing
//! to emit over a failing tree) is enforced by the driver; this crate only
//! produces the findings.

use dstok_contract::NamingContract;
use dstok_model::TokenTree;
use dstok_types::{Category, CollisionFinding, Severity};

/// Validate every token's canonical names against the contract.
///
/// Each offending token yields exactly one `Error`-severity `NameClash`
/// finding carrying the token path and the expected vs. actual form.
pub fn validate(tree: &TokenTree, contract: &NamingContract) -> Vec<CollisionFinding> {
    let mut findings = Vec::new();

    for token in tree.iter() {
        let custom_property = contract.css_custom_property(&token.path);
        let class = contract.css_class(&token.kebab_name());

        // One finding per token, even when both generated forms deviate;
        // both derive from the same path, so one rename fixes both.
        if !contract.matches_css_name(&custom_property) || !contract.matches_css_name(&class) {
            findings.push(
                CollisionFinding::new(
                    Category::NameClash,
                    Severity::Error,
                    format!(
                        "token `{}` generates a name outside the `{}` namespace contract",
                        token.path.join("."),
                        contract.required_prefix()
                    ),
                )
                .with_evidence(vec![
                    format!("token path: {}", token.path.join(".")),
                    format!("generated custom property: {custom_property}"),
                    format!(
                        "expected form: --{}-<lowercase-kebab-path>",
                        contract.required_prefix()
                    ),
                ])
                .with_remediation(vec![
                    "rename the token path segments to lowercase kebab-case".to_string(),
                    "path segments may only contain [a-z0-9]".to_string(),
                ]),
            );
        }
    }

    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use dstok_model::TokenTree;

    fn contract() -> NamingContract {
        NamingContract::default()
    }

    #[test]
    fn compliant_tree_produces_no_findings() {
        let tree = TokenTree::from_str(
            r##"{ "color": { "primary": { "500": { "$type": "color", "$value": "#3b82f6" } } },
                 "spacing": { "4": { "$type": "dimension", "$value": "16px" } } }"##,
        )
        .unwrap();
        assert!(validate(&tree, &contract()).is_empty());
    }

    #[test]
    fn uppercase_segment_yields_exactly_one_error_finding() {
        let tree = TokenTree::from_str(
            r##"{ "color": { "Primary": { "$type": "color", "$value": "#000" } },
                 "spacing": { "4": { "$type": "dimension", "$value": "16px" } } }"##,
        )
        .unwrap();

        let findings = validate(&tree, &contract());
        assert_eq!(findings.len(), 1);
        let finding = &findings[0];
        assert_eq!(finding.category, Category::NameClash);
        assert_eq!(finding.severity, Severity::Error);
        assert!(finding.message.contains("color.Primary"));
        assert!(
            finding
                .evidence
                .iter()
                .any(|e| e.contains("--ds-color-Primary"))
        );
    }

    #[test]
    fn each_offending_token_gets_its_own_finding() {
        let tree = TokenTree::from_str(
            r##"{ "Bad_One": { "$type": "color", "$value": "#000" },
                 "bad two": { "$type": "color", "$value": "#111" } }"##,
        )
        .unwrap();
        assert_eq!(validate(&tree, &contract()).len(), 2);
    }

    #[test]
    fn findings_follow_deterministic_tree_order() {
        let tree = TokenTree::from_str(
            r##"{ "Zeta": { "$type": "color", "$value": "#000" },
                 "Alpha": { "$type": "color", "$value": "#111" } }"##,
        )
        .unwrap();
        let findings = validate(&tree, &contract());
        assert!(findings[0].message.contains("Alpha"));
        assert!(findings[1].message.contains("Zeta"));
    }
}

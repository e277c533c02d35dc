//! Stylesheet namespace checker.
//!
//! Scans generated stylesheet text for custom-property declarations and class
//! selectors outside the required prefix. The Namespace Validator already
//! gates the token tree; this catches hand-edited overrides and foreign rules
//! appended to the artifact after generation. Findings are line-addressed.
//!
//! Conditional group rules (`@media`, `@supports`) are descended into, since
//! their bodies hold further style rules. Declaration-block contents are not:
//! dotted tokens there (`url(img.sprite.png)`) are values, not selectors.

use dstok_contract::{NamingContract, class_names, custom_property_declarations};
use dstok_types::{Category, CollisionFinding, Severity};

/// Check one stylesheet artifact. `label` is used in evidence lines
/// (typically the file path).
pub fn check_stylesheet(
    label: &str,
    text: &str,
    contract: &NamingContract,
) -> Vec<CollisionFinding> {
    let mut findings = Vec::new();
    // One entry per open block: true for conditional group rules (@media,
    // @supports, ...) whose bodies hold further rules, false for declaration
    // blocks whose bodies hold only property: value pairs.
    let mut blocks: Vec<bool> = Vec::new();
    let mut selector_buf = String::new();
    let mut in_comment = false;

    for (idx, raw_line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = strip_comments(raw_line, &mut in_comment);

        for name in custom_property_declarations(&line) {
            if !contract.matches_css_name(&name) {
                findings.push(property_finding(label, line_no, &name, contract));
            }
        }

        let mut in_declarations = blocks.contains(&false);
        for ch in line.chars() {
            match ch {
                '{' => {
                    if in_declarations {
                        blocks.push(false);
                    } else {
                        let group = selector_buf.trim_start().starts_with('@');
                        if !group {
                            for class in class_names(&selector_buf) {
                                if !contract.matches_css_name(&class) {
                                    findings.push(selector_finding(
                                        label, line_no, &class, contract,
                                    ));
                                }
                            }
                        }
                        blocks.push(group);
                        selector_buf.clear();
                    }
                    in_declarations = blocks.contains(&false);
                }
                '}' => {
                    blocks.pop();
                    selector_buf.clear();
                    in_declarations = blocks.contains(&false);
                }
                // An at-rule terminated without a block (@import ...;).
                ';' if !in_declarations => selector_buf.clear(),
                _ if !in_declarations => selector_buf.push(ch),
                _ => {}
            }
        }
        if !in_declarations {
            selector_buf.push(' ');
        }
    }

    findings
}

fn strip_comments(line: &str, in_comment: &mut bool) -> String {
    let mut out = String::with_capacity(line.len());
    let mut chars = line.chars().peekable();
    while let Some(ch) = chars.next() {
        if *in_comment {
            if ch == '*' && chars.peek() == Some(&'/') {
                chars.next();
                *in_comment = false;
            }
        } else if ch == '/' && chars.peek() == Some(&'*') {
            chars.next();
            *in_comment = true;
        } else {
            out.push(ch);
        }
    }
    out
}

fn property_finding(
    label: &str,
    line_no: usize,
    name: &str,
    contract: &NamingContract,
) -> CollisionFinding {
    CollisionFinding::new(
        Category::NameClash,
        Severity::Error,
        format!("custom property `{name}` is outside the `--{}-` namespace", contract.required_prefix()),
    )
    .with_evidence(vec![format!("{label}:{line_no}: {name}")])
    .with_remediation(vec![format!(
        "rename to `--{}-{}` or remove the override",
        contract.required_prefix(),
        name.trim_start_matches('-')
    )])
}

fn selector_finding(
    label: &str,
    line_no: usize,
    class: &str,
    contract: &NamingContract,
) -> CollisionFinding {
    CollisionFinding::new(
        Category::NameClash,
        Severity::Error,
        format!("class selector `.{class}` is outside the `{}-` namespace", contract.required_prefix()),
    )
    .with_evidence(vec![format!("{label}:{line_no}: .{class}")])
    .with_remediation(vec![format!(
        "prefix the class as `.{}-{class}` to avoid utility-framework clashes",
        contract.required_prefix()
    )])
}

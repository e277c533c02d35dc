//! Running the static checkers twice over unchanged inputs must yield
//! byte-identical serialized reports: no hidden state, no ordering drift.

use std::collections::BTreeSet;

use dstok_check::{ManifestFile, PortEntry, check_bundler, check_ports, check_stylesheet};
use dstok_contract::NamingContract;
use dstok_types::CollisionReport;

const STYLESHEET: &str = ":root {\n  --ds-color-bg: #fff;\n  --brand-accent: #f00;\n}\n.legacy { color: red; }\n";

const BUNDLER_CONFIG: &str = "module.exports = { resolver: {} };";

fn run_once() -> String {
    let contract = NamingContract::default();
    let allowed: BTreeSet<u16> = [6006, 7007, 6008].into_iter().collect();

    let entries = vec![
        PortEntry {
            path: "docs/web.toml".into(),
            required_port: 6006,
            text: "port = 9000".into(),
        },
        PortEntry {
            path: "docs/mobile.toml".into(),
            required_port: 7007,
            text: "port = 9000".into(),
        },
    ];
    let manifests = vec![
        ManifestFile {
            path: "packages/widgets/package.json".into(),
            text: r#"{ "name": "widgets" }"#.into(),
        },
        ManifestFile {
            path: "packages/tokens/package.json".into(),
            text: r#"{ "name": "@ds/tokens" }"#.into(),
        },
    ];

    let mut findings = check_stylesheet("tokens.css", STYLESHEET, &contract);
    findings.extend(check_ports(&entries, &allowed));
    findings.extend(check_bundler(
        "metro.config.js",
        BUNDLER_CONFIG,
        &manifests,
        &contract,
    ));

    let report = CollisionReport::from_findings(findings);
    serde_json::to_string_pretty(&report).unwrap()
}

#[test]
fn repeated_runs_serialize_identically() {
    let first = run_once();
    let second = run_once();
    assert_eq!(first, second);
    assert!(first.contains("\"is_valid\": false"));
}

use dstok_model::{LiteralValue, Resolver, TokenTree, resolve_all};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Strategies: token names, literal values, alias-free trees
// ---------------------------------------------------------------------------

fn name_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9]{0,7}"
}

fn literal_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "#3b82f6".to_string(),
        "#111827".to_string(),
        "16px".to_string(),
        "0.25rem".to_string(),
        "1px solid".to_string(),
    ])
}

fn flat_tree_strategy() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::btree_map(name_strategy(), literal_strategy(), 1..8)
        .prop_map(|m| m.into_iter().collect())
}

fn source_for(entries: &[(String, String)]) -> String {
    let body: Vec<String> = entries
        .iter()
        .map(|(name, value)| format!("\"{name}\": {{ \"$type\": \"color\", \"$value\": \"{value}\" }}"))
        .collect();
    format!("{{ {} }}", body.join(", "))
}

// ---------------------------------------------------------------------------
// Property: resolution is the identity on alias-free trees
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn resolve_is_identity_without_aliases(entries in flat_tree_strategy()) {
        let tree = TokenTree::from_str(&source_for(&entries)).unwrap();
        let resolved = resolve_all(&tree).unwrap();

        prop_assert_eq!(resolved.len(), entries.len());
        for (name, value) in &entries {
            let token = resolved.get(&[name.clone()]).unwrap();
            prop_assert_eq!(&token.value, &LiteralValue::Str(value.clone()));
        }
    }
}

// ---------------------------------------------------------------------------
// Property: a cycle of any length fails from every starting token
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn cycles_fail_from_every_start(len in 1usize..6) {
        let names: Vec<String> = (0..len).map(|i| format!("t{i}")).collect();
        let body: Vec<String> = (0..len)
            .map(|i| {
                let next = &names[(i + 1) % len];
                format!("\"{}\": {{ \"$type\": \"color\", \"$value\": \"{{{next}}}\" }}", names[i])
            })
            .collect();
        let tree = TokenTree::from_str(&format!("{{ {} }}", body.join(", "))).unwrap();

        for name in &names {
            let err = Resolver::new(&tree).resolve(&[name.clone()]).unwrap_err();
            prop_assert!(
                matches!(err, dstok_model::ResolveError::Cycle { .. }),
                "start={name} err={err}"
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Property: resolve_all is deterministic across runs
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn resolve_all_is_deterministic(entries in flat_tree_strategy()) {
        let src = source_for(&entries);
        let first = resolve_all(&TokenTree::from_str(&src).unwrap()).unwrap();
        let second = resolve_all(&TokenTree::from_str(&src).unwrap()).unwrap();
        prop_assert_eq!(first, second);
    }
}

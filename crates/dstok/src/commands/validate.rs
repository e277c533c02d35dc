//! Handler for the `dstok validate` command.

use anyhow::{Context, Result, bail};
use dstok_model::{TokenTree, resolve_all};
use dstok_report::aggregate;

use crate::cli::ValidateArgs;
use crate::commands::{finish, load_contract};

pub(crate) fn handle(args: ValidateArgs) -> Result<()> {
    let contract = load_contract(&args.contract)?;
    let tree = TokenTree::from_file(&args.source)
        .with_context(|| format!("failed to load token source {}", args.source.display()))?;

    // Resolution failures are fatal, but every one of them is reported in a
    // single pass before aborting.
    if let Err(errors) = resolve_all(&tree) {
        for error in &errors {
            eprintln!("resolution error: {error}");
        }
        bail!(
            "token source {} has {} resolution error(s)",
            args.source.display(),
            errors.len()
        );
    }

    let findings = dstok_validate::validate(&tree, &contract);
    let report = aggregate([findings]);
    finish(&report, args.format)
}

//! Handler for the `dstok emit` command.
//!
//! Emission is gated: a tree that fails schema parsing, alias resolution, or
//! the namespace check never reaches an emitter.

use anyhow::{Context, Result, bail};
use dstok_emit::emitter_for;
use dstok_model::{TokenTree, resolve_all};
use dstok_report::render_text;
use dstok_types::{CollisionReport, PlatformId, PlatformTarget};

use crate::cli::EmitArgs;
use crate::commands::load_contract;

pub(crate) fn handle(args: EmitArgs) -> Result<()> {
    let contract = load_contract(&args.contract)?;
    let tree = TokenTree::from_file(&args.source)
        .with_context(|| format!("failed to load token source {}", args.source.display()))?;

    let resolved = match resolve_all(&tree) {
        Ok(resolved) => resolved,
        Err(errors) => {
            for error in &errors {
                eprintln!("resolution error: {error}");
            }
            bail!("refusing to emit: {} resolution error(s)", errors.len());
        }
    };

    let findings = dstok_validate::validate(&tree, &contract);
    if !findings.is_empty() {
        print!("{}", render_text(&CollisionReport::from_findings(findings)));
        bail!("refusing to emit over a tree that fails the namespace gate");
    }

    let platform: PlatformId = args.platform.into();
    let target = PlatformTarget::builtin()
        .into_iter()
        .find(|t| t.id == platform)
        .expect("every platform has a builtin target");

    let artifact = emitter_for(platform).emit(&resolved, &contract);
    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("failed to create output dir {}", args.out.display()))?;
    let out_path = args.out.join(&target.output_path_pattern);
    std::fs::write(&out_path, &artifact)
        .with_context(|| format!("failed to write {}", out_path.display()))?;

    println!(
        "wrote {} ({} token(s), platform {platform})",
        out_path.display(),
        resolved.len()
    );
    Ok(())
}

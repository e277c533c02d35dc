//! Handler for the `dstok check` command.

use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use dstok_check::{ManifestFile, PortEntry, check_bundler, check_ports, check_stylesheet};
use dstok_report::aggregate;
use dstok_types::CollisionFinding;
use serde::Deserialize;

use crate::cli::CheckArgs;
use crate::commands::{finish, load_contract};

/// Ports manifest: the statically known mapping from each documentation
/// server's configuration file to its required port.
#[derive(Debug, Deserialize)]
struct PortsManifest {
    allowed: Vec<u16>,
    #[serde(default)]
    servers: Vec<ServerEntry>,
}

#[derive(Debug, Deserialize)]
struct ServerEntry {
    config: PathBuf,
    port: u16,
}

pub(crate) fn handle(args: CheckArgs) -> Result<()> {
    if args.stylesheet.is_none()
        && args.ports.is_none()
        && args.bundler.is_none()
        && args.manifests.is_empty()
    {
        bail!(
            "nothing to check; pass at least one of --stylesheet, --ports, --bundler, --manifest"
        );
    }

    let contract = load_contract(&args.contract)?;
    let mut results: Vec<Vec<CollisionFinding>> = Vec::new();

    if let Some(path) = &args.stylesheet {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read stylesheet {}", path.display()))?;
        results.push(check_stylesheet(&path.display().to_string(), &text, &contract));
    }

    if let Some(path) = &args.ports {
        let manifest_text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read ports manifest {}", path.display()))?;
        let manifest: PortsManifest = toml::from_str(&manifest_text)
            .with_context(|| format!("failed to parse ports manifest {}", path.display()))?;

        let allowed: BTreeSet<u16> = manifest.allowed.iter().copied().collect();
        let mut entries = Vec::with_capacity(manifest.servers.len());
        for server in &manifest.servers {
            let text = std::fs::read_to_string(&server.config).with_context(|| {
                format!("failed to read server config {}", server.config.display())
            })?;
            entries.push(PortEntry {
                path: server.config.display().to_string(),
                required_port: server.port,
                text,
            });
        }
        results.push(check_ports(&entries, &allowed));
    }

    if args.bundler.is_some() || !args.manifests.is_empty() {
        let (label, config_text) = match &args.bundler {
            Some(path) => {
                let text = std::fs::read_to_string(path).with_context(|| {
                    format!("failed to read bundler config {}", path.display())
                })?;
                (path.display().to_string(), text)
            }
            None => bail!("--manifest requires --bundler (manifests are checked against it)"),
        };

        let mut manifests = Vec::with_capacity(args.manifests.len());
        for path in &args.manifests {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read manifest {}", path.display()))?;
            manifests.push(ManifestFile {
                path: path.display().to_string(),
                text,
            });
        }
        results.push(check_bundler(&label, &config_text, &manifests, &contract));
    }

    let report = aggregate(results);
    finish(&report, args.format)
}

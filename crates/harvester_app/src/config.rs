use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use encoding_rs::Encoding;
use harvester_core::ExpectedStatusMap;
use harvester_engine::{HarvestSettings, Mode};

use crate::cli::{Cli, OutputArg};

#[derive(Debug, Clone)]
pub enum OutputTarget {
    Stdout,
    Pretty,
    File {
        dir: PathBuf,
        encoding: &'static Encoding,
    },
}

/// Everything a run needs, resolved and validated from the command line.
#[derive(Debug, Clone)]
pub struct HarvestConfig {
    pub mode: Mode,
    pub clear_cache: bool,
    pub cache_dir: PathBuf,
    pub output: OutputTarget,
    pub settings: HarvestSettings,
}

impl HarvestConfig {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let expected_statuses = match &cli.expected_statuses {
            Some(path) => load_expected_statuses(path)?,
            None => ExpectedStatusMap::pep_defaults(),
        };

        let output = match cli.output {
            None => OutputTarget::Stdout,
            Some(OutputArg::Pretty) => OutputTarget::Pretty,
            Some(OutputArg::File) => OutputTarget::File {
                dir: cli.results_dir.clone(),
                encoding: output_encoding(&cli.encoding)?,
            },
        };

        Ok(Self {
            mode: cli.mode.into(),
            clear_cache: cli.clear_cache,
            cache_dir: cli.cache_dir.clone(),
            output,
            settings: HarvestSettings {
                docs_url: cli.docs_url.clone(),
                pep_url: cli.pep_url.clone(),
                downloads_dir: cli.downloads_dir.clone(),
                jobs: usize::from(cli.jobs),
                expected_statuses,
            },
        })
    }
}

/// Resolves `label` to an encoding that output can actually be written in.
/// UTF-16 and the replacement encoding only decode, so they are rejected.
pub fn output_encoding(label: &str) -> Result<&'static Encoding> {
    let encoding = Encoding::for_label(label.trim().as_bytes())
        .with_context(|| format!("unknown output encoding {label:?}"))?;
    if encoding.output_encoding() != encoding {
        bail!(
            "cannot write output as {}; it is only supported for reading",
            encoding.name()
        );
    }
    Ok(encoding)
}

/// Reads `{"F": ["Final"], "": ["Draft", "Active"], ...}`.
pub fn load_expected_statuses(path: &Path) -> Result<ExpectedStatusMap> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading expected statuses from {}", path.display()))?;
    let raw: BTreeMap<String, Vec<String>> = serde_json::from_str(&text)
        .with_context(|| format!("parsing expected statuses in {}", path.display()))?;
    if raw.is_empty() {
        bail!("expected statuses in {} are empty", path.display());
    }
    if let Some((code, _)) = raw.iter().find(|(_, statuses)| statuses.is_empty()) {
        bail!(
            "preview code {code:?} in {} has no accepted statuses",
            path.display()
        );
    }
    Ok(raw.into_iter().collect())
}

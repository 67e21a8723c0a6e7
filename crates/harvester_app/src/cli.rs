//! Command-line surface of the `harvester` binary.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use harvester_engine::{Mode, DEFAULT_DOCS_URL, DEFAULT_PEP_URL};

#[derive(Debug, Parser)]
#[command(
    name = "harvester",
    version,
    about = "Harvest the Python documentation and reconcile PEP statuses"
)]
pub struct Cli {
    /// What to harvest.
    #[arg(value_enum)]
    pub mode: ModeArg,

    /// Empty the response cache before fetching.
    #[arg(short = 'c', long = "clear-cache")]
    pub clear_cache: bool,

    /// How to present results (plain lines on stdout when omitted).
    #[arg(short = 'o', long = "output", value_enum)]
    pub output: Option<OutputArg>,

    /// Encoding of files written with `--output file`.
    #[arg(long = "encoding", default_value = "utf-8")]
    pub encoding: String,

    /// Maximum number of detail pages fetched at once.
    #[arg(
        short = 'j',
        long = "jobs",
        default_value_t = 4,
        value_parser = clap::value_parser!(u16).range(1..=64)
    )]
    pub jobs: u16,

    #[arg(long = "docs-url", value_name = "URL", default_value = DEFAULT_DOCS_URL)]
    pub docs_url: String,

    #[arg(long = "pep-url", value_name = "URL", default_value = DEFAULT_PEP_URL)]
    pub pep_url: String,

    /// JSON object mapping preview codes to accepted statuses.
    #[arg(long = "expected-statuses", value_name = "PATH")]
    pub expected_statuses: Option<PathBuf>,

    #[arg(long = "cache-dir", value_name = "DIR", default_value = ".harvester_cache")]
    pub cache_dir: PathBuf,

    #[arg(long = "results-dir", value_name = "DIR", default_value = "results")]
    pub results_dir: PathBuf,

    #[arg(long = "downloads-dir", value_name = "DIR", default_value = "downloads")]
    pub downloads_dir: PathBuf,

    #[arg(long = "log-dir", value_name = "DIR", default_value = "logs")]
    pub log_dir: PathBuf,

    /// Log debug output.
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    WhatsNew,
    LatestVersions,
    Download,
    Pep,
}

impl From<ModeArg> for Mode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::WhatsNew => Mode::WhatsNew,
            ModeArg::LatestVersions => Mode::LatestVersions,
            ModeArg::Download => Mode::Download,
            ModeArg::Pep => Mode::Pep,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputArg {
    Pretty,
    File,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mode_and_flags() {
        let cli = Cli::try_parse_from([
            "harvester",
            "latest-versions",
            "-c",
            "-o",
            "file",
            "--encoding",
            "windows-1251",
        ])
        .unwrap();
        assert_eq!(cli.mode, ModeArg::LatestVersions);
        assert!(cli.clear_cache);
        assert_eq!(cli.output, Some(OutputArg::File));
        assert_eq!(cli.encoding, "windows-1251");
        assert_eq!(cli.jobs, 4);
        assert_eq!(cli.docs_url, DEFAULT_DOCS_URL);
    }

    #[test]
    fn every_mode_name_is_accepted() {
        for (name, mode) in [
            ("whats-new", Mode::WhatsNew),
            ("latest-versions", Mode::LatestVersions),
            ("download", Mode::Download),
            ("pep", Mode::Pep),
        ] {
            let cli = Cli::try_parse_from(["harvester", name]).unwrap();
            assert_eq!(Mode::from(cli.mode), mode);
            assert_eq!(mode.as_str(), name);
        }
    }

    #[test]
    fn rejects_unknown_mode_and_zero_jobs() {
        assert!(Cli::try_parse_from(["harvester", "crawl"]).is_err());
        assert!(Cli::try_parse_from(["harvester", "pep", "--jobs", "0"]).is_err());
    }

    #[test]
    fn definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}

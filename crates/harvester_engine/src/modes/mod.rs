pub mod download;
pub mod latest_versions;
pub mod pep;
pub mod whats_new;

use std::path::PathBuf;

use harvester_core::ExpectedStatusMap;

use crate::error::HarvestError;
use crate::{Fetcher, HarvestOutcome, Mode, ProgressSink};

pub const DEFAULT_DOCS_URL: &str = "https://docs.python.org/3/";
pub const DEFAULT_PEP_URL: &str = "https://peps.python.org/";

#[derive(Debug, Clone)]
pub struct HarvestSettings {
    pub docs_url: String,
    pub pep_url: String,
    pub downloads_dir: PathBuf,
    /// Upper bound on concurrent detail-page fetches.
    pub jobs: usize,
    pub expected_statuses: ExpectedStatusMap,
}

impl Default for HarvestSettings {
    fn default() -> Self {
        Self {
            docs_url: DEFAULT_DOCS_URL.to_string(),
            pep_url: DEFAULT_PEP_URL.to_string(),
            downloads_dir: PathBuf::from("downloads"),
            jobs: 4,
            expected_statuses: ExpectedStatusMap::pep_defaults(),
        }
    }
}

pub async fn run_mode(
    mode: Mode,
    fetcher: &dyn Fetcher,
    settings: &HarvestSettings,
    progress: &dyn ProgressSink,
) -> Result<HarvestOutcome, HarvestError> {
    let outcome = match mode {
        Mode::WhatsNew => {
            whats_new::whats_new(fetcher, &settings.docs_url, settings.jobs, progress)
                .await?
                .map(HarvestOutcome::Rows)
        }
        Mode::LatestVersions => latest_versions::latest_versions(fetcher, &settings.docs_url)
            .await?
            .map(HarvestOutcome::Rows),
        Mode::Download => download::download(fetcher, &settings.docs_url, &settings.downloads_dir)
            .await?
            .map(|(path, bytes)| HarvestOutcome::Downloaded { path, bytes }),
        Mode::Pep => match pep::reconcile(
            fetcher,
            &settings.pep_url,
            &settings.expected_statuses,
            settings.jobs,
            progress,
        )
        .await?
        {
            Some(report) => Some(HarvestOutcome::Rows(report.to_result_set()?)),
            None => None,
        },
    };
    Ok(outcome.unwrap_or(HarvestOutcome::Nothing))
}

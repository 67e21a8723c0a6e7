use harvester_core::{LocateError, ResultSetError};

use crate::persist::PersistError;
use crate::FetchError;

/// Failures that abort a harvesting run.
#[derive(Debug, thiserror::Error)]
pub enum HarvestError {
    #[error("page structure changed at {url}: {source}")]
    Locate {
        url: String,
        #[source]
        source: LocateError,
    },
    #[error("no list containing {marker:?} at {url}")]
    MarkerListNotFound { url: String, marker: String },
    #[error("preview codes missing from the expected-status map: {}", .codes.join(", "))]
    UnknownPreviewCodes { codes: Vec<String> },
    #[error("cannot resolve {reference:?} against {base}: {message}")]
    InvalidUrl {
        base: String,
        reference: String,
        message: String,
    },
    #[error("download of {url} failed: {source}")]
    Download {
        url: String,
        #[source]
        source: FetchError,
    },
    #[error(transparent)]
    ResultSet(#[from] ResultSetError),
    #[error(transparent)]
    Persist(#[from] PersistError),
}

pub(crate) trait LocateContext<T> {
    fn at(self, url: &str) -> Result<T, HarvestError>;
}

impl<T> LocateContext<T> for Result<T, LocateError> {
    fn at(self, url: &str) -> Result<T, HarvestError> {
        self.map_err(|source| HarvestError::Locate {
            url: url.to_string(),
            source,
        })
    }
}

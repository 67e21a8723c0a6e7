//! Harvester engine: fetching, caching, parsing and the per-mode extractors.
mod cache;
mod decode;
mod error;
mod fetch;
mod filename;
mod page;
mod parse;
mod persist;
mod progress;
mod types;

pub mod modes;

pub use cache::{normalize_url, CacheError, CachedFetcher, DiskCache};
pub use decode::{decode_html, DecodeError, DecodedHtml};
pub use error::HarvestError;
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher};
pub use filename::{cache_key, file_name_from_url, sanitize_file_name};
pub use modes::pep::{PepReport, SummaryEntry};
pub use modes::{run_mode, HarvestSettings, DEFAULT_DOCS_URL, DEFAULT_PEP_URL};
pub use page::fetch_document;
pub use parse::parse_document;
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use progress::{NoProgress, ProgressSink};
pub use types::{FailureKind, FetchError, FetchMetadata, FetchOutput, HarvestOutcome, Mode};

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use engine_logging::engine_info;
use harvester_core::{AttrFilter, Document};
use regex::Regex;
use url::Url;

use crate::error::{HarvestError, LocateContext};
use crate::filename::file_name_from_url;
use crate::page::{fetch_document, resolve};
use crate::persist::ensure_output_dir;
use crate::Fetcher;

static PDF_A4_ARCHIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r".+pdf-a4\.zip$").expect("static regex"));

/// Absolute URL of the A4 PDF archive listed on the downloads page.
pub fn archive_url(page: &Document, page_url: &str) -> Result<Url, HarvestError> {
    let main = page
        .locate("div", &AttrFilter::any().exact("role", "main"))
        .at(page_url)?;
    let table = main
        .locate("table", &AttrFilter::any().exact("class", "docutils"))
        .at(page_url)?;
    let link = table
        .locate(
            "a",
            &AttrFilter::any().pattern("href", PDF_A4_ARCHIVE.clone()),
        )
        .at(page_url)?;
    resolve(page_url, link.attr("href").unwrap_or_default())
}

/// Saves the archive into `downloads_dir`. `Ok(None)` when the downloads page
/// cannot be fetched.
pub async fn download(
    fetcher: &dyn Fetcher,
    docs_url: &str,
    downloads_dir: &Path,
) -> Result<Option<(PathBuf, u64)>, HarvestError> {
    let page_url = resolve(docs_url, "download.html")?.to_string();
    let Some(page) = fetch_document(fetcher, &page_url).await else {
        return Ok(None);
    };
    let archive = archive_url(&page, &page_url)?;
    let file_name = file_name_from_url(&archive).ok_or_else(|| HarvestError::InvalidUrl {
        base: page_url.clone(),
        reference: archive.to_string(),
        message: "url has no file name".to_string(),
    })?;

    ensure_output_dir(downloads_dir)?;
    let target = downloads_dir.join(file_name);
    let bytes = fetcher
        .download(archive.as_str(), &target)
        .await
        .map_err(|source| HarvestError::Download {
            url: archive.to_string(),
            source,
        })?;
    engine_info!("Archive downloaded and saved to {:?} ({} bytes)", target, bytes);
    Ok(Some((target, bytes)))
}

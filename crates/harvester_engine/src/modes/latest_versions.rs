use harvester_core::{find_list_containing, parse_version_link, AttrFilter, Document, ResultSet, Row};

use crate::error::{HarvestError, LocateContext};
use crate::page::fetch_document;
use crate::Fetcher;

pub const ALL_VERSIONS_MARKER: &str = "All versions";

pub fn header() -> Row {
    Row::new(["Link to documentation", "Version", "Status"])
}

/// Rows for every link of the sidebar's version switcher.
pub fn version_rows(page: &Document, page_url: &str) -> Result<ResultSet, HarvestError> {
    let sidebar = page
        .locate("div", &AttrFilter::any().exact("class", "sphinxsidebarwrapper"))
        .at(page_url)?;
    let lists = sidebar.find_all("ul", &AttrFilter::any());
    let versions = find_list_containing(lists, ALL_VERSIONS_MARKER).ok_or_else(|| {
        HarvestError::MarkerListNotFound {
            url: page_url.to_string(),
            marker: ALL_VERSIONS_MARKER.to_string(),
        }
    })?;

    let mut results = ResultSet::new(header());
    for anchor in versions.find_all("a", &AttrFilter::any().present("href")) {
        let link = parse_version_link(&anchor.text());
        results.push(Row::new([
            anchor.attr("href").unwrap_or_default().to_string(),
            link.version,
            link.status,
        ]))?;
    }
    Ok(results)
}

pub async fn latest_versions(
    fetcher: &dyn Fetcher,
    docs_url: &str,
) -> Result<Option<ResultSet>, HarvestError> {
    let Some(page) = fetch_document(fetcher, docs_url).await else {
        return Ok(None);
    };
    version_rows(&page, docs_url).map(Some)
}

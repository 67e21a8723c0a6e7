use engine_logging::engine_info;
use futures_util::{stream, StreamExt};
use harvester_core::{AttrFilter, Document, LocateError, ResultSet, Row};

use crate::error::{HarvestError, LocateContext};
use crate::page::{fetch_document, resolve};
use crate::{Fetcher, ProgressSink};

pub fn header() -> Row {
    Row::new(["Link to article", "Title", "Editor, author"])
}

/// Absolute links of the top-level entries of the "What's New" table of contents.
pub fn article_links(index: &Document, index_url: &str) -> Result<Vec<String>, HarvestError> {
    let section = index
        .locate("section", &AttrFilter::any().exact("id", "what-s-new-in-python"))
        .at(index_url)?;
    let toc = section
        .locate("div", &AttrFilter::any().exact("class", "toctree-wrapper"))
        .at(index_url)?;

    let mut links = Vec::new();
    for item in toc.find_all("li", &AttrFilter::any().exact("class", "toctree-l1")) {
        let anchor = item
            .locate("a", &AttrFilter::any().present("href"))
            .at(index_url)?;
        let href = anchor.attr("href").unwrap_or_default();
        links.push(resolve(index_url, href)?.to_string());
    }
    Ok(links)
}

/// Title and flattened editor block of one article.
pub fn article_fields(page: &Document) -> Result<(String, String), LocateError> {
    let title = page.locate("h1", &AttrFilter::any())?.text();
    let editors = page.locate("dl", &AttrFilter::any())?.text().replace('\n', " ");
    Ok((title.trim().to_string(), editors.trim().to_string()))
}

pub async fn whats_new(
    fetcher: &dyn Fetcher,
    docs_url: &str,
    jobs: usize,
    progress: &dyn ProgressSink,
) -> Result<Option<ResultSet>, HarvestError> {
    let index_url = resolve(docs_url, "whatsnew/")?.to_string();
    let Some(index) = fetch_document(fetcher, &index_url).await else {
        return Ok(None);
    };
    let links = article_links(&index, &index_url)?;
    engine_info!("Found {} release notes", links.len());

    progress.begin("whats-new", links.len());
    let pages: Vec<_> = stream::iter(&links)
        .map(move |link| async move {
            let fields = fetch_document(fetcher, link)
                .await
                .map(|page| article_fields(&page));
            (link, fields)
        })
        .buffered(jobs.max(1))
        .inspect(|_| progress.advance())
        .collect()
        .await;
    progress.finish();

    let mut results = ResultSet::new(header());
    for (link, fields) in pages {
        let Some(fields) = fields else {
            continue;
        };
        let (title, editors) = fields.at(link)?;
        results.push(Row::new([link.clone(), title, editors]))?;
    }
    Ok(Some(results))
}

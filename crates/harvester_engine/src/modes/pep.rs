//! Reconciles the PEP numerical index against the individual PEP pages.
//!
//! Each index row carries an abbreviation such as `SF` whose second letter
//! previews the PEP's status. The authoritative status lives in the header
//! field list of the PEP's own page; the two are compared through an
//! [`ExpectedStatusMap`].

use engine_logging::{engine_info, engine_warn};
use futures_util::{stream, StreamExt};
use harvester_core::{
    preview_code, AttrFilter, Document, ExpectedStatusMap, LocateError, ResultSet,
    ResultSetError, StatusLedger, StatusMismatch,
};

use crate::error::{HarvestError, LocateContext};
use crate::page::{fetch_document, resolve};
use crate::{Fetcher, ProgressSink};

const STATUS_LABEL: &str = "Status";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryEntry {
    pub code: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PepReport {
    /// Data rows found in the index table.
    pub summary_rows: usize,
    pub ledger: StatusLedger,
    pub mismatches: Vec<StatusMismatch>,
    /// Detail pages that could not be fetched.
    pub failed: Vec<String>,
}

impl PepReport {
    /// Rows whose detail page was fetched and counted.
    pub fn processed(&self) -> usize {
        self.ledger.total()
    }

    pub fn to_result_set(&self) -> Result<ResultSet, ResultSetError> {
        self.ledger.to_result_set()
    }
}

/// Preview code and absolute detail URL for every row of the index table.
pub fn summary_entries(index: &Document, index_url: &str) -> Result<Vec<SummaryEntry>, HarvestError> {
    let section = index
        .locate("section", &AttrFilter::any().exact("id", "numerical-index"))
        .at(index_url)?;
    let tbody = section.locate("tbody", &AttrFilter::any()).at(index_url)?;
    let link_filter = AttrFilter::any()
        .exact("class", "pep reference internal")
        .present("href");

    let mut entries = Vec::new();
    for row in tbody.find_all("tr", &AttrFilter::any()) {
        let abbr = row.locate("abbr", &AttrFilter::any()).at(index_url)?;
        let link = row.locate("a", &link_filter).at(index_url)?;
        let href = link.attr("href").unwrap_or_default();
        entries.push(SummaryEntry {
            code: preview_code(&abbr.text()),
            url: resolve(index_url, href)?.to_string(),
        });
    }
    Ok(entries)
}

/// The `Status` value from a PEP page's header field list.
pub fn detail_status(page: &Document) -> Result<String, LocateError> {
    let fields = page.locate(
        "dl",
        &AttrFilter::any().exact("class", "rfc2822 field-list simple"),
    )?;
    let mut items = fields.child_elements();
    while let Some(item) = items.next() {
        if item.tag() == "dt" && is_status_label(&item.own_text(), &item.text()) {
            if let Some(value) = items.find(|sibling| sibling.tag() == "dd") {
                return Ok(value.text().trim().to_string());
            }
            break;
        }
    }
    Err(LocateError::NodeNotFound {
        tag: "dd".to_string(),
        filter: format!("{{after dt {STATUS_LABEL:?}}}"),
    })
}

fn is_status_label(own: &str, full: &str) -> bool {
    [own, full]
        .iter()
        .any(|label| label.trim().trim_end_matches(':').trim() == STATUS_LABEL)
}

/// Walks the index, fetches up to `jobs` detail pages at a time and tallies
/// their statuses. `Ok(None)` when the index itself cannot be fetched.
pub async fn reconcile(
    fetcher: &dyn Fetcher,
    index_url: &str,
    expected: &ExpectedStatusMap,
    jobs: usize,
    progress: &dyn ProgressSink,
) -> Result<Option<PepReport>, HarvestError> {
    let Some(index) = fetch_document(fetcher, index_url).await else {
        return Ok(None);
    };
    let entries = summary_entries(&index, index_url)?;
    engine_info!("PEP index lists {} entries", entries.len());

    let unknown = expected.unknown_codes(entries.iter().map(|entry| entry.code.as_str()));
    if !unknown.is_empty() {
        return Err(HarvestError::UnknownPreviewCodes { codes: unknown });
    }

    progress.begin("pep", entries.len());
    let pages: Vec<_> = stream::iter(&entries)
        .map(move |entry| async move {
            let status = fetch_document(fetcher, &entry.url)
                .await
                .map(|page| detail_status(&page));
            (entry, status)
        })
        .buffered(jobs.max(1))
        .inspect(|_| progress.advance())
        .collect()
        .await;
    progress.finish();

    let mut report = PepReport {
        summary_rows: entries.len(),
        ..PepReport::default()
    };
    for (entry, status) in pages {
        let Some(status) = status else {
            report.failed.push(entry.url.clone());
            continue;
        };
        let status = status.at(&entry.url)?;
        report.ledger.record(&status);
        if let Some(mismatch) = expected.check(&entry.url, &entry.code, &status) {
            engine_warn!("{}", mismatch);
            report.mismatches.push(mismatch);
        }
    }

    engine_info!(
        "Reconciled {}/{} PEPs: {} mismatches, {} unreachable",
        report.processed(),
        report.summary_rows,
        report.mismatches.len(),
        report.failed.len()
    );
    Ok(Some(report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_document;

    #[test]
    fn status_is_read_from_labelled_field() {
        let page = parse_document(
            r#"<dl class="rfc2822 field-list simple">
                <dt class="field-odd">Author<span class="colon">:</span></dt>
                <dd class="field-odd">Someone</dd>
                <dt class="field-even">Status<span class="colon">:</span></dt>
                <dd class="field-even"><abbr title="Accepted and implementation complete">Final</abbr></dd>
            </dl>"#,
        );
        assert_eq!(detail_status(&page).unwrap(), "Final");
    }

    #[test]
    fn missing_status_field_is_reported() {
        let page = parse_document(
            r#"<dl class="rfc2822 field-list simple"><dt>Author:</dt><dd>x</dd></dl>"#,
        );
        assert!(matches!(
            detail_status(&page),
            Err(LocateError::NodeNotFound { .. })
        ));
    }

    #[test]
    fn label_accepts_trailing_colon() {
        assert!(is_status_label("Status:", "Status:"));
        assert!(is_status_label("Status", "Status:"));
        assert!(!is_status_label("Type", "Type:"));
    }
}

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, Once};

use harvester_engine::{
    FailureKind, FetchError, FetchMetadata, FetchOutput, Fetcher, ProgressSink,
};

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

/// Serves canned pages from memory; unknown URLs answer 404.
#[derive(Default)]
pub struct StubFetcher {
    pages: HashMap<String, String>,
    archives: HashMap<String, Vec<u8>>,
    requests: Mutex<Vec<String>>,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, html: impl Into<String>) -> Self {
        self.pages.insert(url.to_string(), html.into());
        self
    }

    pub fn archive(mut self, url: &str, bytes: &[u8]) -> Self {
        self.archives.insert(url.to_string(), bytes.to_vec());
        self
    }

    pub fn requested(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Fetcher for StubFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchOutput, FetchError> {
        self.requests.lock().unwrap().push(url.to_string());
        let html = self
            .pages
            .get(url)
            .ok_or_else(|| FetchError::new(FailureKind::HttpStatus(404), "404 Not Found"))?;
        Ok(FetchOutput {
            bytes: html.as_bytes().to_vec(),
            metadata: FetchMetadata {
                original_url: url.to_string(),
                final_url: url.to_string(),
                redirect_count: 0,
                content_type: Some("text/html; charset=utf-8".to_string()),
                byte_len: html.len() as u64,
                from_cache: false,
            },
        })
    }

    async fn download(&self, url: &str, target: &Path) -> Result<u64, FetchError> {
        self.requests.lock().unwrap().push(url.to_string());
        let bytes = self
            .archives
            .get(url)
            .ok_or_else(|| FetchError::new(FailureKind::HttpStatus(404), "404 Not Found"))?;
        std::fs::write(target, bytes).map_err(|e| FetchError::new(FailureKind::Io, e.to_string()))?;
        Ok(bytes.len() as u64)
    }
}

/// Records progress events as strings for assertions.
#[derive(Default)]
pub struct RecordingProgress {
    events: Mutex<Vec<String>>,
}

impl RecordingProgress {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl ProgressSink for RecordingProgress {
    fn begin(&self, label: &str, total: usize) {
        self.events.lock().unwrap().push(format!("begin {label} {total}"));
    }

    fn advance(&self) {
        self.events.lock().unwrap().push("advance".to_string());
    }

    fn finish(&self) {
        self.events.lock().unwrap().push("finish".to_string());
    }
}

pub const PEP_INDEX: &str = "https://peps.test/";

/// `(abbreviation, pep number)` rows of a numerical index page.
pub fn pep_index(rows: &[(&str, u32)]) -> String {
    let body: String = rows
        .iter()
        .map(|(abbr, number)| {
            format!(
                r#"<tr class="row-odd">
                    <td><abbr title="preview">{abbr}</abbr></td>
                    <td><a class="pep reference internal" href="pep-{number:04}/" title="PEP {number}">{number}</a></td>
                    <td><a class="pep reference internal" href="pep-{number:04}/">Title {number}</a></td>
                </tr>"#
            )
        })
        .collect();
    format!(
        r#"<html><body>
        <section id="index-by-category"><table><tbody><tr><td>ignored</td></tr></tbody></table></section>
        <section id="numerical-index">
          <table class="pep-zero-table docutils align-default">
            <thead><tr><th>Type</th><th>PEP</th><th>Title</th></tr></thead>
            <tbody>{body}</tbody>
          </table>
        </section></body></html>"#
    )
}

pub fn pep_url(number: u32) -> String {
    format!("{PEP_INDEX}pep-{number:04}/")
}

pub fn pep_page(status: &str) -> String {
    format!(
        r#"<html><body><section id="pep-content">
        <dl class="rfc2822 field-list simple">
          <dt class="field-odd">Author<span class="colon">:</span></dt>
          <dd class="field-odd">A. Author</dd>
          <dt class="field-even">Status<span class="colon">:</span></dt>
          <dd class="field-even"><abbr title="status">{status}</abbr></dd>
          <dt class="field-odd">Type<span class="colon">:</span></dt>
          <dd class="field-odd">Standards Track</dd>
        </dl></section></body></html>"#
    )
}

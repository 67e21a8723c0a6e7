mod common;

use common::{init_logging, RecordingProgress, StubFetcher};
use harvester_core::Row;
use harvester_engine::modes::{download::download, latest_versions::latest_versions, whats_new::whats_new};
use harvester_engine::{
    run_mode, HarvestError, HarvestOutcome, HarvestSettings, Mode, NoProgress,
};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

const DOCS: &str = "https://docs.test/3/";

fn whats_new_index() -> String {
    r#"<html><body><div role="main">
    <section id="what-s-new-in-python"><h1>What's New in Python</h1>
      <div class="toctree-wrapper compound"><ul>
        <li class="toctree-l1"><a class="reference internal" href="3.12.html">What's New In Python 3.12</a>
          <ul><li class="toctree-l2"><a href="3.12.html#summary">Summary</a></li></ul></li>
        <li class="toctree-l1"><a class="reference internal" href="3.11.html">What's New In Python 3.11</a></li>
        <li class="toctree-l1"><a class="reference internal" href="3.10.html">What's New In Python 3.10</a></li>
      </ul></div>
    </section></div></body></html>"#
        .to_string()
}

fn release_page(version: &str, editor: &str) -> String {
    format!(
        "<html><body><section><h1>What's New In Python {version}</h1>\n<dl class=\"field-list simple\">\n<dt>Editor</dt>\n<dd>{editor}</dd>\n</dl></section></body></html>"
    )
}

#[tokio::test]
async fn whats_new_follows_toc_and_skips_dead_links() {
    init_logging();
    let fetcher = StubFetcher::new()
        .page("https://docs.test/3/whatsnew/", whats_new_index())
        .page(
            "https://docs.test/3/whatsnew/3.12.html",
            release_page("3.12", "Adam Turner"),
        )
        .page(
            "https://docs.test/3/whatsnew/3.10.html",
            release_page("3.10", "Pablo Galindo Salgado"),
        );

    let rows = whats_new(&fetcher, DOCS, 2, &NoProgress)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(
        rows.header(),
        &Row::new(["Link to article", "Title", "Editor, author"])
    );
    assert_eq!(
        rows.rows(),
        &[
            Row::new([
                "https://docs.test/3/whatsnew/3.12.html",
                "What's New In Python 3.12",
                "Editor Adam Turner",
            ]),
            Row::new([
                "https://docs.test/3/whatsnew/3.10.html",
                "What's New In Python 3.10",
                "Editor Pablo Galindo Salgado",
            ]),
        ]
    );
    // Nested toctree-l2 entries are not followed.
    assert!(!fetcher
        .requested()
        .iter()
        .any(|url| url.contains("#summary")));
}

#[tokio::test]
async fn whats_new_reports_progress_per_article() {
    init_logging();
    let fetcher = StubFetcher::new()
        .page("https://docs.test/3/whatsnew/", whats_new_index())
        .page(
            "https://docs.test/3/whatsnew/3.12.html",
            release_page("3.12", "Adam Turner"),
        );
    let progress = RecordingProgress::default();

    whats_new(&fetcher, DOCS, 1, &progress).await.unwrap().unwrap();

    assert_eq!(
        progress.events(),
        vec!["begin whats-new 3", "advance", "advance", "advance", "finish"]
    );
}

#[tokio::test]
async fn whats_new_without_index_yields_nothing() {
    init_logging();
    let fetcher = StubFetcher::new();
    assert!(whats_new(&fetcher, DOCS, 1, &NoProgress)
        .await
        .unwrap()
        .is_none());
}

fn docs_home(lists: &str) -> String {
    format!(
        r#"<html><body><div class="sphinxsidebar"><div class="sphinxsidebarwrapper">
        <h3>Download</h3><ul><li><a href="download.html">Download these documents</a></li></ul>
        {lists}
        </div></div></body></html>"#
    )
}

#[tokio::test]
async fn latest_versions_parses_switcher_links() {
    init_logging();
    let fetcher = StubFetcher::new().page(
        DOCS,
        docs_home(
            r#"<h3>Docs by version</h3><ul>
            <li><a href="https://docs.test/3.14/">Python 3.14 (in development)</a></li>
            <li><a href="https://docs.test/3.13/">Python 3.13 (stable)</a></li>
            <li><a href="https://docs.test/2.7/">Python 2.7</a></li>
            <li><a href="https://www.python.org/doc/versions/">All versions</a></li>
            </ul>"#,
        ),
    );

    let rows = latest_versions(&fetcher, DOCS).await.unwrap().unwrap();
    assert_eq!(
        rows.rows(),
        &[
            Row::new(["https://docs.test/3.14/", "3.14", "in development"]),
            Row::new(["https://docs.test/3.13/", "3.13", "stable"]),
            Row::new(["https://docs.test/2.7/", "Python 2.7", ""]),
            Row::new(["https://www.python.org/doc/versions/", "All versions", ""]),
        ]
    );
}

#[tokio::test]
async fn latest_versions_without_marker_list_is_fatal() {
    init_logging();
    let fetcher = StubFetcher::new().page(DOCS, docs_home(""));
    let err = latest_versions(&fetcher, DOCS).await.unwrap_err();
    match err {
        HarvestError::MarkerListNotFound { url, marker } => {
            assert_eq!(url, DOCS);
            assert_eq!(marker, "All versions");
        }
        other => panic!("unexpected error: {other}"),
    }
}

fn download_page() -> String {
    r#"<html><body><div class="body" role="main">
    <h1>Download Python documentation</h1>
    <table class="docutils align-default"><tbody>
      <tr><td>PDF (US-Letter paper size)</td><td><a class="reference external" href="archives/python-3.13-docs-pdf-letter.zip">Download</a></td></tr>
      <tr><td>PDF (A4 paper size)</td><td><a class="reference external" href="archives/python-3.13-docs-pdf-a4.zip">Download</a></td></tr>
    </tbody></table></div></body></html>"#
        .to_string()
}

#[tokio::test]
async fn download_saves_a4_archive_under_its_own_name() {
    init_logging();
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("downloads");
    let archive = "https://docs.test/3/archives/python-3.13-docs-pdf-a4.zip";
    let fetcher = StubFetcher::new()
        .page("https://docs.test/3/download.html", download_page())
        .archive(archive, b"PK\x03\x04zip");

    let (path, bytes) = download(&fetcher, DOCS, &dir).await.unwrap().unwrap();

    assert_eq!(path, dir.join("python-3.13-docs-pdf-a4.zip"));
    assert_eq!(bytes, 7);
    assert_eq!(std::fs::read(&path).unwrap(), b"PK\x03\x04zip");
    assert!(fetcher.requested().contains(&archive.to_string()));
}

#[tokio::test]
async fn download_failure_is_reported() {
    init_logging();
    let temp = TempDir::new().unwrap();
    let fetcher = StubFetcher::new().page("https://docs.test/3/download.html", download_page());
    let err = download(&fetcher, DOCS, temp.path()).await.unwrap_err();
    assert!(matches!(err, HarvestError::Download { .. }), "{err}");
}

#[tokio::test]
async fn download_mode_reports_saved_path() {
    init_logging();
    let temp = TempDir::new().unwrap();
    let fetcher = StubFetcher::new()
        .page("https://docs.test/3/download.html", download_page())
        .archive(
            "https://docs.test/3/archives/python-3.13-docs-pdf-a4.zip",
            b"zip",
        );
    let settings = HarvestSettings {
        docs_url: DOCS.to_string(),
        downloads_dir: temp.path().to_path_buf(),
        ..HarvestSettings::default()
    };

    let outcome = run_mode(Mode::Download, &fetcher, &settings, &NoProgress).await.unwrap();
    assert_eq!(
        outcome,
        HarvestOutcome::Downloaded {
            path: temp.path().join("python-3.13-docs-pdf-a4.zip"),
            bytes: 3,
        }
    );
}

use engine_logging::{engine_debug, engine_error, engine_trace};
use harvester_core::Document;
use url::Url;

use crate::decode::decode_html;
use crate::error::HarvestError;
use crate::parse::parse_document;
use crate::Fetcher;

/// Fetch, decode and parse `url`. Any failure is logged and yields `None`;
/// callers skip that unit of work.
pub async fn fetch_document(fetcher: &dyn Fetcher, url: &str) -> Option<Document> {
    let output = match fetcher.fetch(url).await {
        Ok(output) => output,
        Err(err) => {
            engine_error!("Failed to fetch {}: {}", url, err);
            return None;
        }
    };
    engine_debug!(
        "Fetched {} ({} bytes, cached: {})",
        url,
        output.metadata.byte_len,
        output.metadata.from_cache
    );

    match decode_html(&output.bytes, output.metadata.content_type.as_deref()) {
        Ok(decoded) => {
            engine_trace!("Decoded {} as {}", url, decoded.encoding_label);
            Some(parse_document(&decoded.html))
        }
        Err(err) => {
            engine_error!("Failed to decode {}: {}", url, err);
            None
        }
    }
}

pub(crate) fn resolve(base: &str, reference: &str) -> Result<Url, HarvestError> {
    Url::parse(base)
        .and_then(|base| base.join(reference.trim()))
        .map_err(|err| HarvestError::InvalidUrl {
            base: base.to_string(),
            reference: reference.to_string(),
            message: err.to_string(),
        })
}

use std::sync::LazyLock;

use regex::Regex;

use crate::document::Element;

static VERSION_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Python (?P<version>\d\.\d+) \((?P<status>.*)\)").expect("static regex")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionLink {
    pub version: String,
    pub status: String,
}

/// `"Python 3.12 (stable)"` -> `3.12` / `stable`. Anything else keeps the raw
/// text as the version with an empty status.
pub fn parse_version_link(text: &str) -> VersionLink {
    match VERSION_LINK.captures(text) {
        Some(caps) => VersionLink {
            version: caps["version"].to_string(),
            status: caps["status"].to_string(),
        },
        None => VersionLink {
            version: text.to_string(),
            status: String::new(),
        },
    }
}

/// First list whose flattened text contains `marker`.
pub fn find_list_containing<'a, I>(lists: I, marker: &str) -> Option<&'a Element>
where
    I: IntoIterator<Item = &'a Element>,
{
    lists.into_iter().find(|list| list.text().contains(marker))
}

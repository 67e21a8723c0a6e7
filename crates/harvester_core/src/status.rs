use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::row::{ResultSet, ResultSetError, Row};

/// Canonical status -> number of detail pages reporting it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusLedger {
    counts: BTreeMap<String, usize>,
}

impl StatusLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, status: &str) {
        *self.counts.entry(status.to_string()).or_insert(0) += 1;
    }

    pub fn count(&self, status: &str) -> usize {
        self.counts.get(status).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Distinct statuses in alphabetical order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(status, count)| (status.as_str(), *count))
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// `("Status", "Count")`, one row per status, then the `Total` row.
    pub fn to_result_set(&self) -> Result<ResultSet, ResultSetError> {
        let mut set = ResultSet::new(Row::new(["Status", "Count"]));
        for (status, count) in self.iter() {
            set.push(Row::new([status.to_string(), count.to_string()]))?;
        }
        set.push(Row::new(["Total".to_string(), self.total().to_string()]))?;
        Ok(set)
    }
}

/// Preview code -> statuses a detail page may legitimately report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedStatusMap {
    entries: BTreeMap<String, BTreeSet<String>>,
}

impl ExpectedStatusMap {
    /// Codes used by the PEP numerical index.
    pub fn pep_defaults() -> Self {
        Self::from_iter([
            ("A", vec!["Active", "Accepted"]),
            ("D", vec!["Deferred"]),
            ("F", vec!["Final"]),
            ("P", vec!["Final"]),
            ("R", vec!["Rejected"]),
            ("S", vec!["Superseded"]),
            ("W", vec!["Withdrawn"]),
            ("", vec!["Draft", "Active"]),
        ])
    }

    pub fn expected(&self, code: &str) -> Option<&BTreeSet<String>> {
        self.entries.get(code)
    }

    pub fn contains_code(&self, code: &str) -> bool {
        self.entries.contains_key(code)
    }

    /// Codes absent from the map, deduplicated and sorted.
    pub fn unknown_codes<'a>(&self, codes: impl IntoIterator<Item = &'a str>) -> Vec<String> {
        codes
            .into_iter()
            .filter(|code| !self.contains_code(code))
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// `Some(mismatch)` when `observed` is not allowed for `code`. Unknown codes
    /// have no allowed statuses.
    pub fn check(&self, url: &str, code: &str, observed: &str) -> Option<StatusMismatch> {
        let expected = self.entries.get(code);
        if expected.is_some_and(|set| set.contains(observed)) {
            return None;
        }
        Some(StatusMismatch {
            url: url.to_string(),
            observed: observed.to_string(),
            expected: expected.cloned().unwrap_or_default(),
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ExpectedStatusMap {
    fn default() -> Self {
        Self::pep_defaults()
    }
}

impl<K, V, S> FromIterator<(K, V)> for ExpectedStatusMap
where
    K: Into<String>,
    V: IntoIterator<Item = S>,
    S: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let entries = iter
            .into_iter()
            .map(|(code, statuses)| (code.into(), statuses.into_iter().map(Into::into).collect()))
            .collect();
        Self { entries }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMismatch {
    pub url: String,
    pub observed: String,
    pub expected: BTreeSet<String>,
}

impl fmt::Display for StatusMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let expected: Vec<&str> = self.expected.iter().map(String::as_str).collect();
        write!(
            f,
            "status mismatch at {}: detail page says {:?}, expected one of [{}]",
            self.url,
            self.observed,
            expected.join(", ")
        )
    }
}

/// The summary abbreviation is `<type><status>`, e.g. `SF`; the status letter
/// is the second character, or empty when there is none.
pub fn preview_code(abbr: &str) -> String {
    abbr.trim().chars().nth(1).map(String::from).unwrap_or_default()
}

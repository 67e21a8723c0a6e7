use std::fmt;

use regex::Regex;

use crate::document::{Document, Element};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocateError {
    #[error("required <{tag}> {filter} not found")]
    NodeNotFound { tag: String, filter: String },
}

#[derive(Debug, Clone)]
enum AttrMatch {
    Exact(String),
    Pattern(Regex),
    Present,
}

/// Conjunction of attribute constraints applied by [`locate`] and [`find_all`].
#[derive(Debug, Clone, Default)]
pub struct AttrFilter {
    clauses: Vec<(String, AttrMatch)>,
}

impl AttrFilter {
    pub fn any() -> Self {
        Self::default()
    }

    /// Attribute equals `value`. For `class`, a single class token also matches.
    pub fn exact(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.clauses.push((key.into(), AttrMatch::Exact(value.into())));
        self
    }

    pub fn pattern(mut self, key: impl Into<String>, pattern: Regex) -> Self {
        self.clauses.push((key.into(), AttrMatch::Pattern(pattern)));
        self
    }

    pub fn present(mut self, key: impl Into<String>) -> Self {
        self.clauses.push((key.into(), AttrMatch::Present));
        self
    }

    pub fn matches(&self, element: &Element) -> bool {
        self.clauses.iter().all(|(key, rule)| {
            let Some(value) = element.attr(key) else {
                return false;
            };
            match rule {
                AttrMatch::Exact(expected) => {
                    value == expected
                        || (key == "class"
                            && value.split_ascii_whitespace().any(|token| token == expected))
                }
                AttrMatch::Pattern(re) => re.is_match(value),
                AttrMatch::Present => true,
            }
        })
    }
}

impl fmt::Display for AttrFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (idx, (key, rule)) in self.clauses.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            match rule {
                AttrMatch::Exact(value) => write!(f, "{key}={value:?}")?,
                AttrMatch::Pattern(re) => write!(f, "{key}=~{:?}", re.as_str())?,
                AttrMatch::Present => write!(f, "{key}")?,
            }
        }
        f.write_str("}")
    }
}

/// First descendant of `root` (document order) named `tag` that satisfies `filter`.
pub fn locate<'a>(
    root: &'a Element,
    tag: &str,
    filter: &AttrFilter,
) -> Result<&'a Element, LocateError> {
    root.descendants()
        .find(|el| el.tag().eq_ignore_ascii_case(tag) && filter.matches(el))
        .ok_or_else(|| LocateError::NodeNotFound {
            tag: tag.to_ascii_lowercase(),
            filter: filter.to_string(),
        })
}

/// Every matching descendant of `root`, in document order.
pub fn find_all<'a>(root: &'a Element, tag: &str, filter: &AttrFilter) -> Vec<&'a Element> {
    root.descendants()
        .filter(|el| el.tag().eq_ignore_ascii_case(tag) && filter.matches(el))
        .collect()
}

impl Element {
    pub fn locate(&self, tag: &str, filter: &AttrFilter) -> Result<&Element, LocateError> {
        locate(self, tag, filter)
    }

    pub fn find_all(&self, tag: &str, filter: &AttrFilter) -> Vec<&Element> {
        find_all(self, tag, filter)
    }
}

impl Document {
    pub fn locate(&self, tag: &str, filter: &AttrFilter) -> Result<&Element, LocateError> {
        locate(self.root(), tag, filter)
    }

    pub fn find_all(&self, tag: &str, filter: &AttrFilter) -> Vec<&Element> {
        find_all(self.root(), tag, filter)
    }
}

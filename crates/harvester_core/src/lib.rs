//! Harvester core: page model, node lookup and the pure record/status types.
mod document;
mod locate;
mod row;
mod status;
mod versions;

pub use document::{Descendants, Document, Element, Node};
pub use locate::{find_all, locate, AttrFilter, LocateError};
pub use row::{ResultSet, ResultSetError, Row};
pub use status::{preview_code, ExpectedStatusMap, StatusLedger, StatusMismatch};
pub use versions::{find_list_containing, parse_version_link, VersionLink};

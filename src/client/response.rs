//! Search response envelope
//!
//! Deserializes the `search-results` wrapper the API puts around every page
//! and reduces it to the two things the paginator cares about: the entry
//! list and the optional next-page cursor. Entries stay opaque JSON objects
//! and are written out verbatim.

use serde::Deserialize;
use serde_json::Value;

use crate::Record;

/// Entry field holding the publication date, surfaced when a run stops on
/// its request quota.
pub const COVER_DATE_FIELD: &str = "prism:coverDate";

/// Top-level response envelope.
#[derive(Debug, Deserialize)]
pub struct SearchEnvelope {
    #[serde(rename = "search-results")]
    results: SearchResults,
}

#[derive(Debug, Deserialize)]
struct SearchResults {
    /// Absent on fully exhausted result sets.
    #[serde(default)]
    entry: Vec<Record>,
    /// Cursor block; `@next` is absent on the final page.
    cursor: Option<CursorBlock>,
}

#[derive(Debug, Deserialize)]
struct CursorBlock {
    #[serde(rename = "@next")]
    next: Option<String>,
}

/// One page of results, ready for the paginator.
#[derive(Debug)]
pub struct SearchPage {
    /// Opaque records in API order.
    pub entries: Vec<Record>,
    /// Cursor for the following page, if any.
    pub next_cursor: Option<String>,
}

impl SearchPage {
    /// Cover date of the last entry on the page, if present.
    pub fn last_cover_date(&self) -> Option<String> {
        self.entries
            .last()
            .and_then(|entry| entry.get(COVER_DATE_FIELD))
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}

impl From<SearchEnvelope> for SearchPage {
    fn from(envelope: SearchEnvelope) -> Self {
        let SearchResults { entry, cursor } = envelope.results;
        Self {
            entries: entry,
            next_cursor: cursor.and_then(|c| c.next),
        }
    }
}

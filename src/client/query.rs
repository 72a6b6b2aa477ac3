//! Search query construction
//!
//! Owns the query parameters sent on every page request. Only the cursor
//! mutates between requests, and only the paginator mutates it.

/// Cursor value denoting the start of a fresh harvest.
pub const CURSOR_START: &str = "*";

/// Query parameters for one Scopus search request.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    /// Free-text / fielded search expression.
    pub query: String,
    /// Publication date range, e.g. "2023-2026".
    pub date_range: String,
    /// Sort order, e.g. "-coverDate" (newest first).
    pub sort: String,
    /// Page size (documents per request).
    pub page_size: u32,
    /// Pagination cursor; `"*"` for the first page.
    pub cursor: String,
    /// Response verbosity level ("COMPLETE" returns full records).
    pub view: String,
}

impl SearchQuery {
    /// The reference deployment's query skeleton with a caller-supplied
    /// search expression.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            date_range: "2023-2026".to_string(),
            sort: "-coverDate".to_string(),
            page_size: 25,
            cursor: CURSOR_START.to_string(),
            view: "COMPLETE".to_string(),
        }
    }

    /// Render as HTTP query parameters.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("query", self.query.clone()),
            ("date", self.date_range.clone()),
            ("sort", self.sort.clone()),
            ("count", self.page_size.to_string()),
            ("cursor", self.cursor.clone()),
            ("view", self.view.clone()),
        ]
    }
}

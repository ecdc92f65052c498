//! List query parsing and pagination math.
//!
//! Query-string values arrive as raw strings and are normalised leniently:
//! a bad `page` or `limit` falls back to its default rather than failing the
//! request.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Pagination defaults
// ---------------------------------------------------------------------------

/// First page (pages are 1-based).
pub const DEFAULT_PAGE: i64 = 1;

/// Default number of issues per page.
pub const DEFAULT_LIMIT: i64 = 10;

/// Maximum number of issues per page.
pub const MAX_LIMIT: i64 = 100;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Which issues a list request should see.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueFilter {
    /// Case-insensitive substring matched against user name, description and
    /// technician name. Never empty.
    pub search: Option<String>,
    /// `None` lists every issue; `Some(b)` only those with `isResolved = b`.
    pub resolved: Option<bool>,
}

/// A normalised page request. `page >= 1` and `1 <= limit <= MAX_LIMIT`;
/// only [`PageRequest::new`] builds one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: i64,
    limit: i64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    /// `page < 1` becomes the first page, `limit < 1` the default, and a
    /// limit above [`MAX_LIMIT`] is clamped.
    pub fn new(page: i64, limit: i64) -> Self {
        let limit = if limit < 1 { DEFAULT_LIMIT } else { limit.min(MAX_LIMIT) };
        Self {
            page: page.max(DEFAULT_PAGE),
            limit,
        }
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

/// Pagination metadata returned alongside a page of issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    /// Derive the metadata for `request` over a filtered set of `total` rows.
    pub fn new(request: PageRequest, total: i64) -> Self {
        let total = total.max(0);
        let total_pages = (total + request.limit - 1) / request.limit;
        Self {
            page: request.page,
            limit: request.limit,
            total,
            total_pages,
            has_next: request.page < total_pages,
            has_prev: request.page > 1,
        }
    }
}

/// Typed list parameters, as sent by a client. The server accepts the same
/// keys as raw strings and normalises them with the `parse_*` helpers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueListParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved: Option<bool>,
}

impl IssueListParams {
    /// Parameters for the open-issues dashboard.
    pub fn open() -> Self {
        Self {
            resolved: Some(false),
            ..Default::default()
        }
    }

    /// Parameters for the past (resolved) issues view.
    pub fn resolved() -> Self {
        Self {
            resolved: Some(true),
            ..Default::default()
        }
    }

    pub fn page(mut self, page: i64) -> Self {
        self.page = Some(page);
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }
}

// ---------------------------------------------------------------------------
// Parsing helpers
// ---------------------------------------------------------------------------

/// `page < 1`, missing or non-numeric input yields page 1.
pub fn parse_page(raw: Option<&str>) -> i64 {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|p| *p >= 1)
        .unwrap_or(DEFAULT_PAGE)
}

/// `limit <= 0`, missing or non-numeric input yields the default; anything
/// above [`MAX_LIMIT`] is clamped.
pub fn parse_limit(raw: Option<&str>) -> i64 {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|l| *l >= 1)
        .unwrap_or(DEFAULT_LIMIT)
        .min(MAX_LIMIT)
}

/// Absent or empty means "all issues"; `true`/`1` (any case) means resolved;
/// any other value means open.
pub fn parse_resolved(raw: Option<&str>) -> Option<bool> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    Some(raw.eq_ignore_ascii_case("true") || raw == "1")
}

/// An empty or whitespace-only search is the same as no search. Any other
/// term is kept as given, surrounding spaces included.
pub fn normalize_search(raw: Option<&str>) -> Option<String> {
    raw.filter(|s| !s.trim().is_empty()).map(str::to_string)
}

/// Build a `LIKE` pattern that matches `term` literally as a substring.
///
/// `\`, `%` and `_` are escaped with a backslash, so the pattern must be
/// used with `ESCAPE '\'`.
pub fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

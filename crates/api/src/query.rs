//! Query parameter types for the issue list endpoint.

use issuetrack_core::query::{
    normalize_search, parse_limit, parse_page, parse_resolved, IssueFilter, PageRequest,
};
use serde::Deserialize;

/// Raw `?page=&limit=&search=&resolved=` parameters.
///
/// Every value is taken as a string so that a malformed `page` or `limit`
/// falls back to its default instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct IssueListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
    pub resolved: Option<String>,
}

impl IssueListQuery {
    pub fn into_parts(self) -> (IssueFilter, PageRequest) {
        let filter = IssueFilter {
            search: normalize_search(self.search.as_deref()),
            resolved: parse_resolved(self.resolved.as_deref()),
        };
        let page = PageRequest::new(
            parse_page(self.page.as_deref()),
            parse_limit(self.limit.as_deref()),
        );
        (filter, page)
    }
}

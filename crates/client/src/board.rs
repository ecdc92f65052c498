//! Local state for an issue list screen.
//!
//! [`IssueBoard`] owns the current page of issues, its pagination metadata
//! and the last error message. Every operation clears the previous error
//! first; a failed operation records its message on the board and returns
//! the error to the caller. Successful mutations patch the cached page from
//! the server's response instead of refetching it.

use issuetrack_core::error::CoreError;
use issuetrack_core::issue::{
    check_resolution, CreateIssue, Issue, IssuePage, TechnicianUpdate, UpdateIssue,
};
use issuetrack_core::query::{IssueListParams, Pagination};
use issuetrack_core::types::DbId;

use crate::api::{ClientError, IssueApi};

pub struct IssueBoard {
    api: IssueApi,
    issues: Vec<Issue>,
    pagination: Option<Pagination>,
    error: Option<String>,
}

impl IssueBoard {
    pub fn new(api: IssueApi) -> Self {
        Self {
            api,
            issues: Vec::new(),
            pagination: None,
            error: None,
        }
    }

    /// The cached page, newest first.
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// Metadata of the last fetched page; `None` before the first fetch.
    pub fn pagination(&self) -> Option<&Pagination> {
        self.pagination.as_ref()
    }

    /// Message of the last failed operation.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn issue(&self, id: DbId) -> Option<&Issue> {
        self.issues.iter().find(|issue| issue.id == id)
    }

    /// Replace the cached page with the one matching `params`.
    pub async fn fetch_issues(&mut self, params: &IssueListParams) -> Result<IssuePage, ClientError> {
        self.error = None;
        let result = self.api.list_issues(params).await;
        let page = self.record(result)?;
        self.issues = page.issues.clone();
        self.pagination = Some(page.pagination);
        Ok(page)
    }

    /// Fetch one issue. The cached page is left as is.
    pub async fn fetch_issue(&mut self, id: DbId) -> Result<Issue, ClientError> {
        self.error = None;
        let result = self.api.get_issue(id).await;
        self.record(result)
    }

    /// Submit a new issue. The payload is validated locally first; nothing is
    /// sent when it fails. The new issue is not inserted into the cached
    /// page, whose position depends on the active filter.
    pub async fn create_issue(&mut self, input: &CreateIssue) -> Result<Issue, ClientError> {
        self.error = None;
        if let Err(err) = input.check() {
            return self.record(Err(err.into()));
        }
        let result = self.api.create_issue(input).await;
        self.record(result)
    }

    /// Full update. When the issue is cached, resolving it without technician
    /// fields is rejected locally.
    pub async fn update_issue(&mut self, id: DbId, input: &UpdateIssue) -> Result<Issue, ClientError> {
        self.error = None;
        if let Err(err) = self.check_update(id, input) {
            return self.record(Err(err.into()));
        }
        let result = self.api.update_issue(id, input).await;
        let issue = self.record(result)?;
        replace_issue(&mut self.issues, issue.clone());
        Ok(issue)
    }

    /// Technician update. All three fields are validated locally first.
    pub async fn update_technician_fields(
        &mut self,
        id: DbId,
        input: &TechnicianUpdate,
    ) -> Result<Issue, ClientError> {
        self.error = None;
        if let Err(err) = input.check() {
            return self.record(Err(err.into()));
        }
        let result = self.api.update_technician_fields(id, input).await;
        let issue = self.record(result)?;
        replace_issue(&mut self.issues, issue.clone());
        Ok(issue)
    }

    pub async fn delete_issue(&mut self, id: DbId) -> Result<(), ClientError> {
        self.error = None;
        let result = self.api.delete_issue(id).await;
        self.record(result)?;
        remove_issue(&mut self.issues, id);
        Ok(())
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Drop the cached page, its metadata and any error.
    pub fn reset(&mut self) {
        self.issues.clear();
        self.pagination = None;
        self.error = None;
    }

    // ---- private helpers ----

    fn check_update(&self, id: DbId, input: &UpdateIssue) -> Result<(), CoreError> {
        let changes = input.clone().into_changes()?;
        match self.issue(id) {
            Some(current) => check_resolution(current, &changes),
            None => Ok(()),
        }
    }

    /// Keep the error message of a failed operation on the board.
    fn record<T>(&mut self, result: Result<T, ClientError>) -> Result<T, ClientError> {
        if let Err(err) = &result {
            self.error = Some(err.to_string());
        }
        result
    }
}

/// Swap the cached copy of `updated` for the server's version. Issues not on
/// the current page are ignored.
fn replace_issue(issues: &mut [Issue], updated: Issue) {
    if let Some(slot) = issues.iter_mut().find(|issue| issue.id == updated.id) {
        *slot = updated;
    }
}

fn remove_issue(issues: &mut Vec<Issue>, id: DbId) {
    issues.retain(|issue| issue.id != id);
}

//! The issue service: validation, not-found mapping and logging around an
//! injected [`IssueStore`].
//!
//! Every operation validates its payload before the store is touched, so a
//! rejected request never reaches the database.

use std::sync::Arc;

use issuetrack_core::error::CoreError;
use issuetrack_core::issue::{
    self, CreateIssue, Issue, IssuePage, TechnicianUpdate, UpdateIssue,
};
use issuetrack_core::query::{IssueFilter, PageRequest, Pagination};
use issuetrack_core::types::DbId;
use issuetrack_db::IssueStore;

use crate::error::AppResult;

#[derive(Clone)]
pub struct IssueService {
    store: Arc<dyn IssueStore>,
}

impl IssueService {
    pub fn new(store: Arc<dyn IssueStore>) -> Self {
        Self { store }
    }

    /// One page of issues matching `filter`, newest first.
    pub async fn list(&self, filter: &IssueFilter, page: PageRequest) -> AppResult<IssuePage> {
        let (issues, total) = self.store.list(filter, page).await?;
        Ok(IssuePage {
            issues,
            pagination: Pagination::new(page, total),
        })
    }

    pub async fn get(&self, id: DbId) -> AppResult<Issue> {
        self.store
            .get_by_id(id)
            .await?
            .ok_or_else(|| not_found(id).into())
    }

    pub async fn create(&self, input: CreateIssue) -> AppResult<Issue> {
        let new_issue = input.into_new_issue()?;
        let created = self.store.insert(&new_issue).await?;

        tracing::info!(issue_id = created.id, "Issue created");
        Ok(created)
    }

    /// Full update: overwrite only the provided fields.
    ///
    /// A resolved issue needs a non-blank technician name and notes, either
    /// in this update or already stored on the issue.
    pub async fn update(&self, id: DbId, input: UpdateIssue) -> AppResult<Issue> {
        let changes = input.into_changes()?;

        let touches_resolution = changes.is_resolved == Some(true)
            || changes.technician_name.is_some()
            || changes.technician_notes.is_some();
        if touches_resolution {
            let current = self.get(id).await?;
            issue::check_resolution(&current, &changes)?;
        }

        let updated = self
            .store
            .update(id, &changes)
            .await?
            .ok_or_else(|| not_found(id))?;

        tracing::info!(issue_id = id, state = %updated.state(), "Issue updated");
        Ok(updated)
    }

    /// Technician update: name, notes and resolution flag are set together.
    pub async fn update_technician(&self, id: DbId, input: TechnicianUpdate) -> AppResult<Issue> {
        let assignment = input.into_assignment()?;
        let updated = self
            .store
            .set_technician_fields(id, &assignment)
            .await?
            .ok_or_else(|| not_found(id))?;

        tracing::info!(
            issue_id = id,
            technician = %assignment.technician_name,
            state = %updated.state(),
            "Technician fields updated",
        );
        Ok(updated)
    }

    /// Permanently delete an issue. A second delete of the same id is
    /// not-found.
    pub async fn delete(&self, id: DbId) -> AppResult<()> {
        if !self.store.delete(id).await? {
            return Err(not_found(id).into());
        }

        tracing::info!(issue_id = id, "Issue deleted");
        Ok(())
    }

    /// Whether the store is reachable right now.
    pub async fn store_healthy(&self) -> bool {
        match self.store.ping().await {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(error = %err, "Issue store health check failed");
                false
            }
        }
    }
}

fn not_found(id: DbId) -> CoreError {
    CoreError::NotFound {
        entity: issue::ENTITY,
        id,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

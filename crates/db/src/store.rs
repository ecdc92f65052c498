//! The storage interface the issue service depends on.
//!
//! [`IssueStore`] speaks in wire-level [`Issue`] values; the one concrete
//! adapter, [`PgIssueStore`], keeps SQL dialect and column naming private.

use async_trait::async_trait;
use issuetrack_core::issue::{Issue, IssueChanges, NewIssue, TechnicianAssignment};
use issuetrack_core::query::{IssueFilter, PageRequest};
use issuetrack_core::types::DbId;

use crate::repositories::IssueRepo;
use crate::DbPool;

/// Durable persistence of issues.
///
/// Every mutation is a single atomic statement. Concurrent writes to the same
/// issue are last-write-wins.
#[async_trait]
pub trait IssueStore: Send + Sync {
    /// Insert a new issue with server-assigned id and timestamps.
    async fn insert(&self, issue: &NewIssue) -> Result<Issue, sqlx::Error>;

    async fn get_by_id(&self, id: DbId) -> Result<Option<Issue>, sqlx::Error>;

    /// Overwrite the fields present in `changes`; refresh `updatedAt`.
    async fn update(&self, id: DbId, changes: &IssueChanges)
        -> Result<Option<Issue>, sqlx::Error>;

    /// Set technician name, notes and resolution flag together.
    async fn set_technician_fields(
        &self,
        id: DbId,
        assignment: &TechnicianAssignment,
    ) -> Result<Option<Issue>, sqlx::Error>;

    /// Returns `true` if a row was removed.
    async fn delete(&self, id: DbId) -> Result<bool, sqlx::Error>;

    /// One page of matching issues plus the total size of the filtered set.
    async fn list(
        &self,
        filter: &IssueFilter,
        page: PageRequest,
    ) -> Result<(Vec<Issue>, i64), sqlx::Error>;

    /// Check that the backing store is reachable.
    async fn ping(&self) -> Result<(), sqlx::Error>;
}

/// PostgreSQL adapter for [`IssueStore`].
#[derive(Clone)]
pub struct PgIssueStore {
    pool: DbPool,
}

impl PgIssueStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IssueStore for PgIssueStore {
    async fn insert(&self, issue: &NewIssue) -> Result<Issue, sqlx::Error> {
        IssueRepo::create(&self.pool, issue).await.map(Issue::from)
    }

    async fn get_by_id(&self, id: DbId) -> Result<Option<Issue>, sqlx::Error> {
        Ok(IssueRepo::find_by_id(&self.pool, id).await?.map(Issue::from))
    }

    async fn update(
        &self,
        id: DbId,
        changes: &IssueChanges,
    ) -> Result<Option<Issue>, sqlx::Error> {
        Ok(IssueRepo::update(&self.pool, id, changes)
            .await?
            .map(Issue::from))
    }

    async fn set_technician_fields(
        &self,
        id: DbId,
        assignment: &TechnicianAssignment,
    ) -> Result<Option<Issue>, sqlx::Error> {
        Ok(IssueRepo::set_technician_fields(&self.pool, id, assignment)
            .await?
            .map(Issue::from))
    }

    async fn delete(&self, id: DbId) -> Result<bool, sqlx::Error> {
        IssueRepo::delete(&self.pool, id).await
    }

    async fn list(
        &self,
        filter: &IssueFilter,
        page: PageRequest,
    ) -> Result<(Vec<Issue>, i64), sqlx::Error> {
        let total = IssueRepo::count_filtered(&self.pool, filter).await?;
        let rows = IssueRepo::list_filtered(&self.pool, filter, page).await?;
        tracing::debug!(
            total,
            returned = rows.len(),
            page = page.page(),
            limit = page.limit(),
            "Listed issues",
        );
        Ok((rows.into_iter().map(Issue::from).collect(), total))
    }

    async fn ping(&self) -> Result<(), sqlx::Error> {
        crate::health_check(&self.pool).await
    }
}

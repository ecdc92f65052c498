//! Repository for the `issues` table.

use issuetrack_core::issue::{IssueChanges, NewIssue, TechnicianAssignment};
use issuetrack_core::query::{like_pattern, IssueFilter, PageRequest};
use issuetrack_core::types::DbId;
use sqlx::PgPool;

use crate::models::issue::IssueRow;

/// Column list for `issues` queries.
const COLUMNS: &str = "\
    id, user_name, issue_date, issue_description, preceding_events, \
    resolution_steps, technician_name, technician_notes, is_resolved, \
    created_at, updated_at";

/// Provides CRUD operations for issues.
pub struct IssueRepo;

impl IssueRepo {
    /// Insert a new issue, returning the full row. Technician fields start
    /// null and `is_resolved` false.
    pub async fn create(pool: &PgPool, input: &NewIssue) -> Result<IssueRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO issues \
                (user_name, issue_date, issue_description, preceding_events, resolution_steps) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, IssueRow>(&query)
            .bind(&input.user_name)
            .bind(input.issue_date)
            .bind(&input.issue_description)
            .bind(&input.preceding_events)
            .bind(&input.resolution_steps)
            .fetch_one(pool)
            .await
    }

    /// Find an issue by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<IssueRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM issues WHERE id = $1");
        sqlx::query_as::<_, IssueRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Update an issue. Only non-`None` fields in `changes` are applied;
    /// `updated_at` is refreshed by trigger even when nothing else changes.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        changes: &IssueChanges,
    ) -> Result<Option<IssueRow>, sqlx::Error> {
        let query = format!(
            "UPDATE issues SET
                user_name = COALESCE($2, user_name),
                issue_date = COALESCE($3, issue_date),
                issue_description = COALESCE($4, issue_description),
                preceding_events = COALESCE($5, preceding_events),
                resolution_steps = COALESCE($6, resolution_steps),
                technician_name = COALESCE($7, technician_name),
                technician_notes = COALESCE($8, technician_notes),
                is_resolved = COALESCE($9, is_resolved)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, IssueRow>(&query)
            .bind(id)
            .bind(&changes.user_name)
            .bind(changes.issue_date)
            .bind(&changes.issue_description)
            .bind(&changes.preceding_events)
            .bind(&changes.resolution_steps)
            .bind(&changes.technician_name)
            .bind(&changes.technician_notes)
            .bind(changes.is_resolved)
            .fetch_optional(pool)
            .await
    }

    /// Set the technician name, notes and resolution flag unconditionally.
    pub async fn set_technician_fields(
        pool: &PgPool,
        id: DbId,
        assignment: &TechnicianAssignment,
    ) -> Result<Option<IssueRow>, sqlx::Error> {
        let query = format!(
            "UPDATE issues SET
                technician_name = $2,
                technician_notes = $3,
                is_resolved = $4
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, IssueRow>(&query)
            .bind(id)
            .bind(&assignment.technician_name)
            .bind(&assignment.technician_notes)
            .bind(assignment.is_resolved)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete an issue. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM issues WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count issues matching `filter`, ignoring pagination.
    pub async fn count_filtered(pool: &PgPool, filter: &IssueFilter) -> Result<i64, sqlx::Error> {
        let (where_clause, _) = where_clause(filter);
        let query = format!("SELECT COUNT(*) FROM issues {where_clause}");

        let mut q = sqlx::query_scalar::<_, i64>(&query);
        if let Some(search) = &filter.search {
            q = q.bind(like_pattern(search));
        }
        if let Some(resolved) = filter.resolved {
            q = q.bind(resolved);
        }

        q.fetch_one(pool).await
    }

    /// List one page of issues matching `filter`.
    ///
    /// Results are ordered newest-first, with `id` breaking ties between
    /// equal creation times.
    pub async fn list_filtered(
        pool: &PgPool,
        filter: &IssueFilter,
        page: PageRequest,
    ) -> Result<Vec<IssueRow>, sqlx::Error> {
        let (where_clause, param_idx) = where_clause(filter);
        let query = format!(
            "SELECT {COLUMNS} FROM issues {where_clause} \
             ORDER BY created_at DESC, id DESC \
             LIMIT ${param_idx} OFFSET ${}",
            param_idx + 1
        );

        let mut q = sqlx::query_as::<_, IssueRow>(&query);
        if let Some(search) = &filter.search {
            q = q.bind(like_pattern(search));
        }
        if let Some(resolved) = filter.resolved {
            q = q.bind(resolved);
        }
        q = q.bind(page.limit()).bind(page.offset());

        q.fetch_all(pool).await
    }
}

/// Build the `WHERE` clause for `filter` and return it with the index of the
/// next free bind parameter. The search pattern, when present, is always `$1`.
fn where_clause(filter: &IssueFilter) -> (String, usize) {
    let mut conditions: Vec<String> = Vec::new();
    let mut param_idx: usize = 1;

    if filter.search.is_some() {
        conditions.push(format!(
            "(user_name ILIKE ${param_idx} ESCAPE '\\' \
              OR issue_description ILIKE ${param_idx} ESCAPE '\\' \
              OR technician_name ILIKE ${param_idx} ESCAPE '\\')"
        ));
        param_idx += 1;
    }
    if filter.resolved.is_some() {
        conditions.push(format!("is_resolved = ${param_idx}"));
        param_idx += 1;
    }

    let clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };
    (clause, param_idx)
}

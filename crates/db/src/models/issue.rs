//! Storage shape of the `issues` table.

use chrono::NaiveDate;
use issuetrack_core::issue::Issue;
use issuetrack_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `issues` table, with snake_case column names.
#[derive(Debug, Clone, FromRow)]
pub struct IssueRow {
    pub id: DbId,
    pub user_name: String,
    pub issue_date: NaiveDate,
    pub issue_description: String,
    pub preceding_events: Option<String>,
    pub resolution_steps: Option<String>,
    pub technician_name: Option<String>,
    pub technician_notes: Option<String>,
    pub is_resolved: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<IssueRow> for Issue {
    fn from(row: IssueRow) -> Self {
        Issue {
            id: row.id,
            user_name: row.user_name,
            issue_date: row.issue_date,
            issue_description: row.issue_description,
            preceding_events: row.preceding_events,
            resolution_steps: row.resolution_steps,
            technician_name: row.technician_name,
            technician_notes: row.technician_notes,
            is_resolved: row.is_resolved,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

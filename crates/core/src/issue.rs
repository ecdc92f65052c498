//! Issue wire types, validation schemas and the resolution lifecycle.
//!
//! Three inbound payloads exist, each with its own schema:
//!
//! - [`CreateIssue`]: a user submitting a new problem report.
//! - [`UpdateIssue`]: a full update where every field is optional and only
//!   the provided ones overwrite stored values.
//! - [`TechnicianUpdate`]: a technician annotating an issue; all three fields
//!   are required together.
//!
//! Each payload is trimmed, validated (reporting every violated constraint)
//! and converted into a storage-ready value ([`NewIssue`], [`IssueChanges`],
//! [`TechnicianAssignment`]). The same code runs on the server and in the
//! client, so the client-side mirror can never drift from the server rules.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use crate::error::{CoreError, FieldViolation};
use crate::query::Pagination;
use crate::types::{DbId, Timestamp};

/// Entity name used in not-found errors and log lines.
pub const ENTITY: &str = "Issue";

// ---------------------------------------------------------------------------
// Validation constants
// ---------------------------------------------------------------------------

/// Maximum length of `userName` and `technicianName` (characters).
pub const MAX_NAME_LENGTH: usize = 100;
/// Minimum length of `issueDescription` (characters).
pub const MIN_DESCRIPTION_LENGTH: usize = 10;
/// Maximum length of every long-form text field (characters).
pub const MAX_TEXT_LENGTH: usize = 5000;

// `validator` length bounds are `u64`; mirrors of the constants above.
const MAX_NAME_LENGTH_U64: u64 = MAX_NAME_LENGTH as u64;
const MIN_DESCRIPTION_LENGTH_U64: u64 = MIN_DESCRIPTION_LENGTH as u64;
const MAX_TEXT_LENGTH_U64: u64 = MAX_TEXT_LENGTH as u64;

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// An issue as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
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

impl Issue {
    pub fn state(&self) -> ResolutionState {
        ResolutionState::from_resolved(self.is_resolved)
    }
}

/// One page of issues plus the metadata needed to navigate the rest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssuePage {
    pub issues: Vec<Issue>,
    pub pagination: Pagination,
}

/// The two-state resolution lifecycle. There is no terminal state: an issue
/// may move between `Open` and `Resolved` any number of times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionState {
    Open,
    Resolved,
}

impl ResolutionState {
    pub fn from_resolved(is_resolved: bool) -> Self {
        if is_resolved {
            ResolutionState::Resolved
        } else {
            ResolutionState::Open
        }
    }
}

impl fmt::Display for ResolutionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionState::Open => f.write_str("open"),
            ResolutionState::Resolved => f.write_str("resolved"),
        }
    }
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

/// Payload for submitting a new issue.
///
/// Required fields are `Option` so that a payload missing several of them
/// reports every missing field instead of failing on the first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateIssue {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(
        required(message = "is required"),
        length(min = 1, max = MAX_NAME_LENGTH_U64, message = "must be between 1 and 100 characters")
    )]
    pub user_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(required(message = "is required"))]
    pub issue_date: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(
        required(message = "is required"),
        length(
            min = MIN_DESCRIPTION_LENGTH_U64,
            max = MAX_TEXT_LENGTH_U64,
            message = "must be between 10 and 5000 characters"
        )
    )]
    pub issue_description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = MAX_TEXT_LENGTH_U64, message = "must be at most 5000 characters"))]
    pub preceding_events: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = MAX_TEXT_LENGTH_U64, message = "must be at most 5000 characters"))]
    pub resolution_steps: Option<String>,
}

/// A validated, trimmed issue ready for insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct NewIssue {
    pub user_name: String,
    pub issue_date: NaiveDate,
    pub issue_description: String,
    pub preceding_events: Option<String>,
    pub resolution_steps: Option<String>,
}

impl CreateIssue {
    /// Trim every text field. Empty optional text collapses to `None`.
    pub fn normalized(self) -> Self {
        Self {
            user_name: trimmed(self.user_name),
            issue_date: trimmed(self.issue_date),
            issue_description: trimmed(self.issue_description),
            preceding_events: trimmed(self.preceding_events).filter(|s| !s.is_empty()),
            resolution_steps: trimmed(self.resolution_steps).filter(|s| !s.is_empty()),
        }
    }

    /// Validate without consuming the payload.
    pub fn check(&self) -> Result<(), CoreError> {
        self.clone().into_new_issue().map(|_| ())
    }

    pub fn into_new_issue(self) -> Result<NewIssue, CoreError> {
        let input = self.normalized();
        let mut violations = collect_violations(input.validate());
        let issue_date = check_issue_date(input.issue_date.as_deref(), &mut violations);
        sort_violations(&mut violations);

        match (input.user_name, issue_date, input.issue_description) {
            (Some(user_name), Some(issue_date), Some(issue_description))
                if violations.is_empty() =>
            {
                Ok(NewIssue {
                    user_name,
                    issue_date,
                    issue_description,
                    preceding_events: input.preceding_events,
                    resolution_steps: input.resolution_steps,
                })
            }
            _ => Err(CoreError::Validation(violations)),
        }
    }
}

// ---------------------------------------------------------------------------
// Full update
// ---------------------------------------------------------------------------

/// Payload for a full update. Every field is optional; omitted fields keep
/// their stored value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateIssue {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = MAX_NAME_LENGTH_U64, message = "must be between 1 and 100 characters"))]
    pub user_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_date: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(
        min = MIN_DESCRIPTION_LENGTH_U64,
        max = MAX_TEXT_LENGTH_U64,
        message = "must be between 10 and 5000 characters"
    ))]
    pub issue_description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = MAX_TEXT_LENGTH_U64, message = "must be at most 5000 characters"))]
    pub preceding_events: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = MAX_TEXT_LENGTH_U64, message = "must be at most 5000 characters"))]
    pub resolution_steps: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = MAX_NAME_LENGTH_U64, message = "must be between 1 and 100 characters"))]
    pub technician_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = MAX_TEXT_LENGTH_U64, message = "must be at most 5000 characters"))]
    pub technician_notes: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_resolved: Option<bool>,
}

/// Validated partial changes. `None` means "leave the stored value alone",
/// never "set to null".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IssueChanges {
    pub user_name: Option<String>,
    pub issue_date: Option<NaiveDate>,
    pub issue_description: Option<String>,
    pub preceding_events: Option<String>,
    pub resolution_steps: Option<String>,
    pub technician_name: Option<String>,
    pub technician_notes: Option<String>,
    pub is_resolved: Option<bool>,
}

impl IssueChanges {
    /// True when applying these changes would only refresh `updatedAt`.
    pub fn is_empty(&self) -> bool {
        *self == IssueChanges::default()
    }
}

impl UpdateIssue {
    pub fn normalized(self) -> Self {
        Self {
            user_name: trimmed(self.user_name),
            issue_date: trimmed(self.issue_date),
            issue_description: trimmed(self.issue_description),
            preceding_events: trimmed(self.preceding_events),
            resolution_steps: trimmed(self.resolution_steps),
            technician_name: trimmed(self.technician_name),
            technician_notes: trimmed(self.technician_notes),
            is_resolved: self.is_resolved,
        }
    }

    pub fn check(&self) -> Result<(), CoreError> {
        self.clone().into_changes().map(|_| ())
    }

    pub fn into_changes(self) -> Result<IssueChanges, CoreError> {
        let input = self.normalized();
        let mut violations = collect_violations(input.validate());
        let issue_date = check_issue_date(input.issue_date.as_deref(), &mut violations);
        sort_violations(&mut violations);

        if !violations.is_empty() {
            return Err(CoreError::Validation(violations));
        }

        Ok(IssueChanges {
            user_name: input.user_name,
            issue_date,
            issue_description: input.issue_description,
            preceding_events: input.preceding_events,
            resolution_steps: input.resolution_steps,
            technician_name: input.technician_name,
            technician_notes: input.technician_notes,
            is_resolved: input.is_resolved,
        })
    }
}

// ---------------------------------------------------------------------------
// Technician update
// ---------------------------------------------------------------------------

/// Payload for the technician panel. All three fields are set together.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TechnicianUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(
        required(message = "is required"),
        length(min = 1, max = MAX_NAME_LENGTH_U64, message = "must be between 1 and 100 characters")
    )]
    pub technician_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(
        required(message = "is required"),
        length(min = 1, max = MAX_TEXT_LENGTH_U64, message = "must be between 1 and 5000 characters")
    )]
    pub technician_notes: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(required(message = "is required"))]
    pub is_resolved: Option<bool>,
}

/// A validated technician annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct TechnicianAssignment {
    pub technician_name: String,
    pub technician_notes: String,
    pub is_resolved: bool,
}

impl TechnicianUpdate {
    pub fn normalized(self) -> Self {
        Self {
            technician_name: trimmed(self.technician_name),
            technician_notes: trimmed(self.technician_notes),
            is_resolved: self.is_resolved,
        }
    }

    pub fn check(&self) -> Result<(), CoreError> {
        self.clone().into_assignment().map(|_| ())
    }

    pub fn into_assignment(self) -> Result<TechnicianAssignment, CoreError> {
        let input = self.normalized();
        let mut violations = collect_violations(input.validate());
        sort_violations(&mut violations);

        match (input.technician_name, input.technician_notes, input.is_resolved) {
            (Some(technician_name), Some(technician_notes), Some(is_resolved))
                if violations.is_empty() =>
            {
                Ok(TechnicianAssignment {
                    technician_name,
                    technician_notes,
                    is_resolved,
                })
            }
            _ => Err(CoreError::Validation(violations)),
        }
    }
}

// ---------------------------------------------------------------------------
// Resolution rule
// ---------------------------------------------------------------------------

/// Reject changes that would leave `current` resolved without a technician
/// name and notes.
pub fn check_resolution(current: &Issue, changes: &IssueChanges) -> Result<(), CoreError> {
    let resolved = changes.is_resolved.unwrap_or(current.is_resolved);
    if !resolved {
        return Ok(());
    }

    let has_name = is_filled(&changes.technician_name, &current.technician_name);
    let has_notes = is_filled(&changes.technician_notes, &current.technician_notes);
    if has_name && has_notes {
        Ok(())
    } else {
        Err(CoreError::invalid_field(
            "isResolved",
            "cannot resolve an issue without technicianName and technicianNotes",
        ))
    }
}

/// A provided value wins over the stored one. Blank text counts as missing.
fn is_filled(change: &Option<String>, stored: &Option<String>) -> bool {
    change
        .as_ref()
        .or(stored.as_ref())
        .is_some_and(|value| !value.trim().is_empty())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse an ISO 8601 date. Accepts a calendar date (`2024-01-01`), a local
/// date-time without offset (`2024-01-01T10:30` or with seconds), or a full
/// RFC 3339 timestamp, in which case the date in the timestamp's own offset
/// is used.
pub fn parse_issue_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            LOCAL_DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                .map(|dt| dt.date())
        })
}

const LOCAL_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

fn check_issue_date(raw: Option<&str>, violations: &mut Vec<FieldViolation>) -> Option<NaiveDate> {
    let raw = raw?;
    let parsed = parse_issue_date(raw);
    if parsed.is_none() {
        violations.push(FieldViolation::new(
            "issueDate",
            "must be a valid ISO 8601 date",
        ));
    }
    parsed
}

fn trimmed(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string())
}

fn collect_violations(result: Result<(), ValidationErrors>) -> Vec<FieldViolation> {
    let Err(errors) = result else {
        return Vec::new();
    };

    let mut violations = Vec::new();
    for (field, field_errors) in errors.field_errors() {
        let field = camel_case(&field.to_string());
        for error in field_errors.iter() {
            let message = error
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("failed the '{}' check", error.code));
            violations.push(FieldViolation::new(field.clone(), message));
        }
    }
    violations
}

fn sort_violations(violations: &mut [FieldViolation]) {
    violations.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.message.cmp(&b.message)));
}

fn camel_case(snake: &str) -> String {
    let mut out = String::with_capacity(snake.len());
    let mut upper_next = false;
    for c in snake.chars() {
        if c == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

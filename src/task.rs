use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub type TaskId = String;

/// Date-only representation used when matching tasks against calendar days.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(
    Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    // Declaration order gives the ordering: Low < Medium < High < Critical.
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl Priority {
    /// Highest first, the order used when grouping for display.
    pub const ALL: [Priority; 4] = [
        Priority::Critical,
        Priority::High,
        Priority::Medium,
        Priority::Low,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Critical => "critical",
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Priority::Critical => "Critical",
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }

    /// Next value in display order, wrapping around.
    pub fn next(self) -> Priority {
        let idx = Self::ALL.iter().position(|p| *p == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Priority {
        let idx = Self::ALL.iter().position(|p| *p == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub category_id: Option<String>,
    pub is_completed: bool,
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// The due date as `YYYY-MM-DD`, if any.
    pub fn due_key(&self) -> Option<String> {
        self.due_date.map(|d| d.format(DATE_FORMAT).to_string())
    }

    pub(crate) fn from_draft(id: TaskId, draft: TaskDraft, now: DateTime<Utc>) -> Task {
        Task {
            id,
            title: draft.title,
            description: draft.description,
            priority: draft.priority,
            category_id: draft.category_id,
            is_completed: draft.is_completed,
            due_date: draft.due_date,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merges `patch` into a copy of this task and stamps `updated_at`.
    pub(crate) fn patched(&self, patch: &TaskPatch, now: DateTime<Utc>) -> Task {
        let mut task = self.clone();
        if let Some(title) = &patch.title {
            task.title = title.clone();
        }
        if let Some(description) = &patch.description {
            task.description = description.clone();
        }
        if let Some(priority) = patch.priority {
            task.priority = priority;
        }
        if let Some(category_id) = &patch.category_id {
            task.category_id = category_id.clone();
        }
        if let Some(is_completed) = patch.is_completed {
            task.is_completed = is_completed;
        }
        if let Some(due_date) = patch.due_date {
            task.due_date = due_date;
        }
        task.updated_at = now.max(task.updated_at);
        task
    }
}

/// A task as submitted by the user, before the store assigns id and timestamps.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub category_id: Option<String>,
    pub is_completed: bool,
    pub due_date: Option<NaiveDate>,
}

/// Partial update. `None` leaves a field alone; for optional fields
/// `Some(None)` clears the value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub priority: Option<Priority>,
    pub category_id: Option<Option<String>>,
    pub is_completed: Option<bool>,
    pub due_date: Option<Option<NaiveDate>>,
}

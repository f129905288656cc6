// src/models/task.rs
//! Pharmacy tasks: assignable, prioritized, due-dated.
//!
//! Status transitions are deliberately permissive: the action menu suggests
//! Pending -> In Progress -> Completed, but the edit form may set any
//! status directly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use validator::Validate;

use super::inventory::none_if_blank;

// ==================== PRIORITY / STATUS ====================

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, Display, AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum TaskPriority {
    High,
    Medium,
    Low,
}

impl Default for TaskPriority {
    fn default() -> Self {
        TaskPriority::Medium
    }
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::High => "High",
            TaskPriority::Medium => "Medium",
            TaskPriority::Low => "Low",
        }
    }

    /// Sort rank: High sorts before Medium before Low.
    pub fn rank(&self) -> u8 {
        match self {
            TaskPriority::High => 0,
            TaskPriority::Medium => 1,
            TaskPriority::Low => 2,
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, Display, AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum TaskStatus {
    Pending,
    #[serde(rename = "In Progress")]
    #[strum(serialize = "In Progress")]
    InProgress,
    Completed,
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Pending
    }
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Completed => "Completed",
        }
    }

    pub fn rank(&self) -> u8 {
        match self {
            TaskStatus::Pending => 0,
            TaskStatus::InProgress => 1,
            TaskStatus::Completed => 2,
        }
    }
}

// ==================== TASK ====================

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub due_date: DateTime<Utc>,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    /// Employee display name, not an id; absent means unassigned.
    pub assigned_to: Option<String>,
}

impl Task {
    /// Urgent tasks surface on the dashboard: high priority, not done yet.
    pub fn is_urgent(&self) -> bool {
        self.priority == TaskPriority::High && self.status != TaskStatus::Completed
    }
}

#[derive(Debug, Deserialize, Validate, Clone)]
pub struct CreateTaskRequest {
    #[validate(length(min = 3, max = 255, message = "Title must be at least 3 characters"))]
    pub title: String,

    #[validate(length(max = 2000, message = "Description cannot exceed 2000 characters"))]
    pub description: Option<String>,

    pub due_date: DateTime<Utc>,

    pub priority: TaskPriority,

    pub status: TaskStatus,

    #[validate(length(max = 255, message = "Assignee cannot exceed 255 characters"))]
    pub assigned_to: Option<String>,
}

/// Updates replace every field except the id.
#[derive(Debug, Deserialize, Validate, Clone)]
pub struct UpdateTaskRequest {
    #[validate(length(min = 3, max = 255, message = "Title must be at least 3 characters"))]
    pub title: String,

    #[validate(length(max = 2000, message = "Description cannot exceed 2000 characters"))]
    pub description: Option<String>,

    pub due_date: DateTime<Utc>,

    pub priority: TaskPriority,

    pub status: TaskStatus,

    #[validate(length(max = 255, message = "Assignee cannot exceed 255 characters"))]
    pub assigned_to: Option<String>,
}

impl CreateTaskRequest {
    pub fn into_task(self, id: String) -> Task {
        Task {
            id,
            title: self.title,
            description: none_if_blank(self.description),
            due_date: self.due_date,
            priority: self.priority,
            status: self.status,
            assigned_to: none_if_blank(self.assigned_to),
        }
    }
}

impl UpdateTaskRequest {
    pub fn into_task(self, id: String) -> Task {
        Task {
            id,
            title: self.title,
            description: none_if_blank(self.description),
            due_date: self.due_date,
            priority: self.priority,
            status: self.status,
            assigned_to: none_if_blank(self.assigned_to),
        }
    }
}

// ==================== TESTS ====================

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use validator::Validate;

    #[test]
    fn test_status_spellings() {
        assert_eq!(TaskStatus::InProgress.as_str(), "In Progress");
        assert_eq!(TaskStatus::from_str("In Progress"), Ok(TaskStatus::InProgress));
        assert_eq!(
            serde_json::to_string(&TaskStatus::InProgress).unwrap(),
            "\"In Progress\""
        );
    }

    #[test]
    fn test_short_title_rejected() {
        let request = CreateTaskRequest {
            title: "Au".to_string(),
            description: None,
            due_date: Utc::now(),
            priority: TaskPriority::High,
            status: TaskStatus::Pending,
            assigned_to: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_empty_assignment_means_unassigned() {
        let request = CreateTaskRequest {
            title: "Monthly Inventory Audit".to_string(),
            description: None,
            due_date: Utc::now(),
            priority: TaskPriority::High,
            status: TaskStatus::Pending,
            assigned_to: Some("".to_string()),
        };
        assert!(request.validate().is_ok());
        let task = request.into_task("task-1".to_string());
        assert_eq!(task.assigned_to, None);
    }

    #[test]
    fn test_urgency() {
        let mut task = CreateTaskRequest {
            title: "Audit Controlled Substances".to_string(),
            description: None,
            due_date: Utc::now(),
            priority: TaskPriority::High,
            status: TaskStatus::Pending,
            assigned_to: None,
        }
        .into_task("task-2".to_string());
        assert!(task.is_urgent());
        task.status = TaskStatus::Completed;
        assert!(!task.is_urgent());
        task.status = TaskStatus::InProgress;
        task.priority = TaskPriority::Low;
        assert!(!task.is_urgent());
    }
}

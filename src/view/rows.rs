// src/view/rows.rs
//! Per-entity table columns: what is searchable, how each column compares,
//! and the default ordering restored on every reload.

use std::cmp::Ordering;
use strum::{AsRefStr, Display, EnumString};

use super::{compare_text, SortDirection, TableRow};
use crate::models::{ActivityLog, Employee, InventoryItem, Task};

/// Wire date format used in table cells and search text.
pub const TABLE_DATE_FORMAT: &str = "%Y-%m-%d";

// ==================== INVENTORY ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, AsRefStr)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum InventoryColumn {
    Name,
    Category,
    Quantity,
    ExpirationDate,
    Barcode,
    Status,
}

impl TableRow for InventoryItem {
    type Column = InventoryColumn;

    fn row_id(&self) -> &str {
        &self.id
    }

    fn search_haystack(&self) -> Vec<String> {
        let mut haystack = vec![
            self.name.clone(),
            self.category.clone(),
            self.status.as_str().to_string(),
            self.quantity.to_string(),
            self.expiration_date.format(TABLE_DATE_FORMAT).to_string(),
        ];
        if let Some(barcode) = &self.barcode {
            haystack.push(barcode.clone());
        }
        haystack
    }

    fn compare_by(&self, other: &Self, column: InventoryColumn) -> Ordering {
        match column {
            InventoryColumn::Name => compare_text(&self.name, &other.name),
            InventoryColumn::Category => compare_text(&self.category, &other.category),
            InventoryColumn::Quantity => self.quantity.cmp(&other.quantity),
            InventoryColumn::ExpirationDate => self.expiration_date.cmp(&other.expiration_date),
            InventoryColumn::Barcode => compare_text(
                self.barcode.as_deref().unwrap_or(""),
                other.barcode.as_deref().unwrap_or(""),
            ),
            InventoryColumn::Status => compare_text(self.status.as_str(), other.status.as_str()),
        }
    }

    fn is_blank(&self, column: InventoryColumn) -> bool {
        matches!(column, InventoryColumn::Barcode) && self.barcode.is_none()
    }

    fn default_sort() -> (InventoryColumn, SortDirection) {
        // Soonest expiry first.
        (InventoryColumn::ExpirationDate, SortDirection::Asc)
    }
}

// ==================== TASKS ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, AsRefStr)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TaskColumn {
    Title,
    DueDate,
    Priority,
    Status,
    AssignedTo,
}

impl TableRow for Task {
    type Column = TaskColumn;

    fn row_id(&self) -> &str {
        &self.id
    }

    fn search_haystack(&self) -> Vec<String> {
        let mut haystack = vec![
            self.title.clone(),
            self.priority.as_str().to_string(),
            self.status.as_str().to_string(),
            self.due_date.format(TABLE_DATE_FORMAT).to_string(),
        ];
        if let Some(description) = &self.description {
            haystack.push(description.clone());
        }
        if let Some(assignee) = &self.assigned_to {
            haystack.push(assignee.clone());
        }
        haystack
    }

    fn compare_by(&self, other: &Self, column: TaskColumn) -> Ordering {
        match column {
            TaskColumn::Title => compare_text(&self.title, &other.title),
            TaskColumn::DueDate => self.due_date.cmp(&other.due_date),
            // High before Medium before Low, not alphabetical.
            TaskColumn::Priority => self.priority.rank().cmp(&other.priority.rank()),
            TaskColumn::Status => self.status.rank().cmp(&other.status.rank()),
            TaskColumn::AssignedTo => compare_text(
                self.assigned_to.as_deref().unwrap_or(""),
                other.assigned_to.as_deref().unwrap_or(""),
            ),
        }
    }

    fn is_blank(&self, column: TaskColumn) -> bool {
        matches!(column, TaskColumn::AssignedTo) && self.assigned_to.is_none()
    }

    fn default_sort() -> (TaskColumn, SortDirection) {
        (TaskColumn::DueDate, SortDirection::Asc)
    }
}

// ==================== EMPLOYEES ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, AsRefStr)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum EmployeeColumn {
    Name,
    Role,
    Email,
}

impl TableRow for Employee {
    type Column = EmployeeColumn;

    fn row_id(&self) -> &str {
        &self.id
    }

    fn search_haystack(&self) -> Vec<String> {
        vec![self.name.clone(), self.role.clone(), self.email.clone()]
    }

    fn compare_by(&self, other: &Self, column: EmployeeColumn) -> Ordering {
        match column {
            EmployeeColumn::Name => compare_text(&self.name, &other.name),
            EmployeeColumn::Role => compare_text(&self.role, &other.role),
            EmployeeColumn::Email => compare_text(&self.email, &other.email),
        }
    }

    fn default_sort() -> (EmployeeColumn, SortDirection) {
        (EmployeeColumn::Name, SortDirection::Asc)
    }
}

// ==================== ACTIVITY LOG ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, AsRefStr)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ActivityColumn {
    User,
    Action,
    Timestamp,
}

impl TableRow for ActivityLog {
    type Column = ActivityColumn;

    fn row_id(&self) -> &str {
        &self.id
    }

    fn search_haystack(&self) -> Vec<String> {
        let mut haystack = vec![self.user.clone(), self.action.clone()];
        if let Some(details) = &self.details {
            for value in details.values() {
                match value.as_str() {
                    Some(s) => haystack.push(s.to_string()),
                    None => haystack.push(value.to_string()),
                }
            }
        }
        haystack
    }

    fn compare_by(&self, other: &Self, column: ActivityColumn) -> Ordering {
        match column {
            ActivityColumn::User => compare_text(&self.user, &other.user),
            ActivityColumn::Action => compare_text(&self.action, &other.action),
            ActivityColumn::Timestamp => self.timestamp.cmp(&other.timestamp),
        }
    }

    fn default_sort() -> (ActivityColumn, SortDirection) {
        // Newest entries first.
        (ActivityColumn::Timestamp, SortDirection::Desc)
    }
}

// ==================== TESTS ====================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{StockStatus, TaskPriority, TaskStatus};
    use crate::view::TableView;
    use chrono::{Duration, TimeZone, Utc};
    use std::str::FromStr;

    fn item(id: &str, name: &str, days_out: i64, barcode: Option<&str>) -> InventoryItem {
        InventoryItem {
            id: id.to_string(),
            name: name.to_string(),
            category: "Antibiotics".to_string(),
            quantity: 500,
            expiration_date: Utc.with_ymd_and_hms(2024, 8, 1, 0, 0, 0).unwrap()
                + Duration::days(days_out),
            status: StockStatus::InStock,
            barcode: barcode.map(str::to_string),
        }
    }

    #[test]
    fn test_column_params_parse() {
        assert_eq!(
            InventoryColumn::from_str("expiration_date"),
            Ok(InventoryColumn::ExpirationDate)
        );
        assert_eq!(TaskColumn::from_str("due_date"), Ok(TaskColumn::DueDate));
        assert!(InventoryColumn::from_str("bogus").is_err());
    }

    #[test]
    fn test_inventory_defaults_to_soonest_expiry() {
        let view = TableView::new(vec![
            item("a", "Saline", 40, None),
            item("b", "Amoxicillin", 5, None),
            item("c", "Ibuprofen", 12, None),
        ]);
        let ids: Vec<String> = view.displayed().iter().map(|i| i.id.clone()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_inventory_search_covers_quantity_status_and_date() {
        let mut view = TableView::new(vec![item("a", "Amoxicillin 250mg", 5, Some("BC-77"))]);

        for needle in ["amoxicillin", "antibiotics", "500", "in stock", "2024-08-06", "bc-77"] {
            view.set_query(needle);
            assert_eq!(view.displayed().len(), 1, "query {:?} should match", needle);
        }

        view.set_query("out of stock");
        assert!(view.displayed().is_empty());
    }

    #[test]
    fn test_items_without_barcode_sort_first_under_barcode_column() {
        let mut view = TableView::new(vec![
            item("a", "Saline", 40, Some("AAA")),
            item("b", "Ibuprofen", 12, None),
        ]);
        view.toggle_sort(InventoryColumn::Barcode);
        let ids: Vec<String> = view.displayed().iter().map(|i| i.id.clone()).collect();
        assert_eq!(ids[0], "b");
        view.toggle_sort(InventoryColumn::Barcode);
        let ids: Vec<String> = view.displayed().iter().map(|i| i.id.clone()).collect();
        assert_eq!(ids[0], "b");
    }

    fn task(id: &str, title: &str, days_out: i64, priority: TaskPriority) -> Task {
        Task {
            id: id.to_string(),
            title: title.to_string(),
            description: None,
            due_date: Utc.with_ymd_and_hms(2024, 8, 1, 0, 0, 0).unwrap()
                + Duration::days(days_out),
            priority,
            status: TaskStatus::Pending,
            assigned_to: None,
        }
    }

    #[test]
    fn test_new_task_lands_at_due_date_position() {
        // Scenario: a created task appears in the default-sorted list at the
        // slot its due date dictates.
        let mut view = TableView::new(vec![
            task("a", "Restock Paracetamol", 5, TaskPriority::High),
            task("b", "Train New Technician", 20, TaskPriority::Low),
        ]);
        view.apply_create(task("c", "Audit", 10, TaskPriority::High));
        let ids: Vec<String> = view.displayed().iter().map(|t| t.id.clone()).collect();
        assert_eq!(ids, vec!["a", "c", "b"]);
    }

    #[test]
    fn test_task_priority_sorts_by_rank() {
        let mut view = TableView::new(vec![
            task("a", "Low job", 1, TaskPriority::Low),
            task("b", "High job", 2, TaskPriority::High),
            task("c", "Medium job", 3, TaskPriority::Medium),
        ]);
        view.toggle_sort(TaskColumn::Priority);
        let ids: Vec<String> = view.displayed().iter().map(|t| t.id.clone()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_activity_defaults_to_newest_first() {
        let base = Utc.with_ymd_and_hms(2024, 8, 1, 10, 0, 0).unwrap();
        let older = ActivityLog {
            id: "1".to_string(),
            user: "Alice Smith".to_string(),
            action: "Logged in".to_string(),
            timestamp: base,
            details: None,
        };
        let newer = ActivityLog {
            id: "2".to_string(),
            user: "Bob Johnson".to_string(),
            action: "Updated inventory: Aspirin".to_string(),
            timestamp: base + Duration::hours(2),
            details: None,
        };
        let view = TableView::new(vec![older, newer]);
        let ids: Vec<String> = view.displayed().iter().map(|l| l.id.clone()).collect();
        assert_eq!(ids, vec!["2", "1"]);
    }

    #[test]
    fn test_activity_search_reaches_into_details() {
        let mut details = serde_json::Map::new();
        details.insert("item".to_string(), serde_json::Value::from("Ibuprofen"));
        details.insert("current_quantity".to_string(), serde_json::Value::from(20));
        let log = ActivityLog {
            id: "1".to_string(),
            user: "System".to_string(),
            action: "Low stock alert".to_string(),
            timestamp: Utc::now(),
            details: Some(details),
        };
        let mut view = TableView::new(vec![log]);
        view.set_query("ibuprofen");
        assert_eq!(view.displayed().len(), 1);
        view.set_query("20");
        assert_eq!(view.displayed().len(), 1);
    }
}

// src/models/employee.rs
//! Employee directory records. Create/list only: profiles are appended by
//! an admin and never edited or removed through this service.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::inventory::none_if_blank;

/// Roles suggested in the directory form; role itself stays free text.
pub const SUGGESTED_ROLES: &[&str] = &[
    "Pharmacist",
    "Pharmacy Technician",
    "Dispensary Manager",
    "Logistics Coordinator",
    "Customer Service Rep",
    "Intern",
    "Chief Pharmacist",
    "Night Shift Pharmacist",
];

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Employee {
    pub id: String,
    pub name: String,
    pub role: String,
    pub email: String,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Deserialize, Validate, Clone)]
pub struct CreateEmployeeRequest {
    #[validate(length(min = 2, max = 255, message = "Name must be at least 2 characters"))]
    pub name: String,

    #[validate(length(min = 2, max = 100, message = "Role must be at least 2 characters"))]
    pub role: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    pub avatar_url: Option<String>,
}

impl CreateEmployeeRequest {
    pub fn into_employee(self, id: String) -> Employee {
        let avatar_url =
            none_if_blank(self.avatar_url).or_else(|| Some(placeholder_avatar(&self.name)));
        Employee {
            id,
            name: self.name,
            role: self.role,
            email: self.email,
            avatar_url,
        }
    }
}

/// Initials used for generated avatars: first letters of the first and last
/// word of the name, or the first two letters of a single-word name.
pub fn initials(name: &str) -> String {
    let parts: Vec<&str> = name.split_whitespace().collect();
    match parts.len() {
        0 => "S".to_string(), // System or Unknown
        1 => parts[0].chars().take(2).collect::<String>().to_uppercase(),
        _ => {
            let first = parts[0].chars().next().unwrap_or('?');
            let last = parts[parts.len() - 1].chars().next().unwrap_or('?');
            format!("{}{}", first, last).to_uppercase()
        }
    }
}

pub fn placeholder_avatar(name: &str) -> String {
    format!("https://placehold.co/100x100.png?text={}", initials(name))
}

// ==================== TESTS ====================

// src/models/user.rs
//! The signed-in user as exposed by the identity provider, enriched with
//! the role kept in the `users` collection.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, Display, AsRefStr,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    User,
}

impl Default for UserRole {
    fn default() -> Self {
        UserRole::User
    }
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::User => "user",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct User {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub photo_url: Option<String>,
    pub role: UserRole,
}

impl User {
    /// Fallback chain for a missing display name: local part of the email,
    /// then a generic label.
    pub fn display_name_or_default(email: &str, display_name: Option<&str>) -> String {
        if let Some(name) = display_name {
            if !name.trim().is_empty() {
                return name.trim().to_string();
            }
        }
        email
            .split('@')
            .next()
            .filter(|s| !s.is_empty())
            .unwrap_or("User")
            .to_string()
    }
}

/// Partial profile update passed through to the identity provider.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ProfileUpdate {
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
}

// ==================== TESTS ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_fallbacks() {
        assert_eq!(
            User::display_name_or_default("alice.w@example.com", Some("Dr. Alice Wonderland")),
            "Dr. Alice Wonderland"
        );
        assert_eq!(
            User::display_name_or_default("alice.w@example.com", Some("  ")),
            "alice.w"
        );
        assert_eq!(User::display_name_or_default("@example.com", None), "User");
    }

    #[test]
    fn test_role_wire_spelling() {
        assert_eq!(serde_json::to_string(&UserRole::Admin).unwrap(), "\"admin\"");
        assert!(UserRole::Admin.is_admin());
        assert!(!UserRole::User.is_admin());
    }
}

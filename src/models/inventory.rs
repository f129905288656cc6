// src/models/inventory.rs
//! Inventory items: pharmaceutical products tracked with quantity,
//! expiration date and a user-set stock status.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use validator::Validate;

// ==================== STOCK STATUS ====================

/// Stock status is set by the operator, never derived from the quantity.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, Display, AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum StockStatus {
    #[serde(rename = "In Stock")]
    #[strum(serialize = "In Stock")]
    InStock,
    #[serde(rename = "Low Stock")]
    #[strum(serialize = "Low Stock")]
    LowStock,
    #[serde(rename = "Out of Stock")]
    #[strum(serialize = "Out of Stock")]
    OutOfStock,
}

impl Default for StockStatus {
    fn default() -> Self {
        StockStatus::InStock
    }
}

impl StockStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::InStock => "In Stock",
            StockStatus::LowStock => "Low Stock",
            StockStatus::OutOfStock => "Out of Stock",
        }
    }

    /// All accepted values, for validation messages
    pub const fn all_values() -> &'static [&'static str] {
        &["In Stock", "Low Stock", "Out of Stock"]
    }
}

// ==================== INVENTORY ITEM ====================

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct InventoryItem {
    pub id: String,
    pub name: String,
    pub category: String,
    pub quantity: u32,
    /// Calendar-day significant; time of day is not meaningful.
    pub expiration_date: DateTime<Utc>,
    pub status: StockStatus,
    pub barcode: Option<String>,
}

#[derive(Debug, Deserialize, Validate, Clone)]
pub struct CreateInventoryItemRequest {
    #[validate(length(min = 2, max = 255, message = "Name must be at least 2 characters"))]
    pub name: String,

    #[validate(length(min = 2, max = 255, message = "Category must be at least 2 characters"))]
    pub category: String,

    #[validate(range(min = 0, message = "Quantity cannot be negative"))]
    pub quantity: i64,

    pub expiration_date: DateTime<Utc>,

    pub status: StockStatus,

    #[validate(length(max = 100, message = "Barcode cannot exceed 100 characters"))]
    pub barcode: Option<String>,
}

/// Updates replace every field except the id.
#[derive(Debug, Deserialize, Validate, Clone)]
pub struct UpdateInventoryItemRequest {
    #[validate(length(min = 2, max = 255, message = "Name must be at least 2 characters"))]
    pub name: String,

    #[validate(length(min = 2, max = 255, message = "Category must be at least 2 characters"))]
    pub category: String,

    #[validate(range(min = 0, message = "Quantity cannot be negative"))]
    pub quantity: i64,

    pub expiration_date: DateTime<Utc>,

    pub status: StockStatus,

    #[validate(length(max = 100, message = "Barcode cannot exceed 100 characters"))]
    pub barcode: Option<String>,
}

impl CreateInventoryItemRequest {
    pub fn into_item(self, id: String) -> InventoryItem {
        InventoryItem {
            id,
            name: self.name,
            category: self.category,
            quantity: self.quantity.max(0) as u32,
            expiration_date: self.expiration_date,
            status: self.status,
            barcode: none_if_blank(self.barcode),
        }
    }
}

impl UpdateInventoryItemRequest {
    pub fn into_item(self, id: String) -> InventoryItem {
        InventoryItem {
            id,
            name: self.name,
            category: self.category,
            quantity: self.quantity.max(0) as u32,
            expiration_date: self.expiration_date,
            status: self.status,
            barcode: none_if_blank(self.barcode),
        }
    }
}

/// Blank optional input means "not set", never an empty string.
pub fn none_if_blank(value: Option<String>) -> Option<String> {
    value.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

// ==================== TESTS ====================

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_stock_status_round_trip() {
        assert_eq!(StockStatus::InStock.as_str(), "In Stock");
        assert_eq!(StockStatus::from_str("Low Stock"), Ok(StockStatus::LowStock));
        assert_eq!(StockStatus::from_str("out of stock"), Ok(StockStatus::OutOfStock));
        assert!(StockStatus::from_str("Discontinued").is_err());
    }

    #[test]
    fn test_stock_status_serde_spelling() {
        let json = serde_json::to_string(&StockStatus::OutOfStock).unwrap();
        assert_eq!(json, "\"Out of Stock\"");
        let back: StockStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, StockStatus::OutOfStock);
    }

    #[test]
    fn test_negative_quantity_rejected() {
        use validator::Validate;
        let request = CreateInventoryItemRequest {
            name: "Amoxicillin 250mg".to_string(),
            category: "Antibiotics".to_string(),
            quantity: -1,
            expiration_date: Utc::now(),
            status: StockStatus::InStock,
            barcode: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_blank_barcode_becomes_absent() {
        let request = CreateInventoryItemRequest {
            name: "Ibuprofen 400mg".to_string(),
            category: "Pain Relief".to_string(),
            quantity: 20,
            expiration_date: Utc::now(),
            status: StockStatus::LowStock,
            barcode: Some("   ".to_string()),
        };
        let item = request.into_item("item-1".to_string());
        assert_eq!(item.barcode, None);
    }
}

// src/models/mod.rs

pub mod activity;
pub mod employee;
pub mod inventory;
pub mod task;
pub mod user;

pub use activity::*;
pub use employee::*;
pub use inventory::*;
pub use task::*;
pub use user::*;

use serde::Serialize;

// ==================== COMMON / SHARED ====================

/// Counters for the dashboard landing page
#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub total_items: i64,
    pub low_stock_items: i64,
    pub out_of_stock_items: i64,
    pub urgent_tasks: i64,
    pub expiring_soon_items: i64,
    pub employees: i64,
}

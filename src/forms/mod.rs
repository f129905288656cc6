// src/forms/mod.rs
//! Form engine: field-scoped validation plus the submit lifecycle.
//!
//! A form session owns one value object (the create/update request DTOs
//! from `models`) and guards the Editing -> Submitting -> Closed flow. The
//! caller decides what a successful submit means (create vs update) and
//! reports the outcome back; validation failures never reach the caller's
//! submit path.

pub mod scanner;

pub use scanner::{BarcodeScanner, ScanNotice, ScanOutcome};

use std::collections::HashMap;
use std::fmt;
use validator::Validate;

use crate::error::ApiError;

// ==================== FIELD ERRORS ====================

/// Validation failures keyed by field, for rendering next to each input.
#[derive(Debug, Default, Clone, PartialEq, serde::Serialize)]
pub struct FieldErrors {
    pub errors: HashMap<String, Vec<String>>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.entry(field.into()).or_default().push(message.into());
    }

    pub fn field(&self, field: &str) -> Option<&[String]> {
        self.errors.get(field).map(Vec::as_slice)
    }

    pub fn merge(&mut self, other: FieldErrors) {
        for (field, messages) in other.errors {
            self.errors.entry(field).or_default().extend(messages);
        }
    }

    pub fn to_api_error(&self) -> ApiError {
        let mut fields: Vec<&String> = self.errors.keys().collect();
        fields.sort();
        let message = fields
            .iter()
            .map(|field| format!("{}: {}", field, self.errors[*field].join(", ")))
            .collect::<Vec<_>>()
            .join("; ");
        ApiError::ValidationError(message)
    }
}

impl From<validator::ValidationErrors> for FieldErrors {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut result = FieldErrors::new();
        for (field, kinds) in errors.field_errors() {
            for error in kinds {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field));
                result.add(field.to_string(), message);
            }
        }
        result
    }
}

// ==================== LIFECYCLE ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    /// Fields mutable, submit and cancel enabled.
    Editing,
    /// A store call is in flight; fields, submit and cancel all disabled.
    Submitting,
    /// Dismissed after success or cancel.
    Closed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormError {
    /// The action is not available in the current state.
    NotEditing,
    NotSubmitting,
    Invalid(FieldErrors),
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FormError::NotEditing => write!(f, "form is not editable right now"),
            FormError::NotSubmitting => write!(f, "no submission is in flight"),
            FormError::Invalid(errors) => {
                write!(f, "validation failed for {} field(s)", errors.errors.len())
            }
        }
    }
}

/// One open form: a value object plus its lifecycle state.
pub struct FormSession<V: Validate + Clone> {
    values: V,
    state: FormState,
}

impl<V: Validate + Clone> FormSession<V> {
    /// An empty create form or an edit form pre-populated by the caller.
    pub fn open(initial: V) -> Self {
        Self {
            values: initial,
            state: FormState::Editing,
        }
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn values(&self) -> &V {
        &self.values
    }

    /// Field edits are only possible while Editing.
    pub fn update<F: FnOnce(&mut V)>(&mut self, edit: F) -> Result<(), FormError> {
        if self.state != FormState::Editing {
            return Err(FormError::NotEditing);
        }
        edit(&mut self.values);
        Ok(())
    }

    /// Validates and, only if every rule passes, hands the caller the value
    /// to persist. On failure the session stays Editing and nothing leaves
    /// the form.
    pub fn submit(&mut self) -> Result<V, FormError> {
        if self.state != FormState::Editing {
            return Err(FormError::NotEditing);
        }
        if let Err(errors) = self.values.validate() {
            return Err(FormError::Invalid(FieldErrors::from(errors)));
        }
        self.state = FormState::Submitting;
        Ok(self.values.clone())
    }

    /// The caller's persistence succeeded; the form closes.
    pub fn complete_success(&mut self) -> Result<(), FormError> {
        if self.state != FormState::Submitting {
            return Err(FormError::NotSubmitting);
        }
        self.state = FormState::Closed;
        Ok(())
    }

    /// The caller's persistence failed; back to Editing with the values
    /// intact. Surfacing the error is the caller's job.
    pub fn complete_failure(&mut self) -> Result<(), FormError> {
        if self.state != FormState::Submitting {
            return Err(FormError::NotSubmitting);
        }
        self.state = FormState::Editing;
        Ok(())
    }

    /// Cancel is only available while Editing.
    pub fn cancel(&mut self) -> Result<(), FormError> {
        if self.state != FormState::Editing {
            return Err(FormError::NotEditing);
        }
        self.state = FormState::Closed;
        Ok(())
    }
}

// ==================== BARCODE FIELD ====================

/// Value objects carrying a scannable barcode field.
pub trait HasBarcode {
    fn set_barcode(&mut self, barcode: String);
}

impl HasBarcode for crate::models::CreateInventoryItemRequest {
    fn set_barcode(&mut self, barcode: String) {
        self.barcode = Some(barcode);
    }
}

impl HasBarcode for crate::models::UpdateInventoryItemRequest {
    fn set_barcode(&mut self, barcode: String) {
        self.barcode = Some(barcode);
    }
}

impl<V: Validate + Clone + HasBarcode> FormSession<V> {
    /// Runs one scan attempt against the environment's scanner. On success
    /// the decoded value lands in the barcode field; on denial or missing
    /// hardware the field stays manually editable and the notice is
    /// returned for the caller to surface.
    pub fn scan_barcode<S: BarcodeScanner>(&mut self, scanner: &mut S) -> Result<ScanNotice, FormError> {
        if self.state != FormState::Editing {
            return Err(FormError::NotEditing);
        }
        match scanner.request_scan() {
            ScanOutcome::Scanned(code) => {
                self.values.set_barcode(code);
                Ok(ScanNotice::Scanned)
            }
            ScanOutcome::Denied => Ok(ScanNotice::CameraDenied),
            ScanOutcome::Unavailable => Ok(ScanNotice::CameraUnavailable),
        }
    }
}

// ==================== TESTS ====================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        CreateEmployeeRequest, CreateInventoryItemRequest, CreateTaskRequest, StockStatus,
        TaskPriority, TaskStatus,
    };
    use chrono::Utc;

    fn valid_item_form() -> CreateInventoryItemRequest {
        CreateInventoryItemRequest {
            name: "Amoxicillin 250mg".to_string(),
            category: "Antibiotics".to_string(),
            quantity: 500,
            expiration_date: Utc::now(),
            status: StockStatus::InStock,
            barcode: None,
        }
    }

    #[test]
    fn test_lifecycle_happy_path() {
        let mut form = FormSession::open(valid_item_form());
        assert_eq!(form.state(), FormState::Editing);

        let values = form.submit().unwrap();
        assert_eq!(values.name, "Amoxicillin 250mg");
        assert_eq!(form.state(), FormState::Submitting);

        form.complete_success().unwrap();
        assert_eq!(form.state(), FormState::Closed);
    }

    #[test]
    fn test_invalid_quantity_blocks_submit_entirely() {
        // Scenario: quantity -1 is rejected before any store call is made.
        let mut form = FormSession::open(CreateInventoryItemRequest {
            quantity: -1,
            ..valid_item_form()
        });
        match form.submit() {
            Err(FormError::Invalid(errors)) => {
                assert!(errors.field("quantity").is_some());
            }
            other => panic!("expected validation failure, got {:?}", other.map(|v| v.name)),
        }
        // Still editing: the value object never left the form.
        assert_eq!(form.state(), FormState::Editing);
    }

    #[test]
    fn test_every_invalid_field_gets_its_own_message() {
        let mut form = FormSession::open(CreateInventoryItemRequest {
            name: "A".to_string(),
            category: "B".to_string(),
            quantity: -5,
            ..valid_item_form()
        });
        let errors = match form.submit() {
            Err(FormError::Invalid(errors)) => errors,
            _ => panic!("expected validation failure"),
        };
        assert!(errors.field("name").is_some());
        assert!(errors.field("category").is_some());
        assert!(errors.field("quantity").is_some());
        assert!(errors.field("status").is_none());
    }

    #[test]
    fn test_failed_store_call_returns_to_editing() {
        let mut form = FormSession::open(valid_item_form());
        form.submit().unwrap();
        form.complete_failure().unwrap();
        assert_eq!(form.state(), FormState::Editing);
        // The operator can correct and resubmit.
        assert!(form.submit().is_ok());
    }

    #[test]
    fn test_cancel_only_while_editing() {
        let mut form = FormSession::open(valid_item_form());
        form.submit().unwrap();
        assert_eq!(form.cancel(), Err(FormError::NotEditing));
        form.complete_success().unwrap();
        assert_eq!(form.cancel(), Err(FormError::NotEditing));

        let mut fresh = FormSession::open(valid_item_form());
        fresh.cancel().unwrap();
        assert_eq!(fresh.state(), FormState::Closed);
    }

    #[test]
    fn test_edits_disabled_while_submitting() {
        let mut form = FormSession::open(valid_item_form());
        form.submit().unwrap();
        let result = form.update(|v| v.name = "Changed".to_string());
        assert_eq!(result, Err(FormError::NotEditing));
    }

    #[test]
    fn test_employee_form_rules() {
        let mut form = FormSession::open(CreateEmployeeRequest {
            name: "C".to_string(),
            role: "R".to_string(),
            email: "carol-at-example".to_string(),
            avatar_url: None,
        });
        let errors = match form.submit() {
            Err(FormError::Invalid(errors)) => errors,
            _ => panic!("expected validation failure"),
        };
        assert!(errors.field("name").is_some());
        assert!(errors.field("role").is_some());
        assert!(errors.field("email").is_some());
    }

    #[test]
    fn test_task_form_allows_unassigned() {
        let mut form = FormSession::open(CreateTaskRequest {
            title: "Monthly Inventory Audit".to_string(),
            description: None,
            due_date: Utc::now(),
            priority: TaskPriority::High,
            status: TaskStatus::Pending,
            assigned_to: Some(String::new()),
        });
        assert!(form.submit().is_ok());
    }

    // ==================== SCANNER ====================

    struct FixedScanner(ScanOutcome);

    impl BarcodeScanner for FixedScanner {
        fn request_scan(&mut self) -> ScanOutcome {
            self.0.clone()
        }
    }

    #[test]
    fn test_scan_success_populates_barcode() {
        let mut form = FormSession::open(valid_item_form());
        let mut scanner = FixedScanner(ScanOutcome::Scanned("8901234567890".to_string()));
        assert_eq!(form.scan_barcode(&mut scanner), Ok(ScanNotice::Scanned));
        assert_eq!(form.values().barcode.as_deref(), Some("8901234567890"));
    }

    #[test]
    fn test_scan_denied_leaves_field_editable() {
        let mut form = FormSession::open(valid_item_form());
        let mut scanner = FixedScanner(ScanOutcome::Denied);
        assert_eq!(form.scan_barcode(&mut scanner), Ok(ScanNotice::CameraDenied));
        assert_eq!(form.values().barcode, None);
        // Manual entry still works.
        form.update(|v| v.barcode = Some("TYPED-1".to_string())).unwrap();
        assert_eq!(form.values().barcode.as_deref(), Some("TYPED-1"));
    }

    #[test]
    fn test_scan_unavailable_is_reported() {
        let mut form = FormSession::open(valid_item_form());
        let mut scanner = FixedScanner(ScanOutcome::Unavailable);
        assert_eq!(
            form.scan_barcode(&mut scanner),
            Ok(ScanNotice::CameraUnavailable)
        );
    }
}

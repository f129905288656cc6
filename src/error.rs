// src/error.rs
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use std::fmt;

use crate::store::StoreError;

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    PermissionDenied(String),
    Unavailable(String),
    ValidationError(String),
    InternalServerError(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    message: String,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            ApiError::PermissionDenied(msg) => write!(f, "Permission Denied: {}", msg),
            ApiError::Unavailable(msg) => write!(f, "Service Unavailable: {}", msg),
            ApiError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
            ApiError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
        }
    }
}

impl ResponseError for ApiError {
    fn error_response(&self) -> HttpResponse {
        let error_response = ErrorResponse {
            success: false,
            message: self.to_string(),
        };

        match self {
            ApiError::BadRequest(_) => HttpResponse::BadRequest().json(error_response),
            ApiError::NotFound(_) => HttpResponse::NotFound().json(error_response),
            ApiError::PermissionDenied(_) => HttpResponse::Forbidden().json(error_response),
            ApiError::Unavailable(_) => HttpResponse::ServiceUnavailable().json(error_response),
            ApiError::ValidationError(_) => HttpResponse::UnprocessableEntity().json(error_response),
            ApiError::InternalServerError(_) => HttpResponse::InternalServerError().json(error_response),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(msg) => ApiError::NotFound(msg),
            StoreError::PermissionDenied(msg) => ApiError::PermissionDenied(msg),
            StoreError::Unavailable(msg) => ApiError::Unavailable(msg),
            StoreError::Unknown(msg) => ApiError::InternalServerError(msg),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        ApiError::ValidationError(err.to_string())
    }
}

impl ApiError {
    pub fn bad_request(msg: &str) -> Self {
        ApiError::BadRequest(msg.to_string())
    }

    pub fn not_found(what: &str) -> Self {
        ApiError::NotFound(format!("{} not found", what))
    }

    pub fn item_not_found(id: &str) -> Self {
        ApiError::NotFound(format!("Inventory item with ID '{}' not found", id))
    }

    pub fn task_not_found(id: &str) -> Self {
        ApiError::NotFound(format!("Task with ID '{}' not found", id))
    }

    pub fn admin_required() -> Self {
        ApiError::PermissionDenied("This action requires the admin role".to_string())
    }

    pub fn signed_in_required() -> Self {
        ApiError::PermissionDenied("No signed-in user".to_string())
    }
}

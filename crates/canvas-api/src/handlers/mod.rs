//! Route handlers
//!
//! All HTTP request handlers organized by domain.

pub mod admin;
pub mod communities;
pub mod docs;
pub mod health;
pub mod messages;
pub mod posts;
pub mod products;
pub mod users;

use axum::extract::{rejection::QueryRejection, Query};

use crate::response::ApiError;

/// Unwrap a query string, turning a rejection into the JSON error envelope
pub(crate) fn query<T>(extracted: Result<Query<T>, QueryRejection>) -> Result<T, ApiError> {
    extracted
        .map(|Query(value)| value)
        .map_err(|e| ApiError::InvalidBody(e.body_text()))
}

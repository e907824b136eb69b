// ABOUTME: Feature-gated conversions from library errors into AppError
// ABOUTME: Maps sqlx failures onto stable error codes so storage code can use `?`
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{AppError, ErrorCode};

impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> Self {
        let (code, message) = match &error {
            sqlx::Error::RowNotFound => (ErrorCode::ResourceNotFound, "Row not found".to_owned()),
            sqlx::Error::Database(db_error) if db_error.is_unique_violation() => (
                ErrorCode::ResourceAlreadyExists,
                format!("Unique constraint violated: {}", db_error.message()),
            ),
            other => (ErrorCode::DatabaseError, other.to_string()),
        };
        Self::new(code, message).with_source(error)
    }
}

//! # Custom Extractors & Validation
//!
//! Handlers take `Result<Json<T>, JsonRejection>` and `Result<Path<T>,
//! PathRejection>` so that malformed input turns into the usual
//! `{"error": ...}` body instead of Axum's plain-text rejection.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::Path;
use axum::Json;

use crate::error::AppError;

/// Request types with rules beyond what serde checks.
pub trait Validate {
    /// Validate business rules. Returns an error message on failure.
    fn validate(&self) -> Result<(), String>;
}

/// Extract a JSON body, mapping deserialization errors to [`AppError::BadRequest`].
pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    result
        .map(|Json(v)| v)
        .map_err(|err| AppError::BadRequest(err.body_text()))
}

/// Extract a JSON body and validate it using the [`Validate`] trait.
pub fn extract_validated_json<T: Validate>(
    result: Result<Json<T>, JsonRejection>,
) -> Result<T, AppError> {
    let value = extract_json(result)?;
    value.validate().map_err(AppError::Validation)?;
    Ok(value)
}

/// Extract a path parameter, mapping parse errors to [`AppError::BadRequest`].
pub fn extract_path<T>(result: Result<Path<T>, PathRejection>) -> Result<T, AppError> {
    result
        .map(|Path(v)| v)
        .map_err(|err| AppError::BadRequest(err.body_text()))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Named(String);

    impl Validate for Named {
        fn validate(&self) -> Result<(), String> {
            if self.0.trim().is_empty() {
                return Err("name is required".into());
            }
            Ok(())
        }
    }

    #[test]
    fn valid_body_passes_through() {
        let out = extract_validated_json(Ok(Json(Named("Ada".into())))).unwrap();
        assert_eq!(out.0, "Ada");
    }

    #[test]
    fn failed_validation_is_validation_error() {
        let err = extract_validated_json(Ok(Json(Named("  ".into())))).err().unwrap();
        assert!(matches!(err, AppError::Validation(msg) if msg == "name is required"));
    }

    #[test]
    fn extract_path_unwraps_value() {
        assert_eq!(extract_path(Ok(Path(7_i32))).unwrap(), 7);
    }
}

//! HTTP handlers

pub mod analysis;
pub mod health;
pub mod monitor;
pub mod readings;

pub use analysis::*;
pub use health::*;
pub use monitor::*;
pub use readings::*;

use validator::Validate;

use crate::error::{AppError, AppResult};

/// Run derive-based validation on request input
pub(crate) fn validate_input<T: Validate>(input: &T) -> AppResult<()> {
    input.validate().map_err(|errors| {
        let field_errors = errors.field_errors();
        let mut fields: Vec<_> = field_errors.into_iter().collect();
        fields.sort_by_key(|(field, _)| *field);

        match fields.first() {
            Some((field, errs)) => {
                let message = errs
                    .first()
                    .and_then(|e| e.message.as_ref().map(|m| m.to_string()))
                    .unwrap_or_else(|| format!("Invalid value for {}", field));
                AppError::validation(*field, message)
            }
            None => AppError::validation("request", errors.to_string()),
        }
    })
}

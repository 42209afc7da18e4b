//! Input checks shared by the services.

use videotube_common::{AppError, AppResult};

/// Reject text that is empty once surrounding whitespace is removed.
///
/// The value itself is stored untrimmed.
pub fn require_text(value: &str, field: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::BadRequest(format!("{field} is required")));
    }
    Ok(())
}

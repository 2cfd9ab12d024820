//! Input validation helpers
//!
//! Centralized limits and validation functions. SQLite TEXT has no
//! built-in length enforcement, so payload fields are bounded here
//! before any write.

use crate::utils::AppError;

// ── Limits ──────────────────────────────────────────────────────────

/// Notes, free-text search terms
pub const MAX_NOTE_LEN: usize = 500;

/// Maximum allowed unit price
pub const MAX_PRICE: f64 = 1_000_000.0;

/// Maximum allowed quantity per line item
pub const MAX_QUANTITY: i64 = 9999;

/// Maximum rows per page
pub const MAX_PAGE_SIZE: i64 = 200;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

/// Validate a line-item quantity before clamping
pub fn validate_quantity(qty: i64, field: &str) -> Result<(), AppError> {
    if qty > MAX_QUANTITY {
        return Err(AppError::validation(format!(
            "{field} exceeds maximum allowed ({MAX_QUANTITY}), got {qty}"
        )));
    }
    Ok(())
}

/// Clamp page/pageSize query values into sane bounds
pub fn clamp_page(page: i64, page_size: i64) -> (i64, i64) {
    (page.max(1), page_size.clamp(1, MAX_PAGE_SIZE))
}

//! Input validation helpers
//!
//! Checks run before any request is sent. Each returns an [`AppError`]
//! carrying the offending field.

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{DISCOUNT_RANGE, QUANTITY_RANGE};

// ── Text length limits ──────────────────────────────────────────────

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Passwords
pub const MAX_PASSWORD_LEN: usize = 128;

// ── Login form ──────────────────────────────────────────────────────

/// Non-empty `local@domain` without whitespace
pub fn validate_email(email: &str) -> AppResult<()> {
    let email = email.trim();
    if email.is_empty() {
        return Err(AppError::required("email"));
    }
    if email.len() > MAX_EMAIL_LEN {
        return Err(AppError::validation(format!(
            "email is too long ({} chars, max {MAX_EMAIL_LEN})",
            email.len()
        ))
        .with_detail("field", "email"));
    }
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        return Err(
            AppError::with_message(ErrorCode::InvalidFormat, "email address is not valid")
                .with_detail("field", "email"),
        );
    }
    Ok(())
}

pub fn validate_password(password: &str) -> AppResult<()> {
    if password.is_empty() {
        return Err(AppError::required("password"));
    }
    if password.len() > MAX_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "password is too long (max {MAX_PASSWORD_LEN})"
        ))
        .with_detail("field", "password"));
    }
    Ok(())
}

// ── Medicine form ───────────────────────────────────────────────────

pub fn validate_quantity(quantity: i64) -> AppResult<()> {
    let (min, max) = QUANTITY_RANGE;
    if !(min..=max).contains(&quantity) {
        return Err(AppError::out_of_range(
            ErrorCode::QuantityOutOfRange,
            "quantity",
            min,
            max,
        ));
    }
    Ok(())
}

pub fn validate_discount(discount: f64) -> AppResult<()> {
    let (min, max) = DISCOUNT_RANGE;
    if !discount.is_finite() || !(min..=max).contains(&discount) {
        return Err(AppError::out_of_range(
            ErrorCode::DiscountOutOfRange,
            "discount",
            min as i64,
            max as i64,
        ));
    }
    Ok(())
}

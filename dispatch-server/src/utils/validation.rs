//! Input validation helpers
//!
//! Centralized length limits and checks shared by the dispatch engine and
//! the HTTP handlers. Everything here fails with `DispatchError::InvalidInput`.

use shared::ride::Location;

use crate::rides::DispatchError;

// ── Text length limits ──────────────────────────────────────────────

/// Rider / driver identifiers
pub const MAX_PARTY_ID_LEN: usize = 100;

/// Ride identifiers (UUID v4 is 36 chars, allow client-side formats)
pub const MAX_RIDE_ID_LEN: usize = 64;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(
    value: &str,
    field: &str,
    max_len: usize,
) -> Result<(), DispatchError> {
    if value.trim().is_empty() {
        return Err(DispatchError::invalid_input(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(DispatchError::invalid_input(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate a rider or driver id.
pub fn validate_party_id(value: &str, field: &str) -> Result<(), DispatchError> {
    validate_required_text(value, field, MAX_PARTY_ID_LEN)
}

/// Validate a pickup / dropoff location.
pub fn validate_location(location: &Location, field: &str) -> Result<(), DispatchError> {
    location
        .validate()
        .map_err(|msg| DispatchError::invalid_input(format!("{field}: {msg}")))
}

/// Validate an optional non-negative finite number.
pub fn validate_optional_non_negative(
    value: Option<f64>,
    field: &str,
) -> Result<(), DispatchError> {
    if let Some(v) = value
        && (!v.is_finite() || v < 0.0)
    {
        return Err(DispatchError::invalid_input(format!(
            "{field} must be a finite non-negative number, got {v}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text() {
        assert!(validate_required_text("r1", "riderId", 10).is_ok());
        assert!(validate_required_text("   ", "riderId", 10).is_err());
        assert!(validate_required_text("abcdefghijk", "riderId", 10).is_err());
    }

    #[test]
    fn test_location() {
        assert!(validate_location(&Location::new(77.6, 12.9, "x"), "pickup").is_ok());
        let err = validate_location(&Location::new(200.0, 0.0, ""), "pickup").unwrap_err();
        assert!(err.to_string().contains("pickup"));
    }

    #[test]
    fn test_optional_non_negative() {
        assert!(validate_optional_non_negative(None, "durationMin").is_ok());
        assert!(validate_optional_non_negative(Some(0.0), "durationMin").is_ok());
        assert!(validate_optional_non_negative(Some(-1.0), "durationMin").is_err());
        assert!(validate_optional_non_negative(Some(f64::NAN), "durationMin").is_err());
    }
}

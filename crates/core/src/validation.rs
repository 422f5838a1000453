//! Field-level validation helpers shared by the domain modules.

use std::sync::OnceLock;

use regex::Regex;
use validator::ValidateEmail;

use crate::error::CoreError;
use crate::types::{Cents, Date};

/// Maximum length for free-text names (shows, campaigns, creatives, ...).
pub const MAX_NAME_LENGTH: usize = 200;

fn slug_regex() -> &'static Regex {
    static SLUG: OnceLock<Regex> = OnceLock::new();
    SLUG.get_or_init(|| Regex::new(r"^[a-z0-9][a-z0-9-]*$").expect("slug regex is valid"))
}

/// Require a trimmed, non-empty name no longer than [`MAX_NAME_LENGTH`].
pub fn validate_name(value: &str, field: &str) -> Result<(), CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be empty")));
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "{field} must be at most {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate an organization slug: lowercase alphanumerics and dashes.
pub fn validate_slug(slug: &str) -> Result<(), CoreError> {
    if slug.len() > 64 || !slug_regex().is_match(slug) {
        return Err(CoreError::Validation(format!(
            "Invalid slug '{slug}'. Use lowercase letters, digits and dashes"
        )));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), CoreError> {
    if !email.validate_email() {
        return Err(CoreError::Validation(format!(
            "Invalid email address '{email}'"
        )));
    }
    Ok(())
}

/// Billed amounts must be strictly positive.
pub fn validate_positive_cents(amount: Cents, field: &str) -> Result<(), CoreError> {
    if amount <= 0 {
        return Err(CoreError::Validation(format!(
            "{field} must be greater than zero, got {amount}"
        )));
    }
    Ok(())
}

/// `end` must not precede `start`. Open-ended ranges are accepted.
pub fn validate_date_range(start: Option<Date>, end: Option<Date>) -> Result<(), CoreError> {
    if let (Some(start), Some(end)) = (start, end) {
        if end < start {
            return Err(CoreError::Validation(format!(
                "End date {end} is before start date {start}"
            )));
        }
    }
    Ok(())
}

/// Percentages (discounts, revenue shares) must fall within `[0, 100]`.
pub fn validate_percentage(value: f64, field: &str) -> Result<(), CoreError> {
    if !value.is_finite() || !(0.0..=100.0).contains(&value) {
        return Err(CoreError::Validation(format!(
            "{field} must be between 0 and 100, got {value}"
        )));
    }
    Ok(())
}

/// Check `value` against an allowed list, naming the field in the error.
pub fn validate_one_of(value: &str, allowed: &[&str], field: &str) -> Result<(), CoreError> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid {field} '{value}'. Must be one of: {}",
            allowed.join(", ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn blank_name_rejected() {
        assert_matches!(validate_name("   ", "name"), Err(CoreError::Validation(_)));
    }

    #[test]
    fn long_name_rejected() {
        let long = "x".repeat(MAX_NAME_LENGTH + 1);
        assert!(validate_name(&long, "name").is_err());
        assert!(validate_name("The Daily Pod", "name").is_ok());
    }

    #[test]
    fn slug_rules() {
        assert!(validate_slug("acme-media").is_ok());
        assert!(validate_slug("99pi").is_ok());
        assert!(validate_slug("-leading").is_err());
        assert!(validate_slug("Upper").is_err());
        assert!(validate_slug("has space").is_err());
        assert!(validate_slug("").is_err());
    }

    #[test]
    fn email_rules() {
        assert!(validate_email("sales@acme.fm").is_ok());
        assert!(validate_email("not-an-email").is_err());
    }

    #[test]
    fn positive_cents() {
        assert!(validate_positive_cents(1, "amount").is_ok());
        assert!(validate_positive_cents(0, "amount").is_err());
        assert!(validate_positive_cents(-500, "amount").is_err());
    }

    #[test]
    fn date_range() {
        assert!(validate_date_range(Some(date(2026, 1, 1)), Some(date(2026, 1, 1))).is_ok());
        assert!(validate_date_range(Some(date(2026, 2, 1)), Some(date(2026, 1, 1))).is_err());
        assert!(validate_date_range(None, Some(date(2026, 1, 1))).is_ok());
    }

    #[test]
    fn percentage_bounds() {
        assert!(validate_percentage(0.0, "discount_pct").is_ok());
        assert!(validate_percentage(100.0, "discount_pct").is_ok());
        assert!(validate_percentage(100.5, "discount_pct").is_err());
        assert!(validate_percentage(f64::NAN, "discount_pct").is_err());
    }

    #[test]
    fn one_of_names_allowed_values() {
        let err = validate_one_of("weekly", &["cpm", "spot"], "pricing_model").unwrap_err();
        assert!(err.to_string().contains("cpm, spot"));
    }
}

//! Field rules. Each rule appends to `errors` and never short-circuits.

use regex::Regex;
use std::fmt::Display;
use std::sync::LazyLock;

use super::FieldErrors;

/// SST registration number: `LETTER DD-DDDD-DDDDDDDD`, e.g. `W10-1808-32000123`.
pub static SST_REGISTRATION_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][0-9]{2}-[0-9]{4}-[0-9]{8}$").expect("valid SST regex"));

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex")
});

/// Malaysian phone numbers: optional +60 / 0 prefix, 8 to 11 digits, dashes and spaces allowed.
static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9][0-9 \-]{7,14}$").expect("valid phone regex"));

pub fn not_blank(errors: &mut FieldErrors, field: &str, value: &str) -> bool {
    if value.trim().is_empty() {
        errors.push(field, "must not be empty");
        return false;
    }
    true
}

pub fn max_len(errors: &mut FieldErrors, field: &str, value: &str, max: usize) {
    if value.chars().count() > max {
        errors.push(field, format!("must be at most {max} characters"));
    }
}

pub fn min_len(errors: &mut FieldErrors, field: &str, value: &str, min: usize) {
    if value.chars().count() < min {
        errors.push(field, format!("must be at least {min} characters"));
    }
}

/// Required, non-blank, bounded string.
pub fn text(errors: &mut FieldErrors, field: &str, value: &str, max: usize) {
    if not_blank(errors, field, value) {
        max_len(errors, field, value, max);
    }
}

/// Optional bounded string; `None` passes.
pub fn optional_text(errors: &mut FieldErrors, field: &str, value: Option<&str>, max: usize) {
    if let Some(v) = value {
        max_len(errors, field, v, max);
    }
}

pub fn one_of<T>(errors: &mut FieldErrors, field: &str, value: &T, allowed: &[T])
where
    T: PartialEq + Display,
{
    if !allowed.contains(value) {
        let list = allowed
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        errors.push(field, format!("must be one of: {list}"));
    }
}

/// Inclusive numeric bounds. NaN is always rejected.
pub fn range(errors: &mut FieldErrors, field: &str, value: f64, min: f64, max: f64) {
    if value.is_nan() || value < min || value > max {
        errors.push(field, format!("must be between {min} and {max}"));
    }
}

pub fn min(errors: &mut FieldErrors, field: &str, value: f64, min: f64) {
    if value.is_nan() || value < min {
        errors.push(field, format!("must not be less than {min}"));
    }
}

pub fn pattern(errors: &mut FieldErrors, field: &str, value: &str, re: &Regex, message: &str) {
    if !re.is_match(value) {
        errors.push(field, message);
    }
}

pub fn email(errors: &mut FieldErrors, field: &str, value: &str) {
    pattern(errors, field, value, &EMAIL, "must be a valid email address");
}

pub fn phone(errors: &mut FieldErrors, field: &str, value: &str) {
    pattern(errors, field, value, &PHONE, "must be a valid phone number");
}

pub fn sst_registration_number(errors: &mut FieldErrors, field: &str, value: &str) {
    pattern(
        errors,
        field,
        value,
        &SST_REGISTRATION_NUMBER,
        "SST registration number must match format: A12-3456-78901234",
    );
}

/// `YYYY-MM-DD` with a plausible month/day. Calendar edge cases are left to the backend.
pub fn iso_date(errors: &mut FieldErrors, field: &str, value: &str) {
    let parts: Vec<&str> = value.split('-').collect();
    let ok = parts.len() == 3
        && parts[0].len() == 4
        && parts[1].len() == 2
        && parts[2].len() == 2
        && parts.iter().all(|p| p.chars().all(|c| c.is_ascii_digit()))
        && matches!(parts[1].parse::<u8>(), Ok(1..=12))
        && matches!(parts[2].parse::<u8>(), Ok(1..=31));
    if !ok {
        errors.push(field, "must be a date in YYYY-MM-DD format");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sst_pattern_accepts_letter_dd_dddd_dddddddd() {
        assert!(SST_REGISTRATION_NUMBER.is_match("W10-1808-32000123"));
        assert!(SST_REGISTRATION_NUMBER.is_match("B16-1234-12345678"));
    }

    #[test]
    fn sst_pattern_rejects_near_misses() {
        for bad in [
            "w10-1808-32000123",
            "W1-1808-32000123",
            "W10-180-32000123",
            "W10-1808-3200012",
            "W10180832000123",
            "W10-1808-320001234",
            " W10-1808-32000123",
            "W١٠-١٨٠٨-٣٢٠٠٠١٢٣",
            "",
        ] {
            assert!(!SST_REGISTRATION_NUMBER.is_match(bad), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn rules_collect_every_failure() {
        let mut errors = FieldErrors::new();
        text(&mut errors, "name", "   ", 10);
        max_len(&mut errors, "sku", "ABCDEFGHIJK", 10);
        one_of(&mut errors, "rate", &7u8, &[0, 5, 6, 8, 10]);
        range(&mut errors, "pct", 101.0, 0.0, 100.0);
        email(&mut errors, "email", "not-an-email");
        assert_eq!(errors.len(), 5);
        assert!(errors.has_field("rate"));
        assert_eq!(
            errors.for_field("rate").next().unwrap().message,
            "must be one of: 0, 5, 6, 8, 10"
        );
    }

    #[test]
    fn range_rejects_nan() {
        let mut errors = FieldErrors::new();
        range(&mut errors, "price", f64::NAN, 0.0, 10.0);
        assert!(errors.has_field("price"));
    }

    #[test]
    fn iso_date_checks_shape() {
        let mut errors = FieldErrors::new();
        iso_date(&mut errors, "ok", "2024-02-29");
        assert!(errors.is_empty());
        iso_date(&mut errors, "month", "2024-13-01");
        iso_date(&mut errors, "shape", "01/02/2024");
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn phone_accepts_local_formats() {
        let mut errors = FieldErrors::new();
        phone(&mut errors, "a", "+60123456789");
        phone(&mut errors, "b", "03-7890 1234");
        assert!(errors.is_empty());
        phone(&mut errors, "c", "call me");
        assert_eq!(errors.len(), 1);
    }
}

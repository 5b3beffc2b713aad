//! Unit Conversion Functions
//!
//! Provides conversion functions for body measurements:
//! - Length: cm ↔ inches, cm ↔ feet + inches
//! - Weight: kg ↔ lbs
//! - Display rounding used when re-populating form fields after a unit toggle
//!
//! Values sent to the backend are never rounded; only the text shown back to
//! the user after a toggle goes through [`round_to_tenth`].

/// Centimetres per inch
pub const CM_PER_INCH: f64 = 2.54;

/// Kilograms per pound
pub const KG_PER_LB: f64 = 0.453592;

/// Inches per foot
pub const INCHES_PER_FOOT: f64 = 12.0;

/// Convert inches to centimetres
pub fn inches_to_cm(inches: f64) -> f64 {
    inches * CM_PER_INCH
}

/// Convert centimetres to inches
pub fn cm_to_inches(cm: f64) -> f64 {
    cm / CM_PER_INCH
}

/// Convert pounds to kilograms
pub fn lbs_to_kg(lbs: f64) -> f64 {
    lbs * KG_PER_LB
}

/// Convert kilograms to pounds
pub fn kg_to_lbs(kg: f64) -> f64 {
    kg / KG_PER_LB
}

/// Convert a feet + inches height to centimetres
///
/// `total_inches = feet * 12 + inches`, then scaled by [`CM_PER_INCH`].
pub fn feet_inches_to_cm(feet: f64, inches: f64) -> f64 {
    inches_to_cm(feet * INCHES_PER_FOOT + inches)
}

/// Convert a centimetre height to whole feet and rounded inches
///
/// # Returns
/// `(feet, inches)` where feet is `floor(total_inches / 12)` and inches is the
/// rounded remainder. A remainder that rounds up to 12 is carried into feet.
pub fn cm_to_feet_inches(cm: f64) -> (u32, u32) {
    let total_inches = cm_to_inches(cm).max(0.0);
    let mut feet = (total_inches / INCHES_PER_FOOT).floor() as u32;
    let mut inches = (total_inches % INCHES_PER_FOOT).round() as u32;
    if inches >= INCHES_PER_FOOT as u32 {
        feet += 1;
        inches = 0;
    }
    (feet, inches)
}

/// Round to one decimal place (display re-population only)
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Format a number the way form fields show it: no trailing `.0`
pub fn format_number(value: f64) -> String {
    format!("{}", value)
}

/// Lenient numeric coercion used before conversion.
///
/// Empty or non-numeric text becomes `0.0`; validation is what actually keeps
/// zero values away from the backend.
pub fn coerce_number(text: &str) -> f64 {
    parse_number(text).unwrap_or(0.0)
}

/// Strict parse of a form field: trimmed, finite, otherwise `None`
pub fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inches_cm_conversion() {
        assert!((inches_to_cm(1.0) - 2.54).abs() < 1e-9);
        assert!((cm_to_inches(2.54) - 1.0).abs() < 1e-9);
        assert!((inches_to_cm(32.0) - 81.28).abs() < 1e-9);
    }

    #[test]
    fn test_lbs_kg_conversion() {
        assert!((lbs_to_kg(100.0) - 45.3592).abs() < 1e-9);
        assert!((kg_to_lbs(45.3592) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_feet_inches_to_cm() {
        assert!((feet_inches_to_cm(5.0, 10.0) - 177.8).abs() < 1e-9);
        assert!((feet_inches_to_cm(6.0, 0.0) - 182.88).abs() < 1e-9);
    }

    #[test]
    fn test_cm_to_feet_inches_carries_twelve_inches() {
        // 182.5 cm = 71.85 in -> 5 ft 11.85 in -> rounds to 12
        assert_eq!(cm_to_feet_inches(182.5), (6, 0));
        assert_eq!(cm_to_feet_inches(177.8), (5, 10));
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number(" 72.5 "), Some(72.5));
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(coerce_number("abc"), 0.0);
    }

    #[test]
    fn test_format_number_drops_trailing_zero() {
        assert_eq!(format_number(73.0), "73");
        assert_eq!(format_number(72.5), "72.5");
    }
}

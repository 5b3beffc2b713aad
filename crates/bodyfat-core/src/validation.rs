//! Input validation for the data form.
//!
//! Rules run in a fixed order and stop at the first failure, so the user
//! sees exactly one message naming one field.

use thiserror::Error;

use crate::measurement::{DataForm, UnitSystem};
use crate::unit_conversion::parse_number;

/// Oldest age the backend accepts
pub const MAX_AGE: u32 = 120;

/// First failing field of the data form
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// No gender selected
    #[error("Please select gender")]
    Gender,

    /// Age missing, non-integer or out of range
    #[error("Please enter a valid age")]
    Age,

    /// Imperial feet missing or not positive
    #[error("Please enter a valid height (feet)")]
    HeightFeet,

    /// Imperial inches missing or negative
    #[error("Please enter a valid height (inches)")]
    HeightInches,

    /// Metric height missing or not positive
    #[error("Please enter a valid height (in cm)")]
    HeightCm,

    /// Weight missing or not positive
    #[error("Please enter a valid weight (in {})", .0.weight_unit())]
    Weight(UnitSystem),

    /// Waist given but not a positive number
    #[error("Please enter a valid waist circumference (in {})", .0.waist_unit())]
    Waist(UnitSystem),
}

impl ValidationError {
    /// Name of the offending field
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::Gender => "gender",
            ValidationError::Age => "age",
            ValidationError::HeightFeet => "height_feet",
            ValidationError::HeightInches => "height_inches",
            ValidationError::HeightCm => "height_cm",
            ValidationError::Weight(_) => "weight",
            ValidationError::Waist(_) => "waist",
        }
    }
}

fn positive(text: &str) -> bool {
    parse_number(text).is_some_and(|v| v > 0.0)
}

/// Check the form, returning the first failing rule.
pub fn validate(form: &DataForm) -> Result<(), ValidationError> {
    if form.gender.is_none() {
        return Err(ValidationError::Gender);
    }

    match form.age.trim().parse::<u32>() {
        Ok(age) if (1..=MAX_AGE).contains(&age) => {}
        _ => return Err(ValidationError::Age),
    }

    let system = form.measurement.system();
    let fields = form.measurement.fields();
    match system {
        UnitSystem::Imperial => {
            if !positive(&fields.height_feet) {
                return Err(ValidationError::HeightFeet);
            }
            if !parse_number(&fields.height_inches).is_some_and(|v| v >= 0.0) {
                return Err(ValidationError::HeightInches);
            }
        }
        UnitSystem::Metric => {
            if !positive(&fields.height_cm) {
                return Err(ValidationError::HeightCm);
            }
        }
    }

    if !positive(&fields.weight) {
        return Err(ValidationError::Weight(system));
    }

    if !fields.waist.trim().is_empty() && !positive(&fields.waist) {
        return Err(ValidationError::Waist(system));
    }

    Ok(())
}

//! Data-entry form and unit system handling.
//!
//! Fields are kept as the text the user typed so that validation can report
//! exactly what was entered. Only one unit system is active at a time; the
//! inactive height representation is kept empty after a successful toggle.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::Gender;
use crate::unit_conversion::{
    cm_to_feet_inches, cm_to_inches, coerce_number, feet_inches_to_cm, format_number,
    inches_to_cm, kg_to_lbs, lbs_to_kg, parse_number, round_to_tenth,
};

/// Active unit system of the form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    /// cm / kg
    #[default]
    Metric,
    /// ft + in / lb
    Imperial,
}

impl UnitSystem {
    /// Unit label for weight
    pub fn weight_unit(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "kg",
            UnitSystem::Imperial => "lbs",
        }
    }

    /// Unit label for waist circumference
    pub fn waist_unit(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "cm",
            UnitSystem::Imperial => "inches",
        }
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitSystem::Metric => f.write_str("metric"),
            UnitSystem::Imperial => f.write_str("imperial"),
        }
    }
}

impl FromStr for UnitSystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "metric" => Ok(UnitSystem::Metric),
            "imperial" => Ok(UnitSystem::Imperial),
            other => Err(format!("Unknown unit system '{}'", other)),
        }
    }
}

/// Raw text of the measurement fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasurementFields {
    /// Height in cm (metric only)
    pub height_cm: String,
    /// Height feet (imperial only)
    pub height_feet: String,
    /// Height inches (imperial only)
    pub height_inches: String,
    /// Weight in kg or lbs
    pub weight: String,
    /// Waist in cm or inches; empty when not given
    pub waist: String,
}

/// Metric values sent to the backend
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricMeasurement {
    /// Height in centimetres
    pub height_cm: f64,
    /// Weight in kilograms
    pub weight_kg: f64,
    /// Waist in centimetres, when the field was filled in
    pub waist_cm: Option<f64>,
}

/// Scale a field when it parses to a non-zero number; otherwise leave it alone
fn scale_field(text: &str, convert: impl Fn(f64) -> f64) -> Option<String> {
    parse_number(text)
        .filter(|v| *v != 0.0)
        .map(|v| format_number(round_to_tenth(convert(v))))
}

/// Convert field text from one unit system to another.
///
/// Fields that are empty or do not parse to a non-zero number are left as
/// typed. Weight and waist are rounded to one decimal place; metric height is
/// rounded to a whole centimetre.
pub fn convert_fields(
    fields: &MeasurementFields,
    from: UnitSystem,
    to: UnitSystem,
) -> MeasurementFields {
    let mut out = fields.clone();
    match (from, to) {
        (UnitSystem::Metric, UnitSystem::Imperial) => {
            if let Some(cm) = parse_number(&fields.height_cm).filter(|v| *v != 0.0) {
                let (feet, inches) = cm_to_feet_inches(cm);
                out.height_feet = feet.to_string();
                out.height_inches = inches.to_string();
                out.height_cm.clear();
            }
            if let Some(lbs) = scale_field(&fields.weight, kg_to_lbs) {
                out.weight = lbs;
            }
            if let Some(inches) = scale_field(&fields.waist, cm_to_inches) {
                out.waist = inches;
            }
        }
        (UnitSystem::Imperial, UnitSystem::Metric) => {
            if !fields.height_feet.trim().is_empty() && !fields.height_inches.trim().is_empty() {
                let cm = feet_inches_to_cm(
                    coerce_number(&fields.height_feet),
                    coerce_number(&fields.height_inches),
                );
                out.height_cm = format_number(cm.round());
                out.height_feet.clear();
                out.height_inches.clear();
            }
            if let Some(kg) = scale_field(&fields.weight, lbs_to_kg) {
                out.weight = kg;
            }
            if let Some(cm) = scale_field(&fields.waist, inches_to_cm) {
                out.waist = cm;
            }
        }
        _ => {}
    }
    out
}

/// Height, weight and optional waist in the active unit system
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Measurement {
    system: UnitSystem,
    fields: MeasurementFields,
    /// Fields as they were before the last toggle, keyed by their system
    toggled_from: Option<(UnitSystem, MeasurementFields)>,
}

impl Measurement {
    /// Empty metric measurement
    pub fn new() -> Self {
        Self::default()
    }

    /// Active unit system
    pub fn system(&self) -> UnitSystem {
        self.system
    }

    /// Current field text
    pub fn fields(&self) -> &MeasurementFields {
        &self.fields
    }

    /// Set metric height text
    pub fn set_height_cm(&mut self, text: impl Into<String>) {
        self.fields.height_cm = text.into();
        self.toggled_from = None;
    }

    /// Set imperial height text
    pub fn set_height_feet_inches(&mut self, feet: impl Into<String>, inches: impl Into<String>) {
        self.fields.height_feet = feet.into();
        self.fields.height_inches = inches.into();
        self.toggled_from = None;
    }

    /// Set weight text in the active unit
    pub fn set_weight(&mut self, text: impl Into<String>) {
        self.fields.weight = text.into();
        self.toggled_from = None;
    }

    /// Set waist text in the active unit; an empty string clears it
    pub fn set_waist(&mut self, text: impl Into<String>) {
        self.fields.waist = text.into();
        self.toggled_from = None;
    }

    /// Switch the active unit system, re-populating the fields.
    ///
    /// Toggling back without any edit in between restores the exact text that
    /// was entered before the first toggle.
    pub fn toggle_system(&mut self, target: UnitSystem) {
        if target == self.system {
            return;
        }
        match self.toggled_from.take() {
            Some((system, fields)) if system == target => {
                self.fields = fields;
            }
            _ => {
                let converted = convert_fields(&self.fields, self.system, target);
                let previous = std::mem::replace(&mut self.fields, converted);
                self.toggled_from = Some((self.system, previous));
            }
        }
        self.system = target;
    }

    /// Full-precision metric values; unparseable fields count as zero
    pub fn to_metric(&self) -> MetricMeasurement {
        let f = &self.fields;
        let waist_given = !f.waist.trim().is_empty();
        match self.system {
            UnitSystem::Imperial => MetricMeasurement {
                height_cm: feet_inches_to_cm(
                    coerce_number(&f.height_feet),
                    coerce_number(&f.height_inches),
                ),
                weight_kg: lbs_to_kg(coerce_number(&f.weight)),
                waist_cm: waist_given.then(|| inches_to_cm(coerce_number(&f.waist))),
            },
            UnitSystem::Metric => MetricMeasurement {
                height_cm: coerce_number(&f.height_cm),
                weight_kg: coerce_number(&f.weight),
                waist_cm: waist_given.then(|| coerce_number(&f.waist)),
            },
        }
    }
}

/// Step 2 form: gender, age and measurement
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataForm {
    /// Selected gender
    pub gender: Option<Gender>,
    /// Age text
    pub age: String,
    /// Height, weight, waist
    pub measurement: Measurement,
}

impl DataForm {
    /// Empty form in metric units
    pub fn new() -> Self {
        Self::default()
    }

    /// Select gender
    pub fn set_gender(&mut self, gender: Gender) {
        self.gender = Some(gender);
    }

    /// Set age text
    pub fn set_age(&mut self, text: impl Into<String>) {
        self.age = text.into();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_metric_to_imperial_fields() {
        let fields = MeasurementFields {
            height_cm: "180".into(),
            weight: "80".into(),
            waist: "85".into(),
            ..Default::default()
        };
        let out = convert_fields(&fields, UnitSystem::Metric, UnitSystem::Imperial);
        assert_eq!(out.height_feet, "5");
        assert_eq!(out.height_inches, "11");
        assert_eq!(out.height_cm, "");
        assert_eq!(out.weight, "176.4");
        assert_eq!(out.waist, "33.5");
    }

    #[test]
    fn test_imperial_height_needs_both_parts() {
        let fields = MeasurementFields {
            height_feet: "5".into(),
            ..Default::default()
        };
        let out = convert_fields(&fields, UnitSystem::Imperial, UnitSystem::Metric);
        assert_eq!(out.height_cm, "");
        assert_eq!(out.height_feet, "5");
    }

    #[test]
    fn test_zero_and_garbage_left_untouched() {
        let fields = MeasurementFields {
            height_cm: "0".into(),
            weight: "abc".into(),
            ..Default::default()
        };
        let out = convert_fields(&fields, UnitSystem::Metric, UnitSystem::Imperial);
        assert_eq!(out, fields);
    }

    #[test]
    fn test_edit_discards_toggle_snapshot() {
        let mut m = Measurement::new();
        m.set_height_cm("177");
        m.toggle_system(UnitSystem::Imperial);
        m.set_weight("170");
        m.toggle_system(UnitSystem::Metric);
        // 5 ft 10 in converted freshly, not restored
        assert_eq!(m.fields().height_cm, "178");
        assert_eq!(m.fields().weight, "77.1");
    }
}

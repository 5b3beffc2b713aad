//! Body fat evaluation bands.
//!
//! The backend normally labels a result itself; [`evaluate`] is the local
//! fallback used only when that label is missing.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::models::Gender;

/// Named body fat range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EvaluationBand {
    /// Below essential fat levels
    VeryLow,
    /// Athletic
    Low,
    /// Healthy average
    Normal,
    /// Above the healthy range
    AboveAverage,
    /// Obese range
    High,
}

impl EvaluationBand {
    /// All bands, lowest first
    pub const ALL: [EvaluationBand; 5] = [
        EvaluationBand::VeryLow,
        EvaluationBand::Low,
        EvaluationBand::Normal,
        EvaluationBand::AboveAverage,
        EvaluationBand::High,
    ];

    /// User-facing label
    pub fn label(&self) -> &'static str {
        match self {
            EvaluationBand::VeryLow => "Very Low",
            EvaluationBand::Low => "Low (Athletic)",
            EvaluationBand::Normal => "Normal",
            EvaluationBand::AboveAverage => "Above Average",
            EvaluationBand::High => "High",
        }
    }

    /// Match a label back to its band (case-insensitive)
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|band| band.label().eq_ignore_ascii_case(label))
    }
}

impl fmt::Display for EvaluationBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Upper bounds (exclusive) of VeryLow, Low, Normal and AboveAverage
fn thresholds(gender: Gender) -> [f64; 4] {
    match gender {
        Gender::Male => [6.0, 14.0, 18.0, 25.0],
        Gender::Female => [16.0, 20.0, 25.0, 32.0],
    }
}

/// Classify a body fat percentage with the gender-specific thresholds
pub fn evaluate(body_fat_percent: f64, gender: Gender) -> EvaluationBand {
    let [very_low, low, normal, above] = thresholds(gender);
    if body_fat_percent < very_low {
        EvaluationBand::VeryLow
    } else if body_fat_percent < low {
        EvaluationBand::Low
    } else if body_fat_percent < normal {
        EvaluationBand::Normal
    } else if body_fat_percent < above {
        EvaluationBand::AboveAverage
    } else {
        EvaluationBand::High
    }
}

/// Resolved evaluation of a result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Evaluation {
    /// One of the known bands
    Band(EvaluationBand),
    /// A server label that matches no known band, shown verbatim
    Custom(String),
}

impl Evaluation {
    /// Prefer the server's label; classify locally when it is absent or blank.
    pub fn resolve(server: Option<&str>, body_fat_percent: f64, gender: Gender) -> Self {
        match server.map(str::trim).filter(|s| !s.is_empty()) {
            Some(label) => match EvaluationBand::from_label(label) {
                Some(band) => Evaluation::Band(band),
                None => Evaluation::Custom(label.to_string()),
            },
            None => Evaluation::Band(evaluate(body_fat_percent, gender)),
        }
    }

    /// Label shown to the user and sent with the advice request
    pub fn label(&self) -> &str {
        match self {
            Evaluation::Band(band) => band.label(),
            Evaluation::Custom(label) => label,
        }
    }
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Evaluation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

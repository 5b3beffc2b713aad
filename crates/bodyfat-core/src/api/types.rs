//! Wire types for the backend endpoints

use serde::{Deserialize, Serialize};

use crate::models::{BiometricInput, EstimationResult, Gender};

/// `POST /api/bodyfat` response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyFatResponse {
    /// Estimated body fat percentage
    pub body_fat_percent: f64,
    /// Comment on the estimate
    #[serde(default)]
    pub comment: String,
    /// Server-side evaluation label
    #[serde(default)]
    pub evaluation: Option<String>,
}

impl BodyFatResponse {
    /// Resolve into a result, classifying locally when the label is missing
    pub fn into_result(self, gender: Gender) -> EstimationResult {
        EstimationResult::new(
            self.body_fat_percent,
            self.comment,
            self.evaluation.as_deref(),
            gender,
        )
    }
}

/// `POST /api/advice` request body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdviceRequest {
    /// Estimated body fat percentage
    pub body_fat_percent: f64,
    /// Gender
    pub gender: Gender,
    /// Age in years
    pub age: u32,
    /// Evaluation label of the result
    pub evaluation: String,
}

impl AdviceRequest {
    /// Build the request for a completed estimation
    pub fn new(input: &BiometricInput, result: &EstimationResult) -> Self {
        Self {
            body_fat_percent: result.body_fat_percent,
            gender: input.gender,
            age: input.age,
            evaluation: result.evaluation.label().to_string(),
        }
    }
}

//! Domain models shared by the wizard, the backend client and the renderers.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::evaluation::Evaluation;
use crate::measurement::DataForm;
use crate::validation::{validate, ValidationError};

/// Biological sex used by the estimation model and the evaluation bands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    /// Male thresholds
    Male,
    /// Female thresholds
    Female,
}

impl Gender {
    /// Wire representation (`"male"` / `"female"`)
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" | "m" => Ok(Gender::Male),
            "female" | "f" => Ok(Gender::Female),
            other => Err(format!("Unknown gender '{}'", other)),
        }
    }
}

/// Reference to a local photo selected by the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoRef(PathBuf);

impl PhotoRef {
    /// Wrap a local path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    /// Local path of the photo
    pub fn path(&self) -> &Path {
        &self.0
    }

    /// Upload file name: the last path segment, or `photo.jpg`
    pub fn file_name(&self) -> String {
        self.0
            .file_name()
            .and_then(|n| n.to_str())
            .filter(|n| !n.is_empty())
            .unwrap_or("photo.jpg")
            .to_string()
    }

    /// Content type derived from the file extension
    pub fn mime_type(&self) -> &'static str {
        let ext = self
            .0
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("png") => "image/png",
            Some("heic") => "image/heic",
            Some("webp") => "image/webp",
            _ => "image/jpeg",
        }
    }
}

impl fmt::Display for PhotoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// Validated, metric biometrics for one calculation.
///
/// Built fresh from the data form each time "Calculate" proceeds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BiometricInput {
    /// Gender
    pub gender: Gender,
    /// Age in whole years
    pub age: u32,
    /// Height in centimetres
    pub height_cm: f64,
    /// Weight in kilograms
    pub weight_kg: f64,
    /// Waist circumference in centimetres, when given
    pub waist_cm: Option<f64>,
}

impl BiometricInput {
    /// Validate the form and convert it to metric.
    pub fn from_form(form: &DataForm) -> Result<Self, ValidationError> {
        validate(form)?;
        let gender = form.gender.ok_or(ValidationError::Gender)?;
        let age = form.age.trim().parse::<u32>().map_err(|_| ValidationError::Age)?;
        let metric = form.measurement.to_metric();
        Ok(Self {
            gender,
            age,
            height_cm: metric.height_cm,
            weight_kg: metric.weight_kg,
            waist_cm: metric.waist_cm,
        })
    }
}

/// A completed estimation, with the evaluation already resolved
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EstimationResult {
    /// Estimated body fat percentage
    pub body_fat_percent: f64,
    /// Free-text comment from the backend
    pub comment: String,
    /// Server evaluation, or the locally classified band
    pub evaluation: Evaluation,
}

impl EstimationResult {
    /// Build a result, falling back to the local classifier when the server
    /// evaluation is missing or blank.
    pub fn new(
        body_fat_percent: f64,
        comment: impl Into<String>,
        server_evaluation: Option<&str>,
        gender: Gender,
    ) -> Self {
        Self {
            body_fat_percent,
            comment: comment.into(),
            evaluation: Evaluation::resolve(server_evaluation, body_fat_percent, gender),
        }
    }
}

/// Personalised advice returned for a result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvicePayload {
    /// Heading
    pub title: String,
    /// Ordered advice sections
    pub sections: Vec<AdviceSection>,
    /// Estimated time to reach lower body fat levels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_estimate: Option<TimeEstimate>,
}

/// One advice section (nutrition, training, sleep, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdviceSection {
    /// Section heading
    pub title: String,
    /// Body text, paragraphs separated by newlines
    pub content: String,
    /// Macro breakdown, usually only on the nutrition section
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub macros: Option<Macros>,
}

/// Daily calorie and macronutrient targets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Macros {
    /// Calorie range
    #[serde(default)]
    pub calories: Option<Calories>,
    /// Protein share
    #[serde(default)]
    pub protein: Option<MacroShare>,
    /// Carbohydrate share
    #[serde(default)]
    pub carbs: Option<MacroShare>,
    /// Fat share
    #[serde(default)]
    pub fats: Option<MacroShare>,
}

/// Calorie range with a goal label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Calories {
    /// Lower bound (kcal)
    #[serde(default)]
    pub min: Option<f64>,
    /// Upper bound (kcal)
    #[serde(default)]
    pub max: Option<f64>,
    /// Goal label, e.g. "deficit"
    #[serde(default)]
    pub goal: Option<String>,
}

/// Share of daily calories for one macronutrient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroShare {
    /// Percent of calories
    pub percent: f64,
    /// Grams per day
    #[serde(default)]
    pub grams: Option<f64>,
}

/// Either milestone rows or free text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimeEstimate {
    /// `percent` reached in `months`
    Milestones(Vec<Milestone>),
    /// Free-text estimate
    Text(String),
}

/// Body fat level reachable after a number of months
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    /// Target body fat percentage
    pub percent: f64,
    /// Months to reach it
    pub months: f64,
}

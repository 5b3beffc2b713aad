//! Remote estimation client
//!
//! Two endpoints, one request/response pair each:
//!
//! - `POST /api/bodyfat`: multipart biometrics plus zero or more `images`
//! - `POST /api/advice`: JSON body describing a completed result
//!
//! No retries and no caching happen at this layer.

mod client;
mod error;
mod types;

pub use client::ApiClient;
pub use error::{extract_detail, ApiError};
pub use types::{AdviceRequest, BodyFatResponse};

use async_trait::async_trait;

use crate::models::{AdvicePayload, BiometricInput, PhotoRef};

/// Backend operations used by the wizard.
///
/// Implemented by [`ApiClient`]; tests substitute their own.
#[async_trait]
pub trait EstimationService: Send + Sync {
    /// Estimate body fat from biometrics and optional photos
    async fn estimate(
        &self,
        input: &BiometricInput,
        photos: &[PhotoRef],
    ) -> Result<BodyFatResponse, ApiError>;

    /// Fetch personalised advice for a result
    async fn advice(&self, request: &AdviceRequest) -> Result<AdvicePayload, ApiError>;
}

//! HTTP client for the estimation backend

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use tracing::{debug, error, info};

use super::error::{extract_detail, ApiError};
use super::types::{AdviceRequest, BodyFatResponse};
use super::EstimationService;
use crate::config::ClientConfig;
use crate::models::{AdvicePayload, BiometricInput, PhotoRef};

/// reqwest-backed [`EstimationService`]
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client for the configured backend
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("BodyFatAI/", env!("CARGO_PKG_VERSION")))
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Backend base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn transport_error(&self, err: reqwest::Error) -> ApiError {
        if err.is_connect() || err.is_timeout() {
            ApiError::Connection {
                base_url: self.base_url.clone(),
            }
        } else {
            ApiError::Http(err)
        }
    }

    async fn build_form(input: &BiometricInput, photos: &[PhotoRef]) -> Result<Form, ApiError> {
        let mut form = Form::new()
            .text("gender", input.gender.as_str())
            .text("age", input.age.to_string())
            .text("height", input.height_cm.to_string())
            .text("weight", input.weight_kg.to_string());

        if let Some(waist) = input.waist_cm.filter(|w| *w > 0.0) {
            form = form.text("waist", waist.to_string());
        }

        for photo in photos {
            let bytes = tokio::fs::read(photo.path())
                .await
                .map_err(|source| ApiError::Photo {
                    path: photo.path().to_path_buf(),
                    source,
                })?;
            let part = Part::bytes(bytes)
                .file_name(photo.file_name())
                .mime_str(photo.mime_type())?;
            form = form.part("images", part);
        }

        Ok(form)
    }

    async fn read_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let detail = response
                .json::<serde_json::Value>()
                .await
                .ok()
                .and_then(|body| extract_detail(&body));
            return Err(ApiError::Server {
                status: status.as_u16(),
                detail,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl EstimationService for ApiClient {
    async fn estimate(
        &self,
        input: &BiometricInput,
        photos: &[PhotoRef],
    ) -> Result<BodyFatResponse, ApiError> {
        debug!(
            "Estimation request: gender={} age={} height={:.1}cm weight={:.1}kg waist={:?} photos={}",
            input.gender,
            input.age,
            input.height_cm,
            input.weight_kg,
            input.waist_cm,
            photos.len()
        );
        let form = Self::build_form(input, photos).await?;

        let result = match self
            .client
            .post(self.endpoint("/api/bodyfat"))
            .multipart(form)
            .send()
            .await
        {
            Ok(response) => Self::read_response::<BodyFatResponse>(response).await,
            Err(e) => Err(self.transport_error(e)),
        };

        match &result {
            Ok(response) => info!("Estimated body fat {:.1}%", response.body_fat_percent),
            Err(e) => error!("Estimation failed: {}", e),
        }
        result
    }

    async fn advice(&self, request: &AdviceRequest) -> Result<AdvicePayload, ApiError> {
        debug!(
            "Advice request: {:.1}% {} age={} ({})",
            request.body_fat_percent, request.gender, request.age, request.evaluation
        );

        let result = match self
            .client
            .post(self.endpoint("/api/advice"))
            .json(request)
            .send()
            .await
        {
            Ok(response) => Self::read_response::<AdvicePayload>(response).await,
            Err(e) => Err(self.transport_error(e)),
        };

        match &result {
            Ok(advice) => info!("Received advice '{}' ({} sections)", advice.title, advice.sections.len()),
            Err(e) => error!("Advice request failed: {}", e),
        }
        result
    }
}

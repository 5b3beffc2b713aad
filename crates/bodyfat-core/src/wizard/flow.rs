//! Running the remote calls behind a progress animation.
//!
//! `fetch_*` only perform the call, so callers that keep the wizard behind a
//! lock can release it while the request is in flight. `run_*` combine the
//! call with the wizard completion.

use super::error::WizardError;
use super::machine::Wizard;
use super::progress::ProgressTicker;
use super::state::{PendingAdvice, PendingEstimate};
use crate::api::{ApiError, BodyFatResponse, EstimationService};
use crate::models::AdvicePayload;

async fn settle<T>(ticker: ProgressTicker, result: &Result<T, ApiError>) {
    match result {
        Ok(_) => ticker.finish().await,
        Err(_) => ticker.cancel(),
    }
}

/// Perform the estimation call; the ticker snaps to 100% on success
pub async fn fetch_estimate(
    api: &dyn EstimationService,
    pending: &PendingEstimate,
    ticker: ProgressTicker,
) -> Result<BodyFatResponse, ApiError> {
    let result = api.estimate(&pending.input, &pending.photos).await;
    settle(ticker, &result).await;
    result
}

/// Perform the advice call; the ticker snaps to 100% on success
pub async fn fetch_advice(
    api: &dyn EstimationService,
    pending: &PendingAdvice,
    ticker: ProgressTicker,
) -> Result<AdvicePayload, ApiError> {
    let result = api.advice(&pending.request).await;
    settle(ticker, &result).await;
    result
}

/// Estimate and apply the result to the wizard
pub async fn run_estimate(
    wizard: &mut Wizard,
    api: &dyn EstimationService,
    pending: PendingEstimate,
    ticker: ProgressTicker,
) -> Result<(), WizardError> {
    let response = fetch_estimate(api, &pending, ticker).await;
    wizard.complete_estimate(response)
}

/// Fetch advice and apply it to the wizard
pub async fn run_advice(
    wizard: &mut Wizard,
    api: &dyn EstimationService,
    pending: PendingAdvice,
    ticker: ProgressTicker,
) -> Result<(), WizardError> {
    let response = fetch_advice(api, &pending, ticker).await;
    wizard.complete_advice(response)
}

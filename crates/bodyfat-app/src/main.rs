use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use bodyfat_app::{shell, AppState, BUILD_ID};
use bodyfat_core::api::ApiClient;
use bodyfat_core::config::ClientConfig;
use bodyfat_core::subscription::create_gate;

const DEFAULT_FILTER: &str = "bodyfat=info,bodyfat_app=info,bodyfat_core=info";

fn init_logging() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))?
        .add_directive("reqwest=warn".parse()?)
        .add_directive("hyper=warn".parse()?);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging()?;
    info!("BodyFatAI {} ({})", bodyfat_core::VERSION, BUILD_ID);

    let config = ClientConfig::from_env().context("invalid configuration")?;
    let api = ApiClient::new(&config).context("failed to build HTTP client")?;
    info!("Backend: {}", api.base_url());

    // No purchase SDK is linked into this binary
    let gate = create_gate(config.runtime, config.purchases_api_key.as_deref(), None)
        .with_context(|| format!("subscription gate unavailable for {} runtime", config.runtime))?;
    gate.initialize(None)
        .await
        .context("failed to initialize subscriptions")?;

    let state = AppState::from_config(&config, gate, Arc::new(api));
    let status = state.gate.check_status().await;
    state.wizard.lock().await.set_entitlement(status);

    shell::run(&state).await?;
    Ok(())
}

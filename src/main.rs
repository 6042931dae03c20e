use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use aqiframe::api::AppState;
use aqiframe::cache::{READING_TTL, ReadingCache};
use aqiframe::config::GatewayConfig;
use aqiframe::geocoding::OwmGeocoder;
use aqiframe::provider::provider_from_config;
use aqiframe::{AqiService, web};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = GatewayConfig::from_env()?;
    tracing::info!("Starting AQI gateway with provider '{}'", config.provider);

    let geocoder = Arc::new(OwmGeocoder::new(config.openweather_api_key.clone())?);
    let provider = provider_from_config(&config)?;
    let service = AqiService::new(provider, ReadingCache::new(READING_TTL));

    let state = Arc::new(AppState { geocoder, service });
    web::run(config.port, state).await
}

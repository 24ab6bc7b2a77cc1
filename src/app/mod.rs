use std::sync::Arc;
use tokio::net::TcpListener;

use crate::adapters::{http, mail_service_from_config, AppState, CityDataStore};
use crate::config::AppConfig;
use crate::core::PointsOfInterestService;
use crate::utils::error::Result;

/// Wires the store and mailer named in `config` into the HTTP state.
pub async fn build_state(config: &AppConfig) -> Result<Arc<AppState>> {
    let store = CityDataStore::open(&config.storage).await?;
    let mail_service = mail_service_from_config(&config.mail);
    let service = PointsOfInterestService::new(Arc::new(store), mail_service);
    Ok(Arc::new(AppState::new(service)))
}

pub async fn run(config: &AppConfig) -> Result<()> {
    let state = build_state(config).await?;
    let address = config.bind_address()?;

    let listener = TcpListener::bind(address).await?;
    tracing::info!("🚀 Listening on http://{}", listener.local_addr()?);

    http::serve(listener, state).await
}

use std::sync::Arc;

use anyhow::anyhow;
use tokio::sync::{Semaphore, SemaphorePermit};

use crate::config::Config;
use crate::errors::AppError;
use crate::llm_client::Gateway;
use crate::session::{Session, SharedSession};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub session: SharedSession,
    /// Pluggable completion backend. Production: AnthropicGateway.
    pub gateway: Arc<dyn Gateway>,
    /// Single permit. Every Gateway unit of work, including a whole upload batch, holds
    /// it for its full duration so Gateway traffic stays strictly sequential across
    /// concurrent requests.
    pub gateway_lane: Arc<Semaphore>,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config, gateway: Arc<dyn Gateway>) -> Self {
        let session = Session::new(config.anthropic_api_key.clone()).shared();
        Self {
            session,
            gateway,
            gateway_lane: Arc::new(Semaphore::new(1)),
            config,
        }
    }

    /// Waits for the gateway lane. Take it before reading any session input the Gateway
    /// work depends on, and hold it until the result is committed.
    pub async fn enter_gateway_lane(&self) -> Result<SemaphorePermit<'_>, AppError> {
        self.gateway_lane
            .acquire()
            .await
            .map_err(|e| AppError::Internal(anyhow!("gateway lane closed: {e}")))
    }
}

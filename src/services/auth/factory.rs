//! Factory: build `TokenGate` from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::services::auth::{AuthServiceClient, TokenGate, client::ValidatorError};

pub fn build_token_gate(config: &Config) -> Result<Arc<TokenGate>, ValidatorError> {
    let gate_config = config.gate_config();
    let client = AuthServiceClient::new(&config.auth_service_url, gate_config.validate_timeout)?;

    tracing::info!(endpoint = %client.endpoint(), "auth service client ready");

    Ok(Arc::new(TokenGate::new(gate_config, Arc::new(client))))
}

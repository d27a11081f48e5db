//! Liveness endpoint

use api_types::health::Health;
use axum::{Json, extract::State};

use crate::{ServerError, server::ServerState};

/// Answer `ok` once the store is reachable.
pub async fn get(State(state): State<ServerState>) -> Result<Json<Health>, ServerError> {
    state.engine.ping().await?;
    Ok(Json(Health {
        status: "ok".to_string(),
    }))
}

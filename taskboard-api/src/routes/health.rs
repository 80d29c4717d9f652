/// Health probe endpoint
///
/// # Endpoint
///
/// ```text
/// GET /
/// ```
///
/// # Response
///
/// ```json
/// {
///   "status": "running",
///   "database": "connected"
/// }
/// ```

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use taskboard_shared::db::pool;

/// Health probe response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Database status ("connected" or "disconnected")
    pub database: String,
}

/// Health probe handler
///
/// Reports that the process is serving and whether the database is
/// reachable. Always returns 200; an unreachable database is reported in
/// the body rather than as an error.
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    let database = match pool::health_check(&state.db).await {
        Ok(()) => "connected",
        Err(e) => {
            tracing::warn!("Health check database probe failed: {}", e);
            "disconnected"
        }
    };

    Ok(Json(HealthResponse {
        status: "running".to_string(),
        database: database.to_string(),
    }))
}

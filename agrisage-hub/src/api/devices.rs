use axum::{Json, extract::State};
use tracing::error;

use agrisage_core::Device;

use super::error::ApiError;
use super::models::ApiResponse;
use crate::AppState;
use crate::preferences::PreferencesStorage;
use crate::telemetry::TelemetrySource;

/// Poll the telemetry source once and return every device.
pub async fn list_devices<T, P>(
    State(state): State<AppState<T, P>>,
) -> Result<Json<ApiResponse<Vec<Device>>>, ApiError>
where
    T: TelemetrySource,
    P: PreferencesStorage,
{
    let devices = state.telemetry.devices().await.map_err(|e| {
        error!(error = %e, "Failed to poll devices");
        ApiError::InternalServerError("Failed to fetch devices".to_string())
    })?;

    Ok(Json(ApiResponse::ok(devices)))
}

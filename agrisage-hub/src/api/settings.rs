use axum::{Json, extract::State};
use tracing::{error, info};

use agrisage_core::Preferences;

use super::error::ApiError;
use super::models::ApiResponse;
use crate::AppState;
use crate::preferences::PreferencesStorage;
use crate::telemetry::TelemetrySource;

pub async fn get_settings<T, P>(
    State(state): State<AppState<T, P>>,
) -> Result<Json<ApiResponse<Preferences>>, ApiError>
where
    T: TelemetrySource,
    P: PreferencesStorage,
{
    let preferences = state.preferences.load().await.map_err(|e| {
        error!(error = %e, "Failed to load settings");
        ApiError::InternalServerError("Failed to load settings".to_string())
    })?;

    Ok(Json(ApiResponse::ok(preferences)))
}

pub async fn save_settings<T, P>(
    State(state): State<AppState<T, P>>,
    Json(preferences): Json<Preferences>,
) -> Result<Json<ApiResponse<Preferences>>, ApiError>
where
    T: TelemetrySource,
    P: PreferencesStorage,
{
    state
        .preferences
        .save(preferences.clone())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to save settings");
            ApiError::InternalServerError("Failed to save settings".to_string())
        })?;

    info!(
        location = ?preferences.location(),
        region = ?preferences.region(),
        crop = ?preferences.crop(),
        "Saved settings"
    );

    Ok(Json(
        ApiResponse::ok(preferences).with_message("Your settings have been saved successfully."),
    ))
}

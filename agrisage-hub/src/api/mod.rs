pub mod advisory;
pub mod contracts;
pub mod devices;
pub mod error;
pub mod models;
pub mod settings;

use axum::{
    Router,
    routing::{get, post},
};

use crate::AppState;
use crate::preferences::PreferencesStorage;
use crate::telemetry::TelemetrySource;

pub fn router<T, P>() -> Router<AppState<T, P>>
where
    T: TelemetrySource + Clone,
    P: PreferencesStorage + Clone,
{
    Router::new()
        // Device monitor
        .route("/devices", get(devices::list_devices))
        // Advisory flows
        .route("/advisory/fertilizer", post(advisory::fertilizer))
        .route("/advisory/price", post(advisory::price))
        .route("/advisory/environment", post(advisory::environment))
        .route("/advisory/pest-disease", post(advisory::pest_disease))
        .route("/advisory/crop", post(advisory::crop))
        // Settings
        .route(
            "/settings",
            get(settings::get_settings).put(settings::save_settings),
        )
        // Contract farming
        .route(
            "/contracts",
            get(contracts::list_contracts).post(contracts::create_contract),
        )
}

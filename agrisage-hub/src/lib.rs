pub mod advisory;
pub mod api;
pub mod config;
pub mod contracts;
pub mod preferences;
pub mod state;
pub mod telemetry;
pub mod validation;

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

pub use advisory::{DisabledGenerator, GenerationError, Generator, HttpGenerator};
pub use config::{Config, GeneratorConfig, PreferencesConfig};
pub use contracts::ContractLedger;
pub use preferences::{FilePreferences, MemoryPreferences, PreferencesStorage};
pub use state::{RosterSnapshot, RosterState};
pub use telemetry::{Drift, Roster, TelemetrySource};

// AppState must be defined in lib.rs to be visible to all modules
#[derive(Clone)]
pub struct AppState<T, P> {
    pub telemetry: T,
    pub preferences: P,
    pub generator: Arc<dyn Generator>,
    pub contracts: ContractLedger,
}

/// Build the complete HTTP application.
pub fn app<T, P>(state: AppState<T, P>) -> Router
where
    T: TelemetrySource + Clone,
    P: PreferencesStorage + Clone,
{
    Router::new()
        .route("/health", get(health_handler))
        .nest("/api", api::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_handler() -> &'static str {
    "OK"
}

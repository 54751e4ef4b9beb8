use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{error, info, warn};

use agrisage_core::advisory::{
    AdvisoryResponse, CropRequest, DiagnosisRequest, EnvironmentRequest, FertilizerRequest,
    PriceRequest,
};

use crate::AppState;
use crate::advisory::{
    self, CropSuggestion, EnvironmentInsight, Fertilizer, Flow, PestDiagnosis, PricePrediction,
};
use crate::preferences::PreferencesStorage;
use crate::telemetry::TelemetrySource;

// Prefill from saved settings, validate, then hand off to the generator.
async fn run_flow<F, T, P>(state: &AppState<T, P>, mut input: F::Input) -> Response
where
    F: Flow,
    P: PreferencesStorage,
{
    match state.preferences.load().await {
        Ok(preferences) => F::prefill(&mut input, &preferences),
        Err(e) => warn!(flow = F::NAME, error = %e, "Failed to load settings, skipping prefill"),
    }

    if let Err(e) = F::validate(&input) {
        return (
            StatusCode::BAD_REQUEST,
            Json(AdvisoryResponse::<F::Output>::failed(e.message)),
        )
            .into_response();
    }

    match advisory::run::<F>(state.generator.as_ref(), &input).await {
        Ok(output) => {
            info!(flow = F::NAME, "Advisory generated");
            Json(AdvisoryResponse::ok(output)).into_response()
        }
        Err(e) => {
            error!(flow = F::NAME, error = %e, "Advisory generation failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(AdvisoryResponse::<F::Output>::failed(F::FAILURE_MESSAGE)),
            )
                .into_response()
        }
    }
}

pub async fn fertilizer<T, P>(
    State(state): State<AppState<T, P>>,
    Json(input): Json<FertilizerRequest>,
) -> Response
where
    T: TelemetrySource,
    P: PreferencesStorage,
{
    run_flow::<Fertilizer, T, P>(&state, input).await
}

pub async fn price<T, P>(
    State(state): State<AppState<T, P>>,
    Json(input): Json<PriceRequest>,
) -> Response
where
    T: TelemetrySource,
    P: PreferencesStorage,
{
    run_flow::<PricePrediction, T, P>(&state, input).await
}

pub async fn environment<T, P>(
    State(state): State<AppState<T, P>>,
    Json(input): Json<EnvironmentRequest>,
) -> Response
where
    T: TelemetrySource,
    P: PreferencesStorage,
{
    run_flow::<EnvironmentInsight, T, P>(&state, input).await
}

pub async fn pest_disease<T, P>(
    State(state): State<AppState<T, P>>,
    Json(input): Json<DiagnosisRequest>,
) -> Response
where
    T: TelemetrySource,
    P: PreferencesStorage,
{
    run_flow::<PestDiagnosis, T, P>(&state, input).await
}

pub async fn crop<T, P>(
    State(state): State<AppState<T, P>>,
    Json(input): Json<CropRequest>,
) -> Response
where
    T: TelemetrySource,
    P: PreferencesStorage,
{
    run_flow::<CropSuggestion, T, P>(&state, input).await
}

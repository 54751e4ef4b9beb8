use axum::{Json, extract::State, http::StatusCode};

use agrisage_core::{Contract, ContractRequest};

use super::error::ApiError;
use super::models::{ApiResponse, ListResponse};
use crate::AppState;
use crate::preferences::PreferencesStorage;
use crate::telemetry::TelemetrySource;

pub async fn list_contracts<T, P>(
    State(state): State<AppState<T, P>>,
) -> Json<ApiResponse<ListResponse<Contract>>>
where
    T: TelemetrySource,
    P: PreferencesStorage,
{
    let contracts = state.contracts.list().await;
    Json(ApiResponse::ok(contracts.into()))
}

pub async fn create_contract<T, P>(
    State(state): State<AppState<T, P>>,
    Json(request): Json<ContractRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Contract>>), ApiError>
where
    T: TelemetrySource,
    P: PreferencesStorage,
{
    let contract = state.contracts.create(request).await?;
    let message = format!(
        "Your digital contract with {} has been recorded on the blockchain.",
        contract.buyer_name
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(contract).with_message(message)),
    ))
}

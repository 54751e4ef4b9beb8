//! Request and response shapes of the advisory flows.
//!
//! Field names follow the dashboard's JSON (`camelCase`).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FertilizerRequest {
    /// pH, nitrogen, phosphorus and potassium levels.
    pub soil_health_parameters: String,
    pub crop_type: String,
    /// Current and historical temperature, rainfall and humidity.
    pub weather_data: String,
    pub region: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FertilizerAdvice {
    pub recommendation: String,
    /// Environmental impact and resource efficiency, 0–100.
    pub sustainability_score: f64,
    pub carbon_footprint_estimate: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PriceRequest {
    pub crop_type: String,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceForecast {
    /// Predicted price in Indian Rupees (₹).
    pub price_forecast: String,
    /// When to sell for the best price.
    pub recommendations: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EnvironmentRequest {
    pub remote_sensing_data: String,
    pub crop_type: String,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentInsights {
    pub insights: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DiagnosisRequest {
    /// Photo of the affected crop as `data:<mimetype>;base64,<data>`.
    pub crop_image: String,
    pub crop_type: String,
    pub symptoms: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnosis {
    /// Likely pest or disease, e.g. "Powdery Mildew".
    pub diagnosis: String,
    pub confidence_score: f64,
    pub treatment_recommendations: String,
    pub preventive_measures: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CropRequest {
    pub microclimate: String,
    pub weather_forecast: String,
    pub pollution_levels: String,
    pub soil_type: String,
    pub region: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropSuggestions {
    pub suggested_crops: Vec<String>,
    pub adaptation_strategies: String,
    pub roi_estimation: String,
}

/// Envelope returned by every advisory endpoint.
///
/// Failures never carry partial output; `error` holds a generic,
/// flow-specific message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisoryResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> AdvisoryResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

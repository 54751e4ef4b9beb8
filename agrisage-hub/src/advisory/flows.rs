use agrisage_core::Preferences;
use agrisage_core::advisory::{
    CropRequest, CropSuggestions, DiagnosisRequest, Diagnosis, EnvironmentInsights,
    EnvironmentRequest, FertilizerAdvice, FertilizerRequest, PriceForecast, PriceRequest,
};
use agrisage_core::preferences::fill_blank;
use serde_json::json;

use super::{Flow, clamp_score};
use crate::validation::{ValidationError, min_len};

/// Builds a JSON schema for an object whose properties are all required.
fn object_schema(properties: serde_json::Value) -> serde_json::Value {
    let required: Vec<_> = properties
        .as_object()
        .map(|props| props.keys().cloned().collect())
        .unwrap_or_default();

    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

fn text(description: &str) -> serde_json::Value {
    json!({ "type": "string", "description": description })
}

fn score(description: &str) -> serde_json::Value {
    json!({ "type": "number", "minimum": 0, "maximum": 100, "description": description })
}

/// Fertilizer choice and application advice for the Karnal region.
pub struct Fertilizer;

impl Flow for Fertilizer {
    const NAME: &'static str = "fertilizer-recommendation";
    const FAILURE_MESSAGE: &'static str = "Failed to get fertilizer recommendation.";

    type Input = FertilizerRequest;
    type Output = FertilizerAdvice;

    fn prefill(input: &mut Self::Input, preferences: &Preferences) {
        fill_blank(&mut input.region, preferences.region());
        fill_blank(&mut input.crop_type, preferences.crop());
    }

    fn validate(input: &Self::Input) -> Result<(), ValidationError> {
        min_len(
            "soilHealthParameters",
            &input.soil_health_parameters,
            10,
            "Please provide more details about soil health.",
        )?;
        min_len("cropType", &input.crop_type, 2, "Crop type is required.")?;
        min_len(
            "weatherData",
            &input.weather_data,
            10,
            "Please provide some weather data or forecast.",
        )?;
        min_len("region", &input.region, 2, "Region is required.")
    }

    fn prompt(input: &Self::Input) -> String {
        format!(
            "You are an expert agricultural advisor specializing in fertilizer recommendations \
             for farmers in the Karnal region.\n\n\
             Based on the soil health parameters, crop type, and weather data provided, give a \
             custom fertilizer recommendation with application instructions. Score the \
             sustainability of the recommendation from 0 to 100, considering environmental \
             impact and resource efficiency, and estimate the carbon footprint of the \
             recommended fertilizer usage.\n\n\
             Soil Health Parameters: {}\n\
             Crop Type: {}\n\
             Weather Data: {}\n\
             Region: {}\n",
            input.soil_health_parameters, input.crop_type, input.weather_data, input.region,
        )
    }

    fn output_schema() -> serde_json::Value {
        object_schema(json!({
            "recommendation": text("The recommended fertilizer and application instructions."),
            "sustainabilityScore": score("Sustainability of the recommendation (0-100)."),
            "carbonFootprintEstimate": text("Estimated carbon footprint of the fertilizer usage."),
        }))
    }

    fn finish(mut output: Self::Output) -> Self::Output {
        output.sustainability_score = clamp_score(output.sustainability_score);
        output
    }
}

/// Price forecast in rupees with advice on when to sell.
pub struct PricePrediction;

impl Flow for PricePrediction {
    const NAME: &'static str = "price-prediction";
    const FAILURE_MESSAGE: &'static str = "Failed to get price prediction.";

    type Input = PriceRequest;
    type Output = PriceForecast;

    fn prefill(input: &mut Self::Input, preferences: &Preferences) {
        fill_blank(&mut input.location, preferences.location());
        fill_blank(&mut input.crop_type, preferences.crop());
    }

    fn validate(input: &Self::Input) -> Result<(), ValidationError> {
        min_len("cropType", &input.crop_type, 2, "Crop type is required.")?;
        min_len("location", &input.location, 2, "Location is required.")
    }

    fn prompt(input: &Self::Input) -> String {
        format!(
            "You are an expert agricultural economist. Based on historical price trends, \
             seasonal data, and weather patterns, provide a price forecast for {} in {} and \
             recommendations for when to sell the crop for the best possible price. The price \
             should be in Indian Rupees (₹).\n",
            input.crop_type, input.location,
        )
    }

    fn output_schema() -> serde_json::Value {
        object_schema(json!({
            "priceForecast": text("The predicted price for the crop in Rupees (₹)."),
            "recommendations": text("When to sell the crop for the best possible price."),
        }))
    }
}

/// Filters remote sensing data down to the insights relevant for a crop.
pub struct EnvironmentInsight;

impl Flow for EnvironmentInsight {
    const NAME: &'static str = "environmental-monitoring";
    const FAILURE_MESSAGE: &'static str = "Failed to get environmental insights.";

    type Input = EnvironmentRequest;
    type Output = EnvironmentInsights;

    fn prefill(input: &mut Self::Input, preferences: &Preferences) {
        fill_blank(&mut input.location, preferences.location());
        fill_blank(&mut input.crop_type, preferences.crop());
    }

    fn validate(input: &Self::Input) -> Result<(), ValidationError> {
        min_len(
            "remoteSensingData",
            &input.remote_sensing_data,
            20,
            "Please provide more remote sensing data.",
        )?;
        min_len("cropType", &input.crop_type, 2, "Crop type is required.")?;
        min_len("location", &input.location, 2, "Location is required.")
    }

    fn prompt(input: &Self::Input) -> String {
        format!(
            "You are an AI assistant helping farmers understand environmental impacts on their \
             crops.\n\n\
             Given the remote sensing data, crop type, and location, filter the data to provide \
             only the most relevant insights.\n\n\
             Remote Sensing Data: {}\n\
             Crop Type: {}\n\
             Location: {}\n\n\
             Insights:",
            input.remote_sensing_data, input.crop_type, input.location,
        )
    }

    fn output_schema() -> serde_json::Value {
        object_schema(json!({
            "insights": text("Environmental insights relevant to the crop."),
        }))
    }
}

/// Diagnoses a pest or disease from a crop photo and symptoms.
pub struct PestDiagnosis;

impl Flow for PestDiagnosis {
    const NAME: &'static str = "pest-disease-diagnosis";
    const FAILURE_MESSAGE: &'static str = "Failed to get pest and disease diagnosis.";

    type Input = DiagnosisRequest;
    type Output = Diagnosis;

    fn prefill(input: &mut Self::Input, preferences: &Preferences) {
        fill_blank(&mut input.crop_type, preferences.crop());
    }

    fn validate(input: &Self::Input) -> Result<(), ValidationError> {
        const IMAGE_REQUIRED: &str = "Please upload a crop image.";

        min_len("cropImage", &input.crop_image, 1, IMAGE_REQUIRED)?;
        if !is_base64_data_uri(&input.crop_image) {
            return Err(ValidationError {
                field: "cropImage",
                message: IMAGE_REQUIRED,
            });
        }
        min_len("cropType", &input.crop_type, 2, "Crop type is required.")?;
        min_len("symptoms", &input.symptoms, 10, "Please describe the symptoms.")
    }

    fn prompt(input: &Self::Input) -> String {
        format!(
            "You are an expert plant pathologist. Analyze the attached image and the symptoms \
             to diagnose the crop issue.\n\n\
             Crop Type: {}\n\
             Symptoms: {}\n\n\
             Based on the analysis, provide:\n\
             - A clear diagnosis of the pest or disease.\n\
             - A confidence score for your diagnosis (0-100).\n\
             - Detailed treatment recommendations (both organic and chemical).\n\
             - Preventive measures to protect the rest of the crop.",
            input.crop_type, input.symptoms,
        )
    }

    fn media(input: &Self::Input) -> Vec<String> {
        vec![input.crop_image.clone()]
    }

    fn output_schema() -> serde_json::Value {
        object_schema(json!({
            "diagnosis": text("The likely pest or disease, e.g. \"Powdery Mildew\"."),
            "confidenceScore": score("Confidence in the diagnosis (0-100)."),
            "treatmentRecommendations": text("Organic and chemical treatment options."),
            "preventiveMeasures": text("Measures to avoid future occurrences."),
        }))
    }

    fn finish(mut output: Self::Output) -> Self::Output {
        output.confidence_score = clamp_score(output.confidence_score);
        output
    }
}

/// `data:<mimetype>;base64,<data>` with a non-empty mime type and payload.
fn is_base64_data_uri(uri: &str) -> bool {
    let Some(rest) = uri.strip_prefix("data:") else {
        return false;
    };
    match rest.split_once(";base64,") {
        Some((mime, data)) => mime.contains('/') && !data.is_empty(),
        None => false,
    }
}

/// Crops suited to a microclimate, with adaptation strategies and ROI.
pub struct CropSuggestion;

impl Flow for CropSuggestion {
    const NAME: &'static str = "weather-based-crop-suggestions";
    const FAILURE_MESSAGE: &'static str = "Failed to get crop suggestions.";

    type Input = CropRequest;
    type Output = CropSuggestions;

    fn prefill(input: &mut Self::Input, preferences: &Preferences) {
        fill_blank(&mut input.region, preferences.region());
    }

    fn validate(input: &Self::Input) -> Result<(), ValidationError> {
        min_len(
            "microclimate",
            &input.microclimate,
            10,
            "Please describe the microclimate.",
        )?;
        min_len(
            "weatherForecast",
            &input.weather_forecast,
            10,
            "Please provide a weather forecast.",
        )?;
        min_len(
            "pollutionLevels",
            &input.pollution_levels,
            5,
            "Please describe pollution levels.",
        )?;
        min_len("soilType", &input.soil_type, 3, "Soil type is required.")?;
        min_len("region", &input.region, 2, "Region is required.")
    }

    fn prompt(input: &Self::Input) -> String {
        format!(
            "You are an expert agricultural advisor for the Karnal region in Haryana, India. \
             Based on the provided microclimate conditions, weather forecast, pollution levels, \
             soil type, and region, suggest the most suitable crops for the farmer and provide \
             adaptation strategies for changing weather and pollution levels.\n\n\
             Microclimate Conditions: {}\n\
             Weather Forecast: {}\n\
             Pollution Levels: {}\n\
             Soil Type: {}\n\
             Region: {}\n\n\
             Consider market demand, profitability, and sustainability, as well as inter-cropping \
             and seasonal recommendations. Estimate the ROI for the suggested crops in these \
             conditions.\n",
            input.microclimate,
            input.weather_forecast,
            input.pollution_levels,
            input.soil_type,
            input.region,
        )
    }

    fn output_schema() -> serde_json::Value {
        object_schema(json!({
            "suggestedCrops": {
                "type": "array",
                "items": { "type": "string" },
                "description": "Suggested crops for the given conditions.",
            },
            "adaptationStrategies": text("Adaptation strategies for changing weather and pollution levels."),
            "roiEstimation": text("Estimated ROI for the suggested crops."),
        }))
    }
}

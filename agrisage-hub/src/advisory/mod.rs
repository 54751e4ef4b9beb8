//! Advisory flows backed by a structured generation service.
//!
//! A [`Flow`] renders a prompt from a typed request and names the JSON shape
//! it expects back. The [`Generator`] is the only thing that talks to the
//! outside world, and it is treated as opaque: callers see a single kind of
//! failure no matter what went wrong downstream.

pub mod flows;
pub mod http;

use agrisage_core::Preferences;
use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::validation::ValidationError;

pub use flows::{CropSuggestion, EnvironmentInsight, Fertilizer, PestDiagnosis, PricePrediction};
pub use http::HttpGenerator;

/// One call to the generation service.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    /// Name of the flow issuing the request.
    pub flow: &'static str,
    /// Fully rendered prompt.
    pub prompt: String,
    /// Attached media as data URIs.
    pub media: Vec<String>,
    /// JSON schema the output must conform to.
    pub output_schema: serde_json::Value,
}

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("no generation service is configured")]
    Unavailable,
    #[error("failed to reach generation service")]
    Transport(#[source] reqwest::Error),
    #[error("generation service rejected the request with status {0}")]
    Rejected(reqwest::StatusCode),
    #[error("generation service returned no output")]
    MissingOutput,
    #[error("generation output does not match the flow's schema")]
    Malformed(#[source] serde_json::Error),
}

/// Trait for services that turn a prompt into a value of a given shape.
#[async_trait]
pub trait Generator: Send + Sync + 'static {
    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<serde_json::Value, GenerationError>;
}

/// Generator used when no service is configured. Every request fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledGenerator;

#[async_trait]
impl Generator for DisabledGenerator {
    async fn generate(
        &self,
        _request: GenerationRequest,
    ) -> Result<serde_json::Value, GenerationError> {
        Err(GenerationError::Unavailable)
    }
}

/// A prompt template with typed input and output.
pub trait Flow: Send + Sync + 'static {
    /// Stable flow name, sent along with each request.
    const NAME: &'static str;
    /// The message users see when the flow fails for any reason.
    const FAILURE_MESSAGE: &'static str;

    type Input: DeserializeOwned + Send + Sync;
    type Output: Serialize + DeserializeOwned + Send;

    /// Fill blank fields from the user's saved defaults.
    fn prefill(input: &mut Self::Input, preferences: &Preferences);

    fn validate(input: &Self::Input) -> Result<(), ValidationError>;

    fn prompt(input: &Self::Input) -> String;

    fn output_schema() -> serde_json::Value;

    fn media(_input: &Self::Input) -> Vec<String> {
        Vec::new()
    }

    /// Post-process a decoded output, e.g. to clamp scores.
    fn finish(output: Self::Output) -> Self::Output {
        output
    }
}

/// Render `input` through flow `F`, call the generator and decode its reply.
///
/// The input is expected to be prefilled and validated already.
pub async fn run<F: Flow>(
    generator: &dyn Generator,
    input: &F::Input,
) -> Result<F::Output, GenerationError> {
    let request = GenerationRequest {
        flow: F::NAME,
        prompt: F::prompt(input),
        media: F::media(input),
        output_schema: F::output_schema(),
    };

    debug!(flow = F::NAME, prompt_len = request.prompt.len(), "Requesting generation");

    let value = generator.generate(request).await?;
    let output = serde_json::from_value(value).map_err(GenerationError::Malformed)?;
    Ok(F::finish(output))
}

/// Clamp a model-reported score into 0–100.
pub(crate) fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        return 0.0;
    }
    score.clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use agrisage_core::advisory::PriceRequest;
    use serde_json::json;

    use super::*;

    /// Replies with a fixed value and remembers the last request.
    struct Canned {
        reply: serde_json::Value,
        seen: Mutex<Option<GenerationRequest>>,
    }

    #[async_trait]
    impl Generator for Canned {
        async fn generate(
            &self,
            request: GenerationRequest,
        ) -> Result<serde_json::Value, GenerationError> {
            *self.seen.lock().unwrap() = Some(request);
            Ok(self.reply.clone())
        }
    }

    fn price_request() -> PriceRequest {
        PriceRequest {
            crop_type: "Basmati Rice".into(),
            location: "Karnal".into(),
        }
    }

    #[tokio::test]
    async fn test_run_decodes_output() {
        let generator = Canned {
            reply: json!({"priceForecast": "₹3,800/quintal", "recommendations": "Sell in March"}),
            seen: Mutex::new(None),
        };

        let output = run::<PricePrediction>(&generator, &price_request())
            .await
            .unwrap();
        assert_eq!(output.price_forecast, "₹3,800/quintal");

        let seen = generator.seen.lock().unwrap().clone().unwrap();
        assert_eq!(seen.flow, PricePrediction::NAME);
        assert!(seen.prompt.contains("Basmati Rice"));
        assert!(seen.prompt.contains("Karnal"));
        assert!(seen.media.is_empty());
    }

    #[tokio::test]
    async fn test_run_rejects_wrong_shape() {
        let generator = Canned {
            reply: json!({"forecast": 12}),
            seen: Mutex::new(None),
        };

        let err = run::<PricePrediction>(&generator, &price_request())
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_disabled_generator_fails() {
        let err = run::<PricePrediction>(&DisabledGenerator, &price_request())
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::Unavailable));
    }

    #[test]
    fn test_clamp_score() {
        assert_eq!(clamp_score(120.0), 100.0);
        assert_eq!(clamp_score(-3.0), 0.0);
        assert_eq!(clamp_score(f64::NAN), 0.0);
        assert_eq!(clamp_score(64.5), 64.5);
    }
}

//! HTTP client for a hosted text-classification endpoint
//!
//! Speaks the inference-API convention: `POST {"inputs": [...]}` answered
//! by one list of `{label, score}` objects per input. `top_k` is sent as
//! null so every label in the taxonomy is returned, not just the best one.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};
use url::Url;

use super::{EmotionClassifier, EmotionScore};
use crate::config::ClassifierConfig;
use crate::error::{ActionError, ActionResult};

/// Inference API request format
#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a [String],
    parameters: InferenceParameters,
    options: InferenceOptions,
}

#[derive(Debug, Serialize)]
struct InferenceParameters {
    top_k: Option<u32>,
}

#[derive(Debug, Serialize)]
struct InferenceOptions {
    wait_for_model: bool,
}

/// Batched inputs come back nested; some deployments flatten a
/// single-input batch.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InferenceResponse {
    Batch(Vec<Vec<EmotionScore>>),
    Single(Vec<EmotionScore>),
}

impl InferenceResponse {
    fn into_batch(self) -> Vec<Vec<EmotionScore>> {
        match self {
            InferenceResponse::Batch(batch) => batch,
            InferenceResponse::Single(single) => vec![single],
        }
    }
}

/// Emotion classifier backed by a remote inference endpoint
#[derive(Debug, Clone)]
pub struct InferenceClassifier {
    client: Client,
    endpoint: Url,
    model: String,
    api_token: Option<String>,
}

impl InferenceClassifier {
    pub fn new(config: &ClassifierConfig) -> ActionResult<Self> {
        let endpoint = Url::parse(&config.endpoint).map_err(|e| {
            ActionError::Config(format!(
                "invalid classifier endpoint '{}': {e}",
                config.endpoint
            ))
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| ActionError::ClassificationUnavailable(e.to_string()))?;

        Ok(Self {
            client,
            endpoint,
            model: config.model.clone(),
            api_token: config.api_token.clone(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl EmotionClassifier for InferenceClassifier {
    async fn classify(&self, texts: &[String]) -> ActionResult<Vec<Vec<EmotionScore>>> {
        let request = InferenceRequest {
            inputs: texts,
            parameters: InferenceParameters { top_k: None },
            options: InferenceOptions {
                wait_for_model: true,
            },
        };

        let mut builder = self.client.post(self.endpoint.clone()).json(&request);
        if let Some(token) = &self.api_token {
            builder = builder.bearer_auth(token);
        }

        debug!(model = %self.model, endpoint = %self.endpoint, inputs = texts.len(), "Calling classifier");
        let response = builder.send().await.map_err(|e| {
            error!(model = %self.model, "Classifier request failed: {e}");
            ActionError::ClassificationUnavailable(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<unreadable body: {e}>"));
            error!(model = %self.model, %status, "Classifier returned an error");
            return Err(ActionError::ClassificationUnavailable(format!(
                "HTTP {status}: {body}"
            )));
        }

        let parsed: InferenceResponse = response.json().await.map_err(|e| {
            ActionError::ClassificationUnavailable(format!("malformed classifier response: {e}"))
        })?;
        Ok(parsed.into_batch())
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

//! HTTP client for the remote sentiment-classification service.
//!
//! The classifier is an external inference server exposing a small text
//! classification API. Model selection happens once at startup: the primary
//! model is probed first, then the named fallback; if neither responds the
//! scorer runs without a classifier for the life of the process.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::ClassifierConfig;

/// Errors from the classifier service.
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// One (label, score) pair from the classifier.
#[derive(Debug, Clone, Deserialize)]
pub struct LabelScore {
    pub label: String,
    pub score: f64,
}

#[derive(Debug, Serialize)]
struct ClassifyRequest<'a> {
    model: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct ClassifyResponse {
    scores: Vec<LabelScore>,
}

/// Handle to a reachable classifier model. Read-only after construction.
pub struct ClassifierClient {
    endpoint: String,
    model: String,
    client: reqwest::Client,
}

impl ClassifierClient {
    /// Probe the configured models in order and connect to the first one that
    /// answers. Returns None when no endpoint is configured or neither model
    /// is available; the caller then runs heuristic-only.
    pub async fn connect(config: &ClassifierConfig) -> Option<Self> {
        let endpoint = config.endpoint.clone()?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .ok()?;

        for model in [&config.primary_model, &config.fallback_model] {
            if Self::probe(&client, &endpoint, model).await {
                info!("sentiment classifier initialized: {}", model);
                return Some(Self {
                    endpoint,
                    model: model.clone(),
                    client,
                });
            }
            warn!("sentiment model unavailable: {}", model);
        }

        warn!("no sentiment classifier available, using keyword fallback");
        None
    }

    async fn probe(client: &reqwest::Client, endpoint: &str, model: &str) -> bool {
        let url = format!("{}/v1/models/{}", endpoint, model);
        match client.get(&url).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                debug!("classifier probe failed: {}", e);
                false
            }
        }
    }

    /// The model this handle is bound to.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Classify a text, returning all (label, score) pairs.
    pub async fn classify(&self, text: &str) -> Result<Vec<LabelScore>, ClassifierError> {
        let url = format!("{}/v1/classify", self.endpoint);
        let request = ClassifyRequest {
            model: &self.model,
            text,
        };

        let resp = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ClassifierError::Connection(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(ClassifierError::Api(format!("HTTP {}", resp.status())));
        }

        let parsed: ClassifyResponse = resp
            .json()
            .await
            .map_err(|e| ClassifierError::Parse(e.to_string()))?;

        Ok(parsed.scores)
    }
}

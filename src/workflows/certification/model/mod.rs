mod decode;
mod gemini;

pub use gemini::{GeminiClient, ModelConfig};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::domain::{CriterionResult, DocumentSource, OverallStatus};

/// Label returned when the classifier cannot place a document in the
/// candidate list.
pub const UNKNOWN_LABEL: &str = "DESCONHECIDO";

/// Structured verdict returned by the evaluator. The overall status folding
/// (approved iff every criterion is OK) happens model-side and is trusted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResponse {
    #[serde(default)]
    pub school_detected: Option<String>,
    #[serde(default)]
    pub worker_name: Option<String>,
    pub overall_status: OverallStatus,
    #[serde(default)]
    pub criteria_results: Vec<CriterionResult>,
}

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("model API key is not configured")]
    MissingApiKey,
    #[error("model request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("model returned HTTP {status}: {body}")]
    Api { status: u16, body: String },
    #[error("model returned an empty response")]
    EmptyResponse,
    #[error("the model response was truncated before completion")]
    Truncated,
    #[error("the model response could not be parsed: {0}")]
    Malformed(String),
}

/// Identifies which known document label a file corresponds to.
#[async_trait]
pub trait DocumentClassifier: Send + Sync {
    /// Returns one of `candidate_labels` or [`UNKNOWN_LABEL`]. Response
    /// absence or parse failure degrades to [`UNKNOWN_LABEL`]; only
    /// transport-level failures surface as errors.
    async fn classify(
        &self,
        source: &DocumentSource,
        candidate_labels: &[String],
    ) -> Result<String, ModelError>;
}

/// Evaluates a file against a composed instruction payload.
#[async_trait]
pub trait CertificateEvaluator: Send + Sync {
    async fn evaluate(
        &self,
        source: &DocumentSource,
        instructions: &str,
        identified_type: &str,
    ) -> Result<EvaluationResponse, ModelError>;
}

//! Gemini generateContent client implementing the classifier and evaluator
//! contracts. Documents travel inline as base64 parts; responses are
//! requested as JSON and decoded through the repair path in `decode`.

use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::decode;
use super::{CertificateEvaluator, DocumentClassifier, EvaluationResponse, ModelError, UNKNOWN_LABEL};
use crate::workflows::certification::domain::DocumentSource;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Settings for the generative-model service.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub api_key: String,
    pub model: String,
    pub max_output_tokens: u32,
    pub timeout_seconds: u64,
    /// Training institutions accepted on certificates, injected into the
    /// evaluation prompt.
    pub allowed_schools: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct GeminiClient {
    config: ModelConfig,
    client: Client,
    base_url: String,
}

impl GeminiClient {
    pub fn new(config: ModelConfig) -> Result<Self, ModelError> {
        if config.api_key.is_empty() {
            return Err(ModelError::MissingApiKey);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            config,
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    async fn generate(&self, source: &DocumentSource, prompt: String) -> Result<String, ModelError> {
        let request = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![
                    Part {
                        inline_data: Some(InlineData {
                            mime_type: source.mime_type.clone(),
                            data: BASE64.encode(&source.bytes),
                        }),
                        text: None,
                    },
                    Part {
                        inline_data: None,
                        text: Some(prompt),
                    },
                ],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                max_output_tokens: self.config.max_output_tokens,
            },
        };

        let url = format!(
            "{}/{}:generateContent?key={}",
            self.base_url, self.config.model, self.config.api_key
        );

        debug!(model = %self.config.model, file = %source.file_name, "sending generateContent request");

        let response = self.client.post(&url).json(&request).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ModelError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse =
            serde_json::from_str(&body).map_err(|err| ModelError::Malformed(err.to_string()))?;

        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content.parts.into_iter().next())
            .map(|part| part.text)
            .ok_or(ModelError::EmptyResponse)
    }

    fn identify_prompt(&self, candidate_labels: &[String]) -> String {
        let options = candidate_labels.join("\n");
        format!(
            "Analise este documento PDF.\n\
             Sua tarefa é identificar a qual categoria ele pertence, baseado EXCLUSIVAMENTE nesta lista de opções válidas:\n\n\
             {options}\n\n\
             Se o documento não parecer com nenhum da lista, retorne \"{UNKNOWN_LABEL}\".\n\
             Se for um certificado de NR33, NR35, NR10, tente encontrar o match exato na lista.\n\n\
             Retorne APENAS um JSON: {{ \"identifiedType\": \"Nome Exato da Lista\" }}"
        )
    }

    fn evaluate_prompt(&self, instructions: &str, identified_type: &str) -> String {
        let schools = self.config.allowed_schools.join(", ");
        format!(
            "Analise este PDF de treinamento/certificado.\n\
             TIPO DE DOCUMENTO IDENTIFICADO: {identified_type}\n\
             ESCOLAS VÁLIDAS: {schools}.\n\n\
             VERIFICAR ITENS:\n\
             {instructions}\n\n\
             RETORNE APENAS JSON. SEM MARKDOWN.\n\
             Campos:\n\
             - schoolDetected: Escola encontrada (Ex: SENAI, VESTAS).\n\
             - workerName: O NOME COMPLETO do aluno/colaborador identificado no certificado.\n\
             - overallStatus: \"APPROVED\" (se todos OK) ou \"REJECTED\".\n\
             - criteriaResults: Lista de itens.\n\
             \x20 - description: O item avaliado.\n\
             \x20 - status: \"OK\" ou \"NOK\".\n\
             \x20 - observation: OBRIGATÓRIO SER MUITO CURTO (MÁX 10 PALAVRAS).\n\
             \x20   Ex: \"Data: 10/10/2023\", \"Assinatura OK\", \"40 horas\".\n\
             \x20   NÃO COPIE TRECHOS DO PDF. APENAS DADOS."
        )
    }
}

#[async_trait]
impl DocumentClassifier for GeminiClient {
    async fn classify(
        &self,
        source: &DocumentSource,
        candidate_labels: &[String],
    ) -> Result<String, ModelError> {
        let raw = self.generate(source, self.identify_prompt(candidate_labels)).await?;

        Ok(decode::decode_label(&raw).unwrap_or_else(|| {
            warn!(file = %source.file_name, "classifier response had no usable label");
            UNKNOWN_LABEL.to_string()
        }))
    }
}

#[async_trait]
impl CertificateEvaluator for GeminiClient {
    async fn evaluate(
        &self,
        source: &DocumentSource,
        instructions: &str,
        identified_type: &str,
    ) -> Result<EvaluationResponse, ModelError> {
        let raw = self
            .generate(source, self.evaluate_prompt(instructions, identified_type))
            .await?;
        decode::decode_evaluation(&raw)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

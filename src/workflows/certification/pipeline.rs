//! Sequential document pipeline.
//!
//! One classify + evaluate cycle completes before the next file starts, so
//! evaluator cost stays bounded and progress reporting is deterministic.
//! Classification and parametrization misses degrade to synthetic rejected
//! results; an evaluator failure aborts the whole batch and discards any
//! results collected so far.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use super::domain::{
    AnalysisContext, AnalysisResult, CriterionResult, CriterionStatus, DocumentSource,
    OverallStatus,
};
use super::model::{CertificateEvaluator, DocumentClassifier, ModelError, UNKNOWN_LABEL};
use super::prompt;
use super::rules::RuleStore;
use super::validity::{PolicyResolver, ValidityWindow};

/// Stage of one file's passage through the pipeline, reported in progress
/// events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStage {
    Pending,
    Classifying,
    Unidentified,
    RuleLookup,
    RuleMissing,
    CriteriaComposed,
    Evaluating,
    Done,
}

/// Batch-level failure. Any already-collected results are discarded; callers
/// receive either the full result list or a single error.
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error(
        "the evaluator response for '{file_name}' was truncated; try processing one document at a time"
    )]
    EvaluatorTruncated { file_name: String },
    #[error("certificate evaluation failed for '{file_name}'")]
    Evaluation {
        file_name: String,
        #[source]
        source: ModelError,
    },
}

/// Orchestrates classification, rule resolution, criteria composition and
/// evaluation for a batch of uploaded documents.
pub struct DocumentPipeline<C, E> {
    rules: Arc<RuleStore>,
    resolver: PolicyResolver,
    classifier: Arc<C>,
    evaluator: Arc<E>,
}

impl<C, E> DocumentPipeline<C, E>
where
    C: DocumentClassifier + 'static,
    E: CertificateEvaluator + 'static,
{
    pub fn new(
        rules: Arc<RuleStore>,
        resolver: PolicyResolver,
        classifier: Arc<C>,
        evaluator: Arc<E>,
    ) -> Self {
        Self {
            rules,
            resolver,
            classifier,
            evaluator,
        }
    }

    pub fn rules(&self) -> &RuleStore {
        &self.rules
    }

    /// Processes the batch strictly in order: the previous file's cycle
    /// fully completes before the next starts. Result order matches input
    /// order; no per-file result is dropped for identification or
    /// parametrization misses.
    pub async fn run_batch(
        &self,
        context: AnalysisContext,
        files: &[DocumentSource],
        reference_date: NaiveDate,
    ) -> Result<Vec<AnalysisResult>, BatchError> {
        let candidate_labels = self.rules.available_labels(context);
        let total = files.len();
        let mut results = Vec::with_capacity(total);

        for (index, file) in files.iter().enumerate() {
            info!(
                file = %file.file_name,
                position = index + 1,
                total,
                "processing document"
            );
            let result = self
                .process_file(context, file, &candidate_labels, reference_date)
                .await?;
            results.push(result);
        }

        Ok(results)
    }

    async fn process_file(
        &self,
        context: AnalysisContext,
        file: &DocumentSource,
        candidate_labels: &[String],
        reference_date: NaiveDate,
    ) -> Result<AnalysisResult, BatchError> {
        self.trace_stage(file, FileStage::Classifying);
        let label = match self.classifier.classify(file, candidate_labels).await {
            Ok(label) => label,
            Err(err) => {
                // Classifier failures never abort the batch.
                warn!(file = %file.file_name, error = %err, "classification failed; continuing as unknown");
                UNKNOWN_LABEL.to_string()
            }
        };

        if label == UNKNOWN_LABEL {
            self.trace_stage(file, FileStage::Unidentified);
            return Ok(unidentified_result(&file.file_name));
        }

        self.trace_stage(file, FileStage::RuleLookup);
        let Some(rule) = self.rules.lookup(context, &label) else {
            self.trace_stage(file, FileStage::RuleMissing);
            return Ok(rule_missing_result(&file.file_name, &label));
        };

        let policy = self
            .resolver
            .resolve(&rule.document_name, &rule.expiration_descriptor);
        let window = ValidityWindow::compute(&policy, reference_date);
        let instructions = prompt::compose(&rule.criteria_text, &policy, &window);
        self.trace_stage(file, FileStage::CriteriaComposed);

        self.trace_stage(file, FileStage::Evaluating);
        let response = self
            .evaluator
            .evaluate(file, &instructions, &label)
            .await
            .map_err(|source| match source {
                ModelError::Truncated => BatchError::EvaluatorTruncated {
                    file_name: file.file_name.clone(),
                },
                other => BatchError::Evaluation {
                    file_name: file.file_name.clone(),
                    source: other,
                },
            })?;

        self.trace_stage(file, FileStage::Done);
        // The evaluator's verdict is trusted wholesale; only the file name
        // and identified type are ground truth the pipeline already holds.
        Ok(AnalysisResult {
            file_name: file.file_name.clone(),
            identified_type: label,
            worker_name: response.worker_name,
            school_detected: response.school_detected,
            overall_status: response.overall_status,
            criteria_results: response.criteria_results,
        })
    }

    fn trace_stage(&self, file: &DocumentSource, stage: FileStage) {
        tracing::debug!(file = %file.file_name, stage = ?stage, "pipeline stage");
    }
}

fn unidentified_result(file_name: &str) -> AnalysisResult {
    AnalysisResult {
        file_name: file_name.to_string(),
        identified_type: "Não identificado na lista".to_string(),
        worker_name: None,
        school_detected: None,
        overall_status: OverallStatus::Rejected,
        criteria_results: vec![CriterionResult {
            id: 0,
            description: "Identificação do Documento".to_string(),
            status: CriterionStatus::Nok,
            observation: "O documento não corresponde a nenhum item da lista de parametrização."
                .to_string(),
        }],
    }
}

fn rule_missing_result(file_name: &str, label: &str) -> AnalysisResult {
    AnalysisResult {
        file_name: file_name.to_string(),
        identified_type: label.to_string(),
        worker_name: None,
        school_detected: None,
        overall_status: OverallStatus::Rejected,
        criteria_results: vec![CriterionResult {
            id: 0,
            description: "Parametrização Ausente".to_string(),
            status: CriterionStatus::Nok,
            observation: format!(
                "O documento \"{label}\" foi identificado, mas não foi encontrada regra correspondente."
            ),
        }],
    }
}

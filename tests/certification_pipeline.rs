//! End-to-end pipeline behavior over scripted classifier/evaluator doubles.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;

use certify_ai::workflows::certification::{
    AnalysisContext, BatchError, CertificateEvaluator, CriterionResult, CriterionStatus,
    DocumentClassifier, DocumentPipeline, DocumentSource, EvaluationResponse, ModelError,
    OverallStatus, PolicyResolver, RuleStore, ValidityConfig, UNKNOWN_LABEL,
};

struct ScriptedClassifier {
    responses: Mutex<VecDeque<Result<String, ModelError>>>,
}

impl ScriptedClassifier {
    fn new(responses: Vec<Result<String, ModelError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
        }
    }
}

#[async_trait]
impl DocumentClassifier for ScriptedClassifier {
    async fn classify(
        &self,
        _source: &DocumentSource,
        _candidate_labels: &[String],
    ) -> Result<String, ModelError> {
        self.responses
            .lock()
            .expect("classifier script poisoned")
            .pop_front()
            .unwrap_or_else(|| Ok(UNKNOWN_LABEL.to_string()))
    }
}

struct RecordingEvaluator {
    responses: Mutex<VecDeque<Result<EvaluationResponse, ModelError>>>,
    instructions: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl RecordingEvaluator {
    fn new(responses: Vec<Result<EvaluationResponse, ModelError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            instructions: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn recorded_instructions(&self) -> Vec<String> {
        self.instructions
            .lock()
            .expect("instruction log poisoned")
            .clone()
    }
}

#[async_trait]
impl CertificateEvaluator for RecordingEvaluator {
    async fn evaluate(
        &self,
        _source: &DocumentSource,
        instructions: &str,
        _identified_type: &str,
    ) -> Result<EvaluationResponse, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.instructions
            .lock()
            .expect("instruction log poisoned")
            .push(instructions.to_string());
        self.responses
            .lock()
            .expect("evaluator script poisoned")
            .pop_front()
            .unwrap_or_else(|| Ok(approved_response()))
    }
}

fn approved_response() -> EvaluationResponse {
    EvaluationResponse {
        school_detected: Some("SENAI".to_string()),
        worker_name: None,
        overall_status: OverallStatus::Approved,
        criteria_results: vec![CriterionResult {
            id: 1,
            description: "Dentro da validade".to_string(),
            status: CriterionStatus::Ok,
            observation: "Emitido em data recente.".to_string(),
        }],
    }
}

fn pipeline(
    classifier: Arc<ScriptedClassifier>,
    evaluator: Arc<RecordingEvaluator>,
) -> DocumentPipeline<ScriptedClassifier, RecordingEvaluator> {
    DocumentPipeline::new(
        Arc::new(RuleStore::builtin()),
        PolicyResolver::new(ValidityConfig::default()),
        classifier,
        evaluator,
    )
}

fn pdf(name: &str) -> DocumentSource {
    DocumentSource::pdf(name, b"%PDF-1.4".to_vec())
}

fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").expect("valid test date")
}

#[tokio::test]
async fn annual_document_instructions_carry_the_cutoff_date() {
    let classifier = Arc::new(ScriptedClassifier::new(vec![Ok("ASO".to_string())]));
    let evaluator = Arc::new(RecordingEvaluator::new(vec![]));
    let pipeline = pipeline(classifier, evaluator.clone());

    let results = pipeline
        .run_batch(AnalysisContext::Worker, &[pdf("aso.pdf")], date("2025-06-01"))
        .await
        .expect("batch succeeds");

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].file_name, "aso.pdf");
    assert_eq!(results[0].identified_type, "ASO");
    assert_eq!(results[0].overall_status, OverallStatus::Approved);

    let instructions = evaluator.recorded_instructions();
    assert_eq!(instructions.len(), 1);
    assert!(instructions[0].contains("01/06/2024"));
    assert!(instructions[0].contains("01/06/2025"));
    assert!(instructions[0].contains("ANUAL"));
}

#[tokio::test]
async fn unknown_label_short_circuits_without_evaluation() {
    let classifier = Arc::new(ScriptedClassifier::new(vec![Ok(UNKNOWN_LABEL.to_string())]));
    let evaluator = Arc::new(RecordingEvaluator::new(vec![]));
    let pipeline = pipeline(classifier, evaluator.clone());

    let results = pipeline
        .run_batch(
            AnalysisContext::Worker,
            &[pdf("mystery.pdf")],
            date("2025-06-01"),
        )
        .await
        .expect("batch succeeds");

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].identified_type, "Não identificado na lista");
    assert_eq!(results[0].overall_status, OverallStatus::Rejected);
    assert_eq!(results[0].criteria_results.len(), 1);
    assert_eq!(results[0].criteria_results[0].status, CriterionStatus::Nok);
    assert_eq!(evaluator.call_count(), 0);
}

#[tokio::test]
async fn classifier_failure_degrades_to_unknown() {
    let classifier = Arc::new(ScriptedClassifier::new(vec![Err(ModelError::Api {
        status: 503,
        body: "overloaded".to_string(),
    })]));
    let evaluator = Arc::new(RecordingEvaluator::new(vec![]));
    let pipeline = pipeline(classifier, evaluator.clone());

    let results = pipeline
        .run_batch(
            AnalysisContext::Worker,
            &[pdf("flaky.pdf")],
            date("2025-06-01"),
        )
        .await
        .expect("classifier errors never abort the batch");

    assert_eq!(results[0].overall_status, OverallStatus::Rejected);
    assert_eq!(results[0].identified_type, "Não identificado na lista");
    assert_eq!(evaluator.call_count(), 0);
}

#[tokio::test]
async fn identified_label_without_rule_yields_rejected_report() {
    let classifier = Arc::new(ScriptedClassifier::new(vec![Ok(
        "Curso Que Ninguém Parametrizou".to_string()
    )]));
    let evaluator = Arc::new(RecordingEvaluator::new(vec![]));
    let pipeline = pipeline(classifier, evaluator.clone());

    let results = pipeline
        .run_batch(
            AnalysisContext::Worker,
            &[pdf("oddball.pdf")],
            date("2025-06-01"),
        )
        .await
        .expect("batch succeeds");

    assert_eq!(results[0].identified_type, "Curso Que Ninguém Parametrizou");
    assert_eq!(results[0].overall_status, OverallStatus::Rejected);
    assert_eq!(
        results[0].criteria_results[0].description,
        "Parametrização Ausente"
    );
    assert_eq!(evaluator.call_count(), 0);
}

#[tokio::test]
async fn evaluator_failure_aborts_batch_and_discards_results() {
    let classifier = Arc::new(ScriptedClassifier::new(vec![
        Ok("ASO".to_string()),
        Ok("ASO".to_string()),
        Ok("ASO".to_string()),
    ]));
    let evaluator = Arc::new(RecordingEvaluator::new(vec![
        Ok(approved_response()),
        Err(ModelError::Api {
            status: 500,
            body: "internal".to_string(),
        }),
    ]));
    let pipeline = pipeline(classifier, evaluator.clone());

    let err = pipeline
        .run_batch(
            AnalysisContext::Worker,
            &[pdf("a.pdf"), pdf("b.pdf"), pdf("c.pdf")],
            date("2025-06-01"),
        )
        .await
        .expect_err("second file fails the batch");

    match err {
        BatchError::Evaluation { file_name, .. } => assert_eq!(file_name, "b.pdf"),
        other => panic!("unexpected error: {other}"),
    }
    // The third file is never reached.
    assert_eq!(evaluator.call_count(), 2);
}

#[tokio::test]
async fn truncated_response_maps_to_dedicated_batch_error() {
    let classifier = Arc::new(ScriptedClassifier::new(vec![Ok("ASO".to_string())]));
    let evaluator = Arc::new(RecordingEvaluator::new(vec![Err(ModelError::Truncated)]));
    let pipeline = pipeline(classifier, evaluator.clone());

    let err = pipeline
        .run_batch(
            AnalysisContext::Worker,
            &[pdf("truncated.pdf")],
            date("2025-06-01"),
        )
        .await
        .expect_err("truncation aborts the batch");

    assert!(matches!(
        err,
        BatchError::EvaluatorTruncated { file_name } if file_name == "truncated.pdf"
    ));
}

#[tokio::test]
async fn batch_results_preserve_input_order() {
    let classifier = Arc::new(ScriptedClassifier::new(vec![
        Ok("ASO".to_string()),
        Ok(UNKNOWN_LABEL.to_string()),
        Ok("ASO".to_string()),
    ]));
    let evaluator = Arc::new(RecordingEvaluator::new(vec![]));
    let pipeline = pipeline(classifier, evaluator.clone());

    let results = pipeline
        .run_batch(
            AnalysisContext::Worker,
            &[pdf("first.pdf"), pdf("second.pdf"), pdf("third.pdf")],
            date("2025-06-01"),
        )
        .await
        .expect("batch succeeds");

    let names: Vec<_> = results.iter().map(|r| r.file_name.as_str()).collect();
    assert_eq!(names, ["first.pdf", "second.pdf", "third.pdf"]);
    assert_eq!(results[1].overall_status, OverallStatus::Rejected);
    assert_eq!(evaluator.call_count(), 2);
}

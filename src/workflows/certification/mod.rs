//! Certificate-validation workflow: parametrized rules, validity-window
//! resolution, instruction composition, and the sequential analysis
//! pipeline driving the external classifier/evaluator.

pub mod domain;
pub mod model;
pub mod pipeline;
pub mod prompt;
pub mod rules;
pub mod validity;

pub use domain::{
    AnalysisContext, AnalysisResult, CriterionResult, CriterionStatus, DocumentRule,
    DocumentSource, OverallStatus,
};
pub use model::{
    CertificateEvaluator, DocumentClassifier, EvaluationResponse, GeminiClient, ModelConfig,
    ModelError, UNKNOWN_LABEL,
};
pub use pipeline::{BatchError, DocumentPipeline, FileStage};
pub use rules::{RuleSourceError, RuleStore, RuleWorkbook, Sheet, WorkbookLayout, ALLOWED_SCHOOLS};
pub use validity::{PolicyResolver, ValidityConfig, ValidityPolicy, ValidityWindow, WindowLength};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::extract::Query;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::{Local, NaiveDate};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::cli::ServeArgs;
use crate::config::AppConfig;
use crate::error::AppError;
use crate::telemetry;
use crate::workflows::certification::{
    AnalysisContext, AnalysisResult, DocumentPipeline, DocumentSource, GeminiClient,
    PolicyResolver, RuleStore, RuleWorkbook, Sheet,
};

/// Shared handler state. The pipeline is ready-to-run; readiness flips once
/// the listener is bound.
#[derive(Clone)]
pub struct AppState {
    pub readiness: Arc<AtomicBool>,
    pub metrics: Arc<PrometheusHandle>,
    pub pipeline: Arc<DocumentPipeline<GeminiClient, GeminiClient>>,
}

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let rules = match args.rules_dir.as_deref() {
        Some(dir) => {
            let sheets = Sheet::from_csv_dir(dir)?;
            let workbook = RuleWorkbook::from_sheets(&sheets, config.workbook)?;
            Arc::new(RuleStore::from_workbook(&workbook))
        }
        None => Arc::new(RuleStore::builtin()),
    };

    let client = Arc::new(GeminiClient::new(config.model.clone())?);
    let pipeline = Arc::new(DocumentPipeline::new(
        rules,
        PolicyResolver::new(config.validity),
        client.clone(),
        client,
    ));

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness.clone(),
        metrics: Arc::new(prometheus_handle),
        pipeline,
    };

    let app = router(state).layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness.store(true, Ordering::Release);

    info!(?config.environment, %addr, "certificate validation service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/certifications/labels", get(labels_endpoint))
        .route("/api/v1/certifications/analyze", post(analyze_endpoint))
        .layer(Extension(state))
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[derive(Debug, Deserialize)]
struct LabelsQuery {
    context: String,
}

async fn labels_endpoint(
    Extension(state): Extension<AppState>,
    Query(query): Query<LabelsQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let context = parse_context(&query.context)?;
    let labels = state.pipeline.rules().available_labels(context);
    Ok(Json(json!({ "context": context, "labels": labels })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeRequest {
    context: String,
    #[serde(default)]
    reference_date: Option<NaiveDate>,
    files: Vec<FilePayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FilePayload {
    file_name: String,
    #[serde(default = "default_mime_type")]
    mime_type: String,
    /// Base64-encoded document bytes.
    data: String,
}

fn default_mime_type() -> String {
    "application/pdf".to_string()
}

async fn analyze_endpoint(
    Extension(state): Extension<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<Vec<AnalysisResult>>, AppError> {
    let context = parse_context(&request.context)?;
    if request.files.is_empty() {
        return Err(AppError::InvalidRequest("no files supplied".to_string()));
    }

    let mut sources = Vec::with_capacity(request.files.len());
    for file in request.files {
        let bytes = BASE64.decode(file.data.as_bytes()).map_err(|_| {
            AppError::InvalidRequest(format!("file '{}' is not valid base64", file.file_name))
        })?;
        sources.push(DocumentSource {
            file_name: file.file_name,
            mime_type: file.mime_type,
            bytes,
        });
    }

    let reference_date = request
        .reference_date
        .unwrap_or_else(|| Local::now().date_naive());

    let results = state
        .pipeline
        .run_batch(context, &sources, reference_date)
        .await?;

    Ok(Json(results))
}

fn parse_context(value: &str) -> Result<AnalysisContext, AppError> {
    AnalysisContext::parse(value).ok_or_else(|| {
        AppError::InvalidRequest(format!(
            "unknown context '{value}'; expected 'colaborador' or 'equipamento'"
        ))
    })
}

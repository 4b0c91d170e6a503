use std::path::PathBuf;
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};

use crate::config::AppConfig;
use crate::error::AppError;
use crate::server;
use crate::telemetry;
use crate::workflows::certification::{
    AnalysisContext, DocumentPipeline, DocumentSource, GeminiClient, PolicyResolver, RuleStore,
    RuleWorkbook, Sheet,
};

#[derive(Debug, Parser)]
#[command(
    name = "certify-ai",
    about = "AI-assisted validation of training and certification documents",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP service (the default when no subcommand is given).
    Serve(ServeArgs),
    /// Analyze one or more PDF files and print the reports as JSON.
    Analyze(AnalyzeArgs),
    /// List the document labels known for a context.
    Labels(LabelsArgs),
}

#[derive(Debug, Default, Args)]
pub struct ServeArgs {
    /// Bind address override (defaults to APP_HOST).
    #[arg(long)]
    pub host: Option<String>,

    /// Port override (defaults to APP_PORT).
    #[arg(long)]
    pub port: Option<u16>,

    /// Directory of CSV sheets replacing the built-in rule table.
    #[arg(long, value_name = "DIR")]
    pub rules_dir: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    /// PDF files to analyze, in order.
    #[arg(required = true, value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Validation context: 'colaborador' or 'equipamento'.
    #[arg(long, default_value = "colaborador")]
    pub context: String,

    /// Reference date for validity windows (YYYY-MM-DD, defaults to today).
    #[arg(long, value_name = "DATE")]
    pub reference_date: Option<NaiveDate>,

    /// Directory of CSV sheets replacing the built-in rule table.
    #[arg(long, value_name = "DIR")]
    pub rules_dir: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct LabelsArgs {
    /// Validation context: 'colaborador' or 'equipamento'.
    #[arg(long, default_value = "colaborador")]
    pub context: String,

    /// Directory of CSV sheets replacing the built-in rule table.
    #[arg(long, value_name = "DIR")]
    pub rules_dir: Option<PathBuf>,
}

pub async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    match cli.command {
        None => server::run(ServeArgs::default()).await,
        Some(Command::Serve(args)) => server::run(args).await,
        Some(Command::Analyze(args)) => run_analyze(args).await,
        Some(Command::Labels(args)) => run_labels(args),
    }
}

fn load_rules(rules_dir: Option<&std::path::Path>, config: &AppConfig) -> Result<RuleStore, AppError> {
    match rules_dir {
        Some(dir) => {
            let sheets = Sheet::from_csv_dir(dir)?;
            let workbook = RuleWorkbook::from_sheets(&sheets, config.workbook)?;
            Ok(RuleStore::from_workbook(&workbook))
        }
        None => Ok(RuleStore::builtin()),
    }
}

fn parse_context(value: &str) -> Result<AnalysisContext, AppError> {
    AnalysisContext::parse(value).ok_or_else(|| {
        AppError::InvalidRequest(format!(
            "unknown context '{value}'; expected 'colaborador' or 'equipamento'"
        ))
    })
}

async fn run_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let context = parse_context(&args.context)?;
    let rules = Arc::new(load_rules(args.rules_dir.as_deref(), &config)?);
    let client = Arc::new(GeminiClient::new(config.model.clone())?);
    let pipeline = DocumentPipeline::new(
        rules,
        PolicyResolver::new(config.validity),
        client.clone(),
        client,
    );

    let mut sources = Vec::with_capacity(args.files.len());
    for path in &args.files {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        sources.push(DocumentSource::pdf(file_name, bytes));
    }

    let reference_date = args
        .reference_date
        .unwrap_or_else(|| Local::now().date_naive());

    let results = pipeline.run_batch(context, &sources, reference_date).await?;
    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}

fn run_labels(args: LabelsArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let context = parse_context(&args.context)?;
    let rules = load_rules(args.rules_dir.as_deref(), &config)?;

    for label in rules.available_labels(context) {
        println!("{label}");
    }
    Ok(())
}

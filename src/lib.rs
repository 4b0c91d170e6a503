//! AI-assisted validation of training and certification documents.
//!
//! The service keeps a parametrized rule table per validation context,
//! classifies each uploaded PDF against the known labels, resolves the
//! document's validity policy, and asks the evaluator model for a per-criterion
//! verdict with the validity window already spelled out in the instructions.

pub mod cli;
pub mod config;
pub mod error;
pub mod server;
pub mod telemetry;
pub mod workflows;

pub use error::AppError;

/// Parses the command line and dispatches to the selected subcommand.
pub async fn run() -> Result<(), AppError> {
    cli::run().await
}

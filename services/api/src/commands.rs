use clap::Args;
use papel_checker::checker::EssayChecker;
use papel_checker::completion::GroqClient;
use papel_checker::config::AppConfig;
use papel_checker::error::AppError;
use papel_checker::evaluation::{normalize_response, EvaluationResult};
use papel_checker::telemetry;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub(crate) struct CheckArgs {
    /// Read the essay from a UTF-8 text file
    #[arg(long)]
    pub(crate) file: Option<PathBuf>,
    /// Pass the essay inline
    #[arg(long)]
    pub(crate) text: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct NormalizeArgs {
    /// Saved raw model response
    #[arg(long)]
    pub(crate) response: PathBuf,
    /// Essay the response was produced for
    #[arg(long)]
    pub(crate) essay: PathBuf,
}

pub(crate) async fn run_check(args: CheckArgs) -> Result<(), AppError> {
    let essay = essay_text(args)?;

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let client = GroqClient::new(config.completion)?;
    let checker = EssayChecker::new(Arc::new(client));
    let outcome = checker.check(&essay).await?;

    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}

pub(crate) fn run_normalize(args: NormalizeArgs) -> Result<(), AppError> {
    let result = normalize_files(&args.response, &args.essay)?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn essay_text(args: CheckArgs) -> Result<String, AppError> {
    match (args.file, args.text) {
        (Some(path), _) => Ok(fs::read_to_string(path)?),
        (None, Some(text)) => Ok(text),
        (None, None) => Ok(String::new()),
    }
}

fn normalize_files(response: &Path, essay: &Path) -> Result<EvaluationResult, AppError> {
    let raw = fs::read_to_string(response)?;
    let essay = fs::read_to_string(essay)?;
    Ok(normalize_response(&raw, &essay))
}

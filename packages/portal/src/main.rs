use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use portal::config::AppConfig;
use portal::database::init_db;
use portal::error::AppError;
use portal::models::GradeRequest;
use portal::state::AppState;
use portal::store::SubmissionRepository;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "portal", version, about = "Grade code submissions against a Judge0 service")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Grade a submission read as JSON from a file or stdin
    Grade {
        /// Submitting user
        #[arg(long)]
        user: Uuid,
        /// Request file; stdin when omitted
        #[arg(long)]
        request: Option<PathBuf>,
    },
    /// Print a stored submission
    Show { submission_id: Uuid },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load().context("Failed to load config")?;

    let db = init_db(&config.database.url)
        .await
        .context("Failed to connect to database")?;
    let state = AppState::new(&config, db).context("Failed to build judge client")?;
    info!(judge = %config.judge.base_url, "Portal ready");

    match cli.command {
        Command::Grade { user, request } => grade(&state, user, request).await,
        Command::Show { submission_id } => show(&state, submission_id).await,
    }
}

async fn grade(state: &AppState, user: Uuid, path: Option<PathBuf>) -> anyhow::Result<ExitCode> {
    let raw = match &path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read request from stdin")?;
            buf
        }
    };

    let request: GradeRequest = match serde_json::from_str(&raw) {
        Ok(request) => request,
        Err(e) => {
            return report(AppError::Validation(format!("Malformed request: {e}")));
        }
    };

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, cancelling grading");
            on_signal.cancel();
        }
    });

    match state.grader.grade(user, &request, &cancel).await {
        Ok(response) => {
            print_json(&response)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => report(err),
    }
}

async fn show(state: &AppState, id: Uuid) -> anyhow::Result<ExitCode> {
    match state.store.find_by_id(id).await {
        Ok(Some(submission)) => {
            print_json(&submission)?;
            Ok(ExitCode::SUCCESS)
        }
        Ok(None) => report(AppError::NotFound(format!("Submission {id} not found"))),
        Err(e) => report(e.into()),
    }
}

fn report(err: AppError) -> anyhow::Result<ExitCode> {
    let (status, body) = err.status_and_body();
    warn!(status = status.as_u16(), code = body.code, "Command failed");
    print_json(&body)?;
    Ok(ExitCode::FAILURE)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Failed to encode output")?;
    println!("{out}");
    Ok(())
}

//! quizctl CLI - quiz question database import tooling
//!
//! This is the entry point for the quizctl command-line tool, which provides:
//! - Question file import into Postgres (`import` subcommand)
//! - Question file validation without a database (`validate` subcommand)

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::anyhow;
use clap::{Parser, Subcommand};
use quizctl_core::TaxonomyPlan;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod ui;

#[derive(Parser, Debug)]
#[command(
    name = "quizctl",
    author,
    version,
    about = "Import quiz question files into the quiz database",
    long_about = "Load a JSON array of quiz questions into Postgres, creating theme and \
                  subtheme rows as needed and linking each question to its subtheme."
)]
struct Cli {
    /// Suppress progress spinners (for script consumption)
    #[arg(long, short = 'q', global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Import a question file into the database
    Import(quizctl_import::ImportArgs),
    /// Validate a question file without touching the database
    Validate(ValidateArgs),
}

#[derive(Parser, Debug)]
struct ValidateArgs {
    /// Input JSON file containing an array of question objects
    #[arg(long = "in", value_name = "PATH")]
    input: PathBuf,
}

fn init_tracing() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing().ok();
    let cli = Cli::parse();
    ui::init_quiet_mode(cli.quiet);

    match cli.command {
        Commands::Import(args) => run_import(args).await,
        Commands::Validate(args) => run_validate(args),
    }
}

async fn run_import(args: quizctl_import::ImportArgs) -> ExitCode {
    let spinner = ui::spinner(format!("importing {}", args.input.display()));

    match quizctl_import::run_import(args).await {
        Ok(report) => {
            ui::finish_success(
                spinner,
                format!(
                    "imported {} questions ({} themes, {} subthemes)",
                    report.questions, report.themes, report.subthemes
                ),
            );
            info!("import complete");
            ExitCode::SUCCESS
        }
        Err(err) if err.is_fatal() => {
            ui::finish_error(spinner, err.to_string());
            error!("import failed: {err}");
            ExitCode::FAILURE
        }
        Err(err) => {
            // The failed stage's transaction was rolled back on drop; the job
            // still ends normally so batch callers see a clean exit.
            ui::finish_error(spinner, err.to_string());
            if err.is_constraint_violation() {
                error!("import rolled back (constraint violation): {err}");
            } else {
                error!("import rolled back: {err}");
            }
            ExitCode::SUCCESS
        }
    }
}

fn run_validate(args: ValidateArgs) -> ExitCode {
    match quizctl_core::load_records(&args.input) {
        Ok(records) => {
            let plan = TaxonomyPlan::from_records(&records);
            info!(
                "{}: {} records, {} themes, {} subthemes",
                args.input.display(),
                records.len(),
                plan.theme_count(),
                plan.subtheme_count()
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("validation failed: {err}");
            ExitCode::FAILURE
        }
    }
}

//! The import pipeline: load a question file, insert the taxonomy it implies,
//! then insert the questions themselves.
//!
//! Three stages, strictly sequential:
//! 1. load and validate the input file (no database involvement),
//! 2. insert distinct themes and (theme, subtheme) pairs in one transaction,
//!    recording the generated ids,
//! 3. insert one question row per record in input order, resolving each
//!    record's subtheme through the ids from stage 2, in a second transaction.
//!
//! Each stage commits once. An insertion failure drops the open transaction,
//! which rolls back everything uncommitted in that stage.

use std::collections::HashMap;
use std::path::PathBuf;

use clap::Args;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use thiserror::Error;
use tracing::info;

use quizctl_core::{load_records, QuestionRecord, QuizError, TaxonomyPlan};

pub mod config;

pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../migrations");

/// Progress log cadence for the question stage.
const PROGRESS_EVERY: usize = 10;

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Input JSON file containing an array of question objects
    #[arg(long = "in", value_name = "PATH")]
    pub input: PathBuf,

    /// Scan the input and report what would be inserted, without connecting
    #[arg(long)]
    pub dry_run: bool,
}

/// Import failures, tagged by stage so the caller can tell fatal setup
/// problems apart from insertion errors that were recovered by rollback.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("failed to load questions: {source}")]
    Load {
        #[from]
        source: QuizError,
    },

    #[error("configuration error: {source}")]
    Config { source: QuizError },

    #[error("database connection failed: {source}")]
    Connection { source: sqlx::Error },

    #[error("migration failed: {source}")]
    Migrate {
        #[from]
        source: sqlx::migrate::MigrateError,
    },

    #[error("failed to insert theme '{name}': {source}")]
    Theme { name: String, source: sqlx::Error },

    #[error("failed to insert subtheme '{name}' under theme '{theme}': {source}")]
    Subtheme {
        theme: String,
        name: String,
        source: sqlx::Error,
    },

    #[error("failed to insert question at record {index}: {source}")]
    Question { index: usize, source: sqlx::Error },

    #[error("failed to commit {stage} transaction: {source}")]
    Commit {
        stage: &'static str,
        source: sqlx::Error,
    },
}

impl ImportError {
    /// Errors that should fail the process. Insertion and commit errors are
    /// not fatal: the affected stage has been rolled back and the job ends
    /// normally.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Load { .. } | Self::Config { .. } | Self::Connection { .. } | Self::Migrate { .. }
        )
    }

    /// Whether the underlying database error is a constraint violation
    /// (SQLSTATE class 23).
    pub fn is_constraint_violation(&self) -> bool {
        let source = match self {
            Self::Theme { source, .. }
            | Self::Subtheme { source, .. }
            | Self::Question { source, .. } => source,
            _ => return false,
        };
        match source {
            sqlx::Error::Database(db) => db
                .code()
                .map(|code| code.starts_with("23"))
                .unwrap_or(false),
            _ => false,
        }
    }
}

/// Row counts produced by a run (or that a dry run would produce).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub themes: usize,
    pub subthemes: usize,
    pub questions: usize,
}

/// Generated ids from the taxonomy stage, keyed by name.
#[derive(Debug, Default)]
pub struct TaxonomyIds {
    themes: HashMap<String, i32>,
    subthemes: HashMap<String, HashMap<String, i32>>,
}

impl TaxonomyIds {
    pub fn theme_id(&self, name: &str) -> Option<i32> {
        self.themes.get(name).copied()
    }

    /// Resolve a record's subtheme link. None when the record has no taxonomy
    /// or the pair was never created; that is not an error, the question is
    /// simply inserted without a link.
    pub fn resolve(&self, record: &QuestionRecord) -> Option<i32> {
        if !record.has_taxonomy() {
            return None;
        }
        self.subthemes.get(&record.theme)?.get(&record.subtheme).copied()
    }

    pub fn theme_count(&self) -> usize {
        self.themes.len()
    }

    pub fn subtheme_count(&self) -> usize {
        self.subthemes.values().map(|m| m.len()).sum()
    }
}

/// Run the full pipeline against the configured database.
pub async fn run_import(args: ImportArgs) -> Result<ImportReport, ImportError> {
    let records = load_records(&args.input)?;
    let plan = TaxonomyPlan::from_records(&records);
    info!(
        "loaded {} question records from {}",
        records.len(),
        args.input.display()
    );

    if args.dry_run {
        info!(
            "dry-run: would insert {} themes, {} subthemes, {} questions",
            plan.theme_count(),
            plan.subtheme_count(),
            records.len()
        );
        return Ok(ImportReport {
            themes: plan.theme_count(),
            subthemes: plan.subtheme_count(),
            questions: records.len(),
        });
    }

    config::load_dotenv();
    let db = config::database_config().map_err(|source| ImportError::Config { source })?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&db.database_url())
        .await
        .map_err(|source| ImportError::Connection { source })?;
    MIGRATOR.run(&pool).await?;

    let ids = insert_taxonomy(&pool, &plan).await?;
    let questions = insert_questions(&pool, &records, &ids).await?;

    Ok(ImportReport {
        themes: ids.theme_count(),
        subthemes: ids.subtheme_count(),
        questions,
    })
}

/// Stage 2: insert themes and subthemes in one transaction, committed at the
/// end. On error the transaction is dropped, rolling the whole stage back.
pub async fn insert_taxonomy(
    pool: &PgPool,
    plan: &TaxonomyPlan,
) -> Result<TaxonomyIds, ImportError> {
    let mut tx = pool
        .begin()
        .await
        .map_err(|source| ImportError::Connection { source })?;
    let mut ids = TaxonomyIds::default();

    for theme in &plan.themes {
        let row = sqlx::query("insert into themes (name) values ($1) returning id")
            .bind(&theme.name)
            .fetch_one(&mut *tx)
            .await
            .map_err(|source| ImportError::Theme {
                name: theme.name.clone(),
                source,
            })?;
        let theme_id: i32 = row.get("id");
        info!("inserted theme '{}' (id {})", theme.name, theme_id);
        ids.themes.insert(theme.name.clone(), theme_id);

        for subtheme in &theme.subthemes {
            let row =
                sqlx::query("insert into subthemes (name, theme_id) values ($1, $2) returning id")
                    .bind(subtheme)
                    .bind(theme_id)
                    .fetch_one(&mut *tx)
                    .await
                    .map_err(|source| ImportError::Subtheme {
                        theme: theme.name.clone(),
                        name: subtheme.clone(),
                        source,
                    })?;
            let subtheme_id: i32 = row.get("id");
            info!(
                "inserted subtheme '{}' under '{}' (id {})",
                subtheme, theme.name, subtheme_id
            );
            ids.subthemes
                .entry(theme.name.clone())
                .or_default()
                .insert(subtheme.clone(), subtheme_id);
        }
    }

    tx.commit().await.map_err(|source| ImportError::Commit {
        stage: "taxonomy",
        source,
    })?;
    Ok(ids)
}

/// Stage 3: insert one question row per record, in input order, in one
/// transaction committed at the end. Returns the number of rows inserted.
pub async fn insert_questions(
    pool: &PgPool,
    records: &[QuestionRecord],
    ids: &TaxonomyIds,
) -> Result<usize, ImportError> {
    let mut tx = pool
        .begin()
        .await
        .map_err(|source| ImportError::Connection { source })?;
    let mut inserted = 0usize;

    for (index, record) in records.iter().enumerate() {
        let subtheme_id = ids.resolve(record);
        sqlx::query(
            "insert into questions (subtheme_id, question, question_type, answer) \
             values ($1, $2, $3, $4)",
        )
        .bind(subtheme_id)
        .bind(&record.question)
        .bind(&record.question_type)
        .bind(&record.answer)
        .execute(&mut *tx)
        .await
        .map_err(|source| ImportError::Question { index, source })?;

        inserted += 1;
        if inserted % PROGRESS_EVERY == 0 {
            info!("{} questions inserted...", inserted);
        }
    }

    tx.commit().await.map_err(|source| ImportError::Commit {
        stage: "question",
        source,
    })?;
    info!("inserted {} questions in total", inserted);
    Ok(inserted)
}

//! Connection configuration for the import pipeline.
//!
//! Nothing is hard-coded: the database location is resolved from, in order of
//! precedence,
//! 1. `DATABASE_URL` (full connection URL),
//! 2. `QUIZDB_NAME` / `QUIZDB_USER` / `QUIZDB_PASSWORD` / `QUIZDB_HOST` /
//!    `QUIZDB_PORT` environment variables,
//! 3. the `[database]` section of `./quizctl.toml` or `~/.quizctl/config.toml`,
//! 4. built-in defaults (`postgres@localhost:5432/quiz`).
//!
//! `.env` files are loaded first (current directory, then `~/.quizctl/.env`),
//! so any of the variables above can live there.

use std::env;
use std::path::PathBuf;

use serde::Deserialize;
use tracing::{debug, warn};

use quizctl_core::{QuizError, Result};

/// Load environment variables from .env files.
///
/// dotenvy never overwrites variables that are already set, so the current
/// directory takes precedence over `~/.quizctl/.env`, and real environment
/// variables win over both.
pub fn load_dotenv() {
    if let Ok(path) = dotenvy::dotenv() {
        debug!("loaded .env from current directory: {}", path.display());
    }

    if let Some(dir) = config_dir() {
        let env_file = dir.join(".env");
        if env_file.exists() {
            match dotenvy::from_path(&env_file) {
                Ok(()) => debug!("loaded .env from {}", env_file.display()),
                Err(err) => debug!("failed to load {}: {}", env_file.display(), err),
            }
        }
    }
}

/// Get the quizctl config directory path (~/.quizctl)
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".quizctl"))
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct QuizctlConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
}

/// Database connection parameters. `url`, when set, wins over the parts.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default = "default_dbname")]
    pub dbname: String,

    #[serde(default = "default_user")]
    pub user: String,

    #[serde(default)]
    pub password: String,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            dbname: default_dbname(),
            user: default_user(),
            password: String::new(),
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_dbname() -> String {
    "quiz".to_string()
}

fn default_user() -> String {
    "postgres".to_string()
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    5432
}

impl QuizctlConfig {
    /// Load config from TOML files: `./quizctl.toml` overrides
    /// `~/.quizctl/config.toml`, which overrides built-in defaults.
    /// Unreadable or unparsable files are skipped with a warning.
    pub fn load() -> Self {
        let mut config = QuizctlConfig::default();

        if let Some(global_path) = config_dir().map(|d| d.join("config.toml")) {
            if let Some(global) = Self::read_file(&global_path) {
                config = global;
            }
        }

        let local_path = PathBuf::from("quizctl.toml");
        if let Some(local) = Self::read_file(&local_path) {
            config = local;
        }

        config
    }

    fn read_file(path: &PathBuf) -> Option<Self> {
        if !path.exists() {
            return None;
        }
        match std::fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<QuizctlConfig>(&contents) {
                Ok(config) => {
                    debug!("loaded config from {}", path.display());
                    Some(config)
                }
                Err(err) => {
                    warn!("failed to parse {}: {}", path.display(), err);
                    None
                }
            },
            Err(err) => {
                debug!("failed to read {}: {}", path.display(), err);
                None
            }
        }
    }
}

impl DatabaseConfig {
    /// Apply environment variable overrides on top of file-sourced values.
    pub fn apply_env(&mut self) -> Result<()> {
        if let Ok(url) = env::var("DATABASE_URL") {
            if !url.is_empty() {
                self.url = Some(url);
            }
        }
        if let Ok(dbname) = env::var("QUIZDB_NAME") {
            self.dbname = dbname;
        }
        if let Ok(user) = env::var("QUIZDB_USER") {
            self.user = user;
        }
        if let Ok(password) = env::var("QUIZDB_PASSWORD") {
            self.password = password;
        }
        if let Ok(host) = env::var("QUIZDB_HOST") {
            self.host = host;
        }
        if let Ok(port) = env::var("QUIZDB_PORT") {
            self.port = port
                .parse()
                .map_err(|_| QuizError::config(format!("QUIZDB_PORT is not a port: '{port}'")))?;
        }
        Ok(())
    }

    /// Render a `postgres://` connection URL.
    pub fn database_url(&self) -> String {
        if let Some(url) = &self.url {
            return url.clone();
        }
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.user, self.password, self.host, self.port, self.dbname
        )
    }
}

/// Resolve the effective database configuration (files, then environment).
pub fn database_config() -> Result<DatabaseConfig> {
    let mut config = QuizctlConfig::load().database;
    config.apply_env()?;
    Ok(config)
}

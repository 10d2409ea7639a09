//! CLI command definitions and handlers.

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokenscope_core::config::{CliOverrides, Config};
use tokenscope_db::DbPool;

pub mod compare;
pub mod extract;
pub mod saved;

/// Tokenscope - design-token extraction and consistency scoring for websites
#[derive(Parser)]
#[command(name = "tokenscope")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file (defaults to ./tokenscope.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// SQLite database path
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// User id that owns saved extractions
    #[arg(short, long, global = true)]
    pub user: Option<String>,

    /// Also write logs to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract, name and score design tokens from a URL
    Extract(extract::ExtractArgs),

    /// Show the consistency report of a saved extraction
    Score(saved::IdArgs),

    /// List saved extractions
    List(saved::ListArgs),

    /// Show every token of a saved extraction
    Show(saved::IdArgs),

    /// Compare two saved extractions
    Compare(compare::CompareArgs),

    /// Delete a saved extraction
    Delete(saved::DeleteArgs),
}

/// Resolved configuration shared by command handlers.
pub struct Session {
    pub config: Config,
}

impl Session {
    pub fn user_id(&self) -> &str {
        &self.config.storage.user_id
    }

    /// Open (and migrate) the configured database.
    pub fn open_db(&self) -> Result<DbPool> {
        let path = &self.config.storage.db_path;
        tokenscope_db::init_pool(path)
            .with_context(|| format!("Failed to open database at {}", path.display()))
    }
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        let overrides = CliOverrides {
            db_path: self.db.clone(),
            user_id: self.user.clone(),
            heuristic_only: matches!(&self.command, Commands::Extract(args) if args.heuristic),
        };
        let config = Config::load(self.config.as_deref(), &overrides)?;
        let session = Session { config };

        match self.command {
            Commands::Extract(args) => extract::execute(args, &session).await,
            Commands::Score(args) => saved::cmd_score(args, &session),
            Commands::List(args) => saved::cmd_list(args, &session),
            Commands::Show(args) => saved::cmd_show(args, &session),
            Commands::Compare(args) => compare::execute(args, &session),
            Commands::Delete(args) => saved::cmd_delete(args, &session),
        }
    }
}

/// Print `value` as pretty JSON on stdout.
pub fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

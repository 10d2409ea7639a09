//! Tokenscope CLI - design-token extraction and consistency scoring.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod output;

use commands::Cli;

/// Initialize tracing on stderr, plus a plain-text file layer when
/// `log_file` is given. The returned guard must live until exit so the
/// file writer flushes.
fn init_tracing(log_file: Option<&Path>, verbose: bool) -> Result<Option<WorkerGuard>> {
    let default_filter = if verbose {
        "tokenscope=debug,tokenscope_core=debug,tokenscope_db=debug"
    } else {
        "tokenscope=info,tokenscope_core=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    match log_file {
        Some(path) => {
            let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
            let file_name = path
                .file_name()
                .context("--log-file must name a file")?;

            let appender = tracing_appender::rolling::never(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);

            tracing_subscriber::registry()
                .with(env_filter)
                .with(stderr_layer)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(writer)
                        .with_ansi(false),
                )
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(stderr_layer)
                .init();
            Ok(None)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _guard = init_tracing(cli.log_file.as_deref(), cli.verbose)?;

    cli.execute().await
}

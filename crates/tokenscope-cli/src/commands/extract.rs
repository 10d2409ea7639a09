//! `tokenscope extract`.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::io::Read;
use std::path::PathBuf;
use tokenscope_core::consistency::select_scorer;
use tokenscope_core::crawl::{truncate_at_char_boundary, Crawler};
use tokenscope_core::naming::select_namer;
use tokenscope_core::{extract_tokens, store, ScopeError};

use super::{print_json, Session};
use crate::output;

#[derive(Args)]
pub struct ExtractArgs {
    /// Page URL (also recorded as the source for --css-file/--stdin)
    pub url: String,

    /// Read CSS from a file instead of crawling
    #[arg(long, conflicts_with = "stdin")]
    pub css_file: Option<PathBuf>,

    /// Read CSS from standard input instead of crawling
    #[arg(long)]
    pub stdin: bool,

    /// Skip Claude even when an API key is configured
    #[arg(long)]
    pub heuristic: bool,

    /// Do not save the result
    #[arg(long)]
    pub no_save: bool,

    /// Print JSON instead of a summary
    #[arg(long)]
    pub json: bool,
}

pub async fn execute(args: ExtractArgs, session: &Session) -> Result<()> {
    let config = &session.config;
    let css_text = load_css(&args, session).await?;
    tracing::debug!(bytes = css_text.len(), url = %args.url, "CSS loaded");

    let namer = select_namer(config);
    let scorer = select_scorer(config);
    if !args.json {
        println!(
            "{} Naming with {}, scoring with {}",
            "→".dimmed(),
            namer.label(),
            scorer.label()
        );
    }

    let extraction = match extract_tokens(&css_text, &args.url, namer.as_ref(), scorer.as_ref()).await {
        Ok(extraction) => extraction,
        Err(ScopeError::EmptyCss(url)) => {
            anyhow::bail!("No colors or typography found in the CSS for {}", url)
        }
        Err(e) => return Err(e.into()),
    };

    let saved = if args.no_save {
        None
    } else {
        let pool = session.open_db()?;
        Some(store::save_extraction(
            &pool,
            session.user_id(),
            &extraction.extraction,
            &extraction.report,
        )?)
    };

    if args.json {
        return match &saved {
            Some(saved) => print_json(saved),
            None => print_json(&extraction),
        };
    }

    println!();
    output::print_extraction_summary(&extraction.extraction, &extraction.report);
    println!();
    match saved {
        Some(saved) => println!("{} Saved extraction (id: {})", "✓".green().bold(), saved.id),
        None => println!("{}", "(not saved)".dimmed()),
    }
    Ok(())
}

async fn load_css(args: &ExtractArgs, session: &Session) -> Result<String> {
    let max_bytes = session.config.crawl.max_css_bytes;

    if let Some(path) = &args.css_file {
        let mut css = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        truncate_at_char_boundary(&mut css, max_bytes);
        return Ok(css);
    }

    if args.stdin {
        let mut css = String::new();
        std::io::stdin()
            .read_to_string(&mut css)
            .context("Failed to read CSS from stdin")?;
        truncate_at_char_boundary(&mut css, max_bytes);
        return Ok(css);
    }

    if !args.json {
        println!("{} Crawling {}", "→".dimmed(), args.url);
    }
    let crawler = Crawler::new(&session.config.crawl)?;
    let output = crawler.fetch_css(&args.url).await?;
    if !args.json {
        println!(
            "{} Collected {} KB of CSS ({} linked stylesheet(s))",
            "✓".green().bold(),
            output.css_text.len() / 1024,
            output.stylesheets
        );
    }
    Ok(output.css_text)
}

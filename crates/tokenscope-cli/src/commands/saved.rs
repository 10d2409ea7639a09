//! Commands over saved extractions: `score`, `list`, `show`, `delete`.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use tokenscope_core::store;

use super::{print_json, Session};
use crate::output;

#[derive(Args)]
pub struct IdArgs {
    /// Extraction id
    pub id: String,

    /// Print JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct ListArgs {
    /// Print JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct DeleteArgs {
    /// Extraction id
    pub id: String,
}

pub fn cmd_score(args: IdArgs, session: &Session) -> Result<()> {
    let pool = session.open_db()?;
    let saved = store::get_extraction(&pool, session.user_id(), &args.id)?;

    if args.json {
        return print_json(&saved.report);
    }
    println!("{} {}", saved.url.cyan().bold(), format!("({})", saved.id).dimmed());
    println!();
    output::print_report(&saved.report);
    Ok(())
}

pub fn cmd_list(args: ListArgs, session: &Session) -> Result<()> {
    let pool = session.open_db()?;
    let saved = store::list_extractions(&pool, session.user_id())?;

    if args.json {
        return print_json(&saved);
    }
    output::print_extractions_table(&saved);
    Ok(())
}

pub fn cmd_show(args: IdArgs, session: &Session) -> Result<()> {
    let pool = session.open_db()?;
    let saved = store::get_extraction(&pool, session.user_id(), &args.id)?;

    if args.json {
        return print_json(&saved);
    }
    output::print_tokens(&saved);
    Ok(())
}

pub fn cmd_delete(args: DeleteArgs, session: &Session) -> Result<()> {
    let pool = session.open_db()?;
    store::delete_extraction(&pool, session.user_id(), &args.id)?;
    println!("{} Deleted extraction {}", "✓".green().bold(), args.id);
    Ok(())
}

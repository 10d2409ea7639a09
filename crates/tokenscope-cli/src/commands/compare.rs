//! `tokenscope compare`.

use anyhow::Result;
use clap::Args;
use tokenscope_core::store;

use super::{print_json, Session};
use crate::output;

#[derive(Args)]
pub struct CompareArgs {
    /// Baseline extraction id
    pub id_a: String,

    /// Candidate extraction id
    pub id_b: String,

    /// Also list unchanged tokens
    #[arg(long)]
    pub all: bool,

    /// Print JSON
    #[arg(long)]
    pub json: bool,
}

pub fn execute(args: CompareArgs, session: &Session) -> Result<()> {
    let pool = session.open_db()?;
    let (a, b, comparison) = store::compare_saved(&pool, session.user_id(), &args.id_a, &args.id_b)?;

    if args.json {
        return print_json(&comparison);
    }
    output::print_comparison(&a, &b, &comparison, args.all);
    Ok(())
}

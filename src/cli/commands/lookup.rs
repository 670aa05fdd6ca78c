//! Lookup command - read a move for a board from a saved table

use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::Parser;

use crate::{
    cli::{
        commands::load_table,
        output::{print_kv, print_section},
    },
    tictactoe::Board,
};

#[derive(Parser, Debug)]
#[command(about = "Look up the table move for a board")]
pub struct LookupArgs {
    /// Saved strategy table
    pub table: PathBuf,

    /// Board as nine cells of X, O and '.', rows optionally separated by '/'
    pub board: String,

    /// Table file format (json, msgpack, csv); inferred from the extension
    #[arg(long)]
    pub format: Option<String>,
}

pub fn execute(args: LookupArgs) -> Result<()> {
    let table = load_table(&args.table, args.format.as_deref())?;
    let board = Board::from_string(&args.board)?;
    let key = board.canonical_key();

    print_section("Table lookup");
    println!("{board}");
    print_kv("Fingerprint", &key.own.to_string());
    print_kv("Canonical key", &key.min.to_string());
    print_kv("Symmetry", &key.symmetry.code().to_string());

    let found = table
        .lookup(&board)
        .ok_or_else(|| anyhow!("no entry for canonical key {}", key.min))?;
    let next = board.make_move(found.mv)?;
    print_kv("Move", &found.mv.to_string());
    print_kv("Outcome code", &found.outcome.to_string());
    println!("\n{next}");
    Ok(())
}

//! Solve command - exact minimum strategy table via SAT

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::{
    adapters::VarisatBackend,
    cli::{
        commands::{save_table, scored_graph},
        config::ConfigArgs,
        output::{
            create_spinner, format_number, print_compact_table, print_kv, print_section,
            print_subsection, print_table, print_verify_report,
        },
    },
    cover::{CoverSolver, Traversal},
};

#[derive(Parser, Debug)]
#[command(about = "Find the smallest strategy table")]
pub struct SolveArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Constraint traversal: skip or exhaustive
    #[arg(long, short = 't')]
    pub traversal: Option<String>,

    /// Save the table to this file
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Table file format (json, msgpack, csv); inferred from the extension
    #[arg(long)]
    pub format: Option<String>,

    /// Print the table as one `{key,move,outcome}` list
    #[arg(long)]
    pub compact: bool,
}

pub fn execute(args: SolveArgs) -> Result<()> {
    let mut config = args.config.resolve()?;
    if let Some(traversal) = &args.traversal {
        config = config.with_traversal(traversal.parse::<Traversal>()?);
    }
    let query = config.cover_query()?;

    let graph = scored_graph(config.mode)?;
    let mut solver = CoverSolver::new(&graph, VarisatBackend::new())?;

    let spinner = create_spinner(&format!("Searching {} cover...", query.sides));
    let solution = solver.solve(&query)?;
    spinner.finish_and_clear();

    print_section(&format!("Minimum {} table", query.sides));
    print_kv("Traversal", &query.traversal.to_string());
    print_kv(
        "Opening",
        &query.opening.map_or("any".to_string(), |cell| cell.to_string()),
    );
    print_kv("Variables", &format_number(solution.variables as u64));
    print_kv("Clauses", &format_number(solution.clauses as u64));
    print_kv("Counted", &format_number(solution.counted as u64));
    print_kv("Minimum positions", &solution.bound.to_string());
    print_kv("Table entries", &solution.table.len().to_string());

    print_subsection("Attempts");
    for attempt in &solution.attempts {
        let verdict = if attempt.feasible { "feasible" } else { "infeasible" };
        println!("  {:>6}  {verdict}", attempt.bound);
    }

    print_subsection("Verification");
    let report = solution.table.verify(&graph, query.sides, query.opening)?;
    print_verify_report(&report);

    print_subsection("Table");
    if args.compact {
        print_compact_table(&solution.table);
    } else {
        print_table(&solution.table);
    }

    if let Some(path) = &args.output {
        save_table(&solution.table, path, args.format.as_deref())?;
    }
    Ok(())
}

//! Build command - graph sizes and scoring summary per reduction mode

use anyhow::Result;
use clap::Parser;

use crate::{
    cli::{
        commands::scored_graph,
        output::{format_number, print_kv, print_section},
    },
    tictactoe::ReductionMode,
};

#[derive(Parser, Debug)]
#[command(about = "Build the state graph and score it")]
pub struct BuildArgs {
    /// Reduction mode (full, fingerprint, canonical); all three when omitted
    #[arg(long, short = 'm')]
    pub mode: Option<String>,
}

pub fn execute(args: BuildArgs) -> Result<()> {
    let modes = match &args.mode {
        Some(name) => vec![name.parse::<ReductionMode>()?],
        None => ReductionMode::ALL.to_vec(),
    };

    for mode in modes {
        let graph = scored_graph(mode)?;
        let size = graph.tree_size();
        let root = graph.position(graph.root());

        print_section(&format!("{mode} graph"));
        print_kv("Positions", &format_number(graph.len() as u64));
        print_kv("Examined", &format_number(graph.examined() as u64));
        print_kv("Tree nodes", &format_number(size.nodes));
        print_kv("Leaves", &format_number(size.leaves));
        print_kv(
            "Root value",
            &root.value.map_or("unscored".to_string(), |v| v.to_string()),
        );
        print_kv("X wins", &format_number(root.leaves.x_wins));
        print_kv("O wins", &format_number(root.leaves.o_wins));
        print_kv("Draws", &format_number(root.leaves.draws));
        print_kv("Best openings", &format!("{:?}", root.best_moves));
    }
    Ok(())
}

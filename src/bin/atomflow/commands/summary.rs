use std::fs::File;
use std::io::BufReader;

use anyhow::{Context, Result};

use atomflow::flatten::count_by_transition;
use atomflow::io::read_gml;

use crate::cli::SummaryArgs;

pub fn run_summary(args: SummaryArgs) -> Result<()> {
    let file = File::open(&args.network)
        .with_context(|| format!("failed to open '{}'", args.network.display()))?;
    let graph = read_gml(BufReader::new(file))
        .with_context(|| format!("failed to read '{}'", args.network.display()))?;

    println!("nodes\t{}", graph.node_count());
    println!("edges\t{}", graph.edge_count());
    for (transition, count) in count_by_transition(&graph) {
        if count > 0 {
            println!("{transition}\t{count}");
        }
    }
    Ok(())
}

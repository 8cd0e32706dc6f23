use std::fs::File;
use std::io::{BufReader, BufWriter};

use anyhow::{Context, Result};
use tracing::info;

use atomflow::io::{compound_key_path, write_compound_key, write_gml};
use atomflow::{build, flatten, BuildConfig, InconsistencyPolicy, PoolSet, SymmetryMode};

use crate::cli::{BuildArgs, BuildOverrides, Inconsistency, Symmetry};

pub fn run_build(args: BuildArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => BuildConfig::load(path)?,
        None => BuildConfig::default(),
    };
    apply_overrides(&mut config, &args.overrides);

    let pools = match &args.pools {
        Some(path) => PoolSet::load(path)
            .with_context(|| format!("failed to read pool list '{}'", path.display()))?,
        None => PoolSet::new(),
    };
    info!(pools = pools.len(), "configuration ready");

    let input = File::open(&args.input)
        .with_context(|| format!("failed to open '{}'", args.input.display()))?;
    let built = build(BufReader::new(input), &config, &pools).context("network build failed")?;

    let flat = flatten(&built.network, config.filter_bonds);

    let output = File::create(&args.output)
        .with_context(|| format!("failed to create '{}'", args.output.display()))?;
    write_gml(&flat, BufWriter::new(output))
        .with_context(|| format!("failed to write '{}'", args.output.display()))?;

    let key_path = compound_key_path(&args.output);
    let key = File::create(&key_path)
        .with_context(|| format!("failed to create '{}'", key_path.display()))?;
    write_compound_key(&built.registry, BufWriter::new(key))
        .with_context(|| format!("failed to write '{}'", key_path.display()))?;

    info!(
        nodes = flat.node_count(),
        edges = flat.edge_count(),
        output = %args.output.display(),
        "network written"
    );
    println!("{}", built.report);
    Ok(())
}

fn apply_overrides(config: &mut BuildConfig, overrides: &BuildOverrides) {
    if overrides.map_hydrogens {
        config.map_hydrogens = true;
    }
    if overrides.keep_bonds {
        config.filter_bonds = false;
    }
    if let Some(symmetry) = overrides.symmetry {
        config.symmetry = symmetry.into();
    }
    if let Some(policy) = overrides.on_inconsistency {
        config.on_inconsistency = policy.into();
    }
    if let Some(limit) = overrides.step_limit {
        config.search_step_limit = limit;
    }
}

impl From<Symmetry> for SymmetryMode {
    fn from(value: Symmetry) -> Self {
        match value {
            Symmetry::Orbit => SymmetryMode::Orbit,
            Symmetry::Full => SymmetryMode::Full,
        }
    }
}

impl From<Inconsistency> for InconsistencyPolicy {
    fn from(value: Inconsistency) -> Self {
        match value {
            Inconsistency::LinkSubset => InconsistencyPolicy::LinkSubset,
            Inconsistency::SkipReaction => InconsistencyPolicy::SkipReaction,
            Inconsistency::Abort => InconsistencyPolicy::Abort,
        }
    }
}

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(
    name = "atomflow",
    about = "Atom transition networks from atom-mapped reactions",
    version,
    propagate_version = true
)]
pub struct Cli {
    /// More log output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Build a network from a reaction triplet file
    #[command(visible_alias = "b")]
    Build(BuildArgs),

    /// Print node and edge counts of a network file
    #[command(visible_alias = "s")]
    Summary(SummaryArgs),
}

#[derive(Args)]
pub struct BuildArgs {
    /// Reaction triplet file
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// Network file to write; the compound key goes to <FILE>.ckey
    #[arg(short, long, value_name = "FILE")]
    pub output: PathBuf,

    /// High-concentration compound names, one per line
    #[arg(short, long, value_name = "FILE")]
    pub pools: Option<PathBuf>,

    /// Build configuration (TOML)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: BuildOverrides,
}

/// Options that take precedence over the configuration file.
#[derive(Args)]
#[command(next_help_heading = "Build Options")]
pub struct BuildOverrides {
    /// Add explicit hydrogens and map them across reactions
    #[arg(long)]
    pub map_hydrogens: bool,

    /// Keep chemical bond edges in the written network
    #[arg(long)]
    pub keep_bonds: bool,

    /// Symmetry edges per automorphism orbit
    #[arg(long, value_name = "MODE")]
    pub symmetry: Option<Symmetry>,

    /// What to do when a known compound does not match its structure
    #[arg(long, value_name = "POLICY")]
    pub on_inconsistency: Option<Inconsistency>,

    /// Step budget of each structure search
    #[arg(long, value_name = "N")]
    pub step_limit: Option<u64>,
}

#[derive(Args)]
pub struct SummaryArgs {
    /// Network file written by `atomflow build`
    #[arg(value_name = "FILE")]
    pub network: PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Symmetry {
    /// Star from the lowest atom of each orbit
    Orbit,
    /// Every pair of atoms related by an automorphism
    Full,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Inconsistency {
    LinkSubset,
    SkipReaction,
    Abort,
}

pub fn parse() -> Cli {
    Cli::parse()
}

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Iaso health-economics cohort simulator.
#[derive(Parser)]
#[command(
    name = "iaso",
    version,
    about = "Markov cohort simulation for cost-effectiveness analysis"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Run a cohort simulation from a model definition.
    Simulate(SimulateArgs),
    /// Parse and validate a model definition without running it.
    Validate(ValidateArgs),
}

/// Arguments for the `simulate` subcommand.
#[derive(clap::Args)]
pub struct SimulateArgs {
    /// Path to the TOML model definition.
    #[arg(short, long, default_value = "model.toml")]
    pub config: PathBuf,

    /// Path for the JSON results file; stdout if omitted.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Override the definition's RNG seed.
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Credible-interval mass for the outcome summary.
    #[arg(long, default_value_t = 0.95)]
    pub interval: f64,
}

/// Arguments for the `validate` subcommand.
#[derive(clap::Args)]
pub struct ValidateArgs {
    /// Path to the TOML model definition.
    #[arg(short, long, default_value = "model.toml")]
    pub config: PathBuf,
}

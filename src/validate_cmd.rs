//! The `validate` subcommand: parse and cross-check a definition.

use anyhow::{Context, Result};

use iaso_model::ModelDefinition;

use crate::cli::ValidateArgs;

pub fn run(args: ValidateArgs) -> Result<()> {
    let definition = ModelDefinition::from_path(&args.config)
        .with_context(|| format!("loading model from {}", args.config.display()))?;
    definition
        .validate()
        .with_context(|| format!("validating model '{}'", definition.name))?;

    println!("model '{}' is valid", definition.name);
    println!("  states:     {}", definition.states.len());
    println!("  strategies: {}", definition.strategies.len());
    println!("  groups:     {}", definition.groups.len());
    println!("  samples:    {}", definition.simulation.n_samples);
    println!(
        "  cycles:     {} x {} time units",
        definition.simulation.n_cycles, definition.simulation.cycle_length
    );
    Ok(())
}

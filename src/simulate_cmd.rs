//! The `simulate` subcommand: load, run, summarize, write.

use std::fs;
use std::time::Instant;

use anyhow::{Context, Result};
use serde_json::json;
use tracing::{info, info_span};

use iaso_model::{ModelDefinition, summarize};

use crate::cli::SimulateArgs;

pub fn run(args: SimulateArgs) -> Result<()> {
    let span = info_span!("simulate", config = %args.config.display());
    let _guard = span.enter();

    let definition = ModelDefinition::from_path(&args.config)
        .with_context(|| format!("loading model from {}", args.config.display()))?;
    info!(model = %definition.name, "model definition loaded");

    let started = Instant::now();
    let results = iaso_model::run(&definition, args.seed)
        .with_context(|| format!("simulating model '{}'", definition.name))?;
    info!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        n_outcome_rows = results.outcomes.len(),
        "simulation complete"
    );

    let summary = summarize(&results, args.interval);
    let output = json!({
        "model": definition.name,
        "results": results,
        "summary": summary,
    });
    let text = serde_json::to_string_pretty(&output)?;

    match &args.output {
        Some(path) => {
            fs::write(path, text)
                .with_context(|| format!("writing results to {}", path.display()))?;
            info!(path = %path.display(), "results written");
        }
        None => println!("{text}"),
    }
    Ok(())
}

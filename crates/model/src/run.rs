//! The simulation fan-out over the (sample x strategy x group) index space.

use rand::SeedableRng;
use rayon::prelude::*;
use tracing::{debug, info};

use iaso_cohort::{MatrixSchedule, OccupancyTrajectory, propagate};
use iaso_outcomes::{Quadrature, ValueSchedule, integrate};
use iaso_params::{ParameterSet, TimeSchedule};
use iaso_tpmatrix::{MatrixTemplate, build};

use crate::definition::ModelDefinition;
use crate::error::ModelError;
use crate::results::{OutcomeRow, SimulationResults, StateProbRow};

/// Builds a seeded or OS-sourced RNG.
fn make_rng(seed: Option<u64>) -> rand::rngs::StdRng {
    match seed {
        Some(s) => rand::rngs::StdRng::seed_from_u64(s),
        None => rand::rngs::StdRng::from_os_rng(),
    }
}

/// One combination of the job index space.
#[derive(Debug, Clone, Copy)]
struct Job {
    strategy: usize,
    group: usize,
    sample: usize,
}

/// Read-only inputs shared by every job.
struct JobContext<'a> {
    definition: &'a ModelDefinition,
    schedule: TimeSchedule,
    params: ParameterSet,
    templates: Vec<MatrixTemplate>,
    initial: Vec<f64>,
    quadrature: Quadrature,
    utility: ValueSchedule,
    costs: Vec<(String, ValueSchedule)>,
}

/// What one job produces, later flattened into result rows.
struct JobOutput {
    job: Job,
    trajectory: OccupancyTrajectory,
    // One value per category: qalys first, then costs in declaration order.
    outcomes: Vec<f64>,
}

/// Runs a full simulation: draw parameters, then propagate and integrate
/// every (sample, strategy, group) combination.
///
/// The combinations are independent and share only read-only access to the
/// parameter store and schedules, so they are mapped over a `rayon` worker
/// pool; results are collected by index, not arrival order. `seed_override`
/// takes precedence over the definition's seed.
///
/// # Errors
///
/// Returns the first error any stage produced: definition validation,
/// parameter draws, matrix construction, propagation, or integration.
#[tracing::instrument(skip(definition, seed_override), fields(model = %definition.name))]
pub fn run(
    definition: &ModelDefinition,
    seed_override: Option<u64>,
) -> Result<SimulationResults, ModelError> {
    definition.validate()?;

    let schedule = definition.schedule()?;
    let mut rng = make_rng(seed_override.or(definition.simulation.seed));
    let params = definition.draw_parameter_set(&mut rng)?;

    let templates: Vec<MatrixTemplate> = definition
        .strategies
        .iter()
        .map(|s| definition.template_for(s))
        .collect::<Result<_, _>>()?;

    let initial = definition.initial_distribution();
    let quadrature: Quadrature = definition.outcomes.quadrature.into();
    let utility = definition.value_schedule(&definition.outcomes.utility, "utility")?;
    let costs: Vec<(String, ValueSchedule)> = definition
        .outcomes
        .costs
        .iter()
        .map(|c| Ok((c.name.clone(), definition.value_schedule(&c.value, &c.name)?)))
        .collect::<Result<_, ModelError>>()?;

    let context = JobContext {
        definition,
        schedule,
        params,
        templates,
        initial,
        quadrature,
        utility,
        costs,
    };
    let jobs: Vec<Job> = (0..definition.strategies.len())
        .flat_map(|strategy| {
            (0..definition.groups.len()).flat_map(move |group| {
                (0..definition.simulation.n_samples).map(move |sample| Job {
                    strategy,
                    group,
                    sample,
                })
            })
        })
        .collect();
    info!(
        n_jobs = jobs.len(),
        n_samples = definition.simulation.n_samples,
        n_strategies = definition.strategies.len(),
        n_groups = definition.groups.len(),
        "running cohort simulation"
    );

    let outputs: Vec<JobOutput> = jobs
        .par_iter()
        .map(|&job| simulate_job(&context, job))
        .collect::<Result<_, _>>()?;

    Ok(assemble(definition, &outputs))
}

/// Propagates and integrates one (sample, strategy, group) combination.
fn simulate_job(context: &JobContext<'_>, job: Job) -> Result<JobOutput, ModelError> {
    let definition = context.definition;
    let cycle_length = definition.simulation.cycle_length;

    // One concrete matrix per time interval, evaluated at its start.
    let matrices = context
        .schedule
        .starts()
        .iter()
        .map(|&start| {
            build(
                &context.templates[job.strategy],
                &context.params,
                job.sample,
                job.group,
                start,
            )
        })
        .collect::<Result<Vec<_>, _>>()?;
    let matrix_schedule = MatrixSchedule::new(context.schedule.clone(), matrices, cycle_length)?;

    let trajectory = propagate(&context.initial, &matrix_schedule, definition.simulation.n_cycles)?;
    debug!(
        sample = job.sample,
        strategy = job.strategy,
        group = job.group,
        "propagated trajectory"
    );

    // The same immutable trajectory serves every category.
    let mut outcomes = Vec::with_capacity(1 + context.costs.len());
    outcomes.push(integrate(
        &trajectory,
        &context.utility,
        definition.outcomes.discount_rate_qalys,
        context.quadrature,
        cycle_length,
    )?);
    for (_, cost_schedule) in &context.costs {
        outcomes.push(integrate(
            &trajectory,
            cost_schedule,
            definition.outcomes.discount_rate_costs,
            context.quadrature,
            cycle_length,
        )?);
    }

    Ok(JobOutput {
        job,
        trajectory,
        outcomes,
    })
}

/// Flattens job outputs into the long-form result tables, in job-index
/// order.
fn assemble(definition: &ModelDefinition, outputs: &[JobOutput]) -> SimulationResults {
    let cycle_length = definition.simulation.cycle_length;
    let mut categories = vec!["qalys".to_string()];
    categories.extend(definition.outcomes.costs.iter().map(|c| c.name.clone()));

    let mut stateprobs = Vec::new();
    let mut outcomes = Vec::new();
    for output in outputs {
        let strategy = &definition.strategies[output.job.strategy].name;
        let group = &definition.groups[output.job.group].name;

        for (cycle, dist) in output.trajectory.iter().enumerate() {
            for (state_idx, &prob) in dist.iter().enumerate() {
                stateprobs.push(StateProbRow {
                    strategy: strategy.clone(),
                    group: group.clone(),
                    sample: output.job.sample,
                    state: definition.states[state_idx].name.clone(),
                    cycle,
                    time: cycle as f64 * cycle_length,
                    prob,
                });
            }
        }
        for (category, &value) in categories.iter().zip(&output.outcomes) {
            outcomes.push(OutcomeRow {
                strategy: strategy.clone(),
                group: group.clone(),
                sample: output.job.sample,
                category: category.clone(),
                value,
            });
        }
    }
    SimulationResults {
        stateprobs,
        outcomes,
    }
}

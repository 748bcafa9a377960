use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use stepflow::prelude::*;

/// A CLI tool to generate random flow snapshots for the stepflow simulator
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to write the generated snapshot to (`.json` for JSON, binary otherwise)
    #[arg(short, long, default_value = "generated_flow.json")]
    output: String,

    /// The number of steps to generate
    #[arg(long, default_value_t = 12)]
    steps: usize,

    /// The maximum number of sub-steps per step
    #[arg(long, default_value_t = 4)]
    max_sub_steps: usize,

    /// Probability that a sub-step outcome jumps with `goto` instead of `next`
    #[arg(long, default_value_t = 0.2)]
    goto_ratio: f64,

    /// Seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if !(0.0..=1.0).contains(&cli.goto_ratio) {
        eprintln!(
            "Error: --goto-ratio ({}) must be between 0 and 1",
            cli.goto_ratio
        );
        std::process::exit(1);
    }

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    println!(
        "Generating a flow with {} step(s), up to {} sub-step(s) each...",
        cli.steps, cli.max_sub_steps
    );

    let flow = generate_flow(&mut rng, &cli);
    flow.export_snapshot().save(&cli.output)?;

    println!(
        "Successfully generated and saved flow to '{}'",
        cli.output
    );
    Ok(())
}

/// Builds the flow through the editing API so generated ids match real editor output.
fn generate_flow<R: Rng>(rng: &mut R, cli: &Cli) -> FlowGraphSession {
    let mut flow = FlowGraphSession::new();
    if cli.steps == 0 {
        return flow;
    }

    let step_ids: Vec<StepId> = (0..cli.steps)
        .filter_map(|i| {
            let kind = if i + 1 == cli.steps {
                StepKind::Success
            } else {
                random_kind(rng)
            };
            flow.add_step(&format!("Step {}", i + 1), kind)
        })
        .collect();

    for (i, step_id) in step_ids.iter().enumerate() {
        // Terminal steps have no sub-steps.
        if flow
            .step(step_id.as_str())
            .is_some_and(|s| matches!(s.kind, StepKind::Success | StepKind::Failure))
        {
            continue;
        }

        let count = rng.random_range(1..=cli.max_sub_steps.max(1));
        for n in 0..count {
            let Some(sub_step_id) = flow.add_sub_step(step_id.as_str()) else {
                continue;
            };
            flow.update_sub_step_content(
                step_id.as_str(),
                sub_step_id.as_str(),
                &format!("Check {}.{}", i + 1, n + 1),
            );

            let mut patch = SubStepPatch::new();
            if rng.random_bool(cli.goto_ratio) {
                let target = &step_ids[rng.random_range(0..step_ids.len())];
                patch = patch
                    .success_action(SubStepAction::Goto)
                    .success_target(target.clone());
            }
            if rng.random_bool(cli.goto_ratio) {
                let target = &step_ids[rng.random_range(0..step_ids.len())];
                patch = patch
                    .failure_action(SubStepAction::Goto)
                    .failure_target(target.clone());
            }
            if !patch.is_empty() {
                flow.update_sub_step_config(step_id.as_str(), sub_step_id.as_str(), patch);
            }
        }

        // Forward links keep most generated flows finite; the occasional back link adds a cycle.
        if let Some(next) = step_ids.get(i + 1) {
            flow.connect_success(step_id.as_str(), next.as_str());
        }
        let failure_target = &step_ids[rng.random_range(0..step_ids.len())];
        flow.connect_failure(step_id.as_str(), failure_target.as_str());
    }

    println!("-> Generated {} step(s).", flow.len());
    flow
}

fn random_kind<R: Rng>(rng: &mut R) -> StepKind {
    match rng.random_range(0..10) {
        0 => StepKind::Success,
        1 => StepKind::Failure,
        2..=4 => StepKind::Decision,
        _ => StepKind::Normal,
    }
}

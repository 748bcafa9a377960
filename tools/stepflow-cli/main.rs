use clap::Parser;
use stepflow::prelude::*;
use std::io::{self, Write};
use std::time::Instant;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Load a flow snapshot and walk it one decision at a time
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the flow snapshot (`.json`, or the binary format for any other extension)
    flow_path: String,

    /// Comma-separated outcomes to replay, e.g. `s,f,success,failure`
    #[arg(short, long, value_delimiter = ',')]
    decisions: Vec<String>,

    /// Stop after this many decisions (useful for cyclic flows)
    #[arg(short, long)]
    max_decisions: Option<usize>,

    /// Start at this step id instead of the first step
    #[arg(short, long)]
    start: Option<String>,

    /// Run in interactive mode to be prompted for each decision
    #[arg(short = 'i', long, help = "Run in interactive 'human' mode")]
    human: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let load_start = Instant::now();
    let snapshot = FlowSnapshot::from_file(&cli.flow_path).unwrap_or_else(|e| {
        exit_with_error(&format!(
            "Failed to load flow from '{}': {}",
            &cli.flow_path, e
        ))
    });
    let load_duration = load_start.elapsed();
    println!(
        "Loaded {} step(s) (format {}) in {:?}",
        snapshot.steps.len(),
        snapshot.version,
        load_duration
    );

    let mut builder = SimulationSession::builder(snapshot.steps);
    if let Some(start) = cli.start.as_deref() {
        builder = builder.start_at(start);
    }
    if let Some(limit) = cli.max_decisions {
        builder = builder.with_decision_limit(limit);
    }
    let mut simulation = builder
        .build()
        .unwrap_or_else(|e| exit_with_error(&format!("Could not start simulation: {}", e)));

    if cli.human {
        run_interactive(&mut simulation);
    } else {
        run_scripted(&mut simulation, &cli.decisions);
    }

    print_summary(&simulation);
}

/// Replays the outcomes given on the command line.
fn run_scripted(simulation: &mut SimulationSession, decisions: &[String]) {
    let outcomes: Vec<Outcome> = decisions
        .iter()
        .map(|raw| {
            parse_outcome(raw)
                .unwrap_or_else(|| exit_with_error(&format!("Unknown outcome '{}'", raw)))
        })
        .collect();

    match simulation.replay(outcomes) {
        Ok(accepted) => println!("Replayed {} decision(s).", accepted),
        Err(e) => eprintln!("Replay stopped: {}", e),
    }
}

/// Prompts for an outcome at every decision until the flow completes.
fn run_interactive(simulation: &mut SimulationSession) {
    println!("--- Stepflow Interactive Mode ---");
    println!("Answer each prompt with s(uccess), f(ailure), u(ndo), r(eset) or q(uit).");

    while !simulation.is_complete() {
        println!("\n{}", HistoryFormatter::format_cursor(simulation));
        let answer = prompt_for_input("Outcome", None);
        let result = match answer.trim() {
            "" | "q" | "quit" => break,
            "u" | "undo" => {
                if !simulation.undo() {
                    println!("Nothing to undo.");
                }
                continue;
            }
            "r" | "reset" => {
                simulation.reset();
                continue;
            }
            other => match parse_outcome(other) {
                Some(outcome) => simulation.submit_outcome(outcome),
                None => {
                    println!("Invalid choice. Please enter s, f, u, r or q.");
                    continue;
                }
            },
        };
        match result {
            Ok(transition) => println!("  -> {:?}", transition),
            Err(e) => {
                println!("  -> {}", e);
                break;
            }
        }
    }
}

fn print_summary(simulation: &SimulationSession) {
    println!("\n--- History ---");
    let history = HistoryFormatter::format_history(simulation);
    if history.is_empty() {
        println!("(no decisions)");
    } else {
        println!("{}", history);
    }
    println!("\n--- Summary ---");
    println!("Decisions:   {}", simulation.decision_count());
    println!("Position:    {}", HistoryFormatter::format_cursor(simulation));
    println!("Complete:    {}", simulation.is_complete());
}

fn parse_outcome(raw: &str) -> Option<Outcome> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "s" | "success" | "y" | "yes" => Some(Outcome::Success),
        "f" | "failure" | "n" | "no" => Some(Outcome::Failure),
        _ => None,
    }
}

fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        EnvFilter::new("stepflow=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("stepflow=warn"))
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .init();
}

/// A helper function to prompt the user and read a line of input.
fn prompt_for_input(prompt_text: &str, default: Option<&str>) -> String {
    let mut line = String::new();
    let default_prompt = default.map_or("".to_string(), |d| format!(" [default: {}]", d));

    print!("> {}{}: ", prompt_text, default_prompt);
    let _ = io::stdout().flush();

    if io::stdin().read_line(&mut line).is_err() {
        exit_with_error("Failed to read from stdin");
    }
    let trimmed = line.trim().to_string();

    if trimmed.is_empty() {
        default.unwrap_or("").to_string()
    } else {
        trimmed
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}

//! GFD validation CLI.
//!
//! Provides the `gfd` binary with two subcommands:
//! - `validate` checks GFD files against a data graph file and reports the
//!   satisfied ones;
//! - `bench` generates a seeded synthetic workload and times every strategy
//!   on it, failing if they disagree.
//!
//! The strategy and thread count default to `GFD_STRATEGY` / `GFD_THREADS`
//! and can be overridden with flags.

use std::path::PathBuf;
use std::process;
use std::time::Instant;

use clap::{Parser, Subcommand};
use serde_json::json;

use gfd_check::synthetic::{generate_workload, WorkloadConfig};
use gfd_check::{validate_report, Strategy, ValidationError, ValidatorConfig};
use gfd_core::{read_gfd_file, read_graph_file, CoreError};

/// Graph functional dependency validator.
#[derive(Parser)]
#[command(name = "gfd", about = "Graph functional dependency validator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Validate GFDs against a data graph.
    Validate {
        /// Data graph in DOT format.
        #[arg(short, long)]
        graph: PathBuf,

        /// GFD files (premises line, conclusion line, DOT pattern).
        #[arg(long = "gfd", required = true, num_args = 1..)]
        gfds: Vec<PathBuf>,

        /// naive, distributed or index (default: $GFD_STRATEGY or index).
        #[arg(short, long)]
        strategy: Option<Strategy>,

        /// Worker threads (default: $GFD_THREADS or available parallelism).
        #[arg(short, long)]
        threads: Option<usize>,

        /// Print the full report as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Time every strategy on a synthetic workload.
    Bench {
        /// Data graph size.
        #[arg(long, default_value_t = 200)]
        vertices: usize,

        /// Number of generated GFDs.
        #[arg(long, default_value_t = 20)]
        gfds: usize,

        /// Workload seed.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Worker threads for the distributed strategy.
        #[arg(short, long)]
        threads: Option<usize>,
    },
}

fn main() {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let exit_code = match cli.command {
        Commands::Validate {
            graph,
            gfds,
            strategy,
            threads,
            json,
        } => run_validate(graph, gfds, strategy, threads, json),
        Commands::Bench {
            vertices,
            gfds,
            seed,
            threads,
        } => run_bench(vertices, gfds, seed, threads),
    };
    process::exit(exit_code);
}

/// Environment config with flag overrides applied.
fn load_config(
    strategy: Option<Strategy>,
    threads: Option<usize>,
) -> Result<ValidatorConfig, ValidationError> {
    let mut config = ValidatorConfig::from_env()?;
    if let Some(strategy) = strategy {
        config.strategy = strategy;
    }
    if let Some(threads) = threads {
        config.threads = threads;
    }
    config.validate()?;
    Ok(config)
}

/// Exit code for a model-level failure: 3 for unreadable or unparsable
/// input, 1 otherwise.
fn core_exit_code(err: &CoreError) -> i32 {
    match err {
        CoreError::Io { .. } | CoreError::Parse { .. } => 3,
        _ => 1,
    }
}

/// Execute the validate subcommand.
///
/// Returns exit code: 0 = success, 1 = validation error, 3 = I/O or parse error.
fn run_validate(
    graph_path: PathBuf,
    gfd_paths: Vec<PathBuf>,
    strategy: Option<Strategy>,
    threads: Option<usize>,
    json: bool,
) -> i32 {
    let config = match load_config(strategy, threads) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    let data = match read_graph_file(&graph_path) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("Error: failed to load graph '{}': {}", graph_path.display(), e);
            return core_exit_code(&e);
        }
    };

    let mut gfds = Vec::with_capacity(gfd_paths.len());
    for path in &gfd_paths {
        match read_gfd_file(path) {
            Ok(gfd) => gfds.push(gfd),
            Err(e) => {
                eprintln!("Error: failed to load GFD '{}': {}", path.display(), e);
                return core_exit_code(&e);
            }
        }
    }

    tracing::info!(
        "Loaded graph '{}' ({} vertices, {} edges) and {} GFDs; strategy {}, {} threads",
        graph_path.display(),
        data.vertex_count(),
        data.edge_count(),
        gfds.len(),
        config.strategy,
        config.threads
    );

    let report = match validate_report(&data, &gfds, &config) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Validation error: {}", e);
            return 1;
        }
    };

    let satisfied: Vec<String> = report
        .satisfied_indices()
        .into_iter()
        .map(|i| gfd_paths[i].display().to_string())
        .collect();

    if json {
        let out = json!({
            "report": report,
            "satisfied": satisfied,
        });
        let text = serde_json::to_string_pretty(&out).unwrap_or_else(|e| {
            format!("{{\"error\": \"failed to serialize report: {}\"}}", e)
        });
        println!("{}", text);
    } else {
        println!("{}/{}", report.satisfied_count(), report.total());
        for name in &satisfied {
            println!("{}", name);
        }
    }
    0
}

/// Execute the bench subcommand.
///
/// Returns exit code: 0 = all strategies agree, 1 = error or disagreement.
fn run_bench(vertices: usize, gfds: usize, seed: u64, threads: Option<usize>) -> i32 {
    let workload_config = WorkloadConfig {
        vertices,
        gfds,
        seed,
        ..WorkloadConfig::default()
    };
    let workload = match generate_workload(&workload_config) {
        Ok(w) => w,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    println!(
        "workload: {} vertices, {} edges, {} GFDs (seed {})",
        workload.graph.vertex_count(),
        workload.graph.edge_count(),
        workload.gfds.len(),
        seed
    );

    let base = match load_config(None, threads) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    let mut reference = None;
    for strategy in Strategy::ALL {
        let config = ValidatorConfig::new(strategy, base.threads);
        let started = Instant::now();
        let report = match validate_report(&workload.graph, &workload.gfds, &config) {
            Ok(r) => r,
            Err(e) => {
                eprintln!("Validation error ({}): {}", strategy, e);
                return 1;
            }
        };
        println!(
            "{:<12} {}/{} satisfied  {:>8.2} ms  {} matcher runs  {} embeddings",
            strategy.as_str(),
            report.satisfied_count(),
            report.total(),
            started.elapsed().as_secs_f64() * 1000.0,
            report.stats.matcher_runs,
            report.stats.embeddings_checked
        );
        match &reference {
            None => reference = Some(report.outcomes),
            Some(expected) if *expected != report.outcomes => {
                tracing::warn!("{} outcomes: {:?}", strategy, report.outcomes);
                eprintln!("Error: {} disagrees with {}", strategy, Strategy::ALL[0]);
                return 1;
            }
            Some(_) => {}
        }
    }
    0
}

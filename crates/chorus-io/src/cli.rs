use std::path::PathBuf;

use anyhow::Result;
use chorus_models::load_balance::LoadEnv;
use chorus_models::value_sync::SyncEnv;
use chorus_runner::{Halting, RunSpec, Runner, Sweep};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::json;

use crate::report::{write_trace_with_report, RunReport};

#[derive(Parser)]
#[command(name = "chorus")]
#[command(about = "CHORUS - cooperative criticality-minimizing agent runs")]
#[command(
    long_about = "Round-based runs of cooperative multi-agent models where each agent \
                  selects conflict-free actions minimizing the worst predicted criticality \
                  in its neighborhood"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a model until its halting condition holds and report the trajectory
    Run {
        /// Model type
        #[arg(long, value_enum)]
        model: ModelType,

        /// Sweep mode within a round
        #[arg(long, value_enum, default_value = "sequential")]
        sweep: SweepType,

        /// Lookahead depth (0 = one-step decisions)
        #[arg(long, default_value = "0")]
        depth: usize,

        /// Round budget
        #[arg(long, default_value = "32")]
        max_rounds: usize,

        /// Record every nth round in the trace
        #[arg(long, default_value = "1")]
        record_stride: usize,

        /// Model-specific parameters (JSON)
        #[arg(long)]
        params: Option<String>,

        /// Output JSON trace file (a .report.json sidecar is written next to it)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Clone, Debug, ValueEnum)]
pub enum ModelType {
    #[value(name = "value-sync")]
    ValueSync,
    #[value(name = "load-balance")]
    LoadBalance,
}

#[derive(Clone, Debug, ValueEnum)]
pub enum SweepType {
    #[value(name = "sequential")]
    Sequential,
    #[value(name = "simultaneous")]
    Simultaneous,
}

impl From<SweepType> for Sweep {
    fn from(sweep: SweepType) -> Self {
        match sweep {
            SweepType::Sequential => Sweep::Sequential,
            SweepType::Simultaneous => Sweep::Simultaneous,
        }
    }
}

pub fn run_command(
    model: ModelType,
    sweep: SweepType,
    depth: usize,
    max_rounds: usize,
    record_stride: usize,
    params: Option<String>,
    out: Option<PathBuf>,
) -> Result<()> {
    println!("CHORUS Run");
    println!("==========");
    println!("Model: {:?}", model);
    println!("Sweep: {:?}", sweep);
    println!("Depth: {}", depth);
    println!("Max rounds: {}", max_rounds);

    let model_params = match params {
        Some(raw) => serde_json::from_str(&raw)?,
        None => json!({}),
    };

    let run_spec = RunSpec::new(max_rounds)
        .with_stride(record_stride)
        .with_sweep(sweep.clone().into());

    let (rounds_run, converged) = match model {
        ModelType::ValueSync => {
            let spec = integer_pairs(&model_params, "values")
                .unwrap_or_else(|| vec![
                    ("a".to_string(), 2),
                    ("b".to_string(), 9),
                    ("c".to_string(), 3),
                    ("d".to_string(), 6),
                ]);
            let borrowed: Vec<(&str, i64)> =
                spec.iter().map(|(id, v)| (id.as_str(), *v)).collect();
            let env = SyncEnv::chain(&borrowed).with_search_depth(depth);

            let runner = Runner::new(env.agents.values().cloned().collect());
            let halting = Halting::new().converged_when(SyncEnv::converged);
            let trace = if depth == 0 {
                runner.run(env, &run_spec, &halting)
            } else {
                runner.run_ahead(env, &run_spec, &halting)
            };

            if let Some(last) = trace.final_env() {
                println!();
                println!("Final values: {:?}", last.values);
                println!("Max criticality: {:.3}", last.max_criticality().value());
            }

            if let Some(ref path) = out {
                let report = run_report("value-sync", &sweep, depth, max_rounds, &trace, &model_params);
                write_trace_with_report(&trace, &report, path)?;
                println!("Trace written to {}", path.display());
            }

            (trace.rounds_run, trace.converged)
        }

        ModelType::LoadBalance => {
            let spec = integer_pairs(&model_params, "loads")
                .unwrap_or_else(|| vec![
                    ("w0".to_string(), 0),
                    ("w1".to_string(), 14),
                    ("w2".to_string(), 2),
                    ("w3".to_string(), 0),
                ]);
            let borrowed: Vec<(&str, i64)> =
                spec.iter().map(|(id, v)| (id.as_str(), *v)).collect();
            let env = LoadEnv::line(&borrowed).with_search_depth(depth);

            let runner = Runner::new(env.workers.values().cloned().collect());
            let halting = Halting::new().converged_when(LoadEnv::balanced);
            let trace = if depth == 0 {
                runner.run(env, &run_spec, &halting)
            } else {
                runner.run_ahead(env, &run_spec, &halting)
            };

            if let Some(last) = trace.final_env() {
                println!();
                println!("Final loads: {:?}", last.loads);
                println!("Total load: {}", last.total_load());
            }

            if let Some(ref path) = out {
                let report = run_report("load-balance", &sweep, depth, max_rounds, &trace, &model_params);
                write_trace_with_report(&trace, &report, path)?;
                println!("Trace written to {}", path.display());
            }

            (trace.rounds_run, trace.converged)
        }
    };

    println!();
    if converged {
        println!("✓ Converged after {} rounds", rounds_run);
    } else {
        println!("✗ Round budget of {} spent without convergence", max_rounds);
    }

    Ok(())
}

fn run_report<E>(
    model: &str,
    sweep: &SweepType,
    depth: usize,
    max_rounds: usize,
    trace: &chorus_runner::Trace<E>,
    params: &serde_json::Value,
) -> RunReport {
    RunReport {
        model: model.to_string(),
        sweep: format!("{sweep:?}").to_lowercase(),
        depth,
        max_rounds,
        rounds_run: trace.rounds_run,
        converged: trace.converged,
        params: params.clone(),
    }
}

/// Pull `{ "<key>": { "<id>": <integer>, ... } }` out of the params JSON.
/// Ids come back sorted, which fixes the topology order.
fn integer_pairs(params: &serde_json::Value, key: &str) -> Option<Vec<(String, i64)>> {
    let map = params.get(key)?.as_object()?;
    let mut pairs: Vec<(String, i64)> = map
        .iter()
        .filter_map(|(id, value)| value.as_i64().map(|v| (id.clone(), v)))
        .collect();
    pairs.sort();
    Some(pairs)
}

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use chorus_runner::Trace;
use serde::{Deserialize, Serialize};

/// Reproducibility record written next to a trace.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunReport {
    pub model: String,
    pub sweep: String,
    pub depth: usize,
    pub max_rounds: usize,
    pub rounds_run: usize,
    pub converged: bool,
    pub params: serde_json::Value,
}

#[derive(Serialize)]
struct TraceDoc<'a, E> {
    rounds: &'a [E],
    rounds_run: usize,
    converged: bool,
}

/// Write the recorded trajectory as JSON, plus a `<out>.report.json`
/// sidecar describing the run.
pub fn write_trace_with_report<E: Serialize>(
    trace: &Trace<E>,
    report: &RunReport,
    trace_path: &Path,
) -> Result<()> {
    let doc = TraceDoc {
        rounds: &trace.rounds,
        rounds_run: trace.rounds_run,
        converged: trace.converged,
    };
    let file = File::create(trace_path)
        .with_context(|| format!("create trace file {}", trace_path.display()))?;
    serde_json::to_writer_pretty(file, &doc)?;

    let report_path = trace_path.with_extension("report.json");
    let file = File::create(&report_path)
        .with_context(|| format!("create report file {}", report_path.display()))?;
    serde_json::to_writer_pretty(file, report)?;

    Ok(())
}

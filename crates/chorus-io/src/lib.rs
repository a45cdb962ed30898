pub mod cli;
pub mod logging;
pub mod report;

pub use report::{write_trace_with_report, RunReport};

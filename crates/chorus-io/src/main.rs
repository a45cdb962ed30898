use chorus_io::cli::{run_command, Cli, Commands};
use clap::Parser;

fn main() -> anyhow::Result<()> {
    chorus_io::logging::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            model,
            sweep,
            depth,
            max_rounds,
            record_stride,
            params,
            out,
        } => {
            run_command(model, sweep, depth, max_rounds, record_stride, params, out)?;
        }
    }

    Ok(())
}

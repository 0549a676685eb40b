use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::error;

use simplyecs::{
    ecs::World,
    logging,
    report::{Reporter, EXIT_HARNESS_ERROR, EXIT_SUCCESS},
    Harness, MonotonicClock,
};

#[derive(Debug, Parser)]
#[command(author, version, about = "SimplyECS world lifecycle benchmarks")]
struct Cli {
    /// Also write every result as JSON to this path
    #[arg(long)]
    json: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Print the scenario table and targets without running anything
    #[arg(long)]
    list: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(&cli.log_level);

    match run(&cli) {
        Ok(status) => ExitCode::from(status),
        Err(err) => {
            error!("benchmark harness aborted: {err:#}");
            eprintln!("error: {err:#}");
            ExitCode::from(EXIT_HARNESS_ERROR)
        }
    }
}

fn run(cli: &Cli) -> Result<u8> {
    let harness = Harness::standard();

    if cli.list {
        list(&harness)?;
        return Ok(EXIT_SUCCESS);
    }

    let mut reporter = Reporter::new(io::stdout().lock());
    let summary = harness
        .run::<World, _>(&mut reporter)
        .context("benchmark suite did not complete")?;

    if let Some(path) = &cli.json {
        reporter
            .write_json(path)
            .with_context(|| format!("Failed to write JSON report {}", path.display()))?;
    }

    Ok(summary.exit_status())
}

fn list(harness: &Harness<MonotonicClock>) -> Result<()> {
    let mut out = io::stdout().lock();
    writeln!(
        out,
        "{:<25}{:<16}{:<8}{:<12}{:<6}{}",
        "Test", "Kind", "Place", "Scale", "Runs", "Target"
    )?;
    for scenario in harness.scenarios() {
        let target = harness
            .policy()
            .limit(scenario.kind, scenario.scale)
            .map(|limit| limit.to_string())
            .unwrap_or_else(|| "-".to_string());
        writeln!(
            out,
            "{:<25}{:<16}{:<8}{:<12}{:<6}{}",
            scenario.name,
            scenario.kind,
            scenario.placement,
            scenario.scale,
            scenario.runs,
            target
        )?;
    }
    Ok(())
}

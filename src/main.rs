//! Smart-home energy simulator entry point: CLI wiring, optional device
//! store, and report output.

use anyhow::{Context, bail};
use clap::Parser;
use serde::Serialize;
use tracing::info;

use home_energy_sim::cli::Args;
use home_energy_sim::config::ScenarioConfig;
use home_energy_sim::io::export::export_csv;
use home_energy_sim::runner::{self, ScenarioRun};
use home_energy_sim::sim::summary::RunSummary;
use home_energy_sim::sim::types::StepRecord;
use home_energy_sim::store::{self, CsvDeviceStore};
use home_energy_sim::telemetry::init_tracing;

#[derive(Serialize)]
struct JsonOutput<'a> {
    summary: &'a RunSummary,
    steps: &'a [StepRecord],
}

fn load_scenario(args: &Args) -> anyhow::Result<ScenarioConfig> {
    // --scenario takes priority, then --preset, then baseline default
    let mut scenario = match &args.scenario {
        Some(path) => ScenarioConfig::from_toml_file(path)?,
        None => ScenarioConfig::from_preset(args.preset_name())?,
    };

    if let Some(seed) = args.seed {
        scenario.simulation.seed = seed;
    }
    if let Some(hours) = args.hours {
        scenario.simulation.hours = hours;
    }

    let errors = scenario.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        bail!("scenario has {} invalid field(s)", errors.len());
    }
    Ok(scenario)
}

fn run(args: &Args, scenario: &ScenarioConfig) -> anyhow::Result<ScenarioRun> {
    let Some(path) = &args.device_store else {
        return Ok(runner::run_scenario(scenario)?);
    };

    let mut device_store = CsvDeviceStore::new(path);
    let engine = runner::build_engine_from_store(scenario, &device_store)
        .with_context(|| format!("loading devices from {}", path.display()))?;
    let run = runner::run_engine(scenario, engine)?;

    store::save_devices(&mut device_store, &run.engine)
        .with_context(|| format!("saving devices to {}", path.display()))?;
    info!(
        path = %path.display(),
        devices = run.engine.devices().len(),
        "device states saved"
    );
    Ok(run)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.quiet);

    let scenario = load_scenario(&args)?;
    let run = run(&args, &scenario)?;

    if args.json {
        let output = JsonOutput {
            summary: &run.summary,
            steps: &run.records,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        for r in &run.records {
            println!("step {:>3} t={:>5.2}h {}", r.step, r.time_hr, r.report);
        }
        println!("\n{}", run.summary);
    }

    if let Some(path) = &args.telemetry_out {
        export_csv(&run.records, path)
            .with_context(|| format!("failed to write CSV to {}", path.display()))?;
        info!(path = %path.display(), "telemetry written");
    }

    Ok(())
}

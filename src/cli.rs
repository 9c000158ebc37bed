use std::path::PathBuf;

use clap::Parser;

/// Smart-home energy simulator: run a household scenario and report energy,
/// generation, and cost.
///
/// If neither `--scenario` nor `--preset` is given, the baseline preset is used.
#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Args {
    /// Load the scenario from a TOML file.
    #[clap(long, conflicts_with = "preset")]
    pub scenario: Option<PathBuf>,

    /// Use a built-in preset (baseline, solar_surplus, all_electric).
    #[clap(long)]
    pub preset: Option<String>,

    /// Override the scenario's random seed.
    #[clap(long)]
    pub seed: Option<u64>,

    /// Override the simulated horizon in hours.
    #[clap(long)]
    pub hours: Option<f64>,

    /// Export per-step telemetry to CSV.
    #[clap(long = "telemetry-out")]
    pub telemetry_out: Option<PathBuf>,

    /// CSV file holding the household devices. Loaded when it has records,
    /// seeded from the scenario otherwise; final device states are saved back.
    #[clap(long = "device-store", env = "DEVICE_STORE")]
    pub device_store: Option<PathBuf>,

    /// Print the run summary as JSON instead of text.
    #[clap(long)]
    pub json: bool,

    /// Only log warnings and errors.
    #[clap(long, short)]
    pub quiet: bool,
}

impl Args {
    /// Preset to use when no scenario file is given.
    pub fn preset_name(&self) -> &str {
        self.preset.as_deref().unwrap_or("baseline")
    }
}

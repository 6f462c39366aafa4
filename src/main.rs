use clap::Parser;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use u_ward::config::SchedulingConfig;
use u_ward::error::ScheduleError;
use u_ward::ga::GaConfig;
use u_ward::models::SpecialtyTable;
use u_ward::request::ScheduleRequest;
use u_ward::scheduler::{ScheduleOutcome, Scheduler, series_csv};

#[derive(Parser)]
#[command(author, version, about = "Assign ward patients to doctors and beds")]
struct Cli {
    /// Input record (JSON object); `-` reads stdin
    #[arg(default_value = "-")]
    input: PathBuf,

    /// Directory for output.json, metrics.csv and convergence.csv
    #[arg(long)]
    results_dir: Option<PathBuf>,

    /// JSON specialty table replacing the built-in one
    #[arg(long)]
    specialties: Option<PathBuf>,

    /// Optimizer seed, overriding GASeed
    #[arg(long)]
    seed: Option<u64>,

    /// Run the optimizer even when UseGA is absent
    #[arg(long)]
    ga: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run(Cli::parse()) {
        error!(error = %e, "scheduling failed");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), ScheduleError> {
    let mut config = SchedulingConfig::default();
    if let Some(path) = &cli.specialties {
        let table: SpecialtyTable = serde_json::from_str(&fs::read_to_string(path)?)?;
        info!(path = %path.display(), specialties = table.len(), "loaded specialty table");
        config = config.with_specialties(table);
    }

    let mut request = ScheduleRequest::from_json_str(&read_input(&cli.input)?, &config)?;
    if cli.ga && request.optimizer.is_none() {
        request.optimizer = Some(GaConfig::default());
    }
    if let (Some(seed), Some(ga)) = (cli.seed, request.optimizer.as_mut()) {
        ga.seed = Some(seed);
    }

    let outcome = Scheduler::new(&config).run(&request);
    let schedule_json = serde_json::to_string_pretty(&outcome.schedule.entries)?;
    println!("{schedule_json}");

    if let Some(dir) = &cli.results_dir {
        write_results(dir, &schedule_json, &outcome)?;
    }
    Ok(())
}

fn read_input(path: &Path) -> io::Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        fs::read_to_string(path)
    }
}

fn write_results(dir: &Path, schedule_json: &str, outcome: &ScheduleOutcome) -> io::Result<()> {
    fs::create_dir_all(dir)?;
    fs::write(dir.join("output.json"), schedule_json)?;
    fs::write(dir.join("metrics.csv"), outcome.metrics.to_csv())?;
    fs::write(dir.join("convergence.csv"), series_csv(&outcome.series))?;
    info!(dir = %dir.display(), "results written");
    Ok(())
}

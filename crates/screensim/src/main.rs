use std::path::PathBuf;

use clap::Parser;
use screensim::report::{render_text, write_json};
use screensim::{RunConfig, init_logging, run};
use screensim_core::screening::Strategy;

#[derive(Parser, Debug)]
#[command(name = "screensim")]
#[command(about = "Compare cervical-cancer screening strategies by continuous-time simulation")]
struct Args {
    /// YAML run configuration; flags below override its fields
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Strategy to simulate (hpv, cytology, dual); repeat to compare.
    /// The first one is the comparison baseline
    #[arg(short, long = "strategy")]
    strategies: Vec<Strategy>,

    /// Individuals per cohort
    #[arg(short, long)]
    population: Option<usize>,

    /// Observation horizon in years
    #[arg(long)]
    horizon: Option<f64>,

    /// Cohorts per strategy
    #[arg(long)]
    cohorts: Option<u32>,

    /// Re-sample costs for every cohort
    #[arg(long)]
    probabilistic: bool,

    /// Significance level of reported intervals
    #[arg(long)]
    alpha: Option<f64>,

    /// Years between survival table rows
    #[arg(long)]
    survival_step: Option<f64>,

    /// Write a JSON summary to this path
    #[arg(long)]
    json_out: Option<PathBuf>,

    /// Print the effective configuration as YAML and exit
    #[arg(long)]
    dump_config: bool,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Append logs to this file (rotated) instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Args {
    fn apply(self, config: &mut RunConfig) {
        if !self.strategies.is_empty() {
            config.strategies = self.strategies;
        }
        if let Some(population) = self.population {
            config.population_size = population;
        }
        if let Some(horizon) = self.horizon {
            config.horizon = horizon;
        }
        if let Some(cohorts) = self.cohorts {
            config.cohorts = cohorts;
        }
        if self.probabilistic {
            config.probabilistic = true;
        }
        if let Some(alpha) = self.alpha {
            config.alpha = alpha;
        }
        if let Some(step) = self.survival_step {
            config.survival_step = step;
        }
        if self.json_out.is_some() {
            config.json_out = self.json_out;
        }
    }
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    init_logging(&args.log_level, args.log_file.as_deref())?;

    let mut config = match &args.config {
        Some(path) => RunConfig::load(path)?,
        None => RunConfig::default(),
    };
    let dump_config = args.dump_config;
    args.apply(&mut config);

    if dump_config {
        print!("{}", config.to_yaml()?);
        return Ok(());
    }

    let runs = run(&config)?;
    print!(
        "{}",
        render_text(&runs, config.alpha, config.survival_step)
    );

    if let Some(path) = &config.json_out {
        write_json(path, &runs, config.alpha)?;
    }

    tracing::info!(strategies = runs.len(), "run finished");
    Ok(())
}

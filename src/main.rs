//! Command-line entry point: builds a compat datapack for every mod in the mods directory.

use std::{path::PathBuf, process::ExitCode};

use bigglobe_compat::prelude::*;
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Build Big Globe compatibility datapacks for the mods in a directory.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Directory containing the mod jars
    #[arg(long, default_value = "mods")]
    mods: PathBuf,
    /// Directory containing the JSON templates
    #[arg(long, default_value = "templates")]
    templates: PathBuf,
    /// Directory the datapack archives are written to
    #[arg(long, default_value = "datapacks")]
    output: PathBuf,
    /// Directory mods are unpacked and assembled in
    #[arg(long, default_value = ".")]
    work_dir: PathBuf,
    /// Log every processing step
    #[arg(short, long)]
    verbose: bool,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Self {
            mods_dir: args.mods,
            templates_dir: args.templates,
            output_dir: args.output,
            work_dir: args.work_dir,
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    let config = Config::from(args);

    let templates = match TemplateSet::load(&config.templates_dir) {
        Ok(templates) => templates,
        Err(err) => {
            tracing::error!("{err}");
            return ExitCode::FAILURE;
        }
    };

    match run_batch(&config, &templates) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("Could not read {}: {err}", config.mods_dir.display());
            ExitCode::FAILURE
        }
    }
}

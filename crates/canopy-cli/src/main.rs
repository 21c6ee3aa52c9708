//! Canopy CLI entry point.

use std::{process, str::FromStr};

use clap::Parser;
use log::{LevelFilter, debug, error, info, warn};

use canopy::CanopyError;
use canopy_cli::{Args, error_adapter::to_reportables};

fn main() {
    miette::set_panic_hook();

    let args = Args::parse();

    let log_level = LevelFilter::from_str(&args.log_level).unwrap_or_else(|_| {
        eprintln!(
            "Invalid log level: {}. Using 'warn' instead.",
            args.log_level
        );
        LevelFilter::Warn
    });

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();

    info!(log_level:?; "Starting Canopy");
    debug!(args:?; "Parsed arguments");

    match canopy_cli::run(&args) {
        Ok(generation) => {
            for failure in generation.failures {
                let path = failure.path.clone();
                let report = render(&CanopyError::from(failure));
                warn!(path = path.as_str(); "Scene skipped\n{report}");
            }
            info!(diagrams = generation.outputs.len(); "Completed successfully");
        }
        Err(err) => {
            error!("Failed\n{}", render(&err));
            process::exit(1);
        }
    }
}

/// Render every diagnostic of `err` with miette.
fn render(err: &CanopyError) -> String {
    let reporter = miette::GraphicalReportHandler::new();

    let mut writer = String::new();
    for reportable in to_reportables(err) {
        reporter
            .render_report(&mut writer, &reportable)
            .expect("Writing to String buffer is infallible");
    }
    writer
}

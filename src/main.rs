mod args;

use args::Args;
use clap::Parser;
use rayon::{
    ThreadPoolBuilder,
    iter::{IntoParallelRefIterator, ParallelIterator},
};
use std::{process::ExitCode, thread::available_parallelism};
use survey2geojson::{TimeStats, convert_file, preview::Preview};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, filter::ParseError};

fn main() -> ExitCode {
    if let Err(e) = try_main() {
        eprintln!("{e}");

        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn try_main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(
            std::env::var("RUST_LOG").ok().as_deref(),
            args.debug,
        )?)
        .with_writer(std::io::stderr)
        .init();

    let options = args.convert_options()?;

    args.check_output_collisions()?;

    let num_threads = match args.num_threads {
        Some(num_threads) => usize::from(num_threads),
        None => available_parallelism()
            .map_err(|e| format!("Error getting available parallelism: {e}"))?
            .get(),
    };

    let pool = ThreadPoolBuilder::new()
        .num_threads(num_threads.min(args.source_files.len()).max(1))
        .build()
        .map_err(|e| format!("Error creating thread pool: {e}"))?;

    info!("Converting {} file(s)", args.source_files.len());

    // every conversion owns its parser state and PROJ transform
    let results: Vec<_> = pool.install(|| {
        args.source_files
            .par_iter()
            .map(|source_file| {
                let mut stats = TimeStats::default();

                let result = convert_file(source_file, &args.source_srs, &options, &mut stats);

                (source_file, result, stats)
            })
            .collect()
    });

    let mut total_stats = TimeStats::default();

    let mut failed = 0_usize;

    for (source_file, result, stats) in results {
        total_stats.merge(&stats);

        match result {
            Ok((collection, target_file)) => {
                info!(
                    "{} -> {} ({} features)",
                    source_file.display(),
                    target_file.display(),
                    collection.features.len()
                );

                if args.preview {
                    if let Some(preview) = Preview::new(&collection) {
                        println!("{}", serde_json::to_string(&preview)?);
                    } else {
                        warn!("Nothing to preview for {}", source_file.display());
                    }
                }
            }
            Err(e) => {
                error!("{}: {e}", source_file.display());

                failed += 1;
            }
        }
    }

    if args.debug {
        info!("{total_stats}");
    }

    if failed > 0 {
        return Err(format!("{failed} of {} conversions failed", args.source_files.len()).into());
    }

    Ok(())
}

/// `RUST_LOG` (or info for this crate) with `--debug` layered on top.
fn log_filter(rust_log: Option<&str>, debug: bool) -> Result<EnvFilter, ParseError> {
    let filter = match rust_log {
        Some(directives) => EnvFilter::try_new(directives)?,
        None => EnvFilter::new("survey2geojson=info"),
    };

    if debug {
        Ok(filter.add_directive("survey2geojson=debug".parse()?))
    } else {
        Ok(filter)
    }
}

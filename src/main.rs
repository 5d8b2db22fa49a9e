//! tou-rates entry point: CLI wiring and config-driven service construction.

mod cli;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{info, warn};

use tou_rates::clock::SystemClock;
use tou_rates::config::AppConfig;
use tou_rates::generator::RateGenerator;
use tou_rates::io::export::export_csv;
use tou_rates::logging;
use tou_rates::preview::{PreviewRow, day_preview};
use tou_rates::scheduler::Scheduler;
use tou_rates::sink::{self, RateSink, StdoutSink};
use tou_rates::tariff::ConsumerCategory;

use crate::cli::{Cli, Command};

/// Loads the config file (or defaults) and applies CLI overrides.
fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::from_toml_file(path)?,
        None => AppConfig::default(),
    };
    if cli.seed.is_some() {
        config.schedule.seed = cli.seed;
    }

    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        bail!("invalid configuration ({} error(s))", errors.len());
    }
    Ok(config)
}

fn build_sink(cli: &Cli, config: &AppConfig) -> Result<Arc<dyn RateSink>> {
    if cli.dry_run {
        return Ok(Arc::new(StdoutSink));
    }
    sink::from_config(&config.sink).context("failed to set up the reading store")
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env.local wins over .env; neither is required.
    dotenvy::from_filename(".env.local").ok();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = load_config(&cli)?;
    let zone = config.timezone()?;
    let generator = RateGenerator::new(Arc::new(config.pricing.clone()), zone, Arc::new(SystemClock));

    match cli.command.as_ref().unwrap_or(&Command::Run) {
        Command::Run => {
            let scheduler = Arc::new(
                Scheduler::new(generator, build_sink(&cli, &config)?, &config.schedule.collection)
                    .with_seed(config.schedule.seed)
                    .with_run_at_startup(config.schedule.run_at_startup),
            );
            scheduler
                .run(async {
                    if let Err(e) = tokio::signal::ctrl_c().await {
                        warn!(error = %e, "cannot listen for ctrl-c");
                        std::future::pending::<()>().await;
                    }
                })
                .await;
        }
        Command::Once => {
            let scheduler =
                Scheduler::new(generator, build_sink(&cli, &config)?, &config.schedule.collection)
                    .with_seed(config.schedule.seed);
            let outcomes = scheduler.fire().await;
            let failed = outcomes.iter().filter(|o| !o.is_ok()).count();
            if failed == outcomes.len() {
                bail!("no reading could be stored");
            }
            if failed > 0 {
                warn!(failed, "some readings were not stored");
            }
        }
        Command::Preview {
            date,
            category,
            csv_out,
        } => {
            let date = date.unwrap_or_else(|| generator.now().with_timezone(&zone).date_naive());
            let categories = category.map_or_else(|| ConsumerCategory::ALL.to_vec(), |c| vec![c]);
            let mut rng = match config.schedule.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_os_rng(),
            };
            let rows = day_preview(&generator, date, &categories, &mut rng);
            for row in &rows {
                println!("{row}");
            }
            if let Some(path) = csv_out {
                write_preview(&rows, path)?;
            }
        }
        Command::Backfill { hours } => {
            let scheduler =
                Scheduler::new(generator, build_sink(&cli, &config)?, &config.schedule.collection)
                    .with_seed(config.schedule.seed);
            let report = scheduler.backfill(*hours).await;
            println!("stored {} reading(s), {} failed", report.stored, report.failed);
            if report.stored == 0 && report.failed > 0 {
                bail!("backfill stored nothing");
            }
        }
        #[cfg(feature = "api")]
        Command::Serve { port } => {
            let dir = match &config.sink {
                tou_rates::config::SinkConfig::Jsonl { dir } => dir.clone(),
                _ => bail!("`serve` needs the jsonl sink"),
            };
            let state = Arc::new(tou_rates::api::AppState {
                log: Arc::new(sink::JsonlSink::new(dir)),
                collection: config.schedule.collection.clone(),
            });
            let addr = std::net::SocketAddr::from(([127, 0, 0, 1], *port));
            tou_rates::api::serve(state, addr)
                .await
                .with_context(|| format!("API server on {addr} failed"))?;
        }
    }

    Ok(())
}

fn write_preview(rows: &[PreviewRow], path: &Path) -> Result<()> {
    export_csv(rows, path).with_context(|| format!("failed to write CSV to {}", path.display()))?;
    info!(path = %path.display(), rows = rows.len(), "preview written");
    Ok(())
}

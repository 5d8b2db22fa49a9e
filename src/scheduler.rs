//! Hourly firing loop: generate one reading per category and append it.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::clock::{next_top_of_hour, past_hours};
use crate::error::SinkError;
use crate::generator::RateGenerator;
use crate::reading::TouReading;
use crate::sink::RateSink;
use crate::tariff::ConsumerCategory;

/// Result of appending one reading.
#[derive(Debug)]
pub struct StoreOutcome {
    pub reading: TouReading,
    pub result: Result<(), SinkError>,
}

impl StoreOutcome {
    pub const fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Counts of a backfill run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BackfillReport {
    pub stored: usize,
    pub failed: usize,
}

/// Fires generation-and-store for every category, once at start and then at
/// the top of every local hour.
///
/// Holds no state between firings: each firing builds its own random source
/// and readings, and its writes run as independent tasks.
pub struct Scheduler {
    generator: RateGenerator,
    sink: Arc<dyn RateSink>,
    collection: String,
    seed: Option<u64>,
    run_at_startup: bool,
}

impl Scheduler {
    pub fn new(generator: RateGenerator, sink: Arc<dyn RateSink>, collection: impl Into<String>) -> Self {
        Self {
            generator,
            sink,
            collection: collection.into(),
            seed: None,
            run_at_startup: true,
        }
    }

    /// Seeds every firing with `seed + unix seconds of the firing`.
    #[must_use]
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_run_at_startup(mut self, run_at_startup: bool) -> Self {
        self.run_at_startup = run_at_startup;
        self
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    fn rng_for(&self, at: DateTime<Utc>) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add_signed(at.timestamp())),
            None => StdRng::from_os_rng(),
        }
    }

    /// Readings of one firing at `at`, one per category in [`ConsumerCategory::ALL`] order.
    pub fn readings_for(&self, at: DateTime<Utc>) -> Vec<TouReading> {
        let mut rng = self.rng_for(at);
        ConsumerCategory::ALL
            .into_iter()
            .map(|category| self.generator.reading_at(category, at, &mut rng))
            .collect()
    }

    /// Runs one firing now and waits for its appends.
    ///
    /// Appends run concurrently; a failed append is logged and reported in its
    /// outcome without affecting the other categories.
    pub async fn fire(&self) -> Vec<StoreOutcome> {
        let at = self.generator.now();
        let handles: Vec<JoinHandle<StoreOutcome>> = self
            .readings_for(at)
            .into_iter()
            .map(|reading| {
                let sink = Arc::clone(&self.sink);
                let collection = self.collection.clone();
                tokio::spawn(async move {
                    let result = sink.append(&collection, &reading).await;
                    StoreOutcome { reading, result }
                })
            })
            .collect();

        let mut outcomes = Vec::with_capacity(handles.len());
        for handle in handles {
            match handle.await {
                Ok(outcome) => {
                    self.log_outcome(&outcome);
                    outcomes.push(outcome);
                }
                Err(e) => error!(error = %e, "append task did not complete"),
            }
        }
        outcomes
    }

    fn log_outcome(&self, outcome: &StoreOutcome) {
        let reading = &outcome.reading;
        match &outcome.result {
            Ok(()) => info!(
                category = %reading.category,
                rate = reading.rate,
                timestamp = %reading.timestamp_iso(),
                sink = self.sink.kind(),
                "stored TOU rate"
            ),
            Err(e) => error!(
                category = %reading.category,
                rate = reading.rate,
                timestamp = %reading.timestamp_iso(),
                sink = self.sink.kind(),
                error = %e,
                "failed to store TOU rate"
            ),
        }
    }

    fn spawn_firing(self: &Arc<Self>) {
        let scheduler = Arc::clone(self);
        tokio::spawn(async move { scheduler.fire().await });
    }

    /// Fires at startup (if enabled) and at every local top of the hour until
    /// `shutdown` resolves.
    ///
    /// The loop never waits for a firing to finish; in-flight appends keep
    /// running after the loop returns.
    pub async fn run(self: Arc<Self>, shutdown: impl Future<Output = ()>) {
        info!(
            collection = %self.collection,
            zone = %self.generator.zone(),
            sink = self.sink.kind(),
            "TOU rate scheduler started"
        );
        tokio::pin!(shutdown);

        if self.run_at_startup {
            self.spawn_firing();
        }

        let zone = self.generator.zone();
        let mut target = next_top_of_hour(&self.generator.now().with_timezone(&zone)).with_timezone(&Utc);
        loop {
            let wait = (target - self.generator.now()).to_std().unwrap_or(Duration::ZERO);
            debug!(next = %target, wait_secs = wait.as_secs(), "waiting for next firing");

            tokio::select! {
                () = &mut shutdown => {
                    info!("TOU rate scheduler stopping");
                    break;
                }
                () = tokio::time::sleep(wait) => {
                    self.spawn_firing();
                    // Missed hours (e.g. after a suspend) are skipped, not replayed.
                    let after = self.generator.now().max(target);
                    target = next_top_of_hour(&after.with_timezone(&zone)).with_timezone(&Utc);
                }
            }
        }
    }

    /// Appends one reading per category for each of the past `hours` local
    /// top-of-hour instants, oldest first.
    pub async fn backfill(&self, hours: u32) -> BackfillReport {
        let zone = self.generator.zone();
        let now = self.generator.now().with_timezone(&zone);
        let mut report = BackfillReport::default();

        for at in past_hours(&now, hours) {
            for reading in self.readings_for(at.with_timezone(&Utc)) {
                let result = self.sink.append(&self.collection, &reading).await;
                let outcome = StoreOutcome { reading, result };
                if outcome.is_ok() {
                    report.stored += 1;
                } else {
                    report.failed += 1;
                }
                self.log_outcome(&outcome);
            }
        }

        if report.failed > 0 {
            warn!(stored = report.stored, failed = report.failed, "backfill finished with failures");
        } else {
            info!(stored = report.stored, "backfill finished");
        }
        report
    }
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("generator", &self.generator)
            .field("sink", &self.sink.kind())
            .field("collection", &self.collection)
            .field("seed", &self.seed)
            .field("run_at_startup", &self.run_at_startup)
            .finish()
    }
}

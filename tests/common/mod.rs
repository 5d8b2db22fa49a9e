//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;
use tokio::time::Instant;

use tou_rates::clock::{Clock, FixedClock};
use tou_rates::error::SinkError;
use tou_rates::generator::RateGenerator;
use tou_rates::reading::TouReading;
use tou_rates::sink::{MemorySink, RateSink};
use tou_rates::tariff::{ConsumerCategory, PricingModel};

/// Collection used by every integration test.
pub const COLLECTION: &str = "tou-rates";

/// UTC instant helper.
pub fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

/// Default pricing model in `zone`, frozen at `at`.
pub fn fixed_generator(zone: Tz, at: DateTime<Utc>) -> RateGenerator {
    RateGenerator::new(
        Arc::new(PricingModel::default()),
        zone,
        Arc::new(FixedClock::new(at)),
    )
}

/// Clock that starts at `base` and advances with tokio's (pausable) time.
#[derive(Debug)]
pub struct TokioClock {
    base: DateTime<Utc>,
    started: Instant,
}

impl TokioClock {
    pub fn new(base: DateTime<Utc>) -> Self {
        Self {
            base,
            started: Instant::now(),
        }
    }
}

impl Clock for TokioClock {
    fn now(&self) -> DateTime<Utc> {
        let elapsed = TimeDelta::from_std(self.started.elapsed()).unwrap_or(TimeDelta::zero());
        self.base + elapsed
    }
}

/// Memory sink that refuses every reading of one category.
#[derive(Debug, Default)]
pub struct FlakySink {
    pub inner: MemorySink,
    pub failing: Option<ConsumerCategory>,
}

impl FlakySink {
    pub fn failing(category: ConsumerCategory) -> Self {
        Self {
            inner: MemorySink::new(),
            failing: Some(category),
        }
    }
}

#[async_trait]
impl RateSink for FlakySink {
    async fn append(&self, collection: &str, reading: &TouReading) -> Result<(), SinkError> {
        if self.failing == Some(reading.category) {
            return Err(SinkError::Rejected {
                status: 503,
                message: "unavailable".to_string(),
            });
        }
        self.inner.append(collection, reading).await
    }

    fn kind(&self) -> &'static str {
        "flaky"
    }
}

/// Memory sink whose appends take `delay` of tokio time to land.
#[derive(Debug)]
pub struct SlowSink {
    pub inner: MemorySink,
    pub delay: Duration,
    started: AtomicUsize,
}

impl SlowSink {
    pub fn new(delay: Duration) -> Self {
        Self {
            inner: MemorySink::new(),
            delay,
            started: AtomicUsize::new(0),
        }
    }

    /// Appends begun so far, landed or not.
    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RateSink for SlowSink {
    async fn append(&self, collection: &str, reading: &TouReading) -> Result<(), SinkError> {
        self.started.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.inner.append(collection, reading).await
    }

    fn kind(&self) -> &'static str {
        "slow"
    }
}

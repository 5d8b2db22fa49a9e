//! Composition of clock, time zone and pricing model.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::clock::Clock;
use crate::reading::TouReading;
use crate::tariff::{ConsumerCategory, PricingModel, RandomSource, RateBreakdown, RateContext};

/// Produces [`TouReading`]s for the current instant or any given instant.
///
/// Hour, weekday and season are read on the wall clock of `zone`; the
/// reading's timestamp stays in UTC.
#[derive(Clone)]
pub struct RateGenerator {
    model: Arc<PricingModel>,
    zone: Tz,
    clock: Arc<dyn Clock>,
}

impl RateGenerator {
    pub fn new(model: Arc<PricingModel>, zone: Tz, clock: Arc<dyn Clock>) -> Self {
        Self { model, zone, clock }
    }

    pub fn model(&self) -> &PricingModel {
        &self.model
    }

    pub const fn zone(&self) -> Tz {
        self.zone
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Pricing context for `category` at `at`.
    pub fn context_at(&self, category: ConsumerCategory, at: DateTime<Utc>) -> RateContext {
        RateContext::at(category, &at.with_timezone(&self.zone))
    }

    /// Full pipeline breakdown for `category` at `at`.
    pub fn breakdown_at(
        &self,
        category: ConsumerCategory,
        at: DateTime<Utc>,
        source: &mut dyn RandomSource,
    ) -> RateBreakdown {
        self.model.breakdown(self.context_at(category, at), source)
    }

    /// Reading for `category` priced and stamped at `at`.
    pub fn reading_at(
        &self,
        category: ConsumerCategory,
        at: DateTime<Utc>,
        source: &mut dyn RandomSource,
    ) -> TouReading {
        let rate = self.breakdown_at(category, at, source).rate;
        TouReading::new(category, rate, at)
    }

    /// Reading for `category` at the clock's current instant.
    pub fn generate(&self, category: ConsumerCategory, source: &mut dyn RandomSource) -> TouReading {
        self.reading_at(category, self.clock.now(), source)
    }
}

impl std::fmt::Debug for RateGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateGenerator")
            .field("zone", &self.zone)
            .finish_non_exhaustive()
    }
}

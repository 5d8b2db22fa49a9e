//! The modifier pipeline turning a base rate into a published rate.
//!
//! Steps run in a fixed order, each one multiplying (or adding to) the running
//! value:
//!
//! 1. base rate from the [`RateTable`]
//! 2. normal random variation scaled by the band's `variation`
//! 3. seasonal multiplier
//! 4. weekday / weekend multiplier
//! 5. peak / off-peak multiplier (not for domestic consumers)
//! 6. uniform market jitter
//! 7. regulatory surcharges, in configured order
//!
//! The result is rounded to cents, half away from zero.

use chrono::{DateTime, Datelike, TimeZone, Timelike, Weekday};
use serde::{Deserialize, Serialize};

use super::band::{RateTable, Resolved};
use super::category::{ConsumerCategory, Season};
use super::noise::{RandomSource, standard_normal};

/// Calendar facts the pipeline prices against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RateContext {
    pub category: ConsumerCategory,
    /// Local hour of day, 0–23.
    pub hour: u32,
    pub season: Season,
    pub weekend: bool,
}

impl RateContext {
    /// Derives hour, season and weekend flag from a local date-time.
    pub fn at<Tz: TimeZone>(category: ConsumerCategory, local: &DateTime<Tz>) -> Self {
        Self {
            category,
            hour: local.hour(),
            season: Season::from_month(local.month()),
            weekend: matches!(local.weekday(), Weekday::Sat | Weekday::Sun),
        }
    }
}

/// Multiplier per season.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SeasonMultipliers {
    pub summer: f64,
    pub monsoon: f64,
    pub winter: f64,
}

impl Default for SeasonMultipliers {
    fn default() -> Self {
        Self {
            summer: 1.15,
            monsoon: 1.0,
            winter: 0.9,
        }
    }
}

impl SeasonMultipliers {
    pub const fn for_season(&self, season: Season) -> f64 {
        match season {
            Season::Summer => self.summer,
            Season::Monsoon => self.monsoon,
            Season::Winter => self.winter,
        }
    }
}

/// Demand multiplier for working days and weekends.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DemandMultipliers {
    pub weekday: f64,
    pub weekend: f64,
}

impl Default for DemandMultipliers {
    fn default() -> Self {
        Self {
            weekday: 1.1,
            weekend: 0.95,
        }
    }
}

/// Peak / off-peak adjustment for non-domestic consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PeakAdjustment {
    pub peak_hours: Vec<u32>,
    pub peak_multiplier: f64,
    pub off_peak_hours: Vec<u32>,
    pub off_peak_multiplier: f64,
}

impl Default for PeakAdjustment {
    fn default() -> Self {
        Self {
            peak_hours: vec![14, 15, 16, 22, 23, 0],
            peak_multiplier: 1.2,
            off_peak_hours: vec![4, 5, 6, 7, 8, 9],
            off_peak_multiplier: 0.8,
        }
    }
}

impl PeakAdjustment {
    /// Multiplier for `hour`; peak hours win over off-peak hours.
    pub fn multiplier(&self, hour: u32) -> f64 {
        if self.peak_hours.contains(&hour) {
            self.peak_multiplier
        } else if self.off_peak_hours.contains(&hour) {
            self.off_peak_multiplier
        } else {
            1.0
        }
    }
}

/// A regulatory surcharge applied as a multiplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Surcharge {
    pub name: String,
    pub factor: f64,
}

impl Surcharge {
    pub fn new(name: impl Into<String>, factor: f64) -> Self {
        Self {
            name: name.into(),
            factor,
        }
    }
}

/// Immutable pricing configuration: rate table plus every modifier constant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PricingModel {
    /// Flat rate published when no band covers the hour.
    pub fallback_rate: f64,
    /// Half-width of the market jitter band (`0.01` gives `[0.99, 1.01]`).
    pub jitter: f64,
    pub seasons: SeasonMultipliers,
    pub demand: DemandMultipliers,
    pub peak: PeakAdjustment,
    /// Categories exempt from the peak / off-peak adjustment in addition to
    /// DOMESTIC, which is always exempt.
    pub peak_exempt: Vec<ConsumerCategory>,
    pub surcharges: Vec<Surcharge>,
    pub rates: RateTable,
}

impl Default for PricingModel {
    fn default() -> Self {
        Self {
            fallback_rate: 5.0,
            jitter: 0.01,
            seasons: SeasonMultipliers::default(),
            demand: DemandMultipliers::default(),
            peak: PeakAdjustment::default(),
            peak_exempt: Vec::new(),
            surcharges: vec![
                Surcharge::new("accumulated_deficit", 1.08),
                Surcharge::new("pension_trust", 1.05),
            ],
            rates: RateTable::default(),
        }
    }
}

/// Every intermediate value of one quote.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RateBreakdown {
    pub context: RateContext,
    /// `true` when no band matched and the fallback rate was published.
    pub fallback: bool,
    pub base_rate: f64,
    pub variation_amount: f64,
    pub after_variation: f64,
    pub after_season: f64,
    pub after_demand: f64,
    pub after_peak: f64,
    /// Value after jitter, i.e. just before surcharges.
    pub before_surcharges: f64,
    pub unrounded: f64,
    /// Published rate, rounded to cents.
    pub rate: f64,
}

/// Rounds to two decimals, halves away from zero.
///
/// # Examples
///
/// ```
/// use tou_rates::tariff::pipeline::round_to_cents;
///
/// assert_eq!(round_to_cents(13.340943), 13.34);
/// assert_eq!(round_to_cents(0.125), 0.13);
/// ```
pub fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl PricingModel {
    /// Quotes the published rate for `ctx`.
    pub fn quote(&self, ctx: RateContext, source: &mut dyn RandomSource) -> f64 {
        self.breakdown(ctx, source).rate
    }

    /// Runs the full pipeline and keeps every intermediate value.
    ///
    /// Draws three uniforms from `source` (two for the variation, one for the
    /// jitter) unless the hour falls back to the flat rate, in which case no
    /// draw is taken.
    pub fn breakdown(&self, ctx: RateContext, source: &mut dyn RandomSource) -> RateBreakdown {
        let band = match self.rates.resolve(ctx.category, ctx.hour, self.fallback_rate) {
            Resolved::Band(band) => *band,
            Resolved::Fallback(rate) => {
                return RateBreakdown {
                    context: ctx,
                    fallback: true,
                    base_rate: rate,
                    variation_amount: 0.0,
                    after_variation: rate,
                    after_season: rate,
                    after_demand: rate,
                    after_peak: rate,
                    before_surcharges: rate,
                    unrounded: rate,
                    rate,
                };
            }
        };

        let variation_amount = band.variation * standard_normal(source);
        let after_variation = band.base_rate + variation_amount;
        let after_season = after_variation * self.seasons.for_season(ctx.season);
        let after_demand = after_season
            * if ctx.weekend {
                self.demand.weekend
            } else {
                self.demand.weekday
            };
        let after_peak = if self.is_peak_exempt(ctx.category) {
            after_demand
        } else {
            after_demand * self.peak.multiplier(ctx.hour)
        };
        let jitter = 1.0 + (source.uniform() * 2.0 * self.jitter - self.jitter);
        let before_surcharges = after_peak * jitter;
        let unrounded = self
            .surcharges
            .iter()
            .fold(before_surcharges, |rate, surcharge| rate * surcharge.factor);

        RateBreakdown {
            context: ctx,
            fallback: false,
            base_rate: band.base_rate,
            variation_amount,
            after_variation,
            after_season,
            after_demand,
            after_peak,
            before_surcharges,
            unrounded,
            rate: round_to_cents(unrounded),
        }
    }

    /// Whether `category` skips the peak / off-peak step.
    pub fn is_peak_exempt(&self, category: ConsumerCategory) -> bool {
        category == ConsumerCategory::Domestic || self.peak_exempt.contains(&category)
    }

    /// Product of all surcharge factors.
    pub fn surcharge_factor(&self) -> f64 {
        self.surcharges.iter().map(|s| s.factor).product()
    }
}

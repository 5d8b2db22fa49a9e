//! Base-rate schedules per consumer category.

use serde::{Deserialize, Serialize};

use super::category::ConsumerCategory;

/// Base rate applying to the hours `[start_hour, end_hour)` of a day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RateBand {
    /// First hour covered (inclusive, 0–23).
    pub start_hour: u32,
    /// First hour no longer covered (exclusive, 1–24).
    pub end_hour: u32,
    /// Base rate per kWh before any modifier.
    pub base_rate: f64,
    /// Standard deviation of the random variation added to the base rate.
    pub variation: f64,
}

impl RateBand {
    pub const fn new(start_hour: u32, end_hour: u32, base_rate: f64, variation: f64) -> Self {
        Self {
            start_hour,
            end_hour,
            base_rate,
            variation,
        }
    }

    /// Returns `true` when `hour` falls within `[start_hour, end_hour)`.
    pub const fn contains(&self, hour: u32) -> bool {
        hour >= self.start_hour && hour < self.end_hour
    }
}

/// Result of looking an hour up in the [`RateTable`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolved<'a> {
    /// The band covering the requested hour.
    Band(&'a RateBand),
    /// No band covers the hour; publish this flat rate instead.
    Fallback(f64),
}

/// Rate bands for every consumer category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", deny_unknown_fields)]
pub struct RateTable {
    pub domestic: Vec<RateBand>,
    pub industrial: Vec<RateBand>,
    pub non_domestic: Vec<RateBand>,
}

impl Default for RateTable {
    fn default() -> Self {
        Self {
            domestic: vec![
                RateBand::new(0, 4, 3.0, 0.3),
                RateBand::new(4, 8, 4.5, 0.4),
                RateBand::new(8, 12, 6.5, 0.5),
                RateBand::new(12, 16, 7.0, 0.6),
                RateBand::new(16, 20, 8.0, 0.7),
                RateBand::new(20, 24, 5.2, 0.4),
            ],
            industrial: vec![RateBand::new(0, 24, 7.75, 0.5)],
            non_domestic: vec![RateBand::new(0, 24, 8.5, 0.6)],
        }
    }
}

impl RateTable {
    /// Bands configured for `category`.
    pub fn bands(&self, category: ConsumerCategory) -> &[RateBand] {
        match category {
            ConsumerCategory::Domestic => &self.domestic,
            ConsumerCategory::Industrial => &self.industrial,
            ConsumerCategory::NonDomestic => &self.non_domestic,
        }
    }

    /// Mutable access to the bands of `category`, mostly for building fixtures.
    pub fn bands_mut(&mut self, category: ConsumerCategory) -> &mut Vec<RateBand> {
        match category {
            ConsumerCategory::Domestic => &mut self.domestic,
            ConsumerCategory::Industrial => &mut self.industrial,
            ConsumerCategory::NonDomestic => &mut self.non_domestic,
        }
    }

    /// First band of `category` covering `hour`, if any.
    pub fn lookup(&self, category: ConsumerCategory, hour: u32) -> Option<&RateBand> {
        self.bands(category).iter().find(|band| band.contains(hour))
    }

    /// Like [`lookup`](Self::lookup), but never fails: a missing band resolves
    /// to `fallback_rate`.
    pub fn resolve(&self, category: ConsumerCategory, hour: u32, fallback_rate: f64) -> Resolved<'_> {
        self.lookup(category, hour)
            .map_or(Resolved::Fallback(fallback_rate), Resolved::Band)
    }

    /// Checks that the bands of `category` tile `[0, 24)` exactly.
    ///
    /// Returns a description of every problem found.
    pub fn coverage_problems(&self, category: ConsumerCategory) -> Vec<String> {
        let mut problems = Vec::new();
        let mut bands = self.bands(category).to_vec();
        if bands.is_empty() {
            problems.push("no rate bands defined".to_string());
            return problems;
        }
        bands.sort_by_key(|band| band.start_hour);

        let mut expected_start = 0;
        for band in &bands {
            if band.start_hour >= band.end_hour || band.end_hour > 24 {
                problems.push(format!(
                    "band {}–{} must satisfy start_hour < end_hour <= 24",
                    band.start_hour, band.end_hour
                ));
                continue;
            }
            if band.start_hour > expected_start {
                problems.push(format!("hours {expected_start}–{} are not covered", band.start_hour));
            } else if band.start_hour < expected_start {
                problems.push(format!(
                    "band {}–{} overlaps the previous band",
                    band.start_hour, band.end_hour
                ));
            }
            if !(band.base_rate > 0.0 && band.base_rate.is_finite()) {
                problems.push(format!(
                    "band {}–{} base_rate must be > 0",
                    band.start_hour, band.end_hour
                ));
            }
            if !(band.variation >= 0.0 && band.variation.is_finite()) {
                problems.push(format!(
                    "band {}–{} variation must be >= 0",
                    band.start_hour, band.end_hour
                ));
            }
            expected_start = expected_start.max(band.end_hour);
        }
        if expected_start < 24 {
            problems.push(format!("hours {expected_start}–24 are not covered"));
        }
        problems
    }
}

//! Hour-by-hour rate preview for one local calendar day.

use std::fmt;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;

use crate::generator::RateGenerator;
use crate::tariff::{ConsumerCategory, RandomSource, Season};

/// One quoted hour of a preview.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewRow {
    pub category: ConsumerCategory,
    pub local_time: DateTime<Tz>,
    pub season: Season,
    pub weekend: bool,
    /// Base rate of the matched band (or the fallback rate).
    pub base_rate: f64,
    /// Published rate.
    pub rate: f64,
}

impl fmt::Display for PreviewRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<12} {} | {:<7} {:<7} | base={:>5.2}  rate={:>6.2}",
            self.category.as_str(),
            self.local_time.format("%Y-%m-%d %H:%M %Z"),
            self.season.as_str(),
            if self.weekend { "weekend" } else { "weekday" },
            self.base_rate,
            self.rate,
        )
    }
}

/// Quotes every local hour of `date` for each of `categories`.
///
/// Rows are grouped by category, hours ascending. Local hours that do not
/// exist in the generator's zone (DST gaps) are skipped; ambiguous ones use
/// the earlier instant.
pub fn day_preview(
    generator: &RateGenerator,
    date: NaiveDate,
    categories: &[ConsumerCategory],
    source: &mut dyn RandomSource,
) -> Vec<PreviewRow> {
    let zone = generator.zone();
    let hours: Vec<DateTime<Tz>> = (0..24)
        .filter_map(|hour| date.and_hms_opt(hour, 0, 0))
        .filter_map(|naive| zone.from_local_datetime(&naive).earliest())
        .collect();

    let mut rows = Vec::with_capacity(hours.len() * categories.len());
    for &category in categories {
        for local in &hours {
            let breakdown = generator.breakdown_at(category, local.with_timezone(&Utc), source);
            rows.push(PreviewRow {
                category,
                local_time: *local,
                season: breakdown.context.season,
                weekend: breakdown.context.weekend,
                base_rate: breakdown.base_rate,
                rate: breakdown.rate,
            });
        }
    }
    rows
}

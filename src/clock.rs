use chrono::{DateTime, TimeDelta, TimeZone, Timelike, Utc};

/// Source of the current instant.
///
/// The scheduler and generator never read the system clock directly so tests
/// can pin time.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use tou_rates::clock::{Clock, FixedClock};
///
/// let at = Utc.with_ymd_and_hms(2024, 6, 1, 14, 0, 0).unwrap();
/// let clock = FixedClock::new(at);
/// assert_eq!(clock.now(), at);
/// ```
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock backed by the operating system.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    at: DateTime<Utc>,
}

impl FixedClock {
    pub const fn new(at: DateTime<Utc>) -> Self {
        Self { at }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.at
    }
}

/// Start of the hour containing `at`, on the wall clock of `at`'s zone.
///
/// Zones with a non-whole-hour offset (e.g. `Asia/Kolkata`) get their own
/// local top of the hour, not the UTC one.
pub fn hour_floor<Tz: TimeZone>(at: &DateTime<Tz>) -> DateTime<Tz> {
    let into_hour = TimeDelta::minutes(i64::from(at.minute()))
        + TimeDelta::seconds(i64::from(at.second()))
        + TimeDelta::nanoseconds(i64::from(at.nanosecond()));
    at.clone() - into_hour
}

/// The next local instant strictly after `at` whose minute and second are zero.
pub fn next_top_of_hour<Tz: TimeZone>(at: &DateTime<Tz>) -> DateTime<Tz> {
    hour_floor(at) + TimeDelta::hours(1)
}

/// Top-of-hour instants for the `hours` hours before `at`, oldest first.
///
/// # Arguments
///
/// * `at` - Reference instant; the hour containing it is not included
/// * `hours` - Number of past hours
///
/// # Returns
///
/// `hours` instants in `at`'s zone, one hour apart.
pub fn past_hours<Tz: TimeZone>(at: &DateTime<Tz>, hours: u32) -> Vec<DateTime<Tz>> {
    let current = hour_floor(at);
    (1..=i64::from(hours))
        .rev()
        .map(|back| current.clone() - TimeDelta::hours(back))
        .collect()
}

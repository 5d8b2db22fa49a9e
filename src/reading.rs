//! The persisted TOU reading.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};

use crate::tariff::ConsumerCategory;

/// One published rate: the document appended to the time-series store.
///
/// Serializes as
/// `{"category":"INDUSTRIAL","rate":13.34,"timestamp":"2024-06-01T14:00:00.000Z"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TouReading {
    pub category: ConsumerCategory,
    /// Rate per kWh, rounded to two decimals.
    pub rate: f64,
    #[serde(serialize_with = "serialize_millis")]
    pub timestamp: DateTime<Utc>,
}

impl TouReading {
    pub const fn new(category: ConsumerCategory, rate: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            category,
            rate,
            timestamp,
        }
    }

    /// Timestamp in ISO-8601 with milliseconds and a `Z` suffix.
    pub fn timestamp_iso(&self) -> String {
        iso_millis(&self.timestamp)
    }
}

pub fn iso_millis(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn serialize_millis<S: Serializer>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&iso_millis(at))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn serializes_wire_shape() {
        let at = Utc.with_ymd_and_hms(2024, 6, 1, 14, 0, 0).unwrap();
        let reading = TouReading::new(ConsumerCategory::Industrial, 13.34, at);
        let json = serde_json::to_value(&reading).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "category": "INDUSTRIAL",
                "rate": 13.34,
                "timestamp": "2024-06-01T14:00:00.000Z",
            })
        );
    }

    #[test]
    fn parses_wire_shape_back() {
        let line = r#"{"category":"NON_DOMESTIC","rate":9.87,"timestamp":"2024-01-05T03:00:00.000Z"}"#;
        let reading: TouReading = serde_json::from_str(line).unwrap();
        assert_eq!(reading.category, ConsumerCategory::NonDomestic);
        assert_eq!(reading.rate, 9.87);
        assert_eq!(reading.timestamp_iso(), "2024-01-05T03:00:00.000Z");
    }
}

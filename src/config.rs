//! TOML-based service configuration.

use std::fs;
use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::tariff::{ConsumerCategory, PricingModel};

/// Top-level configuration parsed from TOML.
///
/// All sections have defaults matching the built-in tariff. Load from TOML
/// with [`AppConfig::from_toml_file`] or use [`AppConfig::default`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Firing schedule and time zone.
    #[serde(default)]
    pub schedule: ScheduleConfig,
    /// Where readings are appended.
    #[serde(default)]
    pub sink: SinkConfig,
    /// Rate table and modifier constants.
    #[serde(default)]
    pub pricing: PricingModel,
}

/// Firing schedule parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScheduleConfig {
    /// Collection readings are appended to.
    pub collection: String,
    /// IANA zone whose wall clock decides hour, weekday and season.
    pub timezone: String,
    /// Fire once immediately when the service starts.
    pub run_at_startup: bool,
    /// Makes every firing reproducible: the firing's RNG is seeded with
    /// `seed + unix seconds of the firing`.
    pub seed: Option<u64>,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            collection: "tou-rates".to_string(),
            timezone: "Asia/Kolkata".to_string(),
            run_at_startup: true,
            seed: None,
        }
    }
}

/// Reading store selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SinkConfig {
    /// Append-only JSON-lines files, one per collection.
    Jsonl {
        #[serde(default = "default_jsonl_dir")]
        dir: PathBuf,
    },
    /// Cloud Firestore through its REST API.
    Firestore(FirestoreConfig),
    /// Print each reading as a JSON line on stdout.
    Stdout,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self::Jsonl {
            dir: default_jsonl_dir(),
        }
    }
}

fn default_jsonl_dir() -> PathBuf {
    PathBuf::from("data")
}

/// Firestore connection settings. Unset values are read from the environment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FirestoreConfig {
    /// Falls back to `FIREBASE_PROJECT_ID`, then `NEXT_PUBLIC_FIREBASE_PROJECT_ID`.
    pub project_id: Option<String>,
    /// Falls back to `FIREBASE_API_KEY`, then `NEXT_PUBLIC_FIREBASE_API_KEY`.
    pub api_key: Option<String>,
    /// Defaults to `https://firestore.googleapis.com`.
    pub base_url: Option<String>,
    /// Defaults to `(default)`.
    pub database: Option<String>,
}

impl AppConfig {
    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("config", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Parsed [`ScheduleConfig::timezone`].
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` for an unknown zone name.
    pub fn timezone(&self) -> Result<Tz, ConfigError> {
        self.schedule.timezone.parse::<Tz>().map_err(|e| {
            ConfigError::new(
                "schedule.timezone",
                format!("unknown time zone \"{}\": {e}", self.schedule.timezone),
            )
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let s = &self.schedule;
        if s.collection.trim().is_empty() || s.collection.contains('/') {
            errors.push(ConfigError::new(
                "schedule.collection",
                "must be non-empty and must not contain '/'",
            ));
        }
        if let Err(e) = self.timezone() {
            errors.push(e);
        }

        if let SinkConfig::Firestore(fs) = &self.sink {
            for (field, value) in [
                ("sink.project_id", &fs.project_id),
                ("sink.api_key", &fs.api_key),
                ("sink.database", &fs.database),
            ] {
                if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                    errors.push(ConfigError::new(field, "must not be empty when set"));
                }
            }
        }

        validate_pricing(&self.pricing, &mut errors);
        errors
    }
}

fn positive(errors: &mut Vec<ConfigError>, field: &str, value: f64) {
    if !(value > 0.0 && value.is_finite()) {
        errors.push(ConfigError::new(field, format!("must be > 0, got {value}")));
    }
}

fn validate_pricing(p: &PricingModel, errors: &mut Vec<ConfigError>) {
    positive(errors, "pricing.fallback_rate", p.fallback_rate);
    if !(0.0..1.0).contains(&p.jitter) {
        errors.push(ConfigError::new(
            "pricing.jitter",
            format!("must be in [0.0, 1.0), got {}", p.jitter),
        ));
    }

    positive(errors, "pricing.seasons.summer", p.seasons.summer);
    positive(errors, "pricing.seasons.monsoon", p.seasons.monsoon);
    positive(errors, "pricing.seasons.winter", p.seasons.winter);
    positive(errors, "pricing.demand.weekday", p.demand.weekday);
    positive(errors, "pricing.demand.weekend", p.demand.weekend);
    positive(errors, "pricing.peak.peak_multiplier", p.peak.peak_multiplier);
    positive(errors, "pricing.peak.off_peak_multiplier", p.peak.off_peak_multiplier);

    for (field, hours) in [
        ("pricing.peak.peak_hours", &p.peak.peak_hours),
        ("pricing.peak.off_peak_hours", &p.peak.off_peak_hours),
    ] {
        if let Some(bad) = hours.iter().find(|h| **h >= 24) {
            errors.push(ConfigError::new(field, format!("hour {bad} is not in 0–23")));
        }
    }

    if p.surcharges.is_empty() {
        errors.push(ConfigError::new(
            "pricing.surcharges",
            "at least one surcharge is required",
        ));
    }
    for (i, surcharge) in p.surcharges.iter().enumerate() {
        positive(errors, &format!("pricing.surcharges[{i}].factor"), surcharge.factor);
        if surcharge.name.trim().is_empty() {
            errors.push(ConfigError::new(
                format!("pricing.surcharges[{i}].name"),
                "must not be empty",
            ));
        }
    }

    for category in ConsumerCategory::ALL {
        for problem in p.rates.coverage_problems(category) {
            errors.push(ConfigError::new(format!("pricing.rates.{category}"), problem));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = AppConfig::default();
        let errors = cfg.validate();
        assert!(errors.is_empty(), "default should be valid: {errors:?}");
        assert_eq!(cfg.schedule.collection, "tou-rates");
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[schedule]
collection = "rates"
timezone = "Europe/Prague"
run_at_startup = false
seed = 7

[sink]
kind = "firestore"
project_id = "solar-dash"
api_key = "k"

[pricing]
fallback_rate = 4.0
jitter = 0.02

[pricing.seasons]
summer = 1.2

[[pricing.surcharges]]
name = "fuel"
factor = 1.03

[pricing.rates]
DOMESTIC = [
    { start_hour = 0, end_hour = 12, base_rate = 3.0, variation = 0.2 },
    { start_hour = 12, end_hour = 24, base_rate = 6.0, variation = 0.4 },
]
INDUSTRIAL = [{ start_hour = 0, end_hour = 24, base_rate = 7.0, variation = 0.5 }]
NON_DOMESTIC = [{ start_hour = 0, end_hour = 24, base_rate = 8.0, variation = 0.5 }]
"#;
        let cfg = AppConfig::from_toml_str(toml);
        assert!(cfg.is_ok(), "valid TOML should parse: {:?}", cfg.err());
        let cfg = cfg.unwrap();
        assert!(cfg.validate().is_empty());
        assert_eq!(cfg.schedule.seed, Some(7));
        assert!(!cfg.schedule.run_at_startup);
        assert_eq!(cfg.pricing.seasons.summer, 1.2);
        // untouched season keeps its default
        assert_eq!(cfg.pricing.seasons.winter, 0.9);
        assert_eq!(cfg.pricing.surcharges.len(), 1);
        assert_eq!(cfg.pricing.rates.domestic.len(), 2);
        assert!(matches!(
            cfg.sink,
            SinkConfig::Firestore(FirestoreConfig { ref project_id, .. })
                if project_id.as_deref() == Some("solar-dash")
        ));
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let toml = r#"
[schedule]
seed = 99
"#;
        let cfg = AppConfig::from_toml_str(toml).unwrap();
        assert_eq!(cfg.schedule.seed, Some(99));
        assert_eq!(cfg.schedule.timezone, "Asia/Kolkata");
        assert_eq!(cfg.pricing, PricingModel::default());
        assert_eq!(cfg.sink, SinkConfig::default());
    }

    #[test]
    fn jsonl_sink_dir_defaults() {
        let cfg = AppConfig::from_toml_str("[sink]\nkind = \"jsonl\"\n").unwrap();
        assert_eq!(
            cfg.sink,
            SinkConfig::Jsonl {
                dir: PathBuf::from("data")
            }
        );
    }

    #[test]
    fn unknown_field_is_rejected() {
        let toml = r#"
[schedule]
collection = "tou-rates"
bogus_field = true
"#;
        assert!(AppConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn validation_catches_bad_timezone() {
        let mut cfg = AppConfig::default();
        cfg.schedule.timezone = "Mars/Olympus".to_string();
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "schedule.timezone"));
    }

    #[test]
    fn validation_catches_rate_gap() {
        let mut cfg = AppConfig::default();
        cfg.pricing.rates.domestic.remove(2);
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "pricing.rates.DOMESTIC"));
    }

    #[test]
    fn validation_catches_bad_multipliers() {
        let mut cfg = AppConfig::default();
        cfg.pricing.jitter = 1.5;
        cfg.pricing.seasons.winter = 0.0;
        cfg.pricing.peak.peak_hours.push(24);
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "pricing.jitter"));
        assert!(errors.iter().any(|e| e.field == "pricing.seasons.winter"));
        assert!(errors.iter().any(|e| e.field == "pricing.peak.peak_hours"));
    }

    #[test]
    fn empty_surcharge_list_is_rejected() {
        let cfg = AppConfig::from_toml_str("[pricing]\nsurcharges = []\n").unwrap();
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "pricing.surcharges"));
    }

    #[test]
    fn empty_exempt_list_keeps_domestic_off_peak_pricing() {
        let cfg = AppConfig::from_toml_str("[pricing]\npeak_exempt = []\n").unwrap();
        assert!(cfg.validate().is_empty());
        assert!(cfg.pricing.is_peak_exempt(ConsumerCategory::Domestic));

        let quote = |hour| {
            cfg.pricing.quote(
                crate::tariff::RateContext {
                    category: ConsumerCategory::Domestic,
                    hour,
                    season: crate::tariff::Season::Summer,
                    weekend: false,
                },
                &mut crate::tariff::FixedDraws::new(vec![0.5, 0.25, 0.5]),
            )
        };
        // 12 and 14 share a band; 14 is a peak hour
        assert_eq!(quote(12), quote(14));
    }

    #[test]
    fn validation_catches_bad_collection() {
        let mut cfg = AppConfig::default();
        cfg.schedule.collection = "a/b".to_string();
        assert!(
            cfg.validate()
                .iter()
                .any(|e| e.field == "schedule.collection")
        );
    }
}

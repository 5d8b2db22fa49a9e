//! Consumer categories and calendar seasons.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Tariff class a rate is published for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConsumerCategory {
    Domestic,
    Industrial,
    NonDomestic,
}

impl ConsumerCategory {
    /// Every category, in the order the scheduler generates them.
    pub const ALL: [Self; 3] = [Self::Domestic, Self::Industrial, Self::NonDomestic];

    /// Upper snake case name used on the wire.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Domestic => "DOMESTIC",
            Self::Industrial => "INDUSTRIAL",
            Self::NonDomestic => "NON_DOMESTIC",
        }
    }
}

impl fmt::Display for ConsumerCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConsumerCategory {
    type Err = String;

    /// Accepts the wire name in any case, with `-` or `_` separators.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == normalized)
            .ok_or_else(|| {
                format!("unknown category \"{s}\", expected DOMESTIC, INDUSTRIAL or NON_DOMESTIC")
            })
    }
}

/// Pricing season derived from the calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Season {
    Summer,
    Monsoon,
    Winter,
}

impl Season {
    /// Maps a 1-indexed month (`1` = January) to its season.
    ///
    /// April–June is summer, July–October monsoon, everything else winter.
    pub const fn from_month(month: u32) -> Self {
        match month {
            4..=6 => Self::Summer,
            7..=10 => Self::Monsoon,
            _ => Self::Winter,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Summer => "SUMMER",
            Self::Monsoon => "MONSOON",
            Self::Winter => "WINTER",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_month_has_exactly_one_season() {
        let seasons: Vec<Season> = (1..=12).map(Season::from_month).collect();
        assert_eq!(
            seasons,
            vec![
                Season::Winter,
                Season::Winter,
                Season::Winter,
                Season::Summer,
                Season::Summer,
                Season::Summer,
                Season::Monsoon,
                Season::Monsoon,
                Season::Monsoon,
                Season::Monsoon,
                Season::Winter,
                Season::Winter,
            ]
        );
    }

    #[test]
    fn category_parses_loosely() {
        assert_eq!("domestic".parse::<ConsumerCategory>(), Ok(ConsumerCategory::Domestic));
        assert_eq!("non-domestic".parse::<ConsumerCategory>(), Ok(ConsumerCategory::NonDomestic));
        assert_eq!("INDUSTRIAL".parse::<ConsumerCategory>(), Ok(ConsumerCategory::Industrial));
        assert!("farm".parse::<ConsumerCategory>().is_err());
    }

    #[test]
    fn category_serializes_as_wire_name() {
        let json = serde_json::to_string(&ConsumerCategory::NonDomestic).unwrap();
        assert_eq!(json, "\"NON_DOMESTIC\"");
        assert_eq!(ConsumerCategory::NonDomestic.to_string(), "NON_DOMESTIC");
    }
}

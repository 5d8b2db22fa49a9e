use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tou_rates::tariff::ConsumerCategory;

/// Time-of-use electricity rate synthesizer.
#[derive(Debug, Parser)]
#[command(name = "tou-rates", version, about)]
pub struct Cli {
    /// TOML configuration file; built-in defaults when omitted.
    #[arg(long, short, global = true, env = "TOU_RATES_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the random seed (makes firings reproducible).
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Print readings to stdout instead of the configured store.
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Debug logging for this crate.
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fire now and at the top of every hour until interrupted (default).
    Run,

    /// Fire once and exit.
    Once,

    /// Print the hour-by-hour rates of one day without storing anything.
    Preview {
        /// Local calendar date (YYYY-MM-DD); today when omitted.
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Restrict to one category.
        #[arg(long)]
        category: Option<ConsumerCategory>,

        /// Also write the rows to this CSV file.
        #[arg(long)]
        csv_out: Option<PathBuf>,
    },

    /// Store one reading per category for each of the past hours.
    Backfill {
        #[arg(long, default_value_t = 24)]
        hours: u32,
    },

    /// Serve recent readings from the JSON-lines store over HTTP.
    #[cfg(feature = "api")]
    Serve {
        #[arg(long, default_value_t = 3000)]
        port: u16,
    },
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_means_run() {
        let cli = Cli::try_parse_from(["tou-rates"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.dry_run);
    }

    #[test]
    fn preview_arguments_parse() {
        let cli = Cli::try_parse_from([
            "tou-rates",
            "preview",
            "--date",
            "2024-06-01",
            "--category",
            "industrial",
            "--seed",
            "7",
        ])
        .unwrap();
        assert_eq!(cli.seed, Some(7));
        match cli.command {
            Some(Command::Preview { date, category, csv_out }) => {
                assert_eq!(date, NaiveDate::from_ymd_opt(2024, 6, 1));
                assert_eq!(category, Some(ConsumerCategory::Industrial));
                assert!(csv_out.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn backfill_defaults_to_a_day() {
        let cli = Cli::try_parse_from(["tou-rates", "backfill"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Backfill { hours: 24 })));
    }

    #[test]
    fn bad_category_is_rejected() {
        assert!(Cli::try_parse_from(["tou-rates", "preview", "--category", "farm"]).is_err());
    }
}

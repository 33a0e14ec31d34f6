//! Command-line interface definition for bablwatch
//!
//! This module defines the CLI structure using clap's derive API,
//! providing the watch command that tails the journal log topic.

use clap::{Parser, Subcommand};

/// Bablwatch - Kafka journal log watcher
///
/// Tail the journal log topic and raise alerts when module executions
/// fail, are canceled, or time out.
#[derive(Parser, Debug, Clone)]
#[command(name = "bablwatch")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for bablwatch
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Watch the journal log topic and alert on module failures
    Watch {
        /// Comma-separated list of Kafka broker addresses
        #[arg(short, long)]
        brokers: String,

        /// Raise log verbosity from info to debug
        #[arg(short, long)]
        debug: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    ///
    /// # Returns
    ///
    /// Returns the parsed CLI structure
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_watch_command() {
        let cli = Cli::try_parse_from(["bablwatch", "watch", "--brokers", "localhost:9092"]);
        assert!(cli.is_ok());
        let cli = cli.unwrap();
        if let Commands::Watch { brokers, debug } = cli.command {
            assert_eq!(brokers, "localhost:9092");
            assert!(!debug);
        } else {
            panic!("Expected Watch command");
        }
    }

    #[test]
    fn test_cli_parse_watch_with_debug() {
        let cli = Cli::try_parse_from([
            "bablwatch",
            "watch",
            "--brokers",
            "kafka1.prod:9092,kafka2.prod:9092",
            "--debug",
        ]);
        assert!(cli.is_ok());
        let cli = cli.unwrap();
        if let Commands::Watch { brokers, debug } = cli.command {
            assert_eq!(brokers, "kafka1.prod:9092,kafka2.prod:9092");
            assert!(debug);
        } else {
            panic!("Expected Watch command");
        }
    }

    #[test]
    fn test_cli_parse_watch_short_flags() {
        let cli = Cli::try_parse_from(["bablwatch", "watch", "-b", "localhost:9092", "-d"]);
        assert!(cli.is_ok());
        let cli = cli.unwrap();
        if let Commands::Watch { brokers, debug } = cli.command {
            assert_eq!(brokers, "localhost:9092");
            assert!(debug);
        } else {
            panic!("Expected Watch command");
        }
    }

    #[test]
    fn test_cli_parse_watch_requires_brokers() {
        let cli = Cli::try_parse_from(["bablwatch", "watch"]);
        assert!(cli.is_err());
    }

    #[test]
    fn test_cli_parse_missing_command() {
        let cli = Cli::try_parse_from(["bablwatch"]);
        assert!(cli.is_err());
    }

    #[test]
    fn test_cli_parse_invalid_command() {
        let cli = Cli::try_parse_from(["bablwatch", "invalid"]);
        assert!(cli.is_err());
    }
}

//! Command-line interface handling for the lobby server.
//!
//! This module provides command-line argument parsing using the `clap`
//! crate. Every option overrides the matching configuration file setting.

use clap::{value_parser, Arg, ArgMatches, Command};
use std::ffi::OsString;
use std::path::PathBuf;

/// Command line arguments parsed from user input.
#[derive(Debug, Clone, PartialEq)]
pub struct CliArgs {
    /// Path to the configuration file
    pub config_path: PathBuf,
    /// Optional override for log level
    pub log_level: Option<String>,
    /// Whether to force JSON log output
    pub json_logs: bool,
    /// Optional override for the per-player inbox capacity
    pub inbox_capacity: Option<usize>,
    /// Optional override for the broadcast delivery timeout
    pub delivery_timeout_ms: Option<u64>,
    /// Whether to admit several players with the same name
    pub allow_duplicate_names: bool,
}

impl CliArgs {
    /// Parses the process arguments.
    ///
    /// Exits the process with a usage message if the arguments are invalid,
    /// as clap does for `--help` and `--version`.
    pub fn parse() -> Self {
        Self::from_matches(&command().get_matches())
    }

    /// Parses arguments from an explicit iterator.
    pub fn try_parse_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = command().try_get_matches_from(args)?;
        Ok(Self::from_matches(&matches))
    }

    fn from_matches(matches: &ArgMatches) -> Self {
        Self {
            config_path: matches
                .get_one::<PathBuf>("config")
                .cloned()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH)),
            log_level: matches.get_one::<String>("log-level").cloned(),
            json_logs: matches.get_flag("json-logs"),
            inbox_capacity: matches.get_one::<usize>("inbox-capacity").copied(),
            delivery_timeout_ms: matches.get_one::<u64>("delivery-timeout-ms").copied(),
            allow_duplicate_names: matches.get_flag("allow-duplicate-names"),
        }
    }
}

const DEFAULT_CONFIG_PATH: &str = "lobby.toml";

fn command() -> Command {
    Command::new("Lobby Server")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Player session registry with an interactive console")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .value_parser(value_parser!(PathBuf))
                .default_value(DEFAULT_CONFIG_PATH),
        )
        .arg(
            Arg::new("log-level")
                .short('l')
                .long("log-level")
                .value_name("LEVEL")
                .help("Log level (trace, debug, info, warn, error)"),
        )
        .arg(
            Arg::new("json-logs")
                .long("json-logs")
                .help("Output logs in JSON format")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("inbox-capacity")
                .long("inbox-capacity")
                .value_name("MESSAGES")
                .help("Number of messages each player inbox can hold")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("delivery-timeout-ms")
                .long("delivery-timeout-ms")
                .value_name("MILLIS")
                .help("How long a broadcast waits on a full inbox before skipping it")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new("allow-duplicate-names")
                .long("allow-duplicate-names")
                .help("Admit several players with the same name")
                .action(clap::ArgAction::SetTrue),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = CliArgs::try_parse_from(["lobby"]).unwrap();
        assert_eq!(args.config_path, PathBuf::from("lobby.toml"));
        assert_eq!(args.log_level, None);
        assert!(!args.json_logs);
        assert_eq!(args.inbox_capacity, None);
        assert!(!args.allow_duplicate_names);
    }

    #[test]
    fn test_overrides() {
        let args = CliArgs::try_parse_from([
            "lobby",
            "-c",
            "custom.toml",
            "--log-level",
            "debug",
            "--json-logs",
            "--inbox-capacity",
            "16",
            "--delivery-timeout-ms",
            "250",
            "--allow-duplicate-names",
        ])
        .unwrap();

        assert_eq!(args.config_path, PathBuf::from("custom.toml"));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert!(args.json_logs);
        assert_eq!(args.inbox_capacity, Some(16));
        assert_eq!(args.delivery_timeout_ms, Some(250));
        assert!(args.allow_duplicate_names);
    }

    #[test]
    fn test_rejects_non_numeric_capacity() {
        assert!(CliArgs::try_parse_from(["lobby", "--inbox-capacity", "lots"]).is_err());
    }
}

//! Command-line interface handling for the Overseer host session.

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;

/// Command line arguments overriding configuration file settings.
#[derive(Debug, Clone, PartialEq)]
pub struct CliArgs {
    /// Path to the configuration file
    pub config_path: PathBuf,
    /// Optional override for log level
    pub log_level: Option<String>,
    /// Whether to force JSON log output
    pub json_logs: bool,
    /// Optional override for the number of simulated ticks
    pub ticks: Option<u64>,
    /// Whether to force the sticky denial policy on every bus
    pub sticky_denials: bool,
}

impl CliArgs {
    pub fn command() -> Command {
        Command::new("Overseer")
            .version(env!("CARGO_PKG_VERSION"))
            .about("Event bus and surrogate host for game server extensions")
            .arg(
                Arg::new("config")
                    .short('c')
                    .long("config")
                    .value_name("FILE")
                    .help("Configuration file path")
                    .default_value("config.toml"),
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
                    .action(ArgAction::SetTrue),
            )
            .arg(
                Arg::new("ticks")
                    .short('t')
                    .long("ticks")
                    .value_name("COUNT")
                    .help("Number of host ticks to simulate before shutting down")
                    .value_parser(value_parser!(u64)),
            )
            .arg(
                Arg::new("sticky-denials")
                    .long("sticky-denials")
                    .help("Once a handler denies an event, later handlers cannot re-allow it")
                    .action(ArgAction::SetTrue),
            )
    }

    /// Parses the process arguments, exiting with usage on error.
    pub fn parse() -> Self {
        Self::from_matches(&Self::command().get_matches())
    }

    pub fn try_parse_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Ok(Self::from_matches(&Self::command().try_get_matches_from(args)?))
    }

    fn from_matches(matches: &ArgMatches) -> Self {
        Self {
            config_path: matches
                .get_one::<String>("config")
                .map_or_else(|| PathBuf::from("config.toml"), PathBuf::from),
            log_level: matches.get_one::<String>("log-level").cloned(),
            json_logs: matches.get_flag("json-logs"),
            ticks: matches.get_one::<u64>("ticks").copied(),
            sticky_denials: matches.get_flag("sticky-denials"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = CliArgs::try_parse_from(["overseer"]).unwrap();
        assert_eq!(args.config_path, PathBuf::from("config.toml"));
        assert_eq!(args.log_level, None);
        assert!(!args.json_logs);
        assert_eq!(args.ticks, None);
        assert!(!args.sticky_denials);
    }

    #[test]
    fn test_overrides() {
        let args = CliArgs::try_parse_from([
            "overseer",
            "--config",
            "round.toml",
            "-l",
            "debug",
            "--json-logs",
            "--ticks",
            "12",
            "--sticky-denials",
        ])
        .unwrap();

        assert_eq!(args.config_path, PathBuf::from("round.toml"));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert!(args.json_logs);
        assert_eq!(args.ticks, Some(12));
        assert!(args.sticky_denials);
    }

    #[test]
    fn test_rejects_non_numeric_ticks() {
        assert!(CliArgs::try_parse_from(["overseer", "--ticks", "many"]).is_err());
    }
}

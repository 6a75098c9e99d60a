//! Command-line configuration

use crate::error::ConfigError;
use clap::Parser;
use std::path::PathBuf;

pub const DEFAULT_AVATAR_BASE: &str = "https://i.pravatar.cc/48";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Parser, Debug)]
#[command(name = "friendsplit")]
#[command(about = "Split bills with friends and keep track of who owes whom", long_about = None)]
pub struct Args {
    /// Avatar URL prefix for seed friends and the add-friend form
    #[arg(long, env = "FRIENDSPLIT_AVATAR_BASE", default_value = DEFAULT_AVATAR_BASE)]
    pub avatar_base: String,

    /// Currency symbol shown in front of amounts
    #[arg(long, default_value = "₹")]
    pub currency: String,

    /// Start with no friends instead of the sample ones
    #[arg(long)]
    pub empty: bool,

    /// Print friends and balances without starting the TUI
    #[arg(long)]
    pub list: bool,

    /// Log file (defaults to friendsplit.log in the temp directory)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub avatar_base: String,
    pub currency: String,
    pub seed: bool,
    pub list_only: bool,
    pub log_file: PathBuf,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            avatar_base: DEFAULT_AVATAR_BASE.to_string(),
            currency: "₹".to_string(),
            seed: true,
            list_only: false,
            log_file: default_log_file(),
            log_level: "info".to_string(),
        }
    }
}

impl TryFrom<Args> for Config {
    type Error = ConfigError;

    fn try_from(args: Args) -> Result<Self, Self::Error> {
        let avatar_base = args.avatar_base.trim().to_string();
        if avatar_base.is_empty() {
            return Err(ConfigError::EmptyAvatarBase);
        }
        if args.currency.is_empty() {
            return Err(ConfigError::EmptyCurrency);
        }

        let log_level = args.log_level.to_lowercase();
        if !LOG_LEVELS.contains(&log_level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(args.log_level));
        }

        Ok(Self {
            avatar_base,
            currency: args.currency,
            seed: !args.empty,
            list_only: args.list,
            log_file: args.log_file.unwrap_or_else(default_log_file),
            log_level,
        })
    }
}

fn default_log_file() -> PathBuf {
    std::env::temp_dir().join("friendsplit.log")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(argv: &[&str]) -> Result<Config, ConfigError> {
        let args = Args::try_parse_from(std::iter::once("friendsplit").chain(argv.iter().copied()))
            .expect("args parse");
        Config::try_from(args)
    }

    #[test]
    fn defaults() {
        let config = parse(&["--avatar-base", DEFAULT_AVATAR_BASE]).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn flags_map_onto_config() {
        let config = parse(&[
            "--avatar-base",
            " https://example.com/48 ",
            "--currency",
            "$",
            "--empty",
            "--list",
            "--log-file",
            "/tmp/split.log",
            "--log-level",
            "DEBUG",
        ])
        .unwrap();

        assert_eq!(config.avatar_base, "https://example.com/48");
        assert_eq!(config.currency, "$");
        assert!(!config.seed);
        assert!(config.list_only);
        assert_eq!(config.log_file, PathBuf::from("/tmp/split.log"));
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn rejects_blank_values() {
        assert_eq!(parse(&["--avatar-base", "  "]), Err(ConfigError::EmptyAvatarBase));
        assert_eq!(
            parse(&["--avatar-base", DEFAULT_AVATAR_BASE, "--currency", ""]),
            Err(ConfigError::EmptyCurrency)
        );
    }

    #[test]
    fn rejects_unknown_log_level() {
        assert_eq!(
            parse(&["--avatar-base", DEFAULT_AVATAR_BASE, "--log-level", "loud"]),
            Err(ConfigError::InvalidLogLevel("loud".to_string()))
        );
    }
}

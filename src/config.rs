//! Configuration and CLI argument handling

use clap::Parser;

use crate::state::Settings;

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "focus-timer")]
#[command(about = "A state-managed HTTP server for a work/break focus timer")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Break time is work time divided by this number
    #[arg(short, long, default_value = "5", value_parser = clap::value_parser!(u64).range(1..))]
    pub divisor: u64,

    /// Music URL handed to the player (YouTube or Spotify)
    #[arg(short, long, default_value = "")]
    pub music_url: String,

    /// Background darkness in percent
    #[arg(short, long, default_value = "10", value_parser = clap::value_parser!(u8).range(0..=100))]
    pub background_darkness: u8,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Initial settings taken from the command line
    pub fn settings(&self) -> Settings {
        Settings::new(self.music_url.clone(), self.background_darkness)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["focus-timer"]).unwrap();
        assert_eq!(config.port, 20554);
        assert_eq!(config.divisor, 5);
        assert_eq!(config.background_darkness, 10);
        assert_eq!(config.address(), "0.0.0.0:20554");
        assert_eq!(config.log_level(), "info");
        assert!(config.settings().music_url.is_empty());
    }

    #[test]
    fn test_divisor_must_be_positive() {
        assert!(Config::try_parse_from(["focus-timer", "--divisor", "0"]).is_err());
        let config = Config::try_parse_from(["focus-timer", "-d", "3", "-v"]).unwrap();
        assert_eq!(config.divisor, 3);
        assert_eq!(config.log_level(), "debug");
    }

    #[test]
    fn test_darkness_range() {
        assert!(Config::try_parse_from(["focus-timer", "--background-darkness", "101"]).is_err());
    }
}

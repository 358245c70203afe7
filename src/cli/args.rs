//! CLI argument definitions
//!
//! Global CLI options and configuration merging logic.

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::{Config, ConfigColorMode};

use super::commands::Commands;

#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq)]
pub(crate) enum ColorMode {
    /// Auto-detect based on terminal (default)
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

#[derive(Parser)]
#[command(name = "legalqa")]
#[command(about = "Legal Q&A and knowledge-base client", version)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Commands,

    /// API base URL (e.g., "http://localhost:8080/api")
    #[arg(long, global = true, value_name = "URL")]
    pub(crate) base_url: Option<String>,

    /// Streaming answer endpoint (defaults to <base-url>/qa/ask/stream)
    #[arg(long, global = true, value_name = "URL")]
    pub(crate) stream_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub(crate) timeout: Option<u64>,

    /// Session storage file
    #[arg(long, global = true, value_name = "PATH")]
    pub(crate) storage: Option<PathBuf>,

    /// Output raw response data as JSON
    #[arg(short, long, global = true)]
    pub(crate) json: bool,

    /// Color output mode
    #[arg(long, global = true, value_enum, default_value = "auto")]
    pub(crate) color: ColorMode,

    /// Disable colored output (shorthand for --color=never)
    #[arg(long, global = true)]
    pub(crate) no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub(crate) debug: bool,
}

impl Cli {
    /// Merge config file values into CLI (CLI args take precedence)
    pub(crate) fn with_config(mut self, config: &Config) -> Self {
        if self.base_url.is_none() {
            self.base_url = config.base_url.clone();
        }
        if self.stream_url.is_none() {
            self.stream_url = config.stream_url.clone();
        }
        if self.timeout.is_none() {
            self.timeout = config.timeout_secs;
        }
        if self.storage.is_none() {
            self.storage = config.storage_path.clone();
        }

        if let Some(color) = config.color
            && self.color == ColorMode::Auto
        {
            self.color = match color {
                ConfigColorMode::Auto => ColorMode::Auto,
                ConfigColorMode::Always => ColorMode::Always,
                ConfigColorMode::Never => ColorMode::Never,
            };
        }

        self
    }

    /// Effective endpoint settings after merging
    pub(crate) fn endpoints(&self) -> Config {
        Config {
            base_url: self.base_url.clone(),
            stream_url: self.stream_url.clone(),
            timeout_secs: self.timeout,
            storage_path: self.storage.clone(),
            color: None,
        }
    }

    pub(crate) fn use_color(&self) -> bool {
        if self.no_color {
            return false;
        }
        match self.color {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => std::io::stdout().is_terminal(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("legalqa").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn cli_flags_override_config() {
        let config: Config = toml::from_str(
            r#"
            base_url = "http://from-config/api"
            timeout_secs = 30
            "#,
        )
        .unwrap();
        let cli = parse(&["--base-url", "http://from-cli/api", "whoami"]).with_config(&config);
        let endpoints = cli.endpoints();
        assert_eq!(endpoints.base_url(), "http://from-cli/api");
        assert_eq!(endpoints.timeout().as_secs(), 30);
    }

    #[test]
    fn config_color_applies_when_cli_is_auto() {
        let config: Config = toml::from_str(r#"color = "never""#).unwrap();
        let cli = parse(&["whoami"]).with_config(&config);
        assert_eq!(cli.color, ColorMode::Never);
        assert!(!cli.use_color());

        let cli = parse(&["--color", "always", "whoami"]).with_config(&config);
        assert!(cli.use_color());
    }

    #[test]
    fn no_color_wins() {
        let cli = parse(&["--color", "always", "--no-color", "logout"]);
        assert!(!cli.use_color());
    }
}

use clap::{ArgAction, Parser};
use tracing::info;

use crate::env::{ConfigSource, EnvVars, LoadedEnv};
use crate::error::BuildError;

pub const ABLY_API_KEY: &str = "ABLY_API_KEY";
pub const GA4_MEASUREMENT_ID: &str = "GA4_MEASUREMENT_ID";

/// Example values shipped in `.env.example`.
pub const ABLY_API_KEY_PLACEHOLDER: &str = "your_ably_api_key_here";
pub const GA4_MEASUREMENT_ID_PLACEHOLDER: &str = "G-XXXXXXXXXX";

const DEFAULT_LOG_FILTER: &str = "jam_session_build=info";

#[derive(Debug, Parser)]
#[command(
    name = "jam-session-build",
    version,
    about = "Generate the Jam Session HTML pages from their templates.",
    long_about = "Reads ABLY_API_KEY and GA4_MEASUREMENT_ID from the environment, \
                  or from a .env file in the working directory, and writes host.html, \
                  play.html and index.html from the templates next to it."
)]
pub struct Cli {
    /// Increase log verbosity (-v for debug, -vv for trace).
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Only report errors.
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Filter directive for the log subscriber, or `None` to defer to
    /// `RUST_LOG` and the default.
    pub fn log_filter(&self) -> Option<&'static str> {
        if self.quiet {
            return Some("error");
        }
        match self.verbose {
            0 => None,
            1 => Some("jam_session_build=debug"),
            _ => Some("jam_session_build=trace"),
        }
    }

    pub fn default_log_filter() -> &'static str {
        DEFAULT_LOG_FILTER
    }
}

/// Configuration that passed validation and is ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    vars: EnvVars,
    source: ConfigSource,
    analytics_enabled: bool,
}

impl BuildConfig {
    pub fn validate(loaded: LoadedEnv) -> Result<Self, BuildError> {
        let LoadedEnv { mut vars, source } = loaded;

        let api_key = vars.get(ABLY_API_KEY).ok_or(BuildError::MissingKey {
            key: ABLY_API_KEY,
        })?;
        if api_key == ABLY_API_KEY_PLACEHOLDER {
            return Err(BuildError::PlaceholderValue { key: ABLY_API_KEY });
        }
        if api_key.trim().is_empty() {
            return Err(BuildError::EmptyValue { key: ABLY_API_KEY });
        }
        info!("Found {}", ABLY_API_KEY);

        let analytics_enabled = vars
            .get(GA4_MEASUREMENT_ID)
            .is_some_and(|id| id != GA4_MEASUREMENT_ID_PLACEHOLDER);
        if analytics_enabled {
            info!("Found {} (analytics enabled)", GA4_MEASUREMENT_ID);
        } else {
            info!("{} not set (analytics disabled)", GA4_MEASUREMENT_ID);
            // Keeps the token substituted so no raw placeholder reaches the page.
            vars.insert(GA4_MEASUREMENT_ID.to_owned(), String::new());
        }

        Ok(Self {
            vars,
            source,
            analytics_enabled,
        })
    }

    pub fn vars(&self) -> &EnvVars {
        &self.vars
    }

    pub fn source(&self) -> ConfigSource {
        self.source
    }

    pub fn analytics_enabled(&self) -> bool {
        self.analytics_enabled
    }
}

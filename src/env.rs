//! Loading of build configuration from the process environment or a local
//! `.env` file.
//!
//! The two sources are exclusive: when the required key is exported in the
//! environment (CI, hosted builds) the file is never read.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fmt;
use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::config::{ABLY_API_KEY, GA4_MEASUREMENT_ID};
use crate::error::BuildError;

pub const ENV_FILE: &str = ".env";

/// Key/value pairs handed to the template renderer.
pub type EnvVars = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    Environment,
    EnvFile,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::Environment => f.write_str("system environment"),
            ConfigSource::EnvFile => f.write_str(ENV_FILE),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedEnv {
    pub vars: EnvVars,
    pub source: ConfigSource,
}

/// Loads configuration for a build rooted at `root`.
///
/// `lookup` reads a single environment variable; the binary passes
/// `std::env::var_os`, tests pass a fixed table. A variable that is set
/// selects the environment even when its value is empty or not UTF-8.
pub fn load_env<F>(root: &Path, lookup: F) -> Result<LoadedEnv, BuildError>
where
    F: Fn(&str) -> Option<OsString>,
{
    if let Some(api_key) = lookup(ABLY_API_KEY) {
        info!("Loading from system environment variables (CI mode)");
        let mut vars = EnvVars::new();
        vars.insert(ABLY_API_KEY.to_owned(), into_utf8(ABLY_API_KEY, api_key)?);
        if let Some(measurement_id) = lookup(GA4_MEASUREMENT_ID) {
            vars.insert(
                GA4_MEASUREMENT_ID.to_owned(),
                into_utf8(GA4_MEASUREMENT_ID, measurement_id)?,
            );
        }
        return Ok(LoadedEnv {
            vars,
            source: ConfigSource::Environment,
        });
    }

    let path = root.join(ENV_FILE);
    if !path.exists() {
        return Err(BuildError::MissingEnvFile { path });
    }

    info!("Loading from {} file (local mode)", ENV_FILE);
    let text = fs::read_to_string(&path).map_err(BuildError::io(&path))?;
    Ok(LoadedEnv {
        vars: parse_env_file(&text),
        source: ConfigSource::EnvFile,
    })
}

fn into_utf8(key: &'static str, value: OsString) -> Result<String, BuildError> {
    value
        .into_string()
        .map_err(|_| BuildError::NotUnicode { key })
}

/// Parses `KEY=VALUE` lines. Later duplicates overwrite earlier ones.
pub fn parse_env_file(text: &str) -> EnvVars {
    let mut vars = EnvVars::new();
    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            debug!("Skipping line {} without '=' in {}", index + 1, ENV_FILE);
            continue;
        };
        let key = key.trim();
        if vars.contains_key(key) {
            debug!(key, "duplicate key in {}, keeping the later value", ENV_FILE);
        }
        vars.insert(key.to_owned(), value.trim().to_owned());
    }
    vars
}

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::config::BuildConfig;
use crate::env::{ConfigSource, load_env};
use crate::render::build_html_file;

/// A template and the page generated from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    pub template: &'static str,
    pub output: &'static str,
}

/// Pages written by every build. `index.html` mirrors the host screen so the
/// root URL serves it.
pub const TARGETS: [Target; 3] = [
    Target {
        template: "host.template.html",
        output: "host.html",
    },
    Target {
        template: "play.template.html",
        output: "play.html",
    },
    Target {
        template: "host.template.html",
        output: "index.html",
    },
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub source: ConfigSource,
    pub analytics_enabled: bool,
    pub outputs: Vec<PathBuf>,
}

/// Loads configuration, validates it and renders every target under `root`.
///
/// Stops at the first failure; outputs written before it are left in place.
pub fn run<F>(root: &Path, lookup: F) -> Result<BuildReport>
where
    F: Fn(&str) -> Option<OsString>,
{
    let loaded = load_env(root, lookup)?;
    let config = BuildConfig::validate(loaded)?;

    info!("Building HTML files from templates");
    let mut outputs = Vec::with_capacity(TARGETS.len());
    for target in TARGETS {
        let template = root.join(target.template);
        let output = root.join(target.output);
        build_html_file(&template, &output, config.vars())
            .with_context(|| format!("failed to generate {}", target.output))?;
        outputs.push(output);
    }

    Ok(BuildReport {
        source: config.source(),
        analytics_enabled: config.analytics_enabled(),
        outputs,
    })
}

use anyhow::{Context, Result};
use clap::Parser;
use jam_session_build::config::Cli;
use jam_session_build::pipeline::{self, BuildReport};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);

    let root = std::env::current_dir().context("failed to resolve working directory")?;
    let report = pipeline::run(&root, |key| std::env::var_os(key))?;

    if let Some(banner) = completion_banner(&cli, &report) {
        print!("{banner}");
    }
    Ok(())
}

fn completion_banner(cli: &Cli, report: &BuildReport) -> Option<String> {
    if cli.quiet {
        return None;
    }
    Some(format!(
        "\nBuild complete! ({} pages)\n\
         \nYou can now run the server:\n  \
         python3 -m http.server 8000\n  \
         - Host screen: http://localhost:8000/ or http://localhost:8000/host.html\n",
        report.outputs.len()
    ))
}

fn init_tracing(cli: &Cli) {
    let filter = match cli.log_filter() {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| Cli::default_log_filter().into()),
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_target(false),
        )
        .init();
}

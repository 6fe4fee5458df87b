use anyhow::Context;
use colored::Colorize;
use pom_merge::{merge, MergeConfig, MergeContext, MergeOutcome, MergeReport, MergeRequest};

use crate::cli::{Cli, OutputFormat};

/// Run the merge described by `cli` and print its report.
pub async fn run_merge(cli: Cli) -> anyhow::Result<MergeOutcome> {
    let config = resolve_config(&cli)?;
    tracing::debug!(?config, "resolved configuration");

    let ctx = MergeContext::new(config);
    let request = MergeRequest::new(&cli.local, &cli.base, &cli.other).with_output(cli.output());
    let report = merge(&ctx, &request).await?;

    if report.outcome.is_success() {
        ctx.status("automatic merge completed successfully, exiting with status 0");
    }

    match cli.format {
        OutputFormat::Text => print_text(&report),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&report).context("rendering report")?;
            println!("{json}");
        }
    }

    Ok(report.outcome)
}

/// Defaults, then the config file, then command-line flags.
fn resolve_config(cli: &Cli) -> anyhow::Result<MergeConfig> {
    let mut config = match &cli.config {
        Some(path) => MergeConfig::load(path)?,
        None => MergeConfig::default(),
    };
    if let Some(jobs) = cli.jobs {
        config = config.with_parallelism(jobs);
    }
    if cli.verbose {
        config = config.with_verbose(true);
    }
    // Stdout carries nothing but the report in JSON mode.
    if cli.format == OutputFormat::Json {
        config = config.with_verbose(false);
    }
    Ok(config)
}

fn print_text(report: &MergeReport) {
    if report.outcome == MergeOutcome::Succeeded {
        return;
    }
    for key in &report.conflicting_keys {
        println!("{} {}", "CONFLICT".red().bold(), key.yellow());
    }
    println!(
        "{} automatic merge failed, exiting with status 1",
        "✗".red().bold()
    );
}

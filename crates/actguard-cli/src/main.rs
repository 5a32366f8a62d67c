//! CLI entry point for actguard.
//!
//! This module is thin on purpose: it handles argument parsing, I/O, logging setup, and exit
//! codes. All business logic lives in the `actguard-app` crate.

use actguard_app::{
    CheckInput, ExplainOutput, format_explanation, format_not_found, format_rule_list, list_rules,
    outcome_exit_code, render_summary, run_check, run_explain, serialize_report,
};
use actguard_settings::Overrides;
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "actguard",
    version,
    about = "ACT accessibility rule checks for HTML pages"
)]
struct Cli {
    /// Log engine activity to stderr at debug level (otherwise `RUST_LOG` applies).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate a page and write the JSON report.
    Check {
        /// HTML file to evaluate.
        #[arg(long)]
        html: Utf8PathBuf,

        /// Extra stylesheet files, evaluated after the page's own `<style>` blocks.
        #[arg(long)]
        css: Vec<Utf8PathBuf>,

        /// Path to actguard config TOML. A missing file means defaults.
        #[arg(long, default_value = "actguard.toml")]
        config: Utf8PathBuf,

        /// Override profile (full|wcag-a|wcag-aa).
        #[arg(long)]
        profile: Option<String>,

        /// Rule code or ACT id to run; repeatable. Replaces the config file's list.
        #[arg(long = "rule")]
        rules: Vec<String>,

        /// WCAG principle to keep; repeatable. Replaces the config file's list.
        #[arg(long = "principle")]
        principles: Vec<String>,

        /// Conformance level to keep (A|AA|AAA); repeatable. Replaces the config file's list.
        #[arg(long = "level")]
        levels: Vec<String>,

        /// Where to write the JSON report.
        #[arg(long, default_value = "artifacts/actguard/report.json")]
        report_out: Utf8PathBuf,
    },

    /// Describe a rule by code (e.g. "QW-ACT-R18") or ACT id (e.g. "3ea0c8").
    Explain { identifier: String },

    /// List every built-in rule.
    Rules,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.cmd {
        Commands::Check {
            html,
            css,
            config,
            profile,
            rules,
            principles,
            levels,
            report_out,
        } => {
            let overrides = Overrides {
                profile,
                principles,
                levels,
                rules,
            };
            cmd_check(&html, &css, &config, overrides, &report_out)
        }
        Commands::Explain { identifier } => cmd_explain(&identifier),
        Commands::Rules => {
            print!("{}", format_rule_list(&list_rules()));
            Ok(())
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_check(
    html: &Utf8Path,
    css: &[Utf8PathBuf],
    config: &Utf8Path,
    overrides: Overrides,
    report_out: &Utf8Path,
) -> anyhow::Result<()> {
    let result = (|| -> anyhow::Result<i32> {
        let html_text =
            std::fs::read_to_string(html).with_context(|| format!("read html: {html}"))?;

        let mut sheets = Vec::with_capacity(css.len());
        for path in css {
            let content =
                std::fs::read_to_string(path).with_context(|| format!("read css: {path}"))?;
            sheets.push((path.to_string(), content));
        }

        // Missing config file is allowed (defaults apply).
        let cfg_text = std::fs::read_to_string(config).unwrap_or_default();
        debug!(%config, loaded = !cfg_text.is_empty(), "config");

        let output = run_check(CheckInput {
            html: &html_text,
            css: sheets,
            config_text: &cfg_text,
            overrides,
        })?;

        write_report_file(report_out, &serialize_report(&output.report)?)
            .context("write report json")?;
        print!("{}", render_summary(&output.report));

        Ok(outcome_exit_code(output.report.outcome))
    })();

    match result {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }
        Err(err) => {
            eprintln!("actguard error: {err:#}");
            std::process::exit(1);
        }
    }
}

fn write_report_file(path: &Utf8Path, data: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_str().is_empty()
    {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory: {parent}"))?;
    }
    std::fs::write(path, data).with_context(|| format!("write report: {path}"))?;
    Ok(())
}

fn cmd_explain(identifier: &str) -> anyhow::Result<()> {
    match run_explain(identifier) {
        ExplainOutput::Found(exp) => {
            print!("{}", format_explanation(&exp));
            Ok(())
        }
        ExplainOutput::NotFound {
            identifier,
            available,
        } => {
            eprint!("{}", format_not_found(&identifier, &available));
            std::process::exit(1);
        }
    }
}

//! # partition-smoke CLI
//!
//! Command parsing and the async [`run`] entrypoint shared by `main()` and the
//! integration tests. All checking logic lives in [`crate::runner`] and
//! [`crate::checks`]; this module only wires configuration, the HTTP client
//! and the printed summary together.
//!
//! - `run`: executes the smoke matrix and fails when any case fails.
//! - `list`: prints the case ids that `run` would execute, offline.

use crate::cases::{select_cases, CheckKind};
use crate::client::GeneralApiClient;
use crate::load_config::{load_config, ConfigOverrides};
use crate::runner::{run_cases, CaseOutcome, SmokeReport};
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI for partition-smoke: conformance checks for a document partition endpoint.
#[derive(Parser)]
#[clap(
    name = "partition-smoke",
    version,
    about = "Smoke-test a document partition endpoint across formats, compression and strategies"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the smoke matrix against the configured endpoint
    Run {
        /// Optional YAML config file
        #[clap(long)]
        config: Option<PathBuf>,
        /// Base URL of the service, e.g. http://localhost:8000
        #[clap(long)]
        api_url: Option<String>,
        /// Directory holding the sample documents
        #[clap(long)]
        sample_docs: Option<PathBuf>,
        /// Restrict the run to these checks (repeatable)
        #[clap(long = "check", value_enum)]
        checks: Vec<CheckKind>,
        /// Skip cases that need layout-model inference
        #[clap(long)]
        skip_inference: bool,
        /// Required hi_res/fast wall-time ratio
        #[clap(long)]
        performance_ratio: Option<f64>,
    },
    /// List the case ids a run would execute
    List {
        #[clap(long = "check", value_enum)]
        checks: Vec<CheckKind>,
    },
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    tracing::info!("trace_initialised");

    match cli.command {
        Commands::Run {
            config,
            api_url,
            sample_docs,
            checks,
            skip_inference,
            performance_ratio,
        } => {
            let overrides = ConfigOverrides {
                base_url: api_url,
                sample_docs_dir: sample_docs,
                skip_inference_tests: skip_inference,
                performance_ratio,
            };
            let config = load_config(config.as_deref(), &overrides)?;
            let client = GeneralApiClient::from_config(&config);

            println!("Smoke run starting against {}", client.endpoint());
            let report = run_cases(&client, &config, &checks).await;
            print_report(&report);

            if report.is_success() {
                tracing::info!(command = "run", "Smoke run succeeded");
                Ok(())
            } else {
                tracing::error!(command = "run", failed = report.failed(), "Smoke run failed");
                anyhow::bail!(
                    "{} of {} cases failed",
                    report.failed(),
                    report.cases.len()
                )
            }
        }
        Commands::List { checks } => {
            for case in select_cases(&checks) {
                println!("{}", case.id());
            }
            Ok(())
        }
    }
}

fn print_report(report: &SmokeReport) {
    for case in &report.cases {
        match &case.outcome {
            CaseOutcome::Passed => {
                println!("PASS {} ({} ms)", case.id, case.elapsed.as_millis())
            }
            CaseOutcome::Skipped(reason) => println!("SKIP {}: {}", case.id, reason),
            CaseOutcome::Failed(message) => println!("FAIL {}: {}", case.id, message),
        }
    }
    println!(
        "{} passed, {} failed, {} skipped",
        report.passed(),
        report.failed(),
        report.skipped()
    );
}

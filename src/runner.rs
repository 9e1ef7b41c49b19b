//! Sequential execution of the smoke matrix.
//!
//! Cases run one at a time, in table order. A failing case is recorded and
//! the run moves on; nothing is retried.

use std::time::{Duration, Instant};

use tracing::{error, info, warn};

use crate::cases::{select_cases, CheckKind, SmokeCase};
use crate::checks;
use crate::config::HarnessConfig;
use crate::contract::PartitionApi;

/// Reason recorded for inference cases skipped on request.
pub const SKIP_REASON_EMULATED: &str = "emulated architecture";

#[derive(Debug, Clone, PartialEq)]
pub enum CaseOutcome {
    Passed,
    Skipped(String),
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct CaseReport {
    pub id: String,
    pub kind: CheckKind,
    pub outcome: CaseOutcome,
    pub elapsed: Duration,
}

#[derive(Debug, Default)]
pub struct SmokeReport {
    pub cases: Vec<CaseReport>,
}

impl SmokeReport {
    fn count(&self, pred: impl Fn(&CaseOutcome) -> bool) -> usize {
        self.cases.iter().filter(|c| pred(&c.outcome)).count()
    }

    pub fn passed(&self) -> usize {
        self.count(|o| matches!(o, CaseOutcome::Passed))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, CaseOutcome::Failed(_)))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, CaseOutcome::Skipped(_)))
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &CaseReport> {
        self.cases
            .iter()
            .filter(|c| matches!(c.outcome, CaseOutcome::Failed(_)))
    }
}

/// Runs one case, turning any check error into a `Failed` outcome.
pub async fn run_case<A>(api: &A, config: &HarnessConfig, case: &SmokeCase) -> CaseOutcome
where
    A: PartitionApi + ?Sized,
{
    if config.skip_inference_tests && case.requires_inference() {
        return CaseOutcome::Skipped(SKIP_REASON_EMULATED.to_string());
    }

    let result = match case {
        SmokeCase::HappyPath(c) => checks::happy_path(api, config, c).await,
        SmokeCase::GzipSending {
            case,
            output_format,
        } => checks::gzip_sending(api, config, case, *output_format).await,
        SmokeCase::StrategyPerformance => checks::strategy_performance(api, config).await,
        SmokeCase::TableSupport(c) => checks::table_support(api, config, c).await,
        SmokeCase::GzipRoundTrip(c) => checks::gzip_round_trip(api, config, c).await,
    };

    match result {
        Ok(()) => CaseOutcome::Passed,
        Err(e) => CaseOutcome::Failed(e.to_string()),
    }
}

/// Runs every case of the selected kinds (all kinds when empty).
pub async fn run_cases<A>(api: &A, config: &HarnessConfig, kinds: &[CheckKind]) -> SmokeReport
where
    A: PartitionApi + ?Sized,
{
    let cases = select_cases(kinds);
    info!(cases = cases.len(), "[SMOKE] Starting smoke run");

    let mut report = SmokeReport::default();
    for case in &cases {
        let id = case.id();
        let started = Instant::now();
        let outcome = run_case(api, config, case).await;
        let elapsed = started.elapsed();

        match &outcome {
            CaseOutcome::Passed => {
                info!(case = %id, elapsed_ms = elapsed.as_millis() as u64, "[SMOKE] passed")
            }
            CaseOutcome::Skipped(reason) => warn!(case = %id, reason = %reason, "[SMOKE] skipped"),
            CaseOutcome::Failed(message) => {
                error!(case = %id, error = %message, "[SMOKE][ERROR] failed")
            }
        }

        report.cases.push(CaseReport {
            id,
            kind: case.kind(),
            outcome,
            elapsed,
        });
    }

    info!(
        passed = report.passed(),
        failed = report.failed(),
        skipped = report.skipped(),
        "[SMOKE] Smoke run complete"
    );
    report
}

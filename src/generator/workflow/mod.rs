use crate::config::Config;
use crate::error::LaunchError;
use crate::generator::context::AnalysisContext;
use crate::generator::orchestrator::ExecutionOrchestrator;
use crate::generator::outlet::{DiskOutlet, Outlet, print_summary};
use crate::generator::planner::PlanGenerator;
use crate::generator::progress::{ConsoleProgress, ProgressObserver};
use crate::generator::verifier::{ResultVerifier, VerificationReport};
use crate::llm::LLMClient;
use crate::types::analysis::AnalysisResult;

use anyhow::Result;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Phase timing for one run
pub struct TimingScope {
    start_time: Instant,
    phase_start_times: HashMap<String, Instant>,
    phase_durations: Vec<(String, Duration)>,
}

impl Default for TimingScope {
    fn default() -> Self {
        Self::new()
    }
}

impl TimingScope {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            phase_start_times: HashMap::new(),
            phase_durations: Vec::new(),
        }
    }

    pub fn start_phase(&mut self, phase_name: &str) {
        self.phase_start_times
            .insert(phase_name.to_string(), Instant::now());
    }

    pub fn end_phase(&mut self, phase_name: &str) -> Option<Duration> {
        let duration = self.phase_start_times.remove(phase_name)?.elapsed();
        self.phase_durations
            .push((phase_name.to_string(), duration));
        Some(duration)
    }

    pub fn get_total_duration(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Phases in the order they finished
    pub fn get_phase_durations(&self) -> &[(String, Duration)] {
        &self.phase_durations
    }

    pub fn generate_timing_report(&self) -> String {
        let mut report = format!(
            "Total execution time: {:.2}s\n",
            self.get_total_duration().as_secs_f64()
        );
        for (phase, duration) in &self.phase_durations {
            report.push_str(&format!("- {}: {:.3}s\n", phase, duration.as_secs_f64()));
        }
        report
    }
}

pub struct TimingKeys;

impl TimingKeys {
    pub const PLANNING: &'static str = "planning";
    pub const EXECUTION: &'static str = "execution";
    pub const VERIFICATION: &'static str = "verification";
    pub const EXPORT: &'static str = "export";
}

/// Plan, execute and verify one analysis against an already wired context
pub async fn run(
    context: &AnalysisContext,
    company: &str,
    progress: &dyn ProgressObserver,
    timing: &mut TimingScope,
) -> (AnalysisResult, VerificationReport) {
    timing.start_phase(TimingKeys::PLANNING);
    progress.notify("📋 Creating execution plan...");
    let plan = PlanGenerator::new(context.planner_llm.clone())
        .create_plan(company)
        .await;
    timing.end_phase(TimingKeys::PLANNING);

    timing.start_phase(TimingKeys::EXECUTION);
    progress.notify("⚙️ Executing plan...");
    let raw = ExecutionOrchestrator::new(context, progress)
        .execute(&plan)
        .await;
    timing.end_phase(TimingKeys::EXECUTION);

    timing.start_phase(TimingKeys::VERIFICATION);
    progress.notify("✅ Verifying results...");
    let verified = ResultVerifier::verify(raw);
    timing.end_phase(TimingKeys::VERIFICATION);

    progress.notify("🎉 Analysis complete!");
    verified
}

/// Runs a full analysis for `company` and exports it
pub async fn launch(config: &Config, company: &str) -> Result<AnalysisResult> {
    let company = company.trim();
    if company.is_empty() {
        return Err(LaunchError::EmptyCompany.into());
    }
    config.validate_credentials()?;

    let llm_client = LLMClient::new(&config.llm)?;
    if !config.skip_connection_check {
        llm_client.check_connection().await?;
    }

    let context = AnalysisContext::new(config.clone(), &llm_client)?;
    tracing::info!(run_id = %context.run_id, company, model = llm_client.model(), "starting analysis");

    let mut timing = TimingScope::new();
    let (result, report) = run(&context, company, &ConsoleProgress, &mut timing).await;
    if !report.is_clean() {
        tracing::info!(
            issues = report.issues.len(),
            placeholders = report.placeholders_added(),
            "analysis result repaired"
        );
    }

    if config.export.enabled {
        timing.start_phase(TimingKeys::EXPORT);
        DiskOutlet::new(&config.export).save(&result).await?;
        timing.end_phase(TimingKeys::EXPORT);
    }

    print_summary(&result);
    tracing::info!("\n{}", timing.generate_timing_report());

    Ok(result)
}

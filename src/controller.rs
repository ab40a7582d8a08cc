// Run controller - sequences one export sweep
//
// For every assignment: apply parameters, recompute/settle, then resolve, compose and export
// each configured body. Cancellation is polled between variants; the first error aborts the
// run without rolling back files already written.

use crate::error::SweepError;
use crate::host::{Design, ProgressIndicator};
use crate::metrics::Metrics;
use crate::models::{ParameterAssignment, RunConfig};
use crate::services::{
    Exporter, ModelMutator, PathComposer, SettlePolicy, enumerate, ensure_directory,
};
use crate::state::{RunEvent, RunState, RunStateTracker, RunStatus};
use camino::{Utf8Path, Utf8PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::broadcast;

/// Title of the progress indicator and of user dialogs
pub const RUN_TITLE: &str = "Parametric Export";

/// Result of one run, handed back to the caller
#[derive(Debug)]
pub struct RunReport {
    /// Final run state; `state.status` is always terminal
    pub state: RunState,

    /// Files written, in export order
    pub exported: Vec<Utf8PathBuf>,

    /// The error that aborted the run
    pub error: Option<SweepError>,
}

impl RunReport {
    pub fn status(&self) -> RunStatus {
        self.state.status
    }

    /// Message shown to the user when the run ends
    pub fn summary_message(&self, output_directory: &str) -> String {
        match (&self.error, self.state.status) {
            (Some(error), _) => error.user_message(),
            (None, RunStatus::Cancelled) => "Export cancelled by user.".to_string(),
            (None, _) => format!(
                "Export completed successfully.\n{} variants exported to '{}'.",
                self.state.total, output_directory
            ),
        }
    }
}

/// Drives one export sweep against an injected host.
///
/// The controller owns the run state for the duration of [`run()`](Self::run) and is
/// consumed by it. Pass `&mut` host objects to keep using them afterwards.
pub struct RunController<D: Design, P: ProgressIndicator> {
    design: D,
    progress: P,
    mutator: ModelMutator,
    composer: PathComposer,
    exporter: Exporter,
    tracker: RunStateTracker,
    metrics: Arc<Metrics>,
}

impl<D: Design, P: ProgressIndicator> RunController<D, P> {
    pub fn new(design: D, progress: P, settle: SettlePolicy) -> Self {
        Self {
            design,
            progress,
            mutator: ModelMutator::new(settle),
            composer: PathComposer::new(),
            exporter: Exporter::new(),
            tracker: RunStateTracker::new(),
            metrics: Arc::new(Metrics::new()),
        }
    }

    /// Receive [`RunEvent`]s for the upcoming run
    pub fn subscribe(&self) -> broadcast::Receiver<RunEvent> {
        self.tracker.subscribe()
    }

    pub fn metrics(&self) -> Arc<Metrics> {
        Arc::clone(&self.metrics)
    }

    /// Export every variant of `config` below `base_dir`.
    ///
    /// `base_dir` is the resolved output directory (configuration directory joined with
    /// `outputDirectory`).
    pub fn run(mut self, config: &RunConfig, base_dir: &Utf8Path) -> RunReport {
        let mut exported = Vec::new();

        if let Err(error) = config.validate() {
            tracing::error!("{}", error);
            self.tracker.finish(RunStatus::Aborted);
            return self.report(exported, Some(error));
        }

        if !self.design.is_active() {
            let error = SweepError::NoActiveDesign;
            tracing::error!("{}", error);
            self.tracker.finish(RunStatus::Aborted);
            return self.report(exported, Some(error));
        }

        let assignments = enumerate(&config.parameters);
        let total = assignments.len();

        self.tracker.start(total, config.bodies_to_export.len());
        tracing::info!(
            "Starting export run: {} variants x {} bodies into {}",
            total,
            config.bodies_to_export.len(),
            base_dir
        );

        self.progress.show(
            RUN_TITLE,
            &format!("Processing {} variants...", total),
            0,
            total,
        );
        let result = self.sweep(config, base_dir, &assignments, &mut exported);
        self.progress.hide();

        let (status, error) = match result {
            Ok(true) => (RunStatus::Completed, None),
            Ok(false) => (RunStatus::Cancelled, None),
            Err(error) => {
                tracing::error!("Export run aborted: {}", error);
                (RunStatus::Aborted, Some(error))
            }
        };

        self.tracker.finish(status);
        tracing::info!(
            "Export run finished: {:?}, {}/{} variants, {} files",
            status,
            self.tracker.state().completed_variants,
            total,
            exported.len()
        );
        self.metrics.log_summary();

        self.report(exported, error)
    }

    /// Returns `Ok(false)` when the user cancelled
    fn sweep(
        &mut self,
        config: &RunConfig,
        base_dir: &Utf8Path,
        assignments: &[ParameterAssignment],
        exported: &mut Vec<Utf8PathBuf>,
    ) -> Result<bool, SweepError> {
        let total = assignments.len();

        for (index, assignment) in assignments.iter().enumerate() {
            self.design.process_events();
            if self.progress.was_cancelled() {
                self.tracker.request_cancel();
                tracing::warn!("Export cancelled before variant {} of {}", index + 1, total);
                return Ok(false);
            }

            let params = assignment.params_label();
            self.tracker.begin_variant(index, params.clone());
            self.progress
                .set_message(&format!("Processing combination {} of {}", index + 1, total));
            self.progress.set_value(index + 1);
            tracing::info!("Variant {}/{}: {}", index + 1, total, params);

            self.process_variant(config, base_dir, assignment, exported)?;

            self.tracker.complete_variant();
            self.metrics.record_variant_completed();
        }

        Ok(true)
    }

    fn process_variant(
        &mut self,
        config: &RunConfig,
        base_dir: &Utf8Path,
        assignment: &ParameterAssignment,
        exported: &mut Vec<Utf8PathBuf>,
    ) -> Result<(), SweepError> {
        self.mutator.apply_assignment(&mut self.design, assignment)?;
        for _ in 0..assignment.len() {
            self.metrics.record_parameter_applied();
        }
        self.design.process_events();

        let options = &config.export_options;
        if options.force_recompute {
            self.mutator.recompute(&mut self.design)?;
            self.metrics.record_recompute();
            let waited = self.mutator.refresh_and_settle(&mut self.design);
            self.metrics.record_settle(waited);
        }

        for body_name in &config.bodies_to_export {
            let body = self.exporter.resolve_body(&self.design, body_name)?;
            let composed = self
                .composer
                .compose(base_dir, config, assignment, &body.name)?;
            let path = composed.full_path();

            let request = self.exporter.export_options(&body, &path, options)?;
            ensure_directory(&composed.directory)?;

            let started = Instant::now();
            self.exporter.execute(&mut self.design, &request)?;
            self.metrics.record_export(started.elapsed());

            self.tracker.record_export(&body.name, path.clone());
            exported.push(path);
        }

        Ok(())
    }

    fn report(&self, exported: Vec<Utf8PathBuf>, error: Option<SweepError>) -> RunReport {
        RunReport {
            state: self.tracker.state().clone(),
            exported,
            error,
        }
    }
}

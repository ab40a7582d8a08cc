// Interactive entry point
//
// The complete flow a host add-in runs when the user starts an export: pick a run
// configuration, load it, prepare the output directory, sweep, and report the outcome in a
// message box.

use crate::config::{AppSettings, ConfigManager};
use crate::controller::{RUN_TITLE, RunController, RunReport};
use crate::error::SweepError;
use crate::host::{Design, Dialogs, ProgressIndicator};
use crate::services::ensure_directory;
use camino::Utf8PathBuf;

/// Title of the configuration file picker
pub const PICKER_TITLE: &str = "Select Parametric Export Configuration File";

/// How an interactive session ended
#[derive(Debug)]
pub enum SessionOutcome {
    /// The user closed the file picker without choosing a configuration
    Declined,

    /// The configuration could not be loaded or the output directory not created
    ConfigurationFailed(SweepError),

    /// A run took place; see the report for its terminal status
    Finished(RunReport),
}

/// Run an export session against the given host.
///
/// Every fatal condition is logged and shown to the user once before returning.
pub fn run_interactive<D, P, G>(
    design: D,
    progress: P,
    dialogs: &G,
    settings: &AppSettings,
    initial_directory: Option<Utf8PathBuf>,
) -> SessionOutcome
where
    D: Design,
    P: ProgressIndicator,
    G: Dialogs,
{
    tracing::debug!("Application settings: {:?}", settings);

    let Some(config_path) = dialogs.pick_file(
        PICKER_TITLE,
        "Configuration Files (*.json, *.yaml)",
        &["json", "yaml", "yml"],
        initial_directory,
    ) else {
        tracing::info!("No configuration file selected");
        return SessionOutcome::Declined;
    };

    let manager = ConfigManager::new(&config_path);
    let config = match manager.load_run_config() {
        Ok(config) => config,
        Err(e) => {
            let error = SweepError::Configuration(format!("{:#}", e));
            return configuration_failed(dialogs, error);
        }
    };

    let output_dir = manager.output_dir(&config);
    if let Err(error) = ensure_directory(&output_dir) {
        return configuration_failed(dialogs, error);
    }

    let report = RunController::new(design, progress, settings.settle_policy())
        .run(&config, &output_dir);

    dialogs.message_box(RUN_TITLE, &report.summary_message(&config.output_directory));
    SessionOutcome::Finished(report)
}

fn configuration_failed<G: Dialogs>(dialogs: &G, error: SweepError) -> SessionOutcome {
    tracing::error!("{}", error);
    dialogs.message_box(RUN_TITLE, &error.user_message());
    SessionOutcome::ConfigurationFailed(error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{MockDesign, MockDialogs, MockProgressIndicator};
    use mockall::predicate::{always, eq};

    #[test]
    fn test_declined_picker_does_nothing() {
        let mut dialogs = MockDialogs::new();
        dialogs
            .expect_pick_file()
            .with(eq(PICKER_TITLE), always(), always(), always())
            .times(1)
            .returning(|_, _, _, _| None);
        dialogs.expect_message_box().never();

        let mut design = MockDesign::new();
        design.expect_is_active().never();

        let outcome = run_interactive(
            design,
            MockProgressIndicator::new(),
            &dialogs,
            &AppSettings::default(),
            None,
        );

        assert!(matches!(outcome, SessionOutcome::Declined));
    }

    #[test]
    fn test_unreadable_config_is_shown_to_user() {
        let mut dialogs = MockDialogs::new();
        dialogs
            .expect_pick_file()
            .returning(|_, _, _, _| Some(Utf8PathBuf::from("/nonexistent/run.json")));
        dialogs
            .expect_message_box()
            .withf(|title, message| {
                title.to_string() == RUN_TITLE && message.contains("Configuration error")
            })
            .times(1)
            .return_const(());

        let outcome = run_interactive(
            MockDesign::new(),
            MockProgressIndicator::new(),
            &dialogs,
            &AppSettings::default(),
            None,
        );

        assert!(matches!(outcome, SessionOutcome::ConfigurationFailed(_)));
    }
}

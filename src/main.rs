//! variant-export - export plan preview
//!
//! Loads a run configuration and prints every file an export run would write, without
//! touching a CAD host or the file system.
//!
//! # Usage
//!
//! ```text
//! variant-export [CONFIG]
//! ```
//!
//! Without `CONFIG` a native file picker asks for the configuration file.
//!
//! # Execution Flow
//!
//! 1. Load application settings (`variant-export.{toml,json,yaml}`, `VARIANT_EXPORT_*`)
//! 2. Initialize logging → `<log_dir>/variant-export.<date>`
//! 3. Load and validate the run configuration
//! 4. Build the export plan and print each variant's output paths

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use variant_export::app::PICKER_TITLE;
use variant_export::host::Dialogs;
use variant_export::host::native::NativeDialogs;
use variant_export::services::ExportPlan;
use variant_export::{APP_NAME, AppSettings, ConfigManager, VERSION};

fn main() -> Result<()> {
    let settings = AppSettings::load().unwrap_or_else(|e| {
        eprintln!("Ignoring invalid settings: {:#}", e);
        AppSettings::default()
    });

    let _guard = variant_export::logging::setup_logging(
        Utf8Path::new(&settings.log_dir),
        APP_NAME,
        settings.debug,
        true,
    )?;

    tracing::info!("Starting {} v{}", APP_NAME, VERSION);
    tracing::debug!("Application settings: {:?}", settings);

    let Some(config_path) = config_path_from_args().or_else(pick_config_path) else {
        tracing::info!("No configuration file selected");
        return Ok(());
    };

    let manager = ConfigManager::new(&config_path);
    let config = manager.load_run_config()?;
    let output_dir = manager.output_dir(&config);

    let plan = ExportPlan::build(&config, &output_dir).context("Cannot build export plan")?;

    println!(
        "{} variants x {} bodies into {}",
        plan.variants.len(),
        config.bodies_to_export.len(),
        plan.output_dir
    );
    for parameter in &plan.parameters {
        println!(
            "  {} ({}): {}{}",
            parameter.label,
            parameter.name,
            parameter.variants.join(", "),
            if parameter.grouping { " [grouping]" } else { "" }
        );
    }
    for (index, variant) in plan.variants.iter().enumerate() {
        println!("[{}] {}", index + 1, variant.params);
        for file in &variant.files {
            println!("    {}", file);
        }
    }

    tracing::info!("Planned {} files", plan.file_count());
    tracing::info!("{} shutdown complete", APP_NAME);
    Ok(())
}

fn config_path_from_args() -> Option<Utf8PathBuf> {
    std::env::args().nth(1).map(Utf8PathBuf::from)
}

fn pick_config_path() -> Option<Utf8PathBuf> {
    NativeDialogs.pick_file(
        PICKER_TITLE,
        "Configuration Files (*.json, *.yaml)",
        &["json", "yaml", "yml"],
        None,
    )
}

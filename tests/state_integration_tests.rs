//! Integration tests for run events
//!
//! These tests verify that a RunController run:
//! - Announces its start, every variant and every exported body
//! - Ends with exactly one RunFinished event carrying the terminal status
//! - Delivers the same events to every subscriber

mod common;

use common::{FakeDesign, FakeProgress, temp_root, write_config};
use tokio::sync::broadcast;
use tokio::time::{Duration, timeout};
use variant_export::services::SettlePolicy;
use variant_export::{ConfigManager, RunController, RunEvent, RunStatus};

const CONFIG: &str = r#"{
    "bodiesToExport": ["Shell", "Lid"],
    "parametersToIterate": {"size": {"variants": [10, 20], "grouping": true}}
}"#;

async fn drain(rx: &mut broadcast::Receiver<RunEvent>) -> Vec<RunEvent> {
    let mut events = Vec::new();
    while let Ok(Ok(event)) = timeout(Duration::from_millis(100), rx.recv()).await {
        events.push(event);
    }
    events
}

#[tokio::test]
async fn test_completed_run_event_sequence() {
    let (_temp_dir, root) = temp_root();
    let manager = ConfigManager::new(write_config(&root, "run.json", CONFIG));
    let config = manager.load_run_config().unwrap();

    let mut design = FakeDesign::new(&["size"], &["Shell", "Lid"]);
    let mut progress = FakeProgress::default();
    let controller = RunController::new(&mut design, &mut progress, SettlePolicy::immediate());
    let mut rx = controller.subscribe();

    let report = controller.run(&config, &manager.output_dir(&config));
    let events = drain(&mut rx).await;

    assert_eq!(report.status(), RunStatus::Completed);
    assert_eq!(
        events.first(),
        Some(&RunEvent::RunStarted {
            total_variants: 2,
            bodies_per_variant: 2
        })
    );
    assert_eq!(
        events.last(),
        Some(&RunEvent::RunFinished {
            status: RunStatus::Completed,
            completed_variants: 2,
            files_exported: 4
        })
    );

    assert!(matches!(
        &events[1],
        RunEvent::VariantStarted { index: 0, total: 2, params } if params == "size_10"
    ));
    assert!(matches!(
        &events[2],
        RunEvent::BodyExported { body, path } if body == "Shell" && path.ends_with("size-10/Shell-size_10.stl")
    ));

    let exported = events
        .iter()
        .filter(|e| matches!(e, RunEvent::BodyExported { .. }))
        .count();
    let completed: Vec<usize> = events
        .iter()
        .filter_map(|e| match e {
            RunEvent::VariantCompleted { index } => Some(*index),
            _ => None,
        })
        .collect();
    assert_eq!(exported, 4);
    assert_eq!(completed, vec![0, 1]);
}

#[tokio::test]
async fn test_cancelled_run_reports_partial_progress() {
    let (_temp_dir, root) = temp_root();
    let manager = ConfigManager::new(write_config(&root, "run.json", CONFIG));
    let config = manager.load_run_config().unwrap();

    let mut design = FakeDesign::new(&["size"], &["Shell", "Lid"]);
    let mut progress = FakeProgress::cancelling_after(1);
    let controller = RunController::new(&mut design, &mut progress, SettlePolicy::immediate());
    let mut rx = controller.subscribe();

    controller.run(&config, &manager.output_dir(&config));
    let events = drain(&mut rx).await;

    let finished: Vec<&RunEvent> = events
        .iter()
        .filter(|e| matches!(e, RunEvent::RunFinished { .. }))
        .collect();
    assert_eq!(
        finished,
        vec![&RunEvent::RunFinished {
            status: RunStatus::Cancelled,
            completed_variants: 1,
            files_exported: 2
        }]
    );
}

#[tokio::test]
async fn test_multiple_subscribers_receive_events() {
    let (_temp_dir, root) = temp_root();
    let manager = ConfigManager::new(write_config(&root, "run.json", CONFIG));
    let config = manager.load_run_config().unwrap();

    let mut design = FakeDesign::new(&["size"], &["Shell", "Lid"]);
    design.active = false;
    let mut progress = FakeProgress::default();
    let controller = RunController::new(&mut design, &mut progress, SettlePolicy::immediate());
    let mut rx1 = controller.subscribe();
    let mut rx2 = controller.subscribe();

    controller.run(&config, &manager.output_dir(&config));

    let expected = vec![RunEvent::RunFinished {
        status: RunStatus::Aborted,
        completed_variants: 0,
        files_exported: 0,
    }];
    assert_eq!(drain(&mut rx1).await, expected);
    assert_eq!(drain(&mut rx2).await, expected);
}

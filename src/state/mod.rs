// Run state tracking
//
// RunStateTracker owns the RunState of a single export run, checks its transitions and
// broadcasts RunEvents so a front end can follow progress without polling.

use camino::Utf8PathBuf;
use tokio::sync::broadcast;

/// Lifecycle of an export run
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunStatus {
    Idle,
    Running,
    Completed,
    Cancelled,
    Aborted,
}

impl RunStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            RunStatus::Completed | RunStatus::Cancelled | RunStatus::Aborted
        )
    }

    fn can_transition_to(self, next: RunStatus) -> bool {
        matches!(
            (self, next),
            (RunStatus::Idle, RunStatus::Running)
                | (RunStatus::Idle, RunStatus::Aborted)
                | (RunStatus::Running, RunStatus::Completed)
                | (RunStatus::Running, RunStatus::Cancelled)
                | (RunStatus::Running, RunStatus::Aborted)
        )
    }
}

/// Progress of one export run
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunState {
    /// Zero-based index of the variant being processed
    pub current: usize,
    pub total: usize,
    pub completed_variants: usize,
    pub files_exported: usize,
    pub cancel_requested: bool,
    pub status: RunStatus,
}

impl Default for RunState {
    fn default() -> Self {
        Self {
            current: 0,
            total: 0,
            completed_variants: 0,
            files_exported: 0,
            cancel_requested: false,
            status: RunStatus::Idle,
        }
    }
}

/// Events emitted while a run progresses
#[derive(Clone, Debug, PartialEq)]
pub enum RunEvent {
    RunStarted {
        total_variants: usize,
        bodies_per_variant: usize,
    },

    VariantStarted {
        index: usize,
        total: usize,
        params: String,
    },

    BodyExported {
        body: String,
        path: Utf8PathBuf,
    },

    VariantCompleted {
        index: usize,
    },

    RunFinished {
        status: RunStatus,
        completed_variants: usize,
        files_exported: usize,
    },
}

/// Single owner of a run's [`RunState`].
///
/// Only the run controller mutates it. Other parties observe through
/// [`subscribe()`](Self::subscribe).
pub struct RunStateTracker {
    state: RunState,
    event_tx: broadcast::Sender<RunEvent>,
}

impl RunStateTracker {
    /// Create a tracker in the `Idle` state with a 100 event buffer
    pub fn new() -> Self {
        let (event_tx, _) = broadcast::channel(100);
        Self {
            state: RunState::default(),
            event_tx,
        }
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RunEvent> {
        self.event_tx.subscribe()
    }

    /// Enter `Running` with the number of variants to process
    pub fn start(&mut self, total_variants: usize, bodies_per_variant: usize) -> bool {
        if !self.transition(RunStatus::Running) {
            return false;
        }
        self.state.total = total_variants;
        self.state.current = 0;
        self.emit(RunEvent::RunStarted {
            total_variants,
            bodies_per_variant,
        });
        true
    }

    pub fn begin_variant(&mut self, index: usize, params: String) {
        self.state.current = index;
        self.emit(RunEvent::VariantStarted {
            index,
            total: self.state.total,
            params,
        });
    }

    pub fn record_export(&mut self, body: &str, path: Utf8PathBuf) {
        self.state.files_exported += 1;
        self.emit(RunEvent::BodyExported {
            body: body.to_string(),
            path,
        });
    }

    pub fn complete_variant(&mut self) {
        self.state.completed_variants += 1;
        self.emit(RunEvent::VariantCompleted {
            index: self.state.current,
        });
    }

    pub fn request_cancel(&mut self) {
        self.state.cancel_requested = true;
    }

    /// Enter a terminal state and announce the result
    pub fn finish(&mut self, status: RunStatus) -> bool {
        if !status.is_terminal() || !self.transition(status) {
            return false;
        }
        self.emit(RunEvent::RunFinished {
            status,
            completed_variants: self.state.completed_variants,
            files_exported: self.state.files_exported,
        });
        true
    }

    fn transition(&mut self, next: RunStatus) -> bool {
        if !self.state.status.can_transition_to(next) {
            tracing::error!(
                "Invalid run state transition: {:?} -> {:?}",
                self.state.status,
                next
            );
            return false;
        }
        tracing::debug!("Run state: {:?} -> {:?}", self.state.status, next);
        self.state.status = next;
        true
    }

    fn emit(&self, event: RunEvent) {
        // Ignore send errors - it's OK if no one is listening
        let _ = self.event_tx.send(event);
    }
}

impl Default for RunStateTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tracker_is_idle() {
        let tracker = RunStateTracker::new();
        assert_eq!(tracker.state().status, RunStatus::Idle);
        assert_eq!(tracker.state().total, 0);
    }

    #[test]
    fn test_happy_path_transitions() {
        let mut tracker = RunStateTracker::new();

        assert!(tracker.start(2, 1));
        tracker.begin_variant(0, "size_10".to_string());
        tracker.record_export("Shell", Utf8PathBuf::from("out/Shell.stl"));
        tracker.complete_variant();
        assert!(tracker.finish(RunStatus::Completed));

        let state = tracker.state();
        assert_eq!(state.status, RunStatus::Completed);
        assert_eq!(state.completed_variants, 1);
        assert_eq!(state.files_exported, 1);
    }

    #[test]
    fn test_terminal_state_is_final() {
        let mut tracker = RunStateTracker::new();
        tracker.start(1, 1);
        assert!(tracker.finish(RunStatus::Cancelled));

        assert!(!tracker.finish(RunStatus::Completed));
        assert!(!tracker.start(1, 1));
        assert_eq!(tracker.state().status, RunStatus::Cancelled);
    }

    #[test]
    fn test_cannot_complete_without_running() {
        let mut tracker = RunStateTracker::new();
        assert!(!tracker.finish(RunStatus::Completed));
        assert!(!tracker.finish(RunStatus::Running));
        assert!(tracker.finish(RunStatus::Aborted));
    }

    #[test]
    fn test_subscribe_to_events() {
        let mut tracker = RunStateTracker::new();
        let mut rx = tracker.subscribe();

        tracker.start(4, 2);

        let event = rx.try_recv().unwrap();
        assert_eq!(
            event,
            RunEvent::RunStarted {
                total_variants: 4,
                bodies_per_variant: 2
            }
        );
    }

    #[test]
    fn test_cancel_flag() {
        let mut tracker = RunStateTracker::new();
        tracker.request_cancel();
        assert!(tracker.state().cancel_requested);
    }
}

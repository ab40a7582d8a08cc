use crate::error::SweepError;
use crate::host::Design;
use crate::models::ParameterAssignment;
use std::thread;
use std::time::{Duration, Instant};

/// How long to wait for regenerated geometry before exporting.
///
/// Hosts that report a stability signal are polled until stable, bounded by `max_wait`.
/// Hosts without one get a fixed `delay`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettlePolicy {
    pub delay: Duration,
    pub max_wait: Duration,
    pub poll_interval: Duration,
}

impl SettlePolicy {
    /// No waiting at all, for hosts whose recompute is synchronous
    pub fn immediate() -> Self {
        Self {
            delay: Duration::ZERO,
            max_wait: Duration::ZERO,
            poll_interval: Duration::ZERO,
        }
    }
}

impl Default for SettlePolicy {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(250),
            max_wait: Duration::from_secs(5),
            poll_interval: Duration::from_millis(50),
        }
    }
}

/// Writes parameter assignments into the live design and brings it up to date.
///
/// Updates are fail-fast without rollback: when one parameter fails, the ones applied
/// before it stay applied and the rest are not attempted.
#[derive(Debug, Clone, Default)]
pub struct ModelMutator {
    settle: SettlePolicy,
}

impl ModelMutator {
    pub fn new(settle: SettlePolicy) -> Self {
        Self { settle }
    }

    pub fn settle_policy(&self) -> SettlePolicy {
        self.settle
    }

    /// Set every parameter of the assignment, in order.
    ///
    /// Each value is written as the parameter's expression in its string form.
    pub fn apply_assignment<D: Design>(
        &self,
        design: &mut D,
        assignment: &ParameterAssignment,
    ) -> Result<(), SweepError> {
        for (name, value) in assignment.iter() {
            let expression = value.to_string();

            let previous = design.parameter_expression(name).map_err(|reason| {
                tracing::warn!("Parameter lookup failed for '{}': {}", name, reason);
                SweepError::ParameterUpdate {
                    name: name.to_string(),
                    reason,
                }
            })?;

            design
                .set_parameter_expression(name, &expression)
                .map_err(|reason| SweepError::ParameterUpdate {
                    name: name.to_string(),
                    reason,
                })?;

            tracing::debug!("Parameter {}: {} -> {}", name, previous, expression);
        }

        Ok(())
    }

    /// Ask the host for a full recompute
    pub fn recompute<D: Design>(&self, design: &mut D) -> Result<(), SweepError> {
        design.recompute()?;
        tracing::debug!("Recompute requested");
        Ok(())
    }

    /// Refresh the viewport and wait for the design to settle.
    ///
    /// Returns the time spent waiting.
    pub fn refresh_and_settle<D: Design>(&self, design: &mut D) -> Duration {
        let start = Instant::now();
        design.refresh_view();

        match design.is_stable() {
            None => {
                if !self.settle.delay.is_zero() {
                    thread::sleep(self.settle.delay);
                }
            }
            Some(_) => {
                while design.is_stable() == Some(false) {
                    if start.elapsed() >= self.settle.max_wait {
                        tracing::warn!(
                            "Design not stable after {:?}, exporting anyway",
                            self.settle.max_wait
                        );
                        break;
                    }
                    design.process_events();
                    if !self.settle.poll_interval.is_zero() {
                        thread::sleep(self.settle.poll_interval);
                    }
                }
            }
        }

        let waited = start.elapsed();
        tracing::trace!("Design settled after {:?}", waited);
        waited
    }
}

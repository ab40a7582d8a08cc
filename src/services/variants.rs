use crate::models::{ParameterAssignment, ParameterSpec};

/// Number of assignments [`enumerate`] will produce, without building them.
///
/// Saturates instead of overflowing for absurdly large parameter spaces.
pub fn variant_count(specs: &[ParameterSpec]) -> usize {
    specs
        .iter()
        .fold(1usize, |acc, spec| acc.saturating_mul(spec.variants.len()))
}

/// Expand parameter specs into every combination of their variants.
///
/// The first spec varies slowest and the last fastest, like nested loops in declaration
/// order. No specs produce a single empty assignment, never zero.
pub fn enumerate(specs: &[ParameterSpec]) -> Vec<ParameterAssignment> {
    let mut assignments = vec![ParameterAssignment::new()];

    for spec in specs {
        let mut next = Vec::with_capacity(assignments.len() * spec.variants.len());
        for partial in &assignments {
            for value in &spec.variants {
                let mut assignment = partial.clone();
                assignment.insert(spec.name.clone(), value.clone());
                next.push(assignment);
            }
        }
        assignments = next;
    }

    tracing::debug!(
        "Enumerated {} assignments from {} parameters",
        assignments.len(),
        specs.len()
    );

    assignments
}

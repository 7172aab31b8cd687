//! Test utilities and mock types for Kinetic development.
//!
//! Provides mock [`Force`] implementations for exercising the force
//! composite, integrators and the orchestrator without a real potential,
//! plus the standard argon fixtures in [`fixtures`].

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use kinetic_cell::Cell;
use kinetic_core::AtomicState;
use kinetic_force::{Force, ForceError};

/// Adds the same vector to every atom's force and reports a fixed
/// potential energy.
pub struct ConstantForce {
    pub push: [f64; 3],
    pub energy: f64,
}

impl ConstantForce {
    pub fn new(push: [f64; 3], energy: f64) -> Self {
        Self { push, energy }
    }
}

impl Force for ConstantForce {
    fn name(&self) -> &str {
        "constant"
    }

    fn evaluate(&self, state: &mut AtomicState, _cell: &dyn Cell) -> Result<f64, ForceError> {
        let mut view = state.force_view()?;
        for f in view.forces.chunks_exact_mut(3) {
            for k in 0..3 {
                f[k] += self.push[k];
            }
        }
        Ok(self.energy)
    }
}

/// Contributes nothing but counts how often it is evaluated.
///
/// The counter is shared, so a test can keep a handle after boxing the
/// force into a composite.
pub struct CountingForce {
    calls: Arc<AtomicUsize>,
}

impl CountingForce {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Shared handle to the evaluation counter.
    pub fn counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

impl Default for CountingForce {
    fn default() -> Self {
        Self::new()
    }
}

impl Force for CountingForce {
    fn name(&self) -> &str {
        "counting"
    }

    fn evaluate(&self, _state: &mut AtomicState, _cell: &dyn Cell) -> Result<f64, ForceError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        Ok(0.0)
    }
}

/// Succeeds for the first `succeed_count` evaluations, then reports
/// coincident atoms on every call.
pub struct FailingForce {
    succeed_count: usize,
    calls: AtomicUsize,
}

impl FailingForce {
    pub fn new(succeed_count: usize) -> Self {
        Self {
            succeed_count,
            calls: AtomicUsize::new(0),
        }
    }
}

impl Force for FailingForce {
    fn name(&self) -> &str {
        "failing"
    }

    fn evaluate(&self, _state: &mut AtomicState, _cell: &dyn Cell) -> Result<f64, ForceError> {
        let n = self.calls.fetch_add(1, Ordering::Relaxed);
        if n >= self.succeed_count {
            return Err(ForceError::CoincidentAtoms { i: 0, j: 1 });
        }
        Ok(0.0)
    }
}

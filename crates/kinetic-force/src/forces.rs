//! Composite of all registered force models.

use kinetic_cell::Cell;
use kinetic_core::AtomicState;

use crate::error::ForceError;
use crate::force::Force;

/// The ordered set of force models acting on a system.
///
/// Models are added while the simulation is assembled and are never
/// removed. [`Force::evaluate`] on the composite zeroes the force buffer
/// exactly once, then lets every model accumulate in registration order.
#[derive(Default)]
pub struct Forces {
    forces: Vec<Box<dyn Force>>,
}

impl Forces {
    /// An empty composite.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a force model.
    pub fn add(&mut self, force: Box<dyn Force>) {
        self.forces.push(force);
    }

    /// Builder-style [`add`](Self::add).
    pub fn with(mut self, force: Box<dyn Force>) -> Self {
        self.add(force);
        self
    }

    /// Number of registered models.
    pub fn len(&self) -> usize {
        self.forces.len()
    }

    /// Whether no model is registered.
    pub fn is_empty(&self) -> bool {
        self.forces.is_empty()
    }

    /// Names of the registered models, in order.
    pub fn names(&self) -> Vec<&str> {
        self.forces.iter().map(|f| f.name()).collect()
    }
}

impl Force for Forces {
    fn name(&self) -> &str {
        "forces"
    }

    fn evaluate(&self, state: &mut AtomicState, cell: &dyn Cell) -> Result<f64, ForceError> {
        state.zero_forces()?;
        let mut potential = 0.0;
        for force in &self.forces {
            potential += force.evaluate(state, cell)?;
        }
        Ok(potential)
    }
}

impl std::fmt::Debug for Forces {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Forces")
            .field("forces", &self.names())
            .finish()
    }
}

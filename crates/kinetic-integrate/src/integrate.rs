//! The [`Integrate`] trait.

use kinetic_cell::Cell;
use kinetic_core::AtomicState;
use kinetic_force::Force;

use crate::error::IntegrateError;
use crate::thermostat::Thermostat;

/// A time-stepping scheme.
///
/// # Contract
///
/// - `initialise()` is called exactly once, before the first `step()`.
/// - On entry to `step()` the state's force buffer holds the forces for
///   the current positions; on exit it holds the forces for the new ones.
/// - `step()` increments `current_step()` by one and returns the
///   potential energy from its force refresh.
///
/// # Object safety
///
/// This trait is object-safe; the orchestrator stores its integrator as
/// `Box<dyn Integrate>`.
pub trait Integrate: Send + 'static {
    /// Human-readable name, as used by configuration.
    fn name(&self) -> &str;

    /// Timestep, fs.
    fn dt(&self) -> f64;

    /// Total number of steps a run performs.
    fn num_steps(&self) -> u64;

    /// Steps taken so far.
    fn current_step(&self) -> u64;

    /// The composed thermostat, if any.
    fn thermostat(&self) -> Option<&dyn Thermostat> {
        None
    }

    /// Prepare the state before the first step (e.g. initial velocities).
    fn initialise(&mut self, state: &mut AtomicState) -> Result<(), IntegrateError>;

    /// Advance the state by one timestep.
    fn step(
        &mut self,
        state: &mut AtomicState,
        forces: &dyn Force,
        cell: &dyn Cell,
    ) -> Result<f64, IntegrateError>;
}

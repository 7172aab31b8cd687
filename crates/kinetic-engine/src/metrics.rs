//! Per-step metrics for the molecular-dynamics orchestrator.
//!
//! [`StepMetrics`] captures timings and energies for a single step,
//! for logging, profiling and thermodynamic monitoring.

/// Timing and energy metrics collected during a single step.
///
/// All durations are in microseconds; energies are in internal units
/// (Da·Å²/fs²).
#[derive(Clone, Debug, Default)]
pub struct StepMetrics {
    /// Steps completed after this one.
    pub step: u64,
    /// Wall-clock time for the entire step, in microseconds.
    pub total_us: u64,
    /// Time spent inside the integrator (including force refresh), in microseconds.
    pub integrate_us: u64,
    /// Time spent in writers, in microseconds.
    pub output_us: u64,
    /// Number of writers that fired on this step.
    pub writers_fired: usize,
    /// Potential energy after the step.
    pub potential_energy: f64,
    /// Kinetic energy after the step.
    pub kinetic_energy: f64,
    /// Instantaneous temperature after the step, K.
    pub temperature: f64,
}

impl StepMetrics {
    /// Potential plus kinetic energy.
    pub fn total_energy(&self) -> f64 {
        self.potential_energy + self.kinetic_energy
    }
}

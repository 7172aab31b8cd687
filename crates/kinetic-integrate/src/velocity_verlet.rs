//! Velocity Verlet (kick-drift-kick) integration.
//!
//! Each step:
//!
//! 1. thermostat `before_step` (if any)
//! 2. `v += ½·dt·F/m`, `r += dt·v`, wrap `r` into the cell
//! 3. refresh forces at the new positions
//! 4. `v += ½·dt·F/m`
//! 5. thermostat `after_step` (if any)
//!
//! Without a thermostat this is symplectic and time-reversible (NVE).
//!
//! Constructed via the builder pattern: [`VelocityVerlet::builder`].

use kinetic_cell::Cell;
use kinetic_core::{AtomicState, DynamicsView};
use kinetic_force::Force;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::error::IntegrateError;
use crate::integrate::Integrate;
use crate::thermostat::Thermostat;

/// Velocity Verlet integrator with an optional composed thermostat.
///
/// The integrator owns a `ChaCha8Rng` seeded at construction and lends
/// it to the thermostat, so a run is reproducible for a given seed.
pub struct VelocityVerlet {
    dt: f64,
    num_steps: u64,
    current_step: u64,
    thermostat: Option<Box<dyn Thermostat>>,
    rng: ChaCha8Rng,
}

/// Builder for [`VelocityVerlet`].
///
/// Required field: `timestep`.
pub struct VelocityVerletBuilder {
    dt: Option<f64>,
    num_steps: u64,
    seed: u64,
    thermostat: Option<Box<dyn Thermostat>>,
}

impl VelocityVerlet {
    /// Create a new builder for configuring a `VelocityVerlet` integrator.
    pub fn builder() -> VelocityVerletBuilder {
        VelocityVerletBuilder {
            dt: None,
            num_steps: 0,
            seed: 0,
            thermostat: None,
        }
    }

    /// Plain NVE integrator with timestep `dt` fs.
    pub fn new(dt: f64, num_steps: u64) -> Result<Self, IntegrateError> {
        Self::builder().timestep(dt).num_steps(num_steps).build()
    }

    /// First half-kick followed by the drift.
    fn half_step_one(view: DynamicsView<'_>, dt: f64) {
        let DynamicsView {
            positions,
            velocities,
            forces,
            masses,
        } = view;
        for (i, &m) in masses.iter().enumerate() {
            let half_dt_over_m = 0.5 * dt / m;
            for k in 3 * i..3 * i + 3 {
                velocities[k] += half_dt_over_m * forces[k];
                positions[k] += dt * velocities[k];
            }
        }
    }

    /// Second half-kick.
    fn half_step_two(view: DynamicsView<'_>, dt: f64) {
        let DynamicsView {
            velocities,
            forces,
            masses,
            ..
        } = view;
        for (i, &m) in masses.iter().enumerate() {
            let half_dt_over_m = 0.5 * dt / m;
            for k in 3 * i..3 * i + 3 {
                velocities[k] += half_dt_over_m * forces[k];
            }
        }
    }
}

impl VelocityVerletBuilder {
    /// Set the timestep, fs. Must be finite and positive.
    pub fn timestep(mut self, dt: f64) -> Self {
        self.dt = Some(dt);
        self
    }

    /// Set the number of steps a run performs (default: 0).
    pub fn num_steps(mut self, n: u64) -> Self {
        self.num_steps = n;
        self
    }

    /// Seed for the thermostat RNG (default: 0).
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Compose a thermostat into the integrator.
    pub fn thermostat(mut self, thermostat: Box<dyn Thermostat>) -> Self {
        self.thermostat = Some(thermostat);
        self
    }

    /// Build the integrator.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrateError::InvalidTimestep`] if the timestep is
    /// missing, non-finite or not positive.
    pub fn build(self) -> Result<VelocityVerlet, IntegrateError> {
        let dt = self.dt.unwrap_or(f64::NAN);
        if !dt.is_finite() || dt <= 0.0 {
            return Err(IntegrateError::InvalidTimestep { dt });
        }
        Ok(VelocityVerlet {
            dt,
            num_steps: self.num_steps,
            current_step: 0,
            thermostat: self.thermostat,
            rng: ChaCha8Rng::seed_from_u64(self.seed),
        })
    }
}

impl Integrate for VelocityVerlet {
    fn name(&self) -> &str {
        "VelocityVerlet"
    }

    fn dt(&self) -> f64 {
        self.dt
    }

    fn num_steps(&self) -> u64 {
        self.num_steps
    }

    fn current_step(&self) -> u64 {
        self.current_step
    }

    fn thermostat(&self) -> Option<&dyn Thermostat> {
        self.thermostat.as_deref()
    }

    fn initialise(&mut self, state: &mut AtomicState) -> Result<(), IntegrateError> {
        if let Some(thermostat) = self.thermostat.as_mut() {
            log::info!(
                "Initialising {} thermostat at {} K",
                thermostat.name(),
                thermostat.target_temperature()
            );
            thermostat.initialise(state, &mut self.rng)?;
        }
        Ok(())
    }

    fn step(
        &mut self,
        state: &mut AtomicState,
        forces: &dyn Force,
        cell: &dyn Cell,
    ) -> Result<f64, IntegrateError> {
        let dt = self.dt;
        if let Some(thermostat) = self.thermostat.as_mut() {
            thermostat.before_step(state, dt, &mut self.rng)?;
        }

        Self::half_step_one(state.dynamics_view()?, dt);
        for r in state.positions_mut().as_mut_slice().chunks_exact_mut(3) {
            cell.pbc(r);
        }
        let potential = forces.evaluate(state, cell)?;
        Self::half_step_two(state.dynamics_view()?, dt);

        if let Some(thermostat) = self.thermostat.as_mut() {
            thermostat.after_step(state, dt, &mut self.rng)?;
        }
        self.current_step += 1;
        Ok(potential)
    }
}

impl std::fmt::Debug for VelocityVerlet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VelocityVerlet")
            .field("dt", &self.dt)
            .field("num_steps", &self.num_steps)
            .field("current_step", &self.current_step)
            .field("thermostat", &self.thermostat.as_ref().map(|t| t.name()))
            .finish()
    }
}

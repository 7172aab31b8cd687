//! Evans isokinetic thermostat.
//!
//! Adds a friction term `-χ·v` to the equations of motion with
//! `χ = Σ v·F / Σ m·v²`, which holds the kinetic energy constant. The
//! friction is applied as a multiplicative rescale `exp(-χ·dt/2)` before
//! the first half-step and again after the second.

use kinetic_core::{AtomicState, DynamicsView};
use rand::RngCore;

use crate::error::IntegrateError;
use crate::thermostat::Thermostat;

/// Isokinetic (NVEkin) thermostat.
#[derive(Clone, Debug, PartialEq)]
pub struct Evans {
    temperature: f64,
    warned_zero_kinetic: bool,
}

impl Evans {
    /// Create an Evans thermostat holding the system at `temperature` K.
    ///
    /// The temperature is only used to initialise velocities; from then
    /// on the kinetic energy is held at whatever it is.
    pub fn new(temperature: f64) -> Result<Self, IntegrateError> {
        if !temperature.is_finite() || temperature <= 0.0 {
            return Err(IntegrateError::InvalidParameter {
                name: "temperature",
                value: temperature,
            });
        }
        Ok(Self {
            temperature,
            warned_zero_kinetic: false,
        })
    }

    /// Friction coefficient `χ` for the current velocities and forces.
    ///
    /// The denominator is floored by `f64::EPSILON` so a system at rest
    /// yields `χ = 0` rather than a division by zero.
    pub fn friction(view: &DynamicsView<'_>) -> f64 {
        let mut power = 0.0;
        let mut twice_kinetic = 0.0;
        for (i, &m) in view.masses.iter().enumerate() {
            for k in 3 * i..3 * i + 3 {
                let v = view.velocities[k];
                power += v * view.forces[k];
                twice_kinetic += m * v * v;
            }
        }
        power / (twice_kinetic + f64::EPSILON)
    }

    fn rescale(&mut self, state: &mut AtomicState, dt: f64) -> Result<(), IntegrateError> {
        let mut view = state.dynamics_view()?;
        let chi = Self::friction(&view);
        if !self.warned_zero_kinetic && view.velocities.iter().all(|&v| v == 0.0) {
            log::warn!("Evans thermostat applied to a system with zero kinetic energy");
            self.warned_zero_kinetic = true;
        }
        let scale = (-chi * 0.5 * dt).exp();
        for v in view.velocities.iter_mut() {
            *v *= scale;
        }
        Ok(())
    }
}

impl Thermostat for Evans {
    fn name(&self) -> &str {
        "Evans"
    }

    fn target_temperature(&self) -> f64 {
        self.temperature
    }

    fn before_step(
        &mut self,
        state: &mut AtomicState,
        dt: f64,
        _rng: &mut dyn RngCore,
    ) -> Result<(), IntegrateError> {
        self.rescale(state, dt)
    }

    fn after_step(
        &mut self,
        state: &mut AtomicState,
        dt: f64,
        _rng: &mut dyn RngCore,
    ) -> Result<(), IntegrateError> {
        self.rescale(state, dt)
    }
}

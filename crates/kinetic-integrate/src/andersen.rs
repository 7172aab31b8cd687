//! Andersen stochastic thermostat.
//!
//! After each step every atom independently collides with a heat bath
//! with probability `1 - exp(-dt/τ)`. A colliding atom's velocity is
//! mixed with a ghost velocity drawn from the bath:
//! `v ← s·v + sqrt(1 - s²)·v_ghost`, where `s` is the softness (0 for a
//! full replacement, 1 for no effect). Ghost components are i.i.d.
//! normal with standard deviation `sqrt(k_B·T/m)`.
//!
//! Constructed via the builder pattern: [`Andersen::builder`].

use kinetic_core::units::BOLTZMANN_INTERNAL;
use kinetic_core::{AtomicState, DynamicsView};
use rand::{Rng, RngCore};
use rand_distr::{Distribution, StandardNormal};

use crate::error::IntegrateError;
use crate::thermostat::Thermostat;

/// Stochastic-collision (NVT) thermostat.
#[derive(Clone, Debug, PartialEq)]
pub struct Andersen {
    temperature: f64,
    t_relax: f64,
    softness: f64,
    mix_new: f64,
}

/// Builder for [`Andersen`].
///
/// Required fields: `temperature`, `relaxation_time`.
#[derive(Clone, Debug, Default)]
pub struct AndersenBuilder {
    temperature: Option<f64>,
    t_relax: Option<f64>,
    softness: f64,
}

impl Andersen {
    /// Create a new builder for configuring an `Andersen` thermostat.
    pub fn builder() -> AndersenBuilder {
        AndersenBuilder::default()
    }

    /// Mean time between collisions, fs.
    pub fn relaxation_time(&self) -> f64 {
        self.t_relax
    }

    /// Fraction of the old velocity kept in a collision.
    pub fn softness(&self) -> f64 {
        self.softness
    }

    /// Probability that an atom collides during a step of `dt` fs.
    pub fn collision_probability(&self, dt: f64) -> f64 {
        1.0 - (-dt / self.t_relax).exp()
    }
}

impl AndersenBuilder {
    /// Bath temperature, K. Must be finite and positive.
    pub fn temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Mean time between collisions `τ`, fs. Must be finite and positive.
    pub fn relaxation_time(mut self, t_relax: f64) -> Self {
        self.t_relax = Some(t_relax);
        self
    }

    /// Fraction of the old velocity kept in a collision (default: 0).
    /// Must lie in `[0, 1]`.
    pub fn softness(mut self, softness: f64) -> Self {
        self.softness = softness;
        self
    }

    /// Build the thermostat, validating all parameters.
    pub fn build(self) -> Result<Andersen, IntegrateError> {
        let temperature = self.temperature.unwrap_or(f64::NAN);
        if !temperature.is_finite() || temperature <= 0.0 {
            return Err(IntegrateError::InvalidParameter {
                name: "temperature",
                value: temperature,
            });
        }
        let t_relax = self.t_relax.unwrap_or(f64::NAN);
        if !t_relax.is_finite() || t_relax <= 0.0 {
            return Err(IntegrateError::InvalidParameter {
                name: "t_relax",
                value: t_relax,
            });
        }
        if !(0.0..=1.0).contains(&self.softness) {
            return Err(IntegrateError::InvalidParameter {
                name: "softness",
                value: self.softness,
            });
        }
        Ok(Andersen {
            temperature,
            t_relax,
            softness: self.softness,
            mix_new: (1.0 - self.softness * self.softness).sqrt(),
        })
    }
}

impl Thermostat for Andersen {
    fn name(&self) -> &str {
        "Andersen"
    }

    fn target_temperature(&self) -> f64 {
        self.temperature
    }

    fn before_step(
        &mut self,
        _state: &mut AtomicState,
        _dt: f64,
        _rng: &mut dyn RngCore,
    ) -> Result<(), IntegrateError> {
        Ok(())
    }

    fn after_step(
        &mut self,
        state: &mut AtomicState,
        dt: f64,
        rng: &mut dyn RngCore,
    ) -> Result<(), IntegrateError> {
        let prob = self.collision_probability(dt);
        let kt = BOLTZMANN_INTERNAL * self.temperature;
        let DynamicsView {
            velocities, masses, ..
        } = state.dynamics_view()?;
        for (v, &m) in velocities.chunks_exact_mut(3).zip(masses) {
            let u: f64 = rng.random();
            if u > prob {
                continue;
            }
            let vscale = (kt / m).sqrt();
            for c in v.iter_mut() {
                let ghost: f64 = StandardNormal.sample(rng);
                *c = self.softness * *c + self.mix_new * vscale * ghost;
            }
        }
        Ok(())
    }
}

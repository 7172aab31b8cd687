//! The [`Thermostat`] trait and shared velocity initialisation.
//!
//! All temperatures are in Kelvin and go through
//! [`BOLTZMANN_INTERNAL`]: `T = 2·<Ekin> / (3·k_B)`.

use kinetic_core::units::BOLTZMANN_INTERNAL;
use kinetic_core::{AtomicState, DynamicsView};
use rand::{Rng, RngCore};

use crate::error::IntegrateError;

/// Ensemble control composed into an integrator.
///
/// The integrator calls [`before_step`](Self::before_step) ahead of its
/// first half-step and [`after_step`](Self::after_step) after its second,
/// threading its own seeded RNG through both.
pub trait Thermostat: Send + 'static {
    /// Human-readable name, as used by configuration.
    fn name(&self) -> &str;

    /// Target temperature, K.
    fn target_temperature(&self) -> f64;

    /// Assign initial velocities. Defaults to [`initialise_velocities`]
    /// at the target temperature.
    fn initialise(
        &mut self,
        state: &mut AtomicState,
        rng: &mut dyn RngCore,
    ) -> Result<(), IntegrateError> {
        initialise_velocities(state, self.target_temperature(), rng)
    }

    /// Hook run before the first half-step.
    fn before_step(
        &mut self,
        state: &mut AtomicState,
        dt: f64,
        rng: &mut dyn RngCore,
    ) -> Result<(), IntegrateError>;

    /// Hook run after the second half-step.
    fn after_step(
        &mut self,
        state: &mut AtomicState,
        dt: f64,
        rng: &mut dyn RngCore,
    ) -> Result<(), IntegrateError>;
}

/// Instantaneous temperature of the state, K.
pub fn temperature(state: &AtomicState) -> Result<f64, IntegrateError> {
    Ok(2.0 * state.average_kinetic()? / (3.0 * BOLTZMANN_INTERNAL))
}

/// Draw random velocities at `target` K with zero net momentum.
///
/// Components are drawn i.i.d. from `U(-1, 1)`, the mass-weighted
/// centre-of-mass velocity is subtracted per axis, and everything is
/// rescaled by `sqrt(target / T_inst)`.
pub fn initialise_velocities(
    state: &mut AtomicState,
    target: f64,
    rng: &mut dyn RngCore,
) -> Result<(), IntegrateError> {
    if !target.is_finite() || target <= 0.0 {
        return Err(IntegrateError::InvalidTemperature {
            temperature: target,
        });
    }
    let n = state.num_atoms(None);
    if n == 0 {
        return Err(IntegrateError::EmptyState);
    }

    let total_mass: f64 = state.masses().iter().sum();
    {
        let DynamicsView {
            velocities, masses, ..
        } = state.dynamics_view()?;
        for v in velocities.iter_mut() {
            *v = rng.random_range(-1.0..1.0);
        }
        let mut momentum = [0.0; 3];
        for (v, &m) in velocities.chunks_exact(3).zip(masses) {
            for k in 0..3 {
                momentum[k] += m * v[k];
            }
        }
        let com = momentum.map(|p| p / total_mass);
        for v in velocities.chunks_exact_mut(3) {
            for k in 0..3 {
                v[k] -= com[k];
            }
        }
    }

    let current = temperature(state)?;
    if current <= 0.0 {
        return Err(IntegrateError::ZeroKineticEnergy);
    }
    let scale = (target / current).sqrt();
    for v in state.velocities_mut()?.iter_mut() {
        *v *= scale;
    }
    log::info!("Initialised velocities for {n} atom(s) at {target} K");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kinetic_core::{AtomType, Tensor};
    use kinetic_test_utils::fixtures::argon_box;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::sync::Arc;

    fn com_velocity(state: &AtomicState) -> [f64; 3] {
        let v = state.velocities().unwrap();
        let mut p = [0.0; 3];
        let mut m_tot = 0.0;
        for (i, &m) in state.masses().iter().enumerate() {
            for k in 0..3 {
                p[k] += m * v[[i, k]];
            }
            m_tot += m;
        }
        p.map(|x| x / m_tot)
    }

    #[test]
    fn temperature_of_known_velocities() {
        let ar = Arc::new(AtomType::builder("Ar").build().unwrap());
        let v = Tensor::from_vec(vec![1e-3, 0.0, 0.0, -1e-3, 0.0, 0.0], [2, 3]).unwrap();
        let mut s = AtomicState::new_dynamic();
        s.add(vec![ar.clone(), ar], Tensor::new([2, 3]), Some(v), None)
            .unwrap();
        let avg_ke = 0.5 * 39.948 * 1e-6;
        let expected = 2.0 * avg_ke / (3.0 * BOLTZMANN_INTERNAL);
        assert!((temperature(&s).unwrap() - expected).abs() < 1e-9 * expected);
    }

    #[test]
    fn initialise_hits_target_with_zero_momentum() {
        let (mut s, _) = argon_box(4, 1.0, 1);
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        initialise_velocities(&mut s, 300.0, &mut rng).unwrap();
        assert!((temperature(&s).unwrap() - 300.0).abs() < 1e-8);
        for c in com_velocity(&s) {
            assert!(c.abs() < 1e-14, "com velocity {c}");
        }
    }

    #[test]
    fn initialise_mixed_masses_zeroes_momentum() {
        let h = Arc::new(AtomType::builder("H").build().unwrap());
        let ar = Arc::new(AtomType::builder("Ar").build().unwrap());
        let mut s = AtomicState::new_dynamic();
        s.add(vec![h.clone(), ar.clone(), h, ar], Tensor::new([4, 3]), None, None)
            .unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        initialise_velocities(&mut s, 50.0, &mut rng).unwrap();
        for c in com_velocity(&s) {
            assert!(c.abs() < 1e-14, "com velocity {c}");
        }
        assert!((temperature(&s).unwrap() - 50.0).abs() < 1e-8);
    }

    #[test]
    fn initialise_is_reproducible_per_seed() {
        let (mut a, _) = argon_box(2, 1.0, 1);
        let (mut b, _) = argon_box(2, 1.0, 1);
        initialise_velocities(&mut a, 100.0, &mut ChaCha8Rng::seed_from_u64(9)).unwrap();
        initialise_velocities(&mut b, 100.0, &mut ChaCha8Rng::seed_from_u64(9)).unwrap();
        assert_eq!(a.velocities().unwrap(), b.velocities().unwrap());
    }

    #[test]
    fn initialise_rejects_bad_input() {
        let (mut s, _) = argon_box(2, 1.0, 1);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert_eq!(
            initialise_velocities(&mut s, 0.0, &mut rng).unwrap_err(),
            IntegrateError::InvalidTemperature { temperature: 0.0 }
        );

        let mut empty = AtomicState::new_dynamic();
        empty
            .add(Vec::new(), Tensor::new([0, 3]), None, None)
            .unwrap();
        assert_eq!(
            initialise_velocities(&mut empty, 10.0, &mut rng).unwrap_err(),
            IntegrateError::EmptyState
        );
    }

    proptest! {
        #[test]
        fn initialise_hits_any_target(target in 1.0f64..5000.0, seed in any::<u64>()) {
            let (mut s, _) = argon_box(2, 1.0, 0);
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            initialise_velocities(&mut s, target, &mut rng).unwrap();
            let t = temperature(&s).unwrap();
            prop_assert!((t - target).abs() < 1e-9 * target, "{} vs {}", t, target);
            for c in com_velocity(&s) {
                prop_assert!(c.abs() < 1e-12);
            }
        }
    }
}

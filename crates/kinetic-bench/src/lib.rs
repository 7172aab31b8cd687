//! Benchmark profiles and utilities for the Kinetic molecular-dynamics engine.
//!
//! Provides pre-built [`SimulationConfig`] profiles for benchmarking:
//!
//! - [`reference_profile`]: 216 argon atoms (6³ lattice), Andersen NVT
//! - [`stress_profile`]: 1000 argon atoms (10³ lattice), same control
//! - [`lattice_state`]: deterministic jittered cubic lattice via seed

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::sync::Arc;

use kinetic_core::{AtomType, AtomicState, Tensor};
use kinetic_engine::{
    CellConfig, ControlConfig, Ensemble, ForceConfig, IntegratorConfig, SimulationConfig,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Lattice spacing of the benchmark profiles, Å. Roughly liquid argon.
pub const SPACING: f64 = 3.8;

/// Build an argon state of `per_side³` atoms on a cubic lattice with
/// spacing `spacing`, each coordinate offset by `spacing/2` and jittered
/// uniformly by up to `±jitter`.
pub fn lattice_state(per_side: usize, spacing: f64, jitter: f64, seed: u64) -> AtomicState {
    let n = per_side * per_side * per_side;
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut coords = Vec::with_capacity(3 * n);
    for i in 0..per_side {
        for j in 0..per_side {
            for k in 0..per_side {
                for idx in [i, j, k] {
                    let offset = if jitter > 0.0 {
                        rng.random_range(-jitter..jitter)
                    } else {
                        0.0
                    };
                    coords.push(spacing * (idx as f64 + 0.5) + offset);
                }
            }
        }
    }
    let argon = Arc::new(AtomType::builder("Ar").build().unwrap());
    let positions = Tensor::from_vec(coords, [n, 3]).unwrap();
    let mut state = AtomicState::new_dynamic();
    state.add(vec![argon; n], positions, None, None).unwrap();
    state
}

fn profile(per_side: usize, seed: u64) -> (AtomicState, SimulationConfig) {
    let state = lattice_state(per_side, SPACING, 0.1, seed);
    let config = SimulationConfig {
        cell: CellConfig::Cubic {
            length: SPACING * per_side as f64,
        },
        integrator: IntegratorConfig {
            timestep: 2.0,
            num_steps: 100,
            seed,
            ensemble: Ensemble::Nvt,
            control: Some(ControlConfig::Andersen {
                temperature: 120.0,
                t_relax: 100.0,
                softness: 0.0,
            }),
        },
        forces: vec![ForceConfig::LennardJones],
        outputs: Vec::new(),
    };
    (state, config)
}

/// Reference benchmark profile: 216 argon atoms in a periodic cube.
///
/// Andersen thermostat at 120 K, dt = 2 fs, 100 steps, no output.
pub fn reference_profile(seed: u64) -> (AtomicState, SimulationConfig) {
    profile(6, seed)
}

/// Stress benchmark profile: 1000 argon atoms.
///
/// Same control as [`reference_profile`] at ~4.6x the atom count.
pub fn stress_profile(seed: u64) -> (AtomicState, SimulationConfig) {
    profile(10, seed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_profile_validates() {
        let (state, config) = reference_profile(42);
        config.validate().unwrap();
        assert_eq!(state.num_atoms(None), 216);
    }

    #[test]
    fn stress_profile_validates() {
        let (state, config) = stress_profile(42);
        config.validate().unwrap();
        assert_eq!(state.num_atoms(None), 1000);
    }

    #[test]
    fn lattice_stays_inside_cell() {
        let state = lattice_state(4, SPACING, 0.5, 7);
        let length = 4.0 * SPACING;
        for &c in state.positions().iter() {
            assert!(c > 0.0 && c < length, "coordinate {c} out of bounds");
        }
    }

    #[test]
    fn lattice_deterministic() {
        let a = lattice_state(3, SPACING, 0.2, 42);
        let b = lattice_state(3, SPACING, 0.2, 42);
        assert_eq!(a.positions(), b.positions());
    }

    #[test]
    fn reference_profile_runs() {
        let (state, mut config) = reference_profile(1);
        config.integrator.num_steps = 3;
        let mut md = config.build(state).unwrap();
        md.run().unwrap();
        assert_eq!(md.current_step(), 3);
    }
}

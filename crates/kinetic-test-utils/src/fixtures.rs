//! Reusable argon test systems.
//!
//! - [`argon_dimer`]: two argon atoms at the Lennard-Jones minimum.
//! - [`argon_box`]: argon on a jittered cubic lattice in a periodic box
//!   sized for a target density.

use std::sync::Arc;

use kinetic_cell::CubicCell;
use kinetic_core::units::{KG_TO_DALTON, LITRE_TO_CUBIC_ANGSTROM};
use kinetic_core::{AtomType, AtomicState, Tensor};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

/// Density of argon gas at standard temperature and pressure, kg/L.
pub const ARGON_STP_DENSITY_KG_PER_L: f64 = 1.784e-3;

/// Shared argon atom type with element defaults.
pub fn argon() -> Arc<AtomType> {
    Arc::new(
        AtomType::builder("Ar")
            .build()
            .expect("argon has built-in defaults"),
    )
}

/// Separation of the Lennard-Jones minimum, `2^(1/6)·σ`.
pub fn lj_minimum(sigma: f64) -> f64 {
    2f64.powf(1.0 / 6.0) * sigma
}

/// A dynamic two-atom argon state at rest, separated along x by the
/// Lennard-Jones minimum distance.
///
/// Atom 0 sits at `(r_min, 0, 0)`, atom 1 at the origin.
pub fn argon_dimer() -> AtomicState {
    let ar = argon();
    let sigma = ar.get("sigma_lj").expect("argon has sigma_lj");
    let positions = Tensor::from_vec(vec![lj_minimum(sigma), 0.0, 0.0, 0.0, 0.0, 0.0], [2, 3])
        .expect("2x3 buffer");
    let mut state = AtomicState::new_dynamic();
    state
        .add(vec![ar.clone(), ar], positions, None, None)
        .expect("fresh state");
    state
}

/// Side length of a cube holding `num_atoms` argon atoms at
/// `density_scale` times STP density.
pub fn argon_box_length(num_atoms: usize, density_scale: f64) -> f64 {
    let density =
        density_scale * ARGON_STP_DENSITY_KG_PER_L * KG_TO_DALTON / LITRE_TO_CUBIC_ANGSTROM;
    let mass = num_atoms as f64 * argon().mass();
    (mass / density).cbrt()
}

/// A dynamic argon state of `per_side³` atoms on a cubic lattice with
/// spacing `δ = L / per_side`, offset by `δ/2` and jittered by Gaussian
/// noise of standard deviation `δ/10`, plus the periodic cell.
///
/// Velocities start at zero. The jitter is drawn from a `ChaCha8Rng`
/// seeded with `seed`, so the layout is reproducible.
pub fn argon_box(per_side: usize, density_scale: f64, seed: u64) -> (AtomicState, CubicCell) {
    let n = per_side * per_side * per_side;
    let length = argon_box_length(n, density_scale);
    let cell = CubicCell::new(length).expect("positive box length");
    let delta = length / per_side as f64;
    let jitter = Normal::new(0.0, delta / 10.0).expect("finite jitter");
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let mut coords = Vec::with_capacity(3 * n);
    for i in 0..per_side {
        for j in 0..per_side {
            for k in 0..per_side {
                for idx in [i, j, k] {
                    coords.push(delta * idx as f64 + 0.5 * delta + jitter.sample(&mut rng));
                }
            }
        }
    }
    let positions = Tensor::from_vec(coords, [n, 3]).expect("n x 3 buffer");
    let ar = argon();
    let mut state = AtomicState::new_dynamic();
    state
        .add(vec![ar; n], positions, None, None)
        .expect("fresh state");
    (state, cell)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimer_layout() {
        let s = argon_dimer();
        assert_eq!(s.num_atoms(None), 2);
        assert!((s.pos(0)[0] - 3.405 * 2f64.powf(1.0 / 6.0)).abs() < 1e-12);
        assert_eq!(s.pos(1), &[0.0, 0.0, 0.0]);
        assert_eq!(s.kinetic(None).unwrap(), 0.0);
    }

    #[test]
    fn box_has_requested_atoms_and_density() {
        let (s, cell) = argon_box(4, 10.0, 7);
        assert_eq!(s.num_atoms(None), 64);
        let density = 64.0 * 39.948 / kinetic_cell::Cell::volume(&cell);
        let expected = 10.0 * ARGON_STP_DENSITY_KG_PER_L * KG_TO_DALTON / LITRE_TO_CUBIC_ANGSTROM;
        assert!((density - expected).abs() / expected < 1e-12);
    }

    #[test]
    fn box_is_reproducible_per_seed() {
        let (a, _) = argon_box(2, 1.0, 3);
        let (b, _) = argon_box(2, 1.0, 3);
        let (c, _) = argon_box(2, 1.0, 4);
        assert_eq!(a.positions(), b.positions());
        assert_ne!(a.positions(), c.positions());
    }
}

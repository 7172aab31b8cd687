//! All-pairs Lennard-Jones force.
//!
//! For each unique pair `i < j` with minimum-image displacement
//! `d = r_j - r_i` and `r² = |d|²`:
//!
//! - `B = (σ²/r²)³`, `A = B²`
//! - `U += 4ε(A - B)`
//! - `f = 24ε/r² · (2A - B)`; atom `i` gets `-f·d`, atom `j` gets `+f·d`
//!
//! Per-pair σ and ε come from `T x T` tables mixed once at construction:
//! σ by the arithmetic mean (Lorentz), ε by the geometric mean
//! (Berthelot). There is no cutoff; cost is O(N²) per evaluation.

use std::sync::Arc;

use kinetic_cell::Cell;
use kinetic_core::atom_type::{EPS_LJ, SIGMA_LJ};
use kinetic_core::{AtomType, AtomicState};
use kinetic_force::{Force, ForceError};

/// Lennard-Jones 12-6 pair potential.
#[derive(Clone, Debug, PartialEq)]
pub struct LennardJones {
    num_species: usize,
    sigma: Vec<f64>,
    epsilon: Vec<f64>,
}

impl LennardJones {
    /// Build mixing tables for `species`, indexed by
    /// [`SpeciesId`](kinetic_core::SpeciesId).
    ///
    /// Every atom type must carry `sigma_lj` (Å) and `eps_lj` (internal
    /// energy units); a missing one fails with
    /// [`ForceError::MissingParameter`].
    pub fn new(species: &[Arc<AtomType>]) -> Result<Self, ForceError> {
        let t = species.len();
        let mut own = Vec::with_capacity(t);
        for atom_type in species {
            own.push((lookup(atom_type, SIGMA_LJ)?, lookup(atom_type, EPS_LJ)?));
        }

        let mut sigma = vec![0.0; t * t];
        let mut epsilon = vec![0.0; t * t];
        for i in 0..t {
            for j in i..t {
                let (s_i, e_i) = own[i];
                let (s_j, e_j) = own[j];
                let s = 0.5 * (s_i + s_j);
                let e = (e_i * e_j).sqrt();
                sigma[i * t + j] = s;
                sigma[j * t + i] = s;
                epsilon[i * t + j] = e;
                epsilon[j * t + i] = e;
            }
        }
        log::debug!("LennardJones mixing tables built for {t} species");
        Ok(Self {
            num_species: t,
            sigma,
            epsilon,
        })
    }

    /// Build mixing tables for the species registered in `state`.
    pub fn for_state(state: &AtomicState) -> Result<Self, ForceError> {
        Self::new(state.species())
    }

    /// Number of species the tables cover.
    pub fn num_species(&self) -> usize {
        self.num_species
    }

    /// Mixed σ for a species pair.
    pub fn sigma(&self, a: usize, b: usize) -> f64 {
        self.sigma[a * self.num_species + b]
    }

    /// Mixed ε for a species pair.
    pub fn epsilon(&self, a: usize, b: usize) -> f64 {
        self.epsilon[a * self.num_species + b]
    }
}

fn lookup(atom_type: &AtomType, name: &str) -> Result<f64, ForceError> {
    atom_type
        .get(name)
        .ok_or_else(|| ForceError::MissingParameter {
            force: "LennardJones".to_string(),
            atom_type: atom_type.id().to_string(),
            name: name.to_string(),
        })
}

impl Force for LennardJones {
    fn name(&self) -> &str {
        "LennardJones"
    }

    fn evaluate(&self, state: &mut AtomicState, cell: &dyn Cell) -> Result<f64, ForceError> {
        if state.num_species() != self.num_species {
            return Err(ForceError::SpeciesMismatch {
                expected: self.num_species,
                actual: state.num_species(),
            });
        }
        let t = self.num_species;
        let view = state.force_view()?;
        let n = view.species.len();
        let pos = view.positions;
        let forces = view.forces;

        let mut potential = 0.0;
        for i in 0..n {
            let si = view.species[i].index();
            for j in (i + 1)..n {
                let mut d = [
                    pos[3 * j] - pos[3 * i],
                    pos[3 * j + 1] - pos[3 * i + 1],
                    pos[3 * j + 2] - pos[3 * i + 2],
                ];
                cell.min_image(&mut d);
                let r2 = d[0] * d[0] + d[1] * d[1] + d[2] * d[2];
                if r2 == 0.0 {
                    return Err(ForceError::CoincidentAtoms { i, j });
                }

                let idx = si * t + view.species[j].index();
                let sigma = self.sigma[idx];
                let eps = self.epsilon[idx];

                let b = (sigma * sigma / r2).powi(3);
                let a = b * b;
                potential += 4.0 * eps * (a - b);
                let f = 24.0 * eps / r2 * (2.0 * a - b);
                for k in 0..3 {
                    forces[3 * i + k] -= f * d[k];
                    forces[3 * j + k] += f * d[k];
                }
            }
        }
        Ok(potential)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kinetic_cell::{CubicCell, UnboundedCell};
    use kinetic_core::units::EV_TO_INTERNAL;
    use kinetic_core::Tensor;
    use kinetic_test_utils::fixtures::argon_dimer;
    use proptest::prelude::*;

    fn custom(id: &str, sigma: f64, eps: f64) -> Arc<AtomType> {
        Arc::new(
            AtomType::builder(id)
                .mass(10.0)
                .nuclear_charge(1)
                .num_electrons(1)
                .param(SIGMA_LJ, sigma)
                .param(EPS_LJ, eps)
                .build()
                .unwrap(),
        )
    }

    fn state_with(types: Vec<Arc<AtomType>>, coords: Vec<f64>) -> AtomicState {
        let n = types.len();
        let mut s = AtomicState::new_dynamic();
        s.add(types, Tensor::from_vec(coords, [n, 3]).unwrap(), None, None)
            .unwrap();
        s
    }

    // ── Mixing tables ───────────────────────────────────────────

    #[test]
    fn mixing_rules() {
        let lj = LennardJones::new(&[custom("A", 2.0, 4.0), custom("B", 4.0, 1.0)]).unwrap();
        assert_eq!(lj.num_species(), 2);
        assert_eq!(lj.sigma(0, 0), 2.0);
        assert_eq!(lj.sigma(0, 1), 3.0);
        assert_eq!(lj.sigma(1, 0), 3.0);
        assert_eq!(lj.epsilon(0, 1), 2.0);
        assert_eq!(lj.epsilon(1, 1), 1.0);
    }

    #[test]
    fn argon_defaults_are_used() {
        let ar = Arc::new(AtomType::builder("Ar").build().unwrap());
        let lj = LennardJones::new(&[ar]).unwrap();
        assert_eq!(lj.sigma(0, 0), 3.405);
        assert!((lj.epsilon(0, 0) - 0.012_352_9 * EV_TO_INTERNAL).abs() < 1e-18);
    }

    #[test]
    fn missing_parameter_reported() {
        let bare = Arc::new(
            AtomType::builder("X")
                .mass(1.0)
                .nuclear_charge(1)
                .num_electrons(1)
                .param(SIGMA_LJ, 1.0)
                .build()
                .unwrap(),
        );
        assert_eq!(
            LennardJones::new(&[bare]).unwrap_err(),
            ForceError::MissingParameter {
                force: "LennardJones".into(),
                atom_type: "X".into(),
                name: EPS_LJ.into(),
            }
        );
    }

    // ── Evaluation ──────────────────────────────────────────────

    #[test]
    fn dimer_at_minimum() {
        let mut state = argon_dimer();
        let lj = LennardJones::for_state(&state).unwrap();
        let eps = lj.epsilon(0, 0);
        let pot = lj.evaluate(&mut state, &UnboundedCell).unwrap();
        assert!(
            ((pot + eps) / eps).abs() < 1e-12,
            "potential {pot}, expected {}",
            -eps
        );
        for &f in state.forces().unwrap().iter() {
            assert!(f.abs() < 1e-14, "residual force {f}");
        }
    }

    #[test]
    fn repulsive_inside_minimum() {
        let a = custom("A", 1.0, 1.0);
        let mut state = state_with(vec![a.clone(), a], vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0]);
        let lj = LennardJones::for_state(&state).unwrap();
        let pot = lj.evaluate(&mut state, &UnboundedCell).unwrap();
        // r = σ: U = 0, f = 24ε/σ²
        assert!(pot.abs() < 1e-15);
        assert!((state.force(1).unwrap()[0] - 24.0).abs() < 1e-12);
        assert!((state.force(0).unwrap()[0] + 24.0).abs() < 1e-12);
    }

    #[test]
    fn forces_match_energy_gradient() {
        let a = custom("A", 3.0, 0.2);
        let b = custom("B", 3.6, 0.1);
        let coords = vec![0.0, 0.0, 0.0, 3.4, 0.3, -0.2, 1.1, 3.5, 0.4];
        let mut state = state_with(vec![a, b.clone(), b], coords);
        let lj = LennardJones::for_state(&state).unwrap();
        lj.evaluate(&mut state, &UnboundedCell).unwrap();
        let analytic = state.forces().unwrap().clone();

        let h = 1e-6;
        for atom in 0..3 {
            for k in 0..3 {
                state.pos_mut(atom)[k] += h;
                let up = lj.evaluate(&mut state, &UnboundedCell).unwrap();
                state.pos_mut(atom)[k] -= 2.0 * h;
                let down = lj.evaluate(&mut state, &UnboundedCell).unwrap();
                state.pos_mut(atom)[k] += h;
                let numeric = -(up - down) / (2.0 * h);
                let exact = analytic[[atom, k]];
                assert!(
                    (numeric - exact).abs() < 1e-6 * (1.0 + exact.abs()),
                    "atom {atom} axis {k}: numeric {numeric}, analytic {exact}"
                );
            }
        }
    }

    #[test]
    fn periodic_image_is_nearest() {
        let a = custom("A", 1.0, 1.0);
        let cell = CubicCell::new(10.0).unwrap();
        let mut wrapped = state_with(vec![a.clone(), a.clone()], vec![0.6, 0.0, 0.0, 9.4, 0.0, 0.0]);
        let mut direct = state_with(vec![a.clone(), a], vec![0.6, 0.0, 0.0, -0.6, 0.0, 0.0]);
        let lj = LennardJones::for_state(&wrapped).unwrap();
        let pw = lj.evaluate(&mut wrapped, &cell).unwrap();
        let pd = lj.evaluate(&mut direct, &UnboundedCell).unwrap();
        assert!((pw - pd).abs() < 1e-9 * pd.abs());
        assert!((wrapped.force(0).unwrap()[0] - direct.force(0).unwrap()[0]).abs() < 1e-6);
    }

    #[test]
    fn coincident_atoms_rejected() {
        let a = custom("A", 1.0, 1.0);
        let mut state = state_with(vec![a.clone(), a], vec![1.0, 1.0, 1.0, 1.0, 1.0, 1.0]);
        let lj = LennardJones::for_state(&state).unwrap();
        assert_eq!(
            lj.evaluate(&mut state, &UnboundedCell).unwrap_err(),
            ForceError::CoincidentAtoms { i: 0, j: 1 }
        );
    }

    #[test]
    fn species_mismatch_rejected() {
        let lj = LennardJones::new(&[custom("A", 1.0, 1.0), custom("B", 1.0, 1.0)]).unwrap();
        let a = custom("A", 1.0, 1.0);
        let mut state = state_with(vec![a.clone(), a], vec![0.0, 0.0, 0.0, 2.0, 0.0, 0.0]);
        assert_eq!(
            lj.evaluate(&mut state, &UnboundedCell).unwrap_err(),
            ForceError::SpeciesMismatch {
                expected: 2,
                actual: 1
            }
        );
    }

    // ── Property tests ──────────────────────────────────────────

    proptest! {
        #[test]
        fn mixing_tables_symmetric(
            params in proptest::collection::vec((0.5f64..5.0, 1e-4f64..1.0), 1..5)
        ) {
            let species: Vec<_> = params
                .iter()
                .enumerate()
                .map(|(k, &(s, e))| custom(&format!("S{k}"), s, e))
                .collect();
            let lj = LennardJones::new(&species).unwrap();
            let t = species.len();
            for i in 0..t {
                prop_assert_eq!(lj.sigma(i, i), params[i].0);
                prop_assert!((lj.epsilon(i, i) - params[i].1).abs() <= 1e-15 * params[i].1);
                for j in 0..t {
                    prop_assert_eq!(lj.sigma(i, j), lj.sigma(j, i));
                    prop_assert_eq!(lj.epsilon(i, j), lj.epsilon(j, i));
                }
            }
        }

        #[test]
        fn net_force_vanishes(
            coords in proptest::collection::vec(0.0f64..12.0, 12)
        ) {
            let a = custom("A", 1.0, 0.5);
            let mut state = state_with(vec![a.clone(), a.clone(), a.clone(), a], coords);
            let lj = LennardJones::for_state(&state).unwrap();
            let cell = CubicCell::new(12.0).unwrap();
            if lj.evaluate(&mut state, &cell).is_ok() {
                let f = state.forces().unwrap();
                for k in 0..3 {
                    let total: f64 = (0..4).map(|i| f[[i, k]]).sum();
                    let scale: f64 = (0..4).map(|i| f[[i, k]].abs()).sum::<f64>().max(1.0);
                    prop_assert!(total.abs() <= 1e-9 * scale, "axis {} net force {}", k, total);
                }
            }
        }
    }
}

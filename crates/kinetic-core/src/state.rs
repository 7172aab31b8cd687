//! The mutable particle store.
//!
//! An [`AtomicState`] owns positions (and, for a dynamic state,
//! velocities and forces) as `N x 3` tensors, plus the per-atom species
//! assignment. It is populated exactly once through [`AtomicState::add`]
//! or [`AtomicState::from_species_blocks`]; afterwards atom count and
//! ordering never change.
//!
//! Force kernels and integrators need to read one buffer while writing
//! another. [`ForceView`] and [`DynamicsView`] hand out disjoint slices
//! for exactly that.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::atom_type::AtomType;
use crate::error::StateError;
use crate::id::SpeciesId;
use crate::tensor::Tensor;

/// Borrowed slices for force evaluation: read positions, write forces.
#[derive(Debug)]
pub struct ForceView<'a> {
    /// Flat `N x 3` positions.
    pub positions: &'a [f64],
    /// Flat `N x 3` forces.
    pub forces: &'a mut [f64],
    /// Species of each atom.
    pub species: &'a [SpeciesId],
}

/// Borrowed slices for integration: write positions and velocities,
/// read forces and masses.
#[derive(Debug)]
pub struct DynamicsView<'a> {
    /// Flat `N x 3` positions.
    pub positions: &'a mut [f64],
    /// Flat `N x 3` velocities.
    pub velocities: &'a mut [f64],
    /// Flat `N x 3` forces.
    pub forces: &'a [f64],
    /// Mass of each atom, Da.
    pub masses: &'a [f64],
}

/// One contiguous run of atoms of a single species, as produced by a
/// structure reader.
#[derive(Clone, Debug)]
pub struct SpeciesBlock {
    /// Species of every atom in the block.
    pub atom_type: Arc<AtomType>,
    /// `n x 3` positions.
    pub positions: Tensor<f64, 2>,
    /// `n x 3` velocities; zero-filled when absent.
    pub velocities: Option<Tensor<f64, 2>>,
    /// `n x 3` forces; zero-filled when absent.
    pub forces: Option<Tensor<f64, 2>>,
}

/// Positions, velocities, forces and species of every atom.
#[derive(Clone, Debug)]
pub struct AtomicState {
    dynamic: bool,
    populated: bool,
    positions: Tensor<f64, 2>,
    velocities: Option<Tensor<f64, 2>>,
    forces: Option<Tensor<f64, 2>>,
    species: Vec<Arc<AtomType>>,
    species_idx: IndexMap<String, SpeciesId>,
    species_counts: Vec<usize>,
    atom_species: Vec<SpeciesId>,
    masses: Vec<f64>,
}

fn check_shape(
    buffer: &'static str,
    tensor: &Tensor<f64, 2>,
    num_atoms: usize,
) -> Result<(), StateError> {
    let [rows, cols] = tensor.extents();
    if rows != num_atoms || cols != 3 {
        return Err(StateError::ShapeMismatch {
            buffer,
            num_atoms,
            rows,
            cols,
        });
    }
    Ok(())
}

impl AtomicState {
    fn empty(dynamic: bool) -> Self {
        Self {
            dynamic,
            populated: false,
            positions: Tensor::new([0, 3]),
            velocities: None,
            forces: None,
            species: Vec::new(),
            species_idx: IndexMap::new(),
            species_counts: Vec::new(),
            atom_species: Vec::new(),
            masses: Vec::new(),
        }
    }

    /// An empty state that will hold positions only.
    pub fn new_static() -> Self {
        Self::empty(false)
    }

    /// An empty state that will hold positions, velocities and forces.
    pub fn new_dynamic() -> Self {
        Self::empty(true)
    }

    /// Populate the state.
    ///
    /// `atom_types[i]` is the species of atom `i`; every tensor must be
    /// `atom_types.len() x 3`. For a dynamic state, absent velocities or
    /// forces are zero-filled; a static state ignores them.
    ///
    /// Species identifiers are assigned in order of first appearance.
    /// Two atom types with the same `id()` are treated as one species.
    pub fn add(
        &mut self,
        atom_types: Vec<Arc<AtomType>>,
        positions: Tensor<f64, 2>,
        velocities: Option<Tensor<f64, 2>>,
        forces: Option<Tensor<f64, 2>>,
    ) -> Result<(), StateError> {
        if self.populated {
            return Err(StateError::AlreadyPopulated);
        }
        let n = atom_types.len();
        check_shape("positions", &positions, n)?;
        if let Some(v) = &velocities {
            check_shape("velocities", v, n)?;
        }
        if let Some(f) = &forces {
            check_shape("forces", f, n)?;
        }

        self.positions = positions;
        if self.dynamic {
            self.velocities = Some(velocities.unwrap_or_else(|| Tensor::new([n, 3])));
            self.forces = Some(forces.unwrap_or_else(|| Tensor::new([n, 3])));
        }

        self.atom_species.reserve(n);
        self.masses.reserve(n);
        for atom_type in atom_types {
            let sid = match self.species_idx.get(atom_type.id()) {
                Some(&sid) => sid,
                None => {
                    let sid = SpeciesId(self.species.len() as u32);
                    self.species_idx.insert(atom_type.id().to_string(), sid);
                    self.species.push(Arc::clone(&atom_type));
                    self.species_counts.push(0);
                    sid
                }
            };
            self.species_counts[sid.index()] += 1;
            self.atom_species.push(sid);
            self.masses.push(atom_type.mass());
        }
        self.populated = true;

        log::debug!(
            "populated {} atomic state: {} atom(s), {} species",
            if self.dynamic { "dynamic" } else { "static" },
            n,
            self.species.len()
        );
        Ok(())
    }

    /// Build a state from per-species blocks, concatenated in order.
    pub fn from_species_blocks(dynamic: bool, blocks: Vec<SpeciesBlock>) -> Result<Self, StateError> {
        let mut atom_types = Vec::new();
        let mut positions = Tensor::new([0, 3]);
        let mut velocities = Tensor::new([0, 3]);
        let mut forces = Tensor::new([0, 3]);
        for block in blocks {
            let count = block.positions.size(0);
            check_shape("positions", &block.positions, count)?;
            positions.concatenate(&block.positions, 0)?;
            if dynamic {
                let v = block.velocities.unwrap_or_else(|| Tensor::new([count, 3]));
                check_shape("velocities", &v, count)?;
                velocities.concatenate(&v, 0)?;
                let f = block.forces.unwrap_or_else(|| Tensor::new([count, 3]));
                check_shape("forces", &f, count)?;
                forces.concatenate(&f, 0)?;
            }
            atom_types.extend(std::iter::repeat_n(block.atom_type, count));
        }
        let mut state = Self::empty(dynamic);
        if dynamic {
            state.add(atom_types, positions, Some(velocities), Some(forces))?;
        } else {
            state.add(atom_types, positions, None, None)?;
        }
        Ok(state)
    }

    /// Whether the state carries velocities and forces.
    pub fn is_dynamic(&self) -> bool {
        self.dynamic
    }

    /// Atom count, in total or for one species.
    pub fn num_atoms(&self, species: Option<SpeciesId>) -> usize {
        match species {
            None => self.atom_species.len(),
            Some(sid) => self.species_counts.get(sid.index()).copied().unwrap_or(0),
        }
    }

    /// Number of distinct species.
    pub fn num_species(&self) -> usize {
        self.species.len()
    }

    /// Distinct species, indexed by [`SpeciesId`].
    pub fn species(&self) -> &[Arc<AtomType>] {
        &self.species
    }

    /// Map from species identifier to handle.
    pub fn atom_type_idx(&self) -> &IndexMap<String, SpeciesId> {
        &self.species_idx
    }

    /// Handle of the species whose identifier matches `atom_type`.
    pub fn atom_type_idx_of(&self, atom_type: &AtomType) -> Option<SpeciesId> {
        self.species_idx.get(atom_type.id()).copied()
    }

    /// Species of atom `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= num_atoms(None)`.
    pub fn species_of(&self, i: usize) -> SpeciesId {
        self.atom_species[i]
    }

    /// Atom type of atom `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= num_atoms(None)`.
    pub fn atom_type(&self, i: usize) -> &Arc<AtomType> {
        &self.species[self.atom_species[i].index()]
    }

    /// Species of every atom.
    pub fn atom_species(&self) -> &[SpeciesId] {
        &self.atom_species
    }

    /// Mass of every atom, Da.
    pub fn masses(&self) -> &[f64] {
        &self.masses
    }

    /// Positions, `N x 3`.
    pub fn positions(&self) -> &Tensor<f64, 2> {
        &self.positions
    }

    /// Positions, `N x 3`, mutably.
    pub fn positions_mut(&mut self) -> &mut Tensor<f64, 2> {
        &mut self.positions
    }

    /// Velocities, `N x 3`.
    pub fn velocities(&self) -> Result<&Tensor<f64, 2>, StateError> {
        self.velocities
            .as_ref()
            .ok_or(StateError::MissingBuffer { buffer: "velocities" })
    }

    /// Velocities, `N x 3`, mutably.
    pub fn velocities_mut(&mut self) -> Result<&mut Tensor<f64, 2>, StateError> {
        self.velocities
            .as_mut()
            .ok_or(StateError::MissingBuffer { buffer: "velocities" })
    }

    /// Forces, `N x 3`.
    pub fn forces(&self) -> Result<&Tensor<f64, 2>, StateError> {
        self.forces
            .as_ref()
            .ok_or(StateError::MissingBuffer { buffer: "forces" })
    }

    /// Forces, `N x 3`, mutably.
    pub fn forces_mut(&mut self) -> Result<&mut Tensor<f64, 2>, StateError> {
        self.forces
            .as_mut()
            .ok_or(StateError::MissingBuffer { buffer: "forces" })
    }

    /// Position of atom `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= num_atoms(None)`.
    pub fn pos(&self, i: usize) -> &[f64] {
        &self.positions.as_slice()[3 * i..3 * i + 3]
    }

    /// Position of atom `i`, mutably.
    ///
    /// # Panics
    ///
    /// Panics if `i >= num_atoms(None)`.
    pub fn pos_mut(&mut self, i: usize) -> &mut [f64] {
        &mut self.positions.as_mut_slice()[3 * i..3 * i + 3]
    }

    /// Velocity of atom `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= num_atoms(None)`.
    pub fn vel(&self, i: usize) -> Result<&[f64], StateError> {
        Ok(&self.velocities()?.as_slice()[3 * i..3 * i + 3])
    }

    /// Velocity of atom `i`, mutably.
    ///
    /// # Panics
    ///
    /// Panics if `i >= num_atoms(None)`.
    pub fn vel_mut(&mut self, i: usize) -> Result<&mut [f64], StateError> {
        Ok(&mut self.velocities_mut()?.as_mut_slice()[3 * i..3 * i + 3])
    }

    /// Force on atom `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= num_atoms(None)`.
    pub fn force(&self, i: usize) -> Result<&[f64], StateError> {
        Ok(&self.forces()?.as_slice()[3 * i..3 * i + 3])
    }

    /// Force on atom `i`, mutably.
    ///
    /// # Panics
    ///
    /// Panics if `i >= num_atoms(None)`.
    pub fn force_mut(&mut self, i: usize) -> Result<&mut [f64], StateError> {
        Ok(&mut self.forces_mut()?.as_mut_slice()[3 * i..3 * i + 3])
    }

    /// Reset every force to zero.
    pub fn zero_forces(&mut self) -> Result<(), StateError> {
        self.forces_mut()?.zero();
        Ok(())
    }

    /// Kinetic energy ½·m·|v|² of atom `i`, or of the whole system.
    ///
    /// # Panics
    ///
    /// Panics if `atom` is `Some(i)` with `i >= num_atoms(None)`.
    pub fn kinetic(&self, atom: Option<usize>) -> Result<f64, StateError> {
        let v = self.velocities()?;
        Ok(match atom {
            Some(i) => 0.5 * self.masses[i] * v.inner_product(0, i, i),
            None => (0..self.num_atoms(None))
                .map(|i| 0.5 * self.masses[i] * v.inner_product(0, i, i))
                .sum(),
        })
    }

    /// Kinetic energy per atom; zero for an empty state.
    pub fn average_kinetic(&self) -> Result<f64, StateError> {
        let n = self.num_atoms(None);
        let total = self.kinetic(None)?;
        Ok(if n == 0 { 0.0 } else { total / n as f64 })
    }

    /// Split borrow for force evaluation.
    pub fn force_view(&mut self) -> Result<ForceView<'_>, StateError> {
        let forces = self
            .forces
            .as_mut()
            .ok_or(StateError::MissingBuffer { buffer: "forces" })?;
        Ok(ForceView {
            positions: self.positions.as_slice(),
            forces: forces.as_mut_slice(),
            species: &self.atom_species,
        })
    }

    /// Split borrow for integration.
    pub fn dynamics_view(&mut self) -> Result<DynamicsView<'_>, StateError> {
        let velocities = self
            .velocities
            .as_mut()
            .ok_or(StateError::MissingBuffer { buffer: "velocities" })?;
        let forces = self
            .forces
            .as_ref()
            .ok_or(StateError::MissingBuffer { buffer: "forces" })?;
        Ok(DynamicsView {
            positions: self.positions.as_mut_slice(),
            velocities: velocities.as_mut_slice(),
            forces: forces.as_slice(),
            masses: &self.masses,
        })
    }
}

//! Kinetic: a classical molecular-dynamics engine.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! Kinetic sub-crates. For most users, adding `kinetic` as a single dependency
//! is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use kinetic::prelude::*;
//! use std::sync::Arc;
//!
//! // Two argon atoms, 4 Å apart, in a 20 Å periodic box.
//! let argon = Arc::new(AtomType::builder("Ar").build().unwrap());
//! let positions = Tensor::from_vec(vec![8.0, 10.0, 10.0, 12.0, 10.0, 10.0], [2, 3]).unwrap();
//! let mut state = AtomicState::new_dynamic();
//! state.add(vec![argon.clone(), argon], positions, None, None).unwrap();
//!
//! let lj = LennardJones::for_state(&state).unwrap();
//! let integrator = VelocityVerlet::builder()
//!     .timestep(2.0)
//!     .num_steps(50)
//!     .seed(7)
//!     .thermostat(Box::new(Evans::new(90.0).unwrap()))
//!     .build()
//!     .unwrap();
//!
//! let mut md = MolecularDynamics::builder(state)
//!     .cell(Box::new(CubicCell::new(20.0).unwrap()))
//!     .force(Box::new(lj))
//!     .integrator(Box::new(integrator))
//!     .build()
//!     .unwrap();
//! md.run().unwrap();
//! assert_eq!(md.current_step(), 50);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `kinetic-core` | `Tensor`, atom types, `AtomicState`, units |
//! | [`cell`] | `kinetic-cell` | `Cell` trait, cubic and unbounded cells |
//! | [`force`] | `kinetic-force` | `Force` trait and the `Forces` composite |
//! | [`forces`] | `kinetic-forces` | Force models (Lennard-Jones) |
//! | [`integrate`] | `kinetic-integrate` | Integrators, thermostats, velocity initialisation |
//! | [`engine`] | `kinetic-engine` | Orchestrator, configuration factories, writers |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core data model (`kinetic-core`).
///
/// [`types::Tensor`], [`types::AtomType`], [`types::AtomicState`] and the
/// [`types::units`] constants.
pub use kinetic_core as types;

/// Simulation cells (`kinetic-cell`).
///
/// The [`cell::Cell`] trait with [`cell::CubicCell`] and
/// [`cell::UnboundedCell`].
pub use kinetic_cell as cell;

/// Force abstraction (`kinetic-force`).
///
/// The [`force::Force`] trait is the main extension point for new
/// interaction models.
pub use kinetic_force as force;

/// Force models (`kinetic-forces`).
pub use kinetic_forces as forces;

/// Integrators and thermostats (`kinetic-integrate`).
///
/// [`integrate::VelocityVerlet`] with optional [`integrate::Evans`] or
/// [`integrate::Andersen`] control.
pub use kinetic_integrate as integrate;

/// Orchestration (`kinetic-engine`).
///
/// [`engine::MolecularDynamics`], typed configuration decoded from
/// [`engine::Params`], and trajectory writers.
pub use kinetic_engine as engine;

/// Common imports for typical Kinetic usage.
///
/// ```rust
/// use kinetic::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use kinetic_core::{AtomType, AtomicState, SpeciesId, Tensor};

    // Cells
    pub use kinetic_cell::{Cell, CubicCell, UnboundedCell};

    // Forces
    pub use kinetic_force::{Force, Forces};
    pub use kinetic_forces::LennardJones;

    // Integration
    pub use kinetic_integrate::{
        initialise_velocities, temperature, Andersen, Evans, Integrate, Thermostat,
        VelocityVerlet,
    };

    // Errors
    pub use kinetic_cell::CellError;
    pub use kinetic_core::{AtomTypeError, StateError, TensorError};
    pub use kinetic_engine::{ConfigError, RunError, WriteError};
    pub use kinetic_force::ForceError;
    pub use kinetic_integrate::IntegrateError;

    // Engine
    pub use kinetic_engine::{
        MolecularDynamics, Params, SimulationConfig, StepMetrics, ThermodynamicsWriter,
        Writer, XyzWriter,
    };
}

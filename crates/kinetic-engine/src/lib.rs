//! Molecular-dynamics orchestration for Kinetic.
//!
//! [`MolecularDynamics`] owns an [`AtomicState`](kinetic_core::AtomicState),
//! a [`Cell`](kinetic_cell::Cell), a [`Forces`](kinetic_force::Forces)
//! composite, an [`Integrate`](kinetic_integrate::Integrate) and a list of
//! periodic [`Writer`]s, and drives them through a fixed number of steps.
//!
//! # Construction
//!
//! Components can be assembled directly through
//! [`MolecularDynamics::builder`], or decoded from string-keyed
//! [`Params`] via the typed factories in [`config`]:
//! [`CellConfig`], [`ForceConfig`], [`IntegratorConfig`] (with
//! [`ControlConfig`]), [`OutputConfig`] and the top-level
//! [`SimulationConfig`].
//!
//! # Output
//!
//! - [`XyzWriter`]: trajectory frames in `.xyz` format
//! - [`ThermodynamicsWriter`]: per-step temperature and energies

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod metrics;
pub mod molecular_dynamics;
pub mod params;
pub mod writer;

pub use config::{
    CellConfig, ConfigError, ControlConfig, Ensemble, ForceConfig, IntegratorConfig,
    OutputConfig, OutputKind, SimulationConfig,
};
pub use metrics::StepMetrics;
pub use molecular_dynamics::{MolecularDynamics, MolecularDynamicsBuilder, RunError};
pub use params::{ParamValue, Params};
pub use writer::{Frame, ThermodynamicsWriter, WriteError, Writer, XyzWriter};

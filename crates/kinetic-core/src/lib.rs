//! Core types for the Kinetic molecular-dynamics engine.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the storage primitive ([`Tensor`]), per-species parameters
//! ([`AtomType`]), species handles ([`SpeciesId`]), the mutable
//! particle store ([`AtomicState`]), unit constants, and the error
//! types shared by the rest of the workspace.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod atom_type;
pub mod error;
pub mod id;
pub mod state;
pub mod tensor;
pub mod units;

pub use atom_type::{element_defaults, AtomType, AtomTypeBuilder, ElementDefaults};
pub use error::{AtomTypeError, StateError, TensorError};
pub use id::SpeciesId;
pub use state::{AtomicState, DynamicsView, ForceView, SpeciesBlock};
pub use tensor::Tensor;

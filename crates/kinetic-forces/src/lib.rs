//! Reference force models for Kinetic.
//!
//! - [`LennardJones`]: all-pairs 12-6 potential with Lorentz-Berthelot
//!   mixing and minimum-image displacements

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod lennard_jones;

pub use lennard_jones::LennardJones;

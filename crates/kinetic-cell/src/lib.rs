//! Simulation cells for Kinetic.
//!
//! This crate defines the [`Cell`] trait, the geometric context every
//! force kernel and integrator consults for volume, coordinate wrapping
//! and minimum-image displacements, along with the two concrete cells.
//!
//! # Cells
//!
//! - [`CubicCell`]: periodic cube of side `L`
//! - [`UnboundedCell`]: open space, no wrapping

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cell;
pub mod cubic;
pub mod error;
pub mod unbounded;

#[cfg(test)]
pub(crate) mod compliance;

pub use cell::Cell;
pub use cubic::CubicCell;
pub use error::CellError;
pub use unbounded::UnboundedCell;

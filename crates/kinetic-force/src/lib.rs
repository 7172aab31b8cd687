//! Force trait and force composite for Kinetic.
//!
//! A [`Force`] accumulates its contribution into the force buffer of an
//! [`AtomicState`](kinetic_core::AtomicState) and returns its potential
//! energy. [`Forces`] owns the registered forces, zeroes the buffer once
//! per evaluation and sums the energies.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod force;
pub mod forces;

pub use error::ForceError;
pub use force::Force;
pub use forces::Forces;

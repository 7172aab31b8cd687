//! Time integration and ensemble control for Kinetic.
//!
//! An [`Integrate`] advances an [`AtomicState`](kinetic_core::AtomicState)
//! by one timestep, refreshing forces on the way. [`VelocityVerlet`] is
//! the symplectic kick-drift-kick scheme; an optional [`Thermostat`] is
//! composed into it and runs before the first half-step and after the
//! second.
//!
//! # Thermostats
//!
//! - [`Evans`]: isokinetic (NVEkin) friction rescaling
//! - [`Andersen`]: stochastic collisions with a heat bath (NVT)

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod andersen;
pub mod error;
pub mod evans;
pub mod integrate;
pub mod thermostat;
pub mod velocity_verlet;

pub use andersen::{Andersen, AndersenBuilder};
pub use error::IntegrateError;
pub use evans::Evans;
pub use integrate::Integrate;
pub use thermostat::{initialise_velocities, temperature, Thermostat};
pub use velocity_verlet::{VelocityVerlet, VelocityVerletBuilder};

//! Error type for integrators and thermostats.

use std::error::Error;
use std::fmt;

use kinetic_core::StateError;
use kinetic_force::ForceError;

/// Errors arising from integrator or thermostat construction and stepping.
#[derive(Debug, Clone, PartialEq)]
pub enum IntegrateError {
    /// The timestep must be finite and positive.
    InvalidTimestep {
        /// The rejected timestep, fs.
        dt: f64,
    },
    /// A thermostat parameter is out of range.
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// Velocities cannot be initialised to a non-positive temperature.
    InvalidTemperature {
        /// The rejected temperature, K.
        temperature: f64,
    },
    /// The state holds no atoms.
    EmptyState,
    /// Random initial velocities produced no kinetic energy to rescale.
    ZeroKineticEnergy,
    /// Force refresh failed mid-step.
    Force(ForceError),
    /// The state lacks a dynamics buffer.
    State(StateError),
}

impl fmt::Display for IntegrateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTimestep { dt } => {
                write!(f, "timestep must be finite and positive, got {dt}")
            }
            Self::InvalidParameter { name, value } => {
                write!(f, "invalid thermostat parameter '{name}': {value}")
            }
            Self::InvalidTemperature { temperature } => {
                write!(f, "temperature must be finite and positive, got {temperature}")
            }
            Self::EmptyState => write!(f, "state holds no atoms"),
            Self::ZeroKineticEnergy => {
                write!(f, "cannot rescale velocities with zero kinetic energy")
            }
            Self::Force(e) => write!(f, "force evaluation failed: {e}"),
            Self::State(e) => write!(f, "state: {e}"),
        }
    }
}

impl Error for IntegrateError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Force(e) => Some(e),
            Self::State(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ForceError> for IntegrateError {
    fn from(e: ForceError) -> Self {
        Self::Force(e)
    }
}

impl From<StateError> for IntegrateError {
    fn from(e: StateError) -> Self {
        Self::State(e)
    }
}

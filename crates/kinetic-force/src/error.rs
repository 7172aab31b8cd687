//! Error type for force evaluation.

use std::error::Error;
use std::fmt;

use kinetic_core::StateError;

/// Errors arising from force construction or evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum ForceError {
    /// An atom type lacks a parameter the force model needs.
    MissingParameter {
        /// The force model.
        force: String,
        /// Identifier of the atom type.
        atom_type: String,
        /// Name of the missing parameter.
        name: String,
    },
    /// Two atoms share a position, so the pair force is singular.
    CoincidentAtoms {
        /// First atom.
        i: usize,
        /// Second atom.
        j: usize,
    },
    /// The state's species table does not match the one the force was
    /// built for.
    SpeciesMismatch {
        /// Species count the force was built for.
        expected: usize,
        /// Species count of the state.
        actual: usize,
    },
    /// The state lacks a buffer the force writes to.
    State(StateError),
}

impl fmt::Display for ForceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingParameter {
                force,
                atom_type,
                name,
            } => write!(
                f,
                "{force} needs parameter '{name}' on atom type '{atom_type}'"
            ),
            Self::CoincidentAtoms { i, j } => {
                write!(f, "atoms {i} and {j} are coincident")
            }
            Self::SpeciesMismatch { expected, actual } => write!(
                f,
                "force built for {expected} species, state has {actual}"
            ),
            Self::State(e) => write!(f, "state: {e}"),
        }
    }
}

impl Error for ForceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::State(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StateError> for ForceError {
    fn from(e: StateError) -> Self {
        Self::State(e)
    }
}

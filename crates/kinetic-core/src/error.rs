//! Error types for tensor storage, atom types and atomic state.
//!
//! Organised by subsystem: [`TensorError`] for shape contracts,
//! [`AtomTypeError`] for species construction, and [`StateError`] for
//! population and buffer access on an [`AtomicState`](crate::AtomicState).

use std::error::Error;
use std::fmt;

/// Errors from tensor construction and reshaping.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TensorError {
    /// The supplied buffer length does not match the product of the extents.
    ShapeMismatch {
        /// Number of elements implied by the extents.
        expected: usize,
        /// Number of elements supplied.
        actual: usize,
    },
    /// An axis index is not valid for the tensor's rank.
    AxisOutOfRange {
        /// The offending axis.
        axis: usize,
        /// The tensor's rank.
        ndim: usize,
    },
    /// Concatenation along `axis` requires equal extent on the other axis.
    ConcatenateMismatch {
        /// The concatenation axis.
        axis: usize,
        /// Extent of the receiving tensor on the non-concatenated axis.
        expected: usize,
        /// Extent of the appended tensor on the non-concatenated axis.
        actual: usize,
    },
}

impl fmt::Display for TensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShapeMismatch { expected, actual } => {
                write!(f, "buffer holds {actual} elements, extents require {expected}")
            }
            Self::AxisOutOfRange { axis, ndim } => {
                write!(f, "axis {axis} out of range for a rank-{ndim} tensor")
            }
            Self::ConcatenateMismatch {
                axis,
                expected,
                actual,
            } => write!(
                f,
                "cannot concatenate along axis {axis}: other axis has extent {actual}, expected {expected}"
            ),
        }
    }
}

impl Error for TensorError {}

/// Errors from [`AtomTypeBuilder::build`](crate::AtomTypeBuilder::build)
/// and named-parameter lookup.
#[derive(Clone, Debug, PartialEq)]
pub enum AtomTypeError {
    /// The atom type identifier is empty.
    EmptyId,
    /// A parameter was neither supplied nor available as an element default.
    MissingParameter {
        /// Identifier of the atom type.
        atom_type: String,
        /// Name of the missing parameter.
        name: String,
    },
    /// A supplied parameter is physically meaningless.
    InvalidParameter {
        /// Identifier of the atom type.
        atom_type: String,
        /// Name of the parameter.
        name: String,
        /// The rejected value.
        value: f64,
    },
}

impl fmt::Display for AtomTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "atom type identifier must not be empty"),
            Self::MissingParameter { atom_type, name } => {
                write!(
                    f,
                    "atom type '{atom_type}' has no '{name}' parameter and no default exists"
                )
            }
            Self::InvalidParameter {
                atom_type,
                name,
                value,
            } => write!(f, "atom type '{atom_type}' has invalid '{name}': {value}"),
        }
    }
}

impl Error for AtomTypeError {}

/// Errors from populating or accessing an [`AtomicState`](crate::AtomicState).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StateError {
    /// `add` was called on a state that already holds atoms.
    AlreadyPopulated,
    /// A per-atom buffer does not have shape `num_atoms x 3`.
    ShapeMismatch {
        /// Which buffer was rejected.
        buffer: &'static str,
        /// Number of atoms implied by the atom type vector.
        num_atoms: usize,
        /// Rows in the supplied tensor.
        rows: usize,
        /// Columns in the supplied tensor.
        cols: usize,
    },
    /// The state was built without the requested dynamics buffer.
    MissingBuffer {
        /// Which buffer was requested.
        buffer: &'static str,
    },
    /// A tensor operation failed while assembling the state.
    Tensor(TensorError),
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyPopulated => write!(f, "atomic state is already populated"),
            Self::ShapeMismatch {
                buffer,
                num_atoms,
                rows,
                cols,
            } => write!(
                f,
                "{buffer} tensor is {rows}x{cols}, expected {num_atoms}x3"
            ),
            Self::MissingBuffer { buffer } => {
                write!(f, "atomic state has no {buffer} buffer (static state)")
            }
            Self::Tensor(e) => write!(f, "tensor: {e}"),
        }
    }
}

impl Error for StateError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Tensor(e) => Some(e),
            _ => None,
        }
    }
}

impl From<TensorError> for StateError {
    fn from(e: TensorError) -> Self {
        Self::Tensor(e)
    }
}

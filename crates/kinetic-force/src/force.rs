//! The [`Force`] trait.

use kinetic_cell::Cell;
use kinetic_core::AtomicState;

use crate::error::ForceError;

/// An interatomic force model.
///
/// # Contract
///
/// - `evaluate()` ADDS its contribution to the state's force buffer; it
///   never zeroes it. Zeroing is the job of [`Forces`](crate::Forces).
/// - The return value is this model's potential energy in internal units.
/// - Parameters are fixed at construction; `evaluate()` takes `&self`.
///
/// # Object safety
///
/// This trait is object-safe; [`Forces`](crate::Forces) stores models as
/// `Vec<Box<dyn Force>>`.
///
/// # Examples
///
/// A uniform field pushing every atom along +x:
///
/// ```
/// use kinetic_cell::Cell;
/// use kinetic_core::AtomicState;
/// use kinetic_force::{Force, ForceError};
///
/// struct Push(f64);
///
/// impl Force for Push {
///     fn name(&self) -> &str { "push" }
///
///     fn evaluate(&self, state: &mut AtomicState, _cell: &dyn Cell) -> Result<f64, ForceError> {
///         let mut view = state.force_view()?;
///         for f in view.forces.chunks_exact_mut(3) {
///             f[0] += self.0;
///         }
///         Ok(0.0)
///     }
/// }
///
/// assert_eq!(Push(1.0).name(), "push");
/// ```
pub trait Force: Send + 'static {
    /// Human-readable name for logging and error reporting.
    fn name(&self) -> &str;

    /// Accumulate forces into `state` and return the potential energy.
    fn evaluate(&self, state: &mut AtomicState, cell: &dyn Cell) -> Result<f64, ForceError>;
}

//! The core `Cell` trait and `dyn Cell` downcast support.

use std::any::Any;

/// Geometric context of a simulation.
///
/// Force kernels call [`min_image`](Self::min_image) on every pair
/// displacement; integrators call [`pbc`](Self::pbc) on every position
/// after a drift. Both operate component-wise on a slice (normally the
/// three Cartesian components of one atom) and mutate it in place.
///
/// # Object Safety
///
/// This trait is designed for use as `dyn Cell`. Use `downcast_ref`
/// to recover the concrete type when a caller needs its parameters.
pub trait Cell: Any + Send + Sync + 'static {
    /// Short name of the cell kind, as used by configuration.
    fn name(&self) -> &'static str;

    /// Cell volume in Å³. An unbounded cell reports 0.
    fn volume(&self) -> f64;

    /// Wrap a position back into the primary image.
    fn pbc(&self, r: &mut [f64]);

    /// Replace a displacement by its shortest periodic image.
    fn min_image(&self, d: &mut [f64]);
}

impl dyn Cell {
    /// Attempt to downcast a trait object to a concrete cell type.
    pub fn downcast_ref<T: Cell>(&self) -> Option<&T> {
        (self as &dyn Any).downcast_ref::<T>()
    }
}

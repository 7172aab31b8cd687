//! Open, non-periodic space.

use crate::cell::Cell;

/// A cell with no boundaries: positions are never wrapped and
/// displacements are used as-is.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UnboundedCell;

impl UnboundedCell {
    /// Create an unbounded cell.
    pub fn new() -> Self {
        Self
    }
}

impl Cell for UnboundedCell {
    fn name(&self) -> &'static str {
        "Unbounded"
    }

    fn volume(&self) -> f64 {
        0.0
    }

    fn pbc(&self, _r: &mut [f64]) {}

    fn min_image(&self, _d: &mut [f64]) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance;

    #[test]
    fn operations_are_identity() {
        let c = UnboundedCell::new();
        let mut r = [1e9, -3.5, 0.25];
        c.pbc(&mut r);
        assert_eq!(r, [1e9, -3.5, 0.25]);
        c.min_image(&mut r);
        assert_eq!(r, [1e9, -3.5, 0.25]);
    }

    #[test]
    fn volume_is_zero_sentinel() {
        assert_eq!(UnboundedCell.volume(), 0.0);
        assert_eq!(UnboundedCell.name(), "Unbounded");
    }

    #[test]
    fn compliance_full() {
        compliance::run_full_compliance(&UnboundedCell);
    }
}

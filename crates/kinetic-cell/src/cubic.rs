//! Periodic cubic cell.

use crate::cell::Cell;
use crate::error::CellError;

/// A cube of side `L` with periodic boundaries on every axis.
///
/// Wrapped positions lie in `[0, L)`; minimum-image displacements lie
/// in `[-L/2, L/2]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CubicCell {
    length: f64,
}

impl CubicCell {
    /// Create a cubic cell with side `length` Å.
    ///
    /// Returns `Err(CellError::NonPositiveLength)` unless `length` is
    /// finite and strictly positive.
    pub fn new(length: f64) -> Result<Self, CellError> {
        if !length.is_finite() || length <= 0.0 {
            return Err(CellError::NonPositiveLength { length });
        }
        Ok(Self { length })
    }

    /// Side length, Å.
    pub fn length(&self) -> f64 {
        self.length
    }
}

impl Cell for CubicCell {
    fn name(&self) -> &'static str {
        "Cubic"
    }

    fn volume(&self) -> f64 {
        self.length * self.length * self.length
    }

    fn pbc(&self, r: &mut [f64]) {
        let l = self.length;
        for c in r.iter_mut() {
            *c -= (*c / l).floor() * l;
            // A tiny negative input rounds up to exactly L.
            if *c >= l {
                *c -= l;
            }
        }
    }

    fn min_image(&self, d: &mut [f64]) {
        let l = self.length;
        for c in d.iter_mut() {
            *c -= (*c / l).round() * l;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance;
    use proptest::prelude::*;

    // ── Construction ────────────────────────────────────────────

    #[test]
    fn non_positive_length_rejected() {
        assert!(matches!(
            CubicCell::new(0.0),
            Err(CellError::NonPositiveLength { length }) if length == 0.0
        ));
        assert!(CubicCell::new(-1.0).is_err());
        assert!(CubicCell::new(f64::NAN).is_err());
        assert!(CubicCell::new(f64::INFINITY).is_err());
    }

    #[test]
    fn volume_is_cube() {
        assert_eq!(CubicCell::new(3.0).unwrap().volume(), 27.0);
    }

    // ── Wrapping ────────────────────────────────────────────────

    #[test]
    fn pbc_worked() {
        let c = CubicCell::new(2.0).unwrap();
        let cases = [
            ([2.0, 0.0, 0.0], [0.0, 0.0, 0.0]),
            ([2.0, 2.0, 2.0], [0.0, 0.0, 0.0]),
            ([2.5, 0.5, 8.25], [0.5, 0.5, 0.25]),
            ([-1.0, -2.5, -8.5], [1.0, 1.5, 1.5]),
        ];
        for (input, expected) in cases {
            let mut r = input;
            c.pbc(&mut r);
            assert_eq!(r, expected, "pbc({input:?})");
        }
    }

    #[test]
    fn pbc_tiny_negative_stays_below_length() {
        let c = CubicCell::new(2.0).unwrap();
        let mut r = [-1e-17, 0.0, 0.0];
        c.pbc(&mut r);
        assert!(r[0] >= 0.0 && r[0] < 2.0, "got {}", r[0]);
    }

    #[test]
    fn min_image_worked() {
        let c = CubicCell::new(10.0).unwrap();
        let mut d = [9.0, -6.0, 4.0];
        c.min_image(&mut d);
        assert_eq!(d, [-1.0, 4.0, 4.0]);
    }

    // ── Compliance ──────────────────────────────────────────────

    #[test]
    fn compliance_full() {
        compliance::run_full_compliance(&CubicCell::new(5.0).unwrap());
    }

    // ── Property tests ──────────────────────────────────────────

    proptest! {
        #[test]
        fn pbc_lands_in_primary_image(
            l in 0.5f64..50.0,
            x in -1e3f64..1e3,
            y in -1e3f64..1e3,
            z in -1e3f64..1e3,
        ) {
            let c = CubicCell::new(l).unwrap();
            let mut r = [x, y, z];
            c.pbc(&mut r);
            for v in r {
                prop_assert!((0.0..l).contains(&v), "{v} not in [0, {l})");
            }
        }

        #[test]
        fn min_image_is_at_most_half_length(
            l in 0.5f64..50.0,
            x in -1e3f64..1e3,
        ) {
            let c = CubicCell::new(l).unwrap();
            let mut d = [x, -x, 0.5 * x];
            c.min_image(&mut d);
            for v in d {
                prop_assert!(v.abs() <= 0.5 * l * (1.0 + 1e-12));
            }
        }
    }
}

//! Cell trait compliance test helpers.
//!
//! These functions verify that a Cell implementation satisfies the
//! invariants force kernels and integrators rely on. Reused across the
//! backend test modules.

use crate::cell::Cell;

const PROBES: [[f64; 3]; 8] = [
    [0.0, 0.0, 0.0],
    [0.1, 0.2, 0.3],
    [1.7, -2.3, 4.9],
    [-7.25, 3.5, 11.0],
    [12.0, 12.0, -12.0],
    [100.5, -0.001, 2.5],
    [-33.3, 44.4, -55.5],
    [1e-9, -1e-9, 2.0],
];

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * (1.0 + a.abs().max(b.abs()))
}

/// Assert that wrapping an already-wrapped position changes nothing.
pub fn assert_pbc_idempotent(cell: &dyn Cell) {
    for p in PROBES {
        let mut once = p;
        cell.pbc(&mut once);
        let mut twice = once;
        cell.pbc(&mut twice);
        for k in 0..3 {
            assert!(
                close(once[k], twice[k]),
                "pbc not idempotent for {p:?}: {once:?} then {twice:?}"
            );
        }
    }
}

/// Assert `min_image(-d) == -min_image(d)`.
pub fn assert_min_image_odd(cell: &dyn Cell) {
    for p in PROBES {
        let mut d = p;
        let mut neg = [-p[0], -p[1], -p[2]];
        cell.min_image(&mut d);
        cell.min_image(&mut neg);
        for k in 0..3 {
            assert!(
                close(d[k], -neg[k]),
                "min_image not odd for {p:?}: {d:?} vs {neg:?}"
            );
        }
    }
}

/// Assert that the minimum image of a displacement does not depend on
/// whether its endpoints were wrapped first.
pub fn assert_min_image_invariant_under_pbc(cell: &dyn Cell) {
    for a in PROBES {
        for b in PROBES {
            let mut direct = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
            cell.min_image(&mut direct);

            let (mut wa, mut wb) = (a, b);
            cell.pbc(&mut wa);
            cell.pbc(&mut wb);
            let mut wrapped = [wb[0] - wa[0], wb[1] - wa[1], wb[2] - wa[2]];
            cell.min_image(&mut wrapped);

            let d2 = |v: [f64; 3]| v[0] * v[0] + v[1] * v[1] + v[2] * v[2];
            assert!(
                close(d2(direct), d2(wrapped)),
                "|min_image| differs for {a:?} -> {b:?}: {direct:?} vs {wrapped:?}"
            );
        }
    }
}

/// Assert that the volume is finite and non-negative.
pub fn assert_volume_non_negative(cell: &dyn Cell) {
    let v = cell.volume();
    assert!(v.is_finite() && v >= 0.0, "volume = {v}");
}

/// Run every compliance check.
pub fn run_full_compliance(cell: &dyn Cell) {
    assert_pbc_idempotent(cell);
    assert_min_image_odd(cell);
    assert_min_image_invariant_under_pbc(cell);
    assert_volume_non_negative(cell);
}

//! Dense, row-major, fixed-rank numeric storage.
//!
//! [`Tensor`] backs every per-atom buffer in the engine: an `N x 3`
//! `Tensor<f64, 2>` holds positions, velocities or forces. The last
//! axis is contiguous, so `offset([i, 0])` yields the three Cartesian
//! components of atom `i` as a slice.

use std::fmt;
use std::ops::{Add, Index, IndexMut, Mul};

use crate::error::TensorError;

/// A dense rank-`D` array stored in row-major order.
///
/// The element count always equals the product of the extents. Strides
/// are recomputed whenever the shape changes.
#[derive(Clone, Debug, PartialEq)]
pub struct Tensor<T, const D: usize> {
    extents: [usize; D],
    strides: [usize; D],
    data: Vec<T>,
}

fn row_major_strides<const D: usize>(extents: &[usize; D]) -> [usize; D] {
    let mut strides = [0; D];
    let mut acc = 1;
    for axis in (0..D).rev() {
        strides[axis] = acc;
        acc *= extents[axis];
    }
    strides
}

impl<T: Copy + Default, const D: usize> Tensor<T, D> {
    /// Create a tensor with the given extents, every element defaulted.
    pub fn new(extents: [usize; D]) -> Self {
        let n = extents.iter().product();
        Self {
            extents,
            strides: row_major_strides(&extents),
            data: vec![T::default(); n],
        }
    }

    /// Wrap an existing row-major buffer.
    ///
    /// Returns [`TensorError::ShapeMismatch`] if `data.len()` is not the
    /// product of `extents`.
    pub fn from_vec(data: Vec<T>, extents: [usize; D]) -> Result<Self, TensorError> {
        let expected: usize = extents.iter().product();
        if data.len() != expected {
            return Err(TensorError::ShapeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            extents,
            strides: row_major_strides(&extents),
            data,
        })
    }

    /// The tensor's extents, one per axis.
    pub fn extents(&self) -> [usize; D] {
        self.extents
    }

    /// Extent along a single axis.
    ///
    /// # Panics
    ///
    /// Panics if `axis >= D`.
    pub fn size(&self, axis: usize) -> usize {
        self.extents[axis]
    }

    /// Total element count.
    pub fn num_elements(&self) -> usize {
        self.data.len()
    }

    /// Rank of the tensor.
    pub const fn ndim(&self) -> usize {
        D
    }

    /// Reset every element to `T::default()`.
    pub fn zero(&mut self) {
        self.fill(T::default());
    }

    /// Set every element to `value`.
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    /// Change the extents, zero-filling any newly created elements.
    ///
    /// The flat buffer is truncated or extended in place; existing
    /// elements keep their flat positions, not their multi-indices.
    pub fn resize(&mut self, extents: [usize; D]) {
        let n = extents.iter().product();
        self.data.resize(n, T::default());
        self.extents = extents;
        self.strides = row_major_strides(&extents);
    }

    /// Flat offset of a multi-index, or `None` if any component is out of range.
    pub fn flat_index(&self, idx: [usize; D]) -> Option<usize> {
        let mut flat = 0;
        for axis in 0..D {
            if idx[axis] >= self.extents[axis] {
                return None;
            }
            flat += idx[axis] * self.strides[axis];
        }
        Some(flat)
    }

    /// Element at `idx`, or `None` if out of bounds.
    pub fn get(&self, idx: [usize; D]) -> Option<&T> {
        self.flat_index(idx).map(|i| &self.data[i])
    }

    /// Mutable element at `idx`, or `None` if out of bounds.
    pub fn get_mut(&mut self, idx: [usize; D]) -> Option<&mut T> {
        self.flat_index(idx).map(move |i| &mut self.data[i])
    }

    /// The contiguous tail of the buffer starting at `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is out of bounds.
    pub fn offset(&self, idx: [usize; D]) -> &[T] {
        let start = self.checked_flat(idx);
        &self.data[start..]
    }

    /// Mutable variant of [`offset`](Self::offset).
    ///
    /// # Panics
    ///
    /// Panics if `idx` is out of bounds.
    pub fn offset_mut(&mut self, idx: [usize; D]) -> &mut [T] {
        let start = self.checked_flat(idx);
        &mut self.data[start..]
    }

    /// The whole buffer in row-major order.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// The whole buffer in row-major order, mutably.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Iterate over elements in row-major order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// Iterate mutably over elements in row-major order.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.data.iter_mut()
    }

    /// Consume the tensor and return its buffer.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    fn checked_flat(&self, idx: [usize; D]) -> usize {
        match self.flat_index(idx) {
            Some(i) => i,
            None => panic!(
                "index {idx:?} out of bounds for tensor with extents {:?}",
                self.extents
            ),
        }
    }
}

impl<T: Copy + Default, const D: usize> Index<[usize; D]> for Tensor<T, D> {
    type Output = T;

    fn index(&self, idx: [usize; D]) -> &T {
        &self.data[self.checked_flat(idx)]
    }
}

impl<T: Copy + Default, const D: usize> IndexMut<[usize; D]> for Tensor<T, D> {
    fn index_mut(&mut self, idx: [usize; D]) -> &mut T {
        let i = self.checked_flat(idx);
        &mut self.data[i]
    }
}

impl<T> Tensor<T, 2>
where
    T: Copy + Default + Add<Output = T> + Mul<Output = T>,
{
    /// Append `other` along `axis` (0 = rows, 1 = columns).
    ///
    /// The extent on the other axis must match.
    pub fn concatenate(&mut self, other: &Self, axis: usize) -> Result<(), TensorError> {
        let [rows, cols] = self.extents;
        let [o_rows, o_cols] = other.extents;
        match axis {
            0 => {
                if cols != o_cols {
                    return Err(TensorError::ConcatenateMismatch {
                        axis,
                        expected: cols,
                        actual: o_cols,
                    });
                }
                self.data.extend_from_slice(&other.data);
                self.extents = [rows + o_rows, cols];
            }
            1 => {
                if rows != o_rows {
                    return Err(TensorError::ConcatenateMismatch {
                        axis,
                        expected: rows,
                        actual: o_rows,
                    });
                }
                let mut data = Vec::with_capacity(rows * (cols + o_cols));
                for r in 0..rows {
                    data.extend_from_slice(&self.data[r * cols..(r + 1) * cols]);
                    data.extend_from_slice(&other.data[r * o_cols..(r + 1) * o_cols]);
                }
                self.data = data;
                self.extents = [rows, cols + o_cols];
            }
            _ => return Err(TensorError::AxisOutOfRange { axis, ndim: 2 }),
        }
        self.strides = row_major_strides(&self.extents);
        Ok(())
    }

    /// Dot product of two rows (`axis == 0`) or two columns (`axis == 1`).
    ///
    /// # Panics
    ///
    /// Panics if `axis > 1` or `i`/`j` are out of range.
    pub fn inner_product(&self, axis: usize, i: usize, j: usize) -> T {
        self.inner_product_between(axis, i, self, axis, j)
    }

    /// Dot product of line `i` of `self` along `axis` with line `j` of
    /// `other` along `other_axis`.
    ///
    /// # Panics
    ///
    /// Panics if either axis is greater than 1, an index is out of
    /// range, or the two lines differ in length.
    pub fn inner_product_between(
        &self,
        axis: usize,
        i: usize,
        other: &Self,
        other_axis: usize,
        j: usize,
    ) -> T {
        assert!(axis < 2 && other_axis < 2, "inner product axis must be 0 or 1");
        let len_a = self.extents[1 - axis];
        let len_b = other.extents[1 - other_axis];
        assert_eq!(len_a, len_b, "inner product over lines of unequal length");
        let mut acc = T::default();
        for k in 0..len_a {
            let a = if axis == 0 { self[[i, k]] } else { self[[k, i]] };
            let b = if other_axis == 0 {
                other[[j, k]]
            } else {
                other[[k, j]]
            };
            acc = acc + a * b;
        }
        acc
    }
}

impl<T: fmt::Display> fmt::Display for Tensor<T, 2> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [rows, cols] = self.extents;
        writeln!(f, "{rows} x {cols}")?;
        for r in 0..rows {
            for c in 0..cols {
                if c > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{}", self.data[r * cols + c])?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

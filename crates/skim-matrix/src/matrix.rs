//! `FloatMatrix<T>` — row-major `f32` storage keyed by row and column ids.
//!
//! # Layout
//!
//! ```text
//! data[ row_index(r) * cols + col_index(c) ]
//! ```
//!
//! Ids map to dense positions through `FxHashMap`s; positions follow the
//! order in which ids were supplied, so two matrices built from the same id
//! lists share one key space and line up column by column.
//!
//! # Parallel writers
//!
//! [`FloatMatrix::row_blocks_mut`] splits the storage into disjoint
//! `&mut` row ranges.  Each skim worker owns one block per output matrix,
//! so no cell is reachable from two threads and no locking is needed.

use std::hash::Hash;
use std::ops::Range;

use rustc_hash::FxHashMap;

use crate::{MatrixError, MatrixResult};

/// Marker for never-computed cells.
const UNSET: f32 = f32::NAN;

/// Split `rows` into `parts` contiguous ranges whose sizes differ by at most
/// one.  Ranges are ascending and cover `0..rows`; trailing ranges are empty
/// when `parts > rows`.
pub fn partition_rows(rows: usize, parts: usize) -> Vec<Range<usize>> {
    let parts = parts.max(1);
    let base = rows / parts;
    let extra = rows % parts;
    let mut start = 0;
    (0..parts)
        .map(|i| {
            let len = base + usize::from(i < extra);
            let range = start..start + len;
            start += len;
            range
        })
        .collect()
}

// ── FloatMatrix ───────────────────────────────────────────────────────────────

/// Dense float matrix indexed by `(row id, column id)`.
#[derive(Clone, Debug)]
pub struct FloatMatrix<T> {
    row_ids: Vec<T>,
    col_ids: Vec<T>,
    row_index: FxHashMap<T, usize>,
    col_index: FxHashMap<T, usize>,
    data: Vec<f32>,
}

impl<T: Clone + Eq + Hash> FloatMatrix<T> {
    /// A matrix over `row_ids × col_ids` with every cell never-computed.
    pub fn new(row_ids: Vec<T>, col_ids: Vec<T>) -> MatrixResult<Self> {
        let row_index = index_ids(&row_ids, "row")?;
        let col_index = index_ids(&col_ids, "column")?;
        let data = vec![UNSET; row_ids.len() * col_ids.len()];
        Ok(Self { row_ids, col_ids, row_index, col_index, data })
    }

    /// A matrix with identical row and column ids, the usual skim shape.
    pub fn square(ids: Vec<T>) -> MatrixResult<Self> {
        Self::new(ids.clone(), ids)
    }

    // ── Shape ─────────────────────────────────────────────────────────────

    pub fn rows(&self) -> usize {
        self.row_ids.len()
    }

    pub fn cols(&self) -> usize {
        self.col_ids.len()
    }

    pub fn row_ids(&self) -> &[T] {
        &self.row_ids
    }

    pub fn col_ids(&self) -> &[T] {
        &self.col_ids
    }

    pub fn row_index(&self, id: &T) -> Option<usize> {
        self.row_index.get(id).copied()
    }

    pub fn col_index(&self, id: &T) -> Option<usize> {
        self.col_index.get(id).copied()
    }

    #[inline]
    fn slot(&self, row: &T, col: &T) -> MatrixResult<usize> {
        let r = self.row_index(row).ok_or(MatrixError::UnknownId { axis: "row" })?;
        let c = self.col_index(col).ok_or(MatrixError::UnknownId { axis: "column" })?;
        Ok(r * self.cols() + c)
    }

    // ── Cell access ───────────────────────────────────────────────────────

    /// Value of the cell, `0.0` if it was never computed or an id is unknown.
    pub fn get(&self, row: &T, col: &T) -> f32 {
        self.try_get(row, col).unwrap_or(0.0)
    }

    /// Value of the cell, `None` if it was never computed or an id is unknown.
    pub fn try_get(&self, row: &T, col: &T) -> Option<f32> {
        let v = self.data[self.slot(row, col).ok()?];
        (!v.is_nan()).then_some(v)
    }

    /// Value at dense position `(r, c)`, `None` if never computed.
    #[inline]
    pub fn get_at(&self, r: usize, c: usize) -> Option<f32> {
        let v = self.data[r * self.cols() + c];
        (!v.is_nan()).then_some(v)
    }

    pub fn set(&mut self, row: &T, col: &T, value: f32) -> MatrixResult<()> {
        if value.is_nan() {
            return Err(MatrixError::NotANumber);
        }
        let slot = self.slot(row, col)?;
        self.data[slot] = value;
        Ok(())
    }

    /// Add `value` to the cell; a never-computed cell starts from zero.
    pub fn add(&mut self, row: &T, col: &T, value: f32) -> MatrixResult<()> {
        if value.is_nan() {
            return Err(MatrixError::NotANumber);
        }
        let slot = self.slot(row, col)?;
        self.data[slot] = accumulate(self.data[slot], value);
        Ok(())
    }

    /// Number of computed cells.
    pub fn computed_count(&self) -> usize {
        self.data.iter().filter(|v| !v.is_nan()).count()
    }

    // ── Whole-matrix operations ───────────────────────────────────────────

    /// Scale every computed cell by `factor`.
    ///
    /// Computed cells stay computed: `±inf × 0` yields `0`, not the
    /// never-computed marker.
    pub fn multiply(&mut self, factor: f32) {
        for v in self.data.iter_mut().filter(|v| !v.is_nan()) {
            let scaled = *v * factor;
            *v = if scaled.is_nan() { 0.0 } else { scaled };
        }
    }

    /// Add every computed cell of `other` into `self`, cell-wise by id.
    ///
    /// Only cells computed in `other` are touched.  Fails without modifying
    /// `self` if `other` carries an id that `self` does not know.
    pub fn combine(&mut self, other: &FloatMatrix<T>) -> MatrixResult<()> {
        let rows: Vec<usize> = other
            .row_ids
            .iter()
            .map(|id| self.row_index(id).ok_or(MatrixError::UnknownId { axis: "row" }))
            .collect::<MatrixResult<_>>()?;
        let cols: Vec<usize> = other
            .col_ids
            .iter()
            .map(|id| self.col_index(id).ok_or(MatrixError::UnknownId { axis: "column" }))
            .collect::<MatrixResult<_>>()?;

        let self_cols = self.cols();
        for (or, &r) in rows.iter().enumerate() {
            for (oc, &c) in cols.iter().enumerate() {
                if let Some(v) = other.get_at(or, oc) {
                    let slot = r * self_cols + c;
                    self.data[slot] = accumulate(self.data[slot], v);
                }
            }
        }
        Ok(())
    }

    /// Split the storage into one [`RowBlock`] per range of `partition`.
    ///
    /// # Panics
    /// Panics unless `partition` is a list of ascending, contiguous ranges
    /// starting at row 0 and ending at or before `self.rows()`, as produced
    /// by [`partition_rows`].
    pub fn row_blocks_mut(&mut self, partition: &[Range<usize>]) -> Vec<RowBlock<'_>> {
        let cols = self.cols();
        let mut rest: &mut [f32] = &mut self.data;
        let mut next_row = 0;
        let mut blocks = Vec::with_capacity(partition.len());
        for range in partition {
            assert_eq!(range.start, next_row, "row partition must be contiguous");
            let (head, tail) = std::mem::take(&mut rest).split_at_mut(range.len() * cols);
            blocks.push(RowBlock { first_row: range.start, cols, data: head });
            rest = tail;
            next_row = range.end;
        }
        blocks
    }
}

#[inline]
fn accumulate(current: f32, value: f32) -> f32 {
    if current.is_nan() { value } else { current + value }
}

fn index_ids<T: Clone + Eq + Hash>(ids: &[T], axis: &'static str) -> MatrixResult<FxHashMap<T, usize>> {
    let mut index = FxHashMap::default();
    index.reserve(ids.len());
    for (i, id) in ids.iter().enumerate() {
        if index.insert(id.clone(), i).is_some() {
            return Err(MatrixError::DuplicateId { axis, index: i });
        }
    }
    Ok(index)
}

// ── RowBlock ──────────────────────────────────────────────────────────────────

/// Exclusive view of a contiguous range of matrix rows.
///
/// Rows are addressed by their position in the full matrix.
pub struct RowBlock<'a> {
    first_row: usize,
    cols: usize,
    data: &'a mut [f32],
}

impl RowBlock<'_> {
    /// Full-matrix row positions covered by this block.
    pub fn rows(&self) -> Range<usize> {
        let n = if self.cols == 0 { 0 } else { self.data.len() / self.cols };
        self.first_row..self.first_row + n
    }

    /// Store `value` at full-matrix position `(row, col)`.
    ///
    /// # Panics
    /// Panics if `row` lies outside this block or `value` is NaN.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f32) {
        assert!(!value.is_nan(), "NaN cannot be stored in a skim matrix");
        let local = row - self.first_row;
        self.data[local * self.cols + col] = value;
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        let v = self.data[(row - self.first_row) * self.cols + col];
        (!v.is_nan()).then_some(v)
    }
}

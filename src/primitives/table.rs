//! Numeric tables: the 2D data sources engines read from.
//!
//! ## Purpose
//!
//! This module defines the `NumericSource` trait (rows are observations,
//! columns are features) with a row-major dense table, a borrowed slice
//! view and a compressed-sparse-row table.
//!
//! ## Design notes
//!
//! * **Block reads**: Engines never index a source element by element; they
//!   pull rectangular row blocks into a reusable row-major buffer.
//! * **Sparse densification**: `CsrTable` materializes implicit zeros per
//!   block so kernels only ever see dense rows.
//! * **Validated construction**: Shapes are checked once when a table is built.
//!
//! ## Invariants
//!
//! * `read_block` clears `out` and leaves exactly `rows_read * column_count()`
//!   values in it.
//! * Column count is fixed for the lifetime of a table.
//!
//! ## Non-goals
//!
//! * Packed-symmetric or column-major layouts.
//! * Memory-mapped or lazily loaded storage.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::{format, vec::Vec};
#[cfg(feature = "std")]
use std::vec::Vec;

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::primitives::errors::MomentsError;

// ============================================================================
// NumericSource Trait
// ============================================================================

/// A read-only 2D array of scalars.
pub trait NumericSource<T> {
    /// Number of observations.
    fn row_count(&self) -> usize;

    /// Number of features.
    fn column_count(&self) -> usize;

    /// Read rows `[start_row, start_row + num_rows)` into `out` (row-major).
    ///
    /// The range is clamped to the end of the source; the number of rows
    /// actually read is returned.
    fn read_block(
        &self,
        start_row: usize,
        num_rows: usize,
        out: &mut Vec<T>,
    ) -> Result<usize, MomentsError>;
}

impl<T, S: NumericSource<T> + ?Sized> NumericSource<T> for &S {
    fn row_count(&self) -> usize {
        (**self).row_count()
    }

    fn column_count(&self) -> usize {
        (**self).column_count()
    }

    fn read_block(
        &self,
        start_row: usize,
        num_rows: usize,
        out: &mut Vec<T>,
    ) -> Result<usize, MomentsError> {
        (**self).read_block(start_row, num_rows, out)
    }
}

#[inline]
fn clamp_rows(total: usize, start_row: usize, num_rows: usize) -> usize {
    if start_row >= total {
        0
    } else {
        num_rows.min(total - start_row)
    }
}

// ============================================================================
// Dense Table
// ============================================================================

/// Owned row-major dense table.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseTable<T> {
    rows: usize,
    columns: usize,
    data: Vec<T>,
}

impl<T: Float> DenseTable<T> {
    /// Build a table from row-major values.
    pub fn new(data: Vec<T>, columns: usize) -> Result<Self, MomentsError> {
        if columns == 0 {
            return Err(MomentsError::InvalidArgument(
                "column count must be positive".into(),
            ));
        }
        if data.len() % columns != 0 {
            return Err(MomentsError::InvalidArgument(format!(
                "{} values do not fill rows of {} columns",
                data.len(),
                columns
            )));
        }
        Ok(Self {
            rows: data.len() / columns,
            columns,
            data,
        })
    }

    /// Build a table from a slice of rows.
    pub fn from_rows<R: AsRef<[T]>>(rows: &[R]) -> Result<Self, MomentsError> {
        let columns = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
        if columns == 0 {
            return Err(MomentsError::InvalidArgument(
                "rows must be non-empty to infer the column count".into(),
            ));
        }
        let mut data = Vec::with_capacity(rows.len() * columns);
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != columns {
                return Err(MomentsError::RaggedInput {
                    row: i,
                    expected: columns,
                    got: row.len(),
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            rows: rows.len(),
            columns,
            data,
        })
    }

    /// A table of zeros.
    pub fn zeros(rows: usize, columns: usize) -> Result<Self, MomentsError> {
        Self::new(vec![T::zero(); rows * columns], columns)
    }

    /// Row `i` as a slice, or `None` past the last row.
    pub fn row(&self, i: usize) -> Option<&[T]> {
        if i < self.rows {
            self.data.get(i * self.columns..(i + 1) * self.columns)
        } else {
            None
        }
    }

    /// Value at `(row, column)`.
    pub fn get(&self, row: usize, column: usize) -> Option<T> {
        if row < self.rows && column < self.columns {
            Some(self.data[row * self.columns + column])
        } else {
            None
        }
    }

    /// All values, row-major.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Consume the table and return its row-major values.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Overwrite rows starting at `start_row` with row-major `values`.
    pub fn write_block(&mut self, start_row: usize, values: &[T]) -> Result<(), MomentsError> {
        if values.len() % self.columns != 0 {
            return Err(MomentsError::InvalidArgument(format!(
                "{} values do not fill rows of {} columns",
                values.len(),
                self.columns
            )));
        }
        let rows = values.len() / self.columns;
        if start_row + rows > self.rows {
            return Err(MomentsError::InvalidArgument(format!(
                "write of {} rows at row {} exceeds {} rows",
                rows, start_row, self.rows
            )));
        }
        let start = start_row * self.columns;
        self.data[start..start + values.len()].copy_from_slice(values);
        Ok(())
    }
}

impl<T: Float> NumericSource<T> for DenseTable<T> {
    fn row_count(&self) -> usize {
        self.rows
    }

    fn column_count(&self) -> usize {
        self.columns
    }

    fn read_block(
        &self,
        start_row: usize,
        num_rows: usize,
        out: &mut Vec<T>,
    ) -> Result<usize, MomentsError> {
        out.clear();
        let rows = clamp_rows(self.rows, start_row, num_rows);
        if rows == 0 {
            return Ok(0);
        }
        let start = start_row * self.columns;
        out.extend_from_slice(&self.data[start..start + rows * self.columns]);
        Ok(rows)
    }
}

// ============================================================================
// Slice Table
// ============================================================================

/// Borrowed row-major view over a slice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliceTable<'a, T> {
    columns: usize,
    data: &'a [T],
}

impl<'a, T: Float> SliceTable<'a, T> {
    /// View `data` as rows of `columns` values.
    pub fn new(data: &'a [T], columns: usize) -> Result<Self, MomentsError> {
        if columns == 0 {
            return Err(MomentsError::InvalidArgument(
                "column count must be positive".into(),
            ));
        }
        if data.len() % columns != 0 {
            return Err(MomentsError::InvalidArgument(format!(
                "{} values do not fill rows of {} columns",
                data.len(),
                columns
            )));
        }
        Ok(Self { columns, data })
    }
}

impl<T: Float> NumericSource<T> for SliceTable<'_, T> {
    fn row_count(&self) -> usize {
        self.data.len() / self.columns
    }

    fn column_count(&self) -> usize {
        self.columns
    }

    fn read_block(
        &self,
        start_row: usize,
        num_rows: usize,
        out: &mut Vec<T>,
    ) -> Result<usize, MomentsError> {
        out.clear();
        let rows = clamp_rows(self.row_count(), start_row, num_rows);
        let start = start_row.min(self.row_count()) * self.columns;
        out.extend_from_slice(&self.data[start..start + rows * self.columns]);
        Ok(rows)
    }
}

// ============================================================================
// CSR Table
// ============================================================================

/// Compressed sparse row table (0-based indices).
#[derive(Debug, Clone, PartialEq)]
pub struct CsrTable<T> {
    columns: usize,
    values: Vec<T>,
    column_indices: Vec<usize>,
    row_offsets: Vec<usize>,
}

impl<T: Float> CsrTable<T> {
    /// Build a CSR table.
    ///
    /// `row_offsets` has one entry per row plus a trailing entry equal to
    /// `values.len()`.
    pub fn new(
        values: Vec<T>,
        column_indices: Vec<usize>,
        row_offsets: Vec<usize>,
        columns: usize,
    ) -> Result<Self, MomentsError> {
        if columns == 0 {
            return Err(MomentsError::InvalidArgument(
                "column count must be positive".into(),
            ));
        }
        if values.len() != column_indices.len() {
            return Err(MomentsError::InvalidArgument(format!(
                "{} values but {} column indices",
                values.len(),
                column_indices.len()
            )));
        }
        match (row_offsets.first(), row_offsets.last()) {
            (Some(&0), Some(&last)) if last == values.len() => {}
            _ => {
                return Err(MomentsError::InvalidArgument(
                    "row offsets must start at 0 and end at the number of values".into(),
                ));
            }
        }
        if row_offsets.windows(2).any(|w| w[0] > w[1]) {
            return Err(MomentsError::InvalidArgument(
                "row offsets must be non-decreasing".into(),
            ));
        }
        if let Some(&bad) = column_indices.iter().find(|&&c| c >= columns) {
            return Err(MomentsError::InvalidArgument(format!(
                "column index {} out of range for {} columns",
                bad, columns
            )));
        }
        Ok(Self {
            columns,
            values,
            column_indices,
            row_offsets,
        })
    }

    /// Number of explicitly stored values.
    pub fn nnz(&self) -> usize {
        self.values.len()
    }
}

impl<T: Float> NumericSource<T> for CsrTable<T> {
    fn row_count(&self) -> usize {
        self.row_offsets.len() - 1
    }

    fn column_count(&self) -> usize {
        self.columns
    }

    fn read_block(
        &self,
        start_row: usize,
        num_rows: usize,
        out: &mut Vec<T>,
    ) -> Result<usize, MomentsError> {
        out.clear();
        let rows = clamp_rows(self.row_count(), start_row, num_rows);
        out.resize(rows * self.columns, T::zero());
        for local in 0..rows {
            let r = start_row + local;
            let base = local * self.columns;
            for k in self.row_offsets[r]..self.row_offsets[r + 1] {
                out[base + self.column_indices[k]] = self.values[k];
            }
        }
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dense_read_block_clamps_to_end() {
        let t = DenseTable::new(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2).unwrap();
        let mut out = Vec::new();
        assert_eq!(t.read_block(2, 10, &mut out).unwrap(), 1);
        assert_eq!(out, vec![5.0, 6.0]);
        assert_eq!(t.read_block(3, 1, &mut out).unwrap(), 0);
        assert!(out.is_empty());
    }

    #[test]
    fn test_csr_densifies_rows() {
        // [[1, 0, 2], [0, 0, 0], [0, 3, 0]]
        let t = CsrTable::new(vec![1.0, 2.0, 3.0], vec![0, 2, 1], vec![0, 2, 2, 3], 3).unwrap();
        let mut out = Vec::new();
        assert_eq!(t.read_block(0, 3, &mut out).unwrap(), 3);
        assert_eq!(out, vec![1.0, 0.0, 2.0, 0.0, 0.0, 0.0, 0.0, 3.0, 0.0]);
    }
}

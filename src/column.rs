// SPDX-License-Identifier: Apache-2.0

//! Columnar storage model
//!
//! The three physical string layouts the matching kernel accepts (variable
//! length, fixed width, constant broadcast), the single-byte boolean result
//! column, and the runtime-typed [`Column`] handle the engine passes in.
//! Columns are immutable for the duration of one kernel invocation.

use serde::{Deserialize, Serialize};

use crate::types::{ColmatchError, Result};

/// Logical element kind of a column, as seen by the engine's type checker.
///
/// `UInt8` is the declared result type of the matching functions and is not a
/// legal argument type for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    String,
    FixedString,
    UInt8,
}

impl ColumnType {
    #[inline]
    pub fn is_string_like(self) -> bool {
        matches!(self, ColumnType::String | ColumnType::FixedString)
    }

    #[inline]
    pub fn name(self) -> &'static str {
        match self {
            ColumnType::String => "String",
            ColumnType::FixedString => "FixedString",
            ColumnType::UInt8 => "UInt8",
        }
    }
}

/// Variable-length byte-string column.
///
/// Values live back to back in one contiguous buffer; `offsets` holds n+1
/// entries with a leading 0, so row i spans `data[offsets[i]..offsets[i+1]]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StringColumn {
    data: Vec<u8>,
    offsets: Vec<usize>,
}

impl Default for StringColumn {
    fn default() -> Self {
        Self::new()
    }
}

impl StringColumn {
    #[inline]
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            offsets: vec![0],
        }
    }

    pub fn from_values<V: AsRef<[u8]>>(values: &[V]) -> Self {
        let mut column = Self::new();
        for value in values {
            column.push(value.as_ref());
        }
        column
    }

    pub fn push(&mut self, value: &[u8]) {
        self.data.extend_from_slice(value);
        self.offsets.push(self.data.len());
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.offsets.len() - 1
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Byte span of row `row`. Caller must keep `row < len()`.
    #[inline]
    pub fn value(&self, row: usize) -> &[u8] {
        &self.data[self.offsets[row]..self.offsets[row + 1]]
    }
}

/// Fixed-width byte-string column: every row occupies exactly `width` bytes,
/// so row i spans `data[i * width..(i + 1) * width]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedStringColumn {
    width: usize,
    data: Vec<u8>,
}

impl FixedStringColumn {
    pub fn new(width: usize) -> Result<Self> {
        if width == 0 {
            return Err(ColmatchError::Internal(
                "FixedString width must be non-zero".to_string(),
            ));
        }
        Ok(Self {
            width,
            data: Vec::new(),
        })
    }

    /// Builds a column of the given width; short values are padded with zero
    /// bytes, values longer than `width` are rejected.
    pub fn from_values<V: AsRef<[u8]>>(width: usize, values: &[V]) -> Result<Self> {
        let mut column = Self::new(width)?;
        for value in values {
            column.push(value.as_ref())?;
        }
        Ok(column)
    }

    pub fn push(&mut self, value: &[u8]) -> Result<()> {
        if value.len() > self.width {
            return Err(ColmatchError::Internal(format!(
                "value of {} bytes does not fit FixedString({})",
                value.len(),
                self.width
            )));
        }
        self.data.extend_from_slice(value);
        self.data.resize(self.data.len() + self.width - value.len(), 0);
        Ok(())
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len() / self.width
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Byte span of row `row`. Caller must keep `row < len()`.
    #[inline]
    pub fn value(&self, row: usize) -> &[u8] {
        &self.data[row * self.width..(row + 1) * self.width]
    }
}

/// A single value logically broadcast to `len` rows.
///
/// Wraps a one-row column of either string kind; the value is stored exactly
/// once regardless of the broadcast length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstantColumn {
    inner: Box<Column>,
    len: usize,
}

impl ConstantColumn {
    pub fn new(inner: Column, len: usize) -> Result<Self> {
        let valid = matches!(
            &inner,
            Column::String(c) if c.len() == 1
        ) || matches!(
            &inner,
            Column::FixedString(c) if c.len() == 1
        );
        if !valid {
            return Err(ColmatchError::Internal(format!(
                "constant column must wrap a one-row string-like column, got {} row(s) of {}",
                inner.len(),
                inner.column_type().name()
            )));
        }
        Ok(Self {
            inner: Box::new(inner),
            len,
        })
    }

    /// The wrapped one-row column holding the broadcast value.
    #[inline]
    pub fn inner(&self) -> &Column {
        &self.inner
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Densely packed boolean result column; one byte per row, row order
/// preserved, 1 = match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct UInt8Column {
    data: Vec<u8>,
}

impl UInt8Column {
    #[inline]
    pub fn from_vec(data: Vec<u8>) -> Self {
        Self { data }
    }

    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Value of row `row`. Caller must keep `row < len()`.
    #[inline]
    pub fn value(&self, row: usize) -> u8 {
        self.data[row]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Runtime-typed column handle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Column {
    String(StringColumn),
    FixedString(FixedStringColumn),
    Constant(ConstantColumn),
    UInt8(UInt8Column),
}

impl Column {
    /// Logical row count; a constant column reports its broadcast length.
    #[inline]
    pub fn len(&self) -> usize {
        match self {
            Column::String(c) => c.len(),
            Column::FixedString(c) => c.len(),
            Column::Constant(c) => c.len(),
            Column::UInt8(c) => c.len(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Logical element kind; a constant column reports the wrapped column's
    /// kind, since constness is a storage property, not a type.
    #[inline]
    pub fn column_type(&self) -> ColumnType {
        match self {
            Column::String(_) => ColumnType::String,
            Column::FixedString(_) => ColumnType::FixedString,
            Column::Constant(c) => c.inner().column_type(),
            Column::UInt8(_) => ColumnType::UInt8,
        }
    }
}

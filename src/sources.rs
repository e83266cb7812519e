// SPDX-License-Identifier: Apache-2.0

//! Column sources
//!
//! Cursor-style views that let the scan kernel read consecutive rows from any
//! physical column layout through one interface. A source is built fresh per
//! kernel invocation, yields exactly the column's logical row count, and does
//! no per-row allocation. Constant columns are handled by a decorator that
//! pins the wrapped cursor to the single stored value.

use crate::column::{FixedStringColumn, StringColumn};

/// Single-pass cursor over one column's byte-string values.
///
/// `current()` is valid only while `is_end()` returns false; `advance()` past
/// the last row is not called by the scan loop, which is driven by the
/// haystack source's exhaustion.
pub trait ByteSource {
    fn is_end(&self) -> bool;
    fn current(&self) -> &[u8];
    fn advance(&mut self);
}

/// Cursor over a variable-length string column.
#[derive(Debug)]
pub struct StringSource<'a> {
    column: &'a StringColumn,
    row: usize,
}

impl<'a> StringSource<'a> {
    #[inline]
    pub fn new(column: &'a StringColumn) -> Self {
        Self { column, row: 0 }
    }
}

impl ByteSource for StringSource<'_> {
    #[inline]
    fn is_end(&self) -> bool {
        self.row >= self.column.len()
    }

    #[inline]
    fn current(&self) -> &[u8] {
        self.column.value(self.row)
    }

    #[inline]
    fn advance(&mut self) {
        self.row += 1;
    }
}

/// Cursor over a fixed-width string column.
#[derive(Debug)]
pub struct FixedStringSource<'a> {
    column: &'a FixedStringColumn,
    row: usize,
}

impl<'a> FixedStringSource<'a> {
    #[inline]
    pub fn new(column: &'a FixedStringColumn) -> Self {
        Self { column, row: 0 }
    }
}

impl ByteSource for FixedStringSource<'_> {
    #[inline]
    fn is_end(&self) -> bool {
        self.row >= self.column.len()
    }

    #[inline]
    fn current(&self) -> &[u8] {
        self.column.value(self.row)
    }

    #[inline]
    fn advance(&mut self) {
        self.row += 1;
    }
}

/// Decorator broadcasting a wrapped one-row cursor to `len` rows.
///
/// The wrapped cursor is built over the constant column's single stored value
/// at construction time and never advances; only the broadcast row counter
/// moves, so every `current()` exposes the same span.
#[derive(Debug)]
pub struct ConstSource<S> {
    inner: S,
    len: usize,
    row: usize,
}

impl<S: ByteSource> ConstSource<S> {
    #[inline]
    pub fn new(inner: S, len: usize) -> Self {
        Self { inner, len, row: 0 }
    }
}

impl<S: ByteSource> ByteSource for ConstSource<S> {
    #[inline]
    fn is_end(&self) -> bool {
        self.row >= self.len
    }

    #[inline]
    fn current(&self) -> &[u8] {
        self.inner.current()
    }

    #[inline]
    fn advance(&mut self) {
        self.row += 1;
    }
}

// SPDX-License-Identifier: Apache-2.0

//! Colmatch library
//!
//! A columnar prefix/suffix string-matching kernel for query-execution
//! engines, with hardware-accelerated implementations where it makes sense.
//! Given a haystack column and a needle column of equal row count, it tests
//! row by row whether the haystack value begins with (or ends with) the
//! needle value, on raw bytes, and returns a single-byte boolean column.
//!
//! - Three physical column layouts (variable-length, fixed-width, constant
//!   broadcast), paired through a uniform cursor abstraction
//! - One scan algorithm instantiated per SIMD tier; the tier is detected
//!   once per process and every invocation routes to the best supported one
//!
//! ## Hardware support
//! - **SSE4.2 / AVX / AVX2 / NEON** are used on stable Rust where available
//! - **AVX-512** is available behind the `colmatch-nightly` feature
//! - The `disable-simd` feature forces the portable scalar baseline
//!
//! ## Usage
//!
//! ```rust
//! use colmatch::{starts_with_columns, Column, StringColumn};
//!
//! let haystack = Column::String(StringColumn::from_values(&["hello", "abc"]));
//! let needle = Column::String(StringColumn::from_values(&["he", "abcd"]));
//!
//! let result = starts_with_columns(&haystack, &needle, 2).unwrap();
//! assert_eq!(result.as_slice(), &[1, 0]);
//!
//! // Check which capability tier invocations route to
//! let tier = colmatch::resolved_tier();
//! println!("Kernel tier: {:?}", tier);
//! ```

pub mod column;
pub mod constants;
pub mod dispatch;
mod kernel;
pub mod sources;
pub mod types;

pub use types::*;

pub use column::{
    Column, ColumnType, ConstantColumn, FixedStringColumn, StringColumn, UInt8Column,
};
pub use dispatch::*;

#[cfg(test)]
pub mod test_utils;

#[cfg(test)]
#[path = "tests/column_tests.rs"]
mod column_tests;
#[cfg(test)]
#[path = "tests/dispatch_tests.rs"]
mod dispatch_tests;
#[cfg(test)]
#[path = "tests/kernel_tests.rs"]
mod kernel_tests;
#[cfg(test)]
#[path = "tests/sources_tests.rs"]
mod sources_tests;

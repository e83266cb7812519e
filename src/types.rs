// SPDX-License-Identifier: Apache-2.0

// types.rs for colmatch
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ColmatchError {
    #[error("Illegal type {type_name} of argument {position} of function {function}")]
    IllegalArgumentType {
        function: &'static str,
        /// 1-based argument position, as reported to the engine's type checker.
        position: usize,
        type_name: String,
    },
    #[error("Illegal combination of columns as arguments of function {0}")]
    IllegalColumnCombination(&'static str),
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, ColmatchError>;

/// Which end of the haystack the needle is tested against.
///
/// Prefix and suffix matching are one kernel: they share the needle-length
/// fast path and differ only in which slice of the haystack is compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchMode {
    Prefix,
    Suffix,
}

impl MatchMode {
    /// Engine-facing function name, used in error messages.
    #[inline]
    pub fn function_name(self) -> &'static str {
        match self {
            MatchMode::Prefix => "startsWith",
            MatchMode::Suffix => "endsWith",
        }
    }
}

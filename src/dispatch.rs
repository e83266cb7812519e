// SPDX-License-Identifier: Apache-2.0

//! # Capability dispatch
//!
//! This module holds one independently compiled kernel variant per supported
//! instruction-set tier, detects the host's tier exactly once per process,
//! and routes every invocation to the highest registered tier the host
//! supports. Tiers implement the identical algorithm and differ only in the
//! vector width of the byte-equality comparison, so the choice affects
//! throughput, never results.

use log::trace;

use std::sync::atomic::{AtomicU8, Ordering};

use crate::column::{Column, ColumnType, UInt8Column};
use crate::kernel;
use crate::types::{ColmatchError, MatchMode, Result};

// =============================================================================
//  HARDWARE DETECTION & SIMD CAPABILITIES
// =============================================================================

/// Hardware capability detection used by the kernel dispatch layer
pub struct HardwareCapabilities {
    pub has_avx512: bool,
    pub has_avx2: bool,
    pub has_avx: bool,
    pub has_sse42: bool,
    pub has_neon: bool,
}

impl HardwareCapabilities {
    #[inline]
    pub fn detect() -> Self {
        HardwareCapabilities {
            has_avx512: Self::detect_avx512(),
            has_avx2: Self::detect_avx2(),
            has_avx: Self::detect_avx(),
            has_sse42: Self::detect_sse42(),
            has_neon: Self::detect_neon(),
        }
    }

    fn detect_avx512() -> bool {
        #[allow(unused_mut)]
        let mut detected_avx512 = false;

        // The byte compares need AVX-512 BW on top of the foundation set
        #[cfg(target_arch = "x86_64")]
        if is_x86_feature_detected!("avx512f") && is_x86_feature_detected!("avx512bw") {
            detected_avx512 = true;
        }

        detected_avx512
    }

    fn detect_avx2() -> bool {
        #[allow(unused_mut)]
        let mut detected_avx2 = false;

        #[cfg(target_arch = "x86_64")]
        if is_x86_feature_detected!("avx2") {
            detected_avx2 = true;
        }

        detected_avx2
    }

    fn detect_avx() -> bool {
        #[allow(unused_mut)]
        let mut detected_avx = false;

        #[cfg(target_arch = "x86_64")]
        if is_x86_feature_detected!("avx") {
            detected_avx = true;
        }

        detected_avx
    }

    fn detect_sse42() -> bool {
        #[allow(unused_mut)]
        let mut detected_sse42 = false;

        #[cfg(target_arch = "x86_64")]
        if is_x86_feature_detected!("sse4.2") {
            detected_sse42 = true;
        }

        detected_sse42
    }

    fn detect_neon() -> bool {
        #[allow(unused_mut)]
        let mut detected_neon = false;

        #[cfg(target_arch = "aarch64")]
        if std::arch::is_aarch64_feature_detected!("neon") {
            detected_neon = true;
        }

        detected_neon
    }
}

/// Get information about available SIMD capabilities
#[inline]
pub fn get_hw_capabilities() -> HardwareCapabilities {
    HardwareCapabilities::detect()
}

// =============================================================================
//  CAPABILITY TIERS
// =============================================================================

/// Ordered instruction-set tier of the host architecture.
///
/// Higher tiers are supersets of lower ones' correctness guarantees; the
/// kernel variants differ only in achievable throughput.
#[cfg(target_arch = "x86_64")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum CapabilityTier {
    Baseline = 0,
    Sse42 = 1,
    Avx = 2,
    Avx2 = 3,
    Avx512 = 4,
}

/// Ordered instruction-set tier of the host architecture.
#[cfg(target_arch = "aarch64")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum CapabilityTier {
    Baseline = 0,
    Neon = 1,
}

/// Ordered instruction-set tier of the host architecture.
#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum CapabilityTier {
    Baseline = 0,
}

impl CapabilityTier {
    /// Highest tier the host supports. With the `disable-simd` feature every
    /// host reports `Baseline`.
    #[inline]
    pub fn detect_host() -> Self {
        if cfg!(feature = "disable-simd") {
            return CapabilityTier::Baseline;
        }
        Self::detect_host_arch()
    }

    #[cfg(target_arch = "x86_64")]
    fn detect_host_arch() -> Self {
        let caps = HardwareCapabilities::detect();
        if caps.has_avx512 {
            return CapabilityTier::Avx512;
        }
        if caps.has_avx2 {
            return CapabilityTier::Avx2;
        }
        if caps.has_avx {
            return CapabilityTier::Avx;
        }
        if caps.has_sse42 {
            return CapabilityTier::Sse42;
        }
        CapabilityTier::Baseline
    }

    #[cfg(target_arch = "aarch64")]
    fn detect_host_arch() -> Self {
        if HardwareCapabilities::detect().has_neon {
            return CapabilityTier::Neon;
        }
        CapabilityTier::Baseline
    }

    #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
    fn detect_host_arch() -> Self {
        CapabilityTier::Baseline
    }
}

// =============================================================================
//  KERNEL VARIANT REGISTRATION - ONE COMPILED COPY PER TIER
// =============================================================================

/// A compiled kernel variant; safe to call only for the tier it was
/// registered under, which the dispatcher verifies before routing.
pub(crate) type KernelVariantFn = fn(&Column, &Column, MatchMode, &mut [u8]) -> Result<()>;

/// Baseline variant; the scalar primitive is correct on every host.
fn kernel_baseline(haystack: &Column, needle: &Column, mode: MatchMode, out: &mut [u8]) -> Result<()> {
    unsafe { kernel::scan_columns::<kernel::ScalarEq>(haystack, needle, mode, out) }
}

#[cfg(target_arch = "x86_64")]
fn kernel_sse42(haystack: &Column, needle: &Column, mode: MatchMode, out: &mut [u8]) -> Result<()> {
    // Routed to only after the dispatcher verified SSE4.2 support
    unsafe { kernel::scan_columns::<kernel::Sse42Eq>(haystack, needle, mode, out) }
}

#[cfg(target_arch = "x86_64")]
fn kernel_avx(haystack: &Column, needle: &Column, mode: MatchMode, out: &mut [u8]) -> Result<()> {
    // Routed to only after the dispatcher verified AVX support
    unsafe { kernel::scan_columns::<kernel::AvxEq>(haystack, needle, mode, out) }
}

#[cfg(target_arch = "x86_64")]
fn kernel_avx2(haystack: &Column, needle: &Column, mode: MatchMode, out: &mut [u8]) -> Result<()> {
    // Routed to only after the dispatcher verified AVX2 support
    unsafe { kernel::scan_columns::<kernel::Avx2Eq>(haystack, needle, mode, out) }
}

#[cfg(all(target_arch = "x86_64", feature = "colmatch-nightly"))]
fn kernel_avx512(haystack: &Column, needle: &Column, mode: MatchMode, out: &mut [u8]) -> Result<()> {
    // Routed to only after the dispatcher verified AVX-512 F+BW support
    unsafe { kernel::scan_columns::<kernel::Avx512Eq>(haystack, needle, mode, out) }
}

#[cfg(target_arch = "aarch64")]
fn kernel_neon(haystack: &Column, needle: &Column, mode: MatchMode, out: &mut [u8]) -> Result<()> {
    // Routed to only after the dispatcher verified NEON support
    unsafe { kernel::scan_columns::<kernel::NeonEq>(haystack, needle, mode, out) }
}

/// Registered kernel variants, lowest tier first. Registration is static;
/// routing always picks the highest entry not exceeding the host tier.
#[cfg(all(target_arch = "x86_64", feature = "colmatch-nightly"))]
pub(crate) const KERNEL_VARIANTS: &[(CapabilityTier, KernelVariantFn)] = &[
    (CapabilityTier::Baseline, kernel_baseline),
    (CapabilityTier::Sse42, kernel_sse42),
    (CapabilityTier::Avx, kernel_avx),
    (CapabilityTier::Avx2, kernel_avx2),
    (CapabilityTier::Avx512, kernel_avx512),
];

/// Registered kernel variants, lowest tier first.
#[cfg(all(target_arch = "x86_64", not(feature = "colmatch-nightly")))]
pub(crate) const KERNEL_VARIANTS: &[(CapabilityTier, KernelVariantFn)] = &[
    (CapabilityTier::Baseline, kernel_baseline),
    (CapabilityTier::Sse42, kernel_sse42),
    (CapabilityTier::Avx, kernel_avx),
    (CapabilityTier::Avx2, kernel_avx2),
];

/// Registered kernel variants, lowest tier first.
#[cfg(target_arch = "aarch64")]
pub(crate) const KERNEL_VARIANTS: &[(CapabilityTier, KernelVariantFn)] = &[
    (CapabilityTier::Baseline, kernel_baseline),
    (CapabilityTier::Neon, kernel_neon),
];

/// Registered kernel variants; only the portable baseline exists here.
#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
pub(crate) const KERNEL_VARIANTS: &[(CapabilityTier, KernelVariantFn)] = &[
    (CapabilityTier::Baseline, kernel_baseline),
];

// =============================================================================
//  ONE-SHOT TIER RESOLUTION
// =============================================================================

const TIER_UNRESOLVED: u8 = u8::MAX;

/// Index into `KERNEL_VARIANTS`, resolved exactly once per process.
static RESOLVED_VARIANT: AtomicU8 = AtomicU8::new(TIER_UNRESOLVED);

fn resolved_variant_index() -> usize {
    let cached = RESOLVED_VARIANT.load(Ordering::Relaxed);
    if cached != TIER_UNRESOLVED {
        return cached as usize;
    }

    // One-time resolution. Detection is deterministic, so racing
    // initializations store the same index and the relaxed ordering is
    // sufficient.
    let host = CapabilityTier::detect_host();
    let mut best = 0;
    for (index, (tier, _)) in KERNEL_VARIANTS.iter().enumerate() {
        if *tier <= host {
            best = index;
        }
    }

    trace!(
        "KERNEL DISPATCH: host tier {:?}, routing to {:?}",
        host,
        KERNEL_VARIANTS[best].0
    );
    RESOLVED_VARIANT.store(best as u8, Ordering::Relaxed);
    best
}

/// The tier every invocation in this process routes to.
#[inline]
pub fn resolved_tier() -> CapabilityTier {
    KERNEL_VARIANTS[resolved_variant_index()].0
}

/// Registered variants the current host can run, lowest tier first.
#[cfg(test)]
pub(crate) fn supported_variants() -> Vec<(CapabilityTier, KernelVariantFn)> {
    let host = CapabilityTier::detect_host();
    KERNEL_VARIANTS
        .iter()
        .copied()
        .filter(|(tier, _)| *tier <= host)
        .collect()
}

// =============================================================================
//  ENGINE-FACING ENTRY POINTS
// =============================================================================

/// Declared result type of the matching functions, for the engine's type
/// checker.
///
/// Both arguments must be string-like (variable-length or fixed-width byte
/// strings, including their constant-broadcast forms); the result is always
/// a single-byte boolean column.
///
/// # Errors
/// * `ColmatchError::IllegalArgumentType` naming the 1-based position and
///   type of the first non-string-like argument
/// * `ColmatchError::Internal` if the argument count is not 2
pub fn return_type(argument_types: &[ColumnType], mode: MatchMode) -> Result<ColumnType> {
    if argument_types.len() != 2 {
        return Err(ColmatchError::Internal(format!(
            "{} expects 2 arguments, got {}",
            mode.function_name(),
            argument_types.len()
        )));
    }

    for (index, argument) in argument_types.iter().enumerate() {
        if !argument.is_string_like() {
            return Err(ColmatchError::IllegalArgumentType {
                function: mode.function_name(),
                position: index + 1,
                type_name: argument.name().to_string(),
            });
        }
    }

    Ok(ColumnType::UInt8)
}

/// Tests row by row whether the haystack value begins with (Prefix) or ends
/// with (Suffix) the corresponding needle value.
///
/// Routes to the compiled kernel variant for the tier resolved on first use.
/// Either a full result column of `row_count` booleans is produced, or an
/// error is raised before any row is written.
///
/// # Arguments
/// * `haystack` - Column being searched
/// * `needle` - Column holding the candidate prefix/suffix values
/// * `row_count` - Shared logical row count of both columns
/// * `mode` - Which end of the haystack to test
///
/// # Returns
/// * `Ok(UInt8Column)` - One boolean byte per row, row order preserved
/// * `Err(ColmatchError::IllegalArgumentType)` - An argument's element kind
///   is not string-like
/// * `Err(ColmatchError::IllegalColumnCombination)` - A column's runtime
///   storage kind matches no recognized source kind
/// * `Err(ColmatchError::Internal)` - A column's logical length differs from
///   `row_count`
///
/// # Examples
/// ```rust
/// use colmatch::{match_columns, Column, MatchMode, StringColumn};
///
/// let haystack = Column::String(StringColumn::from_values(&["hello", "abc"]));
/// let needle = Column::String(StringColumn::from_values(&["he", "abcd"]));
/// let result = match_columns(&haystack, &needle, 2, MatchMode::Prefix)?;
/// assert_eq!(result.as_slice(), &[1, 0]);
/// # Ok::<(), colmatch::ColmatchError>(())
/// ```
pub fn match_columns(
    haystack: &Column,
    needle: &Column,
    row_count: usize,
    mode: MatchMode,
) -> Result<UInt8Column> {
    trace!(
        "MATCH_COLUMNS DISPATCH: mode={:?}, rows={}, haystack={}, needle={}",
        mode,
        row_count,
        haystack.column_type().name(),
        needle.column_type().name()
    );

    // Type checking happens before any source is constructed
    if !haystack.column_type().is_string_like() {
        return Err(ColmatchError::IllegalArgumentType {
            function: mode.function_name(),
            position: 1,
            type_name: haystack.column_type().name().to_string(),
        });
    }
    if !needle.column_type().is_string_like() {
        return Err(ColmatchError::IllegalArgumentType {
            function: mode.function_name(),
            position: 2,
            type_name: needle.column_type().name().to_string(),
        });
    }

    // The engine guarantees equal logical lengths; checked so a violation
    // surfaces before any row is written
    if haystack.len() != row_count || needle.len() != row_count {
        return Err(ColmatchError::Internal(format!(
            "row count mismatch in {}: haystack={}, needle={}, expected={}",
            mode.function_name(),
            haystack.len(),
            needle.len(),
            row_count
        )));
    }

    let mut out = vec![0u8; row_count];
    let variant = KERNEL_VARIANTS[resolved_variant_index()].1;
    variant(haystack, needle, mode, &mut out)?;

    Ok(UInt8Column::from_vec(out))
}

/// Tests whether each haystack row starts with the corresponding needle row.
///
/// See [`match_columns`] for the full contract.
#[inline]
pub fn starts_with_columns(
    haystack: &Column,
    needle: &Column,
    row_count: usize,
) -> Result<UInt8Column> {
    match_columns(haystack, needle, row_count, MatchMode::Prefix)
}

/// Tests whether each haystack row ends with the corresponding needle row.
///
/// See [`match_columns`] for the full contract.
#[inline]
pub fn ends_with_columns(
    haystack: &Column,
    needle: &Column,
    row_count: usize,
) -> Result<UInt8Column> {
    match_columns(haystack, needle, row_count, MatchMode::Suffix)
}

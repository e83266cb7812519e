// SPDX-License-Identifier: Apache-2.0

//! Matching kernel
//!
//! One scan algorithm computes the prefix/suffix boolean result for every
//! supported pair of column sources. The byte-equality comparison is
//! abstracted behind [`SpanEq`] so the identical loop can be instantiated
//! once per capability tier; the tier is chosen once per process by
//! [`crate::dispatch`], which also guarantees the required instruction set
//! before routing here. Source pairing is an explicit 4x4 function-pointer
//! table keyed by (haystack kind, needle kind); every combination is legal.

#![allow(unsafe_op_in_unsafe_fn)]

// ARM NEON imports
#[cfg(target_arch = "aarch64")]
use std::arch::aarch64::{vceqq_u8, vld1q_u8, vminvq_u8};

// x86_64 SIMD intrinsics imports
#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::{
    _mm256_cmpeq_epi8, _mm256_loadu_si256, _mm256_movemask_epi8, _mm_cmpeq_epi8, _mm_loadu_si128,
    _mm_movemask_epi8,
};

// AVX-512 intrinsics (nightly feature only)
#[cfg(all(target_arch = "x86_64", feature = "colmatch-nightly"))]
use std::arch::x86_64::{
    _mm512_cmpeq_epu8_mask, _mm512_loadu_si512, _mm512_mask_cmpeq_epu8_mask,
    _mm512_maskz_loadu_epi8,
};

#[cfg(target_arch = "aarch64")]
use super::constants::LANES_NEON_BYTES;
#[cfg(all(target_arch = "x86_64", feature = "colmatch-nightly"))]
use super::constants::LANES_AVX512_BYTES;
#[cfg(target_arch = "x86_64")]
use super::constants::{LANES_AVX2_BYTES, LANES_AVX_BYTES, LANES_SSE_BYTES};

use crate::column::Column;
use crate::sources::{ByteSource, ConstSource, FixedStringSource, StringSource};
use crate::types::{ColmatchError, MatchMode, Result};

// =============================================================================
//  BYTE-SPAN EQUALITY PRIMITIVES - ONE PER CAPABILITY TIER
// =============================================================================

/// Byte-exact equality of two equal-length spans.
///
/// Every implementation returns the same boolean for the same input; tiers
/// differ only in the internal vector width used for the comparison.
pub(crate) trait SpanEq {
    /// # Safety
    /// Implementations may execute tier-specific SIMD instructions; the
    /// caller must have verified the corresponding capability before
    /// instantiating the kernel with this primitive.
    unsafe fn spans_equal(a: &[u8], b: &[u8]) -> bool;
}

/// Portable scalar comparison; correct on every host.
pub(crate) struct ScalarEq;

impl SpanEq for ScalarEq {
    #[inline]
    unsafe fn spans_equal(a: &[u8], b: &[u8]) -> bool {
        a == b
    }
}

#[cfg(target_arch = "x86_64")]
pub(crate) struct Sse42Eq;

#[cfg(target_arch = "x86_64")]
impl SpanEq for Sse42Eq {
    #[inline]
    unsafe fn spans_equal(a: &[u8], b: &[u8]) -> bool {
        spans_equal_sse42(a, b)
    }
}

#[cfg(target_arch = "x86_64")]
pub(crate) struct AvxEq;

#[cfg(target_arch = "x86_64")]
impl SpanEq for AvxEq {
    #[inline]
    unsafe fn spans_equal(a: &[u8], b: &[u8]) -> bool {
        spans_equal_avx(a, b)
    }
}

#[cfg(target_arch = "x86_64")]
pub(crate) struct Avx2Eq;

#[cfg(target_arch = "x86_64")]
impl SpanEq for Avx2Eq {
    #[inline]
    unsafe fn spans_equal(a: &[u8], b: &[u8]) -> bool {
        spans_equal_avx2(a, b)
    }
}

#[cfg(all(target_arch = "x86_64", feature = "colmatch-nightly"))]
pub(crate) struct Avx512Eq;

#[cfg(all(target_arch = "x86_64", feature = "colmatch-nightly"))]
impl SpanEq for Avx512Eq {
    #[inline]
    unsafe fn spans_equal(a: &[u8], b: &[u8]) -> bool {
        spans_equal_avx512(a, b)
    }
}

#[cfg(target_arch = "aarch64")]
pub(crate) struct NeonEq;

#[cfg(target_arch = "aarch64")]
impl SpanEq for NeonEq {
    #[inline]
    unsafe fn spans_equal(a: &[u8], b: &[u8]) -> bool {
        spans_equal_neon(a, b)
    }
}

// SSE4.2 span equality.
//
// # Safety
// Requires SSE4.2 support. Use `is_x86_feature_detected!("sse4.2")` before calling.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "sse4.2")]
unsafe fn spans_equal_sse42(a: &[u8], b: &[u8]) -> bool {
    const LANES: usize = LANES_SSE_BYTES;
    const FULL_MATCH_MASK: i32 = 0xFFFF;

    let len = a.len();
    let mut j = 0;

    while j + LANES <= len {
        let chunk_a = _mm_loadu_si128(a.as_ptr().add(j) as *const _);
        let chunk_b = _mm_loadu_si128(b.as_ptr().add(j) as *const _);
        let cmp_result = _mm_cmpeq_epi8(chunk_a, chunk_b);
        if _mm_movemask_epi8(cmp_result) != FULL_MATCH_MASK {
            return false;
        }
        j += LANES;
    }

    // Handle final scalar bytes
    while j < len {
        if a[j] != b[j] {
            return false;
        }
        j += 1;
    }

    true
}

// AVX span equality.
//
// AVX1 has no 256-bit integer compare, so this tier keeps 128-bit compares
// and differs from SSE4.2 only in VEX encoding.
//
// # Safety
// Requires AVX support. Use `is_x86_feature_detected!("avx")` before calling.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx")]
unsafe fn spans_equal_avx(a: &[u8], b: &[u8]) -> bool {
    const LANES: usize = LANES_AVX_BYTES;
    const FULL_MATCH_MASK: i32 = 0xFFFF;

    let len = a.len();
    let mut j = 0;

    while j + LANES <= len {
        let chunk_a = _mm_loadu_si128(a.as_ptr().add(j) as *const _);
        let chunk_b = _mm_loadu_si128(b.as_ptr().add(j) as *const _);
        let cmp_result = _mm_cmpeq_epi8(chunk_a, chunk_b);
        if _mm_movemask_epi8(cmp_result) != FULL_MATCH_MASK {
            return false;
        }
        j += LANES;
    }

    while j < len {
        if a[j] != b[j] {
            return false;
        }
        j += 1;
    }

    true
}

// AVX2 span equality.
//
// Uses 256-bit vectorized byte comparisons with a 128-bit chunk and scalar
// bytes for the tail.
//
// # Safety
// Requires AVX2 support. Use `is_x86_feature_detected!("avx2")` before calling.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2")]
unsafe fn spans_equal_avx2(a: &[u8], b: &[u8]) -> bool {
    const LANES: usize = LANES_AVX2_BYTES;
    const FULL_MATCH_MASK: i32 = -1i32; // All 32 bits set

    let len = a.len();
    let mut j = 0;

    while j + LANES <= len {
        let chunk_a = _mm256_loadu_si256(a.as_ptr().add(j) as *const _);
        let chunk_b = _mm256_loadu_si256(b.as_ptr().add(j) as *const _);
        let cmp_result = _mm256_cmpeq_epi8(chunk_a, chunk_b);
        if _mm256_movemask_epi8(cmp_result) != FULL_MATCH_MASK {
            return false;
        }
        j += LANES;
    }

    // Use 128-bit SIMD for 16-31 remaining bytes
    if len - j >= LANES_SSE_BYTES {
        let chunk_a = _mm_loadu_si128(a.as_ptr().add(j) as *const _);
        let chunk_b = _mm_loadu_si128(b.as_ptr().add(j) as *const _);
        let cmp_result = _mm_cmpeq_epi8(chunk_a, chunk_b);
        if _mm_movemask_epi8(cmp_result) != 0xFFFF {
            return false;
        }
        j += LANES_SSE_BYTES;
    }

    // Handle final scalar bytes
    while j < len {
        if a[j] != b[j] {
            return false;
        }
        j += 1;
    }

    true
}

// AVX-512 span equality.
//
// Full 512-bit chunks plus one masked load for the tail, so no scalar loop is
// needed.
//
// # Safety
// Requires AVX-512 F and BW support. Use `is_x86_feature_detected!` before calling.
#[cfg(all(target_arch = "x86_64", feature = "colmatch-nightly"))]
#[target_feature(enable = "avx512f,avx512bw")]
unsafe fn spans_equal_avx512(a: &[u8], b: &[u8]) -> bool {
    const LANES: usize = LANES_AVX512_BYTES;
    const FULL_MATCH_MASK: u64 = u64::MAX; // All 64 lanes equal

    let len = a.len();
    let mut j = 0;

    while j + LANES <= len {
        let chunk_a = _mm512_loadu_si512(a.as_ptr().add(j) as *const _);
        let chunk_b = _mm512_loadu_si512(b.as_ptr().add(j) as *const _);
        if _mm512_cmpeq_epu8_mask(chunk_a, chunk_b) != FULL_MATCH_MASK {
            return false;
        }
        j += LANES;
    }

    // Masked tail: compare only the remaining lanes
    let remaining = len - j;
    if remaining > 0 {
        let tail_mask = (1u64 << remaining) - 1;
        let chunk_a = _mm512_maskz_loadu_epi8(tail_mask, a.as_ptr().add(j) as *const _);
        let chunk_b = _mm512_maskz_loadu_epi8(tail_mask, b.as_ptr().add(j) as *const _);
        if _mm512_mask_cmpeq_epu8_mask(tail_mask, chunk_a, chunk_b) != tail_mask {
            return false;
        }
    }

    true
}

// NEON span equality.
//
// # Safety
// Requires NEON support. Use NEON-enabled target before calling.
#[cfg(target_arch = "aarch64")]
#[target_feature(enable = "neon")]
unsafe fn spans_equal_neon(a: &[u8], b: &[u8]) -> bool {
    const LANES: usize = LANES_NEON_BYTES;

    let len = a.len();
    let mut j = 0;

    while j + LANES <= len {
        let chunk_a = vld1q_u8(a.as_ptr().add(j));
        let chunk_b = vld1q_u8(b.as_ptr().add(j));
        let cmp_result = vceqq_u8(chunk_a, chunk_b);
        if vminvq_u8(cmp_result) != 0xFF {
            return false;
        }
        j += LANES;
    }

    // Handle final scalar bytes
    while j < len {
        if a[j] != b[j] {
            return false;
        }
        j += 1;
    }

    true
}

// =============================================================================
//  SCAN LOOP - ONE ROW PAIR AT A TIME
// =============================================================================

/// Scans both sources in lockstep, writing one boolean byte per row.
///
/// The haystack source drives the row count. A needle longer than its
/// haystack can never match (this covers an empty haystack with a non-empty
/// needle); an empty needle matches vacuously in both modes.
///
/// # Safety
/// `C`'s instruction-set requirement must hold on the host, and `out` must
/// hold exactly as many bytes as the haystack source yields rows.
unsafe fn scan<H, N, C>(mut haystack: H, mut needle: N, mode: MatchMode, out: &mut [u8])
where
    H: ByteSource,
    N: ByteSource,
    C: SpanEq,
{
    let mut row = 0;

    while !haystack.is_end() {
        let hay = haystack.current();
        let nee = needle.current();

        out[row] = if nee.len() > hay.len() {
            0
        } else {
            let probe = match mode {
                MatchMode::Prefix => &hay[..nee.len()],
                MatchMode::Suffix => &hay[hay.len() - nee.len()..],
            };
            C::spans_equal(probe, nee) as u8
        };

        haystack.advance();
        needle.advance();
        row += 1;
    }
}

// =============================================================================
//  SOURCE PAIRING - EXPLICIT 4x4 DISPATCH TABLE
// =============================================================================

/// Runtime storage kind of a column, as seen by the source resolver.
///
/// The discriminant doubles as the pair-table index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SourceKind {
    Var = 0,
    Fixed = 1,
    ConstVar = 2,
    ConstFixed = 3,
}

impl SourceKind {
    /// Resolves a column's storage kind, or `None` when no recognized source
    /// kind fits. Type checking happens earlier; this is the separate
    /// runtime-storage phase, so the miss is still checked.
    pub(crate) fn resolve(column: &Column) -> Option<SourceKind> {
        match column {
            Column::String(_) => Some(SourceKind::Var),
            Column::FixedString(_) => Some(SourceKind::Fixed),
            Column::Constant(constant) => match constant.inner() {
                Column::String(_) => Some(SourceKind::ConstVar),
                Column::FixedString(_) => Some(SourceKind::ConstFixed),
                _ => None,
            },
            Column::UInt8(_) => None,
        }
    }
}

fn string_source<'a>(column: &'a Column, mode: MatchMode) -> Result<StringSource<'a>> {
    match column {
        Column::String(c) => Ok(StringSource::new(c)),
        _ => Err(ColmatchError::IllegalColumnCombination(
            mode.function_name(),
        )),
    }
}

fn fixed_source<'a>(column: &'a Column, mode: MatchMode) -> Result<FixedStringSource<'a>> {
    match column {
        Column::FixedString(c) => Ok(FixedStringSource::new(c)),
        _ => Err(ColmatchError::IllegalColumnCombination(
            mode.function_name(),
        )),
    }
}

fn const_string_source<'a>(
    column: &'a Column,
    mode: MatchMode,
) -> Result<ConstSource<StringSource<'a>>> {
    match column {
        Column::Constant(constant) => match constant.inner() {
            Column::String(c) => Ok(ConstSource::new(StringSource::new(c), constant.len())),
            _ => Err(ColmatchError::IllegalColumnCombination(
                mode.function_name(),
            )),
        },
        _ => Err(ColmatchError::IllegalColumnCombination(
            mode.function_name(),
        )),
    }
}

fn const_fixed_source<'a>(
    column: &'a Column,
    mode: MatchMode,
) -> Result<ConstSource<FixedStringSource<'a>>> {
    match column {
        Column::Constant(constant) => match constant.inner() {
            Column::FixedString(c) => {
                Ok(ConstSource::new(FixedStringSource::new(c), constant.len()))
            }
            _ => Err(ColmatchError::IllegalColumnCombination(
                mode.function_name(),
            )),
        },
        _ => Err(ColmatchError::IllegalColumnCombination(
            mode.function_name(),
        )),
    }
}

/// Row-pair kernel entry for one (haystack kind, needle kind) combination.
///
/// # Safety
/// Same contract as [`scan`].
pub(crate) type PairKernelFn = unsafe fn(&Column, &Column, MatchMode, &mut [u8]) -> Result<()>;

unsafe fn var_var<C: SpanEq>(
    hay: &Column,
    nee: &Column,
    mode: MatchMode,
    out: &mut [u8],
) -> Result<()> {
    scan::<_, _, C>(string_source(hay, mode)?, string_source(nee, mode)?, mode, out);
    Ok(())
}

unsafe fn var_fixed<C: SpanEq>(
    hay: &Column,
    nee: &Column,
    mode: MatchMode,
    out: &mut [u8],
) -> Result<()> {
    scan::<_, _, C>(string_source(hay, mode)?, fixed_source(nee, mode)?, mode, out);
    Ok(())
}

unsafe fn var_const_var<C: SpanEq>(
    hay: &Column,
    nee: &Column,
    mode: MatchMode,
    out: &mut [u8],
) -> Result<()> {
    scan::<_, _, C>(
        string_source(hay, mode)?,
        const_string_source(nee, mode)?,
        mode,
        out,
    );
    Ok(())
}

unsafe fn var_const_fixed<C: SpanEq>(
    hay: &Column,
    nee: &Column,
    mode: MatchMode,
    out: &mut [u8],
) -> Result<()> {
    scan::<_, _, C>(
        string_source(hay, mode)?,
        const_fixed_source(nee, mode)?,
        mode,
        out,
    );
    Ok(())
}

unsafe fn fixed_var<C: SpanEq>(
    hay: &Column,
    nee: &Column,
    mode: MatchMode,
    out: &mut [u8],
) -> Result<()> {
    scan::<_, _, C>(fixed_source(hay, mode)?, string_source(nee, mode)?, mode, out);
    Ok(())
}

unsafe fn fixed_fixed<C: SpanEq>(
    hay: &Column,
    nee: &Column,
    mode: MatchMode,
    out: &mut [u8],
) -> Result<()> {
    scan::<_, _, C>(fixed_source(hay, mode)?, fixed_source(nee, mode)?, mode, out);
    Ok(())
}

unsafe fn fixed_const_var<C: SpanEq>(
    hay: &Column,
    nee: &Column,
    mode: MatchMode,
    out: &mut [u8],
) -> Result<()> {
    scan::<_, _, C>(
        fixed_source(hay, mode)?,
        const_string_source(nee, mode)?,
        mode,
        out,
    );
    Ok(())
}

unsafe fn fixed_const_fixed<C: SpanEq>(
    hay: &Column,
    nee: &Column,
    mode: MatchMode,
    out: &mut [u8],
) -> Result<()> {
    scan::<_, _, C>(
        fixed_source(hay, mode)?,
        const_fixed_source(nee, mode)?,
        mode,
        out,
    );
    Ok(())
}

unsafe fn const_var_var<C: SpanEq>(
    hay: &Column,
    nee: &Column,
    mode: MatchMode,
    out: &mut [u8],
) -> Result<()> {
    scan::<_, _, C>(
        const_string_source(hay, mode)?,
        string_source(nee, mode)?,
        mode,
        out,
    );
    Ok(())
}

unsafe fn const_var_fixed<C: SpanEq>(
    hay: &Column,
    nee: &Column,
    mode: MatchMode,
    out: &mut [u8],
) -> Result<()> {
    scan::<_, _, C>(
        const_string_source(hay, mode)?,
        fixed_source(nee, mode)?,
        mode,
        out,
    );
    Ok(())
}

unsafe fn const_var_const_var<C: SpanEq>(
    hay: &Column,
    nee: &Column,
    mode: MatchMode,
    out: &mut [u8],
) -> Result<()> {
    scan::<_, _, C>(
        const_string_source(hay, mode)?,
        const_string_source(nee, mode)?,
        mode,
        out,
    );
    Ok(())
}

unsafe fn const_var_const_fixed<C: SpanEq>(
    hay: &Column,
    nee: &Column,
    mode: MatchMode,
    out: &mut [u8],
) -> Result<()> {
    scan::<_, _, C>(
        const_string_source(hay, mode)?,
        const_fixed_source(nee, mode)?,
        mode,
        out,
    );
    Ok(())
}

unsafe fn const_fixed_var<C: SpanEq>(
    hay: &Column,
    nee: &Column,
    mode: MatchMode,
    out: &mut [u8],
) -> Result<()> {
    scan::<_, _, C>(
        const_fixed_source(hay, mode)?,
        string_source(nee, mode)?,
        mode,
        out,
    );
    Ok(())
}

unsafe fn const_fixed_fixed<C: SpanEq>(
    hay: &Column,
    nee: &Column,
    mode: MatchMode,
    out: &mut [u8],
) -> Result<()> {
    scan::<_, _, C>(
        const_fixed_source(hay, mode)?,
        fixed_source(nee, mode)?,
        mode,
        out,
    );
    Ok(())
}

unsafe fn const_fixed_const_var<C: SpanEq>(
    hay: &Column,
    nee: &Column,
    mode: MatchMode,
    out: &mut [u8],
) -> Result<()> {
    scan::<_, _, C>(
        const_fixed_source(hay, mode)?,
        const_string_source(nee, mode)?,
        mode,
        out,
    );
    Ok(())
}

unsafe fn const_fixed_const_fixed<C: SpanEq>(
    hay: &Column,
    nee: &Column,
    mode: MatchMode,
    out: &mut [u8],
) -> Result<()> {
    scan::<_, _, C>(
        const_fixed_source(hay, mode)?,
        const_fixed_source(nee, mode)?,
        mode,
        out,
    );
    Ok(())
}

/// The 16-way pair table, indexed `[haystack kind][needle kind]`.
///
/// Generic over the equality primitive so that tier selection stays a single
/// outer dispatch rather than multiplying into these entries.
fn pair_table<C: SpanEq>() -> [[PairKernelFn; 4]; 4] {
    [
        [
            var_var::<C>,
            var_fixed::<C>,
            var_const_var::<C>,
            var_const_fixed::<C>,
        ],
        [
            fixed_var::<C>,
            fixed_fixed::<C>,
            fixed_const_var::<C>,
            fixed_const_fixed::<C>,
        ],
        [
            const_var_var::<C>,
            const_var_fixed::<C>,
            const_var_const_var::<C>,
            const_var_const_fixed::<C>,
        ],
        [
            const_fixed_var::<C>,
            const_fixed_fixed::<C>,
            const_fixed_const_var::<C>,
            const_fixed_const_fixed::<C>,
        ],
    ]
}

/// Resolves both columns' storage kinds (haystack first, then needle) and
/// runs the matching kernel for that pair over all rows.
///
/// # Safety
/// `C`'s instruction-set requirement must hold on the host. `out` must hold
/// exactly one byte per haystack row.
pub(crate) unsafe fn scan_columns<C: SpanEq>(
    haystack: &Column,
    needle: &Column,
    mode: MatchMode,
    out: &mut [u8],
) -> Result<()> {
    let haystack_kind = SourceKind::resolve(haystack)
        .ok_or(ColmatchError::IllegalColumnCombination(mode.function_name()))?;
    let needle_kind = SourceKind::resolve(needle)
        .ok_or(ColmatchError::IllegalColumnCombination(mode.function_name()))?;

    let entry = pair_table::<C>()[haystack_kind as usize][needle_kind as usize];
    entry(haystack, needle, mode, out)
}

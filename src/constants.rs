// SPDX-License-Identifier: Apache-2.0

//! Common constants used across implementations
//!
//! This module centralizes the per-architecture SIMD lane counts used by the
//! byte-span comparison kernels.

// =============================================================================
// SIMD Lane Counts by Architecture
// =============================================================================

// AVX-512 Constants (Nightly feature only)
#[cfg(all(target_arch = "x86_64", feature = "colmatch-nightly"))]
pub use avx512_constants::*;
#[cfg(all(target_arch = "x86_64", feature = "colmatch-nightly"))]
mod avx512_constants {
    pub const LANES_AVX512_BYTES: usize = 64; // 512/8 = 64 byte elements
}

// x86_64 Constants
#[cfg(target_arch = "x86_64")]
pub use x86_constants::*;
#[cfg(target_arch = "x86_64")]
mod x86_constants {
    pub const LANES_AVX2_BYTES: usize = 32; // 256/8 = 32 byte elements

    // The AVX tier compares integers 128 bits at a time (AVX1 has no 256-bit
    // integer compare); it differs from SSE4.2 only in VEX encoding.
    pub const LANES_AVX_BYTES: usize = 16;
    pub const LANES_SSE_BYTES: usize = 16; // 128/8 = 16 byte elements
}

// NEON Constants (ARM64 only)
#[cfg(target_arch = "aarch64")]
pub use neon_constants::*;
#[cfg(target_arch = "aarch64")]
mod neon_constants {
    pub const LANES_NEON_BYTES: usize = 16; // 128/8 = 16 byte elements
}

//! CRC32C using the CPU's native instruction.
//!
//! Architecture support:
//! - x86_64: SSE4.2 `crc32` on 8, 4 and 1 byte operands
//! - x86: SSE4.2 `crc32` on 4 and 1 byte operands
//! - aarch64: `crc32c{d,w,b}` from the CRC extension
//!
//! Every multi-byte load goes through a byte-array copy, so the input may start
//! at any address. A single-byte prologue runs first to bring the cursor onto
//! an 8-byte boundary.

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

#[cfg(target_arch = "x86")]
use std::arch::x86::*;

#[cfg(target_arch = "aarch64")]
use std::arch::aarch64::*;

/// Continue a CRC32C computation over `data` using the CPU instruction.
///
/// # Safety
///
/// The caller must have checked [`crate::cpu::hardware_crc32c_available`].
#[cfg(any(target_arch = "x86_64", target_arch = "x86", target_arch = "aarch64"))]
#[inline]
pub(crate) unsafe fn update(state: u32, data: &[u8]) -> u32 {
    #[cfg(any(target_arch = "x86_64", target_arch = "x86"))]
    {
        update_sse42(state, data)
    }

    #[cfg(target_arch = "aarch64")]
    {
        update_arm(state, data)
    }
}

/// Split `data` into an unaligned head and the 8-byte-aligned remainder.
#[cfg(any(target_arch = "x86_64", target_arch = "x86", target_arch = "aarch64"))]
#[inline]
fn split_aligned(data: &[u8]) -> (&[u8], &[u8]) {
    let head = data.as_ptr().align_offset(8).min(data.len());
    data.split_at(head)
}

#[cfg(any(target_arch = "x86_64", target_arch = "aarch64"))]
#[inline]
fn le_u64(chunk: &[u8]) -> u64 {
    let mut word = [0u8; 8];
    word.copy_from_slice(chunk);
    u64::from_le_bytes(word)
}

#[cfg(any(target_arch = "x86_64", target_arch = "x86", target_arch = "aarch64"))]
#[inline]
fn le_u32(chunk: &[u8]) -> u32 {
    let mut word = [0u8; 4];
    word.copy_from_slice(chunk);
    u32::from_le_bytes(word)
}

// ============================================================================
// x86 / x86_64 SSE4.2 implementation
// ============================================================================

#[cfg(any(target_arch = "x86_64", target_arch = "x86"))]
#[target_feature(enable = "sse4.2")]
unsafe fn update_sse42(state: u32, data: &[u8]) -> u32 {
    let mut crc = !state;
    let (head, body) = split_aligned(data);

    for &byte in head {
        crc = _mm_crc32_u8(crc, byte);
    }

    #[cfg(target_arch = "x86_64")]
    let body = {
        let mut words = body.chunks_exact(8);
        let mut wide = crc as u64;
        for chunk in &mut words {
            wide = _mm_crc32_u64(wide, le_u64(chunk));
        }
        crc = wide as u32;
        words.remainder()
    };

    let mut words = body.chunks_exact(4);
    for chunk in &mut words {
        crc = _mm_crc32_u32(crc, le_u32(chunk));
    }

    for &byte in words.remainder() {
        crc = _mm_crc32_u8(crc, byte);
    }

    !crc
}

// ============================================================================
// aarch64 CRC extension implementation
// ============================================================================

#[cfg(target_arch = "aarch64")]
#[target_feature(enable = "crc")]
unsafe fn update_arm(state: u32, data: &[u8]) -> u32 {
    let mut crc = !state;
    let (head, body) = split_aligned(data);

    for &byte in head {
        crc = __crc32cb(crc, byte);
    }

    let mut words = body.chunks_exact(8);
    for chunk in &mut words {
        crc = __crc32cd(crc, le_u64(chunk));
    }

    let mut rest = words.remainder().chunks_exact(4);
    for chunk in &mut rest {
        crc = __crc32cw(crc, le_u32(chunk));
    }

    for &byte in rest.remainder() {
        crc = __crc32cb(crc, byte);
    }

    !crc
}

#[cfg(all(test, any(target_arch = "x86_64", target_arch = "aarch64")))]
mod tests {
    use super::*;

    #[test]
    fn test_split_aligned_covers_input() {
        let data = [7u8; 37];
        for start in 0..8 {
            let slice = &data[start..];
            let (head, body) = split_aligned(slice);
            assert_eq!(head.len() + body.len(), slice.len());
            assert!(head.len() < 8);
            if !body.is_empty() {
                assert_eq!(body.as_ptr() as usize % 8, 0);
            }
        }
    }

    #[test]
    fn test_little_endian_loads() {
        assert_eq!(le_u32(&[0x01, 0x02, 0x03, 0x04]), 0x0403_0201);
        assert_eq!(
            le_u64(&[0x08, 0x07, 0x06, 0x05, 0x04, 0x03, 0x02, 0x01]),
            0x0102_0304_0506_0708
        );
    }
}

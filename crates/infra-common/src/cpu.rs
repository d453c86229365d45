//! Runtime CPU feature probing.
//!
//! The only capability the serialization engine cares about is the CRC32C
//! instruction. The probe result is a pure function of the CPU, so it is
//! computed once and cached in a process-wide atomic.

use std::sync::atomic::{AtomicU8, Ordering};

const UNKNOWN: u8 = 0;
const UNAVAILABLE: u8 = 1;
const AVAILABLE: u8 = 2;

static CRC32C_SUPPORT: AtomicU8 = AtomicU8::new(UNKNOWN);

/// Check whether the CPU provides a CRC32C instruction.
///
/// On x86 this is SSE4.2 (CPUID leaf 1, ECX bit 20), on aarch64 the `crc`
/// extension. Concurrent first calls may each run the probe, but they all
/// store the same answer.
#[inline]
pub fn hardware_crc32c_available() -> bool {
    match CRC32C_SUPPORT.load(Ordering::Relaxed) {
        AVAILABLE => true,
        UNAVAILABLE => false,
        _ => {
            let supported = probe_crc32c();
            let state = if supported { AVAILABLE } else { UNAVAILABLE };
            CRC32C_SUPPORT.store(state, Ordering::Relaxed);
            log::debug!("[cpu] hardware CRC32C support: {}", supported);
            supported
        }
    }
}

// ============================================================================
// Architecture probes
// ============================================================================

#[cfg(target_arch = "x86_64")]
fn probe_crc32c() -> bool {
    use std::arch::x86_64::__cpuid;

    // SSE4.2: leaf 1, ECX bit 20
    const SSE42_BIT: u32 = 1 << 20;

    #[allow(unused_unsafe)]
    let max_leaf = unsafe { __cpuid(0) }.eax;
    if max_leaf < 1 {
        return false;
    }

    #[allow(unused_unsafe)]
    let ecx = unsafe { __cpuid(1) }.ecx;
    ecx & SSE42_BIT != 0
}

#[cfg(target_arch = "x86")]
fn probe_crc32c() -> bool {
    // CPUID itself is not guaranteed on 32-bit parts; std checks that first.
    std::arch::is_x86_feature_detected!("sse4.2")
}

#[cfg(target_arch = "aarch64")]
fn probe_crc32c() -> bool {
    std::arch::is_aarch64_feature_detected!("crc")
}

#[cfg(not(any(target_arch = "x86_64", target_arch = "x86", target_arch = "aarch64")))]
fn probe_crc32c() -> bool {
    false
}

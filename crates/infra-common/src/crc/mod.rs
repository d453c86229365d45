//! CRC32C checksum utilities.
//!
//! CRC32C (Castagnoli) protects every serialized frame. The checksum is
//! incremental: `update(update(INITIAL, a), b) == update(INITIAL, a ‖ b)`,
//! which lets a frame be checksummed over non-contiguous regions.
//!
//! Two implementations exist and produce bit-identical results:
//! - a hardware path (SSE4.2 on x86, the CRC extension on aarch64)
//! - a 256-entry table fallback
//!
//! The hardware path is chosen on first use when [`cpu::hardware_crc32c_available`]
//! reports support.

mod hardware;
mod scalar;

use std::hash::Hasher;
use std::sync::OnceLock;

use crate::cpu;

/// Checksum state before any byte has been consumed.
pub const INITIAL: u32 = 0;

/// Reflected Castagnoli polynomial.
pub const POLYNOMIAL: u32 = 0x82F6_3B78;

/// The CRC32C implementation selected for this process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Backend {
    /// Table lookup, one byte at a time.
    Scalar,
    /// x86 SSE4.2 `crc32` instruction.
    Sse42,
    /// aarch64 CRC extension.
    ArmCrc,
}

impl Backend {
    /// Whether this backend uses a CPU instruction.
    pub const fn is_hardware(self) -> bool {
        !matches!(self, Backend::Scalar)
    }
}

static BACKEND: OnceLock<Backend> = OnceLock::new();

/// Get the backend used by [`update`].
pub fn backend() -> Backend {
    *BACKEND.get_or_init(|| {
        let backend = select_backend();
        log::debug!("[crc32c] using {:?} backend", backend);
        backend
    })
}

fn select_backend() -> Backend {
    if !cpu::hardware_crc32c_available() {
        return Backend::Scalar;
    }

    if cfg!(any(target_arch = "x86_64", target_arch = "x86")) {
        Backend::Sse42
    } else if cfg!(target_arch = "aarch64") {
        Backend::ArmCrc
    } else {
        Backend::Scalar
    }
}

/// Continue a CRC32C computation over `data`.
///
/// Empty input returns `state` unchanged.
#[inline]
pub fn update(state: u32, data: &[u8]) -> u32 {
    if data.is_empty() {
        return state;
    }

    if backend().is_hardware() {
        #[cfg(any(target_arch = "x86_64", target_arch = "x86", target_arch = "aarch64"))]
        // SAFETY: a hardware backend is only selected after the CPU probe succeeded.
        return unsafe { hardware::update(state, data) };
    }

    scalar::update(state, data)
}

/// Compute the CRC32C of a byte slice from [`INITIAL`].
#[inline]
pub fn checksum(data: &[u8]) -> u32 {
    update(INITIAL, data)
}

/// Continue a CRC32C computation with the table implementation.
#[inline]
pub fn update_scalar(state: u32, data: &[u8]) -> u32 {
    scalar::update(state, data)
}

/// Continue a CRC32C computation with the CPU instruction.
///
/// Returns `None` when the CPU has no CRC32C instruction.
pub fn update_hardware(state: u32, data: &[u8]) -> Option<u32> {
    if !cpu::hardware_crc32c_available() {
        return None;
    }

    #[cfg(any(target_arch = "x86_64", target_arch = "x86", target_arch = "aarch64"))]
    {
        // SAFETY: support was just confirmed by the probe.
        Some(unsafe { hardware::update(state, data) })
    }

    #[cfg(not(any(target_arch = "x86_64", target_arch = "x86", target_arch = "aarch64")))]
    {
        let _ = (state, data);
        None
    }
}

/// Incremental CRC32C hasher.
///
/// # Example
///
/// ```
/// use infra_common::Crc32c;
///
/// let mut hasher = Crc32c::new();
/// hasher.update(b"1234");
/// hasher.update(b"56789");
/// assert_eq!(hasher.value(), 0xE306_9283);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Crc32c {
    state: u32,
}

impl Crc32c {
    /// Create a hasher starting from [`INITIAL`].
    #[inline]
    pub const fn new() -> Self {
        Self { state: INITIAL }
    }

    /// Create a hasher that continues from an earlier checksum.
    #[inline]
    pub const fn with_state(state: u32) -> Self {
        Self { state }
    }

    /// Feed more bytes.
    #[inline]
    pub fn update(&mut self, data: &[u8]) {
        self.state = update(self.state, data);
    }

    /// Get the checksum of everything fed so far.
    #[inline]
    pub const fn value(&self) -> u32 {
        self.state
    }
}

impl Hasher for Crc32c {
    #[inline]
    fn finish(&self) -> u64 {
        u64::from(self.state)
    }

    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        self.update(bytes);
    }
}

//! Table-driven CRC32C, one byte per step.

use super::POLYNOMIAL;

/// Lookup table for the reflected Castagnoli polynomial, built at compile time.
pub(crate) static TABLE: [u32; 256] = make_table();

const fn make_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut i = 0;
    while i < 256 {
        let mut c = i as u32;
        let mut bit = 0;
        while bit < 8 {
            c = if c & 1 != 0 { POLYNOMIAL ^ (c >> 1) } else { c >> 1 };
            bit += 1;
        }
        table[i] = c;
        i += 1;
    }
    table
}

/// Continue a CRC32C computation over `data` without hardware support.
#[inline]
pub fn update(state: u32, data: &[u8]) -> u32 {
    let mut crc = !state;
    for &byte in data {
        crc = (crc >> 8) ^ TABLE[((crc ^ byte as u32) & 0xFF) as usize];
    }
    !crc
}

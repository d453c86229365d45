//! Common utilities for infra.
//!
//! This crate provides the foundational pieces used by the serialization crates:
//!
//! - [`crc`] - CRC32C (Castagnoli) checksums with hardware acceleration
//! - [`cpu`] - Runtime CPU feature probing for the accelerated checksum path

pub mod cpu;
pub mod crc;

pub use crc::{Backend, Crc32c};

//! Infra - checksummed binary serialization.
//!
//! This crate provides a unified interface to the infra crates.
//!
//! # Crates
//!
//! - [`infra_common`] - CRC32C checksums and CPU feature probing
//! - [`infra_serialization`] - Writer, reader and the framed container format
//!
//! # Example
//!
//! ```
//! use infra::prelude::*;
//!
//! struct Reading {
//!     sensor: u16,
//!     samples: [i32; 3],
//!     valid: bool,
//! }
//!
//! impl Codec for Reading {
//!     fn to_bytes<C: ByteContainer + ?Sized>(&self, writer: &mut Writer<'_, C>) {
//!         writer.write(&self.sensor);
//!         writer.write(&self.samples);
//!         writer.write(&self.valid);
//!     }
//!
//!     fn from_bytes<C: ByteContainer + ?Sized>(&mut self, reader: &mut Reader<'_, C>) {
//!         reader.read(&mut self.sensor);
//!         reader.read(&mut self.samples);
//!         reader.read(&mut self.valid);
//!     }
//! }
//!
//! let mut buffer: Vec<u8> = Vec::new();
//! serialize(&mut buffer, &Reading { sensor: 3, samples: [1, -1, 2], valid: true })?;
//!
//! let mut reading = Reading { sensor: 0, samples: [0; 3], valid: false };
//! deserialize(&buffer, &mut reading)?;
//! assert_eq!(reading.samples, [1, -1, 2]);
//! # Ok::<(), infra::serialization::Error>(())
//! ```

// Re-export all sub-crates
pub use infra_common as common;
pub use infra_serialization as serialization;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use infra_common::crc;
    pub use infra_serialization::{
        deserialize, from_slice, serialize, to_vec, verify, ByteContainer, Codec, Error,
        FrameInfo, Kind, Reader, Writer,
    };
}

// Re-export commonly used functions at the crate root
pub use infra_serialization::{deserialize, serialize};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Checksummed binary serialization.
//!
//! This crate encodes values into byte containers and decodes them back in
//! place:
//!
//! - [`Codec`] - The serializable-type trait and its [`Kind`] classification
//! - [`ByteContainer`] - Fixed and growable byte storage the engine writes into
//! - [`Writer`] / [`Reader`] - Cursors with a latched first error
//! - [`serialize`] / [`deserialize`] - The framed format with a CRC32C header
//!
//! Codecs for `String`, `Vec`, `VecDeque`, `BTreeMap`, `HashMap`, `Option`,
//! `Box` and tuples are provided. Enable the `hashbrown` feature for
//! `hashbrown::HashMap` and the `serde` feature to derive `Serialize` and
//! `Deserialize` on the crate's plain data types.
//!
//! # Example
//!
//! ```
//! use infra_serialization::{deserialize, serialize, Error};
//!
//! let mut buffer = [0u8; 32];
//! serialize(&mut buffer, &(7u32, true, [1.5f32; 2]))?;
//!
//! let mut decoded = (0u32, false, [0.0f32; 2]);
//! deserialize(&buffer, &mut decoded)?;
//! assert_eq!(decoded, (7, true, [1.5, 1.5]));
//!
//! buffer[13] ^= 0x01;
//! assert_eq!(deserialize(&buffer, &mut decoded), Err(Error::ChecksumIncorrect));
//! # Ok::<(), Error>(())
//! ```

mod classify;
mod codecs;
mod container;
mod error;
mod frame;
mod reader;
mod writer;

pub use classify::{kind_of, Codec, Kind, Value, MAX_VALUE_SIZE};
pub use container::{ByteContainer, ByteType};
pub use error::{Error, Result};
pub use frame::{
    deserialize, from_slice, serialize, to_vec, verify, FrameInfo, CHECKSUM_OFFSET,
    DATA_LENGTH_OFFSET, HEADER_SIZE, MAGIC, MAGIC_OFFSET,
};
pub use reader::Reader;
pub use writer::Writer;

/// Re-export the checksum engine the frame format is built on.
pub use infra_common::crc;

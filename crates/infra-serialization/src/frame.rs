//! Framed container format.
//!
//! Every serialized object is wrapped in a 12-byte header:
//!
//! | offset | field         | size | meaning                                   |
//! |--------|---------------|------|-------------------------------------------|
//! | 0      | `magic`       | 4    | `b"InFr"`                                 |
//! | 4      | `data_length` | 4    | payload byte count, little-endian         |
//! | 8      | `checksum`    | 4    | CRC32C, little-endian                     |
//! | 12     | payload       | rest | the object encoded by its [`Codec`]       |
//!
//! The checksum covers magic, then payload, then the `data_length` bytes, in
//! that order.

use infra_common::crc;
use zerocopy::byteorder::little_endian::U32;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use crate::{ByteContainer, Codec, Error, Reader, Result, Writer};

/// Magic bytes at the start of every frame.
pub const MAGIC: [u8; 4] = *b"InFr";

/// Offset of the magic bytes.
pub const MAGIC_OFFSET: usize = 0;

/// Offset of the little-endian payload length.
pub const DATA_LENGTH_OFFSET: usize = 4;

/// Offset of the little-endian CRC32C.
pub const CHECKSUM_OFFSET: usize = 8;

/// Size of the header; the payload starts here.
pub const HEADER_SIZE: usize = 12;

/// On-the-wire header layout, for zero-copy inspection only.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
struct RawHeader {
    magic: [u8; 4],
    data_length: U32,
    checksum: U32,
}

const _: () = assert!(std::mem::size_of::<RawHeader>() == HEADER_SIZE);

/// Header fields of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameInfo {
    /// Payload length in bytes.
    pub data_length: u32,
    /// Stored CRC32C.
    pub checksum: u32,
}

impl FrameInfo {
    /// Read the header fields without verifying the checksum.
    ///
    /// Returns `None` if `bytes` is shorter than a header or the magic is wrong.
    pub fn peek(bytes: &[u8]) -> Option<Self> {
        let (header, _) = RawHeader::read_from_prefix(bytes).ok()?;
        if header.magic != MAGIC {
            return None;
        }

        Some(Self {
            data_length: header.data_length.get(),
            checksum: header.checksum.get(),
        })
    }

    /// Total frame length: header plus payload.
    ///
    /// Saturates at `usize::MAX` where the sum does not fit.
    #[inline]
    pub fn frame_len(&self) -> usize {
        HEADER_SIZE.saturating_add(self.data_length as usize)
    }

    /// Byte range of the payload within the container.
    #[inline]
    pub fn payload_range(&self) -> std::ops::Range<usize> {
        HEADER_SIZE..self.frame_len()
    }
}

/// Serialize `object` into `container` as a checksummed frame.
///
/// A growable container shorter than the header is extended first; a fixed one
/// fails with [`Error::ByteContainerTooSmall`]. If the payload does not fit a
/// fixed container the call fails with [`Error::IncompleteSerialization`] and
/// the header is left unpatched; discard the buffer on any error.
pub fn serialize<C, T>(container: &mut C, object: &T) -> Result<()>
where
    C: ByteContainer + ?Sized,
    T: Codec + ?Sized,
{
    if container.len() < HEADER_SIZE {
        if C::GROWABLE {
            container.resize(HEADER_SIZE);
        }
        if container.len() < HEADER_SIZE {
            log::debug!(
                "[frame] serialize: container of {} bytes cannot hold the header",
                container.len()
            );
            return Err(Error::ByteContainerTooSmall);
        }
    }

    let mut writer = Writer::new(container);

    writer.write_bytes(&MAGIC);

    writer.jump(HEADER_SIZE);
    writer.write(object);

    let payload_len = writer.position().saturating_sub(HEADER_SIZE);
    let data_length = match u32::try_from(payload_len) {
        Ok(length) => length,
        Err(_) => {
            // The length field cannot describe this payload.
            writer.fail(Error::IncompleteSerialization);
            0
        }
    };

    writer.jump(DATA_LENGTH_OFFSET);
    writer.write_value(data_length);

    let checksum = writer.checksum();
    writer.jump(CHECKSUM_OFFSET);
    writer.write_value_unhashed(checksum);

    match writer.status() {
        Ok(()) => {
            log::trace!(
                "[frame] serialized {} payload bytes, checksum {:#010x}",
                data_length,
                checksum
            );
            Ok(())
        }
        Err(error) => {
            log::debug!(
                "[frame] serialize failed at offset {}: {}",
                writer.position(),
                error
            );
            Err(error)
        }
    }
}

/// Deserialize a frame from `container` into `object` in place.
///
/// The header and checksum are verified before any field of `object` is
/// touched. If decoding the payload fails, fields decoded before the failure
/// keep their new values and the rest keep their previous ones.
pub fn deserialize<C, T>(container: &C, object: &mut T) -> Result<()>
where
    C: ByteContainer + ?Sized,
    T: Codec + ?Sized,
{
    let mut reader = Reader::new(container);
    let info = read_header(container, &mut reader).inspect_err(|error| {
        log::debug!(
            "[frame] rejected container of {} bytes: {}",
            container.len(),
            error
        );
    })?;

    reader.read(object);

    match reader.status() {
        Ok(()) => {
            log::trace!("[frame] deserialized {} payload bytes", info.data_length);
            Ok(())
        }
        Err(error) => {
            log::debug!(
                "[frame] payload decode failed at offset {}: {}",
                reader.position(),
                error
            );
            Err(error)
        }
    }
}

/// Verify the header and checksum of a frame without decoding it.
pub fn verify<C>(container: &C) -> Result<FrameInfo>
where
    C: ByteContainer + ?Sized,
{
    let mut reader = Reader::new(container);
    read_header(container, &mut reader)
}

/// Serialize `object` into a new `Vec<u8>`.
pub fn to_vec<T: Codec + ?Sized>(object: &T) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    serialize(&mut buffer, object)?;
    Ok(buffer)
}

/// Deserialize a frame into a fresh `T::default()`.
pub fn from_slice<T: Codec + Default>(bytes: &[u8]) -> Result<T> {
    let mut object = T::default();
    deserialize(bytes, &mut object)?;
    Ok(object)
}

/// Check the header and leave `reader` at the payload start.
fn read_header<C>(container: &C, reader: &mut Reader<'_, C>) -> Result<FrameInfo>
where
    C: ByteContainer + ?Sized,
{
    let bytes = container.as_raw_bytes();
    if bytes.len() <= HEADER_SIZE {
        return Err(Error::ByteContainerTooSmall);
    }

    let mut magic = [0u8; 4];
    reader.jump(MAGIC_OFFSET);
    reader.read_array(&mut magic);
    reader.status()?;
    if magic != MAGIC {
        return Err(Error::MagicNumberIncorrect);
    }

    let mut data_length = 0u32;
    reader.read_value(&mut data_length);
    reader.status()?;

    let payload_end = match HEADER_SIZE.checked_add(data_length as usize) {
        Some(end) if end <= bytes.len() => end,
        _ => return Err(Error::ByteContainerTooSmall),
    };

    let mut stored = 0u32;
    reader.read_value(&mut stored);
    reader.status()?;

    let length_field = &bytes[DATA_LENGTH_OFFSET..CHECKSUM_OFFSET];
    let mut expected = crc::update(crc::INITIAL, &bytes[MAGIC_OFFSET..DATA_LENGTH_OFFSET]);
    expected = crc::update(expected, &bytes[HEADER_SIZE..payload_end]);
    expected = crc::update(expected, length_field);

    if expected != stored {
        return Err(Error::ChecksumIncorrect);
    }

    Ok(FrameInfo {
        data_length,
        checksum: stored,
    })
}

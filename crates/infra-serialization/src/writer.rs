//! Forward-only binary writer.
//!
//! This module provides [`Writer`], a cursor that encodes values into a
//! [`ByteContainer`] and keeps a running CRC32C over every byte it writes.

use std::fmt;

use infra_common::crc;
use zerocopy::FromZeros;

use crate::{ByteContainer, ByteType, Codec, Error, Result, Value, MAX_VALUE_SIZE};

/// A binary writer over a byte container.
///
/// Values are written little-endian. The first failure is latched: after that
/// every write, jump and abort is a no-op, and [`Writer::status`] reports the
/// failure.
///
/// # Example
///
/// ```
/// use infra_serialization::Writer;
///
/// let mut buffer = [0u8; 6];
/// let mut writer = Writer::new(&mut buffer);
///
/// writer.write_value(0x0403_0201u32);
/// writer.write_bool(true);
/// assert!(writer.status().is_ok());
///
/// writer.write_value(0xFFFFu16);
/// assert!(writer.status().is_err());
/// assert_eq!(buffer, [0x01, 0x02, 0x03, 0x04, 0x01, 0x00]);
/// ```
pub struct Writer<'a, C: ByteContainer + ?Sized> {
    container: &'a mut C,
    position: usize,
    checksum: u32,
    error: Option<Error>,
}

impl<'a, C: ByteContainer + ?Sized> Writer<'a, C> {
    /// Create a new writer at the start of the container.
    #[inline]
    pub fn new(container: &'a mut C) -> Self {
        Self::new_at(container, 0)
    }

    /// Create a new writer starting at a specific position.
    #[inline]
    pub fn new_at(container: &'a mut C, position: usize) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = <C::Byte as ByteType>::ASSERT_SINGLE_BYTE;

        Self {
            container,
            position,
            checksum: crc::INITIAL,
            error: None,
        }
    }

    /// Get the current position in the container.
    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Get the CRC32C of every byte written so far.
    #[inline]
    pub fn checksum(&self) -> u32 {
        self.checksum
    }

    /// Get the latched error, if any.
    #[inline]
    pub fn error(&self) -> Option<Error> {
        self.error
    }

    /// Check whether no error has been latched.
    #[inline]
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Get the outcome so far as a `Result`.
    #[inline]
    pub fn status(&self) -> Result<()> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    /// Move the cursor to an absolute position. The checksum is unaffected.
    #[inline]
    pub fn jump(&mut self, position: usize) {
        if self.error.is_none() {
            self.position = position;
        }
    }

    /// Stop the traversal with [`Error::UserAbort`].
    #[inline]
    pub fn abort(&mut self) {
        self.fail(Error::UserAbort);
    }

    /// Write any serializable value, dispatching on its [`crate::Kind`].
    #[inline]
    pub fn write<T: Codec + ?Sized>(&mut self, value: &T) {
        if self.error.is_none() {
            value.to_bytes(self);
        }
    }

    /// Write a fixed-width value.
    #[inline]
    pub fn write_value<T: Value>(&mut self, value: T) {
        self.put_value(value, true);
    }

    /// Write a boolean as a single byte, 1 or 0.
    #[inline]
    pub fn write_bool(&mut self, value: bool) {
        self.put(&[u8::from(value)], true);
    }

    /// Write every element of an array, outermost dimension first.
    pub fn write_array<T: Codec, const N: usize>(&mut self, array: &[T; N]) {
        for element in array {
            if self.error.is_some() {
                return;
            }
            self.write(element);
        }
    }

    /// Write a structure through its [`Codec`] implementation.
    #[inline]
    pub fn write_structure<T: Codec + ?Sized>(&mut self, structure: &T) {
        if self.error.is_none() {
            structure.to_bytes(self);
        }
    }

    /// Write a run of raw bytes. Either all of them are written or none.
    #[inline]
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.put(bytes, true);
    }

    /// Write a collection length as a `u64` prefix.
    #[inline]
    pub fn write_length(&mut self, length: usize) {
        self.write_value(length as u64);
    }

    /// Write a value without folding it into the checksum.
    pub(crate) fn write_value_unhashed<T: Value>(&mut self, value: T) {
        self.put_value(value, false);
    }

    pub(crate) fn fail(&mut self, error: Error) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    fn put_value<T: Value>(&mut self, value: T, hash: bool) {
        const { assert!(T::SIZE <= MAX_VALUE_SIZE) };

        if self.error.is_some() {
            return;
        }

        let mut scratch = [0u8; MAX_VALUE_SIZE];
        let bytes = &mut scratch[..T::SIZE];
        value.encode_le(bytes);
        self.put(bytes, hash);
    }

    fn put(&mut self, bytes: &[u8], hash: bool) {
        if self.error.is_some() {
            return;
        }

        let Some(end) = self.position.checked_add(bytes.len()) else {
            self.fail(Error::IncompleteSerialization);
            return;
        };

        if end > self.container.len() {
            if !C::GROWABLE || !self.grow_to(end) {
                self.fail(Error::IncompleteSerialization);
                return;
            }
        }

        self.container.as_raw_bytes_mut()[self.position..end].copy_from_slice(bytes);
        if hash {
            self.checksum = crc::update(self.checksum, bytes);
        }
        self.position = end;
    }

    /// Append zero bytes until the container is `end` bytes long.
    fn grow_to(&mut self, end: usize) -> bool {
        while self.container.len() < end {
            let before = self.container.len();
            self.container.append_byte(<C::Byte as FromZeros>::new_zeroed());
            if self.container.len() <= before {
                return false;
            }
        }
        true
    }
}

impl<C: ByteContainer + ?Sized> fmt::Debug for Writer<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Writer")
            .field("len", &self.container.len())
            .field("position", &self.position)
            .field("checksum", &format_args!("{:#010x}", self.checksum))
            .field("error", &self.error)
            .finish()
    }
}

//! Forward-only binary reader.
//!
//! This module provides [`Reader`], the decoding counterpart of
//! [`crate::Writer`]. It decodes values in place into existing storage.

use std::fmt;

use crate::{ByteContainer, ByteType, Codec, Error, Result, Value};

/// A binary reader over a byte container.
///
/// Every read is bounds-checked against the container length. The first
/// failure is latched: after that every read is a no-op and targets keep their
/// previous values.
///
/// # Example
///
/// ```
/// use infra_serialization::{Error, Reader};
///
/// let data = [0x01u8, 0x02, 0x03, 0x04, 0x02];
/// let mut reader = Reader::new(&data[..]);
///
/// let mut value = 0u32;
/// reader.read_value(&mut value);
/// assert_eq!(value, 0x0403_0201);
///
/// let mut flag = false;
/// reader.read_bool(&mut flag);
/// assert_eq!(reader.error(), Some(Error::InvalidBoolValue));
/// assert!(!flag);
/// ```
pub struct Reader<'a, C: ByteContainer + ?Sized> {
    container: &'a C,
    position: usize,
    error: Option<Error>,
}

impl<'a, C: ByteContainer + ?Sized> Reader<'a, C> {
    /// Create a new reader at the start of the container.
    #[inline]
    pub fn new(container: &'a C) -> Self {
        Self::new_at(container, 0)
    }

    /// Create a new reader starting at a specific position.
    #[inline]
    pub fn new_at(container: &'a C, position: usize) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = <C::Byte as ByteType>::ASSERT_SINGLE_BYTE;

        Self {
            container,
            position,
            error: None,
        }
    }

    /// Get the current position in the container.
    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Get the number of bytes left after the cursor.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.container.len().saturating_sub(self.position)
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

    /// Move the cursor to an absolute position.
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

    /// Read any serializable value in place, dispatching on its [`crate::Kind`].
    #[inline]
    pub fn read<T: Codec + ?Sized>(&mut self, value: &mut T) {
        if self.error.is_none() {
            value.from_bytes(self);
        }
    }

    /// Read a fixed-width value.
    ///
    /// On failure `out` is left unmodified.
    pub fn read_value<T: Value>(&mut self, out: &mut T) {
        let Some(bytes) = self.peek_bytes(T::SIZE) else {
            return;
        };

        match T::decode_le(bytes) {
            Ok(value) => {
                *out = value;
                self.position += T::SIZE;
            }
            Err(error) => self.fail(error),
        }
    }

    /// Read a boolean. Only the bytes 0 and 1 are accepted.
    pub fn read_bool(&mut self, out: &mut bool) {
        let Some(bytes) = self.peek_bytes(1) else {
            return;
        };

        match bytes[0] {
            0 => *out = false,
            1 => *out = true,
            _ => {
                self.fail(Error::InvalidBoolValue);
                return;
            }
        }
        self.position += 1;
    }

    /// Read every element of an array, outermost dimension first.
    pub fn read_array<T: Codec, const N: usize>(&mut self, array: &mut [T; N]) {
        for element in array.iter_mut() {
            if self.error.is_some() {
                return;
            }
            self.read(element);
        }
    }

    /// Read a structure through its [`Codec`] implementation.
    #[inline]
    pub fn read_structure<T: Codec + ?Sized>(&mut self, structure: &mut T) {
        if self.error.is_none() {
            structure.from_bytes(self);
        }
    }

    /// Fill `out` with raw bytes. Either all of it is filled or none.
    pub fn read_bytes(&mut self, out: &mut [u8]) {
        if let Some(bytes) = self.peek_bytes(out.len()) {
            out.copy_from_slice(bytes);
            self.position += out.len();
        }
    }

    /// Read a `u64` collection length.
    ///
    /// Returns `None` if the read failed, or latches
    /// [`Error::ByteContainerTooSmall`] when the length exceeds the remaining
    /// bytes (each element occupies at least one byte).
    pub fn read_length(&mut self) -> Option<usize> {
        let mut length = 0u64;
        self.read_value(&mut length);
        if self.error.is_some() {
            return None;
        }

        match usize::try_from(length) {
            Ok(length) if length <= self.remaining() => Some(length),
            _ => {
                self.fail(Error::ByteContainerTooSmall);
                None
            }
        }
    }

    pub(crate) fn fail(&mut self, error: Error) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    /// Get the next `count` bytes without advancing, latching on failure.
    fn peek_bytes(&mut self, count: usize) -> Option<&'a [u8]> {
        if self.error.is_some() {
            return None;
        }

        let container: &'a C = self.container;
        let data = container.as_raw_bytes();
        match self.position.checked_add(count) {
            Some(end) if end <= data.len() => Some(&data[self.position..end]),
            _ => {
                self.fail(Error::ByteContainerTooSmall);
                None
            }
        }
    }
}

impl<C: ByteContainer + ?Sized> fmt::Debug for Reader<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reader")
            .field("len", &self.container.len())
            .field("position", &self.position)
            .field("error", &self.error)
            .finish()
    }
}

//! Byte containers the writer and reader can operate on.
//!
//! A container is either fixed-capacity (arrays and slices: writes past the end
//! are refused) or growable (`Vec`: writes past the end extend it one zero byte
//! at a time).

use zerocopy::{FromBytes, FromZeros, Immutable, IntoBytes, Unaligned};

/// Element type of a byte container.
///
/// Must be one byte wide with an unsigned representation, so that the storage
/// can be viewed as raw `u8` bytes. The zerocopy bounds make that view safe;
/// the width is checked when a [`crate::Writer`] or [`crate::Reader`] is built.
///
/// Implementors must be unsigned: `u8` itself, or a `#[repr(transparent)]`
/// wrapper or `#[repr(u8)]` type over it. Signed types such as `i8` must not
/// implement this trait, since the container contents are read back as `u8`.
///
/// # Example
///
/// ```
/// use infra_serialization::{serialize, ByteType};
/// use zerocopy::{FromBytes, Immutable, IntoBytes, Unaligned};
///
/// #[derive(Clone, Copy, FromBytes, IntoBytes, Immutable, Unaligned)]
/// #[repr(transparent)]
/// struct Octet(u8);
///
/// impl ByteType for Octet {}
///
/// let mut storage: Vec<Octet> = Vec::new();
/// serialize(&mut storage, &0x2Au8)?;
/// assert_eq!(storage[12].0, 0x2A);
/// # Ok::<(), infra_serialization::Error>(())
/// ```
pub trait ByteType: FromBytes + IntoBytes + Immutable + Unaligned + Copy {
    #[doc(hidden)]
    const ASSERT_SINGLE_BYTE: () = assert!(
        std::mem::size_of::<Self>() == 1,
        "byte container element must be exactly one byte wide"
    );
}

impl ByteType for u8 {}

/// Storage adaptor used by [`crate::Writer`] and [`crate::Reader`].
pub trait ByteContainer {
    /// Element type of the storage.
    type Byte: ByteType;

    /// Whether writes past the end extend the container.
    const GROWABLE: bool;

    /// Current length in bytes.
    fn len(&self) -> usize;

    /// Check if the container holds no bytes.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the storage.
    fn data(&self) -> &[Self::Byte];

    /// Get the storage mutably.
    fn data_mut(&mut self) -> &mut [Self::Byte];

    /// Resize to `new_len`, filling with zero. A no-op for fixed containers.
    fn resize(&mut self, new_len: usize);

    /// Append a single byte. A no-op for fixed containers.
    fn append_byte(&mut self, byte: Self::Byte);

    /// View the storage as raw bytes.
    #[inline]
    fn as_raw_bytes(&self) -> &[u8] {
        IntoBytes::as_bytes(self.data())
    }

    /// View the storage as mutable raw bytes.
    #[inline]
    fn as_raw_bytes_mut(&mut self) -> &mut [u8] {
        IntoBytes::as_mut_bytes(self.data_mut())
    }
}

impl<B: ByteType> ByteContainer for Vec<B> {
    type Byte = B;
    const GROWABLE: bool = true;

    #[inline]
    fn len(&self) -> usize {
        Vec::len(self)
    }

    #[inline]
    fn data(&self) -> &[B] {
        self.as_slice()
    }

    #[inline]
    fn data_mut(&mut self) -> &mut [B] {
        self.as_mut_slice()
    }

    #[inline]
    fn resize(&mut self, new_len: usize) {
        Vec::resize(self, new_len, B::new_zeroed());
    }

    #[inline]
    fn append_byte(&mut self, byte: B) {
        self.push(byte);
    }
}

impl<B: ByteType, const N: usize> ByteContainer for [B; N] {
    type Byte = B;
    const GROWABLE: bool = false;

    #[inline]
    fn len(&self) -> usize {
        N
    }

    #[inline]
    fn data(&self) -> &[B] {
        self.as_slice()
    }

    #[inline]
    fn data_mut(&mut self) -> &mut [B] {
        self.as_mut_slice()
    }

    #[inline]
    fn resize(&mut self, _new_len: usize) {}

    #[inline]
    fn append_byte(&mut self, _byte: B) {}
}

impl<B: ByteType> ByteContainer for [B] {
    type Byte = B;
    const GROWABLE: bool = false;

    #[inline]
    fn len(&self) -> usize {
        <[B]>::len(self)
    }

    #[inline]
    fn data(&self) -> &[B] {
        self
    }

    #[inline]
    fn data_mut(&mut self) -> &mut [B] {
        self
    }

    #[inline]
    fn resize(&mut self, _new_len: usize) {}

    #[inline]
    fn append_byte(&mut self, _byte: B) {}
}

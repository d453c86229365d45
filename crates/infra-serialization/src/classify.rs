//! Classification of serializable types.
//!
//! Every type the engine handles implements [`Codec`] and falls into exactly
//! one [`Kind`]:
//!
//! - [`Kind::Bool`] - `bool`, one byte holding 0 or 1
//! - [`Kind::Value`] - fixed-width integers, IEEE floats, `char` and
//!   [`value_enum!`] enums, copied little-endian
//! - [`Kind::Array`] - `[T; N]` of any of the above, nested to any depth,
//!   traversed in row-major order
//! - [`Kind::Structure`] - everything else, traversed by a hand-written
//!   [`Codec`] implementation
//!
//! Types without a `Codec` implementation (pointers, references, `usize`,
//! `u128`, ...) are rejected at compile time.

use byteorder::{ByteOrder, LittleEndian};

use crate::{ByteContainer, Error, Reader, Result, Writer};

/// Widest [`Value`] the engine encodes.
pub const MAX_VALUE_SIZE: usize = 8;

/// Encoding category of a serializable type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Kind {
    /// `bool`.
    Bool,
    /// Fixed-width value copied byte for byte.
    Value,
    /// Fixed-size, possibly multi-dimensional array.
    Array,
    /// User-defined traversal.
    Structure,
}

/// A serializable type.
///
/// This is the only plug-in surface of the engine: implement it for every
/// structure you want to encode, calling the writer and reader for each field
/// in the same order.
///
/// # Example
///
/// ```
/// use infra_serialization::{ByteContainer, Codec, Reader, Writer};
///
/// #[derive(Default)]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// impl Codec for Point {
///     fn to_bytes<C: ByteContainer + ?Sized>(&self, writer: &mut Writer<'_, C>) {
///         writer.write(&self.x);
///         writer.write(&self.y);
///     }
///
///     fn from_bytes<C: ByteContainer + ?Sized>(&mut self, reader: &mut Reader<'_, C>) {
///         reader.read(&mut self.x);
///         reader.read(&mut self.y);
///     }
/// }
///
/// let bytes = infra_serialization::to_vec(&Point { x: 1, y: -1 })?;
/// let point: Point = infra_serialization::from_slice(&bytes)?;
/// assert_eq!((point.x, point.y), (1, -1));
/// # Ok::<(), infra_serialization::Error>(())
/// ```
pub trait Codec {
    /// Category of this type.
    const KIND: Kind = Kind::Structure;

    /// Encode `self` through the writer.
    fn to_bytes<C: ByteContainer + ?Sized>(&self, writer: &mut Writer<'_, C>);

    /// Decode into `self` in place through the reader.
    ///
    /// Fields the reader could not decode keep their previous values.
    fn from_bytes<C: ByteContainer + ?Sized>(&mut self, reader: &mut Reader<'_, C>);
}

/// Get the classification of a type.
#[inline]
pub const fn kind_of<T: Codec + ?Sized>() -> Kind {
    T::KIND
}

/// A fixed-width type encoded by copying its little-endian bytes.
pub trait Value: Copy {
    /// Encoded width in bytes, at most [`MAX_VALUE_SIZE`].
    const SIZE: usize;

    /// Write the little-endian encoding into `out`, which is exactly `SIZE` bytes.
    fn encode_le(self, out: &mut [u8]);

    /// Decode from exactly `SIZE` little-endian bytes.
    fn decode_le(bytes: &[u8]) -> Result<Self>;
}

macro_rules! impl_value {
    ($($ty:ty => $write:ident, $read:ident;)*) => {
        $(
            impl Value for $ty {
                const SIZE: usize = std::mem::size_of::<$ty>();

                #[inline]
                fn encode_le(self, out: &mut [u8]) {
                    LittleEndian::$write(out, self);
                }

                #[inline]
                fn decode_le(bytes: &[u8]) -> Result<Self> {
                    Ok(LittleEndian::$read(bytes))
                }
            }
        )*
    };
}

impl_value! {
    u16 => write_u16, read_u16;
    i16 => write_i16, read_i16;
    u32 => write_u32, read_u32;
    i32 => write_i32, read_i32;
    u64 => write_u64, read_u64;
    i64 => write_i64, read_i64;
    f32 => write_f32, read_f32;
    f64 => write_f64, read_f64;
}

impl Value for u8 {
    const SIZE: usize = 1;

    #[inline]
    fn encode_le(self, out: &mut [u8]) {
        out[0] = self;
    }

    #[inline]
    fn decode_le(bytes: &[u8]) -> Result<Self> {
        Ok(bytes[0])
    }
}

impl Value for i8 {
    const SIZE: usize = 1;

    #[inline]
    fn encode_le(self, out: &mut [u8]) {
        out[0] = self as u8;
    }

    #[inline]
    fn decode_le(bytes: &[u8]) -> Result<Self> {
        Ok(bytes[0] as i8)
    }
}

/// Encoded as the 32-bit code point.
impl Value for char {
    const SIZE: usize = 4;

    #[inline]
    fn encode_le(self, out: &mut [u8]) {
        LittleEndian::write_u32(out, self as u32);
    }

    #[inline]
    fn decode_le(bytes: &[u8]) -> Result<Self> {
        char::from_u32(LittleEndian::read_u32(bytes)).ok_or(Error::InvalidCharValue)
    }
}

macro_rules! impl_value_codec {
    ($($ty:ty),*) => {
        $(
            impl Codec for $ty {
                const KIND: Kind = Kind::Value;

                #[inline]
                fn to_bytes<C: ByteContainer + ?Sized>(&self, writer: &mut Writer<'_, C>) {
                    writer.write_value(*self);
                }

                #[inline]
                fn from_bytes<C: ByteContainer + ?Sized>(&mut self, reader: &mut Reader<'_, C>) {
                    reader.read_value(self);
                }
            }
        )*
    };
}

impl_value_codec!(u8, i8, u16, i16, u32, i32, u64, i64, f32, f64, char);

impl Codec for bool {
    const KIND: Kind = Kind::Bool;

    #[inline]
    fn to_bytes<C: ByteContainer + ?Sized>(&self, writer: &mut Writer<'_, C>) {
        writer.write_bool(*self);
    }

    #[inline]
    fn from_bytes<C: ByteContainer + ?Sized>(&mut self, reader: &mut Reader<'_, C>) {
        reader.read_bool(self);
    }
}

impl<T: Codec, const N: usize> Codec for [T; N] {
    const KIND: Kind = Kind::Array;

    #[inline]
    fn to_bytes<C: ByteContainer + ?Sized>(&self, writer: &mut Writer<'_, C>) {
        writer.write_array(self);
    }

    #[inline]
    fn from_bytes<C: ByteContainer + ?Sized>(&mut self, reader: &mut Reader<'_, C>) {
        reader.read_array(self);
    }
}

/// Implement [`Value`] and [`Codec`] for a fieldless enum.
///
/// The enum must be `Copy` and castable to the named integer representation.
/// Decoding a discriminant that names no variant latches
/// [`Error::InvalidEnumValue`](crate::Error::InvalidEnumValue).
///
/// # Example
///
/// ```
/// use infra_serialization::value_enum;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// #[repr(u16)]
/// enum Channel {
///     #[default]
///     Red = 1,
///     Green = 2,
///     Blue = 0x300,
/// }
///
/// value_enum!(Channel as u16 { Red, Green, Blue });
///
/// let bytes = infra_serialization::to_vec(&Channel::Blue)?;
/// assert_eq!(&bytes[12..], &[0x00, 0x03]);
/// # Ok::<(), infra_serialization::Error>(())
/// ```
#[macro_export]
macro_rules! value_enum {
    ($ty:ty as $repr:ty { $($variant:ident),+ $(,)? }) => {
        impl $crate::Value for $ty {
            const SIZE: usize = <$repr as $crate::Value>::SIZE;

            #[inline]
            fn encode_le(self, out: &mut [u8]) {
                <$repr as $crate::Value>::encode_le(self as $repr, out);
            }

            fn decode_le(bytes: &[u8]) -> $crate::Result<Self> {
                let raw = <$repr as $crate::Value>::decode_le(bytes)?;
                $(
                    if raw == <$ty>::$variant as $repr {
                        return Ok(<$ty>::$variant);
                    }
                )+
                Err($crate::Error::InvalidEnumValue)
            }
        }

        impl $crate::Codec for $ty {
            const KIND: $crate::Kind = $crate::Kind::Value;

            #[inline]
            fn to_bytes<C: $crate::ByteContainer + ?Sized>(&self, writer: &mut $crate::Writer<'_, C>) {
                writer.write_value(*self);
            }

            #[inline]
            fn from_bytes<C: $crate::ByteContainer + ?Sized>(&mut self, reader: &mut $crate::Reader<'_, C>) {
                reader.read_value(self);
            }
        }
    };
}

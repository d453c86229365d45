//! [`Codec`] implementations for standard library types.
//!
//! These are all structures from the engine's point of view. Collections are
//! written as a `u64` length followed by their elements; decoding replaces the
//! previous contents once the length has been read.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::hash::{BuildHasher, Hash};

use crate::{ByteContainer, Codec, Error, Kind, Reader, Writer};

/// UTF-8 bytes, length in bytes.
impl Codec for String {
    fn to_bytes<C: ByteContainer + ?Sized>(&self, writer: &mut Writer<'_, C>) {
        writer.write_length(self.len());
        writer.write_bytes(self.as_bytes());
    }

    fn from_bytes<C: ByteContainer + ?Sized>(&mut self, reader: &mut Reader<'_, C>) {
        let Some(length) = reader.read_length() else {
            return;
        };

        let mut bytes = vec![0u8; length];
        reader.read_bytes(&mut bytes);
        if !reader.is_ok() {
            return;
        }

        match String::from_utf8(bytes) {
            Ok(string) => *self = string,
            Err(_) => reader.fail(Error::InvalidCharValue),
        }
    }
}

/// Elements worth pre-allocating for a decoded collection.
///
/// At most `length`, and at most as many `T` as `remaining` bytes of memory
/// would hold.
fn capacity_hint<T>(length: usize, remaining: usize) -> usize {
    length.min(remaining / std::mem::size_of::<T>().max(1))
}

macro_rules! impl_sequence {
    ($($seq:ident => $push:ident),+ $(,)?) => {
        $(
            impl<T: Codec + Default> Codec for $seq<T> {
                fn to_bytes<C: ByteContainer + ?Sized>(&self, writer: &mut Writer<'_, C>) {
                    writer.write_length(self.len());
                    for element in self {
                        writer.write(element);
                    }
                }

                fn from_bytes<C: ByteContainer + ?Sized>(&mut self, reader: &mut Reader<'_, C>) {
                    let Some(length) = reader.read_length() else {
                        return;
                    };

                    self.clear();
                    self.reserve(capacity_hint::<T>(length, reader.remaining()));
                    for _ in 0..length {
                        let mut element = T::default();
                        reader.read(&mut element);
                        if !reader.is_ok() {
                            return;
                        }
                        self.$push(element);
                    }
                }
            }
        )+
    };
}

impl_sequence!(Vec => push, VecDeque => push_back);

impl<K, V> Codec for BTreeMap<K, V>
where
    K: Codec + Default + Ord,
    V: Codec + Default,
{
    fn to_bytes<C: ByteContainer + ?Sized>(&self, writer: &mut Writer<'_, C>) {
        writer.write_length(self.len());
        for (key, value) in self {
            writer.write(key);
            writer.write(value);
        }
    }

    fn from_bytes<C: ByteContainer + ?Sized>(&mut self, reader: &mut Reader<'_, C>) {
        let Some(length) = reader.read_length() else {
            return;
        };

        self.clear();
        for _ in 0..length {
            let Some((key, value)) = read_entry(reader) else {
                return;
            };
            self.insert(key, value);
        }
    }
}

macro_rules! impl_hash_map {
    ($($map:ident)::+) => {
        impl<K, V, S> Codec for $($map)::+<K, V, S>
        where
            K: Codec + Default + Eq + Hash,
            V: Codec + Default,
            S: BuildHasher,
        {
            fn to_bytes<C: ByteContainer + ?Sized>(&self, writer: &mut Writer<'_, C>) {
                writer.write_length(self.len());
                for (key, value) in self {
                    writer.write(key);
                    writer.write(value);
                }
            }

            fn from_bytes<C: ByteContainer + ?Sized>(&mut self, reader: &mut Reader<'_, C>) {
                let Some(length) = reader.read_length() else {
                    return;
                };

                self.clear();
                self.reserve(capacity_hint::<(K, V)>(length, reader.remaining()));
                for _ in 0..length {
                    let Some((key, value)) = read_entry(reader) else {
                        return;
                    };
                    self.insert(key, value);
                }
            }
        }
    };
}

impl_hash_map!(HashMap);

#[cfg(feature = "hashbrown")]
impl_hash_map!(hashbrown::HashMap);

fn read_entry<K, V, C>(reader: &mut Reader<'_, C>) -> Option<(K, V)>
where
    K: Codec + Default,
    V: Codec + Default,
    C: ByteContainer + ?Sized,
{
    let mut key = K::default();
    let mut value = V::default();
    reader.read(&mut key);
    reader.read(&mut value);
    reader.is_ok().then_some((key, value))
}

/// A bool tag followed by the value when present.
impl<T: Codec + Default> Codec for Option<T> {
    fn to_bytes<C: ByteContainer + ?Sized>(&self, writer: &mut Writer<'_, C>) {
        writer.write_bool(self.is_some());
        if let Some(value) = self {
            writer.write(value);
        }
    }

    fn from_bytes<C: ByteContainer + ?Sized>(&mut self, reader: &mut Reader<'_, C>) {
        let mut present = false;
        reader.read_bool(&mut present);
        if !reader.is_ok() {
            return;
        }

        if !present {
            *self = None;
            return;
        }

        match self {
            Some(value) => reader.read(value),
            None => {
                let mut value = T::default();
                reader.read(&mut value);
                if reader.is_ok() {
                    *self = Some(value);
                }
            }
        }
    }
}

impl<T: Codec + ?Sized> Codec for Box<T> {
    const KIND: Kind = T::KIND;

    #[inline]
    fn to_bytes<C: ByteContainer + ?Sized>(&self, writer: &mut Writer<'_, C>) {
        (**self).to_bytes(writer);
    }

    #[inline]
    fn from_bytes<C: ByteContainer + ?Sized>(&mut self, reader: &mut Reader<'_, C>) {
        (**self).from_bytes(reader);
    }
}

macro_rules! impl_tuple {
    ($($name:ident . $index:tt),+) => {
        impl<$($name: Codec),+> Codec for ($($name,)+) {
            #[inline]
            fn to_bytes<C: ByteContainer + ?Sized>(&self, writer: &mut Writer<'_, C>) {
                $(writer.write(&self.$index);)+
            }

            #[inline]
            fn from_bytes<C: ByteContainer + ?Sized>(&mut self, reader: &mut Reader<'_, C>) {
                $(reader.read(&mut self.$index);)+
            }
        }
    };
}

impl_tuple!(A.0);
impl_tuple!(A.0, B.1);
impl_tuple!(A.0, B.1, D.2);
impl_tuple!(A.0, B.1, D.2, E.3);
impl_tuple!(A.0, B.1, D.2, E.3, F.4);
impl_tuple!(A.0, B.1, D.2, E.3, F.4, G.5);

//! Frame-level behaviour: header layout, checksum, truncation and corruption.

use infra_serialization::{
    crc, deserialize, serialize, to_vec, verify, ByteContainer, Codec, Error, FrameInfo, Reader,
    Writer, CHECKSUM_OFFSET, DATA_LENGTH_OFFSET, HEADER_SIZE, MAGIC,
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Storage {
    a: u64,
    b: u32,
    c: u32,
}

impl Codec for Storage {
    fn to_bytes<C: ByteContainer + ?Sized>(&self, writer: &mut Writer<'_, C>) {
        writer.write(&self.a);
        writer.write(&self.b);
        writer.write(&self.c);
    }

    fn from_bytes<C: ByteContainer + ?Sized>(&mut self, reader: &mut Reader<'_, C>) {
        reader.read(&mut self.a);
        reader.read(&mut self.b);
        reader.read(&mut self.c);
    }
}

const STORAGE: Storage = Storage {
    a: 0x0102_0304_0506_0708,
    b: 0x1122_3344,
    c: 0x5566_7788,
};

const STORAGE_PAYLOAD: [u8; 16] = [
    0x08, 0x07, 0x06, 0x05, 0x04, 0x03, 0x02, 0x01, // a
    0x44, 0x33, 0x22, 0x11, // b
    0x88, 0x77, 0x66, 0x55, // c
];

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Flags {
    first: u8,
    flag: bool,
    last: u16,
}

impl Codec for Flags {
    fn to_bytes<C: ByteContainer + ?Sized>(&self, writer: &mut Writer<'_, C>) {
        writer.write(&self.first);
        writer.write(&self.flag);
        writer.write(&self.last);
    }

    fn from_bytes<C: ByteContainer + ?Sized>(&mut self, reader: &mut Reader<'_, C>) {
        reader.read(&mut self.first);
        reader.read(&mut self.flag);
        reader.read(&mut self.last);
    }
}

/// CRC32C of magic, payload and length field, computed with the reference crate.
fn reference_checksum(frame: &[u8]) -> u32 {
    let length = u32::from_le_bytes([frame[4], frame[5], frame[6], frame[7]]) as usize;
    let mut ordered = frame[..DATA_LENGTH_OFFSET].to_vec();
    ordered.extend_from_slice(&frame[HEADER_SIZE..HEADER_SIZE + length]);
    ordered.extend_from_slice(&frame[DATA_LENGTH_OFFSET..CHECKSUM_OFFSET]);
    crc32c::crc32c(&ordered)
}

/// Rewrite the stored checksum after tampering with the payload.
fn reseal(frame: &mut [u8]) {
    let checksum = reference_checksum(frame);
    frame[CHECKSUM_OFFSET..HEADER_SIZE].copy_from_slice(&checksum.to_le_bytes());
}

fn stored_checksum(frame: &[u8]) -> u32 {
    u32::from_le_bytes([frame[8], frame[9], frame[10], frame[11]])
}

// ============================================================================
// Layout
// ============================================================================

#[test]
fn test_storage_into_large_growable() {
    let mut buffer = vec![0u8; 1024];
    serialize(&mut buffer, &STORAGE).unwrap();

    assert_eq!(buffer.len(), 1024);
    assert_eq!(&buffer[..4], &MAGIC);
    assert_eq!(&buffer[4..8], &16u32.to_le_bytes());
    assert_eq!(&buffer[12..28], &STORAGE_PAYLOAD);
    assert!(buffer[28..].iter().all(|&byte| byte == 0));
    assert_eq!(stored_checksum(&buffer), reference_checksum(&buffer));

    let mut decoded = Storage::default();
    deserialize(&buffer, &mut decoded).unwrap();
    assert_eq!(decoded, STORAGE);
}

#[test]
fn test_storage_into_fixed_array() {
    let mut buffer = [0u8; 1024];
    serialize(&mut buffer, &STORAGE).unwrap();

    assert_eq!(&buffer[12..28], &STORAGE_PAYLOAD);
    assert_eq!(
        verify(&buffer),
        Ok(FrameInfo {
            data_length: 16,
            checksum: reference_checksum(&buffer),
        })
    );

    let mut decoded = Storage::default();
    deserialize(&buffer, &mut decoded).unwrap();
    assert_eq!(decoded, STORAGE);
}

#[test]
fn test_storage_into_empty_growable() {
    let mut buffer: Vec<u8> = Vec::new();
    serialize(&mut buffer, &STORAGE).unwrap();
    assert_eq!(buffer.len(), HEADER_SIZE + 16);

    let mut short = vec![0xEEu8; 3];
    serialize(&mut short, &STORAGE).unwrap();
    assert_eq!(short, buffer);
}

#[test]
fn test_growable_is_not_truncated() {
    let mut buffer = vec![0xEEu8; 64];
    serialize(&mut buffer, &0xABCDu16).unwrap();

    assert_eq!(buffer.len(), 64);
    assert_eq!(&buffer[12..14], &[0xCD, 0xAB]);
    assert!(buffer[14..].iter().all(|&byte| byte == 0xEE));

    let mut value = 0u16;
    deserialize(&buffer, &mut value).unwrap();
    assert_eq!(value, 0xABCD);
}

#[test]
fn test_serialize_into_slice() {
    let mut storage = [0u8; 40];
    let slice: &mut [u8] = &mut storage[4..36];
    serialize(slice, &STORAGE).unwrap();

    let mut decoded = Storage::default();
    deserialize(&storage[4..36], &mut decoded).unwrap();
    assert_eq!(decoded, STORAGE);
    assert_eq!(&storage[..4], &[0; 4]);
}

#[test]
fn test_endianness() {
    let bytes = to_vec(&0x0102_0304_0506_0708u64).unwrap();
    assert_eq!(&bytes[HEADER_SIZE..], &[0x08, 0x07, 0x06, 0x05, 0x04, 0x03, 0x02, 0x01]);

    let bytes = to_vec(&(-2i32, 0.5f64)).unwrap();
    assert_eq!(&bytes[HEADER_SIZE..HEADER_SIZE + 4], &[0xFE, 0xFF, 0xFF, 0xFF]);
    assert_eq!(&bytes[HEADER_SIZE + 4..], &0.5f64.to_le_bytes());
}

#[test]
fn test_checksum_is_incremental_over_regions() {
    let bytes = to_vec(&STORAGE).unwrap();

    let mut state = crc::update(crc::INITIAL, &bytes[..4]);
    state = crc::update(state, &bytes[12..]);
    state = crc::update(state, &bytes[4..8]);
    assert_eq!(state, stored_checksum(&bytes));
}

// ============================================================================
// Truncation
// ============================================================================

#[test]
fn test_fixed_buffer_holds_first_field_only() {
    let mut buffer = [0u8; 22];
    assert_eq!(serialize(&mut buffer, &STORAGE), Err(Error::IncompleteSerialization));

    assert_eq!(&buffer[..4], &MAGIC);
    assert_eq!(&buffer[4..12], &[0; 8]);
    assert_eq!(&buffer[12..20], &STORAGE_PAYLOAD[..8]);
    assert_eq!(&buffer[20..], &[0, 0]);
}

#[test]
fn test_truncated_payload_decodes_leading_fields() {
    // A consistent frame whose payload only holds `a`.
    let bytes = to_vec(&STORAGE.a).unwrap();
    assert_eq!(bytes.len(), 20);

    let mut decoded = Storage { a: 0, b: 1, c: 2 };
    assert_eq!(deserialize(&bytes, &mut decoded), Err(Error::ByteContainerTooSmall));
    assert_eq!(decoded, Storage { a: STORAGE.a, b: 1, c: 2 });
}

#[test]
fn test_container_shorter_than_header() {
    let mut decoded = STORAGE;
    let bytes = to_vec(&STORAGE).unwrap();

    for len in [0, 4, 11, 12] {
        assert_eq!(
            deserialize(&bytes[..len], &mut decoded),
            Err(Error::ByteContainerTooSmall)
        );
    }
    assert_eq!(decoded, STORAGE);
}

#[test]
fn test_cut_frame_is_rejected() {
    let bytes = to_vec(&STORAGE).unwrap();
    let mut decoded = Storage::default();
    assert_eq!(
        deserialize(&bytes[..bytes.len() - 1], &mut decoded),
        Err(Error::ByteContainerTooSmall)
    );
    assert_eq!(decoded, Storage::default());
}

// ============================================================================
// Corruption
// ============================================================================

#[test]
fn test_bad_magic() {
    let mut bytes = to_vec(&STORAGE).unwrap();
    bytes[0] = b'X';

    let mut decoded = Storage::default();
    assert_eq!(deserialize(&bytes, &mut decoded), Err(Error::MagicNumberIncorrect));
    assert_eq!(decoded, Storage::default());
}

#[test]
fn test_shortened_data_length() {
    let mut bytes = to_vec(&STORAGE).unwrap();
    bytes[DATA_LENGTH_OFFSET] -= 1;

    let mut decoded = Storage::default();
    assert_eq!(deserialize(&bytes, &mut decoded), Err(Error::ChecksumIncorrect));
    assert_eq!(decoded, Storage::default());
}

#[test]
fn test_lengthened_data_length() {
    let mut bytes = to_vec(&STORAGE).unwrap();
    bytes[DATA_LENGTH_OFFSET] += 1;
    assert_eq!(verify(&bytes), Err(Error::ByteContainerTooSmall));

    let mut padded = [0u8; 64];
    serialize(&mut padded, &STORAGE).unwrap();
    padded[DATA_LENGTH_OFFSET] += 1;
    assert_eq!(verify(&padded), Err(Error::ChecksumIncorrect));
}

#[test]
fn test_flipped_checksum_byte() {
    let mut bytes = to_vec(&STORAGE).unwrap();
    bytes[CHECKSUM_OFFSET + 2] ^= 0x40;

    let mut decoded = Storage::default();
    assert_eq!(deserialize(&bytes, &mut decoded), Err(Error::ChecksumIncorrect));
    assert_eq!(decoded, Storage::default());
}

#[test]
fn test_flipped_payload_byte() {
    let mut bytes = to_vec(&STORAGE).unwrap();
    bytes[HEADER_SIZE + 9] ^= 0x01;

    let mut decoded = Storage::default();
    assert_eq!(deserialize(&bytes, &mut decoded), Err(Error::ChecksumIncorrect));
    assert_eq!(decoded, Storage::default());
}

#[test]
fn test_invalid_bool_byte() {
    let original = Flags {
        first: 0x5A,
        flag: false,
        last: 0x1234,
    };
    let mut bytes = to_vec(&original).unwrap();
    bytes[HEADER_SIZE + 1] = 2;
    reseal(&mut bytes);

    let mut decoded = Flags {
        first: 0,
        flag: true,
        last: 7,
    };
    assert_eq!(deserialize(&bytes, &mut decoded), Err(Error::InvalidBoolValue));
    assert_eq!(
        decoded,
        Flags {
            first: 0x5A,
            flag: true,
            last: 7,
        }
    );
}

// ============================================================================
// Abort
// ============================================================================

struct Countdown {
    values: [u32; 4],
    stop_after: usize,
}

impl Codec for Countdown {
    fn to_bytes<C: ByteContainer + ?Sized>(&self, writer: &mut Writer<'_, C>) {
        for (index, value) in self.values.iter().enumerate() {
            if index == self.stop_after {
                writer.abort();
            }
            writer.write(value);
        }
    }

    fn from_bytes<C: ByteContainer + ?Sized>(&mut self, reader: &mut Reader<'_, C>) {
        for (index, value) in self.values.iter_mut().enumerate() {
            if index == self.stop_after {
                reader.abort();
            }
            reader.read(value);
        }
    }
}

#[test]
fn test_user_abort() {
    let mut buffer: Vec<u8> = Vec::new();
    let source = Countdown {
        values: [1, 2, 3, 4],
        stop_after: 2,
    };
    assert_eq!(serialize(&mut buffer, &source), Err(Error::UserAbort));
    assert_eq!(buffer.len(), HEADER_SIZE + 8);

    let complete = Countdown {
        values: [1, 2, 3, 4],
        stop_after: usize::MAX,
    };
    let bytes = to_vec(&complete).unwrap();

    let mut target = Countdown {
        values: [0; 4],
        stop_after: 1,
    };
    assert_eq!(deserialize(&bytes, &mut target), Err(Error::UserAbort));
    assert_eq!(target.values, [1, 0, 0, 0]);
}

#[test]
fn test_manual_cursors_share_format() {
    let mut buffer = [0u8; 16];
    let mut writer = Writer::new_at(&mut buffer, 2);
    writer.write(&STORAGE.b);
    writer.write(&[true, false]);
    assert!(writer.is_ok());
    assert_eq!(writer.position(), 8);

    let mut reader = Reader::new_at(&buffer, 2);
    let mut b = 0u32;
    let mut flags = [false; 2];
    reader.read(&mut b);
    reader.read(&mut flags);
    assert!(reader.is_ok());
    assert_eq!((b, flags), (STORAGE.b, [true, false]));
    assert_eq!(reader.remaining(), 8);
}

//! Error types for infra-serialization.

use thiserror::Error;

/// Reason a serialization or deserialization stopped.
///
/// Writers and readers latch the first error they hit; every later operation
/// on the same cursor is a no-op, so the error reported is always the first one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Error {
    /// A decoded boolean byte was neither 0 nor 1.
    #[error("invalid bool value: byte was neither 0 nor 1")]
    InvalidBoolValue,

    /// A fixed-capacity container ran out of room while encoding.
    #[error("incomplete serialization: byte container ran out of room")]
    IncompleteSerialization,

    /// The container, or the payload length its header declares, is too small.
    #[error("byte container too small")]
    ByteContainerTooSmall,

    /// Header magic mismatch; not a frame of this format.
    #[error("magic number incorrect")]
    MagicNumberIncorrect,

    /// Header or payload bytes do not match the stored checksum.
    #[error("checksum incorrect: frame is corrupt or truncated")]
    ChecksumIncorrect,

    /// The caller aborted the traversal.
    #[error("aborted by user")]
    UserAbort,

    /// A decoded `char` is not a Unicode scalar value, or a string is not UTF-8.
    #[error("invalid character value")]
    InvalidCharValue,

    /// A decoded discriminant does not name any variant of the enum.
    #[error("invalid enum value")]
    InvalidEnumValue,
}

/// Result type for serialization operations.
pub type Result<T> = std::result::Result<T, Error>;

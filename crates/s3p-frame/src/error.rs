/// Errors from encoding a payload into a frame.
///
/// Encode failures are caller misuse, not wire-level protocol failures; they
/// are a separate type from [`DecodeError`] so the two cannot be confused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    /// The payload exceeds the maximum packet size.
    #[error("invalid input: payload too large ({size} bytes, max {max})")]
    InvalidInput { size: usize, max: usize },
}

/// Errors from decoding and validating a candidate frame.
///
/// Every malformed input maps to a distinct kind so the transport layer can
/// choose between resynchronizing (bad framing), requesting retransmission
/// (bad checksum), and rejecting outright (oversized data). All kinds are
/// terminal: no partial payload survives a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// The buffer does not begin with the start byte.
    #[error("frame does not begin with the start byte")]
    MissingStartByte,

    /// An unescaped start byte appeared inside the frame body.
    #[error("unescaped start byte inside frame body")]
    IllegalStartByte,

    /// The byte following an escape byte is not a legally stuffed value.
    #[error("illegal byte {byte:#04x} after escape byte")]
    IllegalEscapedByte { byte: u8 },

    /// The buffer ran out before the frame body and terminator completed.
    #[error("frame ended before the body was terminated")]
    UnterminatedPacket,

    /// The decoded payload exceeds the maximum packet size.
    #[error("decoded payload too large (max {max} bytes)")]
    PacketTooLarge { max: usize },

    /// The received checksum does not match the sum of the decoded payload.
    #[error("checksum mismatch (computed {computed:#04x}, received {received:#04x})")]
    ChecksumMismatch { computed: u8, received: u8 },
}

pub type Result<T, E = DecodeError> = std::result::Result<T, E>;

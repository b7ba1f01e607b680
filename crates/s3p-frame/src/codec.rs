use bytes::{BufMut, Bytes, BytesMut};
use tracing::{debug, trace};

use crate::error::{DecodeError, EncodeError, Result};
use crate::variant::FrameConstants;

/// Maximum number of payload bytes a single frame may carry.
pub const MAX_PACKET_SIZE: usize = 256;

/// Fixed framing overhead when nothing needs stuffing: start + checksum + term.
pub const FRAME_OVERHEAD: usize = 3;

/// Worst-case encoded frame length: every payload byte stuffed to two bytes,
/// plus the start byte, a two-byte stuffed checksum, and the terminator.
pub const MAX_FRAME_SIZE: usize = 2 * MAX_PACKET_SIZE + FRAME_OVERHEAD + 1;

/// Byte-stuffing codec bound to one set of frame constants.
///
/// Holds nothing but the immutable constants, so a codec is `Copy` and a
/// single value can be shared freely across threads; every call works on
/// buffers local to that call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Codec {
    constants: FrameConstants,
}

impl Codec {
    /// Create a codec for one protocol variant. The variant is fixed for the
    /// codec's lifetime; encode and decode always speak the same dialect.
    pub const fn new(constants: FrameConstants) -> Self {
        Self { constants }
    }

    /// The constants this codec speaks.
    pub const fn constants(&self) -> FrameConstants {
        self.constants
    }

    /// Encode a payload into a freshly allocated frame.
    pub fn encode(&self, payload: &[u8]) -> Result<Bytes, EncodeError> {
        let mut buf = BytesMut::with_capacity(payload.len() + FRAME_OVERHEAD);
        encode_frame(payload, self.constants, &mut buf)?;
        Ok(buf.freeze())
    }

    /// Decode and validate a candidate frame, returning the original payload.
    pub fn decode(&self, frame: &[u8]) -> Result<Bytes> {
        decode_frame(frame, self.constants)
    }
}

/// Encode `payload` into `dst` as a single delimited frame.
///
/// Wire format (one byte per cell unless stuffed):
/// ```text
/// ┌───────┬──────────────────┬──────────┬──────┐
/// │ START │ stuffed payload  │ checksum │ TERM │
/// └───────┴──────────────────┴──────────┴──────┘
/// ```
/// Reserved bytes (START, TERM, ESCAPE) in the payload are stuffed to the
/// two-byte sequence `ESCAPE, byte ^ MASK`. The checksum is the low 8 bits of
/// the sum of the *unstuffed* payload bytes, and travels through the same
/// stuffing rule so a colliding sum cannot forge a delimiter.
pub fn encode_frame(
    payload: &[u8],
    constants: FrameConstants,
    dst: &mut BytesMut,
) -> Result<(), EncodeError> {
    if payload.len() > MAX_PACKET_SIZE {
        return Err(EncodeError::InvalidInput {
            size: payload.len(),
            max: MAX_PACKET_SIZE,
        });
    }

    dst.reserve(payload.len() + FRAME_OVERHEAD);
    dst.put_u8(constants.start);

    let mut checksum = 0u8;
    for &byte in payload {
        checksum = checksum.wrapping_add(byte);
        put_stuffed(byte, constants, dst);
    }

    put_stuffed(checksum, constants, dst);
    dst.put_u8(constants.term);
    Ok(())
}

fn put_stuffed(byte: u8, constants: FrameConstants, dst: &mut BytesMut) {
    if constants.is_reserved(byte) {
        dst.put_u8(constants.escape);
        dst.put_u8(constants.mask(byte));
    } else {
        dst.put_u8(byte);
    }
}

/// Decode one frame from `frame`, validating as it scans.
///
/// A single forward pass: the first malformed byte aborts the decode with the
/// kind that names it. Bytes after the terminator are ignored, so a buffer
/// holding more than one frame yields its first.
pub fn decode_frame(frame: &[u8], constants: FrameConstants) -> Result<Bytes> {
    let mut bytes = frame.iter().copied();
    match bytes.next() {
        Some(byte) if byte == constants.start => {}
        _ => return Err(DecodeError::MissingStartByte),
    }

    let mut payload = BytesMut::with_capacity(frame.len().saturating_sub(FRAME_OVERHEAD));
    let mut checksum = 0u8;
    // Decoded bytes are committed one step behind the scan, so that when the
    // terminator appears the byte held back is the received checksum and the
    // committed bytes are exactly the payload.
    let mut pending: Option<u8> = None;

    loop {
        let byte = bytes.next().ok_or(DecodeError::UnterminatedPacket)?;

        let decoded = if byte == constants.term {
            let received = pending.ok_or(DecodeError::UnterminatedPacket)?;
            if checksum != received {
                debug!(
                    computed = checksum,
                    received, "discarding frame with bad checksum"
                );
                return Err(DecodeError::ChecksumMismatch {
                    computed: checksum,
                    received,
                });
            }
            trace!(
                frame_len = frame.len(),
                payload_len = payload.len(),
                "frame decoded"
            );
            return Ok(payload.freeze());
        } else if byte == constants.start {
            return Err(DecodeError::IllegalStartByte);
        } else if byte == constants.escape {
            let stuffed = bytes.next().ok_or(DecodeError::UnterminatedPacket)?;
            if stuffed == constants.start || stuffed == constants.escape {
                return Err(DecodeError::IllegalEscapedByte { byte: stuffed });
            }
            constants.mask(stuffed)
        } else {
            byte
        };

        if let Some(prev) = pending.replace(decoded) {
            if payload.len() == MAX_PACKET_SIZE {
                return Err(DecodeError::PacketTooLarge {
                    max: MAX_PACKET_SIZE,
                });
            }
            payload.put_u8(prev);
            checksum = checksum.wrapping_add(prev);
        }
    }
}

//! Byte-stuffed framing for the S3P serial link protocol.
//!
//! S3P frames carry up to 256 bytes of payload over byte streams with no
//! inherent message boundaries (a UART, a pipe). Every frame is:
//! - Delimited by a start byte and a terminator byte
//! - Byte-stuffed so the delimiters never appear literally in the body
//! - Protected by a one-byte additive checksum over the unstuffed payload
//!
//! Two protocol variants exist with incompatible reserved-byte assignments;
//! a [`Codec`] is bound to one of them at construction. Encode and decode are
//! pure functions over caller-owned buffers: feeding bytes to and from the
//! link, and deciding what to do on a validation failure, belong to the
//! transport layer above.
//!
//! ```
//! use s3p_frame::{Codec, FrameConstants};
//!
//! let codec = Codec::new(FrameConstants::VARIANT_B);
//! let frame = codec.encode(&[0xAA]).unwrap();
//! assert_eq!(frame.as_ref(), &[0x5B, 0xAA, 0xAA, 0x5D]);
//! assert_eq!(codec.decode(&frame).unwrap().as_ref(), &[0xAA]);
//! ```

pub mod codec;
pub mod error;
pub mod variant;

pub use codec::{
    decode_frame, encode_frame, Codec, FRAME_OVERHEAD, MAX_FRAME_SIZE, MAX_PACKET_SIZE,
};
pub use error::{DecodeError, EncodeError, Result};
pub use variant::FrameConstants;

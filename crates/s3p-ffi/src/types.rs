/// Result codes returned by every fallible export.
///
/// Stable values: decode failures keep their codes across releases so callers
/// can switch on them.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum S3pResult {
    Ok = 0,
    InvalidArgument = 1,
    InvalidInput = 2,
    MissingStartByte = 3,
    IllegalStartByte = 4,
    IllegalEscapedByte = 5,
    UnterminatedPacket = 6,
    PacketTooLarge = 7,
    ChecksumMismatch = 8,
    Internal = 99,
}

#[allow(dead_code)]
pub const S3P_OK: S3pResult = S3pResult::Ok;
#[allow(dead_code)]
pub const S3P_ERR_INVALID_ARGUMENT: S3pResult = S3pResult::InvalidArgument;
#[allow(dead_code)]
pub const S3P_ERR_INVALID_INPUT: S3pResult = S3pResult::InvalidInput;
#[allow(dead_code)]
pub const S3P_ERR_MISSING_START_BYTE: S3pResult = S3pResult::MissingStartByte;
#[allow(dead_code)]
pub const S3P_ERR_ILLEGAL_START_BYTE: S3pResult = S3pResult::IllegalStartByte;
#[allow(dead_code)]
pub const S3P_ERR_ILLEGAL_ESCAPED_BYTE: S3pResult = S3pResult::IllegalEscapedByte;
#[allow(dead_code)]
pub const S3P_ERR_UNTERMINATED_PACKET: S3pResult = S3pResult::UnterminatedPacket;
#[allow(dead_code)]
pub const S3P_ERR_PACKET_TOO_LARGE: S3pResult = S3pResult::PacketTooLarge;
#[allow(dead_code)]
pub const S3P_ERR_CHECKSUM_MISMATCH: S3pResult = S3pResult::ChecksumMismatch;
#[allow(dead_code)]
pub const S3P_ERR_INTERNAL: S3pResult = S3pResult::Internal;

/// Protocol variant selector for the `variant` argument.
pub const S3P_VARIANT_A: i32 = 0;
/// Protocol variant selector for the `variant` argument.
pub const S3P_VARIANT_B: i32 = 1;

/// An owned byte buffer handed across the boundary.
///
/// Populated by encode/decode exports; release with `s3p_buffer_free`.
#[repr(C)]
#[derive(Debug)]
pub struct S3pBuffer {
    pub data: *mut u8,
    pub len: usize,
}

impl Default for S3pBuffer {
    fn default() -> Self {
        Self {
            data: std::ptr::null_mut(),
            len: 0,
        }
    }
}

use std::ptr;
use std::slice;

use s3p_frame::{Codec, FrameConstants};

use crate::error::{clear_error_state, map_decode_error, map_encode_error, set_invalid_argument};
use crate::types::{S3pBuffer, S3pResult, S3P_VARIANT_A, S3P_VARIANT_B};

fn codec_for(variant: i32) -> Option<Codec> {
    match variant {
        S3P_VARIANT_A => Some(Codec::new(FrameConstants::VARIANT_A)),
        S3P_VARIANT_B => Some(Codec::new(FrameConstants::VARIANT_B)),
        _ => None,
    }
}

fn hand_off(bytes: &[u8], out: &mut S3pBuffer) {
    let boxed: Box<[u8]> = bytes.into();
    out.len = boxed.len();
    out.data = Box::into_raw(boxed) as *mut u8;
}

/// Encode a payload into a frame, writing an owned buffer into `out`.
///
/// `variant` selects the protocol constants (`S3P_VARIANT_A` or
/// `S3P_VARIANT_B`). Release the buffer with [`s3p_buffer_free`].
///
/// # Safety
/// `data` must point to `len` readable bytes (or be null with `len == 0`).
/// `out` must be a valid pointer to an `S3pBuffer`.
#[no_mangle]
pub unsafe extern "C" fn s3p_encode(
    variant: i32,
    data: *const u8,
    len: usize,
    out: *mut S3pBuffer,
) -> S3pResult {
    crate::ffi_boundary(S3pResult::Internal, || {
        clear_error_state();
        if out.is_null() {
            return set_invalid_argument("out buffer pointer is null");
        }
        if data.is_null() && len != 0 {
            return set_invalid_argument("data pointer is null");
        }
        let Some(codec) = codec_for(variant) else {
            return set_invalid_argument(format!("unknown protocol variant {variant}"));
        };

        let payload = if len == 0 {
            &[][..]
        } else {
            // SAFETY: Non-null and length are guaranteed by the caller.
            unsafe { slice::from_raw_parts(data, len) }
        };

        match codec.encode(payload) {
            Ok(frame) => {
                // SAFETY: Pointer validity is guaranteed by the caller.
                hand_off(&frame, unsafe { &mut *out });
                S3pResult::Ok
            }
            Err(err) => map_encode_error(&err),
        }
    })
}

/// Decode a candidate frame, writing the recovered payload into `out`.
///
/// Release the buffer with [`s3p_buffer_free`]. On failure `out` is left
/// untouched and `s3p_last_error` describes the offending byte.
///
/// # Safety
/// `data` must point to `len` readable bytes (or be null with `len == 0`).
/// `out` must be a valid pointer to an `S3pBuffer`.
#[no_mangle]
pub unsafe extern "C" fn s3p_decode(
    variant: i32,
    data: *const u8,
    len: usize,
    out: *mut S3pBuffer,
) -> S3pResult {
    crate::ffi_boundary(S3pResult::Internal, || {
        clear_error_state();
        if out.is_null() {
            return set_invalid_argument("out buffer pointer is null");
        }
        if data.is_null() && len != 0 {
            return set_invalid_argument("data pointer is null");
        }
        let Some(codec) = codec_for(variant) else {
            return set_invalid_argument(format!("unknown protocol variant {variant}"));
        };

        let frame = if len == 0 {
            &[][..]
        } else {
            // SAFETY: Non-null and length are guaranteed by the caller.
            unsafe { slice::from_raw_parts(data, len) }
        };

        match codec.decode(frame) {
            Ok(payload) => {
                // SAFETY: Pointer validity is guaranteed by the caller.
                hand_off(&payload, unsafe { &mut *out });
                S3pResult::Ok
            }
            Err(err) => map_decode_error(&err),
        }
    })
}

/// Free a buffer populated by [`s3p_encode`] or [`s3p_decode`].
///
/// Resets the buffer to empty afterwards, so freeing twice is a no-op.
///
/// # Safety
/// `buf` must be either null or a valid pointer to an `S3pBuffer`. If
/// `buf->data` is non-null, it must have originated from this library.
#[no_mangle]
pub unsafe extern "C" fn s3p_buffer_free(buf: *mut S3pBuffer) {
    crate::ffi_boundary((), || {
        if buf.is_null() {
            return;
        }

        let buf_ref = {
            // SAFETY: Pointer validity is guaranteed by the caller.
            unsafe { &mut *buf }
        };

        if !buf_ref.data.is_null() {
            let slice_ptr = ptr::slice_from_raw_parts_mut(buf_ref.data, buf_ref.len);
            // SAFETY: `data` was allocated as a `Box<[u8]>` by encode/decode.
            unsafe {
                drop(Box::from_raw(slice_ptr));
            }
        }

        *buf_ref = S3pBuffer::default();
    });
}

#[cfg(test)]
mod tests {
    use std::ffi::CStr;

    use super::*;
    use crate::s3p_last_error;

    fn take_buffer(buf: &mut S3pBuffer) -> Vec<u8> {
        // SAFETY: `buf` was populated by this library's encode/decode.
        let bytes = unsafe { slice::from_raw_parts(buf.data, buf.len) }.to_vec();
        // SAFETY: `buf` is valid and owned by the test.
        unsafe { s3p_buffer_free(buf) };
        bytes
    }

    fn last_error_text() -> String {
        let ptr = s3p_last_error();
        assert!(!ptr.is_null());
        // SAFETY: s3p_last_error returns a pointer to a thread-local CString.
        unsafe { CStr::from_ptr(ptr) }.to_str().unwrap().to_string()
    }

    #[test]
    fn encode_decode_roundtrip_through_abi() {
        let payload = [0x25u8, 0x01, 0x56, 0x03];
        let mut frame = S3pBuffer::default();

        let result =
            unsafe { s3p_encode(S3P_VARIANT_A, payload.as_ptr(), payload.len(), &mut frame) };
        assert_eq!(result, S3pResult::Ok);

        let mut decoded = S3pBuffer::default();
        let result = unsafe { s3p_decode(S3P_VARIANT_A, frame.data, frame.len, &mut decoded) };
        assert_eq!(result, S3pResult::Ok);

        assert_eq!(take_buffer(&mut decoded), payload);
        assert_eq!(
            take_buffer(&mut frame),
            [0x56, 0x25, 0x05, 0x01, 0x25, 0x76, 0x03, 0x7F, 0x65]
        );
    }

    #[test]
    fn empty_payload_roundtrip() {
        let mut frame = S3pBuffer::default();
        let result = unsafe { s3p_encode(S3P_VARIANT_B, ptr::null(), 0, &mut frame) };
        assert_eq!(result, S3pResult::Ok);

        let mut decoded = S3pBuffer::default();
        let result = unsafe { s3p_decode(S3P_VARIANT_B, frame.data, frame.len, &mut decoded) };
        assert_eq!(result, S3pResult::Ok);
        assert_eq!(decoded.len, 0);

        unsafe { s3p_buffer_free(&mut decoded) };
        unsafe { s3p_buffer_free(&mut frame) };
    }

    #[test]
    fn unknown_variant_is_invalid_argument() {
        let mut out = S3pBuffer::default();
        let result = unsafe { s3p_encode(7, ptr::null(), 0, &mut out) };
        assert_eq!(result, S3pResult::InvalidArgument);
        assert!(last_error_text().contains("variant"));
    }

    #[test]
    fn null_out_pointer_is_invalid_argument() {
        let payload = [0x01u8];
        let result =
            unsafe { s3p_encode(S3P_VARIANT_A, payload.as_ptr(), payload.len(), ptr::null_mut()) };
        assert_eq!(result, S3pResult::InvalidArgument);
    }

    #[test]
    fn oversize_payload_maps_to_invalid_input() {
        let payload = vec![0u8; 300];
        let mut out = S3pBuffer::default();
        let result =
            unsafe { s3p_encode(S3P_VARIANT_A, payload.as_ptr(), payload.len(), &mut out) };
        assert_eq!(result, S3pResult::InvalidInput);
        assert!(last_error_text().contains("too large"));
    }

    #[test]
    fn decode_failures_map_to_distinct_codes() {
        let mut out = S3pBuffer::default();

        let no_start = [0x00u8, 0x01, 0x02];
        let result =
            unsafe { s3p_decode(S3P_VARIANT_A, no_start.as_ptr(), no_start.len(), &mut out) };
        assert_eq!(result, S3pResult::MissingStartByte);

        let double_escape = [0x56u8, 0x25, 0x25, 0x00, 0x65];
        let result = unsafe {
            s3p_decode(
                S3P_VARIANT_A,
                double_escape.as_ptr(),
                double_escape.len(),
                &mut out,
            )
        };
        assert_eq!(result, S3pResult::IllegalEscapedByte);

        let bad_checksum = [0x56u8, 0x01, 0x02, 0x65];
        let result = unsafe {
            s3p_decode(
                S3P_VARIANT_A,
                bad_checksum.as_ptr(),
                bad_checksum.len(),
                &mut out,
            )
        };
        assert_eq!(result, S3pResult::ChecksumMismatch);
        assert!(last_error_text().contains("checksum mismatch"));
    }

    #[test]
    fn buffer_free_is_idempotent() {
        let payload = [0x42u8];
        let mut frame = S3pBuffer::default();
        let result =
            unsafe { s3p_encode(S3P_VARIANT_A, payload.as_ptr(), payload.len(), &mut frame) };
        assert_eq!(result, S3pResult::Ok);

        unsafe { s3p_buffer_free(&mut frame) };
        assert!(frame.data.is_null());
        assert_eq!(frame.len, 0);

        unsafe { s3p_buffer_free(&mut frame) };
        unsafe { s3p_buffer_free(ptr::null_mut()) };
    }
}

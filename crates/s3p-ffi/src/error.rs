use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::c_char;

use s3p_frame::{DecodeError, EncodeError};

use crate::types::S3pResult;

thread_local! {
    static LAST_ERROR: RefCell<CString> = RefCell::new(CString::new("").expect("empty CString should be valid"));
}

pub(crate) fn clear_error_state() {
    LAST_ERROR.with(|state| {
        *state.borrow_mut() = CString::new("").expect("empty CString should be valid");
    });
}

pub(crate) fn set_error_message(message: impl Into<String>) {
    let message = message.into();
    let sanitized = message.replace('\0', "?");
    LAST_ERROR.with(|state| {
        *state.borrow_mut() = CString::new(sanitized)
            .unwrap_or_else(|_| CString::new("internal error").expect("literal is valid"));
    });
}

pub(crate) fn set_invalid_argument(message: impl Into<String>) -> S3pResult {
    set_error_message(message);
    S3pResult::InvalidArgument
}

pub(crate) fn set_panic_error() {
    set_error_message("panic across FFI boundary");
}

pub(crate) fn map_encode_error(err: &EncodeError) -> S3pResult {
    set_error_message(err.to_string());
    match err {
        EncodeError::InvalidInput { .. } => S3pResult::InvalidInput,
    }
}

pub(crate) fn map_decode_error(err: &DecodeError) -> S3pResult {
    set_error_message(err.to_string());
    match err {
        DecodeError::MissingStartByte => S3pResult::MissingStartByte,
        DecodeError::IllegalStartByte => S3pResult::IllegalStartByte,
        DecodeError::IllegalEscapedByte { .. } => S3pResult::IllegalEscapedByte,
        DecodeError::UnterminatedPacket => S3pResult::UnterminatedPacket,
        DecodeError::PacketTooLarge { .. } => S3pResult::PacketTooLarge,
        DecodeError::ChecksumMismatch { .. } => S3pResult::ChecksumMismatch,
    }
}

pub(crate) fn last_error_ptr() -> *const c_char {
    LAST_ERROR.with(|state| state.borrow().as_ptr())
}

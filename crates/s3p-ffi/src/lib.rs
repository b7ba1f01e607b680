//! s3p-ffi: C-ABI exports for the S3P framing codec.
//!
//! The original S3P library shipped bindings for embedding in other
//! languages; this crate is the binding surface of the Rust rendition. All
//! exports are panic-safe and report failures through stable integer codes
//! plus a thread-local last-error message.

mod codec;
mod error;
mod types;

use std::panic::AssertUnwindSafe;

pub use codec::{s3p_buffer_free, s3p_decode, s3p_encode};
pub use types::{
    S3pBuffer, S3pResult, S3P_ERR_CHECKSUM_MISMATCH, S3P_ERR_ILLEGAL_ESCAPED_BYTE,
    S3P_ERR_ILLEGAL_START_BYTE, S3P_ERR_INTERNAL, S3P_ERR_INVALID_ARGUMENT, S3P_ERR_INVALID_INPUT,
    S3P_ERR_MISSING_START_BYTE, S3P_ERR_PACKET_TOO_LARGE, S3P_ERR_UNTERMINATED_PACKET, S3P_OK,
    S3P_VARIANT_A, S3P_VARIANT_B,
};

fn ffi_boundary<T>(on_panic: T, f: impl FnOnce() -> T) -> T {
    match std::panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => value,
        Err(_) => {
            error::set_panic_error();
            on_panic
        }
    }
}

#[no_mangle]
pub extern "C" fn s3p_init() -> S3pResult {
    ffi_boundary(S3pResult::Internal, || {
        error::clear_error_state();
        S3pResult::Ok
    })
}

#[no_mangle]
pub extern "C" fn s3p_cleanup() {
    ffi_boundary((), || {
        error::clear_error_state();
    });
}

#[no_mangle]
pub extern "C" fn s3p_last_error() -> *const std::os::raw::c_char {
    ffi_boundary(std::ptr::null(), error::last_error_ptr)
}

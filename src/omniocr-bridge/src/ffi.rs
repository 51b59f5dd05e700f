//! C ABI exports (Kotlin/Native on iOS, or any C caller)
//!
//! Strings passed in are borrowed for the duration of the call. Strings
//! handed out are owned by the caller and must go back through
//! [`omniocr_string_free`].

use crate::boundary::{guarded, legacy_reply, Reply};
use crate::bridge::Bridge;
use crate::engine::OcrBackend;
use std::borrow::Cow;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::path::PathBuf;
use std::ptr;

/// Status code for a successful [`omniocr_recognize`] call
pub const STATUS_OK: i32 = 0;

/// Status code for a null argument
pub const STATUS_INVALID_ARGUMENT: i32 = 4;

/// Owned C string for `text`. Interior NULs are dropped rather than truncating.
fn into_c_string(text: String) -> CString {
    CString::new(text).unwrap_or_else(|e| {
        let mut bytes = e.into_vec();
        bytes.retain(|&b| b != 0);
        CString::new(bytes).unwrap_or_default()
    })
}

unsafe fn path_arg(ptr: *const c_char) -> Option<PathBuf> {
    if ptr.is_null() {
        return None;
    }
    let bytes = CStr::from_ptr(ptr).to_bytes();

    #[cfg(unix)]
    {
        use std::os::unix::ffi::OsStrExt;
        Some(PathBuf::from(std::ffi::OsStr::from_bytes(bytes)))
    }
    #[cfg(not(unix))]
    {
        Some(PathBuf::from(String::from_utf8_lossy(bytes).into_owned()))
    }
}

unsafe fn str_arg<'a>(ptr: *const c_char) -> Option<Cow<'a, str>> {
    if ptr.is_null() {
        None
    } else {
        Some(CStr::from_ptr(ptr).to_string_lossy())
    }
}

pub(crate) unsafe fn legacy_with<B: OcrBackend>(
    bridge: &Bridge<B>,
    image_path: *const c_char,
    lang_code: *const c_char,
) -> *mut c_char {
    let args = match (path_arg(image_path), str_arg(lang_code)) {
        (Some(path), Some(lang)) => Some((path, lang.into_owned())),
        _ => None,
    };

    match legacy_reply(bridge, args) {
        Reply::Text(text) => into_c_string(text).into_raw(),
        Reply::Null | Reply::Throw { .. } => ptr::null_mut(),
    }
}

pub(crate) unsafe fn recognize_with<B: OcrBackend>(
    bridge: &Bridge<B>,
    image_path: *const c_char,
    lang_code: *const c_char,
    out_text: *mut *mut c_char,
) -> i32 {
    if out_text.is_null() {
        return STATUS_INVALID_ARGUMENT;
    }
    *out_text = ptr::null_mut();

    let (Some(path), Some(lang)) = (path_arg(image_path), str_arg(lang_code)) else {
        return STATUS_INVALID_ARGUMENT;
    };

    match guarded(|| bridge.recognize(&path, &lang)) {
        Ok(text) => {
            *out_text = into_c_string(text).into_raw();
            STATUS_OK
        }
        Err(e) => e.kind().code(),
    }
}

/// Legacy entry point: recognized text or a sentinel `Error: ...` string.
///
/// Returns null only when an argument is null.
///
/// # Safety
///
/// Both arguments must be null or valid NUL-terminated strings. The result
/// must be released with [`omniocr_string_free`].
#[cfg(feature = "tesseract")]
#[export_name = "runOcrIOS"]
pub unsafe extern "C" fn run_ocr_ios(image_path: *const c_char, lang_code: *const c_char) -> *mut c_char {
    legacy_with(&crate::default_bridge(), image_path, lang_code)
}

/// Tagged entry point. Returns [`STATUS_OK`] and stores an owned string in
/// `*out_text`, or returns an error code (`1` engine init, `2` image read,
/// `3` recognition, `4` invalid argument) and stores null.
///
/// # Safety
///
/// `image_path` and `lang_code` must be null or valid NUL-terminated strings;
/// `out_text` must be null or valid for writes.
#[cfg(feature = "tesseract")]
#[no_mangle]
pub unsafe extern "C" fn omniocr_recognize(
    image_path: *const c_char,
    lang_code: *const c_char,
    out_text: *mut *mut c_char,
) -> i32 {
    recognize_with(&crate::default_bridge(), image_path, lang_code, out_text)
}

/// Release a string returned by this library. Null is a no-op.
///
/// # Safety
///
/// `text` must be null or a pointer obtained from this library that has not
/// been freed yet.
#[no_mangle]
pub unsafe extern "C" fn omniocr_string_free(text: *mut c_char) {
    if !text.is_null() {
        drop(CString::from_raw(text));
    }
}

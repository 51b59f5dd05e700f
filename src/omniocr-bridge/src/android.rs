//! JNI exports for `org.omniocr.ocrcore.OcrBridge`
//!
//! `JavaStr` guards hold the UTF chars borrowed from the JVM and release them
//! when dropped, before the native method returns. Null handling matches the
//! C ABI: the legacy export returns null, the checked export throws
//! `IllegalArgumentException`.

use crate::boundary::{checked_reply, legacy_reply, CallArgs, Reply};
use jni::objects::{JObject, JString};
use jni::sys::jstring;
use jni::JNIEnv;
use std::path::PathBuf;
use tracing::{error, warn};

/// Copy both Java strings out, or None if either is null or unreadable
fn read_args(env: &mut JNIEnv, image_path: &JString, lang_code: &JString) -> Option<CallArgs> {
    if image_path.is_null() || lang_code.is_null() {
        return None;
    }

    let path = match env.get_string(image_path) {
        Ok(java_str) => PathBuf::from(String::from(java_str)),
        Err(e) => {
            warn!("could not read imagePath: {}", e);
            return None;
        }
    };
    let language = match env.get_string(lang_code) {
        Ok(java_str) => String::from(java_str),
        Err(e) => {
            warn!("could not read langCode: {}", e);
            return None;
        }
    };

    Some((path, language))
}

/// Hand a [`Reply`] back to the JVM
fn deliver(env: &mut JNIEnv, reply: Reply) -> jstring {
    match reply {
        Reply::Text(text) => match env.new_string(text) {
            Ok(s) => s.into_raw(),
            Err(e) => {
                error!("failed to allocate java string: {}", e);
                JObject::null().into_raw()
            }
        },
        Reply::Null => JObject::null().into_raw(),
        Reply::Throw { class, message } => {
            // A pending exception from get_string takes precedence
            if !env.exception_check().unwrap_or(false) {
                if let Err(e) = env.throw_new(class, message) {
                    error!("failed to throw {}: {}", class, e);
                }
            }
            JObject::null().into_raw()
        }
    }
}

#[cfg(feature = "tesseract")]
#[no_mangle]
pub extern "system" fn Java_org_omniocr_ocrcore_OcrBridge_runOcr<'local>(
    mut env: JNIEnv<'local>,
    _this: JObject<'local>,
    image_path: JString<'local>,
    lang_code: JString<'local>,
) -> jstring {
    let args = read_args(&mut env, &image_path, &lang_code);
    let reply = legacy_reply(&crate::default_bridge(), args);
    deliver(&mut env, reply)
}

#[cfg(feature = "tesseract")]
#[no_mangle]
pub extern "system" fn Java_org_omniocr_ocrcore_OcrBridge_runOcrChecked<'local>(
    mut env: JNIEnv<'local>,
    _this: JObject<'local>,
    image_path: JString<'local>,
    lang_code: JString<'local>,
) -> jstring {
    let args = read_args(&mut env, &image_path, &lang_code);
    let reply = checked_reply(&crate::default_bridge(), args);
    deliver(&mut env, reply)
}

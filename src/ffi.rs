//! FFI bindings for workout-stats
//!
//! This module provides C-compatible functions for calling workout-stats from
//! other languages. All functions use C strings (null-terminated) and return
//! allocated memory that must be freed by the caller using
//! `workout_stats_free_string`.
//!
//! Label styles are passed as integers: 0 = display name, 1 = type code.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use crate::error::WorkoutError;
use crate::pipeline::{run_demo, workout_summary, WorkoutProcessor};
use crate::schema::WorkoutPackage;
use crate::types::LabelStyle;

// Thread-local storage for the last error message
thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

/// Set the last error message
fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

/// Clear the last error message
fn clear_last_error() {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = None;
    });
}

/// Helper to convert C string to Rust string
unsafe fn cstr_to_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_string())
}

/// Helper to convert Rust string to C string (caller must free)
fn string_to_cstr(s: &str) -> *mut c_char {
    match CString::new(s) {
        Ok(cstr) => cstr.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

/// Map the integer label style; anything but 0 or 1 sets the last error
fn label_style_from_i32(value: i32) -> Option<LabelStyle> {
    match value {
        0 => Some(LabelStyle::Name),
        1 => Some(LabelStyle::Code),
        other => {
            set_last_error(&format!("Invalid label style: {} (expected 0 or 1)", other));
            None
        }
    }
}

/// Read the type code and JSON readings array of a single workout
unsafe fn read_package(
    type_code: *const c_char,
    readings_json: *const c_char,
) -> Option<WorkoutPackage> {
    let code = match cstr_to_string(type_code) {
        Some(s) => s,
        None => {
            set_last_error("Invalid type code string pointer");
            return None;
        }
    };

    let readings_str = match cstr_to_string(readings_json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid readings string pointer");
            return None;
        }
    };

    match serde_json::from_str::<Vec<f64>>(&readings_str) {
        Ok(readings) => Some(WorkoutPackage::new(code, readings)),
        Err(e) => {
            set_last_error(&WorkoutError::from(e).to_string());
            None
        }
    }
}

fn lines_to_cstr(lines: Vec<String>) -> *mut c_char {
    string_to_cstr(&lines.join("\n"))
}

// ============================================================================
// Stateless API
// ============================================================================

/// Compute one workout and return its summary line.
///
/// # Safety
/// - `type_code` and `readings_json` must be valid null-terminated C strings.
/// - `readings_json` must be a JSON array of numbers, e.g. `[15000, 1, 75]`.
/// - Returns a newly allocated string that must be freed with `workout_stats_free_string`.
/// - Returns NULL on error; call `workout_stats_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn workout_stats_summary(
    type_code: *const c_char,
    readings_json: *const c_char,
    label_style: i32,
) -> *mut c_char {
    clear_last_error();

    let label_style = match label_style_from_i32(label_style) {
        Some(style) => style,
        None => return ptr::null_mut(),
    };

    let package = match read_package(type_code, readings_json) {
        Some(p) => p,
        None => return ptr::null_mut(),
    };

    match workout_summary(&package.workout_type, &package.data, label_style) {
        Ok(line) => string_to_cstr(&line),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Process NDJSON packages and return the summary lines joined by newlines.
///
/// # Safety
/// - `ndjson` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `workout_stats_free_string`.
/// - Returns NULL on the first failing package; call `workout_stats_last_error`.
#[no_mangle]
pub unsafe extern "C" fn workout_stats_process_ndjson(
    ndjson: *const c_char,
    label_style: i32,
) -> *mut c_char {
    clear_last_error();

    let ndjson_str = match cstr_to_string(ndjson) {
        Some(s) => s,
        None => {
            set_last_error("Invalid NDJSON string pointer");
            return ptr::null_mut();
        }
    };

    let label_style = match label_style_from_i32(label_style) {
        Some(style) => style,
        None => return ptr::null_mut(),
    };

    let processor = WorkoutProcessor::with_label_style(label_style);
    match processor.process_ndjson(&ndjson_str) {
        Ok(lines) => lines_to_cstr(lines),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Render the embedded demo batch.
///
/// # Safety
/// - Returns a newly allocated string that must be freed with `workout_stats_free_string`.
/// - Returns NULL for an unknown label style; call `workout_stats_last_error`.
#[no_mangle]
pub unsafe extern "C" fn workout_stats_demo(label_style: i32) -> *mut c_char {
    clear_last_error();

    let label_style = match label_style_from_i32(label_style) {
        Some(style) => style,
        None => return ptr::null_mut(),
    };

    match run_demo(label_style) {
        Ok(lines) => lines_to_cstr(lines),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

// ============================================================================
// Processor API
// ============================================================================

/// Opaque handle to a WorkoutProcessor
pub struct WorkoutProcessorHandle {
    processor: WorkoutProcessor,
}

/// Create a new WorkoutProcessor with the given label style.
///
/// # Safety
/// - Returns a pointer to a newly allocated processor.
/// - Must be freed with `workout_stats_processor_free`.
/// - Returns NULL for an unknown label style; call `workout_stats_last_error`.
#[no_mangle]
pub unsafe extern "C" fn workout_stats_processor_new(
    label_style: i32,
) -> *mut WorkoutProcessorHandle {
    clear_last_error();

    let label_style = match label_style_from_i32(label_style) {
        Some(style) => style,
        None => return ptr::null_mut(),
    };

    let processor = WorkoutProcessor::with_label_style(label_style);
    let handle = Box::new(WorkoutProcessorHandle { processor });
    Box::into_raw(handle)
}

/// Free a WorkoutProcessor.
///
/// # Safety
/// - `processor` must be a valid pointer returned by `workout_stats_processor_new`.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn workout_stats_processor_free(processor: *mut WorkoutProcessorHandle) {
    if !processor.is_null() {
        drop(Box::from_raw(processor));
    }
}

/// Compute one workout with a processor and return its JSON payload.
///
/// # Safety
/// - `processor` must be a valid pointer returned by `workout_stats_processor_new`.
/// - `type_code` and `readings_json` must be valid null-terminated C strings.
/// - Returns a newly allocated string that must be freed with `workout_stats_free_string`.
/// - Returns NULL on error; call `workout_stats_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn workout_stats_processor_summary_json(
    processor: *mut WorkoutProcessorHandle,
    type_code: *const c_char,
    readings_json: *const c_char,
) -> *mut c_char {
    clear_last_error();

    if processor.is_null() {
        set_last_error("Null processor pointer");
        return ptr::null_mut();
    }

    let handle = &*processor;

    let package = match read_package(type_code, readings_json) {
        Some(p) => p,
        None => return ptr::null_mut(),
    };

    match handle.processor.process_to_json(&package) {
        Ok(json) => string_to_cstr(&json),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

// ============================================================================
// Memory Management
// ============================================================================

/// Free a string returned by workout-stats functions.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by a workout-stats function, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn workout_stats_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Get the last error message.
///
/// # Safety
/// - Returns a pointer to a thread-local error string.
/// - The returned pointer is valid until the next workout-stats call on this thread.
/// - Do NOT free the returned pointer.
/// - Returns NULL if no error occurred.
#[no_mangle]
pub unsafe extern "C" fn workout_stats_last_error() -> *const c_char {
    LAST_ERROR.with(|e| match &*e.borrow() {
        Some(cstr) => cstr.as_ptr(),
        None => ptr::null(),
    })
}

// ============================================================================
// Version Information
// ============================================================================

/// Get the library version.
///
/// # Safety
/// - Returns a pointer to a static string. Do NOT free.
#[no_mangle]
pub unsafe extern "C" fn workout_stats_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}

//! C ABI exports for WebAssembly and native hosts.
//!
//! Hosts pass a pointer and a signed length and get an integer back; no
//! allocation crosses the boundary and nothing is retained after a call.

use crate::locator::status_code;
use crate::scanner::find_audio_track_index;
use std::ffi::c_int;

/// Status returned for a null buffer or one shorter than a box header.
pub const INVALID_INPUT: c_int = -2;

/// # Safety
///
/// `ptr` must be null or valid for reads of `len` elements of `T` for the
/// duration of the returned borrow.
unsafe fn borrow_slice<'a, T>(ptr: *const T, len: c_int) -> Option<&'a [T]> {
    if ptr.is_null() {
        return None;
    }
    let len = usize::try_from(len).ok()?;
    // SAFETY: non-null and caller guarantees `len` readable elements.
    Some(unsafe { std::slice::from_raw_parts(ptr, len) })
}

/// Ordinal of the first audio track in `data[..length]`, `-1` when there is
/// none, `-2` for a null pointer or a length below 8.
///
/// # Safety
///
/// `data` must be null or point to at least `length` readable bytes.
#[unsafe(export_name = "findAudioTrackIndex")]
pub unsafe extern "C" fn find_audio_track_index_raw(data: *const u8, length: c_int) -> c_int {
    // SAFETY: forwarded from this function's contract.
    match unsafe { borrow_slice(data, length) } {
        Some(buf) => status_code(find_audio_track_index(buf)),
        None => INVALID_INPUT,
    }
}

/// Same as [`find_audio_track_index_raw`], under the name existing wasm
/// hosts call.
///
/// # Safety
///
/// `data` must be null or point to at least `length` readable bytes.
#[unsafe(export_name = "findAudioStreamIndex")]
pub unsafe extern "C" fn find_audio_stream_index_raw(data: *const u8, length: c_int) -> c_int {
    // SAFETY: forwarded from this function's contract.
    unsafe { find_audio_track_index_raw(data, length) }
}

/// Wrapping sum of `arr[..length]`; 0 for a null pointer or non-positive length.
///
/// # Safety
///
/// `arr` must be null or point to at least `length` readable `int`s.
#[unsafe(export_name = "sumArray")]
pub unsafe extern "C" fn sum_array_raw(arr: *const c_int, length: c_int) -> c_int {
    // SAFETY: forwarded from this function's contract.
    unsafe { borrow_slice(arr, length) }
        .map_or(0, |xs| xs.iter().fold(0, |acc: c_int, &x| acc.wrapping_add(x)))
}

/// Echo the byte length of a host-supplied file buffer, or -1 for a null
/// pointer or negative length. `data` is never dereferenced.
#[unsafe(export_name = "calculateFileSize")]
pub extern "C" fn calculate_file_size_raw(data: *const u8, length: c_int) -> i64 {
    if data.is_null() || length < 0 {
        return -1;
    }
    i64::from(length)
}

/// Width of a C `int` on the compilation target.
#[unsafe(export_name = "getIntSize")]
pub extern "C" fn get_int_size() -> usize {
    std::mem::size_of::<c_int>()
}

//! Utility and debugging functions.
//!

use std::mem;
use std::ptr;
use std::string::FromUtf8Error;


/// An error caused by a utility function.
#[derive(Debug, thiserror::Error)]
pub enum UtilError {
    #[error(
        "The size of the source byte slice ({src} bytes) does not match \
        the size of the destination type ({dst} bytes)."
    )]
    BytesTo { src: usize, dst: usize },
    #[error(
        "The size of the source byte slice ({src} bytes) is not evenly \
        divisible by the size of the destination type ({dst} bytes)."
    )]
    BytesToVec { src: usize, dst: usize },
    #[error("Unable to convert bytes into string: {0}")]
    BytesIntoString(#[from] FromUtf8Error),
}

/// Copies a byte slice into a new value of arbitrary type.
///
/// ### Safety
///
/// Every bit pattern of the correct size must be a valid `T`.
///
pub unsafe fn bytes_to<T: Copy>(bytes: &[u8]) -> Result<T, UtilError> {
    if mem::size_of::<T>() == bytes.len() {
        Ok(ptr::read_unaligned(bytes.as_ptr() as *const T))
    } else {
        Err(UtilError::BytesTo {
            src: bytes.len(),
            dst: mem::size_of::<T>(),
        })
    }
}

/// Copies a byte slice into a new vector of arbitrary type.
///
/// ### Safety
///
/// Every bit pattern of the correct size must be a valid `T`.
///
pub unsafe fn bytes_to_vec<T: Copy>(bytes: &[u8]) -> Result<Vec<T>, UtilError> {
    let size = mem::size_of::<T>();

    if size == 0 || bytes.len() % size != 0 {
        return Err(UtilError::BytesToVec { src: bytes.len(), dst: size });
    }

    Ok(bytes.chunks_exact(size)
        .map(|chunk| ptr::read_unaligned(chunk.as_ptr() as *const T))
        .collect())
}

/// Converts a vector of bytes into a `String`, dropping a trailing nul and
/// surrounding whitespace.
pub fn bytes_into_string(mut bytes: Vec<u8>) -> Result<String, UtilError> {
    while bytes.last() == Some(&0u8) {
        bytes.pop();
    }

    String::from_utf8(bytes)
        .map(|str| String::from(str.trim()))
        .map_err(UtilError::BytesIntoString)
}

/// Returns the bytes of a plain value.
pub fn as_bytes<T: Copy>(val: &T) -> &[u8] {
    unsafe { std::slice::from_raw_parts(val as *const T as *const u8, mem::size_of::<T>()) }
}

/// Returns the bytes of a slice of plain values.
pub fn slice_as_bytes<T: Copy>(slice: &[T]) -> &[u8] {
    unsafe { std::slice::from_raw_parts(slice.as_ptr() as *const u8, mem::size_of_val(slice)) }
}

/// Splits a `;` separated list (as returned for kernel names and built-in
/// kernels), dropping empty entries.
pub fn split_name_list(list: &str) -> Vec<String> {
    list.split(';')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(String::from)
        .collect()
}

/// Returns the number of elements of type `T` covering `len_bytes`, rounded
/// up.
pub fn len_in<T>(len_bytes: usize) -> usize {
    let size = mem::size_of::<T>();
    if size == 0 { 0 } else { (len_bytes + size - 1) / size }
}

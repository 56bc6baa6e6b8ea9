use std::mem::{self, offset_of, size_of};
use std::slice;
use crate::{cl_image_format, cl_image_desc, cl_buffer_region, cl_mem, c_void, CL_RGBA,
    CL_FLOAT, CL_MEM_OBJECT_IMAGE2D_ARRAY};

type EchoFn<T> = extern "system" fn(*const T, *mut T);

extern "system" fn echo_image_format(src: *const cl_image_format, dst: *mut cl_image_format) {
    unsafe { *dst = *src; }
}

extern "system" fn echo_image_desc(src: *const cl_image_desc, dst: *mut cl_image_desc) {
    unsafe { *dst = *src; }
}

extern "system" fn echo_buffer_region(src: *const cl_buffer_region, dst: *mut cl_buffer_region) {
    unsafe { *dst = *src; }
}

fn bytes_of<T>(val: &T) -> &[u8] {
    unsafe { slice::from_raw_parts(val as *const T as *const u8, size_of::<T>()) }
}

// Passes `val` through a function with the platform's C calling convention.
fn echo<T: Copy>(val: &T, echo_fn: EchoFn<T>, blank: T) -> T {
    let mut out = blank;
    echo_fn(val as *const T, &mut out as *mut T);
    out
}

#[test]
fn image_format_layout() {
    assert_eq!(size_of::<cl_image_format>(), 8);
    assert_eq!(mem::align_of::<cl_image_format>(), 4);
    assert_eq!(offset_of!(cl_image_format, image_channel_order), 0);
    assert_eq!(offset_of!(cl_image_format, image_channel_data_type), 4);
}

#[test]
fn buffer_region_layout() {
    let ptr = size_of::<*mut c_void>();
    assert_eq!(size_of::<cl_buffer_region>(), 2 * ptr);
    assert_eq!(offset_of!(cl_buffer_region, origin), 0);
    assert_eq!(offset_of!(cl_buffer_region, size), ptr);
}

#[test]
fn image_desc_layout() {
    let ptr = size_of::<*mut c_void>();
    assert_eq!(offset_of!(cl_image_desc, image_type), 0);
    assert_eq!(offset_of!(cl_image_desc, image_width), ptr);
    assert_eq!(offset_of!(cl_image_desc, image_slice_pitch), 6 * ptr);
    assert_eq!(offset_of!(cl_image_desc, num_mip_levels), 7 * ptr);
    assert_eq!(offset_of!(cl_image_desc, num_samples), 7 * ptr + 4);
    assert_eq!(offset_of!(cl_image_desc, buffer), 7 * ptr + 8);
    assert_eq!(size_of::<cl_image_desc>(), 8 * ptr + 8);
    assert_eq!(mem::align_of::<cl_image_desc>(), ptr);
}

#[test]
fn image_format_native_round_trip() {
    let fmt = cl_image_format { image_channel_order: CL_RGBA, image_channel_data_type: CL_FLOAT };
    let out = echo(&fmt, echo_image_format, cl_image_format::default());
    assert_eq!(bytes_of(&fmt), bytes_of(&out));
    assert_eq!(out.image_channel_order, 0x10B5);
    assert_eq!(out.image_channel_data_type, 0x10DE);
}

#[test]
fn image_desc_native_round_trip() {
    let desc = cl_image_desc {
        image_type: CL_MEM_OBJECT_IMAGE2D_ARRAY,
        image_width: 640,
        image_height: 480,
        image_depth: 1,
        image_array_size: 6,
        image_row_pitch: 640 * 16,
        image_slice_pitch: 640 * 480 * 16,
        num_mip_levels: 0,
        num_samples: 0,
        buffer: 0xDEAD_BEE0usize as cl_mem,
    };
    let blank = cl_image_desc {
        image_type: 0, image_width: 0, image_height: 0, image_depth: 0, image_array_size: 0,
        image_row_pitch: 0, image_slice_pitch: 0, num_mip_levels: 0, num_samples: 0,
        buffer: std::ptr::null_mut(),
    };
    let out = echo(&desc, echo_image_desc, blank);
    assert_eq!(out, desc);
    // Padding after `image_type` is not guaranteed to be copied, compare fields instead.
    assert_eq!(bytes_of(&out.image_width), bytes_of(&desc.image_width));
    assert_eq!(out.buffer, desc.buffer);
}

#[test]
fn buffer_region_native_round_trip() {
    let region = cl_buffer_region { origin: 256, size: usize::MAX >> 1 };
    let out = echo(&region, echo_buffer_region, cl_buffer_region::default());
    assert_eq!(bytes_of(&region), bytes_of(&out));
}

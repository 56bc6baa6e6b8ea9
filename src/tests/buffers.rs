//! Buffer creation, linear transfers, fills, copies, and sub-buffers.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use clbind_core::mock;
use crate::{Buffer, MemFlags, MemInfo, EventList, Error, Status};
use super::{gpu_setup, ramp};


#[test]
fn create_with_and_without_host_data() {
    let (_, context, queue) = gpu_setup();

    let empty = Buffer::<f32>::new(&context, MemFlags::READ_WRITE, 64, None).unwrap();
    assert_eq!(empty.len(), 64);
    assert_eq!(empty.size_bytes(), 256);
    assert!(!empty.is_empty());
    assert_eq!(empty.info(MemInfo::Size).unwrap().as_size(), Some(256));

    // Only the first `len` elements of the host data are used:
    let init = ramp(80);
    let buffer = Buffer::new(&context, MemFlags::READ_ONLY, 64, Some(&init[..])).unwrap();
    assert!(buffer.flags().contains(MemFlags::COPY_HOST_PTR));

    let mut out = vec![0.0f32; 64];
    buffer.read(&queue, &mut out, 0, 0, None, None).unwrap();
    assert_eq!(out, ramp(64));
}

#[test]
fn create_rejects_bad_arguments() {
    let (_, context, _) = gpu_setup();

    match Buffer::<u8>::new(&context, MemFlags::READ_WRITE, 0, None) {
        Err(Error::InvalidArgument(_)) => (),
        other => panic!("unexpected result: {:?}", other),
    }
    match Buffer::<u8>::new(&context, MemFlags::USE_HOST_PTR, 16, Some(&[0; 16][..])) {
        Err(Error::InvalidArgument(_)) => (),
        other => panic!("unexpected result: {:?}", other),
    }
    match Buffer::<u8>::new(&context, MemFlags::READ_WRITE, 16, Some(&[0; 8][..])) {
        Err(Error::HostBufferTooSmall { required: 16, len: 8 }) => (),
        other => panic!("unexpected result: {:?}", other),
    }
    // Contradictory access flags reach the driver:
    let err = Buffer::<u8>::new(&context, MemFlags::READ_ONLY | MemFlags::WRITE_ONLY, 16, None)
        .unwrap_err();
    assert_eq!(err.api_status(), Some(Status::CL_INVALID_VALUE));
}

#[test]
fn read_and_write_ranges() {
    let (_, context, queue) = gpu_setup();
    let buffer = Buffer::<u32>::new(&context, MemFlags::READ_WRITE, 16, None).unwrap();
    buffer.fill(&queue, &[0], 0, 0, None, None).unwrap();

    buffer.write(&queue, &[7, 8, 9, 10], 4, 6, None, None).unwrap();
    let mut out = vec![0u32; 16];
    buffer.read(&queue, &mut out, 0, 0, None, None).unwrap();
    assert_eq!(&out[..], &[0, 0, 0, 0, 0, 0, 7, 8, 9, 10, 0, 0, 0, 0, 0, 0]);

    // A zero length runs to the end of the buffer:
    let mut tail = vec![0u32; 12];
    buffer.read(&queue, &mut tail, 0, 4, None, None).unwrap();
    assert_eq!(&tail[..], &[0, 0, 7, 8, 9, 10, 0, 0, 0, 0, 0, 0]);

    match buffer.read(&queue, &mut out, 8, 10, None, None) {
        Err(Error::InvalidArgument(msg)) => assert_eq!(msg, "Size is too large: 8 + 10 > 16."),
        other => panic!("unexpected result: {:?}", other),
    }
    match buffer.write(&queue, &[1, 2], 4, 0, None, None) {
        Err(Error::HostBufferTooSmall { required: 4, len: 2 }) => (),
        other => panic!("unexpected result: {:?}", other),
    }
    assert!(buffer.read(&queue, &mut out, 0, 17, None, None).is_err());
    assert_eq!(mock::call_count("clEnqueueReadBuffer"), 2);
}

#[test]
fn non_blocking_transfers() {
    let (_, context, queue) = gpu_setup();
    mock::set_completion_polls(2);
    let buffer = Buffer::<f32>::new(&context, MemFlags::READ_WRITE, 32, None).unwrap();
    let src = ramp(32);
    let mut dst = vec![0.0f32; 32];

    let mut events = EventList::new();
    unsafe {
        buffer.enqueue_write(&queue, false, &src, 0, 0, Some(&mut events), None).unwrap();
        let written = events.clone();
        buffer.enqueue_read(&queue, false, &mut dst, 0, 0, Some(&mut events), Some(&written))
            .unwrap();
    }
    events.wait().unwrap();
    assert!(events.is_complete().unwrap());
    assert_eq!(dst, src);
}

#[test]
fn fill_ranges() {
    let (_, context, queue) = gpu_setup();
    let buffer = Buffer::<i16>::new(&context, MemFlags::READ_WRITE, 10, None).unwrap();
    buffer.fill(&queue, &[-1], 0, 0, None, None).unwrap();
    buffer.fill(&queue, &[3], 4, 2, None, None).unwrap();

    let mut out = vec![0i16; 10];
    buffer.read(&queue, &mut out, 0, 0, None, None).unwrap();
    assert_eq!(&out[..], &[-1, -1, 3, 3, 3, 3, -1, -1, -1, -1]);

    assert!(buffer.fill(&queue, &[0], 9, 2, None, None).is_err());
}

#[test]
fn fill_with_a_pattern() {
    let (_, context, queue) = gpu_setup();
    let buffer = Buffer::<u16>::new(&context, MemFlags::READ_WRITE, 12, None).unwrap();
    buffer.fill(&queue, &[1, 2], 0, 0, None, None).unwrap();
    buffer.fill(&queue, &[7, 8, 9, 10], 4, 4, None, None).unwrap();

    let mut out = vec![0u16; 12];
    buffer.read(&queue, &mut out, 0, 0, None, None).unwrap();
    assert_eq!(&out[..], &[1, 2, 1, 2, 7, 8, 9, 10, 1, 2, 1, 2]);

    let invalid = |res: crate::Result<()>| match res {
        Err(Error::InvalidArgument(msg)) => msg,
        other => panic!("unexpected result: {:?}", other),
    };
    // Six bytes:
    let msg = invalid(buffer.fill(&queue, &[1, 2, 3], 0, 0, None, None));
    assert_eq!(msg, "Fill pattern size must be a power of two no larger than 128 bytes \
        (found 6 bytes).");
    invalid(buffer.fill(&queue, &[], 0, 0, None, None));
    invalid(buffer.fill(&queue, &[0; 128], 0, 0, None, None));
    let msg = invalid(buffer.fill(&queue, &[1, 2], 3, 0, None, None));
    assert_eq!(msg, "Fill offset (0) and length (3) must be multiples of the pattern \
        length (2).");
    invalid(buffer.fill(&queue, &[1, 2], 2, 1, None, None));
    assert_eq!(mock::call_count("clEnqueueFillBuffer"), 2);
}

#[test]
fn huge_offsets_and_lengths_are_rejected() {
    let (_, context, queue) = gpu_setup();
    let buffer = Buffer::new(&context, MemFlags::READ_WRITE, 16, Some(&ramp(16)[..])).unwrap();
    let other = Buffer::<f32>::new(&context, MemFlags::READ_WRITE, 16, None).unwrap();
    let mut data = vec![0.0f32; 16];

    match buffer.read(&queue, &mut data, usize::MAX, 1, None, None) {
        Err(Error::InvalidArgument(msg)) =>
            assert_eq!(msg, format!("Size is too large: {} + 1 > 16.", usize::MAX)),
        other => panic!("unexpected result: {:?}", other),
    }
    assert!(buffer.write(&queue, &data, 2, usize::MAX, None, None).is_err());
    assert!(buffer.fill(&queue, &[0.0], usize::MAX, 1, None, None).is_err());
    assert!(other.copy_from(&queue, &buffer, 2, 0, usize::MAX, None, None).is_err());
    assert!(other.copy_from(&queue, &buffer, 0, 1, usize::MAX - 1, None, None).is_err());
    assert!(buffer.create_sub_buffer(MemFlags::empty(), usize::MAX, 2).is_err());
    assert!(buffer.create_sub_buffer(MemFlags::empty(), 1, usize::MAX).is_err());
    assert!(Buffer::<f32>::new(&context, MemFlags::READ_WRITE, usize::MAX / 2, None).is_err());

    for name in &["clEnqueueReadBuffer", "clEnqueueWriteBuffer", "clEnqueueFillBuffer",
            "clEnqueueCopyBuffer", "clCreateSubBuffer"] {
        assert_eq!(mock::call_count(name), 0, "{}", name);
    }
    assert_eq!(mock::call_count("clCreateBuffer"), 2);
}

#[test]
fn copy_between_buffers() {
    let (_, context, queue) = gpu_setup();
    let src = Buffer::new(&context, MemFlags::READ_ONLY, 8, Some(&ramp(8)[..])).unwrap();
    let dst = Buffer::<f32>::new(&context, MemFlags::READ_WRITE, 12, None).unwrap();
    dst.fill(&queue, &[-1.0], 0, 0, None, None).unwrap();

    dst.copy_from(&queue, &src, 4, 2, 6, None, None).unwrap();
    let mut out = vec![0.0f32; 12];
    dst.read(&queue, &mut out, 0, 0, None, None).unwrap();
    assert_eq!(&out[..], &[-1.0, -1.0, -1.0, -1.0, -1.0, -1.0, 2.0, 3.0, 4.0, 5.0, -1.0, -1.0]);

    // The rest of `src` (8 elements) does not fit after element 6:
    match dst.copy_from(&queue, &src, 0, 0, 6, None, None) {
        Err(Error::InvalidArgument(msg)) =>
            assert_eq!(msg, "Destination buffer is too small: 8 + 6 > 12."),
        other => panic!("unexpected result: {:?}", other),
    }
    assert!(src.copy_from(&queue, &dst, 4, 10, 0, None, None).is_err());
    assert_eq!(mock::call_count("clEnqueueCopyBuffer"), 1);
}

#[test]
fn sub_buffers_share_storage() {
    let (_, context, queue) = gpu_setup();
    let buffer = Buffer::<f32>::new(&context, MemFlags::READ_WRITE, 128, None).unwrap();
    buffer.fill(&queue, &[0.0], 0, 0, None, None).unwrap();

    // 32 f32s are 128 bytes, the device's base address alignment:
    let sub = buffer.create_sub_buffer(MemFlags::empty(), 32, 16).unwrap();
    assert_eq!(sub.len(), 16);
    assert!(sub.flags().contains(MemFlags::READ_WRITE));
    assert_eq!(sub.info(MemInfo::Offset).unwrap().as_size(), Some(128));
    sub.fill(&queue, &[2.5], 0, 0, None, None).unwrap();

    let mut out = vec![0.0f32; 128];
    buffer.read(&queue, &mut out, 0, 0, None, None).unwrap();
    assert!(out[..32].iter().all(|&v| v == 0.0));
    assert!(out[32..48].iter().all(|&v| v == 2.5));
    assert!(out[48..].iter().all(|&v| v == 0.0));

    let read_only = buffer.create_sub_buffer(MemFlags::READ_ONLY, 64, 64).unwrap();
    assert!(read_only.flags().contains(MemFlags::READ_ONLY));

    assert!(buffer.create_sub_buffer(MemFlags::empty(), 120, 16).is_err());
    assert!(buffer.create_sub_buffer(MemFlags::empty(), 0, 0).is_err());
    let err = buffer.create_sub_buffer(MemFlags::empty(), 1, 4).unwrap_err();
    assert_eq!(err.api_status(), Some(Status::CL_MISALIGNED_SUB_BUFFER_OFFSET));
}

#[test]
fn destructor_callback_runs_after_last_release() {
    let (_, context, _) = gpu_setup();
    let buffer = Buffer::<u8>::new(&context, MemFlags::READ_WRITE, 256, None).unwrap();
    let sub = buffer.create_sub_buffer(MemFlags::empty(), 128, 128).unwrap();

    let destroyed = Arc::new(AtomicUsize::new(0));
    let destroyed_cb = destroyed.clone();
    buffer.set_destructor_callback(move || { destroyed_cb.fetch_add(1, Ordering::SeqCst); })
        .unwrap();

    let copy = buffer.clone();
    drop(buffer);
    drop(copy);
    // The sub-buffer still holds its parent:
    assert_eq!(destroyed.load(Ordering::SeqCst), 0);
    drop(sub);
    assert_eq!(destroyed.load(Ordering::SeqCst), 1);
}

#[test]
fn display_lists_info() {
    let (_, context, _) = gpu_setup();
    let buffer = Buffer::<u64>::new(&context, MemFlags::READ_WRITE, 4, None).unwrap();
    let text = format!("{}", buffer);
    assert!(text.starts_with("Buffer"));
    assert!(text.contains("Size"));
}

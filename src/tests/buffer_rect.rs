//! Rectangular buffer transfers.
//!
//! The buffers here are 4 x 4 (or 4 x 4 x 2) grids holding their own
//! element index, so a read back names the cells it came from.

use clbind_core::mock;
use crate::{Buffer, MemFlags, Error};
use super::{gpu_setup, ramp};


#[test]
fn read_rect_2d_and_3d() {
    let (_, context, queue) = gpu_setup();
    let grid = Buffer::new(&context, MemFlags::READ_WRITE, 16, Some(&ramp(16)[..])).unwrap();

    let mut host = vec![0.0f32; 4];
    grid.read_rect(&queue, &mut host, &[2, 2], &[1, 1], &[], [4, 0], [0, 0], None, None)
        .unwrap();
    assert_eq!(host, vec![5.0, 6.0, 9.0, 10.0]);

    // Into the lower right corner of a 3 x 3 host grid:
    let mut host = vec![-1.0f32; 9];
    grid.read_rect(&queue, &mut host, &[2, 2], &[2, 0], &[1, 1], [4, 0], [3, 0], None, None)
        .unwrap();
    assert_eq!(host, vec![-1.0, -1.0, -1.0, -1.0, 2.0, 3.0, -1.0, 6.0, 7.0]);

    let volume = Buffer::new(&context, MemFlags::READ_WRITE, 32, Some(&ramp(32)[..])).unwrap();
    let mut host = vec![0.0f32; 8];
    volume.read_rect(&queue, &mut host, &[2, 2, 2], &[1, 1, 0], &[0, 0, 0], [4, 16], [0, 0],
        None, None).unwrap();
    assert_eq!(host, vec![5.0, 6.0, 9.0, 10.0, 21.0, 22.0, 25.0, 26.0]);
}

#[test]
fn write_rect_leaves_the_rest_untouched() {
    let (_, context, queue) = gpu_setup();
    let grid = Buffer::<u32>::new(&context, MemFlags::READ_WRITE, 16, None).unwrap();
    grid.fill(&queue, &[0], 0, 0, None, None).unwrap();

    grid.write_rect(&queue, &[1, 2, 3, 4, 5, 6], &[3, 2], &[1, 2], &[], [4, 0], [0, 0], None,
        None).unwrap();

    let mut out = vec![0u32; 16];
    grid.read(&queue, &mut out, 0, 0, None, None).unwrap();
    assert_eq!(out, vec![
        0, 0, 0, 0,
        0, 0, 0, 0,
        0, 1, 2, 3,
        0, 4, 5, 6,
    ]);
}

#[test]
fn copy_rect_between_buffers() {
    let (_, context, queue) = gpu_setup();
    let src = Buffer::new(&context, MemFlags::READ_ONLY, 16, Some(&ramp(16)[..])).unwrap();
    let dst = Buffer::<f32>::new(&context, MemFlags::READ_WRITE, 16, None).unwrap();
    dst.fill(&queue, &[0.0], 0, 0, None, None).unwrap();

    dst.copy_rect_from(&queue, &src, &[2, 2], &[2, 2], &[0, 0], [4, 0], [4, 0], None, None)
        .unwrap();

    let mut out = vec![0.0f32; 16];
    dst.read(&queue, &mut out, 0, 0, None, None).unwrap();
    assert_eq!(&out[..8], &[10.0, 11.0, 0.0, 0.0, 14.0, 15.0, 0.0, 0.0]);
    assert!(out[8..].iter().all(|&v| v == 0.0));

    match dst.copy_rect_from(&queue, &src, &[2, 2], &[3, 3], &[0, 0], [4, 0], [4, 0], None,
            None) {
        Err(Error::InvalidArgument(msg)) => assert_eq!(msg, "Source buffer is too small: the \
            region reaches element 21 of 16."),
        other => panic!("unexpected result: {:?}", other),
    }
    match dst.copy_rect_from(&queue, &src, &[4, 4], &[0, 0], &[0, 1], [0, 0], [0, 0], None,
            None) {
        Err(Error::InvalidArgument(msg)) => assert!(msg.starts_with("Destination buffer")),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn rect_arguments_are_checked() {
    let (_, context, queue) = gpu_setup();
    let grid = Buffer::new(&context, MemFlags::READ_WRITE, 16, Some(&ramp(16)[..])).unwrap();
    let mut host = vec![0.0f32; 16];

    let invalid = |res: crate::Result<()>| match res {
        Err(Error::InvalidArgument(msg)) => msg,
        other => panic!("unexpected result: {:?}", other),
    };

    invalid(grid.read_rect(&queue, &mut host, &[], &[], &[], [0, 0], [0, 0], None, None));
    invalid(grid.read_rect(&queue, &mut host, &[2, 0], &[], &[], [0, 0], [0, 0], None, None));
    invalid(grid.read_rect(&queue, &mut host, &[1, 1, 1, 1], &[], &[], [0, 0], [0, 0], None,
        None));
    invalid(grid.read_rect(&queue, &mut host, &[2, 2], &[0, 0, 0, 0], &[], [0, 0], [0, 0],
        None, None));

    let msg = invalid(grid.read_rect(&queue, &mut host, &[2, 2], &[], &[], [1, 0], [0, 0],
        None, None));
    assert_eq!(msg, "Buffer row pitch (1) is smaller than the region width (2).");

    let msg = invalid(grid.read_rect(&queue, &mut host, &[2, 2, 2], &[], &[], [4, 4], [0, 0],
        None, None));
    assert!(msg.starts_with("Buffer slice pitch (4)"));

    let msg = invalid(grid.read_rect(&queue, &mut host, &[2, 2], &[3, 3], &[], [4, 0], [0, 0],
        None, None));
    assert_eq!(msg, "Buffer is too small: the region reaches element 21 of 16.");

    match grid.read_rect(&queue, &mut host[..3], &[2, 2], &[], &[], [4, 0], [0, 0], None, None) {
        Err(Error::HostBufferTooSmall { required: 4, len: 3 }) => (),
        other => panic!("unexpected result: {:?}", other),
    }
    match grid.write_rect(&queue, &host[..5], &[2, 2], &[], &[1, 1], [4, 0], [2, 0], None,
            None) {
        Err(Error::HostBufferTooSmall { required: 7, len: 5 }) => (),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn huge_rect_geometry_is_rejected() {
    let (_, context, queue) = gpu_setup();
    let grid = Buffer::new(&context, MemFlags::READ_WRITE, 16, Some(&ramp(16)[..])).unwrap();
    let mut host = vec![0.0f32; 16];

    let invalid = |res: crate::Result<()>| match res {
        Err(Error::InvalidArgument(msg)) => msg,
        other => panic!("unexpected result: {:?}", other),
    };

    let msg = invalid(grid.read_rect(&queue, &mut host, &[2, 2], &[usize::MAX, 0], &[],
        [4, 0], [0, 0], None, None));
    assert!(msg.starts_with("Rectangle out of range"));
    let msg = invalid(grid.read_rect(&queue, &mut host, &[2, 2], &[], &[0, usize::MAX],
        [4, 0], [0, 0], None, None));
    assert!(msg.starts_with("Rectangle out of range"));

    // The region height times the row pitch:
    let msg = invalid(grid.read_rect(&queue, &mut host, &[2, 2], &[], &[], [usize::MAX, 0],
        [0, 0], None, None));
    assert!(msg.ends_with("overflows."));
    // A slice pitch of `usize::MAX` elements does not fit in bytes:
    let msg = invalid(grid.read_rect(&queue, &mut host, &[2, 1], &[], &[], [4, usize::MAX],
        [0, 0], None, None));
    assert!(msg.ends_with("overflows in bytes."));

    let dst = Buffer::<f32>::new(&context, MemFlags::READ_WRITE, 16, None).unwrap();
    invalid(dst.copy_rect_from(&queue, &grid, &[2, 2, 2], &[], &[], [4, usize::MAX / 2],
        [0, 0], None, None));
    assert_eq!(mock::call_count("clEnqueueReadBufferRect"), 0);
    assert_eq!(mock::call_count("clEnqueueCopyBufferRect"), 0);
}

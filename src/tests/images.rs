//! Images: creation, transfers, fills, and copies to and from buffers.

use clbind_core::mock;
use crate::{Image, Buffer, MemFlags, ImageFormat, ImageDescriptor, ImageChannelOrder,
    ImageChannelDataType, MemObjectType, ImageInfo, Context, Error, Status};
use super::{gpu_setup, ramp};


fn rgba8() -> ImageFormat {
    ImageFormat::new(ImageChannelOrder::Rgba, ImageChannelDataType::UnormInt8)
}

fn r_float() -> ImageFormat {
    ImageFormat::new(ImageChannelOrder::R, ImageChannelDataType::Float)
}

fn desc_2d(width: usize, height: usize) -> ImageDescriptor {
    ImageDescriptor::new(MemObjectType::Image2d, width, height, 1, 1, 0, 0, None)
}

fn image_4x4(context: &Context, format: ImageFormat) -> Image {
    Image::new::<u8>(context, MemFlags::READ_WRITE, format, desc_2d(4, 4), None).unwrap()
}


#[test]
fn write_then_read_regions() {
    let (_, context, queue) = gpu_setup();
    let image = image_4x4(&context, rgba8());
    assert_eq!(image.dims(), [4, 4, 1]);
    assert_eq!(image.pixel_count(), 16);
    assert_eq!(image.format(), rgba8());
    assert_eq!(image.info(ImageInfo::ElementSize).unwrap().as_size(), Some(4));
    assert_eq!(image.info(ImageInfo::RowPitch).unwrap().as_size(), Some(16));
    assert_eq!(image.info(ImageInfo::Width).unwrap().as_size(), Some(4));

    let pixels: Vec<u8> = (0..64).collect();
    image.write(&queue, &pixels, [0, 0, 0], [4, 4, 1], 0, 0, None, None).unwrap();

    let mut all = vec![0u8; 64];
    image.read(&queue, &mut all, [0, 0, 0], [4, 4, 1], 0, 0, None, None).unwrap();
    assert_eq!(all, pixels);

    // The middle 2 x 2 pixels:
    let mut middle = vec![0u8; 16];
    image.read(&queue, &mut middle, [1, 1, 0], [2, 2, 1], 0, 0, None, None).unwrap();
    let expected: Vec<u8> = (20..28).chain(36..44).collect();
    assert_eq!(middle, expected);

    // Padded host rows of 12 bytes:
    let mut padded = vec![0u8; 20];
    image.read(&queue, &mut padded, [1, 1, 0], [2, 2, 1], 12, 0, None, None).unwrap();
    assert_eq!(&padded[..8], &expected[..8]);
    assert_eq!(&padded[12..], &expected[8..]);

    // Any element type will do for the host side:
    let mut words = vec![0u32; 16];
    image.read(&queue, &mut words, [0, 0, 0], [4, 4, 1], 0, 0, None, None).unwrap();
    assert_eq!(words[1], u32::from_ne_bytes([4, 5, 6, 7]));
}

#[test]
fn host_data_and_sizes_are_checked() {
    let (_, context, queue) = gpu_setup();
    let pixels: Vec<u8> = (0..64).collect();
    let image = Image::new(&context, MemFlags::READ_ONLY, rgba8(), desc_2d(4, 4),
        Some(&pixels[..])).unwrap();
    assert!(image.flags().contains(MemFlags::COPY_HOST_PTR));
    let mut out = vec![0u8; 64];
    image.read(&queue, &mut out, [0, 0, 0], [4, 4, 1], 0, 0, None, None).unwrap();
    assert_eq!(out, pixels);

    match Image::new(&context, MemFlags::READ_WRITE, rgba8(), desc_2d(4, 4),
            Some(&pixels[..60])) {
        Err(Error::HostBufferTooSmall { required: 64, len: 60 }) => (),
        other => panic!("unexpected result: {:?}", other),
    }
    match image.read(&queue, &mut out[..19], [0, 0, 0], [2, 2, 1], 12, 0, None, None) {
        Err(Error::HostBufferTooSmall { required: 20, len: 19 }) => (),
        other => panic!("unexpected result: {:?}", other),
    }
    let mut words = vec![0u32; 15];
    match image.read(&queue, &mut words, [0, 0, 0], [4, 4, 1], 0, 0, None, None) {
        Err(Error::HostBufferTooSmall { required: 16, len: 15 }) => (),
        other => panic!("unexpected result: {:?}", other),
    }
    match image.read(&queue, &mut out, [0, 0, 0], [2, 2, 1], 4, 0, None, None) {
        Err(Error::InvalidArgument(msg)) => assert!(msg.starts_with("Row pitch (4)")),
        other => panic!("unexpected result: {:?}", other),
    }
    match image.read(&queue, &mut out, [3, 0, 0], [2, 1, 1], 0, 0, None, None) {
        Err(Error::InvalidArgument(msg)) =>
            assert!(msg.starts_with("Image region out of range")),
        other => panic!("unexpected result: {:?}", other),
    }
    assert!(image.read(&queue, &mut out, [0, 0, 0], [0, 1, 1], 0, 0, None, None).is_err());
}

#[test]
fn creation_errors() {
    let (_, context, _) = gpu_setup();

    let rgb = ImageFormat::new(ImageChannelOrder::Rgb, ImageChannelDataType::UnormInt8);
    let err = Image::new::<u8>(&context, MemFlags::READ_WRITE, rgb, desc_2d(4, 4), None)
        .unwrap_err();
    assert_eq!(err.api_status(), Some(Status::CL_IMAGE_FORMAT_NOT_SUPPORTED));

    match Image::new::<u8>(&context, MemFlags::READ_WRITE, rgba8(), desc_2d(0, 4), None) {
        Err(Error::InvalidArgument(_)) => (),
        other => panic!("unexpected result: {:?}", other),
    }
    match Image::new(&context, MemFlags::USE_HOST_PTR, rgba8(), desc_2d(1, 1),
            Some(&[0u8; 4][..])) {
        Err(Error::InvalidArgument(_)) => (),
        other => panic!("unexpected result: {:?}", other),
    }

    let formats = Image::supported_formats(&context, MemFlags::READ_WRITE,
        MemObjectType::Image2d).unwrap();
    assert!(formats.contains(&rgba8()));
    assert!(!formats.contains(&rgb));
}

#[test]
fn fill_regions() {
    let (_, context, queue) = gpu_setup();
    let image = image_4x4(&context, r_float());
    image.fill(&queue, [0.0f32; 4], [0, 0, 0], [4, 4, 1], None, None).unwrap();
    image.fill(&queue, [2.5f32, 0.0, 0.0, 1.0], [2, 2, 0], [2, 2, 1], None, None).unwrap();

    let mut out = vec![0.0f32; 16];
    image.read(&queue, &mut out, [0, 0, 0], [4, 4, 1], 0, 0, None, None).unwrap();
    for (idx, &val) in out.iter().enumerate() {
        let (x, y) = (idx % 4, idx / 4);
        assert_eq!(val, if x >= 2 && y >= 2 { 2.5 } else { 0.0 }, "pixel ({}, {})", x, y);
    }

    let colors = image_4x4(&context, rgba8());
    colors.fill(&queue, [1.0f32, 0.0, 0.0, 1.0], [0, 0, 0], [1, 1, 1], None, None).unwrap();
    let mut pixel = vec![0u8; 4];
    colors.read(&queue, &mut pixel, [0, 0, 0], [1, 1, 1], 0, 0, None, None).unwrap();
    assert_eq!(pixel, vec![255, 0, 0, 255]);

    assert!(image.fill(&queue, [0.0f32; 4], [3, 3, 0], [2, 2, 1], None, None).is_err());
}

#[test]
fn fill_colors_are_four_byte_channels() {
    let (_, context, queue) = gpu_setup();
    let image = Image::new::<u8>(&context, MemFlags::READ_WRITE,
        ImageFormat::new(ImageChannelOrder::Rgba, ImageChannelDataType::UnsignedInt8),
        desc_2d(1, 1), None).unwrap();

    match image.fill(&queue, [200u8, 201, 202, 203], [0, 0, 0], [1, 1, 1], None, None) {
        Err(Error::InvalidArgument(msg)) => assert!(msg.contains("element size of 1 bytes")),
        other => panic!("unexpected result: {:?}", other),
    }
    assert!(image.fill(&queue, [1.0f64; 4], [0, 0, 0], [1, 1, 1], None, None).is_err());
    assert_eq!(mock::call_count("clEnqueueFillImage"), 0);

    image.fill(&queue, [200u32, 201, 202, 203], [0, 0, 0], [1, 1, 1], None, None).unwrap();
    let mut pixel = vec![0u8; 4];
    image.read(&queue, &mut pixel, [0, 0, 0], [1, 1, 1], 0, 0, None, None).unwrap();
    assert_eq!(pixel, vec![200, 201, 202, 203]);
}

#[test]
fn huge_origins_and_pitches_are_rejected() {
    let (_, context, queue) = gpu_setup();
    let image = image_4x4(&context, r_float());
    let mut out = vec![0.0f32; 16];

    assert!(image.fill(&queue, [0.0f32; 4], [usize::MAX, 0, 0], [2, 2, 1], None, None)
        .is_err());
    assert!(image.read(&queue, &mut out, [0, usize::MAX, 0], [1, 1, 1], 0, 0, None, None)
        .is_err());
    assert!(image.read(&queue, &mut out, [0, 0, 0], [1, usize::MAX, 1], 0, 0, None, None)
        .is_err());
    match image.read(&queue, &mut out, [0, 0, 0], [4, 4, 1], usize::MAX, 0, None, None) {
        Err(Error::InvalidArgument(msg)) => assert!(msg.starts_with("Host pitches overflow")),
        other => panic!("unexpected result: {:?}", other),
    }

    let volume = Image::new::<f32>(&context, MemFlags::READ_WRITE, r_float(),
        ImageDescriptor::new(MemObjectType::Image3d, 2, 2, 2, 1, 0, 0, None), None).unwrap();
    match volume.read(&queue, &mut out, [0, 0, 0], [2, 2, 2], 0, usize::MAX, None, None) {
        Err(Error::InvalidArgument(msg)) => assert!(msg.starts_with("Host region")),
        other => panic!("unexpected result: {:?}", other),
    }

    let dst = Buffer::<f32>::new(&context, MemFlags::READ_WRITE, 16, None).unwrap();
    assert!(image.copy_to_buffer(&queue, &dst, [0, 0, 0], [1, 1, 1], usize::MAX, None, None)
        .is_err());
    assert!(image.copy_from_buffer(&queue, &dst, usize::MAX, [0, 0, 0], [1, 1, 1], None, None)
        .is_err());
    assert_eq!(mock::call_count("clEnqueueReadImage"), 0);
}

#[test]
fn copy_between_images() {
    let (_, context, queue) = gpu_setup();
    let src = image_4x4(&context, r_float());
    let dst = image_4x4(&context, r_float());
    src.write(&queue, &ramp(16), [0, 0, 0], [4, 4, 1], 0, 0, None, None).unwrap();
    dst.fill(&queue, [-1.0f32; 4], [0, 0, 0], [4, 4, 1], None, None).unwrap();

    dst.copy_from(&queue, &src, [2, 2, 0], [0, 0, 0], [2, 2, 1], None, None).unwrap();
    let mut out = vec![0.0f32; 4];
    dst.read(&queue, &mut out, [0, 0, 0], [2, 2, 1], 0, 0, None, None).unwrap();
    assert_eq!(out, vec![10.0, 11.0, 14.0, 15.0]);

    let other = image_4x4(&context, rgba8());
    match other.copy_from(&queue, &src, [0, 0, 0], [0, 0, 0], [1, 1, 1], None, None) {
        Err(Error::InvalidArgument(msg)) => assert!(msg.starts_with("Image formats differ")),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn copy_to_and_from_buffers() {
    let (_, context, queue) = gpu_setup();
    let image = image_4x4(&context, r_float());
    let src = Buffer::new(&context, MemFlags::READ_ONLY, 16, Some(&ramp(16)[..])).unwrap();

    image.copy_from_buffer(&queue, &src, 0, [0, 0, 0], [4, 4, 1], None, None).unwrap();
    let mut out = vec![0.0f32; 16];
    image.read(&queue, &mut out, [0, 0, 0], [4, 4, 1], 0, 0, None, None).unwrap();
    assert_eq!(out, ramp(16));

    let dst = Buffer::<f32>::new(&context, MemFlags::READ_WRITE, 8, None).unwrap();
    dst.fill(&queue, &[0.0], 0, 0, None, None).unwrap();
    image.copy_to_buffer(&queue, &dst, [1, 1, 0], [2, 2, 1], 4, None, None).unwrap();
    let mut out = vec![0.0f32; 8];
    dst.read(&queue, &mut out, 0, 0, None, None).unwrap();
    assert_eq!(out, vec![0.0, 0.0, 0.0, 0.0, 5.0, 6.0, 9.0, 10.0]);

    match image.copy_to_buffer(&queue, &dst, [0, 0, 0], [4, 4, 1], 0, None, None) {
        Err(Error::InvalidArgument(msg)) => assert_eq!(msg, "Destination buffer is too small: \
            64 bytes at element 0 (buffer size: 32 bytes)."),
        other => panic!("unexpected result: {:?}", other),
    }
    match image.copy_from_buffer(&queue, &dst, 5, [0, 0, 0], [2, 2, 1], None, None) {
        Err(Error::InvalidArgument(msg)) =>
            assert!(msg.starts_with("Source buffer is too small")),
        other => panic!("unexpected result: {:?}", other),
    }
}

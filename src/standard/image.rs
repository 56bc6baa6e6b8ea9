//! An OpenCL image.

use std::mem;
use std::ops::Deref;
use clbind_core::{self as core, Mem as MemCore, MemFlags, MemInfo, ImageInfo, ImageFormat,
    ImageDescriptor, MemObjectType, InfoResult, OclPrm};
use crate::error::{Error, Result};
use crate::standard::{Context, Queue, EventList, Buffer};


/// An image in device memory.
///
/// Origins and regions are in pixels, `[x, y, z]` (unused dimensions take
/// origin zero and size one). Host pitches are in bytes, zero selecting the
/// tightly packed default. The host slices passed to `read` and `write` may
/// use any element type (typically the channel type of the image format).
#[derive(Clone, Debug)]
pub struct Image {
    obj_core: MemCore,
    format: ImageFormat,
    desc: ImageDescriptor,
    flags: MemFlags,
}

impl Image {
    /// Returns the image formats supported by `context` for images of
    /// `image_type` created with `flags`.
    pub fn supported_formats(context: &Context, flags: MemFlags, image_type: MemObjectType)
            -> Result<Vec<ImageFormat>>
    {
        context.supported_image_formats(flags, image_type)
    }

    /// Creates an image.
    ///
    /// When `host_data` is given it supplies the initial contents, laid out
    /// with the row and slice pitches of `desc` (`COPY_HOST_PTR` is added to
    /// `flags`). `USE_HOST_PTR` is not accepted.
    pub fn new<T: OclPrm>(context: &Context, flags: MemFlags, format: ImageFormat,
            desc: ImageDescriptor, host_data: Option<&[T]>) -> Result<Image>
    {
        if flags.contains(MemFlags::USE_HOST_PTR) {
            return Err(Error::invalid("Image::new: `MemFlags::USE_HOST_PTR` is not \
                supported, the host data is not guaranteed to outlive the image."));
        }
        if desc.region().iter().any(|&d| d == 0) {
            return Err(Error::invalid(format!("Image::new: invalid image dimensions: {:?}.",
                desc.region())));
        }

        let flags = match host_data {
            Some(data) => {
                let (row_pitch, slc_pitch) = host_pitches(&format, &desc.region(),
                    desc.image_row_pitch, desc.image_slice_pitch)?;
                let required = host_extent_bytes(&format, &desc.region(), row_pitch, slc_pitch)?;
                check_host_len::<T>(required, data.len())?;
                flags | MemFlags::COPY_HOST_PTR
            },
            None => flags,
        };

        let obj_core = unsafe { core::create_image(context, flags, &format, &desc, host_data)? };
        Ok(Image { obj_core, format, desc, flags })
    }

    /// Checks that `origin` and `region` lie within the image.
    fn check_region(&self, origin: [usize; 3], region: [usize; 3]) -> Result<()> {
        let dims = self.desc.region();
        for d in 0..3 {
            if region[d] == 0 {
                return Err(Error::invalid(format!("Invalid image region: {:?} (sizes must be \
                    non-zero).", region)));
            }
            if region[d] > dims[d] || origin[d] > dims[d] - region[d] {
                return Err(Error::invalid(format!("Image region out of range: origin {:?}, \
                    region {:?}, image dimensions {:?}.", origin, region, dims)));
            }
        }
        Ok(())
    }

    /// Reads `region` at `origin` into `data` and blocks until it completes.
    pub fn read<T: OclPrm>(&self, queue: &Queue, data: &mut [T], origin: [usize; 3],
            region: [usize; 3], row_pitch: usize, slc_pitch: usize,
            events: Option<&mut EventList>, wait: Option<&EventList>) -> Result<()>
    {
        unsafe {
            self.enqueue_read(queue, true, data, origin, region, row_pitch, slc_pitch, events,
                wait)
        }
    }

    /// Enqueues a read of `region` at `origin` into `data`.
    ///
    /// ## Safety
    ///
    /// If `block` is false, `data` must not be touched or dropped until the
    /// read completes.
    pub unsafe fn enqueue_read<T: OclPrm>(&self, queue: &Queue, block: bool, data: &mut [T],
            origin: [usize; 3], region: [usize; 3], row_pitch: usize, slc_pitch: usize,
            events: Option<&mut EventList>, wait: Option<&EventList>) -> Result<()>
    {
        self.check_region(origin, region)?;
        let (row_pitch, slc_pitch) = host_pitches(&self.format, &region, row_pitch, slc_pitch)?;
        let required = host_extent_bytes(&self.format, &region, row_pitch, slc_pitch)?;
        check_host_len::<T>(required, data.len())?;

        EventList::enqueue_with(events, |sink| {
            core::enqueue_read_image(queue, &self.obj_core, block, origin, region, row_pitch,
                slc_pitch, data, wait, sink)
        })
    }

    /// Writes `data` into `region` at `origin` and blocks until it completes.
    pub fn write<T: OclPrm>(&self, queue: &Queue, data: &[T], origin: [usize; 3],
            region: [usize; 3], row_pitch: usize, slc_pitch: usize,
            events: Option<&mut EventList>, wait: Option<&EventList>) -> Result<()>
    {
        unsafe {
            self.enqueue_write(queue, true, data, origin, region, row_pitch, slc_pitch, events,
                wait)
        }
    }

    /// Enqueues a write of `data` into `region` at `origin`.
    ///
    /// ## Safety
    ///
    /// If `block` is false, `data` must not be modified or dropped until the
    /// write completes.
    pub unsafe fn enqueue_write<T: OclPrm>(&self, queue: &Queue, block: bool, data: &[T],
            origin: [usize; 3], region: [usize; 3], row_pitch: usize, slc_pitch: usize,
            events: Option<&mut EventList>, wait: Option<&EventList>) -> Result<()>
    {
        self.check_region(origin, region)?;
        let (row_pitch, slc_pitch) = host_pitches(&self.format, &region, row_pitch, slc_pitch)?;
        let required = host_extent_bytes(&self.format, &region, row_pitch, slc_pitch)?;
        check_host_len::<T>(required, data.len())?;

        EventList::enqueue_with(events, |sink| {
            core::enqueue_write_image(queue, &self.obj_core, block, origin, region, row_pitch,
                slc_pitch, data, wait, sink)
        })
    }

    /// Fills `region` at `origin` with `color`.
    ///
    /// `color` is RGBA: `f32` for normalized and float formats, `i32` or
    /// `u32` for the integer formats.
    pub fn fill<T: OclPrm>(&self, queue: &Queue, color: [T; 4], origin: [usize; 3],
            region: [usize; 3], events: Option<&mut EventList>, wait: Option<&EventList>)
            -> Result<()>
    {
        if mem::size_of::<T>() != 4 {
            return Err(Error::invalid(format!("Image fill colors must be `f32`, `i32`, or \
                `u32` (found an element size of {} bytes).", mem::size_of::<T>())));
        }
        self.check_region(origin, region)?;
        EventList::enqueue_with(events, |sink| {
            core::enqueue_fill_image(queue, &self.obj_core, &color[..], origin, region, wait,
                sink)
        })
    }

    /// Copies `region` of `src` at `src_origin` into this image at
    /// `dst_origin`. Both images must have the same format.
    pub fn copy_from(&self, queue: &Queue, src: &Image, src_origin: [usize; 3],
            dst_origin: [usize; 3], region: [usize; 3], events: Option<&mut EventList>,
            wait: Option<&EventList>) -> Result<()>
    {
        if src.format != self.format {
            return Err(Error::invalid(format!("Image formats differ: {:?} (source), {:?} \
                (destination).", src.format, self.format)));
        }
        src.check_region(src_origin, region)?;
        self.check_region(dst_origin, region)?;
        EventList::enqueue_with(events, |sink| {
            core::enqueue_copy_image(queue, &src.obj_core, &self.obj_core, src_origin,
                dst_origin, region, wait, sink)
        })
    }

    /// Copies `region` at `src_origin` into `dst` starting at element
    /// `dst_offset`, pixels packed tightly.
    pub fn copy_to_buffer<T: OclPrm>(&self, queue: &Queue, dst: &Buffer<T>,
            src_origin: [usize; 3], region: [usize; 3], dst_offset: usize,
            events: Option<&mut EventList>, wait: Option<&EventList>) -> Result<()>
    {
        self.check_region(src_origin, region)?;
        let len_bytes = self.region_bytes(&region);
        if dst_offset > dst.len() || len_bytes > (dst.len() - dst_offset) * mem::size_of::<T>() {
            return Err(Error::invalid(format!("Destination buffer is too small: {} bytes at \
                element {} (buffer size: {} bytes).", len_bytes, dst_offset, dst.size_bytes())));
        }
        let offset_bytes = dst_offset * mem::size_of::<T>();
        EventList::enqueue_with(events, |sink| {
            core::enqueue_copy_image_to_buffer(queue, &self.obj_core, dst.core(), src_origin,
                region, offset_bytes, wait, sink)
        })
    }

    /// Copies tightly packed pixels from `src` starting at element
    /// `src_offset` into `region` at `dst_origin`.
    pub fn copy_from_buffer<T: OclPrm>(&self, queue: &Queue, src: &Buffer<T>,
            src_offset: usize, dst_origin: [usize; 3], region: [usize; 3],
            events: Option<&mut EventList>, wait: Option<&EventList>) -> Result<()>
    {
        self.check_region(dst_origin, region)?;
        let len_bytes = self.region_bytes(&region);
        if src_offset > src.len() || len_bytes > (src.len() - src_offset) * mem::size_of::<T>() {
            return Err(Error::invalid(format!("Source buffer is too small: {} bytes at \
                element {} (buffer size: {} bytes).", len_bytes, src_offset, src.size_bytes())));
        }
        let offset_bytes = src_offset * mem::size_of::<T>();
        EventList::enqueue_with(events, |sink| {
            core::enqueue_copy_buffer_to_image(queue, src.core(), &self.obj_core, offset_bytes,
                dst_origin, region, wait, sink)
        })
    }

    fn region_bytes(&self, region: &[usize; 3]) -> usize {
        region[0] * region[1] * region[2] * self.format.pixel_bytes()
    }

    /// Returns the image format.
    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// Returns the descriptor the image was created with.
    pub fn descriptor(&self) -> &ImageDescriptor {
        &self.desc
    }

    /// Returns the `[width, height, depth]` region covering the whole image.
    pub fn dims(&self) -> [usize; 3] {
        self.desc.region()
    }

    /// Returns the total number of pixels.
    pub fn pixel_count(&self) -> usize {
        let dims = self.dims();
        dims[0] * dims[1] * dims[2]
    }

    pub fn flags(&self) -> MemFlags {
        self.flags
    }

    /// Returns image info.
    pub fn info(&self, info_kind: ImageInfo) -> Result<InfoResult> {
        core::get_image_info(&self.obj_core, info_kind).map_err(Error::from)
    }

    /// Returns info about the underlying memory object.
    pub fn mem_info(&self, info_kind: MemInfo) -> Result<InfoResult> {
        core::get_mem_object_info(&self.obj_core, info_kind).map_err(Error::from)
    }

    /// Returns a reference to the core pointer wrapper, usable by functions in
    /// the `core` module.
    #[inline]
    pub fn core(&self) -> &MemCore {
        &self.obj_core
    }

    fn fmt_info(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Image")
            .field("ElementSize", &self.info(ImageInfo::ElementSize))
            .field("RowPitch", &self.info(ImageInfo::RowPitch))
            .field("SlicePitch", &self.info(ImageInfo::SlicePitch))
            .field("Width", &self.info(ImageInfo::Width))
            .field("Height", &self.info(ImageInfo::Height))
            .field("Depth", &self.info(ImageInfo::Depth))
            .field("ArraySize", &self.info(ImageInfo::ArraySize))
            .field("Format", &self.info(ImageInfo::Format))
            .field("Size", &self.mem_info(MemInfo::Size))
            .finish()
    }
}

/// Resolves host row and slice pitches (bytes) for `region`.
fn host_pitches(format: &ImageFormat, region: &[usize; 3], row_pitch: usize, slc_pitch: usize)
        -> Result<(usize, usize)>
{
    let overflow = || Error::invalid(format!("Host pitches overflow: region {:?}, row pitch \
        {}, slice pitch {}.", region, row_pitch, slc_pitch));

    let tight_row = region[0].checked_mul(format.pixel_bytes()).ok_or_else(overflow)?;
    let row_pitch = if row_pitch == 0 { tight_row } else { row_pitch };
    if row_pitch < tight_row {
        return Err(Error::invalid(format!("Row pitch ({}) is smaller than the region width in \
            bytes ({}).", row_pitch, tight_row)));
    }
    let tight_slc = region[1].checked_mul(row_pitch).ok_or_else(overflow)?;
    let slc_pitch = if slc_pitch == 0 { tight_slc } else { slc_pitch };
    if slc_pitch < tight_slc {
        return Err(Error::invalid(format!("Slice pitch ({}) is smaller than the region height \
            times the row pitch ({}).", slc_pitch, tight_slc)));
    }
    Ok((row_pitch, slc_pitch))
}

fn host_extent_bytes(format: &ImageFormat, region: &[usize; 3], row_pitch: usize,
        slc_pitch: usize) -> Result<usize>
{
    let extent = (|| {
        (region[2] - 1).checked_mul(slc_pitch)?
            .checked_add((region[1] - 1).checked_mul(row_pitch)?)?
            .checked_add(region[0].checked_mul(format.pixel_bytes())?)
    })();
    extent.ok_or_else(|| Error::invalid(format!("Host region {:?} overflows with pitches \
        [{}, {}].", region, row_pitch, slc_pitch)))
}

fn check_host_len<T>(required_bytes: usize, len: usize) -> Result<()> {
    let elem_size = mem::size_of::<T>();
    let required = required_bytes / elem_size + (required_bytes % elem_size != 0) as usize;
    if len < required {
        return Err(Error::HostBufferTooSmall { required, len });
    }
    Ok(())
}

impl std::fmt::Display for Image {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        self.fmt_info(f)
    }
}

impl AsRef<MemCore> for Image {
    fn as_ref(&self) -> &MemCore {
        &self.obj_core
    }
}

impl Deref for Image {
    type Target = MemCore;

    fn deref(&self) -> &MemCore {
        &self.obj_core
    }
}

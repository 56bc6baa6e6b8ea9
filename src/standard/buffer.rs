//! A buffer of elements of `T` in device memory.

use std::mem;
use std::marker::PhantomData;
use std::ops::Deref;
use clbind_core::{self as core, Mem as MemCore, MemFlags, MemInfo, BufferRegion, InfoResult,
    OclPrm, MemDestructorCallback};
use crate::error::{Error, Result};
use crate::standard::{Context, Queue, EventList};


/// Row and slice pitches of one side of a rectangular transfer, in
/// elements. Zero selects the tightly packed default.
pub type Pitches = [usize; 2];

/// The validated geometry of one side of a rectangular transfer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct RectSide {
    origin: [usize; 3],
    row_pitch: usize,
    slc_pitch: usize,
}

impl RectSide {
    /// Resolves `origin` (up to three coordinates, missing ones zero) and
    /// `pitches` against `region`. The pitches of the result are known to
    /// fit in bytes of `T`.
    fn new<T>(side: &str, region: &[usize; 3], origin: &[usize], pitches: Pitches)
            -> Result<RectSide>
    {
        if origin.len() > 3 {
            return Err(Error::invalid(format!("{} origin has {} dimensions (at most 3).", side,
                origin.len())));
        }
        let origin = super::to_3d(origin, 0);

        let row_pitch = if pitches[0] == 0 { region[0] } else { pitches[0] };
        if row_pitch < region[0] {
            return Err(Error::invalid(format!("{} row pitch ({}) is smaller than the region \
                width ({}).", side, row_pitch, region[0])));
        }

        let min_slc_pitch = region[1].checked_mul(row_pitch).ok_or_else(|| {
            Error::invalid(format!("{} region height ({}) times the row pitch ({}) overflows.",
                side, region[1], row_pitch))
        })?;
        let slc_pitch = if pitches[1] == 0 { min_slc_pitch } else { pitches[1] };
        if slc_pitch < min_slc_pitch {
            return Err(Error::invalid(format!("{} slice pitch ({}) is smaller than the region \
                height times the row pitch ({}).", side, slc_pitch, min_slc_pitch)));
        }

        if slc_pitch.checked_mul(mem::size_of::<T>()).is_none() {
            return Err(Error::invalid(format!("{} slice pitch ({}) overflows in bytes.", side,
                slc_pitch)));
        }

        Ok(RectSide { origin, row_pitch, slc_pitch })
    }

    /// Returns the number of elements needed to hold the last element this
    /// side touches.
    fn extent(&self, region: &[usize; 3]) -> Result<usize> {
        let last = |d: usize| self.origin[d].checked_add(region[d] - 1);
        let extent = (|| {
            last(2)?.checked_mul(self.slc_pitch)?
                .checked_add(last(1)?.checked_mul(self.row_pitch)?)?
                .checked_add(last(0)?)?
                .checked_add(1)
        })();
        extent.ok_or_else(|| Error::invalid(format!("Rectangle out of range: origin {:?}, \
            region {:?}, pitches [{}, {}].", self.origin, region, self.row_pitch,
            self.slc_pitch)))
    }

    // `new` checks the slice pitch in bytes and the row pitch never exceeds it:
    fn row_pitch_bytes<T>(&self) -> usize {
        self.row_pitch * mem::size_of::<T>()
    }

    fn slc_pitch_bytes<T>(&self) -> usize {
        self.slc_pitch * mem::size_of::<T>()
    }
}

/// Checks a rectangular region: one to three sizes, each non-zero. Missing
/// dimensions are one.
fn rect_region(region: &[usize]) -> Result<[usize; 3]> {
    if region.is_empty() || region.len() > 3 {
        return Err(Error::invalid(format!("Invalid region: {} dimensions (1 to 3 allowed).",
            region.len())));
    }
    if region.iter().any(|&r| r == 0) {
        return Err(Error::invalid(format!("Invalid region: {:?} (sizes must be non-zero).",
            region)));
    }
    Ok(super::to_3d(region, 1))
}


/// A buffer of `len` elements of `T` in device memory.
///
/// Offsets, lengths, origins, regions, and pitches taken by its methods are
/// all in elements of `T`. Every argument is checked before a command is
/// enqueued.
#[derive(Clone, Debug)]
pub struct Buffer<T: OclPrm> {
    obj_core: MemCore,
    len: usize,
    flags: MemFlags,
    _data: PhantomData<T>,
}

impl<T: OclPrm> Buffer<T> {
    /// Creates a buffer of `len` elements.
    ///
    /// If `host_data` is given its first `len` elements become the initial
    /// contents (`COPY_HOST_PTR` is added to `flags`). `USE_HOST_PTR` is not
    /// accepted: use `clbind_core::create_buffer` directly for it.
    pub fn new(context: &Context, flags: MemFlags, len: usize, host_data: Option<&[T]>)
            -> Result<Buffer<T>>
    {
        if len == 0 {
            return Err(Error::invalid("Buffer::new: length must be non-zero."));
        }
        if len.checked_mul(mem::size_of::<T>()).is_none() {
            return Err(Error::invalid(format!("Buffer::new: length ({}) overflows in bytes.",
                len)));
        }
        if flags.contains(MemFlags::USE_HOST_PTR) {
            return Err(Error::invalid("Buffer::new: `MemFlags::USE_HOST_PTR` is not \
                supported, the host data is not guaranteed to outlive the buffer."));
        }

        let (flags, host_data) = match host_data {
            Some(data) => {
                if data.len() < len {
                    return Err(Error::HostBufferTooSmall { required: len, len: data.len() });
                }
                (flags | MemFlags::COPY_HOST_PTR, Some(&data[..len]))
            },
            None => (flags, None),
        };

        // No host pointer is kept past this call:
        let obj_core = unsafe { core::create_buffer(context, flags, len, host_data)? };

        Ok(Buffer { obj_core, len, flags, _data: PhantomData })
    }

    /// Resolves a `len` / `offset` pair: a zero `len` covers the rest of
    /// the buffer after `offset`.
    fn span(&self, len: usize, offset: usize) -> Result<usize> {
        if offset > self.len {
            return Err(Error::invalid(format!("Offset ({}) is past the end of the buffer ({}).",
                offset, self.len)));
        }
        let len = if len == 0 { self.len - offset } else { len };
        if len > self.len - offset {
            return Err(Error::invalid(format!("Size is too large: {} + {} > {}.", len, offset,
                self.len)));
        }
        Ok(len)
    }

    /// Reads `len` elements starting at `offset` into the start of `data`
    /// and blocks until the read completes.
    ///
    /// A zero `len` reads from `offset` to the end of the buffer.
    pub fn read(&self, queue: &Queue, data: &mut [T], len: usize, offset: usize,
            events: Option<&mut EventList>, wait: Option<&EventList>) -> Result<()>
    {
        unsafe { self.enqueue_read(queue, true, data, len, offset, events, wait) }
    }

    /// Enqueues a read of `len` elements starting at `offset` into the start
    /// of `data`.
    ///
    /// ## Safety
    ///
    /// If `block` is false, `data` must not be touched or dropped until the
    /// read completes (see the event appended to `events`).
    pub unsafe fn enqueue_read(&self, queue: &Queue, block: bool, data: &mut [T], len: usize,
            offset: usize, events: Option<&mut EventList>, wait: Option<&EventList>)
            -> Result<()>
    {
        let len = self.span(len, offset)?;
        if data.len() < len {
            return Err(Error::HostBufferTooSmall { required: len, len: data.len() });
        }
        let data = &mut data[..len];
        EventList::enqueue_with(events, |sink| {
            core::enqueue_read_buffer(queue, &self.obj_core, block, offset, data, wait, sink)
        })
    }

    /// Writes `len` elements from the start of `data` to the buffer starting
    /// at `offset` and blocks until the write completes.
    ///
    /// A zero `len` writes from `offset` to the end of the buffer.
    pub fn write(&self, queue: &Queue, data: &[T], len: usize, offset: usize,
            events: Option<&mut EventList>, wait: Option<&EventList>) -> Result<()>
    {
        unsafe { self.enqueue_write(queue, true, data, len, offset, events, wait) }
    }

    /// Enqueues a write of `len` elements from the start of `data`.
    ///
    /// ## Safety
    ///
    /// If `block` is false, `data` must not be modified or dropped until the
    /// write completes.
    pub unsafe fn enqueue_write(&self, queue: &Queue, block: bool, data: &[T], len: usize,
            offset: usize, events: Option<&mut EventList>, wait: Option<&EventList>)
            -> Result<()>
    {
        let len = self.span(len, offset)?;
        if data.len() < len {
            return Err(Error::HostBufferTooSmall { required: len, len: data.len() });
        }
        let data = &data[..len];
        EventList::enqueue_with(events, |sink| {
            core::enqueue_write_buffer(queue, &self.obj_core, block, offset, data, wait, sink)
        })
    }

    /// Reads a rectangular `region` of the buffer at `buffer_origin` into
    /// `data` at `host_origin` and blocks until it completes.
    ///
    /// `region` has one to three non-zero sizes; origins may be shorter than
    /// three (missing coordinates are zero). Pitches of zero select
    /// `region[0]` for rows and `region[1] * row_pitch` for slices.
    pub fn read_rect(&self, queue: &Queue, data: &mut [T], region: &[usize],
            buffer_origin: &[usize], host_origin: &[usize], buffer_pitches: Pitches,
            host_pitches: Pitches, events: Option<&mut EventList>, wait: Option<&EventList>)
            -> Result<()>
    {
        unsafe {
            self.enqueue_read_rect(queue, true, data, region, buffer_origin, host_origin,
                buffer_pitches, host_pitches, events, wait)
        }
    }

    /// Enqueues a rectangular read. See `read_rect`.
    ///
    /// ## Safety
    ///
    /// If `block` is false, `data` must not be touched or dropped until the
    /// read completes.
    pub unsafe fn enqueue_read_rect(&self, queue: &Queue, block: bool, data: &mut [T],
            region: &[usize], buffer_origin: &[usize], host_origin: &[usize],
            buffer_pitches: Pitches, host_pitches: Pitches, events: Option<&mut EventList>,
            wait: Option<&EventList>) -> Result<()>
    {
        let region = rect_region(region)?;
        let (buf, host) = self.rect_sides(&region, buffer_origin, buffer_pitches, host_origin,
            host_pitches, data.len())?;

        EventList::enqueue_with(events, |sink| {
            core::enqueue_read_buffer_rect(queue, &self.obj_core, block, buf.origin, host.origin,
                region, buf.row_pitch_bytes::<T>(), buf.slc_pitch_bytes::<T>(),
                host.row_pitch_bytes::<T>(), host.slc_pitch_bytes::<T>(), data, wait, sink)
        })
    }

    /// Writes a rectangular `region` of `data` at `host_origin` into the
    /// buffer at `buffer_origin` and blocks until it completes.
    ///
    /// See `read_rect` for the argument rules.
    pub fn write_rect(&self, queue: &Queue, data: &[T], region: &[usize],
            buffer_origin: &[usize], host_origin: &[usize], buffer_pitches: Pitches,
            host_pitches: Pitches, events: Option<&mut EventList>, wait: Option<&EventList>)
            -> Result<()>
    {
        unsafe {
            self.enqueue_write_rect(queue, true, data, region, buffer_origin, host_origin,
                buffer_pitches, host_pitches, events, wait)
        }
    }

    /// Enqueues a rectangular write. See `read_rect`.
    ///
    /// ## Safety
    ///
    /// If `block` is false, `data` must not be modified or dropped until the
    /// write completes.
    pub unsafe fn enqueue_write_rect(&self, queue: &Queue, block: bool, data: &[T],
            region: &[usize], buffer_origin: &[usize], host_origin: &[usize],
            buffer_pitches: Pitches, host_pitches: Pitches, events: Option<&mut EventList>,
            wait: Option<&EventList>) -> Result<()>
    {
        let region = rect_region(region)?;
        let (buf, host) = self.rect_sides(&region, buffer_origin, buffer_pitches, host_origin,
            host_pitches, data.len())?;

        EventList::enqueue_with(events, |sink| {
            core::enqueue_write_buffer_rect(queue, &self.obj_core, block, buf.origin,
                host.origin, region, buf.row_pitch_bytes::<T>(), buf.slc_pitch_bytes::<T>(),
                host.row_pitch_bytes::<T>(), host.slc_pitch_bytes::<T>(), data, wait, sink)
        })
    }

    /// Resolves and range checks both sides of a rectangular transfer
    /// between this buffer and `host_len` host elements.
    fn rect_sides(&self, region: &[usize; 3], buffer_origin: &[usize], buffer_pitches: Pitches,
            host_origin: &[usize], host_pitches: Pitches, host_len: usize)
            -> Result<(RectSide, RectSide)>
    {
        let buf = RectSide::new::<T>("Buffer", region, buffer_origin, buffer_pitches)?;
        let host = RectSide::new::<T>("Host", region, host_origin, host_pitches)?;

        let host_extent = host.extent(region)?;
        if host_extent > host_len {
            return Err(Error::HostBufferTooSmall { required: host_extent, len: host_len });
        }
        let buf_extent = buf.extent(region)?;
        if buf_extent > self.len {
            return Err(Error::invalid(format!("Buffer is too small: the region reaches element \
                {} of {}.", buf_extent, self.len)));
        }
        Ok((buf, host))
    }

    /// Fills `len` elements starting at `offset` with `pattern`, repeated.
    ///
    /// A zero `len` fills from `offset` to the end of the buffer. The
    /// pattern must be a power of two no larger than 128 bytes, and both
    /// `offset` and `len` must be multiples of `pattern.len()`.
    pub fn fill(&self, queue: &Queue, pattern: &[T], len: usize, offset: usize,
            events: Option<&mut EventList>, wait: Option<&EventList>) -> Result<()>
    {
        let pattern_bytes = pattern.len() * mem::size_of::<T>();
        if !pattern_bytes.is_power_of_two() || pattern_bytes > 128 {
            return Err(Error::invalid(format!("Fill pattern size must be a power of two no \
                larger than 128 bytes (found {} bytes).", pattern_bytes)));
        }
        let len = self.span(len, offset)?;
        if len % pattern.len() != 0 || offset % pattern.len() != 0 {
            return Err(Error::invalid(format!("Fill offset ({}) and length ({}) must be \
                multiples of the pattern length ({}).", offset, len, pattern.len())));
        }
        EventList::enqueue_with(events, |sink| {
            core::enqueue_fill_buffer(queue, &self.obj_core, pattern, offset, len, wait, sink)
        })
    }

    /// Copies `len` elements from `src` at `src_offset` into this buffer at
    /// `dst_offset`.
    ///
    /// A zero `len` copies from `src_offset` to the end of `src`.
    pub fn copy_from(&self, queue: &Queue, src: &Buffer<T>, len: usize, src_offset: usize,
            dst_offset: usize, events: Option<&mut EventList>, wait: Option<&EventList>)
            -> Result<()>
    {
        let len = src.span(len, src_offset)?;
        if dst_offset > self.len || len > self.len - dst_offset {
            return Err(Error::invalid(format!("Destination buffer is too small: {} + {} > {}.",
                len, dst_offset, self.len)));
        }
        EventList::enqueue_with(events, |sink| {
            core::enqueue_copy_buffer::<T, _, _>(queue, &src.obj_core, &self.obj_core,
                src_offset, dst_offset, len, wait, sink)
        })
    }

    /// Copies a rectangular `region` of `src` at `src_origin` into this
    /// buffer at `dst_origin`.
    ///
    /// See `read_rect` for the argument rules.
    pub fn copy_rect_from(&self, queue: &Queue, src: &Buffer<T>, region: &[usize],
            src_origin: &[usize], dst_origin: &[usize], src_pitches: Pitches,
            dst_pitches: Pitches, events: Option<&mut EventList>, wait: Option<&EventList>)
            -> Result<()>
    {
        let region = rect_region(region)?;
        let src_side = RectSide::new::<T>("Source", &region, src_origin, src_pitches)?;
        let dst_side = RectSide::new::<T>("Destination", &region, dst_origin, dst_pitches)?;

        let src_extent = src_side.extent(&region)?;
        if src_extent > src.len {
            return Err(Error::invalid(format!("Source buffer is too small: the region reaches \
                element {} of {}.", src_extent, src.len)));
        }
        let dst_extent = dst_side.extent(&region)?;
        if dst_extent > self.len {
            return Err(Error::invalid(format!("Destination buffer is too small: the region \
                reaches element {} of {}.", dst_extent, self.len)));
        }

        EventList::enqueue_with(events, |sink| {
            core::enqueue_copy_buffer_rect::<T, _, _>(queue, &src.obj_core, &self.obj_core,
                src_side.origin, dst_side.origin, region, src_side.row_pitch_bytes::<T>(),
                src_side.slc_pitch_bytes::<T>(), dst_side.row_pitch_bytes::<T>(),
                dst_side.slc_pitch_bytes::<T>(), wait, sink)
        })
    }

    /// Creates a sub-buffer sharing `len` elements of this buffer's storage
    /// starting at `origin`.
    ///
    /// The origin in bytes must be aligned to the device's
    /// `MemBaseAddrAlign`.
    pub fn create_sub_buffer(&self, flags: MemFlags, origin: usize, len: usize)
            -> Result<Buffer<T>>
    {
        if len == 0 || origin > self.len || len > self.len - origin {
            return Err(Error::invalid(format!("Invalid sub-buffer region: origin {}, length {} \
                (buffer length: {}).", origin, len, self.len)));
        }
        let elem_size = mem::size_of::<T>();
        let region = BufferRegion::new(origin * elem_size, len * elem_size);
        let obj_core = core::create_sub_buffer(&self.obj_core, flags, &region)?;

        let flags = match core::get_mem_object_info(&obj_core, MemInfo::Flags)? {
            InfoResult::MemFlags(flags) => flags,
            _ => flags,
        };
        Ok(Buffer { obj_core, len, flags, _data: PhantomData })
    }

    /// Registers `callback` to run when the driver destroys this buffer's
    /// memory object (after its last reference, including sub-buffers, is
    /// released).
    pub fn set_destructor_callback<C>(&self, callback: C) -> Result<()>
            where C: MemDestructorCallback
    {
        core::set_mem_object_destructor_callback(&self.obj_core, callback).map_err(Error::from)
    }

    /// Returns the length of the buffer in elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always `false`: buffers are never empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the size of the buffer in bytes.
    pub fn size_bytes(&self) -> usize {
        self.len * mem::size_of::<T>()
    }

    /// Returns the flags the buffer was created with.
    pub fn flags(&self) -> MemFlags {
        self.flags
    }

    /// Returns info about this buffer.
    pub fn info(&self, info_kind: MemInfo) -> Result<InfoResult> {
        core::get_mem_object_info(&self.obj_core, info_kind).map_err(Error::from)
    }

    /// Returns a reference to the core pointer wrapper, usable by functions in
    /// the `core` module.
    #[inline]
    pub fn core(&self) -> &MemCore {
        &self.obj_core
    }

    fn fmt_info(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Buffer")
            .field("Type", &self.info(MemInfo::Type))
            .field("Flags", &self.info(MemInfo::Flags))
            .field("Size", &self.info(MemInfo::Size))
            .field("MapCount", &self.info(MemInfo::MapCount))
            .field("ReferenceCount", &self.info(MemInfo::ReferenceCount))
            .field("AssociatedMemobject", &self.info(MemInfo::AssociatedMemobject))
            .field("Offset", &self.info(MemInfo::Offset))
            .finish()
    }
}

impl<T: OclPrm> std::fmt::Display for Buffer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        self.fmt_info(f)
    }
}

impl<T: OclPrm> AsRef<MemCore> for Buffer<T> {
    fn as_ref(&self) -> &MemCore {
        &self.obj_core
    }
}

impl<T: OclPrm> Deref for Buffer<T> {
    type Target = MemCore;

    fn deref(&self) -> &MemCore {
        &self.obj_core
    }
}

//! Abstract data type wrappers.
//!
//! ### Reference
//!
//! The following table describes abstract data types supported by OpenCL
//! (from SDK):
//!
//! * cl_platform_id: The ID for a platform.
//! * cl_device_id: The ID for a device.
//! * cl_context: A context.
//! * cl_command_queue: A command queue.
//! * cl_mem: A memory object.
//! * cl_program: A program.
//! * cl_kernel: A kernel.
//! * cl_event: An event.
//! * cl_sampler: A sampler.
//!
//! ### Who cares. Why bother?
//!
//! Every object type except platforms and root devices is reference
//! counted by the driver. The wrappers below hold exactly one reference each:
//! a wrapper built from a freshly created pointer takes over the creation
//! reference, a wrapper built from a copied pointer retains, `Clone` retains,
//! and `Drop` releases.
//!
//! Releasing inside `Drop` never panics. A failed release is logged at
//! `warn`.

use std::fmt::Debug;
use std::mem;
use std::ops::Deref;
use std::ptr;
use crate::ffi::{cl_platform_id, cl_device_id, cl_context, cl_command_queue, cl_mem,
    cl_program, cl_kernel, cl_event, cl_sampler};
use crate::error::Result as ClResult;
use crate::functions;
use crate::{OpenclVersion, PlatformInfo, DeviceInfo, CommandExecutionStatus};

//=============================================================================
//================================== TRAITS ===================================
//=============================================================================

/// Types with a mutable pointer to a new, null raw event pointer.
///
/// ## Safety
///
/// `alloc_new` must return either null or a pointer to a null `cl_event`
/// which stays valid until the enqueue call it is passed to returns.
pub unsafe trait ClNullEventPtr: Debug {
    fn alloc_new(&mut self) -> *mut cl_event;
}

unsafe impl ClNullEventPtr for () {
    fn alloc_new(&mut self) -> *mut cl_event {
        ptr::null_mut()
    }
}

/// Types with a reference to a raw event array and an associated element
/// count.
///
/// ## Safety
///
/// `as_ptr_ptr` must point to `count` valid, non-null events.
pub unsafe trait ClWaitListPtr: Debug {
    /// Returns a pointer to the first pointer in this list.
    unsafe fn as_ptr_ptr(&self) -> *const cl_event;
    /// Returns the number of items in this wait list.
    fn count(&self) -> u32;
}

unsafe impl ClWaitListPtr for () {
    unsafe fn as_ptr_ptr(&self) -> *const cl_event {
        ptr::null()
    }

    fn count(&self) -> u32 {
        0
    }
}

unsafe impl<'a> ClWaitListPtr for &'a [cl_event] {
    unsafe fn as_ptr_ptr(&self) -> *const cl_event {
        self.as_ptr()
    }

    fn count(&self) -> u32 {
        self.len() as u32
    }
}

unsafe impl<'a> ClWaitListPtr for &'a [Event] {
    unsafe fn as_ptr_ptr(&self) -> *const cl_event {
        self.as_ptr() as *const cl_event
    }

    fn count(&self) -> u32 {
        self.len() as u32
    }
}

//=============================================================================
//============================= PLATFORM & DEVICE =============================
//=============================================================================

/// cl_platform_id
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub struct PlatformId(cl_platform_id);

impl PlatformId {
    /// Creates a new `PlatformId` wrapper from a raw pointer.
    pub unsafe fn from_raw(ptr: cl_platform_id) -> PlatformId {
        PlatformId(ptr)
    }

    /// Returns an invalid `PlatformId` used for initializing data structures
    /// meant to be filled with valid ones.
    pub unsafe fn null() -> PlatformId {
        PlatformId(ptr::null_mut())
    }

    /// Returns a pointer.
    pub fn as_ptr(&self) -> cl_platform_id {
        self.0
    }

    /// Returns the queried and parsed OpenCL version for this platform.
    pub fn version(&self) -> ClResult<OpenclVersion> {
        if self.0.is_null() {
            return Err("PlatformId::version: This platform id is invalid.".into());
        }
        functions::get_platform_info(self, PlatformInfo::Version)?.into_opencl_version()
    }
}

unsafe impl Sync for PlatformId {}
unsafe impl Send for PlatformId {}


/// cl_device_id
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub struct DeviceId(cl_device_id);

impl DeviceId {
    /// Creates a new `DeviceId` wrapper from a raw pointer.
    pub unsafe fn from_raw(ptr: cl_device_id) -> DeviceId {
        DeviceId(ptr)
    }

    /// Returns an invalid `DeviceId` used for initializing data structures
    /// meant to be filled with valid ones.
    pub unsafe fn null() -> DeviceId {
        DeviceId(ptr::null_mut())
    }

    /// Returns a pointer.
    pub fn as_ptr(&self) -> cl_device_id {
        self.0
    }

    /// Returns the queried and parsed OpenCL version for this device.
    pub fn version(&self) -> ClResult<OpenclVersion> {
        if self.0.is_null() {
            return Err("DeviceId::version: This device id is invalid.".into());
        }
        functions::get_device_info(self, DeviceInfo::Version)?.into_opencl_version()
    }
}

unsafe impl Sync for DeviceId {}
unsafe impl Send for DeviceId {}


/// A sub-device created by `create_sub_devices`.
///
/// Unlike root devices, sub-devices are reference counted. Dereferences to
/// its `DeviceId`.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct SubDevice(DeviceId);

impl SubDevice {
    /// Only call this when passing a newly created pointer directly from
    /// `clCreateSubDevices`.
    pub unsafe fn from_raw_create_ptr(ptr: cl_device_id) -> SubDevice {
        SubDevice(DeviceId(ptr))
    }

    pub fn as_ptr(&self) -> cl_device_id {
        self.0.0
    }
}

impl Deref for SubDevice {
    type Target = DeviceId;

    fn deref(&self) -> &DeviceId {
        &self.0
    }
}

impl Clone for SubDevice {
    fn clone(&self) -> SubDevice {
        if let Err(err) = unsafe { functions::retain_device(&self.0) } {
            panic!("clbind_core::SubDevice::clone: {}", err);
        }
        SubDevice(self.0)
    }
}

impl Drop for SubDevice {
    fn drop(&mut self) {
        if let Err(err) = unsafe { functions::release_device(&self.0) } {
            log::warn!("clbind_core: unable to release sub-device {:?}: {}", self.0.0, err);
        }
    }
}

//=============================================================================
//======================== REFERENCE COUNTED OBJECTS ==========================
//=============================================================================

macro_rules! ref_counted {
    ($(#[$attr:meta])* $name:ident($raw:ty), $retain:ident, $release:ident) => {
        $(#[$attr])*
        #[repr(transparent)]
        #[derive(Debug, PartialEq, Eq, Hash)]
        pub struct $name($raw);

        impl $name {
            /// Only call this when passing **the original** newly created
            /// pointer directly from `clCreate...`. Do not use this to clone
            /// or copy.
            pub unsafe fn from_raw_create_ptr(ptr: $raw) -> $name {
                assert!(!ptr.is_null(), concat!("clbind_core::", stringify!($name),
                    "::from_raw_create_ptr: Null pointer passed."));
                $name(ptr)
            }

            /// Only use when cloning or copying from a pre-existing and valid
            /// pointer. Retains.
            pub unsafe fn from_raw_copied_ptr(ptr: $raw) -> ClResult<$name> {
                if ptr.is_null() {
                    return Err(concat!("clbind_core::", stringify!($name),
                        "::from_raw_copied_ptr: Null pointer passed.").into());
                }
                let new_core = $name(ptr);
                if let Err(err) = functions::$retain(&new_core) {
                    mem::forget(new_core);
                    return Err(err);
                }
                Ok(new_core)
            }

            /// Returns a pointer, do not store it unless you will manage its
            /// associated reference count carefully.
            pub fn as_ptr(&self) -> $raw {
                self.0
            }

            /// Consumes this wrapper, returning the pointer and its
            /// reference.
            pub fn into_raw(self) -> $raw {
                let ptr = self.0;
                mem::forget(self);
                ptr
            }
        }

        impl Clone for $name {
            fn clone(&self) -> $name {
                if let Err(err) = unsafe { functions::$retain(self) } {
                    panic!(concat!("clbind_core::", stringify!($name), "::clone: {}"), err);
                }
                $name(self.0)
            }
        }

        impl Drop for $name {
            fn drop(&mut self) {
                if let Err(err) = unsafe { functions::$release(self) } {
                    log::warn!(concat!("clbind_core: unable to release ", stringify!($name),
                        " {:?}: {}"), self.0, err);
                }
            }
        }

        unsafe impl Sync for $name {}
        unsafe impl Send for $name {}
    };
}

ref_counted! {
    /// cl_context
    Context(cl_context), retain_context, release_context
}

ref_counted! {
    /// cl_command_queue
    CommandQueue(cl_command_queue), retain_command_queue, release_command_queue
}

ref_counted! {
    /// cl_mem
    Mem(cl_mem), retain_mem_object, release_mem_object
}

ref_counted! {
    /// cl_program
    Program(cl_program), retain_program, release_program
}

ref_counted! {
    /// cl_kernel
    ///
    /// ### Thread Safety
    ///
    /// `clSetKernelArg` is the one OpenCL 1.2 entry point which is not safe
    /// to call concurrently on the same kernel.
    Kernel(cl_kernel), retain_kernel, release_kernel
}

ref_counted! {
    /// cl_sampler
    Sampler(cl_sampler), retain_sampler, release_sampler
}

//=============================================================================
//=================================== EVENT ===================================
//=============================================================================

/// cl_event
///
/// May be null: a null event is a target slot for an enqueue call to fill.
#[repr(transparent)]
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct Event(cl_event);

impl Event {
    /// For passage directly to an 'event creation' function (such as
    /// enqueue...).
    #[inline]
    pub fn null() -> Event {
        Event(ptr::null_mut())
    }

    /// Only call this when passing **the original** newly created pointer
    /// directly from `clCreate...`. Do not use this to clone or copy.
    #[inline]
    pub unsafe fn from_raw_create_ptr(ptr: cl_event) -> Event {
        assert!(!ptr.is_null(), "clbind_core::Event::from_raw_create_ptr: Null pointer passed.");
        Event(ptr)
    }

    /// Only use when cloning or copying from a pre-existing and valid
    /// `cl_event`. Retains.
    #[inline]
    pub unsafe fn from_raw_copied_ptr(ptr: cl_event) -> ClResult<Event> {
        if ptr.is_null() {
            return Err("clbind_core::Event::from_raw_copied_ptr: Null pointer passed.".into());
        }
        let new_core = Event(ptr);
        if let Err(err) = functions::retain_event(&new_core) {
            mem::forget(new_core);
            return Err(err);
        }
        Ok(new_core)
    }

    /// Returns `true` if this event has not been filled in by an enqueue or
    /// create call.
    #[inline]
    pub fn is_null(&self) -> bool {
        self.0.is_null()
    }

    /// Queries the command status associated with this event.
    pub fn status(&self) -> ClResult<CommandExecutionStatus> {
        if self.0.is_null() {
            return Err("clbind_core::Event::status: Event is null.".into());
        }
        functions::event_status(self)
    }

    /// Queries the command status associated with this event and returns true
    /// if it is complete.
    #[inline]
    pub fn is_complete(&self) -> ClResult<bool> {
        if self.0.is_null() {
            return Err("clbind_core::Event::is_complete: Event is null.".into());
        }
        functions::event_is_complete(self)
    }

    /// Blocks until this event is complete.
    pub fn wait_for(&self) -> ClResult<()> {
        if self.0.is_null() {
            return Err("clbind_core::Event::wait_for: Event is null.".into());
        }
        functions::wait_for_event(self)
    }

    /// Returns a pointer, do not store it unless you will manage its
    /// associated reference count carefully (as does `EventList`).
    #[inline]
    pub fn as_ptr(&self) -> cl_event {
        self.0
    }

    /// Returns an immutable reference to a pointer, do not deref and store it
    /// unless you will manage its associated reference count carefully.
    #[inline]
    pub unsafe fn as_ptr_ref(&self) -> &cl_event {
        &self.0
    }

    /// Returns a mutable reference to a pointer, do not deref then modify or
    /// store it unless you will manage its associated reference count
    /// carefully.
    #[inline]
    pub unsafe fn as_ptr_mut(&mut self) -> &mut cl_event {
        &mut self.0
    }

    /// Consumes the `Event`, returning the wrapped `cl_event` pointer.
    pub fn into_raw(self) -> cl_event {
        let ptr = self.0;
        mem::forget(self);
        ptr
    }

    /// Returns a pointer pointer expected when used as a wait list.
    unsafe fn _as_ptr_ptr(&self) -> *const cl_event {
        if self.0.is_null() { ptr::null() } else { &self.0 as *const cl_event }
    }

    /// Returns a count expected when used as a wait list.
    fn _count(&self) -> u32 {
        if self.0.is_null() { 0 } else { 1 }
    }
}

unsafe impl<'a> ClNullEventPtr for &'a mut Event {
    /// Releases any event already held, then returns the slot.
    fn alloc_new(&mut self) -> *mut cl_event {
        if !self.0.is_null() {
            **self = Event::null();
        }
        &mut self.0
    }
}

unsafe impl ClWaitListPtr for Event {
    #[inline(always)] unsafe fn as_ptr_ptr(&self) -> *const cl_event { self._as_ptr_ptr() }
    #[inline(always)] fn count(&self) -> u32 { self._count() }
}

unsafe impl<'a> ClWaitListPtr for &'a Event {
    #[inline(always)] unsafe fn as_ptr_ptr(&self) -> *const cl_event { self._as_ptr_ptr() }
    #[inline(always)] fn count(&self) -> u32 { self._count() }
}

impl Clone for Event {
    fn clone(&self) -> Event {
        if !self.0.is_null() {
            if let Err(err) = unsafe { functions::retain_event(self) } {
                panic!("clbind_core::Event::clone: {}", err);
            }
        }
        Event(self.0)
    }
}

impl Drop for Event {
    fn drop(&mut self) {
        if !self.0.is_null() {
            if let Err(err) = unsafe { functions::release_event(self) } {
                log::warn!("clbind_core: unable to release Event {:?}: {}", self.0, err);
            }
        }
    }
}

unsafe impl Sync for Event {}
unsafe impl Send for Event {}

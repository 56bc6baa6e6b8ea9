//! Thin and safe OpenCL 1.2 host API wrappers.
//!
//! Every OpenCL entry point has a matching free function here, named after
//! it in snake case without the `cl` prefix (`clCreateBuffer` ->
//! [`create_buffer`]). Status codes become [`Result`]s, info queries return a
//! parsed [`InfoResult`], and every reference counted object is wrapped in a
//! type which releases it on `Drop` and retains it on `Clone`.
//!
//! Entry points are called through a process-wide [`ClApi`](ffi::ClApi)
//! table. The table is loaded from the system OpenCL library on first use
//! (see [`api`]) unless another one has been installed beforehand with
//! [`install_api`].
//!
//! ## Environment
//!
//! * `CLBIND_OPENCL_LIBRARY`: path of the OpenCL library to load.
//! * `CLBIND_DEFAULT_PLATFORM_IDX`: index of the platform returned by
//!   [`default_platform`].
//! * `CLBIND_DEFAULT_DEVICE_TYPE`: device type returned by
//!   [`default_device_type`].
//!

#[macro_use] extern crate enum_primitive;

pub use clbind_sys as ffi;

#[macro_use]
mod loader;
mod error;
mod functions;
mod callbacks;
mod types;
pub mod util;
#[cfg(any(test, feature = "mock-driver"))]
pub mod mock;
#[cfg(test)]
mod tests;

use std::fmt::Debug;

pub use self::error::{Error, Result};
pub use self::loader::{api, install_api};
pub use self::functions::*;
pub use self::callbacks::{EventCallback, BuildCallback, MemDestructorCallback,
    ContextErrorHandler, ContextNotifier};
pub use self::types::abs::{PlatformId, DeviceId, SubDevice, Context, CommandQueue, Mem, Program,
    Kernel, Event, Sampler, ClWaitListPtr, ClNullEventPtr};
pub use self::types::structs::{OpenclVersion, ContextProperties, ContextPropertyValue,
    DevicePartition, ImageFormat, ImageFormatParseError, ImageDescriptor, BufferRegion};
pub use self::types::enums::*;
pub use self::types::flags::*;
pub use self::types::info::{InfoKind, InfoResult};
pub use self::util::UtilError;

/// A primitive type usable as a buffer element or a scalar kernel argument.
///
/// ## Safety
///
/// Implementors must be plain data with no padding and no invalid bit
/// patterns.
pub unsafe trait OclPrm: Copy + Default + Debug + PartialEq + Send + Sync + 'static {}

unsafe impl OclPrm for u8 {}
unsafe impl OclPrm for i8 {}
unsafe impl OclPrm for u16 {}
unsafe impl OclPrm for i16 {}
unsafe impl OclPrm for u32 {}
unsafe impl OclPrm for i32 {}
unsafe impl OclPrm for u64 {}
unsafe impl OclPrm for i64 {}
unsafe impl OclPrm for usize {}
unsafe impl OclPrm for isize {}
unsafe impl OclPrm for f32 {}
unsafe impl OclPrm for f64 {}

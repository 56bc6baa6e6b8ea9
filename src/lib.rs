//! OpenCL 1.2 host bindings for Rust.
//!
//! `clbind` is split into three layers:
//!
//! * [`clbind_sys`](core::ffi): the raw C declarations and a table of entry
//!   points resolved from the system OpenCL library at runtime.
//! * [`clbind_core`](core): one thin, safe function per entry point, owning
//!   wrappers for every reference counted object, and typed info queries.
//! * This crate: the standard object layer. Platform and device lists,
//!   contexts, queues, buffers, images, samplers, programs, kernels, and
//!   event lists, with host-side argument checking before anything reaches
//!   the driver.
//!
//! Start with [`availability`] to find out whether OpenCL can be used at
//! all, then build a [`Context`] from a [`DeviceList`]:
//!
//! ```no_run
//! use clbind::{availability, Availability, PlatformList, DeviceList, Context, Queue, Buffer,
//!     MemFlags};
//!
//! # fn main() -> clbind::Result<()> {
//! if availability() != Availability::Available {
//!     return Ok(());
//! }
//! let platforms = PlatformList::new()?;
//! let devices = DeviceList::new(&platforms, 0, None)?;
//! let context = Context::new(&devices)?;
//! let queue = Queue::new(&context, devices.get(0)?, None)?;
//!
//! let buffer = Buffer::<f32>::new(&context, MemFlags::READ_WRITE, 1024, None)?;
//! buffer.write(&queue, &vec![1.0; 1024], 0, 0, None, None)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Environment
//!
//! See [`clbind_core`](core) for the environment variables selecting the
//! library, the default platform, and the default device type.
//!

pub use clbind_core as core;

mod error;
pub mod standard;
#[cfg(test)]
mod tests;

pub use self::error::{Error, Result};
pub use self::standard::{availability, Availability, Platform, PlatformList, Device, DeviceList,
    Context, Queue, Buffer, Pitches, Image, Sampler, Program, ProgramSource, Kernel, KernelArg,
    EventList};
pub use clbind_core::{OclPrm, MemFlags, MapFlags, DeviceType, CommandQueueProperties,
    CommandExecutionStatus, ImageFormat, ImageDescriptor, ImageChannelOrder,
    ImageChannelDataType, MemObjectType, AddressingMode, FilterMode, OpenclVersion, Status,
    PlatformInfo, DeviceInfo, ContextInfo, CommandQueueInfo, MemInfo, ImageInfo, SamplerInfo,
    ProgramInfo, ProgramBuildInfo, KernelInfo, KernelArgInfo, KernelWorkGroupInfo, EventInfo,
    InfoResult};

//! An OpenCL command queue.

use std::ops::{Deref, DerefMut};
use clbind_core::{self as core, CommandQueue as CommandQueueCore, CommandQueueInfo,
    CommandQueueProperties, DeviceId as DeviceIdCore, InfoResult, OpenclVersion};
use crate::error::{Error, Result};
use crate::standard::{Context, Device, EventList};


/// A command queue which manages all actions taken on kernels, buffers, and
/// images.
#[derive(Clone, Debug)]
pub struct Queue {
    obj_core: CommandQueueCore,
    context: Context,
    device: Device,
    device_version: OpenclVersion,
}

impl Queue {
    /// Returns a new Queue on the device specified by `device`.
    ///
    /// `device` must be one of `context`'s devices.
    pub fn new<D>(context: &Context, device: D, properties: Option<CommandQueueProperties>)
            -> Result<Queue>
            where D: Into<Device>
    {
        let device = device.into();
        let obj_core = core::create_command_queue(context, &device, properties)?;
        let device_version = device.version()?;

        Ok(Queue {
            obj_core,
            context: context.clone(),
            device,
            device_version,
        })
    }

    /// Issues all previously queued OpenCL commands to the device.
    pub fn flush(&self) -> Result<()> {
        core::flush(&self.obj_core).map_err(Error::from)
    }

    /// Blocks until all commands in this queue have completed before returning.
    pub fn finish(&self) -> Result<()> {
        core::finish(&self.obj_core).map_err(Error::from)
    }

    /// Enqueues a marker command which waits for either a list of events to
    /// complete, or all previously enqueued commands to complete.
    pub fn enqueue_marker(&self, events: Option<&mut EventList>, wait: Option<&EventList>)
            -> Result<()>
    {
        EventList::enqueue_with(events, |sink| {
            core::enqueue_marker_with_wait_list(&self.obj_core, wait, sink)
        })
    }

    /// Enqueues a barrier: commands enqueued afterwards wait for the events
    /// in `wait`, or for every command enqueued before it.
    pub fn enqueue_barrier(&self, events: Option<&mut EventList>, wait: Option<&EventList>)
            -> Result<()>
    {
        EventList::enqueue_with(events, |sink| {
            core::enqueue_barrier_with_wait_list(&self.obj_core, wait, sink)
        })
    }

    /// Returns a reference to the core pointer wrapper, usable by functions in
    /// the `core` module.
    #[inline]
    pub fn core(&self) -> &CommandQueueCore {
        &self.obj_core
    }

    /// Returns the context this queue was created in.
    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Returns the `OpenCL` device associated with this queue.
    pub fn device(&self) -> Device {
        self.device
    }

    /// Returns the cached device version.
    pub fn device_version(&self) -> OpenclVersion {
        self.device_version
    }

    /// Returns info about this queue.
    pub fn info(&self, info_kind: CommandQueueInfo) -> Result<InfoResult> {
        core::get_command_queue_info(&self.obj_core, info_kind).map_err(Error::from)
    }

    /// Returns the properties this queue was created with.
    pub fn properties(&self) -> Result<CommandQueueProperties> {
        match self.info(CommandQueueInfo::Properties)? {
            InfoResult::QueueProperties(props) => Ok(props),
            other => Err(format!("Queue::properties: unexpected info result: {:?}",
                other).into()),
        }
    }

    fn fmt_info(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Queue")
            .field("Context", &self.info(CommandQueueInfo::Context))
            .field("Device", &self.info(CommandQueueInfo::Device))
            .field("ReferenceCount", &self.info(CommandQueueInfo::ReferenceCount))
            .field("Properties", &self.info(CommandQueueInfo::Properties))
            .finish()
    }
}

impl std::fmt::Display for Queue {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        self.fmt_info(f)
    }
}

impl AsRef<Queue> for Queue {
    fn as_ref(&self) -> &Queue {
        self
    }
}

impl AsRef<CommandQueueCore> for Queue {
    fn as_ref(&self) -> &CommandQueueCore {
        &self.obj_core
    }
}

impl AsRef<DeviceIdCore> for Queue {
    fn as_ref(&self) -> &DeviceIdCore {
        self.device.core()
    }
}

impl Deref for Queue {
    type Target = CommandQueueCore;

    fn deref(&self) -> &CommandQueueCore {
        &self.obj_core
    }
}

impl DerefMut for Queue {
    fn deref_mut(&mut self) -> &mut CommandQueueCore {
        &mut self.obj_core
    }
}

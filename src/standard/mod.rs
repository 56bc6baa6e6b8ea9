//! `clbind` standard types.

mod availability;
mod platform;
mod device;
mod context;
mod queue;
mod event_list;
mod buffer;
mod image;
mod sampler;
mod program;
mod kernel;

pub use self::availability::{availability, Availability};
pub use self::platform::{Platform, PlatformList};
pub use self::device::{Device, DeviceList};
pub use self::context::Context;
pub use self::queue::Queue;
pub use self::event_list::EventList;
pub use self::buffer::{Buffer, Pitches};
pub use self::image::Image;
pub use self::sampler::Sampler;
pub use self::program::{Program, ProgramSource};
pub use self::kernel::{Kernel, KernelArg};


/// Pads a list of one to three sizes out to three, filling unused
/// dimensions with `fill`.
pub(crate) fn to_3d(dims: &[usize], fill: usize) -> [usize; 3] {
    let mut padded = [fill; 3];
    for (dst, &src) in padded.iter_mut().zip(dims.iter()) {
        *dst = src;
    }
    padded
}

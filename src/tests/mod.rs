//! Standard layer tests, run against the in-process mock driver
//! (`clbind_core::mock`).
//!
//! The mock keeps one driver state per thread and every test installs (and
//! thereby resets) it first.
//!

#![allow(dead_code)]

pub mod platforms;
pub mod contexts;
pub mod event_lists;
pub mod buffers;
pub mod buffer_rect;
pub mod images;
pub mod programs;
pub mod kernels;

use clbind_core::mock;
use crate::{PlatformList, DeviceList, Context, Queue, DeviceType};


/// Installs the mock driver and resets this thread's driver state.
pub fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
    mock::install().unwrap();
}

/// Installs the mock and returns a context and queue on its GPU device.
pub fn gpu_setup() -> (DeviceList, Context, Queue) {
    init();
    let platforms = PlatformList::new().unwrap();
    let devices = DeviceList::new(&platforms, 0, Some(DeviceType::GPU)).unwrap();
    let context = Context::new(&devices).unwrap();
    let queue = Queue::new(&context, devices.get(0).unwrap(), None).unwrap();
    (devices, context, queue)
}

/// Returns `0, 1, 2, ...` as `f32`s.
pub fn ramp(len: usize) -> Vec<f32> {
    (0..len).map(|i| i as f32).collect()
}

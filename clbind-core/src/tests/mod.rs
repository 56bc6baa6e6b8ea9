//! These tests run against the in-process mock driver (`crate::mock`).
//!
//! The mock keeps one driver state per thread and every test installs (and
//! thereby resets) it first, so tests never see each other's objects.
//!

#![allow(dead_code)]

pub mod lifecycle;
pub mod events;
pub mod programs;
pub mod kernels;
pub mod errors;
pub mod config;

use std::ffi::CString;
use crate::{mock, DeviceId, Context, CommandQueue, CommandQueueProperties, Program};


/// Installs the mock driver and resets this thread's driver state.
pub fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
    mock::install().unwrap();
}

/// Returns a context and a queue on `device`.
pub fn context_queue(device: DeviceId, properties: Option<CommandQueueProperties>)
        -> (Context, CommandQueue)
{
    let context = unsafe { crate::create_context(None, &[device], None).unwrap() };
    let queue = crate::create_command_queue(&context, &device, properties).unwrap();
    (context, queue)
}

/// Installs the mock and returns a context and queue on its GPU device.
pub fn gpu_setup() -> (DeviceId, Context, CommandQueue) {
    init();
    let device = mock::gpu_device();
    let (context, queue) = context_queue(device, None);
    (device, context, queue)
}

pub fn cstr(s: &str) -> CString {
    CString::new(s).unwrap()
}

/// Builds a program from a single source string.
pub fn build(context: &Context, src: &str) -> Program {
    crate::create_build_program(context, &[cstr(src)], None, &cstr("")).unwrap()
}

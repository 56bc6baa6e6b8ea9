//! Closures as OpenCL callbacks.
//!
//! The driver calls back through `extern "system"` trampolines which recover
//! a boxed closure from the `user_data` pointer. Callbacks run on driver
//! threads, so every closure must be `Send`. A panic inside a closure is
//! caught and logged at `error` before it can unwind into the driver.

use std::ffi::CStr;
use std::panic::{self, AssertUnwindSafe};
use std::slice;
use crate::ffi::{c_void, c_char, size_t, cl_int, cl_event, cl_program, cl_mem,
    cl_context_notify_fn};


/// A callback invoked when an event reaches `CL_COMPLETE` (or terminates
/// abnormally with a negative status).
pub trait EventCallback: Send + 'static {
    fn event_status(self: Box<Self>, event: cl_event, status: cl_int);
}

impl<F> EventCallback for F where F: FnOnce(cl_int) + Send + 'static {
    fn event_status(self: Box<Self>, _event: cl_event, status: cl_int) {
        (*self)(status)
    }
}

/// A callback invoked once a program build, compile, or link finishes.
pub trait BuildCallback: Send + 'static {
    fn build_complete(self: Box<Self>, program: cl_program);
}

impl<F> BuildCallback for F where F: FnOnce() + Send + 'static {
    fn build_complete(self: Box<Self>, _program: cl_program) {
        (*self)()
    }
}

/// A callback invoked when a memory object is destroyed.
pub trait MemDestructorCallback: Send + 'static {
    fn mem_destroyed(self: Box<Self>, mem: cl_mem);
}

impl<F> MemDestructorCallback for F where F: FnOnce() + Send + 'static {
    fn mem_destroyed(self: Box<Self>, _mem: cl_mem) {
        (*self)()
    }
}

/// A handler for errors reported by the driver for a context. May be called
/// any number of times, from any thread.
pub trait ContextErrorHandler: Send + Sync + 'static {
    fn context_error(&self, errinfo: &str, private_info: &[u8]);
}

impl<F> ContextErrorHandler for F where F: Fn(&str, &[u8]) + Send + Sync + 'static {
    fn context_error(&self, errinfo: &str, private_info: &[u8]) {
        (self)(errinfo, private_info)
    }
}


/// Owns a context error handler for as long as the context it is registered
/// with may call it.
pub struct ContextNotifier {
    handler: Box<Box<dyn ContextErrorHandler>>,
}

impl ContextNotifier {
    pub fn new<H: ContextErrorHandler>(handler: H) -> ContextNotifier {
        ContextNotifier { handler: Box::new(Box::new(handler)) }
    }

    /// Returns the callback and user data pointer to pass to
    /// `clCreateContext`. Valid for as long as `self` lives.
    pub fn raw_parts(&self) -> (Option<cl_context_notify_fn>, *mut c_void) {
        let user_data = &*self.handler as *const Box<dyn ContextErrorHandler> as *mut c_void;
        (Some(context_notify_trampoline as cl_context_notify_fn), user_data)
    }
}

impl std::fmt::Debug for ContextNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("ContextNotifier").finish_non_exhaustive()
    }
}


/// Boxes a callback into a user data pointer for `event_callback_trampoline`.
pub(crate) fn event_callback_user_data<C: EventCallback>(callback: C) -> *mut c_void {
    let boxed: Box<Box<dyn EventCallback>> = Box::new(Box::new(callback));
    Box::into_raw(boxed) as *mut c_void
}

/// Boxes a callback into a user data pointer for `build_callback_trampoline`.
pub(crate) fn build_callback_user_data(callback: Box<dyn BuildCallback>) -> *mut c_void {
    Box::into_raw(Box::new(callback)) as *mut c_void
}

/// Boxes a callback into a user data pointer for
/// `mem_destructor_trampoline`.
pub(crate) fn mem_destructor_user_data<C: MemDestructorCallback>(callback: C) -> *mut c_void {
    let boxed: Box<Box<dyn MemDestructorCallback>> = Box::new(Box::new(callback));
    Box::into_raw(boxed) as *mut c_void
}

/// Reclaims and drops a callback whose registration failed.
pub(crate) unsafe fn drop_event_callback(user_data: *mut c_void) {
    drop(Box::from_raw(user_data as *mut Box<dyn EventCallback>));
}

/// Reclaims and drops a build callback the driver will never call.
pub(crate) unsafe fn drop_build_callback(user_data: *mut c_void) {
    drop(Box::from_raw(user_data as *mut Box<dyn BuildCallback>));
}

/// Reclaims and drops a callback whose registration failed.
pub(crate) unsafe fn drop_mem_destructor(user_data: *mut c_void) {
    drop(Box::from_raw(user_data as *mut Box<dyn MemDestructorCallback>));
}

fn log_panic(kind: &str) {
    log::error!("clbind_core: a {} callback panicked. The panic was caught at the driver \
        boundary.", kind);
}

pub(crate) extern "system" fn event_callback_trampoline(event: cl_event, status: cl_int,
        user_data: *mut c_void)
{
    if user_data.is_null() {
        return;
    }
    let callback = unsafe { *Box::from_raw(user_data as *mut Box<dyn EventCallback>) };
    let res = panic::catch_unwind(AssertUnwindSafe(move || callback.event_status(event, status)));
    if res.is_err() {
        log_panic("event");
    }
}

pub(crate) extern "system" fn build_callback_trampoline(program: cl_program,
        user_data: *mut c_void)
{
    if user_data.is_null() {
        return;
    }
    let callback = unsafe { *Box::from_raw(user_data as *mut Box<dyn BuildCallback>) };
    if panic::catch_unwind(AssertUnwindSafe(move || callback.build_complete(program))).is_err() {
        log_panic("program build");
    }
}

pub(crate) extern "system" fn mem_destructor_trampoline(mem: cl_mem, user_data: *mut c_void) {
    if user_data.is_null() {
        return;
    }
    let callback = unsafe { *Box::from_raw(user_data as *mut Box<dyn MemDestructorCallback>) };
    if panic::catch_unwind(AssertUnwindSafe(move || callback.mem_destroyed(mem))).is_err() {
        log_panic("memory object destructor");
    }
}

extern "system" fn context_notify_trampoline(errinfo: *const c_char,
        private_info: *const c_void, cb: size_t, user_data: *mut c_void)
{
    if user_data.is_null() {
        return;
    }
    let handler = unsafe { &*(user_data as *const Box<dyn ContextErrorHandler>) };
    let errinfo = if errinfo.is_null() {
        String::new()
    } else {
        unsafe { CStr::from_ptr(errinfo) }.to_string_lossy().into_owned()
    };
    let private_info: &[u8] = if private_info.is_null() || cb == 0 {
        &[]
    } else {
        unsafe { slice::from_raw_parts(private_info as *const u8, cb) }
    };

    if panic::catch_unwind(AssertUnwindSafe(|| handler.context_error(&errinfo, private_info)))
            .is_err() {
        log_panic("context error");
    }
}

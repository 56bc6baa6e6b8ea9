//! Per-thread state of the mock driver.

use std::cell::RefCell;
use std::collections::HashMap;
use std::ffi::CString;
use std::rc::Rc;
use std::thread;
use crate::ffi::{self, c_void, cl_int, cl_uint, cl_ulong, cl_bitfield, cl_image_format,
    cl_context_notify_fn, cl_program_notify_fn, cl_event_notify_fn, cl_mem_destructor_fn,
    cl_native_kernel_fn};
use super::source::KernelDecl;

pub(super) const PLATFORM: usize = 0x1000;
pub(super) const PLATFORM_STEP: usize = 0x8;
pub(super) const GPU_DEVICE: usize = 0x2000;
pub(super) const CPU_DEVICE: usize = 0x2010;

const FIRST_HANDLE: usize = 0x10000;
const HANDLE_STEP: usize = 0x10;

pub(super) const PLATFORM_VERSION: &str = "OpenCL 1.2 clbind-mock";
pub(super) const BUILT_IN_KERNELS: &str = "mock_copy;mock_fill";
pub(super) const MAX_MEM_ALLOC_SIZE: usize = 64 << 20;
/// `CL_DEVICE_MEM_BASE_ADDR_ALIGN` in bits.
pub(super) const MEM_BASE_ADDR_ALIGN: cl_uint = 1024;


#[derive(Debug, Clone)]
pub(super) struct Device {
    pub id: usize,
    pub device_type: cl_bitfield,
    pub name: &'static str,
    pub compute_units: cl_uint,
    pub max_work_group_size: usize,
    pub max_work_item_sizes: [usize; 3],
    pub exec_capabilities: cl_bitfield,
    pub version: String,
    pub parent: Option<usize>,
    pub partition_type: Vec<isize>,
    pub hidden: bool,
}

impl Device {
    fn gpu() -> Device {
        Device {
            id: GPU_DEVICE,
            device_type: ffi::CL_DEVICE_TYPE_GPU,
            name: "clbind mock gpu",
            compute_units: 8,
            max_work_group_size: 256,
            max_work_item_sizes: [256, 256, 64],
            exec_capabilities: ffi::CL_EXEC_KERNEL,
            version: "OpenCL 1.2 clbind-mock".to_owned(),
            parent: None,
            partition_type: Vec::new(),
            hidden: false,
        }
    }

    fn cpu() -> Device {
        Device {
            id: CPU_DEVICE,
            device_type: ffi::CL_DEVICE_TYPE_CPU,
            name: "clbind mock cpu",
            compute_units: 4,
            max_work_group_size: 1024,
            max_work_item_sizes: [1024, 1024, 1024],
            exec_capabilities: ffi::CL_EXEC_KERNEL | ffi::CL_EXEC_NATIVE_KERNEL,
            version: "OpenCL 1.2 clbind-mock".to_owned(),
            parent: None,
            partition_type: Vec::new(),
            hidden: false,
        }
    }

    pub fn supports_partitioning(&self) -> bool {
        self.device_type & ffi::CL_DEVICE_TYPE_CPU != 0
    }
}


pub(super) struct ContextObj {
    pub devices: Vec<usize>,
    pub properties: Vec<isize>,
    pub notify: Option<(cl_context_notify_fn, usize)>,
}

pub(super) struct QueueObj {
    pub context: usize,
    pub device: usize,
    pub properties: cl_bitfield,
}

#[derive(Debug, Clone, Copy)]
pub(super) struct ImageMeta {
    pub format: cl_image_format,
    pub elem_size: usize,
    pub image_type: cl_uint,
    pub width: usize,
    pub height: usize,
    pub depth: usize,
    pub array_size: usize,
    pub buffer: Option<usize>,
}

impl ImageMeta {
    /// Returns the extents in pixels, rows, and slices.
    pub fn extents(&self) -> [usize; 3] {
        match self.image_type {
            ffi::CL_MEM_OBJECT_IMAGE1D_ARRAY => [self.width, self.array_size, 1],
            ffi::CL_MEM_OBJECT_IMAGE2D => [self.width, self.height, 1],
            ffi::CL_MEM_OBJECT_IMAGE2D_ARRAY => [self.width, self.height, self.array_size],
            ffi::CL_MEM_OBJECT_IMAGE3D => [self.width, self.height, self.depth],
            _ => [self.width, 1, 1],
        }
    }

    pub fn row_pitch(&self) -> usize {
        self.width * self.elem_size
    }

    pub fn slice_pitch(&self) -> usize {
        self.row_pitch() * self.extents()[1]
    }

    pub fn size(&self) -> usize {
        let extents = self.extents();
        self.row_pitch() * extents[1] * extents[2]
    }
}

pub(super) struct MemObj {
    pub context: usize,
    pub flags: cl_bitfield,
    pub mem_type: cl_uint,
    pub size: usize,
    pub storage: Rc<RefCell<Vec<u8>>>,
    pub offset: usize,
    pub parent: Option<usize>,
    pub host_ptr: usize,
    pub image: Option<ImageMeta>,
    pub destructors: Vec<(cl_mem_destructor_fn, usize)>,
    pub maps: Vec<usize>,
}

impl MemObj {
    /// Returns a copy of `len` bytes at `offset`.
    pub fn read(&self, offset: usize, len: usize) -> Vec<u8> {
        let start = self.offset + offset;
        self.storage.borrow()[start..start + len].to_vec()
    }

    pub fn write(&self, offset: usize, data: &[u8]) {
        let start = self.offset + offset;
        self.storage.borrow_mut()[start..start + data.len()].copy_from_slice(data);
    }

    /// Returns a pointer to the byte at `offset`.
    pub fn host_address(&self, offset: usize) -> *mut u8 {
        let vec = self.storage.as_ptr();
        unsafe { (*vec).as_mut_ptr().add(self.offset + offset) }
    }

    pub fn host_readable(&self) -> bool {
        self.flags & (ffi::CL_MEM_HOST_NO_ACCESS | ffi::CL_MEM_HOST_WRITE_ONLY) == 0
    }

    pub fn host_writable(&self) -> bool {
        self.flags & (ffi::CL_MEM_HOST_NO_ACCESS | ffi::CL_MEM_HOST_READ_ONLY) == 0
    }
}

pub(super) struct SamplerObj {
    pub context: usize,
    pub normalized_coords: cl_uint,
    pub addressing_mode: cl_uint,
    pub filter_mode: cl_uint,
}

pub(super) struct ProgramObj {
    pub context: usize,
    pub devices: Vec<usize>,
    pub source: Option<String>,
    pub from_binary: bool,
    pub binary_type: cl_uint,
    pub build_status: cl_int,
    pub build_log: String,
    pub build_options: String,
    pub kernels: Vec<KernelDecl>,
    pub attached_kernels: usize,
}

impl ProgramObj {
    pub fn is_executable(&self) -> bool {
        self.build_status == ffi::CL_BUILD_SUCCESS
            && self.binary_type == ffi::CL_PROGRAM_BINARY_TYPE_EXECUTABLE
    }

    /// Returns the program binary, or nothing if no binary has been built.
    pub fn binary(&self) -> Vec<u8> {
        if self.binary_type == ffi::CL_PROGRAM_BINARY_TYPE_NONE {
            return Vec::new();
        }
        let mut bin = String::from(super::BINARY_MAGIC);
        for kernel in self.kernels.iter() {
            bin.push_str(&kernel.to_source());
            bin.push('\n');
        }
        bin.into_bytes()
    }
}

#[derive(Debug, Clone)]
pub(super) enum ArgValue {
    Mem(Option<usize>),
    Sampler(usize),
    Local(usize),
    Bytes(Vec<u8>),
}

pub(super) struct KernelObj {
    pub program: usize,
    pub decl: KernelDecl,
    pub args: Vec<Option<ArgValue>>,
}

pub(super) struct EventObj {
    pub context: usize,
    pub queue: Option<usize>,
    pub command_type: cl_uint,
    pub status: cl_int,
    pub polls_remaining: u32,
    pub user: bool,
    pub callbacks: Vec<(cl_int, cl_event_notify_fn, usize)>,
    pub profiling: Option<[cl_ulong; 4]>,
}

pub(super) enum ObjKind {
    SubDevice(Device),
    Context(ContextObj),
    Queue(QueueObj),
    Mem(MemObj),
    Sampler(SamplerObj),
    Program(ProgramObj),
    Kernel(KernelObj),
    Event(EventObj),
}

pub(super) struct Object {
    pub refcount: u32,
    pub kind: ObjKind,
}

/// The object type expected by an entry point. Selects the error code
/// returned for an invalid handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Kind {
    Device,
    Context,
    Queue,
    Mem,
    Sampler,
    Program,
    Kernel,
    Event,
}

impl Kind {
    pub fn invalid_code(self) -> cl_int {
        match self {
            Kind::Device => ffi::CL_INVALID_DEVICE,
            Kind::Context => ffi::CL_INVALID_CONTEXT,
            Kind::Queue => ffi::CL_INVALID_COMMAND_QUEUE,
            Kind::Mem => ffi::CL_INVALID_MEM_OBJECT,
            Kind::Sampler => ffi::CL_INVALID_SAMPLER,
            Kind::Program => ffi::CL_INVALID_PROGRAM,
            Kind::Kernel => ffi::CL_INVALID_KERNEL,
            Kind::Event => ffi::CL_INVALID_EVENT,
        }
    }

    fn of(kind: &ObjKind) -> Kind {
        match *kind {
            ObjKind::SubDevice(_) => Kind::Device,
            ObjKind::Context(_) => Kind::Context,
            ObjKind::Queue(_) => Kind::Queue,
            ObjKind::Mem(_) => Kind::Mem,
            ObjKind::Sampler(_) => Kind::Sampler,
            ObjKind::Program(_) => Kind::Program,
            ObjKind::Kernel(_) => Kind::Kernel,
            ObjKind::Event(_) => Kind::Event,
        }
    }
}


/// A recorded kernel dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    pub kernel: String,
    pub work_dim: u32,
    pub global_work_offset: Option<Vec<usize>>,
    pub global_work_size: Vec<usize>,
    pub local_work_size: Option<Vec<usize>>,
}


/// A driver callback to be run once the state is no longer borrowed.
pub(super) enum Pending {
    Event { f: cl_event_notify_fn, event: usize, status: cl_int, user_data: usize },
    Build { f: cl_program_notify_fn, program: usize, user_data: usize },
    MemDestructor { f: cl_mem_destructor_fn, mem: usize, user_data: usize },
    ContextError { f: cl_context_notify_fn, errinfo: CString, private_info: Vec<u8>,
        user_data: usize },
    NativeKernel { f: cl_native_kernel_fn, args: Vec<u8> },
}

impl Pending {
    fn invoke(self) {
        match self {
            Pending::Event { f, event, status, user_data } =>
                f(event as *mut c_void, status, user_data as *mut c_void),
            Pending::Build { f, program, user_data } =>
                f(program as *mut c_void, user_data as *mut c_void),
            Pending::MemDestructor { f, mem, user_data } =>
                f(mem as *mut c_void, user_data as *mut c_void),
            Pending::ContextError { f, errinfo, private_info, user_data } => {
                let private_ptr = if private_info.is_empty() {
                    std::ptr::null()
                } else {
                    private_info.as_ptr() as *const c_void
                };
                f(errinfo.as_ptr(), private_ptr, private_info.len(), user_data as *mut c_void)
            },
            Pending::NativeKernel { f, mut args } => f(args.as_mut_ptr() as *mut c_void),
        }
    }

    /// Runs the callback, on a separate thread if `worker` is set and the
    /// callback would be called from a driver thread by a real
    /// implementation.
    pub fn run(self, worker: bool) {
        match self {
            Pending::NativeKernel { .. } => self.invoke(),
            _ if worker => {
                if thread::spawn(move || self.invoke()).join().is_err() {
                    log::error!("clbind_core::mock: a callback worker thread panicked.");
                }
            },
            _ => self.invoke(),
        }
    }
}


pub(super) struct State {
    pub platform_count: usize,
    pub devices: Vec<Device>,
    pub objects: HashMap<usize, Object>,
    next_handle: usize,
    pub calls: Vec<&'static str>,
    pub fail_next: HashMap<&'static str, cl_int>,
    pub completion_polls: u32,
    pub poll_count: u64,
    pub clock: cl_ulong,
    pub dispatches: Vec<Dispatch>,
    pub pending: Vec<Pending>,
    pub worker_thread_callbacks: bool,
}

impl State {
    pub fn new() -> State {
        State {
            platform_count: 1,
            devices: vec![Device::gpu(), Device::cpu()],
            objects: HashMap::new(),
            next_handle: FIRST_HANDLE,
            calls: Vec::new(),
            fail_next: HashMap::new(),
            completion_polls: 0,
            poll_count: 0,
            clock: 1_000_000,
            dispatches: Vec::new(),
            pending: Vec::new(),
            worker_thread_callbacks: false,
        }
    }

    pub fn platform_valid(&self, platform: usize) -> bool {
        platform >= PLATFORM && platform < PLATFORM + self.platform_count * PLATFORM_STEP
            && (platform - PLATFORM) % PLATFORM_STEP == 0
    }

    //========================================================================
    //============================== Objects =================================
    //========================================================================

    pub fn insert(&mut self, kind: ObjKind) -> usize {
        let handle = self.next_handle;
        self.next_handle += HANDLE_STEP;
        self.objects.insert(handle, Object { refcount: 1, kind });
        handle
    }

    fn check(&self, handle: usize, kind: Kind) -> Result<&Object, cl_int> {
        match self.objects.get(&handle) {
            Some(obj) if Kind::of(&obj.kind) == kind => Ok(obj),
            _ => Err(kind.invalid_code()),
        }
    }

    pub fn refcount_of(&self, handle: usize, kind: Kind) -> Result<cl_uint, cl_int> {
        if kind == Kind::Device && self.root_device(handle).is_some() {
            return Ok(1);
        }
        self.check(handle, kind).map(|obj| obj.refcount)
    }

    pub fn retain(&mut self, handle: usize, kind: Kind) -> Result<(), cl_int> {
        if kind == Kind::Device && self.root_device(handle).is_some() {
            return Ok(());
        }
        self.check(handle, kind)?;
        if let Some(obj) = self.objects.get_mut(&handle) {
            obj.refcount += 1;
        }
        Ok(())
    }

    pub fn release(&mut self, handle: usize, kind: Kind) -> Result<(), cl_int> {
        if kind == Kind::Device && self.root_device(handle).is_some() {
            return Ok(());
        }
        self.check(handle, kind)?;
        self.release_implicit(handle);
        Ok(())
    }

    /// Drops one reference held by the driver or a caller, destroying the
    /// object when none remain.
    pub fn release_implicit(&mut self, handle: usize) {
        let destroy = match self.objects.get_mut(&handle) {
            Some(obj) => {
                obj.refcount -= 1;
                obj.refcount == 0
            },
            None => false,
        };

        if destroy {
            if let Some(obj) = self.objects.remove(&handle) {
                self.destroy(handle, obj.kind);
            }
        }
    }

    fn destroy(&mut self, handle: usize, kind: ObjKind) {
        match kind {
            ObjKind::SubDevice(device) => {
                if let Some(parent) = device.parent {
                    self.release_implicit(parent);
                }
            },
            ObjKind::Context(_) => (),
            ObjKind::Queue(queue) => self.release_implicit(queue.context),
            ObjKind::Mem(mem) => {
                for &(f, user_data) in mem.destructors.iter().rev() {
                    self.pending.push(Pending::MemDestructor { f, mem: handle, user_data });
                }
                if let Some(parent) = mem.parent {
                    self.release_implicit(parent);
                }
                if let Some(buffer) = mem.image.and_then(|img| img.buffer) {
                    self.release_implicit(buffer);
                }
                self.release_implicit(mem.context);
            },
            ObjKind::Sampler(sampler) => self.release_implicit(sampler.context),
            ObjKind::Program(program) => self.release_implicit(program.context),
            ObjKind::Kernel(kernel) => {
                if let Ok(program) = self.program_mut(kernel.program) {
                    program.attached_kernels -= 1;
                }
                self.release_implicit(kernel.program);
            },
            ObjKind::Event(event) => match event.queue {
                Some(queue) => {
                    // The command still finishes after its last release.
                    for (_, f, user_data) in event.callbacks {
                        self.pending.push(Pending::Event { f, event: handle,
                            status: ffi::CL_COMPLETE, user_data });
                    }
                    self.release_implicit(queue)
                },
                None => self.release_implicit(event.context),
            },
        }
    }

    /// Adds a reference held by the driver.
    pub fn retain_implicit(&mut self, handle: usize) {
        if let Some(obj) = self.objects.get_mut(&handle) {
            obj.refcount += 1;
        }
    }

    //========================================================================
    //============================== Devices =================================
    //========================================================================

    fn root_device(&self, handle: usize) -> Option<&Device> {
        self.devices.iter().find(|d| d.id == handle)
    }

    pub fn device(&self, handle: usize) -> Result<&Device, cl_int> {
        if let Some(device) = self.root_device(handle) {
            return Ok(device);
        }
        match self.objects.get(&handle) {
            Some(Object { kind: ObjKind::SubDevice(device), .. }) => Ok(device),
            _ => Err(ffi::CL_INVALID_DEVICE),
        }
    }

    pub fn device_mut(&mut self, handle: usize) -> Result<&mut Device, cl_int> {
        if let Some(idx) = self.devices.iter().position(|d| d.id == handle) {
            return Ok(&mut self.devices[idx]);
        }
        match self.objects.get_mut(&handle) {
            Some(Object { kind: ObjKind::SubDevice(device), .. }) => Ok(device),
            _ => Err(ffi::CL_INVALID_DEVICE),
        }
    }

    /// Returns the root devices of a platform matching `device_type`.
    pub fn platform_devices(&self, platform: usize, device_type: cl_bitfield) -> Vec<usize> {
        if platform != PLATFORM {
            return Vec::new();
        }
        let visible = self.devices.iter().filter(|d| !d.hidden);

        if device_type == ffi::CL_DEVICE_TYPE_DEFAULT {
            return visible.take(1).map(|d| d.id).collect();
        }
        visible.filter(|d| d.device_type & device_type != 0
                || device_type == ffi::CL_DEVICE_TYPE_ALL)
            .map(|d| d.id)
            .collect()
    }

    //========================================================================
    //============================== Lookups =================================
    //========================================================================

    pub fn context(&self, handle: usize) -> Result<&ContextObj, cl_int> {
        match self.objects.get(&handle) {
            Some(Object { kind: ObjKind::Context(obj), .. }) => Ok(obj),
            _ => Err(ffi::CL_INVALID_CONTEXT),
        }
    }

    pub fn context_mut(&mut self, handle: usize) -> Result<&mut ContextObj, cl_int> {
        match self.objects.get_mut(&handle) {
            Some(Object { kind: ObjKind::Context(obj), .. }) => Ok(obj),
            _ => Err(ffi::CL_INVALID_CONTEXT),
        }
    }

    pub fn queue(&self, handle: usize) -> Result<&QueueObj, cl_int> {
        match self.objects.get(&handle) {
            Some(Object { kind: ObjKind::Queue(obj), .. }) => Ok(obj),
            _ => Err(ffi::CL_INVALID_COMMAND_QUEUE),
        }
    }

    pub fn mem(&self, handle: usize) -> Result<&MemObj, cl_int> {
        match self.objects.get(&handle) {
            Some(Object { kind: ObjKind::Mem(obj), .. }) => Ok(obj),
            _ => Err(ffi::CL_INVALID_MEM_OBJECT),
        }
    }

    pub fn mem_mut(&mut self, handle: usize) -> Result<&mut MemObj, cl_int> {
        match self.objects.get_mut(&handle) {
            Some(Object { kind: ObjKind::Mem(obj), .. }) => Ok(obj),
            _ => Err(ffi::CL_INVALID_MEM_OBJECT),
        }
    }

    pub fn sampler(&self, handle: usize) -> Result<&SamplerObj, cl_int> {
        match self.objects.get(&handle) {
            Some(Object { kind: ObjKind::Sampler(obj), .. }) => Ok(obj),
            _ => Err(ffi::CL_INVALID_SAMPLER),
        }
    }

    pub fn program(&self, handle: usize) -> Result<&ProgramObj, cl_int> {
        match self.objects.get(&handle) {
            Some(Object { kind: ObjKind::Program(obj), .. }) => Ok(obj),
            _ => Err(ffi::CL_INVALID_PROGRAM),
        }
    }

    pub fn program_mut(&mut self, handle: usize) -> Result<&mut ProgramObj, cl_int> {
        match self.objects.get_mut(&handle) {
            Some(Object { kind: ObjKind::Program(obj), .. }) => Ok(obj),
            _ => Err(ffi::CL_INVALID_PROGRAM),
        }
    }

    pub fn kernel(&self, handle: usize) -> Result<&KernelObj, cl_int> {
        match self.objects.get(&handle) {
            Some(Object { kind: ObjKind::Kernel(obj), .. }) => Ok(obj),
            _ => Err(ffi::CL_INVALID_KERNEL),
        }
    }

    pub fn kernel_mut(&mut self, handle: usize) -> Result<&mut KernelObj, cl_int> {
        match self.objects.get_mut(&handle) {
            Some(Object { kind: ObjKind::Kernel(obj), .. }) => Ok(obj),
            _ => Err(ffi::CL_INVALID_KERNEL),
        }
    }

    pub fn event(&self, handle: usize) -> Result<&EventObj, cl_int> {
        match self.objects.get(&handle) {
            Some(Object { kind: ObjKind::Event(obj), .. }) => Ok(obj),
            _ => Err(ffi::CL_INVALID_EVENT),
        }
    }

    pub fn event_mut(&mut self, handle: usize) -> Result<&mut EventObj, cl_int> {
        match self.objects.get_mut(&handle) {
            Some(Object { kind: ObjKind::Event(obj), .. }) => Ok(obj),
            _ => Err(ffi::CL_INVALID_EVENT),
        }
    }

    //========================================================================
    //=============================== Events =================================
    //========================================================================

    /// Sets the execution status of an event and queues every callback
    /// registered for that status or an earlier one.
    pub fn set_event_status(&mut self, handle: usize, status: cl_int) {
        let clock = self.clock;
        let fired = match self.event_mut(handle) {
            Ok(event) => {
                event.status = status;
                if status <= ffi::CL_COMPLETE {
                    if let Some(ref mut prof) = event.profiling {
                        prof[3] = prof[3].max(clock);
                    }
                }
                let (fired, kept): (Vec<_>, Vec<_>) = event.callbacks.drain(..)
                    .partition(|&(trigger, _, _)| status <= trigger);
                event.callbacks = kept;
                fired
            },
            Err(_) => return,
        };

        for (_, f, user_data) in fired {
            self.pending.push(Pending::Event { f, event: handle, status, user_data });
        }
    }

    /// Counts one status query of an event, completing it on its last
    /// outstanding poll.
    pub fn poll_event(&mut self, handle: usize) {
        let completed = match self.event_mut(handle) {
            Ok(event) if event.polls_remaining > 0 => {
                event.polls_remaining -= 1;
                if event.polls_remaining == 0 {
                    true
                } else {
                    event.status = ffi::CL_RUNNING;
                    false
                }
            },
            _ => return,
        };
        self.poll_count += 1;
        if completed {
            self.set_event_status(handle, ffi::CL_COMPLETE);
        }
    }

    /// Polls an event until it completes.
    pub fn drain_event(&mut self, handle: usize) {
        while matches!(self.event(handle), Ok(e) if e.polls_remaining > 0) {
            self.poll_event(handle);
        }
    }

    /// Validates a wait list and returns true if any event in it terminated
    /// abnormally.
    pub fn check_wait_list(&self, context: usize, wait_list: &[usize])
            -> Result<bool, cl_int> {
        let mut failed = false;
        for &handle in wait_list {
            let event = self.event(handle).map_err(|_| ffi::CL_INVALID_EVENT_WAIT_LIST)?;
            if event.context != context {
                return Err(ffi::CL_INVALID_CONTEXT);
            }
            failed |= event.status < 0;
        }
        Ok(failed)
    }

    /// Finishes an enqueued command: blocks for a blocking command, and
    /// creates its event if requested.
    pub fn complete_command(&mut self, queue: usize, command_type: cl_uint, blocking: bool,
            wait_failed: bool, want_event: bool) -> Result<Option<usize>, cl_int> {
        let (context, profiling) = {
            let q = self.queue(queue)?;
            (q.context, q.properties & ffi::CL_QUEUE_PROFILING_ENABLE != 0)
        };

        if blocking {
            self.poll_count += self.completion_polls as u64;
            if wait_failed {
                return Err(ffi::CL_EXEC_STATUS_ERROR_FOR_EVENTS_IN_WAIT_LIST);
            }
        }

        let start = self.clock;
        self.clock += 1000;

        if !want_event {
            return Ok(None);
        }

        let polls_remaining = if blocking || wait_failed { 0 } else { self.completion_polls };
        let status = if wait_failed {
            ffi::CL_EXEC_STATUS_ERROR_FOR_EVENTS_IN_WAIT_LIST
        } else if polls_remaining == 0 {
            ffi::CL_COMPLETE
        } else {
            ffi::CL_SUBMITTED
        };

        let event = EventObj {
            context,
            queue: Some(queue),
            command_type,
            status,
            polls_remaining,
            user: false,
            callbacks: Vec::new(),
            profiling: if profiling {
                Some([start, start + 100, start + 200, start + 300])
            } else {
                None
            },
        };

        self.retain_implicit(queue);
        Ok(Some(self.insert(ObjKind::Event(event))))
    }

    /// Completes every outstanding command event of a queue.
    pub fn finish_queue(&mut self, queue: usize) {
        let outstanding: Vec<usize> = self.objects.iter()
            .filter_map(|(&handle, obj)| match obj.kind {
                ObjKind::Event(ref e) if e.queue == Some(queue) && e.polls_remaining > 0 =>
                    Some(handle),
                _ => None,
            })
            .collect();

        for handle in outstanding {
            self.drain_event(handle);
        }
    }
}

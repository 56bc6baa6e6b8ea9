//! An OpenCL kernel.

use std::ops::Deref;
use clbind_core::{self as core, Kernel as KernelCore, Mem as MemCore, DeviceId as DeviceIdCore,
    KernelInfo, KernelArgInfo, KernelWorkGroupInfo, InfoResult, OclPrm};
use crate::error::{Error, Result};
use crate::standard::{Program, Queue, Buffer, Image, Sampler, EventList};


/// A kernel argument.
#[derive(Debug, Clone)]
pub enum KernelArg<'a> {
    /// A buffer or image.
    Mem(&'a MemCore),
    /// A null memory object (`__global` pointers only).
    MemNull,
    Sampler(&'a Sampler),
    SamplerNull,
    /// The bytes of a scalar or vector value.
    Scalar(Vec<u8>),
    /// A `__local` buffer of the given size in bytes.
    Local(usize),
}

impl<'a> KernelArg<'a> {
    pub fn buffer<T: OclPrm>(buffer: &'a Buffer<T>) -> KernelArg<'a> {
        KernelArg::Mem(buffer.core())
    }

    pub fn image(image: &'a Image) -> KernelArg<'a> {
        KernelArg::Mem(image.core())
    }

    pub fn sampler(sampler: &'a Sampler) -> KernelArg<'a> {
        KernelArg::Sampler(sampler)
    }

    /// A scalar argument holding `val`.
    pub fn scalar<T: OclPrm>(val: T) -> KernelArg<'a> {
        KernelArg::Scalar(core::util::as_bytes(&val).to_vec())
    }

    /// A vector argument (`float4` and the like) holding `vals`.
    pub fn vector<T: OclPrm>(vals: &[T]) -> KernelArg<'a> {
        KernelArg::Scalar(core::util::slice_as_bytes(vals).to_vec())
    }

    /// A `__local` buffer of `len` elements of `T`.
    pub fn local<T: OclPrm>(len: usize) -> KernelArg<'a> {
        KernelArg::Local(len * std::mem::size_of::<T>())
    }

    fn as_core(&self) -> core::KernelArg {
        match *self {
            KernelArg::Mem(mem) => core::KernelArg::Mem(mem),
            KernelArg::MemNull => core::KernelArg::MemNull,
            KernelArg::Sampler(sampler) => core::KernelArg::Sampler(sampler.core()),
            KernelArg::SamplerNull => core::KernelArg::SamplerNull,
            KernelArg::Scalar(ref bytes) => core::KernelArg::Scalar(bytes),
            KernelArg::Local(size) => core::KernelArg::Local(size),
        }
    }
}


/// Checks a work size list: one to three entries, each non-zero.
fn check_work_sizes(what: &str, sizes: &[usize]) -> Result<()> {
    if sizes.is_empty() || sizes.len() > 3 {
        return Err(Error::invalid(format!("Invalid number of {} dimensions: {} (1 to 3 \
            allowed).", what, sizes.len())));
    }
    if sizes.iter().any(|&s| s == 0) {
        return Err(Error::invalid(format!("Invalid {} size: {:?} (sizes must be non-zero).",
            what, sizes)));
    }
    Ok(())
}


/// A kernel: a function of a built program and the arguments it will be
/// enqueued with.
///
/// Setting arguments is not thread-safe, so it takes `&mut self`.
///
/// Memory object and sampler arguments are retained until replaced or until
/// the kernel is dropped.
#[derive(Debug)]
pub struct Kernel {
    obj_core: KernelCore,
    name: String,
    num_args: u32,
    mem_args: Vec<Option<MemCore>>,
    sampler_args: Vec<Option<Sampler>>,
}

impl Kernel {
    /// Creates the kernel called `name` in `program`, which must be built.
    pub fn new(program: &Program, name: &str) -> Result<Kernel> {
        let obj_core = core::create_kernel(program, name)?;
        Kernel::from_core(obj_core)
    }

    /// Wraps a core kernel, querying its name and argument count.
    pub fn from_core(obj_core: KernelCore) -> Result<Kernel> {
        let name = core::get_kernel_name(&obj_core)?;
        let num_args = match core::get_kernel_info(&obj_core, KernelInfo::NumArgs)? {
            InfoResult::Uint(n) => n,
            other => return Err(format!("Kernel::from_core: unexpected info result: {:?}",
                other).into()),
        };
        Ok(Kernel {
            obj_core,
            name,
            num_args,
            mem_args: vec![None; num_args as usize],
            sampler_args: vec![None; num_args as usize],
        })
    }

    /// Sets the argument at `arg_idx`.
    pub fn set_arg(&mut self, arg_idx: u32, arg: KernelArg) -> Result<()> {
        if arg_idx >= self.num_args {
            return Err(Error::out_of_range("Kernel argument", arg_idx as usize,
                self.num_args as usize));
        }
        core::set_kernel_arg(&self.obj_core, arg_idx, arg.as_core())?;

        let idx = arg_idx as usize;
        self.mem_args[idx] = match arg {
            KernelArg::Mem(mem) => Some(mem.clone()),
            _ => None,
        };
        self.sampler_args[idx] = match arg {
            KernelArg::Sampler(sampler) => Some(sampler.clone()),
            _ => None,
        };
        Ok(())
    }

    /// Sets a scalar argument.
    pub fn set_arg_scalar<T: OclPrm>(&mut self, arg_idx: u32, val: T) -> Result<()> {
        self.set_arg(arg_idx, KernelArg::scalar(val))
    }

    /// Sets a buffer argument.
    pub fn set_arg_buffer<T: OclPrm>(&mut self, arg_idx: u32, buffer: &Buffer<T>) -> Result<()> {
        self.set_arg(arg_idx, KernelArg::buffer(buffer))
    }

    /// Sets a `__local` argument of `len` elements of `T`.
    pub fn set_arg_local<T: OclPrm>(&mut self, arg_idx: u32, len: usize) -> Result<()> {
        self.set_arg(arg_idx, KernelArg::local::<T>(len))
    }

    /// Enqueues the kernel over an N-dimensional range.
    ///
    /// `global` has one to three non-zero sizes. `local` and `offset`, when
    /// given, must have as many dimensions as `global` (`local` sizes
    /// non-zero). Every argument must have been set.
    pub fn enqueue_nd_range(&self, queue: &Queue, global: &[usize], local: Option<&[usize]>,
            offset: Option<&[usize]>, events: Option<&mut EventList>, wait: Option<&EventList>)
            -> Result<()>
    {
        check_work_sizes("global work", global)?;
        let dims = global.len();

        let local = match local {
            Some(local) => {
                check_work_sizes("local work", local)?;
                if local.len() != dims {
                    return Err(Error::invalid(format!("Number of dimensions differ: {} \
                        (global), {} (local).", dims, local.len())));
                }
                Some(super::to_3d(local, 1))
            },
            None => None,
        };

        let offset = match offset {
            Some(offset) => {
                if offset.len() != dims {
                    return Err(Error::invalid(format!("Number of dimensions differ: {} \
                        (global), {} (offset).", dims, offset.len())));
                }
                Some(super::to_3d(offset, 0))
            },
            None => None,
        };

        let global = super::to_3d(global, 1);
        EventList::enqueue_with(events, |sink| unsafe {
            core::enqueue_kernel(queue, &self.obj_core, dims as u32, offset, &global, local,
                wait, sink)
        })
    }

    /// Enqueues the kernel as a single work item.
    pub fn enqueue_task(&self, queue: &Queue, events: Option<&mut EventList>,
            wait: Option<&EventList>) -> Result<()>
    {
        EventList::enqueue_with(events, |sink| unsafe {
            core::enqueue_task(queue, &self.obj_core, wait, sink)
        })
    }

    /// Returns the kernel function name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of arguments the kernel function takes.
    pub fn num_args(&self) -> u32 {
        self.num_args
    }

    /// Returns info about this kernel.
    pub fn info(&self, info_kind: KernelInfo) -> Result<InfoResult> {
        core::get_kernel_info(&self.obj_core, info_kind).map_err(Error::from)
    }

    /// Returns info about the argument at `arg_idx`. Requires the program
    /// to have been built with `-cl-kernel-arg-info`.
    pub fn arg_info(&self, arg_idx: u32, info_kind: KernelArgInfo) -> Result<InfoResult> {
        core::get_kernel_arg_info(&self.obj_core, arg_idx, info_kind).map_err(Error::from)
    }

    /// Returns work group info of this kernel on `device`.
    pub fn work_group_info<D: AsRef<DeviceIdCore>>(&self, device: D,
            info_kind: KernelWorkGroupInfo) -> Result<InfoResult>
    {
        core::get_kernel_work_group_info(&self.obj_core, device.as_ref(), info_kind)
            .map_err(Error::from)
    }

    /// Returns the largest work group this kernel can be enqueued with on
    /// `device`.
    pub fn max_wg_size<D: AsRef<DeviceIdCore>>(&self, device: D) -> Result<usize> {
        let info = self.work_group_info(device, KernelWorkGroupInfo::WorkGroupSize)?;
        info.as_size().ok_or_else(|| format!("Kernel::max_wg_size: unexpected info result: \
            {:?}", info).into())
    }

    /// Returns a reference to the core pointer wrapper, usable by functions in
    /// the `core` module.
    #[inline]
    pub fn core(&self) -> &KernelCore {
        &self.obj_core
    }

    fn fmt_info(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Kernel")
            .field("FunctionName", &self.info(KernelInfo::FunctionName))
            .field("ReferenceCount", &self.info(KernelInfo::ReferenceCount))
            .field("Context", &self.info(KernelInfo::Context))
            .field("Program", &self.info(KernelInfo::Program))
            .field("Attributes", &self.info(KernelInfo::Attributes))
            .finish()
    }
}

impl std::fmt::Display for Kernel {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        self.fmt_info(f)
    }
}

impl AsRef<KernelCore> for Kernel {
    fn as_ref(&self) -> &KernelCore {
        &self.obj_core
    }
}

impl Deref for Kernel {
    type Target = KernelCore;

    fn deref(&self) -> &KernelCore {
        &self.obj_core
    }
}

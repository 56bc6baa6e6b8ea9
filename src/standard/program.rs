//! An OpenCL program.

use std::ffi::CString;
use std::ops::Deref;
use clbind_core::{self as core, Program as ProgramCore, DeviceId as DeviceIdCore, ProgramInfo,
    ProgramBuildInfo, BuildStatus, BuildCallback, InfoResult};
use crate::error::{Error, Result};
use crate::standard::{Context, Device, DeviceList, Kernel};


/// The ways a program can be created.
#[derive(Clone, Debug)]
pub enum ProgramSource {
    /// OpenCL C source strings, concatenated in order.
    Source(Vec<String>),
    /// One binary per device of the device list.
    Binary(Vec<Vec<u8>>),
    /// A `;` separated list of built-in kernel names.
    BuiltInKernels(String),
    /// Compiled programs (see `Program::compile`) linked with `options`.
    Link { programs: Vec<Program>, options: String },
}

fn cstring<S: Into<Vec<u8>>>(s: S) -> Result<CString> {
    CString::new(s).map_err(|err| Error::from(core::Error::from(err)))
}

/// Returns the device ids of `devices`, rejecting an explicit empty list.
fn device_ids(devices: Option<&DeviceList>, caller: &str) -> Result<Option<Vec<DeviceIdCore>>> {
    match devices {
        Some(list) if list.is_empty() => {
            Err(Error::invalid(format!("{}: the device list is empty.", caller)))
        },
        Some(list) => Ok(Some(list.ids())),
        None => Ok(None),
    }
}


/// A program: source, binaries, or built-in kernels, and the executables
/// built from them for one or more devices.
///
/// Clones share the underlying program object.
#[derive(Clone, Debug)]
pub struct Program {
    obj_core: ProgramCore,
}

impl Program {
    /// Creates a program from `source`. `devices` names the devices for
    /// binaries and built-in kernels (required) and for linking (optional,
    /// defaulting to every device of `context`); it is unused for source.
    pub fn new(context: &Context, source: ProgramSource, devices: Option<&DeviceList>)
            -> Result<Program>
    {
        match source {
            ProgramSource::Source(strings) => Program::with_source(context, &strings),
            ProgramSource::Binary(binaries) => {
                let devices = devices.ok_or_else(|| Error::invalid("Program::new: a device \
                    list is required to create a program from binaries."))?;
                let binaries: Vec<&[u8]> = binaries.iter().map(|b| b.as_slice()).collect();
                Program::with_binary(context, devices, &binaries)
            },
            ProgramSource::BuiltInKernels(names) => {
                let devices = devices.ok_or_else(|| Error::invalid("Program::new: a device \
                    list is required to create a program from built-in kernels."))?;
                Program::with_built_in_kernels(context, devices, &names)
            },
            ProgramSource::Link { programs, options } => {
                let programs: Vec<&Program> = programs.iter().collect();
                Program::link(context, &programs, &options, devices)
            },
        }
    }

    /// Creates an unbuilt program from source strings.
    pub fn with_source<S: AsRef<str>>(context: &Context, src_strings: &[S]) -> Result<Program> {
        if src_strings.is_empty() {
            return Err(Error::invalid("Program::with_source: no source strings given."));
        }
        let strings = src_strings.iter()
            .map(|s| cstring(s.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        let obj_core = core::create_program_with_source(context, &strings)?;
        Ok(Program { obj_core })
    }

    /// Creates a program from one binary per device in `devices`.
    ///
    /// The program must still be built before kernels are created from it.
    pub fn with_binary(context: &Context, devices: &DeviceList, binaries: &[&[u8]])
            -> Result<Program>
    {
        if devices.len() != binaries.len() {
            return Err(Error::invalid(format!("Program::with_binary: {} binaries given for {} \
                devices.", binaries.len(), devices.len())));
        }
        let obj_core = core::create_program_with_binary(context, &devices.ids(), binaries)?;
        Ok(Program { obj_core })
    }

    /// Creates a program from the built-in kernels named in `kernel_names`
    /// (`;` separated) which every device of `devices` provides.
    pub fn with_built_in_kernels(context: &Context, devices: &DeviceList, kernel_names: &str)
            -> Result<Program>
    {
        if devices.is_empty() {
            return Err(Error::invalid("Program::with_built_in_kernels: the device list is \
                empty."));
        }
        let names = cstring(kernel_names)?;
        let obj_core = core::create_program_with_built_in_kernels(context, &devices.ids(),
            &names)?;
        Ok(Program { obj_core })
    }

    /// Creates a program from source and builds it.
    pub fn create_build<S: AsRef<str>>(context: &Context, src_strings: &[S], options: &str,
            devices: Option<&DeviceList>) -> Result<Program>
    {
        let program = Program::with_source(context, src_strings)?;
        program.build(options, devices)?;
        Ok(program)
    }

    /// Links compiled programs into a new executable program.
    pub fn link(context: &Context, programs: &[&Program], options: &str,
            devices: Option<&DeviceList>) -> Result<Program>
    {
        if programs.is_empty() {
            return Err(Error::invalid("Program::link: no programs given."));
        }
        let ids = device_ids(devices, "Program::link")?;
        let inputs: Vec<&ProgramCore> = programs.iter().map(|p| &p.obj_core).collect();
        let obj_core = core::link_program(context, ids.as_deref(), &cstring(options)?, &inputs,
            None)?;
        Ok(Program { obj_core })
    }

    /// Builds the program for `devices` (every device of the program when
    /// `None`).
    ///
    /// A build failure returns an error carrying the build log (see
    /// `Error::build_log`).
    pub fn build(&self, options: &str, devices: Option<&DeviceList>) -> Result<()> {
        let ids = device_ids(devices, "Program::build")?;
        core::build_program(&self.obj_core, ids.as_deref(), &cstring(options)?, None)
            .map_err(Error::from)
    }

    /// Builds the program, calling `callback` once the build completes.
    ///
    /// The driver may return before the build is done.
    pub fn build_with_callback<C>(&self, options: &str, devices: Option<&DeviceList>,
            callback: C) -> Result<()>
            where C: BuildCallback
    {
        let ids = device_ids(devices, "Program::build_with_callback")?;
        core::build_program(&self.obj_core, ids.as_deref(), &cstring(options)?,
            Some(Box::new(callback))).map_err(Error::from)
    }

    /// Compiles the program's source without linking.
    ///
    /// `headers` maps include names to header programs (created from
    /// source): `#include "name"` in the source resolves to the matching
    /// program.
    pub fn compile<'p, H, S>(&self, headers: H, options: &str, devices: Option<&DeviceList>)
            -> Result<()>
            where H: IntoIterator<Item = (S, &'p Program)>, S: AsRef<str>
    {
        let ids = device_ids(devices, "Program::compile")?;
        let mut header_programs = Vec::new();
        let mut header_names = Vec::new();
        for (name, program) in headers {
            header_names.push(cstring(name.as_ref())?);
            header_programs.push(&program.obj_core);
        }
        core::compile_program(&self.obj_core, ids.as_deref(), &cstring(options)?,
            &header_programs, &header_names, None).map_err(Error::from)
    }

    /// Returns info about this program.
    pub fn info(&self, info_kind: ProgramInfo) -> Result<InfoResult> {
        core::get_program_info(&self.obj_core, info_kind).map_err(Error::from)
    }

    /// Returns build info for `device`.
    pub fn build_info<D: AsRef<DeviceIdCore>>(&self, device: D, info_kind: ProgramBuildInfo)
            -> Result<InfoResult>
    {
        core::get_program_build_info(&self.obj_core, device.as_ref(), info_kind)
            .map_err(Error::from)
    }

    /// Returns the build status for `device`.
    pub fn build_status<D: AsRef<DeviceIdCore>>(&self, device: D) -> Result<BuildStatus> {
        match self.build_info(device, ProgramBuildInfo::BuildStatus)? {
            InfoResult::BuildStatus(status) => Ok(status),
            other => Err(format!("Program::build_status: unexpected info result: {:?}",
                other).into()),
        }
    }

    /// Returns the build logs of `devices` (every device of the program
    /// when `None`) joined by newlines. Empty logs are skipped.
    pub fn build_log(&self, devices: Option<&DeviceList>) -> Result<String> {
        let ids = match devices {
            Some(list) => list.ids(),
            None => self.devices()?.ids(),
        };
        core::program_build_log(&self.obj_core, &ids).map_err(Error::from)
    }

    /// Returns the devices this program is associated with.
    pub fn devices(&self) -> Result<DeviceList> {
        match self.info(ProgramInfo::Devices)? {
            InfoResult::Devices(ids) => Ok(DeviceList::from_devices(ids)),
            other => Err(format!("Program::devices: unexpected info result: {:?}",
                other).into()),
        }
    }

    /// Returns the names of the kernels in the built program.
    pub fn kernel_names(&self) -> Result<Vec<String>> {
        Ok(self.info(ProgramInfo::KernelNames)?.into_string()?
            .split(';')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_owned)
            .collect())
    }

    /// Returns the program binary of each device, in the order of
    /// `devices()`.
    pub fn binaries(&self) -> Result<Vec<Vec<u8>>> {
        core::get_program_binaries(&self.obj_core).map_err(Error::from)
    }

    /// Returns the binary built for `device`.
    pub fn binary(&self, device: Device) -> Result<Vec<u8>> {
        let devices = self.devices()?;
        let idx = devices.iter().position(|&d| d == device).ok_or_else(|| Error::invalid(
            format!("Program::binary: the program is not associated with {:?}.", device)))?;
        let mut binaries = self.binaries()?;
        if idx >= binaries.len() {
            return Err(Error::out_of_range("Binary", idx, binaries.len()));
        }
        Ok(binaries.swap_remove(idx))
    }

    /// Creates the kernel named `name`.
    pub fn create_kernel(&self, name: &str) -> Result<Kernel> {
        Kernel::new(self, name)
    }

    /// Creates a kernel for every kernel function in the program.
    pub fn create_kernels(&self) -> Result<Vec<Kernel>> {
        core::create_kernels_in_program(&self.obj_core)?
            .into_iter()
            .map(Kernel::from_core)
            .collect()
    }

    /// Returns a reference to the core pointer wrapper, usable by functions in
    /// the `core` module.
    #[inline]
    pub fn core(&self) -> &ProgramCore {
        &self.obj_core
    }

    fn fmt_info(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Program")
            .field("ReferenceCount", &self.info(ProgramInfo::ReferenceCount))
            .field("Context", &self.info(ProgramInfo::Context))
            .field("NumDevices", &self.info(ProgramInfo::NumDevices))
            .field("Devices", &self.info(ProgramInfo::Devices))
            .field("BinarySizes", &self.info(ProgramInfo::BinarySizes))
            .field("NumKernels", &self.info(ProgramInfo::NumKernels))
            .field("KernelNames", &self.info(ProgramInfo::KernelNames))
            .finish()
    }
}

impl std::fmt::Display for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        self.fmt_info(f)
    }
}

impl AsRef<ProgramCore> for Program {
    fn as_ref(&self) -> &ProgramCore {
        &self.obj_core
    }
}

impl Deref for Program {
    type Target = ProgramCore;

    fn deref(&self) -> &ProgramCore {
        &self.obj_core
    }
}

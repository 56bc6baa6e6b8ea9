//! Bitfield parameter domains.

use bitflags::bitflags;
use crate::ffi;

bitflags! {
    /// cl_device_type - bitfield
    ///
    /// * `CL_DEVICE_TYPE_DEFAULT`: The default OpenCL device in the system.
    /// * `CL_DEVICE_TYPE_CPU`: An OpenCL device that is the host processor.
    /// * `CL_DEVICE_TYPE_GPU`: An OpenCL device that is a GPU.
    /// * `CL_DEVICE_TYPE_ACCELERATOR`: Dedicated OpenCL accelerators (for
    ///   example the IBM CELL Blade).
    /// * `CL_DEVICE_TYPE_CUSTOM`: Dedicated accelerators that do not support
    ///   programs written in OpenCL C.
    /// * `CL_DEVICE_TYPE_ALL`: All OpenCL devices available in the system
    ///   except `CL_DEVICE_TYPE_CUSTOM` devices.
    pub struct DeviceType: u64 {
        const DEFAULT = ffi::CL_DEVICE_TYPE_DEFAULT;
        const CPU = ffi::CL_DEVICE_TYPE_CPU;
        const GPU = ffi::CL_DEVICE_TYPE_GPU;
        const ACCELERATOR = ffi::CL_DEVICE_TYPE_ACCELERATOR;
        const CUSTOM = ffi::CL_DEVICE_TYPE_CUSTOM;
        const ALL = ffi::CL_DEVICE_TYPE_ALL;
    }
}

impl DeviceType {
    /// Parses one of `DEFAULT`, `CPU`, `GPU`, `ACCELERATOR`, `CUSTOM`, or
    /// `ALL`.
    pub fn from_name(name: &str) -> Option<DeviceType> {
        match name.trim() {
            "DEFAULT" => Some(DeviceType::DEFAULT),
            "CPU" => Some(DeviceType::CPU),
            "GPU" => Some(DeviceType::GPU),
            "ACCELERATOR" => Some(DeviceType::ACCELERATOR),
            "CUSTOM" => Some(DeviceType::CUSTOM),
            "ALL" => Some(DeviceType::ALL),
            _ => None,
        }
    }
}

impl Default for DeviceType {
    fn default() -> DeviceType {
        DeviceType::ALL
    }
}

bitflags! {
    /// cl_device_fp_config - bitfield
    pub struct DeviceFpConfig: u64 {
        const DENORM = ffi::CL_FP_DENORM;
        const INF_NAN = ffi::CL_FP_INF_NAN;
        const ROUND_TO_NEAREST = ffi::CL_FP_ROUND_TO_NEAREST;
        const ROUND_TO_ZERO = ffi::CL_FP_ROUND_TO_ZERO;
        const ROUND_TO_INF = ffi::CL_FP_ROUND_TO_INF;
        const FMA = ffi::CL_FP_FMA;
        const SOFT_FLOAT = ffi::CL_FP_SOFT_FLOAT;
        const CORRECTLY_ROUNDED_DIVIDE_SQRT = ffi::CL_FP_CORRECTLY_ROUNDED_DIVIDE_SQRT;
    }
}

bitflags! {
    /// cl_device_exec_capabilities - bitfield
    pub struct DeviceExecCapabilities: u64 {
        const KERNEL = ffi::CL_EXEC_KERNEL;
        const NATIVE_KERNEL = ffi::CL_EXEC_NATIVE_KERNEL;
    }
}

bitflags! {
    /// cl_command_queue_properties - bitfield
    pub struct CommandQueueProperties: u64 {
        const OUT_OF_ORDER_EXEC_MODE_ENABLE = ffi::CL_QUEUE_OUT_OF_ORDER_EXEC_MODE_ENABLE;
        const PROFILING_ENABLE = ffi::CL_QUEUE_PROFILING_ENABLE;
    }
}

bitflags! {
    /// cl_device_affinity_domain - bitfield
    pub struct DeviceAffinityDomain: u64 {
        const NUMA = ffi::CL_DEVICE_AFFINITY_DOMAIN_NUMA;
        const L4_CACHE = ffi::CL_DEVICE_AFFINITY_DOMAIN_L4_CACHE;
        const L3_CACHE = ffi::CL_DEVICE_AFFINITY_DOMAIN_L3_CACHE;
        const L2_CACHE = ffi::CL_DEVICE_AFFINITY_DOMAIN_L2_CACHE;
        const L1_CACHE = ffi::CL_DEVICE_AFFINITY_DOMAIN_L1_CACHE;
        const NEXT_PARTITIONABLE = ffi::CL_DEVICE_AFFINITY_DOMAIN_NEXT_PARTITIONABLE;
    }
}

bitflags! {
    /// cl_mem_flags - bitfield
    pub struct MemFlags: u64 {
        const READ_WRITE = ffi::CL_MEM_READ_WRITE;
        const WRITE_ONLY = ffi::CL_MEM_WRITE_ONLY;
        const READ_ONLY = ffi::CL_MEM_READ_ONLY;
        const USE_HOST_PTR = ffi::CL_MEM_USE_HOST_PTR;
        const ALLOC_HOST_PTR = ffi::CL_MEM_ALLOC_HOST_PTR;
        const COPY_HOST_PTR = ffi::CL_MEM_COPY_HOST_PTR;
        const HOST_WRITE_ONLY = ffi::CL_MEM_HOST_WRITE_ONLY;
        const HOST_READ_ONLY = ffi::CL_MEM_HOST_READ_ONLY;
        const HOST_NO_ACCESS = ffi::CL_MEM_HOST_NO_ACCESS;
    }
}

impl MemFlags {
    /// Returns `true` if these flags require a host pointer at creation.
    pub fn requires_host_ptr(&self) -> bool {
        self.intersects(MemFlags::USE_HOST_PTR | MemFlags::COPY_HOST_PTR)
    }
}

impl Default for MemFlags {
    fn default() -> MemFlags {
        MemFlags::READ_WRITE
    }
}

bitflags! {
    /// cl_mem_migration_flags - bitfield
    pub struct MemMigrationFlags: u64 {
        const OBJECT_HOST = ffi::CL_MIGRATE_MEM_OBJECT_HOST;
        const OBJECT_CONTENT_UNDEFINED = ffi::CL_MIGRATE_MEM_OBJECT_CONTENT_UNDEFINED;
    }
}

bitflags! {
    /// cl_map_flags - bitfield
    pub struct MapFlags: u64 {
        const READ = ffi::CL_MAP_READ;
        const WRITE = ffi::CL_MAP_WRITE;
        const WRITE_INVALIDATE_REGION = ffi::CL_MAP_WRITE_INVALIDATE_REGION;
    }
}

bitflags! {
    /// cl_kernel_arg_type_qualifer - bitfield
    pub struct KernelArgTypeQualifier: u64 {
        const NONE = ffi::CL_KERNEL_ARG_TYPE_NONE;
        const CONST = ffi::CL_KERNEL_ARG_TYPE_CONST;
        const RESTRICT = ffi::CL_KERNEL_ARG_TYPE_RESTRICT;
        const VOLATILE = ffi::CL_KERNEL_ARG_TYPE_VOLATILE;
    }
}

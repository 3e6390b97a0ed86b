//! 驱动的全局资源
//!
//! 按发现的区域数预留一段连续的字符设备号，并创建所有实例共用的设备类。
//! 获取顺序为设备号、设备类；释放顺序与之相反。

use core::fmt;

use log::{info, warn};

use crate::devno::{DevT, MAX_MAJOR, MINORMASK, major, makedev, minor};
use crate::error::RpadError;
use crate::ops::{ClassHandle, KernelRef};
use crate::sysconfig::SystemConfig;

/// 设备号区间与设备类的名称
pub const RPAD_NAME: &str = "rpad";

/// 已预留的字符设备号区间，离开作用域时释放
pub struct ChrdevRegion {
    ops: KernelRef,
    first: DevT,
    count: u32,
}

impl ChrdevRegion {
    /// 预留从 `first` 开始的 `count` 个设备号
    pub fn register(ops: &KernelRef, first: DevT, count: u32) -> Result<Self, RpadError> {
        ops.register_chrdev_region(first, count, RPAD_NAME)?;
        Ok(Self {
            ops: ops.clone(),
            first,
            count,
        })
    }

    /// 由内核分配 major，预留从 `first_minor` 开始的 `count` 个设备号
    pub fn alloc(ops: &KernelRef, first_minor: u32, count: u32) -> Result<Self, RpadError> {
        let first = ops.alloc_chrdev_region(first_minor, count, RPAD_NAME)?;
        Ok(Self {
            ops: ops.clone(),
            first,
            count,
        })
    }

    /// 起始设备号
    #[inline]
    pub fn first(&self) -> DevT {
        self.first
    }

    /// 设备号个数
    #[inline]
    pub fn count(&self) -> u32 {
        self.count
    }
}

impl Drop for ChrdevRegion {
    fn drop(&mut self) {
        self.ops.unregister_chrdev_region(self.first, self.count);
    }
}

/// 设备类，离开作用域时销毁
pub struct DeviceClass {
    ops: KernelRef,
    handle: ClassHandle,
}

impl DeviceClass {
    /// 创建名为 `name` 的设备类
    pub fn create(ops: &KernelRef, name: &str) -> Result<Self, RpadError> {
        let handle = ops.class_create(name)?;
        Ok(Self {
            ops: ops.clone(),
            handle,
        })
    }

    /// 设备类句柄
    #[inline]
    pub fn handle(&self) -> ClassHandle {
        self.handle
    }
}

impl Drop for DeviceClass {
    fn drop(&mut self) {
        self.ops.class_destroy(self.handle);
    }
}

/// 设备号区间和设备类
///
/// 字段的声明顺序即丢弃顺序：先销毁设备类，再释放设备号。
pub struct Architecture {
    class: DeviceClass,
    region: ChrdevRegion,
}

impl Architecture {
    /// 为 `count` 个区域准备设备号和设备类
    ///
    /// `major` 非 0 时使用固定的 `major:minor` 作为起点，否则由内核分配 major。
    /// 设备类创建失败时，刚预留的设备号先被释放再返回错误。
    /// major 或 minor 区间超出设备号位宽时返回 [`RpadError::InvalidArgument`]。
    pub fn prepare(
        ops: &KernelRef,
        fixed_major: u32,
        first_minor: u32,
        count: u32,
    ) -> Result<Self, RpadError> {
        if fixed_major > MAX_MAJOR
            || count == 0
            || u64::from(first_minor) + u64::from(count) > u64::from(MINORMASK) + 1
        {
            warn!(
                "rpad: device numbers {}:{}+{} out of range",
                fixed_major, first_minor, count
            );
            return Err(RpadError::InvalidArgument);
        }

        let region = if fixed_major != 0 {
            ChrdevRegion::register(ops, makedev(fixed_major, first_minor), count)
        } else {
            ChrdevRegion::alloc(ops, first_minor, count)
        }
        .inspect_err(|_| warn!("rpad: can't get major {}", fixed_major))?;

        let class = DeviceClass::create(ops, RPAD_NAME)
            .inspect_err(|_| warn!("rpad: class setup error"))?;

        Ok(Self { class, region })
    }

    /// 销毁设备类，然后释放设备号
    pub fn unprepare(self) {
        let Architecture { class, region } = self;
        drop(class);
        drop(region);
    }

    /// 起始设备号
    #[inline]
    pub fn first_devt(&self) -> DevT {
        self.region.first()
    }

    /// 预留的设备号个数
    #[inline]
    pub fn count(&self) -> u32 {
        self.region.count()
    }

    /// 设备类句柄
    #[inline]
    pub fn class(&self) -> ClassHandle {
        self.class.handle()
    }
}

impl fmt::Debug for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Architecture({}:{}+{})",
            major(self.first_devt()),
            minor(self.first_devt()),
            self.count()
        )
    }
}

/// 按 `sys` 中已校验的区域数准备全局资源
pub fn prepare_architecture(sys: &mut SystemConfig) -> Result<(), RpadError> {
    if sys.arch.is_some() {
        return Err(RpadError::AlreadyExists);
    }
    if sys.nr_of_regions == 0 {
        return Err(RpadError::InvalidArgument);
    }

    let arch = Architecture::prepare(
        &sys.ops,
        sys.params.major,
        sys.params.minor,
        sys.nr_of_regions,
    )?;

    let first = arch.first_devt();
    info!(
        "rpad: registered as {}:{}-{}",
        major(first),
        minor(first),
        minor(first) + arch.count() - 1
    );

    sys.arch = Some(arch);
    Ok(())
}

/// 释放 [`prepare_architecture`] 准备的全局资源
pub fn unprepare_architecture(sys: &mut SystemConfig) {
    match sys.arch.take() {
        Some(arch) => arch.unprepare(),
        None => warn!("rpad: unprepare without prepared architecture"),
    }
}

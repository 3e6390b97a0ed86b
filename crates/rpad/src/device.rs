//! 设备实例的公共部分
//!
//! 每个已安装的功能块都由其类型的处理程序分配一个类型专属结构体，
//! 该结构体以组合方式拥有一个 [`DeviceInstance`]。驱动核心只通过
//! [`RpadDevice`](crate::RpadDevice) 访问这部分公共字段。
//!
//! 单个区域的资源按以下顺序获取，任何一步失败时已获取的资源按相反顺序自动释放：
//!
//! 1. I/O 窗口（[`IoRegion`]）
//! 2. 设备模型节点（[`DeviceNode`]）
//! 3. 处理程序分配的类型专属结构体
//! 4. 字符设备注册（[`CharDevice`]）

use alloc::string::String;
use core::fmt;

use log::warn;
use sync::{SpinLock, SpinLockGuard};

use crate::devno::DevT;
use crate::devtype::DevTypeData;
use crate::error::RpadError;
use crate::io::IoRegion;
use crate::ops::{ClassHandle, KernelRef, NodeHandle};

/// 设备模型节点
///
/// 持有创建时得到的那一份引用，离开作用域时销毁节点，不做额外的引用计数。
pub struct DeviceNode {
    ops: KernelRef,
    class: ClassHandle,
    devt: DevT,
    handle: NodeHandle,
    name: String,
}

impl DeviceNode {
    /// 在 `class` 下创建名为 `name` 的设备节点
    pub fn create(
        ops: &KernelRef,
        class: ClassHandle,
        devt: DevT,
        name: String,
    ) -> Result<Self, RpadError> {
        let handle = ops.device_create(class, devt, &name)?;
        Ok(Self {
            ops: ops.clone(),
            class,
            devt,
            handle,
            name,
        })
    }

    /// 节点名，例如 `rpad_scope0`
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 不透明的设备模型句柄
    #[inline]
    pub fn handle(&self) -> NodeHandle {
        self.handle
    }
}

impl Drop for DeviceNode {
    fn drop(&mut self) {
        self.ops.device_destroy(self.class, self.devt);
    }
}

/// 字符设备注册
///
/// 一次 `cdev_add` 对应一次 `cdev_del`，离开作用域时注销。
pub struct CharDevice {
    ops: KernelRef,
    devt: DevT,
}

impl CharDevice {
    /// 注册设备号为 `devt` 的单个字符设备
    pub fn add(ops: &KernelRef, devt: DevT) -> Result<Self, RpadError> {
        ops.cdev_add(devt, 1)?;
        Ok(Self {
            ops: ops.clone(),
            devt,
        })
    }
}

impl Drop for CharDevice {
    fn drop(&mut self) {
        self.ops.cdev_del(self.devt, 1);
    }
}

/// 交给处理程序 `setup` 的临时快照
///
/// 包含安装器为该区域准备好的公共资源。`setup` 按值接收快照，
/// 需要的资源通过 [`DeviceInstance::new`] 移入自己的结构体；
/// `setup` 失败时快照随之丢弃，窗口和节点自动释放。
pub struct DeviceSnapshot {
    pub(crate) dev: DeviceNode,
    pub(crate) io: IoRegion,
    pub(crate) sys_addr: usize,
    pub(crate) devt: DevT,
    pub(crate) data: &'static DevTypeData,
}

impl DeviceSnapshot {
    /// 已映射的区域窗口
    #[inline]
    pub fn io(&self) -> &IoRegion {
        &self.io
    }

    /// 分配给该实例的设备号
    #[inline]
    pub fn devt(&self) -> DevT {
        self.devt
    }

    /// 设备节点名
    #[inline]
    pub fn name(&self) -> &str {
        self.dev.name()
    }
}

/// 所有设备类型共有的实例记录
///
/// 字段的声明顺序即丢弃顺序：字符设备先注销，然后销毁节点，最后释放窗口。
pub struct DeviceInstance {
    cdev: Option<CharDevice>,
    dev: DeviceNode,
    io: IoRegion,
    sys_addr: usize,
    devt: DevT,
    data: &'static DevTypeData,
    mtx: SpinLock<()>,
}

impl DeviceInstance {
    /// 从快照构造公共记录，此时尚未激活
    pub fn new(tmp: DeviceSnapshot) -> Self {
        Self {
            cdev: None,
            dev: tmp.dev,
            io: tmp.io,
            sys_addr: tmp.sys_addr,
            devt: tmp.devt,
            data: tmp.data,
            mtx: SpinLock::new(()),
        }
    }

    /// 区域的物理起始地址
    #[inline]
    pub fn sys_addr(&self) -> usize {
        self.sys_addr
    }

    /// 区域窗口，访问寄存器前必须持有 [`DeviceInstance::lock`]
    #[inline]
    pub fn io(&self) -> &IoRegion {
        &self.io
    }

    /// 设备号
    #[inline]
    pub fn devt(&self) -> DevT {
        self.devt
    }

    /// 设备类型描述符
    #[inline]
    pub fn data(&self) -> &'static DevTypeData {
        self.data
    }

    /// 设备节点名
    #[inline]
    pub fn name(&self) -> &str {
        self.dev.name()
    }

    /// 设备模型句柄
    #[inline]
    pub fn node(&self) -> NodeHandle {
        self.dev.handle()
    }

    /// 字符设备是否已注册
    #[inline]
    pub fn is_active(&self) -> bool {
        self.cdev.is_some()
    }

    /// 获取该实例的互斥锁，保证同一实例上至多一个操作在进行
    #[inline]
    pub fn lock(&self) -> SpinLockGuard<'_, ()> {
        self.mtx.lock()
    }

    /// 初始化互斥锁并注册字符设备，使设备上线
    pub(crate) fn activate(&mut self) -> Result<(), RpadError> {
        self.mtx = SpinLock::new(());

        let cdev = CharDevice::add(&self.dev.ops, self.devt).inspect_err(|_| {
            warn!("{}: can't add char device", self.name());
        })?;
        self.cdev = Some(cdev);
        Ok(())
    }

    /// 注销字符设备
    pub(crate) fn deactivate(&mut self) {
        self.cdev.take();
    }

    /// 销毁设备节点并释放窗口
    pub(crate) fn unprepare(self) {
        let DeviceInstance { cdev, dev, io, .. } = self;
        drop(cdev);
        drop(dev);
        io.release();
    }
}

impl fmt::Debug for DeviceInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceInstance")
            .field("name", &self.name())
            .field("sys_addr", &format_args!("{:#x}", self.sys_addr))
            .field("devt", &self.devt)
            .field("active", &self.is_active())
            .finish()
    }
}

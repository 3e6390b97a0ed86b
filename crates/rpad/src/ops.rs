//! 内核服务 trait 定义
//!
//! 此模块定义了驱动需要的全部内核接口，通过 trait 抽象实现与具体内核的解耦。
//! 与全局注册不同，实现以 [`KernelRef`] 的形式显式传入
//! [`SystemConfig`](crate::SystemConfig)，并由各资源守卫各自持有一份引用。

use alloc::sync::Arc;

use crate::devno::DevT;
use crate::error::RpadError;

/// 设备类句柄
pub type ClassHandle = usize;

/// 设备模型节点句柄
pub type NodeHandle = usize;

/// 内核服务
///
/// 加载驱动的内核实现此 trait。所有方法都不得无限期阻塞。
pub trait KernelOps: Send + Sync {
    // ========== I/O 内存 ==========

    /// 预留物理地址区间 `[start, start + len)`；区间已被任何人预留时返回 false
    fn request_mem_region(&self, start: usize, len: usize, name: &str) -> bool;

    /// 释放由 [`KernelOps::request_mem_region`] 预留的区间
    fn release_mem_region(&self, start: usize, len: usize);

    /// 建立不可缓存的 I/O 映射，返回虚拟地址；失败返回 `None`
    fn ioremap(&self, paddr: usize, len: usize) -> Option<usize>;

    /// 解除 [`KernelOps::ioremap`] 建立的映射
    fn iounmap(&self, vaddr: usize);

    /// 读取映射 `vaddr` 内偏移 `offset` 处的 32 位寄存器
    fn ioread32(&self, vaddr: usize, offset: usize) -> u32;

    /// 写入映射 `vaddr` 内偏移 `offset` 处的 32 位寄存器
    fn iowrite32(&self, vaddr: usize, offset: usize, value: u32);

    // ========== 字符设备号 ==========

    /// 预留从 `first` 开始的 `count` 个设备号
    fn register_chrdev_region(&self, first: DevT, count: u32, name: &str)
    -> Result<(), RpadError>;

    /// 由内核分配 major，预留从 `first_minor` 开始的 `count` 个设备号，返回起始设备号
    fn alloc_chrdev_region(
        &self,
        first_minor: u32,
        count: u32,
        name: &str,
    ) -> Result<DevT, RpadError>;

    /// 释放设备号区间
    fn unregister_chrdev_region(&self, first: DevT, count: u32);

    // ========== 设备模型 ==========

    /// 创建设备类
    fn class_create(&self, name: &str) -> Result<ClassHandle, RpadError>;

    /// 销毁设备类
    fn class_destroy(&self, class: ClassHandle);

    /// 在设备类下创建设备节点
    fn device_create(&self, class: ClassHandle, devt: DevT, name: &str)
    -> Result<NodeHandle, RpadError>;

    /// 销毁设备节点
    fn device_destroy(&self, class: ClassHandle, devt: DevT);

    // ========== 字符设备 ==========

    /// 注册字符设备，注册成功后设备即对用户可见
    fn cdev_add(&self, devt: DevT, count: u32) -> Result<(), RpadError>;

    /// 注销字符设备
    fn cdev_del(&self, devt: DevT, count: u32);
}

/// 共享的内核服务引用
pub type KernelRef = Arc<dyn KernelOps>;

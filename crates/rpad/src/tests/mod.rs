// Unit tests for rpad.
//
// 内核服务由 `test_support::mock::MockKernel` 模拟，这里为它实现 `KernelOps`，
// 再用 `Bus` 在 mock 的寄存器表里摆出一套 PL 配置。

extern crate std;

use alloc::sync::Arc;
use alloc::vec::Vec;

use test_support::mock::MockKernel;

use crate::config::ModuleParams;
use crate::devno::DevT;
use crate::error::RpadError;
use crate::hw::{RPAD_PL_SYS_RESERVED, RPAD_SYS_ID, RPAD_SYS_TYPE, encode, region_addr};
use crate::ops::{ClassHandle, KernelOps, KernelRef, NodeHandle};
use crate::sysconfig::{RPAD_SYS_VERSION, SystemConfig, map_sysconfig_io};

mod logger;
mod io;
mod sysconfig;

impl KernelOps for MockKernel {
    fn request_mem_region(&self, start: usize, len: usize, name: &str) -> bool {
        MockKernel::request_mem_region(self, start, len, name)
    }

    fn release_mem_region(&self, start: usize, len: usize) {
        MockKernel::release_mem_region(self, start, len)
    }

    fn ioremap(&self, paddr: usize, len: usize) -> Option<usize> {
        MockKernel::ioremap(self, paddr, len)
    }

    fn iounmap(&self, vaddr: usize) {
        MockKernel::iounmap(self, vaddr)
    }

    fn ioread32(&self, vaddr: usize, offset: usize) -> u32 {
        MockKernel::ioread32(self, vaddr, offset)
    }

    fn iowrite32(&self, vaddr: usize, offset: usize, value: u32) {
        MockKernel::iowrite32(self, vaddr, offset, value)
    }

    fn register_chrdev_region(&self, first: DevT, count: u32, name: &str) -> Result<(), RpadError> {
        MockKernel::register_chrdev_region(self, first, count, name).map_err(RpadError::from_errno)
    }

    fn alloc_chrdev_region(
        &self,
        first_minor: u32,
        count: u32,
        name: &str,
    ) -> Result<DevT, RpadError> {
        MockKernel::alloc_chrdev_region(self, first_minor, count, name)
            .map_err(RpadError::from_errno)
    }

    fn unregister_chrdev_region(&self, first: DevT, count: u32) {
        MockKernel::unregister_chrdev_region(self, first, count)
    }

    fn class_create(&self, name: &str) -> Result<ClassHandle, RpadError> {
        MockKernel::class_create(self, name).map_err(RpadError::from_errno)
    }

    fn class_destroy(&self, class: ClassHandle) {
        MockKernel::class_destroy(self, class)
    }

    fn device_create(
        &self,
        class: ClassHandle,
        devt: DevT,
        name: &str,
    ) -> Result<NodeHandle, RpadError> {
        MockKernel::device_create(self, class, devt, name).map_err(RpadError::from_errno)
    }

    fn device_destroy(&self, class: ClassHandle, devt: DevT) {
        MockKernel::device_destroy(self, class, devt)
    }

    fn cdev_add(&self, devt: DevT, count: u32) -> Result<(), RpadError> {
        MockKernel::cdev_add(self, devt, count).map_err(RpadError::from_errno)
    }

    fn cdev_del(&self, devt: DevT, count: u32) {
        MockKernel::cdev_del(self, devt, count)
    }
}

/// 在 mock 总线上摆出一套 PL 配置
struct Bus {
    mock: Arc<MockKernel>,
}

impl Bus {
    /// 识别字正确、含 `nr` 个区域的 sysconfig，区域内容全为 0
    fn new(nr: u32) -> Self {
        let bus = Self {
            mock: Arc::new(MockKernel::new()),
        };
        bus.sysconfig(encode(RPAD_SYS_TYPE, RPAD_SYS_VERSION), nr);
        bus
    }

    /// 按给定的 `(类型标签, 版本)` 依次填充各区域
    fn with_regions(regions: &[(u32, u32)]) -> Self {
        let bus = Self::new(regions.len() as u32);
        for (nr, &(typ, version)) in regions.iter().enumerate() {
            bus.region(nr as u32, typ, version);
        }
        bus
    }

    fn sysconfig(&self, id: u32, nr: u32) {
        self.mock.set_reg(RPAD_PL_SYS_RESERVED, id);
        self.mock.set_reg(RPAD_PL_SYS_RESERVED + 4, nr);
    }

    fn region(&self, nr: u32, typ: u32, version: u32) {
        self.mock
            .set_reg(region_addr(nr) + RPAD_SYS_ID, encode(typ, version));
    }

    fn ops(&self) -> KernelRef {
        self.mock.clone()
    }

    /// 映射好 sysconfig 窗口的上下文
    fn sys(&self, params: ModuleParams) -> SystemConfig {
        let ops = self.ops();
        let sys_base = map_sysconfig_io(&ops).unwrap();
        SystemConfig::new(ops, params, sys_base)
    }

    /// 除 sysconfig 窗口外的全部 I/O 预留
    fn region_reservations(&self) -> Vec<usize> {
        self.mock
            .reservations()
            .into_iter()
            .map(|r| r.start)
            .filter(|&start| start != RPAD_PL_SYS_RESERVED)
            .collect()
    }
}

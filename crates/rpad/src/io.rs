//! I/O 区域映射
//!
//! [`IoRegion`] 同时持有一段物理地址的独占预留和它的 I/O 映射。
//! 预留的独占性由内核保证：同一区间不能被映射两次，
//! 包括本驱动自己尚未释放的映射。

use core::fmt;

use log::warn;

use crate::error::MapError;
use crate::ops::KernelRef;

/// 已预留并映射的物理地址窗口
///
/// 离开作用域时按与获取相反的顺序自动解除映射并释放预留。
pub struct IoRegion {
    ops: KernelRef,
    start: usize,
    len: usize,
    base: usize,
}

/// 以 `label` 为前缀报告窗口获取失败
pub(crate) fn warn_map_error(label: &str, err: MapError) {
    match err {
        MapError::Blocked => warn!("{}: io region blocked", label),
        MapError::RemapFailed => warn!("{}: io remap failed", label),
    }
}

impl IoRegion {
    /// 预留并映射 `[start, start + len)`，`label` 为预留的名称
    ///
    /// 本函数不打印任何日志，由调用方决定失败是否值得报告。
    /// 映射失败时本次的预留会先被释放，失败的获取不会残留任何预留。
    pub fn acquire(
        ops: &KernelRef,
        start: usize,
        len: usize,
        label: &str,
    ) -> Result<Self, MapError> {
        if !ops.request_mem_region(start, len, label) {
            return Err(MapError::Blocked);
        }

        let Some(base) = ops.ioremap(start, len) else {
            ops.release_mem_region(start, len);
            return Err(MapError::RemapFailed);
        };

        Ok(Self {
            ops: ops.clone(),
            start,
            len,
            base,
        })
    }

    /// 解除映射并释放预留
    ///
    /// 与直接丢弃等价，用于在调用处明确表达释放时机。
    #[inline]
    pub fn release(self) {
        drop(self);
    }

    /// 窗口的物理起始地址
    #[inline]
    pub fn start(&self) -> usize {
        self.start
    }

    /// 窗口长度
    #[inline]
    pub fn size(&self) -> usize {
        self.len
    }

    /// 映射后的虚拟地址
    #[inline]
    pub fn base(&self) -> usize {
        self.base
    }

    /// 读取窗口内偏移 `offset` 处的 32 位寄存器
    #[inline]
    pub fn read32(&self, offset: usize) -> u32 {
        debug_assert!(offset + 4 <= self.len);
        self.ops.ioread32(self.base, offset)
    }

    /// 写入窗口内偏移 `offset` 处的 32 位寄存器
    #[inline]
    pub fn write32(&self, offset: usize, value: u32) {
        debug_assert!(offset + 4 <= self.len);
        self.ops.iowrite32(self.base, offset, value);
    }
}

impl Drop for IoRegion {
    fn drop(&mut self) {
        self.ops.iounmap(self.base);
        self.ops.release_mem_region(self.start, self.len);
    }
}

impl fmt::Debug for IoRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IoRegion")
            .field("start", &format_args!("{:#x}", self.start))
            .field("len", &format_args!("{:#x}", self.len))
            .finish()
    }
}

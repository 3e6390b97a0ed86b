//! 字符设备文件操作约定
//!
//! 每种设备类型在描述符中用 [`FopFlags`] 声明自己实现了哪些文件操作，
//! 具体语义由各类型实现 [`CharDevOps`] 提供。

use bitflags::bitflags;

use crate::error::RpadError;

bitflags! {
    /// 文件操作表中已实现的操作
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FopFlags: u32 {
        /// read
        const READ = 1 << 0;
        /// write
        const WRITE = 1 << 1;
        /// ioctl
        const IOCTL = 1 << 2;
    }
}

/// 字符设备文件操作
///
/// 调用方在调用任何方法前已经持有该实例的互斥锁，
/// 实现可以直接访问寄存器而无需再加锁。
pub trait CharDevOps {
    /// 读取数据
    fn read(&self, _buf: &mut [u8]) -> Result<usize, RpadError> {
        Err(RpadError::NotSupported)
    }

    /// 写入数据
    fn write(&self, _buf: &[u8]) -> Result<usize, RpadError> {
        Err(RpadError::NotSupported)
    }

    /// 执行 ioctl 操作
    fn ioctl(&self, _cmd: u32, _arg: usize) -> Result<usize, RpadError> {
        Err(RpadError::InvalidIoctl)
    }
}

/// ioctl 命令号
pub mod ioctl {
    /// 本驱动的 ioctl 幻数
    pub const RPAD_IOC_MAGIC: u32 = b'R' as u32;

    const fn ioc(nr: u32) -> u32 {
        (RPAD_IOC_MAGIC << 8) | nr
    }

    /// 读取功能块的识别字（所有类型通用）
    pub const RPAD_IOC_GET_ID: u32 = ioc(0x00);

    /// hk：读取 DNA 低 32 位
    pub const HK_IOC_GET_DNA_LO: u32 = ioc(0x10);
    /// hk：读取 DNA 高 25 位
    pub const HK_IOC_GET_DNA_HI: u32 = ioc(0x11);
    /// hk：读取 LED 状态
    pub const HK_IOC_GET_LEDS: u32 = ioc(0x12);
    /// hk：设置 LED 状态，参数为 LED 位图
    pub const HK_IOC_SET_LEDS: u32 = ioc(0x13);
}

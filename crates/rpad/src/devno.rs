//! 设备号编码
//!
//! 与 Linux 内核内部的 `dev_t` 编码一致：高 12 位为 major，低 20 位为 minor。

/// 设备号
pub type DevT = u32;

/// minor 所占位数
pub const MINORBITS: u32 = 20;

/// minor 掩码
pub const MINORMASK: u32 = (1 << MINORBITS) - 1;

/// 可编码的最大 major 号
pub const MAX_MAJOR: u32 = (1 << (u32::BITS - MINORBITS)) - 1;

/// 由 major/minor 组合设备号
#[inline]
pub const fn makedev(major: u32, minor: u32) -> DevT {
    (major << MINORBITS) | (minor & MINORMASK)
}

/// 取设备号的 major 部分
#[inline]
pub const fn major(dev: DevT) -> u32 {
    dev >> MINORBITS
}

/// 取设备号的 minor 部分
#[inline]
pub const fn minor(dev: DevT) -> u32 {
    dev & MINORMASK
}

//! RedPitaya 架构驱动 (rpad)
//!
//! 可编程逻辑 (PL) 内部系统总线上的功能块是否存在，取决于启动时加载的逻辑配置。
//! 此 crate 负责：
//!
//! - 识别 sysconfig 块，确认 PL 是受支持的配置（[`check_sysconfig`]）；
//! - 为发现的区域数预留字符设备号并创建设备类（[`prepare_architecture`]）；
//! - 逐个探测总线区域，按类型标签把实例交给对应的处理程序（[`install_devices`]）；
//! - 按相反顺序拆除全部资源（[`uninstall_devices`]）。
//!
//! # 架构解耦
//!
//! 所有内核服务都通过 [`KernelOps`] trait 访问，实现以 [`KernelRef`]
//! 显式传给 [`SystemConfig`]。各类内核资源都由守卫对象持有，
//! 离开作用域时按获取的相反顺序自动释放。
//!
//! # 并发
//!
//! 安装与卸载在加载/卸载模块的线程上同步执行。设备上线后，
//! 对同一实例的文件操作由该实例的互斥锁串行化，不同实例之间互不影响。

#![no_std]

extern crate alloc;

pub mod arch;
pub mod config;
pub mod device;
pub mod devices;
pub mod devno;
pub mod devtype;
pub mod error;
pub mod fops;
pub mod hw;
pub mod install;
pub mod io;
pub mod module;
pub mod ops;
pub mod sysconfig;

#[cfg(test)]
mod tests;

// Re-export arch
pub use arch::{Architecture, prepare_architecture, unprepare_architecture};

// Re-export config
pub use config::ModuleParams;

// Re-export device
pub use device::{CharDevice, DeviceInstance, DeviceNode, DeviceSnapshot};

// Re-export devno
pub use devno::{DevT, major, makedev, minor};

// Re-export devtype
pub use devtype::{DevTypeData, RpadDevice};

// Re-export error
pub use error::{MapError, ProbeError, RpadError};

// Re-export fops
pub use fops::{CharDevOps, FopFlags};

// Re-export hw
pub use hw::{DevType, decode, encode};

// Re-export install
pub use install::{install_devices, uninstall_devices};

// Re-export io
pub use io::IoRegion;

// Re-export module
pub use module::Rpad;

// Re-export ops
pub use ops::{KernelOps, KernelRef};

// Re-export sysconfig
pub use sysconfig::{SystemConfig, check_sysconfig, get_devtype_data, map_sysconfig_io};

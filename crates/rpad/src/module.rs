//! 模块的加载与卸载
//!
//! 加载顺序：映射 sysconfig 窗口 → 识别 PL → 准备设备号和设备类 → 安装设备。
//! 卸载严格按相反顺序进行。加载的任何一步失败都会先回滚已完成的步骤。

use log::info;

use crate::arch::{prepare_architecture, unprepare_architecture};
use crate::config::ModuleParams;
use crate::error::RpadError;
use crate::install::{install_devices, uninstall_devices};
use crate::ops::KernelRef;
use crate::sysconfig::{SystemConfig, check_sysconfig, map_sysconfig_io};

/// 已加载的驱动
///
/// 丢弃即卸载。
#[derive(Debug)]
pub struct Rpad {
    sys: SystemConfig,
}

impl Rpad {
    /// 加载驱动
    pub fn init(ops: KernelRef, params: ModuleParams) -> Result<Self, RpadError> {
        let ret = Self::load(ops, params);
        match &ret {
            Ok(_) => info!("Module rpad loaded"),
            Err(_) => info!("Module rpad not loaded"),
        }
        ret
    }

    fn load(ops: KernelRef, params: ModuleParams) -> Result<Self, RpadError> {
        let sys_base = map_sysconfig_io(&ops)?;
        let mut sys = SystemConfig::new(ops, params, sys_base);

        if !check_sysconfig(&mut sys) {
            info!("rpad: no supported RPAD PL found");
            return Err(RpadError::NoSuchDevice);
        }

        prepare_architecture(&mut sys)?;

        if let Err(err) = install_devices(&mut sys) {
            unprepare_architecture(&mut sys);
            return Err(err);
        }

        Ok(Self { sys })
    }

    /// 卸载驱动，等价于丢弃
    pub fn exit(self) {
        drop(self);
    }

    /// 驱动上下文
    #[inline]
    pub fn sysconfig(&self) -> &SystemConfig {
        &self.sys
    }
}

impl Drop for Rpad {
    fn drop(&mut self) {
        uninstall_devices(&mut self.sys);
        unprepare_architecture(&mut self.sys);
        // sysconfig 窗口随 SystemConfig 一起释放
        info!("Module rpad unloaded");
    }
}

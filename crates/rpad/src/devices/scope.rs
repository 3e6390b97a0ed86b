//! 示波器块
//!
//! 采集缓冲区与流式读取不在此处实现，这里只负责识别和实例生命周期。

use alloc::boxed::Box;

use log::warn;

use crate::device::{DeviceInstance, DeviceSnapshot};
use crate::devtype::DevTypeData;
use crate::error::RpadError;
use crate::fops::{CharDevOps, FopFlags};
use crate::hw::{DevType, RPAD_SYS_ID, rpad_version};

/// 驱动支持的示波器块版本
pub const RPAD_SCOPE_VERSION: u32 = 1;

/// 示波器实例
#[derive(Debug)]
pub struct RpadScope {
    rp_dev: DeviceInstance,
    version: u32,
}

impl RpadScope {
    /// 公共实例记录
    #[inline]
    pub fn rp_dev(&self) -> &DeviceInstance {
        &self.rp_dev
    }

    pub(crate) fn rp_dev_mut(&mut self) -> &mut DeviceInstance {
        &mut self.rp_dev
    }

    /// 功能块版本
    #[inline]
    pub fn version(&self) -> u32 {
        self.version
    }
}

pub(crate) fn setup(tmp: DeviceSnapshot) -> Result<Box<RpadScope>, RpadError> {
    let version = rpad_version(tmp.io().read32(RPAD_SYS_ID));
    if version != RPAD_SCOPE_VERSION {
        warn!("{}: unsupported scope version {}", tmp.name(), version);
        return Err(RpadError::NotSupported);
    }

    Ok(Box::new(RpadScope {
        rp_dev: DeviceInstance::new(tmp),
        version,
    }))
}

pub(crate) fn teardown(scope: Box<RpadScope>) -> DeviceInstance {
    scope.rp_dev
}

impl CharDevOps for RpadScope {}

/// 示波器类型描述符
pub static RPAD_SCOPE_DATA: DevTypeData = DevTypeData {
    dev_type: DevType::Scope,
    name: "scope",
    fops: FopFlags::IOCTL,
};

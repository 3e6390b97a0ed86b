//! 任意信号发生器块

use alloc::boxed::Box;

use crate::device::{DeviceInstance, DeviceSnapshot};
use crate::devtype::DevTypeData;
use crate::error::RpadError;
use crate::fops::{CharDevOps, FopFlags};
use crate::hw::DevType;

/// 信号发生器实例
#[derive(Debug)]
pub struct RpadAsg {
    rp_dev: DeviceInstance,
}

impl RpadAsg {
    /// 公共实例记录
    #[inline]
    pub fn rp_dev(&self) -> &DeviceInstance {
        &self.rp_dev
    }

    pub(crate) fn rp_dev_mut(&mut self) -> &mut DeviceInstance {
        &mut self.rp_dev
    }
}

pub(crate) fn setup(tmp: DeviceSnapshot) -> Result<Box<RpadAsg>, RpadError> {
    Ok(Box::new(RpadAsg {
        rp_dev: DeviceInstance::new(tmp),
    }))
}

pub(crate) fn teardown(asg: Box<RpadAsg>) -> DeviceInstance {
    asg.rp_dev
}

impl CharDevOps for RpadAsg {}

/// 信号发生器类型描述符
pub static RPAD_ASG_DATA: DevTypeData = DevTypeData {
    dev_type: DevType::Asg,
    name: "asg",
    fops: FopFlags::IOCTL,
};

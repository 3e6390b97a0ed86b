//! 管家块 (housekeeping)
//!
//! 提供板载 LED、扩展口方向/数据寄存器以及芯片 DNA。

use alloc::boxed::Box;

use bitflags::bitflags;

use crate::device::{DeviceInstance, DeviceSnapshot};
use crate::devtype::DevTypeData;
use crate::error::RpadError;
use crate::fops::{CharDevOps, FopFlags, ioctl};
use crate::hw::DevType;

// hk 寄存器，0x10..0x24 为扩展口方向/数据寄存器，本驱动不使用
const HK_DNA_VALUE_L: usize = 0x0000_0004;
const HK_DNA_VALUE_H: usize = 0x0000_0008;
const HK_LED_REG: usize = 0x0000_0030;

/// DNA 共 57 位，高位寄存器只有低 25 位有效
const HK_DNA_HI_MASK: u32 = (1 << 25) - 1;

bitflags! {
    /// 板载 LED
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct HkLeds: u32 {
        /// LED 0
        const LED0 = 1 << 0;
        /// LED 1
        const LED1 = 1 << 1;
        /// LED 2
        const LED2 = 1 << 2;
        /// LED 3
        const LED3 = 1 << 3;
        /// LED 4
        const LED4 = 1 << 4;
        /// LED 5
        const LED5 = 1 << 5;
        /// LED 6
        const LED6 = 1 << 6;
        /// LED 7
        const LED7 = 1 << 7;
    }
}

/// hk 实例
#[derive(Debug)]
pub struct RpadHk {
    rp_dev: DeviceInstance,
    dna: u64,
}

impl RpadHk {
    /// 公共实例记录
    #[inline]
    pub fn rp_dev(&self) -> &DeviceInstance {
        &self.rp_dev
    }

    pub(crate) fn rp_dev_mut(&mut self) -> &mut DeviceInstance {
        &mut self.rp_dev
    }

    /// setup 时锁存的芯片 DNA
    #[inline]
    pub fn dna(&self) -> u64 {
        self.dna
    }

    fn leds(&self) -> HkLeds {
        HkLeds::from_bits_truncate(self.rp_dev.io().read32(HK_LED_REG))
    }

    fn set_leds(&self, leds: HkLeds) {
        self.rp_dev.io().write32(HK_LED_REG, leds.bits());
    }
}

pub(crate) fn setup(tmp: DeviceSnapshot) -> Result<Box<RpadHk>, RpadError> {
    let lo = tmp.io().read32(HK_DNA_VALUE_L);
    let hi = tmp.io().read32(HK_DNA_VALUE_H) & HK_DNA_HI_MASK;

    Ok(Box::new(RpadHk {
        rp_dev: DeviceInstance::new(tmp),
        dna: ((hi as u64) << 32) | lo as u64,
    }))
}

pub(crate) fn teardown(hk: Box<RpadHk>) -> DeviceInstance {
    let RpadHk { rp_dev, .. } = *hk;
    rp_dev
}

impl CharDevOps for RpadHk {
    fn ioctl(&self, cmd: u32, arg: usize) -> Result<usize, RpadError> {
        match cmd {
            ioctl::HK_IOC_GET_DNA_LO => Ok(self.dna as u32 as usize),
            ioctl::HK_IOC_GET_DNA_HI => Ok((self.dna >> 32) as usize),
            ioctl::HK_IOC_GET_LEDS => Ok(self.leds().bits() as usize),
            ioctl::HK_IOC_SET_LEDS => {
                let leds = u32::try_from(arg)
                    .ok()
                    .and_then(HkLeds::from_bits)
                    .ok_or(RpadError::InvalidArgument)?;
                self.set_leds(leds);
                Ok(0)
            }
            _ => Err(RpadError::InvalidIoctl),
        }
    }
}

/// hk 类型描述符
pub static RPAD_HK_DATA: DevTypeData = DevTypeData {
    dev_type: DevType::Hk,
    name: "hk",
    fops: FopFlags::IOCTL,
};

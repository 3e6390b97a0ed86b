//! 设备类型注册表与分发
//!
//! 类型标签到 [`DevTypeData`] 的映射是一张固定的表。
//! 如果功能块在识别寄存器中给出了已定义的类型标签，就会查询这张表，
//! 取得处理该类型的描述符。新增类型时在 [`DevType`] 末尾追加标签，
//! 在表中对应位置登记描述符，并在 [`RpadDevice`] 中增加一个分支。

use alloc::boxed::Box;

use crate::device::{DeviceInstance, DeviceSnapshot};
use crate::devices::{RPAD_ASG_DATA, RPAD_HK_DATA, RPAD_SCOPE_DATA, RpadAsg, RpadHk, RpadScope};
use crate::devices::{asg, hk, scope};
use crate::error::RpadError;
use crate::fops::{CharDevOps, FopFlags, ioctl};
use crate::hw::{DevType, NUM_RPAD_TYPES, RPAD_SYS_ID};

/// 设备类型描述符
///
/// 每种支持的类型一个，静态注册，之后不再修改。
#[derive(Debug)]
pub struct DevTypeData {
    /// 类型标签
    pub dev_type: DevType,
    /// 设备名中的类型部分，例如 `scope`
    pub name: &'static str,
    /// 文件操作表中已实现的操作
    pub fops: FopFlags,
}

impl DevTypeData {
    /// 调用该类型处理程序的 setup
    pub fn setup(&self, tmp: DeviceSnapshot) -> Result<RpadDevice, RpadError> {
        match self.dev_type {
            DevType::Hk => hk::setup(tmp).map(RpadDevice::Hk),
            DevType::Scope => scope::setup(tmp).map(RpadDevice::Scope),
            DevType::Asg => asg::setup(tmp).map(RpadDevice::Asg),
            DevType::Pid | DevType::Ams | DevType::Daisy => Err(RpadError::NotSupported),
        }
    }
}

/// 按类型标签索引的描述符表，`None` 表示该类型没有处理程序
static RPAD_DEVTYPE_TABLE: [Option<&DevTypeData>; NUM_RPAD_TYPES] = [
    None,                   // RPAD_NO_TYPE
    Some(&RPAD_HK_DATA),    // DevType::Hk
    Some(&RPAD_SCOPE_DATA), // DevType::Scope
    Some(&RPAD_ASG_DATA),   // DevType::Asg
    None,                   // DevType::Pid
    None,                   // DevType::Ams
    None,                   // DevType::Daisy
];

/// 查找类型标签对应的描述符
///
/// 标签为 0、越界或该类型没有登记处理程序时返回 `None`。
pub fn lookup(tag: u32) -> Option<&'static DevTypeData> {
    let dev_type = DevType::from_tag(tag)?;
    RPAD_DEVTYPE_TABLE[dev_type.index()].filter(|data| data.dev_type == dev_type)
}

/// 已安装的设备
///
/// 每个分支拥有对应处理程序分配的类型专属结构体。
#[derive(Debug)]
pub enum RpadDevice {
    /// 管家块
    Hk(Box<RpadHk>),
    /// 示波器
    Scope(Box<RpadScope>),
    /// 信号发生器
    Asg(Box<RpadAsg>),
}

impl RpadDevice {
    /// 公共实例记录
    pub fn rp_dev(&self) -> &DeviceInstance {
        match self {
            RpadDevice::Hk(hk) => hk.rp_dev(),
            RpadDevice::Scope(scope) => scope.rp_dev(),
            RpadDevice::Asg(asg) => asg.rp_dev(),
        }
    }

    pub(crate) fn rp_dev_mut(&mut self) -> &mut DeviceInstance {
        match self {
            RpadDevice::Hk(hk) => hk.rp_dev_mut(),
            RpadDevice::Scope(scope) => scope.rp_dev_mut(),
            RpadDevice::Asg(asg) => asg.rp_dev_mut(),
        }
    }

    /// 设备类型
    #[inline]
    pub fn dev_type(&self) -> DevType {
        self.rp_dev().data().dev_type
    }

    /// 调用该类型处理程序的 teardown
    ///
    /// 类型专属结构体在此被释放，其中的公共记录交还给调用方，
    /// 由调用方销毁节点并释放窗口。
    pub(crate) fn teardown(self) -> DeviceInstance {
        match self {
            RpadDevice::Hk(dev) => hk::teardown(dev),
            RpadDevice::Scope(dev) => scope::teardown(dev),
            RpadDevice::Asg(dev) => asg::teardown(dev),
        }
    }

    fn fops(&self) -> &dyn CharDevOps {
        match self {
            RpadDevice::Hk(dev) => &**dev,
            RpadDevice::Scope(dev) => &**dev,
            RpadDevice::Asg(dev) => &**dev,
        }
    }

    fn check_fop(&self, op: FopFlags) -> Result<(), RpadError> {
        if self.rp_dev().data().fops.contains(op) {
            Ok(())
        } else {
            Err(RpadError::NotSupported)
        }
    }

    /// 读取设备
    pub fn read(&self, buf: &mut [u8]) -> Result<usize, RpadError> {
        self.check_fop(FopFlags::READ)?;
        let _guard = self.rp_dev().lock();
        self.fops().read(buf)
    }

    /// 写入设备
    pub fn write(&self, buf: &[u8]) -> Result<usize, RpadError> {
        self.check_fop(FopFlags::WRITE)?;
        let _guard = self.rp_dev().lock();
        self.fops().write(buf)
    }

    /// 对设备执行 ioctl
    ///
    /// [`ioctl::RPAD_IOC_GET_ID`] 对所有类型通用，其余命令交给处理程序。
    pub fn ioctl(&self, cmd: u32, arg: usize) -> Result<usize, RpadError> {
        self.check_fop(FopFlags::IOCTL)?;
        let _guard = self.rp_dev().lock();
        match cmd {
            ioctl::RPAD_IOC_GET_ID => Ok(self.rp_dev().io().read32(RPAD_SYS_ID) as usize),
            _ => self.fops().ioctl(cmd, arg),
        }
    }
}

//! 设备的安装与卸载
//!
//! 安装器逐个扫描总线区域，识别出的功能块分四步安装：
//!
//! 1. 预留并映射区域窗口，创建设备节点（[`prepare_device`]）；
//! 2. 调用类型处理程序的 setup，得到类型专属结构体；
//! 3. 初始化互斥锁并注册字符设备（激活）；
//! 4. 登记到已安装设备表，推进设备号和该类型的实例序号。
//!
//! 任何一步失败只回滚该区域已获取的资源，然后继续扫描下一个区域。

use alloc::format;
use alloc::vec::Vec;

use log::{info, warn};

use crate::device::{DeviceNode, DeviceSnapshot};
use crate::devno::{DevT, major, makedev, minor};
use crate::devtype::{DevTypeData, RpadDevice};
use crate::error::RpadError;
use crate::hw::{NUM_RPAD_TYPES, RPAD_PL_REGION_SIZE, region_addr};
use crate::io::{IoRegion, warn_map_error};
use crate::ops::{ClassHandle, KernelRef};
use crate::sysconfig::{SystemConfig, get_devtype_data};

/// 为第 `region_nr` 个区域准备公共资源：区域窗口，然后是设备节点
///
/// 节点名为 `rpad_<类型名><实例序号>`。节点创建失败时窗口随之释放。
pub fn prepare_device(
    ops: &KernelRef,
    class: ClassHandle,
    data: &'static DevTypeData,
    devt: DevT,
    region_nr: u32,
    sub_minor: u32,
) -> Result<DeviceSnapshot, RpadError> {
    let name = format!("rpad_{}{}", data.name, sub_minor);
    let sys_addr = region_addr(region_nr);

    let io = IoRegion::acquire(ops, sys_addr, RPAD_PL_REGION_SIZE, &name).map_err(|err| {
        warn_map_error(&name, err);
        RpadError::from(err)
    })?;

    let dev = match DeviceNode::create(ops, class, devt, name) {
        Ok(dev) => dev,
        Err(err) => {
            warn!("rpad_{}{}: setup error", data.name, sub_minor);
            return Err(err);
        }
    };

    Ok(DeviceSnapshot {
        dev,
        io,
        sys_addr,
        devt,
        data,
    })
}

/// 扫描所有区域并为每个识别出的实例安装对应类型的实现
///
/// 一个设备都没装上时返回 [`RpadError::NoDevicesInstalled`]，
/// 此时已安装设备表被释放，全局资源由调用方回滚。
pub fn install_devices(sys: &mut SystemConfig) -> Result<(), RpadError> {
    let arch = sys.arch.as_ref().ok_or(RpadError::InvalidArgument)?;
    let class = arch.class();
    let first = arch.first_devt();

    let mut rp_devs: Vec<RpadDevice> = Vec::new();
    rp_devs
        .try_reserve_exact(sys.nr_of_regions as usize)
        .map_err(|_| RpadError::NoMemory)?;

    let mut sub_minors = [0u32; NUM_RPAD_TYPES];
    let mut next_minor = minor(first);
    for region in 0..sys.nr_of_regions {
        // 硬件识别
        let Ok(data) = get_devtype_data(&sys.ops, region) else {
            continue;
        };
        let sub_type = data.dev_type.index();
        let devt = makedev(major(first), next_minor);

        // 识别成功，分四步安装
        let tmp = match prepare_device(&sys.ops, class, data, devt, region, sub_minors[sub_type]) {
            Ok(tmp) => tmp,
            Err(err) => {
                info!("rpad: skipped device, rc {}", err.to_errno());
                continue;
            }
        };

        let mut rp_dev = match data.setup(tmp) {
            Ok(rp_dev) => rp_dev,
            Err(err) => {
                info!("rpad: skipped device, rc {}", err.to_errno());
                continue;
            }
        };

        if let Err(err) = rp_dev.rp_dev_mut().activate() {
            info!("rpad: skipped device, rc {}", err.to_errno());
            rp_dev.teardown().unprepare();
            continue;
        }

        rp_devs.push(rp_dev);
        sub_minors[sub_type] += 1;
        next_minor += 1;
    }

    if rp_devs.is_empty() {
        return Err(RpadError::NoDevicesInstalled);
    }

    sys.rp_devs = rp_devs;
    Ok(())
}

/// 卸载所有已安装的设备
///
/// 对每个设备：注销字符设备，调用 teardown 释放类型专属结构体并取回公共记录，
/// 再用公共记录销毁节点、释放窗口。最后释放已安装设备表。
pub fn uninstall_devices(sys: &mut SystemConfig) {
    for mut rp_dev in sys.rp_devs.drain(..) {
        rp_dev.rp_dev_mut().deactivate();
        let common = rp_dev.teardown();
        common.unprepare();
    }
    sys.rp_devs = Vec::new();
}

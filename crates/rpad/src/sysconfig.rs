//! sysconfig 探测与驱动上下文
//!
//! sysconfig 块位于总线顶端的保留窗口，给出整个 PL 配置的识别字和总线区域数。
//! 在它被识别之前，驱动不会触碰任何其它区域。

use alloc::vec::Vec;
use core::fmt;

use log::debug;

use crate::arch::Architecture;
use crate::config::ModuleParams;
use crate::devno::DevT;
use crate::devtype::{self, DevTypeData, RpadDevice};
use crate::error::{ProbeError, RpadError};
use crate::hw::{
    RPAD_MAX_REGIONS, RPAD_PL_END, RPAD_PL_REGION_SIZE, RPAD_PL_SYS_RESERVED, RPAD_SYS_ID,
    RPAD_SYS_TYPE, decode, region_addr,
};
use crate::io::{IoRegion, warn_map_error};
use crate::ops::KernelRef;

// sysconfig 寄存器
const SYS_ID: usize = 0x0000_0000;
const SYS_REGIONS: usize = 0x0000_0004;

/// 驱动支持的 sysconfig 版本
pub const RPAD_SYS_VERSION: u32 = 1;

/// sysconfig 窗口与临时探测映射共用的预留名
const SYSCONFIG_LABEL: &str = "rpad_sysconfig";

/// 驱动上下文
///
/// 生命周期与模块的加载/卸载一致，显式地传给各阶段的操作。
/// 字段的声明顺序即丢弃顺序：先设备，再设备类和设备号，最后是 sysconfig 窗口。
pub struct SystemConfig {
    pub(crate) id: u32,
    pub(crate) nr_of_regions: u32,
    /// 按扫描顺序排列的已安装设备，下标等于 minor 相对起始 minor 的偏移
    pub(crate) rp_devs: Vec<RpadDevice>,
    pub(crate) arch: Option<Architecture>,
    pub(crate) sys_base: IoRegion,
    pub(crate) params: ModuleParams,
    pub(crate) ops: KernelRef,
}

impl SystemConfig {
    /// 以已映射的 sysconfig 窗口创建上下文，识别字和区域数待 [`check_sysconfig`] 填入
    pub fn new(ops: KernelRef, params: ModuleParams, sys_base: IoRegion) -> Self {
        Self {
            id: 0,
            nr_of_regions: 0,
            rp_devs: Vec::new(),
            arch: None,
            sys_base,
            params,
            ops,
        }
    }

    /// sysconfig 识别字
    #[inline]
    pub fn id(&self) -> u32 {
        self.id
    }

    /// 总线区域数
    #[inline]
    pub fn nr_of_regions(&self) -> u32 {
        self.nr_of_regions
    }

    /// 模块参数
    #[inline]
    pub fn params(&self) -> &ModuleParams {
        &self.params
    }

    /// 已分配的起始设备号，设备类和设备号准备好之前为 `None`
    pub fn first_devt(&self) -> Option<DevT> {
        self.arch.as_ref().map(Architecture::first_devt)
    }

    /// 按扫描顺序排列的已安装设备
    #[inline]
    pub fn devices(&self) -> &[RpadDevice] {
        &self.rp_devs
    }

    /// 按设备号查找已安装的设备
    pub fn find_device(&self, devt: DevT) -> Option<&RpadDevice> {
        let first = self.first_devt()?;
        let idx = devt.checked_sub(first)? as usize;
        self.rp_devs
            .get(idx)
            .filter(|dev| dev.rp_dev().devt() == devt)
    }
}

impl fmt::Debug for SystemConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SystemConfig")
            .field("id", &format_args!("{:#x}", self.id))
            .field("nr_of_regions", &self.nr_of_regions)
            .field("arch", &self.arch)
            .field("rp_devs", &self.rp_devs)
            .finish()
    }
}

/// 预留并映射 sysconfig 窗口
pub fn map_sysconfig_io(ops: &KernelRef) -> Result<IoRegion, RpadError> {
    IoRegion::acquire(
        ops,
        RPAD_PL_SYS_RESERVED,
        RPAD_PL_END - RPAD_PL_SYS_RESERVED,
        SYSCONFIG_LABEL,
    )
    .map_err(|err| {
        warn_map_error(SYSCONFIG_LABEL, err);
        RpadError::from(err)
    })
}

/// 检查 PL 是否是受支持的 RPAD 配置
///
/// 读取识别字和区域数存入 `sys`。只有类型标签为 sysconfig、
/// 版本受支持且区域数在 `[1, 1023]` 内时返回 true。
/// 返回 false 表示平台不认识，不是故障。
pub fn check_sysconfig(sys: &mut SystemConfig) -> bool {
    sys.id = sys.sys_base.read32(SYS_ID);
    sys.nr_of_regions = sys.sys_base.read32(SYS_REGIONS);

    let (typ, version) = decode(sys.id);
    if typ != RPAD_SYS_TYPE || sys.nr_of_regions == 0 || sys.nr_of_regions > RPAD_MAX_REGIONS {
        return false; // 不是 RPAD PL
    }

    if version != RPAD_SYS_VERSION {
        return false; // 不支持的版本
    }

    true
}

/// 读取第 `region_nr` 个区域的识别字并查找对应的类型描述符
///
/// 区域只在本函数内临时映射，返回前一定解除映射并释放预留。
pub fn get_devtype_data(
    ops: &KernelRef,
    region_nr: u32,
) -> Result<&'static DevTypeData, ProbeError> {
    let start = region_addr(region_nr);
    let (typ, version) = {
        let base = IoRegion::acquire(ops, start, RPAD_PL_REGION_SIZE, SYSCONFIG_LABEL)
            .map_err(|err| {
                debug!("rpad: region {} unavailable: {:?}", region_nr, err);
                ProbeError::Unavailable
            })?;
        decode(base.read32(RPAD_SYS_ID))
    };

    let data = devtype::lookup(typ).ok_or(ProbeError::NotFound)?;
    debug!(
        "rpad: region {} at {:#x}: {} v{}",
        region_nr, start, data.name, version
    );
    Ok(data)
}

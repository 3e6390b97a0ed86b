//! PL 系统总线的硬件约定
//!
//! 包括总线地址布局、所有功能块共有的识别寄存器，以及识别字的编解码规则。
//!
//! # 识别字
//!
//! 每个功能块在区域内偏移 [`RPAD_SYS_ID`] 处暴露一个 32 位识别字：
//!
//! ```text
//!  31          20 19                       0
//! +--------------+--------------------------+
//! |   类型标签    |          版本号           |
//! +--------------+--------------------------+
//! ```
//!
//! 类型标签为 0 表示该区域没有功能块（逻辑未驱动时寄存器读为 0）。

/// 版本号所占位数
pub const RPAD_VERSIONBITS: u32 = 20;

/// 版本号掩码
pub const RPAD_VERSIONMASK: u32 = (1 << RPAD_VERSIONBITS) - 1;

// ========== 总线地址布局 ==========

/// 映射到 AXI_GP0 的地址范围起点
pub const RPAD_PL_BASE: usize = 0x4000_0000;
/// 映射到 AXI_GP0 的地址范围终点（不含）
pub const RPAD_PL_END: usize = 0x8000_0000;
/// 单个系统总线区域的大小
pub const RPAD_PL_REGION_SIZE: usize = 0x0010_0000;
/// 为 sysconfig 保留的窗口起点
pub const RPAD_PL_SYS_RESERVED: usize = 0x7fff_0000;

/// sysconfig 声明的区域数上限
pub const RPAD_MAX_REGIONS: u32 = 1023;

// ========== 所有功能块共有的寄存器（区域内偏移） ==========

/// 识别字寄存器
pub const RPAD_SYS_ID: usize = 0x0000_0ff0;
/// 保留
pub const RPAD_SYS_1: usize = 0x0000_0ff4;
/// 保留
pub const RPAD_SYS_2: usize = 0x0000_0ff8;
/// 保留
pub const RPAD_SYS_3: usize = 0x0000_0ffc;

// ========== 类型标签 ==========

/// 区域内没有功能块
pub const RPAD_NO_TYPE: u32 = 0;
/// sysconfig 专用类型标签
pub const RPAD_SYS_TYPE: u32 = 0xfff;
/// 已定义的类型标签个数（含 [`RPAD_NO_TYPE`]）
pub const NUM_RPAD_TYPES: usize = 7;

/// 功能块类型
///
/// 数值即写入识别字高位的类型标签。新类型只能追加在末尾。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u32)]
pub enum DevType {
    /// 管家块（LED、扩展口、DNA）
    Hk = 1,
    /// 示波器
    Scope = 2,
    /// 任意信号发生器
    Asg = 3,
    /// PID 控制器
    Pid = 4,
    /// 模拟混合信号块
    Ams = 5,
    /// 菊花链
    Daisy = 6,
}

impl DevType {
    /// 由类型标签得到类型；0、sysconfig 标签和未定义的标签返回 `None`
    pub const fn from_tag(tag: u32) -> Option<Self> {
        match tag {
            1 => Some(DevType::Hk),
            2 => Some(DevType::Scope),
            3 => Some(DevType::Asg),
            4 => Some(DevType::Pid),
            5 => Some(DevType::Ams),
            6 => Some(DevType::Daisy),
            _ => None,
        }
    }

    /// 类型标签
    #[inline]
    pub const fn tag(self) -> u32 {
        self as u32
    }

    /// 在按类型索引的表中的下标
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

// ========== 识别字编解码 ==========

/// 取识别字的类型标签
#[inline]
pub const fn rpad_type(id: u32) -> u32 {
    id >> RPAD_VERSIONBITS
}

/// 取识别字的版本号
#[inline]
pub const fn rpad_version(id: u32) -> u32 {
    id & RPAD_VERSIONMASK
}

/// 将识别字拆成 `(类型标签, 版本号)`，不会失败
#[inline]
pub const fn decode(id: u32) -> (u32, u32) {
    (rpad_type(id), rpad_version(id))
}

/// 由类型标签和版本号组合识别字
///
/// 超出位宽的部分被截断：类型标签保留低 12 位，版本号保留低 20 位。
#[inline]
pub const fn encode(typ: u32, version: u32) -> u32 {
    (typ << RPAD_VERSIONBITS) | (version & RPAD_VERSIONMASK)
}

/// 第 `region_nr` 个总线区域的物理起始地址
#[inline]
pub const fn region_addr(region_nr: u32) -> usize {
    RPAD_PL_BASE + region_nr as usize * RPAD_PL_REGION_SIZE
}

//! 驱动错误类型
//!
//! 定义了与 POSIX 兼容的错误码，可通过 [`RpadError::to_errno()`] 转换为内核错误码。

use core::fmt;

/// 驱动错误类型
///
/// 各错误码对应标准 POSIX errno 值。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpadError {
    // 资源争用
    /// 资源已被占用 (-EBUSY)
    Busy,
    /// 内存不足 (-ENOMEM)
    NoMemory,
    /// 对象已存在 (-EEXIST)
    AlreadyExists,

    // 参数相关
    /// 无效参数 (-EINVAL)
    InvalidArgument,

    // 设备相关
    /// 设备或地址不存在 (-ENXIO)
    NoSuchDevice,
    /// 扫描结束后一个设备都没有装上 (-ENXIO)
    NoDevicesInstalled,
    /// 操作不支持 (-EOPNOTSUPP)
    NotSupported,
    /// 设备不认识的 ioctl 命令 (-ENOTTY)
    InvalidIoctl,

    // 其他
    /// I/O 错误 (-EIO)
    Io,
}

impl RpadError {
    /// 转换为内核错误码（负数）
    pub fn to_errno(&self) -> i32 {
        match self {
            RpadError::Io => -5,
            RpadError::NoSuchDevice | RpadError::NoDevicesInstalled => -6,
            RpadError::NoMemory => -12,
            RpadError::Busy => -16,
            RpadError::AlreadyExists => -17,
            RpadError::InvalidArgument => -22,
            RpadError::InvalidIoctl => -25,
            RpadError::NotSupported => -95,
        }
    }

    /// 从内核错误码（负数）转换，未知错误码归为 [`RpadError::Io`]
    pub fn from_errno(errno: i32) -> Self {
        match errno {
            -6 => RpadError::NoSuchDevice,
            -12 => RpadError::NoMemory,
            -16 => RpadError::Busy,
            -17 => RpadError::AlreadyExists,
            -22 => RpadError::InvalidArgument,
            -25 => RpadError::InvalidIoctl,
            -95 => RpadError::NotSupported,
            _ => RpadError::Io,
        }
    }
}

impl fmt::Display for RpadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            RpadError::Busy => "resource busy",
            RpadError::NoMemory => "out of memory",
            RpadError::AlreadyExists => "already exists",
            RpadError::InvalidArgument => "invalid argument",
            RpadError::NoSuchDevice => "no such device or address",
            RpadError::NoDevicesInstalled => "no devices installed",
            RpadError::NotSupported => "operation not supported",
            RpadError::InvalidIoctl => "inappropriate ioctl for device",
            RpadError::Io => "i/o error",
        };
        write!(f, "{} ({})", msg, self.to_errno())
    }
}

/// 总线区域探测失败的原因
///
/// 这两种结果都只是分类结论，调用方跳过该区域即可。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeError {
    /// 区域内没有可识别的功能块（类型为 0、越界或未注册处理程序）
    NotFound,
    /// 无法建立临时映射（区域被占用或映射失败）
    Unavailable,
}

impl From<ProbeError> for RpadError {
    fn from(err: ProbeError) -> Self {
        match err {
            ProbeError::NotFound => RpadError::NoSuchDevice,
            ProbeError::Unavailable => RpadError::Busy,
        }
    }
}

/// I/O 窗口获取失败的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapError {
    /// 区间已被预留
    Blocked,
    /// 预留成功但建立映射失败，预留已被释放
    RemapFailed,
}

impl From<MapError> for RpadError {
    fn from(_: MapError) -> Self {
        RpadError::Busy
    }
}

//! 模块参数
//!
//! 对应 insmod 命令行上的两个只读参数：
//!
//! - `major`：固定的起始 major 号，0 表示由内核分配
//! - `minor`：起始 minor 号
//!
//! ```
//! use rpad::ModuleParams;
//!
//! let params = ModuleParams::parse("major=240 minor=0x10").unwrap();
//! assert_eq!(params, ModuleParams { major: 240, minor: 16 });
//! ```

use log::warn;

use crate::devno::{MAX_MAJOR, MINORMASK};
use crate::error::RpadError;

/// 模块参数，加载后只读
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModuleParams {
    /// 起始 major 号，0 表示自动分配
    pub major: u32,
    /// 起始 minor 号
    pub minor: u32,
}

impl ModuleParams {
    /// 解析以空白分隔的 `name=value` 参数串
    ///
    /// 数值可以是十进制或 `0x` 前缀的十六进制。
    /// 未知参数、缺少值、数值非法，或 major/minor 超出设备号的位宽时
    /// 返回 [`RpadError::InvalidArgument`]。
    pub fn parse(args: &str) -> Result<Self, RpadError> {
        let mut params = Self::default();

        for arg in args.split_whitespace() {
            let Some((name, value)) = arg.split_once('=') else {
                warn!("rpad: parameter '{}' requires a value", arg);
                return Err(RpadError::InvalidArgument);
            };
            let value = parse_uint(value).ok_or_else(|| {
                warn!("rpad: invalid value '{}' for parameter '{}'", value, name);
                RpadError::InvalidArgument
            })?;
            match name {
                "major" if value > MAX_MAJOR => {
                    warn!("rpad: major {} out of range", value);
                    return Err(RpadError::InvalidArgument);
                }
                "minor" if value > MINORMASK => {
                    warn!("rpad: minor {} out of range", value);
                    return Err(RpadError::InvalidArgument);
                }
                "major" => params.major = value,
                "minor" => params.minor = value,
                _ => {
                    warn!("rpad: unknown parameter '{}'", name);
                    return Err(RpadError::InvalidArgument);
                }
            }
        }

        Ok(params)
    }

    /// 是否指定了固定的 major 号
    #[inline]
    pub fn fixed_major(&self) -> bool {
        self.major != 0
    }
}

fn parse_uint(s: &str) -> Option<u32> {
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16).ok(),
        None => s.parse().ok(),
    }
}

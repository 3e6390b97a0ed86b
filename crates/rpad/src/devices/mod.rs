//! 平台自带的设备类型处理程序
//!
//! 每个处理程序提供：
//! - 一个 [`DevTypeData`](crate::DevTypeData) 描述符；
//! - `setup`：按值接收 [`DeviceSnapshot`](crate::DeviceSnapshot)，分配类型专属结构体；
//! - `teardown`：释放类型专属结构体，交还其中的 [`DeviceInstance`](crate::DeviceInstance)；
//! - 类型专属结构体上的 [`CharDevOps`](crate::CharDevOps) 实现。

pub mod asg;
pub mod hk;
pub mod scope;

pub use asg::{RPAD_ASG_DATA, RpadAsg};
pub use hk::{HkLeds, RPAD_HK_DATA, RpadHk};
pub use scope::{RPAD_SCOPE_DATA, RPAD_SCOPE_VERSION, RpadScope};

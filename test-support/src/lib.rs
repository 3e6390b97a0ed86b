//! 测试支持 crate
//!
//! 提供宿主机测试用的 Mock 实现

pub mod mock;

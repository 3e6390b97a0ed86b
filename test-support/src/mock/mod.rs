//! Mock 实现模块
//!
//! 提供内核服务的 Mock 实现，用于测试

pub mod kernel;

pub use kernel::MockKernel;

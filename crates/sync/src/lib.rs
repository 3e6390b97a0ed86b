//! 同步原语
//!
//! 向驱动的其它模块提供基本的锁原语。
//!
//! 锁的数据部分由 [`lock_api`] 提供，本 crate 只实现底层的原子自旋锁
//! [`RawSpinLock`]，并导出组合后的 [`SpinLock`]。

#![no_std]

mod raw_spin_lock;
mod spin_lock;

pub use raw_spin_lock::*;
pub use spin_lock::*;

#[cfg(test)]
mod tests;

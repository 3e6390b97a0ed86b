//! 内核服务的 Mock 实现
//!
//! 注意：这里不直接依赖 `rpad` crate（避免循环依赖）。
//! `rpad` crate 在 `cfg(test)` 下为 [`MockKernel`] 实现其 `KernelOps` trait。
//!
//! 失败统一以负的 errno 表示。

use std::collections::{BTreeMap, BTreeSet};
use std::string::{String, ToString};
use std::sync::{Mutex, MutexGuard};
use std::vec::Vec;

const EBUSY: i32 = -16;
const ENOMEM: i32 = -12;
const EEXIST: i32 = -17;
const EINVAL: i32 = -22;

/// dev_t 中 minor 所占位数（与 Linux 内核内部编码一致）
const MINORBITS: u32 = 20;
const MINORMASK: u32 = (1 << MINORBITS) - 1;

/// 动态分配的第一个 major 号
const DYNAMIC_MAJOR_BASE: u32 = 240;

/// ioremap 返回的虚拟地址起点
const VMALLOC_BASE: usize = 0xe000_0000;

/// 一段 I/O 内存预留
#[derive(Debug, Clone)]
pub struct Reservation {
    pub start: usize,
    pub len: usize,
    pub name: String,
}

#[derive(Debug, Default)]
struct Faults {
    ioremap: usize,
    class_create: usize,
    device_create: usize,
    cdev_add: usize,
}

#[derive(Debug, Default)]
struct KernelState {
    /// 总线寄存器，按物理地址索引，未写入的地址读为 0
    regs: BTreeMap<usize, u32>,
    reservations: Vec<Reservation>,
    /// cookie -> (物理地址, 长度)
    mappings: BTreeMap<usize, (usize, usize)>,
    next_cookie: usize,
    /// (起始设备号, 数量, 名称)
    chrdev_regions: Vec<(u32, u32, String)>,
    next_dynamic_major: u32,
    classes: BTreeMap<usize, String>,
    next_class: usize,
    /// 设备号 -> (class, 节点名)
    nodes: BTreeMap<u32, (usize, String)>,
    cdevs: BTreeSet<u32>,
    faults: Faults,
}

/// Mock 的内核
///
/// 模拟一条 32 位寄存器总线以及驱动用到的全部内核资源表，
/// 并支持对下一次调用注入失败。
#[derive(Debug)]
pub struct MockKernel {
    state: Mutex<KernelState>,
}

impl Default for MockKernel {
    fn default() -> Self {
        Self::new()
    }
}

fn overlaps(a_start: usize, a_len: usize, b_start: usize, b_len: usize) -> bool {
    a_start < b_start + b_len && b_start < a_start + a_len
}

fn take_fault(counter: &mut usize) -> bool {
    if *counter > 0 {
        *counter -= 1;
        true
    } else {
        false
    }
}

impl MockKernel {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(KernelState {
                next_cookie: VMALLOC_BASE,
                next_dynamic_major: DYNAMIC_MAJOR_BASE,
                ..KernelState::default()
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, KernelState> {
        self.state.lock().unwrap()
    }

    // ========== 总线寄存器 ==========

    /// 设置物理地址 `paddr` 处寄存器的值
    pub fn set_reg(&self, paddr: usize, value: u32) {
        self.state().regs.insert(paddr, value);
    }

    /// 读取物理地址 `paddr` 处寄存器的值
    pub fn reg(&self, paddr: usize) -> u32 {
        self.state().regs.get(&paddr).copied().unwrap_or(0)
    }

    // ========== I/O 内存 ==========

    /// 预留 `[start, start + len)`，与已有预留重叠时失败
    pub fn request_mem_region(&self, start: usize, len: usize, name: &str) -> bool {
        let mut st = self.state();
        if st
            .reservations
            .iter()
            .any(|r| overlaps(r.start, r.len, start, len))
        {
            return false;
        }
        st.reservations.push(Reservation {
            start,
            len,
            name: name.to_string(),
        });
        true
    }

    /// 释放预留；释放未持有的区间会 panic
    pub fn release_mem_region(&self, start: usize, len: usize) {
        let mut st = self.state();
        let pos = st
            .reservations
            .iter()
            .position(|r| r.start == start && r.len == len)
            .expect("release_mem_region: range not reserved");
        st.reservations.remove(pos);
    }

    pub fn ioremap(&self, paddr: usize, len: usize) -> Option<usize> {
        let mut st = self.state();
        if take_fault(&mut st.faults.ioremap) {
            return None;
        }
        let cookie = st.next_cookie;
        st.next_cookie += len;
        st.mappings.insert(cookie, (paddr, len));
        Some(cookie)
    }

    pub fn iounmap(&self, cookie: usize) {
        self.state()
            .mappings
            .remove(&cookie)
            .expect("iounmap: cookie not mapped");
    }

    pub fn ioread32(&self, cookie: usize, offset: usize) -> u32 {
        let st = self.state();
        let (paddr, len) = *st.mappings.get(&cookie).expect("ioread32: cookie not mapped");
        assert!(offset + 4 <= len, "ioread32: offset out of window");
        st.regs.get(&(paddr + offset)).copied().unwrap_or(0)
    }

    pub fn iowrite32(&self, cookie: usize, offset: usize, value: u32) {
        let mut st = self.state();
        let (paddr, len) = *st.mappings.get(&cookie).expect("iowrite32: cookie not mapped");
        assert!(offset + 4 <= len, "iowrite32: offset out of window");
        st.regs.insert(paddr + offset, value);
    }

    // ========== 字符设备号 ==========

    pub fn register_chrdev_region(&self, first: u32, count: u32, name: &str) -> Result<(), i32> {
        let mut st = self.state();
        let major = first >> MINORBITS;
        let minor = first & MINORMASK;
        if count == 0 || minor as u64 + count as u64 > MINORMASK as u64 + 1 {
            return Err(EINVAL);
        }
        let clash = st.chrdev_regions.iter().any(|(f, c, _)| {
            (f >> MINORBITS) == major
                && overlaps((f & MINORMASK) as usize, *c as usize, minor as usize, count as usize)
        });
        if clash {
            return Err(EBUSY);
        }
        st.chrdev_regions.push((first, count, name.to_string()));
        Ok(())
    }

    pub fn alloc_chrdev_region(&self, first_minor: u32, count: u32, name: &str) -> Result<u32, i32> {
        if count == 0 || first_minor as u64 + count as u64 > MINORMASK as u64 + 1 {
            return Err(EINVAL);
        }
        let mut st = self.state();
        let major = st.next_dynamic_major;
        if major == 0 {
            return Err(EBUSY);
        }
        st.next_dynamic_major -= 1;
        let first = (major << MINORBITS) | first_minor;
        st.chrdev_regions.push((first, count, name.to_string()));
        Ok(first)
    }

    pub fn unregister_chrdev_region(&self, first: u32, count: u32) {
        let mut st = self.state();
        let pos = st
            .chrdev_regions
            .iter()
            .position(|(f, c, _)| *f == first && *c == count)
            .expect("unregister_chrdev_region: range not registered");
        st.chrdev_regions.remove(pos);
    }

    // ========== 设备模型 ==========

    pub fn class_create(&self, name: &str) -> Result<usize, i32> {
        let mut st = self.state();
        if take_fault(&mut st.faults.class_create) {
            return Err(ENOMEM);
        }
        if st.classes.values().any(|c| c == name) {
            return Err(EEXIST);
        }
        st.next_class += 1;
        let id = st.next_class;
        st.classes.insert(id, name.to_string());
        Ok(id)
    }

    pub fn class_destroy(&self, class: usize) {
        let mut st = self.state();
        assert!(
            !st.nodes.values().any(|(c, _)| *c == class),
            "class_destroy: class still has devices"
        );
        st.classes
            .remove(&class)
            .expect("class_destroy: unknown class");
    }

    pub fn device_create(&self, class: usize, devt: u32, name: &str) -> Result<usize, i32> {
        let mut st = self.state();
        if take_fault(&mut st.faults.device_create) {
            return Err(ENOMEM);
        }
        if !st.classes.contains_key(&class) {
            return Err(EINVAL);
        }
        if st.nodes.contains_key(&devt) || st.nodes.values().any(|(_, n)| n == name) {
            return Err(EEXIST);
        }
        st.nodes.insert(devt, (class, name.to_string()));
        Ok(devt as usize)
    }

    pub fn device_destroy(&self, class: usize, devt: u32) {
        let mut st = self.state();
        let (owner, _) = st
            .nodes
            .remove(&devt)
            .expect("device_destroy: no such device");
        assert_eq!(owner, class, "device_destroy: class mismatch");
    }

    pub fn cdev_add(&self, devt: u32, count: u32) -> Result<(), i32> {
        let mut st = self.state();
        if take_fault(&mut st.faults.cdev_add) {
            return Err(EBUSY);
        }
        for d in devt..devt + count {
            if !st.cdevs.insert(d) {
                return Err(EBUSY);
            }
        }
        Ok(())
    }

    pub fn cdev_del(&self, devt: u32, count: u32) {
        let mut st = self.state();
        for d in devt..devt + count {
            assert!(st.cdevs.remove(&d), "cdev_del: not registered");
        }
    }

    // ========== 故障注入 ==========

    /// 让接下来的 `n` 次 ioremap 失败
    pub fn fail_next_ioremap(&self, n: usize) {
        self.state().faults.ioremap = n;
    }

    /// 让下一次 class_create 失败
    pub fn fail_next_class_create(&self) {
        self.state().faults.class_create = 1;
    }

    /// 让接下来的 `n` 次 device_create 失败
    pub fn fail_next_device_create(&self, n: usize) {
        self.state().faults.device_create = n;
    }

    /// 让接下来的 `n` 次 cdev_add 失败
    pub fn fail_next_cdev_add(&self, n: usize) {
        self.state().faults.cdev_add = n;
    }

    // ========== 状态查询 ==========

    pub fn reservations(&self) -> Vec<Reservation> {
        self.state().reservations.clone()
    }

    pub fn is_reserved(&self, start: usize) -> bool {
        self.state().reservations.iter().any(|r| r.start == start)
    }

    pub fn mapping_count(&self) -> usize {
        self.state().mappings.len()
    }

    pub fn chrdev_region_count(&self) -> usize {
        self.state().chrdev_regions.len()
    }

    pub fn class_count(&self) -> usize {
        self.state().classes.len()
    }

    /// 所有设备节点名，按设备号排序
    pub fn device_names(&self) -> Vec<String> {
        self.state().nodes.values().map(|(_, n)| n.clone()).collect()
    }

    pub fn cdev_count(&self) -> usize {
        self.state().cdevs.len()
    }

    pub fn has_cdev(&self, devt: u32) -> bool {
        self.state().cdevs.contains(&devt)
    }

    /// 没有任何残留的内核资源
    pub fn is_clean(&self) -> bool {
        let st = self.state();
        st.reservations.is_empty()
            && st.mappings.is_empty()
            && st.chrdev_regions.is_empty()
            && st.classes.is_empty()
            && st.nodes.is_empty()
            && st.cdevs.is_empty()
    }
}

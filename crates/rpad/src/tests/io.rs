use log::Level;

use super::*;
use crate::error::MapError;
use crate::hw::{RPAD_PL_REGION_SIZE, region_addr};
use crate::io::IoRegion;

#[test]
fn test_acquire_maps_and_reserves() {
    let bus = Bus::new(1);
    let ops = bus.ops();
    let start = region_addr(0);

    let io = IoRegion::acquire(&ops, start, RPAD_PL_REGION_SIZE, "test").unwrap();
    assert_eq!(io.start(), start);
    assert_eq!(io.size(), RPAD_PL_REGION_SIZE);
    assert!(bus.mock.is_reserved(start));
    assert_eq!(bus.mock.mapping_count(), 1);

    drop(io);
    assert!(!bus.mock.is_reserved(start));
    assert_eq!(bus.mock.mapping_count(), 0);
}

#[test]
fn test_acquire_twice_is_busy() {
    let bus = Bus::new(1);
    let ops = bus.ops();
    let start = region_addr(0);

    let first = IoRegion::acquire(&ops, start, RPAD_PL_REGION_SIZE, "first").unwrap();
    let second = IoRegion::acquire(&ops, start, RPAD_PL_REGION_SIZE, "second");
    assert_eq!(second.unwrap_err(), MapError::Blocked);

    // 第一次的预留不受影响
    assert_eq!(bus.mock.reservations().len(), 1);
    assert_eq!(bus.mock.reservations()[0].name, "first");
    first.release();
    assert!(bus.mock.is_clean());
}

#[test]
fn test_ioremap_failure_leaves_range_free() {
    let bus = Bus::new(1);
    let ops = bus.ops();
    let start = region_addr(0);

    bus.mock.fail_next_ioremap(1);
    let ret = IoRegion::acquire(&ops, start, RPAD_PL_REGION_SIZE, "test");
    assert_eq!(ret.unwrap_err(), MapError::RemapFailed);
    assert!(!bus.mock.is_reserved(start));
    assert_eq!(bus.mock.mapping_count(), 0);

    // 区间仍可被再次获取
    let io = IoRegion::acquire(&ops, start, RPAD_PL_REGION_SIZE, "test").unwrap();
    drop(io);
    assert!(bus.mock.is_clean());
}

#[test]
fn test_read_write_through_window() {
    let bus = Bus::new(1);
    let ops = bus.ops();
    let start = region_addr(2);
    bus.mock.set_reg(start + 0x10, 0xdead_beef);

    let io = IoRegion::acquire(&ops, start, RPAD_PL_REGION_SIZE, "test").unwrap();
    assert_eq!(io.read32(0x10), 0xdead_beef);

    io.write32(0x20, 0x1234);
    assert_eq!(bus.mock.reg(start + 0x20), 0x1234);
}

#[test]
fn test_acquire_failure_is_silent() {
    let bus = Bus::new(1);
    let ops = bus.ops();
    let start = region_addr(0);
    logger::capture();

    let held = IoRegion::acquire(&ops, start, RPAD_PL_REGION_SIZE, "held").unwrap();
    assert!(IoRegion::acquire(&ops, start, RPAD_PL_REGION_SIZE, "test").is_err());
    drop(held);

    bus.mock.fail_next_ioremap(1);
    assert!(IoRegion::acquire(&ops, start, RPAD_PL_REGION_SIZE, "test").is_err());

    assert!(logger::records().iter().all(|(level, _)| *level > Level::Warn));
    assert_eq!(RpadError::from(MapError::Blocked), RpadError::Busy);
    assert_eq!(RpadError::from(MapError::RemapFailed), RpadError::Busy);
}

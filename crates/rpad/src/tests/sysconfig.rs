use log::Level;

use super::*;
use crate::devices::{RPAD_ASG_DATA, RPAD_HK_DATA, RPAD_SCOPE_DATA};
use crate::error::ProbeError;
use crate::hw::{DevType, RPAD_MAX_REGIONS, RPAD_PL_REGION_SIZE};
use crate::io::IoRegion;
use crate::sysconfig::{check_sysconfig, get_devtype_data};

fn check(id: u32, nr: u32) -> bool {
    let bus = Bus::new(0);
    bus.sysconfig(id, nr);
    let mut sys = bus.sys(ModuleParams::default());
    check_sysconfig(&mut sys)
}

fn sys_id() -> u32 {
    encode(RPAD_SYS_TYPE, RPAD_SYS_VERSION)
}

#[test]
fn test_check_sysconfig_stores_id_and_regions() {
    let bus = Bus::new(5);
    let mut sys = bus.sys(ModuleParams::default());

    assert!(check_sysconfig(&mut sys));
    assert_eq!(sys.id(), sys_id());
    assert_eq!(sys.nr_of_regions(), 5);
}

#[test]
fn test_check_sysconfig_region_bounds() {
    assert!(!check(sys_id(), 0));
    assert!(check(sys_id(), 1));
    assert!(check(sys_id(), RPAD_MAX_REGIONS));
    assert!(!check(sys_id(), RPAD_MAX_REGIONS + 1));
}

#[test]
fn test_check_sysconfig_rejects_foreign_pl() {
    // 空总线读回全 0
    assert!(!check(0, 0));
    assert!(!check(encode(DevType::Hk.tag(), RPAD_SYS_VERSION), 4));
    assert!(!check(encode(RPAD_SYS_TYPE, 2), 4));
    assert!(!check(encode(RPAD_SYS_TYPE, 0), 4));
}

#[test]
fn test_sysconfig_window_is_exclusive() {
    let bus = Bus::new(1);
    let ops = bus.ops();

    let sys = bus.sys(ModuleParams::default());
    assert_eq!(map_sysconfig_io(&ops).unwrap_err(), RpadError::Busy);

    drop(sys);
    assert!(bus.mock.is_clean());
}

#[test]
fn test_get_devtype_data_known_types() {
    let bus = Bus::with_regions(&[
        (DevType::Hk.tag(), 1),
        (DevType::Scope.tag(), 1),
        (DevType::Asg.tag(), 7),
    ]);
    let ops = bus.ops();

    let hk = get_devtype_data(&ops, 0).unwrap();
    assert!(core::ptr::eq(hk, &RPAD_HK_DATA));
    let scope = get_devtype_data(&ops, 1).unwrap();
    assert!(core::ptr::eq(scope, &RPAD_SCOPE_DATA));
    let asg = get_devtype_data(&ops, 2).unwrap();
    assert!(core::ptr::eq(asg, &RPAD_ASG_DATA));

    // 探测用的临时映射不残留
    assert!(bus.mock.is_clean());
}

#[test]
fn test_get_devtype_data_not_found() {
    let bus = Bus::with_regions(&[
        (0, 0),
        (DevType::Pid.tag(), 1),
        (DevType::Daisy.tag(), 1),
        (RPAD_SYS_TYPE, 1),
        (0x123, 1),
    ]);
    let ops = bus.ops();

    for nr in 0..5 {
        assert_eq!(get_devtype_data(&ops, nr).unwrap_err(), ProbeError::NotFound);
    }
    assert!(bus.mock.is_clean());
}

#[test]
fn test_get_devtype_data_unavailable() {
    let bus = Bus::with_regions(&[(DevType::Hk.tag(), 1)]);
    let ops = bus.ops();
    let start = region_addr(0);

    let other = IoRegion::acquire(&ops, start, RPAD_PL_REGION_SIZE, "other").unwrap();
    assert_eq!(get_devtype_data(&ops, 0).unwrap_err(), ProbeError::Unavailable);
    assert_eq!(bus.mock.reservations().len(), 1);
    drop(other);

    bus.mock.fail_next_ioremap(1);
    assert_eq!(get_devtype_data(&ops, 0).unwrap_err(), ProbeError::Unavailable);
    assert!(bus.mock.is_clean());
}

#[test]
fn test_unavailable_region_is_skipped_silently() {
    let bus = Bus::with_regions(&[(DevType::Hk.tag(), 1), (DevType::Scope.tag(), 1)]);
    let ops = bus.ops();
    logger::capture();

    let other = IoRegion::acquire(&ops, region_addr(0), RPAD_PL_REGION_SIZE, "other").unwrap();
    assert_eq!(get_devtype_data(&ops, 0).unwrap_err(), ProbeError::Unavailable);
    bus.mock.fail_next_ioremap(1);
    assert_eq!(get_devtype_data(&ops, 1).unwrap_err(), ProbeError::Unavailable);
    drop(other);

    assert!(logger::records().iter().all(|(level, _)| *level > Level::Warn));
}

#[test]
fn test_sysconfig_window_blocked_is_reported() {
    let bus = Bus::new(1);
    let ops = bus.ops();
    let _sys = bus.sys(ModuleParams::default());
    logger::capture();

    assert_eq!(map_sysconfig_io(&ops).unwrap_err(), RpadError::Busy);
    assert!(logger::warned("rpad_sysconfig: io region blocked"));
}

#[test]
fn test_probe_error_maps_to_rpad_error() {
    assert_eq!(RpadError::from(ProbeError::NotFound), RpadError::NoSuchDevice);
    assert_eq!(RpadError::from(ProbeError::Unavailable), RpadError::Busy);
}

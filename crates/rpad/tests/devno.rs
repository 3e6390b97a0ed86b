use rpad::devno::{MINORBITS, MINORMASK};
use rpad::{major, makedev, minor};

#[test]
fn test_makedev_major_minor() {
    let dev = makedev(240, 3);
    assert_eq!(major(dev), 240);
    assert_eq!(minor(dev), 3);
}

#[test]
fn test_makedev_zero() {
    assert_eq!(makedev(0, 0), 0);
}

#[test]
fn test_minor_uses_low_twenty_bits() {
    assert_eq!(MINORBITS, 20);
    let dev = makedev(1, MINORMASK);
    assert_eq!(dev, (1 << 20) | 0xf_ffff);
    assert_eq!(major(dev), 1);
    assert_eq!(minor(dev), MINORMASK);
}

#[test]
fn test_consecutive_minors() {
    let first = makedev(100, 4);
    for i in 0..3 {
        assert_eq!(first + i, makedev(100, 4 + i));
    }
}

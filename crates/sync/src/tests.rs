extern crate std;

use std::sync::Arc;
use std::thread;
use std::vec::Vec;

use crate::SpinLock;

#[test]
fn test_lock_and_modify() {
    let lock = SpinLock::new(5);
    {
        let mut guard = lock.lock();
        *guard += 1;
        assert!(lock.is_locked());
    }
    assert!(!lock.is_locked());
    assert_eq!(*lock.lock(), 6);
}

#[test]
fn test_try_lock_contended() {
    let lock = SpinLock::new(());
    let guard = lock.lock();
    assert!(lock.try_lock().is_none());
    drop(guard);
    assert!(lock.try_lock().is_some());
}

#[test]
fn test_concurrent_increments() {
    let counter = Arc::new(SpinLock::new(0usize));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let counter = counter.clone();
            thread::spawn(move || {
                for _ in 0..1000 {
                    *counter.lock() += 1;
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(*counter.lock(), 4000);
}

//! 按线程捕获 `log` 记录
//!
//! 测试各自运行在独立线程上，记录存放在线程局部的缓冲区中，互不干扰。

extern crate std;

use core::cell::RefCell;
use std::string::{String, ToString};
use std::sync::Once;
use std::vec::Vec;

use log::{Level, LevelFilter, Log, Metadata, Record};

std::thread_local! {
    static RECORDS: RefCell<Vec<(Level, String)>> = const { RefCell::new(Vec::new()) };
}

struct CaptureLogger;

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &Record<'_>) {
        RECORDS.with(|records| {
            records
                .borrow_mut()
                .push((record.level(), record.args().to_string()));
        });
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger;
static INIT: Once = Once::new();

/// 安装捕获用的 logger，并清空当前线程已有的记录
pub(super) fn capture() {
    INIT.call_once(|| {
        log::set_logger(&LOGGER).unwrap();
        log::set_max_level(LevelFilter::Trace);
    });
    RECORDS.with(|records| records.borrow_mut().clear());
}

/// 当前线程捕获到的记录
pub(super) fn records() -> Vec<(Level, String)> {
    RECORDS.with(|records| records.borrow().clone())
}

/// 当前线程是否捕获到了 warn 级别、内容为 `msg` 的记录
pub(super) fn warned(msg: &str) -> bool {
    RECORDS.with(|records| {
        records
            .borrow()
            .iter()
            .any(|(level, text)| *level == Level::Warn && text == msg)
    })
}

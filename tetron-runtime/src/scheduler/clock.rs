//! 时钟抽象。
//!
//! 帧循环只通过 [`Clock`] 读取时间和休眠，测试中可以用 [`ManualClock`] 代替真实时间。

use std::cell::Cell;
use std::rc::Rc;
use std::thread;
use std::time::{Duration, Instant};

/// 单调时钟
pub trait Clock {
    /// 自时钟起点经过的时间
    fn now(&self) -> Duration;

    /// 阻塞休眠
    fn sleep(&self, duration: Duration);
}

/// 基于 [`Instant`] 的系统时钟
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&self, duration: Duration) {
        thread::sleep(duration);
    }
}

/// 手动推进的时钟
///
/// 克隆体共享同一个时间；`sleep` 直接把时间向前推进，不会真正阻塞。
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// 时间前进 `duration`
    pub fn advance(&self, duration: Duration) {
        self.now.set(self.now.get() + duration);
    }

    pub fn set(&self, now: Duration) {
        self.now.set(now);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }

    fn sleep(&self, duration: Duration) {
        self.advance(duration);
    }
}

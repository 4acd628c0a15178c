//! 固定帧间隔的节拍器。

use std::time::Duration;

use crate::error::SchedulerError;

/// 帧节拍器
///
/// 只负责计算距离下一帧还需等待多久，休眠由调用方通过时钟完成。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramePacer {
    interval: Duration,
    last_tick: Option<Duration>,
}

impl FramePacer {
    pub fn new(fps: u32) -> Result<Self, SchedulerError> {
        if fps == 0 {
            return Err(SchedulerError::InvalidFrameRate { fps });
        }
        Ok(Self {
            interval: Duration::from_nanos(1_000_000_000 / u64::from(fps)),
            last_tick: None,
        })
    }

    /// 目标帧间隔
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// 上一帧的时间
    pub fn last_tick(&self) -> Option<Duration> {
        self.last_tick
    }

    /// 距离下一帧还需等待的时间，为零表示可以立即运行
    pub fn remaining(&self, now: Duration) -> Duration {
        match self.last_tick {
            Some(last) => self.interval.saturating_sub(now.saturating_sub(last)),
            None => Duration::ZERO,
        }
    }

    /// 记录一帧已在 `now` 运行
    pub fn mark(&mut self, now: Duration) {
        self.last_tick = Some(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_fps_rejected() {
        assert_eq!(
            FramePacer::new(0),
            Err(SchedulerError::InvalidFrameRate { fps: 0 })
        );
    }

    #[test]
    fn test_interval_from_fps() {
        let pacer = FramePacer::new(50).unwrap();
        assert_eq!(pacer.interval(), Duration::from_millis(20));
    }

    #[test]
    fn test_remaining_time() {
        let mut pacer = FramePacer::new(50).unwrap();
        assert_eq!(pacer.remaining(Duration::from_millis(3)), Duration::ZERO);

        pacer.mark(Duration::from_millis(3));
        assert_eq!(
            pacer.remaining(Duration::from_millis(10)),
            Duration::from_millis(13)
        );
        assert_eq!(pacer.remaining(Duration::from_millis(23)), Duration::ZERO);
        assert_eq!(pacer.remaining(Duration::from_millis(40)), Duration::ZERO);
    }
}

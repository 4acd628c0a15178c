//! 等待动作。
//!
//! 等待分两个阶段：实体的等待条件（跨实体依赖）解除之前不做任何事；
//! 解除之后的第一帧才开始计时，`wait_time` 过后完成。

use std::time::Duration;

use super::{Step, TickContext};

/// 等待动作状态
#[derive(Debug, Clone, PartialEq)]
pub struct WaitState {
    wait_time: Duration,
    /// 条件解除后的第一帧计算得到的截止时间
    goal_time: Option<Duration>,
}

impl WaitState {
    pub(crate) fn new(wait_time: Duration) -> Self {
        Self {
            wait_time,
            goal_time: None,
        }
    }

    pub fn wait_time(&self) -> Duration {
        self.wait_time
    }

    /// 截止时间，计时开始前为 `None`
    pub fn goal_time(&self) -> Option<Duration> {
        self.goal_time
    }

    pub fn advance(&mut self, tick: &TickContext) -> Step {
        if tick.wait_blocked {
            return Step::Running;
        }

        let wait_time = self.wait_time;
        let goal_time = *self.goal_time.get_or_insert_with(|| tick.now + wait_time);
        if tick.now >= goal_time {
            Step::Complete
        } else {
            Step::Running
        }
    }
}

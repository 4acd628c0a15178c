//! Ramp 家族：进度以（可加速的）速率单调逼近目标值。

use super::{Step, accelerate};

/// 推进方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// 数值增大
    Forward,
    /// 数值减小
    Backward,
}

impl Direction {
    /// 从 `from` 走向 `to` 的方向（相等时视为增大）
    pub fn toward(from: f32, to: f32) -> Self {
        if from > to {
            Direction::Backward
        } else {
            Direction::Forward
        }
    }

    /// +1.0 或 -1.0
    pub fn sign(self) -> f32 {
        match self {
            Direction::Forward => 1.0,
            Direction::Backward => -1.0,
        }
    }
}

/// Ramp 动作状态
///
/// 用于 resize、rotate、set_depth、transform。`direction` 在第一次推进时
/// 由当前值与目标值比较得出，此后不再改变。完成判定对所有 ramp 统一使用
/// 包含边界（`>=`）。
#[derive(Debug, Clone, PartialEq)]
pub struct RampState {
    goal: f32,
    /// 目标是否为相对量（第一次推进时加上当前值）
    relative: bool,
    rate: f32,
    acceleration: f32,
    direction: Option<Direction>,
    progress: f32,
}

impl RampState {
    pub(crate) fn absolute(goal: f32, rate: f32) -> Self {
        Self {
            goal,
            relative: false,
            rate,
            acceleration: 0.0,
            direction: None,
            progress: 0.0,
        }
    }

    pub(crate) fn relative(delta: f32, rate: f32) -> Self {
        Self {
            relative: true,
            ..Self::absolute(delta, rate)
        }
    }

    pub(crate) fn with_acceleration(mut self, acceleration: f32) -> Self {
        self.acceleration = acceleration;
        self
    }

    /// 目标值（相对目标在第一次推进前为增量）
    pub fn goal(&self) -> f32 {
        self.goal
    }

    pub fn rate(&self) -> f32 {
        self.rate
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// 推进方向，第一次推进前为 `None`
    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    pub fn is_initialized(&self) -> bool {
        self.direction.is_some()
    }

    /// 推进一帧并同步修改 `value`
    ///
    /// 当前值已到达（或越过）目标时直接对齐并完成；否则前进一步，
    /// 落在目标上或越过目标的那一步同样对齐并完成。
    pub fn advance(&mut self, value: &mut f32) -> Step {
        self.progress = *value;

        let direction = match self.direction {
            Some(direction) => direction,
            None => {
                if self.relative {
                    self.goal += self.progress;
                    self.relative = false;
                }
                let direction = Direction::toward(self.progress, self.goal);
                self.direction = Some(direction);
                direction
            }
        };

        if self.reached(direction) {
            return self.snap(value);
        }

        accelerate(&mut self.rate, self.acceleration);
        let delta = self.rate * direction.sign();
        self.progress += delta;
        *value += delta;

        if self.reached(direction) {
            return self.snap(value);
        }
        Step::Running
    }

    fn reached(&self, direction: Direction) -> bool {
        self.progress * direction.sign() >= self.goal * direction.sign()
    }

    fn snap(&mut self, value: &mut f32) -> Step {
        self.progress = self.goal;
        *value = self.goal;
        Step::Complete
    }
}

//! 双轴移动。
//!
//! 标量速度按行进角度拆分为 x/y 两个分量，使斜向移动的合速度保持不变。
//! 两个轴各自推进、各自判定到达，两轴都到达后动作完成。

use crate::entity::Vec2;

use super::{Direction, Step};

/// 移动目标
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveTarget {
    /// 绝对坐标
    Absolute { x: f32, y: f32 },
    /// 相对于第一次推进时位置的偏移
    Relative { dx: f32, dy: f32 },
}

/// 单个轴的移动状态
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Axis {
    /// 相对于起点的目标距离
    pub relative_goal: f32,
    pub direction: Direction,
    /// 该轴的速度分量（非负）
    pub velocity: f32,
    pub progress: f32,
    pub reached: bool,
}

impl Axis {
    fn new(relative_goal: f32, velocity: f32) -> Self {
        Self {
            relative_goal,
            direction: Direction::toward(0.0, relative_goal),
            velocity,
            progress: 0.0,
            reached: false,
        }
    }

    /// 已越过目标时扣除多走的距离并标记到达
    fn settle(&mut self, value: &mut f32) {
        if self.reached {
            return;
        }
        let sign = self.direction.sign();
        if self.progress * sign >= self.relative_goal * sign {
            let excess = self.progress - self.relative_goal;
            self.progress = self.relative_goal;
            *value -= excess;
            self.reached = true;
        }
    }

    fn step(&mut self, value: &mut f32) {
        if self.reached {
            return;
        }
        let delta = self.velocity * self.direction.sign();
        self.progress += delta;
        *value += delta;
    }
}

/// 移动动作状态
#[derive(Debug, Clone, PartialEq)]
pub struct MoveState {
    target: MoveTarget,
    velocity: f32,
    /// 第一次推进时初始化
    axes: Option<(Axis, Axis)>,
}

impl MoveState {
    pub(crate) fn new(target: MoveTarget, velocity: f32) -> Self {
        Self {
            target,
            velocity,
            axes: None,
        }
    }

    pub fn target(&self) -> MoveTarget {
        self.target
    }

    /// 标量速度
    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    /// 两个轴的状态，第一次推进前为 `None`
    pub fn axes(&self) -> Option<&(Axis, Axis)> {
        self.axes.as_ref()
    }

    /// 行进角度（弧度，0 ~ π/2）
    pub fn travel_angle(relative_x: f32, relative_y: f32) -> f32 {
        relative_y.abs().atan2(relative_x.abs())
    }

    fn plan(target: MoveTarget, velocity: f32, position: Vec2) -> (Axis, Axis) {
        let relative = match target {
            MoveTarget::Absolute { x, y } => Vec2::new(x - position.x, y - position.y),
            MoveTarget::Relative { dx, dy } => Vec2::new(dx, dy),
        };
        let angle = Self::travel_angle(relative.x, relative.y);
        (
            Axis::new(relative.x, velocity * angle.cos()),
            Axis::new(relative.y, velocity * angle.sin()),
        )
    }

    /// 推进一帧并同步修改 `position`
    pub fn advance(&mut self, position: &mut Vec2) -> Step {
        let (target, velocity, start) = (self.target, self.velocity, *position);
        let (x, y) = self
            .axes
            .get_or_insert_with(|| Self::plan(target, velocity, start));

        x.settle(&mut position.x);
        y.settle(&mut position.y);
        if x.reached && y.reached {
            return Step::Complete;
        }

        x.step(&mut position.x);
        y.step(&mut position.y);

        x.settle(&mut position.x);
        y.settle(&mut position.y);
        if x.reached && y.reached {
            Step::Complete
        } else {
            Step::Running
        }
    }
}

//! # Action 模块
//!
//! 单个动作（`ActionState`）的数据与逐帧推进逻辑。
//!
//! ## 核心概念
//!
//! - `ActionId`: 动作标识符，在所属动作组内唯一
//! - `ActionKind`: 封闭的动作类型枚举
//! - `ActionState`: 一个属性过渡及其小型状态机
//!
//! 推进逻辑按家族拆分到子模块：
//! - [`ramp`]：尺寸、旋转、深度、形状混合（方向在第一帧确定）
//! - [`motion`]：双轴移动
//! - [`timer`]：等待
//! - [`fill`]：填充层的增长与清空
//! - [`reveal`]：一次性显示文字

mod fill;
mod motion;
mod ramp;
mod reveal;
mod timer;

use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::Serialize;

use crate::entity::EntityProperties;
use crate::error::ActionError;

pub use fill::{FillState, UnfillState};
pub use motion::{Axis, MoveState, MoveTarget};
pub use ramp::{Direction, RampState};
pub use reveal::RevealState;
pub use timer::WaitState;

/// 动作 ID
///
/// 由调用方命名（如 `"intro_fill"`），在同一动作组内必须唯一。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ActionId(String);

impl ActionId {
    /// 创建新的动作 ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// 获取字符串形式
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ActionId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ActionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for ActionId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// 动作类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// 显示文字（一次性）
    Reveal,
    /// 改变尺寸
    Resize,
    /// 移动
    Move,
    /// 旋转
    Rotate,
    /// 等待跨实体条件及延迟
    Wait,
    /// 填充层增长
    Fill,
    /// 清空所有填充层
    Unfill,
    /// 改变阴影深度
    SetDepth,
    /// 形状变换
    Transform,
}

impl ActionKind {
    /// 全部动作类型
    pub const ALL: [ActionKind; 9] = [
        ActionKind::Reveal,
        ActionKind::Resize,
        ActionKind::Move,
        ActionKind::Rotate,
        ActionKind::Wait,
        ActionKind::Fill,
        ActionKind::Unfill,
        ActionKind::SetDepth,
        ActionKind::Transform,
    ];

    /// 动作类型名称
    pub fn name(&self) -> &'static str {
        match self {
            ActionKind::Reveal => "display_text",
            ActionKind::Resize => "resize",
            ActionKind::Move => "move",
            ActionKind::Rotate => "rotate",
            ActionKind::Wait => "wait",
            ActionKind::Fill => "fill",
            ActionKind::Unfill => "unfill",
            ActionKind::SetDepth => "set_depth",
            ActionKind::Transform => "transform",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ActionKind {
    type Err = ActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActionKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| ActionError::UnknownKind {
                kind: s.to_string(),
            })
    }
}

/// 单次推进的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// 仍在进行
    Running,
    /// 本帧完成
    Complete,
}

impl Step {
    /// 是否完成
    pub fn is_complete(self) -> bool {
        self == Step::Complete
    }
}

/// 推进动作时需要的帧信息
#[derive(Debug, Clone, Copy)]
pub struct TickContext {
    /// 当前时间（自时钟起点）
    pub now: Duration,
    /// 所属实体是否仍有未解除的等待条件
    pub wait_blocked: bool,
}

/// 各动作类型的专有数据
#[derive(Debug, Clone, PartialEq)]
pub enum ActionData {
    Reveal(RevealState),
    Resize(RampState),
    Move(MoveState),
    Rotate(RampState),
    Wait(WaitState),
    Fill(FillState),
    Unfill(UnfillState),
    SetDepth(RampState),
    Transform(RampState),
}

impl ActionData {
    /// 对应的动作类型
    pub fn kind(&self) -> ActionKind {
        match self {
            ActionData::Reveal(_) => ActionKind::Reveal,
            ActionData::Resize(_) => ActionKind::Resize,
            ActionData::Move(_) => ActionKind::Move,
            ActionData::Rotate(_) => ActionKind::Rotate,
            ActionData::Wait(_) => ActionKind::Wait,
            ActionData::Fill(_) => ActionKind::Fill,
            ActionData::Unfill(_) => ActionKind::Unfill,
            ActionData::SetDepth(_) => ActionKind::SetDepth,
            ActionData::Transform(_) => ActionKind::Transform,
        }
    }

    /// 基础动作表：所有实体类型共享的推进逻辑
    ///
    /// 不在基础表中的动作类型返回 `None`，由实体类型自己的动作表处理。
    pub(crate) fn advance_base(
        &mut self,
        props: &mut EntityProperties,
        tick: &TickContext,
    ) -> Option<Step> {
        let step = match self {
            ActionData::Resize(ramp) => ramp.advance(&mut props.size),
            ActionData::Rotate(ramp) => ramp.advance(&mut props.angle),
            ActionData::Move(movement) => {
                let step = movement.advance(&mut props.position);
                if let Some(text) = props.text.as_mut() {
                    text.update_position(props.position);
                }
                step
            }
            ActionData::Wait(wait) => wait.advance(tick),
            ActionData::Reveal(reveal) => reveal.advance(&mut props.text, &mut props.text_loaded),
            ActionData::Fill(_)
            | ActionData::Unfill(_)
            | ActionData::SetDepth(_)
            | ActionData::Transform(_) => return None,
        };
        Some(step)
    }
}

/// 动作实例
///
/// 由实体的意图调用（`resize`、`move_to` 等）创建，加入当前动作组或正在构建的动作组，
/// 完成后在帧末被移除。
#[derive(Debug, Clone, PartialEq)]
pub struct ActionState {
    id: ActionId,
    data: ActionData,
    complete: bool,
    paused: bool,
    carryover: bool,
}

impl ActionState {
    fn with_data(id: ActionId, data: ActionData) -> Self {
        Self {
            id,
            data,
            complete: false,
            paused: false,
            carryover: false,
        }
    }

    /// 改变尺寸到 `goal`
    pub fn resize(id: impl Into<ActionId>, goal: f32, rate: f32) -> Result<Self, ActionError> {
        let id = id.into();
        non_negative("size", goal)?;
        let rate = checked_rate(&id, rate)?;
        Ok(Self::with_data(
            id,
            ActionData::Resize(RampState::absolute(goal, rate)),
        ))
    }

    /// 在当前角度基础上旋转 `delta` 度
    ///
    /// 相对量在动作第一次推进时才解析。
    pub fn rotate(id: impl Into<ActionId>, delta: f32, rate: f32) -> Result<Self, ActionError> {
        let id = id.into();
        let rate = checked_rate(&id, rate)?;
        Ok(Self::with_data(
            id,
            ActionData::Rotate(RampState::relative(delta, rate)),
        ))
    }

    /// 改变阴影深度到 `goal`
    pub fn set_depth(
        id: impl Into<ActionId>,
        goal: f32,
        rate: f32,
        acceleration: f32,
    ) -> Result<Self, ActionError> {
        let id = id.into();
        non_negative("depth", goal)?;
        let rate = checked_rate(&id, rate)?;
        Ok(Self::with_data(
            id,
            ActionData::SetDepth(RampState::absolute(goal, rate).with_acceleration(acceleration)),
        ))
    }

    /// 形状混合值过渡到 `blend`
    pub fn transform(id: impl Into<ActionId>, blend: f32, rate: f32) -> Result<Self, ActionError> {
        let id = id.into();
        let rate = checked_rate(&id, rate)?;
        Ok(Self::with_data(
            id,
            ActionData::Transform(RampState::absolute(blend, rate)),
        ))
    }

    /// 移动到绝对坐标
    pub fn move_to(
        id: impl Into<ActionId>,
        x: f32,
        y: f32,
        velocity: f32,
    ) -> Result<Self, ActionError> {
        let id = id.into();
        let velocity = checked_rate(&id, velocity)?;
        Ok(Self::with_data(
            id,
            ActionData::Move(MoveState::new(MoveTarget::Absolute { x, y }, velocity)),
        ))
    }

    /// 按相对距离移动
    pub fn move_by(
        id: impl Into<ActionId>,
        dx: f32,
        dy: f32,
        velocity: f32,
    ) -> Result<Self, ActionError> {
        let id = id.into();
        let velocity = checked_rate(&id, velocity)?;
        Ok(Self::with_data(
            id,
            ActionData::Move(MoveState::new(MoveTarget::Relative { dx, dy }, velocity)),
        ))
    }

    /// 等待（条件解除后再计时 `wait_time`）
    pub fn wait(id: impl Into<ActionId>, wait_time: Duration) -> Self {
        Self::with_data(id.into(), ActionData::Wait(WaitState::new(wait_time)))
    }

    /// 填充层增长到 `destination`
    ///
    /// 填充层以动作 ID 为键。
    pub fn fill(
        id: impl Into<ActionId>,
        destination: f32,
        rate: f32,
        acceleration: f32,
    ) -> Result<Self, ActionError> {
        let id = id.into();
        non_negative("fill level", destination)?;
        let rate = checked_rate(&id, rate)?;
        let state = FillState::new(id.clone(), destination, rate, acceleration);
        Ok(Self::with_data(id, ActionData::Fill(state)))
    }

    /// 清空实体的所有填充层
    pub fn unfill(
        id: impl Into<ActionId>,
        rate: f32,
        acceleration: f32,
    ) -> Result<Self, ActionError> {
        let id = id.into();
        let rate = checked_rate(&id, rate)?;
        Ok(Self::with_data(
            id,
            ActionData::Unfill(UnfillState::new(rate, acceleration)),
        ))
    }

    /// 以 `level` 透明度显示文字
    pub fn reveal(id: impl Into<ActionId>, level: f32, rate: f32) -> Result<Self, ActionError> {
        if !(0.0..=1.0).contains(&level) {
            return Err(ActionError::InvalidOpacity { value: level });
        }
        let id = id.into();
        let rate = checked_rate(&id, rate)?;
        Ok(Self::with_data(
            id,
            ActionData::Reveal(RevealState::new(level, rate)),
        ))
    }

    /// 设置 carryover 标记
    pub fn with_carryover(mut self, carryover: bool) -> Self {
        self.carryover = carryover;
        self
    }

    pub fn id(&self) -> &ActionId {
        &self.id
    }

    pub fn kind(&self) -> ActionKind {
        self.data.kind()
    }

    pub fn data(&self) -> &ActionData {
        &self.data
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn carryover(&self) -> bool {
        self.carryover
    }

    /// 暂停（重复调用无副作用）
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// 恢复（未暂停时无副作用）
    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// 用 `handler` 推进一帧
    ///
    /// `handler` 由实体类型按动作表选出。已完成的动作不再推进。
    pub(crate) fn advance_with(&mut self, handler: impl FnOnce(&mut ActionData) -> Step) -> Step {
        if self.complete {
            return Step::Complete;
        }

        let step = handler(&mut self.data);
        if step.is_complete() {
            self.complete = true;
        }
        step
    }
}

/// 减速时速率的下限，避免浮点残差把速率压到接近 0 而停滞
pub(crate) const MIN_RATE: f32 = 1e-4;

/// 在不使速率归零或反向的前提下施加加速度
pub(crate) fn accelerate(rate: &mut f32, acceleration: f32) {
    if *rate + acceleration > MIN_RATE {
        *rate += acceleration;
    }
}

fn checked_rate(id: &ActionId, rate: f32) -> Result<f32, ActionError> {
    if !rate.is_finite() || rate == 0.0 {
        return Err(ActionError::InvalidRate {
            id: id.clone(),
            rate,
        });
    }
    Ok(rate.abs())
}

fn non_negative(property: &'static str, value: f32) -> Result<(), ActionError> {
    if value < 0.0 || value.is_nan() {
        return Err(ActionError::NegativeGoal { property, value });
    }
    Ok(())
}

//! 实体类型与能力表。
//!
//! 所有实体共享同一个核心（动作队列、等待条件、动作推进），
//! 类型之间的差异只体现在：支持哪些动作、深度与填充的参数，以及更新后的收尾处理。
//!
//! 动作推进先查实体类型自己的动作表，查不到再显式回退到基础表
//! （[`ActionData::advance_base`]）。

use serde::Serialize;
use tracing::{trace, warn};

use crate::action::{ActionData, ActionKind, ActionState, Step, TickContext};

use super::{EntityProperties, ShapeKind};

/// 所有实体都支持的基础动作
const BASE_ACTIONS: &[ActionKind] = &[
    ActionKind::Reveal,
    ActionKind::Resize,
    ActionKind::Move,
    ActionKind::Rotate,
    ActionKind::Wait,
];

const BIT_ACTIONS: &[ActionKind] = &[
    ActionKind::Fill,
    ActionKind::Unfill,
    ActionKind::SetDepth,
    ActionKind::Transform,
];

const SURFACE_ACTIONS: &[ActionKind] = &[ActionKind::SetDepth];

/// 实体类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// 只具备基础动作的实体（通常承载文字）
    Animata,
    /// 可填充、可变形的方块
    Bit,
    /// 凹陷的矩形区域
    Hollow,
    /// 凸起的矩形平台
    Platform,
}

/// 动作由哪张表处理
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handler {
    /// 实体类型自己的动作表
    Own,
    /// 基础动作表
    Base,
}

/// 实体类型参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KindProfile {
    /// 最大阴影深度（intro 的默认深度）
    pub max_depth: f32,
    /// set_depth 动作的加速度
    pub depth_acceleration: f32,
    /// fill / unfill 动作的加速度
    pub fill_acceleration: f32,
    /// transform 动作的速率缩放
    pub transform_rate_scale: f32,
}

impl EntityKind {
    pub fn name(self) -> &'static str {
        match self {
            EntityKind::Animata => "animata",
            EntityKind::Bit => "bit",
            EntityKind::Hollow => "hollow",
            EntityKind::Platform => "platform",
        }
    }

    pub fn profile(self) -> KindProfile {
        match self {
            EntityKind::Animata => KindProfile {
                max_depth: 0.0,
                depth_acceleration: 0.0,
                fill_acceleration: 0.0,
                transform_rate_scale: 1.0,
            },
            EntityKind::Bit => KindProfile {
                max_depth: 5.0,
                depth_acceleration: -0.02,
                fill_acceleration: 0.02,
                transform_rate_scale: 0.01,
            },
            EntityKind::Hollow | EntityKind::Platform => KindProfile {
                max_depth: 9.0,
                depth_acceleration: 0.02,
                fill_acceleration: 0.0,
                transform_rate_scale: 1.0,
            },
        }
    }

    fn own_actions(self) -> &'static [ActionKind] {
        match self {
            EntityKind::Animata => &[],
            EntityKind::Bit => BIT_ACTIONS,
            EntityKind::Hollow | EntityKind::Platform => SURFACE_ACTIONS,
        }
    }

    /// 查找处理 `action` 的动作表
    ///
    /// 先查实体类型自己的表，再回退到基础表；都没有时返回 `None`。
    pub fn handler(self, action: ActionKind) -> Option<Handler> {
        if self.own_actions().contains(&action) {
            Some(Handler::Own)
        } else if BASE_ACTIONS.contains(&action) {
            Some(Handler::Base)
        } else {
            None
        }
    }

    pub fn supports(self, action: ActionKind) -> bool {
        self.handler(action).is_some()
    }

    /// 按动作表推进一帧
    pub(crate) fn advance(
        self,
        action: &mut ActionState,
        props: &mut EntityProperties,
        tick: &TickContext,
    ) -> Step {
        let kind = action.kind();
        let Some(handler) = self.handler(kind) else {
            warn!(entity_kind = self.name(), action = %kind, "实体类型不支持该动作，直接结束");
            return action.advance_with(|_| Step::Complete);
        };

        action.advance_with(|data| {
            let step = match handler {
                Handler::Own => self.advance_own(data, props),
                Handler::Base => data.advance_base(props, tick),
            };
            step.unwrap_or_else(|| {
                warn!(entity_kind = self.name(), action = %kind, "动作表与处理函数不一致，直接结束");
                Step::Complete
            })
        })
    }

    /// 实体类型自己的动作表
    fn advance_own(self, data: &mut ActionData, props: &mut EntityProperties) -> Option<Step> {
        let step = match (self, data) {
            (EntityKind::Bit, ActionData::Fill(fill)) => fill.advance(&mut props.layers),
            (EntityKind::Bit, ActionData::Unfill(unfill)) => unfill.advance(&mut props.layers),
            (EntityKind::Bit, ActionData::Transform(ramp)) => {
                let step = ramp.advance(&mut props.shape_blend);
                if step.is_complete() {
                    props.shape = ShapeKind::from_blend(ramp.goal());
                }
                step
            }
            (
                EntityKind::Bit | EntityKind::Hollow | EntityKind::Platform,
                ActionData::SetDepth(ramp),
            ) => ramp.advance(&mut props.depth),
            _ => return None,
        };
        Some(step)
    }

    /// 每帧动作推进之后的收尾处理
    pub(crate) fn after_update(self, props: &mut EntityProperties) {
        if self == EntityKind::Bit {
            let removed = props.layers.prune_obscured(props.size);
            if removed > 0 {
                trace!(removed, "清理被遮盖的填充层");
            }
        }
    }
}

//! # Error 模块
//!
//! 定义 tetron-runtime 中使用的错误类型。
//!
//! 所有意图调用（resize、moveTo 等）都在修改任何动画状态之前完成校验，
//! 校验失败时返回错误，实体状态保持不变。

use thiserror::Error;

use crate::action::{ActionId, ActionKind};
use crate::entity::EntityKind;

/// 动作配置错误
///
/// 在创建 `ActionState` 时同步报告，不会产生任何动作。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ActionError {
    /// 未知的动作类型
    #[error("未知的动作类型 '{kind}'")]
    UnknownKind { kind: String },

    /// 未知的形状
    #[error("未知的形状 '{name}'")]
    UnknownShape { name: String },

    /// 目标值为负（尺寸、深度等不能小于 0）
    #[error("{property} 的目标值不能小于 0，实际为 {value}")]
    NegativeGoal { property: &'static str, value: f32 },

    /// 无效的速率（必须是有限的非零值）
    #[error("动作 '{id}'：速率必须是有限的非零值，实际为 {rate}")]
    InvalidRate { id: ActionId, rate: f32 },

    /// 无效的透明度
    #[error("透明度必须在 0.0 - 1.0 之间，实际为 {value}")]
    InvalidOpacity { value: f32 },

    /// 变形目标与当前形状相同
    #[error("实体已经是 {shape} 形状，无需变形")]
    SameShape { shape: String },

    /// 实体类型不支持该动作
    #[error("{entity_kind:?} 不支持 {kind:?} 动作")]
    UnsupportedAction {
        kind: ActionKind,
        entity_kind: EntityKind,
    },
}

/// 动作组错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GroupError {
    /// 同一组内动作 ID 重复
    #[error("动作组中已存在 ID 为 '{id}' 的动作")]
    DuplicateAction { id: ActionId },
}

/// 实体错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EntityError {
    /// 动作配置无效
    #[error(transparent)]
    Action(#[from] ActionError),

    /// 动作组约束被破坏
    #[error(transparent)]
    Group(#[from] GroupError),

    /// 没有正在构建的动作组时请求关闭
    #[error("实体 '{entity}' 没有正在构建的动作组")]
    BuildNotOpen { entity: String },

    /// 已有正在构建的动作组时再次开始构建
    #[error("实体 '{entity}' 已经有一个正在构建的动作组")]
    BuildAlreadyOpen { entity: String },
}

/// 调度器错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchedulerError {
    /// 帧率无效
    #[error("帧率必须大于 0，实际为 {fps}")]
    InvalidFrameRate { fps: u32 },
}

/// tetron-runtime 统一错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnimError {
    /// 实体错误
    #[error("实体错误: {0}")]
    Entity(#[from] EntityError),

    /// 调度器错误
    #[error("调度器错误: {0}")]
    Scheduler(#[from] SchedulerError),
}

/// Result 类型别名
pub type AnimResult<T> = Result<T, AnimError>;

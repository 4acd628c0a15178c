//! # Tetron Runtime
//!
//! 逐帧属性动画的调度引擎。
//!
//! ## 架构概述
//!
//! `tetron-runtime` 是纯逻辑核心，不做任何 IO，也不关心图形如何绘制。
//! 宿主层提供 [`Renderer`] 与 [`Clock`]，调度器负责其余的一切：
//!
//! ```text
//! Host                          Runtime
//!   │                              │
//!   │──── 意图（resize / move_to）─►│ AnimatedEntity
//!   │                              │
//!   │──── run_frame_loop / tick ──►│ Scheduler
//!   │◄─── Renderer::draw ──────────│
//!   │                              │
//! ```
//!
//! ## 核心类型
//!
//! - [`ActionState`]：一个属性过渡及其状态机
//! - [`ActionGroup`]：同时运行的一批动作
//! - [`ActionQueue`]：实体的动作组队列
//! - [`AnimatedEntity`]：持有队列、等待条件和属性的实体
//! - [`Scheduler`]：固定帧率驱动所有实体
//!
//! ## 使用示例
//!
//! ```ignore
//! use tetron_runtime::{AnimatedEntity, NullRenderer, Scheduler, ShapeKind};
//!
//! let mut bit = AnimatedEntity::bit("test_01", 360.0, 325.0, 30.0);
//! bit.intro(1.0, None)?;
//! bit.compose(|bit| bit.transform_shape("t_1", ShapeKind::Circle, 1.75, false))?;
//!
//! let mut scheduler = Scheduler::new();
//! scheduler.register(bit);
//! scheduler.run_frame_loop(&mut NullRenderer, 60)?;
//! ```
//!
//! ## 模块结构
//!
//! - [`action`]：动作类型与逐帧推进
//! - [`group`]：动作组
//! - [`queue`]：动作组队列与构建模式
//! - [`entity`]：实体、实体类型能力表、属性
//! - [`scheduler`]：调度器、时钟、帧节拍
//! - [`render`]：渲染器接口
//! - [`error`]：错误类型定义

pub mod action;
pub mod entity;
pub mod error;
pub mod group;
pub mod queue;
pub mod render;
pub mod scheduler;

// 重导出核心类型
pub use action::{ActionData, ActionId, ActionKind, ActionState, Step, TickContext};
pub use entity::{
    AnimatedEntity, EntityId, EntityKind, EntityProperties, EntityUpdate, FillLayer, FillLayers,
    ShapeKind, TextOverlay, Vec2, WaitCondition,
};
pub use error::{
    ActionError, AnimError, AnimResult, EntityError, GroupError, SchedulerError,
};
pub use group::ActionGroup;
pub use queue::ActionQueue;
pub use render::{NullRenderer, Renderer};
pub use scheduler::{
    Clock, FrameContext, FramePacer, FrameReport, ManualClock, Scheduler, StopHandle, SystemClock,
};

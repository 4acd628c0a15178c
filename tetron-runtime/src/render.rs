//! # Render 模块
//!
//! 渲染器接口。调度器每帧按注册顺序把实体交给渲染器，具体怎么画由实现决定。

use crate::entity::{AnimatedEntity, EntityId};
use crate::scheduler::FrameContext;

/// 渲染器
pub trait Renderer {
    /// 一帧开始
    fn begin_frame(&mut self, _frame: &FrameContext) {}

    /// 绘制实体（在实体本帧更新之前调用）
    fn draw(&mut self, id: &EntityId, entity: &AnimatedEntity);

    /// 一帧结束（等待条件已解除、已终止实体已移除）
    fn end_frame(&mut self, _frame: &FrameContext) {}
}

/// 什么也不画的渲染器
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn draw(&mut self, _id: &EntityId, _entity: &AnimatedEntity) {}
}

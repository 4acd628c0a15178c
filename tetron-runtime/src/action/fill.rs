//! 填充层的增长（fill）与清空（unfill）。
//!
//! 填充层由实体持有（见 [`FillLayers`]），动作只保存推进参数。

use tracing::debug;

use crate::entity::FillLayers;

use super::{ActionId, Step, accelerate};

/// 填充动作状态
#[derive(Debug, Clone, PartialEq)]
pub struct FillState {
    /// 填充层 ID（与动作 ID 相同）
    layer: ActionId,
    destination: f32,
    rate: f32,
    acceleration: f32,
    progress: f32,
    initialized: bool,
}

impl FillState {
    pub(crate) fn new(layer: ActionId, destination: f32, rate: f32, acceleration: f32) -> Self {
        Self {
            layer,
            destination,
            rate,
            acceleration,
            progress: 0.0,
            initialized: false,
        }
    }

    pub fn layer(&self) -> &ActionId {
        &self.layer
    }

    pub fn destination(&self) -> f32 {
        self.destination
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn rate(&self) -> f32 {
        self.rate
    }

    /// 推进一帧
    ///
    /// 第一次推进时在最上层开启填充层；填充层在中途被清理（被更新的图层完全遮盖）
    /// 时动作直接完成。
    pub fn advance(&mut self, layers: &mut FillLayers) -> Step {
        if !self.initialized {
            layers.open(self.layer.clone());
            self.initialized = true;
        }

        let Some(level) = layers.level_mut(self.layer.as_str()) else {
            debug!(layer = %self.layer, "填充层已被清理，结束填充");
            return Step::Complete;
        };

        self.progress = *level;
        if self.progress >= self.destination {
            *level = self.destination;
            self.progress = self.destination;
            return Step::Complete;
        }

        accelerate(&mut self.rate, self.acceleration);
        *level += self.rate;
        self.progress = *level;

        if self.progress >= self.destination {
            *level = self.destination;
            self.progress = self.destination;
            Step::Complete
        } else {
            Step::Running
        }
    }
}

/// 清空动作状态
///
/// 作用于实体的全部填充层，而不是单个值。
#[derive(Debug, Clone, PartialEq)]
pub struct UnfillState {
    rate: f32,
    acceleration: f32,
}

impl UnfillState {
    pub(crate) fn new(rate: f32, acceleration: f32) -> Self {
        Self { rate, acceleration }
    }

    pub fn rate(&self) -> f32 {
        self.rate
    }

    /// 推进一帧：每个仍高于 0 的图层按速率递减（不低于 0），
    /// 归零的图层被移除，全部移除后完成。
    pub fn advance(&mut self, layers: &mut FillLayers) -> Step {
        for layer in layers.iter_mut() {
            if layer.level > 0.0 {
                accelerate(&mut self.rate, self.acceleration);
                layer.level = (layer.level - self.rate).max(0.0);
            }
        }
        layers.prune_empty();

        if layers.is_empty() {
            Step::Complete
        } else {
            Step::Running
        }
    }
}

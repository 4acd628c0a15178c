//! # Entity 模块
//!
//! 可动画实体：持有动作队列、当前动作组、跨实体等待条件，以及被动作修改的属性。
//!
//! ## 每帧更新
//!
//! 1. 当前动作组不存在或已完成时，从队列取出下一个动作组
//! 2. 按加入顺序推进当前动作组中未暂停的动作，完成的动作先记下
//! 3. 本轮扫描结束后统一移除已完成的动作
//! 4. 若本轮扫描到的动作全部标记了 carryover，且队列中已有下一组，
//!    则把剩余动作并入下一组并丢弃当前组
//!
//! ## 构建模式
//!
//! `begin_build` 之后的意图调用进入构建中的动作组，`close_build` 时整组入队。

mod kind;
mod overlay;
mod properties;

use std::borrow::Borrow;
use std::fmt;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, warn};

use crate::action::{ActionData, ActionId, ActionKind, ActionState, TickContext};
use crate::error::{ActionError, EntityError};
use crate::group::ActionGroup;
use crate::queue::ActionQueue;
use crate::scheduler::FrameContext;

pub use kind::{EntityKind, Handler, KindProfile};
pub use overlay::TextOverlay;
pub use properties::{EntityProperties, FillLayer, FillLayers, ShapeKind, Vec2};

/// 实体 ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for EntityId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for EntityId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// 跨实体等待条件
///
/// 当 `target` 的当前动作组中出现 `action` 时解除。`delay` 只用于配对的
/// wait 动作，不参与条件判定。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitCondition {
    pub target: EntityId,
    pub action: ActionId,
    pub delay: Duration,
}

/// 单个实体一帧更新的结果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityUpdate {
    /// 本帧完成并被移除的动作
    pub completed: Vec<ActionId>,
    /// 本帧并入下一组的动作
    pub carried: Vec<ActionId>,
}

/// 可动画实体
#[derive(Debug, Clone)]
pub struct AnimatedEntity {
    id: EntityId,
    kind: EntityKind,
    props: EntityProperties,
    current: Option<ActionGroup>,
    queue: ActionQueue,
    wait_condition: Option<WaitCondition>,
    terminated: bool,
}

impl AnimatedEntity {
    pub fn new(id: impl Into<EntityId>, kind: EntityKind, props: EntityProperties) -> Self {
        Self {
            id: id.into(),
            kind,
            props,
            current: None,
            queue: ActionQueue::new(),
            wait_condition: None,
            terminated: false,
        }
    }

    /// 只支持基础动作的实体
    pub fn animata(id: impl Into<EntityId>, x: f32, y: f32, size: f32) -> Self {
        Self::new(id, EntityKind::Animata, EntityProperties::new(x, y, size))
    }

    /// 以 (x, y) 为中心的方块
    pub fn bit(id: impl Into<EntityId>, x: f32, y: f32, size: f32) -> Self {
        Self::new(id, EntityKind::Bit, EntityProperties::new(x, y, size))
    }

    /// 以 (x, y) 为左上角的凹陷区域
    pub fn hollow(id: impl Into<EntityId>, x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::rectangle(id, EntityKind::Hollow, x, y, width, height)
    }

    /// 以 (x, y) 为左上角的凸起平台
    pub fn platform(id: impl Into<EntityId>, x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::rectangle(id, EntityKind::Platform, x, y, width, height)
    }

    fn rectangle(
        id: impl Into<EntityId>,
        kind: EntityKind,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    ) -> Self {
        let mut props = EntityProperties::new(x, y, width.min(height));
        props.extent = Vec2::new(width, height);
        Self::new(id, kind, props)
    }

    // ========== 查询 ==========

    pub fn id(&self) -> &EntityId {
        &self.id
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn properties(&self) -> &EntityProperties {
        &self.props
    }

    pub fn properties_mut(&mut self) -> &mut EntityProperties {
        &mut self.props
    }

    /// 当前动作组
    pub fn current_group(&self) -> Option<&ActionGroup> {
        self.current.as_ref()
    }

    pub fn queue(&self) -> &ActionQueue {
        &self.queue
    }

    pub fn wait_condition(&self) -> Option<&WaitCondition> {
        self.wait_condition.as_ref()
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// 是否处于构建模式
    pub fn is_building(&self) -> bool {
        self.queue.is_building()
    }

    /// 当前动作组中是否有 ID 为 `action` 的动作
    pub fn has_current_action(&self, action: &str) -> bool {
        self.current
            .as_ref()
            .is_some_and(|group| group.contains(action))
    }

    /// 没有正在运行、排队或构建中的动作
    pub fn is_idle(&self) -> bool {
        self.current.as_ref().is_none_or(ActionGroup::is_complete)
            && self.queue.is_empty()
            && !self.queue.is_building()
    }

    /// 最近一次请求的形状
    ///
    /// 依次查看构建中的动作组、队列（从队尾开始）和当前动作组里尚未完成的
    /// transform 动作；都没有时由当前的形状混合值推出。
    pub fn requested_shape(&self) -> ShapeKind {
        let mut pending = self
            .queue
            .builder()
            .into_iter()
            .chain(self.queue.iter().rev())
            .chain(self.current.as_ref());

        pending
            .find_map(|group| {
                group
                    .iter()
                    .filter_map(|action| match action.data() {
                        ActionData::Transform(ramp) => Some(ramp.goal()),
                        _ => None,
                    })
                    .last()
            })
            .map_or_else(
                || ShapeKind::from_blend(self.props.shape_blend),
                ShapeKind::from_blend,
            )
    }

    // ========== 意图 ==========

    /// 改变尺寸
    pub fn resize(
        &mut self,
        action_id: impl Into<ActionId>,
        new_size: f32,
        rate: f32,
        carryover: bool,
    ) -> Result<(), EntityError> {
        let action = ActionState::resize(action_id, new_size, rate)?;
        self.assign(action.with_carryover(carryover))
    }

    /// 移动到绝对坐标
    pub fn move_to(
        &mut self,
        action_id: impl Into<ActionId>,
        x: f32,
        y: f32,
        velocity: f32,
        carryover: bool,
    ) -> Result<(), EntityError> {
        let action = ActionState::move_to(action_id, x, y, velocity)?;
        self.assign(action.with_carryover(carryover))
    }

    /// 按相对距离移动（相对于动作开始时的位置）
    pub fn move_by(
        &mut self,
        action_id: impl Into<ActionId>,
        dx: f32,
        dy: f32,
        velocity: f32,
        carryover: bool,
    ) -> Result<(), EntityError> {
        let action = ActionState::move_by(action_id, dx, dy, velocity)?;
        self.assign(action.with_carryover(carryover))
    }

    /// 旋转 `angle_delta` 度
    pub fn rotate(
        &mut self,
        action_id: impl Into<ActionId>,
        angle_delta: f32,
        rate: f32,
        carryover: bool,
    ) -> Result<(), EntityError> {
        let action = ActionState::rotate(action_id, angle_delta, rate)?;
        self.assign(action.with_carryover(carryover))
    }

    /// 等待 `target` 的当前动作组中出现 `action`，之后再等待 `delay`
    ///
    /// 配对的 wait 动作 ID 为 `"<实体 ID>_waiting"`。
    pub fn wait_on(
        &mut self,
        target: impl Into<EntityId>,
        action: impl Into<ActionId>,
        delay: Duration,
    ) -> Result<(), EntityError> {
        let wait = ActionState::wait(format!("{}_waiting", self.id), delay);
        self.assign(wait)?;
        self.wait_condition = Some(WaitCondition {
            target: target.into(),
            action: action.into(),
            delay,
        });
        Ok(())
    }

    /// 在最上层开启填充层并填充到 `value`
    pub fn set_accumulator_layer(
        &mut self,
        action_id: impl Into<ActionId>,
        value: f32,
        rate: f32,
        carryover: bool,
    ) -> Result<(), EntityError> {
        let acceleration = self.kind.profile().fill_acceleration;
        let action = ActionState::fill(action_id, value, rate, acceleration)?;
        self.assign(action.with_carryover(carryover))
    }

    /// 清空所有填充层
    pub fn clear_accumulator_layers(
        &mut self,
        action_id: impl Into<ActionId>,
        rate: f32,
        carryover: bool,
    ) -> Result<(), EntityError> {
        let acceleration = self.kind.profile().fill_acceleration;
        let action = ActionState::unfill(action_id, rate, acceleration)?;
        self.assign(action.with_carryover(carryover))
    }

    /// 改变阴影深度
    pub fn set_depth(
        &mut self,
        action_id: impl Into<ActionId>,
        new_depth: f32,
        rate: f32,
        carryover: bool,
    ) -> Result<(), EntityError> {
        let acceleration = self.kind.profile().depth_acceleration;
        let action = ActionState::set_depth(action_id, new_depth, rate, acceleration)?;
        self.assign(action.with_carryover(carryover))
    }

    /// 变形为 `shape`
    ///
    /// 目标形状与最近一次请求的形状相同时拒绝。
    pub fn transform_shape(
        &mut self,
        action_id: impl Into<ActionId>,
        shape: ShapeKind,
        rate: f32,
        carryover: bool,
    ) -> Result<(), EntityError> {
        self.ensure_supported(ActionKind::Transform)?;
        if shape == self.requested_shape() {
            return Err(ActionError::SameShape {
                shape: shape.to_string(),
            }
            .into());
        }

        let rate = rate * self.kind.profile().transform_rate_scale;
        let action = ActionState::transform(action_id, shape.blend(), rate)?;
        self.assign(action.with_carryover(carryover))
    }

    /// 以 `opacity` 透明度显示文字
    pub fn reveal_text(
        &mut self,
        action_id: impl Into<ActionId>,
        rate: f32,
        opacity: f32,
    ) -> Result<(), EntityError> {
        let action = ActionState::reveal(action_id, opacity, rate)?;
        self.assign(action)
    }

    /// 设置跟随实体的文字
    pub fn set_text(&mut self, text: impl Into<String>, font_size: f32) {
        self.props.text = Some(TextOverlay::new(text, font_size, self.props.position));
    }

    /// 移除文字
    pub fn remove_text(&mut self) -> Option<TextOverlay> {
        self.props.text.take()
    }

    // ========== 构建与生命周期 ==========

    /// 开始构建新的动作组
    pub fn begin_build(&mut self) -> Result<(), EntityError> {
        if !self.queue.begin_build() {
            return Err(EntityError::BuildAlreadyOpen {
                entity: self.id.to_string(),
            });
        }
        Ok(())
    }

    /// 结束构建，动作组入队
    pub fn close_build(&mut self) -> Result<(), EntityError> {
        if !self.queue.close_build() {
            return Err(EntityError::BuildNotOpen {
                entity: self.id.to_string(),
            });
        }
        Ok(())
    }

    /// 在一个新的动作组中执行 `build`
    ///
    /// `build` 成功时动作组入队；失败时放弃整个动作组。
    pub fn compose<F>(&mut self, build: F) -> Result<(), EntityError>
    where
        F: FnOnce(&mut Self) -> Result<(), EntityError>,
    {
        self.begin_build()?;
        match build(self) {
            Ok(()) => self.close_build(),
            Err(err) => {
                self.queue.abandon_build();
                Err(err)
            }
        }
    }

    /// 丢弃当前动作组并清空队列
    ///
    /// 构建中的动作组不受影响。
    pub fn stop(&mut self) {
        self.current = None;
        self.queue.clear();
        debug!(entity = %self.id, "停止所有动作");
    }

    /// 暂停当前动作组中的一个动作，或不指定 ID 时暂停全部
    ///
    /// 返回是否有动作被命中；ID 不存在时什么也不做。
    pub fn pause(&mut self, action_id: Option<&str>) -> bool {
        self.toggle(action_id, ActionState::pause)
    }

    /// 恢复当前动作组中的一个动作，或不指定 ID 时恢复全部
    pub fn resume(&mut self, action_id: Option<&str>) -> bool {
        self.toggle(action_id, ActionState::resume)
    }

    fn toggle(&mut self, action_id: Option<&str>, apply: fn(&mut ActionState)) -> bool {
        let Some(group) = self.current.as_mut() else {
            debug!(entity = %self.id, "没有当前动作组");
            return false;
        };
        match action_id {
            Some(action_id) => match group.get_mut(action_id) {
                Some(action) => {
                    apply(action);
                    true
                }
                None => {
                    debug!(entity = %self.id, action = action_id, "动作不存在");
                    false
                }
            },
            None => {
                group.for_each_mut(apply);
                !group.is_empty()
            }
        }
    }

    /// 解除等待条件
    pub fn clear_wait(&mut self) {
        self.wait_condition = None;
    }

    /// 请求在本帧结束时移除
    pub fn terminate(&mut self) {
        self.terminated = true;
    }

    // ========== 入场 / 退场 ==========

    /// 入场动画
    ///
    /// `initial_depth` 为 `None` 时使用实体类型的最大深度。
    pub fn intro(&mut self, rate: f32, initial_depth: Option<f32>) -> Result<(), EntityError> {
        let depth = initial_depth.unwrap_or(self.kind.profile().max_depth);
        match self.kind {
            EntityKind::Animata => {
                if self.props.text.is_some() {
                    self.compose(|entity| entity.reveal_text("intro", rate, 1.0))?;
                }
                Ok(())
            }
            EntityKind::Bit => {
                let fill = self.props.size * 2.0;
                self.compose(|bit| bit.set_depth("intro_recess", depth, rate * 0.5, false))?;
                self.compose(|bit| bit.set_accumulator_layer("intro_fill", fill, rate * 0.5, false))
            }
            EntityKind::Hollow | EntityKind::Platform => {
                self.compose(|surface| surface.set_depth("intro", depth, rate * 0.05, false))
            }
        }
    }

    /// 退场动画
    pub fn outro(&mut self, rate: f32) -> Result<(), EntityError> {
        match self.kind {
            EntityKind::Bit => {
                self.compose(|bit| bit.set_depth("outro_unrecess", 0.0, rate, false))?;
                self.compose(|bit| bit.clear_accumulator_layers("outro_unfill", rate, false))
            }
            EntityKind::Animata | EntityKind::Hollow | EntityKind::Platform => Ok(()),
        }
    }

    // ========== 更新 ==========

    /// 推进一帧
    pub fn update(&mut self, frame: &FrameContext) -> EntityUpdate {
        let mut report = EntityUpdate::default();

        if self.current.as_ref().is_none_or(ActionGroup::is_complete) {
            self.current = self.queue.pop_front();
        }

        if let Some(group) = self.current.as_mut() {
            let tick = TickContext {
                now: frame.now,
                wait_blocked: self.wait_condition.is_some(),
            };
            let kind = self.kind;
            let props = &mut self.props;
            let mut all_carryover = true;

            group.for_each_mut(|action| {
                all_carryover &= action.carryover();
                if action.is_paused() {
                    return;
                }
                if kind.advance(action, props, &tick).is_complete() {
                    report.completed.push(action.id().clone());
                }
            });

            for action_id in &report.completed {
                group.remove(action_id.as_str());
                debug!(entity = %self.id, action = %action_id, "动作完成");
            }

            if all_carryover && !self.queue.is_empty() {
                report.carried = self.carry_over();
            }
        }

        self.kind.after_update(&mut self.props);
        report
    }

    /// 把当前动作组剩余的动作并入队首动作组，并丢弃当前组
    fn carry_over(&mut self) -> Vec<ActionId> {
        let Some(current) = self.current.take() else {
            return Vec::new();
        };
        let Some(next) = self.queue.front_mut() else {
            return Vec::new();
        };

        let mut carried = Vec::new();
        for action in current.into_actions() {
            let action_id = action.id().clone();
            match next.append(action) {
                Ok(()) => carried.push(action_id),
                Err(err) => warn!(entity = %self.id, error = %err, "carryover 动作与下一组冲突，已丢弃"),
            }
        }
        debug!(entity = %self.id, count = carried.len(), "动作组并入下一组");
        carried
    }

    fn ensure_supported(&self, kind: ActionKind) -> Result<(), ActionError> {
        if self.kind.supports(kind) {
            Ok(())
        } else {
            Err(ActionError::UnsupportedAction {
                kind,
                entity_kind: self.kind,
            })
        }
    }

    /// 把动作加入构建中的动作组，或（不在构建模式时）加入当前动作组
    fn assign(&mut self, action: ActionState) -> Result<(), EntityError> {
        self.ensure_supported(action.kind())?;
        let group = match self.queue.builder_mut() {
            Some(builder) => builder,
            None => self.current.get_or_insert_with(ActionGroup::new),
        };
        group.append(action)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GroupError;

    fn frame(now_ms: u64) -> FrameContext {
        FrameContext {
            frame: 0,
            now: Duration::from_millis(now_ms),
        }
    }

    fn run_until_idle(entity: &mut AnimatedEntity, max_frames: usize) -> usize {
        for n in 0..max_frames {
            if entity.is_idle() {
                return n;
            }
            entity.update(&frame(n as u64 * 16));
        }
        panic!("实体在 {max_frames} 帧内没有停下");
    }

    #[test]
    fn test_intent_goes_to_current_group() {
        let mut entity = AnimatedEntity::animata("a", 0.0, 0.0, 10.0);
        entity.resize("grow", 30.0, 5.0, false).unwrap();
        assert!(entity.has_current_action("grow"));
        assert!(entity.queue().is_empty());
    }

    #[test]
    fn test_build_mode_queues_group() {
        let mut entity = AnimatedEntity::animata("a", 0.0, 0.0, 10.0);
        entity.begin_build().unwrap();
        entity.resize("grow", 30.0, 5.0, false).unwrap();
        assert!(entity.current_group().is_none());
        entity.close_build().unwrap();

        assert_eq!(entity.queue().len(), 1);
        entity.update(&frame(0));
        assert!(entity.has_current_action("grow"));
        assert_eq!(entity.properties().size, 15.0);
    }

    #[test]
    fn test_build_misuse_is_reported() {
        let mut entity = AnimatedEntity::animata("a", 0.0, 0.0, 10.0);
        assert_eq!(
            entity.close_build(),
            Err(EntityError::BuildNotOpen {
                entity: "a".to_string()
            })
        );
        entity.begin_build().unwrap();
        assert!(matches!(
            entity.begin_build(),
            Err(EntityError::BuildAlreadyOpen { .. })
        ));
    }

    #[test]
    fn test_invalid_intent_leaves_state_untouched() {
        let mut entity = AnimatedEntity::bit("b", 0.0, 0.0, 10.0);
        entity.resize("grow", 30.0, 5.0, false).unwrap();
        let before = entity.current_group().cloned();

        assert!(entity.resize("bad", -1.0, 5.0, false).is_err());
        assert!(entity.set_depth("bad", -2.0, 1.0, false).is_err());
        assert_eq!(
            entity.resize("grow", 10.0, 1.0, false),
            Err(EntityError::Group(GroupError::DuplicateAction {
                id: ActionId::from("grow")
            }))
        );
        assert_eq!(entity.current_group().cloned(), before);
    }

    #[test]
    fn test_unsupported_action_rejected() {
        let mut entity = AnimatedEntity::hollow("h", 0.0, 0.0, 100.0, 50.0);
        let err = entity
            .set_accumulator_layer("fill", 10.0, 1.0, false)
            .unwrap_err();
        assert_eq!(
            err,
            EntityError::Action(ActionError::UnsupportedAction {
                kind: ActionKind::Fill,
                entity_kind: EntityKind::Hollow,
            })
        );
        assert!(entity.current_group().is_none());

        let mut animata = AnimatedEntity::animata("a", 0.0, 0.0, 10.0);
        assert!(matches!(
            animata.transform_shape("t", ShapeKind::Circle, 1.0, false),
            Err(EntityError::Action(ActionError::UnsupportedAction { .. }))
        ));
    }

    #[test]
    fn test_transform_to_same_shape_rejected() {
        let mut bit = AnimatedEntity::bit("b", 0.0, 0.0, 30.0);
        assert!(matches!(
            bit.transform_shape("t", ShapeKind::Square, 1.0, false),
            Err(EntityError::Action(ActionError::SameShape { .. }))
        ));

        bit.transform_shape("t", ShapeKind::Circle, 50.0, false).unwrap();
        assert_eq!(bit.requested_shape(), ShapeKind::Circle);
        assert_eq!(bit.properties().shape, ShapeKind::Square);
        assert!(matches!(
            bit.transform_shape("again", ShapeKind::Circle, 50.0, false),
            Err(EntityError::Action(ActionError::SameShape { .. }))
        ));
        run_until_idle(&mut bit, 10);
        assert_eq!(bit.properties().shape_blend, 1.0);
        assert_eq!(bit.properties().shape, ShapeKind::Circle);
        assert_eq!(bit.requested_shape(), ShapeKind::Circle);
    }

    #[test]
    fn test_requested_shape_follows_latest_pending_transform() {
        let mut bit = AnimatedEntity::bit("b", 0.0, 0.0, 30.0);
        bit.compose(|b| b.transform_shape("round", ShapeKind::Circle, 1.0, false))
            .unwrap();
        bit.compose(|b| b.transform_shape("square", ShapeKind::Square, 1.0, false))
            .unwrap();
        assert_eq!(bit.requested_shape(), ShapeKind::Square);

        bit.begin_build().unwrap();
        bit.transform_shape("round_again", ShapeKind::Circle, 1.0, false)
            .unwrap();
        assert_eq!(bit.requested_shape(), ShapeKind::Circle);
    }

    #[test]
    fn test_failed_compose_keeps_shape_request() {
        let mut bit = AnimatedEntity::bit("b", 0.0, 0.0, 30.0);
        let result = bit.compose(|b| {
            b.transform_shape("t", ShapeKind::Circle, 50.0, false)?;
            b.resize("bad", -1.0, 1.0, false)
        });
        assert!(result.is_err());
        assert!(bit.queue().is_empty());
        assert_eq!(bit.requested_shape(), ShapeKind::Square);
        assert_eq!(bit.properties().shape_blend, 0.0);

        bit.transform_shape("t", ShapeKind::Circle, 50.0, false)
            .unwrap();
        run_until_idle(&mut bit, 10);
        assert_eq!(bit.properties().shape, ShapeKind::Circle);
    }

    #[test]
    fn test_stop_before_first_tick_keeps_shape_request() {
        let mut bit = AnimatedEntity::bit("b", 0.0, 0.0, 30.0);
        bit.transform_shape("t", ShapeKind::Circle, 50.0, false)
            .unwrap();
        bit.stop();

        assert_eq!(bit.requested_shape(), ShapeKind::Square);
        assert!(bit.transform_shape("t", ShapeKind::Circle, 50.0, false).is_ok());
    }

    #[test]
    fn test_stop_mid_transform_uses_current_blend() {
        let mut bit = AnimatedEntity::bit("b", 0.0, 0.0, 30.0);
        // 速率缩放 0.01：每帧 0.3
        bit.transform_shape("t", ShapeKind::Circle, 30.0, false)
            .unwrap();
        bit.update(&frame(0));
        bit.update(&frame(16));
        bit.update(&frame(32));
        bit.stop();

        assert!(bit.properties().shape_blend > 0.5);
        assert_eq!(bit.properties().shape, ShapeKind::Square);
        assert_eq!(bit.requested_shape(), ShapeKind::Circle);
        assert!(bit.transform_shape("back", ShapeKind::Square, 30.0, false).is_ok());
    }

    #[test]
    fn test_open_build_is_not_idle() {
        let mut entity = AnimatedEntity::animata("a", 0.0, 0.0, 10.0);
        assert!(entity.is_idle());
        entity.begin_build().unwrap();
        assert!(!entity.is_idle());
        entity.close_build().unwrap();
        assert!(entity.is_idle());
    }

    #[test]
    fn test_pause_and_resume() {
        let mut entity = AnimatedEntity::animata("a", 0.0, 0.0, 10.0);
        entity.resize("grow", 30.0, 5.0, false).unwrap();

        assert!(entity.pause(Some("grow")));
        assert!(entity.pause(Some("grow")));
        entity.update(&frame(0));
        assert_eq!(entity.properties().size, 10.0);

        assert!(!entity.pause(Some("missing")));
        assert!(entity.resume(None));
        entity.update(&frame(16));
        assert_eq!(entity.properties().size, 15.0);
    }

    #[test]
    fn test_pause_without_group_is_noop() {
        let mut entity = AnimatedEntity::animata("a", 0.0, 0.0, 10.0);
        assert!(!entity.pause(None));
        assert!(!entity.resume(Some("grow")));
    }

    #[test]
    fn test_stop_discards_work_but_keeps_build() {
        let mut entity = AnimatedEntity::animata("a", 0.0, 0.0, 10.0);
        entity.resize("grow", 30.0, 5.0, false).unwrap();
        entity
            .compose(|e| e.rotate("spin", 90.0, 10.0, false))
            .unwrap();
        entity.begin_build().unwrap();

        entity.stop();
        assert!(entity.current_group().is_none());
        assert!(entity.queue().is_empty());
        assert!(entity.is_building());
    }

    #[test]
    fn test_compose_abandons_on_error() {
        let mut entity = AnimatedEntity::animata("a", 0.0, 0.0, 10.0);
        let result = entity.compose(|e| {
            e.resize("grow", 20.0, 1.0, false)?;
            e.resize("shrink", -5.0, 1.0, false)
        });
        assert!(result.is_err());
        assert!(!entity.is_building());
        assert!(entity.queue().is_empty());
    }

    #[test]
    fn test_wait_on_assigns_paired_action() {
        let mut entity = AnimatedEntity::animata("follower", 0.0, 0.0, 10.0);
        entity
            .wait_on("leader", "build", Duration::from_millis(200))
            .unwrap();

        assert!(entity.has_current_action("follower_waiting"));
        let condition = entity.wait_condition().unwrap();
        assert_eq!(condition.target.as_str(), "leader");
        assert_eq!(condition.action.as_str(), "build");

        // 条件未解除时，等待动作不会完成
        for n in 0..20 {
            entity.update(&frame(n * 100));
        }
        assert!(entity.has_current_action("follower_waiting"));

        entity.clear_wait();
        entity.update(&frame(5_000));
        entity.update(&frame(5_199));
        assert!(entity.has_current_action("follower_waiting"));
        entity.update(&frame(5_200));
        assert!(!entity.has_current_action("follower_waiting"));
    }

    #[test]
    fn test_move_keeps_text_in_sync() {
        let mut entity = AnimatedEntity::animata("a", 0.0, 0.0, 10.0);
        entity.set_text("!", 15.0);
        entity.move_by("slide", 10.0, 0.0, 5.0, false).unwrap();
        run_until_idle(&mut entity, 10);

        let text = entity.properties().text.as_ref().unwrap();
        assert_eq!(text.anchor(), Vec2::new(10.0, 0.0));
    }

    #[test]
    fn test_bit_intro_runs_in_two_phases() {
        let mut bit = AnimatedEntity::bit("b", 0.0, 0.0, 30.0);
        bit.intro(1.0, None).unwrap();
        assert_eq!(bit.queue().len(), 2);

        bit.update(&frame(0));
        assert!(bit.has_current_action("intro_recess"));
        assert!(bit.properties().layers.is_empty());

        run_until_idle(&mut bit, 1_000);
        let props = bit.properties();
        assert_eq!(props.depth, 5.0);
        assert_eq!(props.layers.level("intro_fill"), Some(60.0));
    }

    #[test]
    fn test_bit_outro_clears_layers() {
        let mut bit = AnimatedEntity::bit("b", 0.0, 0.0, 30.0);
        bit.intro(1.0, None).unwrap();
        run_until_idle(&mut bit, 1_000);

        bit.outro(1.0).unwrap();
        run_until_idle(&mut bit, 1_000);
        assert_eq!(bit.properties().depth, 0.0);
        assert!(bit.properties().layers.is_empty());
    }

    #[test]
    fn test_surface_intro_depth() {
        let mut platform = AnimatedEntity::platform("p", 0.0, 0.0, 200.0, 20.0);
        platform.intro(10.0, Some(4.0)).unwrap();
        run_until_idle(&mut platform, 1_000);
        assert_eq!(platform.properties().depth, 4.0);
        assert_eq!(platform.properties().extent, Vec2::new(200.0, 20.0));
    }

    #[test]
    fn test_animata_intro_reveals_text() {
        let mut entity = AnimatedEntity::animata("a", 0.0, 0.0, 10.0);
        entity.intro(1.0, None).unwrap();
        assert!(entity.queue().is_empty());

        entity.set_text("tetron", 20.0);
        entity.intro(1.0, None).unwrap();
        run_until_idle(&mut entity, 5);
        assert!(entity.properties().text_loaded);
        assert!(entity.properties().text.as_ref().unwrap().is_visible());
    }
}

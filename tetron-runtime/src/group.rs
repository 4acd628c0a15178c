//! # Group 模块
//!
//! 动作组：同一执行槽位中并发运行的一批动作。
//!
//! 按 ID 存取，按加入顺序迭代（保证逐帧更新顺序确定）。

use std::collections::HashMap;

use crate::action::{ActionId, ActionState};
use crate::error::GroupError;

/// 动作组
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionGroup {
    /// 动作 ID -> 动作
    actions: HashMap<ActionId, ActionState>,
    /// 加入顺序
    order: Vec<ActionId>,
}

impl ActionGroup {
    /// 创建空动作组
    pub fn new() -> Self {
        Self::default()
    }

    /// 加入动作
    ///
    /// ID 在组内必须唯一，重复时返回错误且不修改动作组。
    pub fn append(&mut self, action: ActionState) -> Result<(), GroupError> {
        if self.actions.contains_key(action.id()) {
            return Err(GroupError::DuplicateAction {
                id: action.id().clone(),
            });
        }
        self.order.push(action.id().clone());
        self.actions.insert(action.id().clone(), action);
        Ok(())
    }

    /// 移除动作
    ///
    /// ID 不存在时什么也不做，返回 `None`。
    pub fn remove(&mut self, id: &str) -> Option<ActionState> {
        let action = self.actions.remove(id)?;
        self.order.retain(|existing| existing.as_str() != id);
        Some(action)
    }

    /// 动作组是否已完成（没有剩余动作）
    pub fn is_complete(&self) -> bool {
        self.order.is_empty()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.actions.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&ActionState> {
        self.actions.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut ActionState> {
        self.actions.get_mut(id)
    }

    /// 按加入顺序的动作 ID
    pub fn ids(&self) -> impl Iterator<Item = &ActionId> {
        self.order.iter()
    }

    /// 按加入顺序迭代动作
    pub fn iter(&self) -> impl Iterator<Item = &ActionState> {
        self.order.iter().filter_map(|id| self.actions.get(id))
    }

    /// 对每个动作执行操作（按加入顺序）
    pub fn for_each_mut(&mut self, mut f: impl FnMut(&mut ActionState)) {
        for id in &self.order {
            if let Some(action) = self.actions.get_mut(id) {
                f(action);
            }
        }
    }

    /// 拆出全部动作（按加入顺序）
    pub fn into_actions(self) -> Vec<ActionState> {
        let mut actions = self.actions;
        self.order
            .into_iter()
            .filter_map(|id| actions.remove(&id))
            .collect()
    }
}

//! # Queue 模块
//!
//! 实体的动作组队列（FIFO），以及构建中（hold 状态）的动作组。

use std::collections::VecDeque;

use crate::group::ActionGroup;

/// 动作组队列
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionQueue {
    groups: VecDeque<ActionGroup>,
    /// 正在构建、尚未入队的动作组
    builder: Option<ActionGroup>,
}

impl ActionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// 队尾加入动作组
    pub fn push(&mut self, group: ActionGroup) {
        self.groups.push_back(group);
    }

    /// 取出队首动作组
    pub fn pop_front(&mut self) -> Option<ActionGroup> {
        self.groups.pop_front()
    }

    /// 队首动作组（carryover 的合并目标）
    pub fn front_mut(&mut self) -> Option<&mut ActionGroup> {
        self.groups.front_mut()
    }

    pub fn front(&self) -> Option<&ActionGroup> {
        self.groups.front()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &ActionGroup> {
        self.groups.iter()
    }

    /// 清空队列（不影响构建中的动作组）
    pub fn clear(&mut self) {
        self.groups.clear();
    }

    /// 是否处于 hold 状态
    pub fn is_building(&self) -> bool {
        self.builder.is_some()
    }

    /// 开始构建新的动作组
    ///
    /// 已在构建时返回 `false` 且不覆盖现有构建。
    pub fn begin_build(&mut self) -> bool {
        if self.builder.is_some() {
            return false;
        }
        self.builder = Some(ActionGroup::new());
        true
    }

    pub fn builder_mut(&mut self) -> Option<&mut ActionGroup> {
        self.builder.as_mut()
    }

    pub fn builder(&self) -> Option<&ActionGroup> {
        self.builder.as_ref()
    }

    /// 把构建中的动作组入队
    ///
    /// 没有构建中的动作组时返回 `false`。
    pub fn close_build(&mut self) -> bool {
        match self.builder.take() {
            Some(group) => {
                self.groups.push_back(group);
                true
            }
            None => false,
        }
    }

    /// 放弃构建中的动作组
    pub fn abandon_build(&mut self) -> Option<ActionGroup> {
        self.builder.take()
    }
}

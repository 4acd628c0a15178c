//! 一次性显示文字。

use tracing::warn;

use crate::entity::TextOverlay;

use super::Step;

/// 显示文字动作状态
#[derive(Debug, Clone, PartialEq)]
pub struct RevealState {
    /// 最终透明度
    level: f32,
    /// 淡入速率
    rate: f32,
}

impl RevealState {
    pub(crate) fn new(level: f32, rate: f32) -> Self {
        Self { level, rate }
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn rate(&self) -> f32 {
        self.rate
    }

    /// 第一次调用时显示文字，无条件完成
    ///
    /// `loaded` 锁存后不会再次显示。
    pub fn advance(&mut self, text: &mut Option<TextOverlay>, loaded: &mut bool) -> Step {
        if !*loaded {
            match text.as_mut() {
                Some(overlay) => {
                    overlay.display(self.rate, self.level);
                    *loaded = true;
                }
                None => warn!("没有可显示的文字，跳过 display_text"),
            }
        }
        Step::Complete
    }
}

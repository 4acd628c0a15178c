//! 跟随实体的文字覆盖层。
//!
//! 只记录显示所需的状态（文字、位置、透明度），具体如何绘制由渲染器决定。

use serde::Serialize;

use super::Vec2;

/// 文字相对锚点的默认偏移，使文字大致居中
const DEFAULT_OFFSET: Vec2 = Vec2::new(40.0, 40.0);

/// 文字覆盖层
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextOverlay {
    text: String,
    font_size: f32,
    /// 锚点（跟随实体位置）
    anchor: Vec2,
    offset: Vec2,
    opacity: f32,
    /// 淡入速率
    fade_rate: f32,
    visible: bool,
}

impl TextOverlay {
    pub fn new(text: impl Into<String>, font_size: f32, anchor: Vec2) -> Self {
        Self {
            text: text.into(),
            font_size,
            anchor,
            offset: DEFAULT_OFFSET,
            opacity: 0.0,
            fade_rate: 0.0,
            visible: false,
        }
    }

    /// 显示文字
    pub fn display(&mut self, rate: f32, level: f32) {
        self.fade_rate = rate;
        self.opacity = level;
        self.visible = true;
    }

    /// 同步锚点位置
    pub fn update_position(&mut self, anchor: Vec2) {
        self.anchor = anchor;
    }

    /// 实际绘制位置（锚点减去偏移）
    pub fn screen_position(&self) -> Vec2 {
        Vec2::new(self.anchor.x - self.offset.x, self.anchor.y - self.offset.y)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    pub fn anchor(&self) -> Vec2 {
        self.anchor
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn fade_rate(&self) -> f32 {
        self.fade_rate
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

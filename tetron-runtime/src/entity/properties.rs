//! # Properties 模块
//!
//! 实体上可被动作修改的属性：位置、尺寸、角度、深度、形状混合、填充层与文字。

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::action::ActionId;
use crate::error::ActionError;

use super::TextOverlay;

/// 二维向量
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    /// 创建新的向量
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// 零向量
    pub const fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// 到另一点的距离
    pub fn distance(self, other: Self) -> f32 {
        ((other.x - self.x).powi(2) + (other.y - self.y).powi(2)).sqrt()
    }
}

impl From<(f32, f32)> for Vec2 {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

/// 形状
///
/// 方形与圆形之间通过 `shape_blend`（0.0 = 方形，1.0 = 圆形）连续过渡。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    #[default]
    Square,
    Circle,
}

impl ShapeKind {
    /// 对应的形状混合值
    pub fn blend(self) -> f32 {
        match self {
            ShapeKind::Square => 0.0,
            ShapeKind::Circle => 1.0,
        }
    }

    /// 混合值更接近的形状
    pub fn from_blend(blend: f32) -> Self {
        if blend >= 0.5 {
            ShapeKind::Circle
        } else {
            ShapeKind::Square
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ShapeKind::Square => "square",
            ShapeKind::Circle => "circle",
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ShapeKind {
    type Err = ActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "square" => Ok(ShapeKind::Square),
            "circle" => Ok(ShapeKind::Circle),
            other => Err(ActionError::UnknownShape {
                name: other.to_string(),
            }),
        }
    }
}

/// 单个填充层
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FillLayer {
    /// 创建该层的 fill 动作 ID
    pub id: ActionId,
    /// 当前填充半径
    pub level: f32,
}

/// 填充层集合
///
/// 最新的图层在最前面（绘制时最后绘制、位于最上层）。
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FillLayers(Vec<FillLayer>);

impl FillLayers {
    /// 在最上层开启图层并返回其填充值
    ///
    /// 同 ID 图层已存在时沿用现有图层。
    pub fn open(&mut self, id: ActionId) -> &mut f32 {
        let index = match self.0.iter().position(|layer| layer.id == id) {
            Some(index) => index,
            None => {
                self.0.insert(0, FillLayer { id, level: 0.0 });
                0
            }
        };
        &mut self.0[index].level
    }

    pub fn level(&self, id: &str) -> Option<f32> {
        self.0
            .iter()
            .find(|layer| layer.id.as_str() == id)
            .map(|layer| layer.level)
    }

    pub fn level_mut(&mut self, id: &str) -> Option<&mut f32> {
        self.0
            .iter_mut()
            .find(|layer| layer.id.as_str() == id)
            .map(|layer| &mut layer.level)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FillLayer> {
        self.0.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut FillLayer> {
        self.0.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 移除填充值已归零的图层
    pub fn prune_empty(&mut self) {
        self.0.retain(|layer| layer.level > 0.0);
    }

    /// 移除被更新图层完全遮盖的旧图层
    ///
    /// 找到最新的一个填充值达到 `coverage` 的图层，它之下的图层全部移除。
    /// 返回移除的图层数量。
    pub fn prune_obscured(&mut self, coverage: f32) -> usize {
        let Some(top) = self.0.iter().position(|layer| layer.level >= coverage) else {
            return 0;
        };
        let removed = self.0.len() - (top + 1);
        self.0.truncate(top + 1);
        removed
    }
}

/// 实体属性
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityProperties {
    /// 位置（Bit 为中心点，Hollow/Platform 为左上角）
    pub position: Vec2,
    pub size: f32,
    /// 矩形尺寸（Hollow/Platform 使用）
    pub extent: Vec2,
    /// 旋转角度（度）
    pub angle: f32,
    /// 阴影深度
    pub depth: f32,
    /// 形状混合值（0.0 = 方形，1.0 = 圆形）
    pub shape_blend: f32,
    /// 最近一次完成变形后的形状
    pub shape: ShapeKind,
    pub layers: FillLayers,
    pub text: Option<TextOverlay>,
    /// 文字是否已经显示过
    pub text_loaded: bool,
}

impl EntityProperties {
    pub fn new(x: f32, y: f32, size: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            size,
            extent: Vec2::new(size, size),
            angle: 0.0,
            depth: 0.0,
            shape_blend: 0.0,
            shape: ShapeKind::default(),
            layers: FillLayers::default(),
            text: None,
            text_loaded: false,
        }
    }
}

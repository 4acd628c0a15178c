//! # Scenes 模块
//!
//! 内置演示场景。每个场景返回按注册顺序排列的实体，动作已经排好。
//!
//! - `tetron`：四个方块组成的 L 形，入场后依次变形为圆形
//! - `cascade`：一排方块通过跨实体等待依次入场，最后显示标题

use std::time::Duration;

use thiserror::Error;
use tracing::debug;

use tetron_runtime::{AnimatedEntity, EntityError, ShapeKind};

use crate::config::CanvasConfig;

/// 可用场景
pub const SCENES: &[&str] = &["tetron", "cascade"];

/// 方块尺寸与间距
const BIT_SIZE: f32 = 30.0;
const BIT_SPACING: f32 = 35.0;

/// 场景错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    #[error("未知的场景: {name}")]
    Unknown { name: String },

    #[error("场景 '{scene}' 搭建失败: {source}")]
    Build { scene: String, source: EntityError },
}

/// 按名称搭建场景
pub fn build(name: &str, canvas: &CanvasConfig) -> Result<Vec<AnimatedEntity>, SceneError> {
    let result = match name {
        "tetron" => tetron(canvas),
        "cascade" => cascade(canvas),
        other => {
            return Err(SceneError::Unknown {
                name: other.to_string(),
            });
        }
    };
    let entities = result.map_err(|source| SceneError::Build {
        scene: name.to_string(),
        source,
    })?;
    debug!(scene = name, entities = entities.len(), "场景搭建完成");
    Ok(entities)
}

/// L 形方块入场后变形为圆形，变形速率各不相同
fn tetron(canvas: &CanvasConfig) -> Result<Vec<AnimatedEntity>, EntityError> {
    let (cx, cy) = canvas.center();

    let mut board = AnimatedEntity::hollow("board", cx - 70.0, cy - 70.0, 140.0, 140.0);
    board.intro(1.0, None)?;

    let layout = [
        ("test_01", cx, cy - BIT_SPACING, "t_1", 1.75),
        ("test_02", cx, cy, "t_2", 2.5),
        ("test_03", cx, cy + BIT_SPACING, "t_1", 3.5),
        ("test_04", cx - BIT_SPACING, cy + BIT_SPACING, "t_1", 4.0),
    ];

    let mut entities = vec![board];
    for (id, x, y, action, rate) in layout {
        let mut bit = AnimatedEntity::bit(id, x, y, BIT_SIZE);
        bit.intro(1.0, None)?;
        bit.compose(|bit| bit.transform_shape(action, ShapeKind::Circle, rate, false))?;
        entities.push(bit);
    }
    Ok(entities)
}

/// 每个方块等待前一个方块开始 "pulse" 后再入场
fn cascade(canvas: &CanvasConfig) -> Result<Vec<AnimatedEntity>, EntityError> {
    const COUNT: usize = 4;
    let (cx, cy) = canvas.center();
    let start_x = cx - BIT_SPACING * (COUNT as f32 - 1.0) / 2.0;

    let mut floor = AnimatedEntity::platform("floor", start_x - 40.0, cy + 40.0, 200.0, 12.0);
    floor.intro(1.0, None)?;

    let mut entities = vec![floor];
    let mut previous: Option<String> = None;
    for n in 0..COUNT {
        let id = format!("bit_{n}");
        let x = start_x + BIT_SPACING * n as f32;
        let mut bit = AnimatedEntity::bit(id.as_str(), x, cy, BIT_SIZE);
        if let Some(previous) = &previous {
            bit.wait_on(previous.as_str(), "pulse", Duration::from_millis(150))?;
        }
        bit.intro(2.0, None)?;
        bit.compose(|bit| {
            bit.rotate("pulse", 90.0, 3.0, false)?;
            bit.move_by("drop", 0.0, 20.0, 1.0, true)
        })?;
        entities.push(bit);
        previous = Some(id);
    }

    let mut title = AnimatedEntity::animata("title", cx, cy - 80.0, 0.0);
    title.set_text("tetron", 24.0);
    if let Some(last) = &previous {
        title.wait_on(last.as_str(), "pulse", Duration::from_millis(300))?;
    }
    title.intro(1.0, None)?;
    entities.push(title);

    Ok(entities)
}

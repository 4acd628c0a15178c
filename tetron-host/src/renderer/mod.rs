//! # Renderer 模块
//!
//! 无头渲染器：不真正绘制，只把每帧的实体状态记录下来并写入日志。
//!
//! 帧数达到上限、或所有实体都空闲时，通过 [`StopHandle`] 结束帧循环。

use std::fmt::Write as _;

use serde::Serialize;
use tracing::{info, trace};

use tetron_runtime::{
    AnimatedEntity, EntityId, EntityKind, FrameContext, Renderer, StopHandle, Vec2,
};

use crate::config::CanvasConfig;

/// 单个实体的绘制记录
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawRecord {
    pub entity: EntityId,
    pub kind: EntityKind,
    pub position: Vec2,
    pub size: f32,
    pub angle: f32,
    pub depth: f32,
    pub shape_blend: f32,
    pub layers: usize,
    /// 文字可见时的透明度
    pub text_opacity: Option<f32>,
    /// 是否超出画布
    pub clipped: bool,
}

impl DrawRecord {
    fn capture(id: &EntityId, entity: &AnimatedEntity, canvas: &CanvasConfig) -> Self {
        let props = entity.properties();
        let position = props.position;
        let clipped = position.x < 0.0
            || position.y < 0.0
            || position.x > canvas.width as f32
            || position.y > canvas.height as f32;

        Self {
            entity: id.clone(),
            kind: entity.kind(),
            position,
            size: props.size,
            angle: props.angle,
            depth: props.depth,
            shape_blend: props.shape_blend,
            layers: props.layers.len(),
            text_opacity: props
                .text
                .as_ref()
                .filter(|text| text.is_visible())
                .map(|text| text.opacity()),
            clipped,
        }
    }
}

/// 记录型渲染器
#[derive(Debug)]
pub struct RecordingRenderer {
    canvas: CanvasConfig,
    stop: StopHandle,
    max_frames: Option<u64>,
    stop_when_idle: bool,
    /// 最近一帧的绘制记录
    current: Vec<DrawRecord>,
    /// 本帧绘制的实体是否都空闲
    frame_idle: bool,
    frames: u64,
    draws: u64,
}

impl RecordingRenderer {
    pub fn new(canvas: CanvasConfig, stop: StopHandle) -> Self {
        Self {
            canvas,
            stop,
            max_frames: None,
            stop_when_idle: false,
            current: Vec::new(),
            frame_idle: true,
            frames: 0,
            draws: 0,
        }
    }

    /// 运行 `max_frames` 帧后停止
    pub fn with_max_frames(mut self, max_frames: Option<u64>) -> Self {
        self.max_frames = max_frames;
        self
    }

    /// 所有实体都空闲时停止
    pub fn with_stop_when_idle(mut self, stop_when_idle: bool) -> Self {
        self.stop_when_idle = stop_when_idle;
        self
    }

    /// 已完成的帧数
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// 累计绘制次数
    pub fn draws(&self) -> u64 {
        self.draws
    }

    /// 最近一帧的绘制记录
    pub fn records(&self) -> &[DrawRecord] {
        &self.current
    }

    /// 最近一帧的文本摘要，每个实体一行
    pub fn summary(&self) -> String {
        self.current
            .iter()
            .map(|record| {
                let mut line = format!(
                    "{} {} pos=({},{}) size={} angle={} depth={} blend={} layers={}",
                    record.entity,
                    record.kind.name(),
                    record.position.x,
                    record.position.y,
                    record.size,
                    record.angle,
                    record.depth,
                    record.shape_blend,
                    record.layers,
                );
                if let Some(opacity) = record.text_opacity {
                    let _ = write!(line, " text={opacity}");
                }
                line
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Renderer for RecordingRenderer {
    fn begin_frame(&mut self, _frame: &FrameContext) {
        self.current.clear();
        self.frame_idle = true;
    }

    fn draw(&mut self, id: &EntityId, entity: &AnimatedEntity) {
        let record = DrawRecord::capture(id, entity, &self.canvas);
        trace!(
            entity = %record.entity,
            x = record.position.x,
            y = record.position.y,
            size = record.size,
            depth = record.depth,
            blend = record.shape_blend,
            layers = record.layers,
            clipped = record.clipped,
            "draw"
        );
        self.frame_idle &= entity.is_idle();
        self.current.push(record);
        self.draws += 1;
    }

    fn end_frame(&mut self, frame: &FrameContext) {
        self.frames += 1;

        if let Some(max) = self.max_frames
            && self.frames >= max
        {
            info!(frame = frame.frame, "达到最大帧数，停止");
            self.stop.request_stop();
        } else if self.stop_when_idle && self.frame_idle {
            info!(frame = frame.frame, "所有实体已空闲，停止");
            self.stop.request_stop();
        }
    }
}

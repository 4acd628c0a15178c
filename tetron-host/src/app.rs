//! # App 模块
//!
//! 把配置、场景、调度器和渲染器组装起来运行一次。

use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::Serialize;
use tracing::info;

use tetron_runtime::{
    AnimatedEntity, Clock, EntityId, EntityKind, EntityProperties, Scheduler, SystemClock,
};

use crate::config::AppConfig;
use crate::renderer::RecordingRenderer;
use crate::scenes;

/// 运行结束时的实体快照
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntitySnapshot {
    pub id: EntityId,
    pub kind: EntityKind,
    pub idle: bool,
    pub properties: EntityProperties,
}

impl EntitySnapshot {
    fn capture(entity: &AnimatedEntity) -> Self {
        Self {
            id: entity.id().clone(),
            kind: entity.kind(),
            idle: entity.is_idle(),
            properties: entity.properties().clone(),
        }
    }
}

/// 一次运行的结果
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub frames: u64,
    pub draws: u64,
    /// 最后一帧的绘制摘要
    pub summary: String,
    pub snapshot: Vec<EntitySnapshot>,
}

/// 使用系统时钟运行
pub fn run(config: &AppConfig) -> anyhow::Result<RunOutcome> {
    run_with_clock(config, SystemClock::new())
}

/// 使用指定时钟运行
pub fn run_with_clock(
    config: &AppConfig,
    clock: impl Clock + 'static,
) -> anyhow::Result<RunOutcome> {
    config.validate()?;

    let mut scheduler = Scheduler::with_clock(clock);
    for entity in scenes::build(&config.scene, &config.canvas)? {
        scheduler.register(entity);
    }

    let mut renderer = RecordingRenderer::new(config.canvas, scheduler.stop_handle())
        .with_max_frames(config.max_frames)
        .with_stop_when_idle(config.stop_when_idle);

    info!(
        scene = %config.scene,
        fps = config.frame_rate,
        entities = scheduler.len(),
        "开始运行"
    );
    scheduler.run_frame_loop(&mut renderer, config.frame_rate)?;

    let snapshot: Vec<EntitySnapshot> = scheduler
        .entities()
        .map(EntitySnapshot::capture)
        .collect();
    if let Some(path) = &config.dump_path {
        write_snapshot(path, &snapshot)?;
    }

    Ok(RunOutcome {
        frames: renderer.frames(),
        draws: renderer.draws(),
        summary: renderer.summary(),
        snapshot,
    })
}

fn write_snapshot(path: &Path, snapshot: &[EntitySnapshot]) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(snapshot).context("实体快照序列化失败")?;
    fs::write(path, json).with_context(|| format!("写入实体快照失败: {}", path.display()))?;
    info!(path = %path.display(), "实体快照已写入");
    Ok(())
}

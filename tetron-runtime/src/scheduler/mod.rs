//! # Scheduler 模块
//!
//! 帧调度器：按注册顺序管理所有实体，以固定帧率驱动绘制与更新，
//! 并在每帧末尾解除已满足的跨实体等待条件。
//!
//! ```rust,ignore
//! let mut scheduler = Scheduler::new();
//! scheduler.register(AnimatedEntity::bit("test_01", 360.0, 325.0, 30.0));
//! scheduler.run_frame_loop(&mut renderer, 60)?;
//! ```

mod clock;
mod pacer;

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tracing::{debug, info};

use crate::entity::{AnimatedEntity, EntityId};
use crate::error::SchedulerError;
use crate::render::Renderer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use pacer::FramePacer;

/// 一帧的上下文
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameContext {
    /// 帧序号（从 0 开始）
    pub frame: u64,
    /// 当前时间（自时钟起点）
    pub now: Duration,
}

/// 一帧的执行结果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    pub frame: u64,
    /// 绘制并更新的实体数
    pub drawn: usize,
    /// 本帧完成的动作数
    pub completed: usize,
    /// 本帧末尾被移除的实体
    pub removed: Vec<EntityId>,
    /// 本帧解除了等待条件的实体
    pub resolved_waits: Vec<EntityId>,
}

/// 停止帧循环的句柄
///
/// 可以克隆后交给渲染器或其他线程。
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    /// 请求停止（当前帧结束后生效）
    pub fn request_stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// 清除停止请求
    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// 帧调度器
pub struct Scheduler {
    /// 注册顺序（决定绘制顺序与等待条件检查顺序）
    order: Vec<EntityId>,
    entities: HashMap<EntityId, AnimatedEntity>,
    clock: Box<dyn Clock>,
    /// 下一帧的序号
    frame: u64,
    stop: StopHandle,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("entities", &self.order)
            .field("frame", &self.frame)
            .field("stopped", &self.stop.is_stopped())
            .finish()
    }
}

impl Scheduler {
    /// 使用系统时钟创建调度器
    pub fn new() -> Self {
        Self::with_clock(SystemClock::new())
    }

    pub fn with_clock(clock: impl Clock + 'static) -> Self {
        Self {
            order: Vec::new(),
            entities: HashMap::new(),
            clock: Box::new(clock),
            frame: 0,
            stop: StopHandle::default(),
        }
    }

    // ========== 注册 ==========

    /// 注册实体（以实体自身的 ID 为键）
    ///
    /// 同 ID 的实体已存在时先注销旧实体，新实体排到最后。返回被替换的旧实体。
    pub fn register(&mut self, entity: AnimatedEntity) -> Option<AnimatedEntity> {
        let id = entity.id().clone();
        let previous = self.deregister(id.as_str());
        if previous.is_some() {
            debug!(entity = %id, "替换已注册的实体");
        }
        self.order.push(id.clone());
        self.entities.insert(id, entity);
        previous
    }

    /// 注销实体，ID 不存在时什么也不做
    pub fn deregister(&mut self, id: &str) -> Option<AnimatedEntity> {
        let entity = self.entities.remove(id)?;
        self.order.retain(|existing| existing.as_str() != id);
        Some(entity)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entities.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&AnimatedEntity> {
        self.entities.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut AnimatedEntity> {
        self.entities.get_mut(id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// 按注册顺序的实体 ID
    pub fn ids(&self) -> impl Iterator<Item = &EntityId> {
        self.order.iter()
    }

    /// 按注册顺序迭代实体
    pub fn entities(&self) -> impl Iterator<Item = &AnimatedEntity> {
        self.order.iter().filter_map(|id| self.entities.get(id))
    }

    // ========== 帧循环 ==========

    /// 已运行的帧数
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// 以 `fps` 帧率运行，直到通过 [`StopHandle`] 请求停止
    pub fn run_frame_loop<R>(&mut self, renderer: &mut R, fps: u32) -> Result<(), SchedulerError>
    where
        R: Renderer + ?Sized,
    {
        let mut pacer = FramePacer::new(fps)?;
        info!(fps, entities = self.order.len(), "帧循环开始");

        while !self.stop.is_stopped() {
            let now = self.clock.now();
            let remaining = pacer.remaining(now);
            if !remaining.is_zero() {
                self.clock.sleep(remaining);
                continue;
            }
            pacer.mark(now);
            self.tick(renderer);
        }

        info!(frames = self.frame, "帧循环结束");
        Ok(())
    }

    /// 运行一帧
    ///
    /// 按注册顺序对每个实体先绘制、再更新；整轮结束后才移除已终止的实体，
    /// 最后解除已满足的等待条件。
    pub fn tick<R>(&mut self, renderer: &mut R) -> FrameReport
    where
        R: Renderer + ?Sized,
    {
        let ctx = FrameContext {
            frame: self.frame,
            now: self.clock.now(),
        };
        let mut report = FrameReport {
            frame: ctx.frame,
            ..FrameReport::default()
        };

        renderer.begin_frame(&ctx);

        let mut disposal = Vec::new();
        for id in &self.order {
            let Some(entity) = self.entities.get_mut(id) else {
                continue;
            };
            renderer.draw(id, entity);
            report.drawn += 1;

            let update = entity.update(&ctx);
            report.completed += update.completed.len();
            if entity.is_terminated() {
                disposal.push(id.clone());
            }
        }

        for id in disposal {
            self.deregister(id.as_str());
            debug!(entity = %id, frame = ctx.frame, "实体已移除");
            report.removed.push(id);
        }

        report.resolved_waits = self.resolve_waits();
        renderer.end_frame(&ctx);

        self.frame += 1;
        report
    }

    /// 解除已满足的等待条件
    ///
    /// 先收集，再统一修改。条件只检查目标当前动作组中是否存在指定动作，
    /// 目标实体不存在时条件保持不变。
    fn resolve_waits(&mut self) -> Vec<EntityId> {
        let satisfied: Vec<EntityId> = self
            .order
            .iter()
            .filter(|id| {
                self.entities
                    .get(*id)
                    .and_then(AnimatedEntity::wait_condition)
                    .is_some_and(|condition| {
                        self.entities
                            .get(condition.target.as_str())
                            .is_some_and(|target| target.has_current_action(condition.action.as_str()))
                    })
            })
            .cloned()
            .collect();

        for id in &satisfied {
            if let Some(entity) = self.entities.get_mut(id) {
                entity.clear_wait();
                debug!(entity = %id, "等待条件已解除");
            }
        }
        satisfied
    }
}

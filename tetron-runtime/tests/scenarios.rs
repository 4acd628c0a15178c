//! 端到端场景：尺寸渐变、双轴移动、跨实体等待、carryover 合并与帧循环。

use std::time::Duration;

use insta::assert_snapshot;
use tetron_runtime::{
    ActionData, ActionKind, AnimatedEntity, Clock, EntityId, FrameContext, ManualClock, NullRenderer,
    Renderer, Scheduler, StopHandle,
};

fn frame(n: u64) -> FrameContext {
    FrameContext {
        frame: n,
        now: Duration::from_millis(n * 10),
    }
}

/// 记录每帧绘制顺序的渲染器，达到帧数上限后请求停止
#[derive(Default)]
struct Recorder {
    frames: Vec<(Duration, Vec<String>)>,
    stop: Option<(StopHandle, u64)>,
}

impl Renderer for Recorder {
    fn begin_frame(&mut self, frame: &FrameContext) {
        self.frames.push((frame.now, Vec::new()));
    }

    fn draw(&mut self, id: &EntityId, _entity: &AnimatedEntity) {
        if let Some((_, drawn)) = self.frames.last_mut() {
            drawn.push(id.to_string());
        }
    }

    fn end_frame(&mut self, frame: &FrameContext) {
        if let Some((handle, limit)) = &self.stop
            && frame.frame + 1 >= *limit
        {
            handle.request_stop();
        }
    }
}

#[test]
fn test_scenario_a_resize_completes_on_fourth_tick() {
    let mut scheduler = Scheduler::with_clock(ManualClock::new());
    let mut entity = AnimatedEntity::animata("a", 0.0, 0.0, 10.0);
    entity.resize("grow", 30.0, 5.0, false).unwrap();
    scheduler.register(entity);

    let mut trace = Vec::new();
    for _ in 0..4 {
        let report = scheduler.tick(&mut NullRenderer);
        let entity = scheduler.get("a").unwrap();
        trace.push(entity.properties().size.to_string());
        if report.completed > 0 {
            assert!(!entity.has_current_action("grow"));
        }
    }

    assert_snapshot!(trace.join(" "), @"15 20 25 30");
    assert!(scheduler.get("a").unwrap().is_idle());
}

#[test]
fn test_scenario_b_diagonal_move_keeps_speed() {
    let mut entity = AnimatedEntity::animata("b", 0.0, 0.0, 10.0);
    entity.move_to("slide", 30.0, 40.0, 10.0, false).unwrap();

    let mut previous = entity.properties().position;
    let mut ticks = 0;
    while !entity.is_idle() {
        entity.update(&frame(ticks));
        ticks += 1;
        assert!(ticks < 20);

        let position = entity.properties().position;
        let Some(action) = entity.current_group().and_then(|g| g.get("slide")) else {
            break;
        };
        let ActionData::Move(movement) = action.data() else {
            panic!("slide 应为移动动作");
        };
        let (x, y) = movement.axes().unwrap();
        assert!((x.velocity - 6.0).abs() < 1e-4);
        assert!((y.velocity - 8.0).abs() < 1e-4);
        if !x.reached && !y.reached {
            let step = previous.distance(position);
            assert!((step - 10.0).abs() < 1e-3, "第 {ticks} 帧速度为 {step}");
        }
        previous = position;
    }

    let position = entity.properties().position;
    assert_eq!(position.x, 30.0);
    assert_eq!(position.y, 40.0);
}

#[test]
fn test_scenario_c_wait_starts_counting_after_dependency_appears() {
    let clock = ManualClock::new();
    let mut scheduler = Scheduler::with_clock(clock.clone());

    let mut leader = AnimatedEntity::animata("leader", 0.0, 0.0, 10.0);
    leader.resize("warmup", 30.0, 5.0, false).unwrap();
    leader
        .compose(|a| a.rotate("build", 90.0, 1.0, false))
        .unwrap();

    let mut follower = AnimatedEntity::animata("follower", 0.0, 0.0, 10.0);
    follower
        .wait_on("leader", "build", Duration::from_millis(200))
        .unwrap();
    follower
        .compose(|b| b.resize("go", 20.0, 5.0, false))
        .unwrap();

    scheduler.register(leader);
    scheduler.register(follower);

    let mut resolved_at = None;
    let mut finished_at = None;
    for n in 0..40 {
        let report = scheduler.tick(&mut NullRenderer);
        let now = clock.now();
        if !report.resolved_waits.is_empty() {
            assert_eq!(report.resolved_waits, vec![EntityId::from("follower")]);
            resolved_at.get_or_insert(now);
        }
        let follower = scheduler.get("follower").unwrap();
        if resolved_at.is_none() {
            assert!(follower.wait_condition().is_some(), "第 {n} 帧条件应仍然有效");
        }
        if finished_at.is_none() && !follower.has_current_action("follower_waiting") {
            finished_at = Some(now);
        }
        clock.advance(Duration::from_millis(10));
    }

    // leader 第 4 帧（t = 40ms）才切换到含 "build" 的动作组
    let resolved_at = resolved_at.unwrap();
    assert_eq!(resolved_at, Duration::from_millis(40));
    let finished_at = finished_at.unwrap();
    assert!(finished_at >= resolved_at + Duration::from_millis(200));
    assert_eq!(finished_at, Duration::from_millis(250));

    let follower = scheduler.get("follower").unwrap();
    assert_eq!(follower.properties().size, 20.0);
}

#[test]
fn test_scenario_d_mixed_group_does_not_merge() {
    let mut entity = AnimatedEntity::animata("d", 0.0, 0.0, 10.0);
    entity
        .compose(|e| {
            e.move_by("keep", 100.0, 0.0, 1.0, true)?;
            e.resize("quick", 15.0, 5.0, false)
        })
        .unwrap();
    entity.compose(|e| e.rotate("next", 90.0, 1.0, false)).unwrap();

    // quick 在本帧完成，但它参与了本轮扫描且不带 carryover
    let update = entity.update(&frame(0));
    assert_eq!(update.completed.len(), 1);
    assert!(update.carried.is_empty());
    assert!(entity.has_current_action("keep"));
    assert_eq!(entity.queue().len(), 1);

    // 下一帧只剩 carryover 动作，合并发生
    let update = entity.update(&frame(1));
    assert_eq!(update.carried.len(), 1);
    assert!(entity.current_group().is_none());
    let next = entity.queue().front().unwrap();
    let ids: Vec<&str> = next.ids().map(|id| id.as_str()).collect();
    assert_eq!(ids, vec!["next", "keep"]);
}

#[test]
fn test_carryover_blocked_by_surviving_ineligible_action() {
    let mut entity = AnimatedEntity::animata("e", 0.0, 0.0, 10.0);
    entity
        .compose(|e| {
            e.resize("slow", 30.0, 5.0, false)?;
            e.rotate("fast", 10.0, 10.0, true)
        })
        .unwrap();
    entity.compose(|e| e.move_by("next", 5.0, 0.0, 5.0, false)).unwrap();

    // fast（carryover）第一帧就完成并被移除，slow 留下阻止合并
    for n in 0..4 {
        let update = entity.update(&frame(n));
        assert!(update.carried.is_empty());
    }
    assert_eq!(entity.properties().size, 30.0);
    assert_eq!(entity.queue().len(), 1);

    // 当前组已空，按正常流程切换到下一组
    entity.update(&frame(4));
    assert!(entity.queue().is_empty());
    assert_eq!(entity.properties().position.x, 5.0);
}

#[test]
fn test_carryover_merges_running_actions_into_next_group() {
    let mut entity = AnimatedEntity::animata("f", 0.0, 0.0, 10.0);
    entity
        .compose(|e| e.move_by("drift", 10.0, 0.0, 1.0, true))
        .unwrap();
    entity.compose(|e| e.resize("grow", 20.0, 5.0, false)).unwrap();

    let update = entity.update(&frame(0));
    assert_eq!(update.carried.len(), 1);
    assert!(entity.current_group().is_none());
    assert_eq!(entity.queue().len(), 1);

    // 合并后的动作与下一组的动作一起运行
    entity.update(&frame(1));
    assert!(entity.has_current_action("drift"));
    assert!(entity.has_current_action("grow"));
    assert_eq!(entity.properties().size, 15.0);
    assert_eq!(entity.properties().position.x, 2.0);

    for n in 2..20 {
        entity.update(&frame(n));
    }
    assert!(entity.is_idle());
    assert_eq!(entity.properties().position.x, 10.0);
    assert_eq!(entity.properties().size, 20.0);
}

#[test]
fn test_carryover_counts_paused_actions() {
    let mut entity = AnimatedEntity::animata("g", 0.0, 0.0, 10.0);
    entity
        .compose(|e| {
            e.resize("held", 30.0, 5.0, false)?;
            e.rotate("spin", 90.0, 1.0, true)
        })
        .unwrap();
    entity.compose(|e| e.resize("later", 5.0, 1.0, false)).unwrap();

    entity.update(&frame(0));
    assert!(entity.pause(Some("held")));

    let update = entity.update(&frame(1));
    assert!(update.carried.is_empty());
    assert!(entity.has_current_action("held"));
}

#[test]
fn test_carryover_collision_keeps_next_groups_action() {
    let mut entity = AnimatedEntity::animata("h", 0.0, 0.0, 10.0);
    entity
        .compose(|e| e.resize("shared", 100.0, 1.0, true))
        .unwrap();
    entity
        .compose(|e| e.rotate("shared", 45.0, 5.0, false))
        .unwrap();

    let update = entity.update(&frame(0));
    assert!(update.carried.is_empty());
    assert!(entity.current_group().is_none());

    entity.update(&frame(1));
    let action = entity.current_group().unwrap().get("shared").unwrap();
    assert_eq!(action.kind(), ActionKind::Rotate);
    assert_eq!(entity.properties().size, 11.0);
}

#[test]
fn test_terminated_entities_removed_after_full_pass() {
    let mut scheduler = Scheduler::with_clock(ManualClock::new());
    for id in ["a", "b", "c"] {
        scheduler.register(AnimatedEntity::animata(id, 0.0, 0.0, 1.0));
    }
    scheduler.get_mut("b").unwrap().terminate();

    let mut recorder = Recorder::default();
    let first = scheduler.tick(&mut recorder);
    let second = scheduler.tick(&mut recorder);

    assert_eq!(first.removed, vec![EntityId::from("b")]);
    assert!(second.removed.is_empty());
    assert_eq!(recorder.frames[0].1, vec!["a", "b", "c"]);
    assert_eq!(recorder.frames[1].1, vec!["a", "c"]);
}

#[test]
fn test_frame_loop_paces_with_clock() {
    let clock = ManualClock::new();
    let mut scheduler = Scheduler::with_clock(clock.clone());
    let mut entity = AnimatedEntity::animata("a", 0.0, 0.0, 10.0);
    entity.resize("grow", 30.0, 5.0, false).unwrap();
    scheduler.register(entity);

    let mut recorder = Recorder {
        stop: Some((scheduler.stop_handle(), 5)),
        ..Recorder::default()
    };
    scheduler.run_frame_loop(&mut recorder, 50).unwrap();

    let times: Vec<String> = recorder
        .frames
        .iter()
        .map(|(now, _)| now.as_millis().to_string())
        .collect();
    assert_snapshot!(times.join(","), @"0,20,40,60,80");
    assert_eq!(scheduler.frame(), 5);
    assert_eq!(scheduler.get("a").unwrap().properties().size, 30.0);
}

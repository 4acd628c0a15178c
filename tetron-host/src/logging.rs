//! 日志初始化。

use tracing::Level;

/// 初始化全局日志订阅者
///
/// 已经初始化过时什么也不做。
pub fn init(level: Level) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .try_init();
}

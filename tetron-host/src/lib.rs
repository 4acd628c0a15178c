//! # Tetron Host
//!
//! tetron 动画引擎的宿主层：配置加载、日志、命令行、无头渲染器与演示场景。
//!
//! ## 模块结构
//!
//! - [`config`]：配置文件
//! - [`cli`]：命令行参数
//! - [`renderer`]：记录型渲染器
//! - [`scenes`]：内置场景
//! - [`app`]：组装并运行

pub mod app;
pub mod cli;
pub mod config;
pub mod logging;
pub mod renderer;
pub mod scenes;

pub use app::{EntitySnapshot, RunOutcome, run, run_with_clock};
pub use cli::Cli;
pub use config::{AppConfig, CanvasConfig, ConfigError};
pub use renderer::{DrawRecord, RecordingRenderer};
pub use scenes::{SCENES, SceneError};

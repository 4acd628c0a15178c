//! 命令行参数。

use std::path::PathBuf;

use clap::Parser;

use crate::config::AppConfig;

#[derive(Parser, Debug)]
#[command(name = "tetron")]
#[command(about = "tetron 动画引擎 - 无头帧循环")]
#[command(version)]
pub struct Cli {
    /// 配置文件（默认：config.json）
    #[arg(short, long, default_value = "config.json")]
    pub config: PathBuf,

    /// 目标帧率
    #[arg(long)]
    pub fps: Option<u32>,

    /// 最多运行的帧数
    #[arg(long)]
    pub frames: Option<u64>,

    /// 场景名称（tetron / cascade）
    #[arg(short, long)]
    pub scene: Option<String>,

    /// 日志级别
    #[arg(long)]
    pub log_level: Option<String>,

    /// 结束时把实体快照写入该文件
    #[arg(long)]
    pub dump: Option<PathBuf>,

    /// 所有实体空闲后继续运行
    #[arg(long)]
    pub keep_running: bool,
}

impl Cli {
    /// 用命令行参数覆盖配置
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(fps) = self.fps {
            config.frame_rate = fps;
        }
        if let Some(frames) = self.frames {
            config.max_frames = Some(frames);
        }
        if let Some(scene) = &self.scene {
            config.scene = scene.clone();
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        if let Some(dump) = &self.dump {
            config.dump_path = Some(dump.clone());
        }
        if self.keep_running {
            config.stop_when_idle = false;
        }
    }
}

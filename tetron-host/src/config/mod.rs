//! # Config 模块
//!
//! 运行配置，集中管理所有配置项。
//!
//! ## 配置优先级
//!
//! 1. 命令行参数（最高）
//! 2. 配置文件 (config.json)
//! 3. 默认值（最低）

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::Level;

use crate::scenes;

/// 应用配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// 目标帧率
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,

    /// 最多运行的帧数，`None` 表示不限
    #[serde(default)]
    pub max_frames: Option<u64>,

    /// 所有实体都空闲时是否结束
    #[serde(default = "default_stop_when_idle")]
    pub stop_when_idle: bool,

    /// 场景名称
    #[serde(default = "default_scene")]
    pub scene: String,

    /// 日志级别（trace/debug/info/warn/error）
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// 画布配置
    #[serde(default)]
    pub canvas: CanvasConfig,

    /// 结束时把实体快照写入该 JSON 文件
    #[serde(default)]
    pub dump_path: Option<PathBuf>,
}

/// 画布配置
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasConfig {
    #[serde(default = "default_canvas_size")]
    pub width: u32,

    #[serde(default = "default_canvas_size")]
    pub height: u32,
}

impl CanvasConfig {
    /// 画布中心
    pub fn center(&self) -> (f32, f32) {
        (self.width as f32 / 2.0, self.height as f32 / 2.0)
    }
}

// 默认值函数
fn default_frame_rate() -> u32 {
    60
}

fn default_stop_when_idle() -> bool {
    true
}

fn default_scene() -> String {
    "tetron".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_canvas_size() -> u32 {
    720
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            frame_rate: default_frame_rate(),
            max_frames: None,
            stop_when_idle: default_stop_when_idle(),
            scene: default_scene(),
            log_level: default_log_level(),
            canvas: CanvasConfig::default(),
            dump_path: None,
        }
    }
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: default_canvas_size(),
            height: default_canvas_size(),
        }
    }
}

impl AppConfig {
    /// 加载配置文件
    ///
    /// 文件不存在或解析失败时返回错误，由调用方决定是否回退到默认配置。
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// 保存配置到文件
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).map_err(ConfigError::Serialization)?;
        fs::write(path, json).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// 解析日志级别
    pub fn log_level(&self) -> Result<Level, ConfigError> {
        Level::from_str(&self.log_level).map_err(|_| {
            ConfigError::ValidationFailed(format!("未知的日志级别: {}", self.log_level))
        })
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.frame_rate == 0 {
            return Err(ConfigError::ValidationFailed(
                "帧率必须大于 0".to_string(),
            ));
        }

        if !scenes::SCENES.contains(&self.scene.as_str()) {
            return Err(ConfigError::ValidationFailed(format!(
                "未知的场景: {}（可用: {}）",
                self.scene,
                scenes::SCENES.join(", ")
            )));
        }

        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(ConfigError::ValidationFailed(
                "画布尺寸必须大于 0".to_string(),
            ));
        }

        self.log_level()?;
        Ok(())
    }
}

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 读写失败
    #[error("配置 IO 错误 {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// 解析失败
    #[error("配置解析失败 {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// 序列化失败
    #[error("配置序列化失败: {0}")]
    Serialization(serde_json::Error),

    /// 验证失败
    #[error("配置验证失败: {0}")]
    ValidationFailed(String),
}

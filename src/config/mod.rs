//! 统一配置系统
//!
//! 提供TOML/JSON配置文件、环境变量覆盖与校验

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub mod panel;

pub use panel::PanelConfig;

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 文件读取错误
    #[error("Config file error: {0}")]
    FileError(#[from] std::io::Error),
    /// 解析错误
    #[error("Config parse error: {0}")]
    ParseError(String),
    /// 验证错误
    #[error("Config validation error: {0}")]
    ValidationError(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// 控件助手主配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GuiConfig {
    /// 未指定步长的数值控件使用的默认步长
    #[serde(default)]
    pub default_step: Option<f64>,

    /// 面板配置
    #[serde(default)]
    pub panel: PanelConfig,

    /// 日志配置
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// 配置来源
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOrigin {
    File(PathBuf),
    Default,
}

impl GuiConfig {
    /// 创建默认配置
    pub fn new() -> Self {
        Self::default()
    }

    /// 从TOML文件加载配置
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(ConfigError::FileError)?;
        Self::from_toml_str(&content)
    }

    /// 从TOML字符串解析配置
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// 从JSON文件加载配置
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(ConfigError::FileError)?;
        Self::from_json_str(&content)
    }

    /// 从JSON字符串解析配置
    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        serde_json::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// 保存为TOML文件
    pub fn save_toml<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        fs::write(path, content).map_err(ConfigError::FileError)
    }

    /// 保存为JSON文件
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        fs::write(path, content).map_err(ConfigError::FileError)
    }

    /// 从环境变量覆盖配置
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup("GUI_TITLE") {
            self.panel.title = val;
        }
        if let Some(val) = lookup("GUI_HIDDEN") {
            self.panel.hidden = val.parse().unwrap_or(self.panel.hidden);
        }
        if let Some(val) = lookup("GUI_CLOSE_FOLDERS") {
            self.panel.close_folders = val.parse().unwrap_or(self.panel.close_folders);
        }
        if let Some(val) = lookup("GUI_DEFAULT_STEP") {
            if let Ok(step) = val.parse() {
                self.default_step = Some(step);
            }
        }
        if let Some(val) = lookup("GUI_LOG_LEVEL") {
            if let Some(level) = LogLevel::from_name(&val) {
                self.logging.level = level;
            }
        }
    }

    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        self.panel.validate()?;
        if let Some(step) = self.default_step {
            if !step.is_finite() || step <= 0.0 {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid default step: {}",
                    step
                )));
            }
        }
        Ok(())
    }

    /// 自动查找并加载配置文件
    ///
    /// 按以下顺序查找：
    /// 1. ./gui.toml
    /// 2. ./gui.json
    /// 3. 使用默认配置
    ///
    /// 找到但无法解析的文件会被跳过。
    pub fn load_or_default() -> (Self, ConfigOrigin) {
        if let Ok(config) = Self::from_toml_file("gui.toml") {
            return (config, ConfigOrigin::File(PathBuf::from("gui.toml")));
        }

        if let Ok(config) = Self::from_json_file("gui.json") {
            return (config, ConfigOrigin::File(PathBuf::from("gui.json")));
        }

        (Self::default(), ConfigOrigin::Default)
    }
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别，`RUST_LOG` 未设置时生效
    pub level: LogLevel,
}

use crate::impl_default;

impl_default!(LoggingConfig {
    level: LogLevel::Info,
});

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    /// 跟踪
    Trace,
    /// 调试
    Debug,
    /// 信息
    Info,
    /// 警告
    Warn,
    /// 错误
    Error,
}

impl LogLevel {
    /// `EnvFilter` 可接受的指令
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = GuiConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.panel.title, "Controls");
    }

    #[test]
    fn test_toml_serialization() {
        let mut config = GuiConfig::default();
        config.default_step = Some(0.05);
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: GuiConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.default_step, Some(0.05));
        assert_eq!(config.panel.width, parsed.panel.width);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = GuiConfig::from_toml_str("[panel]\ntitle = \"Camera\"\nwidth = 300.0\nhidden = false\nclose_folders = false\n").unwrap();
        assert_eq!(config.panel.title, "Camera");
        assert!(!config.panel.close_folders);
        assert_eq!(config.logging.level, LogLevel::Info);
        assert_eq!(config.default_step, None);
    }

    #[test]
    fn test_json_serialization() {
        let config = GuiConfig::default();
        let json_str = serde_json::to_string(&config).unwrap();
        let parsed = GuiConfig::from_json_str(&json_str).unwrap();
        assert_eq!(config.panel.title, parsed.panel.title);
        assert!(matches!(
            GuiConfig::from_json_str("{ not json"),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("GUI_TITLE", "Debug"),
            ("GUI_HIDDEN", "true"),
            ("GUI_CLOSE_FOLDERS", "not-a-bool"),
            ("GUI_DEFAULT_STEP", "0.1"),
            ("GUI_LOG_LEVEL", "WARNING"),
        ]
        .into_iter()
        .collect();

        let mut config = GuiConfig::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.panel.title, "Debug");
        assert!(config.panel.hidden);
        assert!(config.panel.close_folders);
        assert_eq!(config.default_step, Some(0.1));
        assert_eq!(config.logging.level, LogLevel::Warn);
    }

    #[test]
    fn test_validation() {
        let mut config = GuiConfig::default();
        config.default_step = Some(-1.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));

        let mut config = GuiConfig::default();
        config.panel.width = 0.0;
        assert!(config.validate().is_err());
    }
}

//! 统一错误处理模块
//!
//! 控件库（`ui::ControlSurface`）产生的错误原样向调用者传播；
//! 外观层 `GuiHelper` 自身不做校验，也不翻译错误。
//!
//! ## 错误类型分层
//!
//! - **控件层错误** (`GuiError`): 范围、步长、节点句柄
//! - **配置错误** (`config::ConfigError`): 文件读取、解析与校验

use thiserror::Error;

/// 控件库错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GuiError {
    #[error("Invalid range: min {min} is greater than max {max}")]
    InvalidRange { min: f64, max: f64 },

    #[error("Invalid step: {0} (must be finite and positive)")]
    InvalidStep(f64),

    #[error("Unknown node: {0}")]
    UnknownNode(String),

    #[error("State error: {0}")]
    State(String),
}

/// 控件库结果类型别名
pub type GuiResult<T> = Result<T, GuiError>;

//! 核心模块
//!
//! 包含控件助手的基础设施：
//! - `error` - 错误类型定义
//! - `macros` - `impl_default!` 与 `reflect_struct!`

pub mod error;
#[macro_use]
pub mod macros;

// 重新导出错误类型
pub use error::{GuiError, GuiResult};

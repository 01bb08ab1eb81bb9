use super::{ConfigError, ConfigResult};
use crate::impl_default;
use crate::ui::tree::DEFAULT_TITLE;
use serde::{Deserialize, Serialize};

/// 面板配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelConfig {
    /// 根标题
    pub title: String,

    /// 面板宽度（逻辑像素）
    pub width: f32,

    /// 启动时隐藏
    pub hidden: bool,

    /// 启动时折叠所有文件夹
    pub close_folders: bool,
}

impl_default!(PanelConfig {
    title: DEFAULT_TITLE.to_string(),
    width: 245.0,
    hidden: false,
    close_folders: true,
});

impl PanelConfig {
    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        if !self.width.is_finite() || self.width <= 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "Invalid panel width: {}",
                self.width
            )));
        }
        Ok(())
    }
}

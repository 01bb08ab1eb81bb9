//! UI 系统模块
//!
//! 控件库抽象与实现。
//!
//! ## 功能特性
//!
//! - [`ControlSurface`]: 控件库能力接口（创建文件夹、查找子文件夹、添加控件、
//!   命名、回调、折叠、隐藏、遍历子节点）
//! - [`tree::ControlTree`]: 内存中的控件树，两种节点：文件夹容器与叶子控件
//! - [`panel::ControlPanel`]: 使用 egui 绘制控件树

pub mod panel;
pub mod tree;

pub use panel::ControlPanel;
pub use tree::ControlTree;

use crate::binding::{Accessor, Value};
use crate::core::{GuiError, GuiResult};
use std::rc::Rc;

/// 文件夹句柄
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FolderId(pub(crate) usize);

impl FolderId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// 控件句柄
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ControllerId(pub(crate) usize);

impl ControllerId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// 文件夹的子节点
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Child {
    /// 文件夹容器，可以继续递归
    Folder(FolderId),
    /// 叶子控件
    Controller(ControllerId),
}

/// 值变更回调
pub type ChangeCallback = Rc<dyn Fn(&Value)>;

/// 数值控件的范围与步长
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NumberRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub step: Option<f64>,
}

impl NumberRange {
    /// 无范围
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// `[min, max]`
    pub fn between(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
            step: None,
        }
    }

    pub fn step(mut self, step: f64) -> Self {
        self.step = Some(step);
        self
    }

    /// 校验范围与步长
    pub fn validate(&self) -> GuiResult<()> {
        if let (Some(min), Some(max)) = (self.min, self.max) {
            if min > max {
                return Err(GuiError::InvalidRange { min, max });
            }
        }
        if let Some(step) = self.step {
            if !step.is_finite() || step <= 0.0 {
                return Err(GuiError::InvalidStep(step));
            }
        }
        Ok(())
    }

    /// 按步长取整后限制在范围内
    ///
    /// 步长以 0 为基准，与 `min` 无关。
    pub fn apply(&self, value: f64) -> f64 {
        let mut v = value;
        if let Some(step) = self.step {
            v = round_significant((v / step).round() * step);
        }
        if let Some(min) = self.min {
            v = v.max(min);
        }
        if let Some(max) = self.max {
            v = v.min(max);
        }
        v
    }
}

/// 保留 15 位有效数字，去掉 `0.1 * 3` 这类浮点残差
fn round_significant(v: f64) -> f64 {
    if v == 0.0 || !v.is_finite() {
        return v;
    }
    let digits = SIGNIFICANT_DIGITS - 1 - v.abs().log10().floor() as i32;
    let scale = 10f64.powi(digits);
    if !scale.is_finite() || scale == 0.0 {
        return v;
    }
    (v * scale).round() / scale
}

const SIGNIFICANT_DIGITS: i32 = 15;

/// 控件类型
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControllerKind {
    Numeric(NumberRange),
    Color,
}

/// 控件库能力接口
///
/// `GuiHelper` 只通过这个接口访问控件库；默认实现为 [`ControlTree`]。
pub trait ControlSurface {
    /// 根文件夹
    fn root(&self) -> FolderId;

    /// 在 `parent` 下创建文件夹
    fn add_folder(&mut self, parent: FolderId, title: &str) -> GuiResult<FolderId>;

    /// 查找 `parent` 下第一个标题为 `title` 的子文件夹
    fn find_folder(&self, parent: FolderId, title: &str) -> Option<FolderId>;

    /// 添加数值控件
    fn add_numeric(
        &mut self,
        parent: FolderId,
        accessor: Box<dyn Accessor>,
        range: NumberRange,
    ) -> GuiResult<ControllerId>;

    /// 添加颜色控件
    fn add_color(&mut self, parent: FolderId, accessor: Box<dyn Accessor>)
        -> GuiResult<ControllerId>;

    /// 设置控件显示名
    fn set_name(&mut self, id: ControllerId, name: &str) -> GuiResult<()>;

    /// 设置值变更回调（覆盖已有回调）
    fn set_on_change(&mut self, id: ControllerId, callback: ChangeCallback) -> GuiResult<()>;

    /// 设置编辑完成回调（覆盖已有回调）
    fn set_on_finish_change(&mut self, id: ControllerId, callback: ChangeCallback)
        -> GuiResult<()>;

    /// 子节点，按添加顺序
    fn children(&self, folder: FolderId) -> Vec<Child>;

    /// 折叠或展开文件夹
    fn set_closed(&mut self, folder: FolderId, closed: bool) -> GuiResult<()>;

    /// 隐藏或显示整个控件面板
    fn set_hidden(&mut self, hidden: bool);

    fn folder_title(&self, folder: FolderId) -> Option<&str>;

    fn controller_name(&self, id: ControllerId) -> Option<&str>;

    /// 读取控件当前值
    fn read_value(&self, id: ControllerId) -> Option<Value>;

    /// 通过控件写入值并触发变更回调；返回是否写入成功
    fn set_value(&mut self, id: ControllerId, value: Value) -> GuiResult<bool>;
}

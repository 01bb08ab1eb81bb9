//! 控件绑定外观
//!
//! `GuiHelper` 持有一棵控件树、当前选中的文件夹路径和已创建控件的记录，
//! 提供可链式调用的接口：选择文件夹、绑定属性、命名、挂回调、折叠与隐藏。
//!
//! # 生命周期
//!
//! 每个演示程序在启动时创建一个 `GuiHelper`，之后一直持有并向下传递，
//! 不再重新创建。
//!
//! # 示例
//!
//! ```rust
//! use gui_helper::prelude::*;
//! use glam::Vec3;
//!
//! # fn main() -> GuiResult<()> {
//! let mut gui = GuiHelper::new();
//! let position = target(Vec3::new(0.0, 0.0, 1.0));
//!
//! gui.select(["camera", "position"])
//!     .add(position.clone(), "x", NumberRange::between(-2.0, 2.0), false)?
//!     .add(position.clone(), "z", NumberRange::between(0.5, 2.0), false)?
//!     .on_change_all(|value| println!("camera moved: {value}"))
//!     .close_all();
//!
//! assert_eq!(gui.controllers().len(), 2);
//! # Ok(())
//! # }
//! ```

pub mod state;


pub use state::GuiState;

use crate::binding::{Accessor, Axis, ComponentAccessor, DegreeView, FieldAccessor, Target, Value};
use crate::config::GuiConfig;
use crate::core::GuiResult;
use crate::ui::{Child, ControlSurface, ControlTree, ControllerId, FolderId, NumberRange};
use std::rc::Rc;

/// 颜色控件的默认属性名
pub const DEFAULT_COLOR_PROPERTY: &str = "color";

/// 控件绑定外观
pub struct GuiHelper<S: ControlSurface = ControlTree> {
    surface: S,
    /// 当前选中的文件夹路径，由下一次创建控件时解析
    folders: Vec<String>,
    /// 已创建的控件，只追加
    controllers: Vec<ControllerId>,
    default_step: Option<f64>,
}

impl GuiHelper<ControlTree> {
    pub fn new() -> Self {
        Self::with_surface(ControlTree::new())
    }

    /// 按配置创建：根标题、默认步长、初始隐藏
    ///
    /// `panel.close_folders` 不在这里处理，文件夹要等控件创建之后才存在。
    pub fn from_config(config: &GuiConfig) -> Self {
        let mut helper = Self::with_surface(ControlTree::with_title(config.panel.title.clone()));
        helper.default_step = config.default_step;
        if config.panel.hidden {
            helper.hide();
        }
        helper
    }
}

impl Default for GuiHelper<ControlTree> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ControlSurface> GuiHelper<S> {
    /// 使用指定的控件库
    pub fn with_surface(surface: S) -> Self {
        Self {
            surface,
            folders: Vec::new(),
            controllers: Vec::new(),
            default_step: None,
        }
    }

    /// 选择文件夹路径
    ///
    /// 只记录路径，不创建文件夹；路径在下一次创建控件时解析，
    /// 缺失的层级按顺序创建。空路径选择根。
    ///
    /// ```rust
    /// # use gui_helper::prelude::*;
    /// let mut gui = GuiHelper::new();
    /// gui.select(["folder2", "folder2-1"]);
    /// assert_eq!(gui.selection(), ["folder2", "folder2-1"]);
    /// ```
    pub fn select<I, T>(&mut self, folders: I) -> &mut Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.folders = folders.into_iter().map(Into::into).collect();
        self
    }

    /// 选择根
    pub fn select_root(&mut self) -> &mut Self {
        self.folders.clear();
        self
    }

    pub fn selection(&self) -> &[String] {
        &self.folders
    }

    /// 添加数值控件，绑定到 `obj[prop]`
    ///
    /// `r2d` 为真时控件显示角度，底层属性保持弧度。
    /// 控件库的错误（例如 `min > max`）原样返回。
    pub fn add(
        &mut self,
        obj: Target,
        prop: &str,
        range: NumberRange,
        r2d: bool,
    ) -> GuiResult<&mut Self> {
        let accessor = Box::new(FieldAccessor::new(obj, prop));
        self.push_numeric(accessor, range, r2d)?;
        Ok(self)
    }

    /// 为向量属性 `obj[prop]` 添加 `x`、`y`、`z` 三个数值控件
    ///
    /// 三个控件都放在当前文件夹下，不另建子文件夹；控件名分别为 `x`、`y`、`z`，
    /// 可以紧接着用 [`GuiHelper::name`] 重命名。
    pub fn add_vector3(
        &mut self,
        obj: Target,
        prop: &str,
        range: NumberRange,
        r2d: bool,
    ) -> GuiResult<&mut Self> {
        for axis in Axis::ALL {
            let accessor = Box::new(ComponentAccessor::new(obj.clone(), prop, axis));
            self.push_numeric(accessor, range, r2d)?;
        }
        Ok(self)
    }

    /// 添加颜色控件，绑定到 `obj[prop]`
    pub fn add_color(&mut self, obj: Target, prop: &str) -> GuiResult<&mut Self> {
        let folder = self.container()?;
        let id = self
            .surface
            .add_color(folder, Box::new(FieldAccessor::new(obj, prop)))?;
        self.controllers.push(id);
        Ok(self)
    }

    /// 添加颜色控件，绑定到 `obj.color`
    pub fn add_color_default(&mut self, obj: Target) -> GuiResult<&mut Self> {
        self.add_color(obj, DEFAULT_COLOR_PROPERTY)
    }

    /// 从末尾对齐重命名最近的控件
    ///
    /// 最后一个名字给最后一个控件，倒数第二个给倒数第二个，以此类推；
    /// 任一侧用完即停止。
    ///
    /// ```rust
    /// # use gui_helper::prelude::*;
    /// # fn main() -> GuiResult<()> {
    /// # let mut gui = GuiHelper::new();
    /// let mesh = target(PropertyBag::new().with("position", glam::Vec3::ZERO));
    /// gui.add_vector3(mesh, "position", NumberRange::between(-1.0, 1.0), false)?
    ///     .name(["X", "Y", "Z"]);
    /// # Ok(())
    /// # }
    /// ```
    pub fn name<I, T>(&mut self, names: I) -> &mut Self
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let names: Vec<T> = names.into_iter().collect();
        for (name, id) in names.iter().rev().zip(self.controllers.iter().rev()) {
            if let Err(e) = self.surface.set_name(*id, name.as_ref()) {
                tracing::warn!(target: "gui", "Failed to rename controller: {}", e);
            }
        }
        self
    }

    /// 为最后一个控件设置值变更回调；没有控件时什么也不做
    pub fn on_change<F>(&mut self, callback: F) -> &mut Self
    where
        F: Fn(&Value) + 'static,
    {
        let callback: Rc<dyn Fn(&Value)> = Rc::new(callback);
        match self.controllers.last() {
            Some(&id) => {
                if let Err(e) = self.surface.set_on_change(id, callback) {
                    tracing::warn!(target: "gui", "Failed to attach change callback: {}", e);
                }
            }
            None => tracing::debug!(target: "gui", "on_change ignored: no controllers yet"),
        }
        self
    }

    /// 为所有已创建的控件设置同一个值变更回调，覆盖各自原有的回调
    pub fn on_change_all<F>(&mut self, callback: F) -> &mut Self
    where
        F: Fn(&Value) + 'static,
    {
        let callback: Rc<dyn Fn(&Value)> = Rc::new(callback);
        for &id in &self.controllers {
            if let Err(e) = self.surface.set_on_change(id, callback.clone()) {
                tracing::warn!(target: "gui", "Failed to attach change callback: {}", e);
            }
        }
        self
    }

    /// 为最后一个控件设置编辑完成回调；没有控件时什么也不做
    pub fn on_finish_change<F>(&mut self, callback: F) -> &mut Self
    where
        F: Fn(&Value) + 'static,
    {
        match self.controllers.last() {
            Some(&id) => {
                if let Err(e) = self.surface.set_on_finish_change(id, Rc::new(callback)) {
                    tracing::warn!(target: "gui", "Failed to attach finish callback: {}", e);
                }
            }
            None => tracing::debug!(target: "gui", "on_finish_change ignored: no controllers yet"),
        }
        self
    }

    /// 为所有已创建的控件设置编辑完成回调
    pub fn on_finish_change_all<F>(&mut self, callback: F) -> &mut Self
    where
        F: Fn(&Value) + 'static,
    {
        let callback: Rc<dyn Fn(&Value)> = Rc::new(callback);
        for &id in &self.controllers {
            if let Err(e) = self.surface.set_on_finish_change(id, callback.clone()) {
                tracing::warn!(target: "gui", "Failed to attach finish callback: {}", e);
            }
        }
        self
    }

    /// 折叠根及所有后代文件夹
    pub fn close_all(&mut self) -> &mut Self {
        let root = self.surface.root();
        let visited = set_closed_recursive(&mut self.surface, root, true);
        tracing::debug!(target: "gui", "Closed {} folders", visited);
        self
    }

    /// 展开根及所有后代文件夹
    pub fn open_all(&mut self) -> &mut Self {
        let root = self.surface.root();
        set_closed_recursive(&mut self.surface, root, false);
        self
    }

    /// 隐藏整个控件面板
    pub fn hide(&mut self) {
        self.surface.set_hidden(true);
    }

    /// 重新显示控件面板
    pub fn show(&mut self) {
        self.surface.set_hidden(false);
    }

    /// 已创建的控件，按创建顺序
    pub fn controllers(&self) -> &[ControllerId] {
        &self.controllers
    }

    pub fn last_controller(&self) -> Option<ControllerId> {
        self.controllers.last().copied()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// 保存所有控件的当前值
    pub fn save(&self) -> GuiState {
        state::capture(&self.surface, self.surface.root())
    }

    /// 把保存的值写回匹配的控件并触发变更回调，返回写入成功的数量
    ///
    /// 找不到对应控件或文件夹的条目被忽略。
    pub fn load(&mut self, saved: &GuiState) -> usize {
        let root = self.surface.root();
        let applied = state::apply(&mut self.surface, root, saved);
        tracing::debug!(target: "gui", "Loaded {} controller values", applied);
        applied
    }

    /// 解析当前选中的路径，缺失的层级按顺序创建
    fn container(&mut self) -> GuiResult<FolderId> {
        let mut folder = self.surface.root();
        for title in &self.folders {
            folder = match self.surface.find_folder(folder, title) {
                Some(existing) => existing,
                None => self.surface.add_folder(folder, title)?,
            };
        }
        Ok(folder)
    }

    fn push_numeric(
        &mut self,
        accessor: Box<dyn Accessor>,
        mut range: NumberRange,
        r2d: bool,
    ) -> GuiResult<ControllerId> {
        if range.step.is_none() {
            range.step = self.default_step;
        }
        let accessor: Box<dyn Accessor> = if r2d {
            Box::new(DegreeView::new(accessor))
        } else {
            accessor
        };

        let folder = self.container()?;
        let id = self.surface.add_numeric(folder, accessor, range)?;
        self.controllers.push(id);
        Ok(id)
    }
}

/// 只递归进入文件夹节点，返回访问的文件夹数量
fn set_closed_recursive<S: ControlSurface>(surface: &mut S, folder: FolderId, closed: bool) -> usize {
    if let Err(e) = surface.set_closed(folder, closed) {
        tracing::warn!(target: "gui", "Failed to toggle folder: {}", e);
    }
    let mut visited = 1;
    for child in surface.children(folder) {
        if let Child::Folder(sub) = child {
            visited += set_closed_recursive(surface, sub, closed);
        }
    }
    visited
}

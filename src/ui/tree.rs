//! 控件树
//!
//! 以两个数组存放文件夹与控件，句柄即下标。节点只增不删，
//! 因此句柄在控件树的整个生命周期内有效。

use super::{Child, ChangeCallback, ControlSurface, ControllerId, ControllerKind, FolderId, NumberRange};
use crate::binding::{Accessor, Value};
use crate::core::{GuiError, GuiResult};
use std::fmt::Write as _;

/// 默认根标题
pub const DEFAULT_TITLE: &str = "Controls";

struct FolderNode {
    title: String,
    parent: Option<FolderId>,
    children: Vec<Child>,
    closed: bool,
}

struct ControllerNode {
    name: String,
    kind: ControllerKind,
    folder: FolderId,
    accessor: Box<dyn Accessor>,
    on_change: Option<ChangeCallback>,
    on_finish_change: Option<ChangeCallback>,
}

/// 内存中的控件树
pub struct ControlTree {
    folders: Vec<FolderNode>,
    controllers: Vec<ControllerNode>,
    hidden: bool,
}

impl Default for ControlTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ControlTree {
    pub fn new() -> Self {
        Self::with_title(DEFAULT_TITLE)
    }

    /// 创建只有根文件夹的控件树
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            folders: vec![FolderNode {
                title: title.into(),
                parent: None,
                children: Vec::new(),
                closed: false,
            }],
            controllers: Vec::new(),
            hidden: false,
        }
    }

    pub fn title(&self) -> &str {
        &self.folders[0].title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.folders[0].title = title.into();
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn is_closed(&self, folder: FolderId) -> bool {
        self.folders.get(folder.0).map_or(false, |f| f.closed)
    }

    pub fn folder_count(&self) -> usize {
        self.folders.len()
    }

    pub fn controller_count(&self) -> usize {
        self.controllers.len()
    }

    pub fn parent(&self, folder: FolderId) -> Option<FolderId> {
        self.folders.get(folder.0).and_then(|f| f.parent)
    }

    /// 从根（不含）到该文件夹的标题路径
    pub fn folder_path(&self, folder: FolderId) -> Vec<String> {
        let mut path = Vec::new();
        let mut current = Some(folder);
        while let Some(id) = current {
            match self.folders.get(id.0) {
                Some(node) if node.parent.is_some() => {
                    path.push(node.title.clone());
                    current = node.parent;
                }
                _ => break,
            }
        }
        path.reverse();
        path
    }

    pub fn controller_kind(&self, id: ControllerId) -> Option<ControllerKind> {
        self.controllers.get(id.0).map(|c| c.kind)
    }

    /// 控件所在文件夹
    pub fn controller_folder(&self, id: ControllerId) -> Option<FolderId> {
        self.controllers.get(id.0).map(|c| c.folder)
    }

    /// 被绑定的属性名（不受 `set_name` 影响）
    pub fn controller_property(&self, id: ControllerId) -> Option<&str> {
        self.controllers.get(id.0).map(|c| c.accessor.property())
    }

    pub fn has_on_change(&self, id: ControllerId) -> bool {
        self.controllers.get(id.0).map_or(false, |c| c.on_change.is_some())
    }

    /// 编辑结束（拖动松开、输入框失焦）时调用，触发编辑完成回调
    pub fn finish_change(&self, id: ControllerId) {
        let Some(node) = self.controllers.get(id.0) else {
            return;
        };
        if let (Some(callback), Some(value)) = (node.on_finish_change.clone(), node.accessor.read()) {
            callback(&value);
        }
    }

    /// 缩进文本形式的控件树
    ///
    /// ```text
    /// [-] Controls
    ///   [+] camera
    ///     [-] position
    ///       x = 0
    /// ```
    pub fn outline(&self) -> String {
        let mut out = String::new();
        self.outline_folder(&mut out, self.root(), 0);
        out
    }

    fn outline_folder(&self, out: &mut String, folder: FolderId, depth: usize) {
        let node = &self.folders[folder.0];
        let marker = if node.closed { "[+]" } else { "[-]" };
        let _ = writeln!(out, "{:indent$}{} {}", "", marker, node.title, indent = depth * 2);
        for child in &node.children {
            match *child {
                Child::Folder(f) => self.outline_folder(out, f, depth + 1),
                Child::Controller(c) => {
                    let controller = &self.controllers[c.0];
                    let value = controller
                        .accessor
                        .read()
                        .map_or_else(|| "<unbound>".to_string(), |v| v.to_string());
                    let _ = writeln!(
                        out,
                        "{:indent$}{} = {}",
                        "",
                        controller.name,
                        value,
                        indent = (depth + 1) * 2
                    );
                }
            }
        }
    }

    fn folder_mut(&mut self, folder: FolderId) -> GuiResult<&mut FolderNode> {
        self.folders
            .get_mut(folder.0)
            .ok_or_else(|| GuiError::UnknownNode(format!("folder #{}", folder.0)))
    }

    fn controller_mut(&mut self, id: ControllerId) -> GuiResult<&mut ControllerNode> {
        self.controllers
            .get_mut(id.0)
            .ok_or_else(|| GuiError::UnknownNode(format!("controller #{}", id.0)))
    }

    fn push_controller(
        &mut self,
        parent: FolderId,
        kind: ControllerKind,
        accessor: Box<dyn Accessor>,
    ) -> GuiResult<ControllerId> {
        let id = ControllerId(self.controllers.len());
        self.folder_mut(parent)?.children.push(Child::Controller(id));
        if accessor.read().is_none() {
            tracing::debug!(target: "gui::tree", "Controller '{}' is bound to a missing property", accessor.property());
        }
        self.controllers.push(ControllerNode {
            name: accessor.property().to_string(),
            kind,
            folder: parent,
            accessor,
            on_change: None,
            on_finish_change: None,
        });
        Ok(id)
    }
}

impl ControlSurface for ControlTree {
    fn root(&self) -> FolderId {
        FolderId(0)
    }

    fn add_folder(&mut self, parent: FolderId, title: &str) -> GuiResult<FolderId> {
        let id = FolderId(self.folders.len());
        self.folder_mut(parent)?.children.push(Child::Folder(id));
        self.folders.push(FolderNode {
            title: title.to_string(),
            parent: Some(parent),
            children: Vec::new(),
            closed: false,
        });
        tracing::debug!(target: "gui::tree", "Folder '{}' created under #{}", title, parent.0);
        Ok(id)
    }

    fn find_folder(&self, parent: FolderId, title: &str) -> Option<FolderId> {
        self.folders.get(parent.0)?.children.iter().find_map(|child| match *child {
            Child::Folder(f) if self.folders[f.0].title == title => Some(f),
            _ => None,
        })
    }

    fn add_numeric(
        &mut self,
        parent: FolderId,
        accessor: Box<dyn Accessor>,
        range: NumberRange,
    ) -> GuiResult<ControllerId> {
        range.validate()?;
        self.push_controller(parent, ControllerKind::Numeric(range), accessor)
    }

    fn add_color(
        &mut self,
        parent: FolderId,
        accessor: Box<dyn Accessor>,
    ) -> GuiResult<ControllerId> {
        self.push_controller(parent, ControllerKind::Color, accessor)
    }

    fn set_name(&mut self, id: ControllerId, name: &str) -> GuiResult<()> {
        self.controller_mut(id)?.name = name.to_string();
        Ok(())
    }

    fn set_on_change(&mut self, id: ControllerId, callback: ChangeCallback) -> GuiResult<()> {
        self.controller_mut(id)?.on_change = Some(callback);
        Ok(())
    }

    fn set_on_finish_change(
        &mut self,
        id: ControllerId,
        callback: ChangeCallback,
    ) -> GuiResult<()> {
        self.controller_mut(id)?.on_finish_change = Some(callback);
        Ok(())
    }

    fn children(&self, folder: FolderId) -> Vec<Child> {
        self.folders
            .get(folder.0)
            .map(|f| f.children.clone())
            .unwrap_or_default()
    }

    fn set_closed(&mut self, folder: FolderId, closed: bool) -> GuiResult<()> {
        self.folder_mut(folder)?.closed = closed;
        Ok(())
    }

    fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    fn folder_title(&self, folder: FolderId) -> Option<&str> {
        self.folders.get(folder.0).map(|f| f.title.as_str())
    }

    fn controller_name(&self, id: ControllerId) -> Option<&str> {
        self.controllers.get(id.0).map(|c| c.name.as_str())
    }

    fn read_value(&self, id: ControllerId) -> Option<Value> {
        self.controllers.get(id.0)?.accessor.read()
    }

    fn set_value(&mut self, id: ControllerId, value: Value) -> GuiResult<bool> {
        let node = self.controller_mut(id)?;
        let value = match node.kind {
            ControllerKind::Numeric(range) => match value.as_number() {
                Some(n) => Value::Number(range.apply(n)),
                None => return Ok(false),
            },
            ControllerKind::Color => match value.as_color() {
                Some(c) => Value::Color(c),
                None => return Ok(false),
            },
        };

        if !node.accessor.write(value.clone()) {
            return Ok(false);
        }
        // 回调在写入之后触发，此时目标已释放借用
        if let Some(callback) = node.on_change.clone() {
            callback(&value);
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::{target, Color, FieldAccessor, PropertyBag};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn numeric(tree: &mut ControlTree, bag: &Rc<RefCell<PropertyBag>>, prop: &str, range: NumberRange) -> ControllerId {
        let root = tree.root();
        tree.add_numeric(root, Box::new(FieldAccessor::new(bag.clone(), prop)), range)
            .unwrap()
    }

    #[test]
    fn test_find_folder_returns_first_match() {
        let mut tree = ControlTree::new();
        let root = tree.root();
        let first = tree.add_folder(root, "camera").unwrap();
        let _dup = tree.add_folder(root, "camera").unwrap();
        assert_eq!(tree.find_folder(root, "camera"), Some(first));
        assert_eq!(tree.find_folder(root, "light"), None);
        assert_eq!(tree.find_folder(first, "camera"), None);
    }

    #[test]
    fn test_invalid_range_is_rejected() {
        let mut tree = ControlTree::new();
        let bag = target(PropertyBag::new().with("x", 0.0));
        let root = tree.root();
        let result = tree.add_numeric(
            root,
            Box::new(FieldAccessor::new(bag, "x")),
            NumberRange::between(2.0, -2.0),
        );
        assert_eq!(result, Err(GuiError::InvalidRange { min: 2.0, max: -2.0 }));
        assert_eq!(tree.controller_count(), 0);
        assert!(tree.children(root).is_empty());
    }

    #[test]
    fn test_set_value_clamps_and_fires_own_callback() {
        let mut tree = ControlTree::new();
        let bag = target(PropertyBag::new().with("x", 0.0).with("y", 0.0));
        let x = numeric(&mut tree, &bag, "x", NumberRange::between(-2.0, 2.0));
        let y = numeric(&mut tree, &bag, "y", NumberRange::unbounded());

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        tree.set_on_change(x, Rc::new(move |v: &Value| sink.borrow_mut().push(v.clone())))
            .unwrap();

        assert_eq!(tree.set_value(x, Value::Number(5.0)), Ok(true));
        assert_eq!(tree.set_value(y, Value::Number(5.0)), Ok(true));
        assert_eq!(tree.set_value(x, Value::Bool(true)), Ok(false));

        assert_eq!(bag.borrow().number("x"), Some(2.0));
        assert_eq!(bag.borrow().number("y"), Some(5.0));
        assert_eq!(*seen.borrow(), vec![Value::Number(2.0)]);
    }

    #[test]
    fn test_set_value_writes_clean_stepped_value() {
        let mut tree = ControlTree::new();
        let bag = target(PropertyBag::new().with("x", 0.0).with("y", 0.0));
        let x = numeric(&mut tree, &bag, "x", NumberRange::unbounded().step(0.1));
        let y = numeric(&mut tree, &bag, "y", NumberRange::between(0.1, 1.0).step(0.25));

        tree.set_value(x, Value::Number(0.3)).unwrap();
        tree.set_value(y, Value::Number(0.35)).unwrap();

        assert_eq!(bag.borrow().number("x"), Some(0.3));
        assert_eq!(bag.borrow().number("y"), Some(0.25));
        assert_eq!(tree.outline(), "[-] Controls\n  x = 0.3\n  y = 0.25\n");
    }

    #[test]
    fn test_finish_change_reports_current_value() {
        let mut tree = ControlTree::new();
        let bag = target(PropertyBag::new().with("x", 0.0));
        let x = numeric(&mut tree, &bag, "x", NumberRange::between(-1.0, 1.0));

        // 没有回调时只是空操作
        tree.finish_change(x);
        tree.finish_change(ControllerId(9));

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        tree.set_on_finish_change(x, Rc::new(move |v: &Value| sink.borrow_mut().push(v.clone())))
            .unwrap();

        tree.set_value(x, Value::Number(0.25)).unwrap();
        tree.set_value(x, Value::Number(3.0)).unwrap();
        assert!(seen.borrow().is_empty());

        tree.finish_change(x);
        assert_eq!(*seen.borrow(), vec![Value::Number(1.0)]);
    }

    #[test]
    fn test_callback_can_read_target() {
        let mut tree = ControlTree::new();
        let bag = target(PropertyBag::new().with("x", 0.0));
        let x = numeric(&mut tree, &bag, "x", NumberRange::unbounded());

        let observed = Rc::new(RefCell::new(None));
        let (reader, out) = (bag.clone(), observed.clone());
        tree.set_on_change(x, Rc::new(move |_: &Value| {
            *out.borrow_mut() = reader.borrow().number("x");
        }))
        .unwrap();

        tree.set_value(x, Value::Number(1.5)).unwrap();
        assert_eq!(*observed.borrow(), Some(1.5));
    }

    #[test]
    fn test_color_accepts_hex_text() {
        let mut tree = ControlTree::new();
        let bag = target(PropertyBag::new().with("color", Color::WHITE));
        let root = tree.root();
        let id = tree
            .add_color(root, Box::new(FieldAccessor::new(bag.clone(), "color")))
            .unwrap();

        assert_eq!(tree.set_value(id, Value::Text("#000000".into())), Ok(true));
        assert_eq!(tree.read_value(id), Some(Value::Color(Color::BLACK)));
    }

    #[test]
    fn test_unknown_node() {
        let mut tree = ControlTree::new();
        assert!(matches!(
            tree.set_name(ControllerId(7), "x"),
            Err(GuiError::UnknownNode(_))
        ));
        assert!(tree.set_closed(FolderId(3), true).is_err());
        assert!(tree.children(FolderId(3)).is_empty());
    }

    #[test]
    fn test_outline() {
        let mut tree = ControlTree::new();
        let root = tree.root();
        let camera = tree.add_folder(root, "camera").unwrap();
        let bag = target(PropertyBag::new().with("x", 0.5));
        tree.add_numeric(camera, Box::new(FieldAccessor::new(bag.clone(), "x")), NumberRange::unbounded())
            .unwrap();
        tree.add_numeric(camera, Box::new(FieldAccessor::new(bag, "gone")), NumberRange::unbounded())
            .unwrap();
        tree.set_closed(camera, true).unwrap();

        assert_eq!(
            tree.outline(),
            "[-] Controls\n  [+] camera\n    x = 0.5\n    gone = <unbound>\n"
        );
        assert_eq!(tree.folder_path(camera), vec!["camera".to_string()]);
        assert!(tree.folder_path(root).is_empty());
    }
}

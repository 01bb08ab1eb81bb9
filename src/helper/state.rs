//! 控件值的保存与恢复
//!
//! 结构与控件树一致：每层按控件名保存值，按文件夹标题嵌套子层。
//! 同名控件只保留最后一个，同名文件夹合并。

use crate::binding::Value;
use crate::core::{GuiError, GuiResult};
use crate::ui::{Child, ControlSurface, FolderId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 控件值快照
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GuiState {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub controllers: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub folders: BTreeMap<String, GuiState>,
}

impl GuiState {
    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty() && self.folders.is_empty()
    }

    /// 按路径查找值
    pub fn value(&self, folders: &[&str], controller: &str) -> Option<&Value> {
        let mut state = self;
        for title in folders {
            state = state.folders.get(*title)?;
        }
        state.controllers.get(controller)
    }

    pub fn to_json(&self) -> GuiResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| GuiError::State(e.to_string()))
    }

    pub fn from_json(json: &str) -> GuiResult<Self> {
        serde_json::from_str(json).map_err(|e| GuiError::State(e.to_string()))
    }
}

pub(crate) fn capture<S: ControlSurface>(surface: &S, folder: FolderId) -> GuiState {
    let mut state = GuiState::default();
    for child in surface.children(folder) {
        match child {
            Child::Controller(id) => {
                let (Some(name), Some(value)) = (surface.controller_name(id), surface.read_value(id)) else {
                    continue;
                };
                if state.controllers.insert(name.to_string(), value).is_some() {
                    tracing::warn!(target: "gui", "Duplicate controller name '{}' in saved state", name);
                }
            }
            Child::Folder(sub) => {
                let Some(title) = surface.folder_title(sub).map(str::to_owned) else {
                    continue;
                };
                let captured = capture(surface, sub);
                merge(state.folders.entry(title).or_default(), captured);
            }
        }
    }
    state
}

/// 递归合并同名文件夹；同名控件以 `from` 为准
fn merge(into: &mut GuiState, from: GuiState) {
    into.controllers.extend(from.controllers);
    for (title, nested) in from.folders {
        merge(into.folders.entry(title).or_default(), nested);
    }
}

pub(crate) fn apply<S: ControlSurface>(surface: &mut S, folder: FolderId, saved: &GuiState) -> usize {
    let mut applied = 0;
    for child in surface.children(folder) {
        match child {
            Child::Controller(id) => {
                let Some(value) = surface
                    .controller_name(id)
                    .and_then(|name| saved.controllers.get(name))
                    .cloned()
                else {
                    continue;
                };
                match surface.set_value(id, value) {
                    Ok(true) => applied += 1,
                    Ok(false) => {}
                    Err(e) => tracing::warn!(target: "gui", "Failed to restore value: {}", e),
                }
            }
            Child::Folder(sub) => {
                let nested = surface
                    .folder_title(sub)
                    .and_then(|title| saved.folders.get(title));
                if let Some(nested) = nested {
                    applied += apply(surface, sub, nested);
                }
            }
        }
    }
    applied
}

#[cfg(test)]
mod tests {
    use crate::binding::{target, Color, PropertyBag, Value};
    use crate::helper::{GuiHelper, GuiState};
    use crate::binding::FieldAccessor;
    use crate::ui::{ControlSurface, NumberRange};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_save_and_load_restore_values() {
        let cam = target(PropertyBag::new().with("x", 0.0).with("y", 0.0));
        let light = target(PropertyBag::new().with("color", Color::WHITE));
        let changes = Rc::new(RefCell::new(0));
        let counter = changes.clone();

        let mut gui = GuiHelper::new();
        gui.select(["camera", "position"])
            .add(cam.clone(), "x", NumberRange::between(-2.0, 2.0), false)
            .unwrap()
            .add(cam.clone(), "y", NumberRange::between(-2.0, 2.0), false)
            .unwrap()
            .select(["light"])
            .add_color_default(light.clone())
            .unwrap()
            .on_change_all(move |_| *counter.borrow_mut() += 1);

        cam.borrow_mut().insert("x", 1.5);
        let saved = gui.save();
        assert_eq!(saved.value(&["camera", "position"], "x"), Some(&Value::Number(1.5)));
        assert_eq!(saved.value(&["light"], "color"), Some(&Value::Color(Color::WHITE)));

        cam.borrow_mut().insert("x", -1.0);
        light.borrow_mut().insert("color", Color::BLACK);

        let restored = GuiState::from_json(&saved.to_json().unwrap()).unwrap();
        assert_eq!(restored, saved);
        assert_eq!(gui.load(&restored), 3);
        assert_eq!(cam.borrow().number("x"), Some(1.5));
        assert_eq!(light.borrow().get("color"), Some(&Value::Color(Color::WHITE)));
        assert_eq!(*changes.borrow(), 3);
    }

    #[test]
    fn test_load_ignores_unknown_entries() {
        let cam = target(PropertyBag::new().with("x", 0.0));
        let mut gui = GuiHelper::new();
        gui.add(cam.clone(), "x", NumberRange::unbounded(), false)
            .unwrap();

        let mut state = GuiState::default();
        state.controllers.insert("nope".into(), Value::Number(3.0));
        state.folders.insert("ghost".into(), GuiState::default());
        state.controllers.insert("x".into(), Value::Bool(true));

        assert_eq!(gui.load(&state), 0);
        assert_eq!(cam.borrow().number("x"), Some(0.0));
        assert!(GuiState::from_json("[1, 2").is_err());
        assert!(GuiState::default().is_empty());
    }

    #[test]
    fn test_duplicate_folder_titles_merge_recursively() {
        let values = target(PropertyBag::new().with("a", 1.0).with("b", 2.0));
        let mut gui = GuiHelper::new();
        let tree = gui.surface_mut();
        let root = tree.root();
        for prop in ["a", "b"] {
            let cam = tree.add_folder(root, "cam").unwrap();
            let sub = tree.add_folder(cam, "sub").unwrap();
            tree.add_numeric(
                sub,
                Box::new(FieldAccessor::new(values.clone(), prop)),
                NumberRange::unbounded(),
            )
            .unwrap();
        }

        let saved = gui.save();
        assert_eq!(saved.value(&["cam", "sub"], "a"), Some(&Value::Number(1.0)));
        assert_eq!(saved.value(&["cam", "sub"], "b"), Some(&Value::Number(2.0)));
        assert_eq!(saved.folders.len(), 1);
    }
}

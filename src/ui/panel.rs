//! egui 控件面板
//!
//! 每帧把 [`ControlTree`] 画成一个 egui 窗口：文件夹是可折叠标题，
//! 有上下限的数值控件是滑条，否则是拖动数值框，颜色控件是取色按钮。
//! 用户编辑经 `ControlTree::set_value` 写回目标并同步触发回调。

use super::{Child, ControlSurface, ControlTree, ControllerId, ControllerKind, FolderId};
use crate::binding::{Color, Value};

/// 控件面板
pub struct ControlPanel {
    width: f32,
}

crate::impl_default!(ControlPanel { width: 245.0 });

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_width(width: f32) -> Self {
        Self { width }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    /// 绘制一帧，返回本帧是否有值被修改
    pub fn show(&self, ctx: &egui::Context, tree: &mut ControlTree) -> bool {
        if tree.is_hidden() {
            return false;
        }

        let root = tree.root();
        let mut changed = false;
        egui::Window::new("gui_helper")
            .title_bar(false)
            .resizable(false)
            .default_width(self.width)
            .anchor(egui::Align2::RIGHT_TOP, [-8.0, 8.0])
            .show(ctx, |ui| {
                changed = Self::folder(ui, tree, root);
            });
        changed
    }

    fn folder(ui: &mut egui::Ui, tree: &mut ControlTree, folder: FolderId) -> bool {
        let title = tree.folder_title(folder).unwrap_or_default().to_owned();
        let open = !tree.is_closed(folder);

        let response = egui::CollapsingHeader::new(title)
            .id_source(("gui_helper_folder", folder.index()))
            .open(Some(open))
            .show(ui, |ui| Self::folder_contents(ui, tree, folder));

        if response.header_response.clicked() {
            Self::set_closed(tree, folder, open);
        }
        response.body_returned.unwrap_or(false)
    }

    fn set_closed(tree: &mut ControlTree, folder: FolderId, closed: bool) {
        if let Err(e) = tree.set_closed(folder, closed) {
            tracing::warn!(target: "gui", "Failed to toggle folder: {}", e);
        }
    }

    fn folder_contents(ui: &mut egui::Ui, tree: &mut ControlTree, folder: FolderId) -> bool {
        let mut changed = false;
        for child in tree.children(folder) {
            changed |= match child {
                Child::Folder(f) => Self::folder(ui, tree, f),
                Child::Controller(c) => Self::controller(ui, tree, c),
            };
        }
        changed
    }

    fn controller(ui: &mut egui::Ui, tree: &mut ControlTree, id: ControllerId) -> bool {
        let (Some(name), Some(kind)) = (
            tree.controller_name(id).map(str::to_owned),
            tree.controller_kind(id),
        ) else {
            return false;
        };
        let current = tree.read_value(id);

        let mut changed = false;
        ui.horizontal(|ui| {
            ui.label(name);
            match (kind, current) {
                (ControllerKind::Numeric(range), Some(Value::Number(value))) => {
                    let mut edited = value;
                    let response = match (range.min, range.max) {
                        (Some(min), Some(max)) => {
                            let mut slider = egui::Slider::new(&mut edited, min..=max);
                            if let Some(step) = range.step {
                                slider = slider.step_by(step);
                            }
                            ui.add(slider)
                        }
                        _ => ui.add(egui::DragValue::new(&mut edited).speed(range.step.unwrap_or(0.01))),
                    };
                    if response.changed() {
                        changed = tree.set_value(id, Value::Number(edited)).unwrap_or(false);
                    }
                    if response.drag_stopped() || response.lost_focus() {
                        tree.finish_change(id);
                    }
                }
                (ControllerKind::Color, Some(Value::Color(color))) => {
                    let mut rgba = color.to_array();
                    let response = ui.color_edit_button_rgba_unmultiplied(&mut rgba);
                    // 取色器没有明确的"松开"时刻，每次修改都算一次完成
                    if response.changed() {
                        changed = tree
                            .set_value(id, Value::Color(Color::from_array(rgba)))
                            .unwrap_or(false);
                        tree.finish_change(id);
                    }
                }
                (_, Some(other)) => {
                    ui.label(other.to_string());
                }
                (_, None) => {
                    ui.weak("unbound");
                }
            }
        });
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::{target, FieldAccessor, PropertyBag};
    use crate::ui::NumberRange;

    fn run_frame(panel: &ControlPanel, tree: &mut ControlTree) -> bool {
        let ctx = egui::Context::default();
        let mut changed = false;
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            changed = panel.show(ctx, tree);
        });
        changed
    }

    fn sample_tree() -> ControlTree {
        let mut tree = ControlTree::new();
        let root = tree.root();
        let camera = tree.add_folder(root, "camera").unwrap();
        let bag = target(
            PropertyBag::new()
                .with("x", 0.0)
                .with("fov", 1.0)
                .with("color", Color::WHITE),
        );
        tree.add_numeric(camera, Box::new(FieldAccessor::new(bag.clone(), "x")), NumberRange::between(-2.0, 2.0))
            .unwrap();
        tree.add_numeric(camera, Box::new(FieldAccessor::new(bag.clone(), "fov")), NumberRange::unbounded())
            .unwrap();
        tree.add_color(camera, Box::new(FieldAccessor::new(bag.clone(), "color")))
            .unwrap();
        tree.add_numeric(root, Box::new(FieldAccessor::new(bag, "missing")), NumberRange::unbounded())
            .unwrap();
        tree
    }

    #[test]
    fn test_frame_without_input_changes_nothing() {
        let mut tree = sample_tree();
        let panel = ControlPanel::new();
        assert!(!run_frame(&panel, &mut tree));
        assert!(!tree.is_closed(tree.root()));
    }

    #[test]
    fn test_hidden_tree_draws_no_window() {
        let mut tree = sample_tree();
        tree.set_hidden(true);
        let ctx = egui::Context::default();
        let output = ctx.run(egui::RawInput::default(), |ctx| {
            ControlPanel::with_width(300.0).show(ctx, &mut tree);
        });
        assert!(output.shapes.is_empty());
    }

    #[test]
    fn test_closed_folders_still_render() {
        let mut tree = sample_tree();
        let root = tree.root();
        for child in tree.children(root) {
            if let Child::Folder(f) = child {
                tree.set_closed(f, true).unwrap();
            }
        }
        assert!(!run_frame(&ControlPanel::new(), &mut tree));
    }

    #[test]
    fn test_toggle_unknown_folder_is_logged_not_fatal() {
        let mut tree = sample_tree();
        let before = tree.outline();
        ControlPanel::set_closed(&mut tree, FolderId(42), true);
        assert_eq!(tree.outline(), before);

        let root = tree.root();
        ControlPanel::set_closed(&mut tree, root, true);
        assert!(tree.is_closed(root));
    }
}

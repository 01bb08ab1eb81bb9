//! 相机控制演示
//!
//! 把相机位置与观察点的 `x`/`y`/`z` 绑定到滑条，
//! 每次变化都把完整的相机参数推给 [`CameraSink`]。

use crate::binding::{target, Value};
use crate::config::LoggingConfig;
use crate::core::GuiResult;
use crate::helper::GuiHelper;
use crate::ui::{ControlSurface, NumberRange};
use glam::Vec3;
use std::cell::RefCell;
use std::rc::Rc;

/// 相机参数的接收方（渲染模块的 `set_camera`）
pub trait CameraSink {
    fn set_camera(&self, eye: Vec3, at: Vec3);
}

/// 只打日志的接收方
pub struct LoggingCamera;

impl CameraSink for LoggingCamera {
    fn set_camera(&self, eye: Vec3, at: Vec3) {
        tracing::info!(target: "demo", "set_camera eye={:?} at={:?}", eye, at);
    }
}

/// 演示程序持有的相机状态
pub struct CameraControls {
    pub position: Rc<RefCell<Vec3>>,
    pub look_at: Rc<RefCell<Vec3>>,
}

/// 在 `camera/position` 与 `camera/looking at` 下创建六个滑条
///
/// 创建前先推送一次初始相机参数。
pub fn build_camera_controls<S: ControlSurface>(
    gui: &mut GuiHelper<S>,
    sink: Rc<dyn CameraSink>,
) -> GuiResult<CameraControls> {
    let position = target(Vec3::new(0.0, 0.0, 1.0));
    let look_at = target(Vec3::ZERO);

    let push: Rc<dyn Fn()> = {
        let (position, look_at) = (position.clone(), look_at.clone());
        Rc::new(move || sink.set_camera(*position.borrow(), *look_at.borrow()))
    };
    push();
    let on_change = |push: &Rc<dyn Fn()>| {
        let push = Rc::clone(push);
        move |_: &Value| push()
    };

    gui.select(["camera", "position"])
        .add(position.clone(), "x", NumberRange::between(-2.0, 2.0), false)?
        .on_change(on_change(&push))
        .add(position.clone(), "y", NumberRange::between(-2.0, 2.0), false)?
        .on_change(on_change(&push))
        .add(position.clone(), "z", NumberRange::between(0.5, 2.0), false)?
        .on_change(on_change(&push));

    gui.select(["camera", "looking at"])
        .add(look_at.clone(), "x", NumberRange::between(-2.0, 2.0), false)?
        .on_change(on_change(&push))
        .add(look_at.clone(), "y", NumberRange::between(-2.0, 2.0), false)?
        .on_change(on_change(&push))
        .add(look_at.clone(), "z", NumberRange::between(-0.5, 2.0), false)?
        .on_change(on_change(&push));

    Ok(CameraControls { position, look_at })
}

/// 初始化日志系统
///
/// `RUST_LOG` 优先，未设置时使用配置中的级别。
pub fn initialize_logging(config: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(config.level.as_filter()));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingCamera {
        calls: RefCell<Vec<(Vec3, Vec3)>>,
    }

    impl CameraSink for RecordingCamera {
        fn set_camera(&self, eye: Vec3, at: Vec3) {
            self.calls.borrow_mut().push((eye, at));
        }
    }

    #[test]
    fn test_camera_controls_push_on_every_change() {
        let sink = Rc::new(RecordingCamera::default());
        let mut gui = GuiHelper::new();
        let controls = build_camera_controls(&mut gui, sink.clone()).unwrap();

        assert_eq!(*sink.calls.borrow(), vec![(Vec3::Z, Vec3::ZERO)]);
        assert_eq!(gui.controllers().len(), 6);

        let ids = gui.controllers().to_vec();
        gui.surface_mut().set_value(ids[0], Value::Number(1.0)).unwrap();
        gui.surface_mut().set_value(ids[5], Value::Number(9.0)).unwrap();

        assert_eq!(*controls.position.borrow(), Vec3::new(1.0, 0.0, 1.0));
        assert_eq!(*controls.look_at.borrow(), Vec3::new(0.0, 0.0, 2.0));
        assert_eq!(
            sink.calls.borrow().last(),
            Some(&(Vec3::new(1.0, 0.0, 1.0), Vec3::new(0.0, 0.0, 2.0)))
        );
        assert_eq!(sink.calls.borrow().len(), 3);
    }
}

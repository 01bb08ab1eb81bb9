use gui_helper::config::{ConfigOrigin, GuiConfig};
use gui_helper::demo::{build_camera_controls, initialize_logging, LoggingCamera};
use gui_helper::prelude::*;
use std::rc::Rc;

fn main() {
    if let Err(e) = run() {
        eprintln!("Demo failed: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (mut config, origin) = GuiConfig::load_or_default();
    config.apply_env_overrides();
    initialize_logging(&config.logging);
    match origin {
        ConfigOrigin::File(path) => tracing::info!(target: "demo", "Loaded config from {:?}", path),
        ConfigOrigin::Default => tracing::info!(target: "demo", "Using default configuration"),
    }
    config.validate()?;

    let mut gui = GuiHelper::from_config(&config);
    let camera = build_camera_controls(&mut gui, Rc::new(LoggingCamera))?;
    if config.panel.close_folders {
        gui.close_all();
    }

    // 模拟两次拖动
    let ids = gui.controllers().to_vec();
    if let (Some(&first), Some(&last)) = (ids.first(), ids.last()) {
        gui.surface_mut().set_value(first, Value::Number(1.25))?;
        gui.surface_mut().set_value(last, Value::Number(0.75))?;
    }

    // 无窗口地跑一帧 egui
    let ctx = egui::Context::default();
    let panel = ControlPanel::with_width(config.panel.width);
    let output = ctx.run(egui::RawInput::default(), |ctx| {
        panel.show(ctx, gui.surface_mut());
    });
    tracing::debug!(target: "demo", "Panel produced {} shapes", output.shapes.len());

    println!("{}", gui.surface().outline());
    println!("{}", gui.save().to_json()?);
    tracing::info!(
        target: "demo",
        "Final camera eye={:?} at={:?}",
        *camera.position.borrow(),
        *camera.look_at.borrow()
    );
    Ok(())
}

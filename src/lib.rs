//! # GUI Helper
//!
//! A chainable debug-GUI helper for graphics demos: bind object properties to
//! sliders and color pickers grouped in folders, then drive them with egui.
//!
//! ## Features
//!
//! - **Fluent binding**: select a folder path once, then add controllers to it in a chain
//! - **Deferred folders**: missing folders are created on first use, never duplicated
//! - **Degree views**: edit radian properties in degrees
//! - **Callbacks**: change and finish-change hooks for the last or all controllers
//! - **Snapshots**: save and restore controller values as JSON
//! - **egui panel**: draw the control tree each frame
//!
//! ## Architecture Design
//!
//! - **Surface** (`ui::ControlSurface`): the widget library capability set
//! - **Tree** (`ui::ControlTree`): in-memory folders and controllers
//! - **Helper** (`helper::GuiHelper`): the session object owned by the demo
//!
//! ### Example
//!
//! ```rust
//! use gui_helper::prelude::*;
//!
//! # fn main() -> GuiResult<()> {
//! let values = target(PropertyBag::new().with("x", 0.0).with("y", 1.0).with("z", 0.5));
//!
//! let mut gui = GuiHelper::new();
//! gui.select(["folder1"])
//!     .add(values.clone(), "x", NumberRange::unbounded(), false)?
//!     .add(values.clone(), "y", NumberRange::between(0.0, 100.0), false)?
//!     .add(values.clone(), "z", NumberRange::between(-10.0, 10.0).step(0.1), false)?
//!     .on_change(|v| println!("z = {v}"))
//!     .close_all();
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`binding`]: property access (`Reflect`, `Accessor`, `DegreeView`)
//! - [`ui`]: control tree and egui panel
//! - [`helper`]: the chainable facade and state snapshots
//! - [`config`]: configuration loading
//! - [`demo`]: camera controls wiring

/// Core error types and macros
pub mod core;
/// Property binding between controllers and target objects
pub mod binding;
/// Control tree and egui rendering
pub mod ui;
/// Chainable control binding facade
pub mod helper;
/// Configuration system
pub mod config;
/// Camera controls demo wiring
pub mod demo;

/// Commonly used items
pub mod prelude {
    pub use crate::binding::{target, Color, PropertyBag, Reflect, Target, Value};
    pub use crate::core::{GuiError, GuiResult};
    pub use crate::helper::{GuiHelper, GuiState};
    pub use crate::ui::{ControlPanel, ControlSurface, ControlTree, NumberRange};
}

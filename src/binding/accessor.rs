//! 单个属性的读写句柄

use super::{Target, Value};
use glam::Vec3;
use std::f64::consts::PI;

/// 控件与被绑定属性之间的读写接口
pub trait Accessor {
    /// 属性名，作为控件的默认显示名
    fn property(&self) -> &str;

    /// 读取当前值；目标缺失、属性缺失或目标正被借用时返回 `None`
    fn read(&self) -> Option<Value>;

    /// 写入新值，成功返回 `true`
    fn write(&self, value: Value) -> bool;
}

/// 直接读写 `target[property]`
pub struct FieldAccessor {
    target: Target,
    property: String,
}

impl FieldAccessor {
    pub fn new(target: Target, property: impl Into<String>) -> Self {
        Self {
            target,
            property: property.into(),
        }
    }
}

impl Accessor for FieldAccessor {
    fn property(&self) -> &str {
        &self.property
    }

    fn read(&self) -> Option<Value> {
        self.target.try_borrow().ok()?.field(&self.property)
    }

    fn write(&self, value: Value) -> bool {
        match self.target.try_borrow_mut() {
            Ok(mut target) => target.set_field(&self.property, value),
            Err(_) => {
                tracing::warn!(target: "gui", "Target of '{}' is borrowed, write skipped", self.property);
                false
            }
        }
    }
}

/// 向量分量
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn name(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "x" => Some(Axis::X),
            "y" => Some(Axis::Y),
            "z" => Some(Axis::Z),
            _ => None,
        }
    }

    pub fn get(self, v: Vec3) -> f32 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
            Axis::Z => v.z,
        }
    }

    pub fn set(self, v: &mut Vec3, value: f32) {
        match self {
            Axis::X => v.x = value,
            Axis::Y => v.y = value,
            Axis::Z => v.z = value,
        }
    }
}

/// 读写 `target[property].{x,y,z}`
///
/// 向量字段按值读出，修改一个分量后整体写回。
pub struct ComponentAccessor {
    target: Target,
    property: String,
    axis: Axis,
}

impl ComponentAccessor {
    pub fn new(target: Target, property: impl Into<String>, axis: Axis) -> Self {
        Self {
            target,
            property: property.into(),
            axis,
        }
    }

    /// 向量字段名（`property()` 返回的是分量名）
    pub fn vector_property(&self) -> &str {
        &self.property
    }

    fn vector(&self) -> Option<Vec3> {
        self.target.try_borrow().ok()?.field(&self.property)?.as_vector()
    }
}

impl Accessor for ComponentAccessor {
    fn property(&self) -> &str {
        self.axis.name()
    }

    fn read(&self) -> Option<Value> {
        self.vector()
            .map(|v| Value::Number(self.axis.get(v) as f64))
    }

    fn write(&self, value: Value) -> bool {
        let (Some(mut v), Some(n)) = (self.vector(), value.as_number()) else {
            return false;
        };
        self.axis.set(&mut v, n as f32);
        match self.target.try_borrow_mut() {
            Ok(mut target) => target.set_field(&self.property, Value::Vector(v)),
            Err(_) => false,
        }
    }
}

/// 弧度属性的角度视图
///
/// 读时乘 180/π，写时乘 π/180：控件显示和编辑角度，底层属性保持弧度。
pub struct DegreeView {
    inner: Box<dyn Accessor>,
}

impl DegreeView {
    pub fn new(inner: Box<dyn Accessor>) -> Self {
        Self { inner }
    }
}

impl Accessor for DegreeView {
    fn property(&self) -> &str {
        self.inner.property()
    }

    fn read(&self) -> Option<Value> {
        let radians = self.inner.read()?.as_number()?;
        Some(Value::Number(radians * 180.0 / PI))
    }

    fn write(&self, value: Value) -> bool {
        match value.as_number() {
            Some(degrees) => self.inner.write(Value::Number(degrees * PI / 180.0)),
            None => false,
        }
    }
}

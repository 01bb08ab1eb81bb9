//! 属性绑定模块
//!
//! 控件绑定到"目标对象 + 属性名"。目标对象通过 [`Reflect`] 按名称读写字段，
//! 控件通过 [`Accessor`] 访问单个属性：
//!
//! - [`FieldAccessor`]: 直接读写一个字段
//! - [`ComponentAccessor`]: 读写向量字段的 `x` / `y` / `z` 分量
//! - [`DegreeView`]: 弧度属性的角度视图（读时 ×180/π，写时 ×π/180）
//!
//! 缺失的目标或属性不会报错：读取返回 `None`，写入返回 `false`。

pub mod accessor;

pub use accessor::{Accessor, Axis, ComponentAccessor, DegreeView, FieldAccessor};

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// 可绑定的目标对象，在演示程序与控件之间共享
pub type Target = Rc<RefCell<dyn Reflect>>;

/// 包装一个值，得到可以交给 `GuiHelper` 绑定的共享目标
///
/// 返回具体类型，调用方保留它以读取最新值；传给 `GuiHelper` 时
/// `Rc<RefCell<T>>` 会自动转换为 [`Target`]。
pub fn target<T: Reflect + 'static>(value: T) -> Rc<RefCell<T>> {
    Rc::new(RefCell::new(value))
}

/// 按名称读写字段
pub trait Reflect {
    /// 读取字段，不存在时返回 `None`
    fn field(&self, name: &str) -> Option<Value>;

    /// 写入字段；字段不存在或类型不匹配时返回 `false`
    fn set_field(&mut self, name: &str, value: Value) -> bool;

    /// 字段名列表（按声明顺序）
    fn field_names(&self) -> Vec<String>;
}

/// 控件读写的动态值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    Number(f64),
    Bool(bool),
    Text(String),
    Vector(Vec3),
    Color(Color),
}

impl Value {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_vector(&self) -> Option<Vec3> {
        match self {
            Value::Vector(v) => Some(*v),
            _ => None,
        }
    }

    /// 颜色值；`#rrggbb` 形式的文本也按颜色解析
    pub fn as_color(&self) -> Option<Color> {
        match self {
            Value::Color(c) => Some(*c),
            Value::Text(s) => Color::from_hex(s),
            _ => None,
        }
    }

    /// 值的类型名，用于日志
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Bool(_) => "bool",
            Value::Text(_) => "text",
            Value::Vector(_) => "vector",
            Value::Color(_) => "color",
        }
    }

    /// 两个值是否为同一种类型
    pub fn same_kind(&self, other: &Value) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Text(s) => write!(f, "{:?}", s),
            Value::Vector(v) => write!(f, "({}, {}, {})", v.x, v.y, v.z),
            Value::Color(c) => write!(f, "{}", c.to_hex()),
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Number(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Number(v as f64)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Number(v as f64)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<Vec3> for Value {
    fn from(v: Vec3) -> Self {
        Value::Vector(v)
    }
}

impl From<Color> for Value {
    fn from(v: Color) -> Self {
        Value::Color(v)
    }
}

// 转换失败时原样返回输入值
impl TryFrom<Value> for f64 {
    type Error = Value;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        value.as_number().ok_or(value)
    }
}

impl TryFrom<Value> for f32 {
    type Error = Value;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        value.as_number().map(|n| n as f32).ok_or(value)
    }
}

impl TryFrom<Value> for bool {
    type Error = Value;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(other),
        }
    }
}

impl TryFrom<Value> for String {
    type Error = Value;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Text(s) => Ok(s),
            other => Err(other),
        }
    }
}

impl TryFrom<Value> for Vec3 {
    type Error = Value;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        value.as_vector().ok_or(value)
    }
}

impl TryFrom<Value> for Color {
    type Error = Value;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        value.as_color().ok_or(value)
    }
}

/// RGBA 颜色，分量范围 `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

crate::impl_default!(Color {
    r: 1.0,
    g: 1.0,
    b: 1.0,
    a: 1.0,
});

impl Color {
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// 从 `0xRRGGBB` 整数创建
    pub fn from_u32(hex: u32) -> Self {
        let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
        Self::rgb(channel(16), channel(8), channel(0))
    }

    /// 解析 `#rrggbb` 或 `#rgb`（`#` 可省略）
    pub fn from_hex(s: &str) -> Option<Self> {
        let digits = s.trim().trim_start_matches('#');
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        match digits.len() {
            6 => u32::from_str_radix(digits, 16).ok().map(Self::from_u32),
            3 => {
                let expanded: String = digits.chars().flat_map(|c| [c, c]).collect();
                u32::from_str_radix(&expanded, 16).ok().map(Self::from_u32)
            }
            _ => None,
        }
    }

    /// 输出 `#rrggbb`（忽略 alpha）
    pub fn to_hex(&self) -> String {
        let byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("#{:02x}{:02x}{:02x}", byte(self.r), byte(self.g), byte(self.b))
    }

    pub fn to_array(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn from_array(rgba: [f32; 4]) -> Self {
        Self::rgba(rgba[0], rgba[1], rgba[2], rgba[3])
    }
}

/// 有序的名称-值集合，用于临时拼出一个可绑定对象
///
/// ```rust
/// use gui_helper::binding::{PropertyBag, Reflect, Value};
///
/// let bag = PropertyBag::new().with("x", 0.0).with("y", 1.0);
/// assert_eq!(bag.field("y"), Some(Value::Number(1.0)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyBag {
    entries: Vec<(String, Value)>,
}

impl PropertyBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// 链式添加字段
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// 插入或替换字段
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// 读取数值字段
    pub fn number(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Value::as_number)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Reflect for PropertyBag {
    fn field(&self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }

    fn set_field(&mut self, name: &str, value: Value) -> bool {
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some((_, slot)) if slot.same_kind(&value) => {
                *slot = value;
                true
            }
            _ => false,
        }
    }

    fn field_names(&self) -> Vec<String> {
        self.entries.iter().map(|(n, _)| n.clone()).collect()
    }
}

impl Reflect for Vec3 {
    fn field(&self, name: &str) -> Option<Value> {
        Axis::from_name(name).map(|axis| Value::Number(axis.get(*self) as f64))
    }

    fn set_field(&mut self, name: &str, value: Value) -> bool {
        match (Axis::from_name(name), value.as_number()) {
            (Some(axis), Some(n)) => {
                axis.set(self, n as f32);
                true
            }
            _ => false,
        }
    }

    fn field_names(&self) -> Vec<String> {
        Axis::ALL.iter().map(|a| a.name().to_string()).collect()
    }
}

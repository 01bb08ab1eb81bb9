//! 核心宏定义
//!
//! 提供统一的宏来减少代码重复

/// 为结构体实现Default trait的宏
///
/// 使用示例:
/// ```rust
/// struct MyStruct {
///     field1: u32,
///     field2: String,
/// }
///
/// gui_helper::impl_default!(MyStruct {
///     field1: 0,
///     field2: String::new(),
/// });
/// ```
#[macro_export]
macro_rules! impl_default {
    ($struct_name:ident {
        $($field:ident: $value:expr),* $(,)?
    }) => {
        impl Default for $struct_name {
            fn default() -> Self {
                Self {
                    $($field: $value),*
                }
            }
        }
    };
}

/// 为带命名字段的结构体实现 `Reflect`，使其字段可以按名称绑定到控件
///
/// 字段类型需实现 `Into<Value>` 与 `TryFrom<Value>`
/// （`f32`、`f64`、`bool`、`String`、`glam::Vec3`、`Color`）。
///
/// 使用示例:
/// ```rust
/// use glam::Vec3;
///
/// struct Mesh {
///     position: Vec3,
///     rotation_y: f32,
///     visible: bool,
/// }
///
/// gui_helper::reflect_struct!(Mesh { position, rotation_y, visible });
/// ```
#[macro_export]
macro_rules! reflect_struct {
    ($struct_name:ident { $($field:ident),* $(,)? }) => {
        impl $crate::binding::Reflect for $struct_name {
            fn field(&self, name: &str) -> Option<$crate::binding::Value> {
                match name {
                    $(stringify!($field) => Some($crate::binding::Value::from(self.$field.clone())),)*
                    _ => None,
                }
            }

            fn set_field(&mut self, name: &str, value: $crate::binding::Value) -> bool {
                match name {
                    $(stringify!($field) => match ::std::convert::TryFrom::try_from(value) {
                        Ok(v) => {
                            self.$field = v;
                            true
                        }
                        Err(_) => false,
                    },)*
                    _ => false,
                }
            }

            fn field_names(&self) -> Vec<String> {
                vec![$(stringify!($field).to_string()),*]
            }
        }
    };
}

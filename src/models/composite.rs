//! Delimited string encodings for composite values
//!
//! Vectors, quaternions, colors and arrays are stored as plain strings:
//!
//! - components are joined with `,` (`"1,2.5"` for a `Vec2`)
//! - colors are `RRGGBBAA` hex
//! - array elements are joined with `,` for numbers and bools, `;` for
//!   vectors, quaternions and colors, and `\0` for strings
//!
//! Reading an array never fails as a whole. Each element that does not parse
//! is replaced by the caller's default at the same index, or by the type's
//! zero value when there is none.

use glam::{Quat, Vec2, Vec3};

use super::value::{parse_bool, FromValue, IntoValue, Value};

/// A value with a string encoding that can also appear in arrays
pub trait Composite: Sized + Clone {
    /// Separator used between elements when stored in an array
    const SEPARATOR: char;

    /// Name used in conversion errors
    const TYPE_NAME: &'static str;

    fn encode(&self) -> String;

    fn decode(input: &str) -> Option<Self>;

    /// Element used when an array entry fails to parse and no default exists
    fn fallback() -> Self;
}

/// RGBA color with components in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);
    pub const CLEAR: Color = Color::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Build from 8-bit channels
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::new(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
            f32::from(a) / 255.0,
        )
    }

    /// Quantize to 8-bit channels
    pub fn to_rgba8(self) -> [u8; 4] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }

    /// Format as `RRGGBBAA`
    pub fn to_hex(self) -> String {
        let [r, g, b, a] = self.to_rgba8();
        format!("{:02X}{:02X}{:02X}{:02X}", r, g, b, a)
    }

    /// Parse `RRGGBB` or `RRGGBBAA`, with or without a leading `#`
    pub fn parse_hex(input: &str) -> Option<Self> {
        let hex = input.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.is_ascii() || (hex.len() != 6 && hex.len() != 8) {
            return None;
        }

        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        let alpha = if hex.len() == 8 { channel(6)? } else { 255 };
        Some(Self::from_rgba8(channel(0)?, channel(2)?, channel(4)?, alpha))
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::CLEAR
    }
}

fn parse_components<const N: usize>(input: &str) -> Option<[f32; N]> {
    let mut out = [0.0f32; N];
    let mut parts = input.split(',');
    for slot in out.iter_mut() {
        *slot = parts.next()?.trim().parse().ok()?;
    }
    if parts.next().is_some() {
        return None;
    }
    Some(out)
}

fn join_components(components: &[f32]) -> String {
    components
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

impl Composite for Vec2 {
    const SEPARATOR: char = ';';
    const TYPE_NAME: &'static str = "vector2";

    fn encode(&self) -> String {
        join_components(&self.to_array())
    }

    fn decode(input: &str) -> Option<Self> {
        parse_components::<2>(input).map(Vec2::from_array)
    }

    fn fallback() -> Self {
        Vec2::ZERO
    }
}

impl Composite for Vec3 {
    const SEPARATOR: char = ';';
    const TYPE_NAME: &'static str = "vector3";

    fn encode(&self) -> String {
        join_components(&self.to_array())
    }

    fn decode(input: &str) -> Option<Self> {
        parse_components::<3>(input).map(Vec3::from_array)
    }

    fn fallback() -> Self {
        Vec3::ZERO
    }
}

impl Composite for Quat {
    const SEPARATOR: char = ';';
    const TYPE_NAME: &'static str = "quaternion";

    fn encode(&self) -> String {
        join_components(&self.to_array())
    }

    fn decode(input: &str) -> Option<Self> {
        parse_components::<4>(input).map(Quat::from_array)
    }

    fn fallback() -> Self {
        Quat::IDENTITY
    }
}

impl Composite for Color {
    const SEPARATOR: char = ';';
    const TYPE_NAME: &'static str = "color";

    fn encode(&self) -> String {
        self.to_hex()
    }

    fn decode(input: &str) -> Option<Self> {
        Color::parse_hex(input)
    }

    fn fallback() -> Self {
        Color::WHITE
    }
}

impl Composite for i32 {
    const SEPARATOR: char = ',';
    const TYPE_NAME: &'static str = "integer";

    fn encode(&self) -> String {
        self.to_string()
    }

    fn decode(input: &str) -> Option<Self> {
        input.trim().parse().ok()
    }

    fn fallback() -> Self {
        0
    }
}

impl Composite for i64 {
    const SEPARATOR: char = ',';
    const TYPE_NAME: &'static str = "integer";

    fn encode(&self) -> String {
        self.to_string()
    }

    fn decode(input: &str) -> Option<Self> {
        input.trim().parse().ok()
    }

    fn fallback() -> Self {
        0
    }
}

impl Composite for f32 {
    const SEPARATOR: char = ',';
    const TYPE_NAME: &'static str = "float";

    fn encode(&self) -> String {
        self.to_string()
    }

    fn decode(input: &str) -> Option<Self> {
        input.trim().parse().ok()
    }

    fn fallback() -> Self {
        0.0
    }
}

impl Composite for bool {
    const SEPARATOR: char = ',';
    const TYPE_NAME: &'static str = "bool";

    fn encode(&self) -> String {
        self.to_string()
    }

    fn decode(input: &str) -> Option<Self> {
        parse_bool(input)
    }

    fn fallback() -> Self {
        false
    }
}

impl Composite for String {
    const SEPARATOR: char = '\0';
    const TYPE_NAME: &'static str = "string";

    fn encode(&self) -> String {
        self.clone()
    }

    fn decode(input: &str) -> Option<Self> {
        Some(input.to_string())
    }

    fn fallback() -> Self {
        String::new()
    }
}

/// Join array elements with the element type's separator
pub fn encode_array<T: Composite>(items: &[T]) -> String {
    let separator = T::SEPARATOR.to_string();
    items
        .iter()
        .map(Composite::encode)
        .collect::<Vec<_>>()
        .join(&separator)
}

/// Split and decode an array
///
/// Returns `None` for an empty string so the caller can substitute its whole
/// default array.
pub fn decode_array<T: Composite>(input: &str, defaults: Option<&[T]>) -> Option<Vec<T>> {
    if input.is_empty() {
        return None;
    }

    let items = input
        .split(T::SEPARATOR)
        .enumerate()
        .map(|(i, part)| {
            T::decode(part).unwrap_or_else(|| {
                defaults
                    .and_then(|d| d.get(i).cloned())
                    .unwrap_or_else(T::fallback)
            })
        })
        .collect();
    Some(items)
}

macro_rules! composite_value {
    ($($ty:ty),*) => {
        $(
            impl IntoValue for $ty {
                fn into_value(self) -> Value {
                    Value::String(self.encode())
                }
            }

            impl FromValue for $ty {
                const TYPE_NAME: &'static str = <$ty as Composite>::TYPE_NAME;

                fn from_value(value: &Value) -> Option<Self> {
                    match value {
                        Value::String(s) => <$ty as Composite>::decode(s),
                        _ => None,
                    }
                }
            }
        )*
    };
}

composite_value!(Vec2, Vec3, Quat, Color);

impl<T: Composite> IntoValue for Vec<T> {
    fn into_value(self) -> Value {
        Value::String(encode_array(&self))
    }
}

impl<T: Composite> FromValue for Vec<T> {
    const TYPE_NAME: &'static str = "array";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(decode_array(s, None).unwrap_or_default()),
            _ => None,
        }
    }
}

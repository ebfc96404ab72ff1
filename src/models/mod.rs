//! Core data models for SaveVault
//!
//! This module contains the value types stored in a save slot:
//! - `Value`: the four JSON scalars a slot holds
//! - `Composite`: string encodings for vectors, quaternions, colors and arrays

pub mod composite;
pub mod value;

pub use composite::{decode_array, encode_array, Color, Composite};
pub use glam::{Quat, Vec2, Vec3};
pub use value::{FromValue, IntoValue, Value};

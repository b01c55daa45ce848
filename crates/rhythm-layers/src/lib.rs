//! Built-in Rhythm spec layers.
//!
//! Typed layer values plus one factory per built-in block type. Hosts can
//! register these into a [`rhythm_core::LayerRegistry`] and add or override
//! types of their own.

pub mod factories;
pub mod layers;
pub mod values;

pub use factories::{builtin_registry, register_builtins, BUILTIN_TYPES};
pub use layers::{
    Corner, DimensionsLabel, Direction, Fill, Gravity, GridLines, Guide, Keyline, SpecLayer,
};
pub use values::{Color, Dimension, Unit, ValueError};

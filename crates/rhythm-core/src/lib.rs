//! Rhythm core types.
//!
//! Shared building blocks for inflating declarative overlay configs:
//! the error model with stable codes, per-block argument bundles, and the
//! registry that maps layer type names to factories.

pub mod args;
pub mod error;
pub mod registry;

pub use args::{ArgumentError, ArgumentsBundle};
pub use error::{BoxError, ErrorKind, ErrorReport, InflationError, LINE_NOT_SPECIFIED};
pub use registry::{LayerError, LayerFactory, LayerRegistry};

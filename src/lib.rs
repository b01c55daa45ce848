//! Rhythm overlay inflater
//!
//! Parses line-oriented overlay configs into typed layers. Block types are
//! resolved through a [`LayerRegistry`] of factories, so hosts can add their
//! own types or replace the built-in ones without touching the parser.
//!
//! ```
//! use rhythm_inflater::OverlayInflater;
//!
//! let inflater = OverlayInflater::with_builtins();
//! let overlays = inflater
//!     .inflate_str("@step=8dp\n\ngrid-lines direction=horizontal step=@step\n")
//!     .unwrap();
//! assert_eq!(overlays[0].len(), 1);
//! ```

pub mod config;
pub mod inflater;
pub mod overlay;

pub use config::{EffectiveConfig, InflaterConfig};
pub use inflater::OverlayInflater;
pub use overlay::Overlay;
pub use rhythm_core::{
    ArgumentsBundle, ErrorKind, ErrorReport, InflationError, LayerError, LayerFactory,
    LayerRegistry, LINE_NOT_SPECIFIED,
};
pub use rhythm_layers as layers;
pub use rhythm_layers::{builtin_registry, register_builtins, SpecLayer, BUILTIN_TYPES};

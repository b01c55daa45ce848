//! Factories for the built-in layer types.
//!
//! Missing or out-of-range arguments fail with tagged argument errors. A
//! value that is present but unparsable fails with a [`ValueError`], which
//! the inflater wraps as `INFLATING_LAYER_GENERIC`.

use rhythm_core::{ArgumentsBundle, InflationError, LayerError, LayerRegistry};

use crate::layers::{
    Corner, DimensionsLabel, Direction, Fill, Gravity, GridLines, Guide, Keyline, SpecLayer,
    DEFAULT_LABEL_COLOR, DEFAULT_LINE_COLOR, DEFAULT_TEXT_SIZE, DEFAULT_THICKNESS,
};
use crate::values::{Color, Dimension, ValueError};

/// Type names of the built-in layers, sorted.
pub const BUILTIN_TYPES: &[&str] = &["dimensions-label", "fill", "grid-lines", "guide", "keyline"];

/// Register every built-in factory. Existing registrations with the same
/// names are replaced.
pub fn register_builtins(registry: &LayerRegistry<SpecLayer>) {
    registry.register_fn("guide", guide);
    registry.register_fn("grid-lines", grid_lines);
    registry.register_fn("keyline", keyline);
    registry.register_fn("fill", fill);
    registry.register_fn("dimensions-label", dimensions_label);
}

/// A registry holding only the built-in factories.
pub fn builtin_registry() -> LayerRegistry<SpecLayer> {
    let registry = LayerRegistry::new();
    register_builtins(&registry);
    registry
}

/// `guide left|top|right|bottom [distance=<dim>] [thickness=<dim>] [color=<color>] [outside]`
///
/// The edge may also be given as `gravity=<edge>`.
pub fn guide(args: &ArgumentsBundle) -> Result<SpecLayer, LayerError> {
    let gravity = edge_from_flags(args, "gravity")?;
    Ok(SpecLayer::Guide(Guide {
        gravity,
        distance: dimension_or(args, "distance", Dimension::ZERO)?,
        thickness: dimension_or(args, "thickness", DEFAULT_THICKNESS)?,
        color: color_or(args, "color", DEFAULT_LINE_COLOR)?,
        align_outside: args.get_bool("outside")?,
    }))
}

/// `grid-lines direction=horizontal|vertical step=<dim> [thickness] [color] [offset] [limit=<n>]`
pub fn grid_lines(args: &ArgumentsBundle) -> Result<SpecLayer, LayerError> {
    let direction = match args.require_one_of("direction", &["horizontal", "vertical"])? {
        "horizontal" => Direction::Horizontal,
        _ => Direction::Vertical,
    };
    let limit = if args.contains_key("limit") {
        let limit = args.require_positive_int("limit", "4")?;
        Some(
            u32::try_from(limit)
                .map_err(|_| InflationError::argument_not_positive(args.layer_type(), "limit", "4"))?,
        )
    } else {
        None
    };
    Ok(SpecLayer::GridLines(GridLines {
        direction,
        step: require_positive_dimension(args, "step", "8dp")?,
        thickness: dimension_or(args, "thickness", DEFAULT_THICKNESS)?,
        color: color_or(args, "color", DEFAULT_LINE_COLOR)?,
        offset: dimension_or(args, "offset", Dimension::ZERO)?,
        limit,
    }))
}

/// `keyline from=left|top|right|bottom distance=<dim> [thickness] [color]`
pub fn keyline(args: &ArgumentsBundle) -> Result<SpecLayer, LayerError> {
    let from = args.require_one_of("from", &Gravity::NAMES)?;
    Ok(SpecLayer::Keyline(Keyline {
        from: Gravity::from_name(from).unwrap_or(Gravity::Left),
        distance: require_dimension(args, "distance", "16dp")?,
        thickness: dimension_or(args, "thickness", DEFAULT_THICKNESS)?,
        color: color_or(args, "color", DEFAULT_LINE_COLOR)?,
    }))
}

/// `fill color=<color>`
pub fn fill(args: &ArgumentsBundle) -> Result<SpecLayer, LayerError> {
    let raw = args.require_string("color", "color")?;
    Ok(SpecLayer::Fill(Fill {
        color: raw.parse::<Color>()?,
    }))
}

/// `dimensions-label [gravity=top-left|top-right|bottom-left|bottom-right] [text-size] [color]`
pub fn dimensions_label(args: &ArgumentsBundle) -> Result<SpecLayer, LayerError> {
    let corner = args.one_of_or("gravity", &Corner::NAMES, "bottom-right")?;
    let text_size = if args.contains_key("text-size") {
        require_positive_dimension(args, "text-size", "12sp")?
    } else {
        DEFAULT_TEXT_SIZE
    };
    Ok(SpecLayer::DimensionsLabel(DimensionsLabel {
        corner: Corner::from_name(corner).unwrap_or(Corner::BottomRight),
        text_size,
        color: color_or(args, "color", DEFAULT_LABEL_COLOR)?,
    }))
}

/// Resolve an edge given either as `key=<edge>` or as exactly one bare
/// `left`/`top`/`right`/`bottom` flag.
fn edge_from_flags(args: &ArgumentsBundle, key: &str) -> Result<Gravity, InflationError> {
    if args.contains_key(key) {
        let name = args.require_one_of(key, &Gravity::NAMES)?;
        return Ok(Gravity::from_name(name).unwrap_or(Gravity::Left));
    }

    let flags: Vec<&str> = Gravity::NAMES
        .iter()
        .copied()
        .filter(|name| args.contains_key(name))
        .collect();
    match flags.as_slice() {
        [single] => Ok(Gravity::from_name(single).unwrap_or(Gravity::Left)),
        [] => Err(InflationError::argument_not_one_of(
            args.layer_type(),
            key,
            None,
            &Gravity::NAMES,
        )),
        several => Err(InflationError::argument_not_one_of(
            args.layer_type(),
            key,
            Some(several.join(",").as_str()),
            &Gravity::NAMES,
        )),
    }
}

fn require_dimension(
    args: &ArgumentsBundle,
    key: &str,
    example: &str,
) -> Result<Dimension, LayerError> {
    let raw = args.get(key).ok_or_else(|| {
        InflationError::argument_wrong_type(args.layer_type(), key, "dimension", example)
    })?;
    Ok(raw.parse::<Dimension>()?)
}

fn require_positive_dimension(
    args: &ArgumentsBundle,
    key: &str,
    example: &str,
) -> Result<Dimension, LayerError> {
    let not_positive = || InflationError::argument_not_positive(args.layer_type(), key, example);
    let dimension = args.get(key).ok_or_else(not_positive)?.parse::<Dimension>()?;
    if dimension.is_positive() {
        Ok(dimension)
    } else {
        Err(not_positive().into())
    }
}

/// Optional value argument. A bare flag fails as the wrong type; a present
/// value that doesn't parse fails with its [`ValueError`].
fn value_or<T>(
    args: &ArgumentsBundle,
    key: &str,
    default: T,
    expected_type: &str,
    example: &str,
) -> Result<T, LayerError>
where
    T: std::str::FromStr<Err = ValueError>,
{
    if !args.contains_key(key) {
        return Ok(default);
    }
    let value = args.get(key).ok_or_else(|| {
        InflationError::argument_wrong_type(args.layer_type(), key, expected_type, example)
    })?;
    Ok(value.parse()?)
}

fn dimension_or(
    args: &ArgumentsBundle,
    key: &str,
    default: Dimension,
) -> Result<Dimension, LayerError> {
    value_or(args, key, default, "dimension", "8dp")
}

fn color_or(args: &ArgumentsBundle, key: &str, default: Color) -> Result<Color, LayerError> {
    value_or(args, key, default, "color", "#FF4081")
}

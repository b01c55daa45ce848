//! Built-in spec layer types.
//!
//! These are plain data: drawing them is up to the host.

use serde::Serialize;

use crate::values::{Color, Dimension};

/// Default color for lines when none is given.
pub const DEFAULT_LINE_COLOR: Color = Color(0x60FF_0000);
/// Default line thickness.
pub const DEFAULT_THICKNESS: Dimension = Dimension::px(1.0);
/// Default color for dimension labels.
pub const DEFAULT_LABEL_COLOR: Color = Color(0xFF00_0000);
/// Default text size for dimension labels.
pub const DEFAULT_TEXT_SIZE: Dimension = Dimension::sp(12.0);

/// Edge of the view a layer is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Gravity {
    Left,
    Top,
    Right,
    Bottom,
}

impl Gravity {
    pub const NAMES: [&'static str; 4] = ["left", "top", "right", "bottom"];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "left" => Some(Gravity::Left),
            "top" => Some(Gravity::Top),
            "right" => Some(Gravity::Right),
            "bottom" => Some(Gravity::Bottom),
            _ => None,
        }
    }
}

/// Orientation of repeated grid lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Horizontal,
    Vertical,
}

/// Corner a dimensions label is drawn in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    pub const NAMES: [&'static str; 4] = ["top-left", "top-right", "bottom-left", "bottom-right"];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "top-left" => Some(Corner::TopLeft),
            "top-right" => Some(Corner::TopRight),
            "bottom-left" => Some(Corner::BottomLeft),
            "bottom-right" => Some(Corner::BottomRight),
            _ => None,
        }
    }
}

/// A single line at a fixed distance from one edge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Guide {
    pub gravity: Gravity,
    pub distance: Dimension,
    pub thickness: Dimension,
    pub color: Color,
    /// Draw the line outside the distance mark instead of inside it.
    pub align_outside: bool,
}

/// Evenly spaced lines.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridLines {
    pub direction: Direction,
    pub step: Dimension,
    pub thickness: Dimension,
    pub color: Color,
    pub offset: Dimension,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

/// A keyline measured from one edge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Keyline {
    pub from: Gravity,
    pub distance: Dimension,
    pub thickness: Dimension,
    pub color: Color,
}

/// Solid fill of the whole view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fill {
    pub color: Color,
}

/// Label showing the view's size.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DimensionsLabel {
    pub corner: Corner,
    pub text_size: Dimension,
    pub color: Color,
}

/// Any built-in layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SpecLayer {
    Guide(Guide),
    GridLines(GridLines),
    Keyline(Keyline),
    Fill(Fill),
    DimensionsLabel(DimensionsLabel),
}

impl SpecLayer {
    /// Type name this layer is declared with.
    pub fn type_name(&self) -> &'static str {
        match self {
            SpecLayer::Guide(_) => "guide",
            SpecLayer::GridLines(_) => "grid-lines",
            SpecLayer::Keyline(_) => "keyline",
            SpecLayer::Fill(_) => "fill",
            SpecLayer::DimensionsLabel(_) => "dimensions-label",
        }
    }
}

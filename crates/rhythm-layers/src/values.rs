//! Dimension and color values used by layer arguments.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex_lite::Regex;
use serde::{Serialize, Serializer};

/// Failure to parse an argument value into a typed value.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValueError {
    #[error("invalid dimension '{0}', expected a number with an optional dp, sp or px unit")]
    InvalidDimension(String),

    #[error("invalid color '{0}', expected #RGB, #ARGB, #RRGGBB, #AARRGGBB or a color name")]
    InvalidColor(String),
}

/// Dimension unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Px,
    Dp,
    Sp,
}

impl Unit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Px => "px",
            Unit::Dp => "dp",
            Unit::Sp => "sp",
        }
    }
}

/// A length such as `8dp`. A bare number is in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Dimension {
    pub value: f32,
    pub unit: Unit,
}

impl Dimension {
    pub const ZERO: Dimension = Dimension::px(0.0);

    pub const fn px(value: f32) -> Self {
        Self { value, unit: Unit::Px }
    }

    pub const fn dp(value: f32) -> Self {
        Self { value, unit: Unit::Dp }
    }

    pub const fn sp(value: f32) -> Self {
        Self { value, unit: Unit::Sp }
    }

    pub fn is_positive(&self) -> bool {
        self.value > 0.0
    }

    /// Resolve to pixels for the given display densities.
    pub fn to_px(&self, density: f32, scaled_density: f32) -> f32 {
        match self.unit {
            Unit::Px => self.value,
            Unit::Dp => self.value * density,
            Unit::Sp => self.value * scaled_density,
        }
    }
}

fn dimension_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(-?(?:\d+(?:\.\d*)?|\.\d+))(dp|dip|sp|px)?$").expect("dimension pattern")
    })
}

impl FromStr for Dimension {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValueError::InvalidDimension(s.to_string());
        let caps = dimension_re().captures(s.trim()).ok_or_else(invalid)?;
        let value: f32 = caps[1].parse().map_err(|_| invalid())?;
        let unit = match caps.get(2).map(|m| m.as_str()) {
            None | Some("px") => Unit::Px,
            Some("dp") | Some("dip") => Unit::Dp,
            Some(_) => Unit::Sp,
        };
        Ok(Self { value, unit })
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit.as_str())
    }
}

/// An ARGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(pub u32);

const NAMED_COLORS: &[(&str, u32)] = &[
    ("transparent", 0x0000_0000),
    ("black", 0xFF00_0000),
    ("white", 0xFFFF_FFFF),
    ("gray", 0xFF88_8888),
    ("red", 0xFFFF_0000),
    ("green", 0xFF00_FF00),
    ("blue", 0xFF00_00FF),
    ("yellow", 0xFFFF_FF00),
    ("cyan", 0xFF00_FFFF),
    ("magenta", 0xFFFF_00FF),
];

impl Color {
    pub fn alpha(&self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub fn red(&self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub fn green(&self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub fn blue(&self) -> u8 {
        self.0 as u8
    }
}

impl FromStr for Color {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValueError::InvalidColor(s.to_string());
        let s = s.trim();

        let Some(hex) = s.strip_prefix('#') else {
            return NAMED_COLORS
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(s))
                .map(|(_, argb)| Color(*argb))
                .ok_or_else(invalid);
        };

        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        // Short forms double each nibble; forms without alpha are opaque.
        let expanded: String = match hex.len() {
            3 => std::iter::once('f')
                .chain(hex.chars())
                .flat_map(|c| [c, c])
                .collect(),
            4 => hex.chars().flat_map(|c| [c, c]).collect(),
            6 => format!("ff{}", hex),
            8 => hex.to_string(),
            _ => return Err(invalid()),
        };
        u32::from_str_radix(&expanded, 16)
            .map(Color)
            .map_err(|_| invalid())
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:08X}", self.0)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

//! Canvas aspect ratios and their reference pixel sizes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Supported canvas aspect ratios.
///
/// The ratio is stored in the layout metadata as-is; it is never derived from
/// element geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "4:5")]
    Portrait,
    #[serde(rename = "9:16")]
    Story,
    #[serde(rename = "16:9")]
    Landscape,
}

impl AspectRatio {
    /// All supported ratios in table order.
    pub const ALL: [AspectRatio; 4] = [
        AspectRatio::Square,
        AspectRatio::Portrait,
        AspectRatio::Story,
        AspectRatio::Landscape,
    ];

    /// Reference canvas size in pixels for this ratio.
    pub fn canvas_size(self) -> ContainerSize {
        match self {
            AspectRatio::Square => ContainerSize::new(1080.0, 1080.0),
            AspectRatio::Portrait => ContainerSize::new(1080.0, 1350.0),
            AspectRatio::Story => ContainerSize::new(1080.0, 1920.0),
            AspectRatio::Landscape => ContainerSize::new(1920.0, 1080.0),
        }
    }

    /// The ratio name as it appears in persisted metadata (`"9:16"`).
    pub fn as_str(self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Portrait => "4:5",
            AspectRatio::Story => "9:16",
            AspectRatio::Landscape => "16:9",
        }
    }

    /// `true` when the canvas is taller than it is wide.
    pub fn is_tall(self) -> bool {
        matches!(self, AspectRatio::Portrait | AspectRatio::Story)
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown ratio name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown aspect ratio: {0:?} (expected one of 1:1, 4:5, 9:16, 16:9)")]
pub struct UnknownAspectRatio(pub String);

impl FromStr for AspectRatio {
    type Err = UnknownAspectRatio;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AspectRatio::ALL
            .into_iter()
            .find(|r| r.as_str() == s.trim())
            .ok_or_else(|| UnknownAspectRatio(s.to_string()))
    }
}

/// Pixel size of the surface pointer coordinates are reported in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerSize {
    pub width: f64,
    pub height: f64,
}

impl ContainerSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

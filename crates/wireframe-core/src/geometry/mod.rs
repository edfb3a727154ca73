//! Geometry engine: pure functions over element boxes.
//!
//! All values are percentages of the canvas (`0.0..=100.0`).  Nothing in this
//! module fails: out-of-range input is clamped, never rejected, so a drag past
//! the canvas edge simply stops at the edge.
//!
//! # Clamping strategies
//!
//! There are two ways to bring a box back inside the canvas:
//!
//! - [`clamp`] keeps the origin where it is (as far as possible) and shrinks
//!   the box.  This is what a resize wants: dragging the `e` handle of a box at
//!   `left = 90` by +30% yields `width = 10`, not a box shoved to the left.
//! - [`clamp_position`] keeps the size and shifts the origin.  This is what
//!   move-like operations (drag, nudge, paste offset) want.
//!
//! Both end by applying the minimum size (`5 × 3`) and the `zIndex ≥ 1` rule.

use serde::{Deserialize, Serialize};

use crate::domain::aspect::ContainerSize;
use crate::domain::element::Element;

pub mod snap;

/// Canvas extent on both axes, in percent.
pub const CANVAS_EXTENT: f64 = 100.0;
/// Minimum visible element width, in percent.
pub const MIN_WIDTH: f64 = 5.0;
/// Minimum visible element height, in percent.
pub const MIN_HEIGHT: f64 = 3.0;

/// One of the eight resize affordances on a selected element's bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Handle {
    N,
    S,
    E,
    W,
    NE,
    NW,
    SE,
    SW,
}

impl Handle {
    pub const ALL: [Handle; 8] = [
        Handle::N,
        Handle::S,
        Handle::E,
        Handle::W,
        Handle::NE,
        Handle::NW,
        Handle::SE,
        Handle::SW,
    ];

    fn moves_left_edge(self) -> bool {
        matches!(self, Handle::W | Handle::NW | Handle::SW)
    }

    fn moves_right_edge(self) -> bool {
        matches!(self, Handle::E | Handle::NE | Handle::SE)
    }

    fn moves_top_edge(self) -> bool {
        matches!(self, Handle::N | Handle::NE | Handle::NW)
    }

    fn moves_bottom_edge(self) -> bool {
        matches!(self, Handle::S | Handle::SE | Handle::SW)
    }
}

/// Canvas alignment of a single element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    Center,
    Right,
    Top,
    Middle,
    Bottom,
}

/// Converts a pointer movement in pixels into a movement in canvas percent.
///
/// A container with a non-positive dimension yields a zero delta on that axis.
pub fn to_percent_delta(pixel_dx: f64, pixel_dy: f64, container: ContainerSize) -> (f64, f64) {
    let scale = |px: f64, size: f64| {
        if size > 0.0 && px.is_finite() {
            px * CANVAS_EXTENT / size
        } else {
            0.0
        }
    };
    (scale(pixel_dx, container.width), scale(pixel_dy, container.height))
}

/// Applies the bounds, minimum-size and z-index invariants, shrinking the box
/// rather than moving it.
pub fn clamp(element: &Element) -> Element {
    let mut out = element.clone();

    out.width = finite_or(out.width, MIN_WIDTH).clamp(MIN_WIDTH, CANVAS_EXTENT);
    out.height = finite_or(out.height, MIN_HEIGHT).clamp(MIN_HEIGHT, CANVAS_EXTENT);

    out.left = finite_or(out.left, 0.0).clamp(0.0, CANVAS_EXTENT - MIN_WIDTH);
    out.top = finite_or(out.top, 0.0).clamp(0.0, CANVAS_EXTENT - MIN_HEIGHT);

    out.width = out.width.min(CANVAS_EXTENT - out.left);
    out.height = out.height.min(CANVAS_EXTENT - out.top);

    out.z_index = out.z_index.max(1);
    out
}

/// Applies the invariants while preserving the element's size, shifting its
/// origin back inside the canvas instead.
pub fn clamp_position(element: &Element) -> Element {
    let mut out = element.clone();
    out.width = finite_or(out.width, MIN_WIDTH).clamp(MIN_WIDTH, CANVAS_EXTENT);
    out.height = finite_or(out.height, MIN_HEIGHT).clamp(MIN_HEIGHT, CANVAS_EXTENT);
    out.left = finite_or(out.left, 0.0).clamp(0.0, CANVAS_EXTENT - out.width);
    out.top = finite_or(out.top, 0.0).clamp(0.0, CANVAS_EXTENT - out.height);
    clamp(&out)
}

/// Moves an element by a percent delta, keeping its size.
pub fn translate(element: &Element, d_left: f64, d_top: f64) -> Element {
    let mut moved = element.clone();
    moved.left += finite_or(d_left, 0.0);
    moved.top += finite_or(d_top, 0.0);
    clamp_position(&moved)
}

/// Resizes an element by dragging `handle` by a percent delta.
///
/// | handle | left      | top       | width       | height       |
/// |--------|-----------|-----------|-------------|--------------|
/// | `n`    |           | `+= dy`   |             | `-= dy`      |
/// | `s`    |           |           |             | `+= dy`      |
/// | `e`    |           |           | `+= dx`     |              |
/// | `w`    | `+= dx`   |           | `-= dx`     |              |
/// | `ne`   |           | `+= dy`   | `+= dx`     | `-= dy`      |
/// | `nw`   | `+= dx`   | `+= dy`   | `-= dx`     | `-= dy`      |
/// | `se`   |           |           | `+= dx`     | `+= dy`      |
/// | `sw`   | `+= dx`   |           | `-= dx`     | `+= dy`      |
///
/// A moving edge stops where the box would drop below the minimum size or
/// leave the canvas; the opposite edge stays put.
pub fn resize(element: &Element, handle: Handle, d_left: f64, d_top: f64) -> Element {
    let dx = finite_or(d_left, 0.0);
    let dy = finite_or(d_top, 0.0);
    let right = element.right();
    let bottom = element.bottom();
    let mut out = element.clone();

    if handle.moves_left_edge() {
        let left = (element.left + dx).clamp(0.0, (right - MIN_WIDTH).max(0.0));
        out.left = left;
        out.width = right - left;
    } else if handle.moves_right_edge() {
        let max_width = (CANVAS_EXTENT - element.left).max(MIN_WIDTH);
        out.width = (element.width + dx).clamp(MIN_WIDTH, max_width);
    }

    if handle.moves_top_edge() {
        let top = (element.top + dy).clamp(0.0, (bottom - MIN_HEIGHT).max(0.0));
        out.top = top;
        out.height = bottom - top;
    } else if handle.moves_bottom_edge() {
        let max_height = (CANVAS_EXTENT - element.top).max(MIN_HEIGHT);
        out.height = (element.height + dy).clamp(MIN_HEIGHT, max_height);
    }

    clamp(&out)
}

/// Aligns an element against the canvas.
pub fn align(element: &Element, alignment: Alignment) -> Element {
    let mut out = clamp(element);
    match alignment {
        Alignment::Left => out.left = 0.0,
        Alignment::Center => out.left = (CANVAS_EXTENT - out.width) / 2.0,
        Alignment::Right => out.left = CANVAS_EXTENT - out.width,
        Alignment::Top => out.top = 0.0,
        Alignment::Middle => out.top = (CANVAS_EXTENT - out.height) / 2.0,
        Alignment::Bottom => out.top = CANVAS_EXTENT - out.height,
    }
    clamp(&out)
}

/// Rounds `value` to the nearest multiple of `grid_size`.
///
/// A non-positive or non-finite grid size leaves the value unchanged.
pub fn snap_to_grid(value: f64, grid_size: f64) -> f64 {
    if grid_size <= 0.0 || !grid_size.is_finite() {
        return value;
    }
    (value / grid_size).round() * grid_size
}

fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

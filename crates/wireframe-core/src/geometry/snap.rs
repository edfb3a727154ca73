//! Snap-guide computation for elements being dragged.
//!
//! While an element moves, its left / center / right edges are compared with
//! the same edges of every other element and with the canvas lines at 0%, 50%
//! and 100%.  When one of them comes within the threshold, the element jumps
//! onto that line and a [`Guide`] is emitted so the UI can draw it.  The
//! vertical lines (x axis) and horizontal lines (y axis) are resolved
//! independently: an element can snap on one, both, or neither.

use serde::{Deserialize, Serialize};

use crate::domain::element::Element;
use crate::geometry::CANVAS_EXTENT;

/// Which coordinate a guide constrains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// A vertical line at `position` percent from the left.
    X,
    /// A horizontal line at `position` percent from the top.
    Y,
}

/// A transient alignment line shown while an element snaps to it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Guide {
    pub axis: Axis,
    pub position: f64,
}

/// Outcome of [`compute_snap_guides`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SnapResult {
    pub adjusted_left: f64,
    pub adjusted_top: f64,
    pub guides: Vec<Guide>,
}

impl SnapResult {
    pub fn snapped_x(&self) -> bool {
        self.guides.iter().any(|g| g.axis == Axis::X)
    }

    pub fn snapped_y(&self) -> bool {
        self.guides.iter().any(|g| g.axis == Axis::Y)
    }
}

const CANVAS_LINES: [f64; 3] = [0.0, CANVAS_EXTENT / 2.0, CANVAS_EXTENT];

/// Computes the snapped position of `moving` against `others` and the canvas.
///
/// Elements in `others` with the same id as `moving` are ignored, so callers
/// may pass the full element list.
pub fn compute_snap_guides(moving: &Element, others: &[Element], threshold: f64) -> SnapResult {
    let mut result = SnapResult {
        adjusted_left: moving.left,
        adjusted_top: moving.top,
        guides: Vec::new(),
    };
    if !threshold.is_finite() || threshold < 0.0 {
        return result;
    }

    let neighbours = || others.iter().filter(|o| o.id != moving.id);

    let x_targets: Vec<f64> = CANVAS_LINES
        .into_iter()
        .chain(neighbours().flat_map(|o| [o.left, o.center_x(), o.right()]))
        .collect();
    let y_targets: Vec<f64> = CANVAS_LINES
        .into_iter()
        .chain(neighbours().flat_map(|o| [o.top, o.center_y(), o.bottom()]))
        .collect();

    let x_edges = [moving.left, moving.center_x(), moving.right()];
    let y_edges = [moving.top, moving.center_y(), moving.bottom()];

    if let Some((offset, line)) = closest_line(&x_edges, &x_targets, threshold) {
        result.adjusted_left += offset;
        result.guides.push(Guide {
            axis: Axis::X,
            position: line,
        });
    }
    if let Some((offset, line)) = closest_line(&y_edges, &y_targets, threshold) {
        result.adjusted_top += offset;
        result.guides.push(Guide {
            axis: Axis::Y,
            position: line,
        });
    }

    result
}

/// Returns `(offset, line)` for the target line nearest to any of `edges`,
/// provided it lies within `threshold`.
fn closest_line(edges: &[f64], targets: &[f64], threshold: f64) -> Option<(f64, f64)> {
    let mut best: Option<(f64, f64)> = None;
    for &edge in edges {
        for &line in targets {
            let offset = line - edge;
            if offset.abs() > threshold {
                continue;
            }
            if best.map_or(true, |(b, _)| offset.abs() < b.abs()) {
                best = Some((offset, line));
            }
        }
    }
    best
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::element::ElementKind;

    fn make_element(id: &str, left: f64, top: f64, width: f64, height: f64) -> Element {
        Element::new(ElementKind::Text, left, top, width, height).with_id(id)
    }

    #[test]
    fn test_no_guides_when_nothing_is_in_range() {
        let moving = make_element("m", 15.0, 15.0, 20.0, 10.0);

        let result = compute_snap_guides(&moving, &[], 1.0);

        assert_eq!(result.adjusted_left, 15.0);
        assert_eq!(result.adjusted_top, 15.0);
        assert!(result.guides.is_empty());
    }

    #[test]
    fn test_snaps_left_edge_to_neighbour_left_edge() {
        let moving = make_element("m", 20.6, 60.0, 20.0, 10.0);
        let other = make_element("o", 20.0, 10.0, 30.0, 10.0);

        let result = compute_snap_guides(&moving, &[other], 1.0);

        assert!((result.adjusted_left - 20.0).abs() < 1e-9);
        assert_eq!(result.guides, vec![Guide { axis: Axis::X, position: 20.0 }]);
    }

    #[test]
    fn test_snaps_center_to_canvas_center() {
        // center_x = 31 + 39 / 2 = 50.5
        let moving = make_element("m", 31.0, 62.0, 39.0, 10.0);

        let result = compute_snap_guides(&moving, &[], 1.0);

        assert!((result.adjusted_left - 30.5).abs() < 1e-9);
        assert!(result.snapped_x());
        assert!(!result.snapped_y());
    }

    #[test]
    fn test_snaps_right_edge_to_canvas_edge() {
        let moving = make_element("m", 69.5, 40.0, 30.0, 10.0);

        let result = compute_snap_guides(&moving, &[], 1.0);

        assert!((result.adjusted_left - 70.0).abs() < 1e-9);
        assert_eq!(result.guides[0].position, 100.0);
    }

    #[test]
    fn test_axes_snap_independently() {
        let moving = make_element("m", 20.4, 30.7, 10.0, 10.0);
        let other = make_element("o", 20.0, 70.0, 10.0, 10.0);
        let below = make_element("b", 60.0, 20.0, 10.0, 10.0);

        let result = compute_snap_guides(&moving, &[other, below], 1.0);

        assert!((result.adjusted_left - 20.0).abs() < 1e-9);
        assert!((result.adjusted_top - 30.0).abs() < 1e-9);
        assert_eq!(result.guides.len(), 2);
    }

    #[test]
    fn test_picks_closest_candidate() {
        let moving = make_element("m", 20.8, 60.0, 10.0, 10.0);
        let far = make_element("far", 20.0, 5.0, 5.0, 5.0);
        let near = make_element("near", 21.0, 15.0, 5.0, 5.0);

        let result = compute_snap_guides(&moving, &[far, near], 1.0);

        assert!((result.adjusted_left - 21.0).abs() < 1e-9);
    }

    #[test]
    fn test_ignores_element_with_same_id() {
        let moving = make_element("m", 15.0, 15.0, 20.0, 10.0);
        let stale_copy = make_element("m", 15.3, 15.3, 20.0, 10.0);

        let result = compute_snap_guides(&moving, &[stale_copy], 1.0);

        assert!(result.guides.is_empty());
    }

    #[test]
    fn test_negative_threshold_disables_snapping() {
        let moving = make_element("m", 0.2, 0.2, 20.0, 10.0);
        let result = compute_snap_guides(&moving, &[], -1.0);
        assert!(result.guides.is_empty());
    }
}

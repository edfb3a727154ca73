//! Integration tests for the wireframe-core public API.
//!
//! These check that geometry operations, templates, and layout mutations keep
//! every element inside the canvas, whatever inputs they are fed.

use wireframe_core::geometry::{self, snap::compute_snap_guides, MIN_HEIGHT, MIN_WIDTH};
use wireframe_core::templates::generate;
use wireframe_core::{
    Alignment, AspectRatio, Content, Element, ElementId, ElementKind, Handle, Layout, LayoutType,
    Meta,
};

const EPS: f64 = 1e-9;

fn assert_inside(el: &Element) {
    assert!(el.left >= -EPS, "left {} < 0", el.left);
    assert!(el.top >= -EPS, "top {} < 0", el.top);
    assert!(el.right() <= 100.0 + EPS, "right {} > 100", el.right());
    assert!(el.bottom() <= 100.0 + EPS, "bottom {} > 100", el.bottom());
    assert!(el.width >= MIN_WIDTH - EPS, "width {} too small", el.width);
    assert!(el.height >= MIN_HEIGHT - EPS, "height {} too small", el.height);
    assert!(el.z_index >= 1);
}

/// A spread of starting boxes: interior, touching every edge, minimum size,
/// and full-canvas.
fn sample_elements() -> Vec<Element> {
    let boxes = [
        (10.0, 10.0, 20.0, 10.0),
        (0.0, 0.0, 100.0, 100.0),
        (95.0, 97.0, 5.0, 3.0),
        (0.0, 50.0, 5.0, 3.0),
        (90.0, 10.0, 10.0, 10.0),
        (33.3, 66.6, 41.2, 17.9),
    ];
    boxes
        .iter()
        .enumerate()
        .map(|(i, &(l, t, w, h))| Element::new(ElementKind::Text, l, t, w, h).with_id(format!("s{i}")))
        .collect()
}

const DELTAS: [f64; 7] = [-250.0, -30.0, -0.5, 0.0, 0.5, 30.0, 250.0];

#[test]
fn test_resize_keeps_every_handle_inside_canvas() {
    for el in sample_elements() {
        for handle in Handle::ALL {
            for &dx in &DELTAS {
                for &dy in &DELTAS {
                    assert_inside(&geometry::resize(&el, handle, dx, dy));
                }
            }
        }
    }
}

#[test]
fn test_translate_then_clamp_position_keeps_size() {
    for el in sample_elements() {
        for &dx in &DELTAS {
            for &dy in &DELTAS {
                let moved = geometry::clamp_position(&geometry::translate(&el, dx, dy));
                assert_inside(&moved);
                assert!((moved.width - el.width).abs() < EPS);
                assert!((moved.height - el.height).abs() < EPS);
            }
        }
    }
}

#[test]
fn test_align_results_are_inside_canvas() {
    let alignments = [
        Alignment::Left,
        Alignment::Center,
        Alignment::Right,
        Alignment::Top,
        Alignment::Middle,
        Alignment::Bottom,
    ];
    for el in sample_elements() {
        for alignment in alignments {
            assert_inside(&geometry::align(&el, alignment));
        }
    }
}

#[test]
fn test_snapped_drag_stays_inside_after_clamp() {
    let others = sample_elements();
    let moving = Element::new(ElementKind::Title, 0.0, 0.0, 30.0, 10.0).with_id("moving");
    for &dx in &DELTAS {
        for &dy in &DELTAS {
            let dragged = geometry::translate(&moving, dx, dy);
            let snap = compute_snap_guides(&dragged, &others, 1.0);
            let mut next = dragged.clone();
            next.left = snap.adjusted_left;
            next.top = snap.adjusted_top;
            assert_inside(&geometry::clamp(&geometry::clamp_position(&next)));
        }
    }
}

#[test]
fn test_non_finite_input_is_repaired() {
    let el = Element::new(ElementKind::Text, f64::NAN, f64::INFINITY, f64::NEG_INFINITY, f64::NAN);
    assert_inside(&geometry::clamp(&el));
}

#[test]
fn test_every_template_survives_json_round_trip_and_validation() {
    for kind in LayoutType::ALL {
        for ratio in AspectRatio::ALL {
            let layout = generate(kind, ratio, None);
            let json = serde_json::to_string(&layout).expect("serialize layout");
            let back: Layout = serde_json::from_str(&json).expect("deserialize layout");
            assert_eq!(back, layout);
            assert!(back.validate().is_ok());
        }
    }
}

#[test]
fn test_layout_mutations_keep_invariants() {
    let mut layout = Layout::new(
        sample_elements(),
        Content::default(),
        Meta::new(AspectRatio::Square, None),
    )
    .expect("sample layout is valid");

    layout
        .update_element(&ElementId::from("s0"), |el| geometry::translate(el, 500.0, -500.0))
        .expect("s0 exists");
    layout
        .push_element(Element::new(ElementKind::Cta, 99.0, 99.0, 50.0, 50.0).with_id("new"))
        .expect("fresh id");

    assert!(layout.validate().is_ok());
    for el in layout.elements() {
        assert_inside(el);
    }
}

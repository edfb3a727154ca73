//! Copy, paste, and duplicate of single elements.
//!
//! The clipboard holds a deep copy of one element's geometry, kind and lock
//! state.  Shared text lives in the layout's [`Content`](wireframe_core::Content),
//! keyed by role, so a pasted `title` shows the same text as the original.
//!
//! Every paste produces a fresh UUID-based id, offset by `paste_offset`
//! percent on both axes, pushed back inside the canvas, and placed on top of
//! the z-stack.  The clipboard keeps its content until overwritten.

use tracing::debug;
use wireframe_core::geometry;
use wireframe_core::{Element, ElementId, Layout, LayoutError};

/// Default offset applied to pasted and duplicated elements, in percent.
pub const DEFAULT_PASTE_OFFSET: f64 = 5.0;

#[derive(Debug, Clone)]
pub struct Clipboard {
    copied: Option<Element>,
    paste_offset: f64,
}

impl Clipboard {
    pub fn new(paste_offset: f64) -> Self {
        Self {
            copied: None,
            paste_offset: if paste_offset.is_finite() { paste_offset } else { DEFAULT_PASTE_OFFSET },
        }
    }

    /// Stores a copy of `element`, replacing anything copied before.
    pub fn copy(&mut self, element: &Element) {
        debug!(id = %element.id, role = %element.role(), "copied element");
        self.copied = Some(element.clone());
    }

    pub fn is_empty(&self) -> bool {
        self.copied.is_none()
    }

    pub fn peek(&self) -> Option<&Element> {
        self.copied.as_ref()
    }

    /// Appends a new element built from the clipboard.
    ///
    /// Returns `Ok(None)` when the clipboard is empty.
    pub fn paste(&self, layout: &mut Layout) -> Result<Option<ElementId>, LayoutError> {
        match &self.copied {
            Some(source) => self.place_copy(source, layout).map(Some),
            None => Ok(None),
        }
    }

    /// Appends a copy of the element `id` without touching the clipboard.
    pub fn duplicate(&self, layout: &mut Layout, id: &ElementId) -> Result<ElementId, LayoutError> {
        let source = layout
            .element(id)
            .cloned()
            .ok_or_else(|| LayoutError::ElementNotFound(id.clone()))?;
        self.place_copy(&source, layout)
    }

    fn place_copy(&self, source: &Element, layout: &mut Layout) -> Result<ElementId, LayoutError> {
        let mut id = ElementId::generate();
        while layout.contains(&id) {
            id = ElementId::generate();
        }

        let mut copy = geometry::translate(source, self.paste_offset, self.paste_offset);
        copy.id = id.clone();
        copy.z_index = layout.max_z_index().saturating_add(1);
        let copy = geometry::clamp_position(&copy);

        layout.push_element(copy)?;
        debug!(source = %source.id, new = %id, "pasted element");
        Ok(id)
    }
}

impl Default for Clipboard {
    fn default() -> Self {
        Self::new(DEFAULT_PASTE_OFFSET)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! The layout aggregate: elements, shared text content, and editor metadata.
//!
//! # Invariants
//!
//! Every mutation that goes through a [`Layout`] method leaves it satisfying:
//!
//! 1. `0 ≤ left`, `0 ≤ top`, `left + width ≤ 100`, `top + height ≤ 100`
//! 2. `width ≥ 5`, `height ≥ 3`
//! 3. `zIndex ≥ 1`
//! 4. at least one element
//! 5. element ids are unique
//!
//! Geometry (1–3) is repaired silently by clamping.  Structural problems (4–5)
//! are rejected with a [`LayoutError`] before anything is mutated.
//!
//! A `Layout` deserialized from JSON is *not* checked automatically, because the
//! persisted schema belongs to an external backend that may hold anything.
//! Call [`Layout::normalize`] (or [`Layout::validate`]) on untrusted input.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::aspect::AspectRatio;
use crate::domain::element::{Element, ElementId, Role};
use crate::geometry;

/// Tolerance used when checking geometric invariants on floating point values.
const EPSILON: f64 = 1e-9;

/// Errors raised by layout mutations and validation.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum LayoutError {
    /// The layout has (or would be left with) zero elements.
    #[error("a layout must contain at least one element")]
    NoElements,

    /// Two elements share the same id.
    #[error("duplicate element id: {0}")]
    DuplicateId(ElementId),

    /// An element violates the canvas bounds or minimum size.
    #[error("element {0} is outside the canvas or below the minimum size")]
    OutOfBounds(ElementId),

    /// No element with this id exists in the layout.
    #[error("element not found: {0}")]
    ElementNotFound(ElementId),
}

impl LayoutError {
    /// `true` for errors that mean "this layout may not be saved or reduced to".
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            LayoutError::NoElements | LayoutError::DuplicateId(_) | LayoutError::OutOfBounds(_)
        )
    }
}

/// Which template preset a layout was generated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutType {
    #[default]
    Default,
    Advertorial,
    News,
    Card,
}

impl LayoutType {
    pub const ALL: [LayoutType; 4] = [
        LayoutType::Default,
        LayoutType::Advertorial,
        LayoutType::News,
        LayoutType::Card,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LayoutType::Default => "default",
            LayoutType::Advertorial => "advertorial",
            LayoutType::News => "news",
            LayoutType::Card => "card",
        }
    }
}

impl std::str::FromStr for LayoutType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LayoutType::ALL
            .into_iter()
            .find(|t| t.as_str() == s.trim())
            .ok_or_else(|| format!("unknown layout type: {s:?}"))
    }
}

/// Role-keyed text shared by every element of the same role.
///
/// There is one value per role: two `title` elements both display
/// [`Content::title`], and editing either one overwrites it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub persona: String,
    #[serde(default)]
    pub cta_label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub news_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_text: Option<String>,
    /// Free text shown by `text` elements.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Content {
    /// The text displayed by elements of `role`, or `None` for graphic roles.
    ///
    /// Optional slots that were never set read as the empty string.
    pub fn text_for(&self, role: Role) -> Option<&str> {
        match role {
            Role::Title => Some(&self.title),
            Role::Subtitle => Some(&self.subtitle),
            Role::Persona => Some(&self.persona),
            Role::Cta => Some(&self.cta_label),
            Role::NewsTitle => Some(self.news_title.as_deref().unwrap_or("")),
            Role::SourceLabel => Some(self.source_label.as_deref().unwrap_or("")),
            Role::CardText => Some(self.card_text.as_deref().unwrap_or("")),
            Role::Text => Some(self.text.as_deref().unwrap_or("")),
            Role::Logo | Role::Separator | Role::Image => None,
        }
    }

    /// Stores `text` in the slot for `role`.
    ///
    /// Returns `false` (and changes nothing) for roles without a text slot.
    pub fn set_text(&mut self, role: Role, text: impl Into<String>) -> bool {
        let text = text.into();
        match role {
            Role::Title => self.title = text,
            Role::Subtitle => self.subtitle = text,
            Role::Persona => self.persona = text,
            Role::Cta => self.cta_label = text,
            Role::NewsTitle => self.news_title = Some(text),
            Role::SourceLabel => self.source_label = Some(text),
            Role::CardText => self.card_text = Some(text),
            Role::Text => self.text = Some(text),
            Role::Logo | Role::Separator | Role::Image => return false,
        }
        true
    }
}

fn default_grid_size() -> f64 {
    5.0
}

/// Editor metadata stored alongside the elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    #[serde(default)]
    pub snap_to_grid: bool,
    #[serde(default = "default_grid_size")]
    pub grid_size: f64,
    #[serde(default)]
    pub aspect_ratio: AspectRatio,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_type: Option<LayoutType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_edited_by: Option<String>,
    #[serde(default = "Utc::now")]
    pub edited_at: DateTime<Utc>,
    /// Number of the last persisted version this layout corresponds to.
    #[serde(default)]
    pub version: u64,
}

impl Meta {
    pub fn new(aspect_ratio: AspectRatio, layout_type: Option<LayoutType>) -> Self {
        Self {
            snap_to_grid: false,
            grid_size: default_grid_size(),
            aspect_ratio,
            layout_type,
            last_edited_by: None,
            edited_at: Utc::now(),
            version: 0,
        }
    }
}

/// The full set of elements plus shared content and metadata for one creative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    elements: Vec<Element>,
    #[serde(default)]
    content: Content,
    meta: Meta,
}

impl Layout {
    /// Builds a layout, clamping geometry and rejecting structural violations.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::NoElements`] for an empty element list and
    /// [`LayoutError::DuplicateId`] when two elements share an id.
    pub fn new(elements: Vec<Element>, content: Content, meta: Meta) -> Result<Self, LayoutError> {
        Self {
            elements,
            content,
            meta,
        }
        .normalize()
    }

    /// Builds a layout from parts that are non-empty with unique ids by
    /// construction (templates, legacy conversion).  Geometry is still clamped.
    pub(crate) fn assemble(elements: Vec<Element>, content: Content, meta: Meta) -> Self {
        debug_assert!(!elements.is_empty());
        debug_assert!(check_unique_ids(&elements).is_ok());
        Self {
            elements: elements.iter().map(geometry::clamp).collect(),
            content,
            meta,
        }
    }

    /// Clamps every element into the canvas and checks the structural invariants.
    ///
    /// # Errors
    ///
    /// Same as [`Layout::new`].
    pub fn normalize(mut self) -> Result<Self, LayoutError> {
        if self.elements.is_empty() {
            return Err(LayoutError::NoElements);
        }
        check_unique_ids(&self.elements)?;
        for el in &mut self.elements {
            *el = geometry::clamp(el);
        }
        Ok(self)
    }

    /// Checks every invariant without modifying anything.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.elements.is_empty() {
            return Err(LayoutError::NoElements);
        }
        check_unique_ids(&self.elements)?;
        for el in &self.elements {
            let in_bounds = el.left >= -EPSILON
                && el.top >= -EPSILON
                && el.right() <= 100.0 + EPSILON
                && el.bottom() <= 100.0 + EPSILON
                && el.width >= geometry::MIN_WIDTH - EPSILON
                && el.height >= geometry::MIN_HEIGHT - EPSILON
                && el.z_index >= 1;
            if !in_bounds {
                return Err(LayoutError::OutOfBounds(el.id.clone()));
            }
        }
        Ok(())
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn element(&self, id: &ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| &e.id == id)
    }

    pub fn contains(&self, id: &ElementId) -> bool {
        self.element(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Always `false` for a layout that went through [`Layout::new`].
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    pub fn content_mut(&mut self) -> &mut Content {
        &mut self.content
    }

    pub fn meta(&self) -> &Meta {
        &self.meta
    }

    pub fn meta_mut(&mut self) -> &mut Meta {
        &mut self.meta
    }

    /// Highest z-index in use.
    pub fn max_z_index(&self) -> u32 {
        self.elements.iter().map(|e| e.z_index).max().unwrap_or(1)
    }

    /// Elements sorted back to front, the order a renderer paints them in.
    pub fn paint_order(&self) -> Vec<&Element> {
        let mut sorted: Vec<&Element> = self.elements.iter().collect();
        sorted.sort_by_key(|e| e.z_index);
        sorted
    }

    /// Appends an element after clamping it into the canvas.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::DuplicateId`] if the id is already in use.
    pub fn push_element(&mut self, element: Element) -> Result<&Element, LayoutError> {
        if self.contains(&element.id) {
            return Err(LayoutError::DuplicateId(element.id));
        }
        self.elements.push(geometry::clamp(&element));
        Ok(&self.elements[self.elements.len() - 1])
    }

    /// Removes an element.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::ElementNotFound`] for an unknown id and
    /// [`LayoutError::NoElements`] when it is the last remaining element; the
    /// layout is unchanged in both cases.
    pub fn remove_element(&mut self, id: &ElementId) -> Result<Element, LayoutError> {
        let index = self.index_of(id)?;
        if self.elements.len() == 1 {
            return Err(LayoutError::NoElements);
        }
        Ok(self.elements.remove(index))
    }

    /// Replaces an element with `update(current)`, clamped into the canvas.
    ///
    /// The element keeps its id whatever `update` returns.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::ElementNotFound`] for an unknown id.
    pub fn update_element<F>(&mut self, id: &ElementId, update: F) -> Result<&Element, LayoutError>
    where
        F: FnOnce(&Element) -> Element,
    {
        let index = self.index_of(id)?;
        let mut next = geometry::clamp(&update(&self.elements[index]));
        next.id = id.clone();
        self.elements[index] = next;
        Ok(&self.elements[index])
    }

    /// Records who edited the layout and when.
    pub fn touch(&mut self, edited_by: Option<&str>) {
        self.meta.edited_at = Utc::now();
        if let Some(who) = edited_by {
            self.meta.last_edited_by = Some(who.to_string());
        }
    }

    fn index_of(&self, id: &ElementId) -> Result<usize, LayoutError> {
        self.elements
            .iter()
            .position(|e| &e.id == id)
            .ok_or_else(|| LayoutError::ElementNotFound(id.clone()))
    }
}

fn check_unique_ids(elements: &[Element]) -> Result<(), LayoutError> {
    let mut seen = HashSet::with_capacity(elements.len());
    for el in elements {
        if !seen.insert(&el.id) {
            return Err(LayoutError::DuplicateId(el.id.clone()));
        }
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::element::ElementKind;

    fn title(id: &str, left: f64, top: f64, width: f64, height: f64) -> Element {
        Element::new(ElementKind::Title, left, top, width, height).with_id(id)
    }

    fn make_layout(elements: Vec<Element>) -> Layout {
        Layout::new(elements, Content::default(), Meta::new(AspectRatio::Square, None))
            .expect("valid layout")
    }

    // ── construction ──────────────────────────────────────────────────────────

    #[test]
    fn test_new_rejects_empty_element_list() {
        let result = Layout::new(vec![], Content::default(), Meta::new(AspectRatio::Square, None));
        assert_eq!(result, Err(LayoutError::NoElements));
    }

    #[test]
    fn test_new_rejects_duplicate_ids() {
        let result = Layout::new(
            vec![title("a", 0.0, 0.0, 10.0, 10.0), title("a", 20.0, 20.0, 10.0, 10.0)],
            Content::default(),
            Meta::new(AspectRatio::Square, None),
        );
        assert_eq!(result, Err(LayoutError::DuplicateId(ElementId::from("a"))));
    }

    #[test]
    fn test_new_clamps_out_of_bounds_geometry() {
        let layout = make_layout(vec![title("a", -10.0, 95.0, 2.0, 1.0)]);

        let el = &layout.elements()[0];
        assert_eq!(el.left, 0.0);
        assert_eq!(el.width, geometry::MIN_WIDTH);
        assert_eq!(el.height, geometry::MIN_HEIGHT);
        assert!(el.bottom() <= 100.0);
        assert!(layout.validate().is_ok());
    }

    // ── validate ──────────────────────────────────────────────────────────────

    #[test]
    fn test_validate_reports_unclamped_deserialized_element() {
        let json = r#"{
            "elements": [{"id":"x","role":"title","left":90,"top":0,"width":20,"height":10}],
            "meta": {"aspectRatio":"1:1"}
        }"#;
        let layout: Layout = serde_json::from_str(json).unwrap();

        assert_eq!(layout.validate(), Err(LayoutError::OutOfBounds(ElementId::from("x"))));
        assert!(layout.normalize().unwrap().validate().is_ok());
    }

    #[test]
    fn test_validate_reports_empty_deserialized_layout() {
        let json = r#"{ "elements": [], "meta": {} }"#;
        let layout: Layout = serde_json::from_str(json).unwrap();
        assert_eq!(layout.validate(), Err(LayoutError::NoElements));
    }

    // ── mutations ─────────────────────────────────────────────────────────────

    #[test]
    fn test_remove_element_rejects_last_element() {
        let mut layout = make_layout(vec![title("a", 0.0, 0.0, 10.0, 10.0)]);

        let result = layout.remove_element(&ElementId::from("a"));

        assert_eq!(result, Err(LayoutError::NoElements));
        assert_eq!(layout.len(), 1);
    }

    #[test]
    fn test_remove_element_unknown_id_returns_not_found() {
        let mut layout = make_layout(vec![title("a", 0.0, 0.0, 10.0, 10.0)]);
        let result = layout.remove_element(&ElementId::from("zzz"));
        assert_eq!(result, Err(LayoutError::ElementNotFound(ElementId::from("zzz"))));
    }

    #[test]
    fn test_remove_element_succeeds_with_two_elements() {
        let mut layout = make_layout(vec![
            title("a", 0.0, 0.0, 10.0, 10.0),
            title("b", 20.0, 20.0, 10.0, 10.0),
        ]);
        let removed = layout.remove_element(&ElementId::from("a")).unwrap();
        assert_eq!(removed.id, ElementId::from("a"));
        assert_eq!(layout.len(), 1);
    }

    #[test]
    fn test_push_element_rejects_duplicate_id() {
        let mut layout = make_layout(vec![title("a", 0.0, 0.0, 10.0, 10.0)]);
        let result = layout.push_element(title("a", 50.0, 50.0, 10.0, 10.0)).map(|e| e.id.clone());
        assert_eq!(result, Err(LayoutError::DuplicateId(ElementId::from("a"))));
        assert_eq!(layout.len(), 1);
    }

    #[test]
    fn test_update_element_clamps_and_keeps_id() {
        let mut layout = make_layout(vec![title("a", 10.0, 10.0, 20.0, 10.0)]);

        let updated = layout
            .update_element(&ElementId::from("a"), |el| {
                let mut next = el.clone();
                next.id = ElementId::from("renamed");
                next.left = 150.0;
                next
            })
            .unwrap()
            .clone();

        assert_eq!(updated.id, ElementId::from("a"));
        assert!(updated.right() <= 100.0);
        assert!(layout.validate().is_ok());
    }

    #[test]
    fn test_paint_order_sorts_by_z_index() {
        let layout = make_layout(vec![
            title("top", 0.0, 0.0, 10.0, 10.0).with_z_index(3),
            title("bottom", 0.0, 0.0, 10.0, 10.0).with_z_index(1),
        ]);
        let order: Vec<&str> = layout.paint_order().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(order, vec!["bottom", "top"]);
        assert_eq!(layout.max_z_index(), 3);
    }

    // ── content ───────────────────────────────────────────────────────────────

    #[test]
    fn test_content_set_text_targets_role_slot() {
        let mut content = Content::default();
        assert!(content.set_text(Role::Cta, "Buy now"));
        assert!(content.set_text(Role::NewsTitle, "Breaking"));
        assert_eq!(content.cta_label, "Buy now");
        assert_eq!(content.text_for(Role::NewsTitle), Some("Breaking"));
    }

    #[test]
    fn test_content_graphic_roles_have_no_text() {
        let mut content = Content::default();
        assert!(!content.set_text(Role::Logo, "ignored"));
        assert_eq!(content.text_for(Role::Image), None);
        assert_eq!(content, Content::default());
    }

    #[test]
    fn test_content_unset_optional_slot_reads_empty() {
        let content = Content::default();
        assert_eq!(content.text_for(Role::SourceLabel), Some(""));
    }

    // ── serde ─────────────────────────────────────────────────────────────────

    #[test]
    fn test_meta_uses_camel_case_keys() {
        let mut meta = Meta::new(AspectRatio::Story, Some(LayoutType::News));
        meta.last_edited_by = Some("alice".to_string());
        let value = serde_json::to_value(&meta).unwrap();
        assert_eq!(value["aspectRatio"], "9:16");
        assert_eq!(value["layoutType"], "news");
        assert_eq!(value["snapToGrid"], false);
        assert_eq!(value["lastEditedBy"], "alice");
        assert!(value.get("editedAt").is_some());
    }

    #[test]
    fn test_layout_type_parses_names() {
        assert_eq!("card".parse::<LayoutType>(), Ok(LayoutType::Card));
        assert!("poster".parse::<LayoutType>().is_err());
    }
}

//! One-way conversion from the legacy fixed-field wireframe description.
//!
//! The legacy format names each role once and places it with coarse enum
//! positions (`top-left`, `middle`, `right`, …) instead of coordinates:
//!
//! ```json
//! {
//!   "logo":     { "position": "top-right", "size": "small" },
//!   "title":    { "text": "Spring sale", "align": "center", "position": "top" },
//!   "persona":  { "text": "Runners", "type": "human", "position": "left" },
//!   "separator": true,
//!   "cta":      { "label": "Shop now" },
//!   "aspectRatio": "4:5"
//! }
//! ```
//!
//! Conversion never fails: malformed JSON, unknown enum values, or a
//! description with nothing to place all fall back to the `default` template.

use serde::Deserialize;
use tracing::{debug, warn};

use crate::domain::aspect::AspectRatio;
use crate::domain::element::{Element, ElementKind, PersonType};
use crate::domain::layout::{Content, Layout, LayoutType, Meta};
use crate::templates;

// ── Legacy schema ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LogoPosition {
    #[default]
    TopLeft,
    TopCenter,
    TopRight,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogoSize {
    Small,
    #[default]
    Medium,
    Large,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalSlot {
    Left,
    #[default]
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalSlot {
    #[default]
    Top,
    Middle,
    Bottom,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LegacyLogo {
    #[serde(default)]
    pub position: LogoPosition,
    #[serde(default)]
    pub size: LogoSize,
    #[serde(default)]
    pub src: Option<String>,
}

/// Shape shared by `title` and `subtitle`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LegacyText {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub align: HorizontalSlot,
    #[serde(default)]
    pub position: VerticalSlot,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LegacyPersona {
    #[serde(default)]
    pub text: String,
    #[serde(default, rename = "type")]
    pub person_type: Option<PersonType>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default = "left_slot")]
    pub position: HorizontalSlot,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LegacyCta {
    #[serde(default)]
    pub label: String,
    #[serde(default = "right_slot")]
    pub position: HorizontalSlot,
}

fn left_slot() -> HorizontalSlot {
    HorizontalSlot::Left
}

fn right_slot() -> HorizontalSlot {
    HorizontalSlot::Right
}

/// The legacy wireframe description as a whole.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyWireframe {
    #[serde(default)]
    pub logo: Option<LegacyLogo>,
    #[serde(default)]
    pub title: Option<LegacyText>,
    #[serde(default)]
    pub subtitle: Option<LegacyText>,
    #[serde(default)]
    pub persona: Option<LegacyPersona>,
    #[serde(default)]
    pub separator: bool,
    #[serde(default)]
    pub cta: Option<LegacyCta>,
    #[serde(default)]
    pub aspect_ratio: Option<AspectRatio>,
}

// ── Placement ─────────────────────────────────────────────────────────────────

const MARGIN: f64 = 5.0;

/// Left edge of a box of `width` placed in a horizontal slot.
fn horizontal(slot: HorizontalSlot, width: f64) -> f64 {
    match slot {
        HorizontalSlot::Left => MARGIN,
        HorizontalSlot::Center => (100.0 - width) / 2.0,
        HorizontalSlot::Right => 100.0 - MARGIN - width,
    }
}

impl LogoSize {
    fn dimensions(self) -> (f64, f64) {
        match self {
            LogoSize::Small => (12.0, 6.0),
            LogoSize::Medium => (18.0, 9.0),
            LogoSize::Large => (25.0, 12.0),
        }
    }
}

impl LogoPosition {
    fn as_slot(self) -> HorizontalSlot {
        match self {
            LogoPosition::TopLeft => HorizontalSlot::Left,
            LogoPosition::TopCenter => HorizontalSlot::Center,
            LogoPosition::TopRight => HorizontalSlot::Right,
        }
    }
}

impl LegacyWireframe {
    /// Parses the legacy JSON description.
    pub fn parse(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Places every described role on a canvas of `ratio`.
    ///
    /// Returns `None` when the description contains nothing to place.
    pub fn into_layout(self, ratio: AspectRatio) -> Option<Layout> {
        let mut elements = Vec::new();
        let mut content = Content::default();

        if let Some(logo) = self.logo {
            let (w, h) = logo.size.dimensions();
            let left = horizontal(logo.position.as_slot(), w);
            elements.push(Element::new(ElementKind::Logo { src: logo.src }, left, MARGIN, w, h));
        }
        if let Some(title) = self.title {
            let top = match title.position {
                VerticalSlot::Top => 20.0,
                VerticalSlot::Middle => 40.0,
                VerticalSlot::Bottom => 62.0,
            };
            let w = 80.0;
            elements.push(Element::new(ElementKind::Title, horizontal(title.align, w), top, w, 12.0));
            content.title = title.text;
        }
        if let Some(subtitle) = self.subtitle {
            let top = match subtitle.position {
                VerticalSlot::Top => 34.0,
                VerticalSlot::Middle => 54.0,
                VerticalSlot::Bottom => 76.0,
            };
            let w = 70.0;
            elements.push(Element::new(
                ElementKind::Subtitle,
                horizontal(subtitle.align, w),
                top,
                w,
                8.0,
            ));
            content.subtitle = subtitle.text;
        }
        if self.separator {
            elements.push(Element::new(ElementKind::Separator, 30.0, 66.0, 40.0, 3.0));
        }
        if let Some(persona) = self.persona {
            let w = 30.0;
            elements.push(Element::new(
                ElementKind::Persona {
                    person_type: persona.person_type,
                    person_color: persona.color,
                },
                horizontal(persona.position, w),
                86.0,
                w,
                6.0,
            ));
            content.persona = persona.text;
        }
        if let Some(cta) = self.cta {
            let w = 35.0;
            elements.push(Element::new(ElementKind::Cta, horizontal(cta.position, w), 82.0, w, 10.0));
            content.cta_label = cta.label;
        }

        if elements.is_empty() {
            return None;
        }
        let elements = elements
            .into_iter()
            .enumerate()
            .map(|(i, el)| el.with_z_index(i as u32 + 1))
            .collect();
        Some(Layout::assemble(elements, content, Meta::new(ratio, None)))
    }
}

/// Converts a legacy description to a [`Layout`].
///
/// The canvas ratio is `ratio_override` if given, else the description's own
/// `aspectRatio`, else `1:1`.  Anything unusable yields the `default` template.
pub fn convert_legacy(json: &str, ratio_override: Option<AspectRatio>) -> Layout {
    let fallback_ratio = ratio_override.unwrap_or_default();

    let wireframe = match LegacyWireframe::parse(json) {
        Ok(w) => w,
        Err(e) => {
            warn!(error = %e, "legacy wireframe is malformed; using default template");
            return templates::generate(LayoutType::Default, fallback_ratio, None);
        }
    };

    let ratio = ratio_override
        .or(wireframe.aspect_ratio)
        .unwrap_or_default();

    match wireframe.into_layout(ratio) {
        Some(layout) => {
            debug!(elements = layout.len(), ratio = %ratio, "converted legacy wireframe");
            layout
        }
        None => {
            warn!("legacy wireframe describes no elements; using default template");
            templates::generate(LayoutType::Default, ratio, None)
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::element::Role;

    fn find(layout: &Layout, role: Role) -> &Element {
        layout
            .elements()
            .iter()
            .find(|e| e.role() == role)
            .unwrap_or_else(|| panic!("no {role:?} element"))
    }

    #[test]
    fn test_convert_full_description() {
        let json = r##"{
            "logo": { "position": "top-right", "size": "small", "src": "brand.png" },
            "title": { "text": "Spring sale", "align": "left", "position": "middle" },
            "subtitle": { "text": "Up to 50% off" },
            "persona": { "text": "Runners", "type": "product", "color": "#ff0000" },
            "separator": true,
            "cta": { "label": "Shop now", "position": "center" },
            "aspectRatio": "4:5"
        }"##;

        let layout = convert_legacy(json, None);

        assert_eq!(layout.len(), 6);
        assert!(layout.validate().is_ok());
        assert_eq!(layout.meta().aspect_ratio, AspectRatio::Portrait);
        assert_eq!(layout.content().title, "Spring sale");
        assert_eq!(layout.content().subtitle, "Up to 50% off");
        assert_eq!(layout.content().persona, "Runners");
        assert_eq!(layout.content().cta_label, "Shop now");

        let logo = find(&layout, Role::Logo);
        assert_eq!(logo.kind, ElementKind::Logo { src: Some("brand.png".to_string()) });
        assert_eq!(logo.right(), 95.0);

        let title = find(&layout, Role::Title);
        assert_eq!(title.left, MARGIN);
        assert_eq!(title.top, 40.0);

        let cta = find(&layout, Role::Cta);
        assert_eq!(cta.left, 32.5);

        let persona = find(&layout, Role::Persona);
        assert_eq!(persona.left, MARGIN);
        assert_eq!(
            persona.kind,
            ElementKind::Persona {
                person_type: Some(PersonType::Product),
                person_color: Some("#ff0000".to_string()),
            }
        );
    }

    #[test]
    fn test_convert_assigns_increasing_z_index() {
        let layout = convert_legacy(r#"{"title":{"text":"a"},"cta":{"label":"b"}}"#, None);
        let z: Vec<u32> = layout.elements().iter().map(|e| e.z_index).collect();
        assert_eq!(z, vec![1, 2]);
    }

    #[test]
    fn test_convert_separator_false_is_skipped() {
        let layout = convert_legacy(r#"{"title":{"text":"a"},"separator":false}"#, None);
        assert_eq!(layout.len(), 1);
    }

    #[test]
    fn test_convert_ratio_override_wins() {
        let layout = convert_legacy(
            r#"{"title":{"text":"a"},"aspectRatio":"4:5"}"#,
            Some(AspectRatio::Landscape),
        );
        assert_eq!(layout.meta().aspect_ratio, AspectRatio::Landscape);
    }

    #[test]
    fn test_convert_malformed_json_falls_back_to_default_template() {
        let layout = convert_legacy("{ not json", Some(AspectRatio::Story));

        assert_eq!(layout.meta().layout_type, Some(LayoutType::Default));
        assert_eq!(layout.meta().aspect_ratio, AspectRatio::Story);
        assert!(layout.validate().is_ok());
    }

    #[test]
    fn test_convert_unknown_enum_value_falls_back() {
        let layout = convert_legacy(r#"{"logo":{"position":"bottom-left"}}"#, None);
        assert_eq!(layout.meta().layout_type, Some(LayoutType::Default));
    }

    #[test]
    fn test_convert_empty_description_falls_back() {
        let layout = convert_legacy("{}", None);
        assert_eq!(layout.meta().layout_type, Some(LayoutType::Default));
        assert!(!layout.is_empty());
    }

    #[test]
    fn test_convert_empty_input_falls_back() {
        let layout = convert_legacy("", None);
        assert_eq!(layout.meta().layout_type, Some(LayoutType::Default));
    }
}

//! Template factory: deterministic starting layouts.
//!
//! Each preset ([`LayoutType`]) has one placement table per canvas family:
//! square (`1:1`), tall (`4:5`, `9:16`), and wide (`16:9`).  Generating the same
//! `(preset, ratio)` pair twice always produces the same roles at the same
//! geometry; only the element ids are fresh on every call.
//!
//! Elements are stacked in table order, so the first slot is painted at the
//! back (`zIndex = 1`).

use crate::domain::aspect::AspectRatio;
use crate::domain::element::{Element, ElementKind, PersonType, Role};
use crate::domain::layout::{Content, Layout, LayoutType, Meta};

/// Colour given to the persona tag of a freshly generated layout.
const DEFAULT_PERSONA_COLOR: &str = "#1f6feb";

/// One element placement in a preset table.
struct Slot {
    role: Role,
    left: f64,
    top: f64,
    width: f64,
    height: f64,
}

const fn slot(role: Role, left: f64, top: f64, width: f64, height: f64) -> Slot {
    Slot {
        role,
        left,
        top,
        width,
        height,
    }
}

// ── Placement tables ──────────────────────────────────────────────────────────

const DEFAULT_SQUARE: &[Slot] = &[
    slot(Role::Logo, 5.0, 5.0, 20.0, 10.0),
    slot(Role::Title, 10.0, 28.0, 80.0, 14.0),
    slot(Role::Subtitle, 15.0, 44.0, 70.0, 8.0),
    slot(Role::Separator, 30.0, 55.0, 40.0, 3.0),
    slot(Role::Persona, 5.0, 84.0, 30.0, 6.0),
    slot(Role::Cta, 55.0, 82.0, 40.0, 10.0),
];

const DEFAULT_TALL: &[Slot] = &[
    slot(Role::Logo, 5.0, 4.0, 30.0, 7.0),
    slot(Role::Title, 8.0, 30.0, 84.0, 12.0),
    slot(Role::Subtitle, 10.0, 44.0, 80.0, 7.0),
    slot(Role::Separator, 30.0, 54.0, 40.0, 3.0),
    slot(Role::Persona, 5.0, 88.0, 40.0, 5.0),
    slot(Role::Cta, 20.0, 74.0, 60.0, 8.0),
];

const DEFAULT_WIDE: &[Slot] = &[
    slot(Role::Logo, 3.0, 6.0, 14.0, 14.0),
    slot(Role::Title, 5.0, 30.0, 55.0, 16.0),
    slot(Role::Subtitle, 5.0, 50.0, 50.0, 10.0),
    slot(Role::Separator, 5.0, 63.0, 25.0, 3.0),
    slot(Role::Persona, 70.0, 10.0, 25.0, 8.0),
    slot(Role::Cta, 65.0, 72.0, 30.0, 14.0),
];

const ADVERTORIAL_SQUARE: &[Slot] = &[
    slot(Role::Image, 5.0, 15.0, 90.0, 40.0),
    slot(Role::Logo, 5.0, 4.0, 18.0, 8.0),
    slot(Role::Title, 5.0, 58.0, 90.0, 10.0),
    slot(Role::Text, 5.0, 70.0, 90.0, 12.0),
    slot(Role::SourceLabel, 5.0, 90.0, 30.0, 5.0),
    slot(Role::Cta, 60.0, 86.0, 35.0, 9.0),
];

const ADVERTORIAL_TALL: &[Slot] = &[
    slot(Role::Image, 0.0, 12.0, 100.0, 40.0),
    slot(Role::Logo, 5.0, 3.0, 25.0, 6.0),
    slot(Role::Title, 5.0, 55.0, 90.0, 9.0),
    slot(Role::Text, 5.0, 66.0, 90.0, 12.0),
    slot(Role::SourceLabel, 5.0, 92.0, 35.0, 4.0),
    slot(Role::Cta, 55.0, 82.0, 40.0, 7.0),
];

const ADVERTORIAL_WIDE: &[Slot] = &[
    slot(Role::Image, 0.0, 0.0, 50.0, 100.0),
    slot(Role::Logo, 55.0, 5.0, 12.0, 12.0),
    slot(Role::Title, 55.0, 20.0, 40.0, 14.0),
    slot(Role::Text, 55.0, 38.0, 40.0, 25.0),
    slot(Role::SourceLabel, 55.0, 88.0, 25.0, 7.0),
    slot(Role::Cta, 55.0, 68.0, 30.0, 14.0),
];

const NEWS_SQUARE: &[Slot] = &[
    slot(Role::Image, 0.0, 0.0, 100.0, 55.0),
    slot(Role::Logo, 5.0, 5.0, 18.0, 8.0),
    slot(Role::NewsTitle, 5.0, 60.0, 90.0, 18.0),
    slot(Role::Separator, 5.0, 80.0, 30.0, 3.0),
    slot(Role::SourceLabel, 5.0, 86.0, 40.0, 5.0),
];

const NEWS_TALL: &[Slot] = &[
    slot(Role::Image, 0.0, 0.0, 100.0, 55.0),
    slot(Role::Logo, 5.0, 4.0, 25.0, 6.0),
    slot(Role::NewsTitle, 5.0, 60.0, 90.0, 15.0),
    slot(Role::Separator, 5.0, 78.0, 30.0, 3.0),
    slot(Role::SourceLabel, 5.0, 84.0, 45.0, 4.0),
];

const NEWS_WIDE: &[Slot] = &[
    slot(Role::Image, 0.0, 0.0, 55.0, 100.0),
    slot(Role::Logo, 60.0, 6.0, 15.0, 12.0),
    slot(Role::NewsTitle, 60.0, 25.0, 36.0, 35.0),
    slot(Role::Separator, 60.0, 64.0, 20.0, 3.0),
    slot(Role::SourceLabel, 60.0, 72.0, 30.0, 8.0),
];

const CARD_SQUARE: &[Slot] = &[
    slot(Role::Image, 10.0, 8.0, 80.0, 45.0),
    slot(Role::Title, 10.0, 57.0, 80.0, 10.0),
    slot(Role::CardText, 10.0, 69.0, 80.0, 16.0),
    slot(Role::Cta, 30.0, 88.0, 40.0, 8.0),
];

const CARD_TALL: &[Slot] = &[
    slot(Role::Image, 8.0, 6.0, 84.0, 40.0),
    slot(Role::Title, 8.0, 50.0, 84.0, 8.0),
    slot(Role::CardText, 8.0, 60.0, 84.0, 18.0),
    slot(Role::Cta, 25.0, 84.0, 50.0, 7.0),
];

const CARD_WIDE: &[Slot] = &[
    slot(Role::Image, 5.0, 10.0, 40.0, 80.0),
    slot(Role::Title, 50.0, 15.0, 45.0, 14.0),
    slot(Role::CardText, 50.0, 33.0, 45.0, 35.0),
    slot(Role::Cta, 50.0, 74.0, 30.0, 14.0),
];

fn slots(kind: LayoutType, ratio: AspectRatio) -> &'static [Slot] {
    match (kind, ratio) {
        (LayoutType::Default, AspectRatio::Square) => DEFAULT_SQUARE,
        (LayoutType::Default, AspectRatio::Portrait | AspectRatio::Story) => DEFAULT_TALL,
        (LayoutType::Default, AspectRatio::Landscape) => DEFAULT_WIDE,
        (LayoutType::Advertorial, AspectRatio::Square) => ADVERTORIAL_SQUARE,
        (LayoutType::Advertorial, AspectRatio::Portrait | AspectRatio::Story) => ADVERTORIAL_TALL,
        (LayoutType::Advertorial, AspectRatio::Landscape) => ADVERTORIAL_WIDE,
        (LayoutType::News, AspectRatio::Square) => NEWS_SQUARE,
        (LayoutType::News, AspectRatio::Portrait | AspectRatio::Story) => NEWS_TALL,
        (LayoutType::News, AspectRatio::Landscape) => NEWS_WIDE,
        (LayoutType::Card, AspectRatio::Square) => CARD_SQUARE,
        (LayoutType::Card, AspectRatio::Portrait | AspectRatio::Story) => CARD_TALL,
        (LayoutType::Card, AspectRatio::Landscape) => CARD_WIDE,
    }
}

/// Placeholder copy shown by a freshly generated layout.
pub fn default_content(kind: LayoutType) -> Content {
    let mut content = Content {
        title: "Your headline here".to_string(),
        subtitle: "A short supporting message".to_string(),
        persona: "Target persona".to_string(),
        cta_label: "Learn more".to_string(),
        ..Content::default()
    };
    match kind {
        LayoutType::Default => {}
        LayoutType::Advertorial => {
            content.text = Some("Advertorial body copy goes here.".to_string());
            content.source_label = Some("Sponsored".to_string());
        }
        LayoutType::News => {
            content.news_title = Some("Breaking: your news headline".to_string());
            content.source_label = Some("Source: publisher".to_string());
        }
        LayoutType::Card => {
            content.card_text = Some("Describe the offer in one or two lines.".to_string());
        }
    }
    content
}

fn kind_for(role: Role) -> ElementKind {
    match role {
        Role::Persona => ElementKind::Persona {
            person_type: Some(PersonType::Human),
            person_color: Some(DEFAULT_PERSONA_COLOR.to_string()),
        },
        other => other.to_kind(),
    }
}

/// Generates the starting layout for `kind` on a canvas of `ratio`.
///
/// `content` replaces the preset's placeholder copy when given.
pub fn generate(kind: LayoutType, ratio: AspectRatio, content: Option<Content>) -> Layout {
    let elements = slots(kind, ratio)
        .iter()
        .enumerate()
        .map(|(i, s)| {
            Element::new(kind_for(s.role), s.left, s.top, s.width, s.height)
                .with_z_index(i as u32 + 1)
        })
        .collect();
    Layout::assemble(
        elements,
        content.unwrap_or_else(|| default_content(kind)),
        Meta::new(ratio, Some(kind)),
    )
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! Canvas elements and their roles.
//!
//! An [`Element`] is one positioned box on the canvas.  What the box *is*
//! (a logo, a title, a persona tag, ...) is carried by its [`ElementKind`],
//! a closed tagged union: role-specific data such as the persona colour or an
//! image source only exists on the variants that use it, and every `match` on
//! the kind is checked for exhaustiveness by the compiler.  Adding a role is a
//! single localized change here plus whatever `match` arms the compiler then
//! points at.
//!
//! # JSON shape
//!
//! The persisted schema is flat: the kind is flattened into the element, with
//! `role` acting as the tag.
//!
//! ```json
//! { "id": "e1", "role": "persona", "personType": "human", "personColor": "#ff0066",
//!   "left": 5, "top": 80, "width": 30, "height": 6, "zIndex": 3, "locked": false }
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier of an element within a layout.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a fresh, globally unique identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// What a persona tag depicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonType {
    Human,
    Product,
    Label,
}

/// Fieldless discriminant of [`ElementKind`], used for lookups and templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    Logo,
    Title,
    Subtitle,
    Persona,
    Separator,
    Cta,
    Text,
    Image,
    NewsTitle,
    SourceLabel,
    CardText,
}

impl Role {
    pub const ALL: [Role; 11] = [
        Role::Logo,
        Role::Title,
        Role::Subtitle,
        Role::Persona,
        Role::Separator,
        Role::Cta,
        Role::Text,
        Role::Image,
        Role::NewsTitle,
        Role::SourceLabel,
        Role::CardText,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Logo => "logo",
            Role::Title => "title",
            Role::Subtitle => "subtitle",
            Role::Persona => "persona",
            Role::Separator => "separator",
            Role::Cta => "cta",
            Role::Text => "text",
            Role::Image => "image",
            Role::NewsTitle => "news-title",
            Role::SourceLabel => "source-label",
            Role::CardText => "card-text",
        }
    }

    /// Whether elements of this role display editable text from `Content`.
    pub fn is_text_capable(self) -> bool {
        match self {
            Role::Logo | Role::Separator | Role::Image => false,
            Role::Title
            | Role::Subtitle
            | Role::Persona
            | Role::Cta
            | Role::Text
            | Role::NewsTitle
            | Role::SourceLabel
            | Role::CardText => true,
        }
    }

    /// Size (width, height in percent) given to a freshly added element.
    pub fn default_size(self) -> (f64, f64) {
        match self {
            Role::Logo => (20.0, 10.0),
            Role::Title => (80.0, 12.0),
            Role::Subtitle => (70.0, 8.0),
            Role::Persona => (30.0, 6.0),
            Role::Separator => (60.0, 3.0),
            Role::Cta => (40.0, 8.0),
            Role::Text => (60.0, 10.0),
            Role::Image => (50.0, 30.0),
            Role::NewsTitle => (84.0, 14.0),
            Role::SourceLabel => (30.0, 4.0),
            Role::CardText => (76.0, 20.0),
        }
    }

    /// Builds the payload-free kind for this role.
    pub fn to_kind(self) -> ElementKind {
        match self {
            Role::Logo => ElementKind::Logo { src: None },
            Role::Title => ElementKind::Title,
            Role::Subtitle => ElementKind::Subtitle,
            Role::Persona => ElementKind::Persona {
                person_type: None,
                person_color: None,
            },
            Role::Separator => ElementKind::Separator,
            Role::Cta => ElementKind::Cta,
            Role::Text => ElementKind::Text,
            Role::Image => ElementKind::Image { src: None },
            Role::NewsTitle => ElementKind::NewsTitle,
            Role::SourceLabel => ElementKind::SourceLabel,
            Role::CardText => ElementKind::CardText,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The role of an element together with its role-specific payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "kebab-case")]
pub enum ElementKind {
    Logo {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        src: Option<String>,
    },
    Title,
    Subtitle,
    Persona {
        #[serde(rename = "personType", default, skip_serializing_if = "Option::is_none")]
        person_type: Option<PersonType>,
        #[serde(rename = "personColor", default, skip_serializing_if = "Option::is_none")]
        person_color: Option<String>,
    },
    Separator,
    Cta,
    Text,
    Image {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        src: Option<String>,
    },
    NewsTitle,
    SourceLabel,
    CardText,
}

impl ElementKind {
    pub fn role(&self) -> Role {
        match self {
            ElementKind::Logo { .. } => Role::Logo,
            ElementKind::Title => Role::Title,
            ElementKind::Subtitle => Role::Subtitle,
            ElementKind::Persona { .. } => Role::Persona,
            ElementKind::Separator => Role::Separator,
            ElementKind::Cta => Role::Cta,
            ElementKind::Text => Role::Text,
            ElementKind::Image { .. } => Role::Image,
            ElementKind::NewsTitle => Role::NewsTitle,
            ElementKind::SourceLabel => Role::SourceLabel,
            ElementKind::CardText => Role::CardText,
        }
    }
}

fn default_z_index() -> u32 {
    1
}

/// One positioned visual unit on the canvas.
///
/// `left`, `top`, `width` and `height` are percentages of the canvas.  An
/// `Element` on its own is a plain value; the bounds invariants are enforced
/// by [`Layout`](crate::Layout) and the [`geometry`](crate::geometry)
/// functions, not by this struct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub id: ElementId,
    #[serde(flatten)]
    pub kind: ElementKind,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default = "default_z_index")]
    pub z_index: u32,
    #[serde(default)]
    pub locked: bool,
}

impl Element {
    /// Creates an unlocked element with a freshly generated id at z-index 1.
    pub fn new(kind: ElementKind, left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            id: ElementId::generate(),
            kind,
            left,
            top,
            width,
            height,
            z_index: 1,
            locked: false,
        }
    }

    pub fn with_id(mut self, id: impl Into<ElementId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_z_index(mut self, z_index: u32) -> Self {
        self.z_index = z_index;
        self
    }

    pub fn role(&self) -> Role {
        self.kind.role()
    }

    /// Right edge in percent.
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Bottom edge in percent.
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn center_x(&self) -> f64 {
        self.left + self.width / 2.0
    }

    pub fn center_y(&self) -> f64 {
        self.top + self.height / 2.0
    }
}

impl From<String> for ElementId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

//! Input events understood by the editor session.
//!
//! Pointer coordinates are pixels relative to the editor container.  The
//! session converts pixel deltas to canvas percent using the container size,
//! so the caller never has to know how large the canvas is drawn.

use serde::{Deserialize, Serialize};
use wireframe_core::{ElementId, Handle};

/// What the pointer went down on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum HitTarget {
    /// Empty canvas area.
    Canvas,
    /// The body of an element.
    Element { id: ElementId },
    /// One of the resize handles drawn around an element.
    Handle { id: ElementId, handle: Handle },
}

/// Keys the session reacts to.  Anything else arrives as `Char` or is dropped
/// by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Key {
    Escape,
    Enter,
    Delete,
    Backspace,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Char(char),
}

impl Key {
    /// `true` if this is the character `c`, ignoring ASCII case.
    pub fn is_char(self, c: char) -> bool {
        matches!(self, Key::Char(k) if k.eq_ignore_ascii_case(&c))
    }
}

/// Modifier keys held while a key was pressed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub alt: bool,
    /// Command on macOS, the Windows key elsewhere.
    #[serde(default)]
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        shift: false,
        alt: false,
        meta: false,
    };

    pub const CTRL: Modifiers = Modifiers {
        ctrl: true,
        ..Modifiers::NONE
    };

    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ..Modifiers::NONE
    };

    pub const CTRL_SHIFT: Modifiers = Modifiers {
        ctrl: true,
        shift: true,
        ..Modifiers::NONE
    };

    /// The platform shortcut modifier: Ctrl, or Command on macOS.
    pub fn command(self) -> bool {
        self.ctrl || self.meta
    }
}

/// One input event delivered to [`EditorSession::handle_event`](super::session::EditorSession::handle_event).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EditorEvent {
    PointerDown { target: HitTarget, x: f64, y: f64 },
    PointerMove { x: f64, y: f64 },
    PointerUp { x: f64, y: f64 },
    KeyDown {
        key: Key,
        #[serde(default)]
        modifiers: Modifiers,
    },
    /// The text field (or the whole editor) lost focus.
    Blur,
    /// The pointer interaction was aborted by the platform.
    Cancel,
}

impl EditorEvent {
    pub fn key(key: Key) -> Self {
        EditorEvent::KeyDown {
            key,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn shortcut(key: Key, modifiers: Modifiers) -> Self {
        EditorEvent::KeyDown { key, modifiers }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_char_ignores_case() {
        assert!(Key::Char('Z').is_char('z'));
        assert!(!Key::Escape.is_char('z'));
    }

    #[test]
    fn test_command_accepts_ctrl_or_meta() {
        assert!(Modifiers::CTRL.command());
        assert!(Modifiers { meta: true, ..Modifiers::NONE }.command());
        assert!(!Modifiers::SHIFT.command());
    }

    #[test]
    fn test_events_parse_from_json() {
        let json = r#"[
            {"type":"pointerDown","target":{"kind":"handle","id":"t","handle":"se"},"x":10,"y":20},
            {"type":"pointerMove","x":15,"y":25},
            {"type":"keyDown","key":{"char":"z"},"modifiers":{"ctrl":true}},
            {"type":"keyDown","key":"escape"},
            {"type":"blur"}
        ]"#;

        let events: Vec<EditorEvent> = serde_json::from_str(json).unwrap();

        assert_eq!(
            events[0],
            EditorEvent::PointerDown {
                target: HitTarget::Handle {
                    id: ElementId::from("t"),
                    handle: Handle::SE
                },
                x: 10.0,
                y: 20.0
            }
        );
        assert_eq!(events[2], EditorEvent::shortcut(Key::Char('z'), Modifiers::CTRL));
        assert_eq!(events[3], EditorEvent::key(Key::Escape));
        assert_eq!(events[4], EditorEvent::Blur);
    }
}

//! EditorSession: the interaction state machine of the layout editor.
//!
//! The session owns the working [`Layout`] for one edit session together with
//! the selection, the active gesture, the text-edit focus, the undo history,
//! and the clipboard.  Input arrives as [`EditorEvent`]s through
//! [`EditorSession::handle_event`]; toolbar actions call the public methods
//! directly.  Both paths end in the same mutations.
//!
//! # States
//!
//! ```text
//!            click element                 down+move on selected
//!   Idle ─────────────────────► Selected ───────────────────────► Dragging
//!    ▲                           │  ▲  ▲                              │
//!    │ click canvas / Escape     │  │  └────────── pointer-up ────────┘
//!    └───────────────────────────┘  │
//!                                   │ blur / Escape      handle down (any state)
//!         click on selected text ──►TextEditing         ──────────────► Resizing
//! ```
//!
//! # History
//!
//! Every discrete action pushes the pre-mutation layout onto the undo stack.
//! A drag or resize pushes once when it starts; the pointer-moves in between
//! do not.  A gesture that ends without changing anything, or is cancelled
//! with Escape, leaves no undo entry behind.
//!
//! # Locked elements
//!
//! Locked elements can still be selected, re-stacked, unlocked and have their
//! text edited.  They cannot be dragged, resized, nudged, aligned or deleted.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};
use wireframe_core::geometry::{self, snap::compute_snap_guides};
use wireframe_core::templates;
use wireframe_core::{
    Alignment, AspectRatio, ContainerSize, Content, Element, ElementId, Guide, Handle, Layout,
    LayoutError, LayoutType, Role, Version,
};

use crate::application::clipboard::{Clipboard, DEFAULT_PASTE_OFFSET};
use crate::application::events::{EditorEvent, HitTarget, Key, Modifiers};
use crate::application::history::History;
use crate::infrastructure::pointer_capture::{CaptureGuard, PointerCapture};

/// Error type for editor session operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EditorError {
    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error("no element is selected")]
    NothingSelected,

    #[error("element {0} has no editable text")]
    NotTextCapable(ElementId),

    #[error("element {0} is locked")]
    ElementLocked(ElementId),

    #[error("no text edit is in progress")]
    NotEditing,
}

impl EditorError {
    /// `true` when the action was rejected because it would break a layout invariant.
    pub fn is_validation(&self) -> bool {
        matches!(self, EditorError::Layout(e) if e.is_validation())
    }
}

/// Runtime tuning for a session.  Built from the config file by
/// `EditorConfig::session_settings`.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSettings {
    /// Maximum number of undo steps kept.
    pub history_limit: usize,
    /// Distance in percent within which a dragged edge snaps to a guide.
    pub snap_threshold: f64,
    /// Arrow-key nudge in percent.
    pub nudge_step: f64,
    /// Shift+arrow nudge in percent.
    pub nudge_step_large: f64,
    /// Offset of pasted and duplicated elements in percent.
    pub paste_offset: f64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            history_limit: History::DEFAULT_LIMIT,
            snap_threshold: 1.0,
            nudge_step: 1.0,
            nudge_step_large: 10.0,
            paste_offset: DEFAULT_PASTE_OFFSET,
        }
    }
}

/// Observer notified with a snapshot after every committed change.
///
/// Continuous pointer-moves are not reported; the gesture is reported once
/// when it ends.
pub trait ChangeListener: Send + Sync {
    fn layout_changed(&self, layout: Arc<Layout>);
}

/// Externally visible interaction state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Idle,
    Selected(ElementId),
    Dragging(ElementId),
    Resizing(ElementId, Handle),
    TextEditing(ElementId),
}

// ── Internal state ────────────────────────────────────────────────────────────

/// Pointer-down on the element that was already selected.  Becomes a drag on
/// the first move, or a text-edit click on pointer-up if it never moved.
#[derive(Debug, Clone, Copy)]
struct Press {
    x: f64,
    y: f64,
    moved: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum GestureKind {
    Drag,
    Resize(Handle),
}

#[derive(Debug)]
struct Gesture {
    id: ElementId,
    kind: GestureKind,
    start: (f64, f64),
    /// The element as it was when the gesture started; every move is computed
    /// from here, not from the previous move.
    origin: Element,
    /// Layout before the gesture; becomes the undo step if the gesture changes it.
    before: Arc<Layout>,
    _capture: CaptureGuard,
}

#[derive(Debug)]
enum State {
    Idle,
    Selected { id: ElementId, press: Option<Press> },
    Gesture(Gesture),
    TextEditing { id: ElementId, buffer: String },
}

// ── Session ───────────────────────────────────────────────────────────────────

pub struct EditorSession {
    layout: Arc<Layout>,
    state: State,
    history: History,
    clipboard: Clipboard,
    settings: SessionSettings,
    container_override: Option<ContainerSize>,
    guides: Vec<Guide>,
    capture: Arc<dyn PointerCapture>,
    listener: Option<Arc<dyn ChangeListener>>,
    revision: u64,
}

impl EditorSession {
    /// Starts a session on `layout`.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Layout`] if the layout is empty or has duplicate
    /// ids.  Out-of-bounds geometry is clamped.
    pub fn new(
        layout: Layout,
        settings: SessionSettings,
        capture: Arc<dyn PointerCapture>,
    ) -> Result<Self, EditorError> {
        let layout = layout.normalize()?;
        Ok(Self {
            layout: Arc::new(layout),
            state: State::Idle,
            history: History::new(settings.history_limit),
            clipboard: Clipboard::new(settings.paste_offset),
            settings,
            container_override: None,
            guides: Vec::new(),
            capture,
            listener: None,
            revision: 0,
        })
    }

    /// Registers the observer that receives a snapshot after each change.
    pub fn set_listener(&mut self, listener: Arc<dyn ChangeListener>) {
        self.listener = Some(listener);
    }

    // ── Read access ───────────────────────────────────────────────────────────

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Shared snapshot of the current layout.
    pub fn snapshot(&self) -> Arc<Layout> {
        Arc::clone(&self.layout)
    }

    pub fn mode(&self) -> Mode {
        match &self.state {
            State::Idle => Mode::Idle,
            State::Selected { id, .. } => Mode::Selected(id.clone()),
            State::Gesture(g) => match g.kind {
                GestureKind::Drag => Mode::Dragging(g.id.clone()),
                GestureKind::Resize(handle) => Mode::Resizing(g.id.clone(), handle),
            },
            State::TextEditing { id, .. } => Mode::TextEditing(id.clone()),
        }
    }

    pub fn selected(&self) -> Option<&ElementId> {
        match &self.state {
            State::Idle => None,
            State::Selected { id, .. } | State::TextEditing { id, .. } => Some(id),
            State::Gesture(g) => Some(&g.id),
        }
    }

    pub fn selected_element(&self) -> Option<&Element> {
        self.selected().and_then(|id| self.layout.element(id))
    }

    /// Alignment guides to draw for the drag in progress.
    pub fn guides(&self) -> &[Guide] {
        &self.guides
    }

    /// The text being edited, pre-filled with the element's current text.
    pub fn text_buffer(&self) -> Option<&str> {
        match &self.state {
            State::TextEditing { buffer, .. } => Some(buffer),
            _ => None,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    /// Pixel size used to convert pointer deltas: the on-screen size if one
    /// was reported, else the aspect ratio's export size.
    pub fn container_size(&self) -> ContainerSize {
        self.container_override
            .unwrap_or_else(|| self.layout.meta().aspect_ratio.canvas_size())
    }

    /// Increments on every committed change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    // ── Event dispatch ────────────────────────────────────────────────────────

    /// Applies one input event.
    ///
    /// # Errors
    ///
    /// Errors are the same as the operation the event maps to (e.g. `Delete`
    /// on the last element yields a validation error).  The session is left
    /// unchanged when an error is returned.
    pub fn handle_event(&mut self, event: EditorEvent) -> Result<(), EditorError> {
        match event {
            EditorEvent::PointerDown { target, x, y } => self.pointer_down(target, x, y),
            EditorEvent::PointerMove { x, y } => {
                self.pointer_move(x, y);
                Ok(())
            }
            EditorEvent::PointerUp { .. } => self.pointer_up(),
            EditorEvent::KeyDown { key, modifiers } => self.key_down(key, modifiers),
            EditorEvent::Blur => self.blur(),
            EditorEvent::Cancel => {
                self.cancel();
                Ok(())
            }
        }
    }

    fn pointer_down(&mut self, target: HitTarget, x: f64, y: f64) -> Result<(), EditorError> {
        match target {
            HitTarget::Canvas => self.clear_selection(),
            HitTarget::Element { id } => {
                if !self.layout.contains(&id) {
                    return Err(LayoutError::ElementNotFound(id).into());
                }
                let editing_same =
                    matches!(&self.state, State::TextEditing { id: editing, .. } if *editing == id);
                if editing_same {
                    // Click inside the active text field.
                    return Ok(());
                }
                let reselect = matches!(&self.state, State::Selected { id: sel, .. } if *sel == id);
                if reselect {
                    self.state = State::Selected {
                        id,
                        press: Some(Press { x, y, moved: false }),
                    };
                    return Ok(());
                }
                self.select(&id)
            }
            HitTarget::Handle { id, handle } => {
                let origin = self
                    .layout
                    .element(&id)
                    .cloned()
                    .ok_or_else(|| LayoutError::ElementNotFound(id.clone()))?;
                self.settle()?;
                if origin.locked {
                    debug!(%id, "resize ignored on locked element");
                    self.state = State::Selected { id, press: None };
                    return Ok(());
                }
                self.begin_gesture(id, GestureKind::Resize(handle), (x, y), origin);
                Ok(())
            }
        }
    }

    fn pointer_move(&mut self, x: f64, y: f64) {
        match &mut self.state {
            State::Selected {
                id,
                press: Some(press),
            } => {
                if press.moved || (x == press.x && y == press.y) {
                    return;
                }
                press.moved = true;
                let start = (press.x, press.y);
                let id = id.clone();
                match self.layout.element(&id) {
                    Some(el) if !el.locked => {
                        let origin = el.clone();
                        self.begin_gesture(id, GestureKind::Drag, start, origin);
                        self.update_gesture(x, y);
                    }
                    _ => debug!(%id, "drag ignored on locked element"),
                }
            }
            State::Gesture(_) => self.update_gesture(x, y),
            _ => {}
        }
    }

    fn pointer_up(&mut self) -> Result<(), EditorError> {
        if let Some(gesture) = self.take_gesture() {
            self.finish_gesture(gesture);
            return Ok(());
        }
        let click = match &mut self.state {
            State::Selected { id, press } => {
                let clicked = matches!(press, Some(p) if !p.moved);
                *press = None;
                clicked.then(|| id.clone())
            }
            _ => None,
        };
        if let Some(id) = click {
            let text_capable = self
                .layout
                .element(&id)
                .is_some_and(|el| el.role().is_text_capable());
            if text_capable {
                self.begin_text_edit(&id)?;
            }
        }
        Ok(())
    }

    fn key_down(&mut self, key: Key, modifiers: Modifiers) -> Result<(), EditorError> {
        match self.state {
            State::TextEditing { .. } => {
                // Everything but Escape belongs to the text field.
                if key == Key::Escape {
                    self.commit_pending_text()?;
                }
                return Ok(());
            }
            State::Gesture(_) => {
                if key == Key::Escape {
                    self.cancel();
                    self.state = State::Idle;
                }
                return Ok(());
            }
            State::Idle | State::Selected { .. } => {}
        }

        if modifiers.command() {
            if key.is_char('z') {
                if modifiers.shift {
                    self.redo();
                } else {
                    self.undo();
                }
            } else if key.is_char('y') {
                self.redo();
            } else if key.is_char('v') {
                self.paste()?;
            } else if key.is_char('c') {
                if self.selected().is_some() {
                    self.copy_selected()?;
                }
            } else if key.is_char('d') && self.selected().is_some() {
                self.duplicate_selected()?;
            }
            return Ok(());
        }

        if self.selected().is_none() {
            return Ok(());
        }
        let step = if modifiers.shift {
            self.settings.nudge_step_large
        } else {
            self.settings.nudge_step
        };
        match key {
            Key::Escape => self.clear_selection(),
            Key::Delete | Key::Backspace => self.delete_selected(),
            Key::ArrowLeft => self.nudge(-step, 0.0),
            Key::ArrowRight => self.nudge(step, 0.0),
            Key::ArrowUp => self.nudge(0.0, -step),
            Key::ArrowDown => self.nudge(0.0, step),
            Key::Enter | Key::Char(_) => Ok(()),
        }
    }

    fn blur(&mut self) -> Result<(), EditorError> {
        if let Some(gesture) = self.take_gesture() {
            self.finish_gesture(gesture);
            return Ok(());
        }
        self.commit_pending_text()
    }

    /// Aborts whatever interaction is in progress: a gesture is rolled back,
    /// a text edit is discarded.
    pub fn cancel(&mut self) {
        if let Some(gesture) = self.take_gesture() {
            self.cancel_gesture(gesture);
            return;
        }
        match &mut self.state {
            State::TextEditing { id, .. } => {
                let id = id.clone();
                self.state = State::Selected { id, press: None };
            }
            State::Selected { press, .. } => *press = None,
            State::Idle | State::Gesture(_) => {}
        }
    }

    // ── Gestures ──────────────────────────────────────────────────────────────

    fn begin_gesture(&mut self, id: ElementId, kind: GestureKind, start: (f64, f64), origin: Element) {
        let before = Arc::clone(&self.layout);
        let capture = CaptureGuard::acquire(&self.capture);
        debug!(%id, ?kind, "gesture started");
        self.state = State::Gesture(Gesture {
            id,
            kind,
            start,
            origin,
            before,
            _capture: capture,
        });
    }

    fn update_gesture(&mut self, x: f64, y: f64) {
        let State::Gesture(gesture) = &self.state else {
            return;
        };
        let (dx, dy) = geometry::to_percent_delta(
            x - gesture.start.0,
            y - gesture.start.1,
            self.container_size(),
        );
        let (next, guides) = match gesture.kind {
            GestureKind::Drag => self.drag_target(&gesture.origin, dx, dy),
            GestureKind::Resize(handle) => {
                (geometry::resize(&gesture.origin, handle, dx, dy), Vec::new())
            }
        };
        let id = gesture.id.clone();

        if let Err(e) = Arc::make_mut(&mut self.layout).update_element(&id, |_| next) {
            warn!(%id, error = %e, "gesture target vanished");
        }
        self.guides = guides;
    }

    /// Position of a dragged element: translate, snap to guides, snap to the
    /// grid on any axis no guide captured, then keep it inside the canvas.
    fn drag_target(&self, origin: &Element, dx: f64, dy: f64) -> (Element, Vec<Guide>) {
        let mut next = geometry::translate(origin, dx, dy);
        let snap = compute_snap_guides(&next, self.layout.elements(), self.settings.snap_threshold);
        next.left = snap.adjusted_left;
        next.top = snap.adjusted_top;

        let meta = self.layout.meta();
        if meta.snap_to_grid {
            if !snap.snapped_x() {
                next.left = geometry::snap_to_grid(next.left, meta.grid_size);
            }
            if !snap.snapped_y() {
                next.top = geometry::snap_to_grid(next.top, meta.grid_size);
            }
        }

        let next = geometry::clamp(&geometry::clamp_position(&next));
        (next, snap.guides)
    }

    fn take_gesture(&mut self) -> Option<Gesture> {
        if !matches!(self.state, State::Gesture(_)) {
            return None;
        }
        match std::mem::replace(&mut self.state, State::Idle) {
            State::Gesture(gesture) => Some(gesture),
            other => {
                self.state = other;
                None
            }
        }
    }

    /// Ends a gesture keeping its result.  Only a gesture that moved
    /// something becomes an undo step.  Dropping `gesture` releases the
    /// pointer capture.
    fn finish_gesture(&mut self, gesture: Gesture) {
        let unchanged =
            Arc::ptr_eq(&self.layout, &gesture.before) || *self.layout == *gesture.before;
        if !unchanged {
            self.history.record(Arc::clone(&gesture.before));
        }
        debug!(id = %gesture.id, kind = ?gesture.kind, unchanged, "gesture finished");
        self.guides.clear();
        self.state = State::Selected {
            id: gesture.id.clone(),
            press: None,
        };
        drop(gesture);
        if !unchanged {
            self.changed();
        }
    }

    fn cancel_gesture(&mut self, gesture: Gesture) {
        debug!(id = %gesture.id, kind = ?gesture.kind, "gesture cancelled");
        self.layout = Arc::clone(&gesture.before);
        self.guides.clear();
        self.state = State::Selected {
            id: gesture.id.clone(),
            press: None,
        };
    }

    /// Finishes a gesture and commits a pending text edit.
    fn settle(&mut self) -> Result<(), EditorError> {
        if let Some(gesture) = self.take_gesture() {
            self.finish_gesture(gesture);
        }
        self.commit_pending_text()
    }

    /// Finishes a gesture and discards a pending text edit.  Used before the
    /// whole layout is replaced.
    fn interrupt(&mut self) {
        if let Some(gesture) = self.take_gesture() {
            self.finish_gesture(gesture);
        }
        self.cancel();
    }

    // ── Selection ─────────────────────────────────────────────────────────────

    /// Selects an element, ending any interaction on another one.
    pub fn select(&mut self, id: &ElementId) -> Result<(), EditorError> {
        if !self.layout.contains(id) {
            return Err(LayoutError::ElementNotFound(id.clone()).into());
        }
        self.settle()?;
        debug!(%id, "selected element");
        self.state = State::Selected {
            id: id.clone(),
            press: None,
        };
        Ok(())
    }

    pub fn clear_selection(&mut self) -> Result<(), EditorError> {
        self.settle()?;
        self.state = State::Idle;
        Ok(())
    }

    fn selected_or_err(&self) -> Result<ElementId, EditorError> {
        self.selected().cloned().ok_or(EditorError::NothingSelected)
    }

    /// Drops the selection if the selected element no longer exists.
    fn reconcile_selection(&mut self) {
        let stale = self.selected().is_some_and(|id| !self.layout.contains(id));
        if stale {
            self.state = State::Idle;
        }
    }

    // ── Mutations ─────────────────────────────────────────────────────────────

    /// Runs one recorded mutation.  On success the previous layout goes onto
    /// the undo stack; on failure the layout is left exactly as it was.
    fn apply<T, F>(&mut self, mutate: F) -> Result<T, EditorError>
    where
        F: FnOnce(&mut Layout) -> Result<T, LayoutError>,
    {
        if let Some(gesture) = self.take_gesture() {
            self.finish_gesture(gesture);
        }
        let before = Arc::clone(&self.layout);
        match mutate(Arc::make_mut(&mut self.layout)) {
            Ok(value) => {
                self.history.record(before);
                self.changed();
                Ok(value)
            }
            Err(e) => {
                self.layout = before;
                Err(e.into())
            }
        }
    }

    fn changed(&mut self) {
        self.revision += 1;
        if let Some(listener) = &self.listener {
            listener.layout_changed(Arc::clone(&self.layout));
        }
    }

    fn unlocked(&self, id: &ElementId) -> Result<&Element, EditorError> {
        let el = self
            .layout
            .element(id)
            .ok_or_else(|| LayoutError::ElementNotFound(id.clone()))?;
        if el.locked {
            return Err(EditorError::ElementLocked(id.clone()));
        }
        Ok(el)
    }

    /// Aligns an element against the canvas.
    pub fn align(&mut self, id: &ElementId, alignment: Alignment) -> Result<(), EditorError> {
        self.unlocked(id)?;
        self.settle()?;
        self.apply(|layout| layout.update_element(id, |el| geometry::align(el, alignment)).map(|_| ()))
    }

    pub fn align_selected(&mut self, alignment: Alignment) -> Result<(), EditorError> {
        let id = self.selected_or_err()?;
        self.align(&id, alignment)
    }

    /// Moves the selected element by a percent delta, keeping its size.
    pub fn nudge(&mut self, d_left: f64, d_top: f64) -> Result<(), EditorError> {
        let id = self.selected_or_err()?;
        self.unlocked(&id)?;
        self.apply(|layout| {
            layout
                .update_element(&id, |el| {
                    geometry::clamp_position(&geometry::translate(el, d_left, d_top))
                })
                .map(|_| ())
        })
    }

    /// Raises an element one step in the stacking order.
    pub fn bring_forward(&mut self, id: &ElementId) -> Result<(), EditorError> {
        self.apply(|layout| {
            layout
                .update_element(id, |el| el.clone().with_z_index(el.z_index.saturating_add(1)))
                .map(|_| ())
        })
    }

    /// Lowers an element one step; an element already at the bottom stays put.
    pub fn send_backward(&mut self, id: &ElementId) -> Result<(), EditorError> {
        let z = self
            .layout
            .element(id)
            .map(|el| el.z_index)
            .ok_or_else(|| LayoutError::ElementNotFound(id.clone()))?;
        if z <= 1 {
            return Ok(());
        }
        self.apply(|layout| layout.update_element(id, |el| el.clone().with_z_index(z - 1)).map(|_| ()))
    }

    /// Flips the lock flag and returns the new value.
    pub fn toggle_lock(&mut self, id: &ElementId) -> Result<bool, EditorError> {
        self.apply(|layout| {
            layout
                .update_element(id, |el| {
                    let mut next = el.clone();
                    next.locked = !el.locked;
                    next
                })
                .map(|el| el.locked)
        })
    }

    /// Adds a default-sized element of `role` centred on the canvas, on top of
    /// the stack, and selects it.
    pub fn add_element(&mut self, role: Role) -> Result<ElementId, EditorError> {
        self.settle()?;
        let (width, height) = role.default_size();
        let element = Element::new(
            role.to_kind(),
            (100.0 - width) / 2.0,
            (100.0 - height) / 2.0,
            width,
            height,
        )
        .with_z_index(self.layout.max_z_index().saturating_add(1));
        let id = element.id.clone();
        self.apply(|layout| layout.push_element(element).map(|_| ()))?;
        info!(%id, %role, "added element");
        self.state = State::Selected {
            id: id.clone(),
            press: None,
        };
        Ok(id)
    }

    /// Deletes an element.
    ///
    /// # Errors
    ///
    /// [`EditorError::ElementLocked`] for a locked element, and a validation
    /// error when it is the only element left.
    pub fn delete(&mut self, id: &ElementId) -> Result<(), EditorError> {
        self.unlocked(id)?;
        if self.layout.len() == 1 {
            return Err(LayoutError::NoElements.into());
        }
        if self.selected() == Some(id) {
            self.interrupt();
        }
        self.apply(|layout| layout.remove_element(id).map(|_| ()))?;
        info!(%id, "deleted element");
        self.reconcile_selection();
        Ok(())
    }

    pub fn delete_selected(&mut self) -> Result<(), EditorError> {
        let id = self.selected_or_err()?;
        self.delete(&id)
    }

    // ── Clipboard ─────────────────────────────────────────────────────────────

    pub fn copy(&mut self, id: &ElementId) -> Result<(), EditorError> {
        let el = self
            .layout
            .element(id)
            .ok_or_else(|| LayoutError::ElementNotFound(id.clone()))?;
        self.clipboard.copy(el);
        Ok(())
    }

    pub fn copy_selected(&mut self) -> Result<(), EditorError> {
        let id = self.selected_or_err()?;
        self.copy(&id)
    }

    /// Pastes the clipboard and selects the new element.  Returns `None` when
    /// the clipboard is empty.
    pub fn paste(&mut self) -> Result<Option<ElementId>, EditorError> {
        if self.clipboard.is_empty() {
            return Ok(None);
        }
        self.settle()?;
        let clipboard = self.clipboard.clone();
        let pasted = self.apply(|layout| clipboard.paste(layout))?;
        if let Some(id) = &pasted {
            self.state = State::Selected {
                id: id.clone(),
                press: None,
            };
        }
        Ok(pasted)
    }

    /// Duplicates an element in place (offset like a paste) and selects the copy.
    pub fn duplicate(&mut self, id: &ElementId) -> Result<ElementId, EditorError> {
        self.settle()?;
        let clipboard = self.clipboard.clone();
        let new_id = self.apply(|layout| clipboard.duplicate(layout, id))?;
        self.state = State::Selected {
            id: new_id.clone(),
            press: None,
        };
        Ok(new_id)
    }

    pub fn duplicate_selected(&mut self) -> Result<ElementId, EditorError> {
        let id = self.selected_or_err()?;
        self.duplicate(&id)
    }

    // ── Undo / redo ───────────────────────────────────────────────────────────

    /// Returns `false` when there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        self.interrupt();
        match self.history.undo(Arc::clone(&self.layout)) {
            Some(previous) => {
                self.layout = previous;
                self.reconcile_selection();
                self.changed();
                debug!(depth = self.history.undo_depth(), "undo");
                true
            }
            None => false,
        }
    }

    /// Returns `false` when there was nothing to redo.
    pub fn redo(&mut self) -> bool {
        self.interrupt();
        match self.history.redo(Arc::clone(&self.layout)) {
            Some(next) => {
                self.layout = next;
                self.reconcile_selection();
                self.changed();
                debug!(depth = self.history.redo_depth(), "redo");
                true
            }
            None => false,
        }
    }

    // ── Text editing ──────────────────────────────────────────────────────────

    /// Puts a text-capable element into edit mode.  The buffer starts with the
    /// role's current text.
    pub fn begin_text_edit(&mut self, id: &ElementId) -> Result<(), EditorError> {
        let role = self
            .layout
            .element(id)
            .map(Element::role)
            .ok_or_else(|| LayoutError::ElementNotFound(id.clone()))?;
        if !role.is_text_capable() {
            return Err(EditorError::NotTextCapable(id.clone()));
        }
        let editing_same = matches!(&self.state, State::TextEditing { id: e, .. } if e == id);
        if editing_same {
            return Ok(());
        }
        self.settle()?;
        let buffer = self.layout.content().text_for(role).unwrap_or_default().to_string();
        debug!(%id, %role, "text edit started");
        self.state = State::TextEditing {
            id: id.clone(),
            buffer,
        };
        Ok(())
    }

    /// Replaces the edit buffer (the text field's live value).
    pub fn update_text_buffer(&mut self, text: impl Into<String>) -> Result<(), EditorError> {
        match &mut self.state {
            State::TextEditing { buffer, .. } => {
                *buffer = text.into();
                Ok(())
            }
            _ => Err(EditorError::NotEditing),
        }
    }

    /// Writes `text` into the content slot of the edited element's role and
    /// leaves edit mode.  Every element sharing that role shows the new text.
    pub fn commit_text_edit(&mut self, text: impl Into<String>) -> Result<(), EditorError> {
        let id = match &self.state {
            State::TextEditing { id, .. } => id.clone(),
            _ => return Err(EditorError::NotEditing),
        };
        self.state = State::Selected {
            id: id.clone(),
            press: None,
        };
        let Some(role) = self.layout.element(&id).map(Element::role) else {
            self.state = State::Idle;
            return Err(LayoutError::ElementNotFound(id).into());
        };
        let text = text.into();
        if self.layout.content().text_for(role) == Some(text.as_str()) {
            return Ok(());
        }
        self.apply(|layout| {
            layout.content_mut().set_text(role, text);
            Ok(())
        })?;
        debug!(%id, %role, "text edit committed");
        Ok(())
    }

    /// Commits the edit buffer if a text edit is in progress.
    fn commit_pending_text(&mut self) -> Result<(), EditorError> {
        match self.text_buffer().map(str::to_string) {
            Some(text) => self.commit_text_edit(text),
            None => Ok(()),
        }
    }

    /// The current layout with an in-progress text edit applied.  The
    /// session itself is left as it is.
    pub fn snapshot_with_pending_text(&self) -> Result<Arc<Layout>, EditorError> {
        let State::TextEditing { id, buffer } = &self.state else {
            return Ok(self.snapshot());
        };
        let role = self
            .layout
            .element(id)
            .map(Element::role)
            .ok_or_else(|| LayoutError::ElementNotFound(id.clone()))?;
        let mut layout = self.snapshot();
        if layout.content().text_for(role) != Some(buffer.as_str()) {
            Arc::make_mut(&mut layout).content_mut().set_text(role, buffer.clone());
        }
        Ok(layout)
    }

    /// Leaves edit mode without touching the content.
    pub fn cancel_text_edit(&mut self) -> Result<(), EditorError> {
        match &self.state {
            State::TextEditing { id, .. } => {
                self.state = State::Selected {
                    id: id.clone(),
                    press: None,
                };
                Ok(())
            }
            _ => Err(EditorError::NotEditing),
        }
    }

    // ── Whole-layout operations ───────────────────────────────────────────────

    /// Replaces the layout with a freshly generated template.
    ///
    /// `ratio` defaults to the current one.  Text already entered is kept;
    /// slots that are still empty take the preset's placeholder copy.
    pub fn load_template(&mut self, kind: LayoutType, ratio: Option<AspectRatio>) {
        self.interrupt();
        let current = self.layout.meta().clone();
        let ratio = ratio.unwrap_or(current.aspect_ratio);
        let content = carry_over(self.layout.content(), templates::default_content(kind));

        let mut next = templates::generate(kind, ratio, Some(content));
        let meta = next.meta_mut();
        meta.snap_to_grid = current.snap_to_grid;
        meta.grid_size = current.grid_size;
        meta.version = current.version;

        info!(kind = kind.as_str(), %ratio, "loaded template");
        self.replace_layout(next);
    }

    /// Replaces the layout with a restored version.  The replacement is an
    /// undoable step like any other.
    pub fn restore(&mut self, layout: Layout) -> Result<(), EditorError> {
        let layout = layout.normalize()?;
        self.interrupt();
        info!(version = layout.meta().version, "restored layout");
        self.replace_layout(layout);
        Ok(())
    }

    fn replace_layout(&mut self, layout: Layout) {
        let before = std::mem::replace(&mut self.layout, Arc::new(layout));
        self.history.record(before);
        self.state = State::Idle;
        self.changed();
    }

    /// Adopts the metadata stamped on a successful save.  Not an undo step.
    pub fn mark_saved(&mut self, version: &Version) {
        let saved = version.layout().meta();
        let meta = Arc::make_mut(&mut self.layout).meta_mut();
        meta.version = saved.version;
        meta.edited_at = saved.edited_at;
        meta.last_edited_by = saved.last_edited_by.clone();
    }

    // ── Canvas settings ───────────────────────────────────────────────────────

    pub fn set_snap_to_grid(&mut self, enabled: bool) {
        Arc::make_mut(&mut self.layout).meta_mut().snap_to_grid = enabled;
        self.changed();
    }

    /// Sets the grid pitch in percent.  Non-positive values disable grid snapping.
    pub fn set_grid_size(&mut self, grid_size: f64) {
        let grid_size = if grid_size.is_finite() { grid_size } else { 0.0 };
        Arc::make_mut(&mut self.layout).meta_mut().grid_size = grid_size;
        self.changed();
    }

    /// Reports the on-screen size of the canvas in pixels.
    pub fn set_container_size(&mut self, size: ContainerSize) {
        self.container_override = Some(size);
    }
}

impl std::fmt::Debug for EditorSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorSession")
            .field("mode", &self.mode())
            .field("elements", &self.layout.len())
            .field("undo_depth", &self.history.undo_depth())
            .field("revision", &self.revision)
            .finish()
    }
}

/// Keeps every non-empty text slot of `current`, filling the rest from `preset`.
fn carry_over(current: &Content, preset: Content) -> Content {
    let mut merged = preset;
    for role in Role::ALL {
        if let Some(text) = current.text_for(role).filter(|t| !t.is_empty()) {
            merged.set_text(role, text);
        }
    }
    merged
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! Application layer of the editor.
//!
//! Everything here orchestrates `wireframe_core` domain values to fulfil a
//! user goal.  Collaborators with side effects (the version store, the
//! notification sink, pointer capture) are reached through traits and
//! injected at construction time, so the whole layer runs in unit tests
//! without a UI or a backend.
//!
//! # Sub-modules
//!
//! - **`session`**    – The interaction state machine.  Turns pointer and
//!   keyboard events into layout mutations, owns selection and text-edit
//!   focus, and records undo snapshots.  Every edit goes through here.
//!
//! - **`events`**     – The input vocabulary the session understands.
//!
//! - **`history`**    – Bounded undo/redo stacks of whole-layout snapshots.
//!
//! - **`clipboard`**  – Copy, paste, and duplicate with fresh element ids.
//!
//! - **`versioning`** – Saving, listing, and restoring numbered versions
//!   through an abstract store.
//!
//! - **`autosave`**   – Debounced background saving of the latest layout.

pub mod autosave;
pub mod clipboard;
pub mod events;
pub mod history;
pub mod session;
pub mod versioning;

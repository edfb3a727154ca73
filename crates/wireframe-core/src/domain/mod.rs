//! Domain entities for the wireframe editor.
//!
//! This module contains pure business logic with no infrastructure dependencies.
//!
//! # What lives here
//!
//! - [`element`] – one positioned visual unit and its role-specific payload.
//! - [`layout`] – the root aggregate (`Layout`) with its shared text
//!   [`Content`](layout::Content) and editor [`Meta`](layout::Meta), plus the
//!   invariant checks.
//! - [`aspect`] – the fixed aspect-ratio table used to turn pointer pixels into
//!   canvas percentages.
//! - [`version`] – immutable persisted snapshots of a layout.
//!
//! Code in outer layers (the editor session, persistence, the CLI) depends on
//! the domain, but the domain never depends on them.

pub mod aspect;
pub mod element;
pub mod layout;
pub mod version;

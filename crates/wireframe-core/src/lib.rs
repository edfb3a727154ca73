//! # wireframe-core
//!
//! Shared library for the creative wireframe editor containing the layout
//! model, the geometry engine, the template factory, and the legacy wireframe
//! converter.
//!
//! This crate has zero dependencies on async runtimes, storage backends, or UI
//! frameworks.  Everything in here is a pure function of its inputs, which is
//! what makes the editor session in `wireframe-editor` easy to test.
//!
//! # Architecture overview
//!
//! A *layout* is the authoring document for one marketing creative: a handful
//! of typed elements (logo, title, call-to-action, ...) positioned on a
//! fixed-aspect-ratio canvas, plus the shared text content and some editor
//! metadata.  All geometry is expressed in **percent of the canvas**, so the
//! same layout renders identically at any pixel size.
//!
//! - **`domain`** – The data model (`Element`, `Content`, `Meta`, `Layout`,
//!   `Version`) and the invariants every mutation must preserve.
//!
//! - **`geometry`** – Clamping, resize-handle formulas, alignment, pixel to
//!   percent conversion, and snap-guide computation.
//!
//! - **`templates`** – Deterministic starting layouts for the four presets.
//!
//! - **`legacy`** – One-way conversion from the old fixed-field wireframe
//!   description into a `Layout`.

pub mod domain;
pub mod geometry;
pub mod legacy;
pub mod templates;

// Re-export the most-used types at the crate root so callers can write
// `wireframe_core::Layout` instead of `wireframe_core::domain::layout::Layout`.
pub use domain::aspect::{AspectRatio, ContainerSize};
pub use domain::element::{Element, ElementId, ElementKind, PersonType, Role};
pub use domain::layout::{Content, Layout, LayoutError, LayoutType, Meta};
pub use domain::version::{Version, VersionId};
pub use geometry::snap::{Axis, Guide, SnapResult};
pub use geometry::{Alignment, Handle};

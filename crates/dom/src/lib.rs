//! Minimal document tree with shadow roots, built for selection work.
//!
//! This is not a rendering DOM: there are no attributes, no styles and no
//! layout. What it does carry is exactly what range resolution needs:
//!
//! - an arena [`Document`] with element, text and comment nodes,
//! - shadow roots attached to host elements,
//! - text mutation primitives (`set_text`, `split_text`, `push_char`,
//!   `pop_char`) that selection probing leans on,
//! - composed-order traversal and boundary-point ordering that pierce
//!   shadow boundaries the way rendered text does.
//!
//! All offsets count characters. A [`Caret`] is a single boundary point, a
//! [`DomRange`] a start/end pair in composed document order.

pub mod document;
pub mod node;
pub mod text;
pub mod traverse;

pub use document::{Document, DomError};
pub use node::{is_void_tag, Caret, DomRange, NodeId, NodeKind};

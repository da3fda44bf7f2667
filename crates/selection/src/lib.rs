//! Headless selection engine over the [`dom`] substrate.
//!
//! A [`Page`] couples a document with a live [`Selection`] and an
//! [`EngineProfile`] describing which browser family the pair behaves like.
//! The profile decides the observable quirks that matter for cross-shadow
//! range resolution: whether text splits clamp or relocate selection
//! endpoints, whether range reporting stops at shadow hosts, and whether
//! one-character selections keep their direction.
//!
//! Nothing here resolves ranges. This crate only answers, faithfully per
//! profile, the questions a resolver is allowed to ask a real engine.

pub mod page;
pub mod profile;
pub mod selection;

pub use page::{Page, PageEvent};
pub use profile::EngineProfile;
pub use selection::{ExtendDirection, Selection, SelectionKind};

//! Layer visibility toggle.
//!
//! Mirrors the layers of a [`Viewer`](crate::viewer::Viewer) as a list of
//! `{color, label}` entries plus the indices of the visible ones:
//! - Filters hide layers from the toggle entirely
//! - Labels pass through a [`NameTransform`] before display
//! - Selection edits become layer visibility, written as one batch

mod filter;
mod naming;
mod projection;
mod sync;

pub use filter::{FilterId, FilterSet, LayerFilter};
pub use naming::NameTransform;
pub use projection::{LayerEntry, Projection};
pub use sync::LayerToggle;

use thiserror::Error;

/// Layer toggle errors.
#[derive(Debug, Error)]
pub enum ToggleError {
    #[error("Viewer no longer exists")]
    ViewerDropped,
}

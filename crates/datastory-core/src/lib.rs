//! Data Story Core Library
//!
//! Platform-agnostic state for the Hubble's Law data story: viewer layers,
//! the layer visibility toggle, slideshow dialogs and the story's datasets.

pub mod layer_toggle;
pub mod slideshow;
pub mod storage;
pub mod story;
pub mod viewer;

pub use layer_toggle::{FilterId, LayerEntry, LayerToggle, NameTransform, Projection, ToggleError};
pub use slideshow::{AngsizeDistanceSlideshow, IntroSlideshow, Slideshow, SlideshowNav};
pub use storage::{MemoryStorage, StorageError, StorageResult, StoryStorage};
#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileStorage;
pub use story::{Column, Data, DataCollection, DataError, HubblesLaw, StorySnapshot};
pub use viewer::{DelayGuard, Layer, LayerId, SubscriptionId, Viewer, WeakViewer};

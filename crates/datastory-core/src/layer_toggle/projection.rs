//! UI-facing view of the watched layers.

use super::filter::FilterSet;
use super::naming::NameTransform;
use crate::viewer::Layer;
use serde::{Deserialize, Serialize};

/// One row in the toggle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerEntry {
    pub color: String,
    pub label: String,
}

/// Watched layers and which of them are visible.
///
/// `selected` holds positions in `layers`, never positions in the viewer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Projection {
    pub layers: Vec<LayerEntry>,
    pub selected: Vec<usize>,
}

impl Projection {
    /// Build the projection for a layer list.
    pub fn compute(layers: &[Layer], filters: &FilterSet, names: &NameTransform) -> Self {
        let mut projection = Self::default();
        for layer in layers.iter().filter(|layer| !filters.excludes(layer)) {
            if layer.visible {
                projection.selected.push(projection.layers.len());
            }
            projection.layers.push(LayerEntry {
                color: layer.color.clone(),
                label: names.apply(&layer.label),
            });
        }
        projection
    }

    /// Check if the entry at `index` is visible.
    pub fn is_selected(&self, index: usize) -> bool {
        self.selected.contains(&index)
    }

    /// Serialize for a web front end.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

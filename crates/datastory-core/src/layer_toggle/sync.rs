//! Keeps a toggle projection in step with a viewer's layers.

use super::ToggleError;
use super::filter::{FilterId, FilterSet};
use super::naming::NameTransform;
use super::projection::{LayerEntry, Projection};
use crate::viewer::{Layer, SubscriptionId, Viewer, WeakViewer};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

struct ToggleState {
    filters: FilterSet,
    names: NameTransform,
    projection: Projection,
}

impl ToggleState {
    fn recompute(&mut self, layers: &[Layer]) {
        self.projection = Projection::compute(layers, &self.filters, &self.names);
        log::trace!(
            "Layer toggle: {} watched, selected {:?}",
            self.projection.layers.len(),
            self.projection.selected
        );
    }
}

/// Layer visibility toggle bound to a viewer.
///
/// The toggle never owns the viewer. It listens for layer changes and
/// rebuilds its [`Projection`]; selection edits are written back as layer
/// visibility in one batch. Dropping the toggle unsubscribes it.
pub struct LayerToggle {
    viewer: WeakViewer,
    state: Rc<RefCell<ToggleState>>,
    subscription: SubscriptionId,
}

impl LayerToggle {
    /// Bind a toggle to a viewer, showing layer labels unchanged.
    pub fn new(viewer: &Viewer) -> Self {
        Self::with_names(viewer, NameTransform::Identity)
    }

    /// Bind a toggle to a viewer with a display-name transform.
    pub fn with_names(viewer: &Viewer, names: NameTransform) -> Self {
        let state = Rc::new(RefCell::new(ToggleState {
            filters: FilterSet::new(),
            names,
            projection: Projection::default(),
        }));
        state.borrow_mut().recompute(&viewer.layers());

        let weak_state = Rc::downgrade(&state);
        let subscription = viewer.subscribe(move |layers| {
            if let Some(state) = weak_state.upgrade() {
                state.borrow_mut().recompute(layers);
            }
        });

        Self {
            viewer: viewer.downgrade(),
            state,
            subscription,
        }
    }

    /// Hide layers matching `filter` from the toggle.
    pub fn add_filter(&self, filter: impl Fn(&Layer) -> bool + 'static) -> FilterId {
        let id = self.state.borrow_mut().filters.add(filter);
        log::debug!("Layer toggle: added filter {:?}", id);
        self.refresh();
        id
    }

    /// Remove a filter. Unknown IDs are ignored and return false.
    pub fn remove_filter(&self, id: FilterId) -> bool {
        let removed = self.state.borrow_mut().filters.remove(id);
        if removed {
            log::debug!("Layer toggle: removed filter {:?}", id);
        } else {
            log::debug!("Layer toggle: filter {:?} not registered", id);
        }
        self.refresh();
        removed
    }

    /// Number of active filters.
    pub fn filter_count(&self) -> usize {
        self.state.borrow().filters.len()
    }

    /// Layers not excluded by any filter, in viewer order.
    pub fn watched_layers(&self) -> Vec<Layer> {
        match self.viewer.upgrade() {
            Some(viewer) => self.watched_of(&viewer),
            None => Vec::new(),
        }
    }

    fn watched_of(&self, viewer: &Viewer) -> Vec<Layer> {
        let state = self.state.borrow();
        viewer
            .layers()
            .into_iter()
            .filter(|layer| !state.filters.excludes(layer))
            .collect()
    }

    /// Rebuild the projection from the viewer's current layers.
    ///
    /// Runs automatically on every viewer change. A dropped viewer yields an
    /// empty projection.
    pub fn refresh(&self) {
        let layers = self
            .viewer
            .upgrade()
            .map(|viewer| viewer.layers())
            .unwrap_or_default();
        self.state.borrow_mut().recompute(&layers);
    }

    /// Current projection.
    pub fn projection(&self) -> Projection {
        self.state.borrow().projection.clone()
    }

    /// Entries to render, one per watched layer.
    pub fn layers(&self) -> Vec<LayerEntry> {
        self.state.borrow().projection.layers.clone()
    }

    /// Positions of visible watched layers.
    pub fn selected(&self) -> Vec<usize> {
        self.state.borrow().projection.selected.clone()
    }

    /// Make exactly the watched layers at `selected` visible.
    ///
    /// Filtered layers keep their visibility. The viewer sees a single
    /// change notification for the whole edit.
    pub fn set_selected(&self, selected: &[usize]) -> Result<(), ToggleError> {
        let viewer = self.viewer.upgrade().ok_or(ToggleError::ViewerDropped)?;
        let watched = self.watched_of(&viewer);

        let out_of_range: Vec<usize> = selected
            .iter()
            .copied()
            .filter(|&index| index >= watched.len())
            .collect();
        if !out_of_range.is_empty() {
            log::warn!(
                "Layer toggle: ignoring selection {:?} beyond {} watched layers",
                out_of_range,
                watched.len()
            );
        }

        let _guard = viewer.delay_callbacks();
        for (index, layer) in watched.iter().enumerate() {
            viewer.set_visible(layer.id, selected.contains(&index));
        }
        Ok(())
    }

    /// The viewer this toggle is bound to, if it still exists.
    pub fn viewer(&self) -> Option<Viewer> {
        self.viewer.upgrade()
    }
}

impl Drop for LayerToggle {
    fn drop(&mut self) {
        if let Some(viewer) = self.viewer.upgrade() {
            viewer.unsubscribe(self.subscription);
        }
    }
}

impl fmt::Debug for LayerToggle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("LayerToggle")
            .field("viewer", &self.viewer)
            .field("filters", &state.filters)
            .field("names", &state.names)
            .field("projection", &state.projection)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewer::LayerId;
    use std::cell::Cell;

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    /// Viewer with a (visible), b (hidden), c (visible).
    fn abc_viewer() -> (Viewer, [LayerId; 3]) {
        let viewer = Viewer::new("hubble");
        let a = viewer.add_layer(Layer::new("a", "#ff0000"));
        let b = viewer.add_layer(Layer::new("b", "#00ff00").with_visible(false));
        let c = viewer.add_layer(Layer::new("c", "#0000ff"));
        (viewer, [a, b, c])
    }

    fn visible(viewer: &Viewer, id: LayerId) -> bool {
        viewer.layer(id).map(|l| l.visible).unwrap_or(false)
    }

    #[test]
    fn test_initial_projection() {
        init_logging();
        let (viewer, _) = abc_viewer();
        let toggle = LayerToggle::new(&viewer);

        assert_eq!(toggle.layers().len(), 3);
        assert_eq!(toggle.selected(), vec![0, 2]);
    }

    #[test]
    fn test_set_selected_writes_visibility() {
        init_logging();
        let (viewer, [a, b, c]) = abc_viewer();
        let toggle = LayerToggle::new(&viewer);

        toggle.set_selected(&[1]).unwrap();

        assert!(!visible(&viewer, a));
        assert!(visible(&viewer, b));
        assert!(!visible(&viewer, c));
        assert_eq!(toggle.selected(), vec![1]);
    }

    #[test]
    fn test_filtered_layer_untouched() {
        init_logging();
        let (viewer, [a, b, c]) = abc_viewer();
        let toggle = LayerToggle::new(&viewer);
        toggle.add_filter(|layer| layer.label == "b");

        let watched: Vec<_> = toggle.watched_layers().into_iter().map(|l| l.label).collect();
        assert_eq!(watched, vec!["a", "c"]);

        toggle.set_selected(&[1]).unwrap();

        assert!(!visible(&viewer, a));
        assert!(!visible(&viewer, b));
        assert!(visible(&viewer, c));
        assert_eq!(toggle.selected(), vec![1]);
    }

    #[test]
    fn test_filtered_visible_layer_stays_visible() {
        let (viewer, [a, _, _]) = abc_viewer();
        let toggle = LayerToggle::new(&viewer);
        toggle.add_filter(|layer| layer.label == "a");

        toggle.set_selected(&[]).unwrap();

        assert!(visible(&viewer, a));
        assert!(toggle.selected().is_empty());
    }

    #[test]
    fn test_add_then_remove_filter_restores_projection() {
        let (viewer, _) = abc_viewer();
        let toggle = LayerToggle::new(&viewer);
        let before = toggle.projection();

        let id = toggle.add_filter(|layer| layer.label != "c");
        assert_eq!(toggle.layers().len(), 1);
        assert_eq!(toggle.selected(), vec![0]);

        assert!(toggle.remove_filter(id));
        assert_eq!(toggle.projection(), before);
    }

    #[test]
    fn test_remove_unknown_filter_is_noop() {
        let (viewer, _) = abc_viewer();
        let toggle = LayerToggle::new(&viewer);
        let id = toggle.add_filter(|_| false);
        assert!(toggle.remove_filter(id));

        let before = toggle.projection();
        assert!(!toggle.remove_filter(id));
        assert_eq!(toggle.projection(), before);
        assert_eq!(toggle.filter_count(), 0);
    }

    #[test]
    fn test_refresh_is_idempotent() {
        let (viewer, _) = abc_viewer();
        let toggle = LayerToggle::new(&viewer);

        toggle.refresh();
        let first = toggle.projection();
        toggle.refresh();
        assert_eq!(toggle.projection(), first);
    }

    #[test]
    fn test_follows_viewer_changes() {
        let (viewer, [a, b, c]) = abc_viewer();
        let toggle = LayerToggle::with_names(&viewer, NameTransform::mapping([("c", "Class")]));

        viewer.move_layer(c, 0);
        let labels: Vec<_> = toggle.layers().into_iter().map(|e| e.label).collect();
        assert_eq!(labels, vec!["Class", "a", "b"]);
        assert_eq!(toggle.selected(), vec![0, 1]);

        viewer.set_visible(b, true);
        assert_eq!(toggle.selected(), vec![0, 1, 2]);

        viewer.remove_layer(a);
        assert_eq!(toggle.layers().len(), 2);
        assert_eq!(toggle.selected(), vec![0, 1]);

        viewer.set_color(b, "#123456");
        assert_eq!(toggle.layers()[1].color, "#123456");
    }

    #[test]
    fn test_selection_is_one_notification() {
        let (viewer, _) = abc_viewer();
        let toggle = LayerToggle::new(&viewer);
        let count = Rc::new(Cell::new(0));
        let counter = Rc::clone(&count);
        viewer.subscribe(move |_| counter.set(counter.get() + 1));

        toggle.set_selected(&[1]).unwrap();
        assert_eq!(count.get(), 1);

        // Nothing changes, nothing is sent.
        toggle.set_selected(&[1]).unwrap();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_out_of_range_selection_ignored() {
        init_logging();
        let (viewer, [a, b, c]) = abc_viewer();
        let toggle = LayerToggle::new(&viewer);

        toggle.set_selected(&[0, 7]).unwrap();

        assert!(visible(&viewer, a));
        assert!(!visible(&viewer, b));
        assert!(!visible(&viewer, c));
        assert_eq!(toggle.selected(), vec![0]);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let (viewer, _) = abc_viewer();
        let toggle = LayerToggle::new(&viewer);
        assert_eq!(viewer.subscriber_count(), 1);

        drop(toggle);
        assert_eq!(viewer.subscriber_count(), 0);
    }

    #[test]
    fn test_dropped_viewer() {
        let (viewer, _) = abc_viewer();
        let toggle = LayerToggle::new(&viewer);
        drop(viewer);

        assert!(toggle.viewer().is_none());
        assert!(toggle.watched_layers().is_empty());
        assert!(matches!(toggle.set_selected(&[0]), Err(ToggleError::ViewerDropped)));

        toggle.refresh();
        assert_eq!(toggle.projection(), Projection::default());
    }

    #[test]
    fn test_two_toggles_share_viewer() {
        let (viewer, [a, _, _]) = abc_viewer();
        let all = LayerToggle::new(&viewer);
        let without_a = LayerToggle::new(&viewer);
        without_a.add_filter(|layer| layer.label == "a");

        all.set_selected(&[1, 2]).unwrap();
        assert!(!visible(&viewer, a));
        assert_eq!(without_a.selected(), vec![0, 1]);
    }

    #[test]
    #[should_panic(expected = "filter failed")]
    fn test_filter_panic_propagates() {
        let (viewer, _) = abc_viewer();
        let toggle = LayerToggle::new(&viewer);
        toggle.add_filter(|_| panic!("filter failed"));
    }
}

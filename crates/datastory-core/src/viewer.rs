//! Viewer layer list with change notification.
//!
//! A [`Viewer`] owns an ordered list of plot layers. Interested parties
//! subscribe to "layers changed" and receive a snapshot of the list after
//! every change. Writes made while a [`DelayGuard`] is alive are coalesced
//! into a single notification when the last guard is dropped.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use uuid::Uuid;

/// Unique identifier for a layer.
pub type LayerId = Uuid;

/// A renderable data series shown in a viewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    /// Unique identifier.
    pub id: LayerId,
    /// Label of the dataset or subset drawn by this layer.
    pub label: String,
    /// Display color as a CSS color string.
    pub color: String,
    /// Whether the layer is drawn.
    pub visible: bool,
}

impl Layer {
    /// Create a new visible layer.
    pub fn new(label: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            label: label.into(),
            color: color.into(),
            visible: true,
        }
    }

    /// Set the initial visibility.
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }
}

/// Handle returned by [`Viewer::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type LayersCallback = Rc<dyn Fn(&[Layer])>;

struct ViewerInner {
    label: String,
    layers: Vec<Layer>,
    callbacks: Vec<(SubscriptionId, LayersCallback)>,
    next_subscription: u64,
    /// Number of live delay guards.
    delay_depth: usize,
    /// A change happened while notifications were delayed.
    pending: bool,
}

/// Shared handle to a viewer's ordered layer list.
///
/// Cloning the handle is cheap and yields another handle to the same list.
#[derive(Clone)]
pub struct Viewer {
    inner: Rc<RefCell<ViewerInner>>,
}

/// Non-owning reference to a [`Viewer`].
#[derive(Clone, Default)]
pub struct WeakViewer {
    inner: Weak<RefCell<ViewerInner>>,
}

impl WeakViewer {
    /// Get the viewer back if it is still alive.
    pub fn upgrade(&self) -> Option<Viewer> {
        self.inner.upgrade().map(|inner| Viewer { inner })
    }
}

impl fmt::Debug for WeakViewer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakViewer")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}

impl fmt::Debug for Viewer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Viewer")
            .field("label", &inner.label)
            .field("layers", &inner.layers)
            .field("subscribers", &inner.callbacks.len())
            .finish()
    }
}

impl Viewer {
    /// Create an empty viewer.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ViewerInner {
                label: label.into(),
                layers: Vec::new(),
                callbacks: Vec::new(),
                next_subscription: 0,
                delay_depth: 0,
                pending: false,
            })),
        }
    }

    /// Create a non-owning reference to this viewer.
    pub fn downgrade(&self) -> WeakViewer {
        WeakViewer {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Viewer label.
    pub fn label(&self) -> String {
        self.inner.borrow().label.clone()
    }

    /// Snapshot of the layers, back to front.
    pub fn layers(&self) -> Vec<Layer> {
        self.inner.borrow().layers.clone()
    }

    /// Get a layer by ID.
    pub fn layer(&self, id: LayerId) -> Option<Layer> {
        self.inner.borrow().layers.iter().find(|l| l.id == id).cloned()
    }

    /// Number of layers.
    pub fn len(&self) -> usize {
        self.inner.borrow().layers.len()
    }

    /// Check if the viewer has no layers.
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().layers.is_empty()
    }

    /// Add a layer on top of the others.
    pub fn add_layer(&self, layer: Layer) -> LayerId {
        let id = layer.id;
        self.inner.borrow_mut().layers.push(layer);
        self.changed();
        id
    }

    /// Remove a layer.
    pub fn remove_layer(&self, id: LayerId) -> Option<Layer> {
        let removed = {
            let mut inner = self.inner.borrow_mut();
            let pos = inner.layers.iter().position(|l| l.id == id)?;
            inner.layers.remove(pos)
        };
        self.changed();
        Some(removed)
    }

    /// Move a layer to a new position (clamped to the end of the list).
    /// Returns true if the order changed.
    pub fn move_layer(&self, id: LayerId, index: usize) -> bool {
        let moved = {
            let mut inner = self.inner.borrow_mut();
            let Some(pos) = inner.layers.iter().position(|l| l.id == id) else {
                return false;
            };
            let target = index.min(inner.layers.len() - 1);
            if pos != target {
                let layer = inner.layers.remove(pos);
                inner.layers.insert(target, layer);
            }
            pos != target
        };
        if moved {
            self.changed();
        }
        moved
    }

    /// Set layer visibility. Returns false if the layer doesn't exist.
    pub fn set_visible(&self, id: LayerId, visible: bool) -> bool {
        self.update_layer(id, |layer| {
            let changed = layer.visible != visible;
            layer.visible = visible;
            changed
        })
    }

    /// Set layer color. Returns false if the layer doesn't exist.
    pub fn set_color(&self, id: LayerId, color: impl Into<String>) -> bool {
        let color = color.into();
        self.update_layer(id, |layer| {
            let changed = layer.color != color;
            layer.color = color;
            changed
        })
    }

    /// Set layer label. Returns false if the layer doesn't exist.
    pub fn set_label(&self, id: LayerId, label: impl Into<String>) -> bool {
        let label = label.into();
        self.update_layer(id, |layer| {
            let changed = layer.label != label;
            layer.label = label;
            changed
        })
    }

    fn update_layer(&self, id: LayerId, update: impl FnOnce(&mut Layer) -> bool) -> bool {
        let changed = {
            let mut inner = self.inner.borrow_mut();
            match inner.layers.iter_mut().find(|l| l.id == id) {
                Some(layer) => update(layer),
                None => return false,
            }
        };
        if changed {
            self.changed();
        }
        true
    }

    /// Register a callback fired with the layer list after each change.
    pub fn subscribe(&self, callback: impl Fn(&[Layer]) + 'static) -> SubscriptionId {
        let mut inner = self.inner.borrow_mut();
        let id = SubscriptionId(inner.next_subscription);
        inner.next_subscription += 1;
        inner.callbacks.push((id, Rc::new(callback)));
        log::debug!("Viewer '{}': subscription {:?} added", inner.label, id);
        id
    }

    /// Remove a callback. Returns false if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut inner = self.inner.borrow_mut();
        let before = inner.callbacks.len();
        inner.callbacks.retain(|(sub, _)| *sub != id);
        let removed = inner.callbacks.len() != before;
        if removed {
            log::debug!("Viewer '{}': subscription {:?} removed", inner.label, id);
        }
        removed
    }

    /// Number of registered callbacks.
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().callbacks.len()
    }

    /// Defer change notifications until the returned guard is dropped.
    ///
    /// Guards nest; one consolidated notification is sent when the outermost
    /// guard goes away, and only if something changed in between.
    pub fn delay_callbacks(&self) -> DelayGuard {
        self.inner.borrow_mut().delay_depth += 1;
        DelayGuard {
            viewer: self.clone(),
        }
    }

    /// Check if notifications are currently deferred.
    pub fn is_delayed(&self) -> bool {
        self.inner.borrow().delay_depth > 0
    }

    fn changed(&self) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.delay_depth > 0 {
                inner.pending = true;
                return;
            }
        }
        self.notify();
    }

    /// Run callbacks without holding a borrow, so they may touch the viewer.
    fn notify(&self) {
        let (callbacks, snapshot) = {
            let inner = self.inner.borrow();
            let callbacks: Vec<LayersCallback> =
                inner.callbacks.iter().map(|(_, cb)| Rc::clone(cb)).collect();
            (callbacks, inner.layers.clone())
        };
        log::trace!("Notifying {} layer subscribers", callbacks.len());
        for callback in callbacks {
            callback(&snapshot);
        }
    }
}

/// Scoped deferral of a viewer's change notifications.
///
/// Created by [`Viewer::delay_callbacks`].
#[must_use = "notifications are only deferred while the guard is alive"]
pub struct DelayGuard {
    viewer: Viewer,
}

impl Drop for DelayGuard {
    fn drop(&mut self) {
        let flush = {
            let mut inner = self.viewer.inner.borrow_mut();
            inner.delay_depth -= 1;
            inner.delay_depth == 0 && std::mem::take(&mut inner.pending)
        };
        // Also runs while unwinding, so subscribers never keep a stale view.
        if flush {
            log::debug!("Flushing delayed layer notification");
            self.viewer.notify();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn counting(viewer: &Viewer) -> Rc<Cell<usize>> {
        let count = Rc::new(Cell::new(0));
        let counter = Rc::clone(&count);
        viewer.subscribe(move |_| counter.set(counter.get() + 1));
        count
    }

    #[test]
    fn test_add_and_remove_layers() {
        let viewer = Viewer::new("hubble");
        let a = viewer.add_layer(Layer::new("a", "#ff0000"));
        let b = viewer.add_layer(Layer::new("b", "#00ff00"));

        assert_eq!(viewer.len(), 2);
        assert_eq!(viewer.layers()[1].id, b);

        let removed = viewer.remove_layer(a).unwrap();
        assert_eq!(removed.label, "a");
        assert_eq!(viewer.len(), 1);
        assert!(viewer.remove_layer(a).is_none());
    }

    #[test]
    fn test_move_layer() {
        let viewer = Viewer::new("hubble");
        let a = viewer.add_layer(Layer::new("a", "#000000"));
        viewer.add_layer(Layer::new("b", "#000000"));
        viewer.add_layer(Layer::new("c", "#000000"));

        assert!(viewer.move_layer(a, 99));
        let labels: Vec<_> = viewer.layers().into_iter().map(|l| l.label).collect();
        assert_eq!(labels, vec!["b", "c", "a"]);

        assert!(!viewer.move_layer(a, 2));
        assert!(!viewer.move_layer(Uuid::new_v4(), 0));
    }

    #[test]
    fn test_notifies_on_change_only() {
        let viewer = Viewer::new("hubble");
        let id = viewer.add_layer(Layer::new("a", "#000000"));
        let count = counting(&viewer);

        assert!(viewer.set_visible(id, true));
        assert_eq!(count.get(), 0);

        assert!(viewer.set_visible(id, false));
        assert_eq!(count.get(), 1);

        assert!(!viewer.set_visible(Uuid::new_v4(), true));
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_callback_receives_snapshot() {
        let viewer = Viewer::new("hubble");
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        viewer.subscribe(move |layers| {
            *sink.borrow_mut() = layers.iter().map(|l| l.label.clone()).collect();
        });

        viewer.add_layer(Layer::new("galaxies", "#000000"));
        assert_eq!(*seen.borrow(), vec!["galaxies".to_string()]);
    }

    #[test]
    fn test_unsubscribe() {
        let viewer = Viewer::new("hubble");
        let count = Rc::new(Cell::new(0));
        let counter = Rc::clone(&count);
        let sub = viewer.subscribe(move |_| counter.set(counter.get() + 1));

        assert!(viewer.unsubscribe(sub));
        assert!(!viewer.unsubscribe(sub));
        viewer.add_layer(Layer::new("a", "#000000"));
        assert_eq!(count.get(), 0);
        assert_eq!(viewer.subscriber_count(), 0);
    }

    #[test]
    fn test_delay_guard_coalesces() {
        let viewer = Viewer::new("hubble");
        let a = viewer.add_layer(Layer::new("a", "#000000"));
        let b = viewer.add_layer(Layer::new("b", "#000000"));
        let count = counting(&viewer);

        {
            let _guard = viewer.delay_callbacks();
            viewer.set_visible(a, false);
            viewer.set_visible(b, false);
            {
                let _inner = viewer.delay_callbacks();
                viewer.set_color(a, "#ffffff");
            }
            assert_eq!(count.get(), 0);
            assert!(viewer.is_delayed());
        }

        assert_eq!(count.get(), 1);
        assert!(!viewer.is_delayed());
    }

    #[test]
    fn test_delay_guard_without_changes_is_silent() {
        let viewer = Viewer::new("hubble");
        let count = counting(&viewer);

        drop(viewer.delay_callbacks());
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_delay_guard_released_on_panic() {
        let viewer = Viewer::new("hubble");
        let a = viewer.add_layer(Layer::new("a", "#000000"));
        viewer.add_layer(Layer::new("b", "#000000"));
        let count = counting(&viewer);
        let toggle = crate::layer_toggle::LayerToggle::new(&viewer);
        assert_eq!(toggle.selected(), vec![0, 1]);

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = viewer.delay_callbacks();
            viewer.set_visible(a, false);
            panic!("boom");
        }));

        assert!(result.is_err());
        assert!(!viewer.is_delayed());
        assert_eq!(count.get(), 1);

        let visible: Vec<usize> = viewer
            .layers()
            .iter()
            .enumerate()
            .filter(|(_, l)| l.visible)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(visible, vec![1]);
        assert_eq!(toggle.selected(), visible);
    }

    #[test]
    fn test_callback_may_reenter_viewer() {
        let viewer = Viewer::new("hubble");
        let id = viewer.add_layer(Layer::new("a", "#000000"));
        let weak = viewer.downgrade();
        viewer.subscribe(move |_| {
            if let Some(viewer) = weak.upgrade() {
                // Idempotent write; the second pass changes nothing.
                viewer.set_visible(id, true);
            }
        });

        viewer.set_visible(id, false);
        assert!(viewer.layer(id).unwrap().visible);
    }

    #[test]
    fn test_weak_viewer() {
        let viewer = Viewer::new("hubble");
        let weak = viewer.downgrade();
        assert!(weak.upgrade().is_some());

        drop(viewer);
        assert!(weak.upgrade().is_none());
        assert!(WeakViewer::default().upgrade().is_none());
    }
}

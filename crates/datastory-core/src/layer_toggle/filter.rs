//! Predicates that hide layers from the toggle.

use crate::viewer::Layer;
use std::fmt;

/// Handle for a registered filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FilterId(u64);

/// A predicate returning true for layers the toggle should not show.
pub type LayerFilter = Box<dyn Fn(&Layer) -> bool>;

/// Ordered set of active filters.
#[derive(Default)]
pub struct FilterSet {
    filters: Vec<(FilterId, LayerFilter)>,
    next_id: u64,
}

impl FilterSet {
    /// Create an empty filter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a filter.
    pub fn add(&mut self, filter: impl Fn(&Layer) -> bool + 'static) -> FilterId {
        let id = FilterId(self.next_id);
        self.next_id += 1;
        self.filters.push((id, Box::new(filter)));
        id
    }

    /// Remove a filter. Returns false if it was not registered.
    pub fn remove(&mut self, id: FilterId) -> bool {
        let before = self.filters.len();
        self.filters.retain(|(filter_id, _)| *filter_id != id);
        self.filters.len() != before
    }

    /// Check if any filter excludes the layer. Stops at the first match.
    pub fn excludes(&self, layer: &Layer) -> bool {
        self.filters.iter().any(|(_, filter)| filter(layer))
    }

    /// Check if a filter is registered.
    pub fn contains(&self, id: FilterId) -> bool {
        self.filters.iter().any(|(filter_id, _)| *filter_id == id)
    }

    /// Number of active filters.
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Check if there are no filters.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl fmt::Debug for FilterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.filters.iter().map(|(id, _)| id))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_empty_set_excludes_nothing() {
        let filters = FilterSet::new();
        assert!(!filters.excludes(&Layer::new("a", "#000000")));
    }

    #[test]
    fn test_add_and_remove() {
        let mut filters = FilterSet::new();
        let id = filters.add(|layer| layer.label == "a");

        assert!(filters.contains(id));
        assert!(filters.excludes(&Layer::new("a", "#000000")));
        assert!(!filters.excludes(&Layer::new("b", "#000000")));

        assert!(filters.remove(id));
        assert!(!filters.remove(id));
        assert!(filters.is_empty());
    }

    #[test]
    fn test_short_circuits() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let mut filters = FilterSet::new();
        filters.add(|_| true);
        filters.add(move |_| {
            counter.set(counter.get() + 1);
            false
        });

        assert!(filters.excludes(&Layer::new("a", "#000000")));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_ids_are_not_reused() {
        let mut filters = FilterSet::new();
        let first = filters.add(|_| false);
        filters.remove(first);
        let second = filters.add(|_| false);
        assert_ne!(first, second);
    }
}

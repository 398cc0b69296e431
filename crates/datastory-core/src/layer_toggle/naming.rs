//! Display-name transforms for layer labels.

use std::collections::HashMap;
use std::fmt;

/// Turns a layer label into the name shown in the toggle.
///
/// Chosen once when the toggle is built.
#[derive(Default)]
pub enum NameTransform {
    /// Show labels unchanged.
    #[default]
    Identity,
    /// Look the label up; absent keys and empty names fall back to the label.
    Mapping(HashMap<String, String>),
    /// Arbitrary function.
    Custom(Box<dyn Fn(&str) -> String>),
}

impl NameTransform {
    /// Build a transform from a function.
    pub fn custom(transform: impl Fn(&str) -> String + 'static) -> Self {
        Self::Custom(Box::new(transform))
    }

    /// Build a lookup transform from label/name pairs.
    pub fn mapping<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::Mapping(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Apply the transform to a label.
    pub fn apply(&self, label: &str) -> String {
        match self {
            Self::Identity => label.to_string(),
            Self::Mapping(names) => match names.get(label) {
                Some(name) if !name.is_empty() => name.clone(),
                _ => label.to_string(),
            },
            Self::Custom(transform) => transform(label),
        }
    }
}

impl From<HashMap<String, String>> for NameTransform {
    fn from(names: HashMap<String, String>) -> Self {
        Self::Mapping(names)
    }
}

impl fmt::Debug for NameTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identity => f.write_str("Identity"),
            Self::Mapping(names) => f.debug_tuple("Mapping").field(names).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

//! Tabular datasets shared by the story's viewers.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Dataset errors.
#[derive(Debug, Error, PartialEq)]
pub enum DataError {
    #[error("Dataset not found: {0}")]
    UnknownData(String),
    #[error("Component '{component}' not found in {data}")]
    UnknownComponent { data: String, component: String },
    #[error("Dataset already exists: {0}")]
    DuplicateLabel(String),
    #[error("Component '{component}' has {actual} rows, expected {expected}")]
    LengthMismatch {
        component: String,
        expected: usize,
        actual: usize,
    },
    #[error("Component '{0}' is not numeric")]
    NotNumeric(String),
}

/// Result type for dataset operations.
pub type DataResult<T> = Result<T, DataError>;

/// Values of one component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "values", rename_all = "snake_case")]
pub enum Column {
    Numeric(Vec<f64>),
    Text(Vec<String>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Self::Numeric(values) => values.len(),
            Self::Text(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Numeric values, if this is a numeric column.
    pub fn as_numeric(&self) -> Option<&[f64]> {
        match self {
            Self::Numeric(values) => Some(values),
            Self::Text(_) => None,
        }
    }

    /// Text values, if this is a text column.
    pub fn as_text(&self) -> Option<&[String]> {
        match self {
            Self::Text(values) => Some(values),
            Self::Numeric(_) => None,
        }
    }

    /// Keep the rows where `keep` is true.
    fn filter_rows(&self, keep: &[bool]) -> Self {
        fn pick<T: Clone>(values: &[T], keep: &[bool]) -> Vec<T> {
            values
                .iter()
                .zip(keep)
                .filter(|(_, keep)| **keep)
                .map(|(value, _)| value.clone())
                .collect()
        }
        match self {
            Self::Numeric(values) => Self::Numeric(pick(values, keep)),
            Self::Text(values) => Self::Text(pick(values, keep)),
        }
    }
}

/// A named column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub label: String,
    pub column: Column,
}

/// A labelled table of components sharing one row count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawData")]
pub struct Data {
    label: String,
    components: Vec<Component>,
}

/// Unchecked wire form of [`Data`].
#[derive(Deserialize)]
struct RawData {
    label: String,
    components: Vec<Component>,
}

impl TryFrom<RawData> for Data {
    type Error = DataError;

    fn try_from(raw: RawData) -> DataResult<Self> {
        let mut data = Data::new(raw.label);
        for component in raw.components {
            data.add_component(component.label, component.column)?;
        }
        Ok(data)
    }
}

impl Data {
    /// Create an empty dataset.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            components: Vec::new(),
        }
    }

    /// Add a component. The first component fixes the row count.
    pub fn add_component(&mut self, label: impl Into<String>, column: Column) -> DataResult<()> {
        let label = label.into();
        if let Some(first) = self.components.first() {
            let expected = first.column.len();
            if column.len() != expected {
                return Err(DataError::LengthMismatch {
                    component: label,
                    expected,
                    actual: column.len(),
                });
            }
        }
        match self.components.iter_mut().find(|c| c.label == label) {
            Some(existing) => existing.column = column,
            None => self.components.push(Component { label, column }),
        }
        Ok(())
    }

    /// Builder form of [`Data::add_component`].
    pub fn with_component(mut self, label: impl Into<String>, column: Column) -> DataResult<Self> {
        self.add_component(label, column)?;
        Ok(self)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Component labels in insertion order.
    pub fn component_labels(&self) -> Vec<&str> {
        self.components.iter().map(|c| c.label.as_str()).collect()
    }

    /// Get a component's values.
    pub fn component(&self, label: &str) -> Option<&Column> {
        self.components
            .iter()
            .find(|c| c.label == label)
            .map(|c| &c.column)
    }

    pub fn has_component(&self, label: &str) -> bool {
        self.component(label).is_some()
    }

    /// Get numeric values of a component.
    pub fn numeric(&self, label: &str) -> DataResult<&[f64]> {
        self.component(label)
            .ok_or_else(|| DataError::UnknownComponent {
                data: self.label.clone(),
                component: label.to_string(),
            })?
            .as_numeric()
            .ok_or_else(|| DataError::NotNumeric(label.to_string()))
    }

    pub fn row_count(&self) -> usize {
        self.components.first().map(|c| c.column.len()).unwrap_or(0)
    }

    /// Replace this dataset's components with those of `other`.
    ///
    /// The label is kept.
    pub fn update_values_from_data(&mut self, other: &Data) {
        self.components = other.components.clone();
    }

    /// Copy of this dataset with only the rows where `keep` is true.
    pub fn filter_rows(&self, keep: &[bool]) -> Data {
        Data {
            label: self.label.clone(),
            components: self
                .components
                .iter()
                .map(|c| Component {
                    label: c.label.clone(),
                    column: c.column.filter_rows(keep),
                })
                .collect(),
        }
    }
}

/// One end of a link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentRef {
    pub data: String,
    pub component: String,
}

/// Declares two components to hold the same quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentLink {
    pub from: ComponentRef,
    pub to: ComponentRef,
}

/// Ordered datasets with unique labels, plus the links between them.
#[derive(Debug, Clone, Default)]
pub struct DataCollection {
    datasets: Vec<Data>,
    links: Vec<ComponentLink>,
}

impl DataCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a dataset. Labels must be unique.
    pub fn append(&mut self, data: Data) -> DataResult<()> {
        if self.contains(data.label()) {
            return Err(DataError::DuplicateLabel(data.label().to_string()));
        }
        log::debug!("Data collection: appended '{}'", data.label());
        self.datasets.push(data);
        Ok(())
    }

    pub fn contains(&self, label: &str) -> bool {
        self.get(label).is_some()
    }

    pub fn get(&self, label: &str) -> Option<&Data> {
        self.datasets.iter().find(|d| d.label() == label)
    }

    pub fn get_mut(&mut self, label: &str) -> Option<&mut Data> {
        self.datasets.iter_mut().find(|d| d.label() == label)
    }

    /// Remove a dataset and every link touching it.
    pub fn remove(&mut self, label: &str) -> Option<Data> {
        let pos = self.datasets.iter().position(|d| d.label() == label)?;
        self.links
            .retain(|link| link.from.data != label && link.to.data != label);
        Some(self.datasets.remove(pos))
    }

    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Data> {
        self.datasets.iter()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.datasets.iter().map(|d| d.label()).collect()
    }

    /// Link two components. Both must exist.
    pub fn add_link(
        &mut self,
        from_data: &str,
        from_component: &str,
        to_data: &str,
        to_component: &str,
    ) -> DataResult<()> {
        let from = self.component_ref(from_data, from_component)?;
        let to = self.component_ref(to_data, to_component)?;
        let link = ComponentLink { from, to };
        if !self.links.contains(&link) {
            self.links.push(link);
        }
        Ok(())
    }

    /// Replace the values of dataset `label` with those of `new_data`.
    ///
    /// Fails without changing anything if `new_data` lacks a component that
    /// a link on `label` refers to.
    pub fn update_values(&mut self, label: &str, new_data: &Data) -> DataResult<()> {
        if let Some(missing) = self
            .links
            .iter()
            .flat_map(|link| [&link.from, &link.to])
            .find(|end| end.data == label && !new_data.has_component(&end.component))
        {
            return Err(DataError::UnknownComponent {
                data: label.to_string(),
                component: missing.component.clone(),
            });
        }
        let data = self
            .get_mut(label)
            .ok_or_else(|| DataError::UnknownData(label.to_string()))?;
        data.update_values_from_data(new_data);
        Ok(())
    }

    fn component_ref(&self, data: &str, component: &str) -> DataResult<ComponentRef> {
        let dataset = self
            .get(data)
            .ok_or_else(|| DataError::UnknownData(data.to_string()))?;
        if !dataset.has_component(component) {
            return Err(DataError::UnknownComponent {
                data: data.to_string(),
                component: component.to_string(),
            });
        }
        Ok(ComponentRef {
            data: data.to_string(),
            component: component.to_string(),
        })
    }

    pub fn links(&self) -> &[ComponentLink] {
        &self.links
    }

    /// Components linked to the given one, in either direction.
    pub fn linked_to(&self, data: &str, component: &str) -> Vec<&ComponentRef> {
        self.links
            .iter()
            .filter_map(|link| {
                if link.from.data == data && link.from.component == component {
                    Some(&link.to)
                } else if link.to.data == data && link.to.component == component {
                    Some(&link.from)
                } else {
                    None
                }
            })
            .collect()
    }
}

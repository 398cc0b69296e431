//! Story state for the Hubble's Law data story.
//!
//! Holds the student's progress (measurements, calculations, answers) and the
//! data collection shared by the story's viewers.

mod data;

pub use data::{
    Column, Component, ComponentLink, ComponentRef, Data, DataCollection, DataError, DataResult,
};

use crate::storage::{StorageResult, StoryStorage};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Registry name of the story.
pub const HUBBLES_LAW: &str = "hubbles_law";

/// Dataset holding every measurement the student makes.
pub const STUDENT_MEASUREMENTS: &str = "student_measurements";

/// Dataset holding the student's complete (plottable) rows.
pub const STUDENT_DATA: &str = "student_data";

/// Columns of the student datasets.
pub const STUDENT_COLUMNS: [&str; 11] = [
    "ID",
    "RA",
    "DEC",
    "Z",
    "Type",
    "measwave",
    "restwave",
    "student_id",
    "velocity",
    "distance",
    "Element",
];

const TEXT_COLUMNS: [&str; 3] = ["ID", "Element", "Type"];

/// Components linked between the two student datasets.
const LINKED_COLUMNS: [&str; 4] = ["ID", "distance", "velocity", "student_id"];

/// The galaxy measurement currently being worked on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurements {
    #[serde(rename = "galax_id")]
    pub galaxy_id: u64,
    pub rest_wave_value: f64,
    pub rest_wave_unit: String,
    pub obs_wave_value: f64,
    pub obs_wave_unit: String,
    pub velocity_value: f64,
    pub velocity_unit: String,
    pub ang_size: f64,
    pub est_dist_value: f64,
    pub est_dist_unit: String,
}

impl Default for Measurements {
    fn default() -> Self {
        Self {
            galaxy_id: 123,
            rest_wave_value: 6563.0,
            rest_wave_unit: "Angstrom".to_string(),
            obs_wave_value: 6863.0,
            obs_wave_unit: "Angstrom".to_string(),
            velocity_value: 120.0,
            velocity_unit: "km / s".to_string(),
            ang_size: 50.0,
            est_dist_value: 100.0,
            est_dist_unit: "lyr".to_string(),
        }
    }
}

/// Derived results: Hubble constant fit and guess, age of the universe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Calculations {
    pub hubble_value_fit_value: f64,
    pub hubble_value_fit_unit: String,
    pub hubble_value_guess_value: f64,
    pub hubble_value_guess_unit: String,
    pub age_value: f64,
    pub age_unit: String,
}

impl Default for Calculations {
    fn default() -> Self {
        Self {
            hubble_value_fit_value: 65.0,
            hubble_value_fit_unit: "km / s / Mpc".to_string(),
            hubble_value_guess_value: 80.0,
            hubble_value_guess_unit: "km / s / Mpc".to_string(),
            age_value: 1.3e9,
            age_unit: "Gyr".to_string(),
        }
    }
}

/// A free-text answer to a dialog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub free_response: String,
    pub finished: bool,
}

fn default_failure_counts() -> BTreeMap<String, u32> {
    [("doppler_equation", 1), ("final_velocity", 3), ("mc_q1", 2)]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

fn default_responses() -> BTreeMap<String, Response> {
    BTreeMap::from([(
        "dialog1".to_string(),
        Response {
            free_response: "I'm 90% confident about my answer.".to_string(),
            finished: true,
        },
    )])
}

/// Serializable progress of a story, as persisted by [`crate::storage`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorySnapshot {
    pub story: String,
    pub measurements: Measurements,
    pub calculations: Calculations,
    pub validation_failure_counts: BTreeMap<String, u32>,
    pub responses: BTreeMap<String, Response>,
}

impl Default for StorySnapshot {
    fn default() -> Self {
        Self {
            story: HUBBLES_LAW.to_string(),
            measurements: Measurements::default(),
            calculations: Calculations::default(),
            validation_failure_counts: default_failure_counts(),
            responses: default_responses(),
        }
    }
}

impl StorySnapshot {
    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// The Hubble's Law story.
#[derive(Debug, Clone)]
pub struct HubblesLaw {
    pub measurements: Measurements,
    pub calculations: Calculations,
    pub validation_failure_counts: BTreeMap<String, u32>,
    pub responses: BTreeMap<String, Response>,
    data_collection: DataCollection,
}

impl HubblesLaw {
    /// Create the story with its empty student datasets.
    pub fn new() -> DataResult<Self> {
        let mut measurements = Data::new(STUDENT_MEASUREMENTS);
        let mut placeholder = Data::new(STUDENT_DATA);
        for col in STUDENT_COLUMNS {
            if TEXT_COLUMNS.contains(&col) {
                measurements.add_component(col, Column::Text(Vec::new()))?;
                placeholder.add_component(col, Column::Text(vec!["X".to_string()]))?;
            } else {
                measurements.add_component(col, Column::Numeric(Vec::new()))?;
                placeholder.add_component(col, Column::Numeric(vec![0.0]))?;
            }
        }

        let mut data_collection = DataCollection::new();
        data_collection.append(measurements)?;
        data_collection.append(placeholder)?;
        for col in LINKED_COLUMNS {
            data_collection.add_link(STUDENT_MEASUREMENTS, col, STUDENT_DATA, col)?;
        }

        let snapshot = StorySnapshot::default();
        Ok(Self {
            measurements: snapshot.measurements,
            calculations: snapshot.calculations,
            validation_failure_counts: snapshot.validation_failure_counts,
            responses: snapshot.responses,
            data_collection,
        })
    }

    pub fn data_collection(&self) -> &DataCollection {
        &self.data_collection
    }

    pub fn data_collection_mut(&mut self) -> &mut DataCollection {
        &mut self.data_collection
    }

    /// Replace the values of dataset `label`, or add `new_data` under that label.
    ///
    /// Replacing values fails if `new_data` drops a linked component.
    pub fn update_data(&mut self, label: &str, mut new_data: Data) -> DataResult<()> {
        if self.data_collection.contains(label) {
            self.data_collection.update_values(label, &new_data)
        } else {
            new_data.set_label(label);
            self.data_collection.append(new_data)
        }
    }

    /// Copy measurements with both a distance and a velocity into the
    /// student data.
    pub fn update_student_data(&mut self) -> DataResult<()> {
        let measurements = self
            .data_collection
            .get(STUDENT_MEASUREMENTS)
            .ok_or_else(|| DataError::UnknownData(STUDENT_MEASUREMENTS.to_string()))?;

        let distance = measurements.numeric("distance")?;
        let velocity = measurements.numeric("velocity")?;
        let keep: Vec<bool> = distance
            .iter()
            .zip(velocity)
            .map(|(d, v)| !d.is_nan() && !v.is_nan())
            .collect();
        let complete = measurements.filter_rows(&keep);
        log::debug!(
            "Student data: {} of {} measurements complete",
            complete.row_count(),
            measurements.row_count()
        );

        self.data_collection.update_values(STUDENT_DATA, &complete)
    }

    /// Count another failed attempt at a validated question.
    pub fn record_validation_failure(&mut self, key: &str) -> u32 {
        let count = self
            .validation_failure_counts
            .entry(key.to_string())
            .or_insert(0);
        *count += 1;
        *count
    }

    /// Store a free-text answer.
    pub fn set_response(&mut self, key: &str, text: impl Into<String>, finished: bool) {
        self.responses.insert(
            key.to_string(),
            Response {
                free_response: text.into(),
                finished,
            },
        );
    }

    /// Capture the progress for persistence.
    pub fn snapshot(&self) -> StorySnapshot {
        StorySnapshot {
            story: HUBBLES_LAW.to_string(),
            measurements: self.measurements.clone(),
            calculations: self.calculations.clone(),
            validation_failure_counts: self.validation_failure_counts.clone(),
            responses: self.responses.clone(),
        }
    }

    /// Restore saved progress. Datasets are left as they are.
    pub fn restore(&mut self, snapshot: StorySnapshot) {
        self.measurements = snapshot.measurements;
        self.calculations = snapshot.calculations;
        self.validation_failure_counts = snapshot.validation_failure_counts;
        self.responses = snapshot.responses;
    }

    /// Save the progress under `id`.
    pub fn save_progress(&self, storage: &dyn StoryStorage, id: &str) -> StorageResult<()> {
        log::debug!("Saving {} progress for '{}'", HUBBLES_LAW, id);
        storage.save(id, &self.snapshot())
    }

    /// Restore progress saved under `id`.
    pub fn load_progress(&mut self, storage: &dyn StoryStorage, id: &str) -> StorageResult<()> {
        let snapshot = storage.load(id)?;
        self.restore(snapshot);
        Ok(())
    }
}

#![allow(clippy::missing_errors_doc)]

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, Utc};
use fittrack_domain as domain;
use log::{debug, error, warn};

use crate::{Key, KeyValueStore, StoreError};

/// Serialized size at which a warning about the approaching storage limit is logged.
///
/// Browsers typically allow about 5 MiB of local storage per origin.
pub const SOFT_LIMIT: usize = 4 * 1024 * 1024;

/// Persists workouts and the theme preference in a key-value store.
///
/// Every read fetches the data from the store again. Records which cannot be converted into
/// valid workouts are dropped while reading and the cleaned data is written back.
pub struct Adapter<S> {
    store: S,
    soft_limit: usize,
}

impl<S: KeyValueStore> Adapter<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            soft_limit: SOFT_LIMIT,
        }
    }

    #[must_use]
    pub fn with_soft_limit(mut self, soft_limit: usize) -> Self {
        self.soft_limit = soft_limit;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Number of bytes occupied by the stored workouts, including the key.
    pub fn usage(&self) -> Result<usize, StoreError> {
        Ok(self
            .store
            .get_item(Key::Workouts.as_ref())?
            .map_or(0, |data| Key::Workouts.as_ref().len() + data.len()))
    }

    fn load(&self) -> Result<Vec<domain::Workout>, StoreError> {
        let Some(data) = self.store.get_item(Key::Workouts.as_ref())? else {
            return Ok(vec![]);
        };

        let entries = match serde_json::from_str::<serde_json::Value>(&data) {
            Ok(serde_json::Value::Array(entries)) => entries,
            Ok(_) => {
                warn!("resetting workouts: stored data is not a list");
                self.reset();
                return Ok(vec![]);
            }
            Err(err) => {
                warn!("resetting workouts: {err}");
                self.reset();
                return Ok(vec![]);
            }
        };

        let count = entries.len();
        let mut ids = HashSet::new();
        let workouts = entries
            .into_iter()
            .filter_map(|entry| match parse_record(entry) {
                Ok(workout) => Some(workout),
                Err(err) => {
                    debug!("dropping invalid workout record: {err}");
                    None
                }
            })
            .filter(|workout| {
                let unique = ids.insert(workout.id.clone());
                if !unique {
                    debug!("dropping workout record with duplicate id {}", workout.id);
                }
                unique
            })
            .collect::<Vec<_>>();

        if workouts.len() < count {
            warn!(
                "dropped {} of {count} stored workout records",
                count - workouts.len()
            );
            if let Err(err) = self.save(&workouts) {
                error!("failed to write back repaired workouts: {err}");
            }
        }

        Ok(workouts)
    }

    fn save(&self, workouts: &[domain::Workout]) -> Result<(), StoreError> {
        let data = serde_json::to_string(&workouts.iter().map(Workout::from).collect::<Vec<_>>())
            .map_err(|err| StoreError::Other(err.to_string()))?;

        if data.len() >= self.soft_limit {
            warn!(
                "workout data is approaching the storage limit ({} of {} bytes)",
                data.len(),
                self.soft_limit
            );
        }

        self.store.set_item(Key::Workouts.as_ref(), &data)
    }

    fn reset(&self) {
        if let Err(err) = self.store.set_item(Key::Workouts.as_ref(), "[]") {
            error!("failed to reset workouts: {err}");
        }
    }
}

impl<S: KeyValueStore> domain::WorkoutRepository for Adapter<S> {
    fn read_workouts(&self) -> Result<Vec<domain::Workout>, domain::ReadError> {
        Ok(self.load().map_err(domain::StorageError::from)?)
    }

    fn write_workouts(&self, workouts: &[domain::Workout]) -> Result<(), domain::StorageError> {
        Ok(self.save(workouts)?)
    }

    fn create_workout(
        &self,
        workout: domain::Workout,
    ) -> Result<domain::Workout, domain::CreateError> {
        let mut workouts = self.read_workouts()?;

        if workouts.iter().any(|w| w.id == workout.id) {
            return Err(domain::CreateError::Conflict);
        }

        workouts.push(workout.clone());
        self.write_workouts(&workouts)?;
        Ok(workout)
    }

    fn modify_workout(
        &self,
        id: &domain::WorkoutID,
        patch: domain::WorkoutPatch,
    ) -> Result<domain::Workout, domain::UpdateError> {
        let mut workouts = self.read_workouts()?;

        let Some(workout) = workouts.iter_mut().find(|w| w.id == *id) else {
            return Err(domain::UpdateError::NotFound);
        };

        workout.apply(patch, Utc::now());
        let workout = workout.clone();

        self.write_workouts(&workouts)?;
        Ok(workout)
    }

    fn delete_workout(
        &self,
        id: &domain::WorkoutID,
    ) -> Result<domain::WorkoutID, domain::DeleteError> {
        let mut workouts = self.read_workouts()?;
        let count = workouts.len();

        workouts.retain(|w| w.id != *id);

        if workouts.len() == count {
            return Err(domain::DeleteError::NotFound);
        }

        self.write_workouts(&workouts)?;
        Ok(id.clone())
    }

    fn delete_all_workouts(&self) -> Result<(), domain::DeleteError> {
        self.store
            .remove_item(Key::Workouts.as_ref())
            .map_err(|err| domain::DeleteError::Storage(err.into()))
    }
}

impl<S: KeyValueStore> domain::ThemeRepository for Adapter<S> {
    fn read_theme(&self) -> Result<domain::Theme, domain::ReadError> {
        let theme = self
            .store
            .get_item(Key::Theme.as_ref())
            .map_err(domain::StorageError::from)?;

        Ok(match theme {
            Some(value) => value.parse().unwrap_or_else(|err| {
                warn!("ignoring stored theme: {err}");
                domain::Theme::default()
            }),
            None => domain::Theme::default(),
        })
    }

    fn write_theme(&self, theme: domain::Theme) -> Result<(), domain::StorageError> {
        Ok(self.store.set_item(Key::Theme.as_ref(), theme.as_str())?)
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
struct Workout {
    id: String,
    exercise: String,
    date: NaiveDate,
    sets: u32,
    reps: u32,
    weight: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    updated_at: Option<DateTime<Utc>>,
}

impl From<&domain::Workout> for Workout {
    fn from(value: &domain::Workout) -> Self {
        Self {
            id: value.id.to_string(),
            exercise: value.exercise.to_string(),
            date: value.date,
            sets: *value.sets,
            reps: *value.reps,
            weight: *value.weight,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl TryFrom<Workout> for domain::Workout {
    type Error = InvalidRecord;

    fn try_from(value: Workout) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.into(),
            exercise: domain::ExerciseName::new(&value.exercise)?,
            date: value.date,
            sets: domain::Sets::new(value.sets)?,
            reps: domain::Reps::new(value.reps)?,
            weight: domain::Weight::new(value.weight)?,
            created_at: value.created_at,
            updated_at: value.updated_at,
        })
    }
}

fn parse_record(value: serde_json::Value) -> Result<domain::Workout, InvalidRecord> {
    domain::Workout::try_from(serde_json::from_value::<Workout>(value)?)
}

#[derive(thiserror::Error, Debug)]
pub enum InvalidRecord {
    #[error(transparent)]
    Format(#[from] serde_json::Error),
    #[error(transparent)]
    Exercise(#[from] domain::ExerciseNameError),
    #[error(transparent)]
    Sets(#[from] domain::SetsError),
    #[error(transparent)]
    Reps(#[from] domain::RepsError),
    #[error(transparent)]
    Weight(#[from] domain::WeightError),
}

#![warn(clippy::pedantic)]

use fittrack_domain as domain;
use strum::AsRefStr;

pub mod adapter;
#[allow(clippy::module_name_repetitions)]
pub mod local_storage;
pub mod memory;

pub use adapter::Adapter;

/// A string key-value store with the semantics of the browser's `localStorage`.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove_item(&self, key: &str) -> Result<(), StoreError>;
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("quota exceeded")]
    QuotaExceeded,
    #[error("{0}")]
    Other(String),
}

impl From<StoreError> for domain::StorageError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::QuotaExceeded => domain::StorageError::QuotaExceeded,
            StoreError::Other(_) => domain::StorageError::Other(Box::new(value)),
        }
    }
}

#[derive(AsRefStr, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    #[strum(serialize = "fittrack_workouts")]
    Workouts,
    #[strum(serialize = "fittrack_theme")]
    Theme,
    #[strum(serialize = "fittrack_log")]
    Log,
}

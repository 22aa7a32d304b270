use std::collections::VecDeque;

use fittrack_web_app::log;
use gloo_storage::Storage as GlooStorage;
use wasm_bindgen::{JsCast, JsValue};

use crate::{Key, KeyValueStore, StoreError};

const MAX_LOG_ENTRIES: usize = 100;

/// The browser's `localStorage`.
pub struct LocalStorage;

impl KeyValueStore for LocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        gloo_storage::LocalStorage::raw()
            .get_item(key)
            .map_err(store_error)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        gloo_storage::LocalStorage::raw()
            .set_item(key, value)
            .map_err(store_error)
    }

    fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        gloo_storage::LocalStorage::raw()
            .remove_item(key)
            .map_err(store_error)
    }
}

fn store_error(err: JsValue) -> StoreError {
    match err.dyn_into::<web_sys::DomException>() {
        Ok(exception) => {
            if is_quota_exceeded(&exception.name(), exception.code()) {
                StoreError::QuotaExceeded
            } else {
                StoreError::Other(format!("{}: {}", exception.name(), exception.message()))
            }
        }
        Err(err) => StoreError::Other(
            err.as_string()
                .unwrap_or_else(|| "unknown storage error".to_string()),
        ),
    }
}

/// Browsers report a full storage with different exception names.
fn is_quota_exceeded(name: &str, code: u16) -> bool {
    name == "QuotaExceededError" || name == "NS_ERROR_DOM_QUOTA_REACHED" || code == 22
}

pub struct Log;

impl log::Repository for Log {
    fn read_entries(&self) -> Result<VecDeque<log::Entry>, log::Error> {
        match gloo_storage::LocalStorage::get(Key::Log.as_ref()) {
            Ok(entries) => Ok(entries),
            Err(err) => match err {
                gloo_storage::errors::StorageError::KeyNotFound(_) => Ok(VecDeque::new()),
                err => Err(err),
            },
        }
        .map_err(|err| log::Error::Unknown(err.to_string()))
    }

    fn write_entry(&self, entry: log::Entry) -> Result<(), log::Error> {
        let mut entries = self.read_entries()?;
        entries.push_front(entry);
        entries.truncate(MAX_LOG_ENTRIES);
        gloo_storage::LocalStorage::set(Key::Log.as_ref(), entries)
            .map_err(|err| log::Error::Unknown(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::standard("QuotaExceededError", 0, true)]
    #[case::firefox("NS_ERROR_DOM_QUOTA_REACHED", 1014, true)]
    #[case::legacy_code("Error", 22, true)]
    #[case::security("SecurityError", 18, false)]
    fn test_is_quota_exceeded(#[case] name: &str, #[case] code: u16, #[case] expected: bool) {
        assert_eq!(is_quota_exceeded(name, code), expected);
    }
}

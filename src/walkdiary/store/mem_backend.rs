use super::backend::StorageBackend;
use crate::error::{DiaryError, Result};
use async_trait::async_trait;
use std::cell::RefCell;
use std::collections::HashMap;

/// In-memory storage backend for testing.
///
/// Uses `RefCell` for interior mutability since the diary runs on a single
/// logical thread. This keeps the `StorageBackend` trait on `&self`.
#[derive(Default)]
pub struct MemBackend {
    values: RefCell<HashMap<String, String>>,
    simulate_read_error: RefCell<bool>,
    simulate_write_error: RefCell<bool>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a raw stored value, as if a previous session had written it.
    pub fn with_value(key: &str, value: &str) -> Self {
        let backend = Self::new();
        backend
            .values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        backend
    }

    /// Enable read error simulation for testing error handling.
    pub fn set_simulate_read_error(&self, simulate: bool) {
        *self.simulate_read_error.borrow_mut() = simulate;
    }

    /// Enable write error simulation (e.g. a full quota).
    pub fn set_simulate_write_error(&self, simulate: bool) {
        *self.simulate_write_error.borrow_mut() = simulate;
    }

    /// The raw value currently stored under `key`.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }
}

#[async_trait(?Send)]
impl StorageBackend for MemBackend {
    fn read(&self, key: &str) -> Result<Option<String>> {
        if *self.simulate_read_error.borrow() {
            return Err(DiaryError::StorageReadFailed(
                "Simulated read error".to_string(),
            ));
        }
        Ok(self.values.borrow().get(key).cloned())
    }

    async fn write(&self, key: &str, value: String) -> Result<()> {
        if *self.simulate_write_error.borrow() {
            return Err(DiaryError::StorageWriteFailed(
                "Simulated write error".to_string(),
            ));
        }
        self.values
            .borrow_mut()
            .insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.values.borrow_mut().remove(key);
        Ok(())
    }
}

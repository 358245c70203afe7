use std::cell::RefCell;
use std::collections::HashMap;

use crate::error::StorageError;

use super::Storage;

/// In-process storage for tests
#[derive(Debug, Default)]
pub(crate) struct MemoryStorage {
    items: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    pub(crate) fn with_items(items: &[(&str, &str)]) -> Self {
        let storage = Self::default();
        for (k, v) in items {
            storage
                .items
                .borrow_mut()
                .insert((*k).to_string(), (*v).to_string());
        }
        storage
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

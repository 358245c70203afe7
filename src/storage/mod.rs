//! Durable client-side key/value storage
//!
//! Mirrors the browser `localStorage` contract: string keys, string values,
//! missing keys read as `None`, removing a missing key is not an error.

mod file;
#[cfg(test)]
mod memory;

pub(crate) use file::FileStorage;
#[cfg(test)]
pub(crate) use memory::MemoryStorage;

use crate::error::StorageError;

pub(crate) trait Storage {
    fn get_item(&self, key: &str) -> Option<String>;

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

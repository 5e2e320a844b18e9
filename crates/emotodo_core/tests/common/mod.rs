#![allow(dead_code)]

use emotodo_core::{KeyValueStore, KvError, KvResult};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

/// In-memory medium that counts calls and can be told to fail.
#[derive(Default)]
pub struct RecordingStore {
    items: RefCell<HashMap<String, String>>,
    pub reads: Cell<usize>,
    pub writes: Cell<usize>,
    pub removes: Cell<usize>,
    pub fail_reads: Cell<bool>,
    pub fail_writes: Cell<bool>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_item(key: &str, value: &str) -> Self {
        let store = Self::new();
        store
            .items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        store
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    pub fn put_raw(&self, key: &str, value: &str) {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }
}

impl KeyValueStore for RecordingStore {
    fn get_item(&self, key: &str) -> KvResult<Option<String>> {
        self.reads.set(self.reads.get() + 1);
        if self.fail_reads.get() {
            return Err(KvError::Backend("read failed".to_string()));
        }
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> KvResult<()> {
        self.writes.set(self.writes.get() + 1);
        if self.fail_writes.get() {
            return Err(KvError::Backend("disk full".to_string()));
        }
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn multi_remove(&self, keys: &[&str]) -> KvResult<()> {
        self.removes.set(self.removes.get() + 1);
        if self.fail_writes.get() {
            return Err(KvError::Backend("remove failed".to_string()));
        }
        let mut items = self.items.borrow_mut();
        for key in keys {
            items.remove(*key);
        }
        Ok(())
    }
}

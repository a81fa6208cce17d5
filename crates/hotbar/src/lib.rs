#![warn(missing_docs)]
//! Quick-access bar: nine slots holding item ids, persisted after every
//! change and resolved against the latest catalog.

pub mod slots;
pub mod storage;

pub use slots::{
    AssignOutcome, HotbarEvent, QuickAccessStore, SlotRecord, SlotView, HOTBAR_STORAGE_KEY,
};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};

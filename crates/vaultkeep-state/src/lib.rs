#![doc = include_str!("../README.md")]

mod file;
mod memory;
pub mod settings;
mod store;

pub use file::JsonFileStore;
pub use memory::MemoryStore;
pub use store::{KeyValueStore, StoreError};

//! Durable key-value storage
//!
//! Session and settings state persist through [`KeyValueStore`], which plays
//! the role browser local storage plays for a web console.

mod file_store;
mod memory;
mod repository;

pub use file_store::FileKvStore;
pub use memory::MemoryKvStore;
pub use repository::KeyValueStore;

//! Adapters layer: concrete backends and the test codec.

mod document;
pub mod codec;
pub mod file_catalog;
pub mod memory_catalog;
pub mod memory_keystore;

pub use codec::JsonCodec;
pub use file_catalog::FileCatalog;
pub use memory_catalog::MemoryCatalog;
pub use memory_keystore::MemoryKeyStore;

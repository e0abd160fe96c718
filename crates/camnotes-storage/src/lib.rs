//! Camera Notes storage crate - durable key-value persistence for the
//! photo collection and settings.
//!
//! Every mutation writes the whole collection through the
//! [`KeyValueStore`] before the in-memory copy is replaced, so callers only
//! ever observe pre- or post-operation state.
//!
//! The stores are not reentrant: two mutations started without awaiting
//! the first would both read the same snapshot and the second write would
//! win. Callers hold one store per process and await each operation.

pub mod journal;
pub mod kv;
pub mod photos;
pub mod settings;
pub mod transfer;

pub use journal::Journal;
pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use photos::PhotoStore;
pub use settings::SettingsStore;
pub use transfer::{export_json, parse_import, DirectoryExporter, ExportCollaborator, MemoryExporter};

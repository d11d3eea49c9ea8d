//! JSON scene document backend.
//!
//! A scene document is a plain or gzip-compressed JSON file describing an
//! object hierarchy with per-object schema samples. [`DocumentArchive`]
//! implements [`ArchiveReader`](crate::core::ArchiveReader) over it.

pub mod format;
mod reader;

pub use format::SceneDocument;
pub use reader::{DocumentArchive, DocumentObject};

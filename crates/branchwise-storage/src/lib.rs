//! Filesystem adapters for the Branchwise ports.
//!
//! `FileContentSource` serves scenario documents from a content directory.
//! `JsonFileStore` keeps the key-value store in a single JSON file.

pub mod file_content_source;
pub mod json_file_store;

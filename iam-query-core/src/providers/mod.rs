//! I/O seams used by the dataset loader.
//!
//! Loading code names the aliases below, never the concrete providers.

pub(crate) mod filesystem;
pub(crate) mod json;

/// Reads service reference files from disk.
pub type FileSystemProvider = filesystem::NativeFileSystemProvider;

/// Parses service reference documents and pretty-prints query results.
pub type JsonProvider = json::NativeJsonProvider;

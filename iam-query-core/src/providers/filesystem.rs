//! Native filesystem provider for reading a service reference directory.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::errors::{QueryError, Result};

/// Native filesystem provider using blocking `std::fs` I/O.
///
/// Dataset loading happens once per process before any query runs, so there is
/// nothing to overlap it with.
#[derive(Debug, Clone)]
pub struct NativeFileSystemProvider;

impl NativeFileSystemProvider {
    /// Read the entire contents of a file as a UTF-8 string.
    pub fn read_file(path: impl AsRef<Path>) -> Result<String> {
        std::fs::read_to_string(path.as_ref())
            .map_err(|e| QueryError::dataset_io("read", path.as_ref(), e))
    }

    /// List the `*.json` files directly inside `dir`, sorted by file name.
    ///
    /// Subdirectories are not descended into. Symlinks are followed, so a linked
    /// document counts as the file it points to.
    pub fn list_json_files(dir: &Path) -> Result<Vec<PathBuf>> {
        let metadata =
            std::fs::metadata(dir).map_err(|e| QueryError::dataset_io("access directory", dir, e))?;

        if !metadata.is_dir() {
            return Err(QueryError::dataset_io(
                "list",
                dir,
                "path is not a directory",
            ));
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| QueryError::dataset_io("read directory entry", dir, e))?;
            let path = entry.path();
            if entry.file_type().is_file()
                && path.extension().and_then(|ext| ext.to_str()) == Some("json")
            {
                files.push(path.to_path_buf());
            }
        }

        Ok(files)
    }
}

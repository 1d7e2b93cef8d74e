//! Dataset source resolution.
//!
//! First match wins: an explicit `--dataset-dir` (or `IAM_QUERY_DATASET_DIR`),
//! then `$HOME/.iam-query/service-reference` when that directory exists, then the
//! corpus embedded in the binary.

use std::path::{Path, PathBuf};

use iam_query_core::DatasetSource;
use log::debug;

/// Environment variable read by clap for `--dataset-dir`.
pub(crate) const DATASET_DIR_ENV: &str = "IAM_QUERY_DATASET_DIR";

/// Per-user dataset location, relative to the home directory.
const HOME_DATASET_DIR: &str = ".iam-query/service-reference";

pub(crate) fn resolve_dataset_source(explicit: Option<PathBuf>, home: Option<&Path>) -> DatasetSource {
    if let Some(dir) = explicit {
        debug!("Using dataset directory from command line: {}", dir.display());
        return DatasetSource::Directory(dir);
    }

    if let Some(home) = home {
        let candidate = home.join(HOME_DATASET_DIR);
        if candidate.is_dir() {
            debug!("Using per-user dataset directory: {}", candidate.display());
            return DatasetSource::Directory(candidate);
        }
    }

    DatasetSource::Embedded
}

pub(crate) fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .filter(|home| !home.is_empty())
        .map(PathBuf::from)
}

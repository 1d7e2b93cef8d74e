//! The immutable reference corpus.
//!
//! A [`Dataset`] is loaded once per process from one of the [`DatasetSource`]s and
//! never mutated afterwards. It is `Send + Sync`, so any number of queries may read
//! it concurrently without coordination. Loading is all-or-nothing: any I/O,
//! parsing or integrity failure yields `DatasetUnavailable` and no dataset.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Instant;

use log::{debug, info, warn};
use rayon::prelude::*;

pub(crate) mod model;
pub(crate) mod scope;
pub(crate) mod service_reference;

pub use model::{Action, ArnType, ConditionKey, ResourceTypeRef};
pub use scope::ServiceScope;
pub use service_reference::{
    AnnotationProperties, Annotations, ResourceReference, ServiceReference,
    ServiceReferenceAction, ServiceReferenceConditionKey, ServiceReferenceResource,
};

use crate::embedded_data::EmbeddedServiceReference;
use crate::errors::{QueryError, Result};
use crate::providers::{FileSystemProvider, JsonProvider};

/// Where a dataset came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetSource {
    /// The corpus compiled into the binary
    Embedded,
    /// A directory of `<service>.json` service reference documents
    Directory(PathBuf),
    /// Documents handed over by the caller
    InMemory,
}

impl fmt::Display for DatasetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Embedded => f.write_str("embedded service reference"),
            Self::Directory(path) => write!(f, "{}", path.display()),
            Self::InMemory => f.write_str("in-memory documents"),
        }
    }
}

/// Loaded, indexed reference corpus for every service.
#[derive(Debug, Clone)]
pub struct Dataset {
    source: DatasetSource,
    services: Vec<ServiceScope>,
    service_index: HashMap<String, usize>,
}

impl Dataset {
    /// Load the dataset from `source`.
    ///
    /// `DatasetSource::InMemory` has no documents to load and is rejected; use
    /// [`Dataset::from_documents`] instead.
    pub fn load(source: &DatasetSource) -> Result<Self> {
        match source {
            DatasetSource::Embedded => Self::embedded(),
            DatasetSource::Directory(dir) => Self::load_from_dir(dir),
            DatasetSource::InMemory => Err(QueryError::DatasetUnavailable(
                "in-memory datasets must be built from documents".to_string(),
            )),
        }
    }

    /// Load the corpus compiled into the binary.
    pub fn embedded() -> Result<Self> {
        let start_time = Instant::now();

        let scopes = EmbeddedServiceReference::documents()
            .into_iter()
            .map(|(name, data)| {
                let reference: ServiceReference = JsonProvider::parse_slice(&data, &name)?;
                ServiceScope::from_reference(reference)
            })
            .collect::<Result<Vec<_>>>()?;

        let dataset = Self::assemble(DatasetSource::Embedded, scopes)?;
        debug!(
            "Loaded embedded dataset with {} services in {:?}",
            dataset.services.len(),
            start_time.elapsed()
        );
        Ok(dataset)
    }

    /// Load every `*.json` service reference document directly under `dir`.
    ///
    /// Files are parsed in parallel and assembled in file-name order.
    pub fn load_from_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let start_time = Instant::now();

        let files = FileSystemProvider::list_json_files(dir)?;
        if files.is_empty() {
            return Err(QueryError::dataset_io(
                "load",
                dir,
                "no service reference documents found",
            ));
        }

        let scopes = files
            .par_iter()
            .map(|path| {
                let content = FileSystemProvider::read_file(path)?;
                let reference: ServiceReference =
                    JsonProvider::parse(&content, &path.display().to_string())?;
                ServiceScope::from_reference(reference)
            })
            .collect::<Result<Vec<_>>>()?;

        let dataset = Self::assemble(DatasetSource::Directory(dir.to_path_buf()), scopes)?;
        info!(
            "Loaded {} services from {} in {:?}",
            dataset.services.len(),
            dir.display(),
            start_time.elapsed()
        );
        Ok(dataset)
    }

    /// Build a dataset from already parsed service reference documents.
    pub fn from_documents(documents: impl IntoIterator<Item = ServiceReference>) -> Result<Self> {
        let scopes = documents
            .into_iter()
            .map(ServiceScope::from_reference)
            .collect::<Result<Vec<_>>>()?;
        Self::assemble(DatasetSource::InMemory, scopes)
    }

    fn assemble(source: DatasetSource, services: Vec<ServiceScope>) -> Result<Self> {
        // A service without entries is not a service; lookups report it as unknown.
        let mut services: Vec<_> = services
            .into_iter()
            .filter(|scope| {
                if scope.is_empty() {
                    warn!("Skipping service '{}' from {}: no entries", scope.name(), source);
                }
                !scope.is_empty()
            })
            .collect();
        services.sort_by(|a, b| a.name().cmp(b.name()));

        let mut service_index = HashMap::with_capacity(services.len());
        for (position, scope) in services.iter().enumerate() {
            if service_index
                .insert(scope.name().to_ascii_lowercase(), position)
                .is_some()
            {
                return Err(QueryError::DatasetUnavailable(format!(
                    "service '{}' is defined more than once in {}",
                    scope.name(),
                    source
                )));
            }
        }

        Ok(Self {
            source,
            services,
            service_index,
        })
    }

    #[must_use]
    pub fn source(&self) -> &DatasetSource {
        &self.source
    }

    /// Service identifiers, sorted.
    pub fn services(&self) -> impl Iterator<Item = &str> {
        self.services.iter().map(ServiceScope::name)
    }

    /// Resolve the scope of one service; `UnknownService` if it has no entries.
    pub fn for_service(&self, service: &str) -> Result<&ServiceScope> {
        self.service_index
            .get(&service.to_ascii_lowercase())
            .map(|&position| &self.services[position])
            .ok_or_else(|| QueryError::UnknownService(service.to_string()))
    }
}

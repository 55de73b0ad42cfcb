//! Configuration resolution.
//!
//! [`ConfigResolver`] turns a module path into the compiler options that govern
//! it: locate the `tsconfig.json`, read it, expand `extends` chains, then apply
//! the caller's override mapping. Caching lives in [`cache`].

pub mod cache;
pub mod discovery;
pub mod expand;
pub mod reader;

use std::sync::Arc;

use ts::CompilerOptions;

pub use cache::{ConfigurationCache, ScopeKey};
pub use discovery::find_config_file;
pub use expand::expand_config;
pub use reader::read_config_file;

use crate::error::TransformError;
use crate::file_system::{strip_query, AbsoluteFsPath, ReadonlyFileSystem};
use crate::options::TsconfigOptions;

/// Resolves compiler options for modules. Stateless apart from file reads.
#[derive(Clone)]
pub struct ConfigResolver {
    fs: Arc<dyn ReadonlyFileSystem>,
}

impl ConfigResolver {
    pub fn new(fs: Arc<dyn ReadonlyFileSystem>) -> Self {
        Self { fs }
    }

    /// The file a module id refers to: bundler query dropped, made absolute
    /// against the working directory.
    pub fn module_path(&self, id: &str) -> AbsoluteFsPath {
        AbsoluteFsPath::resolve(&self.fs.pwd(), strip_query(id))
    }

    /// Find the configuration file governing the module `id`.
    ///
    /// An explicit location is taken as given (relative locations resolve against
    /// the working directory) without checking that it exists; a missing file shows
    /// up as a read error later.
    pub fn locate(&self, id: &str, options: &TsconfigOptions) -> Result<AbsoluteFsPath, TransformError> {
        if let Some(location) = &options.location {
            return Ok(AbsoluteFsPath::resolve(&self.fs.pwd(), location));
        }

        let module = self.module_path(id);
        find_config_file(&*self.fs, &module.dirname()).ok_or_else(|| {
            TransformError::ConfigurationNotFound {
                file: id.to_string(),
            }
        })
    }

    pub fn resolve(&self, id: &str, options: &TsconfigOptions) -> Result<CompilerOptions, TransformError> {
        let location = self.locate(id, options)?;
        tracing::debug!(module = id, config = %location, "resolving TypeScript configuration");

        let raw = read_config_file(&*self.fs, &location).map_err(TransformError::ConfigurationParse)?;
        let mut compiler_options = expand_config(&*self.fs, &raw, &location)
            .map_err(TransformError::ConfigurationParse)?;

        if let Some(overrides) = &options.override_options {
            compiler_options.merge(overrides);
        }

        Ok(compiler_options)
    }
}

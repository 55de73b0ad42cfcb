#![deny(clippy::all)]

/**
 * TypeScript Transform - Rust Implementation
 *
 * Per-module TypeScript compilation for bundler pipelines, driven by the
 * `tsconfig.json` that governs each module.
 */
pub use ts;

pub mod compile;
pub mod config;
pub mod error;
pub mod file_system;
pub mod filter;
pub mod options;
pub mod plugin;

pub use compile::{CompileFailure, CompiledModule, Compiler, OxcCompiler};
pub use config::{ConfigResolver, ConfigurationCache, ScopeKey};
pub use error::{HostError, OptionsError, TransformError};
pub use filter::{FileFilter, FilterGate};
pub use options::{Apply, CodeFilter, Enforce, FileFilterOptions, FilterOptions, Options, TsconfigOptions};
pub use plugin::{Plugin, TransformOutput, TypeScriptTransform, PLUGIN_NAME};

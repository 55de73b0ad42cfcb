//! Transform Dispatcher.
//!
//! Wires the filter gate, the configuration cache/resolver and the compiler
//! together behind the host's plugin hooks.

use std::sync::Arc;

use crate::compile::{Compiler, OxcCompiler};
use crate::config::{ConfigResolver, ConfigurationCache, ScopeKey};
use crate::error::{HostError, OptionsError, TransformError};
use crate::file_system::{NodeJSFileSystem, ReadonlyFileSystem};
use crate::filter::FilterGate;
use crate::options::{Apply, Enforce, Options};

pub const PLUGIN_NAME: &str = "vite-plugin-typescript-transform";

/// Result of a successful transform, handed back to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformOutput {
    pub code: String,
    pub map: Option<String>,
}

/// The hooks a bundler host calls on a plugin.
///
/// `transform` returning `Ok(None)` leaves the module untouched; `Err` is reported
/// by the host for that module only.
pub trait Plugin: Send + Sync {
    fn name(&self) -> &'static str;

    fn apply(&self) -> Option<Apply> {
        None
    }

    fn enforce(&self) -> Option<Enforce> {
        None
    }

    fn build_start(&self) {}

    fn transform(&self, code: &str, id: &str) -> Result<Option<TransformOutput>, HostError>;
}

/// Compiles TypeScript modules using the `tsconfig.json` that governs each of them.
pub struct TypeScriptTransform {
    options: Options,
    filter: FilterGate,
    resolver: ConfigResolver,
    cache: ConfigurationCache,
    compiler: Arc<dyn Compiler>,
}

impl TypeScriptTransform {
    /// A plugin reading from disk and compiling with oxc.
    pub fn new(options: Options) -> Result<Self, OptionsError> {
        Self::with_parts(options, Arc::new(NodeJSFileSystem::new()), Arc::new(OxcCompiler::new()))
    }

    pub fn with_parts(
        options: Options,
        fs: Arc<dyn ReadonlyFileSystem>,
        compiler: Arc<dyn Compiler>,
    ) -> Result<Self, OptionsError> {
        let filter = FilterGate::new(&options.filter, &fs.pwd())?;
        Ok(Self {
            options,
            filter,
            resolver: ConfigResolver::new(fs),
            cache: ConfigurationCache::new(),
            compiler,
        })
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn cache(&self) -> &ConfigurationCache {
        &self.cache
    }

    fn run(&self, code: &str, id: &str) -> Result<TransformOutput, TransformError> {
        let module = self.resolver.module_path(id);
        let tsconfig = &self.options.tsconfig;
        let scope = ScopeKey::for_module(&module, tsconfig.location.as_deref());

        let compiler_options = self
            .cache
            .get_or_resolve(&scope, || self.resolver.resolve(id, tsconfig))?;

        let compiled = self
            .compiler
            .compile(code, id, &compiler_options)
            .map_err(TransformError::Compilation)?;

        Ok(TransformOutput {
            code: compiled.code,
            map: compiled.map,
        })
    }
}

impl Plugin for TypeScriptTransform {
    fn name(&self) -> &'static str {
        PLUGIN_NAME
    }

    fn apply(&self) -> Option<Apply> {
        self.options.apply
    }

    fn enforce(&self) -> Option<Enforce> {
        self.options.enforce
    }

    fn build_start(&self) {
        tracing::info!(cached = self.cache.len(), "build started, clearing configuration cache");
        self.cache.clear();
    }

    fn transform(&self, code: &str, id: &str) -> Result<Option<TransformOutput>, HostError> {
        if !self.filter.should_transform(id, code) {
            tracing::trace!(id, "skipped by filter");
            return Ok(None);
        }

        match self.run(code, id) {
            Ok(output) => Ok(Some(output)),
            Err(error) => {
                tracing::debug!(id, error = %error, "transform failed");
                Err(error.into_host_error(id))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::{CompileFailure, CompiledModule};
    use crate::file_system::testing::MockFileSystem;
    use crate::file_system::AbsoluteFsPath;
    use crate::options::{CodeFilter, FileFilterOptions, FilterOptions, TsconfigOptions};
    use parking_lot::Mutex;
    use serde_json::json;
    use ts::{make_diagnostic_chain, CompilerOptions};

    /// Echoes the source and records the options each call received.
    #[derive(Default)]
    struct RecordingCompiler {
        calls: Mutex<Vec<(String, Arc<CompilerOptions>)>>,
    }

    impl Compiler for RecordingCompiler {
        fn compile(
            &self,
            source_text: &str,
            file_name: &str,
            options: &CompilerOptions,
        ) -> Result<CompiledModule, CompileFailure> {
            self.calls
                .lock()
                .push((file_name.to_string(), Arc::new(options.clone())));
            Ok(CompiledModule {
                code: format!("/* {} */ {}", options.get_str("target").unwrap_or("-"), source_text),
                map: None,
            })
        }
    }

    struct FailingCompiler(fn() -> CompileFailure);

    impl Compiler for FailingCompiler {
        fn compile(&self, _: &str, _: &str, _: &CompilerOptions) -> Result<CompiledModule, CompileFailure> {
            Err((self.0)())
        }
    }

    fn project() -> MockFileSystem {
        let fs = MockFileSystem::with_cwd("/proj");
        fs.init_with_files(vec![(
            "/proj/tsconfig.json",
            r#"{ "compilerOptions": { "target": "es2017", "strict": true } }"#,
        )]);
        fs
    }

    fn plugin(options: Options, fs: &MockFileSystem, compiler: Arc<dyn Compiler>) -> TypeScriptTransform {
        TypeScriptTransform::with_parts(options, Arc::new(fs.clone()), compiler).unwrap()
    }

    #[test]
    fn modules_in_one_directory_share_a_resolution() {
        let fs = project();
        let compiler = Arc::new(RecordingCompiler::default());
        let plugin = plugin(Options::default(), &fs, compiler.clone());
        plugin.build_start();

        plugin.transform("let a = 1;", "/proj/src/a.ts").unwrap().unwrap();
        plugin.transform("let b = 2;", "/proj/src/b.ts").unwrap().unwrap();

        assert_eq!(fs.read_count("/proj/tsconfig.json"), 1);
        let scope = ScopeKey::for_module(&AbsoluteFsPath::new("/proj/src/a.ts"), None);
        let cached = plugin.cache().get(&scope).unwrap();
        assert_eq!(cached.get_str("target"), Some("es2017"));
        assert_eq!(compiler.calls.lock().len(), 2);
    }

    #[test]
    fn other_directories_resolve_independently() {
        let fs = project();
        let plugin = plugin(Options::default(), &fs, Arc::new(RecordingCompiler::default()));
        plugin.build_start();

        plugin.transform("", "/proj/src/a.ts").unwrap();
        plugin.transform("", "/proj/lib/b.ts").unwrap();

        assert_eq!(fs.read_count("/proj/tsconfig.json"), 2);
        assert_eq!(plugin.cache().len(), 2);
    }

    #[test]
    fn build_start_picks_up_edited_configuration() {
        let fs = project();
        let plugin = plugin(Options::default(), &fs, Arc::new(RecordingCompiler::default()));

        plugin.build_start();
        let first = plugin.transform("x", "/proj/src/a.ts").unwrap().unwrap();
        assert!(first.code.starts_with("/* es2017 */"));

        fs.write_file("/proj/tsconfig.json", r#"{ "compilerOptions": { "target": "es5" } }"#);
        let stale = plugin.transform("x", "/proj/src/a.ts").unwrap().unwrap();
        assert!(stale.code.starts_with("/* es2017 */"));

        plugin.build_start();
        let fresh = plugin.transform("x", "/proj/src/a.ts").unwrap().unwrap();
        assert!(fresh.code.starts_with("/* es5 */"));
        assert_eq!(fs.read_count("/proj/tsconfig.json"), 2);
    }

    #[test]
    fn override_takes_precedence() {
        let fs = project();
        let compiler = Arc::new(RecordingCompiler::default());
        let options = Options {
            tsconfig: TsconfigOptions {
                location: None,
                override_options: json!({"strict": false, "sourceMap": true})
                    .as_object()
                    .cloned(),
            },
            ..Options::default()
        };
        let plugin = plugin(options, &fs, compiler.clone());

        plugin.transform("", "/proj/a.ts").unwrap();

        let calls = compiler.calls.lock();
        let used = &calls[0].1;
        assert_eq!(used.get("target"), Some(&json!("es2017")));
        assert_eq!(used.get("strict"), Some(&json!(false)));
        assert_eq!(used.get("sourceMap"), Some(&json!(true)));
    }

    #[test]
    fn excluded_modules_never_reach_the_resolver() {
        let fs = MockFileSystem::with_cwd("/proj");
        let options = Options {
            filter: FilterOptions {
                code: None,
                files: FileFilterOptions {
                    include: Vec::new(),
                    exclude: vec!["**/*.js".to_string()],
                },
            },
            ..Options::default()
        };
        let plugin = plugin(options, &fs, Arc::new(RecordingCompiler::default()));

        assert_eq!(plugin.transform("let a;", "/proj/a.js"), Ok(None));
        assert_eq!(fs.total_reads(), 0);
        assert!(plugin.cache().is_empty());
    }

    #[test]
    fn code_filter_skips_modules() {
        let fs = project();
        let options = Options {
            filter: FilterOptions {
                code: Some(CodeFilter::predicate(|code| !code.contains("@no-transform"))),
                files: FileFilterOptions::default(),
            },
            ..Options::default()
        };
        let plugin = plugin(options, &fs, Arc::new(RecordingCompiler::default()));

        assert_eq!(plugin.transform("// @no-transform", "/proj/a.ts"), Ok(None));
        assert!(plugin.transform("let a;", "/proj/a.ts").unwrap().is_some());
    }

    #[test]
    fn missing_configuration_is_reported_with_the_module() {
        let fs = MockFileSystem::with_cwd("/proj");
        let plugin = plugin(Options::default(), &fs, Arc::new(RecordingCompiler::default()));

        let err = plugin.transform("", "/proj/src/a.ts").unwrap_err();
        assert_eq!(err.message, "Could not find TypeScript configuration for /proj/src/a.ts");
        assert_eq!(err.id, "/proj/src/a.ts");
        assert!(plugin.cache().is_empty());
    }

    #[test]
    fn missing_configuration_names_the_module_id_as_given() {
        let fs = MockFileSystem::with_cwd("/proj");
        let plugin = plugin(Options::default(), &fs, Arc::new(RecordingCompiler::default()));

        let err = plugin.transform("", "/proj/src/a.ts?v=1").unwrap_err();
        assert_eq!(
            err.message,
            "Could not find TypeScript configuration for /proj/src/a.ts?v=1"
        );
    }

    #[test]
    fn hash_in_a_directory_name_is_part_of_the_path() {
        let fs = project();
        fs.write_file("/proj/c#/tsconfig.json", r#"{ "compilerOptions": { "target": "es5" } }"#);
        let plugin = plugin(Options::default(), &fs, Arc::new(RecordingCompiler::default()));

        let output = plugin.transform("x", "/proj/c#/a.ts").unwrap().unwrap();

        assert!(output.code.starts_with("/* es5 */"), "{}", output.code);
        assert_eq!(fs.read_count("/proj/c#/tsconfig.json"), 1);
        assert_eq!(fs.read_count("/proj/tsconfig.json"), 0);
        assert!(plugin
            .cache()
            .contains(&ScopeKey::for_module(&AbsoluteFsPath::new("/proj/c#/a.ts"), None)));
    }

    #[test]
    fn compiler_failures_are_normalized() {
        let fs = project();
        let chain = || -> CompileFailure {
            make_diagnostic_chain("A".into(), Some(vec!["B".into()])).into()
        };
        let plugin = plugin(Options::default(), &fs, Arc::new(FailingCompiler(chain)));
        let err = plugin.transform("", "/proj/a.ts").unwrap_err();
        assert_eq!(err.message, format!("A{}  B", ts::NEW_LINE));

        let message = || -> CompileFailure { CompileFailure::Message("plain".into()) };
        let plugin = plugin_with(&fs, FailingCompiler(message));
        assert_eq!(plugin.transform("", "/proj/a.ts").unwrap_err().message, "plain");
    }

    fn plugin_with(fs: &MockFileSystem, compiler: FailingCompiler) -> TypeScriptTransform {
        plugin(Options::default(), fs, Arc::new(compiler))
    }

    #[test]
    fn exposes_host_hints() {
        let options = Options::from_value(json!({"apply": "serve", "enforce": "post"})).unwrap();
        let plugin = plugin(options, &project(), Arc::new(RecordingCompiler::default()));
        assert_eq!(plugin.name(), PLUGIN_NAME);
        assert_eq!(plugin.apply(), Some(Apply::Serve));
        assert_eq!(plugin.enforce(), Some(Enforce::Post));
    }
}

use std::path::Path;

use oxc_allocator::Allocator;
use oxc_codegen::{Codegen, CodegenOptions};
use oxc_parser::Parser;
use oxc_semantic::SemanticBuilder;
use oxc_span::SourceType;
use oxc_transformer::{ArrowFunctionsOptions, JsxRuntime, TransformOptions, Transformer};
use ts::{make_diagnostic_chain, CompilerOptions, DiagnosticMessageChain, JsxEmit, ScriptTarget};

use super::{CompiledModule, CompileFailure, Compiler};
use crate::file_system::strip_query;

/// Transpiles TypeScript with the oxc toolchain: parse, strip types and lower
/// syntax for the configured target, then print.
#[derive(Debug, Clone, Copy, Default)]
pub struct OxcCompiler;

impl OxcCompiler {
    pub fn new() -> Self {
        Self
    }
}

impl Compiler for OxcCompiler {
    fn compile(
        &self,
        source_text: &str,
        file_name: &str,
        options: &CompilerOptions,
    ) -> Result<CompiledModule, CompileFailure> {
        let file_path = Path::new(strip_query(file_name));
        let source_type = SourceType::from_path(file_path).unwrap_or_else(|_| SourceType::ts());
        let transform_options = transform_options(options)?;

        let allocator = Allocator::default();
        let parser = Parser::new(&allocator, source_text, source_type);
        let mut parse_result = parser.parse();
        if !parse_result.errors.is_empty() {
            return Err(failure(
                file_name,
                parse_result.errors.iter().map(ToString::to_string),
            ));
        }

        let semantic = SemanticBuilder::new()
            .with_excess_capacity(2.0)
            .build(&parse_result.program);

        let transformer = Transformer::new(&allocator, file_path, &transform_options);
        let transformed =
            transformer.build_with_scoping(semantic.semantic.into_scoping(), &mut parse_result.program);
        if !transformed.errors.is_empty() {
            return Err(failure(
                file_name,
                transformed.errors.iter().map(ToString::to_string),
            ));
        }

        let source_map_path = options
            .get_bool("sourceMap")
            .unwrap_or(false)
            .then(|| file_path.to_path_buf());
        let codegen = Codegen::new()
            .with_options(CodegenOptions {
                source_map_path,
                ..CodegenOptions::default()
            })
            .build(&parse_result.program);

        Ok(CompiledModule {
            code: codegen.code,
            map: codegen.map.map(|map| map.to_json_string()),
        })
    }
}

/// Map `tsc` compiler options onto oxc transform options.
fn transform_options(options: &CompilerOptions) -> Result<TransformOptions, CompileFailure> {
    // oxc has no ES5 engine target. ES5 (and ES3) start from the ES2015 baseline
    // with the ES2015 syntax lowering enabled on top.
    let target = options.target().unwrap_or(ScriptTarget::ES5);
    let engine_target = match target {
        ScriptTarget::ES3 | ScriptTarget::ES5 => "es2015",
        ScriptTarget::ES2023 | ScriptTarget::ES2024 => "es2022",
        other => other.as_str(),
    };
    let mut transform = TransformOptions::from_target(engine_target).map_err(|message| {
        CompileFailure::Message(format!("Unsupported target '{}': {}", target.as_str(), message))
    })?;
    if matches!(target, ScriptTarget::ES3 | ScriptTarget::ES5) {
        transform.env.es2015.arrow_function = Some(ArrowFunctionsOptions::default());
    }

    if options.get_bool("experimentalDecorators").unwrap_or(false) {
        transform.decorator.legacy = true;
        transform.decorator.emit_decorator_metadata =
            options.get_bool("emitDecoratorMetadata").unwrap_or(false);
    }

    if options.get_bool("verbatimModuleSyntax").unwrap_or(false) {
        transform.typescript.only_remove_type_imports = true;
    }

    match options.jsx() {
        Some(JsxEmit::Preserve) | Some(JsxEmit::ReactNative) => transform.jsx.jsx_plugin = false,
        Some(JsxEmit::ReactJSX) => transform.jsx.runtime = JsxRuntime::Automatic,
        Some(JsxEmit::ReactJSXDev) => {
            transform.jsx.runtime = JsxRuntime::Automatic;
            transform.jsx.development = true;
        }
        Some(JsxEmit::React) | None => transform.jsx.runtime = JsxRuntime::Classic,
    }
    if let Some(factory) = options.get_str("jsxFactory") {
        transform.jsx.pragma = Some(factory.to_string());
    }
    if let Some(fragment) = options.get_str("jsxFragmentFactory") {
        transform.jsx.pragma_frag = Some(fragment.to_string());
    }
    if let Some(import_source) = options.get_str("jsxImportSource") {
        transform.jsx.import_source = Some(import_source.to_string());
    }

    Ok(transform)
}

fn failure(file_name: &str, messages: impl Iterator<Item = String>) -> CompileFailure {
    let next: Vec<DiagnosticMessageChain> = messages.map(DiagnosticMessageChain::from).collect();
    CompileFailure::Diagnostic(make_diagnostic_chain(
        format!("Failed to compile {}", file_name),
        Some(next),
    ))
}

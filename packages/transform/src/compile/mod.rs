//! The compilation capability: source text in, target JavaScript out.

mod oxc;

use std::fmt;

use ts::{flatten_diagnostic_message_text, CompilerOptions, DiagnosticMessageChain, NEW_LINE};

pub use self::oxc::OxcCompiler;

/// Output of a successful compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledModule {
    pub code: String,
    /// Source map JSON, when the options ask for one.
    pub map: Option<String>,
}

/// A compiler failure, in whichever shape the backend produced it.
#[derive(Debug)]
pub enum CompileFailure {
    /// A bare message.
    Message(String),
    /// A structured error, possibly with a cause chain and backtrace.
    Error(anyhow::Error),
    /// A (possibly nested) diagnostic chain.
    Diagnostic(DiagnosticMessageChain),
}

impl fmt::Display for CompileFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileFailure::Message(message) => f.write_str(message),
            CompileFailure::Error(error) => write!(f, "{:#}", error),
            CompileFailure::Diagnostic(chain) => {
                f.write_str(&flatten_diagnostic_message_text(chain, NEW_LINE))
            }
        }
    }
}

impl From<anyhow::Error> for CompileFailure {
    fn from(error: anyhow::Error) -> Self {
        CompileFailure::Error(error)
    }
}

impl From<DiagnosticMessageChain> for CompileFailure {
    fn from(chain: DiagnosticMessageChain) -> Self {
        CompileFailure::Diagnostic(chain)
    }
}

/// Compiles one module. `file_name` selects the syntax (`.ts`, `.tsx`, `.mts`, ...).
pub trait Compiler: Send + Sync {
    fn compile(
        &self,
        source_text: &str,
        file_name: &str,
        options: &CompilerOptions,
    ) -> Result<CompiledModule, CompileFailure>;
}

//! TypeScript-compatible interfaces and types for the transform pipeline.
//! This crate serves as a shared compatibility layer.

use std::fmt;

pub mod compiler_options;

pub use compiler_options::*;

/// File name looked up when discovering a project configuration.
pub const CONFIG_FILE_NAME: &str = "tsconfig.json";

/// Line separator used when flattening diagnostics for display.
#[cfg(windows)]
pub const NEW_LINE: &str = "\r\n";
#[cfg(not(windows))]
pub const NEW_LINE: &str = "\n";

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ScriptTarget {
    ES3,
    ES5,
    ES2015,
    ES2016,
    ES2017,
    ES2018,
    ES2019,
    ES2020,
    ES2021,
    ES2022,
    ES2023,
    ES2024,
    ESNext,
}

impl ScriptTarget {
    /// Parses a `target` value the way `tsc` accepts it (case-insensitive, `es6` alias).
    pub fn parse(value: &str) -> Option<Self> {
        let target = match value.to_ascii_lowercase().as_str() {
            "es3" => Self::ES3,
            "es5" => Self::ES5,
            "es6" | "es2015" => Self::ES2015,
            "es2016" => Self::ES2016,
            "es2017" => Self::ES2017,
            "es2018" => Self::ES2018,
            "es2019" => Self::ES2019,
            "es2020" => Self::ES2020,
            "es2021" => Self::ES2021,
            "es2022" => Self::ES2022,
            "es2023" => Self::ES2023,
            "es2024" => Self::ES2024,
            "esnext" => Self::ESNext,
            _ => return None,
        };
        Some(target)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ES3 => "es3",
            Self::ES5 => "es5",
            Self::ES2015 => "es2015",
            Self::ES2016 => "es2016",
            Self::ES2017 => "es2017",
            Self::ES2018 => "es2018",
            Self::ES2019 => "es2019",
            Self::ES2020 => "es2020",
            Self::ES2021 => "es2021",
            Self::ES2022 => "es2022",
            Self::ES2023 => "es2023",
            Self::ES2024 => "es2024",
            Self::ESNext => "esnext",
        }
    }
}

impl fmt::Display for ScriptTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JsxEmit {
    Preserve,
    React,
    ReactNative,
    ReactJSX,
    ReactJSXDev,
}

impl JsxEmit {
    pub fn parse(value: &str) -> Option<Self> {
        let jsx = match value.to_ascii_lowercase().as_str() {
            "preserve" => Self::Preserve,
            "react" => Self::React,
            "react-native" => Self::ReactNative,
            "react-jsx" => Self::ReactJSX,
            "react-jsxdev" => Self::ReactJSXDev,
            _ => return None,
        };
        Some(jsx)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCategory {
    Warning,
    Error,
    Suggestion,
    Message,
}

// --- Diagnostic Structures ---

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticMessageChain {
    String(String),
    Chain {
        message_text: String,
        category: DiagnosticCategory,
        code: i32,
        next: Option<Vec<DiagnosticMessageChain>>,
    },
}

impl DiagnosticMessageChain {
    pub fn new(message: impl Into<String>) -> Self {
        Self::String(message.into())
    }

    pub fn message_text(&self) -> &str {
        match self {
            DiagnosticMessageChain::String(s) => s,
            DiagnosticMessageChain::Chain { message_text, .. } => message_text,
        }
    }
}

impl From<String> for DiagnosticMessageChain {
    fn from(s: String) -> Self {
        DiagnosticMessageChain::String(s)
    }
}

impl From<&str> for DiagnosticMessageChain {
    fn from(s: &str) -> Self {
        DiagnosticMessageChain::String(s.to_string())
    }
}

impl fmt::Display for DiagnosticMessageChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message_text())
    }
}

/// A diagnostic produced while reading or expanding a configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    pub code: i32,
    pub file: Option<String>,
    pub message_text: DiagnosticMessageChain,
}

impl Diagnostic {
    pub fn error(code: i32, message_text: impl Into<DiagnosticMessageChain>) -> Self {
        Self {
            category: DiagnosticCategory::Error,
            code,
            file: None,
            message_text: message_text.into(),
        }
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&flatten_diagnostic_message_text(&self.message_text, NEW_LINE))
    }
}

// --- Utilities ---

pub fn make_diagnostic_chain(
    message_text: String,
    next: Option<Vec<DiagnosticMessageChain>>,
) -> DiagnosticMessageChain {
    DiagnosticMessageChain::Chain {
        category: DiagnosticCategory::Message,
        code: 0,
        message_text,
        next,
    }
}

/// Renders a message chain as one string: each nested message goes on its own line,
/// indented two spaces per level of nesting.
pub fn flatten_diagnostic_message_text(chain: &DiagnosticMessageChain, new_line: &str) -> String {
    let mut result = String::new();
    flatten_into(chain, new_line, 0, &mut result);
    result
}

fn flatten_into(chain: &DiagnosticMessageChain, new_line: &str, indent: usize, out: &mut String) {
    if indent > 0 {
        out.push_str(new_line);
        for _ in 0..indent {
            out.push_str("  ");
        }
    }
    out.push_str(chain.message_text());

    if let DiagnosticMessageChain::Chain {
        next: Some(next), ..
    } = chain
    {
        for kid in next {
            flatten_into(kid, new_line, indent + 1, out);
        }
    }
}

use crate::{JsxEmit, ScriptTarget};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Options holding a single file-system path, resolved against the declaring config file.
pub const PATH_OPTIONS: &[&str] = &[
    "baseUrl",
    "declarationDir",
    "outDir",
    "outFile",
    "rootDir",
    "tsBuildInfoFile",
];

/// Options holding a list of file-system paths.
pub const PATH_LIST_OPTIONS: &[&str] = &["rootDirs", "typeRoots"];

/// Options whose string values are enumerations compared case-insensitively by `tsc`.
pub const ENUM_OPTIONS: &[&str] = &[
    "jsx",
    "module",
    "moduleDetection",
    "moduleResolution",
    "newLine",
    "target",
];

/// A flat compiler options mapping, keyed by the camelCase names used in `tsconfig.json`.
///
/// Key order follows the configuration files the options were read from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompilerOptions(Map<String, Value>);

impl CompilerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Applies `overrides` on top of these options. Every key present in `overrides`
    /// replaces the current value whatever its type; other keys are left alone.
    pub fn merge(&mut self, overrides: &Map<String, Value>) {
        for (key, value) in overrides {
            self.0.insert(key.clone(), value.clone());
        }
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.0.get(key).and_then(Value::as_bool)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn target(&self) -> Option<ScriptTarget> {
        self.get_str("target").and_then(ScriptTarget::parse)
    }

    pub fn jsx(&self) -> Option<JsxEmit> {
        self.get_str("jsx").and_then(JsxEmit::parse)
    }

    pub fn config_file_path(&self) -> Option<&str> {
        self.get_str("configFilePath")
    }
}

//! Expansion of a raw configuration into a flat set of compiler options.
//!
//! Follows `extends` chains, merges `compilerOptions` shallowly (the extending
//! file wins), resolves path-valued options against the directory of the file
//! that declared them and lowercases enumerated option values.

use serde::Deserialize;
use serde_json::{Map, Value};
use ts::{CompilerOptions, Diagnostic, CONFIG_FILE_NAME, ENUM_OPTIONS, PATH_LIST_OPTIONS, PATH_OPTIONS};

use super::reader::read_config_file;
use crate::file_system::{is_rooted, AbsoluteFsPath, ReadonlyFileSystem};

pub const OPTION_TYPE_MISMATCH: i32 = 5024;
pub const EXTENDS_NOT_FOUND: i32 = 6053;
pub const CIRCULAR_EXTENDS: i32 = 18000;

#[derive(Deserialize)]
struct PackageJson {
    tsconfig: Option<String>,
}

/// Expand `raw`, read from `location`, into fully resolved compiler options.
pub fn expand_config(
    fs: &dyn ReadonlyFileSystem,
    raw: &Map<String, Value>,
    location: &AbsoluteFsPath,
) -> Result<CompilerOptions, Diagnostic> {
    let mut stack = vec![location.clone()];
    let mut options = collect_options(fs, raw, location, &mut stack)?;
    options.insert(
        "configFilePath".to_string(),
        Value::String(location.to_string()),
    );
    Ok(CompilerOptions::from_map(options))
}

fn collect_options(
    fs: &dyn ReadonlyFileSystem,
    raw: &Map<String, Value>,
    location: &AbsoluteFsPath,
    stack: &mut Vec<AbsoluteFsPath>,
) -> Result<Map<String, Value>, Diagnostic> {
    let dir = location.dirname();
    let mut merged = Map::new();

    for specifier in extends_specifiers(raw, location)? {
        let base = resolve_extends(fs, &specifier, &dir).ok_or_else(|| {
            Diagnostic::error(EXTENDS_NOT_FOUND, format!("File '{}' not found.", specifier))
                .with_file(location.as_str())
        })?;

        if stack.contains(&base) {
            let chain = stack
                .iter()
                .chain(std::iter::once(&base))
                .map(AbsoluteFsPath::as_str)
                .collect::<Vec<_>>()
                .join(" -> ");
            return Err(Diagnostic::error(
                CIRCULAR_EXTENDS,
                format!("Circularity detected while resolving configuration: {}", chain),
            )
            .with_file(location.as_str()));
        }

        tracing::debug!(config = %location, extends = %base, "following extends");
        let base_raw = read_config_file(fs, &base)?;
        stack.push(base.clone());
        let base_options = collect_options(fs, &base_raw, &base, stack)?;
        stack.pop();

        for (key, value) in base_options {
            merged.insert(key, value);
        }
    }

    match raw.get("compilerOptions") {
        None | Some(Value::Null) => {}
        Some(Value::Object(own)) => {
            for (key, value) in own {
                merged.insert(key.clone(), normalize_option(key, value, &dir));
            }
        }
        Some(_) => {
            return Err(type_mismatch("compilerOptions", "object", location));
        }
    }

    Ok(merged)
}

fn extends_specifiers(
    raw: &Map<String, Value>,
    location: &AbsoluteFsPath,
) -> Result<Vec<String>, Diagnostic> {
    match raw.get("extends") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::String(specifier)) => Ok(vec![specifier.clone()]),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| type_mismatch("extends", "string", location))
            })
            .collect(),
        Some(_) => Err(type_mismatch("extends", "string or Array", location)),
    }
}

fn type_mismatch(option: &str, expected: &str, location: &AbsoluteFsPath) -> Diagnostic {
    Diagnostic::error(
        OPTION_TYPE_MISMATCH,
        format!("Compiler option '{}' requires a value of type {}.", option, expected),
    )
    .with_file(location.as_str())
}

fn normalize_option(key: &str, value: &Value, dir: &AbsoluteFsPath) -> Value {
    match value {
        Value::String(path) if PATH_OPTIONS.contains(&key) => {
            Value::String(AbsoluteFsPath::resolve(dir, path).into_string())
        }
        Value::Array(items) if PATH_LIST_OPTIONS.contains(&key) => Value::Array(
            items
                .iter()
                .map(|item| match item {
                    Value::String(path) => {
                        Value::String(AbsoluteFsPath::resolve(dir, path).into_string())
                    }
                    other => other.clone(),
                })
                .collect(),
        ),
        Value::String(name) if ENUM_OPTIONS.contains(&key) => Value::String(name.to_ascii_lowercase()),
        other => other.clone(),
    }
}

fn is_relative_specifier(specifier: &str) -> bool {
    specifier == "."
        || specifier == ".."
        || specifier.starts_with("./")
        || specifier.starts_with("../")
        || specifier.starts_with(".\\")
        || specifier.starts_with("..\\")
        || is_rooted(specifier)
}

/// Locate the file an `extends` specifier refers to.
pub fn resolve_extends(
    fs: &dyn ReadonlyFileSystem,
    specifier: &str,
    dir: &AbsoluteFsPath,
) -> Option<AbsoluteFsPath> {
    if is_relative_specifier(specifier) {
        let candidate = AbsoluteFsPath::resolve(dir, specifier);
        if fs.is_file(&candidate) {
            return Some(candidate);
        }
        if !specifier.ends_with(".json") {
            let with_extension = AbsoluteFsPath::new(format!("{}.json", candidate));
            if fs.is_file(&with_extension) {
                return Some(with_extension);
            }
        }
        return None;
    }

    dir.ancestors().find_map(|ancestor| {
        let package = ancestor.join("node_modules").join(specifier);
        resolve_package_config(fs, &package, specifier)
    })
}

fn resolve_package_config(
    fs: &dyn ReadonlyFileSystem,
    package: &AbsoluteFsPath,
    specifier: &str,
) -> Option<AbsoluteFsPath> {
    if fs.is_file(package) {
        return Some(package.clone());
    }
    if !specifier.ends_with(".json") {
        let with_extension = AbsoluteFsPath::new(format!("{}.json", package));
        if fs.is_file(&with_extension) {
            return Some(with_extension);
        }
    }

    let manifest = package.join("package.json");
    if fs.is_file(&manifest) {
        let declared = fs
            .read_file(&manifest)
            .ok()
            .and_then(|text| serde_json::from_str::<PackageJson>(&text).ok())
            .and_then(|package_json| package_json.tsconfig);
        if let Some(entry) = declared {
            let candidate = package.join(&entry);
            if fs.is_file(&candidate) {
                return Some(candidate);
            }
        }
    }

    let fallback = package.join(CONFIG_FILE_NAME);
    fs.is_file(&fallback).then_some(fallback)
}

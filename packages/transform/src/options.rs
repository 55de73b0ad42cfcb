//! Plugin options.
//!
//! Every key is optional; an empty object gives a plugin that transforms every
//! module with the nearest `tsconfig.json`.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use regex::Regex;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::error::OptionsError;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Options {
    /// Restrict the plugin to the dev server or to production builds.
    pub apply: Option<Apply>,
    /// Ordering hint relative to the host's core plugins.
    pub enforce: Option<Enforce>,
    #[serde(default)]
    pub filter: FilterOptions,
    #[serde(default)]
    pub tsconfig: TsconfigOptions,
}

impl Options {
    pub fn from_value(value: Value) -> Result<Self, OptionsError> {
        if value.is_null() {
            return Ok(Self::default());
        }
        serde_json::from_value(value).map_err(OptionsError::Invalid)
    }

    pub fn from_json_str(text: &str) -> Result<Self, OptionsError> {
        serde_json::from_str(text).map_err(OptionsError::Invalid)
    }

    pub fn load(path: &Path) -> Result<Self, OptionsError> {
        let text = std::fs::read_to_string(path).map_err(|source| OptionsError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Apply {
    Serve,
    Build,
}

impl Apply {
    pub fn as_str(&self) -> &'static str {
        match self {
            Apply::Serve => "serve",
            Apply::Build => "build",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Enforce {
    Pre,
    Post,
}

impl Enforce {
    pub fn as_str(&self) -> &'static str {
        match self {
            Enforce::Pre => "pre",
            Enforce::Post => "post",
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilterOptions {
    /// Predicate over the source text. Defaults to accepting everything.
    pub code: Option<CodeFilter>,
    #[serde(default)]
    pub files: FileFilterOptions,
}

/// Glob patterns over module ids. Relative patterns resolve against the working directory.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileFilterOptions {
    #[serde(default, deserialize_with = "one_or_many")]
    pub include: Vec<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub exclude: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TsconfigOptions {
    /// Use this configuration file for every module instead of discovering one.
    pub location: Option<String>,
    /// Compiler options applied on top of the resolved ones.
    #[serde(rename = "override")]
    pub override_options: Option<Map<String, Value>>,
}

/// Decides from the source text whether a module is transformed.
#[derive(Clone)]
pub enum CodeFilter {
    /// Matches when the regular expression finds a match anywhere in the text.
    Pattern(Regex),
    Predicate(Arc<dyn Fn(&str) -> bool + Send + Sync>),
}

impl CodeFilter {
    pub fn pattern(source: &str) -> Result<Self, regex::Error> {
        Regex::new(source).map(CodeFilter::Pattern)
    }

    pub fn predicate<F>(predicate: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        CodeFilter::Predicate(Arc::new(predicate))
    }

    pub fn matches(&self, code: &str) -> bool {
        match self {
            CodeFilter::Pattern(regex) => regex.is_match(code),
            CodeFilter::Predicate(predicate) => predicate(code),
        }
    }
}

impl fmt::Debug for CodeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodeFilter::Pattern(regex) => f.debug_tuple("Pattern").field(&regex.as_str()).finish(),
            CodeFilter::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

impl<'de> Deserialize<'de> for CodeFilter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let source = String::deserialize(deserializer)?;
        CodeFilter::pattern(&source).map_err(serde::de::Error::custom)
    }
}

fn one_or_many<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(pattern)) => vec![pattern],
        Some(OneOrMany::Many(patterns)) => patterns,
    })
}

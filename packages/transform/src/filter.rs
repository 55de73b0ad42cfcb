//! Filter Gate: decides per module whether the transform runs at all.

use glob::{MatchOptions, Pattern};

use crate::error::OptionsError;
use crate::file_system::{is_rooted, normalize_separators, AbsoluteFsPath};
use crate::options::{CodeFilter, FilterOptions};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Include/exclude glob predicate over module ids.
///
/// Exclusions win over inclusions. With no include patterns every id that is not
/// excluded passes. Virtual module ids (containing `\0`) never pass.
#[derive(Debug, Clone, Default)]
pub struct FileFilter {
    include: Vec<Pattern>,
    exclude: Vec<Pattern>,
}

impl FileFilter {
    /// Compile the patterns, resolving relative ones against `base`.
    pub fn new(
        include: &[String],
        exclude: &[String],
        base: &AbsoluteFsPath,
    ) -> Result<Self, OptionsError> {
        Ok(Self {
            include: compile_patterns(include, base)?,
            exclude: compile_patterns(exclude, base)?,
        })
    }

    pub fn matches(&self, id: &str) -> bool {
        if id.contains('\0') {
            return false;
        }
        let path_id = normalize_separators(id);

        if self
            .exclude
            .iter()
            .any(|pattern| pattern.matches_with(&path_id, MATCH_OPTIONS))
        {
            return false;
        }
        if self
            .include
            .iter()
            .any(|pattern| pattern.matches_with(&path_id, MATCH_OPTIONS))
        {
            return true;
        }
        self.include.is_empty()
    }
}

fn compile_patterns(patterns: &[String], base: &AbsoluteFsPath) -> Result<Vec<Pattern>, OptionsError> {
    patterns
        .iter()
        .map(|pattern| {
            let resolved = matcher_string(pattern, base);
            Pattern::new(&resolved).map_err(|source| OptionsError::InvalidPattern {
                pattern: pattern.clone(),
                source,
            })
        })
        .collect()
}

fn matcher_string(pattern: &str, base: &AbsoluteFsPath) -> String {
    if pattern.starts_with("**") || is_rooted(pattern) {
        normalize_separators(pattern)
    } else {
        base.join(pattern).into_string()
    }
}

/// Combines the file predicate and the code predicate; both must accept.
#[derive(Debug, Clone, Default)]
pub struct FilterGate {
    files: FileFilter,
    code: Option<CodeFilter>,
}

impl FilterGate {
    pub fn new(options: &FilterOptions, base: &AbsoluteFsPath) -> Result<Self, OptionsError> {
        Ok(Self {
            files: FileFilter::new(&options.files.include, &options.files.exclude, base)?,
            code: options.code.clone(),
        })
    }

    pub fn should_transform(&self, module_path: &str, code: &str) -> bool {
        self.files.matches(module_path)
            && self.code.as_ref().map_or(true, |filter| filter.matches(code))
    }
}

use std::io;
use std::path::Path;

use super::util::{clean_path, is_rooted};

/// A fully qualified path in the file system, in POSIX form.
///
/// Construction normalizes separators and collapses `.`/`..` lexically, so two
/// spellings of the same location compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AbsoluteFsPath(String);

impl AbsoluteFsPath {
    pub fn new(path: impl AsRef<str>) -> Self {
        AbsoluteFsPath(clean_path(path.as_ref()))
    }

    pub fn from<P: AsRef<Path>>(path: P) -> Self {
        Self::new(path.as_ref().to_string_lossy())
    }

    /// Resolve `path` against `base` unless it is already rooted, like `path.resolve(base, path)`.
    pub fn resolve(base: &AbsoluteFsPath, path: &str) -> Self {
        if is_rooted(path) {
            Self::new(path)
        } else {
            base.join(path)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_path(&self) -> &Path {
        Path::new(&self.0)
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_root(&self) -> bool {
        self.dirname() == *self
    }

    /// The containing directory. The root is its own parent.
    pub fn dirname(&self) -> AbsoluteFsPath {
        match self.0.rfind('/') {
            Some(index) => {
                let parent = &self.0[..index];
                if parent.is_empty() || parent.ends_with(':') {
                    AbsoluteFsPath(self.0[..=index].to_string())
                } else {
                    AbsoluteFsPath(parent.to_string())
                }
            }
            None => self.clone(),
        }
    }

    pub fn join(&self, segment: &str) -> AbsoluteFsPath {
        Self::new(format!("{}/{}", self.0, segment))
    }

    pub fn basename(&self) -> &str {
        match self.0.rfind('/') {
            Some(index) => &self.0[index + 1..],
            None => &self.0,
        }
    }

    /// Iterate this directory and each of its ancestors up to the root.
    pub fn ancestors(&self) -> impl Iterator<Item = AbsoluteFsPath> {
        let mut next = Some(self.clone());
        std::iter::from_fn(move || {
            let current = next.take()?;
            if !current.is_root() {
                next = Some(current.dirname());
            }
            Some(current)
        })
    }
}

impl AsRef<str> for AbsoluteFsPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl AsRef<Path> for AbsoluteFsPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.0)
    }
}

impl std::fmt::Display for AbsoluteFsPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// An abstraction over the read-only aspects of a file-system.
///
/// Implementations must be shareable across threads: one plugin instance serves
/// every module of a build.
pub trait ReadonlyFileSystem: Send + Sync {
    fn is_file(&self, path: &AbsoluteFsPath) -> bool;
    fn read_file(&self, path: &AbsoluteFsPath) -> io::Result<String>;
    /// Working directory that relative locations and glob patterns resolve against.
    fn pwd(&self) -> AbsoluteFsPath;
}

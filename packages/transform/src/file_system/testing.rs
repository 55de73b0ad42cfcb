//! In-memory file system for exercising the resolver without touching the disk.

use std::collections::HashMap;
use std::io;
use std::sync::Arc;

use parking_lot::Mutex;

use super::types::{AbsoluteFsPath, ReadonlyFileSystem};

#[derive(Default)]
struct State {
    files: HashMap<AbsoluteFsPath, String>,
    reads: HashMap<AbsoluteFsPath, usize>,
}

/// An in-memory [`ReadonlyFileSystem`] that counts reads per path.
///
/// Clones share the same tree, so a test can keep a handle after giving one to a plugin.
#[derive(Clone)]
pub struct MockFileSystem {
    cwd: AbsoluteFsPath,
    state: Arc<Mutex<State>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::with_cwd("/")
    }

    pub fn with_cwd(cwd: &str) -> Self {
        MockFileSystem {
            cwd: AbsoluteFsPath::new(cwd),
            state: Arc::new(Mutex::new(State::default())),
        }
    }

    pub fn init_with_files(&self, files: Vec<(&str, &str)>) {
        for (path, content) in files {
            self.write_file(path, content);
        }
    }

    pub fn write_file(&self, path: &str, content: &str) {
        self.state
            .lock()
            .files
            .insert(AbsoluteFsPath::new(path), content.to_string());
    }

    /// Number of times `path` has been read.
    pub fn read_count(&self, path: &str) -> usize {
        self.state
            .lock()
            .reads
            .get(&AbsoluteFsPath::new(path))
            .copied()
            .unwrap_or(0)
    }

    /// Total number of reads across all paths.
    pub fn total_reads(&self) -> usize {
        self.state.lock().reads.values().sum()
    }
}

impl Default for MockFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadonlyFileSystem for MockFileSystem {
    fn is_file(&self, path: &AbsoluteFsPath) -> bool {
        self.state.lock().files.contains_key(path)
    }

    fn read_file(&self, path: &AbsoluteFsPath) -> io::Result<String> {
        let mut state = self.state.lock();
        *state.reads.entry(path.clone()).or_insert(0) += 1;
        state.files.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("ENOENT: no such file or directory, open '{}'", path),
            )
        })
    }

    fn pwd(&self) -> AbsoluteFsPath {
        self.cwd.clone()
    }
}

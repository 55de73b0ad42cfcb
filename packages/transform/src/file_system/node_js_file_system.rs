use std::fs;
use std::io;
use std::path::PathBuf;

use super::types::{AbsoluteFsPath, ReadonlyFileSystem};

/// A [`ReadonlyFileSystem`] backed by the real disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeJSFileSystem;

impl NodeJSFileSystem {
    pub fn new() -> Self {
        Self
    }
}

impl ReadonlyFileSystem for NodeJSFileSystem {
    fn is_file(&self, path: &AbsoluteFsPath) -> bool {
        path.as_path().is_file()
    }

    fn read_file(&self, path: &AbsoluteFsPath) -> io::Result<String> {
        fs::read_to_string(path.as_path())
    }

    fn pwd(&self) -> AbsoluteFsPath {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));
        AbsoluteFsPath::from(cwd)
    }
}

//! File System Abstraction
//!
//! The resolver only needs read access and lexical path handling, so the seam is
//! narrow: [`ReadonlyFileSystem`] plus the [`AbsoluteFsPath`] newtype.

pub mod node_js_file_system;
pub mod testing;
pub mod types;
pub mod util;

pub use node_js_file_system::*;
pub use types::*;
pub use util::*;

use ts::CONFIG_FILE_NAME;

use crate::file_system::{AbsoluteFsPath, ReadonlyFileSystem};

/// Find the nearest `tsconfig.json`, starting in `search_dir` and walking up to the root.
pub fn find_config_file(
    fs: &dyn ReadonlyFileSystem,
    search_dir: &AbsoluteFsPath,
) -> Option<AbsoluteFsPath> {
    search_dir
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|candidate| fs.is_file(candidate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_system::testing::MockFileSystem;

    #[test]
    fn finds_the_nearest_ancestor_config() {
        let fs = MockFileSystem::new();
        fs.init_with_files(vec![
            ("/proj/tsconfig.json", "{}"),
            ("/proj/src/tsconfig.json", "{}"),
            ("/proj/src/a/x.ts", ""),
        ]);

        let found = find_config_file(&fs, &AbsoluteFsPath::new("/proj/src/a"));
        assert_eq!(found, Some(AbsoluteFsPath::new("/proj/src/tsconfig.json")));

        let found = find_config_file(&fs, &AbsoluteFsPath::new("/proj/lib"));
        assert_eq!(found, Some(AbsoluteFsPath::new("/proj/tsconfig.json")));
    }

    #[test]
    fn returns_none_without_a_config() {
        let fs = MockFileSystem::new();
        fs.init_with_files(vec![("/proj/src/x.ts", "")]);
        assert_eq!(find_config_file(&fs, &AbsoluteFsPath::new("/proj/src")), None);
    }

    #[test]
    fn ignores_directories_named_like_configs() {
        let fs = MockFileSystem::new();
        fs.init_with_files(vec![
            ("/proj/src/tsconfig.json/inner.txt", ""),
            ("/proj/tsconfig.json", "{}"),
        ]);
        let found = find_config_file(&fs, &AbsoluteFsPath::new("/proj/src"));
        assert_eq!(found, Some(AbsoluteFsPath::new("/proj/tsconfig.json")));
    }
}

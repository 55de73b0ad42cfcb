/// Convert Windows-style separators to POSIX separators.
pub fn normalize_separators(path: &str) -> String {
    path.replace('\\', "/")
}

/// Lexically normalize a path: POSIX separators, no `.` segments, `..` collapsed
/// against preceding segments. Never touches the disk.
pub fn clean_path(path: &str) -> String {
    let normalized = normalize_separators(path);

    // Check for Windows-style absolute path (e.g., C:/, D:\)
    let is_windows_absolute = normalized.len() >= 2 && normalized.as_bytes()[1] == b':';
    let is_unix_absolute = normalized.starts_with('/');

    let (drive_prefix, path_part) = if is_windows_absolute {
        normalized.split_at(2)
    } else {
        ("", normalized.as_str())
    };

    let mut segments: Vec<&str> = Vec::new();
    for segment in path_part.split('/') {
        match segment {
            "" | "." => continue,
            ".." => {
                if matches!(segments.last(), Some(last) if *last != "..") {
                    segments.pop();
                } else if !is_windows_absolute && !is_unix_absolute {
                    segments.push("..");
                }
            }
            _ => segments.push(segment),
        }
    }

    let joined = segments.join("/");

    if is_windows_absolute {
        format!("{}/{}", drive_prefix, joined)
    } else if is_unix_absolute {
        format!("/{}", joined)
    } else if joined.is_empty() {
        ".".to_string()
    } else {
        joined
    }
}

/// Whether `path` is absolute in either POSIX or Windows form.
pub fn is_rooted(path: &str) -> bool {
    let bytes = path.as_bytes();
    path.starts_with('/')
        || path.starts_with('\\')
        || (bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':')
}

/// Drop a bundler query (`?v=123`) from a module id. `#` is a valid path character
/// and is kept.
pub fn strip_query(id: &str) -> &str {
    match id.find('?') {
        Some(index) => &id[..index],
        None => id,
    }
}

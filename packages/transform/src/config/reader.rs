//! Reading `tsconfig.json` files.
//!
//! Configuration files are JSON with comments: `//` and `/* */` comments and
//! trailing commas are accepted, like `tsc` does.

use serde_json::{Map, Value};
use ts::Diagnostic;

use crate::file_system::{AbsoluteFsPath, ReadonlyFileSystem};

pub const CANNOT_READ_FILE: i32 = 5083;
pub const SYNTAX_ERROR: i32 = 1005;
pub const ROOT_MUST_BE_OBJECT: i32 = 5092;

/// Read and parse a configuration file into its raw JSON object.
pub fn read_config_file(
    fs: &dyn ReadonlyFileSystem,
    location: &AbsoluteFsPath,
) -> Result<Map<String, Value>, Diagnostic> {
    let text = fs.read_file(location).map_err(|e| {
        tracing::debug!(location = %location, error = %e, "failed to read configuration file");
        Diagnostic::error(CANNOT_READ_FILE, format!("Cannot read file '{}'.", location))
            .with_file(location.as_str())
    })?;
    parse_config_file_text(&text, location)
}

/// Parse configuration text. `location` is only used for diagnostics.
pub fn parse_config_file_text(
    text: &str,
    location: &AbsoluteFsPath,
) -> Result<Map<String, Value>, Diagnostic> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let json = strip_trailing_commas(&strip_json_comments(text));
    if json.trim().is_empty() {
        return Ok(Map::new());
    }

    match serde_json::from_str::<Value>(&json) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(Diagnostic::error(
            ROOT_MUST_BE_OBJECT,
            format!(
                "The root value of a '{}' file must be an object.",
                location.basename()
            ),
        )
        .with_file(location.as_str())),
        Err(e) => Err(Diagnostic::error(SYNTAX_ERROR, e.to_string()).with_file(location.as_str())),
    }
}

/// Replace comments with whitespace, leaving string literals untouched.
///
/// Newlines inside block comments are kept so that line numbers in parse errors
/// still point at the original text.
pub fn strip_json_comments(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            result.push(c);
            match c {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        result.push(escaped);
                    }
                }
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match (c, chars.peek()) {
            ('"', _) => {
                in_string = true;
                result.push(c);
            }
            ('/', Some('/')) => {
                chars.next();
                result.push_str("  ");
                while let Some(&next) = chars.peek() {
                    if next == '\n' {
                        break;
                    }
                    chars.next();
                    result.push(' ');
                }
            }
            ('/', Some('*')) => {
                chars.next();
                result.push_str("  ");
                let mut previous = '\0';
                for next in chars.by_ref() {
                    if previous == '*' && next == '/' {
                        result.push(' ');
                        break;
                    }
                    result.push(if next == '\n' { '\n' } else { ' ' });
                    previous = next;
                }
            }
            _ => result.push(c),
        }
    }

    result
}

/// Remove commas that directly precede a closing `}` or `]`.
pub fn strip_trailing_commas(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut result = String::with_capacity(input.len());
    let mut in_string = false;
    let mut index = 0;

    while index < chars.len() {
        let c = chars[index];
        if in_string {
            result.push(c);
            if c == '\\' {
                if let Some(&escaped) = chars.get(index + 1) {
                    result.push(escaped);
                    index += 1;
                }
            } else if c == '"' {
                in_string = false;
            }
        } else if c == '"' {
            in_string = true;
            result.push(c);
        } else if c == ',' {
            let closes = chars[index + 1..]
                .iter()
                .find(|next| !next.is_whitespace())
                .map_or(false, |next| *next == '}' || *next == ']');
            result.push(if closes { ' ' } else { ',' });
        } else {
            result.push(c);
        }
        index += 1;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_system::testing::MockFileSystem;
    use serde_json::json;

    fn location() -> AbsoluteFsPath {
        AbsoluteFsPath::new("/proj/tsconfig.json")
    }

    #[test]
    fn accepts_comments_and_trailing_commas() {
        let text = r#"{
            // target for old browsers
            "compilerOptions": {
                /* lowered */ "target": "es5",
                "paths": { "@/*": ["src/*"], },
            },
        }"#;
        let config = parse_config_file_text(text, &location()).unwrap();
        assert_eq!(config["compilerOptions"]["target"], json!("es5"));
        assert_eq!(config["compilerOptions"]["paths"]["@/*"], json!(["src/*"]));
    }

    #[test]
    fn keeps_comment_markers_inside_strings() {
        let text = r#"{ "compilerOptions": { "baseUrl": "http://x/*y*/", "outDir": "a,]" } }"#;
        let config = parse_config_file_text(text, &location()).unwrap();
        assert_eq!(config["compilerOptions"]["baseUrl"], json!("http://x/*y*/"));
        assert_eq!(config["compilerOptions"]["outDir"], json!("a,]"));
    }

    #[test]
    fn empty_file_is_an_empty_config() {
        let config = parse_config_file_text("\u{feff}  \n", &location()).unwrap();
        assert!(config.is_empty());
    }

    #[test]
    fn comment_only_file_is_an_empty_config() {
        let config = parse_config_file_text("// nothing\n/* here\n either */\n", &location()).unwrap();
        assert!(config.is_empty());
    }

    #[test]
    fn reports_syntax_errors_with_position() {
        let err = parse_config_file_text("{\n  \"compilerOptions\": {\n    \"target\" \"es5\"\n  }\n}", &location())
            .unwrap_err();
        assert_eq!(err.code, SYNTAX_ERROR);
        assert!(err.message_text.message_text().contains("line 3"));
        assert_eq!(err.file.as_deref(), Some("/proj/tsconfig.json"));
    }

    #[test]
    fn rejects_non_object_roots() {
        let err = parse_config_file_text("[1, 2]", &location()).unwrap_err();
        assert_eq!(err.code, ROOT_MUST_BE_OBJECT);
    }

    #[test]
    fn missing_file_cannot_be_read() {
        let fs = MockFileSystem::new();
        let err = read_config_file(&fs, &location()).unwrap_err();
        assert_eq!(err.code, CANNOT_READ_FILE);
        assert_eq!(
            err.message_text.message_text(),
            "Cannot read file '/proj/tsconfig.json'."
        );
    }
}

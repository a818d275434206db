//! Minimal dotenv reader.
//!
//! Supports the subset the generated templates use:
//! - `KEY=value` pairs, one per line
//! - blank lines and `#` comments
//! - an optional leading `export `
//! - single-quoted (literal) and double-quoted (`\n`, `\"`, `\\` escapes) values
//! - trailing ` # comment` on unquoted values

use super::merge::EnvMap;
use crate::error::{Error, Result};
use std::path::Path;
use tracing::debug;

/// Parse dotenv content into a key/value map.
///
/// Later duplicates of a key win, matching how the file would read top to bottom.
pub fn parse(content: &str) -> EnvMap {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut vars = EnvMap::new();

    for (index, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").map(str::trim_start).unwrap_or(line);

        let Some((key, value)) = line.split_once('=') else {
            debug!(line = index + 1, "Skipping dotenv line without '='");
            continue;
        };
        let key = key.trim();
        if key.is_empty() || key.contains(char::is_whitespace) {
            debug!(line = index + 1, "Skipping dotenv line with invalid key");
            continue;
        }

        vars.insert(key.to_string(), parse_value(value.trim()));
    }

    vars
}

/// Read and parse a dotenv file.
///
/// Returns `Ok(None)` when the file does not exist; any other read failure
/// is an error.
pub fn read(path: &Path) -> Result<Option<EnvMap>> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(parse(&content))),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(Error::io(path, err)),
    }
}

fn parse_value(value: &str) -> String {
    if let Some(inner) = quoted(value, '\'') {
        return inner.to_string();
    }
    if let Some(inner) = quoted(value, '"') {
        return unescape(inner);
    }
    match value.find(" #") {
        Some(pos) => value[..pos].trim_end().to_string(),
        None => value.to_string(),
    }
}

/// Return the text between a leading quote and its closing match.
fn quoted(value: &str, quote: char) -> Option<&str> {
    let rest = value.strip_prefix(quote)?;
    let end = if quote == '"' {
        // Skip escaped quotes when looking for the terminator.
        let mut escaped = false;
        rest.char_indices().find_map(|(i, c)| match c {
            '\\' if !escaped => {
                escaped = true;
                None
            }
            c if c == quote && !escaped => Some(i),
            _ => {
                escaped = false;
                None
            }
        })?
    } else {
        rest.find(quote)?
    };
    Some(&rest[..end])
}

fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_basic_pairs_and_comments() {
        let vars = parse(
            "# header\n\nDB_TYPE=sqlite\n  POSTGRES_PORT = 5432  \n# POSTGRES_HOST=prod\n",
        );
        assert_eq!(vars.len(), 2);
        assert_eq!(vars["DB_TYPE"], "sqlite");
        assert_eq!(vars["POSTGRES_PORT"], "5432");
        assert!(!vars.contains_key("POSTGRES_HOST"));
    }

    #[test]
    fn test_parse_quotes_and_inline_comments() {
        let vars = parse(concat!(
            "A=\"hello world\"\n",
            "B='literal \\n stays'\n",
            "C=\"line\\nbreak \\\"quoted\\\"\"\n",
            "D=value # trailing comment\n",
            "E=abc#def\n",
            "export F=exported\n",
        ));
        assert_eq!(vars["A"], "hello world");
        assert_eq!(vars["B"], "literal \\n stays");
        assert_eq!(vars["C"], "line\nbreak \"quoted\"");
        assert_eq!(vars["D"], "value");
        assert_eq!(vars["E"], "abc#def");
        assert_eq!(vars["F"], "exported");
    }

    #[test]
    fn test_parse_empty_value_and_garbage() {
        let vars = parse("POSTGRES_PASSWORD=\nnot a pair\n=novalue\nBAD KEY=x\n");
        assert_eq!(vars.len(), 1);
        assert_eq!(vars["POSTGRES_PASSWORD"], "");
    }

    #[test]
    fn test_later_duplicate_wins() {
        let vars = parse("LOG_LEVEL=INFO\nLOG_LEVEL=DEBUG\n");
        assert_eq!(vars["LOG_LEVEL"], "DEBUG");
    }

    #[test]
    fn test_read_missing_file_is_none() {
        let temp = TempDir::new().unwrap();
        assert!(read(&temp.path().join(".env.local")).unwrap().is_none());
    }

    #[test]
    fn test_read_existing_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".env.defaults");
        std::fs::write(&path, "\u{feff}DB_TYPE=postgresql\n").unwrap();
        let vars = read(&path).unwrap().unwrap();
        assert_eq!(vars["DB_TYPE"], "postgresql");
    }
}

use once_cell::sync::Lazy;
use std::fs::{File, OpenOptions};
use std::io::ErrorKind;
use std::path::Path;

use crate::regex::Regex;
use crate::{ConvertError, Result};

static HEADER_ILLEGAL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\[\]<>_]").unwrap()
});

/// Removes the characters the scores header format cannot carry: `[`, `]`, `<`, `>` and `_`.
pub fn sanitize_header(name: &str) -> String {
    HEADER_ILLEGAL_REGEX.replace_all(name, "").into_owned()
}

/// Parses a year from the leading ASCII digits of a cell
///
/// # Arguments
///
/// * `value` - The raw year cell, e.g. `"2023"` or `"2023/12/25"`
pub fn parse_year(value: &str) -> Option<i64> {
    let value = value.trim();
    let end = value
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(value.len());
    value[..end].parse().ok()
}

/// Creates `path` for writing, failing if anything already exists there.
///
/// The existence check and the creation are a single atomic operation, so an
/// existing file is never truncated.
pub fn create_new_file(path: &Path) -> Result<File> {
    OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| match e.kind() {
            ErrorKind::AlreadyExists => ConvertError::OutputAlreadyExists(path.to_path_buf()),
            _ => ConvertError::io(path, e),
        })
}

/// Fails with [`ConvertError::OutputAlreadyExists`] if `path` exists.
pub fn ensure_absent(path: &Path) -> Result<()> {
    if path.exists() {
        return Err(ConvertError::OutputAlreadyExists(path.to_path_buf()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_header() {
        assert_eq!(sanitize_header("a_b<c>d[e]"), "abcde");
        assert_eq!(sanitize_header("nature"), "nature");
        assert_eq!(sanitize_header("n/a"), "n/a");
        assert_eq!(sanitize_header("___"), "");
    }

    #[test]
    fn test_parse_year() {
        assert_eq!(parse_year("2023"), Some(2023));
        assert_eq!(parse_year(" 1998 "), Some(1998));
        assert_eq!(parse_year("2023/12/25/Christmas edition"), Some(2023));
        assert_eq!(parse_year("1998///"), Some(1998));
        assert_eq!(parse_year("forthcoming"), None);
        assert_eq!(parse_year(""), None);
    }

    #[test]
    fn test_create_new_file_refuses_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        create_new_file(&path).unwrap();
        let result = create_new_file(&path);
        assert!(matches!(result, Err(ConvertError::OutputAlreadyExists(p)) if p == path));
        assert!(matches!(ensure_absent(&path), Err(ConvertError::OutputAlreadyExists(_))));
    }
}

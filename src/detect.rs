//! Best-effort guess of the export format of an input file.
//!
//! Detection looks at the file extension first and only reads the file when
//! the extension is ambiguous (`.txt` is used both by Web of Science and by
//! RIS/EndNote exports). It is a convenience default, not a validation step:
//! a wrong guess surfaces later as a decode or missing-column error.
//!
//! # Example
//!
//! ```
//! use refscores::detect::detect_schema;
//! use refscores::SchemaId;
//!
//! // Spreadsheet exports resolve without reading the file.
//! assert_eq!(detect_schema("ProQuestDocuments.xls").unwrap(), SchemaId::Proquest);
//! ```

use std::fs;
use std::path::Path;
use tracing::debug;

use crate::encoding::{decode_utf8, decode_utf16le};
use crate::ris::TagConvention;
use crate::sheet::SPREADSHEET_EXTENSIONS;
use crate::{ConvertError, Result, SchemaId};

const DELIMITED_EXTENSIONS: &[&str] = &["csv", "tsv"];
const TAGGED_EXTENSIONS: &[&str] = &["txt", "ris", "enw"];

/// Guesses the schema of the export at `path`.
///
/// # Errors
///
/// Returns [`ConvertError::FormatDetection`] if no rule matches, or if the
/// file cannot be read or decoded as UTF-8.
pub fn detect_schema(path: impl AsRef<Path>) -> Result<SchemaId> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    let schema = if SPREADSHEET_EXTENSIONS.contains(&extension.as_str()) {
        SchemaId::Proquest
    } else if DELIMITED_EXTENSIONS.contains(&extension.as_str()) {
        SchemaId::Scopus
    } else if TAGGED_EXTENSIONS.contains(&extension.as_str()) {
        let bytes = fs::read(path).map_err(|e| detection_error(path, e.to_string()))?;
        sniff_tagged(&bytes).map_err(|reason| detection_error(path, reason))?
    } else {
        return Err(detection_error(
            path,
            format!("unsupported file extension '{extension}'"),
        ));
    };

    debug!(path = %path.display(), %schema, "detected export format");
    Ok(schema)
}

/// Distinguishes a Web of Science UTF-16 export from RIS/EndNote text.
fn sniff_tagged(bytes: &[u8]) -> std::result::Result<SchemaId, String> {
    // A UTF-8 file may not be valid UTF-16; that only rules out Web of Science.
    if let Some(text) = decode_utf16le(bytes) {
        if first_line(&text).starts_with("PT") {
            return Ok(SchemaId::Wos);
        }
    }

    let text = decode_utf8(bytes).ok_or_else(|| "content is neither UTF-16LE nor UTF-8".to_string())?;
    match TagConvention::sniff(&text) {
        Ok(_) => Ok(SchemaId::Ris),
        Err(line) => Err(format!("unrecognised leading line '{line}'")),
    }
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or_default()
}

fn detection_error(path: &Path, reason: String) -> ConvertError {
    ConvertError::FormatDetection {
        path: path.to_path_buf(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::encode_utf16le_with_bom;
    use rstest::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, bytes: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, bytes).unwrap();
        path
    }

    #[rstest]
    #[case("export.xls")]
    #[case("export.XLSX")]
    #[case("missing/dir/export.ods")]
    fn test_spreadsheet_is_proquest(#[case] name: &str) {
        assert_eq!(detect_schema(name).unwrap(), SchemaId::Proquest);
    }

    #[test]
    fn test_spreadsheet_ignores_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "records.xls", b"TY  - JOUR\nTI  - Foo\n");
        assert_eq!(detect_schema(path).unwrap(), SchemaId::Proquest);
    }

    #[test]
    fn test_csv_is_scopus() {
        assert_eq!(detect_schema("scopus.csv").unwrap(), SchemaId::Scopus);
    }

    #[test]
    fn test_utf16_pt_header_is_wos() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            "savedrecs.txt",
            &encode_utf16le_with_bom("PT\tAU\tTI\tAB\tSO\tPY\nJ\tSmith\tFoo\tBar\tNature\t2020\n"),
        );
        assert_eq!(detect_schema(path).unwrap(), SchemaId::Wos);
    }

    #[rstest]
    #[case("refs.ris", b"TY  - JOUR\nTI  - Foo\n".as_slice())]
    #[case("refs.txt", b"\xEF\xBB\xBF%0 Journal Article\n%T Foo\n".as_slice())]
    #[case("refs.enw", b"\n%0 Book\n%T Foo\n".as_slice())]
    fn test_tagged_text_is_ris(#[case] name: &str, #[case] content: &[u8]) {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, name, content);
        assert_eq!(detect_schema(path).unwrap(), SchemaId::Ris);
    }

    #[test]
    fn test_unrecognised_text_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "notes.txt", b"Just some notes\n");
        assert!(matches!(
            detect_schema(path),
            Err(ConvertError::FormatDetection { .. })
        ));
    }

    #[test]
    fn test_unknown_extension_fails() {
        assert!(matches!(
            detect_schema("records.json"),
            Err(ConvertError::FormatDetection { .. })
        ));
    }

    #[test]
    fn test_unreadable_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.ris");
        assert!(matches!(
            detect_schema(path),
            Err(ConvertError::FormatDetection { .. })
        ));
    }
}

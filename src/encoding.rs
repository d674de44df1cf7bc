//! Byte-to-text decoding for the encodings the export formats use.

use encoding_rs::{UTF_8, UTF_16LE};
use std::path::Path;

use crate::schema::TextEncoding;
use crate::{ConvertError, Result};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";
const UTF16LE_BOM: &[u8] = b"\xFF\xFE";

/// Decodes `bytes` strictly, removing a leading byte-order mark if present.
pub(crate) fn decode(bytes: &[u8], encoding: TextEncoding, path: &Path) -> Result<String> {
    let decoded = match encoding {
        TextEncoding::Utf8 | TextEncoding::PlatformDefault => decode_utf8(bytes),
        TextEncoding::Utf16Le => decode_utf16le(bytes),
    };
    decoded.ok_or_else(|| ConvertError::FileDecode {
        path: path.to_path_buf(),
        encoding: encoding.label(),
    })
}

/// Strict UTF-8 decoding; `None` on malformed input.
pub(crate) fn decode_utf8(bytes: &[u8]) -> Option<String> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    UTF_8
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|text| text.into_owned())
}

/// Strict UTF-16LE decoding; `None` on odd length or unpaired surrogates.
pub(crate) fn decode_utf16le(bytes: &[u8]) -> Option<String> {
    let bytes = bytes.strip_prefix(UTF16LE_BOM).unwrap_or(bytes);
    UTF_16LE
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|text| text.trim_start_matches('\u{feff}').to_string())
}

/// Encodes text as UTF-16LE with a byte-order mark, the way Web of Science writes exports.
#[cfg(test)]
pub(crate) fn encode_utf16le_with_bom(text: &str) -> Vec<u8> {
    let mut bytes = UTF16LE_BOM.to_vec();
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }
    bytes
}

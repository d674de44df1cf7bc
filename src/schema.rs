//! Static registry of the supported citation database export layouts.
//!
//! Each [`SchemaEntry`] describes how one database writes its exports: the
//! column delimiter, the text encoding, the quoting style and the raw column
//! (or tag) name behind each logical [`FieldRole`].
//!
//! # Example
//!
//! ```
//! use refscores::schema::{lookup, resolve_field, FieldRole, SchemaId};
//!
//! let scopus = lookup("scopus").unwrap();
//! assert_eq!(scopus.delimiter, Some(b','));
//! assert_eq!(resolve_field(SchemaId::Wos, FieldRole::Source).unwrap(), "SO");
//! assert!(resolve_field(SchemaId::Ris, FieldRole::Publisher).is_err());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{ConvertError, Result};

/// Identifier of a supported citation database export format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaId {
    /// Web of Science tab-delimited export
    Wos,
    /// Scopus CSV export
    Scopus,
    /// ProQuest export
    Proquest,
    /// RIS or EndNote tagged text
    Ris,
}

impl SchemaId {
    /// All identifiers, in registry order.
    pub const ALL: [SchemaId; 4] = [
        SchemaId::Wos,
        SchemaId::Scopus,
        SchemaId::Proquest,
        SchemaId::Ris,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaId::Wos => "wos",
            SchemaId::Scopus => "scopus",
            SchemaId::Proquest => "proquest",
            SchemaId::Ris => "ris",
        }
    }

    /// Returns the registry entry for this identifier.
    pub fn entry(self) -> &'static SchemaEntry {
        match self {
            SchemaId::Wos => &SCHEMAS[0],
            SchemaId::Scopus => &SCHEMAS[1],
            SchemaId::Proquest => &SCHEMAS[2],
            SchemaId::Ris => &SCHEMAS[3],
        }
    }
}

impl fmt::Display for SchemaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemaId {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "wos" => Ok(SchemaId::Wos),
            "scopus" => Ok(SchemaId::Scopus),
            "proquest" => Ok(SchemaId::Proquest),
            "ris" => Ok(SchemaId::Ris),
            _ => Err(ConvertError::UnknownSchema(s.to_string())),
        }
    }
}

/// Logical role of a bibliographic field, independent of any export format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldRole {
    #[serde(alias = "ti")]
    Title,
    #[serde(alias = "ab")]
    Abstract,
    #[serde(alias = "so")]
    Source,
    #[serde(alias = "py")]
    Year,
    #[serde(alias = "pu")]
    Publisher,
    #[serde(alias = "ty")]
    Type,
}

impl FieldRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldRole::Title => "title",
            FieldRole::Abstract => "abstract",
            FieldRole::Source => "source",
            FieldRole::Year => "year",
            FieldRole::Publisher => "publisher",
            FieldRole::Type => "type",
        }
    }
}

impl fmt::Display for FieldRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldRole {
    type Err = ConvertError;

    /// Accepts both the long names and the two-letter codes (`so`, `py`, `pu`, ...).
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "title" | "ti" => Ok(FieldRole::Title),
            "abstract" | "ab" => Ok(FieldRole::Abstract),
            "source" | "so" => Ok(FieldRole::Source),
            "year" | "py" => Ok(FieldRole::Year),
            "publisher" | "pu" => Ok(FieldRole::Publisher),
            "type" | "ty" => Ok(FieldRole::Type),
            _ => Err(ConvertError::UnknownScoringField(s.to_string())),
        }
    }
}

/// Text encoding used by an export format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    /// UTF-8, with or without a byte-order mark
    Utf8,
    /// UTF-16 little-endian
    Utf16Le,
    /// Whatever the exporting platform wrote; read as UTF-8
    PlatformDefault,
}

impl TextEncoding {
    pub fn label(&self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "UTF-8",
            TextEncoding::Utf16Le => "UTF-16LE",
            TextEncoding::PlatformDefault => "platform default (UTF-8)",
        }
    }
}

/// Quoting convention of a delimited export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotingMode {
    /// Quote characters are literal data
    None,
    /// Every field may be wrapped in double quotes
    All,
}

/// Raw column or tag names behind each logical field role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMap {
    pub title: &'static str,
    pub abstract_text: &'static str,
    pub source: Option<&'static str>,
    pub year: Option<&'static str>,
    pub publisher: Option<&'static str>,
    pub kind: Option<&'static str>,
}

impl FieldMap {
    pub fn get(&self, role: FieldRole) -> Option<&'static str> {
        match role {
            FieldRole::Title => Some(self.title),
            FieldRole::Abstract => Some(self.abstract_text),
            FieldRole::Source => self.source,
            FieldRole::Year => self.year,
            FieldRole::Publisher => self.publisher,
            FieldRole::Type => self.kind,
        }
    }
}

/// Parsing rules for one citation database export format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaEntry {
    pub id: SchemaId,
    /// Column delimiter; `None` for tagged (non-tabular) formats
    pub delimiter: Option<u8>,
    pub encoding: TextEncoding,
    pub quoting: QuotingMode,
    pub fields: FieldMap,
}

impl SchemaEntry {
    /// Returns the raw column name for `role`.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::UnknownFieldRole`] if this format has no such field.
    pub fn field(&self, role: FieldRole) -> Result<&'static str> {
        self.fields
            .get(role)
            .ok_or_else(|| ConvertError::UnknownFieldRole {
                schema: self.id,
                role: role.to_string(),
            })
    }

    /// Whether the format is tagged text rather than a delimited table.
    pub fn is_tagged(&self) -> bool {
        self.delimiter.is_none()
    }
}

static SCHEMAS: [SchemaEntry; 4] = [
    SchemaEntry {
        id: SchemaId::Wos,
        delimiter: Some(b'\t'),
        encoding: TextEncoding::Utf16Le,
        quoting: QuotingMode::None,
        fields: FieldMap {
            title: "TI",
            abstract_text: "AB",
            source: Some("SO"),
            year: Some("PY"),
            publisher: Some("PU"),
            kind: Some("DT"),
        },
    },
    SchemaEntry {
        id: SchemaId::Scopus,
        delimiter: Some(b','),
        encoding: TextEncoding::PlatformDefault,
        quoting: QuotingMode::All,
        fields: FieldMap {
            title: "Title",
            abstract_text: "Abstract",
            source: Some("Source title"),
            year: Some("Year"),
            publisher: Some("Publisher"),
            kind: Some("Document Type"),
        },
    },
    SchemaEntry {
        id: SchemaId::Proquest,
        delimiter: Some(b'\t'),
        encoding: TextEncoding::PlatformDefault,
        quoting: QuotingMode::All,
        fields: FieldMap {
            title: "Title",
            abstract_text: "Abstract",
            source: Some("pubtitle"),
            year: Some("year"),
            publisher: Some("publisher"),
            kind: None,
        },
    },
    SchemaEntry {
        id: SchemaId::Ris,
        delimiter: None,
        encoding: TextEncoding::Utf8,
        quoting: QuotingMode::None,
        fields: FieldMap {
            title: "TI",
            abstract_text: "AB",
            source: Some("T2"),
            year: Some("PY"),
            publisher: None,
            kind: Some("M3"),
        },
    },
];

/// Looks up a schema by its textual identifier.
///
/// # Errors
///
/// Returns [`ConvertError::UnknownSchema`] if `id` is not one of `wos`,
/// `scopus`, `proquest` or `ris`.
pub fn lookup(id: &str) -> Result<&'static SchemaEntry> {
    id.parse::<SchemaId>().map(SchemaId::entry)
}

/// Resolves the raw column or tag name of `role` in the schema `id`.
pub fn resolve_field(id: SchemaId, role: FieldRole) -> Result<&'static str> {
    id.entry().field(role)
}

//! RIS and EndNote tagged-text tags and their definitions.
//!
//! Only the tags that feed a [`FieldRole`] are named; everything else is kept
//! as `Unknown` and ignored during extraction.
//! See: http://en.wikipedia.org/wiki/RIS_(file_format)

use crate::schema::FieldRole;

/// RIS format tags.
#[allow(clippy::upper_case_acronyms)]
#[non_exhaustive]
#[derive(Debug, Eq, PartialEq, Hash, Clone)]
pub enum RisTag {
    /// TI - Primary title
    Title,
    /// AB - Abstract
    Abstract,
    /// T2 - Secondary title (journal or book title)
    SecondaryTitle,
    /// PY - Publication year
    PublicationYear,
    /// M3 - Type of work
    TypeOfWork,
    /// Unknown tag
    Unknown(String),
}

impl RisTag {
    /// Convert a string tag to a RisTag enum.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "TI" => RisTag::Title,
            "AB" => RisTag::Abstract,
            "T2" => RisTag::SecondaryTitle,
            "PY" => RisTag::PublicationYear,
            "M3" => RisTag::TypeOfWork,
            _ => RisTag::Unknown(tag.to_string()),
        }
    }

    /// The record field this tag fills, if any.
    ///
    /// `TY` is not named: the document type comes from `M3`.
    pub fn field(&self) -> Option<FieldRole> {
        match self {
            RisTag::Title => Some(FieldRole::Title),
            RisTag::Abstract => Some(FieldRole::Abstract),
            RisTag::SecondaryTitle => Some(FieldRole::Source),
            RisTag::PublicationYear => Some(FieldRole::Year),
            RisTag::TypeOfWork => Some(FieldRole::Type),
            RisTag::Unknown(_) => None,
        }
    }
}

/// EndNote tagged-text (refer) tags.
#[non_exhaustive]
#[derive(Debug, Eq, PartialEq, Hash, Clone)]
pub enum EndNoteTag {
    /// %0 - Reference type
    ReferenceType,
    /// %T - Title
    Title,
    /// %X - Abstract
    Abstract,
    /// %B - Secondary title
    SecondaryTitle,
    /// %D - Year
    Year,
    /// Unknown tag
    Unknown(String),
}

impl EndNoteTag {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "%0" => EndNoteTag::ReferenceType,
            "%T" => EndNoteTag::Title,
            "%X" => EndNoteTag::Abstract,
            "%B" => EndNoteTag::SecondaryTitle,
            "%D" => EndNoteTag::Year,
            _ => EndNoteTag::Unknown(tag.to_string()),
        }
    }

    pub fn field(&self) -> Option<FieldRole> {
        match self {
            EndNoteTag::ReferenceType => Some(FieldRole::Type),
            EndNoteTag::Title => Some(FieldRole::Title),
            EndNoteTag::Abstract => Some(FieldRole::Abstract),
            EndNoteTag::SecondaryTitle => Some(FieldRole::Source),
            EndNoteTag::Year => Some(FieldRole::Year),
            EndNoteTag::Unknown(_) => None,
        }
    }
}

/// The two tagging conventions a tagged export can use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagConvention {
    /// `TI  - value`: two-character tag, two spaces, dash, space
    Ris,
    /// `%T value`: percent sign, one character, space
    EndNote,
}

impl TagConvention {
    /// Length of the fixed prefix preceding a value.
    pub fn prefix_len(&self) -> usize {
        match self {
            TagConvention::Ris => 6,
            TagConvention::EndNote => 3,
        }
    }

    /// Selects the convention from the first non-empty line of `text`.
    ///
    /// Returns the convention, or the offending first line if neither matches.
    pub fn sniff(text: &str) -> Result<Self, String> {
        let first = text
            .trim_start_matches('\u{feff}')
            .lines()
            .map(|line| line.trim_end_matches('\r'))
            .find(|line| !line.trim().is_empty())
            .unwrap_or_default();

        if first.starts_with("TY  -") {
            Ok(TagConvention::Ris)
        } else if first.starts_with("%0") {
            Ok(TagConvention::EndNote)
        } else {
            Err(first.to_string())
        }
    }

    /// Splits a tagged line into the field it fills and its value.
    ///
    /// Lines that do not carry this convention's prefix, or whose tag maps to
    /// no field, yield `None`.
    pub fn extract<'a>(&self, line: &'a str) -> Option<(FieldRole, &'a str)> {
        let role = match self {
            TagConvention::Ris => {
                let marker = line.get(2..5)?;
                if marker != "  -" {
                    return None;
                }
                RisTag::from_tag(line.get(..2)?).field()?
            }
            TagConvention::EndNote => {
                if !line.starts_with('%') || line.get(2..3)? != " " {
                    return None;
                }
                EndNoteTag::from_tag(line.get(..2)?).field()?
            }
        };
        Some((role, line.get(self.prefix_len()..).unwrap_or_default()))
    }
}

//! RIS format data structures.
//!
//! This module defines the intermediate data structure used during tagged-text parsing.
//!
//! # Field Processing Strategy
//! - **Last-wins**: a tag repeated within one record overwrites the earlier value
//! - **Absent stays absent**: a field with no tag line is `None`, never an empty string

use crate::Record;
use crate::schema::FieldRole;
use std::collections::HashMap;

/// Structured raw data for one tagged record.
#[derive(Debug, Clone, Default)]
pub(crate) struct RawRisData {
    /// Field values keyed by role, filled in line order.
    pub(crate) data: HashMap<FieldRole, String>,
}

impl RawRisData {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Store a value, replacing any earlier value for the same field.
    pub(crate) fn set(&mut self, role: FieldRole, value: String) {
        self.data.insert(role, value);
    }

    #[cfg(test)]
    pub(crate) fn get(&self, role: FieldRole) -> Option<&String> {
        self.data.get(&role)
    }
}

impl From<RawRisData> for Record {
    fn from(raw: RawRisData) -> Self {
        let mut record = Record::default();
        for (role, value) in raw.data {
            record.set(role, Some(value));
        }
        record
    }
}

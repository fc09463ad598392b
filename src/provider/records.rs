//! File records reported by the provider and the two views derived from them.

use serde::{Deserialize, Serialize};

/// Separator between content id and size in a display label.
pub const LABEL_SEPARATOR: &str = "    ";

/// One unit of remote content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "Cid", alias = "cid", default)]
    pub id: String,
    #[serde(rename = "Size", alias = "size", default)]
    pub size: u64,
}

impl Record {
    #[must_use]
    pub fn new(id: impl Into<String>, size: u64) -> Self {
        Self {
            id: id.into(),
            size,
        }
    }

    /// `"<id>    <size>"`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{}{LABEL_SEPARATOR}{}", self.id, self.size)
    }
}

/// Ordered records in provider order. Empty when the provider had nothing
/// or could not be reached.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordSet {
    records: Vec<Record>,
}

impl RecordSet {
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Record] {
        &self.records
    }

    /// Parse a provider body. `null` is treated as an empty array.
    pub fn from_json(body: &str) -> serde_json::Result<Self> {
        let parsed: Option<Vec<Record>> = serde_json::from_str(body)?;
        Ok(parsed.map(Self::from).unwrap_or_default())
    }
}

impl From<Vec<Record>> for RecordSet {
    fn from(records: Vec<Record>) -> Self {
        Self { records }
    }
}

impl FromIterator<Record> for RecordSet {
    fn from_iter<T: IntoIterator<Item = Record>>(iter: T) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// One display label per record, in record order.
#[must_use]
pub fn labels(rs: &RecordSet) -> Vec<String> {
    rs.iter().map(Record::label).collect()
}

/// Sum of all record sizes. Saturates instead of wrapping.
#[must_use]
pub fn total_size(rs: &RecordSet) -> u64 {
    rs.iter().fold(0u64, |acc, r| acc.saturating_add(r.size))
}

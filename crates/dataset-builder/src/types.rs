//! Dataset Record Types

use serde::{Deserialize, Serialize};
use signal_loader::Waveform;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Train/test partition of a segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Split {
    Train,
    Test,
}

/// Recording condition of a segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Source,
    Target,
}

/// Ground-truth class. Serialized as 0 / 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Label {
    Normal,
    Anomaly,
}

impl Split {
    pub const ALL: [Split; 2] = [Split::Train, Split::Test];

    pub fn as_str(&self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Test => "test",
        }
    }
}

impl Domain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Source => "source",
            Domain::Target => "target",
        }
    }
}

impl Label {
    pub fn as_u8(&self) -> u8 {
        match self {
            Label::Normal => 0,
            Label::Anomaly => 1,
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

impl FromStr for Split {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "train" => Ok(Split::Train),
            "test" => Ok(Split::Test),
            other => Err(format!("unknown split '{}'", other)),
        }
    }
}

impl FromStr for Domain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "source" => Ok(Domain::Source),
            "target" => Ok(Domain::Target),
            other => Err(format!("unknown domain '{}'", other)),
        }
    }
}

impl FromStr for Label {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .trim()
            .parse::<u8>()
            .map_err(|_| format!("unknown label '{}'", s.trim()))?;
        Label::try_from(value)
    }
}

impl TryFrom<u8> for Label {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Label::Normal),
            1 => Ok(Label::Anomaly),
            other => Err(format!("unknown label {}", other)),
        }
    }
}

impl From<Label> for u8 {
    fn from(label: Label) -> Self {
        label.as_u8()
    }
}

/// Position of a metadata row: which table, which data row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RowOrigin {
    /// Index of the source table in the assembler input
    pub table: usize,
    /// Zero-based data row within that table (header excluded)
    pub row: usize,
}

/// One metadata row, stamped with the split/domain/label of its table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentMetadata {
    /// Verbatim segment id cell
    pub segment_id: String,
    pub split: Split,
    pub domain: Domain,
    pub label: Label,
    /// Reference column name → waveform file reference
    pub references: BTreeMap<String, String>,
    pub origin: RowOrigin,
}

impl SegmentMetadata {
    /// File reference for a channel, if present and non-empty
    pub fn reference(&self, column: &str) -> Option<&str> {
        self.references
            .get(column)
            .map(|r| r.trim())
            .filter(|r| !r.is_empty())
    }
}

/// A metadata row joined with its loaded waveform
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetRecord {
    pub segment_id: String,
    pub split: Split,
    pub domain: Domain,
    pub label: Label,
    pub waveform: Waveform,
    pub origin: RowOrigin,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_forms() {
        assert_eq!("train".parse::<Split>().unwrap(), Split::Train);
        assert_eq!(" target ".parse::<Domain>().unwrap(), Domain::Target);
        assert_eq!("1".parse::<Label>().unwrap(), Label::Anomaly);
        assert!("2".parse::<Label>().is_err());
        assert!("validation".parse::<Split>().is_err());

        assert_eq!(Split::Test.to_string(), "test");
        assert_eq!(Label::Normal.to_string(), "0");
    }

    #[test]
    fn test_empty_reference_is_absent() {
        let mut references = BTreeMap::new();
        references.insert("imp23absu_mic".to_string(), "  ".to_string());
        let meta = SegmentMetadata {
            segment_id: "7".to_string(),
            split: Split::Train,
            domain: Domain::Source,
            label: Label::Normal,
            references,
            origin: RowOrigin { table: 0, row: 0 },
        };
        assert_eq!(meta.reference("imp23absu_mic"), None);
        assert_eq!(meta.reference("ism330dhcx_acc"), None);
    }
}

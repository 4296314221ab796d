//! Feature schema types.
//!
//! A feature summary table declares, per column, the literal values that stand
//! for "missing or unknown" and the column's data kind. These types hold the
//! parsed form of that table.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A literal value that marks a cell as missing or unknown.
///
/// Sentinel specs mix integer codes (`-1`, `0`, `9`) with alphabetic codes
/// (`X`, `XX`), so both forms are kept typed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum SentinelValue {
    Int(i64),
    Text(String),
}

impl fmt::Display for SentinelValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Declared data kind of a survey column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeatureType {
    Categorical,
    Ordinal,
    Numeric,
    Interval,
    Mixed,
    /// Any declared kind outside the known set, kept verbatim.
    Other(String),
}

impl FeatureType {
    /// Parse the declared kind from the feature summary `type` column.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "categorical" => Self::Categorical,
            "ordinal" => Self::Ordinal,
            "numeric" => Self::Numeric,
            "interval" => Self::Interval,
            "mixed" => Self::Mixed,
            _ => Self::Other(s.trim().to_string()),
        }
    }

    /// The declared kind as written in the feature summary.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Categorical => "categorical",
            Self::Ordinal => "ordinal",
            Self::Numeric => "numeric",
            Self::Interval => "interval",
            Self::Mixed => "mixed",
            Self::Other(s) => s,
        }
    }
}

impl fmt::Display for FeatureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Schema entry for one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSpec {
    /// Values that mean "missing or unknown" for this column.
    pub sentinels: Vec<SentinelValue>,
    /// Declared data kind.
    pub feature_type: FeatureType,
}

/// Column name to [`FeatureSpec`] mapping. Each column appears once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSchema {
    pub columns: BTreeMap<String, FeatureSpec>,
}

impl FeatureSchema {
    /// Join a sentinel map and a type map built from the same summary table.
    ///
    /// Columns present in only one of the maps are skipped; both maps come from
    /// the same rows, so this only happens for hand-built inputs.
    pub fn from_maps(
        sentinels: BTreeMap<String, Vec<SentinelValue>>,
        types: &BTreeMap<String, FeatureType>,
    ) -> Self {
        let columns = sentinels
            .into_iter()
            .filter_map(|(column, sentinels)| {
                let feature_type = types.get(&column)?.clone();
                Some((
                    column,
                    FeatureSpec {
                        sentinels,
                        feature_type,
                    },
                ))
            })
            .collect();
        Self { columns }
    }

    /// Look up the entry for a column.
    pub fn get(&self, column: &str) -> Option<&FeatureSpec> {
        self.columns.get(column)
    }

    /// Sentinel values for a column.
    pub fn sentinels(&self, column: &str) -> Option<&[SentinelValue]> {
        self.columns.get(column).map(|spec| spec.sentinels.as_slice())
    }

    /// Sentinel map view, as consumed by the sentinel normalizer.
    pub fn sentinel_map(&self) -> BTreeMap<String, Vec<SentinelValue>> {
        self.columns
            .iter()
            .map(|(column, spec)| (column.clone(), spec.sentinels.clone()))
            .collect()
    }

    /// Type map view.
    pub fn type_map(&self) -> BTreeMap<String, FeatureType> {
        self.columns
            .iter()
            .map(|(column, spec)| (column.clone(), spec.feature_type.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feature_type_parse_is_case_insensitive() {
        assert_eq!(FeatureType::parse("Categorical"), FeatureType::Categorical);
        assert_eq!(FeatureType::parse(" mixed "), FeatureType::Mixed);
        assert_eq!(
            FeatureType::parse("binary"),
            FeatureType::Other("binary".to_string())
        );
        assert_eq!(FeatureType::parse("binary").as_str(), "binary");
    }

    #[test]
    fn sentinel_display() {
        assert_eq!(SentinelValue::Int(-1).to_string(), "-1");
        assert_eq!(SentinelValue::Text("XX".to_string()).to_string(), "XX");
    }

    #[test]
    fn schema_from_maps_joins_entries() {
        let mut sentinels = BTreeMap::new();
        sentinels.insert("AGER_TYP".to_string(), vec![SentinelValue::Int(-1)]);
        sentinels.insert("ORPHAN".to_string(), vec![]);
        let mut types = BTreeMap::new();
        types.insert("AGER_TYP".to_string(), FeatureType::Categorical);

        let schema = FeatureSchema::from_maps(sentinels, &types);

        assert_eq!(schema.len(), 1);
        assert!(!schema.is_empty());
        assert!(FeatureSchema::from_maps(BTreeMap::new(), &types).is_empty());
        assert_eq!(
            schema.sentinels("AGER_TYP"),
            Some([SentinelValue::Int(-1)].as_slice())
        );
        assert!(schema.get("ORPHAN").is_none());
        assert_eq!(schema.type_map()["AGER_TYP"], FeatureType::Categorical);
    }
}

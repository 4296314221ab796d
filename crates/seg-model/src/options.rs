//! Configuration for cleaning and validating the demographic survey.
//!
//! Everything here is schema knowledge about one dataset shape: which columns
//! are dropped, which codes are valid for each categorical column, and how many
//! columns each dropped column was replaced with. The `Default` impls describe
//! the AZDIAS general-population survey; tests and alternate schemas build
//! their own values.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A categorical column to expand into indicator columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OneHotColumn {
    /// Source column name.
    pub column: String,
    /// Valid category codes, in output column order.
    pub allowed: Vec<i64>,
}

impl OneHotColumn {
    pub fn new(column: impl Into<String>, allowed: impl Into<Vec<i64>>) -> Self {
        Self {
            column: column.into(),
            allowed: allowed.into(),
        }
    }
}

/// Recode of a two-valued letter column to `{0, 1}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinaryRecode {
    pub column: String,
    /// Code mapped to 0.
    pub zero: String,
    /// Code mapped to 1.
    pub one: String,
}

/// Names used when decomposing the two compound-coded columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MixedFeatureConfig {
    /// Youth-cohort code column (1..=15).
    pub youth_column: String,
    /// Derived movement flag (0 = avantgarde, 1 = mainstream).
    pub movement_column: String,
    /// Derived decade index (0 = 40s .. 5 = 90s).
    pub decade_column: String,
    /// Wealth / life-stage code column (11..=55).
    pub wealth_lifestage_column: String,
    /// Derived wealth category.
    pub wealth_column: String,
    /// Derived life-stage category.
    pub life_stage_column: String,
    /// One-hot expansion of the derived categorical columns.
    pub derived_one_hot: Vec<OneHotColumn>,
    /// Compound columns dropped without decomposition.
    pub dropped_columns: Vec<String>,
}

impl Default for MixedFeatureConfig {
    fn default() -> Self {
        Self {
            youth_column: "PRAEGENDE_JUGENDJAHRE".to_string(),
            movement_column: "avantgarde".to_string(),
            decade_column: "decade".to_string(),
            wealth_lifestage_column: "CAMEO_INTL_2015".to_string(),
            wealth_column: "wealth_category".to_string(),
            life_stage_column: "life_stage_category".to_string(),
            derived_one_hot: vec![
                OneHotColumn::new("decade", [0, 1, 2, 3, 4, 5]),
                OneHotColumn::new("wealth_category", [1, 2, 3, 4, 5]),
                OneHotColumn::new("life_stage_category", [1, 2, 3, 4, 5]),
            ],
            dropped_columns: strings(&[
                "LP_LEBENSPHASE_FEIN",
                "LP_LEBENSPHASE_GROB",
                "WOHNLAGE",
                "PLZ8_BAUMAX",
            ]),
        }
    }
}

/// Options controlling the cleaning pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleaningConfig {
    /// String-typed columns coerced to nullable integers after sentinel replacement.
    ///
    /// `CAMEO_DEUG_2015` loads as text because its `X` sentinel is alphabetic.
    pub integer_coerced_columns: Vec<String>,

    /// Sparse or unreliable columns dropped unconditionally.
    pub outlier_columns: Vec<String>,

    /// Rows with more missing cells than this are dropped.
    pub row_missing_cutoff: usize,

    /// Columns with too many distinct codes to one-hot encode.
    pub high_cardinality_columns: Vec<String>,

    /// Letter-coded binary columns.
    pub binary_recodes: Vec<BinaryRecode>,

    /// Categorical columns and their valid codes.
    pub one_hot_columns: Vec<OneHotColumn>,

    /// Compound column decomposition.
    pub mixed: MixedFeatureConfig,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            integer_coerced_columns: strings(&["CAMEO_DEUG_2015"]),
            outlier_columns: strings(&[
                "TITEL_KZ",
                "AGER_TYP",
                "KK_KUNDENTYP",
                "KBA05_BAUMAX",
                "GEBURTSJAHR",
                "ALTER_HH",
            ]),
            row_missing_cutoff: 0,
            high_cardinality_columns: strings(&["CAMEO_DEU_2015"]),
            binary_recodes: vec![BinaryRecode {
                column: "OST_WEST_KZ".to_string(),
                zero: "W".to_string(),
                one: "O".to_string(),
            }],
            one_hot_columns: vec![
                OneHotColumn::new("CAMEO_DEUG_2015", [1, 2, 3, 4, 5, 6, 7, 8, 9]),
                OneHotColumn::new("CJT_GESAMTTYP", [1, 2, 3, 4, 5, 6]),
                OneHotColumn::new("FINANZTYP", [1, 2, 3, 4, 5, 6]),
                OneHotColumn::new("GEBAEUDETYP", [1, 3, 5, 8]),
                OneHotColumn::new("GFK_URLAUBERTYP", [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12]),
                OneHotColumn::new("LP_FAMILIE_FEIN", [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11]),
                OneHotColumn::new("LP_FAMILIE_GROB", [1, 2, 3, 4, 5]),
                OneHotColumn::new("LP_STATUS_FEIN", [1, 2, 3, 4, 5, 6, 7, 8, 9, 10]),
                OneHotColumn::new("LP_STATUS_GROB", [1, 2, 3, 4, 5]),
                OneHotColumn::new("NATIONALITAET_KZ", [1, 2, 3]),
                OneHotColumn::new("SHOPPER_TYP", [0, 1, 2, 3]),
                OneHotColumn::new("ZABEOTYP", [1, 2, 3, 4, 5, 6]),
            ],
            mixed: MixedFeatureConfig::default(),
        }
    }
}

impl CleaningConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep rows with at most `cutoff` missing cells.
    #[must_use]
    pub fn with_row_missing_cutoff(mut self, cutoff: usize) -> Self {
        self.row_missing_cutoff = cutoff;
        self
    }

    #[must_use]
    pub fn with_outlier_columns(mut self, columns: Vec<String>) -> Self {
        self.outlier_columns = columns;
        self
    }

    #[must_use]
    pub fn with_one_hot_columns(mut self, columns: Vec<OneHotColumn>) -> Self {
        self.one_hot_columns = columns;
        self
    }

    #[must_use]
    pub fn with_integer_coerced_columns(mut self, columns: Vec<String>) -> Self {
        self.integer_coerced_columns = columns;
        self
    }
}

/// Structural expectations for a cleaned table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Column count of the raw survey table.
    pub original_column_count: usize,

    /// Every dropped column and the number of columns derived from it
    /// (0 when dropped outright).
    pub replacements: BTreeMap<String, usize>,

    /// Maximum missing cells allowed in any row.
    pub row_missing_cutoff: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        let replacements = [
            // not enough data
            ("TITEL_KZ", 0),
            ("AGER_TYP", 0),
            ("KK_KUNDENTYP", 0),
            ("KBA05_BAUMAX", 0),
            ("GEBURTSJAHR", 0),
            ("ALTER_HH", 0),
            // too many categories
            ("CAMEO_DEU_2015", 0),
            // one-hot encoded categoricals
            ("GFK_URLAUBERTYP", 12),
            ("LP_FAMILIE_FEIN", 11),
            ("LP_STATUS_FEIN", 10),
            ("CAMEO_DEUG_2015", 9),
            ("GEBAEUDETYP", 4),
            ("CJT_GESAMTTYP", 6),
            ("FINANZTYP", 6),
            ("ZABEOTYP", 6),
            ("LP_FAMILIE_GROB", 5),
            ("LP_STATUS_GROB", 5),
            ("SHOPPER_TYP", 4),
            ("NATIONALITAET_KZ", 3),
            // decomposed mixed features
            ("PRAEGENDE_JUGENDJAHRE", 7),
            ("CAMEO_INTL_2015", 10),
            // mixed features dropped without decomposition
            ("LP_LEBENSPHASE_FEIN", 0),
            ("LP_LEBENSPHASE_GROB", 0),
            ("WOHNLAGE", 0),
            ("PLZ8_BAUMAX", 0),
        ]
        .into_iter()
        .map(|(column, count)| (column.to_string(), count))
        .collect();

        Self {
            original_column_count: 85,
            replacements,
            row_missing_cutoff: 0,
        }
    }
}

impl ValidationConfig {
    /// Column count a cleaned table must have.
    ///
    /// Saturates at zero for a replacement table larger than the raw column count.
    pub fn expected_column_count(&self) -> usize {
        let added: usize = self.replacements.values().sum();
        self.original_column_count
            .saturating_sub(self.replacements.len())
            + added
    }

    /// Names of the columns that must no longer exist.
    pub fn dropped_columns(&self) -> impl Iterator<Item = &str> {
        self.replacements.keys().map(String::as_str)
    }

    #[must_use]
    pub fn with_row_missing_cutoff(mut self, cutoff: usize) -> Self {
        self.row_missing_cutoff = cutoff;
        self
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_accounting_matches_cleaning_layout() {
        let config = ValidationConfig::default();
        assert_eq!(config.replacements.len(), 25);
        assert_eq!(config.expected_column_count(), 158);
    }

    #[test]
    fn one_hot_widths_agree_with_replacement_table() {
        let cleaning = CleaningConfig::default();
        let validation = ValidationConfig::default();
        for entry in &cleaning.one_hot_columns {
            assert_eq!(
                validation.replacements.get(&entry.column),
                Some(&entry.allowed.len()),
                "{}",
                entry.column
            );
        }
    }

    #[test]
    fn builders_override_defaults() {
        let config = CleaningConfig::new().with_row_missing_cutoff(3);
        assert_eq!(config.row_missing_cutoff, 3);
        let validation = ValidationConfig::default().with_row_missing_cutoff(3);
        assert_eq!(validation.row_missing_cutoff, 3);
    }
}

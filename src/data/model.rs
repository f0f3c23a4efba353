use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DataFormatError, Result};

// ---------------------------------------------------------------------------
// DatasetVariant – which header / label convention a file uses
// ---------------------------------------------------------------------------

/// The two Iris layouts in circulation. They hold the same data under
/// different column names and species labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetVariant {
    /// `petalLength,petalWidth,species` with labels like `setosa`.
    #[default]
    Lowercase,
    /// `PetalLength,PetalWidth,Species` with labels like `Iris-setosa`.
    Capitalized,
}

impl DatasetVariant {
    pub const ALL: [DatasetVariant; 2] = [DatasetVariant::Lowercase, DatasetVariant::Capitalized];

    pub fn petal_length_column(self) -> &'static str {
        match self {
            DatasetVariant::Lowercase => "petalLength",
            DatasetVariant::Capitalized => "PetalLength",
        }
    }

    pub fn petal_width_column(self) -> &'static str {
        match self {
            DatasetVariant::Lowercase => "petalWidth",
            DatasetVariant::Capitalized => "PetalWidth",
        }
    }

    pub fn species_column(self) -> &'static str {
        match self {
            DatasetVariant::Lowercase => "species",
            DatasetVariant::Capitalized => "Species",
        }
    }

    /// Fixed, ordered species labels used for the categorical axis and legend.
    pub fn species_domain(self) -> &'static [&'static str] {
        match self {
            DatasetVariant::Lowercase => &["setosa", "versicolor", "virginica"],
            DatasetVariant::Capitalized => &["Iris-setosa", "Iris-versicolor", "Iris-virginica"],
        }
    }

    /// Rewrite a known species label into this layout's form, so `Iris-setosa`
    /// in a lowercase file becomes `setosa` and vice versa. Other labels pass
    /// through unchanged.
    pub fn normalize_species(self, label: &str) -> String {
        let bare = canonical_species(label);
        self.species_domain()
            .iter()
            .find(|known| canonical_species(known) == bare)
            .map_or_else(|| label.to_string(), |known| known.to_string())
    }

    /// Pick the variant whose three required columns all appear in `headers`.
    pub fn detect<S: AsRef<str>>(headers: &[S]) -> Result<Self> {
        let has = |name: &str| headers.iter().any(|h| h.as_ref().trim() == name);
        Self::ALL
            .into_iter()
            .find(|v| {
                has(v.petal_length_column()) && has(v.petal_width_column()) && has(v.species_column())
            })
            .ok_or_else(|| {
                DataFormatError::UnknownVariant(
                    headers.iter().map(|h| h.as_ref().to_string()).collect(),
                )
            })
    }
}

/// `Iris-setosa` and `setosa` name the same species.
pub fn canonical_species(label: &str) -> &str {
    label.strip_prefix("Iris-").unwrap_or(label)
}

impl fmt::Display for DatasetVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetVariant::Lowercase => write!(f, "lowercase"),
            DatasetVariant::Capitalized => write!(f, "capitalized"),
        }
    }
}

// ---------------------------------------------------------------------------
// NumericField – value selector
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NumericField {
    PetalLength,
    PetalWidth,
}

impl NumericField {
    pub const ALL: [NumericField; 2] = [NumericField::PetalLength, NumericField::PetalWidth];

    pub fn value(self, record: &Record) -> f64 {
        match self {
            NumericField::PetalLength => record.petal_length,
            NumericField::PetalWidth => record.petal_width,
        }
    }
}

impl fmt::Display for NumericField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericField::PetalLength => write!(f, "Petal Length"),
            NumericField::PetalWidth => write!(f, "Petal Width"),
        }
    }
}

// ---------------------------------------------------------------------------
// Record – one row of the source table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub petal_length: f64,
    pub petal_width: f64,
    pub species: String,
}

// ---------------------------------------------------------------------------
// IrisDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct IrisDataset {
    pub records: Vec<Record>,
    /// Layout the file was written in.
    pub variant: DatasetVariant,
    /// Distinct species labels in first-seen order.
    pub species: Vec<String>,
}

impl IrisDataset {
    /// Species labels are normalized to `variant`'s form on the way in.
    pub fn from_records(mut records: Vec<Record>, variant: DatasetVariant) -> Self {
        let mut species: Vec<String> = Vec::new();
        for r in &mut records {
            r.species = variant.normalize_species(&r.species);
            if !species.iter().any(|s| *s == r.species) {
                species.push(r.species.clone());
            }
        }
        IrisDataset {
            records,
            variant,
            species,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All values of one numeric field, in record order.
    pub fn values(&self, field: NumericField) -> Vec<f64> {
        self.records.iter().map(|r| field.value(r)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(len: f64, width: f64, species: &str) -> Record {
        Record {
            petal_length: len,
            petal_width: width,
            species: species.to_string(),
        }
    }

    #[test]
    fn test_detect_lowercase_headers() {
        let headers = ["sepalLength", "sepalWidth", "petalLength", "petalWidth", "species"];
        assert_eq!(DatasetVariant::detect(&headers).unwrap(), DatasetVariant::Lowercase);
    }

    #[test]
    fn test_detect_capitalized_headers() {
        let headers = ["Id", "PetalLength", "PetalWidth", "Species"];
        assert_eq!(DatasetVariant::detect(&headers).unwrap(), DatasetVariant::Capitalized);
    }

    #[test]
    fn test_detect_unknown_headers() {
        let headers = ["petal_length", "petal_width", "class"];
        assert!(matches!(
            DatasetVariant::detect(&headers),
            Err(DataFormatError::UnknownVariant(_))
        ));
    }

    #[test]
    fn test_labels_follow_layout_form() {
        let ds = IrisDataset::from_records(
            vec![
                record(1.4, 0.2, "Iris-setosa"),
                record(4.5, 1.5, "versicolor"),
                record(2.0, 0.5, "hybrid"),
            ],
            DatasetVariant::Lowercase,
        );
        assert_eq!(ds.species, vec!["setosa", "versicolor", "hybrid"]);
        assert_eq!(ds.records[0].species, "setosa");

        assert_eq!(DatasetVariant::Capitalized.normalize_species("virginica"), "Iris-virginica");
        assert_eq!(DatasetVariant::Capitalized.normalize_species("Iris-virginica"), "Iris-virginica");
    }

    #[test]
    fn test_species_first_seen_order() {
        let ds = IrisDataset::from_records(
            vec![
                record(4.7, 1.4, "versicolor"),
                record(1.4, 0.2, "setosa"),
                record(4.5, 1.5, "versicolor"),
            ],
            DatasetVariant::Lowercase,
        );
        assert_eq!(ds.species, vec!["versicolor", "setosa"]);
        assert_eq!(ds.values(NumericField::PetalWidth), vec![1.4, 0.2, 1.5]);
    }
}

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde_json::Value as JsonValue;

use super::model::{DatasetVariant, IrisDataset, Record};
use crate::error::DataFormatError;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load an Iris dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`  – header row naming the petal and species columns
/// * `.json` – `[{ "petalLength": 1.4, "petalWidth": 0.2, "species": "setosa" }, ...]`
///
/// Either file may use the lowercase or the capitalized column convention;
/// the layout is detected from the header (CSV) or the first object's keys (JSON).
pub fn load_file(path: &Path) -> Result<IrisDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let file = std::fs::File::open(path)
        .with_context(|| format!("opening {}", path.display()))?;

    match ext.as_str() {
        "csv" => load_csv(file),
        "json" => load_json(file),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Read CSV from any byte source. Columns other than the three the detected
/// layout needs are ignored.
pub fn load_csv<R: Read>(source: R) -> Result<IrisDataset> {
    let mut reader = csv::Reader::from_reader(source);
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let variant = DatasetVariant::detect(&headers)?;
    let column = |name: &str| -> Result<usize> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| DataFormatError::MissingColumn(name.to_string()).into())
    };
    let length_idx = column(variant.petal_length_column())?;
    let width_idx = column(variant.petal_width_column())?;
    let species_idx = column(variant.species_column())?;

    let mut records = Vec::new();

    for (i, result) in reader.records().enumerate() {
        let row = i + 1;
        let record = result.with_context(|| format!("CSV row {row}"))?;

        let petal_length = parse_number(
            record.get(length_idx).unwrap_or(""),
            row,
            variant.petal_length_column(),
        )?;
        let petal_width = parse_number(
            record.get(width_idx).unwrap_or(""),
            row,
            variant.petal_width_column(),
        )?;
        let species = record.get(species_idx).unwrap_or("").trim().to_string();

        records.push(Record {
            petal_length,
            petal_width,
            species,
        });
    }

    log::debug!("parsed {} CSV rows ({variant} layout)", records.len());
    Ok(IrisDataset::from_records(records, variant))
}

/// Parse one numeric cell, naming the row and column on failure.
pub fn parse_number(text: &str, row: usize, field: &str) -> Result<f64, DataFormatError> {
    let trimmed = text.trim();
    let value = trimmed
        .parse::<f64>()
        .map_err(|_| DataFormatError::InvalidNumber {
            row,
            field: field.to_string(),
            value: trimmed.to_string(),
        })?;
    if !value.is_finite() {
        return Err(DataFormatError::NonFiniteValue {
            row,
            field: field.to_string(),
        });
    }
    Ok(value)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented):
///
/// ```json
/// [
///   { "PetalLength": 1.4, "PetalWidth": 0.2, "Species": "Iris-setosa" },
///   ...
/// ]
/// ```
///
/// Numeric fields may also be given as strings.
pub fn load_json<R: Read>(source: R) -> Result<IrisDataset> {
    let root: JsonValue = serde_json::from_reader(source).context("parsing JSON")?;

    let rows = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let variant = match rows.first().and_then(|r| r.as_object()) {
        Some(first) => {
            let keys: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
            DatasetVariant::detect(&keys)?
        }
        None => DatasetVariant::default(),
    };

    let mut records = Vec::with_capacity(rows.len());

    for (i, rec) in rows.iter().enumerate() {
        let row = i + 1;
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {row} is not a JSON object"))?;

        let petal_length = json_number(obj.get(variant.petal_length_column()), row, variant.petal_length_column())?;
        let petal_width = json_number(obj.get(variant.petal_width_column()), row, variant.petal_width_column())?;
        let species = match obj.get(variant.species_column()) {
            Some(JsonValue::String(s)) => s.trim().to_string(),
            Some(other) => other.to_string(),
            None => {
                return Err(DataFormatError::MissingColumn(variant.species_column().to_string()))
                    .with_context(|| format!("Row {row}"));
            }
        };

        records.push(Record {
            petal_length,
            petal_width,
            species,
        });
    }

    Ok(IrisDataset::from_records(records, variant))
}

fn json_number(val: Option<&JsonValue>, row: usize, field: &str) -> Result<f64, DataFormatError> {
    match val {
        Some(JsonValue::Number(n)) => n.as_f64().ok_or_else(|| DataFormatError::InvalidNumber {
            row,
            field: field.to_string(),
            value: n.to_string(),
        }),
        Some(JsonValue::String(s)) => parse_number(s, row, field),
        Some(other) => Err(DataFormatError::InvalidNumber {
            row,
            field: field.to_string(),
            value: other.to_string(),
        }),
        None => Err(DataFormatError::MissingColumn(field.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn format_error(err: &anyhow::Error) -> Option<&DataFormatError> {
        err.downcast_ref::<DataFormatError>()
    }

    #[test]
    fn test_csv_lowercase() {
        let text = "sepalLength,sepalWidth,petalLength,petalWidth,species\n\
                    5.1,3.5,1.4,0.2,setosa\n\
                    7.0,3.2,4.7,1.4,versicolor\n";
        let ds = load_csv(text.as_bytes()).unwrap();
        assert_eq!(ds.variant, DatasetVariant::Lowercase);
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[1].petal_length, 4.7);
        assert_eq!(ds.records[1].petal_width, 1.4);
        assert_eq!(ds.records[1].species, "versicolor");
    }

    #[test]
    fn test_csv_capitalized_with_spaces() {
        let text = "Id,PetalLength,PetalWidth,Species\n1, 6.0 ,2.5,Iris-virginica\n";
        let ds = load_csv(text.as_bytes()).unwrap();
        assert_eq!(ds.variant, DatasetVariant::Capitalized);
        assert_eq!(ds.records[0].petal_length, 6.0);
        assert_eq!(ds.species, vec!["Iris-virginica"]);
    }

    #[test]
    fn test_csv_labels_normalized_to_header_layout() {
        let text = "petalLength,petalWidth,species\n1.4,0.2,Iris-setosa\n4.5,1.5,Iris-versicolor\n";
        let ds = load_csv(text.as_bytes()).unwrap();
        assert_eq!(ds.variant, DatasetVariant::Lowercase);
        assert_eq!(ds.species, vec!["setosa", "versicolor"]);
        assert_eq!(ds.records[1].species, "versicolor");
    }

    #[test]
    fn test_csv_invalid_number_names_row_and_field() {
        let text = "petalLength,petalWidth,species\n1.4,0.2,setosa\n1.5,abc,setosa\n";
        let err = load_csv(text.as_bytes()).unwrap_err();
        assert_eq!(
            format_error(&err),
            Some(&DataFormatError::InvalidNumber {
                row: 2,
                field: "petalWidth".to_string(),
                value: "abc".to_string(),
            })
        );
    }

    #[test]
    fn test_csv_empty_cell_is_rejected() {
        let text = "petalLength,petalWidth,species\n,0.2,setosa\n";
        let err = load_csv(text.as_bytes()).unwrap_err();
        assert!(matches!(
            format_error(&err),
            Some(DataFormatError::InvalidNumber { row: 1, .. })
        ));
    }

    #[test]
    fn test_csv_nan_is_rejected() {
        let text = "petalLength,petalWidth,species\nNaN,0.2,setosa\n";
        let err = load_csv(text.as_bytes()).unwrap_err();
        assert!(matches!(
            format_error(&err),
            Some(DataFormatError::NonFiniteValue { row: 1, .. })
        ));
    }

    #[test]
    fn test_csv_unknown_header() {
        let text = "a,b,c\n1,2,3\n";
        let err = load_csv(text.as_bytes()).unwrap_err();
        assert!(matches!(format_error(&err), Some(DataFormatError::UnknownVariant(_))));
    }

    #[test]
    fn test_json_records() {
        let text = r#"[
            {"PetalLength": 1.4, "PetalWidth": "0.2", "Species": "Iris-setosa"},
            {"PetalLength": 5.1, "PetalWidth": 1.9, "Species": "Iris-virginica"}
        ]"#;
        let ds = load_json(text.as_bytes()).unwrap();
        assert_eq!(ds.variant, DatasetVariant::Capitalized);
        assert_eq!(ds.records[0].petal_width, 0.2);
        assert_eq!(ds.species, vec!["Iris-setosa", "Iris-virginica"]);
    }

    #[test]
    fn test_json_missing_field() {
        let text = r#"[
            {"petalLength": 1.4, "petalWidth": 0.2, "species": "setosa"},
            {"petalLength": 1.3, "species": "setosa"}
        ]"#;
        let err = load_json(text.as_bytes()).unwrap_err();
        assert_eq!(
            format_error(&err),
            Some(&DataFormatError::MissingColumn("petalWidth".to_string()))
        );
    }

    #[test]
    fn test_parse_number_trims() {
        assert_eq!(parse_number(" 2.5 ", 1, "petalLength").unwrap(), 2.5);
    }
}

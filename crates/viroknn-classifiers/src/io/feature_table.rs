//! Reader for prepared feature tables (CSV or TSV).
//!
//! The table has a header row, one 0/1 label column and numeric feature
//! columns everywhere else. Producing the table from raw genomes happens
//! upstream.
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use csv::StringRecord;

use crate::data_handling::{Dataset, Label};
use crate::math::{Array1, Array2};

#[derive(Debug, Clone)]
pub struct FeatureTable {
    pub dataset: Dataset,
    /// Header names of the feature columns, in matrix column order.
    pub feature_names: Vec<String>,
}

/// Field delimiter implied by a table's extension, compared case-insensitively:
/// `.csv` is comma separated, `.tsv` and `.tab` are tab separated. Any other
/// extension is not a supported table.
pub fn table_delimiter<P: AsRef<Path>>(path: P) -> Option<u8> {
    match path
        .as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("csv") => Some(b','),
        Some("tsv") | Some("tab") => Some(b'\t'),
        _ => None,
    }
}

fn find_column(headers: &StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h.trim().eq_ignore_ascii_case(name))
}

/// Read a feature table. The delimiter follows [`table_delimiter`].
pub fn read_feature_table<P: AsRef<Path>>(path: P, label_column: &str) -> Result<FeatureTable> {
    let path = path.as_ref();
    let delimiter = table_delimiter(path).ok_or_else(|| {
        anyhow!(
            "Unsupported feature table extension (expected .csv, .tsv or .tab): {}",
            path.display()
        )
    })?;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open feature table: {}", path.display()))?;

    let headers = reader
        .headers()
        .context("Failed to read feature table header row")?
        .clone();

    let label_idx = find_column(&headers, label_column)
        .ok_or_else(|| anyhow!("Missing label column '{}'", label_column))?;
    let feature_indices: Vec<usize> = (0..headers.len()).filter(|&i| i != label_idx).collect();
    if feature_indices.is_empty() {
        return Err(anyhow!("No feature columns detected in feature table header"));
    }
    let feature_names = feature_indices
        .iter()
        .map(|&i| headers[i].trim().to_string())
        .collect::<Vec<_>>();

    let mut features = Vec::new();
    let mut labels: Vec<Label> = Vec::new();

    for (row_idx, result) in reader.records().enumerate() {
        let line = row_idx + 2;
        let record = result.with_context(|| format!("Failed to read line {}", line))?;

        let raw_label = record
            .get(label_idx)
            .ok_or_else(|| anyhow!("Missing label value on line {}", line))?;
        let label = raw_label
            .parse::<Label>()
            .with_context(|| format!("Invalid label '{}' on line {}", raw_label, line))?;
        labels.push(label);

        for &idx in &feature_indices {
            let raw = record
                .get(idx)
                .ok_or_else(|| anyhow!("Missing value for '{}' on line {}", &headers[idx], line))?;
            let value = raw.parse::<f64>().with_context(|| {
                format!(
                    "Invalid value '{}' for '{}' on line {}",
                    raw, &headers[idx], line
                )
            })?;
            features.push(value);
        }
    }

    let n_rows = labels.len();
    let x = Array2::from_shape_vec((n_rows, feature_indices.len()), features)?;
    let dataset = Dataset::new(x, Array1::from_vec(labels))
        .with_context(|| format!("Invalid dataset in {}", path.display()))?;

    log::debug!(
        "Read {} samples with {} features from {}",
        n_rows,
        feature_names.len(),
        path.display()
    );

    Ok(FeatureTable {
        dataset,
        feature_names,
    })
}

use anyhow::Result;
use std::path::Path;

use viroknn_classifiers::io::table_delimiter;

/// Check that `path` is an existing `.csv`, `.tsv` or `.tab` table.
pub fn validate_tsv_or_csv_file<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();

    if table_delimiter(path).is_none() {
        anyhow::bail!(
            "File must have a .csv, .tsv or .tab extension: {}",
            path.display()
        );
    }

    if !path.exists() {
        anyhow::bail!("File does not exist: {}", path.display());
    }

    Ok(())
}

use anyhow::{Context, Result};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use viroknn_classifiers::io::table_delimiter;
use viroknn_classifiers::pipeline::PipelineOutcome;
use viroknn_classifiers::report::EvaluationReport;

/// Write the evaluation report as pretty JSON.
pub fn write_report_json<P: AsRef<Path>>(report: &EvaluationReport, output_path: P) -> Result<()> {
    let path = output_path.as_ref();
    let file = File::create(path).with_context(|| format!("Failed to create report file: {:?}", path))?;
    serde_json::to_writer_pretty(BufWriter::new(file), report)
        .with_context(|| format!("Failed to write report: {:?}", path))?;
    Ok(())
}

/// Write one row per test sample. Tab separated for `.tsv`/`.tab`, comma
/// separated otherwise.
pub fn write_predictions<P: AsRef<Path>>(outcome: &PipelineOutcome, output_path: P) -> Result<()> {
    let path = output_path.as_ref();
    let delimiter = table_delimiter(path).unwrap_or(b',');

    let file = File::create(path).with_context(|| format!("Failed to create output file: {:?}", path))?;
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(BufWriter::new(file));

    writer.write_record(["sample_index", "true_label", "predicted_label", "vote_fraction"])?;

    let rows = outcome
        .split
        .test_indices
        .iter()
        .zip(outcome.y_test())
        .zip(outcome.predictions.iter().zip(&outcome.vote_fractions));
    for ((index, truth), (predicted, fraction)) in rows {
        writer.write_record(&[
            index.to_string(),
            truth.to_string(),
            predicted.to_string(),
            format!("{:.4}", fraction),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

//! The `classify` subcommand: read a feature table, run the k-NN pipeline and
//! hand the results to the writers.
pub mod input;
pub mod output;
pub mod prompt;

use anyhow::{Context, Result};

use viroknn_classifiers::io::read_feature_table;
use viroknn_classifiers::pipeline::run_pipeline;
use viroknn_classifiers::report::EvaluationReport;

use crate::classify::input::ClassifyConfig;
use crate::classify::output::{write_predictions, write_report_json};

pub fn run_classify(config: &ClassifyConfig) -> Result<EvaluationReport> {
    let table = read_feature_table(&config.data_path, &config.pipeline.label_column)?;
    log::info!(
        "[viroknn::classify] Loaded {} samples from {:?}",
        table.dataset.n_samples(),
        config.data_path
    );

    let outcome = run_pipeline(&table.dataset, &config.pipeline).context("k-NN pipeline failed")?;
    let report = EvaluationReport::new(&outcome, &config.pipeline);

    if let Some(path) = &config.report_path {
        write_report_json(&report, path)?;
        log::info!("[viroknn::classify] Report written to {:?}", path);
    }
    if let Some(path) = &config.predictions_path {
        write_predictions(&outcome, path)?;
        log::info!("[viroknn::classify] Predictions written to {:?}", path);
    }

    Ok(report)
}

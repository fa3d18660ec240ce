use anyhow::{Context, Result};
use clap::ArgMatches;
use std::fs;
use std::path::{Path, PathBuf};

use viroknn_classifiers::config::{DistanceMetric, PipelineConfig, RocScoreSource};

use crate::classify::prompt::parse_test_fraction;
use crate::util::validate_tsv_or_csv_file;

/// Everything the `classify` subcommand needs, after merging the JSON config
/// file with command line overrides.
#[derive(Debug, Clone)]
pub struct ClassifyConfig {
    pub data_path: PathBuf,
    pub pipeline: PipelineConfig,
    pub report_path: Option<PathBuf>,
    pub predictions_path: Option<PathBuf>,
    /// Ask for the test fraction on stdin.
    pub interactive: bool,
    /// No config file was given.
    pub using_defaults: bool,
}

/// Load a pipeline configuration from a JSON file.
///
/// Fields that are missing or hold an invalid value keep their default.
pub fn load_pipeline_config<P: AsRef<Path>>(path: P) -> Result<PipelineConfig> {
    let path = path.as_ref();
    let config_json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let partial: serde_json::Value = serde_json::from_str(&config_json)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

    let mut config = PipelineConfig::default();

    macro_rules! load_or_default {
        ($field:ident) => {
            if let Some(val) = partial.get(stringify!($field)) {
                if let Ok(parsed) = serde_json::from_value(val.clone()) {
                    config.$field = parsed;
                } else {
                    log::warn!(
                        "Config Invalid value for '{}', using default: {:?}",
                        stringify!($field),
                        config.$field
                    );
                }
            } else {
                log::debug!(
                    "Config Missing field '{}', using default: {:?}",
                    stringify!($field),
                    config.$field
                );
            }
        };
    }

    load_or_default!(test_fraction);
    load_or_default!(seed);
    load_or_default!(metric);
    load_or_default!(k);
    load_or_default!(roc_scores);
    load_or_default!(label_column);
    load_or_default!(target_names);

    Ok(config)
}

impl ClassifyConfig {
    pub fn from_arguments(matches: &ArgMatches) -> Result<Self> {
        let data_path = matches
            .get_one::<PathBuf>("data")
            .cloned()
            .context("Missing input feature table")?;
        validate_tsv_or_csv_file(&data_path)?;

        let config_path = matches.get_one::<PathBuf>("config");
        let mut pipeline = match config_path {
            Some(path) => load_pipeline_config(path)?,
            None => PipelineConfig::default(),
        };

        // Apply CLI overrides
        if let Some(raw) = matches.get_one::<String>("test_fraction") {
            pipeline.test_fraction = parse_test_fraction(raw).map_err(anyhow::Error::msg)?;
        }
        if let Some(seed) = matches.get_one::<u64>("seed") {
            pipeline.seed = *seed;
        }
        if let Some(metric) = matches.get_one::<String>("metric") {
            pipeline.metric = metric.parse::<DistanceMetric>().map_err(anyhow::Error::msg)?;
        }
        if let Some(k) = matches.get_one::<usize>("k") {
            pipeline.k = Some(*k);
        }
        if let Some(source) = matches.get_one::<String>("roc_scores") {
            pipeline.roc_scores = source.parse::<RocScoreSource>().map_err(anyhow::Error::msg)?;
        }
        if let Some(column) = matches.get_one::<String>("label_column") {
            pipeline.label_column = column.clone();
        }

        Ok(ClassifyConfig {
            data_path,
            pipeline,
            report_path: matches.get_one::<PathBuf>("report").cloned(),
            predictions_path: matches.get_one::<PathBuf>("predictions").cloned(),
            interactive: matches.get_flag("interactive"),
            using_defaults: config_path.is_none(),
        })
    }
}

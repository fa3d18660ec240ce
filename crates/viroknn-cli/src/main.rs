use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use log::LevelFilter;
use std::io;
use std::path::PathBuf;

use viroknn_classifiers::config::PipelineConfig;
use viroknn_cli::classify::input::ClassifyConfig;
use viroknn_cli::classify::prompt::prompt_test_fraction;
use viroknn_cli::classify::run_classify;

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("VIROKNN_LOG", "error,viroknn=info"))
        .init();

    let matches = Command::new("viroknn")
        .version(clap::crate_version!())
        .about("k-Nearest-Neighbours classification of H1N1 and SARS-CoV-2 genome feature vectors")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("classify")
                .about("Split a feature table, fit the k-NN classifier and evaluate it")
                .arg(
                    Arg::new("data")
                        .help("Path to the feature table (.csv or .tsv) with a 0/1 label column")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("config")
                        .short('c')
                        .long("config")
                        .help("Path to a JSON pipeline configuration file")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("test_fraction")
                        .short('t')
                        .long("test-fraction")
                        .help(
                            "Share of samples held out for testing, between 0 and 1. \
                             Overrides the configuration file.",
                        ),
                )
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .help("Seed of the train/test shuffle")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    Arg::new("metric")
                        .short('m')
                        .long("metric")
                        .help("Distance metric: manhattan, euclidean or chebyshev"),
                )
                .arg(
                    Arg::new("k")
                        .short('k')
                        .help("Number of neighbors. Defaults to ceil(sqrt(n_samples)).")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    Arg::new("roc_scores")
                        .long("roc-scores")
                        .help("Scores used for the ROC curve: labels or vote_fraction"),
                )
                .arg(
                    Arg::new("label_column")
                        .long("label-column")
                        .value_parser(clap::builder::NonEmptyStringValueParser::new())
                        .help("Name of the label column in the feature table"),
                )
                .arg(
                    Arg::new("report")
                        .short('r')
                        .long("report")
                        .help("Write the evaluation report as JSON to this path")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("predictions")
                        .short('p')
                        .long("predictions")
                        .help("Write per-sample predictions (CSV or TSV) to this path")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("interactive")
                        .short('i')
                        .long("interactive")
                        .help("Ask for the test fraction on stdin")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("config").about("Print the default pipeline configuration as JSON"),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("classify", classify_matches)) => handle_classify(classify_matches),
        Some(("config", _)) => {
            println!("{}", serde_json::to_string_pretty(&PipelineConfig::default())?);
            Ok(())
        }
        _ => unreachable!("Subcommand is required by CLI configuration"),
    }
}

fn handle_classify(matches: &ArgMatches) -> Result<()> {
    let mut config = ClassifyConfig::from_arguments(matches)?;

    if config.using_defaults {
        let default_json = serde_json::to_string_pretty(&config.pipeline).unwrap_or_default();
        eprintln!(
            "[viroknn::classify] No config provided; using:\n{}",
            default_json
        );
    }

    if config.interactive {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        config.pipeline.test_fraction = prompt_test_fraction(&mut stdin.lock(), &mut stdout)?;
    }

    println!("\nK-Nearest-Neighbours Classifier\n");
    match run_classify(&config) {
        Ok(report) => {
            print!("{}", report);
            Ok(())
        }
        Err(e) => {
            log::error!("Classification failed: {:#}", e);
            Err(e)
        }
    }
}

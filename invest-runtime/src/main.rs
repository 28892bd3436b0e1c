use anyhow::{anyhow, Result};
use clap::{arg, ArgAction, ArgMatches, Command};
use invest_algorithms::{Algorithm, Interrupt, Outcome, SolveError};
use invest_catalog::{
    compare,
    ingest::{load_catalog, write_catalog},
    Instance, Track,
};
use invest_structs::{
    config::{RunSettings, DEFAULT_BUDGET, DEFAULT_DATA_DIR},
    core::OutputData,
};
use invest_utils::{compress_obj, jsonify, jsonify_pretty, load_json_arg, u8s_from_str, Amount};
use std::{
    fs::{self, File},
    io,
    path::{Path, PathBuf},
    time::{Duration, Instant},
};
use tracing::{info, warn};

mod reference;
mod report;

use reference::ReferenceReport;
use report::{comparison_table, delta_lines, selection_table, ComparisonRow};

/// Largest absolute profit difference still treated as agreement.
const AGREEMENT_TOLERANCE: f64 = 1e-6;

fn dataset_args(command: Command) -> Command {
    command.arg(
        arg!(--"data-dir" [DIR] "Directory holding <name>.csv datasets")
            .default_value(DEFAULT_DATA_DIR)
            .value_parser(clap::value_parser!(PathBuf)),
    )
}

fn cli() -> Command {
    Command::new("invest-runtime")
        .about("Selects the most profitable set of investments under a budget")
        .arg_required_else_help(true)
        .subcommand(dataset_args(
            Command::new("compute_solution")
                .about("Computes a selection with one algorithm")
                .arg(
                    arg!([DATASET] "Dataset name or path to a csv file")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!([BUDGET] "Budget in euros (default 500)")
                        .value_parser(clap::value_parser!(f64)),
                )
                .arg(
                    arg!(--algorithm [ALGORITHM] "brute_force, dynamic or rolling")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(--settings [SETTINGS] "Settings json string or path to json file")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(--"timeout-ms" [MS] "Interrupts the search after this many milliseconds")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    arg!(--output [OUTPUT_FILE] "If set, the output data will be saved to this file path (default json)")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(--compress [COMPRESS] "If output file is set, the output data will be compressed as zlib")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    arg!(--pretty [PRETTY] "If output file is set and not compressed, the json is indented")
                        .action(ArgAction::SetTrue),
                ),
        ))
        .subcommand(dataset_args(
            Command::new("cross_check")
                .about("Runs the exhaustive and dynamic solvers and compares their profits")
                .arg(
                    arg!(<DATASET> "Dataset name or path to a csv file")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!([BUDGET] "Budget in euros (default 500)")
                        .value_parser(clap::value_parser!(f64)),
                )
                .arg(
                    arg!(--"timeout-ms" [MS] "Interrupts the exhaustive search after this many milliseconds")
                        .value_parser(clap::value_parser!(u64)),
                ),
        ))
        .subcommand(dataset_args(
            Command::new("compare")
                .about("Compares the dynamic solver against a reference report")
                .arg(
                    arg!(<DATASET> "Dataset name or path to a csv file")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(<REFERENCE> "Path to a reference report")
                        .value_parser(clap::value_parser!(PathBuf)),
                ),
        ))
        .subcommand(
            Command::new("generate")
                .about("Writes a synthetic catalog in the name,price,profit layout")
                .arg(arg!(<NUM_ITEMS> "Number of items").value_parser(clap::value_parser!(usize)))
                .arg(
                    arg!(<SEED> "A string used in seed generation")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(--output [OUTPUT_FILE] "If set, the catalog is written to this file path")
                        .value_parser(clap::value_parser!(PathBuf)),
                ),
        )
}

fn main() {
    init_logging();
    let matches = cli().get_matches();

    if let Err(e) = match matches.subcommand() {
        Some(("compute_solution", sub_m)) => compute_solution(sub_m),
        Some(("cross_check", sub_m)) => cross_check(
            sub_m.get_one::<String>("DATASET").unwrap().clone(),
            sub_m.get_one::<f64>("BUDGET").cloned(),
            sub_m.get_one::<u64>("timeout-ms").cloned(),
            sub_m.get_one::<PathBuf>("data-dir").unwrap(),
        ),
        Some(("compare", sub_m)) => compare_reference(
            sub_m.get_one::<String>("DATASET").unwrap().clone(),
            sub_m.get_one::<PathBuf>("REFERENCE").unwrap(),
            sub_m.get_one::<PathBuf>("data-dir").unwrap(),
        ),
        Some(("generate", sub_m)) => generate(
            *sub_m.get_one::<usize>("NUM_ITEMS").unwrap(),
            sub_m.get_one::<String>("SEED").unwrap(),
            sub_m.get_one::<PathBuf>("output").cloned(),
        ),
        _ => Err(anyhow!("Invalid subcommand")),
    } {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("invest=info"));

    if std::env::var("INVEST_LOG_JSON").is_ok() {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(io::stderr)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(io::stderr)
            .init();
    }
}

fn timed<T>(f: impl FnOnce() -> T) -> (T, Duration) {
    let start = Instant::now();
    let result = f();
    (result, start.elapsed())
}

fn load_instance(settings: &RunSettings, data_dir: &Path) -> Result<Instance> {
    let path = settings.dataset_path(data_dir);
    let ingested = load_catalog(&path)?;
    info!(
        path = ?path,
        schema = ?ingested.schema,
        items = ingested.catalog.len(),
        rejected = ingested.rejected,
        "Catalog loaded"
    );
    Ok(Instance::new(ingested.catalog, settings.budget()))
}

/// Runs `algorithm`, keeping the last saved selection if the run is
/// interrupted.
fn run(
    algorithm: Algorithm,
    instance: &Instance,
    interrupt: &Interrupt,
    settings: &RunSettings,
) -> Result<(Outcome, bool)> {
    let mut incumbent: Option<Outcome> = None;
    let result = algorithm.solve(instance, interrupt, &settings.hyperparameters, &mut |outcome| {
        incumbent = Some(outcome.clone())
    });
    match result {
        Ok(outcome) => Ok((outcome, false)),
        Err(SolveError::Interrupted { subsets_examined }) => {
            warn!(
                algorithm = algorithm.name(),
                subsets_examined, "Search interrupted, keeping best selection so far"
            );
            let mut outcome = incumbent.unwrap_or_else(|| Outcome {
                selection: Default::default(),
                total_profit: 0.0,
                subsets_examined: None,
                precision_mismatch: None,
            });
            outcome.subsets_examined = Some(subsets_examined);
            Ok((outcome, true))
        }
        Err(e) => Err(e.into()),
    }
}

fn settings_from_args(sub_m: &ArgMatches) -> Result<RunSettings> {
    let mut settings = match sub_m.get_one::<String>("settings") {
        Some(arg) => load_json_arg::<RunSettings>(arg)?,
        None => RunSettings::new(
            sub_m
                .get_one::<String>("DATASET")
                .ok_or_else(|| anyhow!("Either DATASET or --settings is required"))?
                .clone(),
        ),
    };
    if let Some(dataset) = sub_m.get_one::<String>("DATASET") {
        settings.dataset = dataset.clone();
    }
    if let Some(budget) = sub_m.get_one::<f64>("BUDGET") {
        settings.budget = Some(*budget);
    }
    if let Some(algorithm) = sub_m.get_one::<String>("algorithm") {
        settings.algorithm = Some(algorithm.clone());
    }
    if let Some(timeout_ms) = sub_m.get_one::<u64>("timeout-ms") {
        settings.timeout_ms = Some(*timeout_ms);
    }
    Ok(settings)
}

pub fn compute_solution(sub_m: &ArgMatches) -> Result<()> {
    let settings = settings_from_args(sub_m)?;
    let output_file = sub_m.get_one::<PathBuf>("output");
    let compress = sub_m.get_flag("compress");
    let pretty = sub_m.get_flag("pretty");

    let algorithm: Algorithm = settings.algorithm().parse()?;
    let instance = load_instance(&settings, sub_m.get_one::<PathBuf>("data-dir").unwrap())?;
    let interrupt = match settings.timeout() {
        Some(timeout) => Interrupt::never().with_timeout(timeout),
        None => Interrupt::never(),
    };

    info!(
        algorithm = algorithm.name(),
        items = instance.catalog.len(),
        budget = instance.budget,
        "Solving"
    );
    let (result, elapsed) = timed(|| run(algorithm, &instance, &interrupt, &settings));
    let (outcome, interrupted) = result?;
    let summary = instance.verify_selection(&outcome.selection)?;
    info!(
        algorithm = algorithm.name(),
        elapsed_secs = elapsed.as_secs_f64(),
        total_profit = summary.total_profit,
        "Solved"
    );

    print!(
        "{}",
        selection_table(&instance, &outcome.selection, &summary, elapsed)
    );

    let output_data = OutputData {
        algorithm: algorithm.name().to_string(),
        dataset: settings.dataset.clone(),
        budget: instance.exact_budget()?,
        selection: outcome
            .selection
            .identifiers(&instance.catalog)
            .into_iter()
            .map(String::from)
            .collect(),
        total_cost: summary.total_cost,
        total_profit: summary.total_profit,
        elapsed_secs: elapsed.as_secs_f64(),
        subsets_examined: outcome.subsets_examined,
        precision_gap: outcome.precision_mismatch.as_ref().map(|m| m.gap()),
    };
    if let Some(path) = output_file {
        if compress {
            fs::write(path, compress_obj(&output_data)?)?;
        } else if pretty {
            fs::write(path, jsonify_pretty(&output_data)?)?;
        } else {
            fs::write(path, jsonify(&output_data)?)?;
        }
        println!("output_data written to: {:?}", path);
    }

    if interrupted {
        eprintln!("Search interrupted, reported selection may not be optimal");
        std::process::exit(86);
    }
    Ok(())
}

pub fn cross_check(
    dataset: String,
    budget: Option<f64>,
    timeout_ms: Option<u64>,
    data_dir: &Path,
) -> Result<()> {
    let mut settings = RunSettings::new(dataset);
    settings.budget = budget;
    settings.timeout_ms = timeout_ms;
    let instance = load_instance(&settings, data_dir)?;
    let interrupt = match settings.timeout() {
        Some(timeout) => Interrupt::never().with_timeout(timeout),
        None => Interrupt::never(),
    };

    let (exhaustive, exhaustive_elapsed) =
        timed(|| run(Algorithm::BruteForce, &instance, &interrupt, &settings));
    let (exhaustive, interrupted) = exhaustive?;
    let (dynamic, dynamic_elapsed) = timed(|| {
        run(Algorithm::Dynamic, &instance, &Interrupt::never(), &settings)
    });
    let (dynamic, _) = dynamic?;

    let exhaustive_summary = instance.verify_selection(&exhaustive.selection)?;
    let dynamic_summary = instance.verify_selection(&dynamic.selection)?;

    println!("brute_force");
    print!(
        "{}",
        selection_table(&instance, &exhaustive.selection, &exhaustive_summary, exhaustive_elapsed)
    );
    println!();
    println!("dynamic");
    print!(
        "{}",
        selection_table(&instance, &dynamic.selection, &dynamic_summary, dynamic_elapsed)
    );
    println!();

    let delta = compare(&dynamic_summary, &exhaustive_summary);
    print!("{}", delta_lines("brute_force", &delta));

    if interrupted {
        return Err(anyhow!(
            "Exhaustive search was interrupted, profits cannot be cross-checked"
        ));
    }
    if !delta.profit_agrees(AGREEMENT_TOLERANCE) {
        return Err(anyhow!(
            "Profits disagree: dynamic {} vs brute_force {}",
            dynamic_summary.total_profit,
            exhaustive_summary.total_profit
        ));
    }
    println!("Profits agree");
    Ok(())
}

pub fn compare_reference(dataset: String, reference_path: &Path, data_dir: &Path) -> Result<()> {
    let reference = ReferenceReport::load(reference_path)?;
    let mut settings = RunSettings::new(dataset);
    settings.budget = Some(reference.total_cost.to_f64());
    let instance = load_instance(&settings, data_dir)?;

    let (result, elapsed) = timed(|| {
        run(Algorithm::Dynamic, &instance, &Interrupt::never(), &settings)
    });
    let (outcome, _) = result?;
    let summary = instance.verify_selection(&outcome.selection)?;
    let reference_summary = reference.summary();

    let missing: Vec<&str> = reference
        .identifiers
        .iter()
        .map(String::as_str)
        .filter(|id| !instance.catalog.items().iter().any(|item| item.id == *id))
        .collect();
    if !missing.is_empty() {
        warn!(?missing, "Reference selects identifiers absent from the catalog");
    }

    print!(
        "{}",
        comparison_table(&[
            ComparisonRow {
                label: Algorithm::Dynamic.name(),
                elapsed: Some(elapsed),
                summary: &summary,
            },
            ComparisonRow {
                label: "reference",
                elapsed: None,
                summary: &reference_summary,
            },
        ])
    );
    println!();
    print!("{}", delta_lines("reference", &compare(&summary, &reference_summary)));
    Ok(())
}

pub fn generate(num_items: usize, seed: &str, output_file: Option<PathBuf>) -> Result<()> {
    let track = Track {
        num_items,
        budget: DEFAULT_BUDGET,
    };
    let instance = Instance::generate_instance(&u8s_from_str(seed), &track)?;
    let total_cost: Amount = instance.catalog.exact_costs().iter().sum();
    info!(num_items, seed, %total_cost, "Catalog generated");

    match output_file {
        Some(path) => {
            write_catalog(File::create(&path)?, &instance.catalog)?;
            println!("catalog written to: {:?}", path);
        }
        None => write_catalog(io::stdout(), &instance.catalog)?,
    }
    Ok(())
}

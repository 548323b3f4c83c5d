use std::{
    fs::{self, File},
    collections::{HashMap, HashSet},
    path::{Path, PathBuf},
    time::Duration,
};
use benchmark::{
    path_str, props_at_x, xvalues, BenchError, Datatype,
    format::{format_time, format_x, format_xlabel},
    generators::{gen_partitioned, Partitioned},
    harness::{measure, Algorithm},
    schema::*,
};
use clap::Parser;
use colored::*;
use log::{debug, info};
use num::PrimInt;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(default_value = "experiment.toml", long)]
    experiment: PathBuf,
    #[arg(default_value = "results.json", long)]
    out: PathBuf,
    // Ignore --bench provided by cargo.
    #[arg(long, action)]
    bench: bool,
    experiments: Vec<String>,
}

const TARGET_WARMUP: Duration = Duration::from_millis(1000);

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if cfg!(debug_assertions) {
        println!("{}", "warning: running in debug mode".yellow().bold());
    }

    if let Err(e) = bench_from_files(&cli) {
        let msg = format!("error: {}", e);
        println!("{}", msg.red().bold());
        std::process::exit(1);
    }
}

fn bench_from_files(cli: &Cli) -> Result<(), BenchError> {
    let experiment_toml = fs::read_to_string(&cli.experiment)
        .map_err(|source| BenchError::Open {
            path: path_str(&cli.experiment).to_string(),
            source,
        })?;

    let experiment: Experiment = toml::from_str(&experiment_toml)
        .map_err(|source| BenchError::Toml {
            path: path_str(&cli.experiment).to_string(),
            source,
        })?;

    let dataset_algos = gen_dataset_to_algos_map(cli, &experiment)?;

    if dataset_algos.is_empty() {
        return Err(BenchError::NoMatches);
    }

    let results = run_experiments(cli, experiment, dataset_algos)?;

    write_results(results, &cli.out)?;

    Ok(())
}

type AlgorithmSet = HashSet<String>;
/// Map each dataset to algorithms which need to be run on it.
/// This saves us from running multiple dataset/algorithm pairs twice
/// if present in multiple experiments.
fn gen_dataset_to_algos_map(cli: &Cli, experiment: &Experiment)
    -> Result<HashMap<DatasetId, AlgorithmSet>, BenchError>
{
    let mut dataset_algos: HashMap<String, AlgorithmSet> = HashMap::new();
    for e in &experiment.experiment {
        if cli.experiments.is_empty() || cli.experiments.contains(&e.name) {
            if !experiment.dataset.iter().any(|d| d.name == e.dataset) {
                return Err(BenchError::UnknownDataset {
                    experiment: e.name.clone(),
                    dataset: e.dataset.clone(),
                });
            }

            // Reject unknown names before any data is generated.
            for name in &e.algorithms {
                name.parse::<Algorithm>()?;
            }

            dataset_algos
                .entry(e.dataset.clone())
                .or_default()
                .extend(e.algorithms.iter().cloned());
        }
    }
    Ok(dataset_algos)
}

fn run_experiments(
    cli: &Cli,
    experiment: Experiment,
    dataset_algos: HashMap<DatasetId, AlgorithmSet>)
    -> Result<Results, BenchError>
{
    let mut results =
        HashMap::<DatasetId, DatasetResults>::new();

    for dataset in &experiment.dataset {
        if let Some(algos) = dataset_algos.get(&dataset.name) {
            let dataset_results = DatasetResults{
                info: dataset.clone(),
                algos: run_dataset_benchmarks(dataset, algos)?,
            };
            results.insert(dataset.name.clone(), dataset_results);
        }
    }

    let experiments = if !cli.experiments.is_empty() {
        experiment.experiment
            .into_iter()
            .filter(|e| cli.experiments.contains(&e.name))
            .collect()
    } else {
        experiment.experiment
    };

    Ok(Results{
        experiments,
        datasets: results,
    })
}

fn run_dataset_benchmarks(info: &DatasetInfo, algos: &AlgorithmSet)
    -> Result<AlgorithmResults, BenchError>
{
    if info.gen_count == 0 {
        return Err(BenchError::InvalidDataset {
            name: info.name.clone(),
            reason: "gen_count must be at least 1".to_string(),
        });
    }

    match info.datatype {
        Datatype::U32 => run_typed::<u32>(info, algos),
        Datatype::U64 => run_typed::<u64>(info, algos),
        Datatype::I32 => run_typed::<i32>(info, algos),
        Datatype::I64 => run_typed::<i64>(info, algos),
    }
}

fn run_typed<T: PrimInt>(info: &DatasetInfo, algos: &AlgorithmSet)
    -> Result<AlgorithmResults, BenchError>
{
    println!("{}", &info.name.green().bold());
    info!("dataset {} varies {}", info.name, format_xlabel(info.vary));

    let mut rng = ChaCha8Rng::seed_from_u64(info.seed);

    let mut algorithm_results: AlgorithmResults =
        algos.iter().map(|a| (a.clone(), Vec::new())).collect();

    for x in xvalues(info) {
        let xlabel = format!("[{}: {:>6}]", format_xlabel(info.vary), format_x(x, info));
        println!("{}", xlabel.bold());

        let props = props_at_x(info, x);
        let data: Vec<Partitioned<T>> = (0..info.gen_count)
            .map(|_| gen_partitioned(&props, info.datatype, &mut rng))
            .collect::<Result<_, _>>()?;
        debug!("generated {} slices of {} bytes each",
            data.len(), data[0].set.len() * info.datatype.bytes());

        for (name, runs) in &mut algorithm_results {
            let algorithm: Algorithm = name.parse()?;
            let run = time_algorithm_on_x(x, algorithm, &data)?;

            let mean = run.times.iter().sum::<u64>() / run.times.len().max(1) as u64;
            println!("  {:<28} {}", name, format_time(mean));

            runs.push(run);
        }
    }
    Ok(algorithm_results)
}

fn time_algorithm_on_x<T: PrimInt>(
    x: u32,
    algorithm: Algorithm,
    data: &[Partitioned<T>])
    -> Result<ResultRun, BenchError>
{
    let mut result = ResultRun::new(x);

    let warmup = TARGET_WARMUP.div_f32(data.len() as f32);

    for partitioned in data {
        let measurement = measure(algorithm, warmup, partitioned)?;
        result.times.push(measurement.time.as_nanos() as u64);
        result.comparisons.push(measurement.comparisons);
    }

    Ok(result)
}

fn write_results(results: Results, path: &Path) -> Result<(), BenchError> {
    let results_file = File::options()
        .write(true).create(true).truncate(true)
        .open(path)
        .map_err(|source| BenchError::Open {
            path: path_str(path).to_string(),
            source,
        })?;

    serde_json::to_writer(results_file, &results)
        .map_err(|source| BenchError::Write {
            path: path_str(path).to_string(),
            source,
        })?;

    println!("{}", format!("wrote {}", path_str(path)).green());
    Ok(())
}

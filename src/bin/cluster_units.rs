use std::path::PathBuf;
use std::process;
use std::time::Instant;
use clap::Parser;
use log::{error, info};
use plantmerge::{
    cluster_units,
    io::{load_unit_table, save_mapping, save_unit_table},
    utils::init_logging,
    ClusteringMethod,
    IntegerRounding,
    PlantMergeConfig,
    Result,
};

/// Merge similar power plant units into a smaller unit table.
#[derive(Parser, Debug)]
#[command(name = "cluster_units", version)]
struct Args {
    /// INI file with [file], [clustering] and [logging] sections
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Unit table to cluster (CSV)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Where to write the merged unit table (CSV)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Where to write the original/merged mapping (JSON)
    #[arg(long)]
    mapping: Option<PathBuf>,

    /// Standard, MILP, LP clustered, LP, Integer clustering or No clustering
    #[arg(short, long)]
    method: Option<String>,

    #[arg(long)]
    nslices: Option<usize>,

    #[arg(long)]
    part_load_max: Option<f64>,

    #[arg(long)]
    pmax: Option<f64>,

    /// per_row or legacy
    #[arg(long)]
    integer_rounding: Option<String>,

    /// error, warn, info, debug, trace or none
    #[arg(long)]
    log_level: Option<String>,
}

impl Args {
    /// Layers command line values over the loaded configuration.
    fn apply(self, config: &mut PlantMergeConfig) -> Result<()> {
        if let Some(input) = self.input {
            config.files.input = input;
        }
        if let Some(output) = self.output {
            config.files.output = output;
        }
        if let Some(mapping) = self.mapping {
            config.files.mapping = mapping;
        }
        if let Some(method) = self.method {
            config.clustering.method = method.parse::<ClusteringMethod>()?;
        }
        if let Some(nslices) = self.nslices {
            config.clustering.nslices = nslices;
        }
        if let Some(part_load_max) = self.part_load_max {
            config.clustering.part_load_max = part_load_max;
        }
        if let Some(pmax) = self.pmax {
            config.clustering.pmax = pmax;
        }
        if let Some(rounding) = self.integer_rounding {
            config.clustering.integer_rounding = rounding.parse::<IntegerRounding>()?;
        }
        if let Some(level) = self.log_level {
            config.logging.level = level;
        }
        Ok(())
    }
}

fn run(args: Args) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => PlantMergeConfig::from_ini(path)?,
        None => PlantMergeConfig::default(),
    };
    args.apply(&mut config)?;

    init_logging(&config.logging, None)?;
    config.validate()?;

    info!(
        "Clustering {:?} with method '{}' (nslices={}, part_load_max={}, pmax={}, rounding={})",
        config.files.input,
        config.clustering.method,
        config.clustering.nslices,
        config.clustering.part_load_max,
        config.clustering.pmax,
        config.clustering.integer_rounding.as_str()
    );
    let start = Instant::now();

    let table = load_unit_table(&config.files.input)?;
    let outcome = cluster_units(&table, &config.clustering)?;
    outcome.diagnostics.emit();

    save_unit_table(&outcome.table, &config.files.output)?;
    save_mapping(&outcome.mapping, &config.files.mapping)?;

    info!(
        "Finished in {:.2?}: {} units in, {} units out",
        start.elapsed(),
        table.len(),
        outcome.table.len()
    );
    Ok(())
}

fn main() {
    let args = Args::parse();
    if let Err(e) = run(args) {
        error!("{}", e);
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

use anyhow::Result;
use clap::Parser;
use rayon::prelude::*;

mod analysis;
mod community;
mod config;
mod data;
mod error;
mod graph;
mod metrics;
mod profile;
mod storage;

use config::AnalyzerConfig;

#[derive(Parser, Debug)]
#[clap(
    name = "sociogram-analyzer",
    about = "Sociogram analysis of close-friend survey rosters"
)]
struct Cli {
    /// Path to the roster CSV export
    #[clap(long)]
    input: String,

    /// Output directory for results
    #[clap(long, default_value = "sociogram_results")]
    output_dir: String,

    /// Maximum nominations per respondent (metric denominators)
    #[clap(long, default_value = "3")]
    nomination_cap: usize,

    /// Minimum in-degree for the Star profile
    #[clap(long, default_value = "4")]
    star_threshold: usize,

    /// Minimum reciprocal same-community ties for the Cliques profile
    #[clap(long, default_value = "2")]
    clique_threshold: usize,

    /// Minimum distinct nominee communities for the Interconnector profile
    #[clap(long, default_value = "3")]
    interconnector_threshold: usize,

    /// Hop limit for the Speed of Communication metric
    #[clap(long, default_value = "3")]
    broadcast_radius: usize,

    /// Number of worker threads (0 = use all available cores)
    #[clap(long, default_value = "0")]
    threads: usize,

    /// Verbose logging
    #[clap(long, short)]
    verbose: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Cli::parse();

    // Configure logging
    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp_millis()
        .init();

    // Set number of threads
    let num_threads = if args.threads > 0 {
        args.threads
    } else {
        // If threads = 0, use all available cores
        num_cpus::get()
    };

    log::info!("Using {} worker threads", num_threads);
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()?;

    log::info!("Starting sociogram analysis");
    log::info!("Input: {}", args.input);
    log::info!("Output: {}", args.output_dir);

    let config = AnalyzerConfig::new(
        args.nomination_cap,
        args.star_threshold,
        args.clique_threshold,
        args.interconnector_threshold,
        args.broadcast_radius,
    );

    // 1. Load the roster and split it into groups
    let rows = data::csv::load_roster(&args.input)?;
    let groups = data::split_groups(&rows);

    log::info!("Loaded {} rows across {} group(s)", rows.len(), groups.len());

    // 2. Analyze groups in parallel; each group's state is entirely local,
    //    row validation happens per group, and one group's failure must
    //    not abort the others
    let outcomes: Vec<(String, Result<analysis::GroupAnalysis, error::AnalysisError>)> = groups
        .par_iter()
        .map(|(group, group_rows)| {
            (group.clone(), analysis::analyze_group(group, group_rows, &config))
        })
        .collect();

    let mut analyses = Vec::new();
    let mut failures = Vec::new();
    for (group, outcome) in outcomes {
        match outcome {
            Ok(analysis) => analyses.push(analysis),
            Err(err) => {
                log::error!("Group '{}' failed: {}", group, err);
                failures.push((group, err.to_string()));
            }
        }
    }

    // 3. Save results
    storage::save_results(&analyses, &failures, &args.output_dir)?;

    log::info!(
        "Analysis complete: {} group(s) succeeded, {} failed. Results saved to {}",
        analyses.len(),
        failures.len(),
        args.output_dir
    );

    Ok(())
}

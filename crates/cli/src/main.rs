use anyhow::{Context, Result};
use cadastre_graph::{
    ExchangeSuggestionEngine, GeoOracle, GraphBuilder, LocationFilter, OwnerGraph, OwnerId,
};
use clap::{Args, Parser, Subcommand};
use config::CadastreConfig;
use report::{AreaReport, SuggestionReport};
use std::collections::BTreeMap;
use std::env;
use std::path::PathBuf;

mod config;
mod import;
mod report;

#[derive(Parser)]
#[command(name = "cadastre")]
#[command(about = "Parcel adjacency, average areas and exchange suggestions", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Parcel file (JSON array of parcel records), required by every command
    #[arg(long, global = true)]
    parcels: Option<PathBuf>,

    /// Config file (defaults to ./cadastre.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Compare every parcel pair instead of pre-filtering with an R-tree
    #[arg(long, global = true)]
    no_spatial_index: bool,

    /// Evaluate parcel pairs on a single thread
    #[arg(long, global = true)]
    sequential: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show parcel and owner graph sizes
    Stats(StatsArgs),

    /// Average area within a district / municipality / county
    #[command(name = "average-area")]
    AverageArea(AverageAreaArgs),

    /// Rank parcel exchanges between neighboring owners
    Suggest(SuggestArgs),
}

#[derive(Args)]
struct StatsArgs {
    /// Output JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct AverageAreaArgs {
    #[arg(long)]
    district: Option<String>,

    #[arg(long)]
    municipality: Option<String>,

    #[arg(long)]
    county: Option<String>,

    /// Average parcels instead of merged owner holdings
    #[arg(long)]
    plain: bool,

    /// Output JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct SuggestArgs {
    /// Maximum number of suggestions (overrides config)
    #[arg(long)]
    limit: Option<usize>,

    /// Output JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let mut cli = Cli::parse();

    // Keep stdout clean for JSON consumers
    let json_output = match &cli.command {
        Commands::Stats(args) => args.json,
        Commands::AverageArea(args) => args.json,
        Commands::Suggest(args) => args.json,
    };
    if json_output {
        cli.quiet = true;
    }

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let workdir = env::current_dir().context("Cannot determine working directory")?;
    let mut config = CadastreConfig::load(cli.config.as_deref(), &workdir)?;
    if cli.no_spatial_index {
        config.build.spatial_index = false;
    }
    if cli.sequential {
        config.build.parallel = false;
    }

    let parcels_path = cli
        .parcels
        .as_deref()
        .context("Missing --parcels <file.json>")?;
    let parcels = import::load_parcels(parcels_path)?;
    let graph = GraphBuilder::new(GeoOracle::new())
        .with_options(config.build)
        .build_owner_graph(&parcels)
        .context("Failed to build parcel graphs")?;

    let output = match cli.command {
        Commands::Stats(args) => run_stats(&graph, &args)?,
        Commands::AverageArea(args) => run_average_area(&graph, args)?,
        Commands::Suggest(args) => run_suggest(&graph, &args, &config)?,
    };
    print!("{output}");
    if json_output {
        println!();
    }

    Ok(())
}

fn run_stats(graph: &OwnerGraph<'_>, args: &StatsArgs) -> Result<String> {
    let stats = graph.stats();
    if args.json {
        report::to_json(&stats)
    } else {
        Ok(report::render_stats(&stats))
    }
}

fn run_average_area(graph: &OwnerGraph<'_>, args: AverageAreaArgs) -> Result<String> {
    let filter = LocationFilter {
        district: args.district,
        municipality: args.municipality,
        county: args.county,
    };

    let statistics = if args.plain {
        graph.parcel_graph().area_statistics(&filter)?
    } else {
        graph.area_statistics(&filter)?
    };
    let area = AreaReport {
        filter: &filter,
        merged: !args.plain,
        statistics,
    };

    if args.json {
        report::to_json(&area)
    } else {
        Ok(report::render_area(&area))
    }
}

fn run_suggest(graph: &OwnerGraph<'_>, args: &SuggestArgs, config: &CadastreConfig) -> Result<String> {
    let limit = args.limit.unwrap_or(config.suggestion_limit);
    let engine = ExchangeSuggestionEngine::new(graph);
    let suggestions = engine.generate_suggestions(limit)?;
    log::info!("Found {} exchange suggestions", suggestions.len());

    let holdings: BTreeMap<OwnerId, usize> = suggestions
        .iter()
        .flat_map(|s| [s.first.owner, s.second.owner])
        .map(|owner| (owner, engine.holding(owner).len()))
        .collect();
    let suggestions = SuggestionReport {
        limit,
        suggestions: suggestions.iter().map(|s| s.summary()).collect(),
        holdings,
    };

    if args.json {
        report::to_json(&suggestions)
    } else {
        Ok(report::render_suggestions(&suggestions))
    }
}

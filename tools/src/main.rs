//! lab-runner: headless runner for the climate alert experiment lab.
//!
//! Usage:
//!   lab-runner generate --count 500 --seed 42 --data-dir ./data
//!   lab-runner list --segment farmers --sort expected_roi --limit 10
//!   lab-runner show EXP_0042
//!   lab-runner serve            (JSON lines on stdin/stdout)

mod ipc;
mod print;

use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use climate_lab_core::{
    bootstrap,
    export::export_csv,
    query::{self, ExperimentFilter, Query, SortKey, SortOrder},
    types::Priority,
    DomainConfig, ExperimentCatalog, ExperimentGenerator, Snapshot, SnapshotFiles,
};
use std::path::PathBuf;

/// Budget ceiling for the "low-cost, high-priority" analysis view.
const LOW_COST_BUDGET_NGN: u64 = 200_000;

#[derive(Parser)]
#[command(name = "lab-runner")]
#[command(about = "Generate, inspect and serve synthetic climate-alert experiments")]
#[command(long_about = None)]
struct Cli {
    #[command(flatten)]
    run: RunArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone, Debug)]
struct RunArgs {
    /// Directory holding the experiment and summary snapshots
    #[arg(long, env = "LAB_DATA_DIR", default_value = "./data", global = true)]
    data_dir: PathBuf,

    /// Master seed for generation
    #[arg(long, env = "LAB_SEED", default_value_t = 42, global = true)]
    seed: u64,

    /// Number of experiments to generate
    #[arg(long, env = "LAB_COUNT", default_value_t = 500, global = true)]
    count: usize,

    /// Directory containing a domains.json that replaces the built-in domains
    #[arg(long, env = "LAB_DOMAINS_DIR", global = true)]
    domains: Option<PathBuf>,
}

#[derive(Args, Clone, Debug)]
struct FilterArgs {
    #[arg(long)]
    segment: Option<String>,

    #[arg(long)]
    region: Option<String>,

    #[arg(long)]
    event: Option<String>,

    #[arg(long)]
    channel: Option<String>,

    #[arg(long)]
    priority: Option<Priority>,

    /// expected_roi | cost_estimate_ngn | sample_size (anything else keeps creation order)
    #[arg(long)]
    sort: Option<String>,

    /// desc (default) or asc
    #[arg(long, default_value = "desc")]
    order: String,

    /// Print at most this many experiments
    #[arg(long)]
    limit: Option<usize>,
}

impl FilterArgs {
    fn to_query(&self) -> Query {
        let filter = ExperimentFilter {
            user_segment: self.segment.clone(),
            region: self.region.clone(),
            climate_event: self.event.clone(),
            alert_channel: self.channel.clone(),
            priority: self.priority,
        };
        let mut query = Query::new(filter);
        if let Some(key) = self.sort.as_deref().and_then(SortKey::parse) {
            query = query.sorted_by(key, SortOrder::parse(&self.order));
        }
        query
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a fresh batch, replacing any existing snapshot
    Generate,

    /// Print the rollup summary
    Summary,

    /// List experiments matching the given filters
    List(FilterArgs),

    /// Show one experiment by id
    Show { id: String },

    /// Print the standard analysis views
    Analyze,

    /// Export the batch as CSV
    Export {
        #[arg(long, short = 'o', default_value = "climate_experiments.csv")]
        out: PathBuf,
    },

    /// Validate every stored experiment against the domain config
    Check,

    /// Answer JSON-line requests on stdin until EOF or quit
    Serve,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.run.domains {
        Some(dir) => DomainConfig::load(&dir.to_string_lossy())?,
        None => DomainConfig::standard(),
    };
    let generator = ExperimentGenerator::new(config, cli.run.seed)?;
    let files = SnapshotFiles::in_dir(&cli.run.data_dir);

    if let Commands::Generate = cli.command {
        let snapshot = Snapshot::generate(&generator, cli.run.count)?;
        files.save(&snapshot)?;
        print::banner(&cli.run.data_dir, cli.run.seed, cli.run.count);
        print::summary(snapshot.summary());
        print::samples(snapshot.records(), 3);
        return Ok(());
    }

    let (snapshot, decision) = bootstrap(&files, &generator, cli.run.count)?;
    log::info!("startup: {decision}");
    let mut catalog = ExperimentCatalog::new(snapshot);

    match cli.command {
        Commands::Generate => unreachable!("handled above"),
        Commands::Summary => print::summary(catalog.snapshot().summary()),
        Commands::List(args) => {
            let snapshot = catalog.snapshot();
            let mut results = snapshot.query(&args.to_query());
            let matched = results.len();
            if let Some(limit) = args.limit {
                results.truncate(limit);
            }
            for exp in &results {
                print::experiment(exp);
            }
            println!("\n{matched} of {} experiments matched", snapshot.len());
        }
        Commands::Show { id } => match catalog.snapshot().experiment(&id) {
            Some(exp) => print::experiment(exp),
            None => bail!("Experiment not found: {id}"),
        },
        Commands::Analyze => analyze(&catalog.snapshot()),
        Commands::Export { out } => {
            let rows = export_csv(catalog.snapshot().records(), &out)?;
            println!("Exported {rows} experiments to {}", out.display());
        }
        Commands::Check => check(&catalog.snapshot(), generator.config())?,
        Commands::Serve => {
            let mut session = ipc::Session::new(&mut catalog, &files, &generator, cli.run.count);
            let stdin = std::io::stdin();
            session.run(stdin.lock(), std::io::stdout())?;
        }
    }
    Ok(())
}

fn analyze(snapshot: &Snapshot) {
    let records = snapshot.records();

    print::heading("TOP 5 HIGHEST ROI EXPERIMENTS");
    for exp in query::top_by_roi(records, 5) {
        print::experiment(exp);
    }

    print::heading("FARMER-FOCUSED EXPERIMENTS (Sample)");
    let farmers = Query::new(ExperimentFilter {
        user_segment: Some("farmers".into()),
        ..Default::default()
    })
    .apply(records);
    println!("\nTotal farmer experiments: {}", farmers.len());
    for exp in farmers.iter().take(3) {
        print::experiment(exp);
    }

    print::heading("LOW-COST, HIGH-PRIORITY EXPERIMENTS");
    let cheap_urgent = query::high_priority(query::within_budget(records, LOW_COST_BUDGET_NGN));
    println!(
        "\nFound {} experiments under {} with high priority",
        cheap_urgent.len(),
        print::naira(LOW_COST_BUDGET_NGN)
    );
    for exp in cheap_urgent.iter().take(3) {
        print::experiment(exp);
    }

    print::heading("LAGOS REGION EXPERIMENTS");
    let lagos = Query::new(ExperimentFilter {
        region: Some("Lagos".into()),
        ..Default::default()
    })
    .apply(records);
    println!("\nTotal Lagos experiments: {}", lagos.len());
    for exp in lagos.iter().take(2) {
        print::experiment(exp);
    }
}

fn check(snapshot: &Snapshot, config: &DomainConfig) -> Result<()> {
    let mut violations = 0usize;
    for record in snapshot.records() {
        if let Err(e) = config.validate_record(record) {
            violations += 1;
            log::warn!("{e}");
            println!("  {e}");
        }
    }
    if violations > 0 {
        bail!("{violations} of {} experiments violate the domain config", snapshot.len());
    }
    println!("All {} experiments are within their domains", snapshot.len());
    Ok(())
}

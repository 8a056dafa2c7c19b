//! Recbench Evaluation Tool
//!
//! Scores baseline recommenders on logged news interactions with the full
//! recbench metric set: precision/recall@k, ranking AUC, coverage, novelty.
//!
//! # Data
//!
//! The tool reads a test log and a training log from one data directory
//! (`--data-dir`, `$RECBENCH_DATA_DIR`, or the bundled `data/` sample).
//! Logs are JSON Lines or TSV, picked by file extension.
//!
//! # Usage
//!
//! ```bash
//! # Run against the bundled sample
//! cargo run -p recbench-eval --release
//!
//! # Output JSON for analysis
//! cargo run -p recbench-eval --release -- --json
//!
//! # Only the popularity baseline, k=10, on a custom dataset
//! cargo run -p recbench-eval --release -- --systems popular -k 10 --data-dir ~/mind
//! ```

mod baselines;
mod config;
mod datasets;
mod sampling;

use anyhow::{Context, Result};
use baselines::{Baseline, SystemKind};
use clap::Parser;
use config::{find_data_dir, DEFAULT_TEST_FILE, DEFAULT_TRAIN_FILE};
use datasets::{load_dataset, EvalDataset};
use indicatif::{ProgressBar, ProgressStyle};
use recbench_core::benchmark::{BenchmarkData, BenchmarkResult, BenchmarkRunner};
use recbench_core::config::{
    BenchmarkConfig, AUC_CANDIDATE_POOL, DEFAULT_CALL_TIMEOUT, DEFAULT_K,
    DEFAULT_USER_SAMPLE_SIZE, REPORT_PRECISION,
};
use recbench_core::recommender::{CachedRecommender, TimeoutRecommender};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_SYSTEMS: &[SystemKind] = &[SystemKind::Popular, SystemKind::Random];
const DEFAULT_SEED: u64 = 42;

// =============================================================================
// CLI
// =============================================================================

#[derive(Parser, Debug)]
#[command(name = "recbench-eval")]
#[command(about = "Evaluate recommenders offline against logged interactions")]
struct Args {
    /// Directory containing the interaction logs
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Test log file name inside the data directory (.jsonl or .tsv)
    #[arg(long, default_value = DEFAULT_TEST_FILE)]
    test: String,

    /// Training log file name inside the data directory (.jsonl or .tsv)
    #[arg(long, default_value = DEFAULT_TRAIN_FILE)]
    train: String,

    /// Recommendation list length
    #[arg(short, default_value_t = DEFAULT_K)]
    k: usize,

    /// Candidate pool requested per user for ranking AUC
    #[arg(long, default_value_t = AUC_CANDIDATE_POOL)]
    auc_pool: usize,

    /// Users sampled for coverage and novelty
    #[arg(long, default_value_t = DEFAULT_USER_SAMPLE_SIZE)]
    users: usize,

    /// Per-call recommender deadline in milliseconds
    #[arg(long, default_value_t = DEFAULT_CALL_TIMEOUT.as_millis() as u64)]
    timeout_ms: u64,

    /// Systems to evaluate (comma-separated)
    #[arg(long, value_enum, value_delimiter = ',')]
    systems: Option<Vec<SystemKind>>,

    /// Seed for user sampling and the random baseline
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Output results as JSON
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

// =============================================================================
// Output Types
// =============================================================================

#[derive(Debug, Serialize)]
struct EvalReport {
    dataset: DatasetInfo,
    k: usize,
    user_sample: usize,
    seed: u64,
    systems: Vec<SystemReport>,
}

#[derive(Debug, Serialize)]
struct DatasetInfo {
    name: String,
    num_test_rows: usize,
    num_train_rows: usize,
    num_test_users: usize,
    num_items: usize,
}

#[derive(Debug, Serialize)]
struct SystemReport {
    #[serde(flatten)]
    result: BenchmarkResult,
    calls: CallStats,
}

#[derive(Debug, Serialize)]
struct CallStats {
    cache_hits: usize,
    cache_misses: usize,
    timed_out: usize,
}

// =============================================================================
// Evaluation
// =============================================================================

fn evaluate_system(
    kind: SystemKind,
    dataset: &EvalDataset,
    data: &BenchmarkData<'_>,
    runner: &BenchmarkRunner,
    args: &Args,
) -> Result<SystemReport> {
    let baseline = Baseline::build(kind, &dataset.train, data.item_universe, args.seed);
    let timeout = Duration::from_millis(args.timeout_ms);
    let recommender = CachedRecommender::new(TimeoutRecommender::new(baseline, timeout));

    let result = runner
        .run(kind.name(), &recommender, data)
        .with_context(|| format!("Benchmark failed for system '{}'", kind.name()))?;

    let cache = recommender.stats();
    let timed_out = recommender.into_inner().timed_out_calls();
    info!(
        system = kind.name(),
        hits = cache.hits,
        misses = cache.misses,
        timed_out,
        "recommender calls"
    );

    Ok(SystemReport {
        result,
        calls: CallStats {
            cache_hits: cache.hits,
            cache_misses: cache.misses,
            timed_out,
        },
    })
}

// =============================================================================
// Report Printing
// =============================================================================

fn print_report(report: &EvalReport) {
    println!("\n{}", "=".repeat(80));
    println!("RECBENCH EVALUATION REPORT");
    println!("{}", "=".repeat(80));
    println!(
        "Dataset: {} ({} test rows, {} train rows, {} test users, {} items)",
        report.dataset.name,
        report.dataset.num_test_rows,
        report.dataset.num_train_rows,
        report.dataset.num_test_users,
        report.dataset.num_items
    );
    println!(
        "k={}  users sampled={}  seed={}",
        report.k, report.user_sample, report.seed
    );

    let metrics: Vec<&str> = report
        .systems
        .first()
        .map(|sys| sys.result.ordered_scores().map(|(name, _)| name).collect())
        .unwrap_or_default();

    println!("\n{}", "-".repeat(70));
    println!("RESULTS");
    print!("{:<12}", "System");
    for metric in &metrics {
        print!(" {:>12}", metric);
    }
    println!();
    for sys in &report.systems {
        print!("{:<12}", sys.result.name);
        for metric in &metrics {
            match sys.result.score(metric) {
                Some(score) => print!(" {:>12.prec$}", score, prec = REPORT_PRECISION),
                None => print!(" {:>12}", "-"),
            }
        }
        println!();
    }

    println!("\n{}", "-".repeat(70));
    println!("USERS (scored / skipped / ineligible)");
    for sys in &report.systems {
        println!("{}", sys.result.name);
        for (evaluator, stats) in &sys.result.diagnostics {
            println!(
                "  {:<18} {:>6} / {:>6} / {:>6}",
                evaluator,
                stats.scored,
                stats.total_skipped(),
                stats.ineligible
            );
        }
        println!(
            "  calls: {} cached, {} made, {} timed out",
            sys.calls.cache_hits, sys.calls.cache_misses, sys.calls.timed_out
        );
    }

    println!("{}\n", "=".repeat(80));
}

// =============================================================================
// Main
// =============================================================================

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if args.verbose {
            EnvFilter::new("info")
        } else {
            EnvFilter::new("warn")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let runner = BenchmarkRunner::new(BenchmarkConfig {
        k: args.k,
        auc_candidate_pool: args.auc_pool,
    })
    .context("Invalid benchmark configuration")?;

    let data_dir = find_data_dir(args.data_dir.as_deref(), &args.test)?;
    let dataset = load_dataset(&data_dir, &args.test, &args.train)
        .with_context(|| format!("Failed to load dataset from {}", data_dir.display()))?;
    info!(
        dataset = %dataset.name,
        test_rows = dataset.num_test_rows(),
        train_rows = dataset.num_train_rows(),
        "dataset loaded"
    );

    let item_universe = dataset.item_universe();
    let user_sample = sampling::sample_users(&dataset.test.users(), args.users, args.seed);
    let data = BenchmarkData::new(&dataset.test, &dataset.train, &item_universe, &user_sample);

    let systems = args
        .systems
        .clone()
        .unwrap_or_else(|| DEFAULT_SYSTEMS.to_vec());

    let pb = if args.json {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(systems.len() as u64)
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg} [{bar:40}] {pos}/{len}")
            .context("Invalid progress bar template")?,
    );

    let mut reports = Vec::with_capacity(systems.len());
    for kind in systems {
        pb.set_message(kind.name());
        reports.push(evaluate_system(kind, &dataset, &data, &runner, &args)?);
        pb.inc(1);
    }
    pb.finish_and_clear();

    let report = EvalReport {
        dataset: DatasetInfo {
            name: dataset.name.clone(),
            num_test_rows: dataset.num_test_rows(),
            num_train_rows: dataset.num_train_rows(),
            num_test_users: dataset.num_test_users(),
            num_items: item_universe.len(),
        },
        k: args.k,
        user_sample: user_sample.len(),
        seed: args.seed,
        systems: reports,
    };

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize report")?
        );
    } else {
        print_report(&report);
    }

    Ok(())
}

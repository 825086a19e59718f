//! `seqsync` command line front end

use std::fmt::Write as _;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use seqsync_core::{parse_sequence, parse_spec, raw_ids, RecordId, SequenceTable, TraceEvent};
use seqsync_state::{has_placeholder_coverage, ReconcileConfig, Reconciler};
use seqsync_test::{run_corpus, SCENARIOS};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "seqsync")]
#[command(about = "Realign a state sequence with an edited spec", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile one state sequence against a spec
    Fix(FixArgs),
    /// Replay the built-in scenario corpus
    Scenarios(ScenariosArgs),
}

#[derive(Args)]
struct FixArgs {
    /// Spec ids, ascending and comma separated
    #[arg(long)]
    spec: String,

    /// State sequence, comma separated, 0 for placeholders
    #[arg(long, default_value = "")]
    state: String,

    /// Print every trace event
    #[arg(long)]
    trace: bool,

    /// Print spec and state side by side after reconciling
    #[arg(long)]
    table: bool,

    /// Skip the value preservation checks
    #[arg(long)]
    fast: bool,

    /// Maximum number of edits
    #[arg(long)]
    budget: Option<usize>,
}

#[derive(Args)]
struct ScenariosArgs {
    /// Only replay scenarios whose name contains this
    #[arg(long)]
    filter: Option<String>,
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .compact()
        .init();
}

fn format_sequence(ids: &[RecordId]) -> String {
    raw_ids(ids)
        .iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

fn run_fix(args: &FixArgs) -> Result<String> {
    let spec = parse_spec(&args.spec).context("invalid --spec")?;
    let mut state = parse_sequence(&args.state).context("invalid --state")?;
    debug!(spec_len = spec.len(), state_len = state.len(), "loaded sequences");

    let mut out = String::new();
    if !has_placeholder_coverage(&spec, &state) {
        writeln!(out, "note: state does not reserve placeholders for every new spec id")?;
    }

    let mut config = if args.fast {
        ReconcileConfig::fast()
    } else {
        ReconcileConfig::default()
    };
    config.edit_budget = args.budget;

    let mut reconciler = Reconciler::new(config).with_sink(Vec::<TraceEvent>::new());
    let result = reconciler.reconcile(&spec, &mut state);

    if args.trace {
        for event in reconciler.sink() {
            writeln!(out, "{event}")?;
        }
    }
    if args.table {
        write!(out, "{}", SequenceTable::new(&spec, &state))?;
    }

    let report = result.with_context(|| format!("stopped at [{}]", format_sequence(&state)))?;
    info!(edits = report.edits(), "reconciled");
    writeln!(
        out,
        "{} (stale removed {}, inserted {}, deleted {})",
        format_sequence(&state),
        report.stale_removed,
        report.inserted,
        report.deleted
    )?;
    Ok(out)
}

fn run_scenarios(args: &ScenariosArgs) -> Result<()> {
    let selected: Vec<_> = SCENARIOS
        .iter()
        .filter(|s| args.filter.as_deref().map_or(true, |f| s.name.contains(f)))
        .copied()
        .collect();
    if selected.is_empty() {
        bail!("no scenario matches the filter");
    }

    let summary = run_corpus(&selected);
    for (name, failure) in &summary.failures {
        println!("FAIL {name}: {failure}");
    }
    println!(
        "{} passed, {} failed, {} edits",
        summary.passed,
        summary.failures.len(),
        summary.edits
    );

    if !summary.is_clean() {
        bail!("{} scenario(s) failed", summary.failures.len());
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Fix(args) => print!("{}", run_fix(&args)?),
        Commands::Scenarios(args) => run_scenarios(&args)?,
    }
    Ok(())
}

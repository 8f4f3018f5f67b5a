use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use docsync_merge::ConflictStrategy;

#[derive(Parser)]
#[command(
    name = "docsync",
    about = "docsync: three-way reconciliation for API description documents",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// TOML file with classifier rules and sync settings
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the edits that turn one document into another
    Diff(DiffArgs),
    /// Show how addresses are classified
    Classify(ClassifyArgs),
    /// Reconcile local and remote revisions against a baseline
    Reconcile(ReconcileArgs),
    /// Reconcile, then apply the safe remote changes onto the local revision
    Merge(MergeArgs),
    /// Pull a document from a store directory and merge it into a local file
    Sync(SyncArgs),
}

#[derive(Args)]
pub struct DiffArgs {
    pub base: PathBuf,
    pub compare: PathBuf,
}

#[derive(Args)]
pub struct ClassifyArgs {
    #[arg(required = true)]
    pub addresses: Vec<String>,
}

#[derive(Args)]
pub struct ReconcileArgs {
    pub baseline: PathBuf,
    pub local: PathBuf,
    pub remote: PathBuf,
}

#[derive(Args)]
pub struct MergeArgs {
    #[command(flatten)]
    pub inputs: ReconcileArgs,
    /// local-wins, remote-wins, or interactive
    #[arg(long)]
    pub strategy: Option<ConflictStrategy>,
    /// Also apply changes that need review
    #[arg(long)]
    pub include_review: bool,
    /// Write the merged document here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct SyncArgs {
    /// Document id in the store
    pub id: String,
    /// Directory holding remote documents as `<id>.json`
    #[arg(long)]
    pub store: PathBuf,
    /// Directory holding baseline snapshots
    #[arg(long)]
    pub baseline_dir: PathBuf,
    /// Local revision; rewritten with the merged document
    #[arg(long)]
    pub local: PathBuf,
    #[arg(long)]
    pub strategy: Option<ConflictStrategy>,
    #[arg(long)]
    pub include_review: bool,
    /// Report what would change without writing anything
    #[arg(long)]
    pub dry_run: bool,
}

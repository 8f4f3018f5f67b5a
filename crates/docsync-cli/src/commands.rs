use std::fs;
use std::path::Path;

use anyhow::Context;
use colored::{ColoredString, Colorize};
use docsync_classify::{Direction, PathClassifier};
use docsync_diff::diff_documents;
use docsync_merge::{summarize, ChangeRecord, ChangeSet, MergeApplier, MergeResult, ReconciliationEngine};
use docsync_sdk::{SyncConfig, SyncOutcome, SyncSession};
use docsync_store::{DirRemoteStore, DocumentCodec, FsBaselineStore, JsonCodec};
use docsync_types::{EditKind, Node, PathAddress};
use serde_json::json;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref())?;
    match cli.command {
        Command::Diff(args) => cmd_diff(args, cli.format),
        Command::Classify(args) => cmd_classify(args, &config, cli.format),
        Command::Reconcile(args) => cmd_reconcile(args, &config, cli.format),
        Command::Merge(args) => cmd_merge(args, config, cli.format),
        Command::Sync(args) => cmd_sync(args, config, cli.format),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<SyncConfig> {
    let Some(path) = path else {
        return Ok(SyncConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    SyncConfig::from_toml_str(&text).with_context(|| format!("parsing config {}", path.display()))
}

fn load_document(path: &Path) -> anyhow::Result<Node> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    JsonCodec::new()
        .parse(&text)
        .with_context(|| format!("parsing {}", path.display()))
}

fn write_document(path: &Path, document: &Node) -> anyhow::Result<()> {
    let mut text = JsonCodec::pretty().serialize(document)?;
    text.push('\n');
    fs::write(path, text).with_context(|| format!("writing {}", path.display()))
}

fn print_json(value: &impl serde::Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ---- Rendering ----

fn kind_marker(kind: EditKind) -> ColoredString {
    match kind {
        EditKind::Add => "+".green().bold(),
        EditKind::Edit => "~".yellow().bold(),
        EditKind::Delete => "-".red().bold(),
    }
}

fn direction_label(direction: Direction) -> ColoredString {
    match direction {
        Direction::Structural => "structural".red(),
        Direction::Enrichment => "enrichment".green(),
        Direction::Artifact => "artifact".cyan(),
    }
}

fn preview(node: Option<&Node>) -> String {
    const MAX: usize = 60;
    let Some(node) = node else {
        return "∅".to_string();
    };
    let text = node.to_string();
    if text.chars().count() > MAX {
        let cut: String = text.chars().take(MAX).collect();
        format!("{cut}…")
    } else {
        text
    }
}

fn print_record(record: &ChangeRecord) {
    let conflict = if record.has_conflict {
        " (conflict)".red().bold().to_string()
    } else {
        String::new()
    };
    println!(
        "  {} {}{}",
        kind_marker(record.kind),
        record.address.to_string().bold(),
        conflict
    );
    println!(
        "      {} -> {}  [{}]",
        preview(record.old_value.as_ref()).dimmed(),
        preview(record.new_value.as_ref()),
        record.reason.dimmed()
    );
}

fn print_bucket(title: ColoredString, records: &[ChangeRecord]) {
    if records.is_empty() {
        return;
    }
    println!("{} ({})", title, records.len());
    for record in records {
        print_record(record);
    }
}

fn print_change_set(changes: &ChangeSet) {
    if changes.is_empty() {
        println!("No remote changes.");
        return;
    }
    print_bucket("Safe to sync".green().bold(), &changes.safe_to_sync);
    print_bucket("Needs review".yellow().bold(), &changes.needs_review);
    print_bucket("Blocked".red().bold(), &changes.blocked);
    print_bucket("Artifacts".cyan().bold(), &changes.artifacts);

    let s = summarize(changes);
    println!(
        "\n{} safe, {} review, {} blocked, {} artifacts{}",
        s.safe_to_sync.to_string().green(),
        s.needs_review.to_string().yellow(),
        s.blocked.to_string().red(),
        s.artifacts.to_string().cyan(),
        if s.has_conflicts { ", conflicts present".red().to_string() } else { String::new() }
    );
}

fn print_merge_report(result: &MergeResult) {
    println!(
        "{} Applied {} change(s)",
        "✓".green().bold(),
        result.applied.len().to_string().bold()
    );
    for skipped in &result.skipped {
        println!(
            "  {} {} {}",
            "skipped".yellow(),
            skipped.record.address.to_string().bold(),
            skipped.reason.dimmed()
        );
    }
}

// ---- Commands ----

fn cmd_diff(args: DiffArgs, format: OutputFormat) -> anyhow::Result<()> {
    let base = load_document(&args.base)?;
    let compare = load_document(&args.compare)?;
    let diff = diff_documents(&base, &compare)?;

    if format == OutputFormat::Json {
        return print_json(&diff.edits);
    }
    if diff.is_empty() {
        println!("No changes.");
        return Ok(());
    }
    for edit in diff.iter() {
        println!(
            "{} {}  {} -> {}",
            kind_marker(edit.kind()),
            edit.address().to_string().bold(),
            preview(edit.before()).dimmed(),
            preview(edit.after())
        );
    }
    println!(
        "\n{} added, {} changed, {} removed",
        diff.additions().to_string().green(),
        diff.modifications().to_string().yellow(),
        diff.deletions().to_string().red()
    );
    Ok(())
}

fn cmd_classify(args: ClassifyArgs, config: &SyncConfig, format: OutputFormat) -> anyhow::Result<()> {
    let classifier = PathClassifier::new(&config.classifier)?;
    let mut verdicts = Vec::with_capacity(args.addresses.len());
    for raw in &args.addresses {
        let address = raw.parse::<PathAddress>().with_context(|| format!("address '{raw}'"))?;
        let verdict = classifier.classify(&address)?;
        verdicts.push((address, verdict));
    }

    if format == OutputFormat::Json {
        let rows: Vec<_> = verdicts
            .iter()
            .map(|(address, v)| json!({"address": address, "direction": v.direction, "reason": v.reason}))
            .collect();
        return print_json(&rows);
    }
    for (address, verdict) in &verdicts {
        println!(
            "{}  {}  {}",
            address.to_string().bold(),
            direction_label(verdict.direction),
            verdict.reason.dimmed()
        );
    }
    Ok(())
}

fn reconcile_files(args: &ReconcileArgs, config: &SyncConfig) -> anyhow::Result<(Node, ChangeSet)> {
    let baseline = load_document(&args.baseline)?;
    let local = load_document(&args.local)?;
    let remote = load_document(&args.remote)?;
    let engine = ReconciliationEngine::from_config(&config.classifier)?;
    let changes = engine.reconcile(&baseline, &local, &remote)?;
    Ok((local, changes))
}

fn cmd_reconcile(args: ReconcileArgs, config: &SyncConfig, format: OutputFormat) -> anyhow::Result<()> {
    let (_, changes) = reconcile_files(&args, config)?;
    if format == OutputFormat::Json {
        return print_json(&json!({"changes": changes, "summary": summarize(&changes)}));
    }
    print_change_set(&changes);
    Ok(())
}

fn cmd_merge(args: MergeArgs, config: SyncConfig, format: OutputFormat) -> anyhow::Result<()> {
    let (local, changes) = reconcile_files(&args.inputs, &config)?;
    let strategy = args.strategy.unwrap_or(config.strategy);

    let mut selected = changes.safe_to_sync.clone();
    if args.include_review || config.include_review {
        selected.extend(changes.needs_review.iter().cloned());
    }
    let result = MergeApplier::apply(&local, &selected, strategy);

    match (&args.output, format) {
        (Some(path), OutputFormat::Text) => {
            write_document(path, &result.document)?;
            print_merge_report(&result);
            println!("  Written to {}", path.display().to_string().bold());
        }
        (Some(path), OutputFormat::Json) => {
            write_document(path, &result.document)?;
            print_json(&json!({"applied": result.applied, "skipped": result.skipped}))?;
        }
        (None, OutputFormat::Text) => {
            println!("{}", JsonCodec::pretty().serialize(&result.document)?);
        }
        (None, OutputFormat::Json) => print_json(&result)?,
    }
    Ok(())
}

fn cmd_sync(args: SyncArgs, mut config: SyncConfig, format: OutputFormat) -> anyhow::Result<()> {
    if let Some(strategy) = args.strategy {
        config.strategy = strategy;
    }
    config.include_review |= args.include_review;

    let session = SyncSession::new(
        DirRemoteStore::new(&args.store),
        FsBaselineStore::new(&args.baseline_dir),
        JsonCodec::pretty(),
        config,
    )?;
    let local = load_document(&args.local)?;

    let outcome: SyncOutcome = if args.dry_run {
        session.preview(&args.id, &local)?
    } else {
        let outcome = session.sync(&args.id, &local)?;
        write_document(&args.local, &outcome.merge.document)?;
        outcome
    };

    if format == OutputFormat::Json {
        return print_json(&outcome);
    }

    print_change_set(&outcome.plan.changes);
    println!();
    print_merge_report(&outcome.merge);
    match &outcome.baseline {
        Some(snapshot) => println!(
            "  Baseline {} recorded for {}",
            snapshot.content_hash[..12].yellow(),
            args.id.bold()
        ),
        None => println!("  {} nothing written", "dry run:".cyan()),
    }
    Ok(())
}

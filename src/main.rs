//! Rpgdex CLI - Command-line tool for indexing RPG project databases and
//! auditing asset usage.
//!
//! This is the main entry point for the rpgdex command-line application.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use glob::{MatchOptions, Pattern};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use serde_json::Value;

use rpgdex::prelude::*;

const LOG_TARGET: &str = "rpgdex";

/// Rpgdex - RPG project database index and asset auditor
#[derive(Parser)]
#[command(name = "rpgdex")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct GlobalArgs {
    /// Project root (the directory holding Game.rpgproject)
    #[arg(short, long, env = "RPGDEX_PROJECT", default_value = ".", global = true)]
    project: PathBuf,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show record counts per collection type
    Stats,

    /// Show one record by type and id
    Get {
        /// Collection type (actor, enemy, skill, ...)
        kind: String,

        /// Record id
        id: u32,
    },

    /// Find records whose name contains a substring (case-insensitive)
    Find {
        /// Name fragment
        name: String,
    },

    /// Search records with simple filters
    Search {
        /// Restrict to a collection type (repeatable)
        #[arg(short = 't', long = "type")]
        kinds: Vec<String>,

        /// Minimum id (inclusive)
        #[arg(long)]
        min: Option<u32>,

        /// Maximum id (inclusive)
        #[arg(long)]
        max: Option<u32>,

        /// Name substring
        #[arg(short, long)]
        name: Option<String>,

        /// Require this property to be present
        #[arg(long)]
        has: Option<String>,
    },

    /// Query records with equality filters, ordering, and a limit
    Query {
        /// Restrict to a collection type (repeatable)
        #[arg(short = 't', long = "type")]
        kinds: Vec<String>,

        /// Equality filter as key=value, value parsed as JSON (repeatable)
        #[arg(short, long = "where")]
        filters: Vec<String>,

        /// Sort by this field
        #[arg(short, long)]
        order_by: Option<String>,

        /// Maximum number of results
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Render a markdown overview of the database
    Context,

    /// Analyze asset usage and print recommendations
    Assets {
        /// Render the full markdown report
        #[arg(short, long)]
        markdown: bool,
    },

    /// List every asset with the records that use it
    AssetMap {
        /// Filter pattern for file names (glob-style)
        #[arg(short, long)]
        filter: Option<String>,
    },

    /// Remove unused assets (dry run unless --apply)
    Prune {
        /// Actually delete the files
        #[arg(long)]
        apply: bool,
    },

    /// Show disk usage per project directory
    Size,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.global);

    let logger = LogFacade::new(LOG_TARGET);
    let global = &cli.global;

    match cli.command {
        Commands::Stats => cmd_stats(global, &logger)?,
        Commands::Get { kind, id } => cmd_get(global, &logger, &kind, id)?,
        Commands::Find { name } => cmd_find(global, &logger, &name)?,
        Commands::Search { kinds, min, max, name, has } => {
            let index = open_index(&global.project, &logger)?;
            let mut query = Query::new(&index).id_range(min, max);
            if !kinds.is_empty() {
                query = query.kind_names(&kinds);
            }
            if let Some(name) = &name {
                query = query.name_contains(name);
            }
            if let Some(field) = &has {
                query = query.has_property(field);
            }
            print_hits(global, &query.run())?;
            print_load_warnings(&index);
        }
        Commands::Query { kinds, filters, order_by, limit } => {
            let index = open_index(&global.project, &logger)?;
            let mut query = Query::new(&index);
            if !kinds.is_empty() {
                query = query.kind_names(&kinds);
            }
            for filter in &filters {
                let (field, value) = parse_where(filter)?;
                query = query.where_eq(&field, value);
            }
            if let Some(field) = &order_by {
                query = query.order_by(field);
            }
            if let Some(limit) = limit {
                query = query.limit(limit);
            }
            print_hits(global, &query.run())?;
            print_load_warnings(&index);
        }
        Commands::Context => {
            let index = open_index(&global.project, &logger)?;
            let context =
                render_database_context(&index).context("Failed to render database context")?;
            print!("{context}");
            print_load_warnings(&index);
        }
        Commands::Assets { markdown } => cmd_assets(global, &logger, markdown)?,
        Commands::AssetMap { filter } => cmd_asset_map(global, &logger, filter.as_deref())?,
        Commands::Prune { apply } => cmd_prune(global, &logger, apply)?,
        Commands::Size => cmd_size(global)?,
    }

    Ok(())
}

fn init_logging(args: &GlobalArgs) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if args.quiet || args.json {
        builder.filter_level(log::LevelFilter::Warn);
    } else if args.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();
}

fn open_index(root: &Path, logger: &LogFacade) -> Result<EntityIndex> {
    let start = Instant::now();
    let index = EntityIndex::open(root, logger)
        .with_context(|| format!("Failed to open project {}", root.display()))?;
    log::debug!("Index built in {:?}", start.elapsed());
    Ok(index)
}

fn analyze(args: &GlobalArgs, logger: &LogFacade) -> Result<AssetReport> {
    let spinner = if args.quiet || args.json {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
        pb.set_message("Scanning assets...");
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    };

    let report = analyze_project(&args.project, logger)
        .with_context(|| format!("Failed to analyze assets in {}", args.project.display()));
    spinner.finish_and_clear();
    report
}

fn cmd_stats(args: &GlobalArgs, logger: &LogFacade) -> Result<()> {
    let index = open_index(&args.project, logger)?;
    let stats = index.stats();

    if args.json {
        print_json(&stats)?;
    } else {
        println!("{:<16} {:>8}", "Type", "Count");
        for (kind, count) in &stats.counts {
            println!("{:<16} {:>8}", kind.label(), count);
        }
        println!("\nTotal: {} records ({} distinct names)", stats.total, stats.unique_names);
    }

    print_load_warnings(&index);
    Ok(())
}

fn cmd_get(args: &GlobalArgs, logger: &LogFacade, kind: &str, id: u32) -> Result<()> {
    let index = open_index(&args.project, logger)?;

    match index.get_by_id(kind, id)? {
        Some(record) if args.json => print_json(record)?,
        Some(record) => {
            println!("{} #{}: {}", record.kind(), record.id(), record.display_name());
            println!("{}", serde_json::to_string_pretty(record)?);
        }
        None if args.json => println!("null"),
        None => println!("No {kind} with id {id}"),
    }

    print_load_warnings(&index);
    Ok(())
}

fn cmd_find(args: &GlobalArgs, logger: &LogFacade, name: &str) -> Result<()> {
    let index = open_index(&args.project, logger)?;
    let records = index.find_by_name(name);

    if args.json {
        let refs: Vec<_> = records
            .iter()
            .map(|r| serde_json::json!({ "type": r.kind(), "id": r.id(), "name": r.display_name() }))
            .collect();
        print_json(&refs)?;
    } else {
        for record in &records {
            println!("{:>12} {:>5}  {}", record.kind().as_str(), record.id(), record.display_name());
        }
        println!("\nTotal: {} matches", records.len());
    }

    print_load_warnings(&index);
    Ok(())
}

fn cmd_assets(args: &GlobalArgs, logger: &LogFacade, markdown: bool) -> Result<()> {
    let report = analyze(args, logger)?;

    if args.json {
        print_json(&report)?;
    } else if markdown {
        let text = render_asset_context(&report).context("Failed to render asset report")?;
        print!("{text}");
    } else {
        println!("Assets:  {} ({})", report.total_assets, report.total_size_formatted);
        println!("In use:  {}", report.used);
        println!("Unused:  {} ({})", report.unused, format_bytes(report.unused_bytes()));
        println!();
        for (category, count) in &report.by_category {
            println!("  {:<12} {:>6}", category.as_str(), count);
        }
        println!("\nRecommendations:");
        for recommendation in &report.recommendations {
            println!("  - {recommendation}");
        }
    }

    print_report_warnings(&report);
    Ok(())
}

#[derive(Serialize)]
struct MappingEntry<'a> {
    filename: &'a str,
    #[serde(rename = "usedBy")]
    used_by: &'a [String],
}

fn cmd_asset_map(args: &GlobalArgs, logger: &LogFacade, filter: Option<&str>) -> Result<()> {
    let pattern = filter
        .map(Pattern::new)
        .transpose()
        .context("Invalid filter pattern")?;
    let options = MatchOptions {
        case_sensitive: false,
        ..MatchOptions::new()
    };

    let report = analyze(args, logger)?;
    let mapping: Vec<(String, Vec<String>)> = asset_mapping(&report.assets)
        .into_iter()
        .filter(|(name, _)| {
            pattern
                .as_ref()
                .map_or(true, |p| p.matches_with(name, options))
        })
        .collect();

    if args.json {
        let entries: Vec<MappingEntry<'_>> = mapping
            .iter()
            .map(|(filename, used_by)| MappingEntry { filename, used_by })
            .collect();
        print_json(&entries)?;
    } else {
        for (filename, used_by) in &mapping {
            if used_by.is_empty() {
                println!("{filename}: (unused)");
            } else {
                println!("{filename}: {}", used_by.join(", "));
            }
        }
        println!("\nTotal: {} assets", mapping.len());
    }

    print_report_warnings(&report);
    Ok(())
}

fn cmd_prune(args: &GlobalArgs, logger: &LogFacade, apply: bool) -> Result<()> {
    let report = analyze(args, logger)?;
    let outcome = prune_unused(&report, !apply, logger).context("Failed to remove unused assets")?;

    if args.json {
        print_json(&outcome)?;
    } else {
        for path in &outcome.removed {
            println!("{}", path.display());
        }
        let verb = if outcome.dry_run { "Would remove" } else { "Removed" };
        println!(
            "\n{verb} {} files ({})",
            outcome.removed.len(),
            format_bytes(outcome.saved)
        );
        if outcome.dry_run && !outcome.removed.is_empty() {
            println!("Run again with --apply to delete them");
        }
    }

    print_report_warnings(&report);
    Ok(())
}

fn cmd_size(args: &GlobalArgs) -> Result<()> {
    let project = Project::open(&args.project)
        .with_context(|| format!("Failed to open project {}", args.project.display()))?;
    let size = project_size(project.root());

    if args.json {
        print_json(&size)?;
    } else {
        for (dir, bytes) in &size.breakdown {
            println!("{:<8} {:>12}", dir, format_bytes(*bytes));
        }
        println!("{:<8} {:>12}", "total", format_bytes(size.total));
    }

    Ok(())
}

/// Split `key=value`. The value is read as JSON, falling back to a plain
/// string so `name=Slime` works without quoting.
fn parse_where(arg: &str) -> Result<(String, Value)> {
    let (key, raw) = arg
        .split_once('=')
        .with_context(|| format!("Invalid filter '{arg}', expected key=value"))?;
    if key.is_empty() {
        anyhow::bail!("Invalid filter '{arg}', key is empty");
    }
    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((key.to_string(), value))
}

fn print_hits(args: &GlobalArgs, hits: &[QueryHit<'_>]) -> Result<()> {
    if args.json {
        return print_json(hits);
    }
    for hit in hits {
        println!("{:>12} {:>5}  {}", hit.kind.as_str(), hit.id, hit.name);
    }
    println!("\nTotal: {} results", hits.len());
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{text}");
    Ok(())
}

fn print_load_warnings(index: &EntityIndex) {
    let messages = index.warnings().iter().map(|w| w.message.as_str());
    for line in warning_lines(messages, warnings_logged()) {
        eprintln!("{line}");
    }
}

fn print_report_warnings(report: &AssetReport) {
    let messages = report.warnings.iter().map(String::as_str);
    for line in warning_lines(messages, warnings_logged()) {
        eprintln!("{line}");
    }
}

/// Warnings already went to stderr through the logger.
fn warnings_logged() -> bool {
    log::log_enabled!(target: LOG_TARGET, log::Level::Warn)
}

/// Trailing `warning:` lines, or none when the logger already showed them.
fn warning_lines<'a, I>(messages: I, logged: bool) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    if logged {
        return Vec::new();
    }
    messages.into_iter().map(|m| format!("warning: {m}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_where_reads_json_values() {
        assert_eq!(parse_where("exp=10").unwrap(), ("exp".to_string(), Value::from(10)));
        assert_eq!(parse_where("flag=true").unwrap().1, Value::Bool(true));
        assert_eq!(parse_where("name=\"Bat\"").unwrap().1, Value::from("Bat"));
    }

    #[test]
    fn test_parse_where_falls_back_to_string() {
        assert_eq!(parse_where("name=Slime").unwrap().1, Value::from("Slime"));
        assert_eq!(parse_where("note=a=b").unwrap(), ("note".to_string(), Value::from("a=b")));
    }

    #[test]
    fn test_parse_where_rejects_missing_key() {
        assert!(parse_where("exp").is_err());
        assert!(parse_where("=1").is_err());
    }

    #[test]
    fn test_cli_parses_repeatable_filters() {
        let cli = Cli::try_parse_from([
            "rpgdex", "-p", "game", "query", "--type", "enemy", "--type", "actor", "--where",
            "exp=10", "--limit", "3",
        ])
        .unwrap();
        assert_eq!(cli.global.project, PathBuf::from("game"));
        match cli.command {
            Commands::Query { kinds, filters, limit, .. } => {
                assert_eq!(kinds, vec!["enemy", "actor"]);
                assert_eq!(filters, vec!["exp=10"]);
                assert_eq!(limit, Some(3));
            }
            _ => panic!("expected query"),
        }
    }

    #[test]
    fn test_warning_lines_name_the_file_once() {
        let message = "Failed to load Items.json: expected value at line 1 column 3";
        let lines = warning_lines([message], false);
        assert_eq!(lines, vec![format!("warning: {message}")]);
        assert_eq!(lines[0].matches("Items.json").count(), 1);
    }

    #[test]
    fn test_warning_lines_skip_logged_warnings() {
        assert!(warning_lines(["Failed to load Items.json: bad"], true).is_empty());
        assert!(warning_lines(Vec::<&str>::new(), false).is_empty());
    }
}

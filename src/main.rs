use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use manifest_whitespace::config::{discover, suggest_check, LintConfig};
use manifest_whitespace::{init_tracing, Check, CheckSet, FixMode, LoadedFile, Problem};
use similar::{ChangeTag, TextDiff};
use std::env;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Parser)]
#[command(name = "manifest-whitespace")]
#[command(about = "Whitespace checks and safe auto-fixes for manifests", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check manifests, optionally fixing them in place
    Check {
        /// Files or directories to check (defaults to the current directory)
        paths: Vec<PathBuf>,

        /// Rewrite files with every fixable problem repaired
        #[arg(long)]
        fix: bool,

        /// Show unified diff of changes
        #[arg(short, long, requires = "fix")]
        diff: bool,

        /// Config file (otherwise discovered from the working directory)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,

        /// Run only the named check (repeatable)
        #[arg(long = "only", value_name = "CHECK")]
        only: Vec<String>,
    },

    /// List checks and whether they are enabled
    List {
        /// Config file (otherwise discovered from the working directory)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Check {
            paths,
            fix,
            diff,
            config,
            format,
            only,
        } => cmd_check(paths, fix, diff, config, format, only),

        Commands::List { config } => cmd_list(config),
    }
}

fn load_config(explicit: Option<&Path>) -> Result<LintConfig> {
    let cwd = env::current_dir().context("Failed to read current directory")?;
    let loaded = discover(explicit, &cwd)?;
    tracing::info!(origin = %loaded.origin, "using configuration");
    Ok(loaded.config)
}

/// Resolve `--only` names, failing on the first unknown one.
fn parse_only(names: &[String]) -> Result<Vec<Check>> {
    names
        .iter()
        .map(|name| match Check::from_name(name) {
            Some(check) => Ok(check),
            None => match suggest_check(name) {
                Some(suggestion) => {
                    anyhow::bail!("Unknown check '{name}' (did you mean '{suggestion}'?)")
                }
                None => anyhow::bail!("Unknown check '{name}'"),
            },
        })
        .collect()
}

/// Expand `paths` into the manifest files to check.
///
/// Files named explicitly are always checked; directories are walked for
/// files with a configured extension.
fn collect_manifests(paths: &[PathBuf], config: &LintConfig) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_file() {
            files.push(path.clone());
            continue;
        }
        if !path.exists() {
            anyhow::bail!("Path not found: {}", path.display());
        }

        let mut found = Vec::new();
        for entry in WalkDir::new(path) {
            let entry = entry?;
            let is_manifest = entry
                .path()
                .extension()
                .and_then(|s| s.to_str())
                .is_some_and(|ext| config.is_manifest_extension(ext));
            if entry.file_type().is_file() && is_manifest {
                found.push(entry.path().to_path_buf());
            }
        }
        found.sort();
        files.extend(found);
    }
    Ok(files)
}

/// Helper: Display unified diff between two strings
fn display_diff(file: &Path, original: &str, modified: &str) {
    println!(
        "\n{}",
        format!("--- {} (original)", file.display()).dimmed()
    );
    println!("{}", format!("+++ {} (fixed)", file.display()).dimmed());

    let diff = TextDiff::from_lines(original, modified);

    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => format!("-{}", change).red(),
            ChangeTag::Insert => format!("+{}", change).green(),
            ChangeTag::Equal => format!(" {}", change).normal(),
        };
        print!("{}", sign);
    }
}

fn print_problem(file: &Path, problem: &Problem) {
    let kind = if problem.is_error() {
        problem.kind.to_string().red().bold()
    } else {
        problem.kind.to_string().yellow().bold()
    };
    let status = if problem.fixed {
        format!(" {}", "[fixed]".green())
    } else if !problem.fixable {
        format!(" {}", "[unfixable]".dimmed())
    } else {
        String::new()
    };
    println!(
        "{}:{}:{}: {}: {} {}{}",
        file.display(),
        problem.line,
        problem.column,
        kind,
        problem.message,
        format!("({})", problem.check).dimmed(),
        status
    );
}

/// Record a file that could not be read or lexed.
fn report_failure(
    format: Format,
    json_reports: &mut Vec<serde_json::Value>,
    path: &Path,
    error: &dyn std::error::Error,
) {
    match format {
        Format::Text => eprintln!("{} {}: {}", "✗".red(), path.display(), error),
        Format::Json => json_reports.push(serde_json::json!({
            "path": path.display().to_string(),
            "error": error.to_string(),
        })),
    }
}

fn cmd_check(
    paths: Vec<PathBuf>,
    fix: bool,
    show_diff: bool,
    config: Option<PathBuf>,
    format: Format,
    only: Vec<String>,
) -> Result<()> {
    // 1. Configuration and check selection
    let config = load_config(config.as_deref())?;
    let mut linter = config.linter();
    if !only.is_empty() {
        linter.checks = CheckSet::only(parse_only(&only)?);
    }
    let mode = if fix { FixMode::Fix } else { FixMode::Report };

    // 2. Files
    let paths = if paths.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        paths
    };
    let files = collect_manifests(&paths, &config)?;

    // 3. Lint each file
    let mut total_problems = 0;
    let mut total_fixed = 0;
    let mut remaining_errors = 0;
    let mut failed_files = 0;
    let mut json_reports = Vec::new();

    for path in &files {
        let loaded = match LoadedFile::read(path) {
            Ok(loaded) => loaded,
            Err(e) => {
                report_failure(format, &mut json_reports, path, &e);
                failed_files += 1;
                continue;
            }
        };

        let mut report = match linter.run(&loaded.content, mode) {
            Ok(report) => report,
            Err(e) => {
                report_failure(format, &mut json_reports, path, &e);
                failed_files += 1;
                continue;
            }
        };

        let mut write_error = None;
        if fix && report.changed(&loaded.content) {
            match loaded.write_back(&report.output) {
                Ok(()) if show_diff => display_diff(path, &loaded.content, &report.output),
                Ok(()) => {}
                Err(e) => {
                    report.discard_fixes(&loaded.content);
                    failed_files += 1;
                    write_error = Some(e);
                }
            }
        }

        total_problems += report.problems.len();
        total_fixed += report.problems.iter().filter(|p| p.fixed).count();
        remaining_errors += report.remaining_errors().count();

        match format {
            Format::Text => {
                for problem in &report.problems {
                    print_problem(path, problem);
                }
                if let Some(e) = &write_error {
                    eprintln!("{} {}", "✗".red(), e);
                }
            }
            Format::Json => {
                let mut entry = serde_json::json!({
                    "path": path.display().to_string(),
                    "problems": report.problems,
                });
                if let Some(e) = &write_error {
                    entry["error"] = serde_json::Value::String(e.to_string());
                }
                json_reports.push(entry);
            }
        }
    }

    // 4. Summary
    match format {
        Format::Text => {
            println!();
            println!("{}", "Summary:".bold());
            println!("  {} files checked", files.len());
            println!("  {} problems", format!("{}", total_problems).yellow());
            if fix {
                println!("  {} fixed", format!("{}", total_fixed).green());
            }
            println!("  {} errors remaining", format!("{}", remaining_errors).red());
            if failed_files > 0 {
                println!("  {} files failed", format!("{}", failed_files).red());
            }
        }
        Format::Json => {
            println!("{}", serde_json::to_string_pretty(&json_reports)?);
        }
    }

    if remaining_errors > 0 || failed_files > 0 {
        std::process::exit(1);
    }

    Ok(())
}

fn cmd_list(config: Option<PathBuf>) -> Result<()> {
    let config = load_config(config.as_deref())?;
    let enabled = config.check_set();

    for check in Check::ALL {
        let status = if enabled.contains(check) {
            "enabled".green()
        } else {
            "disabled".dimmed()
        };
        println!("{} {}", check.name(), status);
    }

    Ok(())
}

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use similar::{ChangeTag, TextDiff};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tka11y_migrate::{
    audit_source, load_from_path, migration_summary, rewrite_source_with, write_rewritten,
    Diagnostic, FileTransform, MigrationSummary, RenameTable, RewriteOptions, WriteOutcome,
};
use walkdir::WalkDir;

#[derive(Parser)]
#[command(name = "tka11y-migrate")]
#[command(about = "Migrate tkinter/ttk/CustomTkinter code to accessible tkaria11y widgets", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite widget construction calls in Python sources
    Migrate {
        /// Files or directories to process
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Prompt per file with a diff instead of writing directly
        #[arg(short, long)]
        interactive: bool,

        /// Show what would be changed without modifying files
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Show unified diff of applied changes
        #[arg(short, long)]
        diff: bool,

        /// Append a TODO comment where an accessible name needs manual attention
        #[arg(long)]
        todos: bool,

        /// Skip files whose name matches this glob (e.g. "*test*.py")
        #[arg(long, value_name = "GLOB")]
        exclude: Option<String>,

        /// TOML file with a custom rename table
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Run accessibility checks without modifying anything
    Audit {
        /// Files or directories to check
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Emit diagnostics as JSON
        #[arg(long)]
        json: bool,

        /// Skip files whose name matches this glob (e.g. "*test*.py")
        #[arg(long, value_name = "GLOB")]
        exclude: Option<String>,

        /// TOML file with a custom rename table
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Print the active renaming table
    ListRenames {
        /// TOML file with a custom rename table
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Migrate {
            paths,
            interactive,
            dry_run,
            diff,
            todos,
            exclude,
            config,
        } => cmd_migrate(paths, interactive, dry_run, diff, todos, exclude, config),

        Commands::Audit {
            paths,
            json,
            exclude,
            config,
        } => cmd_audit(paths, json, exclude, config),

        Commands::ListRenames { config } => cmd_list_renames(config),
    }
}

/// Helper: build the rename table, from a config file when given.
fn load_table(config: Option<PathBuf>) -> Result<RenameTable> {
    match config {
        Some(path) => Ok(load_from_path(&path)?.into_table()),
        None => Ok(RenameTable::builtin()),
    }
}

/// Helper: collect .py files under the given paths. Directories are
/// walked recursively; explicit file paths are taken as-is. Files whose
/// name matches the exclude glob are skipped either way.
fn collect_python_files(paths: &[PathBuf], exclude: Option<&str>) -> Result<Vec<PathBuf>> {
    let matcher = exclude
        .map(|pattern| {
            globset::Glob::new(pattern)
                .map(|glob| glob.compile_matcher())
                .with_context(|| format!("invalid exclude pattern '{pattern}'"))
        })
        .transpose()?;
    let excluded = |name: &str| matcher.as_ref().is_some_and(|m| m.is_match(name));

    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            for entry in WalkDir::new(path) {
                let entry = entry?;
                if !entry.file_type().is_file() {
                    continue;
                }
                if entry.path().extension().and_then(|s| s.to_str()) != Some("py") {
                    continue;
                }
                if excluded(&entry.file_name().to_string_lossy()) {
                    continue;
                }
                files.push(entry.path().to_path_buf());
            }
        } else {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            if !excluded(&name) {
                files.push(path.clone());
            }
        }
    }

    files.sort();
    files.dedup();

    if files.is_empty() {
        anyhow::bail!("No Python files found under the given paths");
    }

    Ok(files)
}

/// Helper: show a unified diff between original and rewritten content.
fn display_diff(file: &Path, original: &str, rewritten: &str) {
    println!(
        "\n{}",
        format!("--- {} (original)", file.display()).dimmed()
    );
    println!("{}", format!("+++ {} (migrated)", file.display()).dimmed());

    let diff = TextDiff::from_lines(original, rewritten);

    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => format!("-{}", change).red(),
            ChangeTag::Insert => format!("+{}", change).green(),
            ChangeTag::Equal => format!(" {}", change).normal(),
        };
        print!("{}", sign);
    }
}

/// Helper: print the per-file migration summary.
fn display_summary(summary: &MigrationSummary) {
    if summary.total_widgets == 0 {
        return;
    }
    println!("  Widgets to transform: {}", summary.total_widgets);
    for (widget, count) in &summary.widget_counts {
        println!("    {}: {} call sites", widget, count);
    }
    if summary.import_added {
        println!("    + import declaration");
    }
}

/// Helper: block for a yes/no answer on stdin.
fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    let answer = answer.trim();

    Ok(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
}

fn cmd_migrate(
    paths: Vec<PathBuf>,
    interactive: bool,
    dry_run: bool,
    show_diff: bool,
    todos: bool,
    exclude: Option<String>,
    config: Option<PathBuf>,
) -> Result<()> {
    let table = load_table(config)?;
    let options = RewriteOptions {
        include_todos: todos,
    };
    let files = collect_python_files(&paths, exclude.as_deref())?;

    println!("Found {} Python files to process.", files.len());
    if let Some(pattern) = &exclude {
        println!("Excluding files matching: {}", pattern);
    }
    if dry_run {
        println!("{}", "[DRY RUN - no files will be modified]".cyan());
    }
    println!();

    let mut updated = 0;
    let mut skipped = 0;
    let mut unchanged = 0;
    let mut failed = 0;

    for file in &files {
        let original = match fs::read_to_string(file) {
            Ok(text) => text,
            Err(e) => {
                eprintln!("{} {}: {}", "✗".red(), file.display(), e);
                failed += 1;
                continue;
            }
        };

        let transform: FileTransform = rewrite_source_with(&original, &table, options);
        if !transform.changed(&original) {
            unchanged += 1;
            continue;
        }

        let summary = migration_summary(&original, &transform, &table);

        if dry_run {
            println!("{} Would modify {}", "⊙".yellow(), file.display());
            display_summary(&summary);
            updated += 1;
            continue;
        }

        if interactive {
            println!("\nProposed changes for {}:", file.display());
            display_summary(&summary);
            display_diff(file, &original, &transform.text);

            if !confirm("Apply these changes?")? {
                println!("{} Skipped {}", "⊘".cyan(), file.display());
                skipped += 1;
                continue;
            }
        }

        match write_rewritten(file, &transform.text) {
            Ok(WriteOutcome::Written { .. }) => {
                println!("{} Updated {}", "✓".green(), file.display());
                updated += 1;
                if show_diff && !interactive {
                    display_diff(file, &original, &transform.text);
                }
            }
            Ok(WriteOutcome::Unchanged { .. }) => {
                unchanged += 1;
            }
            Err(e) => {
                eprintln!("{} {}: {}", "✗".red(), file.display(), e);
                failed += 1;
            }
        }
    }

    println!();
    println!("{}", "Summary:".bold());
    if dry_run {
        println!("  {} would be updated", format!("{}", updated).green());
    } else {
        println!("  {} updated", format!("{}", updated).green());
        println!("  {} skipped", format!("{}", skipped).cyan());
    }
    println!("  {} unchanged", format!("{}", unchanged).yellow());
    println!("  {} failed", format!("{}", failed).red());

    if updated > 0 && !dry_run {
        println!();
        println!("Next steps:");
        println!("1. Review the changes carefully");
        println!("2. Test the application with the accessible widgets");
        println!("3. Fill in any accessible_name parameters marked with TODO comments");
    }

    if failed > 0 {
        std::process::exit(1);
    }

    Ok(())
}

fn cmd_audit(
    paths: Vec<PathBuf>,
    json: bool,
    exclude: Option<String>,
    config: Option<PathBuf>,
) -> Result<()> {
    let table = load_table(config)?;
    let files = collect_python_files(&paths, exclude.as_deref())?;

    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    let mut failed = 0;

    for file in &files {
        match fs::read_to_string(file) {
            Ok(content) => diagnostics.extend(audit_source(file, &content, &table)),
            Err(e) => {
                eprintln!("{} {}: {}", "✗".red(), file.display(), e);
                failed += 1;
            }
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&diagnostics)?);
    } else {
        for diag in &diagnostics {
            println!(
                "{}:{}:{}: {} [{}] {} ({})",
                diag.file.display(),
                diag.line,
                diag.column,
                format!("{}", diag.severity).yellow(),
                diag.code,
                diag.message,
                format!("{}", diag.category).dimmed()
            );
        }

        println!();
        println!("{}", "Summary:".bold());
        println!("  {} files checked", files.len());
        println!(
            "  {} issues found",
            if diagnostics.is_empty() {
                format!("{}", diagnostics.len()).green()
            } else {
                format!("{}", diagnostics.len()).yellow()
            }
        );
    }

    if failed > 0 {
        std::process::exit(1);
    }

    Ok(())
}

fn cmd_list_renames(config: Option<PathBuf>) -> Result<()> {
    let table = load_table(config)?;

    println!("{}", "Rename table".bold());
    println!("Label keyword: {}", table.label_keyword());
    println!("Import module: {}", table.import_module());
    println!();

    for entry in table.entries() {
        println!("  {} -> {}", entry.source, entry.target);
    }

    Ok(())
}

//! hxcheck CLI
//!
//! Checkstyle front end for Haxe projects.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use globset::{Glob, GlobSet, GlobSetBuilder};
use miette::{IntoDiagnostic, Result};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

use hxcheck_core::{
    CheckOutcome, CheckSession, CheckSettings, CheckstyleConfig, Diagnostic, LineChecker, Severity,
    SkipReason,
};

/// hxcheck - Checkstyle front end for Haxe projects
#[derive(Parser)]
#[command(name = "hxcheck")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (absolute or root-relative)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Check files or directories
    Check {
        /// Files or directories to check (directories are walked for .hx files)
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Project root (defaults to the current directory)
        #[arg(long)]
        root: Option<PathBuf>,

        /// Additional source folders, relative to the root
        #[arg(long = "source-folder")]
        source_folders: Vec<String>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Initialize configuration
    Init {
        /// Force overwrite existing config
        #[arg(long)]
        force: bool,
    },

    /// Start the LSP server
    Lsp,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(has_issues) => {
            if has_issues {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            tracing::error!("{:?}", e);
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<bool> {
    match &cli.command {
        Commands::Check {
            paths,
            root,
            source_folders,
            format,
        } => run_check(&cli, paths, root.as_deref(), source_folders, format),
        Commands::Init { force } => run_init(*force).map(|_| false),
        Commands::Lsp => run_lsp().map(|_| false),
    }
}

fn run_lsp() -> Result<()> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .into_diagnostic()?
        .block_on(async {
            hxcheck_lsp::run().await;
        });
    Ok(())
}

fn run_check(
    cli: &Cli,
    paths: &[PathBuf],
    root: Option<&Path>,
    source_folders: &[String],
    format: &str,
) -> Result<bool> {
    let root = match root {
        Some(root) => root.to_path_buf(),
        None => std::env::current_dir().into_diagnostic()?,
    };
    let root = root.canonicalize().into_diagnostic()?;

    let mut session = CheckSession::new(Box::new(LineChecker::new()));
    session.set_workspace_roots(vec![root.clone()]);
    session.update_settings(CheckSettings {
        configuration_file: cli.config.clone(),
        source_folders: source_folders.to_vec(),
        ..Default::default()
    });

    let files = collect_files(paths)?;
    info!("Checking {} files under {}", files.len(), root.display());

    let mut results: Vec<(PathBuf, Vec<Diagnostic>)> = Vec::new();
    let mut skipped = 0usize;

    for file in files {
        match session.check_file(&file) {
            CheckOutcome::Checked(diagnostics) => results.push((file, diagnostics)),
            CheckOutcome::Skipped(reason) => {
                if reason == SkipReason::Unreadable {
                    warn!("Cannot read {}", file.display());
                } else {
                    debug!("Skipped {} ({:?})", file.display(), reason);
                }
                skipped += 1;
            }
        }
    }

    output_results(&results, skipped, format)
}

/// Expands the given paths into a sorted, deduplicated list of `.hx` files.
fn collect_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let hx_globs = build_hx_globset()?;
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            files.push(path.canonicalize().into_diagnostic()?);
        } else if path.is_dir() {
            for entry in WalkDir::new(path).into_iter().filter_map(|e| e.ok()) {
                let entry_path = entry.path();
                if entry_path.is_file() && hx_globs.is_match(entry_path) {
                    files.push(entry_path.canonicalize().into_diagnostic()?);
                }
            }
        } else {
            warn!("No such file or directory: {}", path.display());
        }
    }

    files.sort();
    files.dedup();
    Ok(files)
}

fn build_hx_globset() -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    builder.add(Glob::new("**/*.hx").into_diagnostic()?);
    builder.build().into_diagnostic()
}

fn output_results(
    results: &[(PathBuf, Vec<Diagnostic>)],
    skipped: usize,
    format: &str,
) -> Result<bool> {
    let has_issues = results.iter().any(|(_, diagnostics)| !diagnostics.is_empty());

    match format {
        "json" => {
            let output: Vec<_> = results
                .iter()
                .map(|(path, diagnostics)| {
                    serde_json::json!({
                        "path": path.display().to_string(),
                        "diagnostics": diagnostics,
                    })
                })
                .collect();
            println!(
                "{}",
                serde_json::to_string_pretty(&output).into_diagnostic()?
            );
        }
        _ => {
            // Text format
            for (path, diagnostics) in results {
                if diagnostics.is_empty() {
                    continue;
                }

                println!("\n{}:", path.display());
                for diag in diagnostics {
                    let severity = match diag.severity {
                        Severity::Error => "error",
                        Severity::Warning => "warning",
                        Severity::Info => "info",
                    };
                    println!(
                        "  {}:{} {} [{}]: {}",
                        diag.line, diag.column, severity, diag.check, diag.message
                    );
                }
            }

            let total_issues: usize = results.iter().map(|(_, d)| d.len()).sum();
            println!();
            println!(
                "Checked {} files ({} skipped), found {} issues",
                results.len(),
                skipped,
                total_issues
            );
        }
    }

    Ok(has_issues)
}

fn run_init(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CheckstyleConfig::CONFIG_FILE);

    let default_config = r#"{
  "defaultSeverity": "INFO",
  "checks": [
    { "type": "LineLength", "props": { "maxLength": 160 } },
    { "type": "TrailingWhitespace", "props": {} },
    { "type": "IndentationCharacter", "props": { "character": "tab" } },
    { "type": "FileLength", "props": { "maxLines": 2000 } },
    { "type": "CodeSimilarity", "props": {} }
  ]
}
"#;

    if config_path.exists() {
        if !force {
            return Err(miette::miette!(
                "Config file already exists. Use --force to overwrite."
            ));
        }
        std::fs::remove_file(&config_path).into_diagnostic()?;
    }

    let mut options = std::fs::OpenOptions::new();
    options.write(true).create_new(true);

    match options.open(&config_path) {
        Ok(mut file) => {
            use std::io::Write;
            file.write_all(default_config.as_bytes())
                .into_diagnostic()?;
            info!("Created {}", config_path.display());
            Ok(())
        }
        Err(e) => Err(e).into_diagnostic(),
    }
}

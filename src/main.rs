use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use miette::{IntoDiagnostic, Result};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use fileinfo_core::{FileinfoConfig, OutputFormat};

#[derive(Parser)]
#[command(
    name = "fileinfo",
    version,
    about = "Per-file size, recency and churn metrics from git history",
    long_about = "fileinfo reports, for every file in a git working tree, its lines of code,\n\
                   the date of the last commit that touched it, and its churn (commits,\n\
                   additions, deletions) over a recent window of history.\n\n\
                   Examples:\n  \
                     fileinfo analyze                 Analyze the current directory\n  \
                     fileinfo analyze --path ../repo  Analyze another working tree\n  \
                     fileinfo --format json analyze   Emit machine-readable findings\n  \
                     fileinfo init                    Write a default .fileinfo.toml"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to configuration file (default: .fileinfo.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        global = true,
        default_value = "text",
        long_help = "Output format for command results.\n\n\
                       Formats:\n  \
                         text      Aligned table (default)\n  \
                         json      Window summary plus one finding per file, camelCase keys\n  \
                         markdown  GitHub-flavored Markdown table"
    )]
    format: OutputFormat,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    verbose: bool,

    /// When to use colors
    #[arg(long, global = true, default_value = "auto")]
    color: ColorChoice,
}

#[derive(Subcommand)]
enum Command {
    /// Compute size, recency and churn for every file
    #[command(long_about = "Compute size, recency and churn for every file.\n\n\
        The working tree must be a full (non-shallow) clone with every file tracked.\n\
        Churn is measured over the latest 100 commits or the last 90 days before the\n\
        newest commit, whichever holds more commits (see [churn] in .fileinfo.toml).\n\n\
        Examples:\n  fileinfo analyze\n  fileinfo --format json analyze --path /src/project")]
    Analyze {
        /// Repository root (default: current directory)
        #[arg(long, default_value = ".")]
        path: PathBuf,
    },
    /// Create a default .fileinfo.toml configuration file
    #[command(long_about = "Create a default .fileinfo.toml configuration file.\n\n\
        Generates a commented-out template with all available options.\n\
        Fails if .fileinfo.toml already exists.")]
    Init,
    /// Generate shell completion scripts
    #[command(hide = true)]
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Clone, PartialEq, Eq, ValueEnum)]
enum ColorChoice {
    /// Auto-detect based on terminal
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

const DEFAULT_CONFIG: &str = r#"# fileinfo configuration

[churn]
# Count window: the latest N commits.
# window_commits = 100
# Time window: commits within N days of the newest commit.
# window_days = 90

[scan]
# Paths passed to each git ls-files / wc invocation.
# batch_size = 1000
# Write the commit-graph cache before reading history.
# commit_graph = true
"#;

fn print_welcome(use_color: bool) {
    let version = env!("CARGO_PKG_VERSION");

    if use_color {
        println!("\x1b[1mfileinfo\x1b[0m v{version} — file size, recency and churn from git history\n");
        println!("Commands:");
        println!("  \x1b[32manalyze\x1b[0m  Compute metrics for every file in a working tree");
        println!("  \x1b[32minit\x1b[0m     Create default configuration\n");
    } else {
        println!("fileinfo v{version} — file size, recency and churn from git history\n");
        println!("Commands:");
        println!("  analyze  Compute metrics for every file in a working tree");
        println!("  init     Create default configuration\n");
    }

    println!("Run 'fileinfo <command> --help' for details.");
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<FileinfoConfig> {
    let config = match path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading configuration");
            FileinfoConfig::from_file(path)?
        }
        None => {
            let default_path = Path::new(".fileinfo.toml");
            if default_path.exists() {
                tracing::debug!("loading .fileinfo.toml");
                FileinfoConfig::from_file(default_path)?
            } else {
                tracing::debug!("no configuration file; using defaults");
                FileinfoConfig::default()
            }
        }
    };
    Ok(config)
}

fn run_analyze(path: &Path, config: &FileinfoConfig, format: OutputFormat, verbose: bool) -> Result<()> {
    // Hint: not a git repository
    if !path.join(".git").exists() && git2::Repository::open(path).is_err() {
        let help = match git2::Repository::discover(path) {
            Ok(repo) => match repo.workdir() {
                Some(root) => format!("the working tree root is {}; pass --path there", root.display()),
                None => "fileinfo needs a working tree, not a bare repository".to_string(),
            },
            Err(_) => "run fileinfo from inside a git repository, or specify --path to one".to_string(),
        };
        miette::bail!(miette::miette!(
            help = help,
            "Not the root of a git repository: {}",
            path.display()
        ));
    }

    if verbose {
        eprintln!(
            "Analyzing {} (count window {} commits, time window {} days)...",
            path.display(),
            config.churn.window_commits,
            config.churn.window_days
        );
    }

    let spinner = if std::io::stderr().is_terminal() && !verbose {
        let pb = indicatif::ProgressBar::new_spinner();
        if let Ok(style) = indicatif::ProgressStyle::with_template("{spinner:.cyan} {msg} ({elapsed})") {
            pb.set_style(style);
        }
        pb.set_message("Mining git history...");
        pb.enable_steady_tick(std::time::Duration::from_millis(120));
        Some(pb)
    } else {
        None
    };

    let report = fileinfo_history::metrics::analyze(path, config).inspect_err(|_e| {
        if let Some(pb) = &spinner {
            pb.finish_and_clear();
        }
    })?;

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
    if verbose {
        eprintln!(
            "Analyzed {} files over {} commits.",
            report.records.len(),
            report.number_of_commits
        );
    }

    match format {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "window": report.window,
                "numberOfCommits": report.number_of_commits,
                "issues": report.findings(),
            });
            println!("{}", serde_json::to_string_pretty(&json).into_diagnostic()?);
        }
        OutputFormat::Markdown => print!("{}", report.to_markdown()),
        OutputFormat::Text => print!("{report}"),
    }

    Ok(())
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .build(),
        )
    }))
    .expect("miette handler");
    human_panic::setup_panic!();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let use_color = match cli.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => std::io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    };

    match cli.command {
        None => print_welcome(use_color),
        Some(Command::Analyze { ref path }) => {
            let config = load_config(cli.config.as_deref())?;
            run_analyze(path, &config, cli.format, cli.verbose)?;
        }
        Some(Command::Init) => {
            let path = Path::new(".fileinfo.toml");
            if path.exists() {
                miette::bail!(".fileinfo.toml already exists");
            }
            std::fs::write(path, DEFAULT_CONFIG).into_diagnostic()?;
            println!("Created .fileinfo.toml with default configuration");
        }
        Some(Command::Completions { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "fileinfo", &mut std::io::stdout());
        }
    }

    Ok(())
}

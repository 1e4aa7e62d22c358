//! step-tools: assembly trees and structural diffs for STEP-AP242 files
//!
//! Works on the part/relation records extracted from STEP files by an
//! upstream parser, serialized as JSON or YAML.

#![allow(clippy::needless_pass_by_value)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;
use step_tools::{
    cli,
    config::{
        self, AppConfig, DiffConfig, GraphCommandConfig, TreeConfig, Validatable,
        CONFIG_FILE_NAMES,
    },
    diff::RootPolicy,
    pipeline::exit_codes,
    reports::{GraphStyle, ReportFormat},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Build long version string with input/output format info
const fn build_long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        "\n\nInput records:",
        "\n  JSON (.json), YAML (.yaml, .yml)",
        "\n\nOutput Formats:",
        "\n  tree, table, json, dot, summary",
        "\n\nGraph Styles:",
        "\n  normal, rankdir-lr, folder"
    )
}

#[derive(Parser)]
#[command(name = "step-tools")]
#[command(version, long_version = build_long_version())]
#[command(about = "Assembly trees and structural diffs for STEP-AP242 files", long_about = None)]
#[command(after_help = "EXIT CODES:
    0  Success
    1  Files differ (with --fail-on-change)
    2  Unresolved nodes remain (with --fail-on-unresolved)
    3  Error occurred

EXAMPLES:
    # Show the instance tree of one file
    step-tools tree bracket.json

    # Only the branches leading to bolts
    step-tools tree bracket.json --match 'Bolt'

    # Compare two revisions
    step-tools diff rev-a.json rev-b.json -o table

    # CI check: fail if the structure changed
    step-tools diff rev-a.json rev-b.json -o summary --fail-on-change

    # Render the part graph
    step-tools graph bracket.json --style folder | dot -Tsvg > bracket.svg")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output (also respects `NO_COLOR` env)
    #[arg(long, global = true)]
    no_color: bool,

    /// Path to configuration file
    #[arg(long, global = true, env = "STEP_TOOLS_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

// ============================================================================
// Command argument structs
// ============================================================================

/// Arguments for the `tree` subcommand
#[derive(Parser)]
struct TreeArgs {
    /// Path to the part/relation records
    file: PathBuf,

    /// Output format [default: tree]
    #[arg(short, long)]
    output: Option<ReportFormat>,

    /// Output file path (stdout if not specified)
    #[arg(short = 'O', long)]
    output_file: Option<PathBuf>,

    /// Keep only instances whose path matches this regex (plus their ancestors)
    #[arg(short, long = "match", value_name = "REGEX")]
    matches: Option<String>,
}

/// Arguments for the `diff` subcommand
#[derive(Parser)]
struct DiffArgs {
    /// Path to the first (reference) file
    first: PathBuf,

    /// Path to the second file
    second: PathBuf,

    /// Output format [default: tree]
    #[arg(short, long)]
    output: Option<ReportFormat>,

    /// Output file path (stdout if not specified)
    #[arg(short = 'O', long)]
    output_file: Option<PathBuf>,

    /// What to do with second-file roots absent from the first file
    #[arg(long)]
    root_policy: Option<RootPolicy>,

    /// Exit with code 1 if the files differ
    #[arg(long)]
    fail_on_change: bool,

    /// Exit with code 2 if some second-file nodes could not be placed
    #[arg(long)]
    fail_on_unresolved: bool,
}

/// Arguments for the `graph` subcommand
#[derive(Parser)]
struct GraphArgs {
    /// Path to the part/relation records
    file: PathBuf,

    /// Graph layout [default: normal]
    #[arg(short, long)]
    style: Option<GraphStyle>,

    /// Label edges with the relation that creates them
    #[arg(long)]
    label_relations: bool,

    /// Output file path (stdout if not specified)
    #[arg(short = 'O', long)]
    output_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the instance tree of one file
    Tree(TreeArgs),

    /// Merge the trees of two files and show where they differ
    Diff(DiffArgs),

    /// Render the part/relation graph as Graphviz DOT
    Graph(GraphArgs),

    /// Dump the header and raw records of a file
    Info {
        /// Path to the part/relation records
        file: PathBuf,

        /// Output file path (stdout if not specified)
        #[arg(short = 'O', long)]
        output_file: Option<PathBuf>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Generate JSON Schema for the config file format
    ConfigSchema {
        /// Write schema to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show, discover, or initialize configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Sub-subcommands for the `config` command
#[derive(Subcommand)]
enum ConfigAction {
    /// Print current effective configuration (merged from defaults + file)
    Show,
    /// Print config file search paths and discovered config file
    Path,
    /// Generate an example .step-tools.yaml in the current directory
    Init,
}

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match run(cli) {
        Ok(code) => {
            if code != exit_codes::SUCCESS {
                std::process::exit(code);
            }
        }
        Err(e) => {
            eprintln!("Error: {e:?}");
            std::process::exit(exit_codes::ERROR);
        }
    }
}

/// Load the config file and layer the global CLI flags over it.
fn load_app_config(cli: &Cli, overrides: AppConfig) -> AppConfig {
    let overrides = AppConfig {
        output: config::OutputConfig {
            no_color: cli.no_color,
            ..overrides.output
        },
        behavior: config::BehaviorConfig {
            quiet: cli.quiet,
            ..overrides.behavior
        },
        ..overrides
    };
    let (app, loaded_from) =
        AppConfig::from_file_with_overrides(cli.config.as_deref(), &overrides);
    if let Some(path) = loaded_from {
        tracing::debug!("Using config file {}", path.display());
    }
    app
}

/// Fail with every validation error at once.
fn ensure_valid(config: &impl Validatable) -> Result<()> {
    let errors = config.validate();
    if errors.is_empty() {
        return Ok(());
    }
    let details: Vec<String> = errors.iter().map(ToString::to_string).collect();
    anyhow::bail!("Invalid configuration:\n  {}", details.join("\n  "))
}

fn run(cli: Cli) -> Result<i32> {
    match &cli.command {
        Commands::Tree(args) => {
            let mut app = load_app_config(&cli, AppConfig::default());
            if let Some(format) = args.output {
                app.output.format = format;
            }
            if args.output_file.is_some() {
                app.output.file.clone_from(&args.output_file);
            }

            let config = TreeConfig {
                path: args.file.clone(),
                filter: args.matches.clone(),
                output: app.output,
                behavior: app.behavior,
            };
            ensure_valid(&config)?;
            cli::run_tree(config)
        }

        Commands::Diff(args) => {
            let overrides = AppConfig::builder()
                .fail_on_change(args.fail_on_change)
                .fail_on_unresolved(args.fail_on_unresolved)
                .build();
            let mut app = load_app_config(&cli, overrides);
            if let Some(format) = args.output {
                app.output.format = format;
            }
            if args.output_file.is_some() {
                app.output.file.clone_from(&args.output_file);
            }
            if let Some(policy) = args.root_policy {
                app.diff.root_policy = policy;
            }

            let config = DiffConfig::from_app(args.first.clone(), args.second.clone(), &app);
            ensure_valid(&config)?;
            cli::run_diff(config)
        }

        Commands::Graph(args) => {
            let overrides = AppConfig::builder()
                .label_relations(args.label_relations)
                .build();
            let mut app = load_app_config(&cli, overrides);
            if let Some(style) = args.style {
                app.graph.style = style;
            }

            let config = GraphCommandConfig {
                path: args.file.clone(),
                graph: app.graph,
                file: args.output_file.clone(),
                behavior: app.behavior,
            };
            ensure_valid(&config)?;
            cli::run_graph(config)
        }

        Commands::Info { file, output_file } => {
            cli::run_info(file, output_file.clone(), cli.quiet)
        }

        Commands::Completions { shell } => {
            generate(*shell, &mut Cli::command(), "step-tools", &mut io::stdout());
            Ok(exit_codes::SUCCESS)
        }

        Commands::ConfigSchema { output } => {
            let schema = config::generate_json_schema();
            match output {
                Some(path) => {
                    std::fs::write(path, &schema)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    eprintln!("Schema written to {}", path.display());
                }
                None => println!("{schema}"),
            }
            Ok(exit_codes::SUCCESS)
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                let (app, loaded_from) = config::load_or_default(cli.config.as_deref());
                if let Some(path) = &loaded_from {
                    eprintln!("# Loaded from: {}", path.display());
                } else {
                    eprintln!("# No config file found; showing defaults");
                }
                let yaml = serde_yaml::to_string(&app).context("failed to serialize config")?;
                print!("{yaml}");
                Ok(exit_codes::SUCCESS)
            }
            ConfigAction::Path => {
                let search_paths: [Option<String>; 3] = [
                    std::env::current_dir()
                        .ok()
                        .map(|p| p.display().to_string()),
                    dirs::config_dir().map(|p| p.join("step-tools").display().to_string()),
                    dirs::home_dir().map(|p| p.display().to_string()),
                ];
                eprintln!("Config file search paths (in order, plus the git root):");
                for path in search_paths.into_iter().flatten() {
                    eprintln!("  {path}");
                }
                eprintln!();
                eprintln!("Recognized file names:");
                for name in CONFIG_FILE_NAMES {
                    eprintln!("  {name}");
                }
                eprintln!();
                match config::discover_config_file(cli.config.as_deref()) {
                    Some(path) => eprintln!("Active config file: {}", path.display()),
                    None => eprintln!("No config file found."),
                }
                Ok(exit_codes::SUCCESS)
            }
            ConfigAction::Init => {
                let target = std::env::current_dir()
                    .context("cannot determine current directory")?
                    .join(".step-tools.yaml");
                if target.exists() {
                    anyhow::bail!(
                        "{} already exists. Remove it first to re-initialize.",
                        target.display()
                    );
                }
                std::fs::write(&target, config::generate_example_config())
                    .with_context(|| format!("failed to write {}", target.display()))?;
                eprintln!("Created {}", target.display());
                Ok(exit_codes::SUCCESS)
            }
        },
    }
}

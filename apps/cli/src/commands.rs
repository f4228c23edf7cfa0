//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr};
use indicatif::{ProgressBar, ProgressStyle};
use menuforge_core::check::check_outputs;
use menuforge_core::pipeline::{GenerateResult, ProgressReporter, generate};
use menuforge_shared::{
    AppConfig, GenerateConfig, ListingOrder, init_config, load_config, load_config_from,
};
use tracing::info;

/// Crates whose events are shown at the selected verbosity.
const LOG_TARGETS: &[&str] = &[
    "menuforge",
    "menuforge_core",
    "menuforge_links",
    "menuforge_scanner",
    "menuforge_shared",
];

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// menuforge — generate portfolio menu data from CSV link lists and article folders.
#[derive(Parser)]
#[command(
    name = "menuforge",
    version,
    about = "Generate portfolio menu data from CSV link lists and Markdown article folders.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file (defaults to ./menuforge.toml, then ~/.menuforge/menuforge.toml).
    #[arg(long, global = true, env = "MENUFORGE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Defaults to `generate` when omitted.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Scan the input directory and write article indexes and the menu module.
    Generate(GenerateArgs),

    /// Verify a previously generated output directory.
    Check {
        /// Output directory to check (defaults to the configured one).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Flags for `generate`, each overriding the config file.
#[derive(Args, Default)]
pub(crate) struct GenerateArgs {
    /// Directory holding CSV link lists and article folders.
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Directory receiving the generated files.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Also write the menu as a standalone JSON document.
    #[arg(long)]
    pub emit_json: bool,

    /// Visit entries in name order instead of file-system order.
    #[arg(long)]
    pub sorted: bool,

    /// Create the output directory if it does not exist.
    #[arg(long)]
    pub create_output_dir: bool,
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Write a config file with defaults.
    Init {
        /// Where to write it (defaults to ./menuforge.toml).
        path: Option<PathBuf>,
    },
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let directives = LOG_TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",");

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();
    match cli.command {
        None => cmd_generate(config_path, GenerateArgs::default()),
        Some(Command::Generate(args)) => cmd_generate(config_path, args),
        Some(Command::Check { output }) => cmd_check(config_path, output),
        Some(Command::Config { action }) => match action {
            ConfigAction::Init { path } => cmd_config_init(path.as_deref().or(config_path)),
            ConfigAction::Show => cmd_config_show(config_path),
        },
    }
}

/// Load the explicit config file, or fall back to the default lookup.
fn resolve_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = match path {
        Some(path) => load_config_from(path)
            .wrap_err_with(|| format!("cannot load config '{}'", path.display()))?,
        None => load_config()?,
    };
    Ok(config)
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_generate(config_path: Option<&Path>, args: GenerateArgs) -> Result<()> {
    let app = resolve_config(config_path)?;
    let mut config = GenerateConfig::from(&app);

    if let Some(input) = args.input {
        config.input_dir = input;
    }
    if let Some(output) = args.output {
        config.output_dir = output;
    }
    if args.emit_json {
        config.emit_json = true;
    }
    if args.sorted {
        config.order = ListingOrder::Name;
    }
    if args.create_output_dir {
        config.create_output_dir = true;
    }

    info!(
        input = %config.input_dir.display(),
        output = %config.output_dir.display(),
        order = ?config.order,
        "generating menu data"
    );

    let reporter = CliProgress::new()?;
    let result = generate(&config, &reporter)?;

    println!();
    println!("  Menu data generated!");
    println!("  Items:    {}", result.menu.len());
    println!("  Folders:  {}", result.folder_count);
    println!("  Articles: {}", result.article_count);
    println!("  Links:    {}", result.link_count);
    println!("  Output:   {}", result.output_dir.display());
    for file in &result.files {
        println!(
            "    {}  {} ({} bytes)",
            &file.sha256[..12],
            file.path.display(),
            file.size_bytes
        );
    }
    println!("  Time:     {:.2}s", result.elapsed.as_secs_f64());
    println!();

    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Result<Self> {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")?
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Ok(Self { spinner })
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn folder_indexed(&self, subdirectory: &str, articles: usize) {
        self.spinner
            .set_message(format!("Indexed {subdirectory}/ ({articles} articles)"));
    }

    fn links_flattened(&self, files: usize, links: usize) {
        self.spinner
            .set_message(format!("Flattened {links} links from {files} CSV files"));
    }

    fn done(&self, _result: &GenerateResult) {
        self.spinner.finish_and_clear();
    }
}

impl Drop for CliProgress {
    fn drop(&mut self) {
        if !self.spinner.is_finished() {
            self.spinner.finish_and_clear();
        }
    }
}

fn cmd_check(config_path: Option<&Path>, output: Option<PathBuf>) -> Result<()> {
    let app = resolve_config(config_path)?;
    let output_dir = output.unwrap_or_else(|| PathBuf::from(&app.paths.output_dir));

    info!(output = %output_dir.display(), "checking generated outputs");
    let report = check_outputs(&output_dir, &app.output.script_name, &app.output.variable)?;

    println!();
    println!("  Outputs are consistent.");
    println!("  Items:    {}", report.items);
    println!("  Modals:   {}", report.modals);
    println!("  Links:    {}", report.links);
    println!("  Spacers:  {}", report.spacers);
    println!("  Articles: {}", report.articles);
    println!();

    Ok(())
}

fn cmd_config_init(path: Option<&Path>) -> Result<()> {
    let path = init_config(path)?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config_path: Option<&Path>) -> Result<()> {
    let config = resolve_config(config_path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_generate() {
        let cli = Cli::parse_from(["menuforge"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn generate_flags_parse() {
        let cli = Cli::parse_from([
            "menuforge",
            "-v",
            "generate",
            "--input",
            "site/md",
            "--output",
            "site/json",
            "--sorted",
            "--emit-json",
        ]);
        assert_eq!(cli.verbose, 1);
        match cli.command {
            Some(Command::Generate(args)) => {
                assert_eq!(args.input, Some(PathBuf::from("site/md")));
                assert_eq!(args.output, Some(PathBuf::from("site/json")));
                assert!(args.sorted);
                assert!(args.emit_json);
                assert!(!args.create_output_dir);
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn global_config_flag_after_subcommand() {
        let cli = Cli::parse_from(["menuforge", "check", "--config", "alt.toml"]);
        assert_eq!(cli.config, Some(PathBuf::from("alt.toml")));
        assert!(matches!(cli.command, Some(Command::Check { output: None })));
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}

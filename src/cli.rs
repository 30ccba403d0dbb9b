use crate::config::Config;
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};

/// Command-line interface for the literate tool
#[derive(Parser, Debug)]
#[command(
    name = "literate",
    version,
    about = "Split source files into documentation and code segments."
)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub args: ProcessArgs,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a configuration file with the default grammar tables
    Init {
        /// Where to write the configuration
        #[arg(short, long, default_value = "literate.toml")]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(short, long, default_value_t = false)]
        force: bool,
    },

    /// List the configured languages
    Languages {
        /// Configuration file to use instead of discovery
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Args, Debug, Default)]
pub struct ProcessArgs {
    /// Files, directories or glob patterns to segment
    pub paths: Vec<String>,

    /// Force a language id instead of detecting it from the extension
    #[arg(short, long)]
    pub language: Option<String>,

    /// Configuration file to use instead of discovery
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Summary)]
    pub format: OutputFormat,

    /// Write one output file per source into this directory
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Disable .gitignore file processing
    #[arg(long = "no-gitignore", default_value_t = false)]
    pub no_gitignore: bool,

    /// Number of worker threads (defaults to the number of CPUs)
    #[arg(short = 'j', long)]
    pub threads: Option<usize>,

    /// Log progress information
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// One line per file with segment counts
    #[default]
    Summary,
    /// The document as JSON
    Json,
    /// A literate markdown file with fenced code blocks
    Markdown,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Summary => "txt",
            OutputFormat::Json => "json",
            OutputFormat::Markdown => "md",
        }
    }
}

impl Cli {
    /// Write the template configuration to `output`
    pub fn handle_init_command(output: &Path, force: bool) -> Result<()> {
        if output.exists() && !force {
            anyhow::bail!(
                "Configuration file already exists: {}. Use --force to overwrite.",
                output.display()
            );
        }

        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        fs::write(output, Config::template())
            .with_context(|| format!("Failed to write config file: {}", output.display()))?;

        println!("Created configuration file: {}", output.display());
        Ok(())
    }

    /// Resolve the configuration: an explicit file, otherwise discovered
    /// files, otherwise the built-in template
    pub fn load_config(config: Option<&Path>) -> Result<Config> {
        if let Some(path) = config {
            return Config::from_file(path)
                .with_context(|| format!("Failed to load config file: {}", path.display()));
        }

        let cwd = std::env::current_dir().context("Failed to read current directory")?;
        match Config::discover(&cwd).context("Failed to load discovered configuration")? {
            Some((config, paths)) => {
                for path in &paths {
                    log::info!("Using configuration {}", path.display());
                }
                Ok(config)
            }
            None => {
                log::info!("No configuration found, using default grammars");
                Config::parse(&Config::template()).context("Default configuration is invalid")
            }
        }
    }
}

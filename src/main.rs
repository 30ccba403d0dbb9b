use anyhow::{Context, Result};
use clap::Parser;
use literate::cli::{Cli, Commands, OutputFormat, ProcessArgs};
use literate::languages::LanguageRegistry;
use literate::output::json::to_json;
use literate::output::markdown::to_markdown;
use literate::processor::{ProcessedFile, Processor};
use literate::utils::path::{expand_paths, output_path};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.args.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .target(env_logger::Target::Stderr)
        .init();
}

fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Some(Commands::Init { output, force }) => {
            Cli::handle_init_command(&output, force)?;
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::Languages { config }) => list_languages(config.as_deref()),
        None => process(&cli.args),
    }
}

fn list_languages(config: Option<&Path>) -> Result<ExitCode> {
    let config = Cli::load_config(config)?;
    let registry = LanguageRegistry::from_config(&config)?;

    for id in registry.get_supported_languages() {
        if let Some(grammar) = registry.get_language(&id) {
            println!(
                "{:<12} {:<12} {}",
                id,
                grammar.name(),
                grammar.extensions().join(", ")
            );
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn process(args: &ProcessArgs) -> Result<ExitCode> {
    if args.paths.is_empty() {
        anyhow::bail!("No input paths given. Run with --help for usage.");
    }

    let config = Cli::load_config(args.config.as_deref())?;
    let registry = LanguageRegistry::from_config(&config)?;
    if let Some(language) = &args.language {
        registry.grammar(language)?;
    }

    let threads = args.threads.unwrap_or_else(num_cpus::get).max(1);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .context("Failed to start worker threads")?;

    let files: Vec<PathBuf> = expand_paths(&args.paths, !args.no_gitignore)
        .into_iter()
        .filter(|path| {
            let supported = args.language.is_some() || registry.detect_language(path).is_some();
            if !supported {
                log::info!("Skipping unsupported file type: {}", path.display());
            }
            supported
        })
        .collect();

    if files.is_empty() {
        eprintln!("No supported files found matching the provided patterns.");
        return Ok(ExitCode::SUCCESS);
    }

    log::info!("Segmenting {} file(s) on {threads} thread(s)", files.len());

    let processor = Processor::new(registry);
    let outcomes = processor.process_files(&files, args.language.as_deref());

    let mut failures = 0;
    let mut diagnostics = 0;

    for outcome in outcomes {
        match outcome.result {
            Ok(processed) => {
                diagnostics += processed.document.diagnostics().len();
                if let Err(err) = emit(&processed, args) {
                    failures += 1;
                    eprintln!("Error writing output for {}: {err:#}", outcome.path.display());
                }
            }
            Err(err) => {
                failures += 1;
                eprintln!("Error processing {}: {err:#}", outcome.path.display());
            }
        }
    }

    if args.format == OutputFormat::Summary || args.output_dir.is_some() {
        println!(
            "{} files processed, {failures} failed, {diagnostics} diagnostics",
            files.len()
        );
    }

    Ok(if failures > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn emit(processed: &ProcessedFile, args: &ProcessArgs) -> Result<()> {
    let rendered = match args.format {
        OutputFormat::Summary => summary_line(processed),
        OutputFormat::Json => {
            to_json(&processed.path, &processed.document, args.output_dir.is_some())?
        }
        OutputFormat::Markdown => to_markdown(&processed.document)?,
    };

    match &args.output_dir {
        Some(dir) => {
            let target = output_path(dir, &processed.path, args.format.extension());
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
            }
            fs::write(&target, rendered)
                .with_context(|| format!("Failed to write {}", target.display()))?;
            log::info!("Wrote {}", target.display());
        }
        None if args.format == OutputFormat::Markdown => print!("{rendered}"),
        None => println!("{rendered}"),
    }

    Ok(())
}

fn summary_line(processed: &ProcessedFile) -> String {
    let document = &processed.document;
    let mut line = format!(
        "{}: {} documentation, {} code segment(s)",
        processed.path.display(),
        document.count_documentation(),
        document.count_code()
    );
    for diagnostic in document.diagnostics() {
        line.push_str(&format!("\n  warning {diagnostic}"));
    }
    line
}

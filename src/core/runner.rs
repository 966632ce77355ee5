//! Command runners
//!
//! One function per subcommand. Each prints its own user-facing output and
//! returns the process exit code; unexpected failures bubble up as
//! `anyhow` errors for [`crate::core::platform::handle_error`].

use crate::config::{CharacterSet, Verbosity, chars_to_unicode_list, collect_characters, load_config};
use crate::core::cli::{CliArgs, Command};
use crate::core::config_file::ToolConfig;
use crate::logging::{self, GenerationLog};
use crate::pipeline::generate_font;
use crate::tools::Toolchain;
use crate::tools::checker::check_all;
use anyhow::{Context, Result};
use crossterm::style::Stylize;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

const PREVIEW_CHARS: usize = 50;
const EXTRACT_LISTED: usize = 20;

/// Run the parsed command line
pub async fn run_app(cli_args: CliArgs) -> Result<ExitCode> {
    match cli_args.command {
        Command::Check { verbose } => run_check(verbose).await,
        Command::Generate {
            config,
            dry_run,
            verbose,
            debug,
        } => run_generate(&config, dry_run, verbose, debug).await,
        Command::Extract { text_file } => run_extract(&text_file),
        Command::Show { config } => run_show(&config),
    }
}

async fn run_check(verbose: bool) -> Result<ExitCode> {
    let _guard = logging::init(Verbosity::Default);
    println!("Checking required tools...\n");

    let toolchain = Toolchain::from_config(ToolConfig::load().as_ref());
    let mut all_good = true;

    for (category, statuses) in check_all(&toolchain).await {
        println!("{category}:");
        for status in statuses {
            if status.exists {
                let mark = "✓".green().bold();
                match status.version.as_deref() {
                    Some(version) if verbose => println!("  {mark} {:15} ({version})", status.name),
                    _ => println!("  {mark} {}", status.name),
                }
            } else {
                all_good = false;
                println!("  {} {:15} Install: {}", "✗".red().bold(), status.name, status.install);
            }
        }
        println!();
    }

    if all_good {
        println!("{}", "All required tools are installed!".green().bold());
        Ok(ExitCode::SUCCESS)
    } else {
        println!("{}", "Some required tools are missing. Please install them.".red());
        Ok(ExitCode::FAILURE)
    }
}

async fn run_generate(config_path: &Path, dry_run: bool, verbose: bool, debug: bool) -> Result<ExitCode> {
    println!("Loading config from {}...", config_path.display());
    let config = load_config(config_path).context("Error loading config")?;

    let verbosity = config.verbosity(verbose, debug);
    let _guard = logging::init(verbosity);

    println!("Collecting characters...");
    let chars = collect_characters(&config, Some(&config_dir(config_path)))
        .context("Failed to collect characters")?;
    println!(
        "Found {} unique characters: {}",
        chars.len(),
        character_preview(&chars, PREVIEW_CHARS)
    );

    if dry_run {
        println!("\n{}", "Dry run - would generate:".bold());
        println!("  Characters: {}", chars.len());
        println!("  Sizes: {}", format_list(&config.sizes));
        println!("  Formats: {}", format_list(&config.output.formats));
        return Ok(ExitCode::SUCCESS);
    }

    let tool_config = ToolConfig::load();
    let output_dir = ToolConfig::resolve_output_dir(tool_config.as_ref(), &config.output.directory);
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create output directory {}", output_dir.display()))?;

    let toolchain = Toolchain::from_config(tool_config.as_ref());
    let mut log = GenerationLog::new(verbosity);

    if !verbosity.is_verbose() {
        println!("\nGenerating fonts...");
    }
    let generated_files = generate_font(&config, &chars, &output_dir, &toolchain, &mut log)
        .await
        .context("Font generation failed")?;

    if !generated_files.is_empty() {
        println!("\n{}", "✓ Font generation complete!".green().bold());
        println!("  Generated {} font files", generated_files.len());
        println!("  Output directory: {}", output_dir.display());
        return Ok(ExitCode::SUCCESS);
    }

    println!("\n{}", "✗ Font generation failed!".red().bold());
    println!("  No font files were generated");
    println!("  See errors above for details");
    if !log.warnings().is_empty() {
        println!("\n  Warnings: {}", log.warnings().len());
    }
    if !log.errors().is_empty() {
        println!("  Errors: {}", log.errors().len());
        if !verbosity.is_verbose() {
            println!("\n  Run with --verbose or --debug for more details");
        }
    }
    Ok(ExitCode::FAILURE)
}

fn run_extract(text_file: &Path) -> Result<ExitCode> {
    let text = std::fs::read_to_string(text_file)
        .with_context(|| format!("Failed to read {}", text_file.display()))?;
    let chars: CharacterSet = text.chars().collect();

    println!("Found {} unique characters:", chars.len());
    println!("{}", chars.iter().collect::<String>());

    println!("\nUnicode code points:");
    for (c, code_point) in chars.iter().zip(chars_to_unicode_list(&chars)).take(EXTRACT_LISTED) {
        println!("  {c} -> {code_point}");
    }
    if chars.len() > EXTRACT_LISTED {
        println!("  ... and {} more", chars.len() - EXTRACT_LISTED);
    }
    Ok(ExitCode::SUCCESS)
}

fn run_show(config_path: &Path) -> Result<ExitCode> {
    let config = load_config(config_path).context("Error loading config")?;
    let chars = collect_characters(&config, Some(&config_dir(config_path)))?;

    println!("Configuration: {}", config_path.display());
    println!("Character count: {}", chars.len());
    println!("Characters: {}", chars.iter().collect::<String>());
    println!("\nSizes: {}", format_list(&config.sizes));
    println!("Formats: {}", format_list(&config.output.formats));
    Ok(ExitCode::SUCCESS)
}

/// Directory holding the config file, made absolute
fn config_dir(config_path: &Path) -> PathBuf {
    let absolute = std::path::absolute(config_path).unwrap_or_else(|_| config_path.to_path_buf());
    absolute
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// First `limit` characters in code point order, with "..." when cut short
fn character_preview(chars: &CharacterSet, limit: usize) -> String {
    let mut preview: String = chars.iter().take(limit).collect();
    if chars.len() > limit {
        preview.push_str("...");
    }
    preview
}

fn format_list<T: Display>(items: &[T]) -> String {
    let items: Vec<String> = items.iter().map(ToString::to_string).collect();
    format!("[{}]", items.join(", "))
}

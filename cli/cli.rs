mod cli_args;
mod output;
mod prompt;

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::process;

use cli_args::Cli;
use promptcat_core::{
    AppError, BinaryCheck, Config, OutputFormat, RuleSet, SelectOptions, SelectionSession,
    SessionOutcome, render_document, render_tree,
};

fn main() {
    let cli = Cli::parse();

    setup_logging(cli.quiet, cli.verbose);
    let quiet = cli.quiet;
    log::debug!("CLI args parsed: {:?}", cli);

    let exit_code = match run_app(cli) {
        Ok(code) => code,
        Err(e) => {
            let code = match e.downcast_ref::<AppError>() {
                Some(AppError::TomlParse(_)) => 1,
                Some(AppError::Io(_))
                | Some(AppError::FileRead { .. })
                | Some(AppError::Ignore(_))
                | Some(AppError::Glob(_)) => 2,
                Some(AppError::InvalidArgument(_)) => 5,
                Some(_) => 1,
                None => 1,
            };
            if !quiet || code == 5 {
                eprintln!("{} {:#}", "Error:".red().bold(), e);
            } else {
                log::error!("Run failed: {:#}", e);
            }
            code
        }
    };
    log::debug!("Exiting with code {}", exit_code);
    process::exit(exit_code);
}

fn setup_logging(quiet: bool, verbose: u8) {
    let log_level = if quiet {
        log::LevelFilter::Off
    } else {
        match verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };
    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();
}

fn run_app(cli: Cli) -> Result<i32> {
    let cwd = std::env::current_dir().context("Failed to determine working directory")?;
    let config = load_config(&cwd, &cli)?;
    let paths = resolve_input_paths(&cli)?;
    let settings = merge_settings(&config, &cli);

    let include = RuleSet::new(settings.include)?;
    let exclude = RuleSet::new(settings.exclude)?;
    let mut session = SelectionSession::new(&paths, include, exclude, settings.select);

    let mut prompt = prompt::TerminalPrompt::new(cli.yes, cli.keep_large, cli.quiet);
    let files = match session.run(&mut prompt)? {
        SessionOutcome::Done(files) => files,
        SessionOutcome::Empty => {
            eprintln!("No files found matching the criteria.");
            return Ok(0);
        }
    };
    log::info!("Rendering {} files", files.len());

    let base = session.match_base().to_path_buf();
    let rel_files: Vec<(PathBuf, String)> = files
        .into_iter()
        .map(|f| (base_relative(&f.path, &base), f.content))
        .collect();
    let rel_paths: Vec<PathBuf> = rel_files.iter().map(|(p, _)| p.clone()).collect();

    let root_name = base
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| base.display().to_string());
    let tree = render_tree(&rel_paths, &root_name);
    let document = render_document(&rel_files, &tree, settings.format);

    if let Some(path) = &cli.output {
        output::write_to_file(path, &document, cli.quiet)?;
    } else if cli.save {
        output::write_to_file(Path::new(output::DEFAULT_OUTPUT_FILENAME), &document, cli.quiet)?;
    } else if cli.copy {
        output::copy_to_clipboard(&document, cli.quiet)?;
    } else {
        output::write_to_stdout(&document)?;
    }
    Ok(0)
}

fn load_config(cwd: &Path, cli: &Cli) -> Result<Config> {
    match Config::resolve_config_path(cwd, cli.config.as_deref(), cli.no_config) {
        Some(path) => Config::load_from_path(&path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(Config::default()),
    }
}

/// Paths come from the command line, or from stdin when nothing was
/// given and stdin is piped. An interactive invocation with no paths
/// gathers the current directory.
fn resolve_input_paths(cli: &Cli) -> Result<Vec<PathBuf>> {
    if !cli.paths.is_empty() {
        return Ok(cli.paths.clone());
    }
    if atty::is(atty::Stream::Stdin) {
        log::info!("No paths given; gathering the current directory.");
        return Ok(vec![PathBuf::from(".")]);
    }
    let mut paths = Vec::new();
    for line in io::stdin().lock().lines() {
        let line = line.context("Failed to read paths from stdin")?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            paths.push(PathBuf::from(trimmed));
        }
    }
    if paths.is_empty() {
        return Err(AppError::InvalidArgument(
            "No paths provided. Pass paths as arguments or pipe them via stdin.".to_string(),
        )
        .into());
    }
    Ok(paths)
}

struct EffectiveSettings {
    include: Vec<String>,
    exclude: Vec<String>,
    select: SelectOptions,
    format: OutputFormat,
}

/// Config file values seed the settings, CLI flags override them.
fn merge_settings(config: &Config, cli: &Cli) -> EffectiveSettings {
    let mut include = config.filters.include.clone();
    include.extend(cli.include.iter().cloned());
    let mut exclude = config.filters.exclude.clone();
    exclude.extend(cli.exclude.iter().cloned());

    let mut select = SelectOptions {
        use_gitignore: config.general.use_gitignore,
        binary_check: config.general.binary_check,
        lossy_decode: config.general.lossy_decode,
    };
    if cli.no_gitignore {
        select.use_gitignore = false;
    }
    if cli.no_binary_check {
        select.binary_check = BinaryCheck::Off;
    }
    if cli.extension_only {
        select.binary_check = BinaryCheck::Extension;
    }
    if cli.strict_utf8 {
        select.lossy_decode = false;
    }

    let format = if cli.cxml {
        OutputFormat::Xml
    } else if cli.markdown {
        OutputFormat::Markdown
    } else {
        config.output.format
    };

    EffectiveSettings {
        include,
        exclude,
        select,
        format,
    }
}

fn base_relative(path: &Path, base: &Path) -> PathBuf {
    pathdiff::diff_paths(path, base).unwrap_or_else(|| path.to_path_buf())
}

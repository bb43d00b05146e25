use anyhow::{Context, Result};
use colored::*;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

pub const DEFAULT_OUTPUT_FILENAME: &str = "prompt-context.txt";

pub fn write_to_file(path: &Path, content: &str, quiet: bool) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
    }
    let mut file =
        File::create(path).with_context(|| format!("Failed to create file {}", path.display()))?;
    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write to file {}", path.display()))?;
    if !quiet {
        eprintln!(
            "{} Output written to {}",
            "✔".green(),
            path.display().to_string().blue()
        );
    }
    Ok(())
}

pub fn write_to_stdout(content: &str) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle
        .write_all(content.as_bytes())
        .context("Failed to write to stdout")?;
    if !content.ends_with('\n') {
        handle
            .write_all(b"\n")
            .context("Failed to write trailing newline to stdout")?;
    }
    handle.flush().context("Failed to flush stdout")
}

pub fn copy_to_clipboard(content: &str, quiet: bool) -> Result<()> {
    let mut clipboard =
        arboard::Clipboard::new().context("Failed to access the system clipboard")?;
    clipboard
        .set_text(content.to_owned())
        .context("Failed to copy output to the clipboard")?;
    if !quiet {
        eprintln!("{}", "Output copied to clipboard.".green());
    }
    Ok(())
}

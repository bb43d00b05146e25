use colored::*;
use dialoguer::Confirm;
use dialoguer::theme::ColorfulTheme;
use promptcat_core::{ConfirmOffenders, Offender};

/// Operator-facing side of the feedback loop: lists the flagged items on
/// stderr and asks whether to exclude them. `--yes` and `--keep-large`
/// answer without a prompt, as does a non-interactive terminal.
pub struct TerminalPrompt {
    assume_yes: bool,
    keep_large: bool,
    quiet: bool,
}

impl TerminalPrompt {
    pub fn new(assume_yes: bool, keep_large: bool, quiet: bool) -> Self {
        Self {
            assume_yes,
            keep_large,
            quiet,
        }
    }
}

impl ConfirmOffenders for TerminalPrompt {
    fn confirm(&mut self, offenders: &[Offender]) -> bool {
        if !self.quiet {
            eprintln!(
                "{}",
                "Warning: the following items contribute a large portion of the total output:"
                    .yellow()
            );
            for off in offenders {
                eprintln!(
                    "  - {} ({:.1}%, {} bytes)",
                    off.path.display().to_string().cyan(),
                    off.percent,
                    off.bytes
                );
            }
        }

        if self.keep_large {
            if !self.quiet {
                eprintln!("Proceeding with the current selection (--keep-large).");
            }
            return false;
        }
        if self.assume_yes {
            if !self.quiet {
                eprintln!("Excluding flagged items and regenerating (--yes).");
            }
            return true;
        }
        if !atty::is(atty::Stream::Stdin) || !atty::is(atty::Stream::Stderr) {
            log::info!("Not an interactive terminal; keeping the current selection.");
            return false;
        }

        match Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt("Exclude these items and regenerate the output?")
            .default(true)
            .interact()
        {
            Ok(choice) => choice,
            Err(e) => {
                log::warn!("Confirmation prompt failed ({}); keeping the current selection.", e);
                false
            }
        }
    }
}

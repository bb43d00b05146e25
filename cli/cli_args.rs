use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "promptcat",
    author,
    version,
    about = "Concatenate project files into an LLM-ready prompt document.",
    long_about = "promptcat walks the given paths, selects text files via .gitignore rules, \nexplicit include/exclude globs and binary detection, then renders their \ncontents behind a directory tree header for pasting into a model prompt. \nItems dominating the output size are flagged and can be excluded \ninteractively before the document is produced."
)]
pub struct Cli {
    #[arg(
        value_name = "PATH",
        help = "Files or directories to gather (default: '.' on a terminal, stdin lines otherwise)."
    )]
    pub paths: Vec<PathBuf>,

    #[arg(
        short = 'i',
        long = "include",
        value_name = "PATTERN",
        action = clap::ArgAction::Append,
        help = "Glob pattern for files to include.",
        help_heading = "Filtering"
    )]
    pub include: Vec<String>,

    #[arg(
        short = 'x',
        long = "exclude",
        value_name = "PATTERN",
        action = clap::ArgAction::Append,
        help = "Glob pattern for files/directories to exclude.",
        help_heading = "Filtering"
    )]
    pub exclude: Vec<String>,

    #[arg(
        long,
        help = "Disable parsing of .gitignore files.",
        help_heading = "Filtering"
    )]
    pub no_gitignore: bool,

    #[arg(
        long,
        help = "Keep files that look binary.",
        conflicts_with = "extension_only",
        help_heading = "Filtering"
    )]
    pub no_binary_check: bool,

    #[arg(
        long,
        help = "Detect binary files by extension only, without sampling content.",
        help_heading = "Filtering"
    )]
    pub extension_only: bool,

    #[arg(
        long,
        help = "Skip files with invalid UTF-8 instead of decoding them lossily.",
        help_heading = "Filtering"
    )]
    pub strict_utf8: bool,

    #[arg(
        short = 'y',
        long,
        help = "Exclude flagged large items and regenerate without prompting.",
        conflicts_with = "keep_large",
        help_heading = "Large Content"
    )]
    pub yes: bool,

    #[arg(
        long,
        help = "Keep flagged large items without prompting.",
        help_heading = "Large Content"
    )]
    pub keep_large: bool,

    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        help = "Write output to FILE instead of stdout.",
        conflicts_with_all = ["save", "copy"],
        help_heading = "Output Control"
    )]
    pub output: Option<PathBuf>,

    #[arg(
        short = 's',
        long,
        help = "Write output to the default file instead of stdout.",
        conflicts_with = "copy",
        help_heading = "Output Control"
    )]
    pub save: bool,

    #[arg(
        short = 'C',
        long,
        help = "Copy the final output to the system clipboard.",
        help_heading = "Output Control"
    )]
    pub copy: bool,

    #[arg(
        short = 'c',
        long,
        help = "Output an XML-ish document set suitable for Claude.",
        conflicts_with = "markdown",
        help_heading = "Output Formatting"
    )]
    pub cxml: bool,

    #[arg(
        short = 'm',
        long,
        help = "Output Markdown with fenced code blocks.",
        help_heading = "Output Formatting"
    )]
    pub markdown: bool,

    #[arg(
        long,
        value_name = "FILE",
        help = "Path of the TOML config file (default: .promptcat.toml).",
        conflicts_with = "no_config",
        help_heading = "Project Setup"
    )]
    pub config: Option<PathBuf>,

    #[arg(
        long,
        help = "Disable loading any TOML config file.",
        help_heading = "Project Setup"
    )]
    pub no_config: bool,

    #[arg(short, long, action = clap::ArgAction::Count, help = "Increase message verbosity (-v, -vv).")]
    pub verbose: u8,

    #[arg(short, long, help = "Silence informational messages and warnings.")]
    pub quiet: bool,
}

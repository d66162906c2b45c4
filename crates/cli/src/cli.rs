use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Label text with regex rules.
///
/// Rules are read from a JSON or YAML file, or from every rule file in a
/// directory. Texts come from `--text`, a file, or stdin.
#[derive(Parser, Debug)]
#[command(name = "rulebox", version, about = "Label text with regex rules")]
pub struct CliArgs {
    /// Rule file or directory (falls back to RULES_PATH).
    #[arg(long, short, global = true)]
    pub rules: Option<PathBuf>,

    /// Config profile; keys are looked up as {PROFILE}_{KEY} first.
    #[arg(long, env = "RULEBOX_PROFILE", default_value = "", global = true)]
    pub profile: String,

    /// Evaluate batches on the calling thread only.
    #[arg(long, global = true)]
    pub sequential: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Assign labels to every input text.
    Label {
        #[command(flatten)]
        input: InputArgs,

        /// Drop repeated labels and sort each text's labels.
        #[arg(long)]
        unique: bool,

        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },

    /// Check rule sources and report every problem found.
    Validate {
        /// Rule files or directories to check (default: --rules).
        paths: Vec<PathBuf>,
    },

    /// Show each rule's verdict for a single text.
    Explain {
        /// Text to evaluate.
        text: String,
    },
}

#[derive(Args, Debug)]
pub struct InputArgs {
    /// Text to label; repeat for several. Cannot be combined with `--input` or `--json`.
    #[arg(long, short, conflicts_with_all = ["input", "json"])]
    pub text: Vec<String>,

    /// Read texts from this file instead of stdin.
    #[arg(long, short)]
    pub input: Option<PathBuf>,

    /// Input is a JSON array of strings rather than one text per line.
    #[arg(long)]
    pub json: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// One JSON array of label arrays.
    Json,
    /// One line per text: labels joined by commas.
    Lines,
}

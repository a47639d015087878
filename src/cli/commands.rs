// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// One subcommand per utility operation:
//
//   clean        — clean text from a file or stdin
//   load-pickle  — load <dir>/<name>.pkl and print it
//   tokenize     — encode one text to a fixed-length triple
//
// Flags left unset fall back to the pipeline config
// (--config file, or built-in defaults).
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Clean raw text (HTML entities, quotes, tags, space runs)
    Clean(CleanArgs),

    /// Load a pickle artifact and print its contents
    LoadPickle(LoadPickleArgs),

    /// Tokenize one text to a fixed-length encoder input
    Tokenize(TokenizeArgs),
}

#[derive(Args, Debug)]
pub struct CleanArgs {
    /// File to clean; reads stdin when omitted
    #[arg(long)]
    pub input: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct LoadPickleArgs {
    /// Directory holding the artifact (default: config artifact_dir)
    #[arg(long)]
    pub dir: Option<PathBuf>,

    /// Artifact name without the .pkl suffix
    #[arg(long)]
    pub name: String,

    /// Print as pretty JSON instead of the raw pickle value
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct TokenizeArgs {
    /// Text to tokenize
    #[arg(long)]
    pub text: String,

    /// Fixed sequence length (default: config max_seq_length)
    #[arg(long)]
    pub max_seq_length: Option<usize>,

    /// tokenizer.json file, or a directory containing one
    /// (default: config tokenizer_path)
    #[arg(long)]
    pub tokenizer: Option<PathBuf>,

    /// Run the text cleaner before tokenizing
    #[arg(long)]
    pub clean: bool,
}

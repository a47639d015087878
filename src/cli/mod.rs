// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses arguments with clap and hands each subcommand to the
// matching utility in the data layer. Results go to stdout,
// logs go through tracing.
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use std::{
    fs,
    io::{self, Read},
    path::PathBuf,
};

use commands::{CleanArgs, Commands, LoadPickleArgs, TokenizeArgs};
use crate::data::{
    encoder::tokenize_sequence,
    loader::{load_pickle_value, pickle_to_json},
    preprocessor::{clean_bytes, clean_text},
};
use crate::infra::{settings::PipelineConfig, tokenizer_store::TokenizerStore};

#[derive(Parser, Debug)]
#[command(
    name = "inference-utils",
    version = "0.1.0",
    about = "Text cleaning, pickle loading and fixed-length tokenization for inference."
)]
pub struct Cli {
    /// JSON pipeline config (artifact_dir, tokenizer_path, max_seq_length)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let Cli { config, command } = self;

        let config = match config {
            Some(path) => PipelineConfig::load(path)?,
            None       => PipelineConfig::default(),
        };

        match command {
            Commands::Clean(args)      => run_clean(args),
            Commands::LoadPickle(args) => run_load_pickle(args, &config),
            Commands::Tokenize(args)   => run_tokenize(args, &config),
        }
    }
}

fn run_clean(args: CleanArgs) -> Result<()> {
    let raw = match &args.input {
        Some(path) => fs::read(path)
            .with_context(|| format!("Cannot read '{}'", path.display()))?,
        None => {
            let mut buf = Vec::new();
            io::stdin()
                .read_to_end(&mut buf)
                .context("Cannot read stdin")?;
            buf
        }
    };

    println!("{}", clean_bytes(&raw)?);
    Ok(())
}

fn run_load_pickle(args: LoadPickleArgs, config: &PipelineConfig) -> Result<()> {
    let dir = args
        .dir
        .unwrap_or_else(|| PathBuf::from(&config.artifact_dir));

    let value = load_pickle_value(&dir, &args.name)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&pickle_to_json(value))?);
    } else {
        println!("{:#?}", value);
    }
    Ok(())
}

fn run_tokenize(args: TokenizeArgs, config: &PipelineConfig) -> Result<()> {
    let max_seq_length = args.max_seq_length.unwrap_or(config.max_seq_length);
    let tok_path = args
        .tokenizer
        .unwrap_or_else(|| PathBuf::from(&config.tokenizer_path));

    let tokenizer = if tok_path.is_dir() {
        TokenizerStore::new(tok_path).load()?
    } else {
        TokenizerStore::load_file(&tok_path)?
    };

    let text = if args.clean {
        clean_text(&args.text)
    } else {
        args.text
    };

    let triple = tokenize_sequence(&tokenizer, max_seq_length, &text)?;
    println!("{}", serde_json::to_string_pretty(&triple)?);
    Ok(())
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_tokenize_flags() {
        let cli = Cli::try_parse_from([
            "inference-utils", "tokenize",
            "--text", "hello world",
            "--max-seq-length", "16",
            "--clean",
        ])
        .unwrap();

        match cli.command {
            Commands::Tokenize(args) => {
                assert_eq!(args.text, "hello world");
                assert_eq!(args.max_seq_length, Some(16));
                assert!(args.clean);
                assert!(args.tokenizer.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_load_pickle_requires_name() {
        assert!(Cli::try_parse_from(["inference-utils", "load-pickle"]).is_err());
    }

    #[test]
    fn test_config_flag_is_global() {
        let cli = Cli::try_parse_from([
            "inference-utils", "clean", "--config", "pipeline.json",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("pipeline.json")));
    }

    #[test]
    fn test_tokenize_end_to_end_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("tokenizer.json"),
            crate::infra::tokenizer_store::fixtures::tokenizer_json(),
        )
        .unwrap();

        let args = TokenizeArgs {
            text:           "<b>hello</b>   world".to_string(),
            max_seq_length: Some(8),
            tokenizer:      Some(dir.path().to_path_buf()),
            clean:          true,
        };
        run_tokenize(args, &PipelineConfig::default()).unwrap();
    }
}

//! inference-utils - preprocessing helpers for model inference
//!
//! Three independent operations the inference pipeline calls:
//! - [`data::preprocessor::clean_text`]: strip entities, quotes, tags and space runs
//! - [`data::loader::load_pickle`]: read `<dir>/<name>.pkl` artifacts
//! - [`data::encoder::tokenize_sequence`]: fixed-length BERT-style encoder input
//!
//! Failures are logged through `tracing` and returned unchanged.

pub mod cli;
pub mod data;
pub mod domain;
pub mod infra;

pub use data::encoder::tokenize_sequence;
pub use data::loader::{load_pickle, load_pickle_value, pickle_to_json};
pub use data::preprocessor::{clean_bytes, clean_text};
pub use domain::{tokenized::TokenizedTriple, traits::SequenceEncoder};

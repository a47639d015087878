// ============================================================
// Layer 2 — Core Traits (Abstractions)
// ============================================================
// The tokenize operation never talks to a concrete tokenizer.
// It asks for the SequenceEncoder capability instead:
//
//   - tokenizers::Tokenizer implements it (data/encoder.rs)
//   - tests implement it with tiny stand-ins that succeed,
//     fail, or return malformed output on purpose
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;
use crate::domain::tokenized::TokenizedTriple;

// ─── SequenceEncoder ──────────────────────────────────────────────────────────
/// Anything that can turn one text into a fixed-length encoder input.
///
/// Implementations must:
///   - insert the model's special tokens
///   - truncate to `max_len`
///   - right-pad to exactly `max_len`
///   - emit an attention mask and token-type ids
///
/// Invalid arguments (e.g. `max_len == 0`) are reported as errors.
pub trait SequenceEncoder {
    fn encode_fixed(&self, text: &str, max_len: usize) -> Result<TokenizedTriple>;
}

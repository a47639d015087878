// ============================================================
// Layer 3 — Sequence Tokenizer
// ============================================================
// Turns one text into the fixed-length triple a BERT-style
// encoder expects:
//
//   "the cat"  (max_seq_length = 6)
//       │
//       ▼
//   input_ids       [CLS] the cat [SEP] [PAD] [PAD]
//   attention_mask    1    1   1    1     0     0
//   token_type_ids    0    0   0    0     0     0
//
// All the real work (special tokens, truncation, right padding)
// belongs to the tokenizer collaborator. This module asks for
// it and reports failures loudly: once through the error log
// and once straight to the console.
//
// Reference: tokenizers crate docs (PaddingParams, TruncationParams)
//            Devlin et al. (2019) - BERT input format

use anyhow::{anyhow, ensure, Result};
use tokenizers::{PaddingDirection, PaddingParams, PaddingStrategy, PostProcessor, Tokenizer};

use crate::domain::tokenized::TokenizedTriple;
use crate::domain::traits::SequenceEncoder;
use crate::infra::observe::LogOnError;

/// Encode `text` to exactly `max_seq_length` positions.
///
/// Errors from the encoder are logged (tracing + stderr) and returned
/// unchanged. Output of the wrong length is an error as well.
pub fn tokenize_sequence<E: SequenceEncoder + ?Sized>(
    encoder:        &E,
    max_seq_length: usize,
    text:           &str,
) -> Result<TokenizedTriple> {
    encoder
        .encode_fixed(text, max_seq_length)
        .and_then(|triple| {
            ensure!(
                triple.seq_len() == max_seq_length,
                "encoder returned {} positions, expected {}",
                triple.seq_len(),
                max_seq_length
            );
            tracing::debug!(
                "Tokenized {} real tokens into {} positions",
                triple.real_tokens(),
                triple.seq_len()
            );
            Ok(triple)
        })
        .log_and_print_on_error()
}

/// Pad tokens tried, in order, when the tokenizer file carries no
/// padding block of its own.
const PAD_TOKEN_CANDIDATES: [&str; 2] = ["[PAD]", "<pad>"];

/// HuggingFace tokenizer as the encoder collaborator.
///
/// Padding and truncation are configured on a clone, so the
/// caller's tokenizer keeps whatever settings it was loaded with.
/// Pad id/token/type id and the truncation strategy come from the
/// tokenizer; only the length and the padding side are forced.
impl SequenceEncoder for Tokenizer {
    fn encode_fixed(&self, text: &str, max_len: usize) -> Result<TokenizedTriple> {
        // Room for [CLS]/[SEP] (or whatever the post-processor adds)
        let n_special = self
            .get_post_processor()
            .map(|p| p.added_tokens(false))
            .unwrap_or(0);
        ensure!(
            max_len > 0 && max_len >= n_special,
            "max_seq_length must be at least {} (got {})",
            n_special.max(1),
            max_len
        );

        let mut truncation = self.get_truncation().cloned().unwrap_or_default();
        truncation.max_length = max_len;

        let mut padding = match self.get_padding() {
            Some(params) => params.clone(),
            None         => vocab_padding(self),
        };
        padding.strategy           = PaddingStrategy::Fixed(max_len);
        padding.direction          = PaddingDirection::Right;
        padding.pad_to_multiple_of = None;

        let mut tokenizer = self.clone();
        tokenizer
            .with_truncation(Some(truncation))
            .map_err(|e| anyhow!(e))?
            .with_padding(Some(padding));

        let encoding = tokenizer.encode(text, true).map_err(|e| anyhow!(e))?;

        TokenizedTriple::new(
            encoding.get_ids().to_vec(),
            encoding.get_attention_mask().to_vec(),
            encoding.get_type_ids().to_vec(),
        )
    }
}

/// Padding params for a tokenizer without a padding block: the first
/// known pad token found in its vocabulary, with that token's id.
fn vocab_padding(tokenizer: &Tokenizer) -> PaddingParams {
    let mut params = PaddingParams::default();
    let found = PAD_TOKEN_CANDIDATES
        .iter()
        .find_map(|token| tokenizer.token_to_id(token).map(|id| (*token, id)));

    if let Some((token, id)) = found {
        params.pad_token = token.to_string();
        params.pad_id    = id;
    }
    params
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::observe::capture::capture_logs;
    use crate::infra::tokenizer_store::fixtures::{self, CLS, PAD, SEP, UNK};
    use std::io;

    /// Collaborator that always fails with an io::Error
    struct FailingEncoder;

    impl SequenceEncoder for FailingEncoder {
        fn encode_fixed(&self, _text: &str, _max_len: usize) -> Result<TokenizedTriple> {
            Err(io::Error::new(io::ErrorKind::InvalidInput, "bad input").into())
        }
    }

    /// Collaborator that ignores max_len
    struct ShortEncoder;

    impl SequenceEncoder for ShortEncoder {
        fn encode_fixed(&self, _text: &str, _max_len: usize) -> Result<TokenizedTriple> {
            TokenizedTriple::new(vec![CLS, SEP], vec![1, 1], vec![0, 0])
        }
    }

    #[test]
    fn test_pads_to_fixed_length() {
        let tok    = fixtures::tokenizer();
        let triple = tokenize_sequence(&tok, 6, "Hello world").unwrap();

        assert_eq!(triple.input_ids, vec![CLS, 104, 105, SEP, PAD, PAD]);
        assert_eq!(triple.attention_mask, vec![1, 1, 1, 1, 0, 0]);
        assert_eq!(triple.token_type_ids, vec![0; 6]);
    }

    #[test]
    fn test_truncates_long_text() {
        let tok    = fixtures::tokenizer();
        let triple = tokenize_sequence(&tok, 5, "the cat sat on the mat").unwrap();

        assert_eq!(triple.input_ids, vec![CLS, 106, 107, 108, SEP]);
        assert_eq!(triple.attention_mask, vec![1; 5]);
    }

    #[test]
    fn test_every_length_is_exact() {
        let tok = fixtures::tokenizer();
        for len in [3, 8, 32, 128] {
            let triple = tokenize_sequence(&tok, len, "the cat sat on the mat").unwrap();
            assert_eq!(triple.input_ids.len(), len);
            assert_eq!(triple.attention_mask.len(), len);
            assert_eq!(triple.token_type_ids.len(), len);
        }
    }

    #[test]
    fn test_unknown_words_map_to_unk() {
        let tok    = fixtures::tokenizer();
        let triple = tokenize_sequence(&tok, 4, "zebra").unwrap();
        assert_eq!(triple.input_ids, vec![CLS, UNK, SEP, PAD]);
    }

    #[test]
    fn test_empty_text_is_only_special_tokens() {
        let tok    = fixtures::tokenizer();
        let triple = tokenize_sequence(&tok, 4, "").unwrap();
        assert_eq!(triple.input_ids, vec![CLS, SEP, PAD, PAD]);
        assert_eq!(triple.real_tokens(), 2);
    }

    #[test]
    fn test_does_not_touch_callers_tokenizer() {
        let tok = fixtures::tokenizer();
        tokenize_sequence(&tok, 8, "hello").unwrap();
        assert!(tok.get_padding().is_none());
        assert!(tok.get_truncation().is_none());
    }

    #[test]
    fn test_uses_tokenizers_own_pad_token() {
        let tok    = fixtures::tokenizer_with_padding_block();
        let triple = tokenize_sequence(&tok, 6, "hello").unwrap();

        assert_eq!(triple.input_ids, vec![CLS, 104, SEP, 5, 5, 5]);
        assert_eq!(triple.attention_mask, vec![1, 1, 1, 0, 0, 0]);
        // Caller's batch-longest padding is left alone
        assert!(matches!(tok.get_padding().unwrap().strategy, PaddingStrategy::BatchLongest));
    }

    #[test]
    fn test_resolves_pad_id_from_vocab() {
        let tok    = fixtures::tokenizer_with_moved_pad();
        let triple = tokenize_sequence(&tok, 5, "hello").unwrap();

        assert_eq!(triple.input_ids, vec![CLS, 104, SEP, 7, 7]);
    }

    #[test]
    fn test_rejects_zero_length() {
        let tok = fixtures::tokenizer();
        assert!(tokenize_sequence(&tok, 0, "hello").is_err());
    }

    #[test]
    fn test_rejects_length_below_special_tokens() {
        let tok = fixtures::tokenizer();
        assert!(tokenize_sequence(&tok, 1, "hello").is_err());
    }

    #[test]
    fn test_propagates_collaborator_error() {
        let err = tokenize_sequence(&FailingEncoder, 8, "x").unwrap_err();
        let io_err = err.downcast_ref::<io::Error>().unwrap();
        assert_eq!(io_err.kind(), io::ErrorKind::InvalidInput);
        assert_eq!(err.to_string(), "bad input");
    }

    #[test]
    fn test_failure_is_logged_once_at_error() {
        let (res, logs) = capture_logs(|| tokenize_sequence(&FailingEncoder, 8, "x"));

        assert!(res.is_err());
        let error_lines: Vec<&str> = logs.lines().filter(|l| l.contains("ERROR")).collect();
        assert_eq!(error_lines.len(), 1, "logs: {logs}");
        assert!(error_lines[0].contains("bad input"));
    }

    #[test]
    fn test_success_logs_no_error() {
        let tok = fixtures::tokenizer();
        let (res, logs) = capture_logs(|| tokenize_sequence(&tok, 6, "hello"));

        assert!(res.is_ok());
        assert!(!logs.contains("ERROR"), "logs: {logs}");
    }

    #[test]
    fn test_wrong_length_output_is_an_error() {
        assert!(tokenize_sequence(&ShortEncoder, 8, "x").is_err());
        assert!(tokenize_sequence(&ShortEncoder, 2, "x").is_ok());
    }
}

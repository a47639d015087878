// ============================================================
// Layer 2 — TokenizedTriple Domain Type
// ============================================================
// The three parallel sequences a BERT-style model consumes:
//
//   input_ids       [CLS] tok tok tok [SEP] [PAD] [PAD]
//   attention_mask    1    1   1   1    1     0     0
//   token_type_ids    0    0   0   0    0     0     0
//
// They are produced together and consumed together, so they
// live in one struct. All three always have the same length.
//
// Reference: Devlin et al. (2019) - BERT paper

use anyhow::{ensure, Result};
use serde::Serialize;

/// Fixed-length encoder input for a single text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenizedTriple {
    /// Vocabulary ids, special tokens and padding included
    pub input_ids: Vec<u32>,

    /// 1 for real tokens, 0 for padding positions
    pub attention_mask: Vec<u32>,

    /// Segment id of each position
    pub token_type_ids: Vec<u32>,
}

impl TokenizedTriple {
    /// Build a triple, rejecting sequences of unequal length.
    pub fn new(
        input_ids:      Vec<u32>,
        attention_mask: Vec<u32>,
        token_type_ids: Vec<u32>,
    ) -> Result<Self> {
        ensure!(
            input_ids.len() == attention_mask.len()
                && input_ids.len() == token_type_ids.len(),
            "sequence lengths differ: input_ids={}, attention_mask={}, token_type_ids={}",
            input_ids.len(),
            attention_mask.len(),
            token_type_ids.len(),
        );
        Ok(Self { input_ids, attention_mask, token_type_ids })
    }

    /// Length shared by all three sequences
    pub fn seq_len(&self) -> usize {
        self.input_ids.len()
    }

    /// Number of non-padding positions
    pub fn real_tokens(&self) -> usize {
        self.attention_mask.iter().filter(|&&m| m != 0).count()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_unequal_lengths() {
        let res = TokenizedTriple::new(vec![101, 5, 102], vec![1, 1], vec![0, 0, 0]);
        assert!(res.is_err());
    }

    #[test]
    fn test_counts_real_tokens() {
        let t = TokenizedTriple::new(
            vec![101, 7, 102, 0, 0],
            vec![1, 1, 1, 0, 0],
            vec![0; 5],
        )
        .unwrap();
        assert_eq!(t.seq_len(), 5);
        assert_eq!(t.real_tokens(), 3);
    }
}

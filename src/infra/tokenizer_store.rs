// ============================================================
// Layer 4 — Tokenizer Store
// ============================================================
// Loads the pretrained HuggingFace tokenizer the model was
// trained with. The tokenizer is a single `tokenizer.json`
// file (vocabulary, normalizer, pre-tokenizer, post-processor)
// exported next to the model artifacts.
//
// The store only reads. Padding and truncation are NOT taken
// from the file: the tokenize operation sets them per call on a
// clone, so one loaded tokenizer serves any max_seq_length.
//
// Reference: tokenizers crate docs (Tokenizer::from_file)

use anyhow::Result;
use std::path::{Path, PathBuf};
use tokenizers::Tokenizer;

pub struct TokenizerStore {
    dir: PathBuf,
}

impl TokenizerStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Load `<dir>/tokenizer.json`
    pub fn load(&self) -> Result<Tokenizer> {
        Self::load_file(self.dir.join("tokenizer.json"))
    }

    /// Load a tokenizer from an explicit JSON file
    pub fn load_file(path: impl AsRef<Path>) -> Result<Tokenizer> {
        let path = path.as_ref();
        tracing::info!("Loading tokenizer from '{}'", path.display());

        Tokenizer::from_file(path)
            .map_err(|e| anyhow::anyhow!(
                "Cannot load tokenizer from '{}': {}", path.display(), e
            ))
    }
}

// ─── Test Fixtures ────────────────────────────────────────────────────────────
// A tiny word-level tokenizer in HuggingFace JSON format with the
// BERT special-token ids and a BERT post-processor, so encodings
// look like real ones: [CLS] ... [SEP] [PAD] ...
#[cfg(test)]
pub(crate) mod fixtures {
    use serde_json::{json, Value};
    use std::str::FromStr;
    use tokenizers::Tokenizer;

    pub const PAD: u32 = 0;
    pub const UNK: u32 = 1;
    pub const CLS: u32 = 101;
    pub const SEP: u32 = 102;

    fn base_json() -> Value {
        json!({
            "version": "1.0",
            "truncation": null,
            "padding": null,
            "added_tokens": [
                {"id": 0,   "content": "[PAD]",  "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true},
                {"id": 1,   "content": "[UNK]",  "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true},
                {"id": 101, "content": "[CLS]",  "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true},
                {"id": 102, "content": "[SEP]",  "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true},
                {"id": 103, "content": "[MASK]", "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true}
            ],
            "normalizer": {
                "type": "BertNormalizer",
                "clean_text": true,
                "handle_chinese_chars": true,
                "strip_accents": null,
                "lowercase": true
            },
            "pre_tokenizer": { "type": "Whitespace" },
            "post_processor": {
                "type": "BertProcessing",
                "sep": ["[SEP]", 102],
                "cls": ["[CLS]", 101]
            },
            "decoder": null,
            "model": {
                "type": "WordLevel",
                "vocab": {
                    "[PAD]": 0, "[UNK]": 1, "[CLS]": 101, "[SEP]": 102, "[MASK]": 103,
                    "hello": 104, "world": 105, "the": 106, "cat": 107, "sat": 108,
                    "on": 109, "mat": 110
                },
                "unk_token": "[UNK]"
            }
        })
    }

    fn special(id: u32, content: &str) -> Value {
        json!({
            "id": id, "content": content, "single_word": false, "lstrip": false,
            "rstrip": false, "normalized": false, "special": true
        })
    }

    pub fn tokenizer_json() -> String {
        base_json().to_string()
    }

    pub fn tokenizer() -> Tokenizer {
        Tokenizer::from_str(&tokenizer_json()).unwrap()
    }

    /// RoBERTa-style `<pad>` at id 5, declared in the padding block
    pub fn tokenizer_with_padding_block() -> Tokenizer {
        let mut json = base_json();
        json["model"]["vocab"]["<pad>"] = json!(5);
        json["added_tokens"].as_array_mut().unwrap().push(special(5, "<pad>"));
        json["padding"] = json!({
            "strategy": "BatchLongest",
            "direction": "Right",
            "pad_to_multiple_of": null,
            "pad_id": 5,
            "pad_type_id": 0,
            "pad_token": "<pad>"
        });
        Tokenizer::from_str(&json.to_string()).unwrap()
    }

    /// `[PAD]` at id 7 and no padding block
    pub fn tokenizer_with_moved_pad() -> Tokenizer {
        let mut json = base_json();
        json["model"]["vocab"]["[PAD]"] = json!(7);
        json["added_tokens"][0] = special(7, "[PAD]");
        Tokenizer::from_str(&json.to_string()).unwrap()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("tokenizer.json"), fixtures::tokenizer_json()).unwrap();

        let tok = TokenizerStore::new(dir.path()).load().unwrap();
        let enc = tok.encode("hello world", false).unwrap();
        assert_eq!(enc.get_ids(), &[104, 105]);
    }

    #[test]
    fn test_missing_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = TokenizerStore::new(dir.path()).load().unwrap_err();
        assert!(err.to_string().contains("tokenizer.json"));
    }
}

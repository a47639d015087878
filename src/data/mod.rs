// ============================================================
// Layer 3 — Data Utilities
// ============================================================
// The three utility operations the inference pipeline calls.
// They do not call each other; surrounding code strings them
// together, e.g. for a single request:
//
//   raw text ──► clean_text ──► tokenize_sequence ──► model
//                                                      ▲
//   <dir>/<name>.pkl ──► load_pickle ──────────────────┘
//                         (label maps, artifacts)
//
// Every fallible operation logs its failure with full detail
// and returns the collaborator's original error.
//
// Reference: Rust Book §7 (Modules)

/// Cleans HTML-ish raw text
pub mod preprocessor;

/// HTML5 character reference decoding used by the cleaner
pub mod entities;
mod entity_table;

/// Loads `<dir>/<name>.pkl` artifacts
pub mod loader;

/// Fixed-length tokenisation through a SequenceEncoder
pub mod encoder;

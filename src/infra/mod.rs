// ============================================================
// Layer 4 — Infrastructure Layer
// ============================================================
// Cross-cutting concerns used by the other layers:
//
//   observe.rs         — log-then-propagate failure reporting
//   settings.rs        — JSON pipeline configuration
//   tokenizer_store.rs — loading the pretrained tokenizer.json
//
// Reference: Rust Book §7 (Modules)
//            Rust Book §9 (Error Handling with anyhow)

/// Error logging that hands the original error back
pub mod observe;

/// Pipeline configuration (artifact paths, sequence length)
pub mod settings;

/// Tokenizer loading
pub mod tokenizer_store;

// ============================================================
// Layer 2 — Domain Layer
// ============================================================
// Plain Rust types and traits shared by the utility operations.
//
// Rules for this layer:
//   - NO file I/O
//   - NO tokenizers / pickle crate types
//   - Only plain structs, enums, and traits
//
// The tokenizer collaborator is described here as a trait so the
// tokenize operation can be driven by the HuggingFace tokenizer in
// production and by small stand-ins in tests.
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// Fixed-length input_ids / attention_mask / token_type_ids triple
pub mod tokenized;

// Capability traits implemented by outer layers
pub mod traits;

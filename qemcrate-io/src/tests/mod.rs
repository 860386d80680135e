//! Test modules for qemcrate-io
//!
//! Loader scenarios that exercise the tokenizer, face validation and edge
//! derivation together.

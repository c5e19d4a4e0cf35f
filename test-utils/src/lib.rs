//! The single source of truth for all test data paths and fixtures.

pub mod asset;
mod vocab;

pub use crate::vocab::{vocab, vocab_len, vocab_path};

use std::{
    io::{BufRead, Cursor, Result},
    path::PathBuf,
};

use crate::asset::{resolve_path, DATA_DIR};

const VOCAB: &str = include_str!("../../data/vocab.txt");

/// Resolves the path to the small Bert test vocabulary.
///
/// The ids are the zero-based line indices, e.g. `[PAD]` is `0`, `[UNK]` is `1`, `[CLS]` is `2`
/// and `[SEP]` is `3`.
pub fn vocab_path() -> Result<PathBuf> {
    resolve_path(&[DATA_DIR, "vocab.txt"])
}

/// Reads the small Bert test vocabulary from memory.
pub fn vocab() -> impl BufRead {
    Cursor::new(VOCAB)
}

/// The number of tokens in the small Bert test vocabulary.
pub fn vocab_len() -> usize {
    VOCAB.lines().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocab_path() {
        assert!(vocab_path().unwrap().is_file());
    }

    #[test]
    fn test_vocab() {
        let mut lines = vocab().lines();
        assert_eq!(lines.next().unwrap().unwrap(), "[PAD]");
        assert_eq!(lines.next().unwrap().unwrap(), "[UNK]");
        assert_eq!(vocab().lines().count(), vocab_len());
    }
}

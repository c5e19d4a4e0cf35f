use std::{
    collections::HashMap,
    fs::File,
    io::{BufRead, BufReader, Error as IoError},
    path::Path,
};

use displaydoc::Display;
use num_traits::FromPrimitive;
use thiserror::Error;

/// The class token, which starts every encoded sequence.
pub const CLS: &str = "[CLS]";
/// The separation token, which ends every encoded sequence.
pub const SEP: &str = "[SEP]";
/// The unknown token, which replaces words without a word piece decomposition.
pub const UNK: &str = "[UNK]";
/// The mask token.
pub const MASK: &str = "[MASK]";

/// The special words which are never split by the pre-tokenizer.
pub(crate) const NEVER_SPLIT: [&str; 4] = [UNK, CLS, SEP, MASK];

/// Checks whether the word is one of the default special tokens.
pub fn is_default_special(word: &str) -> bool {
    NEVER_SPLIT.contains(&word)
}

/// A word piece vocabulary.
///
/// The ids are the line indices of the tokens in the vocabulary source. A vocabulary can only be
/// created if it contains the [`CLS`], [`SEP`] and [`UNK`] tokens.
#[derive(Debug)]
pub struct Vocab<N> {
    ids: HashMap<String, N>,
    cls_id: N,
    sep_id: N,
    unk_id: N,
}

/// The potential errors of the vocabulary.
#[derive(Debug, Display, Error)]
pub enum VocabError {
    /// Failed to read the vocabulary: {0}
    Read(#[from] IoError),
    /// The vocabulary index {0} overflows the id type
    Overflow(usize),
    /// Missing the special token {0} in the vocabulary
    MissingSpecialToken(&'static str),
}

impl<N> Vocab<N>
where
    N: FromPrimitive + Copy,
{
    /// Parses a vocabulary with one token per line.
    pub fn parse(vocab: impl BufRead) -> Result<Self, VocabError> {
        vocab
            .lines()
            .enumerate()
            .map(|(idx, word)| -> Result<_, VocabError> {
                let id = N::from_usize(idx).ok_or(VocabError::Overflow(idx))?;
                Ok((word?.trim().to_string(), id))
            })
            .collect::<Result<HashMap<_, _>, VocabError>>()
            .and_then(Self::new)
    }

    /// Reads a vocabulary file with one token per line.
    pub fn from_file(vocab: impl AsRef<Path>) -> Result<Self, VocabError> {
        Self::parse(BufReader::new(File::open(vocab)?))
    }

    /// Creates a vocabulary from in-memory tokens, the ids are the positions of the tokens.
    pub fn from_tokens<I>(tokens: I) -> Result<Self, VocabError>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        tokens
            .into_iter()
            .enumerate()
            .map(|(idx, word)| -> Result<_, VocabError> {
                let id = N::from_usize(idx).ok_or(VocabError::Overflow(idx))?;
                Ok((word.into(), id))
            })
            .collect::<Result<HashMap<_, _>, VocabError>>()
            .and_then(Self::new)
    }
}

impl<N> Vocab<N>
where
    N: Copy,
{
    /// Validates the presence of the mandatory special tokens.
    fn new(ids: HashMap<String, N>) -> Result<Self, VocabError> {
        let special = |token: &'static str| {
            ids.get(token)
                .copied()
                .ok_or(VocabError::MissingSpecialToken(token))
        };
        let cls_id = special(CLS)?;
        let sep_id = special(SEP)?;
        let unk_id = special(UNK)?;

        Ok(Self {
            ids,
            cls_id,
            sep_id,
            unk_id,
        })
    }

    /// Gets the id of the token if it is part of the vocabulary.
    pub fn get_id(&self, token: &str) -> Option<N> {
        self.ids.get(token).copied()
    }

    /// Checks whether the token is part of the vocabulary.
    pub fn contains(&self, token: &str) -> bool {
        self.ids.contains_key(token)
    }

    /// Gets the id of the class token.
    pub fn cls_id(&self) -> N {
        self.cls_id
    }

    /// Gets the id of the separation token.
    pub fn sep_id(&self) -> N {
        self.sep_id
    }

    /// Gets the id of the unknown token.
    pub fn unk_id(&self) -> N {
        self.unk_id
    }

    /// Gets the number of tokens.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Checks whether the vocabulary is empty.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

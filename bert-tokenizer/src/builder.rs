use std::{io::BufRead, path::Path, sync::Arc};

use displaydoc::Display;
use log::debug;
use num_traits::{FromPrimitive, Num};
use thiserror::Error;

use crate::{
    model::Model,
    post_tokenizer::PostTokenizer,
    pre_tokenizer::PreTokenizer,
    tokenizer::Tokenizer,
    vocab::{Vocab, VocabError},
};

/// A builder to create a [`Tokenizer`].
pub struct Builder<N> {
    vocab: Arc<Vocab<N>>,
    chinese: bool,
    prefix: String,
    max_chars: usize,
    token_size: usize,
}

/// The potential errors of the [`Builder`].
#[derive(Debug, Display, Error)]
pub enum BuilderError {
    /// The token size must be at least two to allow for special tokens
    TokenSize,
    /// The maximum number of characters per word must be at least one
    MaxChars,
    /// The continuing subword prefix must not be empty
    Prefix,
    /// Failed to load the vocabulary: {0}
    Vocab(#[from] VocabError),
}

impl<N> Builder<N>
where
    N: FromPrimitive + Copy,
{
    /// Creates a [`Tokenizer`] builder from a vocabulary file.
    ///
    /// The default settings are the same as for [`from_vocab()`].
    ///
    /// [`from_vocab()`]: Self::from_vocab
    pub fn from_file(vocab: impl AsRef<Path>) -> Result<Self, BuilderError> {
        Ok(Self::from_vocab(Vocab::from_file(vocab)?.into()))
    }

    /// Creates a [`Tokenizer`] builder from an in-memory vocabulary.
    ///
    /// The default settings are the same as for [`from_vocab()`].
    ///
    /// [`from_vocab()`]: Self::from_vocab
    pub fn new(vocab: impl BufRead) -> Result<Self, BuilderError> {
        Ok(Self::from_vocab(Vocab::parse(vocab)?.into()))
    }
}

impl<N> Builder<N> {
    /// The default token size.
    pub const TOKEN_SIZE: usize = 48;
    /// The default maximum number of characters per word.
    pub const MAX_CHARS: usize = 200;

    /// Creates a [`Tokenizer`] builder from a shared vocabulary.
    ///
    /// The default settings are:
    /// - No splitting of chinese characters.
    /// - A word piece model with `"##"` continuing subword prefix and `200` maximum characters per
    /// word.
    /// - A token size of `48`.
    pub fn from_vocab(vocab: Arc<Vocab<N>>) -> Self {
        Self {
            vocab,
            chinese: false,
            prefix: "##".into(),
            max_chars: Self::MAX_CHARS,
            token_size: Self::TOKEN_SIZE,
        }
    }

    /// Toggles the chinese mode.
    ///
    /// The chinese mode lowercases the sequences, splits chinese characters and strips accents.
    ///
    /// Defaults to `false`.
    pub fn with_chinese(mut self, toggle: bool) -> Self {
        self.chinese = toggle;
        self
    }

    /// Configures the word piece model.
    ///
    /// Defaults to `"##"` and `200`.
    ///
    /// # Errors
    /// Fails if the `prefix` is empty or `max_chars` is zero.
    pub fn with_model(
        mut self,
        prefix: impl Into<String>,
        max_chars: usize,
    ) -> Result<Self, BuilderError> {
        let prefix = prefix.into();
        if prefix.is_empty() {
            return Err(BuilderError::Prefix);
        }
        if max_chars == 0 {
            return Err(BuilderError::MaxChars);
        }
        self.prefix = prefix;
        self.max_chars = max_chars;
        Ok(self)
    }

    /// Sets the token size, which includes the class and separation tokens.
    ///
    /// Defaults to `48`.
    ///
    /// # Errors
    /// Fails if `size` is less than two.
    pub fn with_token_size(mut self, size: usize) -> Result<Self, BuilderError> {
        if size < 2 {
            Err(BuilderError::TokenSize)
        } else {
            self.token_size = size;
            Ok(self)
        }
    }

    /// Builds the tokenizer.
    pub fn build(self) -> Tokenizer<N>
    where
        N: Num + Copy,
    {
        debug!(
            "building tokenizer with {} tokens, token size {}, chinese mode {}",
            self.vocab.len(),
            self.token_size,
            self.chinese,
        );
        let post_tokenizer = PostTokenizer::new(&self.vocab, self.token_size);
        let model = Model {
            vocab: self.vocab,
            prefix: self.prefix.as_str().into(),
            max_chars: self.max_chars,
        };

        Tokenizer {
            chinese: self.chinese,
            pre_tokenizer: PreTokenizer::new(self.chinese),
            model,
            post_tokenizer,
        }
    }
}

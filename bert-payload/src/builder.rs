use std::{io::BufRead, path::Path, sync::Arc};

use bert_tokenizer::{
    Builder as TokenizerBuilder,
    BuilderError as TokenizerError,
    Vocab,
    VocabError,
};
use displaydoc::Display;
use log::debug;
use thiserror::Error;

use crate::{config::Config, encoder::Transport, pipeline::Pipeline};

/// A builder to create a [`Pipeline`].
pub struct Builder {
    vocab: Arc<Vocab<i32>>,
    chinese: bool,
    token_size: usize,
    max_chars: usize,
    offsets: bool,
    transport: Transport,
    max_input_chars: usize,
    model_name: Option<String>,
}

/// The potential errors of the [`Builder`].
#[derive(Debug, Display, Error)]
pub enum BuilderError {
    /// The token size must be at least two to allow for special tokens
    TokenSize,
    /// The maximum number of characters per word must be at least one
    MaxChars,
    /// The maximum number of characters per input must be at least one
    InputCeiling,
    /// Failed to load the vocabulary: {0}
    Vocab(#[from] VocabError),
    /// Failed to build the tokenizer: {0}
    Tokenizer(#[from] TokenizerError),
}

impl Builder {
    /// The default token size.
    pub const TOKEN_SIZE: usize = 48;
    /// The default maximum number of characters per word.
    pub const MAX_CHARS: usize = 200;
    /// The default maximum number of characters per input.
    pub const MAX_INPUT_CHARS: usize = 4096;

    /// Creates a [`Pipeline`] builder from a vocabulary file.
    pub fn from_file(vocab: impl AsRef<Path>) -> Result<Self, BuilderError> {
        Ok(Self::from_vocab(Vocab::from_file(vocab)?.into()))
    }

    /// Creates a [`Pipeline`] builder from an in-memory vocabulary.
    pub fn new(vocab: impl BufRead) -> Result<Self, BuilderError> {
        Ok(Self::from_vocab(Vocab::parse(vocab)?.into()))
    }

    /// Creates a [`Pipeline`] builder from a shared vocabulary.
    pub fn from_vocab(vocab: Arc<Vocab<i32>>) -> Self {
        Self {
            vocab,
            chinese: false,
            token_size: Self::TOKEN_SIZE,
            max_chars: Self::MAX_CHARS,
            offsets: false,
            transport: Transport::Http,
            max_input_chars: Self::MAX_INPUT_CHARS,
            model_name: None,
        }
    }

    /// Toggles the chinese tokenization.
    ///
    /// Defaults to `false`.
    pub fn with_chinese(mut self, toggle: bool) -> Self {
        self.chinese = toggle;
        self
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

    /// Sets the maximum number of characters per word, longer words become unknown tokens.
    ///
    /// Defaults to `200`.
    ///
    /// # Errors
    /// Fails if `chars` is zero.
    pub fn with_max_chars(mut self, chars: usize) -> Result<Self, BuilderError> {
        if chars == 0 {
            Err(BuilderError::MaxChars)
        } else {
            self.max_chars = chars;
            Ok(self)
        }
    }

    /// Toggles the offsets of the content tokens in the input metadata.
    ///
    /// Defaults to `false`.
    pub fn with_offsets(mut self, toggle: bool) -> Self {
        self.offsets = toggle;
        self
    }

    /// Sets the transport, which determines the payload encoding.
    ///
    /// Defaults to [`Transport::Http`].
    pub fn with_transport(mut self, transport: Transport) -> Self {
        self.transport = transport;
        self
    }

    /// Sets the maximum number of characters per input.
    ///
    /// Defaults to `4096`.
    ///
    /// # Errors
    /// Fails if `chars` is zero.
    pub fn with_max_input_chars(mut self, chars: usize) -> Result<Self, BuilderError> {
        if chars == 0 {
            Err(BuilderError::InputCeiling)
        } else {
            self.max_input_chars = chars;
            Ok(self)
        }
    }

    /// Sets the model name as `"{prefix}-{name}"`.
    ///
    /// Defaults to no model name.
    pub fn with_model_name(mut self, prefix: impl AsRef<str>, name: impl AsRef<str>) -> Self {
        self.model_name = Some(format!("{}-{}", prefix.as_ref(), name.as_ref()));
        self
    }

    /// Applies all settings of the configuration.
    ///
    /// # Errors
    /// Fails on invalid settings.
    pub fn with_config(self, config: &Config) -> Result<Self, BuilderError> {
        let builder = self
            .with_chinese(config.chinese)
            .with_token_size(config.token_size)?
            .with_max_chars(config.max_chars)?
            .with_offsets(config.offsets)
            .with_transport(config.transport)
            .with_max_input_chars(config.max_input_chars)?;

        Ok(match &config.model {
            Some(model) => builder.with_model_name(&model.prefix, &model.name),
            None => builder,
        })
    }

    /// Builds a [`Pipeline`].
    ///
    /// # Errors
    /// Fails on invalid tokenizer settings.
    pub fn build(self) -> Result<Pipeline, BuilderError> {
        let tokenizer = TokenizerBuilder::from_vocab(self.vocab)
            .with_chinese(self.chinese)
            .with_model("##", self.max_chars)?
            .with_token_size(self.token_size)?
            .build();
        debug!(
            "building pipeline with {:?} transport and input ceiling {}",
            self.transport, self.max_input_chars,
        );

        Ok(Pipeline {
            tokenizer,
            transport: self.transport,
            encoder: self.transport.encoder(),
            offsets: self.offsets,
            max_input_chars: self.max_input_chars,
            model_name: self.model_name,
        })
    }
}

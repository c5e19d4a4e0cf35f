use std::{
    fs::File,
    io::{BufReader, Error as IoError, Read},
    path::Path,
};

use displaydoc::Display;
use serde::{Deserialize, Serialize};
use serde_json::{from_reader, Error as JsonError};
use thiserror::Error;

use crate::{builder::Builder, encoder::Transport};

/// The potential errors of the [`Config`].
#[derive(Debug, Display, Error)]
pub enum ConfigError {
    /// Failed to load a data file: {0}
    DataFile(#[from] IoError),
    /// Failed to parse the configuration: {0}
    Json(#[from] JsonError),
}

/// The name parts of the served model.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub prefix: String,
    pub name: String,
}

/// A file based configuration of a [`Pipeline`].
///
/// Missing fields take the defaults of the [`Builder`].
///
/// [`Pipeline`]: crate::Pipeline
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub token_size: usize,
    pub max_chars: usize,
    pub chinese: bool,
    pub transport: Transport,
    pub offsets: bool,
    pub max_input_chars: usize,
    pub model: Option<ModelConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            token_size: Builder::TOKEN_SIZE,
            max_chars: Builder::MAX_CHARS,
            chinese: false,
            transport: Transport::default(),
            offsets: false,
            max_input_chars: Builder::MAX_INPUT_CHARS,
            model: None,
        }
    }
}

impl Config {
    /// Parses a json configuration.
    pub fn from_reader(config: impl Read) -> Result<Self, ConfigError> {
        from_reader(config).map_err(Into::into)
    }

    /// Reads a json configuration file.
    pub fn from_file(config: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_reader(BufReader::new(File::open(config)?))
    }
}

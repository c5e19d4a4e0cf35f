use std::{
    fs::{create_dir_all, write},
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Error};
use bert_payload::{
    Builder,
    Config,
    Datatype,
    InputObject,
    InputTensor,
    OutputTensor,
    Pipeline,
    Request,
    TensorKind,
    Transport,
};
use log::{debug, info, warn};
use serde::Serialize;
use serde_json::Value;
use structopt::StructOpt;

use crate::exit_code::{NON_FATAL_ERROR, NO_ERROR};

/// Encode texts into the request payload of a Bert model server.
#[derive(StructOpt, Debug)]
pub struct EncodeCmd {
    /// The vocabulary file with one token per line.
    #[structopt(long)]
    pub vocab: PathBuf,

    /// A json configuration file, the flags take precedence over it.
    #[structopt(long)]
    pub config: Option<PathBuf>,

    /// The token size, including the class and separation tokens.
    #[structopt(long)]
    pub token_size: Option<usize>,

    /// Splits chinese characters and lowercases the texts.
    #[structopt(long)]
    pub chinese: bool,

    /// Returns the offsets of the content tokens.
    #[structopt(long)]
    pub offsets: bool,

    /// The datatype of the input tensors.
    #[structopt(long, default_value = "INT32")]
    pub datatype: Datatype,

    /// A requested output tensor, can be repeated.
    #[structopt(long = "output", number_of_values = 1)]
    pub outputs: Vec<String>,

    /// Writes the binary tensor buffers into the directory instead of a json body.
    #[structopt(long)]
    pub binary: Option<PathBuf>,

    #[structopt(long)]
    pub pretty: bool,

    /// The texts to encode.
    pub texts: Vec<String>,
}

#[derive(Serialize)]
struct EncodeCmdResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    body: Option<Value>,
    objects: Vec<InputObject>,
}

impl EncodeCmd {
    pub fn run(self) -> Result<i32, Error> {
        if self.texts.is_empty() {
            warn!("no texts to encode");
            return Ok(NON_FATAL_ERROR);
        }

        let pipeline = self.pipeline()?;
        let inputs =
            InputTensor::bert_inputs(self.texts.len(), pipeline.token_size(), self.datatype);
        let outputs = self
            .outputs
            .iter()
            .map(|name| OutputTensor::new(name.as_str()))
            .collect::<Vec<_>>();
        let request = pipeline
            .run(&self.texts, &inputs, &outputs)
            .context("Encoding the texts failed")?;

        let result = match (request, &self.binary) {
            (Request::Json { body, objects }, _) => EncodeCmdResult {
                body: Some(serde_json::from_slice(&body)?),
                objects,
            },
            (Request::Binary { buffers, objects, .. }, Some(dir)) => {
                write_buffers(dir, buffers.into_vec())?;
                EncodeCmdResult {
                    body: None,
                    objects,
                }
            }
            (Request::Binary { .. }, None) => {
                bail!("Missing the directory for the binary buffers")
            }
        };

        let serialized = if self.pretty {
            serde_json::to_string_pretty(&result)?
        } else {
            serde_json::to_string(&result)?
        };
        println!("{}", serialized);

        Ok(NO_ERROR)
    }

    fn pipeline(&self) -> Result<Pipeline, Error> {
        let config = match &self.config {
            Some(path) => Config::from_file(path)
                .with_context(|| format!("Loading the configuration {:?} failed", path))?,
            None => Config::default(),
        };
        let mut builder = Builder::from_file(&self.vocab)
            .with_context(|| format!("Loading the vocabulary {:?} failed", self.vocab))?
            .with_config(&config)
            .context("Invalid configuration")?;
        if let Some(size) = self.token_size {
            builder = builder.with_token_size(size)?;
        }
        if self.chinese {
            builder = builder.with_chinese(true);
        }
        if self.offsets {
            builder = builder.with_offsets(true);
        }
        let transport = if self.binary.is_some() {
            Transport::Grpc
        } else {
            Transport::Http
        };
        let pipeline = builder.with_transport(transport).build()?;
        info!(
            "encoding {} texts with token size {} for {:?}",
            self.texts.len(),
            pipeline.token_size(),
            pipeline.transport(),
        );

        Ok(pipeline)
    }
}

/// Writes the buffers as `segment_ids.bin`, `input_ids.bin` and `input_mask.bin`.
fn write_buffers(dir: &Path, buffers: Vec<Vec<u8>>) -> Result<(), Error> {
    create_dir_all(dir).with_context(|| format!("Creating {:?} failed", dir))?;
    for (kind, buffer) in TensorKind::ALL.iter().zip(buffers) {
        let path = dir.join(format!("{}.bin", kind.name()));
        debug!("writing {} bytes to {:?}", buffer.len(), path);
        write(&path, buffer).with_context(|| format!("Writing {:?} failed", path))?;
    }

    Ok(())
}

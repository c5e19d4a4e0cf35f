use displaydoc::Display;
use serde::{Deserialize, Serialize};
use serde_json::Error as JsonError;
use thiserror::Error;

use crate::{
    binary::{BinaryEncoder, Buffers},
    features::Features,
    json::JsonEncoder,
    tensor::{InputTensor, OutputTensor},
};

/// The potential errors of the payload encoders.
#[derive(Debug, Display, Error)]
pub enum EncoderError {
    /// At least one input tensor must be declared
    NoInputs,
    /// At most three input tensors can be declared, got {0}
    TooManyInputs(usize),
    /// Unknown input tensor {0}
    UnknownInput(String),
    /// Missing the input tensor {0}
    MissingInput(&'static str),
    /// Unsupported tensor datatype {0}
    Datatype(String),
    /// Failed to serialize the json body: {0}
    Json(#[from] JsonError),
}

/// An encoded request payload.
#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
    /// A serialized json batch body.
    Json(Vec<u8>),
    /// The little endian byte buffers of the input tensors.
    Binary(Buffers),
}

/// Encodes batched features into a request payload of the model server.
pub trait PayloadEncoder {
    /// Encodes the features for the declared input and requested output tensors.
    fn encode(
        &self,
        features: &Features,
        inputs: &[InputTensor],
        outputs: &[OutputTensor],
    ) -> Result<Payload, EncoderError>;
}

/// The transport of the model server, which determines the payload encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    /// Json batch bodies.
    Http,
    /// Raw little endian tensor buffers.
    Grpc,
}

impl Default for Transport {
    fn default() -> Self {
        Self::Http
    }
}

impl Transport {
    /// Gets the payload encoder of the transport.
    pub fn encoder(self) -> Box<dyn PayloadEncoder + Send + Sync> {
        match self {
            Self::Http => Box::new(JsonEncoder),
            Self::Grpc => Box::new(BinaryEncoder),
        }
    }
}

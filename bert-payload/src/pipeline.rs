use bert_tokenizer::{Encoding, Tokenizer};
use displaydoc::Display;
use log::{debug, trace, warn};
use serde::Serialize;
use thiserror::Error;

use crate::{
    binary::Buffers,
    encoder::{EncoderError, Payload, PayloadEncoder, Transport},
    features::Features,
    tensor::{InputTensor, OutputTensor},
};

/// The marker which joins the parts of a data record, it is removed from every input.
pub const DATA_SPLIT: &str = " ||| ";

/// A pipeline which turns a batch of texts into a request payload of a Bert model server.
///
/// Can be created via the [`Builder`] and consists of a tokenizer and the payload encoder of the
/// configured transport. The pipeline is immutable and can be shared across threads.
///
/// [`Builder`]: crate::Builder
pub struct Pipeline {
    pub(crate) tokenizer: Tokenizer<i32>,
    pub(crate) transport: Transport,
    pub(crate) encoder: Box<dyn PayloadEncoder + Send + Sync>,
    pub(crate) offsets: bool,
    pub(crate) max_input_chars: usize,
    pub(crate) model_name: Option<String>,
}

/// The potential errors of the [`Pipeline`].
#[derive(Debug, Display, Error)]
pub enum PipelineError {
    /// The input {0} has {1} characters, which exceeds the maximum of {2}
    InputTooLong(usize, usize, usize),
    /// Failed to encode the payload: {0}
    Encoder(#[from] EncoderError),
}

/// The metadata of an encoded input.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct InputObject {
    /// The input without data split markers.
    pub input: String,
    /// The tokens of the encoding, including special and padding tokens.
    pub tokens: Vec<String>,
    /// The character offsets of the content tokens, if requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offsets: Option<Vec<(usize, usize)>>,
}

/// A request payload together with the metadata of its inputs.
#[derive(Clone, Debug, PartialEq)]
pub enum Request {
    /// A json batch body.
    Json {
        body: Vec<u8>,
        objects: Vec<InputObject>,
    },
    /// The raw input tensor buffers and their descriptors.
    Binary {
        inputs: Vec<InputTensor>,
        buffers: Buffers,
        objects: Vec<InputObject>,
    },
}

impl Request {
    /// Gets the metadata of the inputs in batch order.
    pub fn objects(&self) -> &[InputObject] {
        match self {
            Self::Json { objects, .. } | Self::Binary { objects, .. } => objects,
        }
    }
}

impl Pipeline {
    /// Encodes the batch of texts into a request payload.
    ///
    /// The inputs are the declared input tensors of the model and the outputs the requested
    /// output tensors, both are passed through to the payload.
    ///
    /// # Errors
    /// Fails if no input tensor is declared, if a text is longer than the input ceiling or if the
    /// payload can't be encoded for the declared input tensors.
    pub fn run(
        &self,
        texts: &[impl AsRef<str>],
        inputs: &[InputTensor],
        outputs: &[OutputTensor],
    ) -> Result<Request, PipelineError> {
        if inputs.is_empty() {
            return Err(EncoderError::NoInputs.into());
        }
        let texts = texts
            .iter()
            .enumerate()
            .map(|(idx, text)| self.clean(idx, text.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        let encodings = self.tokenizer.encode_batch(&texts);
        debug!(
            "encoded {} texts with token size {}",
            encodings.len(),
            self.token_size(),
        );
        let features = Features::new(&encodings, self.token_size());
        let objects = texts
            .into_iter()
            .zip(encodings.iter())
            .map(|(input, encoding)| self.input_object(input, encoding))
            .collect();

        match self.encoder.encode(&features, inputs, outputs)? {
            Payload::Json(body) => Ok(Request::Json { body, objects }),
            Payload::Binary(buffers) => Ok(Request::Binary {
                inputs: inputs.to_vec(),
                buffers,
                objects,
            }),
        }
    }

    /// Checks the input ceiling and removes the data split markers.
    fn clean(&self, idx: usize, text: &str) -> Result<String, PipelineError> {
        let len = text.chars().count();
        if len > self.max_input_chars {
            warn!("rejecting input {} with {} characters", idx, len);
            return Err(PipelineError::InputTooLong(idx, len, self.max_input_chars));
        }

        Ok(text.replace(DATA_SPLIT, ""))
    }

    fn input_object(&self, input: String, encoding: &Encoding<i32>) -> InputObject {
        let len = encoding
            .attention_mask()
            .iter()
            .filter(|mask| **mask != 0)
            .count()
            .saturating_sub(2);
        trace!("encoded {} content tokens", len);
        let offsets = self.offsets.then(|| {
            encoding
                .offsets()
                .iter()
                .skip(1)
                .take(len)
                .map(|offsets| (offsets.0, offsets.1))
                .collect()
        });

        InputObject {
            input,
            tokens: encoding.tokens().to_vec(),
            offsets,
        }
    }

    /// Gets the token size.
    pub fn token_size(&self) -> usize {
        self.tokenizer.token_size()
    }

    /// Gets the transport.
    pub fn transport(&self) -> Transport {
        self.transport
    }

    /// Gets the model name, if configured.
    pub fn model_name(&self) -> Option<&str> {
        self.model_name.as_deref()
    }

    /// Gets the tokenizer.
    pub fn tokenizer(&self) -> &Tokenizer<i32> {
        &self.tokenizer
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{from_slice, json, to_value, Value};
    use test_utils::vocab;

    use super::*;
    use crate::{builder::Builder, tensor::Datatype};

    fn pipeline(token_size: usize) -> Builder {
        Builder::new(vocab())
            .unwrap()
            .with_token_size(token_size)
            .unwrap()
    }

    #[test]
    fn test_json_request() {
        let pipeline = pipeline(6).build().unwrap();
        let inputs = InputTensor::bert_inputs(2, 6, Datatype::Int32);
        let outputs = [OutputTensor::new("logits").with_classification(2)];
        let request = pipeline
            .run(&["hello world", "a b"], &inputs, &outputs)
            .unwrap();

        let (body, objects) = match request {
            Request::Json { body, objects } => (from_slice::<Value>(&body).unwrap(), objects),
            Request::Binary { .. } => panic!("unexpected binary request"),
        };
        assert_eq!(
            body["inputs"][1]["data"],
            json!([[2, 5, 6, 3, 0, 0], [2, 20, 21, 3, 0, 0]]),
        );
        assert_eq!(body["outputs"][0]["parameters"]["classification"], 2);
        assert_eq!(objects.len(), 2);
        assert_eq!(objects[0].input, "hello world");
        assert_eq!(
            objects[0].tokens,
            ["[CLS]", "hello", "world", "[SEP]", "", ""],
        );
        assert!(objects[0].offsets.is_none());
    }

    #[test]
    fn test_binary_request() {
        let pipeline = pipeline(16)
            .with_transport(Transport::Grpc)
            .build()
            .unwrap();
        let inputs = InputTensor::bert_inputs(2, 16, Datatype::Int32);
        let request = pipeline
            .run(&["hello world", "this is a sequence"], &inputs, &[])
            .unwrap();

        match request {
            Request::Binary {
                inputs: declared,
                buffers,
                objects,
            } => {
                assert_eq!(declared, inputs);
                assert_eq!(buffers.input_mask.len(), 2 * 16 * 4);
                assert_eq!(buffers.input_ids.len(), 2 * 16 * 4);
                assert_eq!(buffers.segment_ids.len(), 2 * 16 * 4);
                assert_eq!(objects[1].input, "this is a sequence");
            }
            Request::Json { .. } => panic!("unexpected json request"),
        }
    }

    #[test]
    fn test_offsets() {
        let pipeline = pipeline(5).with_offsets(true).build().unwrap();
        let inputs = InputTensor::bert_inputs(1, 5, Datatype::Int64);
        let request = pipeline
            .run(&["unaffable world !"], &inputs, &[])
            .unwrap();

        let object = &request.objects()[0];
        assert_eq!(object.tokens, ["[CLS]", "un", "##aff", "##able", "[SEP]"]);
        assert_eq!(object.offsets, Some(vec![(0, 2), (2, 5), (5, 9)]));
        assert_eq!(
            to_value(object).unwrap(),
            json!({
                "input": "unaffable world !",
                "tokens": ["[CLS]", "un", "##aff", "##able", "[SEP]"],
                "offsets": [[0, 2], [2, 5], [5, 9]],
            }),
        );
    }

    #[test]
    fn test_data_split() {
        let pipeline = pipeline(8).build().unwrap();
        let inputs = InputTensor::bert_inputs(1, 8, Datatype::Int32);
        let request = pipeline
            .run(&["hello ||| world"], &inputs, &[])
            .unwrap();

        let object = &request.objects()[0];
        assert_eq!(object.input, "helloworld");
        assert_eq!(object.tokens[1], "[UNK]");
    }

    #[test]
    fn test_input_too_long() {
        let pipeline = pipeline(8).with_max_input_chars(10).unwrap().build().unwrap();
        let inputs = InputTensor::bert_inputs(2, 8, Datatype::Int32);

        assert!(pipeline.run(&["0123456789"], &inputs, &[]).is_ok());
        assert!(matches!(
            pipeline.run(&["hello", "hello world"], &inputs, &[]),
            Err(PipelineError::InputTooLong(1, 11, 10)),
        ));
    }

    #[test]
    fn test_no_inputs() {
        let pipeline = pipeline(8).build().unwrap();
        assert!(matches!(
            pipeline.run(&["hello"], &[], &[]),
            Err(PipelineError::Encoder(EncoderError::NoInputs)),
        ));
    }

    #[test]
    fn test_chinese() {
        let pipeline = pipeline(8)
            .with_chinese(true)
            .with_offsets(true)
            .build()
            .unwrap();
        let inputs = InputTensor::bert_inputs(1, 8, Datatype::Int32);
        let request = pipeline.run(&["你好 World"], &inputs, &[]).unwrap();

        let object = &request.objects()[0];
        assert_eq!(object.tokens[..5], ["[CLS]", "你", "好", "world", "[SEP]"]);
        assert_eq!(object.offsets, Some(vec![(0, 1), (1, 2), (3, 8)]));
    }
}

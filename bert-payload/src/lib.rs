#![cfg_attr(doc, forbid(broken_intra_doc_links, private_intra_doc_links))]
//! The Bert payload pipeline turns batches of texts into request payloads of a model server.
//!
//! The texts are encoded by a [`bert_tokenizer::Tokenizer`] into fixed size features, which are
//! either serialized as a json batch body with transposed `[kind][batch][seq]` arrays or packed
//! as little endian `segment_ids`, `input_ids` and `input_mask` buffers, depending on the
//! [`Transport`]. The pipeline performs no network I/O.
//!
//! ```no_run
//! use bert_payload::{Builder, Datatype, InputTensor, OutputTensor, Request, Transport};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pipeline = Builder::from_file("vocab.txt")?
//!         .with_chinese(false)
//!         .with_token_size(48)?
//!         .with_transport(Transport::Http)
//!         .build()?;
//!
//!     let inputs = InputTensor::bert_inputs(2, pipeline.token_size(), Datatype::Int32);
//!     let outputs = [OutputTensor::new("logits").with_binary_data(false)];
//!     let texts = ["This is a sequence.", "And another one!"];
//!     if let Request::Json { body, objects } = pipeline.run(&texts, &inputs, &outputs)? {
//!         assert!(!body.is_empty());
//!         assert_eq!(objects.len(), 2);
//!     }
//!
//!     Ok(())
//! }
//! ```

mod binary;
mod builder;
mod config;
mod encoder;
mod features;
mod json;
mod pipeline;
mod tensor;

pub use crate::{
    binary::{BinaryEncoder, Buffers},
    builder::{Builder, BuilderError},
    config::{Config, ConfigError, ModelConfig},
    encoder::{EncoderError, Payload, PayloadEncoder, Transport},
    features::{AttentionMasks, Features, TokenIds, TypeIds},
    json::JsonEncoder,
    pipeline::{InputObject, Pipeline, PipelineError, Request, DATA_SPLIT},
    tensor::{Datatype, InputTensor, OutputParameters, OutputTensor, TensorKind},
};

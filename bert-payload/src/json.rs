use log::debug;
use serde::Serialize;
use serde_json::to_vec;

use crate::{
    encoder::{EncoderError, Payload, PayloadEncoder},
    features::Features,
    tensor::{InputTensor, OutputTensor, TensorKind},
};

/// Encodes the features as a json batch body.
///
/// The features are transposed to `[kind][batch][seq]` and the i-th declared input tensor receives
/// the i-th kind in the order `segment_ids`, `input_ids`, `input_mask`, regardless of its name.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonEncoder;

#[derive(Serialize)]
struct JsonInput<'a> {
    name: &'a str,
    shape: &'a [i64],
    datatype: &'a str,
    data: Vec<Vec<i32>>,
}

#[derive(Serialize)]
struct JsonBody<'a> {
    inputs: Vec<JsonInput<'a>>,
    outputs: &'a [OutputTensor],
}

impl PayloadEncoder for JsonEncoder {
    fn encode(
        &self,
        features: &Features,
        inputs: &[InputTensor],
        outputs: &[OutputTensor],
    ) -> Result<Payload, EncoderError> {
        if inputs.is_empty() {
            return Err(EncoderError::NoInputs);
        }
        if inputs.len() > TensorKind::ALL.len() {
            return Err(EncoderError::TooManyInputs(inputs.len()));
        }

        let transposed = features.transposed();
        let inputs = inputs
            .iter()
            .zip(transposed.outer_iter())
            .map(|(input, data)| -> Result<_, EncoderError> {
                input.datatype()?;
                Ok(JsonInput {
                    name: &input.name,
                    shape: &input.shape,
                    datatype: &input.datatype,
                    data: data.outer_iter().map(|sequence| sequence.to_vec()).collect(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let body = to_vec(&JsonBody { inputs, outputs })?;
        debug!(
            "encoded {} sequences into a json body of {} bytes",
            features.batch_size(),
            body.len(),
        );

        Ok(Payload::Json(body))
    }
}

#[cfg(test)]
mod tests {
    use bert_tokenizer::Builder;
    use serde_json::{from_slice, json, Value};
    use test_utils::vocab;

    use super::*;
    use crate::tensor::Datatype;

    fn features(sequences: &[&str], token_size: usize) -> Features {
        let tokenizer = Builder::<i32>::new(vocab())
            .unwrap()
            .with_token_size(token_size)
            .unwrap()
            .build();
        Features::new(&tokenizer.encode_batch(sequences), token_size)
    }

    fn body(payload: Payload) -> Value {
        match payload {
            Payload::Json(body) => from_slice(&body).unwrap(),
            Payload::Binary(_) => panic!("unexpected binary payload"),
        }
    }

    #[test]
    fn test_encode() {
        let features = features(&["hello world", "a"], 5);
        let inputs = InputTensor::bert_inputs(2, 5, Datatype::Int32);
        let outputs = [OutputTensor::new("logits").with_binary_data(false)];
        let payload = JsonEncoder.encode(&features, &inputs, &outputs).unwrap();

        assert_eq!(
            body(payload),
            json!({
                "inputs": [
                    {
                        "name": "segment_ids",
                        "shape": [2, 5],
                        "datatype": "INT32",
                        "data": [[0, 0, 0, 0, 0], [0, 0, 0, 0, 0]],
                    },
                    {
                        "name": "input_ids",
                        "shape": [2, 5],
                        "datatype": "INT32",
                        "data": [[2, 5, 6, 3, 0], [2, 20, 3, 0, 0]],
                    },
                    {
                        "name": "input_mask",
                        "shape": [2, 5],
                        "datatype": "INT32",
                        "data": [[1, 1, 1, 1, 0], [1, 1, 1, 0, 0]],
                    },
                ],
                "outputs": [{ "name": "logits", "parameters": { "binary_data": false } }],
            }),
        );
    }

    #[test]
    fn test_dimensions() {
        let features = features(&["a", "b", "c", "d"], 8);
        let inputs = InputTensor::bert_inputs(4, 8, Datatype::Int64);
        let body = body(JsonEncoder.encode(&features, &inputs, &[]).unwrap());

        let inputs = body["inputs"].as_array().unwrap();
        assert_eq!(inputs.len(), 3);
        for input in inputs {
            let data = input["data"].as_array().unwrap();
            assert_eq!(data.len(), 4);
            assert!(data
                .iter()
                .all(|sequence| sequence.as_array().unwrap().len() == 8));
        }
        assert!(body["outputs"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_inputs_by_position() {
        let features = features(&["hello"], 4);
        let inputs = vec![
            InputTensor::new("first", vec![1, 4], "INT64"),
            InputTensor::new("second", vec![1, 4], "INT64"),
        ];
        let body = body(JsonEncoder.encode(&features, &inputs, &[]).unwrap());

        assert_eq!(body["inputs"].as_array().unwrap().len(), 2);
        assert_eq!(body["inputs"][0]["name"], "first");
        assert_eq!(body["inputs"][0]["data"], json!([[0, 0, 0, 0]]));
        assert_eq!(body["inputs"][1]["data"], json!([[2, 5, 3, 0]]));
    }

    #[test]
    fn test_errors() {
        let features = features(&["hello"], 4);
        assert!(matches!(
            JsonEncoder.encode(&features, &[], &[]),
            Err(EncoderError::NoInputs),
        ));

        let mut inputs = InputTensor::bert_inputs(1, 4, Datatype::Int32);
        inputs.push(InputTensor::new("extra", vec![1, 4], "INT32"));
        assert!(matches!(
            JsonEncoder.encode(&features, &inputs, &[]),
            Err(EncoderError::TooManyInputs(4)),
        ));

        let inputs = vec![InputTensor::new("input_ids", vec![1, 4], "FP16")];
        assert!(matches!(
            JsonEncoder.encode(&features, &inputs, &[]),
            Err(EncoderError::Datatype(datatype)) if datatype == "FP16",
        ));
    }
}

use log::debug;
use ndarray::ArrayView2;

use crate::{
    encoder::{EncoderError, Payload, PayloadEncoder},
    features::Features,
    tensor::{Datatype, InputTensor, OutputTensor, TensorKind},
};

/// The little endian byte buffers of the Bert input tensors.
///
/// Each buffer holds `batch_size * token_size` values of the declared datatype, sequence after
/// sequence in batch order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Buffers {
    pub segment_ids: Vec<u8>,
    pub input_ids: Vec<u8>,
    pub input_mask: Vec<u8>,
}

impl Buffers {
    /// Gets the buffer of the kind.
    pub fn get(&self, kind: TensorKind) -> &[u8] {
        match kind {
            TensorKind::SegmentIds => &self.segment_ids,
            TensorKind::InputIds => &self.input_ids,
            TensorKind::InputMask => &self.input_mask,
        }
    }

    fn get_mut(&mut self, kind: TensorKind) -> &mut Vec<u8> {
        match kind {
            TensorKind::SegmentIds => &mut self.segment_ids,
            TensorKind::InputIds => &mut self.input_ids,
            TensorKind::InputMask => &mut self.input_mask,
        }
    }

    /// Gets the buffers in the order `segment_ids`, `input_ids`, `input_mask`.
    pub fn into_vec(self) -> Vec<Vec<u8>> {
        vec![self.segment_ids, self.input_ids, self.input_mask]
    }
}

/// Encodes the features as raw little endian tensor buffers.
///
/// The declared input tensors are matched by name and must cover all three kinds. The requested
/// outputs are left to the transport.
#[derive(Clone, Copy, Debug, Default)]
pub struct BinaryEncoder;

impl PayloadEncoder for BinaryEncoder {
    fn encode(
        &self,
        features: &Features,
        inputs: &[InputTensor],
        _outputs: &[OutputTensor],
    ) -> Result<Payload, EncoderError> {
        if inputs.is_empty() {
            return Err(EncoderError::NoInputs);
        }

        let mut buffers = Buffers::default();
        let mut declared = [false; 3];
        for input in inputs {
            let kind = input.kind()?;
            let datatype = input.datatype()?;
            let buffer = buffers.get_mut(kind);
            buffer.clear();
            pack(features.get(kind), datatype, buffer);
            declared[kind.index()] = true;
        }
        if let Some(kind) = TensorKind::ALL.iter().find(|kind| !declared[kind.index()]) {
            return Err(EncoderError::MissingInput(kind.name()));
        }
        debug!(
            "encoded {} sequences into buffers of {}, {} and {} bytes",
            features.batch_size(),
            buffers.segment_ids.len(),
            buffers.input_ids.len(),
            buffers.input_mask.len(),
        );

        Ok(Payload::Binary(buffers))
    }
}

/// Packs the values row by row as little endian bytes of the datatype.
fn pack(values: ArrayView2<'_, i32>, datatype: Datatype, buffer: &mut Vec<u8>) {
    buffer.reserve(values.len() * datatype.width());
    for value in values.iter() {
        match datatype {
            Datatype::Int32 => buffer.extend_from_slice(&value.to_le_bytes()),
            Datatype::Int64 => buffer.extend_from_slice(&i64::from(*value).to_le_bytes()),
        }
    }
}

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::encoder::EncoderError;

/// The numerical data type of a tensor on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Datatype {
    #[serde(rename = "INT32")]
    Int32,
    #[serde(rename = "INT64")]
    Int64,
}

impl Datatype {
    /// Gets the number of bytes per value.
    pub fn width(self) -> usize {
        match self {
            Self::Int32 => 4,
            Self::Int64 => 8,
        }
    }

    /// Gets the wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Int32 => "INT32",
            Self::Int64 => "INT64",
        }
    }
}

impl FromStr for Datatype {
    type Err = EncoderError;

    fn from_str(datatype: &str) -> Result<Self, Self::Err> {
        match datatype {
            "INT32" => Ok(Self::Int32),
            "INT64" => Ok(Self::Int64),
            _ => Err(EncoderError::Datatype(datatype.to_string())),
        }
    }
}

impl fmt::Display for Datatype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The kinds of Bert input tensors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TensorKind {
    /// The type ids, named `segment_ids`.
    SegmentIds,
    /// The token ids, named `input_ids`.
    InputIds,
    /// The attention mask, named `input_mask`.
    InputMask,
}

impl TensorKind {
    /// All kinds in the order of the per sequence features.
    pub const ALL: [Self; 3] = [Self::SegmentIds, Self::InputIds, Self::InputMask];

    /// Gets the tensor name of the kind.
    pub fn name(self) -> &'static str {
        match self {
            Self::SegmentIds => "segment_ids",
            Self::InputIds => "input_ids",
            Self::InputMask => "input_mask",
        }
    }

    /// Gets the kind of a tensor name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.name() == name)
    }

    /// Gets the position of the kind in the per sequence features.
    pub fn index(self) -> usize {
        match self {
            Self::SegmentIds => 0,
            Self::InputIds => 1,
            Self::InputMask => 2,
        }
    }
}

/// A declared input tensor of the model.
///
/// The datatype is kept as declared by the model configuration and only checked when a payload
/// is encoded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputTensor {
    pub name: String,
    pub shape: Vec<i64>,
    pub datatype: String,
}

impl InputTensor {
    /// Creates an input tensor descriptor.
    pub fn new(name: impl Into<String>, shape: Vec<i64>, datatype: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shape,
            datatype: datatype.into(),
        }
    }

    /// Creates the three `[batch_size, token_size]` Bert input descriptors.
    ///
    /// The order is `segment_ids`, `input_ids`, `input_mask`.
    pub fn bert_inputs(batch_size: usize, token_size: usize, datatype: Datatype) -> Vec<Self> {
        TensorKind::ALL
            .iter()
            .map(|kind| {
                Self::new(
                    kind.name(),
                    vec![batch_size as i64, token_size as i64],
                    datatype.as_str(),
                )
            })
            .collect()
    }

    /// Parses the declared datatype.
    pub fn datatype(&self) -> Result<Datatype, EncoderError> {
        self.datatype.parse()
    }

    /// Gets the kind by the tensor name.
    pub fn kind(&self) -> Result<TensorKind, EncoderError> {
        TensorKind::from_name(&self.name)
            .ok_or_else(|| EncoderError::UnknownInput(self.name.clone()))
    }
}

/// The parameters of a requested output tensor.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputParameters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binary_data: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification: Option<i64>,
}

/// A requested output tensor of the model.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputTensor {
    pub name: String,
    #[serde(default)]
    pub parameters: OutputParameters,
}

impl OutputTensor {
    /// Creates an output tensor descriptor without parameters.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: OutputParameters::default(),
        }
    }

    /// Requests the output as binary data.
    pub fn with_binary_data(mut self, toggle: bool) -> Self {
        self.parameters.binary_data = Some(toggle);
        self
    }

    /// Requests the top `count` classifications.
    pub fn with_classification(mut self, count: i64) -> Self {
        self.parameters.classification = Some(count);
        self
    }
}

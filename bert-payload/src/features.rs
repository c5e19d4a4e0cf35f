use bert_tokenizer::Encoding;
use derive_more::{Deref, From};
use ndarray::{Array2, Array3, ArrayView2};

use crate::tensor::TensorKind;

/// The token ids of the encoded sequences.
#[derive(Clone, Debug, Deref, From)]
pub struct TokenIds(pub Array2<i32>);

/// The attention masks of the encoded sequences.
#[derive(Clone, Debug, Deref, From)]
pub struct AttentionMasks(pub Array2<i32>);

/// The type ids of the encoded sequences.
#[derive(Clone, Debug, Deref, From)]
pub struct TypeIds(pub Array2<i32>);

/// The features of a batch of encoded sequences.
///
/// Each array has the shape `[batch_size, token_size]`.
#[derive(Clone, Debug)]
pub struct Features {
    pub type_ids: TypeIds,
    pub token_ids: TokenIds,
    pub attention_masks: AttentionMasks,
}

impl Features {
    /// Collects the features of the encodings in batch order.
    ///
    /// Encodings shorter than the token size are padded with zeros.
    pub fn new(encodings: &[Encoding<i32>], token_size: usize) -> Self {
        let shape = (encodings.len(), token_size);
        let collect = |array: fn(&Encoding<i32>) -> &[i32]| {
            Array2::from_shape_fn(shape, |(i, j)| {
                encodings
                    .get(i)
                    .and_then(|encoding| array(encoding).get(j))
                    .copied()
                    .unwrap_or(0)
            })
        };

        Self {
            type_ids: collect(Encoding::type_ids).into(),
            token_ids: collect(Encoding::ids).into(),
            attention_masks: collect(Encoding::attention_mask).into(),
        }
    }

    /// Gets the batch size.
    pub fn batch_size(&self) -> usize {
        self.token_ids.nrows()
    }

    /// Gets the token size.
    pub fn token_size(&self) -> usize {
        self.token_ids.ncols()
    }

    /// Gets the feature array of the kind.
    pub fn get(&self, kind: TensorKind) -> ArrayView2<'_, i32> {
        match kind {
            TensorKind::SegmentIds => self.type_ids.view(),
            TensorKind::InputIds => self.token_ids.view(),
            TensorKind::InputMask => self.attention_masks.view(),
        }
    }

    /// Stacks the features per sequence as `[batch][kind][seq]`.
    pub fn stacked(&self) -> Array3<i32> {
        let shape = (self.batch_size(), TensorKind::ALL.len(), self.token_size());
        Array3::from_shape_fn(shape, |(i, k, j)| self.get(TensorKind::ALL[k])[[i, j]])
    }

    /// Transposes the stacked features to `[kind][batch][seq]`.
    pub fn transposed(&self) -> Array3<i32> {
        self.stacked().permuted_axes([1, 0, 2])
    }
}

use num_traits::Num;

use crate::{
    pre_tokenizer::string::{Offsets, Token},
    vocab::Vocab,
};

/// An encoded sequence.
///
/// The arrays are parallel and, once post-tokenized, have the configured token size.
#[derive(Clone, Debug, PartialEq)]
pub struct Encoding<N> {
    /// The IDs of the tokens.
    pub(crate) ids: Vec<N>,
    /// The type of the IDs, always zero for single sequences.
    pub(crate) type_ids: Vec<N>,
    /// The tokenized sequence.
    pub(crate) tokens: Vec<String>,
    /// The offsets of the tokens in the sequence.
    pub(crate) offsets: Vec<Offsets>,
    /// The mask identifying padding tokens.
    pub(crate) attention_mask: Vec<N>,
}

impl<N> Encoding<N> {
    /// Creates an encoding from the word pieces of a sequence.
    pub(crate) fn new(tokens: Vec<Token>, vocab: &Vocab<N>) -> Self
    where
        N: Num + Copy,
    {
        let len = tokens.len();
        let mut encoding = Self::with_capacity(len);
        for token in tokens {
            encoding
                .ids
                .push(vocab.get_id(token.value()).unwrap_or_else(|| vocab.unk_id()));
            encoding.tokens.push(token.value().to_string());
            encoding.offsets.push(token.offsets());
        }
        encoding.type_ids = vec![N::zero(); len];
        encoding.attention_mask = vec![N::one(); len];

        encoding
    }

    /// Creates an empty encoding with capacity.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            ids: Vec::with_capacity(capacity),
            type_ids: Vec::with_capacity(capacity),
            tokens: Vec::with_capacity(capacity),
            offsets: Vec::with_capacity(capacity),
            attention_mask: Vec::with_capacity(capacity),
        }
    }

    /// Gets the total length.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Checks whether this is empty.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Gets the ids.
    pub fn ids(&self) -> &[N] {
        self.ids.as_slice()
    }

    /// Gets the type ids.
    pub fn type_ids(&self) -> &[N] {
        self.type_ids.as_slice()
    }

    /// Gets the tokens.
    pub fn tokens(&self) -> &[String] {
        self.tokens.as_slice()
    }

    /// Gets the offsets.
    pub fn offsets(&self) -> &[Offsets] {
        self.offsets.as_slice()
    }

    /// Gets the attention mask.
    pub fn attention_mask(&self) -> &[N] {
        self.attention_mask.as_slice()
    }

    /// Keeps at most `len` tokens.
    pub(crate) fn truncate(mut self, len: usize) -> Self {
        self.ids.truncate(len);
        self.type_ids.truncate(len);
        self.tokens.truncate(len);
        self.offsets.truncate(len);
        self.attention_mask.truncate(len);
        self
    }

    /// Pads up to `len` tokens, longer encodings are left unchanged.
    pub(crate) fn pad(mut self, len: usize, pad_id: N) -> Self
    where
        N: Num + Copy,
    {
        if self.len() < len {
            self.ids.resize(len, pad_id);
            self.type_ids.resize(len, N::zero());
            self.tokens.resize(len, String::new());
            self.offsets.resize(len, Offsets::default());
            self.attention_mask.resize(len, N::zero());
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoding(len: usize) -> Encoding<i32> {
        Encoding {
            ids: (1..=len as i32).collect(),
            type_ids: vec![0; len],
            tokens: (0..len).map(|i| i.to_string()).collect(),
            offsets: (0..len).map(|i| Offsets(i, i + 1)).collect(),
            attention_mask: vec![1; len],
        }
    }

    #[test]
    fn test_new() {
        let vocab = Vocab::<i32>::from_tokens(vec!["[CLS]", "[SEP]", "[UNK]", "hello"]).unwrap();
        let encoding = Encoding::new(
            vec![
                Token::new("hello", Offsets(0, 5)),
                Token::new("[MASK]", Offsets(6, 12)),
            ],
            &vocab,
        );
        assert_eq!(encoding.ids(), [3, 2]);
        assert_eq!(encoding.type_ids(), [0, 0]);
        assert_eq!(encoding.attention_mask(), [1, 1]);
        assert_eq!(encoding.tokens(), ["hello", "[MASK]"]);
        assert_eq!(encoding.offsets(), [Offsets(0, 5), Offsets(6, 12)]);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(encoding(4).truncate(3).len(), 3);
        assert_eq!(encoding(4).truncate(4).len(), 4);
        assert_eq!(encoding(4).truncate(5).len(), 4);
        assert!(encoding(4).truncate(0).is_empty());
    }

    #[test]
    fn test_pad() {
        assert_eq!(encoding(3).pad(3, 0).len(), 3);
        assert_eq!(encoding(5).pad(3, 0).len(), 5);

        let padded = encoding(2).pad(4, 0);
        assert_eq!(padded.ids(), [1, 2, 0, 0]);
        assert_eq!(padded.type_ids(), [0, 0, 0, 0]);
        assert_eq!(padded.attention_mask(), [1, 1, 0, 0]);
        assert_eq!(padded.tokens(), ["0", "1", "", ""]);
        assert_eq!(padded.offsets()[3], Offsets(0, 0));
    }
}

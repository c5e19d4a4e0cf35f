use std::ops::Range;

use num_traits::Num;
#[cfg(feature = "multithreaded")]
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

use crate::{
    model::{
        pieces::{group_pieces, merge_pieces},
        Model,
    },
    normalizer::NormalizedString,
    post_tokenizer::{encoding::Encoding, PostTokenizer},
    pre_tokenizer::{string::Token, PreTokenizer},
    vocab::Vocab,
};

/// A Bert tokenizer.
///
/// Can be created via the [`Builder`] and consists of a Bert pre-tokenizer, a Bert word piece
/// model and a Bert post-tokenizer including truncation and padding to the token size.
///
/// The tokenizer is immutable and only shares the read-only vocabulary, hence it can be used
/// concurrently.
///
/// [`Builder`]: crate::Builder
#[derive(Debug)]
pub struct Tokenizer<N> {
    pub(crate) chinese: bool,
    pub(crate) pre_tokenizer: PreTokenizer,
    pub(crate) model: Model<N>,
    pub(crate) post_tokenizer: PostTokenizer<N>,
}

impl<N> Tokenizer<N>
where
    N: Num + Copy,
{
    /// Tokenizes the sequence into word pieces.
    ///
    /// The offsets of the word pieces are character indices into the sequence. In chinese mode
    /// the sequence is lowercased and stripped of accents before the tokenization, the offsets
    /// still refer to the original sequence.
    pub fn tokenize(&self, sequence: impl AsRef<str>) -> Vec<Token> {
        let sequence = sequence.as_ref();
        if self.chinese {
            let normalized = NormalizedString::new(sequence);
            let words = self.pre_tokenizer.pre_tokenize(normalized.normalized());
            normalized.align(self.model.tokenize(words))
        } else {
            let words = self.pre_tokenizer.pre_tokenize(sequence);
            self.model.tokenize(words)
        }
    }

    /// Tokenizes the sequence into whole words, with the word pieces merged back together.
    pub fn words(&self, sequence: impl AsRef<str>) -> Vec<Token> {
        let sequence = sequence.as_ref();
        let tokens = self.tokenize(sequence);
        let groups = self.group_pieces(&tokens);
        merge_pieces(sequence, &tokens, &groups)
    }

    /// Groups the word pieces into ranges of token indices which form complete words.
    pub fn group_pieces(&self, tokens: &[Token]) -> Vec<Range<usize>> {
        group_pieces(tokens, self.model.prefix.as_str())
    }

    /// Encodes the sequence.
    ///
    /// The encoding is truncated and padded to the token size.
    pub fn encode(&self, sequence: impl AsRef<str>) -> Encoding<N> {
        let tokens = self.tokenize(sequence);
        let encoding = Encoding::new(tokens, &self.model.vocab);
        self.post_tokenizer.post_tokenize(encoding)
    }

    /// Encodes the batch of sequences.
    ///
    /// The encodings keep the order of the sequences.
    pub fn encode_batch<S>(&self, sequences: &[S]) -> Vec<Encoding<N>>
    where
        S: AsRef<str> + Sync,
        N: Send + Sync,
    {
        #[cfg(feature = "multithreaded")]
        let encodings = sequences
            .par_iter()
            .map(|sequence| self.encode(sequence))
            .collect();
        #[cfg(not(feature = "multithreaded"))]
        let encodings = sequences
            .iter()
            .map(|sequence| self.encode(sequence))
            .collect();

        encodings
    }

    /// Gets the token size.
    pub fn token_size(&self) -> usize {
        self.post_tokenizer.token_size()
    }

    /// Checks whether the tokenizer splits chinese characters.
    pub fn is_chinese(&self) -> bool {
        self.chinese
    }

    /// Gets the vocabulary.
    pub fn vocab(&self) -> &Vocab<N> {
        &self.model.vocab
    }
}

pub mod encoding;

use std::iter::once;

use log::trace;
use num_traits::Num;

use crate::{
    post_tokenizer::encoding::Encoding,
    pre_tokenizer::string::Offsets,
    vocab::{Vocab, CLS, SEP},
};

/// A Bert post-tokenizer.
///
/// Truncates the encoding, wraps it in the class and separation tokens and pads it to the token
/// size.
#[derive(Debug)]
pub(crate) struct PostTokenizer<N> {
    cls_id: N,
    sep_id: N,
    token_size: usize,
}

impl<N> PostTokenizer<N>
where
    N: Num + Copy,
{
    pub(crate) const ADDED_TOKENS: usize = 2;

    pub(crate) fn new(vocab: &Vocab<N>, token_size: usize) -> Self {
        Self {
            cls_id: vocab.cls_id(),
            sep_id: vocab.sep_id(),
            token_size,
        }
    }

    /// Gets the token size.
    pub(crate) fn token_size(&self) -> usize {
        self.token_size
    }

    pub(crate) fn post_tokenize(&self, encoding: Encoding<N>) -> Encoding<N> {
        let max_len = self.token_size.saturating_sub(Self::ADDED_TOKENS);
        if encoding.len() > max_len {
            trace!("truncating {} tokens to {}", encoding.len(), max_len);
        }
        let encoding = encoding.truncate(max_len);

        let ids = once(self.cls_id)
            .chain(encoding.ids)
            .chain(once(self.sep_id))
            .collect();
        let type_ids = once(N::zero())
            .chain(encoding.type_ids)
            .chain(once(N::zero()))
            .collect();
        let tokens = once(CLS.to_string())
            .chain(encoding.tokens)
            .chain(once(SEP.to_string()))
            .collect();
        let offsets = once(Offsets::default())
            .chain(encoding.offsets)
            .chain(once(Offsets::default()))
            .collect();
        let attention_mask = once(N::one())
            .chain(encoding.attention_mask)
            .chain(once(N::one()))
            .collect();

        Encoding {
            ids,
            type_ids,
            tokens,
            offsets,
            attention_mask,
        }
        .pad(self.token_size, N::zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pre_tokenizer::string::Token;

    fn vocab() -> Vocab<i32> {
        Vocab::from_tokens(vec!["[PAD]", "[UNK]", "[CLS]", "[SEP]", "a", "b", "c"]).unwrap()
    }

    fn encoding(words: &[&str]) -> Encoding<i32> {
        let tokens = words
            .iter()
            .enumerate()
            .map(|(i, word)| Token::new(word, Offsets(2 * i, 2 * i + 1)))
            .collect();
        Encoding::new(tokens, &vocab())
    }

    #[test]
    fn test_post_tokenize() {
        let post_tokenizer = PostTokenizer::new(&vocab(), 6);
        let padded = post_tokenizer.post_tokenize(encoding(&["a", "b"]));
        assert_eq!(padded.ids(), [2, 4, 5, 3, 0, 0]);
        assert_eq!(padded.attention_mask(), [1, 1, 1, 1, 0, 0]);
        assert_eq!(padded.type_ids(), [0, 0, 0, 0, 0, 0]);
        assert_eq!(padded.tokens(), ["[CLS]", "a", "b", "[SEP]", "", ""]);
        assert_eq!(
            padded.offsets(),
            [
                Offsets(0, 0),
                Offsets(0, 1),
                Offsets(2, 3),
                Offsets(0, 0),
                Offsets(0, 0),
                Offsets(0, 0),
            ],
        );
    }

    #[test]
    fn test_post_tokenize_truncated() {
        let post_tokenizer = PostTokenizer::new(&vocab(), 4);
        let truncated = post_tokenizer.post_tokenize(encoding(&["a", "b", "c"]));
        assert_eq!(truncated.ids(), [2, 4, 5, 3]);
        assert_eq!(truncated.attention_mask(), [1, 1, 1, 1]);
    }

    #[test]
    fn test_post_tokenize_minimal() {
        let post_tokenizer = PostTokenizer::new(&vocab(), 2);
        let truncated = post_tokenizer.post_tokenize(encoding(&["a", "b", "c"]));
        assert_eq!(truncated.ids(), [2, 3]);
        assert_eq!(truncated.attention_mask(), [1, 1]);

        let empty = post_tokenizer.post_tokenize(encoding(&[]));
        assert_eq!(empty.ids(), [2, 3]);
    }
}

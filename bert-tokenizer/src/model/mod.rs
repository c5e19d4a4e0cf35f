pub mod pieces;

use std::sync::Arc;

use crate::{
    pre_tokenizer::string::{Offsets, Token},
    vocab::{Vocab, UNK},
    SmallString,
};

/// A Bert word piece model.
#[derive(Debug)]
pub(crate) struct Model<N> {
    pub(crate) vocab: Arc<Vocab<N>>,
    pub(crate) prefix: SmallString,
    pub(crate) max_chars: usize,
}

impl<N> Model<N>
where
    N: Copy,
{
    /// Tokenizes the pre-tokenized words into word pieces.
    ///
    /// A word becomes a single unknown token if it is longer than the maximum number of
    /// characters per word or if it can't be decomposed into pieces of the vocabulary.
    pub(crate) fn tokenize(&self, words: Vec<Token>) -> Vec<Token> {
        let mut tokens = Vec::with_capacity(words.len());
        for word in words {
            match self.tokenize_word(&word) {
                Some(pieces) => tokens.extend(pieces),
                None => tokens.push(Token::new(UNK, word.offsets)),
            }
        }

        tokens
    }

    /// Decomposes the word greedily into the longest matching pieces.
    fn tokenize_word(&self, word: &Token) -> Option<Vec<Token>> {
        let sequence = word.value();
        // byte indices of the char boundaries including the end
        let bounds = sequence
            .char_indices()
            .map(|(idx, _)| idx)
            .chain(Some(sequence.len()))
            .collect::<Vec<_>>();
        let char_len = bounds.len() - 1;
        if char_len > self.max_chars {
            return None;
        }

        let mut pieces = Vec::new();
        let mut piece = String::with_capacity(self.prefix.len() + sequence.len());
        let mut start = 0;
        while start < char_len {
            let mut end = char_len;
            loop {
                if end == start {
                    return None;
                }
                piece.clear();
                if start > 0 {
                    piece.push_str(self.prefix.as_str());
                }
                piece.push_str(&sequence[bounds[start]..bounds[end]]);
                if self.vocab.contains(&piece) {
                    break;
                }
                end -= 1;
            }
            pieces.push(Token::new(
                &piece,
                Offsets(start, end).shift(word.offsets.0),
            ));
            start = end;
        }

        Some(pieces)
    }
}

#[cfg(test)]
mod tests {
    use test_utils::vocab;

    use super::*;

    fn model(max_chars: usize) -> Model<u32> {
        Model {
            vocab: Arc::new(Vocab::parse(vocab()).unwrap()),
            prefix: "##".into(),
            max_chars,
        }
    }

    fn words(words: &[(&str, usize)]) -> Vec<Token> {
        words
            .iter()
            .map(|(word, start)| {
                Token::new(word, Offsets(*start, *start + word.chars().count()))
            })
            .collect()
    }

    #[test]
    fn test_whole_word() {
        let tokens = model(200).tokenize(words(&[("hello", 0), ("world", 6)]));
        assert_eq!(
            tokens,
            vec![
                Token::new("hello", Offsets(0, 5)),
                Token::new("world", Offsets(6, 11)),
            ],
        );
    }

    #[test]
    fn test_pieces() {
        let tokens = model(200).tokenize(words(&[("unaffable", 3)]));
        assert_eq!(
            tokens,
            vec![
                Token::new("un", Offsets(3, 5)),
                Token::new("##aff", Offsets(5, 8)),
                Token::new("##able", Offsets(8, 12)),
            ],
        );
    }

    #[test]
    fn test_longest_match_first() {
        let tokens = model(200).tokenize(words(&[("plays", 0), ("playing", 6)]));
        assert_eq!(
            tokens,
            vec![
                Token::new("play", Offsets(0, 4)),
                Token::new("##s", Offsets(4, 5)),
                Token::new("play", Offsets(6, 10)),
                Token::new("##ing", Offsets(10, 13)),
            ],
        );
    }

    #[test]
    fn test_bad_word_is_unknown() {
        // "un" and "##aff" match, but "##x" doesn't, so the partial pieces are discarded
        let tokens = model(200).tokenize(words(&[("unaffx", 2), ("hello", 9)]));
        assert_eq!(
            tokens,
            vec![
                Token::new("[UNK]", Offsets(2, 8)),
                Token::new("hello", Offsets(9, 14)),
            ],
        );
    }

    #[test]
    fn test_too_long_word_is_unknown() {
        let word = "a".repeat(250);
        let tokens = model(200).tokenize(words(&[(word.as_str(), 4)]));
        assert_eq!(tokens, vec![Token::new("[UNK]", Offsets(4, 254))]);

        // not too long, but "##a" is not in the vocabulary
        let tokens = model(200).tokenize(words(&[("aa", 0)]));
        assert_eq!(tokens, vec![Token::new("[UNK]", Offsets(0, 2))]);

        let tokens = model(4).tokenize(words(&[("hello", 0)]));
        assert_eq!(tokens, vec![Token::new("[UNK]", Offsets(0, 5))]);
    }

    #[test]
    fn test_multibyte_pieces() {
        let tokens = model(200).tokenize(words(&[("你", 0), ("好", 1), ("isn", 3)]));
        assert_eq!(
            tokens,
            vec![
                Token::new("你", Offsets(0, 1)),
                Token::new("好", Offsets(1, 2)),
                Token::new("is", Offsets(3, 5)),
                Token::new("##n", Offsets(5, 6)),
            ],
        );
    }

    #[test]
    fn test_special_word() {
        let tokens = model(200).tokenize(words(&[("[MASK]", 0), ("[UNK]", 7)]));
        assert_eq!(
            tokens,
            vec![
                Token::new("[MASK]", Offsets(0, 6)),
                Token::new("[UNK]", Offsets(7, 12)),
            ],
        );
    }
}

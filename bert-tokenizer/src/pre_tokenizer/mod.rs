pub mod string;

use unicode_categories::UnicodeCategories;

use crate::{
    pre_tokenizer::string::{split_on, SplitDelimiter, Token},
    vocab::NEVER_SPLIT,
};

/// A Bert pre-tokenizer.
///
/// Splits a sequence into words, punctuation and optionally chinese characters. The special words
/// are never split.
#[derive(Debug, Default)]
pub(crate) struct PreTokenizer {
    chinese: bool,
}

/// Checks whether a character is whitespace.
pub(crate) fn is_whitespace(c: char) -> bool {
    c == ' ' || c == '\t' || c == '\n' || c == '\r' || c.is_separator_space()
}

/// Checks whether a character is punctuation.
pub(crate) fn is_punctuation(c: char) -> bool {
    c.is_ascii_punctuation() || c.is_punctuation()
}

/// Checks whether a character is chinese.
///
/// This defines a "chinese character" as anything in the CJK Unicode block:
///   https://en.wikipedia.org/wiki/CJK_Unified_Ideographs_(Unicode_block)
///
/// Note that the CJK Unicode block is NOT all Japanese and Korean characters, despite its name.
/// The modern Korean Hangul alphabet is a different block, as is Japanese Hiragana and Katakana.
/// Those alphabets are used to write space-separated words, so they are not treated specially and
/// handled like for all of the other languages.
pub(crate) fn is_chinese(c: char) -> bool {
    matches!(
        c,
        '\u{4E00}'..='\u{9FFF}'
            | '\u{3400}'..='\u{4DBF}'
            | '\u{20000}'..='\u{2A6DF}'
            | '\u{2A700}'..='\u{2B73F}'
            | '\u{2B740}'..='\u{2B81F}'
            | '\u{2B920}'..='\u{2CEAF}'
            | '\u{F900}'..='\u{FAFF}'
            | '\u{2F800}'..='\u{2FA1F}'
    )
}

impl PreTokenizer {
    pub(crate) fn new(chinese: bool) -> Self {
        Self { chinese }
    }

    /// Pre-tokenizes the sequence.
    ///
    /// The offsets of the tokens are character indices into the sequence. In chinese mode the
    /// sequence is expected to be normalized already.
    pub(crate) fn pre_tokenize(&self, sequence: &str) -> Vec<Token> {
        let words = if self.chinese {
            split_on(
                sequence,
                |c| is_whitespace(c) || is_chinese(c),
                SplitDelimiter::IsolateChinese,
            )
        } else {
            split_on(sequence, is_whitespace, SplitDelimiter::Remove)
        };

        let mut tokens = Vec::with_capacity(words.len());
        for word in words {
            if NEVER_SPLIT.contains(&word.value()) {
                tokens.push(word);
                continue;
            }

            let start = word.offsets.0;
            let pieces = split_on(word.value(), is_punctuation, SplitDelimiter::Isolate);
            tokens.extend(pieces.into_iter().map(|mut piece| {
                piece.offsets = piece.offsets.shift(start);
                piece
            }));
        }

        tokens
    }
}

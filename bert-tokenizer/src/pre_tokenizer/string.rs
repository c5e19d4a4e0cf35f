use std::mem::replace;

use crate::{pre_tokenizer::is_chinese, SmallString};

/// A half-open range `[start, end)` of character indices into the original sequence.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Offsets(pub usize, pub usize);

impl Offsets {
    /// Shifts the offsets by the start of the parent token.
    pub(crate) fn shift(self, by: usize) -> Self {
        Self(self.0 + by, self.1 + by)
    }

    /// Gets the number of characters covered by the offsets.
    pub fn len(&self) -> usize {
        self.1 - self.0
    }

    /// Checks whether the offsets cover no characters.
    pub fn is_empty(&self) -> bool {
        self.0 == self.1
    }
}

/// A token and its offsets in the original sequence.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub(crate) value: SmallString,
    pub(crate) offsets: Offsets,
}

impl Token {
    pub(crate) fn new(value: impl AsRef<str>, offsets: Offsets) -> Self {
        Self {
            value: value.as_ref().into(),
            offsets,
        }
    }

    /// Gets the token string.
    pub fn value(&self) -> &str {
        self.value.as_str()
    }

    /// Gets the offsets.
    pub fn offsets(&self) -> Offsets {
        self.offsets
    }
}

/// The behavior of a split regarding its delimiter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum SplitDelimiter {
    /// Drops the delimiter.
    Remove,
    /// Keeps the delimiter as a token on its own.
    Isolate,
    /// Keeps only chinese delimiters as tokens on their own.
    IsolateChinese,
}

impl SplitDelimiter {
    fn keeps(self, delimiter: char) -> bool {
        match self {
            Self::Remove => false,
            Self::Isolate => true,
            Self::IsolateChinese => is_chinese(delimiter),
        }
    }
}

/// Splits the sequence on each character which satisfies the predicate.
///
/// The offsets of the tokens are relative to the sequence and counted in characters.
pub(crate) fn split_on(
    sequence: &str,
    split: impl Fn(char) -> bool,
    delimiter: SplitDelimiter,
) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut word = SmallString::new();
    let mut word_len = 0;
    let mut offset = 0;

    for c in sequence.chars() {
        if split(c) {
            if word_len > 0 {
                tokens.push(Token {
                    value: replace(&mut word, SmallString::new()),
                    offsets: Offsets(offset - word_len, offset),
                });
                word_len = 0;
            }
            if delimiter.keeps(c) {
                let mut value = SmallString::new();
                value.push(c);
                tokens.push(Token {
                    value,
                    offsets: Offsets(offset, offset + 1),
                });
            }
        } else {
            word.push(c);
            word_len += 1;
        }
        offset += 1;
    }

    // the trailing word
    if word_len > 0 {
        tokens.push(Token {
            value: word,
            offsets: Offsets(offset - word_len, offset),
        });
    }

    tokens
}

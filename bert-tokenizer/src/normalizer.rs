use unicode_categories::UnicodeCategories;
use unicode_normalization_alignments::UnicodeNormalization;

use crate::pre_tokenizer::string::{Offsets, Token};

/// A normalized sequence aligned to its original.
///
/// The sequence is decomposed (NFD), stripped of non-spacing marks and lowercased. Each normalized
/// character keeps the index of the original character it was derived from.
#[derive(Debug)]
pub(crate) struct NormalizedString {
    normalized: String,
    alignments: Vec<usize>,
    original_len: usize,
}

impl NormalizedString {
    /// Normalizes the sequence for the chinese tokenization.
    pub(crate) fn new(original: &str) -> Self {
        let mut normalized = String::with_capacity(original.len());
        let mut alignments = Vec::with_capacity(original.len());
        // index of the next original character
        let mut next: usize = 0;

        for (c, change) in original.nfd() {
            // a positive change marks a character inserted by the decomposition
            let idx = if change > 0 {
                next.saturating_sub(1)
            } else {
                let idx = next;
                next += 1 + change.unsigned_abs();
                idx
            };
            if c.is_mark_nonspacing() {
                continue;
            }
            for c in c.to_lowercase() {
                normalized.push(c);
                alignments.push(idx);
            }
        }

        Self {
            normalized,
            alignments,
            original_len: original.chars().count(),
        }
    }

    /// Gets the normalized sequence.
    pub(crate) fn normalized(&self) -> &str {
        self.normalized.as_str()
    }

    /// Maps the offsets of the tokens from the normalized onto the original sequence.
    pub(crate) fn align(&self, tokens: Vec<Token>) -> Vec<Token> {
        tokens
            .into_iter()
            .map(|mut token| {
                token.offsets = self.align_offsets(token.offsets);
                token
            })
            .collect()
    }

    fn align_offsets(&self, Offsets(start, end): Offsets) -> Offsets {
        let (first, last) = match (self.alignments.get(start), end.checked_sub(1)) {
            (Some(first), Some(last)) if start < end => (*first, last),
            _ => {
                let idx = self.alignments.get(start).map_or(self.original_len, |idx| *idx);
                return Offsets(idx, idx);
            }
        };

        // a decomposed character belongs to the token which covers its first part
        let start = if start > 0 && self.alignments.get(start - 1) == Some(&first) {
            first + 1
        } else {
            first
        };
        let end = self
            .alignments
            .get(last)
            .map_or(self.original_len, |idx| idx + 1);

        Offsets(start.min(end), end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_accents_and_lowercase() {
        let normalized = NormalizedString::new("Café Élan");
        assert_eq!(normalized.normalized(), "cafe elan");
        assert_eq!(normalized.alignments, [0, 1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_decomposition() {
        // hangul syllables decompose into three jamo each
        let normalized = NormalizedString::new("한국 İx");
        assert_eq!(normalized.normalized().chars().count(), 9);
        assert_eq!(normalized.alignments, [0, 0, 0, 1, 1, 1, 2, 3, 4]);
        assert!(normalized.normalized().ends_with(" ix"));
    }

    #[test]
    fn test_align() {
        let normalized = NormalizedString::new("한국 İx");
        let tokens = normalized.align(vec![
            Token::new("ᄒ", Offsets(0, 1)),
            Token::new("##ᅡᆫ국", Offsets(1, 6)),
            Token::new("ix", Offsets(7, 9)),
        ]);
        assert_eq!(tokens[0].offsets(), Offsets(0, 1));
        assert_eq!(tokens[1].offsets(), Offsets(1, 2));
        assert_eq!(tokens[2].offsets(), Offsets(3, 5));
    }

    #[test]
    fn test_empty() {
        let normalized = NormalizedString::new("");
        assert!(normalized.normalized().is_empty());
        assert_eq!(normalized.align_offsets(Offsets(0, 0)), Offsets(0, 0));
    }
}

use std::ops::Range;

use crate::pre_tokenizer::string::{Offsets, Token};

/// Groups word pieces into ranges of token indices which form complete words.
///
/// A token starting with the continuing subword prefix extends the previous group, every other
/// token starts a new group.
pub fn group_pieces(tokens: &[Token], prefix: &str) -> Vec<Range<usize>> {
    let mut groups: Vec<Range<usize>> = Vec::new();
    for (idx, token) in tokens.iter().enumerate() {
        match groups.last_mut() {
            Some(group) if token.value().starts_with(prefix) => group.end = idx + 1,
            _ => groups.push(idx..idx + 1),
        }
    }

    groups
}

/// Merges the grouped word pieces into whole words sliced from the original sequence.
pub fn merge_pieces(sequence: &str, tokens: &[Token], groups: &[Range<usize>]) -> Vec<Token> {
    groups
        .iter()
        .filter_map(|group| {
            let start = tokens.get(group.start)?.offsets.0;
            let end = tokens.get(group.end.checked_sub(1)?)?.offsets.1;
            let word = sequence
                .chars()
                .skip(start)
                .take(end.saturating_sub(start))
                .collect::<String>();
            Some(Token::new(word, Offsets(start, end)))
        })
        .collect()
}

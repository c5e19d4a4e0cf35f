#![cfg_attr(doc, forbid(broken_intra_doc_links, private_intra_doc_links))]
//! A Bert tokenizer which converts sequences into fixed size encodings.
//!
//! The tokenizer is based on a word piece vocabulary and consists of a Bert pre-tokenizer, a Bert
//! word piece model and a Bert post-tokenizer including truncation and padding to the token size.
//! The encodings can be of any numerical data type which implements
//! [`Num`]` + `[`FromPrimitive`]` + `[`Copy`].
//!
//! The pre-tokenizer is configurable by:
//! - Splitting chinese characters, which also strips accents and lowercases the sequence.
//!
//! The word piece model is configurable by:
//! - The continuing subword prefix.
//! - The maximum number of characters per word.
//!
//! The post-tokenizer is configurable by:
//! - The token size, which includes the class and separation tokens.
//!
//! The offsets of all tokens are character indices into the original sequence.
//!
//! ```no_run
//! use bert_tokenizer::Builder;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let tokenizer = Builder::<i64>::from_file("vocab.txt")?
//!         .with_chinese(false)
//!         .with_model("##", 200)?
//!         .with_token_size(48)?
//!         .build();
//!
//!     let encoding = tokenizer.encode("This is a sequence.");
//!     let encodings = tokenizer.encode_batch(&["This is a sequence.", "And another one!"]);
//!
//!     Ok(())
//! }
//! ```
//!
//! [`Num`]: num_traits::Num
//! [`FromPrimitive`]: num_traits::FromPrimitive

mod builder;
mod model;
mod normalizer;
mod post_tokenizer;
mod pre_tokenizer;
mod tokenizer;
mod vocab;

pub use crate::{
    builder::{Builder, BuilderError},
    model::pieces::{group_pieces, merge_pieces},
    post_tokenizer::encoding::Encoding,
    pre_tokenizer::string::{Offsets, Token},
    tokenizer::Tokenizer,
    vocab::{is_default_special, Vocab, VocabError, CLS, MASK, SEP, UNK},
};

/// A stack allocated string with a maximum length of eight bytes.
type SmallString = smallstr::SmallString<[u8; 8]>;

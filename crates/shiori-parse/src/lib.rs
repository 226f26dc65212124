//! Anime release filename parser.
//!
//! A filename is split into tokens, tagged against a keyword catalogue and
//! then walked by a fixed sequence of recognition passes (season, episode,
//! titles, release group) that rewrite the token stream in place. The final
//! stream is collected into a flat [`Metadata`] record.

pub mod keyword;
pub mod metadata;
pub mod parser;
pub mod token;
pub mod tokenizer;
pub mod tokens;

pub use metadata::Metadata;
pub use parser::{parse, parse_debug};
pub use tokens::TokenDump;

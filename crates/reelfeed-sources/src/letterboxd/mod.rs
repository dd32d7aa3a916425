pub mod client;
pub mod parser;

pub use client::LetterboxdFeed;
pub use parser::parse_feed;

//! Quality extraction from free-text stream titles.
//!
//! Upstream services describe streams with human-oriented text: a `name`
//! whose second line usually carries the resolution tag, and a `title` with
//! emoji-prefixed seeder and size annotations. This module turns that text
//! into a [`ParsedQuality`] without ever failing; anything unrecognized
//! falls back to rank 0, zero seeders and unknown size.

mod extractor;
mod tier;

pub use extractor::{extract_quality, parse_seeders, parse_size_bytes, ParsedQuality};
pub use tier::{QualityTier, RANK_1080P, RANK_720P};

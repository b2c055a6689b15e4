//! Language preference matching.
//!
//! Titles carry language markers in many shapes: ISO codes as release-name
//! tokens (`.ENG.`), full names (`Spanish`, `Castellano`), dub/sub tags
//! (`VOSTFR`, `Dublado`) and flag emoji. [`table`] maps each supported code
//! to its fixed matcher list; [`LanguageMatcher`] scores and reorders
//! candidates by the caller's priority list.

mod matcher;
mod table;

pub use matcher::{LanguageMatcher, LANGUAGE_SCORE_STEP, MAX_LANGUAGE_PRIORITIES};
pub use table::{is_supported_language, supported_languages};

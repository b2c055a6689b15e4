//! Seeder, size and quality-label extraction.

use once_cell::sync::Lazy;
use regex_lite::Regex;
use serde::{Deserialize, Serialize};

use super::QualityTier;
use crate::source::RawStream;

/// Quality information recovered from a raw stream descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedQuality {
    /// Canonical tier.
    pub tier: QualityTier,
    /// The label the tier was derived from, as found in the descriptor.
    /// Empty when no label was present.
    pub label: String,
    /// Integer rank of `tier`.
    pub rank: u32,
    /// Seeder count, 0 when absent.
    pub seeders: u32,
    /// Size in bytes, 0 when unknown.
    pub size_bytes: u64,
}

static SEEDERS_EMOJI: Lazy<Regex> = Lazy::new(|| Regex::new(r"👤\s*(\d+)").unwrap());
static SEEDERS_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bseed(?:er)?s?\s*[:=]?\s*(\d+)").unwrap());
/// A size number: `1,234.5` (thousands commas) or `2.5` / `2,5`.
const SIZE_NUMBER: &str = r"(\d{1,3}(?:,\d{3})+(?:\.\d+)?|\d+(?:[.,]\d+)?)";

static SIZE_EMOJI: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)💾\s*{SIZE_NUMBER}\s*([KMGT]i?B|B)\b")).unwrap()
});
static SIZE_ANY: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"(?i)\b{SIZE_NUMBER}\s*([KMGT]i?B)\b")).unwrap());
static THOUSANDS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{1,3}(?:,\d{3})+(?:\.\d+)?$").unwrap());

/// Extract tier, seeders and size from a raw stream descriptor.
///
/// The quality label comes from the explicit `quality` tag when present,
/// otherwise from the first token of the second line of `name`. Seeders
/// and size are searched in the title text first, then in `name`.
pub fn extract_quality(stream: &RawStream) -> ParsedQuality {
    let label = explicit_tag(stream)
        .or_else(|| secondary_line_token(stream))
        .unwrap_or_default();
    let tier = QualityTier::from_label(&label);

    let text = stream.display_text();
    let name = stream.name.as_deref().unwrap_or_default();

    let seeders = parse_seeders(text)
        .or_else(|| parse_seeders(name))
        .unwrap_or(0);
    let size_bytes = parse_size_bytes(text)
        .or_else(|| parse_size_bytes(name))
        .unwrap_or(0);

    ParsedQuality {
        tier,
        label,
        rank: tier.rank(),
        seeders,
        size_bytes,
    }
}

fn explicit_tag(stream: &RawStream) -> Option<String> {
    stream
        .quality
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

fn secondary_line_token(stream: &RawStream) -> Option<String> {
    stream
        .name
        .as_deref()?
        .lines()
        .nth(1)?
        .split_whitespace()
        .next()
        .map(str::to_string)
}

/// Parse a seeder count such as `👤 42` or `Seeders: 42`.
pub fn parse_seeders(text: &str) -> Option<u32> {
    [&*SEEDERS_EMOJI, &*SEEDERS_WORD]
        .iter()
        .find_map(|re| re.captures(text))
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
}

/// Parse a human-readable size such as `💾 2.4 GB` into bytes (1024-based).
pub fn parse_size_bytes(text: &str) -> Option<u64> {
    let caps = SIZE_EMOJI
        .captures(text)
        .or_else(|| SIZE_ANY.captures(text))?;

    let value = parse_number(caps.get(1)?.as_str())?;
    let multiplier = unit_multiplier(caps.get(2)?.as_str())?;
    let bytes = value * multiplier;

    if bytes.is_finite() && bytes >= 0.0 {
        Some(bytes.round() as u64)
    } else {
        None
    }
}

/// `1,234` and `1,234.5` use `,` as a thousands separator; `2,5` is a
/// decimal comma.
fn parse_number(raw: &str) -> Option<f64> {
    let normalized = if THOUSANDS.is_match(raw) {
        raw.replace(',', "")
    } else {
        raw.replace(',', ".")
    };
    normalized.parse().ok()
}

fn unit_multiplier(unit: &str) -> Option<f64> {
    const KIB: f64 = 1024.0;
    match unit.to_ascii_uppercase().replace("IB", "B").as_str() {
        "B" => Some(1.0),
        "KB" => Some(KIB),
        "MB" => Some(KIB * KIB),
        "GB" => Some(KIB * KIB * KIB),
        "TB" => Some(KIB * KIB * KIB * KIB),
        _ => None,
    }
}

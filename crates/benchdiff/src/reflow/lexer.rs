// Copyright 2025 benchdiff Contributors
// SPDX-License-Identifier: Apache-2.0

//! Lexical classification of table tokens.

use crate::error::{BenchError, Result};
use once_cell::sync::Lazy;
use regex::Regex;

/// Superscript numerals used as footnote markers.
pub const SUPERSCRIPTS: &[char] = &['⁰', '¹', '²', '³', '⁴', '⁵', '⁶', '⁷', '⁸', '⁹'];

// Only alphabetic tails count as unit suffixes; `10/100` or `1.2.3` are not numbers.
static NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([+-]?\d*\.?\d+)([A-Za-zµμ]*)$").expect("valid number regex"));

/// Unit prefix of a numeric token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitSuffix {
    /// Nanoseconds.
    Nano,
    /// Microseconds.
    Micro,
    /// Milliseconds.
    Milli,
    /// Seconds.
    Second,
    /// No suffix, the magnitude is taken at face value.
    None,
}

impl UnitSuffix {
    /// Parse a suffix, `None` if it is not a known unit.
    pub fn parse(suffix: &str) -> Option<Self> {
        match suffix {
            "" => Some(Self::None),
            "n" | "ns" => Some(Self::Nano),
            // U+00B5 MICRO SIGN and U+03BC GREEK SMALL LETTER MU
            "u" | "us" | "µ" | "μ" | "µs" | "μs" => Some(Self::Micro),
            "m" | "ms" => Some(Self::Milli),
            "s" => Some(Self::Second),
            _ => None,
        }
    }

    /// Multiplier converting the magnitude to seconds.
    pub fn scale(self) -> f64 {
        match self {
            Self::Nano => 1e-9,
            Self::Micro => 1e-6,
            Self::Milli => 1e-3,
            Self::Second | Self::None => 1.0,
        }
    }
}

/// Classification of a single whitespace-separated token.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token {
    /// `±`, `∞`, `~` or a column divider.
    Separator,
    /// Anything containing `%` or `=`.
    PercentOrEquals,
    /// `p=...` or `n=...` statistics.
    PValueOrSampleCount,
    /// A magnitude with its unit suffix.
    Numeric {
        /// Value as written.
        magnitude: f64,
        /// Unit suffix.
        suffix: UnitSuffix,
    },
    /// Not a number (names, `N/A`, bare footnote markers).
    Unparseable,
}

impl Token {
    /// Value in seconds for numeric tokens.
    pub fn seconds(&self) -> Option<f64> {
        match self {
            Token::Numeric { magnitude, suffix } => Some(magnitude * suffix.scale()),
            _ => None,
        }
    }
}

fn is_separator(token: &str) -> bool {
    matches!(token, "±" | "∞" | "~" | "│" | "|" | "┃")
}

/// Classify a token.
///
/// A token that starts like a number but carries an unknown unit suffix is
/// an error: it means the table format changed upstream.
pub fn classify(token: &str) -> Result<Token> {
    if is_separator(token) {
        return Ok(Token::Separator);
    }
    if token.starts_with("p=") || token.starts_with("n=") {
        return Ok(Token::PValueOrSampleCount);
    }
    if token.contains('%') || token.contains('=') {
        return Ok(Token::PercentOrEquals);
    }

    let cleaned: String = token.chars().filter(|c| !SUPERSCRIPTS.contains(c)).collect();
    let candidate = match cleaned.find(&['±', '('][..]) {
        Some(idx) => &cleaned[..idx],
        None => cleaned.as_str(),
    };

    let Some(caps) = NUMBER.captures(candidate) else {
        return Ok(Token::Unparseable);
    };
    let Ok(magnitude) = caps[1].parse::<f64>() else {
        return Ok(Token::Unparseable);
    };
    let suffix = &caps[2];
    match UnitSuffix::parse(suffix) {
        Some(suffix) => Ok(Token::Numeric { magnitude, suffix }),
        None => Err(BenchError::UnexpectedUnit {
            token: token.to_string(),
            suffix: suffix.to_string(),
        }),
    }
}

/// Collect up to `limit` magnitudes, in seconds, from the tokens after the
/// leading name token.
pub fn extract_magnitudes(line: &str, limit: usize) -> Result<Vec<f64>> {
    let mut values = Vec::with_capacity(limit);
    for token in line.split_whitespace().skip(1) {
        if values.len() == limit {
            break;
        }
        if let Some(seconds) = classify(token)?.seconds() {
            values.push(seconds);
        }
    }
    Ok(values)
}

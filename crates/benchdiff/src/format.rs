// Copyright 2025 benchdiff Contributors
// SPDX-License-Identifier: Apache-2.0

//! Value formatting and display-width helpers for monospaced tables.

use unicode_width::UnicodeWidthStr;

/// Render a nanosecond magnitude with a unit glyph.
///
/// The output is re-parsed by the reflow engine, so the glyph set
/// (`n`, `µ`, `m`, `s`) and the two decimals are part of the table format.
pub fn format_ns(ns: f64) -> String {
    if ns < 1e3 {
        format!("{:.2}n", ns)
    } else if ns < 1e6 {
        format!("{:.2}µ", ns / 1e3)
    } else if ns < 1e9 {
        format!("{:.2}m", ns / 1e6)
    } else {
        format!("{:.2}s", ns / 1e9)
    }
}

/// Display width of `s` in terminal columns.
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Right-pad `s` with spaces to `width` display columns.
pub fn pad_to(s: &str, width: usize) -> String {
    let mut out = String::with_capacity(s.len() + width);
    out.push_str(s);
    let current = display_width(s);
    if current < width {
        out.extend(std::iter::repeat(' ').take(width - current));
    }
    out
}

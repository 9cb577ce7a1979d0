//! Address token extraction and canonicalization.
//!
//! A hover lands on a word in a line of assembly. The parser takes a small
//! window around that word (two characters either side), trims trailing
//! comment punctuation, strips an indexed-addressing suffix (`,x` / `,y`),
//! matches a `$` or `!` hex literal that is not an immediate operand, and
//! maps the digits onto a 24-bit canonical address:
//!
//! | digits | value            | result                          |
//! |--------|------------------|---------------------------------|
//! | 2      | any              | padded to 4, then as below      |
//! | 4      | `<= 0x1FFF`      | RAM, bank `7E`                  |
//! | 4      | `> 0x1FFF`       | register, or ROM bank `00` when indexed |
//! | 6      | first digit `0`  | ROM                             |
//! | 6      | otherwise        | RAM                             |

use once_cell::sync::Lazy;
use regex::Regex;

use crate::descriptor::Space;
use crate::error::{CoreError, Result};

/// Bank that short addresses in low RAM mirror.
pub const RAM_BANK: u32 = 0x7E_0000;

/// Highest 16-bit address that mirrors low RAM.
pub const LOW_RAM_LIMIT: u32 = 0x1FFF;

/// Characters on each side of the word that the window keeps.
const WINDOW_CONTEXT: usize = 2;

static TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|[^#])([$!])([0-9A-Fa-f]+)").expect("valid address token regex")
});

/// A canonical address tagged with the space it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalAddress {
    Register(u32),
    Rom(u32),
    Ram(u32),
}

impl CanonicalAddress {
    pub fn value(self) -> u32 {
        match self {
            CanonicalAddress::Register(v) | CanonicalAddress::Rom(v) | CanonicalAddress::Ram(v) => v,
        }
    }

    pub fn space(self) -> Space {
        match self {
            CanonicalAddress::Register(_) => Space::Register,
            CanonicalAddress::Rom(_) => Space::Rom,
            CanonicalAddress::Ram(_) => Space::Ram,
        }
    }

    /// `$`-prefixed hex literal, padded for the space.
    pub fn to_literal(self) -> String {
        format!("${:0width$X}", self.value(), width = self.space().pad_width())
    }
}

/// The text around a hovered word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenWindow {
    /// Window text, trailing whitespace and comment punctuation removed.
    pub text: String,
    /// Byte offset in `text` just past the hovered word.
    pub word_end: usize,
}

/// A recognized address token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedToken {
    pub address: CanonicalAddress,
    /// Token as written, including any indexing suffix. Used as the
    /// render cache key.
    pub raw: String,
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '!')
}

/// Cut the window around the word under `cursor` (a character offset).
///
/// Returns `None` when the cursor is not on or directly after a word.
pub fn word_window(line: &str, cursor: usize) -> Option<TokenWindow> {
    let chars: Vec<char> = line.chars().collect();
    let cursor = cursor.min(chars.len());
    let anchor = if chars.get(cursor).copied().is_some_and(is_word_char) {
        cursor
    } else if cursor > 0 && is_word_char(chars[cursor - 1]) {
        cursor - 1
    } else {
        return None;
    };

    let mut start = anchor;
    while start > 0 && is_word_char(chars[start - 1]) {
        start -= 1;
    }
    let mut end = anchor + 1;
    while end < chars.len() && is_word_char(chars[end]) {
        end += 1;
    }

    let win_start = start.saturating_sub(WINDOW_CONTEXT);
    let win_end = (end + WINDOW_CONTEXT).min(chars.len());
    let head: String = chars[win_start..end].iter().collect();
    let tail: String = chars[end..win_end].iter().collect();
    let word_end = head.len();

    let mut text = head;
    text.push_str(&tail);
    let trimmed_len = text
        .trim_end_matches(|c: char| c.is_whitespace() || c == ';')
        .len()
        .max(word_end);
    text.truncate(trimmed_len);

    Some(TokenWindow { text, word_end })
}

/// Split an indexed-addressing suffix that directly follows the word.
fn split_index_suffix(window: &TokenWindow) -> (&str, &str) {
    let text = window.text.as_str();
    let (body, tail) = text.split_at(window.word_end);
    if tail.len() == 2 && matches!(tail.to_ascii_lowercase().as_str(), ",x" | ",y") {
        (body, tail)
    } else {
        (body, "")
    }
}

/// Recognize the address token in a window.
///
/// `Ok(None)` means no address literal ends at the hovered word.
pub fn parse_window(window: &TokenWindow) -> Result<Option<ParsedToken>> {
    let (body, suffix) = split_index_suffix(window);
    let may_be_rom = !suffix.is_empty();

    let Some(caps) = TOKEN
        .captures_iter(body)
        .find(|caps| caps.get(2).is_some_and(|m| m.end() == body.len()))
    else {
        return Ok(None);
    };

    let prefix = &caps[1];
    let digits = &caps[2];
    let raw = format!("{prefix}{digits}{suffix}");
    let address = canonicalize(digits, may_be_rom).map_err(|e| match e {
        CoreError::MalformedAddress { digits, .. } => CoreError::MalformedAddress {
            token: raw.clone(),
            digits,
        },
        CoreError::InvalidTokenLength { digits, .. } => CoreError::InvalidTokenLength {
            token: raw.clone(),
            digits,
        },
        other => other,
    })?;
    Ok(Some(ParsedToken { address, raw }))
}

/// Window the line at `cursor` and parse the address token there.
pub fn parse_token(line: &str, cursor: usize) -> Result<Option<ParsedToken>> {
    match word_window(line, cursor) {
        Some(window) => parse_window(&window),
        None => Ok(None),
    }
}

/// Map hex digits onto a canonical address.
///
/// `may_be_rom` is set when the operand was indexed; it turns a 4-digit
/// value above low RAM into a bank `00` ROM address instead of a register.
pub fn canonicalize(digits: &str, may_be_rom: bool) -> Result<CanonicalAddress> {
    let count = digits.len();
    if count % 2 != 0 {
        return Err(CoreError::MalformedAddress {
            token: digits.to_string(),
            digits: count,
        });
    }
    if !matches!(count, 2 | 4 | 6) {
        return Err(CoreError::InvalidTokenLength {
            token: digits.to_string(),
            digits: count,
        });
    }
    let value = u32::from_str_radix(digits, 16).map_err(|_| CoreError::MalformedAddress {
        token: digits.to_string(),
        digits: count,
    })?;

    let address = match count {
        2 | 4 if value <= LOW_RAM_LIMIT => CanonicalAddress::Ram(RAM_BANK | value),
        2 | 4 if !may_be_rom => CanonicalAddress::Register(value),
        _ => classify_long(value),
    };
    Ok(address)
}

/// Six-digit classification: bank nibble `0` is ROM, anything else RAM.
fn classify_long(value: u32) -> CanonicalAddress {
    if value >> 20 == 0 {
        CanonicalAddress::Rom(value)
    } else {
        CanonicalAddress::Ram(value)
    }
}

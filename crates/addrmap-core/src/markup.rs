//! Forum markup and HTML to display text.
//!
//! Map annotations are written in a forum bracket dialect, sometimes mixed
//! with raw HTML. [`Normalizer::normalize`] rewrites them into plain
//! Markdown-style text in a fixed order:
//!
//! 1. links (`[url=..]..[/url]`, `<a href="..">..</a>`) become `[label](target)`
//! 2. code (`[code]..[/code]`, `<code>..</code>`) becomes an inline span or a fenced block
//! 3. user mentions (`[user=ID]`) become profile links
//! 4. `[size=N]..[/size]` keeps only its text
//! 5. remaining HTML tags are stripped and entities decoded
//! 6. line breaks become paragraph breaks
//!
//! Code bodies are set aside after step 2 and restored last, so the later
//! passes never touch them. The private-use characters that mark them are
//! removed from the input first.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Default profile link template for user mentions.
pub const DEFAULT_PROFILE_URL: &str = "https://www.smwcentral.net/?p=profile&id={id}";

static LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)\[url=(.*?)\](.*?)\[/url\]|<a\s+href="(.*?)"[^>]*>(.*?)</a>"#)
        .expect("valid link regex")
});

static CODE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)\[code(?:=[^\]]*)?\](.*?)\[/code\]|<code>(.*?)</code>")
        .expect("valid code regex")
});

static USER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\[user=([^\]\s]+)(?:\s+simple)?\]").expect("valid user regex")
});

static SIZE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)\[size=[^\]]*\](.*?)\[/size\]").expect("valid size regex")
});

static HTML_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<!--.*?-->|</?[a-zA-Z][^>]*>").expect("valid html tag regex")
});

static ENTITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(?:#([0-9]{1,7})|#[xX]([0-9a-fA-F]{1,6})|(lt|gt|quot|apos|nbsp|amp));")
        .expect("valid entity regex")
});

static LINE_BREAKS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[ \t]*(?:\r?\n[ \t]*)+").expect("valid line break regex")
});

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new("\u{E000}([0-9]+)\u{E001}").expect("valid placeholder regex")
});

const MARK_OPEN: char = '\u{E000}';
const MARK_CLOSE: char = '\u{E001}';

/// Rewrites annotation markup into display text.
#[derive(Debug, Clone)]
pub struct Normalizer {
    profile_url: String,
}

impl Default for Normalizer {
    fn default() -> Self {
        Normalizer::new(DEFAULT_PROFILE_URL)
    }
}

impl Normalizer {
    /// Create a normalizer whose user mentions link to `profile_url`.
    ///
    /// The template's `{id}` placeholder receives the user id.
    pub fn new(profile_url: impl Into<String>) -> Self {
        Normalizer {
            profile_url: profile_url.into(),
        }
    }

    /// Normalize one annotation.
    pub fn normalize(&self, raw: &str) -> String {
        let raw = raw.replace([MARK_OPEN, MARK_CLOSE], "");
        let text = LINK.replace_all(&raw, |caps: &Captures| {
            let target = first_group(caps, &[1, 3]);
            let label = first_group(caps, &[2, 4]);
            format!("[{}]({})", unwrap_brackets(label.trim()), unquote(target.trim()))
        });

        let mut blocks: Vec<String> = Vec::new();
        let text = CODE.replace_all(&text, |caps: &Captures| {
            let body = match caps.get(1) {
                Some(m) => m.as_str().to_string(),
                None => decode_entities(first_group(caps, &[2])),
            };
            let (rendered, fenced) = render_code(&body);
            blocks.push(rendered);
            let marker = format!("{MARK_OPEN}{}{MARK_CLOSE}", blocks.len() - 1);
            if fenced {
                format!("\n{marker}\n")
            } else {
                marker
            }
        });

        let text = USER.replace_all(&text, |caps: &Captures| {
            let id = first_group(caps, &[1]);
            format!("[user {id}]({})", self.profile_url.replace("{id}", id))
        });

        let text = SIZE.replace_all(&text, "$1");
        let text = strip_html(&text);
        let text = LINE_BREAKS.replace_all(text.trim(), "\n\n");

        PLACEHOLDER
            .replace_all(&text, |caps: &Captures| {
                caps[1]
                    .parse::<usize>()
                    .ok()
                    .and_then(|i| blocks.get(i))
                    .cloned()
                    .unwrap_or_default()
            })
            .into_owned()
    }
}

/// Normalize with the default profile link template.
pub fn normalize(raw: &str) -> String {
    Normalizer::default().normalize(raw)
}

/// Text of the first participating group, or `""` when none matched.
fn first_group<'t>(caps: &Captures<'t>, groups: &[usize]) -> &'t str {
    groups
        .iter()
        .find_map(|&i| caps.get(i))
        .map(|m| m.as_str())
        .unwrap_or("")
}

/// `[label]` → `label`, so the result is not a nested link label.
fn unwrap_brackets(label: &str) -> &str {
    match label.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
        Some(inner) if !inner.contains(['[', ']']) => inner,
        _ => label,
    }
}

fn unquote(target: &str) -> &str {
    target
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(target)
}

/// Render a code body; the flag is true for a fenced block.
fn render_code(body: &str) -> (String, bool) {
    let body = body.replace("\r\n", "\n");
    let body = body.trim_matches('\n');
    if body.contains('\n') {
        return (format!("```\n{body}\n```"), true);
    }
    let span = if body.contains('`') {
        format!("`` {body} ``")
    } else {
        format!("`{body}`")
    };
    (span, false)
}

/// Drop HTML tags, keeping their text content.
fn strip_html(text: &str) -> String {
    let text = HTML_TAG.replace_all(text, |caps: &Captures| {
        let tag = caps[0].to_ascii_lowercase();
        if tag.starts_with("<br") || tag.starts_with("<p") || tag.starts_with("</p") {
            "\n".to_string()
        } else {
            String::new()
        }
    });
    decode_entities(&text)
}

/// Decode the HTML entities annotation text actually uses.
fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    ENTITY
        .replace_all(text, |caps: &Captures| {
            let decoded = match (caps.get(1), caps.get(2), caps.get(3)) {
                (Some(dec), _, _) => dec.as_str().parse::<u32>().ok().and_then(char::from_u32),
                (_, Some(hex), _) => u32::from_str_radix(hex.as_str(), 16)
                    .ok()
                    .and_then(char::from_u32),
                (_, _, Some(name)) => match name.as_str() {
                    "lt" => Some('<'),
                    "gt" => Some('>'),
                    "quot" => Some('"'),
                    "apos" => Some('\''),
                    "nbsp" => Some(' '),
                    "amp" => Some('&'),
                    _ => None,
                },
                _ => None,
            };
            decoded
                .map(String::from)
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

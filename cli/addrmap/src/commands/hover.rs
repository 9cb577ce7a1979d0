//! `addrmap hover` — annotate the address under a cursor in one line.

use std::io::Write;

use addrmap_core::AnnotationService;
use anyhow::Result;

/// Print the annotation for the token at `cursor` (a character column).
///
/// Without a cursor, the first `$` or `!` in the line is used.
pub fn run(service: &AnnotationService, line: &str, cursor: Option<usize>, out: &mut impl Write) -> Result<()> {
    let cursor = cursor.unwrap_or_else(|| default_cursor(line));
    match service.resolve_hover(line, cursor) {
        Some(text) => writeln!(out, "{text}")?,
        None => writeln!(out, "No address at column {cursor}")?,
    }
    Ok(())
}

fn default_cursor(line: &str) -> usize {
    line.chars().position(|c| c == '$' || c == '!').unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{build_service, testing};
    use crate::config::AddrmapConfig;

    fn hover(line: &str, cursor: Option<usize>) -> String {
        let service = build_service(&AddrmapConfig::default(), &testing::provider()).unwrap();
        let mut out = Vec::new();
        run(&service, line, cursor, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn hover_on_ram_token() {
        assert_eq!(hover("lda $19", Some(5)), "Player powerup\n");
    }

    #[test]
    fn cursor_defaults_to_first_token() {
        assert_eq!(hover("  sta $2100", None), "INIDISP\n");
    }

    #[test]
    fn no_token_under_cursor() {
        assert_eq!(hover("lda $19", Some(1)), "No address at column 1\n");
    }
}

//! `addrmap serve` — line-delimited JSON session over stdin/stdout.
//!
//! One request object per line, one response object per line:
//!
//! ```text
//! {"op": "hover", "text": "lda $19", "cursor": 5}
//! {"op": "lookup", "address": "$0019", "space": "ram"}
//! {"op": "clear_cache"}
//! {"op": "stats"}
//! ```
//!
//! Responses are `{"ok": true, "result": ...}` or
//! `{"ok": false, "error": "..."}`. A bad request never ends the session.

use std::io::{BufRead, Write};

use addrmap_core::{AnnotationService, Space};
use anyhow::Result;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum Request {
    Hover {
        text: String,
        cursor: usize,
    },
    Lookup {
        address: String,
        #[serde(default = "default_space")]
        space: Space,
    },
    ClearCache,
    Stats,
}

fn default_space() -> Space {
    Space::Ram
}

/// Answer requests from `input` until it is exhausted.
pub fn run(service: &AnnotationService, input: impl BufRead, out: &mut impl Write) -> Result<()> {
    info!("serving requests on stdin");
    let mut handled = 0usize;
    for line in input.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let response = match handle(service, line) {
            Ok(result) => json!({ "ok": true, "result": result }),
            Err(e) => {
                debug!("request failed: {e:#}");
                json!({ "ok": false, "error": format!("{e:#}") })
            }
        };
        writeln!(out, "{response}")?;
        out.flush()?;
        handled += 1;
    }
    info!(requests = handled, "input closed");
    Ok(())
}

fn handle(service: &AnnotationService, line: &str) -> Result<Value> {
    let request: Request = serde_json::from_str(line)?;
    let result = match request {
        Request::Hover { text, cursor } => match service.resolve_hover(&text, cursor) {
            Some(rendered) => Value::String(rendered),
            None => Value::Null,
        },
        Request::Lookup { address, space } => Value::String(service.lookup(&address, space)?),
        Request::ClearCache => {
            service.clear_cache();
            Value::Null
        }
        Request::Stats => serde_json::to_value(service.cache_stats())?,
    };
    Ok(result)
}

//! HTTP map provider.
//!
//! Fetches `GET {base_url}{game}{map}`, e.g.
//! `https://www.smwcentral.net/ajax.php?a=getmap&m=smwram`. Anything other
//! than `200 OK` is reported as [`ProviderError::Unavailable`].

use std::time::Duration;

use addrmap_core::MapKind;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde_json::Value;
use tracing::debug;

use crate::error::{ProviderError, Result};
use crate::provider::MapProvider;
use crate::record::Listing;

/// Default map service endpoint.
pub const DEFAULT_BASE_URL: &str = "https://www.smwcentral.net/ajax.php?a=getmap&m=";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Map provider backed by the remote map service.
#[derive(Debug, Clone)]
pub struct HttpProvider {
    client: Client,
    base_url: String,
    game: String,
}

impl HttpProvider {
    /// Create a provider for `game` at `base_url`.
    pub fn new(base_url: impl Into<String>, game: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("addrmap/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(HttpProvider {
            client,
            base_url: base_url.into(),
            game: game.into(),
        })
    }

    /// URL of one map listing.
    pub fn map_url(&self, kind: MapKind) -> String {
        map_url(&self.base_url, &self.game, kind)
    }
}

/// `{base_url}{game}{map name}`.
pub fn map_url(base_url: &str, game: &str, kind: MapKind) -> String {
    format!("{base_url}{game}{}", kind.name())
}

impl MapProvider for HttpProvider {
    fn fetch_map(&self, kind: MapKind) -> Result<Listing> {
        let url = self.map_url(kind);
        debug!(%url, "requesting map");
        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| ProviderError::Unavailable {
                map: kind.name().to_string(),
                detail: e.to_string(),
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(ProviderError::Unavailable {
                map: kind.name().to_string(),
                detail: format!("HTTP {status} from {url}"),
            });
        }

        let values = response
            .json::<Vec<Value>>()
            .map_err(|e| ProviderError::Decode {
                map: kind.name().to_string(),
                detail: e.to_string(),
            })?;
        Ok(Listing::from_values(values))
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Serve one canned HTTP response on a loopback port, returning the
    /// base URL to fetch from.
    fn serve_once(status_line: &'static str, body: &'static str) -> (String, thread::JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}/getmap?m=", listener.local_addr().unwrap());
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = [0u8; 4096];
            let _ = stream.read(&mut request).unwrap();
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).unwrap();
        });
        (base_url, handle)
    }

    fn provider(base_url: &str) -> HttpProvider {
        HttpProvider::new(base_url, "smw", Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn non_ok_status_is_unavailable() {
        let (base_url, handle) = serve_once("503 Service Unavailable", "");
        let err = provider(&base_url).fetch_map(MapKind::Ram).unwrap_err();
        handle.join().unwrap();
        match err {
            ProviderError::Unavailable { map, detail } => {
                assert_eq!(map, "ram");
                assert!(detail.starts_with("HTTP 503"), "{detail}");
                assert!(detail.ends_with("smwram"), "{detail}");
            }
            other => panic!("expected Unavailable, got {other:?}"),
        }
    }

    #[test]
    fn malformed_body_is_decode_error() {
        let (base_url, handle) = serve_once("200 OK", "{\"error\": \"not a list\"}");
        let err = provider(&base_url).fetch_map(MapKind::Rom).unwrap_err();
        handle.join().unwrap();
        assert!(matches!(err, ProviderError::Decode { ref map, .. } if map == "rom"), "{err:?}");
    }

    #[test]
    fn ok_body_keeps_readable_records() {
        let (base_url, handle) = serve_once(
            "200 OK",
            r#"[{"address": "$2100", "size": 1, "description": "INIDISP"}, {"address": null}]"#,
        );
        let listing = provider(&base_url).fetch_map(MapKind::Registers).unwrap();
        handle.join().unwrap();
        assert_eq!(listing.records.len(), 1);
        assert_eq!(listing.records[0].description.as_deref(), Some("INIDISP"));
        assert_eq!(listing.rejected, 1);
    }

    #[test]
    fn unreachable_host_is_unavailable() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}/getmap?m=", listener.local_addr().unwrap());
        drop(listener);
        let err = provider(&base_url).fetch_map(MapKind::Hijacks).unwrap_err();
        assert!(matches!(err, ProviderError::Unavailable { .. }), "{err:?}");
    }

    #[test]
    fn map_urls() {
        assert_eq!(
            map_url(DEFAULT_BASE_URL, "smw", MapKind::Ram),
            "https://www.smwcentral.net/ajax.php?a=getmap&m=smwram"
        );
        assert_eq!(
            map_url(DEFAULT_BASE_URL, "smw", MapKind::Registers),
            "https://www.smwcentral.net/ajax.php?a=getmap&m=smwregs"
        );
        assert_eq!(
            map_url("http://localhost/map/", "yi", MapKind::Hijacks),
            "http://localhost/map/yihijack"
        );
    }

    #[test]
    fn provider_builds_urls_from_config() {
        let provider =
            HttpProvider::new("http://127.0.0.1:9/getmap?m=", "smw", Duration::from_secs(1)).unwrap();
        assert_eq!(provider.map_url(MapKind::Rom), "http://127.0.0.1:9/getmap?m=smwrom");
    }
}

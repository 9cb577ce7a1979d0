//! Raw descriptor records as served by the map provider.
//!
//! The provider is loose about types: `size` arrives as a number or a
//! numeric string, `context` may be null, and `details` is an object, an
//! array (when its ids happen to be sequential), an empty array, or absent.
//! A record that still does not fit is dropped from its listing with a
//! warning; only a body that is not a JSON array fails the map.

use addrmap_core::Descriptor;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

/// One descriptor object from a map listing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawDescriptor {
    pub address: String,
    #[serde(default = "default_size", deserialize_with = "deserialize_size")]
    pub size: u32,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "deserialize_details")]
    pub details: Option<Vec<(String, String)>>,
}

impl From<RawDescriptor> for Descriptor {
    fn from(raw: RawDescriptor) -> Self {
        Descriptor {
            address: raw.address,
            size: raw.size.max(1),
            context: raw.context,
            kind: raw.kind.unwrap_or_default(),
            description: raw.description.unwrap_or_default(),
            details: raw.details,
        }
    }
}

/// The usable records of one map listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Listing {
    pub records: Vec<RawDescriptor>,
    /// Elements that could not be read as a descriptor.
    pub rejected: usize,
}

impl Listing {
    /// Convert array elements one by one, dropping the ones that do not fit.
    pub fn from_values(values: Vec<Value>) -> Self {
        let mut listing = Listing::default();
        for (index, value) in values.into_iter().enumerate() {
            match serde_json::from_value::<RawDescriptor>(value) {
                Ok(record) => listing.records.push(record),
                Err(e) => {
                    warn!(index, "skipping unreadable descriptor record: {e}");
                    listing.rejected += 1;
                }
            }
        }
        listing
    }
}

impl From<Vec<RawDescriptor>> for Listing {
    fn from(records: Vec<RawDescriptor>) -> Self {
        Listing { records, rejected: 0 }
    }
}

/// Parse a descriptor listing. Fails only when the body is not an array.
pub fn parse_listing(json: &str) -> serde_json::Result<Listing> {
    let values: Vec<Value> = serde_json::from_str(json)?;
    Ok(Listing::from_values(values))
}

fn default_size() -> u32 {
    1
}

/// Sizes that are missing, non-numeric or below one become 1.
fn deserialize_size<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let size = match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Some(Value::String(s)) => leading_integer(&s),
        _ => None,
    };
    Ok(size
        .filter(|&n| n >= 1)
        .map(|n| u32::try_from(n).unwrap_or(u32::MAX))
        .unwrap_or(1))
}

/// Integer prefix of a string, e.g. `"16 bytes"` → 16.
fn leading_integer(s: &str) -> Option<i64> {
    let s = s.trim();
    let digits: String = s
        .char_indices()
        .take_while(|&(i, c)| c.is_ascii_digit() || (i == 0 && (c == '-' || c == '+')))
        .map(|(_, c)| c)
        .collect();
    digits.parse().ok()
}

fn deserialize_details<'de, D>(deserializer: D) -> Result<Option<Vec<(String, String)>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let mut entries: Vec<(String, String)> = match value {
        Some(Value::Object(map)) => map
            .into_iter()
            .map(|(id, label)| (id, label_text(label)))
            .collect(),
        Some(Value::Array(items)) => items
            .into_iter()
            .enumerate()
            .map(|(i, label)| (i.to_string(), label_text(label)))
            .collect(),
        _ => Vec::new(),
    };
    if entries.is_empty() {
        return Ok(None);
    }
    // Numeric ids in ascending numeric order, then the rest by name.
    entries.sort_by(|(a, _), (b, _)| {
        match (a.parse::<u64>(), b.parse::<u64>()) {
            (Ok(x), Ok(y)) => x.cmp(&y),
            (Ok(_), Err(_)) => std::cmp::Ordering::Less,
            (Err(_), Ok(_)) => std::cmp::Ordering::Greater,
            (Err(_), Err(_)) => a.cmp(b),
        }
    });
    Ok(Some(entries))
}

fn label_text(label: Value) -> String {
    match label {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

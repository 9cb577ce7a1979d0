//! Error types for address parsing and map construction.

/// Errors that can occur while parsing addresses or building the map.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// The token carried an odd number of hex digits.
    #[error("malformed address '{token}': {digits} hex digits is not byte aligned")]
    MalformedAddress { token: String, digits: usize },

    /// The token carried an even digit count outside {2, 4, 6}.
    #[error("invalid token length for '{token}': {digits} hex digits")]
    InvalidTokenLength { token: String, digits: usize },

    /// A descriptor address did not parse as hex after its prefix.
    #[error("invalid descriptor address '{address}': {detail}")]
    InvalidDescriptor { address: String, detail: String },

    /// Search input is not a hexadecimal address.
    #[error("invalid address: {input}")]
    InvalidAddress { input: String },
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = CoreError::MalformedAddress {
            token: "$123".into(),
            digits: 3,
        };
        assert_eq!(
            err.to_string(),
            "malformed address '$123': 3 hex digits is not byte aligned"
        );
    }
}

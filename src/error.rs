//! Error types for skylark
//!
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// The main error type for skylark
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Codec Errors
    // ============================================================================
    #[error("Document has no `$type` discriminator (capability: {capability})")]
    MalformedEnvelope {
        /// Which registry the document was decoded against
        capability: &'static str,
    },

    #[error("Variant '{discriminator}' is not registered for capability '{capability}'")]
    UnsupportedVariant {
        /// Which registry was consulted
        capability: &'static str,
        /// The discriminator that was encountered
        discriminator: String,
    },

    #[error("Expected a {expected} record but got '{actual}'")]
    UnexpectedRecordShape {
        /// The record kind the caller required
        expected: &'static str,
        /// The discriminator of the record actually received
        actual: String,
    },

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    // ============================================================================
    // Protocol Errors
    // ============================================================================
    #[error("Server returned {status} {code}: {message}")]
    Protocol {
        /// HTTP status code of the failure response
        status: u16,
        /// Machine-readable error code from the response body
        code: String,
        /// Human-readable message from the response body
        message: String,
    },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Session Errors
    // ============================================================================
    #[error("Failed to decode access token: {message}")]
    TokenDecode {
        /// What went wrong while reading the token payload
        message: String,
    },

    #[error("Session error: {message}")]
    Session {
        /// Description of the session problem
        message: String,
    },
}

impl Error {
    /// Create a malformed envelope error
    pub fn malformed_envelope(capability: &'static str) -> Self {
        Self::MalformedEnvelope { capability }
    }

    /// Create an unsupported variant error
    pub fn unsupported_variant(capability: &'static str, discriminator: impl Into<String>) -> Self {
        Self::UnsupportedVariant {
            capability,
            discriminator: discriminator.into(),
        }
    }

    /// Create an unexpected record shape error
    pub fn unexpected_shape(expected: &'static str, actual: impl Into<String>) -> Self {
        Self::UnexpectedRecordShape {
            expected,
            actual: actual.into(),
        }
    }

    /// Create a protocol error from a structured failure response
    pub fn protocol(status: u16, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Protocol {
            status,
            code: code.into(),
            message: message.into(),
        }
    }

    /// Create a token decode error
    pub fn token_decode(message: impl Into<String>) -> Self {
        Self::TokenDecode {
            message: message.into(),
        }
    }

    /// Create a session error
    pub fn session(message: impl Into<String>) -> Self {
        Self::Session {
            message: message.into(),
        }
    }
}

/// Result type alias for skylark
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::unsupported_variant("embed", "app.bsky.embed.video");
        assert_eq!(
            err.to_string(),
            "Variant 'app.bsky.embed.video' is not registered for capability 'embed'"
        );

        let err = Error::malformed_envelope("record value");
        assert_eq!(
            err.to_string(),
            "Document has no `$type` discriminator (capability: record value)"
        );

        let err = Error::protocol(401, "ExpiredToken", "Token has expired");
        assert_eq!(
            err.to_string(),
            "Server returned 401 ExpiredToken: Token has expired"
        );
    }

    #[test]
    fn test_unexpected_shape_carries_both_kinds() {
        let err = Error::unexpected_shape("follow", "app.bsky.graph.block");
        assert!(err.to_string().contains("follow"));
        assert!(err.to_string().contains("app.bsky.graph.block"));
    }
}

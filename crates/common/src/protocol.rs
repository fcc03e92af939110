//! Request and response bodies of the public HTTP API.
//!
//! Field names are camelCase on the wire. Request fields are optional at the
//! type level so that an absent field reaches the handler and is reported as
//! "missing" rather than as a JSON parse failure.

use serde::{Deserialize, Serialize};
use serde_json::Number;

// ---------------------------------------------------------------------------
// Encrypt endpoint
// ---------------------------------------------------------------------------

/// Request body for `POST /encrypt`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SealRequest {
    /// UTF-8 plaintext to seal.
    pub data: Option<String>,
    /// Key selector; only the lower 8 bits are stored in the envelope header.
    /// Any JSON number is accepted, fractional values included.
    pub key_index: Option<Number>,
}

impl SealRequest {
    /// Whether `keyIndex` is present and numerically zero (`0`, `0.0`, `-0`).
    ///
    /// A fraction such as `0.5` is not zero even though it truncates to 0.
    pub fn key_index_is_zero(&self) -> bool {
        self.key_index.as_ref().and_then(Number::as_f64) == Some(0.0)
    }

    /// `keyIndex` truncated toward zero, or `None` when absent.
    ///
    /// Values that do not fit an `i64` exactly (fractions, huge integers) are
    /// reduced modulo 256 after truncation, which keeps the low byte intact.
    pub fn key_index_truncated(&self) -> Option<i64> {
        let n = self.key_index.as_ref()?;
        n.as_i64()
            .or_else(|| n.as_u64().map(|u| (u & 0xFF) as i64))
            .or_else(|| n.as_f64().map(|f| (f.trunc() % 256.0) as i64))
    }
}

/// Successful response body for `POST /encrypt`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SealResponse {
    /// Hex envelope: header ∥ ciphertext ∥ tag.
    pub final_data: String,
    /// Hex encoding of the freshly generated 24-byte key.
    pub key: String,
}

// ---------------------------------------------------------------------------
// Decrypt endpoint
// ---------------------------------------------------------------------------

/// Request body for `POST /decrypt`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnsealRequest {
    /// Hex envelope previously returned by `POST /encrypt`.
    pub final_data: Option<String>,
    /// Hex encoding of the 24-byte key returned alongside the envelope.
    pub key: Option<String>,
}

/// Successful response body for `POST /decrypt`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnsealResponse {
    pub decrypted_data: String,
}

// ---------------------------------------------------------------------------
// Error response
// ---------------------------------------------------------------------------

/// Error body returned on any non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable description safe to expose to callers.
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

impl From<&crate::ServiceError> for ErrorResponse {
    fn from(err: &crate::ServiceError) -> Self {
        Self::new(err.client_message())
    }
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

/// Response body for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"` while the process is serving.
    pub status: String,
    /// Crate version of the running service.
    pub version: String,
}

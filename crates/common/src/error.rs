//! Client-facing error kinds shared across crates.

use thiserror::Error;

/// Top-level service error type.
///
/// Every variant is terminal: the operations are pure computation, so a retry
/// with the same input produces the same outcome. Variants map to HTTP status
/// codes returned to callers:
/// - [`ServiceError::InputMissing`] → 400
/// - [`ServiceError::BadRequest`] → 400
/// - [`ServiceError::InvalidKeySize`] → 400
/// - [`ServiceError::TagMismatch`] → 400
/// - [`ServiceError::EncryptionFailure`] → 500
/// - [`ServiceError::DecryptionFailure`] → 500
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// A required request field is absent (or falsy under the legacy check).
    #[error("missing field: {0}")]
    InputMissing(&'static str),

    /// The request body could not be parsed into the expected shape.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The supplied key does not decode to exactly 24 bytes.
    #[error("invalid key size")]
    InvalidKeySize,

    /// The recomputed integrity tag differs from the one carried in the envelope.
    #[error("tag mismatch")]
    TagMismatch,

    /// The cipher layer failed while sealing.
    #[error("encryption failure: {0}")]
    EncryptionFailure(String),

    /// The envelope was malformed or the cipher layer failed while unsealing.
    #[error("decryption failure: {0}")]
    DecryptionFailure(String),
}

impl ServiceError {
    /// Returns the HTTP status code that should be sent for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            ServiceError::InputMissing(_)
            | ServiceError::BadRequest(_)
            | ServiceError::InvalidKeySize
            | ServiceError::TagMismatch => 400,
            ServiceError::EncryptionFailure(_) | ServiceError::DecryptionFailure(_) => 500,
        }
    }

    /// Short message safe to return to callers.
    ///
    /// Internal causes carried by the failure variants are deliberately left
    /// out; they are logged by the transport instead.
    pub fn client_message(&self) -> String {
        match self {
            ServiceError::InputMissing(fields) => format!("Missing {fields}"),
            ServiceError::BadRequest(msg) => msg.clone(),
            ServiceError::InvalidKeySize => {
                "Invalid key size for 3DES encryption. Must be 24 bytes.".into()
            }
            ServiceError::TagMismatch => "MAC verification failed".into(),
            ServiceError::EncryptionFailure(_) => "Encryption failed".into(),
            ServiceError::DecryptionFailure(_) => "Decryption failed".into(),
        }
    }
}

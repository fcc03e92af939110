//! Axum request handlers for all service endpoints.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use common::{
    protocol::{
        ErrorResponse, HealthResponse, SealRequest, SealResponse, UnsealRequest, UnsealResponse,
    },
    ServiceError,
};
use tracing::{debug, warn};

use super::state::AppState;
use crate::crypto::TripleDes;
use crate::envelope::{self, format::selector_byte, EnvelopeError};

const SEAL_FIELDS: &str = "data or keyIndex";
const UNSEAL_FIELDS: &str = "finalData or key";

/// `POST /encrypt` — seal `data` under a fresh key.
///
/// Responds with the hex envelope and the hex key needed to open it.
pub async fn encrypt(
    State(state): State<AppState>,
    body: Result<Json<SealRequest>, JsonRejection>,
) -> Response {
    let req = match body {
        Ok(Json(req)) => req,
        Err(rejection) => return rejected_body(&rejection),
    };

    let (data, selector) = match seal_input(&req, state.reject_zero_key_index) {
        Ok(input) => input,
        Err(e) => return error_response(&e),
    };

    match envelope::seal::<TripleDes>(
        data,
        selector,
        state.key_source.as_ref(),
        state.wire_format,
    ) {
        Ok(sealed) => {
            let body = SealResponse {
                final_data: sealed.envelope,
                key: sealed.key.to_hex(),
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => error_response(&ServiceError::EncryptionFailure(e.to_string())),
    }
}

/// `POST /decrypt` — open an envelope with the caller's key.
pub async fn decrypt(
    State(state): State<AppState>,
    body: Result<Json<UnsealRequest>, JsonRejection>,
) -> Response {
    let req = match body {
        Ok(Json(req)) => req,
        Err(rejection) => return rejected_body(&rejection),
    };

    let (final_data, key) = match (non_empty(&req.final_data), non_empty(&req.key)) {
        (Some(f), Some(k)) => (f, k),
        _ => return error_response(&ServiceError::InputMissing(UNSEAL_FIELDS)),
    };

    match envelope::unseal::<TripleDes>(final_data, key, state.wire_format, &state.unseal_policy) {
        Ok(decrypted_data) => {
            (StatusCode::OK, Json(UnsealResponse { decrypted_data })).into_response()
        }
        Err(e) => error_response(&unseal_error(e)),
    }
}

/// `GET /health` — liveness check.
pub async fn health() -> Response {
    let body = HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
    };
    (StatusCode::OK, Json(body)).into_response()
}

/// Catch-all 404 handler.
pub async fn not_found() -> impl IntoResponse {
    let err = ErrorResponse::new("the requested resource does not exist");
    (StatusCode::NOT_FOUND, Json(err))
}

// ---------------------------------------------------------------------------
// Request validation and error mapping
// ---------------------------------------------------------------------------

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

/// Extract the plaintext and selector byte, rejecting absent fields before any
/// key is generated.
///
/// With `reject_zero_key_index` a numeric zero counts as absent. Fractional
/// selectors are truncated toward zero.
fn seal_input(req: &SealRequest, reject_zero_key_index: bool) -> Result<(&str, u8), ServiceError> {
    let data = non_empty(&req.data).ok_or(ServiceError::InputMissing(SEAL_FIELDS))?;
    if reject_zero_key_index && req.key_index_is_zero() {
        return Err(ServiceError::InputMissing(SEAL_FIELDS));
    }
    let key_index = req
        .key_index_truncated()
        .ok_or(ServiceError::InputMissing(SEAL_FIELDS))?;
    Ok((data, selector_byte(key_index)))
}

fn unseal_error(err: EnvelopeError) -> ServiceError {
    match err {
        EnvelopeError::InvalidKeySize => ServiceError::InvalidKeySize,
        EnvelopeError::TagMismatch => ServiceError::TagMismatch,
        other => ServiceError::DecryptionFailure(other.to_string()),
    }
}

fn rejected_body(rejection: &JsonRejection) -> Response {
    // The rejection text can quote request content, so it is neither logged
    // nor returned.
    debug!(status = %rejection.status(), "request body rejected");
    error_response(&ServiceError::BadRequest("Invalid JSON body".into()))
}

fn error_response(err: &ServiceError) -> Response {
    let status =
        StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_server_error() {
        warn!(error = %err, "envelope operation failed");
    } else {
        debug!(error = %err, "request rejected");
    }
    (status, Json(ErrorResponse::from(err))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{
        key::{MockKeySource, KEY_LEN},
        padding::PaddingMode,
        EnvelopeKey,
    };
    use crate::envelope::{UnsealPolicy, WireFormat};
    use crate::server::router;
    use axum_test::TestServer;
    use serde_json::{json, Value};
    use std::sync::Arc;

    fn server(state: AppState) -> TestServer {
        TestServer::new(router::build(state)).unwrap()
    }

    async fn seal_via(
        server: &TestServer,
        data: &str,
        key_index: impl Into<Value>,
    ) -> (String, String) {
        let key_index = key_index.into();
        let resp = server
            .post("/encrypt")
            .json(&json!({"data": data, "keyIndex": key_index}))
            .await;
        resp.assert_status_ok();
        let body: SealResponse = resp.json();
        (body.final_data, body.key)
    }

    #[tokio::test]
    async fn hello_world_round_trip() {
        let server = server(AppState::default());
        let (final_data, key) = seal_via(&server, "hello world", 5).await;

        assert_eq!(key.len(), 48);
        let raw = hex::decode(&final_data).unwrap();
        assert_eq!(raw.len(), 3 + 24 + 16);
        assert_eq!(u16::from_be_bytes([raw[0], raw[1]]), 33);
        assert_eq!(raw[2], 5);

        let resp = server
            .post("/decrypt")
            .json(&json!({"finalData": final_data, "key": key}))
            .await;
        resp.assert_status_ok();
        resp.assert_json(&json!({"decryptedData": "hello world"}));
    }

    #[tokio::test]
    async fn encrypt_missing_fields_is_400() {
        let server = server(AppState::default());
        for body in [
            json!({}),
            json!({"data": "x"}),
            json!({"keyIndex": 3}),
            json!({"data": "", "keyIndex": 3}),
            json!({"data": "x", "keyIndex": 0}),
        ] {
            let resp = server.post("/encrypt").json(&body).await;
            resp.assert_status(StatusCode::BAD_REQUEST);
            resp.assert_json(&json!({"error": "Missing data or keyIndex"}));
        }
    }

    #[tokio::test]
    async fn zero_key_index_accepted_when_not_rejected() {
        let state = AppState::new(
            Arc::new(crate::crypto::OsKeySource),
            WireFormat::Legacy,
            UnsealPolicy::default(),
            false,
        );
        let server = server(state);
        let (final_data, _) = seal_via(&server, "zero", 0).await;
        assert_eq!(&final_data[4..6], "00");
    }

    #[tokio::test]
    async fn missing_fields_never_touch_key_source() {
        let mut keys = MockKeySource::new();
        keys.expect_generate().never();
        let state = AppState::new(
            Arc::new(keys),
            WireFormat::Legacy,
            UnsealPolicy::default(),
            true,
        );
        let resp = server(state)
            .post("/encrypt")
            .json(&json!({"data": "x", "keyIndex": 0}))
            .await;
        resp.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn key_index_keeps_low_byte() {
        let server = server(AppState::default());
        let (final_data, _) = seal_via(&server, "wide", 261).await;
        assert_eq!(&final_data[4..6], "05");
    }

    #[tokio::test]
    async fn deterministic_key_source_is_used() {
        let mut keys = MockKeySource::new();
        keys.expect_generate()
            .returning(|| EnvelopeKey::from_bytes([0x2Au8; KEY_LEN]));
        let state = AppState::new(
            Arc::new(keys),
            WireFormat::Legacy,
            UnsealPolicy::default(),
            true,
        );
        let (final_data, key) = seal_via(&server(state), "hello world", 5).await;
        assert_eq!(key, "2a".repeat(KEY_LEN));
        assert_eq!(
            final_data,
            "00210572e53b71b016210c1921a300d99aed567f28d5d806199b98\
             8e6508c153e2c2c27f28d5d806199b98"
        );
    }

    #[tokio::test]
    async fn fractional_key_index_is_truncated() {
        let server = server(AppState::default());
        let (final_data, _) = seal_via(&server, "float", 5.0).await;
        assert_eq!(&final_data[4..6], "05");
        let (final_data, _) = seal_via(&server, "float", 5.7).await;
        assert_eq!(&final_data[4..6], "05");
        let (final_data, _) = seal_via(&server, "float", 0.5).await;
        assert_eq!(&final_data[4..6], "00");

        let resp = server
            .post("/encrypt")
            .json(&json!({"data": "float", "keyIndex": 0.0}))
            .await;
        resp.assert_status(StatusCode::BAD_REQUEST);
        resp.assert_json(&json!({"error": "Missing data or keyIndex"}));
    }

    #[tokio::test]
    async fn compact_wire_format_round_trips() {
        let state = AppState::new(
            Arc::new(crate::crypto::OsKeySource),
            WireFormat::Compact,
            UnsealPolicy::default(),
            true,
        );
        let server = server(state);
        let (final_data, key) = seal_via(&server, "hello world", 5).await;
        assert_eq!(final_data.len(), 2 * (3 + 16 + 8));

        let resp = server
            .post("/decrypt")
            .json(&json!({"finalData": final_data, "key": key}))
            .await;
        resp.assert_status_ok();
        resp.assert_json(&json!({"decryptedData": "hello world"}));
    }

    #[tokio::test]
    async fn legacy_envelope_from_deployed_peer_opens() {
        let server = server(AppState::default());
        let resp = server
            .post("/decrypt")
            .json(&json!({
                "finalData": "002101fb4ce9b94ce999cb7f28d5d806199b987f28d5d806199b98\
                              8e6508c153e2c2c27f28d5d806199b98",
                "key": "2a".repeat(KEY_LEN),
            }))
            .await;
        resp.assert_status_ok();
        resp.assert_json(&json!({"decryptedData": "12345678"}));
    }

    #[tokio::test]
    async fn decrypt_missing_fields_is_400() {
        let server = server(AppState::default());
        let resp = server.post("/decrypt").json(&json!({"key": "00"})).await;
        resp.assert_status(StatusCode::BAD_REQUEST);
        resp.assert_json(&json!({"error": "Missing finalData or key"}));
    }

    #[tokio::test]
    async fn decrypt_invalid_key_size_is_400() {
        let server = server(AppState::default());
        let (final_data, _) = seal_via(&server, "sized", 2).await;
        let resp = server
            .post("/decrypt")
            .json(&json!({"finalData": final_data, "key": "00".repeat(16)}))
            .await;
        resp.assert_status(StatusCode::BAD_REQUEST);
        resp.assert_json(&json!({
            "error": "Invalid key size for 3DES encryption. Must be 24 bytes."
        }));
    }

    #[tokio::test]
    async fn tampered_tag_is_400_mac_failure() {
        let server = server(AppState::default());
        let (final_data, key) = seal_via(&server, "integrity", 4).await;
        let mut chars: Vec<char> = final_data.chars().collect();
        let last = chars.len() - 1;
        chars[last] = if chars[last] == '0' { '1' } else { '0' };
        let tampered: String = chars.into_iter().collect();

        let resp = server
            .post("/decrypt")
            .json(&json!({"finalData": tampered, "key": key}))
            .await;
        resp.assert_status(StatusCode::BAD_REQUEST);
        resp.assert_json(&json!({"error": "MAC verification failed"}));
    }

    #[tokio::test]
    async fn malformed_envelope_is_500_without_detail() {
        let server = server(AppState::default());
        let resp = server
            .post("/decrypt")
            .json(&json!({"finalData": "not-hex", "key": "11".repeat(KEY_LEN)}))
            .await;
        resp.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        resp.assert_json(&json!({"error": "Decryption failed"}));
    }

    #[tokio::test]
    async fn strict_policy_rejects_forged_header() {
        let policy = UnsealPolicy {
            padding: PaddingMode::Strict,
            verify_header: true,
        };
        let state = AppState::new(
            Arc::new(crate::crypto::OsKeySource),
            WireFormat::Legacy,
            policy,
            true,
        );
        let server = server(state);
        let (final_data, key) = seal_via(&server, "strict", 8).await;
        let forged = format!("0000{}", &final_data[4..]);

        let resp = server
            .post("/decrypt")
            .json(&json!({"finalData": forged, "key": key}))
            .await;
        resp.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        resp.assert_json(&json!({"error": "Decryption failed"}));
    }

    #[tokio::test]
    async fn wrongly_typed_body_is_400() {
        let server = server(AppState::default());
        let resp = server
            .post("/encrypt")
            .json(&json!({"data": 5, "keyIndex": "five"}))
            .await;
        resp.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = resp.json();
        assert_eq!(body["error"], "Invalid JSON body");
    }

    #[test]
    fn unseal_errors_map_to_distinct_kinds() {
        assert_eq!(
            unseal_error(EnvelopeError::InvalidKeySize),
            ServiceError::InvalidKeySize
        );
        assert_eq!(unseal_error(EnvelopeError::TagMismatch), ServiceError::TagMismatch);
        assert!(matches!(
            unseal_error(EnvelopeError::Malformed("envelope too short")),
            ServiceError::DecryptionFailure(_)
        ));
    }
}
